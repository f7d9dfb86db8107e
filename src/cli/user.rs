//! User CLI commands
//!
//! Implements CLI commands for the multi-user directory.

use clap::Subcommand;

use crate::config::settings::Settings;
use crate::display::{
    format_summary, format_transaction_register, format_user_details, format_user_list,
};
use crate::error::{LedgerError, LedgerResult};
use crate::models::UserId;
use crate::services::{LedgerService, UserService};
use crate::storage::Storage;

/// User subcommands
#[derive(Subcommand, Debug)]
pub enum UserCommands {
    /// Create a new user with an empty ledger
    Add {
        /// Display name (duplicates allowed)
        name: String,
    },
    /// List all users with their totals
    List,
    /// Show a user's details, totals and transactions
    Show {
        /// User ID ("3" or "usr-3")
        id: String,
    },
}

/// Parse a user ID argument
pub fn parse_user_id(input: &str) -> LedgerResult<UserId> {
    UserId::parse(input.trim())
        .map_err(|_| LedgerError::Parse(format!("Invalid user ID: '{}'", input)))
}

/// Handle a user command
pub fn handle_user_command(
    storage: &Storage,
    settings: &Settings,
    cmd: UserCommands,
) -> LedgerResult<()> {
    let service = UserService::new(storage);
    let symbol = settings.currency_symbol.as_str();

    match cmd {
        UserCommands::Add { name } => {
            let user = service.create_user(&name)?;
            println!("Created user: {}", user.name);
            println!("  ID: {}", user.id);
        }

        UserCommands::List => {
            let users = service.list_with_summaries()?;
            print!("{}", format_user_list(&users, symbol));
        }

        UserCommands::Show { id } => {
            let id = parse_user_id(&id)?;
            let overview = service
                .overview(id)?
                .ok_or_else(|| LedgerError::user_not_found(id.to_string()))?;

            print!("{}", format_user_details(&overview));
            println!();
            print!("{}", format_summary("Totals", &overview.summary, symbol));
            println!();

            let transactions = LedgerService::for_user(storage, id).list_transactions()?;
            print!("{}", format_transaction_register(&transactions, symbol));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::LedgerPaths;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut storage = Storage::new(paths);
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    #[test]
    fn test_parse_user_id() {
        assert_eq!(parse_user_id("3").unwrap(), UserId::new(3));
        assert_eq!(parse_user_id("usr-3").unwrap(), UserId::new(3));
        assert!(parse_user_id("").is_err());
    }

    #[test]
    fn test_add_and_show() {
        let (_temp_dir, storage) = create_test_storage();
        let settings = Settings::default();

        handle_user_command(
            &storage,
            &settings,
            UserCommands::Add {
                name: "Alice".into(),
            },
        )
        .unwrap();
        assert_eq!(storage.directory.count().unwrap(), 1);

        handle_user_command(&storage, &settings, UserCommands::Show { id: "1".into() }).unwrap();
    }

    #[test]
    fn test_show_missing_user() {
        let (_temp_dir, storage) = create_test_storage();
        let err = handle_user_command(
            &storage,
            &Settings::default(),
            UserCommands::Show { id: "2".into() },
        )
        .unwrap_err();
        assert!(err.is_not_found());
    }
}
