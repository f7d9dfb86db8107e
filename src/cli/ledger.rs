//! Ledger CLI commands
//!
//! Recording, deleting and reviewing transactions in the selected ledger.

use clap::Subcommand;

use crate::config::settings::Settings;
use crate::display::{format_summary, format_transaction_register};
use crate::error::{LedgerError, LedgerResult};
use crate::models::{Money, TransactionId};
use crate::services::{LedgerScope, LedgerService, UserService};
use crate::storage::Storage;

/// Ledger subcommands
#[derive(Subcommand, Debug)]
pub enum LedgerCommands {
    /// Record income
    Income {
        /// Category (free text)
        category: String,
        /// Amount (e.g., "1000.00" or "1000")
        #[arg(allow_hyphen_values = true)]
        amount: String,
    },
    /// Record an expense
    Expense {
        /// Category (free text)
        category: String,
        /// Amount (e.g., "12.50")
        #[arg(allow_hyphen_values = true)]
        amount: String,
    },
    /// Delete a transaction by ID
    Delete {
        /// Transaction ID
        id: String,
    },
    /// List transactions in ID order
    List,
    /// Show income, expense and net totals
    Summary,
}

/// Parse an amount argument
pub fn parse_amount(input: &str) -> LedgerResult<Money> {
    Money::parse(input).map_err(|e| {
        LedgerError::Parse(format!(
            "Invalid amount: '{}'. Use format like '12.50' or '12'. Error: {}",
            input, e
        ))
    })
}

/// Parse a transaction ID argument ("7" or "txn-7")
pub fn parse_transaction_id(input: &str) -> LedgerResult<TransactionId> {
    TransactionId::parse(input.trim())
        .map_err(|_| LedgerError::Parse(format!("Invalid transaction ID: '{}'", input)))
}

/// Human-readable name of the ledger in `scope`
fn scope_title(storage: &Storage, scope: LedgerScope) -> LedgerResult<String> {
    match scope {
        LedgerScope::Personal => Ok("Personal ledger".to_string()),
        LedgerScope::User(id) => {
            let user = UserService::new(storage)
                .get_user(id)?
                .ok_or_else(|| LedgerError::user_not_found(id.to_string()))?;
            Ok(format!("Ledger for {} ({})", user.name, user.id))
        }
    }
}

/// Handle a ledger command
pub fn handle_ledger_command(
    storage: &Storage,
    settings: &Settings,
    scope: LedgerScope,
    cmd: LedgerCommands,
) -> LedgerResult<()> {
    let service = LedgerService::new(storage, scope);
    let symbol = settings.currency_symbol.as_str();

    match cmd {
        LedgerCommands::Income { category, amount } => {
            let amount = parse_amount(&amount)?;
            let txn = service.add_income(&category, amount)?;
            println!(
                "Recorded income {}: {} {}",
                txn.id,
                txn.category,
                txn.amount.format_with_symbol(symbol)
            );
        }

        LedgerCommands::Expense { category, amount } => {
            let amount = parse_amount(&amount)?;
            let txn = service.add_expense(&category, amount)?;
            println!(
                "Recorded expense {}: {} {}",
                txn.id,
                txn.category,
                txn.amount.format_with_symbol(symbol)
            );
        }

        LedgerCommands::Delete { id } => {
            let id = parse_transaction_id(&id)?;
            match service.delete_transaction(id)? {
                Some(txn) => println!(
                    "Deleted {} {}: {} {}",
                    txn.kind.to_string().to_lowercase(),
                    txn.id,
                    txn.category,
                    txn.amount.format_with_symbol(symbol)
                ),
                None => println!("Transaction {} not found; nothing deleted.", id),
            }
        }

        LedgerCommands::List => {
            let transactions = service.list_transactions()?;
            println!("{}", scope_title(storage, scope)?);
            print!("{}", format_transaction_register(&transactions, symbol));
        }

        LedgerCommands::Summary => {
            let summary = service.summary()?;
            print!(
                "{}",
                format_summary(&scope_title(storage, scope)?, &summary, symbol)
            );
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::LedgerPaths;
    use crate::models::UserId;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut storage = Storage::new(paths);
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("12.50").unwrap(), Money::from_cents(1250));
        assert_eq!(parse_amount("-3").unwrap(), Money::from_cents(-300));
        assert!(matches!(parse_amount("abc"), Err(LedgerError::Parse(_))));
    }

    #[test]
    fn test_parse_transaction_id() {
        assert_eq!(parse_transaction_id("7").unwrap(), TransactionId::new(7));
        assert_eq!(parse_transaction_id("txn-7").unwrap(), TransactionId::new(7));
        assert!(parse_transaction_id("seven").is_err());
    }

    #[test]
    fn test_income_then_delete() {
        let (_temp_dir, storage) = create_test_storage();
        let settings = Settings::default();

        handle_ledger_command(
            &storage,
            &settings,
            LedgerScope::Personal,
            LedgerCommands::Income {
                category: "Salary".into(),
                amount: "1000".into(),
            },
        )
        .unwrap();
        assert_eq!(storage.ledger.count().unwrap(), 1);

        handle_ledger_command(
            &storage,
            &settings,
            LedgerScope::Personal,
            LedgerCommands::Delete { id: "1".into() },
        )
        .unwrap();
        assert_eq!(storage.ledger.count().unwrap(), 0);
    }

    #[test]
    fn test_delete_missing_is_not_an_error() {
        let (_temp_dir, storage) = create_test_storage();
        handle_ledger_command(
            &storage,
            &Settings::default(),
            LedgerScope::Personal,
            LedgerCommands::Delete { id: "42".into() },
        )
        .unwrap();
    }

    #[test]
    fn test_missing_user_is_an_error() {
        let (_temp_dir, storage) = create_test_storage();
        let err = handle_ledger_command(
            &storage,
            &Settings::default(),
            LedgerScope::User(UserId::new(9)),
            LedgerCommands::Summary,
        )
        .unwrap_err();
        assert!(err.is_not_found());
    }
}
