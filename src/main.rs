use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::warn;
use tracing_subscriber::{
    layer::SubscriberExt, reload, util::SubscriberInitExt, EnvFilter, Registry,
};

use finledger::cli::{
    handle_export_command, handle_history_command, handle_ledger_command, handle_user_command,
    ExportArgs, HistoryArgs, LedgerCommands, UserCommands,
};
use finledger::config::paths::{LedgerPaths, DATA_DIR_ENV};
use finledger::config::settings::Settings;
use finledger::error::LedgerResult;
use finledger::models::UserId;
use finledger::services::LedgerScope;
use finledger::storage::Storage;

/// Environment variable holding a tracing filter
const LOG_ENV: &str = "FINLEDGER_LOG";

#[derive(Parser)]
#[command(
    name = "finledger",
    author = "Kaylee Beyene",
    version,
    about = "Terminal-based income and expense ledger",
    long_about = "finledger records income and expenses, keeps running totals, \
                  and stores a personal ledger plus any number of per-user \
                  ledgers in plain line-delimited files."
)]
struct Cli {
    /// Act on this user's ledger instead of the personal one ("3" or "usr-3")
    #[arg(short, long, global = true)]
    user: Option<UserId>,

    /// Base directory for data, settings and the audit log
    #[arg(long, global = true, env = DATA_DIR_ENV)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    #[command(flatten)]
    Ledger(LedgerCommands),

    /// User management commands
    #[command(subcommand)]
    User(UserCommands),

    /// Export the selected ledger to a file
    Export(ExportArgs),

    /// Show recent creates and deletes from the audit log
    History(HistoryArgs),

    /// Show current configuration and paths
    Config {
        /// Write the current settings to the settings file so they can be edited
        #[arg(long)]
        save: bool,
    },
}

/// Install the subscriber before anything else runs
///
/// Without `FINLEDGER_LOG` the filter starts at the default setting and is
/// swapped for the configured one once settings are loaded; the returned
/// handle does that swap.
fn init_tracing() -> Option<reload::Handle<EnvFilter, Registry>> {
    match EnvFilter::try_from_env(LOG_ENV) {
        Ok(filter) => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
            None
        }
        Err(_) => {
            let (filter, handle) =
                reload::Layer::new(EnvFilter::new(Settings::default().log_filter));
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
            Some(handle)
        }
    }
}

fn apply_log_filter(handle: &reload::Handle<EnvFilter, Registry>, directives: &str) {
    let filter = match EnvFilter::try_new(directives) {
        Ok(filter) => filter,
        Err(e) => {
            warn!(log_filter = directives, error = %e, "Invalid log filter in settings, keeping default");
            return;
        }
    };
    if let Err(e) = handle.reload(filter) {
        warn!(error = %e, "Could not apply log filter from settings");
    }
}

fn handle_config_command(
    paths: &LedgerPaths,
    settings: &Settings,
    save: bool,
) -> LedgerResult<()> {
    if save {
        settings.save(paths)?;
        println!("Settings written to: {}", paths.settings_file().display());
        println!();
    }

    println!("finledger Configuration");
    println!("=======================");
    println!("Base directory:  {}", paths.base_dir().display());
    println!("Settings file:   {}", paths.settings_file().display());
    println!("Personal ledger: {}", paths.ledger_file().display());
    println!("User directory:  {}", paths.users_file().display());
    println!("Audit log:       {}", paths.audit_log().display());
    println!();
    println!("Settings:");
    println!("  Currency symbol: {}", settings.currency_symbol);
    println!("  Audit enabled:   {}", settings.audit_enabled);
    println!("  Log filter:      {}", settings.log_filter);
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let log_handle = init_tracing();

    // Initialize paths and settings
    let paths = match cli.data_dir {
        Some(dir) => LedgerPaths::with_base_dir(dir),
        None => LedgerPaths::new()?,
    };
    let settings = Settings::load_or_create(&paths)?;
    if let Some(handle) = &log_handle {
        apply_log_filter(handle, &settings.log_filter);
    }

    // Initialize storage
    let mut storage = Storage::new(paths.clone()).with_audit(settings.audit_enabled);
    storage.load_all()?;

    let scope = cli.user.map_or(LedgerScope::Personal, LedgerScope::User);

    let outcome = match cli.command {
        Some(Commands::Ledger(cmd)) => handle_ledger_command(&storage, &settings, scope, cmd),
        Some(Commands::User(cmd)) => handle_user_command(&storage, &settings, cmd),
        Some(Commands::Export(args)) => handle_export_command(&storage, scope, args),
        Some(Commands::History(args)) => handle_history_command(&storage, args),
        Some(Commands::Config { save }) => handle_config_command(&paths, &settings, save),
        None => {
            println!("finledger - income and expense ledger");
            println!();
            println!("Run 'finledger --help' for usage information.");
            Ok(())
        }
    };

    storage.shutdown();
    outcome?;

    Ok(())
}
