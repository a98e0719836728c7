use anyhow::Result;
use clap::Parser;
use log::{debug, info};
use tracing_subscriber::EnvFilter;

use savings_tracker::io::cli::{self, AssumeYes, Cli, TerminalConfirmation};
use savings_tracker::storage::{default_data_directory, ConfigRepository, FileStore, GoalRepository};
use savings_tracker::{Confirmation, GoalTracker};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let data_dir = match cli.data_dir.clone() {
        Some(dir) => dir,
        None => default_data_directory()?,
    };
    let config_repository = ConfigRepository::new(&data_dir);
    let config = config_repository.load_or_create()?;

    init_logging(&config.log_level);
    info!("Using data directory {}", data_dir.display());
    debug!("Loaded config: {:?}", config);

    let store = FileStore::new(&data_dir)?;
    let repository = GoalRepository::with_key(store, config.storage_key.clone());
    let mut tracker = GoalTracker::open(repository);

    let confirmation: &dyn Confirmation = if cli.yes {
        &AssumeYes
    } else {
        &TerminalConfirmation
    };

    let is_mutation = cli.command.is_mutation();
    cli::run(cli.command, &mut tracker, confirmation)?;

    if is_mutation {
        config_repository.record_data_format_version()?;
    }

    Ok(())
}

/// Log to stderr. The subscriber also receives the `log` records of the whole
/// crate; `RUST_LOG` wins over the configured level
fn init_logging(default_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
