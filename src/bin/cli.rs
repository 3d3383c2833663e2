//! xkcd relay CLI
//!
//! Long-running entry point; configure through environment variables or an
//! optional TOML file.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use xkcd_relay::{
    error::Result,
    models::{RuntimeConfig, Schedule},
    pipeline::{self, Components},
    storage::VisitedStore,
};

/// xkcd relay - random comics for a Telegram chat
#[derive(Parser, Debug)]
#[command(name = "xkcd-relay", version, about = "Random xkcd comics for Telegram")]
struct Cli {
    /// Optional TOML file with non-secret settings
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Visited-set file (overrides DATA_FILE_PATH)
    #[arg(long, global = true)]
    data_file: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Deliver comics in batches until SIGINT/SIGTERM (default)
    Run,

    /// Deliver a single comic and exit
    Once,

    /// Validate configuration
    Validate,

    /// Show visited-set and archive status
    Info,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

fn load_config(cli: &Cli) -> Result<RuntimeConfig> {
    let mut config = RuntimeConfig::from_sources(cli.config.as_deref())?;
    if let Some(path) = &cli.data_file {
        config.storage.data_file = path.clone();
    }
    Ok(config)
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = load_config(&cli)?;
    log::debug!("Configuration: {:?}", config);

    match cli.command.unwrap_or(Command::Run) {
        Command::Run => {
            let shutdown = pipeline::shutdown_signal()?;
            let (components, schedule) = startup(&config).await?;
            pipeline::run_relay(&components, schedule, shutdown).await?;
            log::info!("Stopped.");
        }

        Command::Once => {
            let (components, _) = startup(&config).await?;
            let id = pipeline::run_once(&components).await?;
            log::info!("Delivered comic {}", id);
        }

        Command::Validate => {
            log::info!("Validating configuration...");
            config.validate()?;
            let schedule = config.schedule.validated()?;
            log::info!(
                "✓ Config OK: {} per batch, every {}-{} min, state at {}",
                schedule.batch_size,
                schedule.min_interval_minutes,
                schedule.max_interval_minutes,
                config.storage.data_file.display()
            );
        }

        Command::Info => {
            let components = Components::from_config(&config)?;
            let visited = components.store.load().await?;
            log::info!("State file: {}", config.storage.data_file.display());
            log::info!("Visited comics: {}", visited.len());

            match components.archive.latest_id().await {
                Ok(latest) => {
                    log::info!("Latest comic: {}", latest);
                    log::info!(
                        "Remaining before reset: {}",
                        visited.unvisited(latest).len()
                    );
                }
                Err(e) => log::warn!("Archive unreachable: {}", e),
            }
        }
    }

    Ok(())
}

/// Build components and validate, reporting rejections to the chat.
async fn startup(config: &RuntimeConfig) -> Result<(Components, Schedule)> {
    let components = Components::from_config(config)?;
    let notifier = config
        .telegram
        .has_credentials()
        .then(|| components.notifier.as_ref());
    let schedule = pipeline::validate_or_report(config, notifier, &components.notices).await?;
    Ok((components, schedule))
}
