//! CPS Tracker CLI
//!
//! Local execution entry point, meant to be run on a schedule.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use cps_tracker::{
    error::{AppError, Result},
    models::Config,
    pipeline,
    services::{matcher, notifier_from_config},
    storage::{HistoryStore, LocalStorage},
    utils::http,
};

/// CPS Tracker - recruitment process and gazette watcher
#[derive(Parser, Debug)]
#[command(
    name = "tracker",
    version,
    about = "Watches CPS selection processes and the DOE-SP gazette for a name"
)]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Crawl every listing, search the gazette and notify
    Sweep {
        /// Do not search the official gazette
        #[arg(long)]
        skip_gazette: bool,
    },

    /// Validate the configuration
    Validate,

    /// Show history statistics
    Info,

    /// Check a local PDF/DOCX for the candidate's name
    Scan {
        /// Document to read
        file: PathBuf,

        /// Name to look for (default: the configured candidate)
        #[arg(long)]
        name: Option<String>,
    },
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    dotenvy::dotenv().ok();
    init_logging(cli.verbose);

    let mut config = Config::load_or_default(&cli.config)?;
    config.apply_env();

    let store = LocalStorage::new(&config.storage.history_file);

    match cli.command {
        Command::Sweep { skip_gazette } => {
            log::info!("CPS Tracker starting...");
            config.validate()?;

            let client = http::create_client(&config.crawler)?;
            let notifier = notifier_from_config(&client, &config.notifier);
            let report =
                pipeline::run_sweep(&config, &store, notifier.as_ref(), skip_gazette).await?;

            log::info!(
                "Sweep complete: {} new document(s), {} new gazette publication(s)",
                report.new_documents,
                report.gazette_new
            );
        }

        Command::Validate => {
            log::info!("Validating configuration...");

            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            log::info!("✓ Config OK ({} listing pages)", config.listings.len());
            log::info!(
                "Notifier: {}",
                if config.notifier.is_configured() {
                    "CallMeBot"
                } else {
                    "log only (CALLMEBOT_PHONE/CALLMEBOT_APIKEY not set)"
                }
            );
        }

        Command::Info => {
            log::info!("History file: {}", store.path().display());

            let history = store.load().await?;
            let stats = history.stats();
            log::info!("Entries: {}", history.len());
            log::info!("  Portal documents: {}", stats.documents);
            log::info!("  Gazette publications: {}", stats.publications);
            log::info!("  Name found in: {}", stats.found);
        }

        Command::Scan { file, name } => {
            let name = name.unwrap_or_else(|| config.candidate.name.clone());
            if name.trim().is_empty() {
                return Err(AppError::validation("no name to scan for"));
            }

            let found = matcher::scan_file(&file, &name)?;
            if found {
                log::info!("\"{}\" found in {}", name, file.display());
            } else {
                log::info!("\"{}\" not found in {}", name, file.display());
            }
        }
    }

    log::info!("Done!");

    Ok(())
}
