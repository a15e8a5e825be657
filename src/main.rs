//! PagePilot - headless page assistant
//!
//! Main entry point for the PagePilot CLI.

mod cli;
mod commands;

use std::path::PathBuf;

use clap::Parser;
use tracing::{info, warn};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use pagepilot_config::{pagepilot_dir, Config, ConfigLoader, ConfigValidator, LoggingConfig};

use crate::cli::{Cli, Commands};

/// Initialize tracing with console and file output.
///
/// Log files are written to the configured log directory with daily rotation.
/// Console output goes to stderr so command output on stdout stays clean.
fn init_tracing(logging: &LoggingConfig) -> Result<(), Box<dyn std::error::Error>> {
    let log_dir = logging.resolved_dir();
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("pagepilot")
        .filename_suffix("log")
        .max_log_files(14)
        .build(&log_dir)?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    // Keeps the background writer alive for the program duration.
    static GUARD: std::sync::OnceLock<tracing_appender::non_blocking::WorkerGuard> =
        std::sync::OnceLock::new();
    let _ = GUARD.set(guard);

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_target(true)
                .with_ansi(true)
                .with_writer(std::io::stderr),
        )
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .init();

    Ok(())
}

/// An explicit `--config` must exist; the default location is optional.
fn load_config(path: Option<PathBuf>) -> Result<Config, Box<dyn std::error::Error>> {
    let config = match path {
        Some(path) => ConfigLoader::load(&path)?,
        None => ConfigLoader::load_or_default(&pagepilot_dir().join("config.toml"))?,
    };
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_config(cli.config)?;
    init_tracing(&config.logging)?;

    let warnings = ConfigValidator::validate(&config).into_result()?;
    for warning in warnings {
        warn!("Config {}: {}", warning.path, warning.message);
    }
    info!("Starting PagePilot v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Context { page } => commands::context(&config, &page).await,
        Commands::Parse { file } => commands::parse(&file).await,
        Commands::Apply {
            page,
            response,
            completions,
            output,
        } => {
            commands::apply(
                &config,
                &page,
                &response,
                completions.as_deref(),
                output.as_deref(),
            )
            .await
        }
        Commands::Chat {
            page,
            completions,
            output,
        } => commands::chat(&config, &page, &completions, output.as_deref()).await,
    }
}
