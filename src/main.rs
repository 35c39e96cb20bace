//! healthwatch - health-monitoring daemon
//!
//! Main entry point for the healthwatch CLI and daemon.

mod cli;
mod cmd_run;

use std::path::Path;

use clap::Parser;
use tracing::warn;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use healthwatch_config::{Config, ConfigLoader, ConfigValidator};

use crate::cli::{Cli, Commands};

/// Initialize tracing with console output and, when `log_dir` is set, a
/// daily rolling log file.
fn init_tracing(log_dir: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let file_layer = match log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)?;
            let file_appender = RollingFileAppender::builder()
                .rotation(Rotation::DAILY)
                .filename_prefix("healthwatch")
                .filename_suffix("log")
                .max_log_files(30)
                .build(dir)?;

            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

            // Keep the writer alive for the program duration
            static GUARD: std::sync::OnceLock<tracing_appender::non_blocking::WorkerGuard> =
                std::sync::OnceLock::new();
            let _ = GUARD.set(guard);

            Some(fmt::layer().with_writer(non_blocking).with_ansi(false))
        }
        None => None,
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(true).with_ansi(true))
        .with(file_layer)
        .init();

    Ok(())
}

/// Reject an invalid configuration. Validation warnings are logged.
fn validated(config: Config) -> Result<Config, Box<dyn std::error::Error>> {
    for warning in ConfigValidator::validate(&config).into_result()? {
        warn!(path = %warning.path, "{}", warning.message);
    }
    Ok(config)
}

/// Print validation results for a config file.
fn validate(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let config = ConfigLoader::load(path)?;
    let result = ConfigValidator::validate(&config);

    for error in &result.errors {
        println!("error   {}: {}", error.path, error.message);
    }
    for warning in &result.warnings {
        println!("warning {}: {}", warning.path, warning.message);
    }

    result.into_result()?;
    println!("{} is valid", path.display());
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Run {
        host: None,
        port: None,
    });

    match command {
        Commands::Run { host, port } => {
            let config = ConfigLoader::load(&cli.config)?;
            init_tracing(Some(&config.logging.resolved_dir()))?;
            cmd_run::run_daemon(validated(config)?, host, port).await
        }
        Commands::Check => {
            init_tracing(None)?;
            let config = validated(ConfigLoader::load(&cli.config)?)?;
            cmd_run::check_once(config).await
        }
        Commands::Validate => validate(&cli.config),
    }
}
