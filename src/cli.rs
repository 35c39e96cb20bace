//! CLI definitions for healthwatch.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// healthwatch CLI.
#[derive(Parser)]
#[command(name = "healthwatch")]
#[command(about = "Health-monitoring daemon with debounced email notifications")]
#[command(version)]
pub(crate) struct Cli {
    /// Configuration file path
    #[arg(
        short,
        long,
        default_value = "config/healthwatch.toml",
        env = "HEALTHWATCH_CONFIG",
        global = true
    )]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Run the monitor and the public status server (default)
    Run {
        /// Override the status server host
        #[arg(long)]
        host: Option<String>,

        /// Override the status server port
        #[arg(long)]
        port: Option<u16>,
    },

    /// Run a single probe cycle and print the observations without sending email
    Check,

    /// Validate the configuration file
    Validate,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_command() {
        let cli = Cli::try_parse_from(["healthwatch"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.config, PathBuf::from("config/healthwatch.toml"));
    }

    #[test]
    fn test_run_overrides() {
        let cli =
            Cli::try_parse_from(["healthwatch", "run", "--port", "9090", "-c", "/etc/hw.toml"])
                .unwrap();
        assert_eq!(cli.config, PathBuf::from("/etc/hw.toml"));
        match cli.command {
            Some(Commands::Run { host, port }) => {
                assert!(host.is_none());
                assert_eq!(port, Some(9090));
            }
            _ => panic!("expected run command"),
        }
    }

    #[test]
    fn test_check_command() {
        let cli = Cli::try_parse_from(["healthwatch", "check"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Check)));
    }
}
