//! Command-line interface definition.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// chargemon - battery charge monitor
///
/// Watches the battery and alerts when it should be plugged in or
/// unplugged. Runs in the foreground; use your service manager to
/// daemonize.
#[derive(Debug, Parser)]
#[command(name = "chargemon")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, short, env = "CHARGEMON_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable debug output
    #[arg(long, short = 'v')]
    pub debug: bool,

    /// Emit logs as JSON
    #[arg(long)]
    pub log_json: bool,

    /// Seconds between battery evaluations
    #[arg(long)]
    pub evaluate_interval: Option<u64>,

    /// Seconds between icon refreshes
    #[arg(long)]
    pub icon_interval: Option<u64>,

    /// Override the plug-in threshold for this run (not persisted)
    #[arg(long)]
    pub plug_percent: Option<u8>,

    /// Override the unplug threshold for this run (not persisted)
    #[arg(long)]
    pub unplug_percent: Option<u8>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Inspect the configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Configuration subcommands.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Print the effective configuration as TOML
    Dump,
    /// Print the configuration file path
    Path,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bare_invocation() {
        let cli = Cli::parse_from(["chargemon"]);
        assert!(cli.command.is_none());
        assert!(!cli.debug);
        assert!(cli.config.is_none());
    }

    #[test]
    fn parses_overrides() {
        let cli = Cli::parse_from([
            "chargemon",
            "-v",
            "--evaluate-interval",
            "60",
            "--unplug-percent",
            "90",
        ]);
        assert!(cli.debug);
        assert_eq!(cli.evaluate_interval, Some(60));
        assert_eq!(cli.unplug_percent, Some(90));
        assert_eq!(cli.plug_percent, None);
    }

    #[test]
    fn parses_config_subcommand() {
        let cli = Cli::parse_from(["chargemon", "config", "dump"]);
        assert!(matches!(
            cli.command,
            Some(Command::Config {
                action: ConfigAction::Dump
            })
        ));
    }
}
