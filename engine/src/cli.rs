//! CLI interface for PluginGate
//!
//! This module provides the command-line interface using clap's derive API.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// PluginGate signature gate
///
/// Decides which discovered plugins are trusted enough to load.
#[derive(Parser, Debug)]
#[command(name = "plugingate")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Set log level (error, warn, info, debug, trace)
    #[arg(long, global = true, value_name = "LEVEL")]
    pub log: Option<String>,

    /// Specify alternate configuration file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Validate the plugins in a discovery snapshot
    Check {
        /// Path to the discovery snapshot (JSON)
        snapshot: PathBuf,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Configuration actions
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show the effective configuration
    Show,

    /// Print the default configuration file path
    Path,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_command() {
        let cli = Cli::parse_from(["plugingate", "check", "snapshot.json"]);
        if let Command::Check { snapshot } = cli.command {
            assert_eq!(snapshot, PathBuf::from("snapshot.json"));
        } else {
            panic!("Expected Check command");
        }
        assert!(!cli.json);
        assert!(cli.log.is_none());
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_global_flags() {
        let cli = Cli::parse_from([
            "plugingate",
            "check",
            "snapshot.json",
            "--json",
            "--log",
            "debug",
            "--config",
            "/etc/plugingate.toml",
        ]);
        assert!(cli.json);
        assert_eq!(cli.log, Some("debug".to_string()));
        assert_eq!(cli.config, Some(PathBuf::from("/etc/plugingate.toml")));
    }

    #[test]
    fn test_config_actions() {
        let cli = Cli::parse_from(["plugingate", "config", "show"]);
        assert!(matches!(
            cli.command,
            Command::Config {
                action: ConfigAction::Show
            }
        ));

        let cli = Cli::parse_from(["plugingate", "config", "path"]);
        assert!(matches!(
            cli.command,
            Command::Config {
                action: ConfigAction::Path
            }
        ));
    }

    #[test]
    fn test_check_requires_snapshot() {
        assert!(Cli::try_parse_from(["plugingate", "check"]).is_err());
    }
}
