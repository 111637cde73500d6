// PluginGate
// Main entry point for the plugingate binary

use clap::Parser;
use plugingate_engine::cli::{Cli, Command, ConfigAction};
use plugingate_engine::config::Config;
use plugingate_engine::handlers::{
    handle_check, handle_config_path, handle_config_show, OutputFormat,
};
use plugingate_engine::telemetry::{init_telemetry, init_telemetry_with_level};
use std::process::ExitCode;

fn main() -> anyhow::Result<ExitCode> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Determine output format
    let format = if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Text
    };

    // Load configuration (or use custom path if provided)
    let config = match &cli.config {
        Some(config_path) => Config::load_from_path(config_path),
        None => Config::load_or_create(),
    };
    let config = match config {
        Ok(config) => config,
        Err(e) => {
            init_telemetry();
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    // --log wins over the configured level; RUST_LOG wins over both
    init_telemetry_with_level(cli.log.as_deref().unwrap_or(&config.core.log_level));

    tracing::debug!("PluginGate v{}", env!("CARGO_PKG_VERSION"));

    let mut stdout = std::io::stdout().lock();

    match cli.command {
        Command::Check { snapshot } => {
            let report = handle_check(&config, &snapshot, format, &mut stdout)?;
            if report.is_clean() {
                Ok(ExitCode::SUCCESS)
            } else {
                Ok(ExitCode::FAILURE)
            }
        }

        Command::Config { action } => {
            match action {
                ConfigAction::Show => handle_config_show(&config, format, &mut stdout)?,
                ConfigAction::Path => handle_config_path(format, &mut stdout)?,
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}
