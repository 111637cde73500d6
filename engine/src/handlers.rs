//! Command handlers for CLI operations
//!
//! - check: validate a discovery snapshot and print the gate report
//! - config show: print the effective configuration
//! - config path: print the default configuration path

use anyhow::{Context, Result};
use serde_json::json;
use std::io::Write;
use std::path::Path;

use crate::config::Config;
use crate::discovery;
use crate::gate::{GateReport, LoadGate};

/// Output format for command results
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable text output
    Text,
    /// JSON output for machine consumption
    Json,
}

/// Validate the plugins in a snapshot file
///
/// Returns the report so the caller can pick an exit code.
pub fn handle_check(
    config: &Config,
    snapshot_path: &Path,
    format: OutputFormat,
    out: &mut impl Write,
) -> Result<GateReport> {
    let snapshot = discovery::load_snapshot(snapshot_path)?;
    let mut tree = discovery::build_tree(&snapshot)
        .with_context(|| format!("Invalid plugin tree in {}", snapshot_path.display()))?;

    let gate = LoadGate::new(config, None);
    let report = gate.evaluate(&mut tree);

    write_report(&report, format, out)?;
    Ok(report)
}

/// Print a gate report
pub fn write_report(report: &GateReport, format: OutputFormat, out: &mut impl Write) -> Result<()> {
    match format {
        OutputFormat::Text => {
            for plugin in &report.allowed {
                let note = if plugin.unsigned_override {
                    " (unsigned, allowed by policy)"
                } else {
                    ""
                };
                writeln!(out, "✓ {} [{}]{}", plugin.id, plugin.signature, note)?;
            }
            for rejected in &report.rejected {
                writeln!(out, "✗ {}", rejected.message)?;
                writeln!(out, "  Hint: {}", rejected.hint)?;
            }
            writeln!(out)?;
            writeln!(out, "{}", report.summary())?;
        }
        OutputFormat::Json => {
            let output = json!({
                "clean": report.is_clean(),
                "summary": report.summary(),
                "allowed": report.allowed,
                "rejected": report.rejected,
            });
            writeln!(out, "{}", serde_json::to_string_pretty(&output)?)?;
        }
    }
    Ok(())
}

/// Print the effective configuration
pub fn handle_config_show(config: &Config, format: OutputFormat, out: &mut impl Write) -> Result<()> {
    match format {
        OutputFormat::Text => write!(out, "{}", config.to_toml()?)?,
        OutputFormat::Json => writeln!(out, "{}", serde_json::to_string_pretty(config)?)?,
    }
    Ok(())
}

/// Print the default configuration path
pub fn handle_config_path(format: OutputFormat, out: &mut impl Write) -> Result<()> {
    let path = Config::default_config_path()?;
    match format {
        OutputFormat::Text => writeln!(out, "{}", path.display())?,
        OutputFormat::Json => writeln!(out, "{}", json!({ "path": path }))?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gate::{AllowedPlugin, RejectedPlugin};
    use sdk::errors::SignatureError;
    use sdk::types::{PluginClass, SignatureStatus};

    fn sample_report() -> GateReport {
        GateReport {
            allowed: vec![AllowedPlugin {
                id: "p1".to_string(),
                signature: SignatureStatus::Unsigned,
                signature_type: None,
                signature_org: String::new(),
                class: PluginClass::External,
                unsigned_override: true,
            }],
            rejected: vec![RejectedPlugin::from(SignatureError::new(
                "p2",
                Some(SignatureStatus::Invalid),
            ))],
        }
    }

    #[test]
    fn test_text_report() {
        let mut out = Vec::new();
        write_report(&sample_report(), OutputFormat::Text, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("✓ p1 [unsigned] (unsigned, allowed by policy)"));
        assert!(text.contains("✗ plugin 'p2' has an invalid signature"));
        assert!(text.contains("2 plugins checked: 1 allowed (1 unsigned), 1 rejected"));
    }

    #[test]
    fn test_json_report() {
        let mut out = Vec::new();
        write_report(&sample_report(), OutputFormat::Json, &mut out).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();

        assert_eq!(value["clean"], false);
        assert_eq!(value["allowed"][0]["id"], "p1");
        assert_eq!(value["rejected"][0]["code"], "signatureInvalid");
    }

    #[test]
    fn test_config_show_text() {
        let mut out = Vec::new();
        handle_config_show(&Config::default(), OutputFormat::Text, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("env = \"production\""));
        assert!(text.contains("allow_loading_unsigned_plugins"));
    }
}
