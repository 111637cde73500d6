//! Logging setup for the plugingate binary
//!
//! Gate decisions are logged by `plugin_signature` (per plugin) and by the
//! engine (per report). Both targets follow the configured level unless
//! `RUST_LOG` says otherwise. Output goes to stderr so that `--json` reports
//! on stdout stay machine readable.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Crates whose events the configured level applies to
const GATE_TARGETS: [&str; 2] = ["plugingate_engine", "plugin_signature"];

/// Filter directives for `log_level` when `RUST_LOG` is unset
fn default_directives(log_level: &str) -> String {
    let mut directives = log_level.to_string();
    for target in GATE_TARGETS {
        directives.push_str(&format!(",{}={}", target, log_level));
    }
    directives
}

fn build_filter(log_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(log_level)))
}

/// Install the global subscriber at `log_level`
///
/// `RUST_LOG` takes precedence over `log_level`. Debug builds print
/// human-readable lines, release builds print one JSON object per event.
/// Returns `false` when a subscriber was already installed.
pub fn init_telemetry_with_level(log_level: &str) -> bool {
    let (pretty, json) = if cfg!(debug_assertions) {
        (
            Some(fmt::layer().pretty().with_target(false).with_writer(std::io::stderr)),
            None,
        )
    } else {
        (
            None,
            Some(fmt::layer().json().with_current_span(true).with_writer(std::io::stderr)),
        )
    };

    tracing_subscriber::registry()
        .with(build_filter(log_level))
        .with(pretty)
        .with(json)
        .try_init()
        .is_ok()
}

/// Install the global subscriber at `info`, for use before config is loaded
pub fn init_telemetry() -> bool {
    init_telemetry_with_level("info")
}
