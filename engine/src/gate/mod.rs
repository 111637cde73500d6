//! Load gate — runs the signature validator over a discovered plugin tree
//!
//! The gate is the point where the loader asks "may these plugins run?".
//! It validates the whole tree parent-first and returns a [`GateReport`]
//! listing what may load and what must be skipped. A rejected plugin is
//! never retried; the operator has to fix the plugin or the policy.

use plugin_signature::{PluginTree, SignatureValidator, UnsignedPluginCondition};
use sdk::errors::{GateErrorExt, SignatureError};
use sdk::types::{Plugin, PluginClass, SignatureStatus, SignatureType};
use serde::Serialize;

use crate::config::Config;

/// A plugin cleared for loading
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AllowedPlugin {
    pub id: String,
    /// Final signature status, after inheritance
    pub signature: SignatureStatus,
    pub signature_type: Option<SignatureType>,
    pub signature_org: String,
    pub class: PluginClass,
    /// Loaded unsigned because the unsigned policy allowed it
    pub unsigned_override: bool,
}

impl AllowedPlugin {
    fn from_plugin(plugin: &Plugin) -> Self {
        Self {
            id: plugin.id.clone(),
            signature: plugin.signature,
            signature_type: plugin.signature_type,
            signature_org: plugin.signature_org.clone(),
            class: plugin.class,
            unsigned_override: plugin.class == PluginClass::External
                && plugin.signature == SignatureStatus::Unsigned,
        }
    }
}

/// A plugin the gate refused
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RejectedPlugin {
    #[serde(flatten)]
    pub error: SignatureError,
    pub code: &'static str,
    pub message: String,
    pub hint: String,
}

impl From<SignatureError> for RejectedPlugin {
    fn from(error: SignatureError) -> Self {
        Self {
            code: error.error_code(),
            message: error.to_string(),
            hint: error.user_hint().to_string(),
            error,
        }
    }
}

/// Outcome of running the gate over one plugin tree
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GateReport {
    pub allowed: Vec<AllowedPlugin>,
    pub rejected: Vec<RejectedPlugin>,
}

impl GateReport {
    /// No plugin was rejected
    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty()
    }

    pub fn total(&self) -> usize {
        self.allowed.len() + self.rejected.len()
    }

    pub fn unsigned_overrides(&self) -> usize {
        self.allowed.iter().filter(|p| p.unsigned_override).count()
    }

    pub fn is_allowed(&self, plugin_id: &str) -> bool {
        self.allowed.iter().any(|p| p.id == plugin_id)
    }

    pub fn rejection(&self, plugin_id: &str) -> Option<&SignatureError> {
        self.rejected
            .iter()
            .map(|r| &r.error)
            .find(|e| e.plugin_id == plugin_id)
    }

    /// One-line summary, e.g. "3 plugins checked: 2 allowed (1 unsigned), 1 rejected"
    pub fn summary(&self) -> String {
        format!(
            "{} plugins checked: {} allowed ({} unsigned), {} rejected",
            self.total(),
            self.allowed.len(),
            self.unsigned_overrides(),
            self.rejected.len()
        )
    }
}

/// Signature gate in front of the plugin loader
#[derive(Debug)]
pub struct LoadGate {
    validator: SignatureValidator,
}

impl LoadGate {
    /// Build the gate from configuration and an optional unsigned override
    pub fn new(config: &Config, condition: Option<UnsignedPluginCondition>) -> Self {
        Self::from_validator(SignatureValidator::new(config.signature_policy(), condition))
    }

    pub fn from_validator(validator: SignatureValidator) -> Self {
        Self { validator }
    }

    pub fn validator(&self) -> &SignatureValidator {
        &self.validator
    }

    /// Validate every plugin in `tree`, parents first
    ///
    /// Nested plugins that inherit a signature keep it in `tree` afterwards.
    pub fn evaluate(&self, tree: &mut PluginTree) -> GateReport {
        let policy = self.validator.policy();
        tracing::info!(
            plugins = tree.len(),
            env = %policy.env,
            allow_listed = policy.allow_unsigned.len(),
            custom_condition = self.validator.has_unsigned_condition(),
            "Validating plugin signatures"
        );

        let mut report = GateReport::default();
        for (index, result) in tree.validate_all(&self.validator) {
            match result {
                Ok(()) => {
                    if let Some(plugin) = tree.get(index) {
                        report.allowed.push(AllowedPlugin::from_plugin(plugin));
                    }
                }
                Err(error) => {
                    tracing::error!(
                        plugin_id = %error.plugin_id,
                        code = error.error_code(),
                        "Plugin rejected: {}",
                        error
                    );
                    report.rejected.push(RejectedPlugin::from(error));
                }
            }
        }

        tracing::info!("{}", report.summary());
        report
    }
}
