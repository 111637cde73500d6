//! Error types and handling
//!
//! This module provides the error types used throughout PluginGate.
//!
//! [`SignatureError`] is the rejection produced by the signature gate: its
//! presence means "do not load this plugin". [`EngineError`] covers the
//! failures around the gate (configuration, discovery input, tree
//! construction). Both implement [`GateErrorExt`] which provides
//! operator-facing hints and tells whether retrying can help.

use crate::types::SignatureStatus;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Trait for PluginGate error extensions
///
/// Hints are safe to show to an operator and never contain file contents
/// or signing material.
pub trait GateErrorExt {
    /// Returns a user-friendly hint for the error
    fn user_hint(&self) -> &str;

    /// Returns whether the error is recoverable
    ///
    /// Signature rejections are deterministic for the same inputs and are
    /// never recoverable without administrator action.
    fn is_recoverable(&self) -> bool;
}

/// Rejection of a plugin by the signature gate
///
/// `status` is `None` when the plugin carried a signature state the policy
/// does not recognize.
///
/// # Examples
///
/// ```
/// use sdk::errors::SignatureError;
/// use sdk::types::SignatureStatus;
///
/// let err = SignatureError::new("acme-panel", Some(SignatureStatus::Unsigned));
/// assert_eq!(err.to_string(), "plugin 'acme-panel' has no signature");
/// assert_eq!(err.error_code(), "signatureMissing");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
pub struct SignatureError {
    /// Identifier of the rejected plugin
    pub plugin_id: String,
    /// Status that caused the rejection
    pub status: Option<SignatureStatus>,
}

impl SignatureError {
    pub fn new(plugin_id: impl Into<String>, status: Option<SignatureStatus>) -> Self {
        Self {
            plugin_id: plugin_id.into(),
            status,
        }
    }

    /// Stable machine-readable code for the rejection
    pub fn error_code(&self) -> &'static str {
        match self.status {
            Some(SignatureStatus::Invalid) => "signatureInvalid",
            Some(SignatureStatus::Modified) => "signatureModified",
            Some(SignatureStatus::Unsigned) => "signatureMissing",
            _ => "signatureUnknown",
        }
    }
}

impl fmt::Display for SignatureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Some(SignatureStatus::Invalid) => {
                write!(f, "plugin '{}' has an invalid signature", self.plugin_id)
            }
            Some(SignatureStatus::Modified) => {
                write!(f, "plugin '{}' has a modified signature", self.plugin_id)
            }
            Some(SignatureStatus::Unsigned) => {
                write!(f, "plugin '{}' has no signature", self.plugin_id)
            }
            _ => write!(
                f,
                "plugin '{}' has an unknown signature state",
                self.plugin_id
            ),
        }
    }
}

impl GateErrorExt for SignatureError {
    fn user_hint(&self) -> &str {
        match self.status {
            Some(SignatureStatus::Unsigned) => {
                "Sign the plugin or add its ID to allow_loading_unsigned_plugins"
            }
            Some(SignatureStatus::Modified) => {
                "Plugin files changed after signing. Reinstall the plugin"
            }
            Some(SignatureStatus::Invalid) => {
                "Plugin signature does not verify. Reinstall from a trusted source"
            }
            _ => "Plugin signature state is not recognized. Contact the plugin author",
        }
    }

    fn is_recoverable(&self) -> bool {
        false
    }
}

/// Main engine error type
#[derive(Debug, Error)]
pub enum EngineError {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    // Discovery snapshot errors
    #[error("Discovery error: {0}")]
    Discovery(String),

    // Plugin tree errors
    #[error("Unknown parent plugin: {0}")]
    UnknownParent(String),

    #[error("Duplicate plugin ID: {0}")]
    DuplicatePlugin(String),

    // Signature gate rejection
    #[error(transparent)]
    Signature(#[from] SignatureError),

    // Generic IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl GateErrorExt for EngineError {
    fn user_hint(&self) -> &str {
        match self {
            Self::Config(_) => "Check your config.toml file for errors",
            Self::Discovery(_) => "Discovery snapshot is malformed. Re-run plugin discovery",
            Self::UnknownParent(_) => "Nested plugin references a parent that was not discovered",
            Self::DuplicatePlugin(_) => "Two plugins share the same ID. Remove one of them",
            Self::Signature(err) => err.user_hint(),
            Self::Io(_) => "File system operation failed",
        }
    }

    fn is_recoverable(&self) -> bool {
        match self {
            Self::Signature(err) => err.is_recoverable(),
            Self::Io(_) => true,
            _ => false,
        }
    }
}
