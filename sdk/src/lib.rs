//! PluginGate SDK
//!
//! Shared types for PluginGate components: the plugin descriptor handed over
//! by discovery and the error taxonomy of the signature gate.

/// Error types and handling
pub mod errors;

/// Plugin descriptor types
pub mod types;

// Re-export commonly used types
pub use errors::{EngineError, GateErrorExt, SignatureError};
pub use types::{Plugin, PluginClass, PluginIndex, SignatureStatus, SignatureType};
