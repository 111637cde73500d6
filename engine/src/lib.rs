//! PluginGate Engine Library
//!
//! This library wires the signature gate to its surroundings: configuration,
//! logging, discovery snapshots and the CLI. It is used by both the main
//! binary and integration tests.

/// Configuration management module
pub mod config;

/// Discovery snapshot ingestion
pub mod discovery;

/// Signature gate in front of the plugin loader
pub mod gate;

/// Telemetry and Observability
pub mod telemetry;

/// CLI interface module
pub mod cli;

/// Command handlers module
pub mod handlers;
