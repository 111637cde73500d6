//! PluginGate signature gate
//!
//! This crate decides whether a discovered plugin is trusted enough to load.
//! It consumes signature states computed elsewhere and applies the loading
//! policy: nested plugins inherit their parent's signature, core and bundled
//! plugins are trusted, and unsigned plugins run only when the environment,
//! the allow-list or a caller-supplied condition permits it.

pub mod policy;
pub mod tree;
pub mod validator;

pub use policy::{Environment, SignaturePolicy};
pub use tree::{NodeOutcome, PluginTree};
pub use validator::{SignatureValidator, UnsignedPluginCondition};
