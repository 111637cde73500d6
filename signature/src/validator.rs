//! Signature validation — decides whether a discovered plugin may load
//!
//! The decision runs in a fixed order:
//!
//! 1. A valid signature is accepted immediately.
//! 2. A nested plugin takes over its parent's signature, unless it is a
//!    core plugin or carries an internal signature. An inherited valid
//!    signature is accepted immediately.
//! 3. Core and bundled plugins are accepted whatever their status.
//! 4. Unsigned plugins go through the unsigned-allowance policy; invalid,
//!    modified and unrecognized states are rejected.
//!
//! Before any of this, the `parent` argument must agree with the plugin's
//! own parent link; a mismatch is rejected.
//!
//! Nested plugins must be validated after their parent, so the parent's
//! signature is final before it is copied. [`crate::PluginTree`] walks its
//! nodes in that order.

use sdk::errors::SignatureError;
use sdk::types::{Plugin, SignatureStatus};
use std::fmt;
use tracing::{debug, warn};

use crate::policy::SignaturePolicy;

/// Caller-supplied override for the unsigned-allowance policy
///
/// When configured, its answer replaces the environment and allow-list
/// checks entirely. Validation only runs when plugins start, so plugins that
/// are already running are not stopped if the answer later changes.
pub type UnsignedPluginCondition = Box<dyn Fn(&Plugin) -> bool + Send + Sync>;

/// Signature gate for discovered plugins
///
/// Holds only immutable configuration and can be shared between threads.
///
/// # Examples
///
/// ```
/// use plugin_signature::{Environment, SignaturePolicy, SignatureValidator};
/// use sdk::types::{Plugin, SignatureStatus};
///
/// let policy = SignaturePolicy::new(Environment::Production, ["p1"]);
/// let validator = SignatureValidator::new(policy, None);
///
/// let mut plugin = Plugin::new("p1", SignatureStatus::Unsigned);
/// assert!(validator.validate(&mut plugin, None).is_ok());
///
/// let mut other = Plugin::new("p2", SignatureStatus::Unsigned);
/// let err = validator.validate(&mut other, None).unwrap_err();
/// assert_eq!(err.status, Some(SignatureStatus::Unsigned));
/// ```
pub struct SignatureValidator {
    policy: SignaturePolicy,
    allow_unsigned_condition: Option<UnsignedPluginCondition>,
}

impl SignatureValidator {
    pub fn new(policy: SignaturePolicy, condition: Option<UnsignedPluginCondition>) -> Self {
        Self {
            policy,
            allow_unsigned_condition: condition,
        }
    }

    pub fn policy(&self) -> &SignaturePolicy {
        &self.policy
    }

    pub fn has_unsigned_condition(&self) -> bool {
        self.allow_unsigned_condition.is_some()
    }

    /// Validate `plugin`, returning `Ok(())` when it may load
    ///
    /// `parent` is the plugin that `plugin.parent` points to, already
    /// validated. When the plugin inherits, its signature status, type and
    /// org are overwritten with the parent's and stay that way for every
    /// later reader.
    ///
    /// # Errors
    ///
    /// Returns a [`SignatureError`] carrying the plugin ID and the offending
    /// status. The status is `None` for states this policy does not
    /// recognize, and when `parent` disagrees with `plugin.parent`.
    pub fn validate(
        &self,
        plugin: &mut Plugin,
        parent: Option<&Plugin>,
    ) -> Result<(), SignatureError> {
        if plugin.has_parent() != parent.is_some() {
            debug!(
                plugin_id = %plugin.id,
                has_parent_link = plugin.has_parent(),
                parent_given = parent.is_some(),
                "Parent does not match the plugin's parent link"
            );
            return Err(SignatureError::new(&plugin.id, None));
        }

        if plugin.signature == SignatureStatus::Valid {
            debug!(plugin_id = %plugin.id, "Plugin has valid signature");
            return Ok(());
        }

        if let Some(parent) = parent {
            if plugin.is_core() || plugin.signature == SignatureStatus::Internal {
                debug!(
                    plugin_id = %plugin.id,
                    signature = %plugin.signature,
                    is_core = plugin.is_core(),
                    "Not setting descendant plugin's signature to that of root since it's core or internal"
                );
            } else {
                debug!(
                    plugin_id = %plugin.id,
                    root = %parent.id,
                    signature = %plugin.signature,
                    root_signature = %parent.signature,
                    "Setting descendant plugin's signature to that of root"
                );
                plugin.inherit_signature(parent);
                if plugin.signature == SignatureStatus::Valid {
                    debug!(plugin_id = %plugin.id, "Plugin has valid signature (inherited from root)");
                    return Ok(());
                }
            }
        }

        if plugin.is_core() || plugin.is_bundled() {
            return Ok(());
        }

        match plugin.signature {
            SignatureStatus::Unsigned => {
                if !self.allow_unsigned(plugin) {
                    debug!(plugin_id = %plugin.id, "Plugin is unsigned");
                    return Err(SignatureError::new(
                        &plugin.id,
                        Some(SignatureStatus::Unsigned),
                    ));
                }
                warn!(
                    plugin_id = %plugin.id,
                    plugin_dir = %plugin.dir.display(),
                    "Running an unsigned plugin"
                );
                Ok(())
            }
            SignatureStatus::Invalid => {
                debug!(plugin_id = %plugin.id, "Plugin has an invalid signature");
                Err(SignatureError::new(&plugin.id, Some(SignatureStatus::Invalid)))
            }
            SignatureStatus::Modified => {
                debug!(plugin_id = %plugin.id, "Plugin has a modified signature");
                Err(SignatureError::new(&plugin.id, Some(SignatureStatus::Modified)))
            }
            _ => {
                debug!(
                    plugin_id = %plugin.id,
                    signature = %plugin.signature,
                    "Plugin has an unrecognized plugin signature state"
                );
                Err(SignatureError::new(&plugin.id, None))
            }
        }
    }

    /// Whether an unsigned plugin may run anyway
    pub fn allow_unsigned(&self, plugin: &Plugin) -> bool {
        if let Some(condition) = &self.allow_unsigned_condition {
            return condition(plugin);
        }

        if self.policy.is_development() {
            return true;
        }

        self.policy.is_allow_listed(&plugin.id)
    }
}

impl fmt::Debug for SignatureValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignatureValidator")
            .field("policy", &self.policy)
            .field("has_unsigned_condition", &self.has_unsigned_condition())
            .finish()
    }
}
