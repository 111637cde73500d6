//! Discovery snapshot ingestion
//!
//! Plugin discovery runs outside PluginGate and hands over its result as a
//! JSON snapshot: every discovered plugin with its computed signature state,
//! nested plugins listed under their parent's `children`.
//!
//! ```json
//! {
//!   "plugins": [
//!     {
//!       "id": "acme-app",
//!       "dir": "/var/lib/plugins/acme-app",
//!       "signature": "valid",
//!       "signature_type": "commercial",
//!       "signature_org": "Acme Corp",
//!       "children": [
//!         { "id": "acme-panel", "signature": "unsigned" }
//!       ]
//!     }
//!   ]
//! }
//! ```
//!
//! A plugin without a `signature` field is treated as unrecognized and will
//! be rejected by the gate.

use plugin_signature::PluginTree;
use sdk::errors::EngineError;
use sdk::types::{Plugin, PluginClass, PluginIndex, SignatureStatus, SignatureType};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Result of a discovery run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiscoverySnapshot {
    #[serde(default)]
    pub plugins: Vec<PluginSnapshot>,
}

/// One discovered plugin and the plugins nested inside it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PluginSnapshot {
    pub id: String,
    #[serde(default)]
    pub dir: PathBuf,
    #[serde(default = "missing_signature")]
    pub signature: SignatureStatus,
    #[serde(default)]
    pub signature_type: Option<SignatureType>,
    #[serde(default)]
    pub signature_org: String,
    #[serde(default)]
    pub class: PluginClass,
    #[serde(default)]
    pub children: Vec<PluginSnapshot>,
}

fn missing_signature() -> SignatureStatus {
    SignatureStatus::Unrecognized
}

impl PluginSnapshot {
    fn to_plugin(&self) -> Plugin {
        let mut plugin = Plugin::new(&self.id, self.signature)
            .with_class(self.class)
            .with_dir(&self.dir)
            .with_signature_org(&self.signature_org);
        plugin.signature_type = self.signature_type;
        plugin
    }
}

/// Parse a snapshot from JSON text
pub fn parse_snapshot(json: &str) -> Result<DiscoverySnapshot, EngineError> {
    serde_json::from_str(json)
        .map_err(|e| EngineError::Discovery(format!("Failed to parse snapshot: {}", e)))
}

/// Read and parse a snapshot file
pub fn load_snapshot(path: &Path) -> Result<DiscoverySnapshot, EngineError> {
    let contents = fs::read_to_string(path).map_err(|e| {
        EngineError::Discovery(format!(
            "Failed to read snapshot {}: {}",
            path.display(),
            e
        ))
    })?;
    parse_snapshot(&contents)
}

/// Flatten a snapshot into a [`PluginTree`], parents before children
///
/// # Errors
///
/// Returns `EngineError::Discovery` for an empty plugin ID and
/// `EngineError::DuplicatePlugin` when two plugins share an ID.
pub fn build_tree(snapshot: &DiscoverySnapshot) -> Result<PluginTree, EngineError> {
    let mut tree = PluginTree::new();
    for root in &snapshot.plugins {
        insert_subtree(&mut tree, None, root)?;
    }
    tracing::debug!(plugins = tree.len(), "Built plugin tree from snapshot");
    Ok(tree)
}

fn insert_subtree(
    tree: &mut PluginTree,
    parent: Option<PluginIndex>,
    node: &PluginSnapshot,
) -> Result<(), EngineError> {
    if node.id.trim().is_empty() {
        return Err(EngineError::Discovery(
            "Plugin with empty ID in snapshot".to_string(),
        ));
    }

    let plugin = node.to_plugin();
    let index = match parent {
        Some(parent) => tree.insert_child(parent, plugin)?,
        None => tree.insert_root(plugin)?,
    };

    for child in &node.children {
        insert_subtree(tree, Some(index), child)?;
    }
    Ok(())
}
