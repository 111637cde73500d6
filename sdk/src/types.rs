//! Plugin descriptor types
//!
//! These types describe a plugin as handed over by discovery: its identity,
//! its classification, and the outcome of signature computation. The
//! signature fields are written by the signature step (outside this
//! workspace) and may be rewritten once by the validator when a nested
//! plugin inherits its parent's signature.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Outcome of signature verification for a plugin artifact
///
/// Any textual status that is not one of the known values deserializes to
/// [`SignatureStatus::Unrecognized`], which the validator always rejects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum SignatureStatus {
    /// Signature present and verified
    Valid,
    /// Signature present but does not verify
    Invalid,
    /// Files changed after signing
    Modified,
    /// No signature present
    Unsigned,
    /// Shipped inside the host binary, never signed
    Internal,
    /// Any status this policy does not know about
    #[serde(other)]
    Unrecognized,
}

impl SignatureStatus {
    /// Wire name of the status
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Valid => "valid",
            Self::Invalid => "invalid",
            Self::Modified => "modified",
            Self::Unsigned => "unsigned",
            Self::Internal => "internal",
            Self::Unrecognized => "unrecognized",
        }
    }
}

impl From<&str> for SignatureStatus {
    fn from(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "valid" => Self::Valid,
            "invalid" => Self::Invalid,
            "modified" => Self::Modified,
            "unsigned" => Self::Unsigned,
            "internal" => Self::Internal,
            _ => Self::Unrecognized,
        }
    }
}

impl fmt::Display for SignatureStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Who signed the plugin. Carried as metadata only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SignatureType {
    /// Signed by the host vendor
    #[serde(rename = "grafana")]
    Official,
    /// Signed by a commercial partner
    Commercial,
    /// Signed by a community author
    Community,
    /// Privately signed for a single deployment
    Private,
    /// Privately signed for a set of deployments matched by pattern
    PrivateGlob,
    #[serde(other)]
    Unknown,
}

impl fmt::Display for SignatureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Official => "grafana",
            Self::Commercial => "commercial",
            Self::Community => "community",
            Self::Private => "private",
            Self::PrivateGlob => "private-glob",
            Self::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

/// Where a plugin comes from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PluginClass {
    /// Part of the host application, trusted implicitly
    Core,
    /// Shipped alongside the host, trusted implicitly
    Bundled,
    /// Installed by an administrator or user
    #[default]
    External,
}

/// Position of a plugin inside the tree that owns it
///
/// Used as the parent link of nested plugins. The index never keeps the
/// parent alive; the tree owned by discovery does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PluginIndex(pub usize);

impl fmt::Display for PluginIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A discovered plugin, annotated with its signature state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plugin {
    /// Unique plugin identifier
    pub id: String,
    /// Plugin directory, for diagnostics only
    pub dir: PathBuf,
    /// Core, bundled or external
    pub class: PluginClass,
    /// Signature verification outcome
    pub signature: SignatureStatus,
    /// Signer tier
    pub signature_type: Option<SignatureType>,
    /// Signing organization
    pub signature_org: String,
    /// Weak link to the enclosing plugin, if nested
    pub parent: Option<PluginIndex>,
}

impl Plugin {
    /// Create an external, top-level plugin with the given signature status
    pub fn new(id: impl Into<String>, signature: SignatureStatus) -> Self {
        Self {
            id: id.into(),
            dir: PathBuf::new(),
            class: PluginClass::External,
            signature,
            signature_type: None,
            signature_org: String::new(),
            parent: None,
        }
    }

    pub fn with_class(mut self, class: PluginClass) -> Self {
        self.class = class;
        self
    }

    pub fn with_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.dir = dir.into();
        self
    }

    pub fn with_signature_type(mut self, signature_type: SignatureType) -> Self {
        self.signature_type = Some(signature_type);
        self
    }

    pub fn with_signature_org(mut self, org: impl Into<String>) -> Self {
        self.signature_org = org.into();
        self
    }

    pub fn is_core(&self) -> bool {
        self.class == PluginClass::Core
    }

    pub fn is_bundled(&self) -> bool {
        self.class == PluginClass::Bundled
    }

    pub fn has_parent(&self) -> bool {
        self.parent.is_some()
    }

    /// Copy signature status, type and org from `parent`
    pub fn inherit_signature(&mut self, parent: &Plugin) {
        self.signature = parent.signature;
        self.signature_type = parent.signature_type;
        self.signature_org.clone_from(&parent.signature_org);
    }
}
