//! Signature policy — environment mode and the unsigned allow-list

use serde::{de, Deserialize, Deserializer, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Deployment environment of the host
///
/// Only [`Environment::Development`] relaxes the signature policy.
/// Serialized in lowercase; deserialization accepts whatever
/// [`Environment::parse`] accepts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    #[default]
    Production,
    Test,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
            Self::Test => "test",
        }
    }

    /// Parse an environment name, case-insensitively
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Some(Self::Development),
            "production" | "prod" => Some(Self::Production),
            "test" => Some(Self::Test),
            _ => None,
        }
    }
}

impl<'de> Deserialize<'de> for Environment {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Self::parse(&value).ok_or_else(|| {
            de::Error::custom(format!(
                "unknown environment '{}', expected one of: development, production, test",
                value
            ))
        })
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Static policy consulted for unsigned plugins
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignaturePolicy {
    /// Environment the host runs in
    pub env: Environment,
    /// Plugin IDs an administrator allowed to run unsigned
    pub allow_unsigned: BTreeSet<String>,
}

impl SignaturePolicy {
    pub fn new<I, S>(env: Environment, allow_unsigned: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            env,
            allow_unsigned: allow_unsigned.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_development(&self) -> bool {
        self.env == Environment::Development
    }

    pub fn is_allow_listed(&self, plugin_id: &str) -> bool {
        self.allow_unsigned.contains(plugin_id)
    }
}
