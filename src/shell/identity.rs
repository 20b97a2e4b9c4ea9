use serde::{Deserialize, Serialize};
use std::fmt;

/// Dedup and cache key of a screen: the screen name, plus `:<entity key>`
/// for entity-scoped screens.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScreenIdentity(String);

impl ScreenIdentity {
    pub fn singleton(name: &str) -> Self {
        Self(name.to_string())
    }

    pub fn entity(name: &str, key: &str) -> Self {
        Self(format!("{}:{}", name, key))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Screen name part of the identity
    pub fn screen_name(&self) -> &str {
        self.0.split_once(':').map(|(name, _)| name).unwrap_or(&self.0)
    }

    /// Entity key part, `None` for singletons
    pub fn entity_key(&self) -> Option<&str> {
        self.0.split_once(':').map(|(_, key)| key)
    }
}

impl fmt::Display for ScreenIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ScreenIdentity {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}
