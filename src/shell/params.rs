use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::error::NavError;

/// Parameters a screen is navigated with.
///
/// A flat JSON object; descriptors pick their entity key fields out of it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScreenParams(Map<String, Value>);

impl ScreenParams {
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Builder-style insert
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Convert an arbitrary JSON value; only objects (or null, meaning empty) are accepted
    pub fn from_value(screen: &str, value: Value) -> Result<Self, NavError> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            Value::Null => Ok(Self::new()),
            _ => Err(NavError::InvalidParams {
                screen: screen.to_string(),
                field: "<params>".to_string(),
            }),
        }
    }

    /// Key-field rendering used for identities. Strings are escaped so they
    /// cannot contain the `:` separator; numbers and booleans carry a `#`
    /// prefix so `7` and `"7"` stay distinct. Missing, null and composite
    /// fields have no key.
    pub(crate) fn key_component(&self, field: &str) -> Option<String> {
        match self.0.get(field)? {
            Value::String(s) => Some(escape_key(s)),
            Value::Number(n) => Some(format!("#{}", n)),
            Value::Bool(b) => Some(format!("#{}", b)),
            Value::Null | Value::Array(_) | Value::Object(_) => None,
        }
    }

    /// Whether any of `fields` differs between the two parameter sets
    pub(crate) fn differs_on(&self, other: &ScreenParams, fields: &[String]) -> bool {
        fields.iter().any(|field| self.0.get(field) != other.0.get(field))
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }
}

impl From<Map<String, Value>> for ScreenParams {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

fn escape_key(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '%' => escaped.push_str("%25"),
            ':' => escaped.push_str("%3A"),
            '#' => escaped.push_str("%23"),
            c => escaped.push(c),
        }
    }
    escaped
}
