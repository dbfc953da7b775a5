//! Candidate decision payloads
//!
//! A payload is the raw field map a decisioning backend hands back before it
//! has been validated. Backends speak slightly different dialects, so the
//! router normalizes payloads before validating them.

use crate::error::{CoreError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Legacy field names accepted from older backends, as (legacy, canonical)
const LEGACY_ALIASES: [(&str, &str); 4] = [
    ("status", "decision"),
    ("amount", "approved_amount"),
    ("rate", "interest_rate"),
    ("reason", "reasoning"),
];

/// Unvalidated decision fields returned by a backend
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DecisionPayload(Map<String, Value>);

impl DecisionPayload {
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Wrap a JSON value; anything other than an object is refused
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(fields) => Ok(Self(fields)),
            other => Err(CoreError::NotAnObject(json_type_name(&other).to_string())),
        }
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.0.get(field).and_then(Value::as_str)
    }

    pub fn get_f64(&self, field: &str) -> Option<f64> {
        self.0.get(field).and_then(Value::as_f64)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(field.into(), value.into());
    }

    /// Builder-style insert
    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(field, value);
        self
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }

    /// Map legacy field names onto canonical ones and canonicalize the
    /// decision string.
    ///
    /// A legacy key only fills in a canonical key that is absent; it never
    /// overwrites one the backend already set.
    pub fn normalize(mut self) -> Self {
        for (legacy, canonical) in LEGACY_ALIASES {
            if self.0.contains_key(canonical) {
                continue;
            }
            if let Some(value) = self.0.remove(legacy) {
                self.0.insert(canonical.to_string(), value);
            }
        }

        if let Some(Value::String(decision)) = self.0.get_mut("decision") {
            *decision = decision.trim().to_lowercase();
        }

        self
    }
}

impl From<Map<String, Value>> for DecisionPayload {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}

/// Name of a JSON value's type, for diagnostics
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
