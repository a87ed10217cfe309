//! Simulation telemetry as received from the lab front end.
//!
//! A snapshot is an open string-keyed mapping. New experiment types add new
//! keys without any schema change, so every accessor here is lenient: a
//! missing or mistyped field reads as `None` instead of an error.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Keys that may carry the experiment-family discriminator, in lookup order.
pub const DISCRIMINATOR_KEYS: &[&str] = &["experiment", "type", "activeLab", "simulation"];

const FAILURE_KEYS: &[&str] = &["failureState", "failure_state"];

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("simulation snapshot must be a JSON object (got {0})")]
    NotAnObject(&'static str),
    #[error("invalid snapshot JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Immutable view over one experiment's live parameters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SimulationSnapshot(Map<String, Value>);

impl SimulationSnapshot {
    #[must_use]
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    pub fn from_json(value: Value) -> Result<Self, SnapshotError> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(SnapshotError::NotAnObject(json_kind(&other))),
        }
    }

    pub fn parse(text: &str) -> Result<Self, SnapshotError> {
        let value: Value = serde_json::from_str(text)?;
        Self::from_json(value)
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    #[must_use]
    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Normalized (trimmed, lowercased) experiment-family tag.
    #[must_use]
    pub fn discriminator(&self) -> Option<String> {
        DISCRIMINATOR_KEYS.iter().find_map(|key| {
            self.0
                .get(*key)
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|tag| !tag.is_empty())
                .map(str::to_ascii_lowercase)
        })
    }

    /// Numeric field value. Numeric strings are accepted; non-finite values are not.
    #[must_use]
    pub fn number(&self, key: &str) -> Option<f64> {
        let value = match self.0.get(key)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }?;
        value.is_finite().then_some(value)
    }

    /// Terminal failure flag reported by the simulation, if any.
    ///
    /// Accepts either a bare string (`"OVERLOAD"`) or an object with a
    /// `name` field (`{"name": "OVERLOAD", "description": ...}`).
    #[must_use]
    pub fn failure_flag(&self) -> Option<&str> {
        FAILURE_KEYS.iter().find_map(|key| {
            let name = match self.0.get(*key)? {
                Value::String(s) => s.as_str(),
                Value::Object(obj) => obj.get("name")?.as_str()?,
                _ => return None,
            };
            let name = name.trim();
            (!name.is_empty()).then_some(name)
        })
    }

    /// Human-readable rendering of a scalar field for prompt and template text.
    #[must_use]
    pub fn display_value(&self, key: &str) -> Option<String> {
        match self.0.get(key)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            Value::Null | Value::Array(_) | Value::Object(_) => None,
        }
    }

    /// Compact JSON serialization of the whole snapshot.
    #[must_use]
    pub fn to_json_string(&self) -> String {
        Value::Object(self.0.clone()).to_string()
    }
}

impl TryFrom<Value> for SimulationSnapshot {
    type Error = SnapshotError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Self::from_json(value)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Experiment families the classifier ships rule sets for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExperimentFamily {
    Circuit,
    Titration,
    Enzyme,
}

impl ExperimentFamily {
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Circuit => "circuit",
            Self::Titration => "titration",
            Self::Enzyme => "enzyme",
        }
    }

    /// Case-insensitive lookup by canonical tag.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "circuit" => Some(Self::Circuit),
            "titration" => Some(Self::Titration),
            "enzyme" => Some(Self::Enzyme),
            _ => None,
        }
    }

    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Circuit, Self::Titration, Self::Enzyme]
    }
}

impl std::fmt::Display for ExperimentFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}
