//! Pedagogical trip-wire values for the built-in experiment families.
//!
//! These are tuning values, not physical constants. Every field can be
//! overridden from the config file; omitted fields keep their default.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    pub circuit: CircuitThresholds,
    pub titration: TitrationThresholds,
    pub enzyme: EnzymeThresholds,
}

/// ```toml
/// [thresholds.circuit]
/// current_limit = 0.04
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CircuitThresholds {
    /// Current magnitude (A) above which the student is warned.
    pub current_limit: f64,
}

impl Default for CircuitThresholds {
    fn default() -> Self {
        Self { current_limit: 0.04 }
    }
}

/// ```toml
/// [thresholds.titration]
/// ph_limit = 7.5
/// volume_floor = 20.0
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TitrationThresholds {
    pub ph_limit: f64,
    /// Titrant volume below which a high pH means base was added too quickly.
    pub volume_floor: f64,
}

impl Default for TitrationThresholds {
    fn default() -> Self {
        Self {
            ph_limit: 7.5,
            volume_floor: 20.0,
        }
    }
}

/// ```toml
/// [thresholds.enzyme]
/// temperature_limit = 55.0
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnzymeThresholds {
    pub temperature_limit: f64,
}

impl Default for EnzymeThresholds {
    fn default() -> Self {
        Self {
            temperature_limit: 55.0,
        }
    }
}
