//! Intervention gate.

use mentor_types::{MisconceptionCode, SimulationSnapshot};

/// True iff a misconception was detected.
#[must_use]
pub fn decide(classification: Option<&MisconceptionCode>) -> bool {
    classification.is_some()
}

/// Additional policy applied after [`decide`] accepts a classification.
///
/// Rate limiting or per-student cooldowns belong behind this trait; the
/// classifier never needs to know about them.
pub trait GatePolicy: Send + Sync {
    fn allow(&self, code: &MisconceptionCode, snapshot: &SimulationSnapshot) -> bool;
}

/// Allows every detected misconception through.
#[derive(Debug, Clone, Copy, Default)]
pub struct PresenceGate;

impl GatePolicy for PresenceGate {
    fn allow(&self, _code: &MisconceptionCode, _snapshot: &SimulationSnapshot) -> bool {
        true
    }
}
