use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// Symbolic tag naming a student misunderstanding inferred from telemetry.
///
/// The set is open: rule sets for new experiment families bring their own
/// codes. The well-known codes are associated constants.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MisconceptionCode(Cow<'static, str>);

impl MisconceptionCode {
    pub const APPROACHING_OVERLOAD: Self = Self::from_static("approaching_overload");
    pub const OVERLOAD_TRIGGERED: Self = Self::from_static("overload_triggered");
    pub const ADDED_TOO_FAST: Self = Self::from_static("added_too_fast");
    pub const ENDPOINT_MISSED: Self = Self::from_static("endpoint_missed");
    pub const APPROACHING_DENATURATION: Self = Self::from_static("approaching_denaturation");
    pub const DENATURATION_TRIGGERED: Self = Self::from_static("denaturation_triggered");

    #[must_use]
    pub const fn from_static(code: &'static str) -> Self {
        Self(Cow::Borrowed(code))
    }

    #[must_use]
    pub fn new(code: impl Into<Cow<'static, str>>) -> Self {
        Self(code.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for MisconceptionCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Terminal output of one pipeline run.
///
/// Fields are private so that `triggered == misconception.is_some()` holds by
/// construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InterventionResult {
    message: String,
    triggered: bool,
    misconception: Option<MisconceptionCode>,
}

impl InterventionResult {
    /// No misconception detected; nothing to say.
    #[must_use]
    pub fn none() -> Self {
        Self {
            message: String::new(),
            triggered: false,
            misconception: None,
        }
    }

    /// Intervention for `code`. `message` may be empty when generation failed.
    #[must_use]
    pub fn intervene(code: MisconceptionCode, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            triggered: true,
            misconception: Some(code),
        }
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    #[must_use]
    pub const fn triggered(&self) -> bool {
        self.triggered
    }

    #[must_use]
    pub fn misconception(&self) -> Option<&MisconceptionCode> {
        self.misconception.as_ref()
    }

    /// Replace a blank message with `default`. Non-blank messages are kept.
    #[must_use]
    pub fn or_message(mut self, default: impl FnOnce(Option<&MisconceptionCode>) -> String) -> Self {
        if self.message.trim().is_empty() {
            self.message = default(self.misconception.as_ref());
        }
        self
    }
}
