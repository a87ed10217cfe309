//! Request/response types for the tutoring operations around the core
//! pipeline: hints, lab reports, viva questions, and challenges.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use thiserror::Error;

/// What prompted a hint request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HintTrigger {
    /// The simulation reported a terminal failure.
    Failure,
    /// Parameters have been sitting in a danger zone.
    DangerZone,
    /// The student explicitly asked for help.
    AskAi,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HintRequest {
    pub simulation: String,
    pub trigger: HintTrigger,
    #[serde(default)]
    pub failure_name: Option<String>,
    /// Current parameter values, e.g. `{"voltage": 24, "resistance": 10}`.
    #[serde(default)]
    pub context: Map<String, Value>,
    #[serde(default)]
    pub student_message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HintResponse {
    pub message: String,
    pub trigger: HintTrigger,
    pub level: u8,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ReportRequest {
    pub simulation: String,
    #[serde(default)]
    pub observations: Vec<Value>,
    #[serde(default)]
    pub failures: Vec<Value>,
    /// Seconds spent on the experiment.
    #[serde(default)]
    pub duration: u64,
    #[serde(default)]
    pub score: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportResponse {
    pub result: String,
    pub viva_questions: Vec<String>,
}

fn default_skill_level() -> String {
    "intermediate".to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ChallengeRequest {
    pub simulation: String,
    #[serde(default)]
    pub completed_challenges: Vec<String>,
    #[serde(default = "default_skill_level")]
    pub skill_level: String,
}

/// A generated lab challenge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Challenge {
    pub id: String,
    pub title: String,
    pub description: String,
    pub target_key: String,
    pub target_value: f64,
    /// May be empty for dimensionless targets such as pH.
    pub target_unit: String,
    /// Accepted deviation from the target, in percent.
    pub tolerance: f64,
    pub hint: String,
    pub proof: String,
    #[serde(default)]
    pub fixed_params: BTreeMap<String, f64>,
    /// Expression evaluated by the front end against the student's inputs.
    pub compute: String,
}

/// Structured model output that could not be accepted as-is.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseFailure {
    #[error("response is empty")]
    Empty,
    #[error("response is not a JSON document: {0}")]
    NotJson(String),
    #[error("response JSON has the wrong shape: {0}")]
    UnexpectedShape(String),
    #[error("field `{0}` must not be empty")]
    EmptyField(&'static str),
    #[error("field `{0}` must be a finite number")]
    NonFinite(&'static str),
    #[error("tolerance must be positive")]
    NonPositiveTolerance,
    #[error("expected at least {expected} items, found {found}")]
    TooFewItems { expected: usize, found: usize },
}

fn parse_json_document(text: &str) -> Result<Value, ParseFailure> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ParseFailure::Empty);
    }
    serde_json::from_str(trimmed).map_err(|e| ParseFailure::NotJson(e.to_string()))
}

impl Challenge {
    /// Parse a challenge from the complete model response.
    ///
    /// The whole response must be one JSON object with every field present.
    /// Markdown fences, prose around the object, or unknown fields are all
    /// rejected.
    pub fn parse_strict(text: &str) -> Result<Self, ParseFailure> {
        let value = parse_json_document(text)?;
        let challenge: Self = serde_json::from_value(value)
            .map_err(|e| ParseFailure::UnexpectedShape(e.to_string()))?;
        challenge.validate()?;
        Ok(challenge)
    }

    fn validate(&self) -> Result<(), ParseFailure> {
        let required = [
            ("id", &self.id),
            ("title", &self.title),
            ("description", &self.description),
            ("target_key", &self.target_key),
            ("hint", &self.hint),
            ("proof", &self.proof),
            ("compute", &self.compute),
        ];
        if let Some((field, _)) = required.iter().find(|(_, v)| v.trim().is_empty()) {
            return Err(ParseFailure::EmptyField(field));
        }
        if !self.target_value.is_finite() {
            return Err(ParseFailure::NonFinite("target_value"));
        }
        if !self.tolerance.is_finite() {
            return Err(ParseFailure::NonFinite("tolerance"));
        }
        if self.tolerance <= 0.0 {
            return Err(ParseFailure::NonPositiveTolerance);
        }
        if self.fixed_params.values().any(|v| !v.is_finite()) {
            return Err(ParseFailure::NonFinite("fixed_params"));
        }
        Ok(())
    }
}

/// Number of viva questions attached to a lab report.
pub const VIVA_QUESTION_COUNT: usize = 3;

/// Parse viva questions from the complete model response.
///
/// The response must be a JSON array of at least three non-blank strings;
/// the first three are kept.
pub fn parse_viva_questions(text: &str) -> Result<Vec<String>, ParseFailure> {
    let value = parse_json_document(text)?;
    let items: Vec<String> = serde_json::from_value(value)
        .map_err(|e| ParseFailure::UnexpectedShape(e.to_string()))?;
    let questions: Vec<String> = items
        .into_iter()
        .map(|q| q.trim().to_string())
        .filter(|q| !q.is_empty())
        .collect();
    if questions.len() < VIVA_QUESTION_COUNT {
        return Err(ParseFailure::TooFewItems {
            expected: VIVA_QUESTION_COUNT,
            found: questions.len(),
        });
    }
    Ok(questions.into_iter().take(VIVA_QUESTION_COUNT).collect())
}
