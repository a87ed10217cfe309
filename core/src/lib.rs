//! Core tutoring logic for the lab mentor.
//!
//! The intervention pipeline (classifier, gate, generator, orchestrator) and
//! the tutoring operations built on the same generator: hints, lab reports
//! and challenges. Nothing here reads configuration or credentials; the
//! composition root hands in a [`GuidanceGenerator`] and a [`Classifier`].

pub mod challenge;
pub mod classifier;
pub mod gate;
pub mod generator;
pub mod hints;
pub mod pipeline;
pub mod prompt;
pub mod report;
pub mod templates;

pub use challenge::ChallengeError;
pub use classifier::{Classifier, Comparison, Measure, Rule, RuleSet, Threshold};
pub use gate::{GatePolicy, PresenceGate, decide};
pub use generator::{GenerationError, GuidanceGenerator};
pub use pipeline::{Pipeline, Stage};
pub use templates::{NEUTRAL_DEFAULT, render_intervention};

use mentor_types::{
    Challenge, ChallengeRequest, HintRequest, HintResponse, InterventionResult, ModelName,
    ReportRequest, ReportResponse, SimulationSnapshot,
};
use serde::Serialize;

/// Facade over the pipeline and the tutoring operations.
#[derive(Debug)]
pub struct Mentor {
    pipeline: Pipeline,
}

impl Mentor {
    #[must_use]
    pub fn new(classifier: Classifier, generator: GuidanceGenerator) -> Self {
        Self {
            pipeline: Pipeline::new(classifier, generator),
        }
    }

    #[must_use]
    pub fn with_gate(mut self, gate: impl GatePolicy + 'static) -> Self {
        self.pipeline = self.pipeline.with_gate(gate);
        self
    }

    #[must_use]
    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    fn generator(&self) -> &GuidanceGenerator {
        self.pipeline.generator()
    }

    /// Raw pipeline output; `message` is empty when nothing was generated.
    pub async fn evaluate(&self, snapshot: &SimulationSnapshot) -> InterventionResult {
        self.pipeline.evaluate(snapshot).await
    }

    /// Pipeline output with blank messages replaced by a template.
    pub async fn evaluate_for_display(&self, snapshot: &SimulationSnapshot) -> InterventionResult {
        self.evaluate(snapshot)
            .await
            .or_message(|code| render_intervention(code, snapshot))
    }

    pub async fn hint(&self, request: &HintRequest) -> HintResponse {
        hints::hint(self.generator(), request).await
    }

    pub async fn report(&self, request: &ReportRequest) -> ReportResponse {
        report::report(self.generator(), request).await
    }

    pub async fn challenge(&self, request: &ChallengeRequest) -> Result<Challenge, ChallengeError> {
        challenge::challenge(self.generator(), request).await
    }

    #[must_use]
    pub fn health(&self, model: &ModelName) -> Health {
        let textgen = if self.generator().is_available() {
            "connected"
        } else {
            "offline"
        };
        Health {
            status: "ok",
            textgen,
            model: model.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Health {
    pub status: &'static str,
    pub textgen: &'static str,
    pub model: String,
}
