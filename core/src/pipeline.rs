//! The intervention pipeline: `Detect -> Decide -> (Generate | Done)`.
//!
//! Each run starts at [`Stage::Detect`] and ends at exactly one
//! [`Stage::Done`]. No state survives between runs, so one `Pipeline` may be
//! shared across concurrent evaluations.

use crate::classifier::Classifier;
use crate::gate::{GatePolicy, PresenceGate, decide};
use crate::generator::GuidanceGenerator;
use mentor_types::{InterventionResult, MisconceptionCode, SimulationSnapshot};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stage {
    Detect,
    Decide(Option<MisconceptionCode>),
    Generate(MisconceptionCode),
    Done(InterventionResult),
}

impl Stage {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Stage::Detect => "detect",
            Stage::Decide(_) => "decide",
            Stage::Generate(_) => "generate",
            Stage::Done(_) => "done",
        }
    }

    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Stage::Done(_))
    }
}

pub struct Pipeline {
    classifier: Classifier,
    gate: Box<dyn GatePolicy>,
    generator: GuidanceGenerator,
}

impl Pipeline {
    #[must_use]
    pub fn new(classifier: Classifier, generator: GuidanceGenerator) -> Self {
        Self {
            classifier,
            gate: Box::new(PresenceGate),
            generator,
        }
    }

    #[must_use]
    pub fn with_gate(mut self, gate: impl GatePolicy + 'static) -> Self {
        self.gate = Box::new(gate);
        self
    }

    #[must_use]
    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    #[must_use]
    pub fn generator(&self) -> &GuidanceGenerator {
        &self.generator
    }

    pub async fn evaluate(&self, snapshot: &SimulationSnapshot) -> InterventionResult {
        self.evaluate_with(snapshot, |_| {}).await
    }

    /// Runs the pipeline, reporting every stage entered to `observer`.
    pub async fn evaluate_with(
        &self,
        snapshot: &SimulationSnapshot,
        mut observer: impl FnMut(&Stage),
    ) -> InterventionResult {
        let mut stage = Stage::Detect;
        loop {
            observer(&stage);
            stage = match stage {
                Stage::Detect => Stage::Decide(self.classifier.classify(snapshot)),
                Stage::Decide(Some(code))
                    if decide(Some(&code)) && self.gate.allow(&code, snapshot) =>
                {
                    Stage::Generate(code)
                }
                Stage::Decide(_) => Stage::Done(InterventionResult::none()),
                Stage::Generate(code) => {
                    tracing::debug!(code = %code, "Generating intervention");
                    let message = self.generator.generate(snapshot, &code).await;
                    Stage::Done(InterventionResult::intervene(code, message))
                }
                Stage::Done(result) => return result,
            };
        }
    }
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("families", &self.classifier.tags())
            .field("generator", &self.generator)
            .finish_non_exhaustive()
    }
}
