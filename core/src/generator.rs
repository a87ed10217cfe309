//! Guidance generation over an optional text-generation capability.
//!
//! The capability is injected once by the composition root. When it is
//! absent no network attempt is made. Every failure is logged at `warn` and
//! reported to callers as an empty result or a [`GenerationError`].

use crate::prompt::{SOCRATIC_DIRECTIVE, intervention_payload};
use mentor_providers::{TextGen, TextGenError};
use mentor_types::{CompletionRequest, MisconceptionCode, SimulationSnapshot};
use std::sync::Arc;
use std::time::Duration;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("text generation is not configured")]
    Unavailable,
    #[error("text generation timed out after {0:?}")]
    TimedOut(Duration),
    #[error(transparent)]
    Provider(#[from] TextGenError),
}

#[derive(Clone)]
pub struct GuidanceGenerator {
    textgen: Option<Arc<dyn TextGen>>,
    timeout: Duration,
    max_output_tokens: u32,
    temperature: f64,
}

impl std::fmt::Debug for GuidanceGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GuidanceGenerator")
            .field("provider", &self.textgen.as_ref().map(|t| t.name()))
            .field("timeout", &self.timeout)
            .field("max_output_tokens", &self.max_output_tokens)
            .field("temperature", &self.temperature)
            .finish()
    }
}

impl GuidanceGenerator {
    #[must_use]
    pub fn new(textgen: Option<Arc<dyn TextGen>>) -> Self {
        Self {
            textgen,
            timeout: DEFAULT_TIMEOUT,
            max_output_tokens: CompletionRequest::DEFAULT_MAX_OUTPUT_TOKENS,
            temperature: CompletionRequest::DEFAULT_TEMPERATURE,
        }
    }

    /// A generator with no capability; every call falls back immediately.
    #[must_use]
    pub fn offline() -> Self {
        Self::new(None)
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sampling limits for intervention questions.
    #[must_use]
    pub fn with_sampling(mut self, max_output_tokens: u32, temperature: f64) -> Self {
        self.max_output_tokens = max_output_tokens;
        self.temperature = temperature;
        self
    }

    #[must_use]
    pub fn is_available(&self) -> bool {
        self.textgen.is_some()
    }

    #[must_use]
    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    /// A Socratic question for `code`, or `""` when generation fails.
    pub async fn generate(&self, snapshot: &SimulationSnapshot, code: &MisconceptionCode) -> String {
        let payload = intervention_payload(snapshot, code);
        let request = CompletionRequest::new(SOCRATIC_DIRECTIVE.as_str(), &payload)
            .with_max_output_tokens(self.max_output_tokens)
            .with_temperature(self.temperature);
        self.complete_or_log(request, code.as_str())
            .await
            .unwrap_or_default()
    }

    /// One attempt, bounded by the configured timeout. Logs failures.
    pub(crate) async fn complete_or_log(
        &self,
        request: CompletionRequest<'_>,
        purpose: &str,
    ) -> Option<String> {
        match self.try_complete(request).await {
            Ok(text) => Some(text),
            Err(GenerationError::Unavailable) => {
                tracing::debug!(purpose, "Text generation unavailable; using fallback");
                None
            }
            Err(error) => {
                tracing::warn!(%error, purpose, "Text generation failed; using fallback");
                None
            }
        }
    }

    pub(crate) async fn try_complete(
        &self,
        request: CompletionRequest<'_>,
    ) -> Result<String, GenerationError> {
        let Some(textgen) = self.textgen.as_ref() else {
            return Err(GenerationError::Unavailable);
        };

        let Ok(outcome) = tokio::time::timeout(self.timeout, textgen.complete(request)).await
        else {
            return Err(GenerationError::TimedOut(self.timeout));
        };

        let text = outcome?;
        let text = text.trim();
        if text.is_empty() {
            return Err(TextGenError::EmptyResponse.into());
        }
        Ok(text.to_string())
    }
}
