use crate::generator::{GenerationError, GuidanceGenerator};
use crate::prompt::{CHALLENGE_DIRECTIVE, challenge_prompt};
use mentor_types::{Challenge, ChallengeRequest, CompletionRequest, ParseFailure, ResponseFormat};

const CHALLENGE_MAX_TOKENS: u32 = 400;

#[derive(Debug, thiserror::Error)]
pub enum ChallengeError {
    #[error("challenge generation failed: {0}")]
    Generation(#[from] GenerationError),
    #[error("challenge response rejected: {0}")]
    Parse(#[from] ParseFailure),
}

/// Generates a new challenge. There is no template fallback; callers decide
/// what to offer when this fails.
pub async fn challenge(
    generator: &GuidanceGenerator,
    request: &ChallengeRequest,
) -> Result<Challenge, ChallengeError> {
    let prompt = challenge_prompt(request);
    let completion = CompletionRequest::new(CHALLENGE_DIRECTIVE.as_str(), &prompt)
        .with_max_output_tokens(CHALLENGE_MAX_TOKENS)
        .with_temperature(generator.temperature())
        .with_format(ResponseFormat::Json);

    let text = generator.try_complete(completion).await?;
    let challenge = Challenge::parse_strict(&text).inspect_err(|error| {
        tracing::warn!(%error, simulation = %request.simulation, "Rejected generated challenge");
    })?;
    tracing::debug!(id = %challenge.id, "Generated challenge");
    Ok(challenge)
}
