use crate::generator::GuidanceGenerator;
use crate::prompt::{ask_ai_prompt, danger_hint_prompt, failure_hint_prompt};
use crate::templates::{NEUTRAL_DEFAULT, ask_ai_hint, danger_hint, failure_hint};
use mentor_types::{CompletionRequest, HintRequest, HintResponse, HintTrigger};

const HINT_LEVEL: u8 = 1;
const HINT_MAX_TOKENS: u32 = 150;
const ASK_AI_MAX_TOKENS: u32 = 200;

/// A single Socratic hint for `request`. Never fails.
pub async fn hint(generator: &GuidanceGenerator, request: &HintRequest) -> HintResponse {
    let message = match request.trigger {
        HintTrigger::Failure => failure(generator, request).await,
        HintTrigger::DangerZone => {
            let prompt = danger_hint_prompt(request);
            generated(generator, &prompt, HINT_MAX_TOKENS, "danger_zone")
                .await
                .unwrap_or_else(|| danger_hint(&request.simulation).to_string())
        }
        HintTrigger::AskAi => {
            let prompt = ask_ai_prompt(request);
            generated(generator, &prompt, ASK_AI_MAX_TOKENS, "ask_ai")
                .await
                .unwrap_or_else(|| ask_ai_hint(&request.simulation).to_string())
        }
        HintTrigger::Unknown => NEUTRAL_DEFAULT.as_str().to_string(),
    };

    HintResponse {
        message,
        trigger: request.trigger,
        level: HINT_LEVEL,
    }
}

async fn failure(generator: &GuidanceGenerator, request: &HintRequest) -> String {
    let Some(name) = request
        .failure_name
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty())
    else {
        return NEUTRAL_DEFAULT.as_str().to_string();
    };

    let prompt = failure_hint_prompt(request, name);
    generated(generator, &prompt, HINT_MAX_TOKENS, "failure")
        .await
        .unwrap_or_else(|| failure_hint(name))
}

async fn generated(
    generator: &GuidanceGenerator,
    prompt: &str,
    max_output_tokens: u32,
    purpose: &str,
) -> Option<String> {
    let request = CompletionRequest::new("", prompt)
        .with_max_output_tokens(max_output_tokens)
        .with_temperature(generator.temperature());
    generator.complete_or_log(request, purpose).await
}
