//! Lab report assembly: a result paragraph plus three viva questions.

use crate::generator::GuidanceGenerator;
use crate::prompt::{REPORT_DIRECTIVE, report_result_prompt, viva_prompt};
use crate::templates::{GENERIC_RESULT, result_template, viva_questions};
use mentor_types::{
    CompletionRequest, ReportRequest, ReportResponse, ResponseFormat, parse_viva_questions,
};

const RESULT_MAX_TOKENS: u32 = 200;
const VIVA_MAX_TOKENS: u32 = 300;

pub async fn report(generator: &GuidanceGenerator, request: &ReportRequest) -> ReportResponse {
    ReportResponse {
        result: result_paragraph(generator, request).await,
        viva_questions: viva(generator, request).await,
    }
}

async fn result_paragraph(generator: &GuidanceGenerator, request: &ReportRequest) -> String {
    let prompt = report_result_prompt(request);
    let completion = CompletionRequest::new(REPORT_DIRECTIVE.as_str(), &prompt)
        .with_max_output_tokens(RESULT_MAX_TOKENS)
        .with_temperature(generator.temperature());

    if let Some(text) = generator.complete_or_log(completion, "report").await {
        return text;
    }
    result_template(&request.simulation)
        .unwrap_or(GENERIC_RESULT.as_str())
        .to_string()
}

/// Exactly [`mentor_types::VIVA_QUESTION_COUNT`] questions, generated when possible.
async fn viva(generator: &GuidanceGenerator, request: &ReportRequest) -> Vec<String> {
    let prompt = viva_prompt(request);
    let completion = CompletionRequest::new(REPORT_DIRECTIVE.as_str(), &prompt)
        .with_max_output_tokens(VIVA_MAX_TOKENS)
        .with_temperature(generator.temperature())
        .with_format(ResponseFormat::Json);

    if let Some(text) = generator.complete_or_log(completion, "viva").await {
        match parse_viva_questions(&text) {
            Ok(questions) => return questions,
            Err(error) => {
                tracing::warn!(%error, "Discarding unusable viva questions");
            }
        }
    }

    Vec::from(viva_questions(&request.simulation).map(String::from))
}
