//! Google Gemini API client.
//!
//! Communicates with `{base_url}/models/{model}:generateContent` using a
//! single non-streaming request per completion.

use crate::{
    GEMINI_API_BASE_URL, TextGen, TextGenError, http_client_with_timeout, read_capped_error_body,
};
use futures_util::FutureExt;
use futures_util::future::BoxFuture;
use mentor_types::{ApiKey, CompletionRequest, ModelName, ResponseFormat};
use serde_json::{Value, json};
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: ApiKey,
    model: ModelName,
    base_url: String,
    timeout: Duration,
}

impl GeminiClient {
    pub fn new(api_key: ApiKey, model: ModelName, timeout: Duration) -> Result<Self, TextGenError> {
        Ok(Self {
            http: http_client_with_timeout(GEMINI_API_BASE_URL, timeout)?,
            api_key,
            model,
            base_url: GEMINI_API_BASE_URL.to_string(),
            timeout,
        })
    }

    /// Point the client at a different API root (proxies, test servers).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Result<Self, TextGenError> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        self.http = http_client_with_timeout(&base_url, self.timeout)?;
        self.base_url = base_url;
        Ok(self)
    }

    #[must_use]
    pub fn model(&self) -> &ModelName {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }

    async fn generate(&self, request: CompletionRequest<'_>) -> Result<String, TextGenError> {
        let body = build_request_body(&request);

        tracing::debug!(
            model = %self.model,
            max_output_tokens = request.max_output_tokens,
            json = request.format == ResponseFormat::Json,
            "Sending Gemini generateContent request"
        );

        let response = self
            .http
            .post(self.endpoint())
            .header("x-goog-api-key", self.api_key.expose_secret())
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(TextGenError::from_reqwest)?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN
        {
            return Err(TextGenError::Auth {
                status: status.as_u16(),
            });
        }
        if !status.is_success() {
            let body = read_capped_error_body(response).await;
            return Err(TextGenError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await.map_err(TextGenError::from_reqwest)?;
        let parsed: typed::Response = serde_json::from_slice(&bytes)
            .map_err(|e| TextGenError::MalformedResponse(e.to_string()))?;
        extract_text(parsed)
    }
}

impl TextGen for GeminiClient {
    fn name(&self) -> &'static str {
        "gemini"
    }

    fn complete<'a>(
        &'a self,
        request: CompletionRequest<'a>,
    ) -> BoxFuture<'a, Result<String, TextGenError>> {
        self.generate(request).boxed()
    }
}

/// Build a content part for Gemini API.
fn text_part(text: &str) -> Value {
    json!({ "text": text })
}

pub(crate) fn build_request_body(request: &CompletionRequest<'_>) -> Value {
    let mut generation_config = json!({
        "maxOutputTokens": request.max_output_tokens,
        "temperature": request.temperature,
    });
    if request.format == ResponseFormat::Json {
        generation_config["responseMimeType"] = json!("application/json");
    }

    let mut body = json!({
        "contents": [{
            "role": "user",
            "parts": [text_part(request.user_content)]
        }],
        "generationConfig": generation_config,
    });

    if !request.system_instruction.trim().is_empty() {
        body["system_instruction"] = json!({
            "parts": [text_part(request.system_instruction)]
        });
    }

    body
}

fn extract_text(response: typed::Response) -> Result<String, TextGenError> {
    if let Some(error) = response.error {
        return Err(TextGenError::Api(error.message_or_default().to_string()));
    }

    if let Some(reason) = response
        .prompt_feedback
        .and_then(|feedback| feedback.block_reason)
    {
        return Err(TextGenError::Blocked(format!("prompt blocked: {reason}")));
    }

    let Some(candidate) = response
        .candidates
        .and_then(|candidates| candidates.into_iter().next())
    else {
        return Err(TextGenError::EmptyResponse);
    };

    if let Some(reason) = candidate.finish_reason.as_deref() {
        let reason = typed::FinishReason::parse(reason);
        if let Some(message) = reason.error_message() {
            return Err(TextGenError::Blocked(message.to_string()));
        }
    }

    let text: String = candidate
        .content
        .and_then(|content| content.parts)
        .unwrap_or_default()
        .into_iter()
        .filter(|part| !part.thought)
        .filter_map(|part| part.text)
        .collect();

    let text = text.trim();
    if text.is_empty() {
        return Err(TextGenError::EmptyResponse);
    }
    Ok(text.to_string())
}

mod typed {
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Response {
        pub candidates: Option<Vec<Candidate>>,
        pub error: Option<ErrorInfo>,
        pub prompt_feedback: Option<PromptFeedback>,
    }

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Candidate {
        pub content: Option<Content>,
        pub finish_reason: Option<String>,
    }

    #[derive(Debug, Deserialize)]
    pub struct Content {
        pub parts: Option<Vec<Part>>,
    }

    #[derive(Debug, Deserialize)]
    pub struct Part {
        pub text: Option<String>,
        #[serde(default)]
        pub thought: bool,
    }

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct PromptFeedback {
        pub block_reason: Option<String>,
    }

    #[derive(Debug, Deserialize)]
    pub struct ErrorInfo {
        pub message: Option<String>,
    }

    impl ErrorInfo {
        #[must_use]
        pub fn message_or_default(&self) -> &str {
            self.message.as_deref().unwrap_or("Unknown error")
        }
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum FinishReason {
        Stop,
        MaxTokens,
        Safety,
        Recitation,
        Language,
        Blocklist,
        ProhibitedContent,
        Spii,
        Other,
        Unknown,
    }

    impl FinishReason {
        #[must_use]
        pub fn parse(s: &str) -> Self {
            match s {
                "STOP" => Self::Stop,
                "MAX_TOKENS" => Self::MaxTokens,
                "SAFETY" => Self::Safety,
                "RECITATION" => Self::Recitation,
                "LANGUAGE" => Self::Language,
                "BLOCKLIST" => Self::Blocklist,
                "PROHIBITED_CONTENT" => Self::ProhibitedContent,
                "SPII" => Self::Spii,
                "OTHER" => Self::Other,
                _ => Self::Unknown,
            }
        }

        /// Returns error message if this is an error reason, None if success.
        #[must_use]
        pub fn error_message(self) -> Option<&'static str> {
            match self {
                Self::Stop | Self::MaxTokens | Self::Unknown => None,
                Self::Safety => Some("Content filtered by safety settings"),
                Self::Recitation => Some("Response blocked: recitation"),
                Self::Language => Some("Unsupported language"),
                Self::Blocklist => Some("Content contains blocked terms"),
                Self::ProhibitedContent => Some("Prohibited content detected"),
                Self::Spii => Some("Sensitive PII detected"),
                Self::Other => Some("Generation stopped: unknown reason"),
            }
        }
    }
}
