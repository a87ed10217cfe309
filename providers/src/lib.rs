//! Text-generation provider clients.
//!
//! # Architecture
//!
//! Callers depend on the [`TextGen`] trait only. A provider turns one
//! [`CompletionRequest`] into the model's complete text reply, or a
//! [`TextGenError`] describing why it could not.
//!
//! - [`gemini`] - Google Gemini API client (GenerateContent API)
//!
//! # Error Handling
//!
//! Providers make exactly one attempt per request. Every failure, including
//! timeouts and safety blocks, comes back as `Err`; deciding whether to fall
//! back to canned text is the caller's job.

pub mod gemini;

pub use gemini::GeminiClient;
pub use mentor_types;

use futures_util::future::BoxFuture;
use mentor_types::CompletionRequest;
use std::time::Duration;

/// Canonical Gemini API base URL.
pub const GEMINI_API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

const CONNECT_TIMEOUT_SECS: u64 = 5;

const MAX_ERROR_BODY_BYTES: usize = 32 * 1024;

/// A single-shot text-generation backend.
pub trait TextGen: Send + Sync {
    /// Short provider identifier for logs.
    fn name(&self) -> &'static str;

    fn complete<'a>(
        &'a self,
        request: CompletionRequest<'a>,
    ) -> BoxFuture<'a, Result<String, TextGenError>>;
}

#[derive(Debug, thiserror::Error)]
pub enum TextGenError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("request timed out")]
    Timeout,
    #[error("transport error: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("provider rejected credentials ({status})")]
    Auth { status: u16 },
    #[error("API error {status}: {body}")]
    Http { status: u16, body: String },
    #[error("provider error: {0}")]
    Api(String),
    #[error("response blocked: {0}")]
    Blocked(String),
    #[error("provider returned no text")]
    EmptyResponse,
    #[error("malformed provider response: {0}")]
    MalformedResponse(String),
}

impl TextGenError {
    fn from_reqwest(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout
        } else {
            Self::Transport(error)
        }
    }
}

fn base_client_builder(https_only: bool) -> reqwest::ClientBuilder {
    reqwest::Client::builder()
        .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
        .redirect(reqwest::redirect::Policy::none())
        .https_only(https_only)
}

/// Build a client for `base_url`. HTTPS is enforced whenever the base URL is HTTPS.
pub fn http_client_with_timeout(
    base_url: &str,
    timeout: Duration,
) -> Result<reqwest::Client, TextGenError> {
    base_client_builder(base_url.starts_with("https://"))
        .timeout(timeout)
        .build()
        .map_err(TextGenError::Client)
}

pub async fn read_capped_error_body(response: reqwest::Response) -> String {
    use futures_util::StreamExt;
    let mut body = Vec::new();
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let Ok(chunk) = chunk else { break };
        body.extend_from_slice(&chunk);
        if body.len() > MAX_ERROR_BODY_BYTES {
            body.truncate(MAX_ERROR_BODY_BYTES);
            let text = String::from_utf8_lossy(&body);
            return format!("{text}...(truncated)");
        }
    }
    String::from_utf8_lossy(&body).into_owned()
}
