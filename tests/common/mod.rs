//! Shared test utilities and fixtures
//!
//! A scripted text-generation double plus Gemini mock-server mounts.

#![allow(dead_code)]

use futures_util::FutureExt;
use futures_util::future::BoxFuture;
use mentor_core::{Classifier, GuidanceGenerator, Mentor};
use mentor_providers::{GeminiClient, TextGen, TextGenError};
use mentor_types::{ApiKey, CompletionRequest, ModelName, SimulationSnapshot};
use serde_json::{Value, json};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const GENERATE_PATH: &str = "/models/gemini-2.0-flash:generateContent";

/// What the scripted provider does on every call.
#[derive(Clone)]
pub enum Script {
    Reply(String),
    Fail,
    Sleep(Duration),
}

/// A `TextGen` that follows a fixed script and records what it was asked.
pub struct ScriptedTextGen {
    script: Script,
    calls: AtomicUsize,
    requests: Mutex<Vec<RecordedRequest>>,
}

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub system_instruction: String,
    pub user_content: String,
    pub max_output_tokens: u32,
}

impl ScriptedTextGen {
    pub fn new(script: Script) -> Arc<Self> {
        Arc::new(Self {
            script,
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn replying(text: &str) -> Arc<Self> {
        Self::new(Script::Reply(text.to_string()))
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl TextGen for ScriptedTextGen {
    fn name(&self) -> &'static str {
        "scripted"
    }

    fn complete<'a>(
        &'a self,
        request: CompletionRequest<'a>,
    ) -> BoxFuture<'a, Result<String, TextGenError>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(RecordedRequest {
            system_instruction: request.system_instruction.to_string(),
            user_content: request.user_content.to_string(),
            max_output_tokens: request.max_output_tokens,
        });
        let script = self.script.clone();
        async move {
            match script {
                Script::Reply(text) => Ok(text),
                Script::Fail => Err(TextGenError::Auth { status: 401 }),
                Script::Sleep(delay) => {
                    tokio::time::sleep(delay).await;
                    Ok("late".to_string())
                }
            }
        }
        .boxed()
    }
}

pub fn mentor_with(textgen: Arc<ScriptedTextGen>) -> Mentor {
    let textgen: Arc<dyn TextGen> = textgen;
    Mentor::new(Classifier::default(), GuidanceGenerator::new(Some(textgen)))
}

pub fn offline_mentor() -> Mentor {
    Mentor::new(Classifier::default(), GuidanceGenerator::offline())
}

pub fn snapshot(value: Value) -> SimulationSnapshot {
    SimulationSnapshot::from_json(value).unwrap()
}

/// A Gemini client pointed at `server`.
pub fn gemini_client(server: &MockServer, timeout: Duration) -> GeminiClient {
    GeminiClient::new(ApiKey::new("test-key").unwrap(), ModelName::default(), timeout)
        .unwrap()
        .with_base_url(server.uri())
        .unwrap()
}

pub fn gemini_mentor(server: &MockServer, timeout: Duration) -> Mentor {
    let textgen: Arc<dyn TextGen> = Arc::new(gemini_client(server, timeout));
    Mentor::new(
        Classifier::default(),
        GuidanceGenerator::new(Some(textgen)).with_timeout(timeout),
    )
}

/// Mount a successful `generateContent` response carrying `text`.
pub async fn mount_gemini_text(server: &MockServer, text: &str) {
    let body = json!({
        "candidates": [{
            "content": { "role": "model", "parts": [{ "text": text }] },
            "finishReason": "STOP"
        }],
        "usageMetadata": { "promptTokenCount": 42, "candidatesTokenCount": 12 }
    });

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

/// Mount an HTTP error status for `generateContent`.
pub async fn mount_gemini_status(server: &MockServer, status: u16, body: &str) {
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(status).set_body_string(body))
        .mount(server)
        .await;
}
