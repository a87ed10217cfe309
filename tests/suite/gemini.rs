//! Gemini provider behaviour as seen by the tutoring operations

use crate::common::{GENERATE_PATH, gemini_client, gemini_mentor, mount_gemini_text};
use mentor_providers::{TextGen, TextGenError};
use mentor_types::{ChallengeRequest, CompletionRequest, ResponseFormat};
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn challenge_requests_json_output() {
    let server = MockServer::start().await;
    let challenge = json!({
        "id": "titration-7",
        "title": "Neutral ground",
        "description": "Reach pH 7.0 exactly.",
        "target_key": "ph",
        "target_value": 7.0,
        "target_unit": "",
        "tolerance": 2,
        "hint": "Slow down near the jump.",
        "proof": "Equal moles of acid and base give pH 7.",
        "fixed_params": { "acid_concentration": 0.1 },
        "compute": "inputs.ph"
    });
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .and(body_partial_json(json!({
            "generationConfig": {
                "responseMimeType": "application/json",
                "maxOutputTokens": 400
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{
                "content": { "parts": [{ "text": challenge.to_string() }] },
                "finishReason": "STOP"
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mentor = gemini_mentor(&server, Duration::from_secs(5));
    let request: ChallengeRequest =
        serde_json::from_value(json!({ "simulation": "titration", "skill_level": "beginner" }))
            .unwrap();
    let generated = mentor.challenge(&request).await.unwrap();
    assert_eq!(generated.id, "titration-7");
    assert_eq!(generated.target_unit, "");
}

#[tokio::test]
async fn safety_block_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "promptFeedback": { "blockReason": "SAFETY" }
        })))
        .mount(&server)
        .await;

    let client = gemini_client(&server, Duration::from_secs(5));
    let err = client
        .complete(CompletionRequest::new("sys", "hello"))
        .await
        .unwrap_err();
    assert!(matches!(err, TextGenError::Blocked(_)), "{err:?}");
}

#[tokio::test]
async fn json_format_sets_mime_type_only_when_asked() {
    let server = MockServer::start().await;
    mount_gemini_text(&server, "ok").await;
    let client = gemini_client(&server, Duration::from_secs(5));

    client
        .complete(CompletionRequest::new("", "plain"))
        .await
        .unwrap();
    client
        .complete(CompletionRequest::new("", "structured").with_format(ResponseFormat::Json))
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);
    let plain: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    let structured: serde_json::Value = serde_json::from_slice(&requests[1].body).unwrap();
    assert!(plain["generationConfig"].get("responseMimeType").is_none());
    assert_eq!(
        structured["generationConfig"]["responseMimeType"],
        "application/json"
    );
    assert!(plain.get("system_instruction").is_none());
}

#[tokio::test]
async fn rejected_key_falls_back_in_hints() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(401).set_body_string("API key not valid"))
        .expect(1)
        .mount(&server)
        .await;

    let mentor = gemini_mentor(&server, Duration::from_secs(5));
    let request = serde_json::from_value(json!({
        "simulation": "enzyme",
        "trigger": "failure",
        "failure_name": "ENZYME_DENATURED"
    }))
    .unwrap();
    let response = mentor.hint(&request).await;
    assert!(response.message.contains("3D structure"));
}
