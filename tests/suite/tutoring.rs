//! Hint, report, challenge and health operations

use crate::common::{Script, ScriptedTextGen, mentor_with, offline_mentor};
use mentor_core::ChallengeError;
use mentor_types::{
    ChallengeRequest, HintRequest, HintTrigger, ModelName, ParseFailure, ReportRequest,
};
use serde_json::json;

fn hint_request(value: serde_json::Value) -> HintRequest {
    serde_json::from_value(value).unwrap()
}

#[tokio::test]
async fn failure_hints_cover_every_known_failure() {
    let mentor = offline_mentor();
    let cases = [
        ("OVERLOAD", "I = V/R"),
        ("SHORT_CIRCUIT", "low resistance"),
        ("ZERO_RANGE", "zero horizontal"),
        ("LARGE_ANGLE", "steep angles"),
        ("OVERSHOOT", "velocity is extremely high"),
        ("PH_EXTREME", "equivalence point"),
        ("ENZYME_DENATURATION", "3D structure"),
    ];
    for (failure, expected) in cases {
        let response = mentor
            .hint(&hint_request(json!({
                "simulation": "any",
                "trigger": "failure",
                "failure_name": failure
            })))
            .await;
        assert!(response.message.contains(expected), "{failure}: {}", response.message);
        assert_eq!(response.level, 1);
    }
}

#[tokio::test]
async fn generated_hint_is_used_when_available() {
    let textgen = ScriptedTextGen::replying("What was the resistance when it failed?");
    let mentor = mentor_with(textgen.clone());
    let response = mentor
        .hint(&hint_request(json!({
            "simulation": "circuit",
            "trigger": "failure",
            "failure_name": "OVERLOAD",
            "context": { "voltage": 24, "resistance": 10 }
        })))
        .await;

    assert_eq!(response.message, "What was the resistance when it failed?");
    let requests = textgen.requests();
    assert!(requests[0].user_content.contains("\"OVERLOAD\""));
    assert!(requests[0].user_content.contains("\"resistance\":10"));
    assert_eq!(requests[0].max_output_tokens, 150);
}

#[tokio::test]
async fn hint_response_serializes_trigger_in_snake_case() {
    let response = offline_mentor()
        .hint(&hint_request(json!({ "simulation": "titration", "trigger": "danger_zone" })))
        .await;
    assert_eq!(response.trigger, HintTrigger::DangerZone);
    let value = serde_json::to_value(&response).unwrap();
    assert_eq!(value["trigger"], "danger_zone");
    assert_eq!(value["level"], 1);
}

#[tokio::test]
async fn report_always_has_three_questions() {
    let request: ReportRequest = serde_json::from_value(json!({
        "simulation": "enzyme",
        "observations": [{ "temperature": 37, "rate": 0.8 }, { "temperature": 60, "rate": 0.1 }],
        "failures": ["ENZYME_DENATURED"],
        "duration": 420,
        "score": 75
    }))
    .unwrap();

    for mentor in [
        offline_mentor(),
        mentor_with(ScriptedTextGen::new(Script::Fail)),
        mentor_with(ScriptedTextGen::replying(r#"["only one?"]"#)),
    ] {
        let response = mentor.report(&request).await;
        assert_eq!(response.viva_questions.len(), 3);
        assert!(!response.result.is_empty());
    }
}

#[tokio::test]
async fn challenge_with_missing_field_is_rejected() {
    let textgen = ScriptedTextGen::replying(
        r#"{"id":"x","title":"t","description":"d","target_key":"current","target_value":0.03,"target_unit":"A","tolerance":5,"hint":"h","proof":"p","fixed_params":{}}"#,
    );
    let request: ChallengeRequest =
        serde_json::from_value(json!({ "simulation": "circuit" })).unwrap();
    let err = mentor_with(textgen).challenge(&request).await.unwrap_err();
    assert!(matches!(
        err,
        ChallengeError::Parse(ParseFailure::UnexpectedShape(_))
    ));
}

#[tokio::test]
async fn challenge_with_zero_tolerance_is_rejected() {
    let textgen = ScriptedTextGen::replying(
        r#"{"id":"x","title":"t","description":"d","target_key":"current","target_value":0.03,"target_unit":"A","tolerance":0,"hint":"h","proof":"p","fixed_params":{},"compute":"inputs.current"}"#,
    );
    let request: ChallengeRequest =
        serde_json::from_value(json!({ "simulation": "circuit" })).unwrap();
    let err = mentor_with(textgen).challenge(&request).await.unwrap_err();
    assert!(matches!(
        err,
        ChallengeError::Parse(ParseFailure::NonPositiveTolerance)
    ));
}

#[test]
fn health_reflects_capability() {
    let model = ModelName::parse("gemini-1.5-pro").unwrap();
    let online = mentor_with(ScriptedTextGen::replying("unused")).health(&model);
    assert_eq!(online.textgen, "connected");
    assert_eq!(online.model, "gemini-1.5-pro");
    assert_eq!(offline_mentor().health(&model).textgen, "offline");
}
