//! Classification and pipeline properties checked over representative inputs

use crate::common::{Script, ScriptedTextGen, mentor_with, offline_mentor, snapshot};
use mentor_core::{Classifier, decide};
use mentor_types::{MisconceptionCode, SimulationSnapshot};
use serde_json::{Value, json};
use std::time::Duration;

fn corpus() -> Vec<SimulationSnapshot> {
    let mut values: Vec<Value> = Vec::new();
    for current in [-0.09, -0.041, 0.0, 0.039, 0.04, 0.0401, 0.5] {
        values.push(json!({ "experiment": "circuit", "current": current }));
        values.push(json!({ "experiment": "circuit", "current": current, "failureState": "OVERLOAD" }));
    }
    for (ph, volume) in [(7.4, 10.0), (7.5, 10.0), (7.6, 10.0), (7.6, 20.0), (9.0, 25.0)] {
        values.push(json!({ "experiment": "titration", "pH": ph, "baseVolume": volume }));
    }
    for temperature in [20, 55, 56, 90] {
        values.push(json!({ "experiment": "enzyme", "temperature": temperature }));
    }
    values.extend([
        json!({}),
        json!({ "experiment": "pendulum", "angle": 80 }),
        json!({ "experiment": "circuit", "current": "lots" }),
        json!({ "experiment": "titration", "pH": 8.0 }),
        json!({ "experiment": 7, "current": 1.0 }),
        json!({ "experiment": "enzyme", "failureState": "", "temperature": 60 }),
    ]);
    values.into_iter().map(snapshot).collect()
}

#[test]
fn gate_agrees_with_classification() {
    let classifier = Classifier::default();
    for input in corpus() {
        let code = classifier.classify(&input);
        assert_eq!(decide(code.as_ref()), code.is_some(), "{input:?}");
    }
}

#[test]
fn overload_flag_wins_over_current() {
    let classifier = Classifier::default();
    for current in [-1.0, 0.0, 0.01, 0.04, 0.05, 10.0] {
        let input = snapshot(json!({
            "experiment": "circuit",
            "current": current,
            "failureState": "OVERLOAD"
        }));
        assert_eq!(
            classifier.classify(&input),
            Some(MisconceptionCode::OVERLOAD_TRIGGERED),
            "current = {current}"
        );
    }
}

#[test]
fn circuit_threshold_is_strict() {
    let classifier = Classifier::default();
    let at = snapshot(json!({ "experiment": "circuit", "current": 0.04, "failureState": null }));
    let above = snapshot(json!({ "experiment": "circuit", "current": 0.041, "failureState": null }));
    assert_eq!(classifier.classify(&at), None);
    assert_eq!(
        classifier.classify(&above),
        Some(MisconceptionCode::APPROACHING_OVERLOAD)
    );
}

#[test]
fn titration_boundary_cases() {
    let classifier = Classifier::default();
    let below = snapshot(json!({ "experiment": "titration", "pH": 7.4, "baseVolume": 10, "failureState": null }));
    let above = snapshot(json!({ "experiment": "titration", "pH": 7.6, "baseVolume": 10 }));
    assert_eq!(classifier.classify(&below), None);
    assert_eq!(
        classifier.classify(&above),
        Some(MisconceptionCode::ADDED_TOO_FAST)
    );
}

#[tokio::test]
async fn unknown_families_never_trigger() {
    let mentor = offline_mentor();
    for experiment in ["pendulum", "gravity", "optics-bench", "", "   "] {
        let input = snapshot(json!({ "experiment": experiment, "current": 5.0, "temperature": 99 }));
        let result = mentor.evaluate(&input).await;
        assert!(!result.triggered(), "{experiment:?}");
        assert!(result.misconception().is_none());
    }
}

#[tokio::test]
async fn offline_evaluation_is_byte_identical() {
    let mentor = offline_mentor();
    for input in corpus() {
        let first = serde_json::to_string(&mentor.evaluate(&input).await).unwrap();
        let second = serde_json::to_string(&mentor.evaluate(&input).await).unwrap();
        assert_eq!(first, second);
    }
}

#[tokio::test]
async fn triggered_matches_misconception_for_every_input() {
    let mentor = mentor_with(ScriptedTextGen::new(Script::Fail));
    for input in corpus() {
        let result = mentor.evaluate(&input).await;
        assert_eq!(result.triggered(), result.misconception().is_some());
        assert_eq!(result.message(), "");
    }
}

#[tokio::test(start_paused = true)]
async fn slow_provider_is_cut_off() {
    let textgen = ScriptedTextGen::new(Script::Sleep(Duration::from_secs(120)));
    let mentor = mentor_with(textgen.clone());
    let result = mentor
        .evaluate(&snapshot(json!({ "experiment": "enzyme", "temperature": 60 })))
        .await;

    assert!(result.triggered());
    assert_eq!(result.message(), "");
    assert_eq!(textgen.calls(), 1);
}
