//! Configuration driving classifier thresholds, aliases and provider settings

use crate::common::snapshot;
use mentor_config::{MentorConfig, TextGenSettings};
use mentor_core::{Classifier, GuidanceGenerator, Mentor};
use mentor_types::MisconceptionCode;
use serde_json::json;
use std::io::Write;
use std::time::Duration;

fn classifier_for(config: &MentorConfig) -> Classifier {
    let mut classifier = Classifier::from_thresholds(&config.thresholds);
    assert!(classifier.add_family_aliases(&config.families).is_empty());
    classifier
}

#[tokio::test]
async fn tuned_thresholds_change_classification() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
[thresholds.circuit]
current_limit = 0.1

[thresholds.enzyme]
temperature_limit = 40.0

[families]
circuit = ["ohm-law", "dc-circuit"]
"#
    )
    .unwrap();

    let config = MentorConfig::load_from(file.path()).unwrap();
    let mentor = Mentor::new(classifier_for(&config), GuidanceGenerator::offline());

    let moderate = mentor
        .evaluate(&snapshot(json!({ "experiment": "circuit", "current": 0.05 })))
        .await;
    assert!(!moderate.triggered());

    let aliased = mentor
        .evaluate(&snapshot(json!({ "activeLab": "DC-Circuit", "current": 0.2 })))
        .await;
    assert_eq!(
        aliased.misconception(),
        Some(&MisconceptionCode::APPROACHING_OVERLOAD)
    );

    let warm = mentor
        .evaluate(&snapshot(json!({ "experiment": "enzyme", "temperature": 45 })))
        .await;
    assert_eq!(
        warm.misconception(),
        Some(&MisconceptionCode::APPROACHING_DENATURATION)
    );

    let titration = mentor
        .evaluate(&snapshot(json!({ "experiment": "titration", "pH": 7.6, "baseVolume": 10 })))
        .await;
    assert_eq!(
        titration.misconception(),
        Some(&MisconceptionCode::ADDED_TOO_FAST)
    );
}

#[test]
fn aliases_for_unknown_family_are_ignored() {
    let config = MentorConfig::parse("[families]\npendulum = [\"swing\"]\n").unwrap();
    let mut classifier = Classifier::from_thresholds(&config.thresholds);
    assert_eq!(classifier.add_family_aliases(&config.families), ["pendulum"]);
    assert_eq!(
        classifier.classify(&snapshot(json!({ "experiment": "swing", "angle": 90 }))),
        None
    );
}

#[test]
fn google_section_resolves_to_settings() {
    let config = MentorConfig::parse(
        r#"
[google]
api_key = "file-key"
model = "gemini-1.5-flash"
base_url = "http://127.0.0.1:9999/v1beta/"
timeout_seconds = 600
max_output_tokens = 120
"#,
    )
    .unwrap();

    let settings = TextGenSettings::resolve(config.google.as_ref(), |_| None);
    assert!(settings.is_available());
    assert_eq!(settings.model.as_str(), "gemini-1.5-flash");
    assert_eq!(settings.base_url, "http://127.0.0.1:9999/v1beta");
    assert_eq!(settings.timeout, Duration::from_secs(60));
    assert_eq!(settings.max_output_tokens, 120);
}

#[test]
fn missing_config_is_offline() {
    let settings = TextGenSettings::resolve(None, |_| None);
    assert!(!settings.is_available());
    assert_eq!(settings.timeout, Duration::from_secs(10));
}
