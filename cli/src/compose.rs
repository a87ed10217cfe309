//! Builds the [`Mentor`] from configuration.
//!
//! This is the only place that sees provider credentials. Everything below
//! receives an already-constructed capability, or none.

use anyhow::{Context, Result};
use mentor_config::{MentorConfig, TextGenSettings};
use mentor_core::{Classifier, GuidanceGenerator, Mentor};
use mentor_providers::{GeminiClient, TextGen};
use std::path::Path;
use std::sync::Arc;

pub fn load_config(path: Option<&Path>) -> Result<MentorConfig> {
    let config = match path {
        Some(path) => Some(
            MentorConfig::load_from(path)
                .with_context(|| format!("loading config from {}", path.display()))?,
        ),
        None => MentorConfig::load().context("loading default config")?,
    };
    Ok(config.unwrap_or_default())
}

pub fn textgen(settings: &TextGenSettings) -> Result<Option<Arc<dyn TextGen>>> {
    let Some(api_key) = settings.api_key.clone() else {
        tracing::info!("No Gemini API key configured; running offline");
        return Ok(None);
    };

    let client = GeminiClient::new(api_key, settings.model.clone(), settings.timeout)
        .and_then(|client| client.with_base_url(settings.base_url.as_str()))
        .context("building Gemini client")?;
    tracing::info!(model = %settings.model, provider = client.name(), "Text generation enabled");
    Ok(Some(Arc::new(client)))
}

pub fn classifier(config: &MentorConfig) -> Classifier {
    let mut classifier = Classifier::from_thresholds(&config.thresholds);
    for family in classifier.add_family_aliases(&config.families) {
        tracing::warn!(family, "Ignoring aliases for unknown experiment family");
    }
    classifier
}

pub fn mentor(config: &MentorConfig, settings: &TextGenSettings) -> Result<Mentor> {
    let generator = GuidanceGenerator::new(textgen(settings)?)
        .with_timeout(settings.timeout)
        .with_sampling(settings.max_output_tokens, settings.temperature);
    Ok(Mentor::new(classifier(config), generator))
}
