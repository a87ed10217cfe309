//! Configuration file loading and provider settings resolution.
//!
//! The file lives at `$LABMENTOR_CONFIG` or `~/.labmentor/config.toml`. A
//! missing file is not an error: every section has defaults, and the
//! text-generation key can come from `GEMINI_API_KEY` alone.

use mentor_types::{ApiKey, CompletionRequest, ModelName, Thresholds};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use std::{env, fs};

pub const CONFIG_PATH_ENV: &str = "LABMENTOR_CONFIG";
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";
pub const MODEL_ENV: &str = "LABMENTOR_MODEL";

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
const MIN_TIMEOUT_SECS: u64 = 1;
const MAX_TIMEOUT_SECS: u64 = 60;
const MAX_TEMPERATURE: f64 = 2.0;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config at {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config at {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl ConfigError {
    pub fn path(&self) -> &Path {
        match self {
            ConfigError::Read { path, .. } | ConfigError::Parse { path, .. } => path,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct MentorConfig {
    pub google: Option<GoogleConfig>,
    #[serde(default)]
    pub thresholds: Thresholds,
    /// Extra discriminator aliases per experiment family.
    #[serde(default)]
    pub families: BTreeMap<String, Vec<String>>,
}

#[derive(Default, Deserialize)]
pub struct GoogleConfig {
    /// Supports `${ENV_VAR}` expansion.
    pub api_key: Option<String>,
    pub model: Option<ModelName>,
    pub base_url: Option<String>,
    pub timeout_seconds: Option<u64>,
    pub temperature: Option<f64>,
    pub max_output_tokens: Option<u32>,
}

// Manual Debug impl to prevent leaking API keys in logs.
impl std::fmt::Debug for GoogleConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoogleConfig")
            .field(
                "api_key",
                &if self.api_key.is_some() {
                    "[REDACTED]"
                } else {
                    "None"
                },
            )
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("timeout_seconds", &self.timeout_seconds)
            .field("temperature", &self.temperature)
            .field("max_output_tokens", &self.max_output_tokens)
            .finish()
    }
}

pub fn expand_env_vars(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut rest = value;

    while let Some(start) = rest.find("${") {
        let after = &rest[start + 2..];
        let Some(end) = after.find('}') else {
            break;
        };
        out.push_str(&rest[..start]);
        let var = &after[..end];
        if !var.is_empty() {
            out.push_str(&env::var(var).unwrap_or_default());
        }
        rest = &after[end + 1..];
    }

    out.push_str(rest);
    out
}

impl MentorConfig {
    /// Load from the default location. `Ok(None)` when no file exists.
    pub fn load() -> Result<Option<Self>, ConfigError> {
        let Some(path) = config_path() else {
            return Ok(None);
        };
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No config file; using defaults");
            return Ok(None);
        }
        Self::load_from(&path).map(Some)
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) => {
                tracing::warn!("Failed to read config at {:?}: {}", path, err);
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source: err,
                });
            }
        };

        match Self::parse(&content) {
            Ok(config) => Ok(config),
            Err(err) => {
                tracing::warn!("Failed to parse config at {:?}: {}", path, err);
                Err(ConfigError::Parse {
                    path: path.to_path_buf(),
                    source: err,
                })
            }
        }
    }

    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Resolve provider settings against the process environment.
    #[must_use]
    pub fn text_gen_settings(&self) -> TextGenSettings {
        TextGenSettings::resolve(self.google.as_ref(), |name| env::var(name).ok())
    }
}

pub fn config_path() -> Option<PathBuf> {
    if let Some(path) = env::var_os(CONFIG_PATH_ENV).filter(|p| !p.is_empty()) {
        return Some(PathBuf::from(path));
    }
    dirs::home_dir().map(|home| home.join(".labmentor").join("config.toml"))
}

/// Fully-resolved settings for constructing a text-generation client.
#[derive(Debug, Clone, PartialEq)]
pub struct TextGenSettings {
    /// `None` means the capability is absent.
    pub api_key: Option<ApiKey>,
    pub model: ModelName,
    pub base_url: String,
    pub timeout: Duration,
    pub temperature: f64,
    pub max_output_tokens: u32,
}

impl Default for TextGenSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            model: ModelName::default(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            temperature: CompletionRequest::DEFAULT_TEMPERATURE,
            max_output_tokens: CompletionRequest::DEFAULT_MAX_OUTPUT_TOKENS,
        }
    }
}

impl TextGenSettings {
    /// Merge file settings with environment lookups from `env_var`.
    pub fn resolve(google: Option<&GoogleConfig>, env_var: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let Some(google) = google else {
            return Self {
                api_key: env_var(API_KEY_ENV).and_then(ApiKey::new),
                model: model_override(&env_var).unwrap_or(defaults.model),
                ..defaults
            };
        };

        let api_key = google
            .api_key
            .as_deref()
            .map(expand_env_vars)
            .and_then(ApiKey::new)
            .or_else(|| env_var(API_KEY_ENV).and_then(ApiKey::new));

        let model = model_override(&env_var)
            .or_else(|| google.model.clone())
            .unwrap_or(defaults.model);

        let base_url = google
            .base_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .map_or(defaults.base_url, |url| url.trim_end_matches('/').to_string());

        let timeout_secs = google
            .timeout_seconds
            .unwrap_or(DEFAULT_TIMEOUT_SECS)
            .clamp(MIN_TIMEOUT_SECS, MAX_TIMEOUT_SECS);

        let temperature = match google.temperature {
            Some(t) if t.is_finite() && (0.0..=MAX_TEMPERATURE).contains(&t) => t,
            Some(t) => {
                tracing::warn!(temperature = t, "Ignoring out-of-range temperature");
                defaults.temperature
            }
            None => defaults.temperature,
        };

        let max_output_tokens = google
            .max_output_tokens
            .filter(|n| *n > 0)
            .unwrap_or(defaults.max_output_tokens);

        Self {
            api_key,
            model,
            base_url,
            timeout: Duration::from_secs(timeout_secs),
            temperature,
            max_output_tokens,
        }
    }

    #[must_use]
    pub fn is_available(&self) -> bool {
        self.api_key.is_some()
    }
}

fn model_override(env_var: &impl Fn(&str) -> Option<String>) -> Option<ModelName> {
    let raw = env_var(MODEL_ENV)?;
    match ModelName::parse(&raw) {
        Ok(model) => Some(model),
        Err(err) => {
            tracing::warn!(%err, "Ignoring {MODEL_ENV}");
            None
        }
    }
}
