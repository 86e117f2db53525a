//! Runtime configuration
//!
//! Resolution order (later wins):
//! 1. Built-in defaults
//! 2. TOML config file (`--config` or ~/.config/watersave/config.toml)
//! 3. Environment variables
//!
//! ```toml
//! [advice]
//! model = "claude-3-5-sonnet-20240620"
//! base_url = "https://api.anthropic.com"
//! timeout_secs = 30
//! api_key = "sk-..."          # prefer ANTHROPIC_API_KEY
//!
//! [insights]
//! summary_window = 30
//! ```
//!
//! Environment variables:
//! - `ANTHROPIC_API_KEY`: API key for the advice service (required)
//! - `WATERSAVE_MODEL`: Model identifier
//! - `WATERSAVE_BASE_URL`: Messages API base URL
//! - `WATERSAVE_TIMEOUT_SECS`: Request timeout in seconds
//! - `WATERSAVE_SUMMARY_WINDOW`: Most recent records included in prompts
//! - `WATERSAVE_ADVICE_BACKEND`: `anthropic` (default) or `mock`

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::insights::DEFAULT_SUMMARY_WINDOW;

pub const API_KEY_ENV: &str = "ANTHROPIC_API_KEY";
pub const MODEL_ENV: &str = "WATERSAVE_MODEL";
pub const BASE_URL_ENV: &str = "WATERSAVE_BASE_URL";
pub const TIMEOUT_ENV: &str = "WATERSAVE_TIMEOUT_SECS";
pub const SUMMARY_WINDOW_ENV: &str = "WATERSAVE_SUMMARY_WINDOW";
pub const BACKEND_ENV: &str = "WATERSAVE_ADVICE_BACKEND";

pub const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
pub const DEFAULT_MODEL: &str = "claude-3-5-sonnet-20240620";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Which advice backend to talk to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackendKind {
    #[default]
    Anthropic,
    Mock,
}

impl std::str::FromStr for BackendKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "anthropic" => Ok(Self::Anthropic),
            "mock" => Ok(Self::Mock),
            other => Err(Error::Config(format!("Unknown advice backend: {}", other))),
        }
    }
}

/// Fully resolved configuration
#[derive(Clone)]
pub struct Config {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub timeout: Duration,
    pub summary_window: usize,
    pub backend: BackendKind,
    /// File the settings were read from, if any
    pub source: Option<PathBuf>,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &mask_key(&self.api_key))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("timeout", &self.timeout)
            .field("summary_window", &self.summary_window)
            .field("backend", &self.backend)
            .field("source", &self.source)
            .finish()
    }
}

impl Config {
    /// Load config from file and environment
    ///
    /// An explicit `path` must exist; the default location is optional.
    /// Fails when no API key can be resolved.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (raw, source) = match path {
            Some(path) => {
                let content = fs::read_to_string(path).map_err(|e| {
                    Error::Config(format!("Failed to read {}: {}", path.display(), e))
                })?;
                (parse_file(&content)?, Some(path.to_path_buf()))
            }
            None => match default_config_path().filter(|p| p.exists()) {
                Some(default) => {
                    let content = fs::read_to_string(&default).map_err(|e| {
                        Error::Config(format!("Failed to read {}: {}", default.display(), e))
                    })?;
                    (parse_file(&content)?, Some(default))
                }
                None => (RawConfig::default(), None),
            },
        };

        Self::resolve(raw, source, |key| std::env::var(key).ok())
    }

    /// Merge file settings with an environment lookup
    fn resolve(
        raw: RawConfig,
        source: Option<PathBuf>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let advice = raw.advice.unwrap_or_default();
        let insights = raw.insights.unwrap_or_default();

        let api_key = env(API_KEY_ENV)
            .or(advice.api_key)
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| {
                Error::Config(format!(
                    "No API key configured. Set {} or [advice] api_key in the config file",
                    API_KEY_ENV
                ))
            })?;

        let timeout = match env(TIMEOUT_ENV) {
            Some(v) => Duration::from_secs(parse_number(TIMEOUT_ENV, &v)?),
            None => advice
                .timeout_secs
                .map(Duration::from_secs)
                .unwrap_or(DEFAULT_TIMEOUT),
        };

        let summary_window = match env(SUMMARY_WINDOW_ENV) {
            Some(v) => parse_number(SUMMARY_WINDOW_ENV, &v)?,
            None => insights.summary_window.unwrap_or(DEFAULT_SUMMARY_WINDOW),
        };
        if summary_window == 0 {
            return Err(Error::Config("summary_window must be at least 1".into()));
        }

        let backend = match env(BACKEND_ENV) {
            Some(v) => v.parse()?,
            None => BackendKind::default(),
        };

        Ok(Self {
            api_key,
            base_url: env(BASE_URL_ENV)
                .or(advice.base_url)
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            model: env(MODEL_ENV)
                .or(advice.model)
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            timeout,
            summary_window,
            backend,
            source,
        })
    }

    /// API key with everything but the last four characters hidden
    pub fn masked_key(&self) -> String {
        mask_key(&self.api_key)
    }
}

/// Default config file location
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("watersave").join("config.toml"))
}

fn mask_key(key: &str) -> String {
    let visible: String = key
        .chars()
        .rev()
        .take(4)
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();
    format!("***{}", visible)
}

fn parse_number<T: std::str::FromStr>(name: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| Error::Config(format!("{} must be a non-negative integer, got {:?}", name, value)))
}

/// Raw config structure for TOML parsing
#[derive(Debug, Default, Deserialize)]
struct RawConfig {
    advice: Option<RawAdvice>,
    insights: Option<RawInsights>,
}

#[derive(Debug, Default, Deserialize)]
struct RawAdvice {
    model: Option<String>,
    base_url: Option<String>,
    timeout_secs: Option<u64>,
    api_key: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawInsights {
    summary_window: Option<usize>,
}

fn parse_file(content: &str) -> Result<RawConfig> {
    toml::from_str(content).map_err(|e| Error::Config(format!("Invalid config TOML: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_missing_key_is_config_error() {
        let result = Config::resolve(RawConfig::default(), None, env_of(&[]));
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_blank_key_is_rejected() {
        let result = Config::resolve(RawConfig::default(), None, env_of(&[(API_KEY_ENV, "  ")]));
        assert!(result.is_err());
    }

    #[test]
    fn test_defaults() {
        let config =
            Config::resolve(RawConfig::default(), None, env_of(&[(API_KEY_ENV, "sk-test")]))
                .unwrap();
        assert_eq!(config.api_key, "sk-test");
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
        assert_eq!(config.summary_window, DEFAULT_SUMMARY_WINDOW);
        assert_eq!(config.backend, BackendKind::Anthropic);
    }

    #[test]
    fn test_file_values_applied() {
        let raw = parse_file(
            r#"
[advice]
model = "claude-3-haiku-20240307"
timeout_secs = 5
api_key = "sk-file"

[insights]
summary_window = 7
"#,
        )
        .unwrap();

        let config = Config::resolve(raw, None, env_of(&[])).unwrap();
        assert_eq!(config.api_key, "sk-file");
        assert_eq!(config.model, "claude-3-haiku-20240307");
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.summary_window, 7);
    }

    #[test]
    fn test_env_overrides_file() {
        let raw = parse_file("[advice]\nmodel = \"from-file\"\napi_key = \"sk-file\"\n").unwrap();
        let config = Config::resolve(
            raw,
            None,
            env_of(&[
                (API_KEY_ENV, "sk-env"),
                (MODEL_ENV, "from-env"),
                (TIMEOUT_ENV, "12"),
                (BACKEND_ENV, "mock"),
            ]),
        )
        .unwrap();
        assert_eq!(config.api_key, "sk-env");
        assert_eq!(config.model, "from-env");
        assert_eq!(config.timeout, Duration::from_secs(12));
        assert_eq!(config.backend, BackendKind::Mock);
    }

    #[test]
    fn test_invalid_numbers_rejected() {
        let result = Config::resolve(
            RawConfig::default(),
            None,
            env_of(&[(API_KEY_ENV, "k"), (TIMEOUT_ENV, "soon")]),
        );
        assert!(result.is_err());

        let result = Config::resolve(
            RawConfig::default(),
            None,
            env_of(&[(API_KEY_ENV, "k"), (SUMMARY_WINDOW_ENV, "0")]),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_toml() {
        assert!(parse_file("[advice\nmodel=").is_err());
    }

    #[test]
    fn test_load_explicit_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = Config::load(Some(&dir.path().join("nope.toml")));
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_masked_key() {
        assert_eq!(mask_key("sk-ant-abcdef1234"), "***1234");
        assert_eq!(mask_key("ab"), "***ab");
    }
}
