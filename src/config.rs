//! Configuration management for wayfarer.
//!
//! Configuration can be set via environment variables:
//! - `OPENAI_API_KEY` - Required. Key for the chat completions API.
//! - `GOOGLE_API_KEY` - Required. Key for the places text search API.
//! - `TAVILY_API_KEY` - Required. Key for the web search tool.
//! - `DEFAULT_MODEL` - Optional. Model for every agent. Defaults to `gpt-4.1-mini`.
//! - `LLM_BASE_URL` - Optional. Chat completions base URL. Defaults to `https://api.openai.com/v1`.
//! - `PLACES_ENDPOINT` - Optional. Places text search URL.
//! - `PLACES_RADIUS` - Optional. Location bias radius. Defaults to `100.0`.
//! - `PLACES_FIELD_MASK` - Optional. Places response field mask. Defaults to `*`.
//! - `PLACES_TIMEOUT_SECS` - Optional. Places request timeout. Defaults to `30`.
//! - `WEB_SEARCH_MAX_RESULTS` - Optional. Results per web search. Defaults to `3`.
//! - `MAX_ITERATIONS` - Optional. Maximum LLM calls per agent run. Defaults to `25`.

use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

use crate::llm::DEFAULT_BASE_URL;
use crate::places::PlacesConfig;
use crate::tools::WebSearchConfig;

pub const DEFAULT_MODEL: &str = "gpt-4.1-mini";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Chat completions API key
    pub openai_api_key: String,

    /// Chat completions base URL
    pub llm_base_url: String,

    /// Model used by the supervisor and every agent
    pub default_model: String,

    /// Maximum LLM calls per agent run
    pub max_iterations: usize,

    /// Places lookup settings, including its API key
    pub places: PlacesConfig,

    /// Web search settings, including its API key
    pub web_search: WebSearchConfig,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingEnvVar` if a required key is not set, and
    /// `ConfigError::InvalidValue` if a numeric setting does not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_vars<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let required =
            |key: &str| get(key).ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()));

        let openai_api_key = required("OPENAI_API_KEY")?;
        let google_api_key = required("GOOGLE_API_KEY")?;
        let tavily_api_key = required("TAVILY_API_KEY")?;

        let default_model = get("DEFAULT_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string());
        let llm_base_url = get("LLM_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let max_iterations: usize = parse_or(get("MAX_ITERATIONS"), "MAX_ITERATIONS", 25)?;
        if max_iterations == 0 {
            return Err(ConfigError::InvalidValue(
                "MAX_ITERATIONS".to_string(),
                "must be at least 1".to_string(),
            ));
        }

        let mut places = PlacesConfig::new(google_api_key);
        if let Some(endpoint) = get("PLACES_ENDPOINT") {
            places = places.with_endpoint(endpoint);
        }
        if let Some(field_mask) = get("PLACES_FIELD_MASK") {
            places = places.with_field_mask(field_mask);
        }
        let radius: f64 = parse_or(get("PLACES_RADIUS"), "PLACES_RADIUS", places.radius)?;
        if !radius.is_finite() || radius <= 0.0 {
            return Err(ConfigError::InvalidValue(
                "PLACES_RADIUS".to_string(),
                format!("must be a positive number, got {}", radius),
            ));
        }
        let timeout_secs: u64 = parse_or(
            get("PLACES_TIMEOUT_SECS"),
            "PLACES_TIMEOUT_SECS",
            places.timeout.as_secs(),
        )?;
        let places = places
            .with_radius(radius)
            .with_timeout(Duration::from_secs(timeout_secs));

        let max_results: u32 = parse_or(get("WEB_SEARCH_MAX_RESULTS"), "WEB_SEARCH_MAX_RESULTS", 3)?;
        let web_search = WebSearchConfig::new(tavily_api_key).with_max_results(max_results);

        Ok(Self {
            openai_api_key,
            llm_base_url,
            default_model,
            max_iterations,
            places,
            web_search,
        })
    }
}

fn parse_or<T>(value: Option<String>, key: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match value {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| ConfigError::InvalidValue(key.to_string(), format!("{}", e))),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn load(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let map = vars(pairs);
        Config::from_vars(|key| map.get(key).cloned())
    }

    const KEYS: [(&str, &str); 3] = [
        ("OPENAI_API_KEY", "sk-test"),
        ("GOOGLE_API_KEY", "g-test"),
        ("TAVILY_API_KEY", "tvly-test"),
    ];

    #[test]
    fn test_defaults() {
        let config = load(&KEYS).unwrap();
        assert_eq!(config.openai_api_key, "sk-test");
        assert_eq!(config.default_model, "gpt-4.1-mini");
        assert_eq!(config.llm_base_url, "https://api.openai.com/v1");
        assert_eq!(config.max_iterations, 25);
        assert_eq!(config.places.api_key, "g-test");
        assert_eq!(config.places.radius, 100.0);
        assert_eq!(config.places.field_mask, "*");
        assert_eq!(config.places.timeout, Duration::from_secs(30));
        assert_eq!(config.web_search.api_key, "tvly-test");
        assert_eq!(config.web_search.max_results, 3);
    }

    #[test]
    fn test_overrides() {
        let mut pairs = KEYS.to_vec();
        pairs.extend([
            ("DEFAULT_MODEL", "gpt-4o"),
            ("PLACES_ENDPOINT", "http://127.0.0.1:9/places"),
            ("PLACES_RADIUS", "2500.5"),
            ("PLACES_TIMEOUT_SECS", "5"),
            ("WEB_SEARCH_MAX_RESULTS", "7"),
            ("MAX_ITERATIONS", "4"),
        ]);
        let config = load(&pairs).unwrap();
        assert_eq!(config.default_model, "gpt-4o");
        assert_eq!(config.places.endpoint, "http://127.0.0.1:9/places");
        assert_eq!(config.places.radius, 2500.5);
        assert_eq!(config.places.timeout, Duration::from_secs(5));
        assert_eq!(config.web_search.max_results, 7);
        assert_eq!(config.max_iterations, 4);
    }

    #[test]
    fn test_missing_and_blank_keys() {
        let err = load(&KEYS[..2]).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(ref k) if k == "TAVILY_API_KEY"));

        let mut pairs = KEYS.to_vec();
        pairs[1] = ("GOOGLE_API_KEY", "   ");
        let err = load(&pairs).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Missing required environment variable: GOOGLE_API_KEY"
        );
    }

    #[test]
    fn test_invalid_numbers() {
        for (key, value) in [
            ("PLACES_RADIUS", "wide"),
            ("PLACES_RADIUS", "-5"),
            ("PLACES_TIMEOUT_SECS", "1.5"),
            ("MAX_ITERATIONS", "0"),
            ("WEB_SEARCH_MAX_RESULTS", "many"),
        ] {
            let mut pairs = KEYS.to_vec();
            pairs.push((key, value));
            let err = load(&pairs).unwrap_err();
            assert!(
                matches!(err, ConfigError::InvalidValue(ref k, _) if k == key),
                "{key}={value} gave {err:?}"
            );
        }
    }
}
