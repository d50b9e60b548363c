use crate::delivery::DeliveryConfig;
use crate::llm_adapter::{DEFAULT_OLLAMA_MODEL, DEFAULT_OLLAMA_URL};
use crate::sources::news_api::DEFAULT_BASE_URL;
use crate::types::{FetchConfig, NewsError, Result};
use std::collections::HashMap;
use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

pub const DEFAULT_BIND: &str = "0.0.0.0:8000";
pub const DEFAULT_GROUP_RECORD: &str = "messages.json";
pub const DEFAULT_DELIVERY_PROGRAM: &str = "node";
pub const DEFAULT_DELIVERY_ARGS: &str = "bot.js";

/// Runtime settings, read from the environment (and `.env`, if present)
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub news_api_key: Option<String>,
    pub news_api_base_url: String,
    pub ollama_base_url: String,
    pub ollama_model: String,
    pub ollama_temperature: Option<f32>,
    pub bind: SocketAddr,
    pub group_record: PathBuf,
    pub delivery: DeliveryConfig,
    pub http_timeout_seconds: u64,
    pub llm_timeout_seconds: u64,
}

impl AppConfig {
    /// Load `.env` into the process environment, then read the settings.
    pub fn load() -> Result<Self> {
        // A missing .env file is fine; the environment may already be set.
        let _ = dotenvy::dotenv();
        Self::from_vars(env::vars().collect())
    }

    pub fn from_vars(vars: HashMap<String, String>) -> Result<Self> {
        let get = |key: &str| {
            vars.get(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let bind_raw = get("NEWS_DIGEST_BIND").unwrap_or_else(|| DEFAULT_BIND.to_string());
        let bind = bind_raw.parse::<SocketAddr>().map_err(|e| {
            NewsError::General(format!("NEWS_DIGEST_BIND '{}' is not an address: {}", bind_raw, e))
        })?;

        let delivery_args = get("NEWS_DIGEST_DELIVERY_ARGS")
            .unwrap_or_else(|| DEFAULT_DELIVERY_ARGS.to_string())
            .split_whitespace()
            .map(str::to_string)
            .collect();

        let ollama_temperature = get("OLLAMA_TEMPERATURE")
            .map(|raw| {
                raw.parse::<f32>().map_err(|e| {
                    NewsError::General(format!("OLLAMA_TEMPERATURE '{}' is not a number: {}", raw, e))
                })
            })
            .transpose()?;

        Ok(Self {
            news_api_key: get("NEWS_API_KEY"),
            news_api_base_url: get("NEWS_API_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            ollama_base_url: get("OLLAMA_BASE_URL").unwrap_or_else(|| DEFAULT_OLLAMA_URL.to_string()),
            ollama_model: get("OLLAMA_MODEL").unwrap_or_else(|| DEFAULT_OLLAMA_MODEL.to_string()),
            ollama_temperature,
            bind,
            group_record: PathBuf::from(
                get("NEWS_DIGEST_GROUP_RECORD").unwrap_or_else(|| DEFAULT_GROUP_RECORD.to_string()),
            ),
            delivery: DeliveryConfig::new(
                get("NEWS_DIGEST_DELIVERY_PROGRAM")
                    .unwrap_or_else(|| DEFAULT_DELIVERY_PROGRAM.to_string()),
                delivery_args,
            ),
            http_timeout_seconds: parse_seconds(get("NEWS_DIGEST_HTTP_TIMEOUT_SECS"), 30)?,
            llm_timeout_seconds: parse_seconds(get("NEWS_DIGEST_LLM_TIMEOUT_SECS"), 300)?,
        })
    }

    /// HTTP settings for the article source
    pub fn source_fetch_config(&self) -> FetchConfig {
        FetchConfig {
            timeout_seconds: self.http_timeout_seconds,
            ..FetchConfig::default()
        }
    }

    /// HTTP settings for the text generator, which is allowed to be slow
    pub fn llm_fetch_config(&self) -> FetchConfig {
        FetchConfig {
            timeout_seconds: self.llm_timeout_seconds,
            ..FetchConfig::default()
        }
    }
}

fn parse_seconds(raw: Option<String>, default: u64) -> Result<u64> {
    match raw {
        None => Ok(default),
        Some(value) => value
            .parse::<u64>()
            .map_err(|e| NewsError::General(format!("invalid timeout '{}': {}", value, e))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = AppConfig::from_vars(HashMap::new()).unwrap();
        assert_eq!(config.news_api_key, None);
        assert_eq!(config.news_api_base_url, "https://newsapi.org");
        assert_eq!(config.ollama_base_url, "http://localhost:11434");
        assert_eq!(config.ollama_model, "mistral");
        assert_eq!(config.ollama_temperature, None);
        assert_eq!(config.bind.port(), 8000);
        assert_eq!(config.group_record, PathBuf::from("messages.json"));
        assert_eq!(
            config.delivery,
            DeliveryConfig::new("node", vec!["bot.js".to_string()])
        );
        assert_eq!(config.source_fetch_config().timeout_seconds, 30);
        assert_eq!(config.llm_fetch_config().timeout_seconds, 300);
    }

    #[test]
    fn environment_overrides_defaults() {
        let config = AppConfig::from_vars(vars(&[
            ("NEWS_API_KEY", " abc "),
            ("OLLAMA_MODEL", "llama3"),
            ("OLLAMA_TEMPERATURE", "0.2"),
            ("NEWS_DIGEST_BIND", "127.0.0.1:9000"),
            ("NEWS_DIGEST_DELIVERY_ARGS", "bot.js --send"),
            ("NEWS_DIGEST_HTTP_TIMEOUT_SECS", "5"),
        ]))
        .unwrap();

        assert_eq!(config.news_api_key.as_deref(), Some("abc"));
        assert_eq!(config.ollama_model, "llama3");
        assert_eq!(config.ollama_temperature, Some(0.2));
        assert_eq!(config.bind.to_string(), "127.0.0.1:9000");
        assert_eq!(config.delivery.args, vec!["bot.js", "--send"]);
        assert_eq!(config.http_timeout_seconds, 5);
    }

    #[test]
    fn blank_api_key_counts_as_missing() {
        let config = AppConfig::from_vars(vars(&[("NEWS_API_KEY", "  ")])).unwrap();
        assert_eq!(config.news_api_key, None);
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(AppConfig::from_vars(vars(&[("NEWS_DIGEST_BIND", "nowhere")])).is_err());
        assert!(AppConfig::from_vars(vars(&[("NEWS_DIGEST_LLM_TIMEOUT_SECS", "soon")])).is_err());
        assert!(AppConfig::from_vars(vars(&[("OLLAMA_TEMPERATURE", "warm")])).is_err());
    }
}
