use domain::error::ConfigError;
use dotenvy::dotenv;
use reqwest::Url;
use std::env;
use std::fmt;

pub const API_KEY_VAR: &str = "OPENAI_API_KEY";
pub const EMBEDDING_MODEL_VAR: &str = "OPENAI_EMBEDDING_MODEL";
pub const CHAT_MODEL_VAR: &str = "OPENAI_CHAT_MODEL";
pub const BASE_URL_VAR: &str = "OPENAI_BASE_URL";

pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-3-small";
pub const DEFAULT_CHAT_MODEL: &str = "gpt-4.1-mini";
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

#[derive(Clone)]
pub struct Config {
    pub api_key: String,
    pub embedding_model: String,
    pub chat_model: String,
    pub base_url: String,
}

impl Config {
    /// Read the process environment, after seeding it from `.env` if one
    /// exists. Variables already set win over the file.
    pub fn load() -> Result<Self, ConfigError> {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_blank = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let api_key = non_blank(API_KEY_VAR).ok_or(ConfigError::MissingVar { var: API_KEY_VAR })?;
        let base_url = non_blank(BASE_URL_VAR).unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let base_url = validate_base_url(base_url.trim_end_matches('/'))?;

        Ok(Self {
            api_key,
            embedding_model: non_blank(EMBEDDING_MODEL_VAR)
                .unwrap_or_else(|| DEFAULT_EMBEDDING_MODEL.to_string()),
            chat_model: non_blank(CHAT_MODEL_VAR).unwrap_or_else(|| DEFAULT_CHAT_MODEL.to_string()),
            base_url,
        })
    }
}

fn validate_base_url(raw: &str) -> Result<String, ConfigError> {
    let invalid = |reason: String| ConfigError::Invalid {
        var: BASE_URL_VAR,
        reason,
    };
    let url = Url::parse(raw).map_err(|e| invalid(format!("{raw:?} is not a URL: {e}")))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("expected an http(s) URL, got {raw:?}")));
    }
    if url.host_str().map_or(true, str::is_empty) {
        return Err(invalid(format!("{raw:?} has no host")));
    }
    Ok(raw.to_string())
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &"<redacted>")
            .field("embedding_model", &self.embedding_model)
            .field("chat_model", &self.chat_model)
            .field("base_url", &self.base_url)
            .finish()
    }
}
