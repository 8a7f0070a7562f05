use anyhow::{Context, Result};
use std::fmt;
use std::time::Duration;

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-flash-latest";
pub const DEFAULT_GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_CURRENCY_API_PRIMARY: &str =
    "https://cdn.jsdelivr.net/npm/@fawazahmed0/currency-api@latest/v1/currencies";
pub const DEFAULT_CURRENCY_API_FALLBACK: &str =
    "https://latest.currency-api.pages.dev/v1/currencies";
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Currency feed locations and the outbound timeout. Needs no secrets, so the
/// `quote` binary can load it on its own.
#[derive(Debug, Clone)]
pub struct FeedSettings {
    pub currency_api_primary: String,
    pub currency_api_fallback: String,
    pub http_timeout_secs: u64,
}

impl FeedSettings {
    pub fn from_env() -> Self {
        Self {
            currency_api_primary: std::env::var("CURRENCY_API_PRIMARY")
                .unwrap_or_else(|_| DEFAULT_CURRENCY_API_PRIMARY.to_string()),
            currency_api_fallback: std::env::var("CURRENCY_API_FALLBACK")
                .unwrap_or_else(|_| DEFAULT_CURRENCY_API_FALLBACK.to_string()),
            http_timeout_secs: std::env::var("HTTP_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|secs| *secs > 0)
                .unwrap_or(DEFAULT_HTTP_TIMEOUT_SECS),
        }
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}

#[derive(Clone)]
pub struct Config {
    // Gateway
    pub api_key: String,
    pub port: u16,

    // Gemini
    pub gemini_api_key: String,
    pub gemini_model: String,
    pub gemini_api_url: String,

    // Currency feeds
    pub currency_api_primary: String,
    pub currency_api_fallback: String,

    // Outbound HTTP
    pub http_timeout_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let feeds = FeedSettings::from_env();

        Ok(Self {
            // Gateway - shared secret checked against X-API-KEY
            api_key: std::env::var("API_KEY").context("API_KEY not set")?,
            port: std::env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(8000),

            // Gemini
            gemini_api_key: std::env::var("GEMINI_API_KEY")
                .context("GEMINI_API_KEY not set")?,
            gemini_model: std::env::var("GEMINI_MODEL")
                .unwrap_or_else(|_| DEFAULT_GEMINI_MODEL.to_string()),
            gemini_api_url: std::env::var("GEMINI_API_URL")
                .unwrap_or_else(|_| DEFAULT_GEMINI_API_URL.to_string()),

            // Currency feeds and outbound HTTP
            currency_api_primary: feeds.currency_api_primary,
            currency_api_fallback: feeds.currency_api_fallback,
            http_timeout_secs: feeds.http_timeout_secs,
        })
    }

    /// Upper bound applied to every outbound request
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}

// Secrets never reach logs
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &"<redacted>")
            .field("port", &self.port)
            .field("gemini_api_key", &"<redacted>")
            .field("gemini_model", &self.gemini_model)
            .field("gemini_api_url", &self.gemini_api_url)
            .field("currency_api_primary", &self.currency_api_primary)
            .field("currency_api_fallback", &self.currency_api_fallback)
            .field("http_timeout_secs", &self.http_timeout_secs)
            .finish()
    }
}
