use crate::config::Config;
use anyhow::{bail, Context, Result};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Error)]
pub enum RateError {
    #[error("No exchange rate available for {from} to {to}")]
    NotFound { from: String, to: String },
}

/// Primary and fallback currency feeds, tried in that order.
///
/// Each base URL serves `<base>/<code>.json` shaped as
/// `{"date": "...", "<code>": {"<target>": <rate>, ...}}`.
#[derive(Debug, Clone)]
pub struct RateSource {
    pub primary: String,
    pub fallback: String,
}

impl RateSource {
    pub fn new(primary: impl Into<String>, fallback: impl Into<String>) -> Self {
        Self {
            primary: primary.into(),
            fallback: fallback.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.currency_api_primary.clone(),
            config.currency_api_fallback.clone(),
        )
    }
}

/// Build the feed URL for a lower-cased source currency
fn feed_url(base: &str, from: &str) -> String {
    format!("{}/{}.json", base.trim_end_matches('/'), from)
}

/// Pull `payload[from][to]` out of a feed response as a usable rate
pub fn rate_from_payload(payload: &Value, from: &str, to: &str) -> Result<f64> {
    let rates = payload
        .get(from)
        .with_context(|| format!("Feed has no rates for '{}'", from))?;

    let rate = rates
        .get(to)
        .with_context(|| format!("Feed has no '{}' rate under '{}'", to, from))?
        .as_f64()
        .with_context(|| format!("Rate for '{}' -> '{}' is not a number", from, to))?;

    if !rate.is_finite() || rate <= 0.0 {
        bail!("Rate for '{}' -> '{}' is not positive: {}", from, to, rate);
    }

    Ok(rate)
}

/// Resolves a single exchange rate from the configured feeds.
///
/// Any failure of the primary feed (transport error, non-2xx status,
/// malformed body, missing currency) falls through to the fallback. The two
/// lookups are sequential and neither is retried.
#[derive(Debug, Clone)]
pub struct RateFetcher {
    http: reqwest::Client,
    sources: RateSource,
}

impl RateFetcher {
    pub fn new(http: reqwest::Client, sources: RateSource) -> Self {
        Self { http, sources }
    }

    pub async fn fetch_rate(&self, from: &str, to: &str) -> Result<f64, RateError> {
        let from_code = from.to_lowercase();
        let to_code = to.to_lowercase();

        let attempts = [
            ("primary", self.sources.primary.as_str()),
            ("fallback", self.sources.fallback.as_str()),
        ];

        for (label, base) in attempts {
            match self.fetch_from_source(base, &from_code, &to_code).await {
                Ok(rate) => {
                    info!(
                        "Resolved {} -> {} rate {} from {} feed",
                        from_code, to_code, rate, label
                    );
                    return Ok(rate);
                }
                Err(e) => {
                    warn!(
                        "No {} -> {} rate from {} feed: {:#}",
                        from_code, to_code, label, e
                    );
                }
            }
        }

        Err(RateError::NotFound {
            from: from.to_uppercase(),
            to: to.to_uppercase(),
        })
    }

    async fn fetch_from_source(&self, base: &str, from: &str, to: &str) -> Result<f64> {
        let url = feed_url(base, from);
        debug!("Fetching currency feed {}", url);

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .context("Failed to send request to currency feed")?;

        if !response.status().is_success() {
            bail!("Currency feed returned {}", response.status());
        }

        let payload: Value = response
            .json()
            .await
            .context("Failed to parse currency feed response")?;

        rate_from_payload(&payload, from, to)
    }
}
