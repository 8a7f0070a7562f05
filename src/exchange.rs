use crate::error::{GatewayError, GatewayResult};
use crate::rates::RateFetcher;
use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;

/// Result of a single conversion. Built per request, never cached.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExchangeQuote {
    pub from: String,
    pub to: String,
    pub amount: f64,
    pub rate: f64,
    pub converted_amount: f64,
}

/// Currency codes end up in the feed URL path, so only short alphanumerics pass
fn currency_code_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[A-Za-z0-9]{1,16}$").expect("valid currency regex"))
}

fn validate_code(field: &str, code: &str) -> GatewayResult<()> {
    if currency_code_pattern().is_match(code) {
        Ok(())
    } else {
        Err(GatewayError::Validation(format!(
            "{} must be an alphanumeric currency code, got '{}'",
            field, code
        )))
    }
}

fn validate_amount(amount: f64) -> GatewayResult<()> {
    if amount.is_finite() && amount >= 0.0 {
        Ok(())
    } else {
        Err(GatewayError::Validation(format!(
            "amount must be a finite, non-negative number, got {}",
            amount
        )))
    }
}

#[derive(Debug, Clone)]
pub struct ExchangeService {
    fetcher: RateFetcher,
}

impl ExchangeService {
    pub fn new(fetcher: RateFetcher) -> Self {
        Self { fetcher }
    }

    /// Convert `amount` of `from` into `to` at the first available feed rate.
    ///
    /// Inputs are validated before any feed is contacted. The converted amount
    /// is the raw `amount * rate` product with no currency rounding.
    pub async fn convert(&self, from: &str, to: &str, amount: f64) -> GatewayResult<ExchangeQuote> {
        validate_code("from_currency", from)?;
        validate_code("to_currency", to)?;
        validate_amount(amount)?;

        let rate = self.fetcher.fetch_rate(from, to).await?;

        let converted_amount = amount * rate;
        if !converted_amount.is_finite() {
            return Err(GatewayError::Validation(format!(
                "amount too large for conversion: {} at rate {}",
                amount, rate
            )));
        }

        Ok(ExchangeQuote {
            from: from.to_uppercase(),
            to: to.to_uppercase(),
            amount,
            rate,
            converted_amount,
        })
    }
}
