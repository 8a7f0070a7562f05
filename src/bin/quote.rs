//! Quote binary - resolves a single currency conversion from the command line
//!
//! Usage:
//!   cargo run --bin quote -- USD EUR 100
//!
//! No API keys are needed; only the public currency feeds are contacted.
//!
//! Optional:
//! - CURRENCY_API_PRIMARY (defaults to the jsDelivr mirror)
//! - CURRENCY_API_FALLBACK (defaults to the pages.dev mirror)
//! - HTTP_TIMEOUT_SECS (defaults to 30)

use anyhow::{bail, Context, Result};
use product_gateway::config::FeedSettings;
use product_gateway::exchange::ExchangeService;
use product_gateway::rates::{RateFetcher, RateSource};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("product_gateway=warn".parse()?)
                .add_directive("quote=info".parse()?),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() != 4 {
        bail!("Usage: quote <FROM> <TO> <AMOUNT>");
    }

    let amount: f64 = args[3]
        .parse()
        .with_context(|| format!("Invalid amount: {}", args[3]))?;

    // Feed settings only (no gateway or Gemini keys required)
    let feeds = FeedSettings::from_env();
    let http = reqwest::Client::builder()
        .timeout(feeds.http_timeout())
        .build()
        .context("Failed to build HTTP client")?;

    let service = ExchangeService::new(RateFetcher::new(
        http,
        RateSource::new(feeds.currency_api_primary, feeds.currency_api_fallback),
    ));

    info!("Quoting {} {} in {}", amount, args[1], args[2]);
    let quote = service.convert(&args[1], &args[2], amount).await?;

    println!("{}", serde_json::to_string_pretty(&quote)?);
    Ok(())
}
