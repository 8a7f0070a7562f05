//! HTTP boundary: routes, API-key middleware and request handlers.

use crate::config::Config;
use crate::description::{CompletionRequest, CompletionResponse, DescriptionService};
use crate::error::{GatewayError, GatewayResult};
use crate::exchange::{ExchangeQuote, ExchangeService};
use crate::gemini::GeminiClient;
use crate::localization::{LocalizationService, TranslationRequest};
use crate::rates::{RateFetcher, RateSource};
use crate::security::{CredentialGate, API_KEY_HEADER};
use anyhow::{Context, Result};
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, Request, State,
    },
    middleware::{self, Next},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::warn;

const DOCS_PAGE: &str = include_str!("../static/index.html");

/// Everything a request handler needs. Read-only after startup.
#[derive(Clone)]
pub struct AppState {
    pub gate: CredentialGate,
    pub localization: LocalizationService,
    pub description: DescriptionService,
    pub exchange: ExchangeService,
}

impl AppState {
    /// Wire every service onto one shared HTTP client
    pub fn from_config(config: &Config) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.http_timeout())
            .build()
            .context("Failed to build HTTP client")?;

        let gemini = GeminiClient::from_config(http.clone(), config);
        let fetcher = RateFetcher::new(http, RateSource::from_config(config));

        Ok(Self {
            gate: CredentialGate::new(config.api_key.clone()),
            localization: LocalizationService::new(gemini.clone()),
            description: DescriptionService::new(gemini),
            exchange: ExchangeService::new(fetcher),
        })
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    let protected = Router::new()
        .route("/translate", post(translate))
        .route("/exchange", get(exchange))
        .route("/v1/completions", post(completions))
        .route("/ready", get(ready))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_api_key,
        ));

    Router::new()
        .route("/", get(docs))
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Runs before body or query extraction, so a denied caller never reaches
/// a service.
async fn require_api_key(
    State(state): State<Arc<AppState>>,
    req: Request,
    next: Next,
) -> Response {
    let presented = req
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|value| value.to_str().ok());

    if !state.gate.check(presented) {
        warn!(
            "Rejected {} {} ({} API key)",
            req.method(),
            req.uri().path(),
            if presented.is_some() { "invalid" } else { "missing" }
        );
        return GatewayError::AccessDenied.into_response();
    }

    next.run(req).await
}

async fn docs() -> Html<&'static str> {
    Html(DOCS_PAGE)
}

async fn ready() -> Html<&'static str> {
    Html("200 OK")
}

async fn translate(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<TranslationRequest>, JsonRejection>,
) -> GatewayResult<Json<BTreeMap<String, String>>> {
    let Json(request) = payload.map_err(|e| GatewayError::Validation(e.body_text()))?;
    let translated = state.localization.translate(request).await?;
    Ok(Json(translated))
}

#[derive(Debug, Deserialize)]
struct ExchangeParams {
    from_currency: String,
    to_currency: String,
    amount: f64,
}

async fn exchange(
    State(state): State<Arc<AppState>>,
    params: Result<Query<ExchangeParams>, QueryRejection>,
) -> GatewayResult<Json<ExchangeQuote>> {
    let Query(params) = params.map_err(|e| GatewayError::Validation(e.body_text()))?;
    let quote = state
        .exchange
        .convert(&params.from_currency, &params.to_currency, params.amount)
        .await?;
    Ok(Json(quote))
}

async fn completions(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CompletionRequest>, JsonRejection>,
) -> GatewayResult<Json<CompletionResponse>> {
    let Json(request) = payload.map_err(|e| GatewayError::Validation(e.body_text()))?;
    let text = state.description.generate(&request).await?;
    Ok(Json(CompletionResponse { text }))
}
