use crate::categories::CategoryRegistry;
use crate::error::{GatewayError, GatewayResult};
use crate::gemini::{GeminiClient, GenerationOptions};
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use tracing::info;

pub const DEFAULT_MAX_TOKENS: u32 = 512;
pub const DEFAULT_TEMPERATURE: f32 = 0.7;
pub const DEFAULT_OUTPUT_FORMAT: &str = "paragraph";

/// Sampling temperatures the backend accepts
pub const TEMPERATURE_RANGE: RangeInclusive<f32> = 0.0..=2.0;

fn default_max_tokens() -> u32 {
    DEFAULT_MAX_TOKENS
}

fn default_temperature() -> f32 {
    DEFAULT_TEMPERATURE
}

fn default_output_format() -> String {
    DEFAULT_OUTPUT_FORMAT.to_string()
}

/// Request body for `POST /v1/completions`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CompletionRequest {
    pub product_name: String,
    pub product_category: String,
    #[serde(default)]
    pub small_details: Option<String>,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_output_format")]
    pub output_format: String,
    /// Approximate character budget; zero means no budget
    #[serde(default)]
    pub max_chars: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionResponse {
    pub text: String,
}

/// Check everything that can be rejected without calling the backend.
/// Returns the category's display label.
fn validate(request: &CompletionRequest) -> GatewayResult<&'static str> {
    let label = CategoryRegistry::get()
        .label(&request.product_category)
        .ok_or_else(|| GatewayError::InvalidCategory(request.product_category.clone()))?;

    if request.product_name.trim().is_empty() {
        return Err(GatewayError::Validation(
            "product_name must not be empty".to_string(),
        ));
    }
    if request.max_tokens == 0 {
        return Err(GatewayError::Validation(
            "max_tokens must be at least 1".to_string(),
        ));
    }
    if !TEMPERATURE_RANGE.contains(&request.temperature) {
        return Err(GatewayError::Validation(format!(
            "temperature must be between {} and {}, got {}",
            TEMPERATURE_RANGE.start(),
            TEMPERATURE_RANGE.end(),
            request.temperature
        )));
    }

    Ok(label)
}

/// Build the description prompt, one instruction per line
fn build_description_prompt(request: &CompletionRequest, category_label: &str) -> String {
    let mut parts = vec![
        format!(
            "Generate a creative product description for '{}'.",
            request.product_name
        ),
        format!("Category: {}", category_label),
    ];

    if let Some(details) = request.small_details.as_deref().filter(|d| !d.is_empty()) {
        parts.push(format!("Details: {}", details));
    }

    if let Some(max_chars) = request.max_chars.filter(|n| *n > 0) {
        parts.push(format!(
            "Limit the response to approximately {} characters.",
            max_chars
        ));
    }

    parts.push(format!("Format the output as a {}.", request.output_format));

    parts.join("\n")
}

#[derive(Debug, Clone)]
pub struct DescriptionService {
    client: GeminiClient,
}

impl DescriptionService {
    pub fn new(client: GeminiClient) -> Self {
        Self { client }
    }

    /// Generate a free-text product description. The completion is returned
    /// exactly as the backend produced it.
    pub async fn generate(&self, request: &CompletionRequest) -> GatewayResult<String> {
        let label = validate(request)?;
        let prompt = build_description_prompt(request, label);

        info!(
            "Generating {} description for category {}",
            request.output_format, request.product_category
        );

        let options = GenerationOptions {
            temperature: Some(request.temperature),
            max_output_tokens: Some(request.max_tokens),
            response_mime_type: None,
        };

        Ok(self.client.generate(&prompt, &options).await?)
    }
}
