use crate::error::{GatewayError, GatewayResult};
use crate::extract::extract;
use crate::gemini::{GeminiClient, GenerationOptions};
use serde::Deserialize;
use std::collections::BTreeMap;
use tracing::{info, warn};

/// Body key naming the output language; never itself translated
pub const TARGET_LANGUAGE_KEY: &str = "target_language";

/// Product fields to localize, plus the language to localize into.
///
/// Deserializes from the flat request body: every key except
/// `target_language` is a field to translate.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "BTreeMap<String, String>")]
pub struct TranslationRequest {
    pub target_language: Option<String>,
    pub fields: BTreeMap<String, String>,
}

impl From<BTreeMap<String, String>> for TranslationRequest {
    fn from(mut body: BTreeMap<String, String>) -> Self {
        let target_language = body.remove(TARGET_LANGUAGE_KEY);
        Self {
            target_language,
            fields: body,
        }
    }
}

/// Build the localization prompt for a JSON payload of product fields
fn build_translation_prompt(target_language: &str, payload: &str) -> String {
    format!(
        r#"Act as an expert e-commerce content localizer. Translate the following product data into {}. Rules:
1. Use standard, high-quality industry terminology (e.g., 'Mouse' -> 'فأرة', 'Laptop' -> 'حاسوب محمول').
2. STRICTLY PRESERVE all brand names, model numbers, and technical specifications (e.g., 'LOGITECH', 'G502', '4K', 'SSD').
3. Do not transliterate common words if a standard translation exists.
Return ONLY a JSON object with the same keys and the translated values. Do not include any other text or formatting.

{}"#,
        target_language, payload
    )
}

/// Reject a translation whose keys differ from the fields sent
fn verify_key_set(
    original: &BTreeMap<String, String>,
    translated: &BTreeMap<String, String>,
) -> GatewayResult<()> {
    let missing: Vec<&str> = original
        .keys()
        .filter(|k| !translated.contains_key(*k))
        .map(String::as_str)
        .collect();
    let unexpected: Vec<&str> = translated
        .keys()
        .filter(|k| !original.contains_key(*k))
        .map(String::as_str)
        .collect();

    if missing.is_empty() && unexpected.is_empty() {
        return Ok(());
    }

    warn!(
        "Translation key set mismatch (missing: {:?}, unexpected: {:?})",
        missing, unexpected
    );
    Err(GatewayError::Backend(format!(
        "Translation failed: completion changed the key set (missing: {:?}, unexpected: {:?})",
        missing, unexpected
    )))
}

#[derive(Debug, Clone)]
pub struct LocalizationService {
    client: GeminiClient,
}

impl LocalizationService {
    pub fn new(client: GeminiClient) -> Self {
        Self { client }
    }

    /// Translate every field of `request` into its target language.
    ///
    /// The result has exactly the input's field keys. A completion that is
    /// not a flat JSON string map, or that adds or drops keys, is a backend
    /// failure.
    pub async fn translate(
        &self,
        request: TranslationRequest,
    ) -> GatewayResult<BTreeMap<String, String>> {
        let target_language = request
            .target_language
            .as_deref()
            .map(str::trim)
            .filter(|lang| !lang.is_empty())
            .ok_or_else(|| GatewayError::MissingParameter(TARGET_LANGUAGE_KEY.to_string()))?;

        if request.fields.is_empty() {
            return Ok(BTreeMap::new());
        }

        let payload = serde_json::to_string(&request.fields)
            .map_err(|e| GatewayError::Internal(format!("Failed to encode fields: {}", e)))?;
        let prompt = build_translation_prompt(target_language, &payload);

        info!(
            "Translating {} field(s) to {}",
            request.fields.len(),
            target_language
        );

        let completion = self
            .client
            .generate(&prompt, &GenerationOptions::json())
            .await?;

        let translated: BTreeMap<String, String> = extract(&completion)?;
        verify_key_set(&request.fields, &translated)?;

        Ok(translated)
    }
}
