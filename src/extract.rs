//! Structured-data extraction from free-text completions.
//!
//! Completion backends sometimes wrap JSON in Markdown code fences even when
//! told not to. Only the two conventions seen in practice are recognised, a
//! ```` ```json ```` opener (tag matched ASCII case-insensitively) and a bare
//! ```` ``` ```` opener, each applied once at the start and end of the text.
//! This is not a Markdown parser.

use serde::de::DeserializeOwned;
use thiserror::Error;

const FENCE: &str = "```";
const JSON_TAG: &str = "json";

/// A completion that could not be parsed as the expected structure.
#[derive(Debug, Error)]
#[error("Failed to parse completion as JSON: {message}")]
pub struct ExtractError {
    pub message: String,
    /// Text handed to the parser, after fence stripping
    pub text: String,
}

/// Remove a single surrounding code fence, if present, and trim whitespace.
pub fn strip_code_fence(raw: &str) -> &str {
    let text = raw.trim();

    let Some(rest) = text.strip_prefix(FENCE) else {
        return text;
    };

    let body = match rest.get(..JSON_TAG.len()) {
        Some(tag) if tag.eq_ignore_ascii_case(JSON_TAG) => &rest[JSON_TAG.len()..],
        _ => rest,
    };

    body.strip_suffix(FENCE).unwrap_or(body).trim()
}

/// Parse a completion into `T`, tolerating one surrounding code fence.
pub fn extract<T: DeserializeOwned>(raw: &str) -> Result<T, ExtractError> {
    let text = strip_code_fence(raw);

    serde_json::from_str(text).map_err(|e| ExtractError {
        message: e.to_string(),
        text: text.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::BTreeMap;

    type Fields = BTreeMap<String, String>;

    // ==================== Fence Stripping Tests ====================

    #[test]
    fn test_strip_json_fence() {
        let raw = "```json\n{\"title\": \"Mouse\"}\n```";
        assert_eq!(strip_code_fence(raw), "{\"title\": \"Mouse\"}");
    }

    #[test]
    fn test_strip_bare_fence() {
        let raw = "```\n{\"title\": \"Mouse\"}\n```";
        assert_eq!(strip_code_fence(raw), "{\"title\": \"Mouse\"}");
    }

    #[test]
    fn test_strip_json_fence_any_case() {
        for raw in [
            "```JSON\n{\"a\": \"b\"}\n```",
            "```Json\n{\"a\": \"b\"}\n```",
        ] {
            assert_eq!(strip_code_fence(raw), "{\"a\": \"b\"}", "{}", raw);
        }

        let fields: Fields = extract("```JSON\n{\"a\":\"b\"}\n```").expect("Should parse");
        assert_eq!(fields["a"], "b");
    }

    #[test]
    fn test_strip_leaves_clean_text_alone() {
        assert_eq!(strip_code_fence("  {\"a\": \"b\"}\n"), "{\"a\": \"b\"}");
    }

    #[test]
    fn test_strip_tolerates_missing_closing_fence() {
        let raw = "```json\n{\"a\": \"b\"}";
        assert_eq!(strip_code_fence(raw), "{\"a\": \"b\"}");
    }

    #[test]
    fn test_strip_ignores_fence_in_the_middle() {
        let raw = "Here you go:\n```json\n{}\n```";
        assert_eq!(strip_code_fence(raw), raw.trim());
    }

    // ==================== Extraction Tests ====================

    #[test]
    fn test_extract_fenced_arabic_translation() {
        let raw = "```json\n{\"title\": \"فأرة\"}\n```";
        let fields: Fields = extract(raw).expect("Should parse");

        assert_eq!(fields.len(), 1);
        assert_eq!(fields["title"], "فأرة");
    }

    #[test]
    fn test_extract_unfenced_json() {
        let fields: Fields = extract("{\"title\": \"Souris\", \"brand\": \"LOGITECH\"}")
            .expect("Should parse");
        assert_eq!(fields["title"], "Souris");
        assert_eq!(fields["brand"], "LOGITECH");
    }

    #[test]
    fn test_extract_failure_carries_offending_text() {
        let err = extract::<Fields>("```json\nSorry, I cannot help with that.\n```").unwrap_err();

        assert_eq!(err.text, "Sorry, I cannot help with that.");
        assert!(err.to_string().contains("Failed to parse completion as JSON"));
    }

    #[test]
    fn test_extract_empty_text_is_an_error() {
        assert!(extract::<Fields>("").is_err());
        assert!(extract::<Fields>("```json\n```").is_err());
    }

    #[test]
    fn test_extract_rejects_non_string_values() {
        let err = extract::<Fields>("{\"price\": 10}").unwrap_err();
        assert_eq!(err.text, "{\"price\": 10}");
    }

    #[test]
    fn test_extract_rejects_array() {
        assert!(extract::<Fields>("[\"a\", \"b\"]").is_err());
    }

    // ==================== Property Tests ====================

    proptest! {
        #[test]
        fn prop_extract_is_idempotent_on_clean_json(
            fields in proptest::collection::btree_map(".*", ".*", 0..8)
        ) {
            let clean = serde_json::to_string(&fields).unwrap();
            let first: Fields = extract(&clean).unwrap();
            let second: Fields = extract(&serde_json::to_string(&first).unwrap()).unwrap();

            prop_assert_eq!(&first, &fields);
            prop_assert_eq!(first, second);
        }

        #[test]
        fn prop_fenced_and_clean_json_extract_identically(
            fields in proptest::collection::btree_map("[a-z_]{1,12}", ".*", 0..8),
            annotated in any::<bool>()
        ) {
            let clean = serde_json::to_string(&fields).unwrap();
            let opener = if annotated { "```json" } else { "```" };
            let fenced = format!("{}\n{}\n```", opener, clean);

            let from_clean: Fields = extract(&clean).unwrap();
            let from_fenced: Fields = extract(&fenced).unwrap();
            prop_assert_eq!(from_clean, from_fenced);
        }
    }
}
