#![warn(missing_docs)]
//! # design-review-analysis-contract
//!
//! ## Purpose
//! Defines the analysis endpoint response contract and the client-side checks
//! applied to it.
//!
//! ## Responsibilities
//! - Recognize JSON content types.
//! - Decode response bodies without assuming the analysis shape.
//! - Extract the provider's error message or a status-based fallback.
//! - Reject successful responses that carry no analysis.
//!
//! ## Data flow
//! Raw HTTP body -> [`parse_response_body`] -> [`AnalyzeResponseBody`] ->
//! [`AnalyzeResponseBody::into_analysis`] or
//! [`AnalyzeResponseBody::server_error_message`].
//!
//! ## Ownership and lifetimes
//! Parsed values are owned so they outlive the transient network buffer.
//!
//! ## Error model
//! Invalid JSON and missing analysis payloads return
//! [`AnalysisContractError`].
//!
//! ## Security and privacy notes
//! Provider error messages are surfaced verbatim to the user; callers should
//! redact them before logging.

use design_review_core::DesignAnalysis;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Media type required on analysis responses.
pub const JSON_MEDIA_TYPE: &str = "application/json";

/// Decoded analysis endpoint body prior to classification.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalyzeResponseBody {
    /// Analysis payload present on success.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis: Option<Value>,
    /// Error payload present on failure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<Value>,
}

impl AnalyzeResponseBody {
    /// Picks the known fields out of any JSON value.
    ///
    /// Non-object bodies yield an empty body, so they are later reported as
    /// missing analysis or a generic HTTP failure.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(mut fields) => Self {
                analysis: fields.remove("analysis"),
                error: fields.remove("error"),
            },
            _ => Self::default(),
        }
    }

    /// Message to show for a non-2xx response.
    ///
    /// A non-empty string `error` field is returned verbatim; anything else
    /// falls back to `HTTP error! status: <status>`.
    pub fn server_error_message(&self, status: u16) -> String {
        match &self.error {
            Some(Value::String(message)) if !message.is_empty() => message.clone(),
            _ => format!("HTTP error! status: {status}"),
        }
    }

    /// Extracts the analysis from a successful response.
    ///
    /// # Errors
    /// Returns [`AnalysisContractError::MissingAnalysis`] when the field is
    /// absent or holds an empty scalar (`null`, `false`, `0`, `""`).
    pub fn into_analysis(self) -> Result<DesignAnalysis, AnalysisContractError> {
        match self.analysis {
            Some(value) if !is_empty_scalar(&value) => Ok(DesignAnalysis::new(value)),
            _ => Err(AnalysisContractError::MissingAnalysis),
        }
    }
}

/// Parses a raw response body.
///
/// # Errors
/// Returns [`AnalysisContractError::Decode`] when the body is not JSON.
pub fn parse_response_body(raw: &[u8]) -> Result<AnalyzeResponseBody, AnalysisContractError> {
    let value: Value = serde_json::from_slice(raw)?;
    Ok(AnalyzeResponseBody::from_value(value))
}

/// Returns `true` when a `Content-Type` header value declares JSON.
///
/// Parameters such as `charset` are allowed and the comparison ignores ASCII
/// case. A missing header is never JSON.
pub fn is_json_content_type(content_type: Option<&str>) -> bool {
    content_type
        .map(|value| value.to_ascii_lowercase().contains(JSON_MEDIA_TYPE))
        .unwrap_or(false)
}

fn is_empty_scalar(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(flag) => !flag,
        Value::Number(number) => number.as_f64() == Some(0.0),
        Value::String(text) => text.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}

/// Analysis contract errors.
#[derive(Debug, Error)]
pub enum AnalysisContractError {
    /// JSON decode failure.
    #[error("analysis decode failure: {0}")]
    Decode(#[from] serde_json::Error),
    /// Successful response carried no analysis.
    #[error("analysis payload is missing")]
    MissingAnalysis,
}

#[cfg(test)]
mod tests {
    //! Unit tests for body classification helpers.

    use serde_json::json;

    use super::*;

    #[test]
    fn empty_scalars_count_as_missing_analysis() {
        for value in [json!(null), json!(false), json!(0), json!(""), json!(0.0)] {
            let body = AnalyzeResponseBody {
                analysis: Some(value.clone()),
                error: None,
            };
            assert!(
                matches!(body.into_analysis(), Err(AnalysisContractError::MissingAnalysis)),
                "{value} should be treated as missing"
            );
        }
    }

    #[test]
    fn empty_containers_are_real_analyses() {
        let body = AnalyzeResponseBody {
            analysis: Some(json!({})),
            error: None,
        };
        assert_eq!(body.into_analysis().unwrap().as_value(), &json!({}));
    }

    #[test]
    fn blank_or_non_string_errors_use_status_fallback() {
        let blank = AnalyzeResponseBody::from_value(json!({"error": ""}));
        assert_eq!(blank.server_error_message(502), "HTTP error! status: 502");

        let structured = AnalyzeResponseBody::from_value(json!({"error": {"code": 7}}));
        assert_eq!(structured.server_error_message(400), "HTTP error! status: 400");
    }
}
