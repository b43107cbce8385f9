#![warn(missing_docs)]
//! # design-review-core
//!
//! ## Purpose
//! Defines the pure data model shared across the `design-review` workspace.
//!
//! ## Responsibilities
//! - Represent the analyze request body and the opaque analysis result.
//! - Encode binary file contents as base64 data URLs for JSON transport.
//! - Produce log-safe summaries of data URLs.
//!
//! ## Data flow
//! Upload code reads file bytes -> [`encode_data_url`] -> [`AnalysisRequest`]
//! serialized by the transport. Successful responses yield a
//! [`DesignAnalysis`] that flows unchanged into UI state.
//!
//! ## Ownership and lifetimes
//! Requests and analyses own their buffers (`String`, `serde_json::Value`) so
//! they can cross async suspension points without borrow coupling.
//!
//! ## Error model
//! Malformed data URLs and JSON codec failures return [`CoreError`].
//!
//! ## Security and privacy notes
//! Data URLs carry the full design image. Log call sites must use
//! [`summarize_data_url`] instead of the raw string.
//!
//! ## Example
//! ```rust
//! use design_review_core::{decode_data_url, encode_data_url};
//!
//! let url = encode_data_url("image/png", &[1, 2, 3]);
//! assert_eq!(url, "data:image/png;base64,AQID");
//! let decoded = decode_data_url(&url).unwrap();
//! assert_eq!(decoded.media_type, "image/png");
//! assert_eq!(decoded.bytes, vec![1, 2, 3]);
//! ```

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Path of the analysis endpoint relative to the service base URL.
pub const ANALYZE_PATH: &str = "/api/analyze";

/// Media type used when a file carries no type information.
pub const DEFAULT_MEDIA_TYPE: &str = "application/octet-stream";

const DATA_URL_SCHEME: &str = "data:";
const BASE64_MARKER: &str = ";base64,";

/// JSON body posted to the analysis endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    /// Design image encoded as a base64 data URL.
    pub image: String,
}

impl AnalysisRequest {
    /// Wraps an already-encoded data URL.
    pub fn new(image: impl Into<String>) -> Self {
        Self {
            image: image.into(),
        }
    }

    /// Serializes the request to compact JSON bytes.
    ///
    /// # Errors
    /// Returns [`CoreError::Codec`] when JSON serialization fails.
    pub fn to_json_bytes(&self) -> Result<Vec<u8>, CoreError> {
        serde_json::to_vec(self).map_err(CoreError::Codec)
    }

    /// Deserializes a request from JSON bytes.
    ///
    /// # Errors
    /// Returns [`CoreError::Codec`] when JSON decoding fails.
    pub fn from_json_bytes(raw: &[u8]) -> Result<Self, CoreError> {
        serde_json::from_slice(raw).map_err(CoreError::Codec)
    }
}

/// Structured design feedback returned by the analysis endpoint.
///
/// The shape is owned by the endpoint contract, so the value is carried
/// verbatim and never reinterpreted by this workspace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DesignAnalysis(Value);

impl DesignAnalysis {
    /// Wraps a raw JSON value.
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// Borrows the underlying JSON value.
    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// Consumes the wrapper and returns the JSON value.
    pub fn into_value(self) -> Value {
        self.0
    }

    /// Renders the analysis as indented JSON for display.
    ///
    /// # Errors
    /// Returns [`CoreError::Codec`] when serialization fails.
    pub fn to_pretty_json(&self) -> Result<String, CoreError> {
        serde_json::to_string_pretty(&self.0).map_err(CoreError::Codec)
    }
}

impl From<Value> for DesignAnalysis {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

/// Decoded view of a base64 data URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUrl {
    /// Declared media type (may be empty when the URL omits it).
    pub media_type: String,
    /// Decoded payload bytes.
    pub bytes: Vec<u8>,
}

/// Encodes bytes as `data:<media_type>;base64,<payload>`.
///
/// A blank media type is replaced with [`DEFAULT_MEDIA_TYPE`].
pub fn encode_data_url(media_type: &str, bytes: &[u8]) -> String {
    let media_type = media_type.trim();
    let media_type = if media_type.is_empty() {
        DEFAULT_MEDIA_TYPE
    } else {
        media_type
    };

    let payload = STANDARD.encode(bytes);
    let mut url = String::with_capacity(
        DATA_URL_SCHEME.len() + media_type.len() + BASE64_MARKER.len() + payload.len(),
    );
    url.push_str(DATA_URL_SCHEME);
    url.push_str(media_type);
    url.push_str(BASE64_MARKER);
    url.push_str(&payload);
    url
}

/// Decodes a base64 data URL produced by [`encode_data_url`].
///
/// # Errors
/// Returns [`CoreError::InvalidDataUrl`] when the scheme or base64 marker is
/// missing and [`CoreError::Base64`] when the payload is not valid base64.
pub fn decode_data_url(url: &str) -> Result<DataUrl, CoreError> {
    let (media_type, payload) = split_data_url(url)?;
    let bytes = STANDARD.decode(payload)?;
    Ok(DataUrl {
        media_type: media_type.to_string(),
        bytes,
    })
}

/// Returns a log-safe description of a data URL without its payload.
///
/// Strings that are not base64 data URLs are described by length only.
pub fn summarize_data_url(url: &str) -> String {
    match split_data_url(url) {
        Ok((media_type, payload)) => {
            format!("media_type={media_type} base64_len={}", payload.len())
        }
        Err(_) => format!("opaque_len={}", url.len()),
    }
}

fn split_data_url(url: &str) -> Result<(&str, &str), CoreError> {
    let rest = url
        .strip_prefix(DATA_URL_SCHEME)
        .ok_or_else(|| CoreError::InvalidDataUrl("missing data: scheme".to_string()))?;

    rest.split_once(BASE64_MARKER)
        .ok_or_else(|| CoreError::InvalidDataUrl("missing ;base64, marker".to_string()))
}

/// Error type for core model and codec failures.
#[derive(Debug, Error)]
pub enum CoreError {
    /// String is not a base64 data URL.
    #[error("invalid data url: {0}")]
    InvalidDataUrl(String),
    /// Data URL payload is not valid base64.
    #[error("invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),
    /// JSON encoding/decoding error.
    #[error("payload codec failure: {0}")]
    Codec(#[from] serde_json::Error),
}
