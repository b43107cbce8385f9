#![warn(missing_docs)]
//! # design-review-transport
//!
//! ## Purpose
//! Sends encoded designs to the analysis endpoint and classifies every outcome
//! into a tagged result.
//!
//! ## Responsibilities
//! - Resolve the `/api/analyze` endpoint from a base URL.
//! - Abstract the HTTP exchange behind [`AnalysisTransport`].
//! - Provide a `reqwest` implementation that separates unreachable servers
//!   from other transport failures.
//! - Classify responses in a fixed order: content type, body decode, HTTP
//!   status, analysis presence.
//!
//! ## Data flow
//! Data URL -> [`AnalysisClient::analyze`] -> [`AnalysisTransport::post_json`]
//! -> [`TransportResponse`] -> [`classify_response`] -> [`DesignAnalysis`] or
//! [`AnalysisError`].
//!
//! ## Ownership and lifetimes
//! Requests and responses are owned byte buffers so no borrow crosses the
//! network await point.
//!
//! ## Error model
//! Endpoint configuration problems return [`ClientError`]. Each analysis
//! attempt returns [`AnalysisError`], which carries both a [`ErrorKind`] for
//! observability and a user-facing message.
//!
//! ## Security and privacy notes
//! Only data URL summaries are logged; the image payload never reaches logs.

use std::sync::Arc;

use async_trait::async_trait;
use design_review_analysis_contract::{
    AnalysisContractError, is_json_content_type, parse_response_body,
};
use design_review_core::{ANALYZE_PATH, AnalysisRequest, DesignAnalysis, summarize_data_url};
use reqwest::header::CONTENT_TYPE;
use thiserror::Error;
use tracing::{debug, info};
use url::Url;

/// Message stored when the analysis endpoint cannot be reached.
pub const NETWORK_ERROR_MESSAGE: &str = "Network error: Could not connect to the server";

/// Message stored when a response is not declared as JSON.
pub const NON_JSON_RESPONSE_MESSAGE: &str = "Server returned non-JSON response";

/// Message stored when a JSON response body cannot be decoded.
pub const MALFORMED_JSON_MESSAGE: &str = "Server returned malformed JSON";

/// Message stored when a successful response carries no analysis.
pub const MISSING_ANALYSIS_MESSAGE: &str = "No analysis data received";

/// Message stored for failures that fit no other category.
pub const UNKNOWN_ERROR_MESSAGE: &str = "Failed to analyze design. Please try again.";

/// Raw HTTP response handed back by a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    /// HTTP status code.
    pub status: u16,
    /// `Content-Type` header value, if present and valid UTF-8.
    pub content_type: Option<String>,
    /// Full response body; left empty when the content type is not JSON.
    pub body: Vec<u8>,
}

impl TransportResponse {
    /// Returns `true` for 2xx statuses.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Abstract HTTP exchange used by [`AnalysisClient`].
#[async_trait]
pub trait AnalysisTransport: Send + Sync {
    /// Posts a JSON body and returns the complete response.
    ///
    /// # Errors
    /// Returns [`TransportError::Connect`] when the server cannot be reached and
    /// [`TransportError::Other`] for any other transport failure.
    async fn post_json(&self, url: &Url, body: Vec<u8>)
    -> Result<TransportResponse, TransportError>;
}

/// `reqwest`-backed transport.
#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Creates a transport with a default `reqwest` client.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a transport around a preconfigured client.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl AnalysisTransport for HttpTransport {
    async fn post_json(
        &self,
        url: &Url,
        body: Vec<u8>,
    ) -> Result<TransportResponse, TransportError> {
        let response = self
            .client
            .post(url.clone())
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(transport_error_from_reqwest)?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        if !is_json_content_type(content_type.as_deref()) {
            return Ok(TransportResponse {
                status,
                content_type,
                body: Vec::new(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(transport_error_from_reqwest)?
            .to_vec();

        Ok(TransportResponse {
            status,
            content_type,
            body,
        })
    }
}

fn transport_error_from_reqwest(error: reqwest::Error) -> TransportError {
    if error.is_connect() {
        TransportError::Connect(error.to_string())
    } else {
        TransportError::Other(error.to_string())
    }
}

/// Client that posts designs to the analysis endpoint.
#[derive(Clone)]
pub struct AnalysisClient {
    endpoint: Url,
    transport: Arc<dyn AnalysisTransport>,
}

impl AnalysisClient {
    /// Creates a client for `<base_url>/api/analyze`.
    ///
    /// # Errors
    /// Returns [`ClientError::InvalidEndpoint`] when the base URL does not parse
    /// or is not `http`/`https`.
    pub fn new(base_url: &str, transport: Arc<dyn AnalysisTransport>) -> Result<Self, ClientError> {
        let endpoint = analyze_endpoint(base_url)?;
        Ok(Self {
            endpoint,
            transport,
        })
    }

    /// Returns the resolved analysis endpoint.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Submits one encoded design and classifies the outcome.
    ///
    /// # Errors
    /// Returns the [`AnalysisError`] variant matching the first failed check.
    pub async fn analyze(&self, image: String) -> Result<DesignAnalysis, AnalysisError> {
        let summary = summarize_data_url(&image);
        let body = AnalysisRequest::new(image)
            .to_json_bytes()
            .map_err(|error| AnalysisError::Unknown(error.to_string()))?;

        info!(endpoint = %self.endpoint, image = %summary, "sending analysis request");
        let response = self
            .transport
            .post_json(&self.endpoint, body)
            .await
            .map_err(|error| classify_transport_error(&error))?;

        info!(status = response.status, "analysis response received");
        let analysis = classify_response(response)?;
        info!("analysis data received");
        Ok(analysis)
    }
}

/// Resolves the analysis endpoint from a service base URL.
///
/// # Errors
/// Returns [`ClientError::InvalidEndpoint`] for unparsable or non-HTTP URLs.
pub fn analyze_endpoint(base_url: &str) -> Result<Url, ClientError> {
    let base = Url::parse(base_url)
        .map_err(|error| ClientError::InvalidEndpoint(format!("invalid base url: {error}")))?;

    if !matches!(base.scheme(), "http" | "https") {
        return Err(ClientError::InvalidEndpoint(format!(
            "unsupported scheme {}",
            base.scheme()
        )));
    }

    base.join(ANALYZE_PATH)
        .map_err(|error| ClientError::InvalidEndpoint(format!("cannot resolve endpoint: {error}")))
}

/// Maps a transport failure to its analysis error.
pub fn classify_transport_error(error: &TransportError) -> AnalysisError {
    match error {
        TransportError::Connect(_) => AnalysisError::Network,
        TransportError::Other(detail) => AnalysisError::Unknown(detail.clone()),
    }
}

/// Classifies a received response.
///
/// Checks run in order: declared content type, body decode, HTTP status, then
/// presence of the analysis field. The first failing check decides the error.
///
/// # Errors
/// Returns [`AnalysisError::Protocol`] or [`AnalysisError::Server`].
pub fn classify_response(response: TransportResponse) -> Result<DesignAnalysis, AnalysisError> {
    if !is_json_content_type(response.content_type.as_deref()) {
        debug!(content_type = ?response.content_type, "rejecting non-json response");
        return Err(AnalysisError::Protocol(ProtocolViolation::NonJsonResponse));
    }

    let body = parse_response_body(&response.body).map_err(|error| match error {
        AnalysisContractError::Decode(error) => {
            AnalysisError::Protocol(ProtocolViolation::MalformedJson(error.to_string()))
        }
        AnalysisContractError::MissingAnalysis => {
            AnalysisError::Protocol(ProtocolViolation::MissingAnalysis)
        }
    })?;

    if !response.is_success() {
        return Err(AnalysisError::Server {
            status: response.status,
            message: body.server_error_message(response.status),
        });
    }

    body.into_analysis()
        .map_err(|_| AnalysisError::Protocol(ProtocolViolation::MissingAnalysis))
}

/// Transport-level failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// Server could not be reached.
    #[error("connection failure: {0}")]
    Connect(String),
    /// Any other transport failure.
    #[error("transport failure: {0}")]
    Other(String),
}

/// Client construction errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    /// Endpoint URL is unusable.
    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(String),
}

/// Malformed-response categories.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolViolation {
    /// Response content type is not JSON.
    #[error("Server returned non-JSON response")]
    NonJsonResponse,
    /// Response declared JSON but the body did not decode.
    #[error("Server returned malformed JSON: {0}")]
    MalformedJson(String),
    /// Successful response without an analysis.
    #[error("No analysis data received")]
    MissingAnalysis,
}

/// Coarse category of an analysis failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Server unreachable.
    Network,
    /// Malformed response.
    Protocol,
    /// Server reported failure.
    Server,
    /// Anything else.
    Unknown,
}

/// Outcome of a failed analysis attempt.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalysisError {
    /// Analysis endpoint could not be reached.
    #[error("Network error: Could not connect to the server")]
    Network,
    /// Response violated the endpoint contract.
    #[error("{0}")]
    Protocol(ProtocolViolation),
    /// Endpoint answered with a non-2xx status.
    #[error("{message}")]
    Server {
        /// HTTP status code.
        status: u16,
        /// Provider message or status-based fallback.
        message: String,
    },
    /// Failure outside the other categories; the detail is for logs only.
    #[error("unclassified analysis failure: {0}")]
    Unknown(String),
}

impl AnalysisError {
    /// Returns the coarse category.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Network => ErrorKind::Network,
            Self::Protocol(_) => ErrorKind::Protocol,
            Self::Server { .. } => ErrorKind::Server,
            Self::Unknown(_) => ErrorKind::Unknown,
        }
    }

    /// Returns the string stored in UI state for display.
    pub fn user_message(&self) -> String {
        match self {
            Self::Network => NETWORK_ERROR_MESSAGE.to_string(),
            Self::Protocol(ProtocolViolation::MalformedJson(_)) => {
                MALFORMED_JSON_MESSAGE.to_string()
            }
            Self::Protocol(violation) => violation.to_string(),
            Self::Server { message, .. } => message.clone(),
            Self::Unknown(_) => UNKNOWN_ERROR_MESSAGE.to_string(),
        }
    }
}
