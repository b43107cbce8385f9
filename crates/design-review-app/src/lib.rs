#![warn(missing_docs)]
//! # design-review-app
//!
//! ## Purpose
//! Orchestrates upload, encoding, analysis and UI state for `design-review`.
//!
//! ## Responsibilities
//! - Own the analysis state and route every mutation through one update path.
//! - Run the upload flow: encode, submit, classify, store.
//! - Guarantee the analyzing flag is cleared on every exit path.
//! - Load runtime configuration and redact log output.
//!
//! ## Data flow
//! [`UploadedFile`] -> [`PageController::handle_upload`] -> encoder ->
//! [`AnalysisClient`] -> [`AnalysisState`] -> [`PageView`] for rendering.
//!
//! ## Ownership and lifetimes
//! State sits behind `Arc<Mutex<_>>` so renderers can snapshot it while an
//! upload is suspended. The lock is never held across an await point.
//!
//! ## Error model
//! Upload failures never escape [`PageController::handle_upload`]; they are
//! classified into [`AnalysisError`] and stored as user-facing strings.
//! Setup failures are reported as [`AppError`].
//!
//! ## Security and privacy notes
//! - Image payloads are never logged.
//! - Provider messages pass through [`redact_sensitive`] before logging.

use std::sync::{Arc, Mutex, PoisonError};

use design_review_transport::{
    AnalysisClient, AnalysisError, ClientError, HttpTransport, analyze_endpoint,
};
use design_review_ui::{AnalysisState, PageView, project_view};
use design_review_upload::{DataUrlEncoder, FileEncoder, UploadedFile};
use thiserror::Error;
use tracing::{info, warn};

pub use design_review_core::DesignAnalysis;

/// Build-time application version loaded from root `VERSION` file.
pub const APP_VERSION: &str = env!("DESIGN_REVIEW_VERSION");

/// Environment variable naming the analysis service base URL.
pub const BASE_URL_ENV: &str = "DESIGN_REVIEW_BASE_URL";

/// Base URL used when [`BASE_URL_ENV`] is unset.
pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";

const REDACTED: &str = "<redacted>";
const BASE64_MARKER: &str = ";base64,";

/// Returns the app version sourced from root `VERSION`.
pub fn app_version() -> &'static str {
    APP_VERSION
}

/// Runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Base URL of the service hosting `/api/analyze`.
    pub base_url: String,
}

impl AppConfig {
    /// Creates a validated configuration.
    ///
    /// # Errors
    /// Returns [`AppError::Client`] when the base URL cannot host the endpoint.
    pub fn new(base_url: impl Into<String>) -> Result<Self, AppError> {
        let base_url = base_url.into();
        analyze_endpoint(&base_url)?;
        Ok(Self { base_url })
    }

    /// Reads configuration from the environment.
    ///
    /// Unset or blank [`BASE_URL_ENV`] falls back to [`DEFAULT_BASE_URL`].
    ///
    /// # Errors
    /// Returns [`AppError::Client`] when the configured URL is invalid.
    pub fn from_env() -> Result<Self, AppError> {
        match std::env::var(BASE_URL_ENV) {
            Ok(value) if !value.trim().is_empty() => Self::new(value.trim()),
            _ => Self::new(DEFAULT_BASE_URL),
        }
    }
}

/// Owns analysis state and runs the upload flow.
#[derive(Clone)]
pub struct PageController {
    state: Arc<Mutex<AnalysisState>>,
    client: AnalysisClient,
    encoder: Arc<dyn FileEncoder>,
}

impl PageController {
    /// Creates a controller with idle state.
    pub fn new(client: AnalysisClient, encoder: Arc<dyn FileEncoder>) -> Self {
        Self {
            state: Arc::new(Mutex::new(AnalysisState::new())),
            client,
            encoder,
        }
    }

    /// Creates a controller backed by HTTP and the file-reading encoder.
    ///
    /// # Errors
    /// Returns [`AppError::Client`] when the configured endpoint is invalid.
    pub fn from_config(config: &AppConfig) -> Result<Self, AppError> {
        let client = AnalysisClient::new(&config.base_url, Arc::new(HttpTransport::new()))?;
        Ok(Self::new(client, Arc::new(DataUrlEncoder::new())))
    }

    /// Returns the shared state handle.
    pub fn state_handle(&self) -> Arc<Mutex<AnalysisState>> {
        Arc::clone(&self.state)
    }

    /// Returns a copy of the current state.
    pub fn snapshot(&self) -> AnalysisState {
        self.update(|state| state.clone())
    }

    /// Returns the current renderer projection.
    pub fn view(&self) -> PageView {
        self.update(|state| project_view(state))
    }

    /// Applies one mutation to the state.
    pub fn update<R>(&self, mutate: impl FnOnce(&mut AnalysisState) -> R) -> R {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        mutate(&mut state)
    }

    /// Processes one uploaded file.
    ///
    /// On return exactly one of "analysis stored" or "error stored" happened
    /// and the analyzing flag is cleared. Nothing is returned to the caller;
    /// outcomes are observed through state.
    pub async fn handle_upload(&self, file: &UploadedFile) {
        self.update(AnalysisState::begin_analysis);
        let mut guard = AnalyzingGuard::new(self.state_handle());
        info!(file = %file.name, media_type = %file.media_type, "analysis started");

        match self.run_analysis(file).await {
            Ok(analysis) => {
                info!(file = %file.name, "analysis stored");
                self.update(|state| state.complete_with(analysis));
            }
            Err(error) => {
                warn!(
                    file = %file.name,
                    kind = ?error.kind(),
                    error = %redact_sensitive(&error.to_string()),
                    "analysis failed"
                );
                self.update(|state| state.fail_with(error.user_message()));
            }
        }

        guard.finish();
    }

    async fn run_analysis(&self, file: &UploadedFile) -> Result<DesignAnalysis, AnalysisError> {
        let image = self
            .encoder
            .encode(file)
            .await
            .map_err(|error| AnalysisError::Unknown(error.to_string()))?;

        self.client.analyze(image).await
    }
}

/// Clears the analyzing flag when finished or dropped.
///
/// Dropping covers early returns and cancelled futures, so the flag cannot be
/// left set once an upload flow ends. The flag is shared: when uploads
/// overlap, the first flow to finish clears it while the other is still in
/// flight.
pub struct AnalyzingGuard {
    state: Arc<Mutex<AnalysisState>>,
    finished: bool,
}

impl AnalyzingGuard {
    /// Arms a guard over `state`.
    pub fn new(state: Arc<Mutex<AnalysisState>>) -> Self {
        Self {
            state,
            finished: false,
        }
    }

    /// Clears the analyzing flag once; later calls do nothing.
    pub fn finish(&mut self) {
        if self.finished {
            return;
        }
        self.finished = true;
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .finish_analysis();
    }

    /// Returns `true` once the guard has run.
    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

impl Drop for AnalyzingGuard {
    fn drop(&mut self) {
        self.finish();
    }
}

/// Redacts image payloads and common secret markers for log-safe output.
pub fn redact_sensitive(input: &str) -> String {
    let redacted = redact_base64_payloads(input);
    ["bearer", "authorization", "api_key", "apikey", "token"]
        .iter()
        .fold(redacted, |text, key| redact_key_value(&text, key))
}

fn redact_base64_payloads(input: &str) -> String {
    let mut output = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(position) = rest.find(BASE64_MARKER) {
        let payload_start = position + BASE64_MARKER.len();
        output.push_str(&rest[..payload_start]);
        rest = &rest[payload_start..];
        let payload_len = rest
            .find(|c: char| !(c.is_ascii_alphanumeric() || matches!(c, '+' | '/' | '=')))
            .unwrap_or(rest.len());
        output.push_str(REDACTED);
        rest = &rest[payload_len..];
    }

    output.push_str(rest);
    output
}

fn redact_key_value(input: &str, key: &str) -> String {
    let lower = input.to_ascii_lowercase();
    let mut output = String::with_capacity(input.len());
    let mut cursor = 0;

    while let Some(offset) = lower[cursor..].find(key) {
        let key_end = cursor + offset + key.len();
        let after_key = &input[key_end..];
        let separator_len = after_key.len() - after_key.trim_start_matches(['=', ':', ' ']).len();
        if separator_len == 0 {
            output.push_str(&input[cursor..key_end]);
            cursor = key_end;
            continue;
        }

        let value_start = key_end + separator_len;
        let value_len = input[value_start..]
            .find(|c: char| c.is_whitespace() || matches!(c, ',' | '"' | '&' | ';'))
            .unwrap_or(input.len() - value_start);
        output.push_str(&input[cursor..value_start]);
        output.push_str(REDACTED);
        cursor = value_start + value_len;
    }

    output.push_str(&input[cursor..]);
    output
}

/// App setup error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Analysis client could not be configured.
    #[error("client error: {0}")]
    Client(#[from] ClientError),
    /// Input file was rejected before upload.
    #[error("upload error: {0}")]
    Upload(#[from] design_review_upload::UploadError),
}
