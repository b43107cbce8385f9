#![warn(missing_docs)]
//! # design-review-upload
//!
//! ## Purpose
//! Models files handed over by the upload widget and converts them into data
//! URLs for transport.
//!
//! ## Responsibilities
//! - Describe the media types the upload widget accepts.
//! - Represent an accepted file backed by a path or by in-memory bytes.
//! - Define an encoder abstraction with a file-reading implementation.
//!
//! ## Data flow
//! Widget (or CLI) picks a file -> [`UploadedFile`] -> [`FileEncoder::encode`]
//! -> data URL consumed by the page controller.
//!
//! ## Ownership and lifetimes
//! [`UploadedFile`] owns its path or bytes; encoders borrow it for the duration
//! of one read and return an owned `String`.
//!
//! ## Error model
//! Unsupported inputs fail with [`UploadError`] before any read happens.
//! Read failures surface as [`EncodeError`].
//!
//! ## Security and privacy notes
//! Encoders log file names, media types and sizes only, never contents.

use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use design_review_core::encode_data_url;
use thiserror::Error;
use tracing::debug;

/// Media types accepted by the upload widget.
pub const ACCEPTED_MEDIA_TYPES: &[&str] = &["image/png", "image/jpeg", "image/gif", "image/webp"];

/// Backing storage of an uploaded file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileSource {
    /// File contents are read from disk on encode.
    Path(PathBuf),
    /// File contents are already in memory.
    Memory(Vec<u8>),
}

/// File accepted by the upload widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    /// Display name of the file.
    pub name: String,
    /// Declared media type, empty when unknown.
    pub media_type: String,
    /// Where the bytes live.
    pub source: FileSource,
}

impl UploadedFile {
    /// Builds an upload from a filesystem path, inferring the media type from
    /// its extension.
    ///
    /// # Errors
    /// Returns [`UploadError::MissingFileName`] for paths without a file name
    /// and [`UploadError::UnsupportedType`] when the extension does not map to
    /// an accepted media type.
    pub fn from_path(path: impl Into<PathBuf>) -> Result<Self, UploadError> {
        let path = path.into();
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .ok_or_else(|| UploadError::MissingFileName(path.display().to_string()))?;

        let media_type = media_type_for_path(&path)
            .ok_or_else(|| UploadError::UnsupportedType(name.clone()))?;

        Ok(Self {
            name,
            media_type: media_type.to_string(),
            source: FileSource::Path(path),
        })
    }

    /// Builds an upload from bytes already held in memory.
    pub fn from_bytes(
        name: impl Into<String>,
        media_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            name: name.into(),
            media_type: media_type.into(),
            source: FileSource::Memory(bytes),
        }
    }
}

/// Returns the accepted media type for a path's extension.
pub fn media_type_for_path(path: &Path) -> Option<&'static str> {
    let extension = path.extension()?.to_str()?.to_ascii_lowercase();
    match extension.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        _ => None,
    }
}

/// Returns `true` when the media type is one the widget accepts.
pub fn is_accepted_media_type(media_type: &str) -> bool {
    ACCEPTED_MEDIA_TYPES
        .iter()
        .any(|accepted| accepted.eq_ignore_ascii_case(media_type.trim()))
}

/// Converts an uploaded file to its textual transport form.
#[async_trait]
pub trait FileEncoder: Send + Sync {
    /// Reads the full file and returns a base64 data URL.
    ///
    /// # Errors
    /// Returns [`EncodeError::Read`] when the file contents cannot be read.
    async fn encode(&self, file: &UploadedFile) -> Result<String, EncodeError>;
}

/// Encoder that reads files with `tokio::fs` and emits base64 data URLs.
#[derive(Debug, Clone, Copy, Default)]
pub struct DataUrlEncoder;

impl DataUrlEncoder {
    /// Creates the encoder.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl FileEncoder for DataUrlEncoder {
    async fn encode(&self, file: &UploadedFile) -> Result<String, EncodeError> {
        let url = match &file.source {
            FileSource::Path(path) => {
                let bytes = tokio::fs::read(path)
                    .await
                    .map_err(|source| EncodeError::Read {
                        name: file.name.clone(),
                        source,
                    })?;
                debug!(file = %file.name, bytes = bytes.len(), "file read complete");
                encode_data_url(&file.media_type, &bytes)
            }
            FileSource::Memory(bytes) => encode_data_url(&file.media_type, bytes),
        };

        Ok(url)
    }
}

/// Upload intake errors.
#[derive(Debug, Error)]
pub enum UploadError {
    /// Path has no file name component.
    #[error("path has no file name: {0}")]
    MissingFileName(String),
    /// File type is not accepted by the upload widget.
    #[error("unsupported file type: {0}")]
    UnsupportedType(String),
}

/// Encoder failures.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// File contents could not be read.
    #[error("failed to read {name}: {source}")]
    Read {
        /// File display name.
        name: String,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
}
