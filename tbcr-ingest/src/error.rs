//! Error types for tbcr-ingest
//!
//! Structural and identity problems are errors. Incomplete or oddly shaped
//! content inside a document is not: it degrades to absent summary fields.

use thiserror::Error;

/// Import pipeline error
///
/// Every variant is terminal for the current call; nothing is retried
/// internally.
#[derive(Debug, Error)]
pub enum ImportError {
    /// Unrecognized, missing or too-short envelope
    #[error("Invalid export format: {0}")]
    InvalidFormat(String),

    /// Base64 payload is malformed (alphabet or padding)
    #[error("Invalid export encoding: {0}")]
    InvalidEncoding(#[from] base64::DecodeError),

    /// Decoded text is not a structured document
    #[error("Invalid export JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// Character name or realm is blank
    #[error("Export is missing the character {0}")]
    MissingIdentity(&'static str),

    /// Realm rejected by the allow-list
    #[error("Realm not allowed: {0}")]
    RealmNotAllowed(String),

    /// Write to the store failed; nothing was persisted
    #[error("Storage error: {0}")]
    Storage(#[from] tbcr_common::Error),
}

impl ImportError {
    /// Stable identifier for callers mapping errors to their own responses
    pub fn code(&self) -> &'static str {
        match self {
            ImportError::InvalidFormat(_) => "INVALID_FORMAT",
            ImportError::InvalidEncoding(_) => "INVALID_ENCODING",
            ImportError::InvalidJson(_) => "INVALID_JSON",
            ImportError::MissingIdentity(_) => "MISSING_IDENTITY",
            ImportError::RealmNotAllowed(_) => "REALM_NOT_ALLOWED",
            ImportError::Storage(_) => "STORAGE_ERROR",
        }
    }
}

/// Result type for the import pipeline
pub type ImportResult<T> = Result<T, ImportError>;
