//! Error types for FormFix

use thiserror::Error;

/// Rejection of an ingestion payload.
///
/// The offending event is dropped and never retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Unknown metric type: {0}")]
    UnknownType(String),

    #[error("Malformed payload: {0}")]
    Malformed(String),
}

/// Failure to hand a captured event to the collector.
///
/// Capture code logs these and moves on; the event is lost.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Collector rejected event: {0}")]
    Rejected(String),

    #[error("Collector unavailable: {0}")]
    Unavailable(String),

    #[error("Failed to encode event: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Errors raised by metric stores
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Store I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Corrupt store entry at line {line}: {message}")]
    Corrupt { line: usize, message: String },

    #[error("Failed to encode event: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Store lock poisoned")]
    Poisoned,
}

/// Failure while producing insights; callers get no partial results
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Invalid analysis request: {0}")]
    InvalidRequest(#[from] serde_json::Error),

    #[error("Failed to read metrics: {0}")]
    Store(#[from] StoreError),

    #[error("Encoding error: {0}")]
    EncodingError(String),
}

/// Top-level error for callers that cross several boundaries
#[derive(Debug, Error)]
pub enum FormFixError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    #[error("Invalid JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Failed to parse input: {0}")]
    ParseError(String),
}
