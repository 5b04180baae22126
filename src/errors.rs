/*!
 * Error types for the laytrans library.
 *
 * This module contains custom error types for different parts of the library,
 * using the thiserror crate for ergonomic error definitions.
 */

use thiserror::Error;

/// Coarse classification of a backend failure, used to pick a retry strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendErrorKind {
    /// Temporary condition (timeout, connection drop, server busy) - worth retrying
    Transient,
    /// The request is too large for the model's context - recover by chunking
    Capacity,
    /// No recovery strategy applies
    Fatal,
}

/// Errors that can occur when talking to the translation backend
#[derive(Error, Debug)]
pub enum BackendError {
    /// Error sending the request or reading the response
    #[error("Request error: {0}")]
    Transport(String),

    /// The request exceeded the model's capacity (context length, memory)
    #[error("Backend capacity exceeded: {0}")]
    Capacity(String),

    /// Error returned by the backend API itself
    #[error("HTTP {status}: {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Error body from the API
        message: String,
    },

    /// The response could not be parsed into the expected shape
    #[error("Failed to parse backend response: {0}")]
    Parse(String),

    /// Any other failure, carried as an untyped message
    #[error("{0}")]
    Other(String),
}

impl BackendError {
    /// Classify this error for retry purposes.
    ///
    /// Tagged variants classify directly. `Api` and `Other` fall back to
    /// substring matching on the message, which is a documented heuristic for
    /// backends that only surface free-form error strings.
    pub fn kind(&self) -> BackendErrorKind {
        match self {
            BackendError::Transport(_) => BackendErrorKind::Transient,
            BackendError::Capacity(_) => BackendErrorKind::Capacity,
            BackendError::Parse(_) => BackendErrorKind::Fatal,
            BackendError::Api { message, .. } => classify_message(message),
            BackendError::Other(message) => classify_message(message),
        }
    }
}

/// Substring-based fallback classification for untyped error messages.
pub fn classify_message(message: &str) -> BackendErrorKind {
    let lower = message.to_lowercase();

    const CAPACITY_KEYWORDS: [&str; 5] = ["context", "length", "memory", "too long", "exceeded"];
    if CAPACITY_KEYWORDS.iter().any(|kw| lower.contains(kw)) {
        return BackendErrorKind::Capacity;
    }

    const TRANSIENT_KEYWORDS: [&str; 5] = ["timeout", "busy", "connection", "reset", "refused"];
    if TRANSIENT_KEYWORDS.iter().any(|kw| lower.contains(kw)) {
        return BackendErrorKind::Transient;
    }

    BackendErrorKind::Fatal
}

/// Errors raised while building or validating a document
#[derive(Error, Debug)]
pub enum DocumentError {
    /// The document exceeds the configured segment count limit
    #[error("{document_type} exceeds segment limit: {segment_count} > {max_segments}")]
    TooManySegments {
        /// Kind of document being checked
        document_type: String,
        /// Number of segments found
        segment_count: usize,
        /// Configured maximum
        max_segments: usize,
    },

    /// The document exceeds the configured total text length limit
    #[error("{document_type} exceeds text length limit: {text_length} > {max_text_length}")]
    TextTooLong {
        /// Kind of document being checked
        document_type: String,
        /// Total characters found
        text_length: usize,
        /// Configured maximum
        max_text_length: usize,
    },
}

/// Errors that can occur while planning rendered output
#[derive(Error, Debug)]
pub enum RenderError {
    /// The requested mode is not supported by the chosen renderer
    #[error("Unsupported render mode: {0}")]
    UnsupportedMode(String),

    /// The document carries no geometry the renderer can use
    #[error("Document has no positioned elements to render")]
    NoGeometry,
}

/// Main library error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from the translation backend
    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    /// Error from document validation
    #[error("Document error: {0}")]
    Document(#[from] DocumentError),

    /// Error from render planning
    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    /// Error from the cache store
    #[error("Cache error: {0}")]
    Cache(String),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<rusqlite::Error> for AppError {
    fn from(error: rusqlite::Error) -> Self {
        Self::Cache(error.to_string())
    }
}
