//! Error taxonomy for the interpretation pipeline
//!
//! Every failure crossing the pipeline boundary is a value, never a panic.
//! "Unresolved" is deliberately not here: heuristics that find nothing return
//! an outcome variant, not an error.

use thiserror::Error;

/// Failures from the remote parsing service
#[derive(Debug, Clone, Error)]
pub enum RemoteParseError {
    /// No access credential configured. Recoverable: callers surface a hint
    /// to configure one and continue with heuristic results.
    #[error("no API credential configured")]
    NoCredential,

    /// Free tier returned HTTP 429. Triggers one escalation to the paid
    /// model; never user-visible on its own.
    #[error("rate limited by remote model")]
    RateLimited,

    /// The model answered, but no JSON object could be extracted from the
    /// reply. Not retried via escalation.
    #[error("no parsable JSON in model response")]
    InvalidModelResponse,

    /// Network-level failure (connect, timeout, body read)
    #[error("transport failure: {0}")]
    Transport(String),

    /// Non-429 HTTP error from the service
    #[error("remote service returned {status}: {body}")]
    Http { status: u16, body: String },
}

/// Failures from the capture collaborator
#[derive(Debug, Clone, Error)]
pub enum CaptureError {
    /// The bounded listening window elapsed without a final transcript
    #[error("listening window elapsed without a final transcript")]
    Timeout,

    #[error("speech capture unavailable: {0}")]
    Unavailable(String),
}

/// Failures from the record store collaborator
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("store contents corrupt: {0}")]
    Corrupt(String),
}
