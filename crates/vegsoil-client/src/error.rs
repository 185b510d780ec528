//! Error types for the Earth Engine client.

use thiserror::Error;

/// Errors that can occur when talking to Earth Engine.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport-level failure (DNS, TLS, timeout, connection reset).
    #[error("HTTP request error: {0}")]
    HttpRequest(#[from] reqwest::Error),

    /// The service rejected the request. Message is the service's own.
    #[error("Earth Engine error {code} {status}: {message}")]
    Api {
        /// HTTP status code.
        code: u16,
        /// Google RPC status, e.g. `INVALID_ARGUMENT`.
        status: String,
        /// Error message from the service.
        message: String,
    },

    /// The client was set up with unusable settings.
    #[error("Configuration error: {0}")]
    Config(String),

    /// No usable credentials.
    #[error("Authentication error: {0}")]
    Auth(String),

    /// A success response did not have the expected shape.
    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),

    /// JSON encoding or decoding failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A request could not be described locally.
    #[error("Invalid request: {0}")]
    Request(#[from] vegsoil_expr::ExprError),

    /// Call log lock was poisoned (a thread panicked while holding the lock).
    #[error("Call log lock was poisoned")]
    LockPoisoned,
}
