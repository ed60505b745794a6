//! # ApiError
//!
//! Failures raised by the server collaborators. The selection engine passes
//! them through untouched; running out of posts is not an error.

use thiserror::Error;

/// The error type for every `ServerApi` call.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Network failure (DNS, TLS, connection reset, timeout)
    #[error("transport error: {0}")]
    Transport(String),

    /// Non-success HTTP status other than an auth failure
    #[error("{endpoint} returned HTTP {status}")]
    Status { endpoint: String, status: u16 },

    /// The access token was rejected
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// The response body did not have the expected shape
    #[error("unexpected response from {endpoint}: {message}")]
    Decode { endpoint: String, message: String },

    #[error("invalid server origin: {0}")]
    InvalidOrigin(String),

    /// The requested server family was not compiled in
    #[error("unsupported server kind: {0}")]
    Unsupported(String),
}

/// A specialized Result type for server calls.
pub type Result<T> = std::result::Result<T, ApiError>;
