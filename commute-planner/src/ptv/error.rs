//! Timetable API error types.

use crate::domain::StopId;

/// Errors from a [`DataSource`](super::DataSource).
#[derive(Debug, thiserror::Error)]
pub enum PtvError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body could not be decoded
    #[error("JSON parse error: {message}")]
    Json {
        message: String,
        body: Option<String>,
    },

    /// API returned a non-success status
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Credentials rejected by the API
    #[error("unauthorized: check PTV_DEV_ID and PTV_API_KEY")]
    Unauthorized,

    /// The requested stop does not exist
    #[error("stop {0} not found")]
    StopNotFound(StopId),

    /// Client construction failed
    #[error("not configured: {0}")]
    NotConfigured(String),
}
