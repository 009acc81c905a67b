use reqwest::StatusCode;
use thiserror::Error;

/// Failures surfaced by [`crate::FleetClient`].
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport, timeout, or body decode failure.
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The token was rejected. Logged separately so an expired token is easy
    /// to spot in the logs.
    #[error("authentication rejected (401); token may be invalid or expired")]
    Unauthorized,

    /// Any other non-success status.
    #[error("server returned status {status}")]
    Status { status: StatusCode },

    /// The configured base URL could not be parsed into request URLs.
    #[error("invalid base url: {0}")]
    BaseUrl(String),
}
