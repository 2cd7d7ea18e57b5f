use thiserror::Error;

/// Failures of a points-of-interest search for one location.
///
/// A non-success, non-zero-results API status is a hard error for that
/// location: it is not retried, and callers must not confuse it with a
/// true zero-results outcome.
#[derive(Debug, Error)]
pub enum AmenitySearchError {
    #[error("Network request failed for {0}")]
    NetworkRequest(String, #[source] reqwest::Error),

    #[error("HTTP request failed for {url} with status {status}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to decode places response from {url}")]
    ResponseDecode {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Places API returned status '{status}' ({})", .message.as_deref().unwrap_or("no message"))]
    Api {
        status: String,
        message: Option<String>,
    },
}
