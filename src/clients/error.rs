use thiserror::Error;

/// Failures of a weather archive query for one location. Recovered by
/// the enricher as absent rows; the run continues.
#[derive(Debug, Error)]
pub enum WeatherArchiveError {
    #[error("Network request failed for {0}")]
    NetworkRequest(String, #[source] reqwest::Error),

    #[error("HTTP request failed for {url} with status {status}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to decode weather archive response from {url}")]
    ResponseDecode {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Weather archive response has mismatched series lengths")]
    RaggedSeries,
}

/// Failures of an elevation lookup for one location. Recovered by the
/// enricher as an absent value; the run continues.
#[derive(Debug, Error)]
pub enum ElevationError {
    #[error("Network request failed for {0}")]
    NetworkRequest(String, #[source] reqwest::Error),

    #[error("HTTP request failed for {url} with status {status}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to decode elevation response from {url}")]
    ResponseDecode {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}
