use thiserror::Error;

/// Failures of a single raster sampling query.
///
/// These are recovered locally by the enrichment driver: the failing
/// (location, date) pair is recorded as absent with the cause retained,
/// and iteration over the remaining pairs continues.
#[derive(Debug, Error)]
pub enum SampleError {
    #[error("Network request failed for {0}")]
    NetworkRequest(String, #[source] reqwest::Error),

    #[error("HTTP request failed for {url} with status {status}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to decode raster response from {url}")]
    ResponseDecode {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Unknown dataset '{0}'")]
    UnknownDataset(String),
}
