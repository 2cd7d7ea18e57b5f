//! Elevation lookup client.

use crate::clients::error::ElevationError;
use crate::enricher::LatLon;
use log::info;
use reqwest::Client;
use serde::Deserialize;

/// Default URL of the elevation lookup endpoint.
pub const DEFAULT_ELEVATION_ENDPOINT: &str = "https://api.open-elevation.com/api/v1/lookup";

#[derive(Debug, Deserialize)]
struct LookupResponse {
    #[serde(default)]
    results: Vec<LookupResult>,
}

#[derive(Debug, Deserialize)]
struct LookupResult {
    elevation: f64,
}

/// Client for the elevation lookup service. No credential is required;
/// the caller is expected to pace consecutive lookups politely.
pub struct ElevationClient {
    http: Client,
    endpoint: String,
}

impl ElevationClient {
    pub fn new() -> Self {
        Self::with_endpoint(DEFAULT_ELEVATION_ENDPOINT)
    }

    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            endpoint: endpoint.into(),
        }
    }

    /// Elevation above sea level in meters at `point`, or `None` when
    /// the service has no value for the coordinate.
    pub async fn elevation(&self, point: LatLon) -> Result<Option<f64>, ElevationError> {
        info!("Looking up elevation at ({:.5}, {:.5})", point.0, point.1);

        let response = self
            .http
            .get(&self.endpoint)
            .query(&[("locations", format!("{},{}", point.0, point.1))])
            .send()
            .await
            .map_err(|e| ElevationError::NetworkRequest(self.endpoint.clone(), e))?;

        let response = match response.error_for_status() {
            Ok(resp) => resp,
            Err(e) => {
                return Err(if let Some(status) = e.status() {
                    ElevationError::HttpStatus {
                        url: self.endpoint.clone(),
                        status,
                        source: e,
                    }
                } else {
                    ElevationError::NetworkRequest(self.endpoint.clone(), e)
                });
            }
        };

        let body: LookupResponse =
            response
                .json()
                .await
                .map_err(|e| ElevationError::ResponseDecode {
                    url: self.endpoint.clone(),
                    source: e,
                })?;
        Ok(Self::parse_body(body))
    }

    fn parse_body(body: LookupResponse) -> Option<f64> {
        body.results.first().map(|r| r.elevation)
    }
}

impl Default for ElevationClient {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_first_result() {
        let body: LookupResponse =
            serde_json::from_str(r#"{"results": [{"latitude": 52.52, "longitude": 13.4, "elevation": 34.0}]}"#)
                .unwrap();
        assert_eq!(ElevationClient::parse_body(body), Some(34.0));
    }

    #[test]
    fn empty_results_is_absent() {
        let body: LookupResponse = serde_json::from_str(r#"{"results": []}"#).unwrap();
        assert_eq!(ElevationClient::parse_body(body), None);
    }
}
