//! The remote raster query seam and its production HTTP client.

use crate::enricher::LatLon;
use crate::sampling::dataset::DatasetDescriptor;
use crate::sampling::error::SampleError;
use async_trait::async_trait;
use chrono::NaiveDate;
use log::info;
use reqwest::Client;
use serde::Deserialize;

/// Default base URL of the raster sampling endpoint.
pub const DEFAULT_RASTER_ENDPOINT: &str = "https://earthengine.googleapis.com/v1";

/// One dated scalar sample of a raster band at a point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RasterSample {
    /// Acquisition date of the scene the value came from.
    pub date: NaiveDate,
    /// Raw band value, in the collection's native units.
    pub value: f64,
}

/// A queryable raster collection source.
///
/// The production implementation is [`RasterApiClient`]; tests inject
/// in-memory sources. Queries are idempotent: re-querying the same
/// window must return the same samples up to the remote source's own
/// consistency.
#[async_trait]
pub trait RasterSource: Send + Sync {
    /// Returns every sample of `dataset` at `point` with an
    /// acquisition date in `[start, end)`. Pixels the collection
    /// itself masked (e.g. clouds) are not returned.
    async fn query_window(
        &self,
        dataset: &DatasetDescriptor,
        point: LatLon,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<RasterSample>, SampleError>;
}

#[derive(Debug, Deserialize)]
struct SampleResponse {
    #[serde(default)]
    samples: Vec<RawSample>,
}

#[derive(Debug, Deserialize)]
struct RawSample {
    date: NaiveDate,
    /// Null when the pixel exists but carries no retrievable value.
    value: Option<f64>,
}

/// Production raster source speaking the sampling endpoint's JSON
/// protocol. The credential is injected at construction; there is no
/// ambient key state.
pub struct RasterApiClient {
    http: Client,
    api_key: String,
    base_url: String,
}

impl RasterApiClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(api_key, DEFAULT_RASTER_ENDPOINT)
    }

    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            api_key: api_key.into(),
            base_url: base_url.into(),
        }
    }

    fn parse_body(body: SampleResponse) -> Vec<RasterSample> {
        body.samples
            .into_iter()
            .filter_map(|raw| {
                raw.value.map(|value| RasterSample {
                    date: raw.date,
                    value,
                })
            })
            .collect()
    }
}

#[async_trait]
impl RasterSource for RasterApiClient {
    async fn query_window(
        &self,
        dataset: &DatasetDescriptor,
        point: LatLon,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<RasterSample>, SampleError> {
        let url = format!("{}/sample", self.base_url);
        info!(
            "Sampling {} ({}/{}) at ({:.5}, {:.5}) for [{}, {})",
            dataset.name, dataset.collection, dataset.band, point.0, point.1, start, end
        );

        let response = self
            .http
            .get(&url)
            .query(&[
                ("collection", dataset.collection.as_str()),
                ("band", dataset.band.as_str()),
            ])
            .query(&[("lat", point.0), ("lon", point.1)])
            .query(&[("scale", dataset.scale_m)])
            .query(&[("start", start.to_string()), ("end", end.to_string())])
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| SampleError::NetworkRequest(url.clone(), e))?;

        let response = match response.error_for_status() {
            Ok(resp) => resp,
            Err(e) => {
                return Err(if let Some(status) = e.status() {
                    SampleError::HttpStatus {
                        url,
                        status,
                        source: e,
                    }
                } else {
                    SampleError::NetworkRequest(url, e)
                });
            }
        };

        let body: SampleResponse = response
            .json()
            .await
            .map_err(|e| SampleError::ResponseDecode { url, source: e })?;
        Ok(Self::parse_body(body))
    }
}
