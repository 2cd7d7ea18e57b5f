//! The points-of-interest query seam and its production HTTP client.

use crate::amenities::category::AmenityCategory;
use crate::amenities::error::AmenitySearchError;
use crate::enricher::LatLon;
use async_trait::async_trait;
use log::info;
use reqwest::Client;
use serde::Deserialize;

/// Default URL of the POI nearby-search endpoint.
pub const DEFAULT_PLACES_ENDPOINT: &str =
    "https://maps.googleapis.com/maps/api/place/nearbysearch/json";

/// A nearby point of interest, ephemeral within one query.
#[derive(Debug, Clone, PartialEq)]
pub struct AmenityCandidate {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    /// The column prefix of the category that produced this candidate.
    pub category: String,
}

/// Parameters of one nearby search, constant across its pages.
#[derive(Debug, Clone)]
pub struct NearbySearchRequest {
    pub center: LatLon,
    pub radius_m: f64,
    pub category: AmenityCategory,
    pub open_now: bool,
}

/// One page of nearby-search results.
#[derive(Debug)]
pub struct NearbyPage {
    pub candidates: Vec<AmenityCandidate>,
    /// Continuation token for the next page, if one exists. The
    /// upstream source rejects immediate reuse; a delay is mandatory
    /// before the token is sent.
    pub next_page_token: Option<String>,
}

/// A pageable POI search backend.
///
/// The production implementation is [`PlacesApiClient`]; tests inject
/// scripted page sequences.
#[async_trait]
pub trait PlacesApi: Send + Sync {
    /// Fetches one page. `page_token` is `None` for the first page and
    /// the previous page's continuation token afterwards.
    async fn nearby_page(
        &self,
        request: &NearbySearchRequest,
        page_token: Option<&str>,
    ) -> Result<NearbyPage, AmenitySearchError>;
}

#[derive(Debug, Deserialize)]
struct PlacesResponse {
    status: String,
    #[serde(default)]
    results: Vec<PlaceResult>,
    #[serde(default)]
    next_page_token: Option<String>,
    #[serde(default)]
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PlaceResult {
    #[serde(default)]
    name: Option<String>,
    geometry: PlaceGeometry,
}

#[derive(Debug, Deserialize)]
struct PlaceGeometry {
    location: PlacePoint,
}

#[derive(Debug, Deserialize)]
struct PlacePoint {
    lat: f64,
    lng: f64,
}

/// Production POI search client. The credential is injected at
/// construction; there is no ambient key state.
pub struct PlacesApiClient {
    http: Client,
    api_key: String,
    endpoint: String,
}

impl PlacesApiClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_endpoint(api_key, DEFAULT_PLACES_ENDPOINT)
    }

    pub fn with_endpoint(api_key: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            api_key: api_key.into(),
            endpoint: endpoint.into(),
        }
    }

    fn parse_body(
        body: PlacesResponse,
        category: &AmenityCategory,
    ) -> Result<NearbyPage, AmenitySearchError> {
        match body.status.as_str() {
            "OK" | "ZERO_RESULTS" => Ok(NearbyPage {
                candidates: body
                    .results
                    .into_iter()
                    .map(|place| AmenityCandidate {
                        name: place.name.unwrap_or_default(),
                        latitude: place.geometry.location.lat,
                        longitude: place.geometry.location.lng,
                        category: category.column_prefix.clone(),
                    })
                    .collect(),
                next_page_token: body.next_page_token,
            }),
            _ => Err(AmenitySearchError::Api {
                status: body.status,
                message: body.error_message,
            }),
        }
    }
}

#[async_trait]
impl PlacesApi for PlacesApiClient {
    async fn nearby_page(
        &self,
        request: &NearbySearchRequest,
        page_token: Option<&str>,
    ) -> Result<NearbyPage, AmenitySearchError> {
        info!(
            "Searching '{}' within {:.0} m of ({:.5}, {:.5}){}",
            request.category.column_prefix,
            request.radius_m,
            request.center.0,
            request.center.1,
            if page_token.is_some() {
                " (continuation)"
            } else {
                ""
            }
        );

        let mut builder = self.http.get(&self.endpoint);
        builder = match page_token {
            // A continuation request carries only the token and the key.
            Some(token) => builder.query(&[("pagetoken", token)]),
            None => {
                let mut b = builder
                    .query(&[(
                        "location",
                        format!("{},{}", request.center.0, request.center.1),
                    )])
                    .query(&[("radius", request.radius_m)]);
                if let Some(keyword) = &request.category.keyword {
                    b = b.query(&[("keyword", keyword.as_str())]);
                }
                if let Some(place_type) = &request.category.place_type {
                    b = b.query(&[("type", place_type.as_str())]);
                }
                if request.open_now {
                    b = b.query(&[("opennow", "true")]);
                }
                b
            }
        };

        let response = builder
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| AmenitySearchError::NetworkRequest(self.endpoint.clone(), e))?;

        let response = match response.error_for_status() {
            Ok(resp) => resp,
            Err(e) => {
                return Err(if let Some(status) = e.status() {
                    AmenitySearchError::HttpStatus {
                        url: self.endpoint.clone(),
                        status,
                        source: e,
                    }
                } else {
                    AmenitySearchError::NetworkRequest(self.endpoint.clone(), e)
                });
            }
        };

        let body: PlacesResponse =
            response
                .json()
                .await
                .map_err(|e| AmenitySearchError::ResponseDecode {
                    url: self.endpoint.clone(),
                    source: e,
                })?;
        Self::parse_body(body, &request.category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Result<NearbyPage, AmenitySearchError> {
        let body: PlacesResponse = serde_json::from_str(json).unwrap();
        PlacesApiClient::parse_body(body, &AmenityCategory::public_toilets())
    }

    #[test]
    fn ok_page_yields_candidates_and_token() {
        let page = parse(
            r#"{
                "status": "OK",
                "results": [
                    {"name": "WC Alexanderplatz", "geometry": {"location": {"lat": 52.521, "lng": 13.413}}},
                    {"name": "WC Hackescher Markt", "geometry": {"location": {"lat": 52.523, "lng": 13.402}}}
                ],
                "next_page_token": "tok-2"
            }"#,
        )
        .unwrap();
        assert_eq!(page.candidates.len(), 2);
        assert_eq!(page.candidates[0].name, "WC Alexanderplatz");
        assert_eq!(page.candidates[0].category, "toilet");
        assert_eq!(page.next_page_token.as_deref(), Some("tok-2"));
    }

    #[test]
    fn zero_results_is_an_empty_page_not_an_error() {
        let page = parse(r#"{"status": "ZERO_RESULTS", "results": []}"#).unwrap();
        assert!(page.candidates.is_empty());
        assert!(page.next_page_token.is_none());
    }

    #[test]
    fn non_success_status_is_a_hard_error() {
        let err = parse(
            r#"{"status": "OVER_QUERY_LIMIT", "error_message": "You have exceeded your daily request quota"}"#,
        )
        .unwrap_err();
        match err {
            AmenitySearchError::Api { status, message } => {
                assert_eq!(status, "OVER_QUERY_LIMIT");
                assert!(message.unwrap().contains("quota"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
