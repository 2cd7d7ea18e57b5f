//! Daily weather archive client.
//!
//! The archive serves parallel per-day arrays keyed by an ISO date
//! list; a query covers one coordinate over a closed date range. No
//! credential is required.

use crate::clients::error::WeatherArchiveError;
use crate::enricher::LatLon;
use crate::types::date_range::DateRange;
use chrono::{Datelike, NaiveDate};
use log::info;
use reqwest::Client;
use serde::Deserialize;

/// Default URL of the weather archive endpoint.
pub const DEFAULT_WEATHER_ENDPOINT: &str = "https://archive-api.open-meteo.com/v1/archive";

/// One day of archived weather at a coordinate. Individual values may
/// be absent where the archive has gaps.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyWeather {
    pub date: NaiveDate,
    pub temp_max: Option<f64>,
    pub temp_min: Option<f64>,
    pub precipitation_mm: Option<f64>,
}

/// Meteorological season of a date, northern hemisphere convention.
pub fn season_for(date: NaiveDate) -> &'static str {
    match date.month() {
        3..=5 => "Spring",
        6..=8 => "Summer",
        9..=11 => "Autumn",
        _ => "Winter",
    }
}

#[derive(Debug, Deserialize)]
struct ArchiveResponse {
    daily: Option<DailySeries>,
}

#[derive(Debug, Deserialize)]
struct DailySeries {
    time: Vec<NaiveDate>,
    #[serde(default)]
    temperature_2m_max: Vec<Option<f64>>,
    #[serde(default)]
    temperature_2m_min: Vec<Option<f64>>,
    #[serde(default)]
    precipitation_sum: Vec<Option<f64>>,
}

/// Client for the daily weather archive.
pub struct WeatherArchive {
    http: Client,
    endpoint: String,
}

impl WeatherArchive {
    pub fn new() -> Self {
        Self::with_endpoint(DEFAULT_WEATHER_ENDPOINT)
    }

    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            endpoint: endpoint.into(),
        }
    }

    /// Daily min/max temperature and precipitation at `point` for
    /// every date in `range`. An archive without data for the range
    /// yields an empty series, not an error.
    pub async fn daily_series(
        &self,
        point: LatLon,
        range: &DateRange,
    ) -> Result<Vec<DailyWeather>, WeatherArchiveError> {
        info!(
            "Fetching weather archive at ({:.5}, {:.5}) for {}..={}",
            point.0,
            point.1,
            range.start(),
            range.end()
        );

        let response = self
            .http
            .get(&self.endpoint)
            .query(&[("latitude", point.0), ("longitude", point.1)])
            .query(&[
                ("start_date", range.start().to_string()),
                ("end_date", range.end().to_string()),
                (
                    "daily",
                    "temperature_2m_max,temperature_2m_min,precipitation_sum".to_string(),
                ),
            ])
            .send()
            .await
            .map_err(|e| WeatherArchiveError::NetworkRequest(self.endpoint.clone(), e))?;

        let response = match response.error_for_status() {
            Ok(resp) => resp,
            Err(e) => {
                return Err(if let Some(status) = e.status() {
                    WeatherArchiveError::HttpStatus {
                        url: self.endpoint.clone(),
                        status,
                        source: e,
                    }
                } else {
                    WeatherArchiveError::NetworkRequest(self.endpoint.clone(), e)
                });
            }
        };

        let body: ArchiveResponse =
            response
                .json()
                .await
                .map_err(|e| WeatherArchiveError::ResponseDecode {
                    url: self.endpoint.clone(),
                    source: e,
                })?;
        Self::parse_body(body)
    }

    fn parse_body(body: ArchiveResponse) -> Result<Vec<DailyWeather>, WeatherArchiveError> {
        let Some(daily) = body.daily else {
            return Ok(Vec::new());
        };
        let days = daily.time.len();
        for series in [
            &daily.temperature_2m_max,
            &daily.temperature_2m_min,
            &daily.precipitation_sum,
        ] {
            if !series.is_empty() && series.len() != days {
                return Err(WeatherArchiveError::RaggedSeries);
            }
        }

        let at = |series: &Vec<Option<f64>>, i: usize| series.get(i).copied().flatten();
        Ok(daily
            .time
            .iter()
            .enumerate()
            .map(|(i, date)| DailyWeather {
                date: *date,
                temp_max: at(&daily.temperature_2m_max, i),
                temp_min: at(&daily.temperature_2m_min, i),
                precipitation_mm: at(&daily.precipitation_sum, i),
            })
            .collect())
    }
}

impl Default for WeatherArchive {
    fn default() -> Self {
        Self::new()
    }
}
