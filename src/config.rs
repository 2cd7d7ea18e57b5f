//! Run configuration for the enrichment pipeline.
//!
//! All options are plain values injected at component construction;
//! there is no process-wide mutable state and no dynamic behavior. A
//! missing credential is a fatal startup error raised before any
//! remote call is issued.

use crate::locations::DedupStrategy;
use bon::Builder;
use chrono::NaiveDate;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Default search radius for amenity queries, in meters.
pub const DEFAULT_SEARCH_RADIUS_M: f64 = 500.0;
/// Default temporal window for raster sampling. Zero means exact-date
/// match only.
pub const DEFAULT_WINDOW_DAYS: u32 = 0;
/// Default page cap for paginated amenity searches. The upstream
/// source serves at most three pages per query.
pub const DEFAULT_PAGE_CAP: usize = 3;
/// Mandatory delay before a pagination continuation token may be used;
/// the upstream source rejects immediate reuse.
pub const DEFAULT_PAGE_DELAY: Duration = Duration::from_secs(2);
/// Polite delay between consecutive elevation lookups.
pub const DEFAULT_ELEVATION_DELAY: Duration = Duration::from_millis(100);

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required credential '{0}'")]
    MissingCredential(&'static str),

    #[error("Invalid date range: start {start} is after end {end}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },

    #[error("Page cap must be at least 1")]
    ZeroPageCap,
}

/// Configuration for an enrichment run.
///
/// Built once and passed to [`Enricher::new`](crate::Enricher::new);
/// components receive what they need from it at construction and never
/// consult ambient state.
///
/// # Examples
///
/// ```
/// use geoenrich::EnrichmentConfig;
///
/// let config = EnrichmentConfig::builder()
///     .catalog_path("data/locations.json")
///     .raster_api_key("raster-secret")
///     .places_api_key("places-secret")
///     .build();
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Builder)]
pub struct EnrichmentConfig {
    /// Path to the location catalog (JSON array of locations).
    #[builder(into)]
    pub catalog_path: PathBuf,
    /// Credential for the raster sampling endpoint.
    #[builder(into)]
    pub raster_api_key: String,
    /// Credential for the points-of-interest search endpoint.
    #[builder(into)]
    pub places_api_key: String,
    /// Override for the raster sampling endpoint base URL.
    #[builder(into)]
    pub raster_endpoint: Option<String>,
    /// Override for the POI search endpoint URL.
    #[builder(into)]
    pub places_endpoint: Option<String>,
    /// Override for the weather archive endpoint URL.
    #[builder(into)]
    pub weather_endpoint: Option<String>,
    /// Override for the elevation lookup endpoint URL.
    #[builder(into)]
    pub elevation_endpoint: Option<String>,
    /// Deduplication strategy applied when the catalog is loaded.
    #[builder(default)]
    pub dedup: DedupStrategy,
    /// Default amenity search radius in meters.
    #[builder(default = DEFAULT_SEARCH_RADIUS_M)]
    pub search_radius_m: f64,
    /// Default temporal window in days for raster sampling.
    #[builder(default = DEFAULT_WINDOW_DAYS)]
    pub window_days: u32,
    /// Maximum number of result pages fetched per amenity query.
    #[builder(default = DEFAULT_PAGE_CAP)]
    pub page_cap: usize,
    /// Delay awaited before using a pagination continuation token.
    #[builder(default = DEFAULT_PAGE_DELAY)]
    pub page_delay: Duration,
    /// Delay between consecutive elevation lookups.
    #[builder(default = DEFAULT_ELEVATION_DELAY)]
    pub elevation_delay: Duration,
}

impl EnrichmentConfig {
    /// Checks that every required credential and bound is usable.
    ///
    /// Called by [`Enricher::new`](crate::Enricher::new) before any
    /// remote call; a failure aborts the whole run.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.raster_api_key.trim().is_empty() {
            return Err(ConfigError::MissingCredential("raster_api_key"));
        }
        if self.places_api_key.trim().is_empty() {
            return Err(ConfigError::MissingCredential("places_api_key"));
        }
        if self.page_cap == 0 {
            return Err(ConfigError::ZeroPageCap);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> EnrichmentConfig {
        EnrichmentConfig::builder()
            .catalog_path("locations.json")
            .raster_api_key("k1")
            .places_api_key("k2")
            .build()
    }

    #[test]
    fn valid_config_passes() {
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn blank_raster_key_is_missing() {
        let mut config = valid_config();
        config.raster_api_key = "   ".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::MissingCredential("raster_api_key"))
        ));
    }

    #[test]
    fn empty_places_key_is_missing() {
        let mut config = valid_config();
        config.places_api_key = String::new();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::MissingCredential("places_api_key"))
        ));
    }

    #[test]
    fn zero_page_cap_rejected() {
        let mut config = valid_config();
        config.page_cap = 0;
        assert!(matches!(config.validate(), Err(ConfigError::ZeroPageCap)));
    }

    #[test]
    fn defaults_match_documented_constants() {
        let config = valid_config();
        assert_eq!(config.search_radius_m, DEFAULT_SEARCH_RADIUS_M);
        assert_eq!(config.window_days, DEFAULT_WINDOW_DAYS);
        assert_eq!(config.page_cap, DEFAULT_PAGE_CAP);
        assert_eq!(config.page_delay, DEFAULT_PAGE_DELAY);
    }
}
