//! This module provides the main entry point for running enrichment
//! stages over a location catalog. Each stage resolves one family of
//! attributes (raster dataset, nearby amenities, archived weather,
//! elevation) and returns the location collection with the new columns
//! merged on.

use crate::amenities::category::AmenityCategory;
use crate::amenities::locator::AmenityLocator;
use crate::amenities::nearest::{count_within, nearest};
use crate::amenities::places::{PlacesApi, PlacesApiClient};
use crate::clients::elevation::ElevationClient;
use crate::clients::weather::{season_for, DailyWeather, WeatherArchive};
use crate::config::EnrichmentConfig;
use crate::error::EnrichError;
use crate::locations::store::LocationStore;
use crate::merge::merger::merge;
use crate::sampling::dataset::{builtin_datasets, DatasetDescriptor};
use crate::sampling::driver::EnrichmentDriver;
use crate::sampling::error::SampleError;
use crate::sampling::sampler::RasterSampler;
use crate::sampling::source::{RasterApiClient, RasterSource};
use crate::types::date_range::DateRange;
use bon::bon;
use chrono::NaiveDate;
use log::warn;
use polars::prelude::*;
use std::collections::HashMap;

/// Represents a geographical coordinate using latitude and longitude.
///
/// Latitude is the first element (index 0), and longitude is the
/// second (index 1). Both values are WGS84 decimal degrees.
///
/// # Examples
///
/// ```
/// use geoenrich::LatLon;
///
/// let berlin_center = LatLon(52.5200, 13.4050);
/// assert_eq!(berlin_center.0, 52.5200); // Latitude
/// assert_eq!(berlin_center.1, 13.4050); // Longitude
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLon(pub f64, pub f64);

/// The main client for enriching a location catalog.
///
/// Owns the canonical [`LocationStore`] and the remote-source clients.
/// Every enrichment method walks the store sequentially (one
/// outstanding remote query at a time), recovers per-location and
/// per-date failures as explicit absent values, and left-joins the new
/// columns onto the location collection. Output row order follows
/// store order — locations outer, dates inner — independent of which
/// queries succeed.
pub struct Enricher {
    config: EnrichmentConfig,
    store: LocationStore,
    sampler: RasterSampler,
    locator: AmenityLocator,
    weather: WeatherArchive,
    elevation: ElevationClient,
    datasets: Vec<DatasetDescriptor>,
}

impl std::fmt::Debug for Enricher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Enricher").finish_non_exhaustive()
    }
}

#[bon]
impl Enricher {
    /// Creates a client against the production remote sources.
    ///
    /// Validates the configuration first — a missing credential aborts
    /// here, before any remote call — then loads and deduplicates the
    /// location catalog.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`](crate::ConfigError) variants for
    /// unusable configuration and
    /// [`LocationStoreError`](crate::LocationStoreError) variants when
    /// the catalog is missing, unreadable, or empty.
    pub async fn new(config: EnrichmentConfig) -> Result<Self, EnrichError> {
        config.validate()?;
        let raster: Box<dyn RasterSource> = Box::new(match &config.raster_endpoint {
            Some(url) => RasterApiClient::with_base_url(config.raster_api_key.as_str(), url.as_str()),
            None => RasterApiClient::new(config.raster_api_key.as_str()),
        });
        let places: Box<dyn PlacesApi> = Box::new(match &config.places_endpoint {
            Some(url) => {
                PlacesApiClient::with_endpoint(config.places_api_key.as_str(), url.as_str())
            }
            None => PlacesApiClient::new(config.places_api_key.as_str()),
        });
        let store = LocationStore::load(&config.catalog_path, config.dedup).await?;
        Ok(Self::assemble(config, store, raster, places))
    }

    /// Creates a client over an existing store and injected raster and
    /// places backends. Useful for alternative data sources and for
    /// tests; the weather and elevation clients still come from the
    /// configuration's endpoint overrides.
    pub fn with_sources(
        config: EnrichmentConfig,
        store: LocationStore,
        raster: Box<dyn RasterSource>,
        places: Box<dyn PlacesApi>,
    ) -> Result<Self, EnrichError> {
        config.validate()?;
        Ok(Self::assemble(config, store, raster, places))
    }

    fn assemble(
        config: EnrichmentConfig,
        store: LocationStore,
        raster: Box<dyn RasterSource>,
        places: Box<dyn PlacesApi>,
    ) -> Self {
        let weather = match &config.weather_endpoint {
            Some(url) => WeatherArchive::with_endpoint(url.as_str()),
            None => WeatherArchive::new(),
        };
        let elevation = match &config.elevation_endpoint {
            Some(url) => ElevationClient::with_endpoint(url.as_str()),
            None => ElevationClient::new(),
        };
        let locator = AmenityLocator::new(places, config.page_cap, config.page_delay);
        Self {
            sampler: RasterSampler::new(raster),
            locator,
            weather,
            elevation,
            datasets: builtin_datasets(),
            store,
            config,
        }
    }

    /// The canonical location store backing this client.
    pub fn store(&self) -> &LocationStore {
        &self.store
    }

    /// Registers an additional dataset descriptor. A descriptor with
    /// an existing name replaces the registered one.
    pub fn register_dataset(&mut self, descriptor: DatasetDescriptor) {
        self.datasets.retain(|ds| ds.name != descriptor.name);
        self.datasets.push(descriptor);
    }

    fn dataset(&self, name: &str) -> Result<&DatasetDescriptor, SampleError> {
        self.datasets
            .iter()
            .find(|ds| ds.name == name)
            .ok_or_else(|| SampleError::UnknownDataset(name.to_string()))
    }

    /// Samples a named raster dataset for every (location, date) pair
    /// in `range` and merges the values onto the location collection.
    ///
    /// The result has one row per (location, date) pair — locations in
    /// store order, dates ascending — with an explicit null where no
    /// valid observation survived the window and validity mask.
    ///
    /// # Arguments
    ///
    /// * `.dataset(&str)`: **Required.** Registered dataset name
    ///   (e.g. "ndvi").
    /// * `.range(DateRange)`: **Required.** The closed date range to
    ///   enrich.
    /// * `.window_days(u32)`: Optional. Temporal window; defaults to
    ///   the configured value. Zero means exact-date match only.
    ///
    /// # Errors
    ///
    /// Returns [`SampleError::UnknownDataset`] for an unregistered
    /// name. Individual query failures are recovered as nulls and do
    /// not abort the run.
    #[builder]
    pub async fn enrich_dataset(
        &self,
        dataset: &str,
        range: DateRange,
        window_days: Option<u32>,
    ) -> Result<DataFrame, EnrichError> {
        let descriptor = self.dataset(dataset)?.clone();
        let window_days = window_days.unwrap_or(self.config.window_days);

        let driver = EnrichmentDriver::new(&self.sampler);
        let observations = driver
            .run(self.store.locations(), &range, &descriptor, window_days)
            .await;

        let new = observations.to_frame(&descriptor.name)?;
        let base = self.store.to_frame()?;
        let merged = merge(&base, &new, "identity", &["date", descriptor.name.as_str()])?;
        Ok(merged)
    }

    /// Finds the nearest amenity of a category for every location,
    /// along with the number of candidates inside the search radius,
    /// and merges both onto the location collection.
    ///
    /// Output columns are prefixed with the category's column prefix:
    /// `<prefix>_name`, `<prefix>_lat`, `<prefix>_lon`,
    /// `<prefix>_distance_m` and `<prefix>_count_<radius>m`.
    ///
    /// A location with a true zero-results search keeps the explicit
    /// no-match marker (null name and distance) with a count of zero.
    /// A failed search is logged and yields nulls throughout —
    /// including the count — so it is never mistaken for zero results.
    ///
    /// # Arguments
    ///
    /// * `.category(AmenityCategory)`: **Required.** What to search
    ///   for.
    /// * `.radius_m(f64)`: Optional. Search radius; defaults to the
    ///   configured value.
    /// * `.open_now(bool)`: Optional. Restrict to amenities open at
    ///   query time. Defaults to false.
    #[builder]
    pub async fn nearest_amenities(
        &self,
        category: AmenityCategory,
        radius_m: Option<f64>,
        open_now: Option<bool>,
    ) -> Result<DataFrame, EnrichError> {
        let radius_m = radius_m.unwrap_or(self.config.search_radius_m);
        let open_now = open_now.unwrap_or(false);
        let prefix = category.column_prefix.clone();

        let mut identities: Vec<String> = Vec::new();
        let mut names: Vec<Option<String>> = Vec::new();
        let mut lats: Vec<Option<f64>> = Vec::new();
        let mut lons: Vec<Option<f64>> = Vec::new();
        let mut distances: Vec<Option<f64>> = Vec::new();
        let mut counts: Vec<Option<u32>> = Vec::new();

        for location in self.store.locations() {
            let identity = location.identity();
            match self
                .locator
                .search(location.point(), radius_m, &category, open_now)
                .await
            {
                Ok(candidates) => {
                    counts.push(Some(
                        count_within(location.point(), &candidates, radius_m) as u32
                    ));
                    match nearest(location.point(), &candidates) {
                        Some(found) => {
                            names.push(Some(found.name));
                            lats.push(Some(found.latitude));
                            lons.push(Some(found.longitude));
                            distances.push(Some(found.distance_m));
                        }
                        None => {
                            names.push(None);
                            lats.push(None);
                            lons.push(None);
                            distances.push(None);
                        }
                    }
                }
                Err(cause) => {
                    warn!("Amenity search '{prefix}' failed for {identity}: {cause}");
                    counts.push(None);
                    names.push(None);
                    lats.push(None);
                    lons.push(None);
                    distances.push(None);
                }
            }
            identities.push(identity);
        }

        let name_column = format!("{prefix}_name");
        let lat_column = format!("{prefix}_lat");
        let lon_column = format!("{prefix}_lon");
        let distance_column = format!("{prefix}_distance_m");
        let count_column = format!("{prefix}_count_{radius_m:.0}m");

        let new = df!(
            "identity" => identities,
            name_column.as_str() => names,
            lat_column.as_str() => lats,
            lon_column.as_str() => lons,
            distance_column.as_str() => distances,
            count_column.as_str() => counts,
        )?;
        let replace = [
            name_column.as_str(),
            lat_column.as_str(),
            lon_column.as_str(),
            distance_column.as_str(),
            count_column.as_str(),
        ];
        let merged = merge(&self.store.to_frame()?, &new, "identity", &replace)?;
        Ok(merged)
    }

    /// Fetches archived daily weather for every location over `range`
    /// and merges the per-date rows onto the location collection.
    ///
    /// Every (location, date) pair yields exactly one row; an archive
    /// failure for one location is logged and leaves that location's
    /// values null without blocking the others. The meteorological
    /// season is derived from the date itself and is always present.
    #[builder]
    pub async fn daily_weather(&self, range: DateRange) -> Result<DataFrame, EnrichError> {
        let mut identities: Vec<String> = Vec::new();
        let mut dates: Vec<String> = Vec::new();
        let mut temp_max: Vec<Option<f64>> = Vec::new();
        let mut temp_min: Vec<Option<f64>> = Vec::new();
        let mut precipitation: Vec<Option<f64>> = Vec::new();
        let mut seasons: Vec<&'static str> = Vec::new();

        for location in self.store.locations() {
            let identity = location.identity();
            let by_date: HashMap<NaiveDate, DailyWeather> =
                match self.weather.daily_series(location.point(), &range).await {
                    Ok(series) => series.into_iter().map(|day| (day.date, day)).collect(),
                    Err(cause) => {
                        warn!("Weather archive query failed for {identity}: {cause}");
                        HashMap::new()
                    }
                };

            for date in range.days() {
                identities.push(identity.clone());
                dates.push(date.to_string());
                seasons.push(season_for(date));
                match by_date.get(&date) {
                    Some(day) => {
                        temp_max.push(day.temp_max);
                        temp_min.push(day.temp_min);
                        precipitation.push(day.precipitation_mm);
                    }
                    None => {
                        temp_max.push(None);
                        temp_min.push(None);
                        precipitation.push(None);
                    }
                }
            }
        }

        let new = df!(
            "identity" => identities,
            "date" => dates,
            "temp_max" => temp_max,
            "temp_min" => temp_min,
            "precip_mm" => precipitation,
            "season" => seasons,
        )?;
        let replace = ["date", "temp_max", "temp_min", "precip_mm", "season"];
        let merged = merge(&self.store.to_frame()?, &new, "identity", &replace)?;
        Ok(merged)
    }

    /// Looks up the elevation of every location and merges an
    /// `elevation_m` column onto the location collection.
    ///
    /// Lookups are paced by the configured delay; a failed lookup is
    /// logged and leaves that location's value null.
    pub async fn elevations(&self) -> Result<DataFrame, EnrichError> {
        let mut identities: Vec<String> = Vec::new();
        let mut values: Vec<Option<f64>> = Vec::new();

        for (index, location) in self.store.locations().iter().enumerate() {
            if index > 0 {
                tokio::time::sleep(self.config.elevation_delay).await;
            }
            let identity = location.identity();
            match self.elevation.elevation(location.point()).await {
                Ok(value) => values.push(value),
                Err(cause) => {
                    warn!("Elevation lookup failed for {identity}: {cause}");
                    values.push(None);
                }
            }
            identities.push(identity);
        }

        let new = df!(
            "identity" => identities,
            "elevation_m" => values,
        )?;
        let merged = merge(&self.store.to_frame()?, &new, "identity", &["elevation_m"])?;
        Ok(merged)
    }
}
