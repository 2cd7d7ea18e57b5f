//! The canonical location set: catalog loading and deduplication.
//!
//! The store is the single owner of the location collection; every
//! other component works on read-only snapshots and returns values
//! keyed by location identity.

use crate::locations::error::LocationStoreError;
use crate::types::location::{Location, COORDINATE_KEY_DECIMALS};
use log::info;
use polars::prelude::*;
use std::collections::HashSet;
use std::hash::Hash;
use std::path::{Path, PathBuf};

/// Selects the key under which duplicate catalog entries are
/// collapsed. Different upstream sources expose different identity
/// fields, so the strategy is chosen per run rather than hard-coded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DedupStrategy {
    /// The full identity chain: place identifier, falling back to
    /// normalized address, falling back to rounded coordinates.
    #[default]
    Identity,
    /// External place identifier where present, identity chain
    /// otherwise.
    PlaceId,
    /// Normalized address where present, rounded coordinates
    /// otherwise.
    NormalizedAddress,
    /// Coordinate pair rounded to the given number of decimals.
    RoundedCoordinate { decimals: u32 },
}

impl DedupStrategy {
    /// The dedup key this strategy derives for a location.
    pub fn key(&self, location: &Location) -> String {
        match self {
            DedupStrategy::Identity => location.identity(),
            DedupStrategy::PlaceId => location
                .place_id
                .as_deref()
                .filter(|id| !id.trim().is_empty())
                .map(str::to_string)
                .unwrap_or_else(|| location.identity()),
            DedupStrategy::NormalizedAddress => {
                let normalized = location
                    .address
                    .as_deref()
                    .map(crate::types::location::normalize_address)
                    .unwrap_or_default();
                if normalized.is_empty() {
                    location.coordinate_key(COORDINATE_KEY_DECIMALS)
                } else {
                    normalized
                }
            }
            DedupStrategy::RoundedCoordinate { decimals } => location.coordinate_key(*decimals),
        }
    }
}

/// Removes later duplicates under `key_fn`, preserving first-seen
/// order. For any group of locations sharing a key, the output keeps
/// exactly the first instance in original order.
pub fn deduplicate<K, F>(locations: Vec<Location>, mut key_fn: F) -> Vec<Location>
where
    K: Hash + Eq,
    F: FnMut(&Location) -> K,
{
    let mut seen = HashSet::new();
    locations
        .into_iter()
        .filter(|location| seen.insert(key_fn(location)))
        .collect()
}

/// Owns the canonical, deduplicated location collection for one run.
#[derive(Debug, Clone)]
pub struct LocationStore {
    locations: Vec<Location>,
    catalog_path: PathBuf,
}

impl LocationStore {
    /// Loads the catalog JSON and collapses duplicates under
    /// `strategy`.
    ///
    /// # Errors
    ///
    /// Returns a [`LocationStoreError`] when the file cannot be read,
    /// cannot be parsed, or yields an empty collection. All three are
    /// fatal for the run.
    pub async fn load(path: &Path, strategy: DedupStrategy) -> Result<Self, LocationStoreError> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| LocationStoreError::CatalogRead(path.to_path_buf(), e))?;
        let raw: Vec<Location> = serde_json::from_slice(&bytes)
            .map_err(|e| LocationStoreError::CatalogParse(path.to_path_buf(), e))?;
        if raw.is_empty() {
            return Err(LocationStoreError::EmptyCatalog(path.to_path_buf()));
        }

        let raw_count = raw.len();
        let locations = deduplicate(raw, |loc| strategy.key(loc));
        if locations.len() < raw_count {
            info!(
                "Collapsed {} duplicate locations from catalog {:?} ({} remain)",
                raw_count - locations.len(),
                path,
                locations.len()
            );
        }
        Ok(Self {
            locations,
            catalog_path: path.to_path_buf(),
        })
    }

    /// Builds a store directly from an already-loaded collection.
    /// Deduplicates under `strategy` like [`LocationStore::load`].
    pub fn from_locations(
        locations: Vec<Location>,
        strategy: DedupStrategy,
    ) -> Result<Self, LocationStoreError> {
        if locations.is_empty() {
            return Err(LocationStoreError::EmptyCatalog(PathBuf::from(
                "<in-memory>",
            )));
        }
        Ok(Self {
            locations: deduplicate(locations, |loc| strategy.key(loc)),
            catalog_path: PathBuf::from("<in-memory>"),
        })
    }

    /// Ordered read-only snapshot of the canonical set.
    pub fn locations(&self) -> &[Location] {
        &self.locations
    }

    /// Number of unique locations in the store.
    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    /// Path the catalog was loaded from.
    pub fn catalog_path(&self) -> &Path {
        &self.catalog_path
    }

    /// The base frame every enrichment stage is merged onto: one row
    /// per unique location, identity first, coordinates in WGS84
    /// degrees.
    pub fn to_frame(&self) -> Result<DataFrame, LocationStoreError> {
        let identities: Vec<String> = self.locations.iter().map(Location::identity).collect();
        let place_ids: Vec<Option<String>> =
            self.locations.iter().map(|l| l.place_id.clone()).collect();
        let names: Vec<String> = self.locations.iter().map(|l| l.name.clone()).collect();
        let addresses: Vec<Option<String>> =
            self.locations.iter().map(|l| l.address.clone()).collect();
        let lats: Vec<f64> = self.locations.iter().map(|l| l.latitude).collect();
        let lons: Vec<f64> = self.locations.iter().map(|l| l.longitude).collect();
        let ratings: Vec<Option<f64>> = self.locations.iter().map(|l| l.rating).collect();
        let rating_counts: Vec<Option<u32>> =
            self.locations.iter().map(|l| l.user_ratings_total).collect();

        let frame = df!(
            "identity" => identities,
            "place_id" => place_ids,
            "name" => names,
            "address" => addresses,
            "lat" => lats,
            "lon" => lons,
            "rating" => ratings,
            "user_ratings_total" => rating_counts,
        )?;
        Ok(frame)
    }
}
