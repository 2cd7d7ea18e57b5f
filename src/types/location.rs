//! Defines the canonical location record consumed by every enrichment
//! component, along with its stable identity derivation.

use crate::enricher::LatLon;
use serde::{Deserialize, Serialize};

/// Number of decimals kept when a coordinate pair has to stand in for a
/// missing place identifier. Six decimals is roughly 0.1 m at the
/// equator, well below the spacing of distinct venues.
pub const COORDINATE_KEY_DECIMALS: u32 = 6;

/// A single named point location, as delivered by the upstream
/// places-search catalog.
///
/// The catalog file is a JSON array of these records. Only `name`,
/// `latitude` and `longitude` are guaranteed; the remaining fields are
/// carried through to the output when present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// External place identifier, the preferred identity key.
    #[serde(default)]
    pub place_id: Option<String>,
    /// Display name (e.g. "LAP Coffee Mitte").
    pub name: String,
    /// Formatted street address, if the catalog supplied one.
    #[serde(default)]
    pub address: Option<String>,
    /// Latitude in WGS84 decimal degrees.
    #[serde(alias = "lat")]
    pub latitude: f64,
    /// Longitude in WGS84 decimal degrees.
    #[serde(alias = "lon", alias = "lng")]
    pub longitude: f64,
    /// Average user rating, if the catalog supplied one.
    #[serde(default)]
    pub rating: Option<f64>,
    /// Number of user ratings behind `rating`.
    #[serde(default)]
    pub user_ratings_total: Option<u32>,
}

impl Location {
    /// Coordinate pair of this location.
    pub fn point(&self) -> LatLon {
        LatLon(self.latitude, self.longitude)
    }

    /// Stable identity of this location.
    ///
    /// Prefers the external place identifier; falls back to the
    /// normalized address, then to the coordinate pair rounded to
    /// [`COORDINATE_KEY_DECIMALS`]. Two locations with equal identity
    /// are the same physical place and are collapsed by
    /// [`deduplicate`](crate::deduplicate).
    pub fn identity(&self) -> String {
        if let Some(id) = self.place_id.as_deref().filter(|id| !id.trim().is_empty()) {
            return id.to_string();
        }
        if let Some(addr) = self.address.as_deref() {
            let normalized = normalize_address(addr);
            if !normalized.is_empty() {
                return normalized;
            }
        }
        self.coordinate_key(COORDINATE_KEY_DECIMALS)
    }

    /// Identity key derived from the coordinate pair rounded to
    /// `decimals` places.
    pub fn coordinate_key(&self, decimals: u32) -> String {
        let factor = 10f64.powi(decimals as i32);
        let lat = (self.latitude * factor).round() / factor;
        let lon = (self.longitude * factor).round() / factor;
        format!("{lat:.prec$},{lon:.prec$}", prec = decimals as usize)
    }
}

/// Lowercases, trims, and collapses interior whitespace so that
/// cosmetic differences in catalog addresses do not split one venue
/// into two.
pub fn normalize_address(address: &str) -> String {
    address
        .split_whitespace()
        .map(|part| part.to_lowercase())
        .collect::<Vec<_>>()
        .join(" ")
}
