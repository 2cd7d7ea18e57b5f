//! Paged amenity search around a location.

use crate::amenities::category::AmenityCategory;
use crate::amenities::error::AmenitySearchError;
use crate::amenities::places::{AmenityCandidate, NearbySearchRequest, PlacesApi};
use crate::enricher::LatLon;
use log::info;
use std::time::Duration;

/// Searches points of interest around a location, chaining result
/// pages through continuation tokens.
///
/// Pagination stops at the page cap (bounding worst-case cost) or when
/// no continuation token is returned. The upstream source rejects a
/// token that is used immediately, so a fixed delay is awaited between
/// receiving a token and sending it.
pub struct AmenityLocator {
    api: Box<dyn PlacesApi>,
    page_cap: usize,
    page_delay: Duration,
}

impl AmenityLocator {
    pub fn new(api: Box<dyn PlacesApi>, page_cap: usize, page_delay: Duration) -> Self {
        Self {
            api,
            page_cap,
            page_delay,
        }
    }

    /// All candidates of `category` within `radius_m` of `center`,
    /// across up to `page_cap` pages.
    ///
    /// # Errors
    ///
    /// Returns the underlying [`AmenitySearchError`] as a hard error
    /// for this location; it is not retried here. True zero results is
    /// `Ok(vec![])`, never an error.
    pub async fn search(
        &self,
        center: LatLon,
        radius_m: f64,
        category: &AmenityCategory,
        open_now: bool,
    ) -> Result<Vec<AmenityCandidate>, AmenitySearchError> {
        let request = NearbySearchRequest {
            center,
            radius_m,
            category: category.clone(),
            open_now,
        };

        let mut candidates = Vec::new();
        let mut token: Option<String> = None;
        for page_index in 0..self.page_cap {
            if page_index > 0 {
                // The token was just issued; it is unusable until the
                // upstream source has materialized the page.
                tokio::time::sleep(self.page_delay).await;
            }
            let page = self.api.nearby_page(&request, token.as_deref()).await?;
            candidates.extend(page.candidates);
            match page.next_page_token {
                Some(next) => token = Some(next),
                None => break,
            }
        }

        info!(
            "Found {} '{}' candidates within {:.0} m of ({:.5}, {:.5})",
            candidates.len(),
            category.column_prefix,
            radius_m,
            center.0,
            center.1
        );
        Ok(candidates)
    }
}
