pub mod category;
pub mod error;
pub mod locator;
pub mod nearest;
pub mod places;

pub use category::AmenityCategory;
pub use error::AmenitySearchError;
pub use locator::AmenityLocator;
pub use nearest::{count_within, nearest, NearestAmenity, METERS_PER_DEGREE};
pub use places::{
    AmenityCandidate, NearbyPage, NearbySearchRequest, PlacesApi, PlacesApiClient,
    DEFAULT_PLACES_ENDPOINT,
};
