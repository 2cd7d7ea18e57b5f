mod amenities;
mod clients;
mod config;
mod enricher;
mod error;
mod locations;
mod merge;
mod output;
mod pipeline;
mod sampling;
mod types;

pub use enricher::*;
pub use error::EnrichError;

pub use config::{
    ConfigError, EnrichmentConfig, DEFAULT_ELEVATION_DELAY, DEFAULT_PAGE_CAP, DEFAULT_PAGE_DELAY,
    DEFAULT_SEARCH_RADIUS_M, DEFAULT_WINDOW_DAYS,
};

pub use locations::{deduplicate, DedupStrategy, LocationStore, LocationStoreError};

pub use sampling::{
    builtin_datasets, Cadence, DatasetDescriptor, EnrichmentDriver, ObservationSet,
    RasterApiClient, RasterSample, RasterSampler, RasterSource, SampleError,
    DEFAULT_RASTER_ENDPOINT,
};

pub use amenities::{
    count_within, nearest, AmenityCandidate, AmenityCategory, AmenityLocator, AmenitySearchError,
    NearbyPage, NearbySearchRequest, NearestAmenity, PlacesApi, PlacesApiClient,
    DEFAULT_PLACES_ENDPOINT, METERS_PER_DEGREE,
};

pub use clients::{
    season_for, DailyWeather, ElevationClient, ElevationError, WeatherArchive,
    WeatherArchiveError, DEFAULT_ELEVATION_ENDPOINT, DEFAULT_WEATHER_ENDPOINT,
};

pub use merge::{merge, MergeError};
pub use output::{write_stage, OutputError};
pub use pipeline::{Stage, StagePlan, StagePlanError, SOURCE_DATASET};

pub use types::date_range::DateRange;
pub use types::location::{normalize_address, Location, COORDINATE_KEY_DECIMALS};
pub use types::observation::{Observation, SampleOutcome};
