use crate::amenities::error::AmenitySearchError;
use crate::clients::error::{ElevationError, WeatherArchiveError};
use crate::config::ConfigError;
use crate::locations::error::LocationStoreError;
use crate::merge::error::MergeError;
use crate::output::OutputError;
use crate::pipeline::StagePlanError;
use crate::sampling::error::SampleError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EnrichError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    LocationStore(#[from] LocationStoreError),

    #[error(transparent)]
    Sample(#[from] SampleError),

    #[error(transparent)]
    AmenitySearch(#[from] AmenitySearchError),

    #[error(transparent)]
    WeatherArchive(#[from] WeatherArchiveError),

    #[error(transparent)]
    Elevation(#[from] ElevationError),

    #[error(transparent)]
    Merge(#[from] MergeError),

    #[error(transparent)]
    Output(#[from] OutputError),

    #[error(transparent)]
    StagePlan(#[from] StagePlanError),

    #[error("Failed processing DataFrame: {0}")]
    DataFrameProcessing(#[from] polars::error::PolarsError),
}
