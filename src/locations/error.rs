use std::path::PathBuf;
use thiserror::Error;

/// Failures reading the canonical location collection. All of these
/// are fatal: no partial output is safe to merge without a base set.
#[derive(Debug, Error)]
pub enum LocationStoreError {
    #[error("Failed to read location catalog '{0}'")]
    CatalogRead(PathBuf, #[source] std::io::Error),

    #[error("Failed to parse location catalog '{0}'")]
    CatalogParse(PathBuf, #[source] serde_json::Error),

    #[error("Location catalog '{0}' contains no locations")]
    EmptyCatalog(PathBuf),

    #[error("Failed to build location frame")]
    FrameConstruction(#[from] polars::error::PolarsError),
}
