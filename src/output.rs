//! Writes one tabular layer per enrichment stage.
//!
//! Each stage's merged frame is persisted as a parquet file named
//! after the stage, coordinates staying in WGS84 degrees throughout.
//! The timestamped final snapshot copy is the orchestration driver's
//! responsibility, not this module's.

use log::info;
use polars::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::task;

#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to create output directory '{0}'")]
    DirCreation(PathBuf, #[source] std::io::Error),

    #[error("I/O error writing stage layer '{0}'")]
    LayerWriteIo(PathBuf, #[source] std::io::Error),

    #[error("Encoding error writing stage layer '{0}'")]
    LayerWritePolars(PathBuf, #[source] PolarsError),

    #[error("Background task failed to complete")]
    TaskJoin(#[from] task::JoinError),
}

/// Writes `frame` as the layer for `stage` under `dir`, returning the
/// written path. An existing layer for the stage is overwritten; the
/// pipeline has no partial-progress checkpointing, so a rerun rewrites
/// the whole layer.
pub async fn write_stage(
    frame: &DataFrame,
    dir: &Path,
    stage: &str,
) -> Result<PathBuf, OutputError> {
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|e| OutputError::DirCreation(dir.to_path_buf(), e))?;

    let path = dir.join(format!("{stage}.parquet"));
    let path_clone = path.clone();
    let mut df = frame.clone();
    task::spawn_blocking(move || {
        let file = std::fs::File::create(&path_clone)
            .map_err(|e| OutputError::LayerWriteIo(path_clone.clone(), e))?;
        ParquetWriter::new(file)
            .with_compression(ParquetCompression::Snappy)
            .finish(&mut df)
            .map_err(|e| OutputError::LayerWritePolars(path_clone, e))?;
        Ok::<(), OutputError>(())
    })
    .await??;

    info!("Wrote stage layer '{stage}' to {path:?}");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn round_trips_a_stage_layer() {
        let dir = tempfile::tempdir().unwrap();
        let frame = df!(
            "identity" => ["A", "B"],
            "lat" => [52.50, 52.51],
            "ndvi" => [Some(0.4), None],
        )
        .unwrap();

        let path = write_stage(&frame, dir.path(), "locations_ndvi")
            .await
            .unwrap();
        assert_eq!(path.file_name().unwrap(), "locations_ndvi.parquet");

        let read_back = LazyFrame::scan_parquet(&path, Default::default())
            .unwrap()
            .collect()
            .unwrap();
        assert!(read_back.equals_missing(&frame));
    }

    #[tokio::test]
    async fn rewrites_existing_layer() {
        let dir = tempfile::tempdir().unwrap();
        let first = df!("identity" => ["A"], "v" => [1.0]).unwrap();
        let second = df!("identity" => ["A", "B"], "v" => [2.0, 3.0]).unwrap();

        write_stage(&first, dir.path(), "stage").await.unwrap();
        let path = write_stage(&second, dir.path(), "stage").await.unwrap();

        let read_back = LazyFrame::scan_parquet(&path, Default::default())
            .unwrap()
            .collect()
            .unwrap();
        assert_eq!(read_back.height(), 2);
    }
}
