use thiserror::Error;

#[derive(Debug, Error)]
pub enum MergeError {
    #[error("Join key column '{key}' missing from the {side} frame")]
    MissingKeyColumn { key: String, side: &'static str },

    #[error("Join failed")]
    Join(#[from] polars::error::PolarsError),
}
