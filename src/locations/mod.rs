pub mod error;
pub mod store;

pub use error::LocationStoreError;
pub use store::{deduplicate, DedupStrategy, LocationStore};
