pub mod dataset;
pub mod driver;
pub mod error;
pub mod sampler;
pub mod source;

pub use dataset::{builtin_datasets, Cadence, DatasetDescriptor};
pub use driver::{EnrichmentDriver, ObservationSet};
pub use error::SampleError;
pub use sampler::RasterSampler;
pub use source::{RasterApiClient, RasterSample, RasterSource, DEFAULT_RASTER_ENDPOINT};
