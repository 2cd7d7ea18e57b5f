//! Per-(location, date) sampling results produced by the enrichment
//! driver.

use crate::sampling::error::SampleError;
use chrono::NaiveDate;

/// Result of sampling one (location, date) pair.
///
/// The driver moves each pair from pending to exactly one of these
/// states; there is no backtracking.
#[derive(Debug)]
pub enum SampleOutcome {
    /// The dataset yielded at least one valid value inside the window;
    /// this is their mean.
    Sampled(f64),
    /// The query succeeded but no valid observation survived the
    /// validity mask. Widening the temporal window is the documented
    /// mitigation.
    Absent,
    /// The remote query itself failed. The cause is retained for
    /// reporting; the surrounding iteration continues.
    Failed(SampleError),
}

impl SampleOutcome {
    /// The sampled value, if any. Both `Absent` and `Failed` map to
    /// `None` so output rows carry an explicit missing marker.
    pub fn value(&self) -> Option<f64> {
        match self {
            SampleOutcome::Sampled(v) => Some(*v),
            SampleOutcome::Absent | SampleOutcome::Failed(_) => None,
        }
    }

    /// The retained failure cause, if the query failed.
    pub fn failure(&self) -> Option<&SampleError> {
        match self {
            SampleOutcome::Failed(e) => Some(e),
            _ => None,
        }
    }
}

/// One enrichment value for one location identity on one date, from
/// one named dataset.
///
/// At most one observation exists per (identity, date, dataset) key;
/// recomputation overwrites rather than appends.
#[derive(Debug)]
pub struct Observation {
    /// Stable identity of the sampled location.
    pub identity: String,
    /// The target date the value is attributed to.
    pub date: NaiveDate,
    /// Name of the dataset the value came from (e.g. "ndvi").
    pub dataset: String,
    /// The per-pair state machine result.
    pub outcome: SampleOutcome,
}
