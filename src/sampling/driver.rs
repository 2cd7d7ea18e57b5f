//! Iterates the cross-product of (unique location × date in range) and
//! assembles per-pair observations.
//!
//! Processing order is an observable contract: locations in store
//! order on the outside, dates ascending on the inside. Downstream
//! consumers rely on stable row order for diffing, so the order never
//! depends on which remote queries succeed.

use crate::sampling::dataset::DatasetDescriptor;
use crate::sampling::sampler::RasterSampler;
use crate::types::date_range::DateRange;
use crate::types::location::Location;
use crate::types::observation::{Observation, SampleOutcome};
use chrono::NaiveDate;
use log::{info, warn};
use polars::prelude::*;
use std::collections::HashMap;

/// Observations keyed by (identity, date), in first-insertion order.
///
/// Inserting an observation for an existing key overwrites the stored
/// outcome in place; the key keeps its original position. This upholds
/// the at-most-one-observation-per-key invariant even if a caller
/// passes duplicate locations.
#[derive(Debug, Default)]
pub struct ObservationSet {
    order: Vec<(String, NaiveDate)>,
    by_key: HashMap<(String, NaiveDate), Observation>,
}

impl ObservationSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or overwrites the observation for its (identity, date)
    /// key.
    pub fn insert(&mut self, observation: Observation) {
        let key = (observation.identity.clone(), observation.date);
        if self.by_key.insert(key.clone(), observation).is_none() {
            self.order.push(key);
        }
    }

    /// Observations in first-insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Observation> {
        self.order.iter().map(|key| &self.by_key[key])
    }

    /// Observations whose query failed, with their retained causes.
    pub fn failures(&self) -> impl Iterator<Item = &Observation> {
        self.iter().filter(|obs| obs.outcome.failure().is_some())
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Converts the set into a frame with columns `identity`, `date`
    /// (ISO string) and one value column named after the dataset.
    /// Absent and failed pairs carry explicit nulls.
    pub fn to_frame(&self, value_column: &str) -> PolarsResult<DataFrame> {
        let identities: Vec<String> = self.iter().map(|o| o.identity.clone()).collect();
        let dates: Vec<String> = self.iter().map(|o| o.date.to_string()).collect();
        let values: Vec<Option<f64>> = self.iter().map(|o| o.outcome.value()).collect();
        df!(
            "identity" => identities,
            "date" => dates,
            value_column => values,
        )
    }
}

/// Drives the sampling of one dataset over locations × dates.
pub struct EnrichmentDriver<'a> {
    sampler: &'a RasterSampler,
}

impl<'a> EnrichmentDriver<'a> {
    pub fn new(sampler: &'a RasterSampler) -> Self {
        Self { sampler }
    }

    /// Samples `dataset` for every (location, date) pair.
    ///
    /// Each pair is independent: a failed remote query is logged with
    /// its cause and recorded as [`SampleOutcome::Failed`], and the
    /// iteration continues. The returned set contains exactly one
    /// observation per pair regardless of per-pair failures.
    pub async fn run(
        &self,
        locations: &[Location],
        range: &DateRange,
        dataset: &DatasetDescriptor,
        window_days: u32,
    ) -> ObservationSet {
        info!(
            "Enriching {} locations with '{}' over {}..={} (window {} days)",
            locations.len(),
            dataset.name,
            range.start(),
            range.end(),
            window_days
        );

        let mut observations = ObservationSet::new();
        for location in locations {
            let identity = location.identity();
            for date in range.days() {
                let outcome = match self
                    .sampler
                    .sample(location, date, dataset, window_days)
                    .await
                {
                    Ok(Some(value)) => SampleOutcome::Sampled(value),
                    Ok(None) => SampleOutcome::Absent,
                    Err(cause) => {
                        warn!(
                            "Sampling '{}' failed for {} on {}: {}",
                            dataset.name, identity, date, cause
                        );
                        SampleOutcome::Failed(cause)
                    }
                };
                observations.insert(Observation {
                    identity: identity.clone(),
                    date,
                    dataset: dataset.name.clone(),
                    outcome,
                });
            }
        }
        observations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sampling::sampler::tests::{test_dataset, StubRasterSource};
    use crate::types::observation::SampleOutcome;
    use chrono::Datelike;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, day).unwrap()
    }

    fn location(id: &str, lat: f64) -> Location {
        Location {
            place_id: Some(id.to_string()),
            name: id.to_string(),
            address: None,
            latitude: lat,
            longitude: 13.4,
            rating: None,
            user_ratings_total: None,
        }
    }

    fn three_locations() -> Vec<Location> {
        vec![
            location("A", 52.50),
            location("B", 52.51),
            location("C", 52.52),
        ]
    }

    /// Valid data on days 1, 3 and 5 only.
    fn sparse_source() -> StubRasterSource {
        StubRasterSource::with_samples(&[(d(1), 0.10), (d(3), 0.30), (d(5), 0.50)])
    }

    #[tokio::test]
    async fn yields_one_row_per_pair_with_gaps_absent() {
        let sampler = RasterSampler::new(Box::new(sparse_source()));
        let driver = EnrichmentDriver::new(&sampler);
        let range = DateRange::new(d(1), d(5)).unwrap();

        let set = driver
            .run(&three_locations(), &range, &test_dataset(), 0)
            .await;

        assert_eq!(set.len(), 15);
        for obs in set.iter() {
            match obs.date.day() {
                1 | 3 | 5 => assert!(matches!(obs.outcome, SampleOutcome::Sampled(_))),
                2 | 4 => assert!(matches!(obs.outcome, SampleOutcome::Absent)),
                _ => unreachable!(),
            }
        }
    }

    #[tokio::test]
    async fn widened_window_bridges_gaps() {
        let sampler = RasterSampler::new(Box::new(sparse_source()));
        let driver = EnrichmentDriver::new(&sampler);
        let range = DateRange::new(d(1), d(5)).unwrap();

        let set = driver
            .run(&three_locations(), &range, &test_dataset(), 1)
            .await;

        assert_eq!(set.len(), 15);
        assert!(set
            .iter()
            .all(|obs| matches!(obs.outcome, SampleOutcome::Sampled(_))));
        // Day 2 bridges from the day-1 and day-3 neighbors.
        let day2 = set.iter().find(|o| o.date == d(2)).unwrap();
        assert_eq!(day2.outcome.value(), Some(0.2));
    }

    #[tokio::test]
    async fn row_order_is_locations_outer_dates_inner() {
        let sampler = RasterSampler::new(Box::new(sparse_source()));
        let driver = EnrichmentDriver::new(&sampler);
        let range = DateRange::new(d(1), d(3)).unwrap();

        let set = driver
            .run(&three_locations(), &range, &test_dataset(), 0)
            .await;

        let keys: Vec<(String, u32)> = set
            .iter()
            .map(|o| (o.identity.clone(), o.date.day()))
            .collect();
        assert_eq!(
            keys,
            [
                ("A".to_string(), 1),
                ("A".to_string(), 2),
                ("A".to_string(), 3),
                ("B".to_string(), 1),
                ("B".to_string(), 2),
                ("B".to_string(), 3),
                ("C".to_string(), 1),
                ("C".to_string(), 2),
                ("C".to_string(), 3),
            ]
        );
    }

    #[tokio::test]
    async fn failure_for_one_location_never_blocks_others() {
        let mut source = sparse_source();
        source.fail_for_latitude = Some(52.51); // location B
        let sampler = RasterSampler::new(Box::new(source));
        let driver = EnrichmentDriver::new(&sampler);
        let range = DateRange::new(d(1), d(1)).unwrap();

        let set = driver
            .run(&three_locations(), &range, &test_dataset(), 0)
            .await;

        assert_eq!(set.len(), 3);
        let outcomes: Vec<Option<f64>> = set.iter().map(|o| o.outcome.value()).collect();
        assert_eq!(outcomes, [Some(0.1), None, Some(0.1)]);
        assert_eq!(set.failures().count(), 1);
        assert_eq!(set.failures().next().unwrap().identity, "B");
    }

    #[tokio::test]
    async fn duplicate_keys_overwrite_in_place() {
        let mut set = ObservationSet::new();
        set.insert(Observation {
            identity: "A".to_string(),
            date: d(1),
            dataset: "ndvi".to_string(),
            outcome: SampleOutcome::Absent,
        });
        set.insert(Observation {
            identity: "B".to_string(),
            date: d(1),
            dataset: "ndvi".to_string(),
            outcome: SampleOutcome::Sampled(0.3),
        });
        set.insert(Observation {
            identity: "A".to_string(),
            date: d(1),
            dataset: "ndvi".to_string(),
            outcome: SampleOutcome::Sampled(0.7),
        });

        assert_eq!(set.len(), 2);
        let first = set.iter().next().unwrap();
        assert_eq!(first.identity, "A");
        assert_eq!(first.outcome.value(), Some(0.7));
    }

    #[tokio::test]
    async fn to_frame_carries_explicit_nulls() {
        let sampler = RasterSampler::new(Box::new(sparse_source()));
        let driver = EnrichmentDriver::new(&sampler);
        let range = DateRange::new(d(1), d(2)).unwrap();

        let set = driver
            .run(&three_locations()[..1], &range, &test_dataset(), 0)
            .await;
        let frame = set.to_frame("ndvi").unwrap();

        assert_eq!(frame.height(), 2);
        assert_eq!(frame.column("ndvi").unwrap().null_count(), 1);
        let columns: Vec<&str> = frame
            .get_column_names()
            .iter()
            .map(|c| c.as_str())
            .collect();
        assert_eq!(columns, ["identity", "date", "ndvi"]);
    }
}
