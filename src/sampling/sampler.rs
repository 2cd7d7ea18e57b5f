//! Resolves one scalar observation per (location, date, dataset) with
//! temporal windowing and the dataset's validity mask.

use crate::sampling::dataset::DatasetDescriptor;
use crate::sampling::error::SampleError;
use crate::sampling::source::RasterSource;
use crate::types::location::Location;
use chrono::NaiveDate;

/// Samples a named dataset at a location around a target date.
///
/// The sampler queries the window `[target - w, target + w + 1)`
/// (expanded to the calendar month for monthly composites), masks
/// invalid raw values per the dataset descriptor, and reduces the
/// remainder by mean. Zero surviving observations yield `Ok(None)`,
/// never a substituted default.
pub struct RasterSampler {
    source: Box<dyn RasterSource>,
}

impl RasterSampler {
    pub fn new(source: Box<dyn RasterSource>) -> Self {
        Self { source }
    }

    /// One observation for `location` on `target_date`.
    ///
    /// `window_days = 0` means exact-date match only; widening the
    /// window is the documented mitigation for sparse revisit and
    /// cloud cover. Idempotent: no side effect beyond the remote
    /// query.
    ///
    /// # Errors
    ///
    /// Returns [`SampleError`] when the remote query itself fails.
    /// Callers iterating many (location, date) pairs recover this
    /// locally; see [`EnrichmentDriver`](crate::EnrichmentDriver).
    pub async fn sample(
        &self,
        location: &Location,
        target_date: NaiveDate,
        dataset: &DatasetDescriptor,
        window_days: u32,
    ) -> Result<Option<f64>, SampleError> {
        let (start, end) = dataset.cadence.window(target_date, window_days);
        let samples = self
            .source
            .query_window(dataset, location.point(), start, end)
            .await?;

        let valid: Vec<f64> = samples
            .iter()
            .filter(|s| dataset.is_valid(s.value))
            .map(|s| dataset.to_physical(s.value))
            .collect();

        if valid.is_empty() {
            return Ok(None);
        }
        Ok(Some(valid.iter().sum::<f64>() / valid.len() as f64))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::enricher::LatLon;
    use crate::sampling::dataset::{builtin_datasets, Cadence};
    use crate::sampling::source::RasterSample;
    use async_trait::async_trait;
    use std::collections::HashMap;

    /// In-memory raster source keyed by acquisition date. Optionally
    /// fails every query for a configured location.
    pub(crate) struct StubRasterSource {
        pub samples: HashMap<NaiveDate, f64>,
        pub fail_for_latitude: Option<f64>,
    }

    impl StubRasterSource {
        pub fn with_samples(samples: &[(NaiveDate, f64)]) -> Self {
            Self {
                samples: samples.iter().copied().collect(),
                fail_for_latitude: None,
            }
        }
    }

    #[async_trait]
    impl RasterSource for StubRasterSource {
        async fn query_window(
            &self,
            _dataset: &DatasetDescriptor,
            point: LatLon,
            start: NaiveDate,
            end: NaiveDate,
        ) -> Result<Vec<RasterSample>, SampleError> {
            if Some(point.0) == self.fail_for_latitude {
                return Err(SampleError::UnknownDataset("stub failure".to_string()));
            }
            let mut out: Vec<RasterSample> = self
                .samples
                .iter()
                .filter(|(date, _)| **date >= start && **date < end)
                .map(|(date, value)| RasterSample {
                    date: *date,
                    value: *value,
                })
                .collect();
            out.sort_by_key(|s| s.date);
            Ok(out)
        }
    }

    pub(crate) fn test_location() -> Location {
        Location {
            place_id: Some("stub".to_string()),
            name: "Stub Cafe".to_string(),
            address: None,
            latitude: 52.52,
            longitude: 13.4,
            rating: None,
            user_ratings_total: None,
        }
    }

    pub(crate) fn test_dataset() -> DatasetDescriptor {
        DatasetDescriptor {
            name: "ndvi".to_string(),
            collection: "stub".to_string(),
            band: "NDVI".to_string(),
            scale_m: 10,
            scale_factor: 1.0,
            offset: 0.0,
            valid_range: Some((-1.0, 1.0)),
            no_data: Some(-9999.0),
            cadence: Cadence::Daily,
        }
    }

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, day).unwrap()
    }

    #[tokio::test]
    async fn window_bridges_sentinel_on_target_date() {
        // Sentinel on the target date, valid neighbors either side.
        let source = StubRasterSource::with_samples(&[
            (d(9), 0.40),
            (d(10), -9999.0),
            (d(11), 0.50),
        ]);
        let sampler = RasterSampler::new(Box::new(source));
        let dataset = test_dataset();

        let value = sampler
            .sample(&test_location(), d(10), &dataset, 1)
            .await
            .unwrap();
        assert_eq!(value, Some(0.45));
    }

    #[tokio::test]
    async fn zero_window_with_only_sentinel_is_absent() {
        let source = StubRasterSource::with_samples(&[
            (d(9), 0.40),
            (d(10), -9999.0),
            (d(11), 0.50),
        ]);
        let sampler = RasterSampler::new(Box::new(source));
        let dataset = test_dataset();

        let value = sampler
            .sample(&test_location(), d(10), &dataset, 0)
            .await
            .unwrap();
        assert_eq!(value, None);
    }

    #[tokio::test]
    async fn exact_date_match_with_zero_window() {
        let source = StubRasterSource::with_samples(&[(d(10), 0.42)]);
        let sampler = RasterSampler::new(Box::new(source));
        let dataset = test_dataset();

        let value = sampler
            .sample(&test_location(), d(10), &dataset, 0)
            .await
            .unwrap();
        assert_eq!(value, Some(0.42));
    }

    #[tokio::test]
    async fn out_of_range_values_are_masked_not_averaged() {
        let source = StubRasterSource::with_samples(&[(d(10), 0.42), (d(11), 7.0)]);
        let sampler = RasterSampler::new(Box::new(source));
        let dataset = test_dataset();

        let value = sampler
            .sample(&test_location(), d(10), &dataset, 1)
            .await
            .unwrap();
        assert_eq!(value, Some(0.42));
    }

    #[tokio::test]
    async fn empty_window_is_absent_not_zero() {
        let source = StubRasterSource::with_samples(&[]);
        let sampler = RasterSampler::new(Box::new(source));
        let dataset = test_dataset();

        let value = sampler
            .sample(&test_location(), d(10), &dataset, 3)
            .await
            .unwrap();
        assert_eq!(value, None);
    }

    #[tokio::test]
    async fn query_error_propagates_to_caller() {
        let mut source = StubRasterSource::with_samples(&[(d(10), 0.42)]);
        source.fail_for_latitude = Some(52.52);
        let sampler = RasterSampler::new(Box::new(source));
        let dataset = test_dataset();

        let err = sampler
            .sample(&test_location(), d(10), &dataset, 0)
            .await
            .unwrap_err();
        assert!(matches!(err, SampleError::UnknownDataset(_)));
    }

    #[tokio::test]
    async fn monthly_dataset_samples_whole_month() {
        let nightlight = builtin_datasets()
            .into_iter()
            .find(|ds| ds.name == "nightlight")
            .unwrap();
        let source = StubRasterSource::with_samples(&[(d(1), 30.0), (d(28), 34.0)]);
        let sampler = RasterSampler::new(Box::new(source));

        // Target mid-month; both composites of June contribute.
        let value = sampler
            .sample(&test_location(), d(15), &nightlight, 0)
            .await
            .unwrap();
        assert_eq!(value, Some(32.0));
    }
}
