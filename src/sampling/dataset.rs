//! Dataset descriptors for the remote raster collections.
//!
//! Every sampled attribute is described by one [`DatasetDescriptor`];
//! adding a dataset means registering a descriptor, never copying a
//! pipeline. The validity predicate and scale factor encode each
//! collection's documented sentinel and unit conventions so that
//! no-data values are masked before aggregation rather than averaged
//! in.

use chrono::{Datelike, Duration, NaiveDate};

/// Temporal resolution of a raster collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cadence {
    /// Scenes are attributable to individual dates; the sampling
    /// window is `[target - w, target + w + 1)`.
    Daily,
    /// Monthly composites; the sampling window is the calendar month
    /// containing the target date, regardless of `window_days`.
    Monthly,
}

impl Cadence {
    /// The half-open date window `[start, end)` queried for a target
    /// date under this cadence.
    pub fn window(&self, target: NaiveDate, window_days: u32) -> (NaiveDate, NaiveDate) {
        match self {
            Cadence::Daily => (
                target - Duration::days(window_days as i64),
                target + Duration::days(window_days as i64 + 1),
            ),
            Cadence::Monthly => {
                let month_start = first_of_month(target);
                (month_start, first_of_next_month(target))
            }
        }
    }
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(date.year(), date.month(), 1).expect("day 1 always exists")
}

fn first_of_next_month(date: NaiveDate) -> NaiveDate {
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1).expect("day 1 always exists")
}

/// Describes one remote raster collection and how its raw digital
/// numbers become physical values.
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetDescriptor {
    /// Short name, also the output column name (e.g. "ndvi").
    pub name: String,
    /// Remote collection identifier.
    pub collection: String,
    /// Band sampled from the collection.
    pub band: String,
    /// Native pixel scale in meters at which the point is sampled.
    pub scale_m: u32,
    /// Multiplier from raw digital number to physical units.
    pub scale_factor: f64,
    /// Additive offset applied after scaling.
    pub offset: f64,
    /// Inclusive raw-value range outside which a sample is invalid.
    pub valid_range: Option<(f64, f64)>,
    /// Documented no-data sentinel in raw units.
    pub no_data: Option<f64>,
    /// Temporal resolution of the collection.
    pub cadence: Cadence,
}

impl DatasetDescriptor {
    /// Whether a raw sample value passes the validity mask. Sentinel,
    /// out-of-range, and non-finite values are excluded before
    /// aggregation.
    pub fn is_valid(&self, raw: f64) -> bool {
        if !raw.is_finite() {
            return false;
        }
        if let Some(sentinel) = self.no_data {
            if raw == sentinel {
                return false;
            }
        }
        if let Some((lo, hi)) = self.valid_range {
            if raw < lo || raw > hi {
                return false;
            }
        }
        true
    }

    /// Converts a raw sample value to physical units.
    pub fn to_physical(&self, raw: f64) -> f64 {
        raw * self.scale_factor + self.offset
    }
}

/// The built-in dataset registry.
///
/// - `ndvi` — Sentinel-2 surface-reflectance normalized difference
///   vegetation index, 10 m.
/// - `no2` — Sentinel-5P tropospheric NO2 column density, 1 km.
/// - `aod` — MODIS MAIAC aerosol optical depth at 470 nm, 1 km;
///   raw fill value -28672 is masked, raw units are scaled by 0.001.
/// - `nightlight` — VIIRS DNB monthly average radiance, 500 m,
///   monthly composites.
/// - `lst_c` — MODIS daily land-surface temperature, 1 km; raw DN
///   scales by 0.02 to Kelvin and is offset to Celsius.
pub fn builtin_datasets() -> Vec<DatasetDescriptor> {
    vec![
        DatasetDescriptor {
            name: "ndvi".to_string(),
            collection: "COPERNICUS/S2_SR_HARMONIZED".to_string(),
            band: "NDVI".to_string(),
            scale_m: 10,
            scale_factor: 1.0,
            offset: 0.0,
            valid_range: Some((-1.0, 1.0)),
            no_data: None,
            cadence: Cadence::Daily,
        },
        DatasetDescriptor {
            name: "no2".to_string(),
            collection: "COPERNICUS/S5P/NRTI/L3_NO2".to_string(),
            band: "NO2_column_number_density".to_string(),
            scale_m: 1000,
            scale_factor: 1.0,
            offset: 0.0,
            valid_range: None,
            no_data: None,
            cadence: Cadence::Daily,
        },
        DatasetDescriptor {
            name: "aod".to_string(),
            collection: "MODIS/061/MCD19A2_GRANULES".to_string(),
            band: "Optical_Depth_047".to_string(),
            scale_m: 1000,
            scale_factor: 0.001,
            offset: 0.0,
            valid_range: Some((-100.0, 5000.0)),
            no_data: Some(-28672.0),
            cadence: Cadence::Daily,
        },
        DatasetDescriptor {
            name: "nightlight".to_string(),
            collection: "NOAA/VIIRS/DNB/MONTHLY_V1/VCMCFG".to_string(),
            band: "avg_rad".to_string(),
            scale_m: 500,
            scale_factor: 1.0,
            offset: 0.0,
            valid_range: None,
            no_data: None,
            cadence: Cadence::Monthly,
        },
        DatasetDescriptor {
            name: "lst_c".to_string(),
            collection: "MODIS/061/MOD11A1".to_string(),
            band: "LST_Day_1km".to_string(),
            scale_m: 1000,
            scale_factor: 0.02,
            offset: -273.15,
            valid_range: Some((7500.0, 65535.0)),
            no_data: Some(0.0),
            cadence: Cadence::Daily,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn by_name(name: &str) -> DatasetDescriptor {
        builtin_datasets()
            .into_iter()
            .find(|ds| ds.name == name)
            .unwrap()
    }

    #[test]
    fn daily_window_is_half_open_around_target() {
        let (start, end) = Cadence::Daily.window(d(2025, 6, 10), 1);
        assert_eq!(start, d(2025, 6, 9));
        assert_eq!(end, d(2025, 6, 12));
    }

    #[test]
    fn zero_window_covers_exactly_the_target_date() {
        let (start, end) = Cadence::Daily.window(d(2025, 6, 10), 0);
        assert_eq!(start, d(2025, 6, 10));
        assert_eq!(end, d(2025, 6, 11));
    }

    #[test]
    fn monthly_window_expands_to_calendar_month() {
        let (start, end) = Cadence::Monthly.window(d(2025, 6, 10), 0);
        assert_eq!(start, d(2025, 6, 1));
        assert_eq!(end, d(2025, 7, 1));
        // window_days has no finer meaning for monthly composites
        assert_eq!(Cadence::Monthly.window(d(2025, 6, 10), 5), (start, end));
    }

    #[test]
    fn monthly_window_crosses_year_boundary() {
        let (start, end) = Cadence::Monthly.window(d(2025, 12, 31), 0);
        assert_eq!(start, d(2025, 12, 1));
        assert_eq!(end, d(2026, 1, 1));
    }

    #[test]
    fn aod_sentinel_is_masked() {
        let aod = by_name("aod");
        assert!(!aod.is_valid(-28672.0));
        assert!(aod.is_valid(120.0));
        assert!(!aod.is_valid(6000.0));
        assert!((aod.to_physical(120.0) - 0.12).abs() < 1e-12);
    }

    #[test]
    fn lst_scales_to_celsius() {
        let lst = by_name("lst_c");
        assert!(!lst.is_valid(0.0));
        assert!(!lst.is_valid(7000.0));
        // 15000 DN * 0.02 = 300 K = 26.85 C
        assert!((lst.to_physical(15000.0) - 26.85).abs() < 1e-9);
    }

    #[test]
    fn ndvi_rejects_out_of_range_and_non_finite() {
        let ndvi = by_name("ndvi");
        assert!(ndvi.is_valid(0.42));
        assert!(!ndvi.is_valid(1.5));
        assert!(!ndvi.is_valid(f64::NAN));
    }

    #[test]
    fn registry_names_are_unique() {
        let datasets = builtin_datasets();
        let mut names: Vec<&str> = datasets.iter().map(|ds| ds.name.as_str()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), datasets.len());
    }
}
