//! Nearest-candidate resolution over a small candidate set.

use crate::amenities::places::AmenityCandidate;
use crate::enricher::LatLon;
use ordered_float::OrderedFloat;

/// Flat meters-per-degree conversion used by the original deployment.
///
/// This is a planar approximation, valid only near the dataset's
/// reference latitude; it is preserved exactly (rather than replaced
/// by a geodesic formula) so distances stay comparable with prior
/// output.
pub const METERS_PER_DEGREE: f64 = 111_139.0;

/// The candidate nearest to a location, with its planar distance.
#[derive(Debug, Clone, PartialEq)]
pub struct NearestAmenity {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub distance_m: f64,
}

/// Planar distance in meters between a point and a candidate, both in
/// WGS84 degrees.
fn planar_distance_m(center: LatLon, candidate: &AmenityCandidate) -> f64 {
    let dlat = candidate.latitude - center.0;
    let dlon = candidate.longitude - center.1;
    (dlat * dlat + dlon * dlon).sqrt() * METERS_PER_DEGREE
}

/// The nearest candidate to `center`, or `None` for an empty set.
///
/// Ties are broken by first-encountered order; absence is an explicit
/// `None`, never a synthetic zero distance.
pub fn nearest(center: LatLon, candidates: &[AmenityCandidate]) -> Option<NearestAmenity> {
    let mut best: Option<(OrderedFloat<f64>, &AmenityCandidate)> = None;
    for candidate in candidates {
        let distance = OrderedFloat(planar_distance_m(center, candidate));
        match &best {
            // Strict comparison keeps the first-encountered candidate
            // on a tie.
            Some((best_distance, _)) if distance >= *best_distance => {}
            _ => best = Some((distance, candidate)),
        }
    }
    best.map(|(distance, candidate)| NearestAmenity {
        name: candidate.name.clone(),
        latitude: candidate.latitude,
        longitude: candidate.longitude,
        distance_m: distance.into_inner(),
    })
}

/// Number of candidates within `radius_m` of `center`.
///
/// Candidates are usually pre-filtered by the locator's own radius
/// parameter, but an over-returning locator must not inflate the
/// count, so the radius is re-checked here.
pub fn count_within(center: LatLon, candidates: &[AmenityCandidate], radius_m: f64) -> usize {
    candidates
        .iter()
        .filter(|candidate| planar_distance_m(center, candidate) <= radius_m)
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn center() -> LatLon {
        LatLon(52.52, 13.40)
    }

    /// A candidate offset north of the center by roughly `meters`.
    fn candidate_at(name: &str, meters: f64) -> AmenityCandidate {
        AmenityCandidate {
            name: name.to_string(),
            latitude: 52.52 + meters / METERS_PER_DEGREE,
            longitude: 13.40,
            category: "toilet".to_string(),
        }
    }

    #[test]
    fn picks_minimum_distance_candidate() {
        let candidates = vec![
            candidate_at("mid", 50.0),
            candidate_at("far", 200.0),
            candidate_at("near", 10.0),
        ];
        let best = nearest(center(), &candidates).unwrap();
        assert_eq!(best.name, "near");
        assert!((best.distance_m - 10.0).abs() < 0.1);
    }

    #[test]
    fn empty_candidates_yield_no_match_marker() {
        assert_eq!(nearest(center(), &[]), None);
    }

    #[test]
    fn ties_keep_first_encountered_order() {
        let candidates = vec![
            candidate_at("first", 25.0),
            candidate_at("second", 25.0),
        ];
        let best = nearest(center(), &candidates).unwrap();
        assert_eq!(best.name, "first");
    }

    #[test]
    fn zero_distance_candidate_is_a_real_match() {
        let candidates = vec![candidate_at("here", 0.0), candidate_at("near", 10.0)];
        let best = nearest(center(), &candidates).unwrap();
        assert_eq!(best.name, "here");
        assert_eq!(best.distance_m, 0.0);
    }

    #[test]
    fn count_within_defends_against_over_returning_locator() {
        let candidates = vec![
            candidate_at("in-1", 100.0),
            candidate_at("in-2", 499.0),
            candidate_at("out", 750.0),
        ];
        assert_eq!(count_within(center(), &candidates, 500.0), 2);
    }

    #[test]
    fn count_within_empty_set_is_zero() {
        assert_eq!(count_within(center(), &[], 500.0), 0);
    }

    #[test]
    fn distance_uses_flat_meters_per_degree() {
        // One full degree of latitude away.
        let candidate = AmenityCandidate {
            name: "degree".to_string(),
            latitude: 53.52,
            longitude: 13.40,
            category: "toilet".to_string(),
        };
        let best = nearest(center(), &[candidate]).unwrap();
        assert!((best.distance_m - METERS_PER_DEGREE).abs() < 1e-6);
    }
}
