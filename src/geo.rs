//! Great-circle distance helpers used by the station resolver and the
//! warnings location annotation.

use haversine::{distance, Location as HaversineLocation, Units};

/// Represents a geographical coordinate using latitude and longitude.
///
/// Latitude is the first element (index 0), and longitude is the second (index 1).
/// Both values are decimal degrees. No range validation is performed; out-of-range
/// degrees yield numerically degenerate but non-panicking distances.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLon(pub f64, pub f64);

/// Haversine great-circle distance between two points, in kilometers.
///
/// Symmetric in its arguments and approximately zero when `a == b`.
pub fn distance_km(a: LatLon, b: LatLon) -> f64 {
    distance(
        HaversineLocation {
            latitude: a.0,
            longitude: a.1,
        },
        HaversineLocation {
            latitude: b.0,
            longitude: b.1,
        },
        Units::Kilometers,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_distance_for_identical_points() {
        let p = LatLon(-31.9, 115.9);
        assert!(distance_km(p, p).abs() < 1e-6);
    }

    #[test]
    fn distance_is_symmetric() {
        let a = LatLon(-31.9, 115.9);
        let b = LatLon(-32.0, 115.5);
        let d1 = distance_km(a, b);
        let d2 = distance_km(b, a);
        assert!(d1 > 0.0);
        assert!((d1 - d2).abs() < 1e-9);
    }

    #[test]
    fn known_distance_perth_to_perth_airport() {
        // Roughly 10 km apart; sanity check the magnitude rather than an exact value.
        let metro = LatLon(-31.9192, 115.8728);
        let airport = LatLon(-31.9275, 115.9764);
        let d = distance_km(metro, airport);
        assert!(d > 5.0 && d < 15.0, "unexpected distance {d}");
    }
}
