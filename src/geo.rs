//! Spherical flight geometry: distance, bearing, great-circle interpolation.
//!
//! All math runs on a mean-radius sphere (6371 km). Good to well under a
//! percent against WGS-84 over airliner distances, which is far below the
//! resolution the seat-side policy needs.

use crate::error::{EngineError, Result};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

const DEG: f64 = PI / 180.0;
pub const EARTH_RADIUS_KM: f64 = 6371.0;
pub const DEFAULT_CRUISE_KMH: f64 = 900.0;

/// Two coordinates closer than this (in degrees, per component) are treated
/// as the same point; bearing between them is undefined.
const COINCIDENT_EPS_DEG: f64 = 1e-9;

/// A latitude/longitude pair in degrees. Immutable value type.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoCoordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoCoordinate {
    /// Validating constructor. Rejects NaN/infinite values and anything
    /// outside [-90, 90] × [-180, 180].
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        if !latitude.is_finite() || !longitude.is_finite() {
            return Err(EngineError::InvalidInput(format!(
                "coordinate components must be finite, got ({}, {})",
                latitude, longitude
            )));
        }
        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            return Err(EngineError::InvalidInput(format!(
                "coordinate out of range: lat {} (want -90..90), lon {} (want -180..180)",
                latitude, longitude
            )));
        }
        Ok(Self { latitude, longitude })
    }

    /// Unit vector on the sphere (x toward 0°N 0°E, z toward the north pole).
    fn to_unit_vector(self) -> [f64; 3] {
        let lat = self.latitude * DEG;
        let lon = self.longitude * DEG;
        [lat.cos() * lon.cos(), lat.cos() * lon.sin(), lat.sin()]
    }

    fn from_unit_vector(v: [f64; 3]) -> Self {
        Self {
            latitude: v[2].clamp(-1.0, 1.0).asin() / DEG,
            longitude: v[1].atan2(v[0]) / DEG,
        }
    }

    fn coincides_with(&self, other: &Self) -> bool {
        (self.latitude - other.latitude).abs() < COINCIDENT_EPS_DEG
            && (self.longitude - other.longitude).abs() < COINCIDENT_EPS_DEG
    }
}

impl std::fmt::Display for GeoCoordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

/// Great-circle distance in kilometers (haversine).
pub fn distance_km(a: GeoCoordinate, b: GeoCoordinate) -> Result<f64> {
    for c in [&a, &b] {
        if !c.latitude.is_finite() || !c.longitude.is_finite() {
            return Err(EngineError::InvalidInput(format!(
                "non-finite coordinate in distance computation: {:?}",
                c
            )));
        }
    }
    Ok(angular_distance(a, b) * EARTH_RADIUS_KM)
}

/// Central angle between two coordinates in radians.
fn angular_distance(a: GeoCoordinate, b: GeoCoordinate) -> f64 {
    let dlat = (b.latitude - a.latitude) * DEG;
    let dlon = (b.longitude - a.longitude) * DEG;
    let h = (dlat / 2.0).sin().powi(2)
        + (a.latitude * DEG).cos() * (b.latitude * DEG).cos() * (dlon / 2.0).sin().powi(2);
    2.0 * h.sqrt().clamp(-1.0, 1.0).asin()
}

/// Initial bearing from `a` toward `b`, clockwise from north in [0, 360).
///
/// Undefined when the points coincide; callers sampling a route must guard
/// the zero-length terminal leg themselves.
pub fn bearing_degrees(a: GeoCoordinate, b: GeoCoordinate) -> Result<f64> {
    if a.coincides_with(&b) {
        return Err(EngineError::DegenerateInput {
            context: format!("bearing undefined between coincident points ({}) and ({})", a, b),
        });
    }
    let lat1 = a.latitude * DEG;
    let lat2 = b.latitude * DEG;
    let dlon = (b.longitude - a.longitude) * DEG;

    let y = dlon.sin() * lat2.cos();
    let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * dlon.cos();
    Ok(normalize_degrees(y.atan2(x) / DEG))
}

fn normalize_degrees(deg: f64) -> f64 {
    let mut d = deg % 360.0;
    if d < 0.0 {
        d += 360.0;
    }
    d
}

/// `count` points evenly spaced along the great circle from `a` to `b`,
/// endpoints inclusive. Spherical linear interpolation on unit vectors.
///
/// Antipodal endpoints have no unique great circle and are rejected.
pub fn interpolate_great_circle(
    a: GeoCoordinate,
    b: GeoCoordinate,
    count: usize,
) -> Result<Vec<GeoCoordinate>> {
    if count < 2 {
        return Err(EngineError::InvalidInput(format!(
            "great-circle interpolation needs at least 2 points, got {}",
            count
        )));
    }

    let va = a.to_unit_vector();
    let vb = b.to_unit_vector();
    let dot = (va[0] * vb[0] + va[1] * vb[1] + va[2] * vb[2]).clamp(-1.0, 1.0);
    let omega = dot.acos();

    if omega > PI - 1e-9 {
        return Err(EngineError::DegenerateInput {
            context: format!("({}) and ({}) are antipodal; the great circle is ambiguous", a, b),
        });
    }

    // Coincident endpoints: the path collapses to a single location.
    if omega < 1e-12 {
        return Ok(vec![a; count]);
    }

    let sin_omega = omega.sin();
    let mut points = Vec::with_capacity(count);
    for i in 0..count {
        let t = i as f64 / (count - 1) as f64;
        let wa = ((1.0 - t) * omega).sin() / sin_omega;
        let wb = (t * omega).sin() / sin_omega;
        points.push(GeoCoordinate::from_unit_vector([
            wa * va[0] + wb * vb[0],
            wa * va[1] + wb * vb[1],
            wa * va[2] + wb * vb[2],
        ]));
    }
    Ok(points)
}

/// Estimated airliner flight time for a distance.
///
/// `total_minutes` is rounded independently of the hours/minutes split, so
/// it can disagree with `hours * 60 + minutes` by a minute, and `minutes`
/// can round up to 60. Both quirks match the original service and are kept
/// as-is; consumers treat `total_minutes` as authoritative.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FlightDuration {
    pub hours: u32,
    pub minutes: u32,
    pub total_minutes: i64,
}

impl FlightDuration {
    pub fn estimate(distance_km: f64, avg_speed_kmh: f64) -> Self {
        let hours_exact = distance_km / avg_speed_kmh;
        Self {
            hours: hours_exact.floor() as u32,
            minutes: (hours_exact.fract() * 60.0).round() as u32,
            total_minutes: (hours_exact * 60.0).round() as i64,
        }
    }
}

impl std::fmt::Display for FlightDuration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}h {:02}m", self.hours, self.minutes)
    }
}

/// Estimate duration at the default cruise speed (900 km/h).
pub fn estimate_duration(distance_km: f64) -> FlightDuration {
    FlightDuration::estimate(distance_km, DEFAULT_CRUISE_KMH)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn jfk() -> GeoCoordinate {
        GeoCoordinate::new(40.6413, -73.7781).unwrap()
    }

    fn lhr() -> GeoCoordinate {
        GeoCoordinate::new(51.4700, -0.4543).unwrap()
    }

    #[test]
    fn test_coordinate_validation() {
        assert!(GeoCoordinate::new(91.0, 0.0).is_err());
        assert!(GeoCoordinate::new(0.0, -181.0).is_err());
        assert!(GeoCoordinate::new(f64::NAN, 0.0).is_err());
        assert!(GeoCoordinate::new(-90.0, 180.0).is_ok());
    }

    #[test]
    fn test_distance_jfk_lhr() {
        let d = distance_km(jfk(), lhr()).unwrap();
        println!("JFK-LHR great circle: {:.1} km", d);
        assert!((d - 5550.0).abs() < 50.0);
    }

    #[test]
    fn test_distance_symmetry_and_zero() {
        let d_ab = distance_km(jfk(), lhr()).unwrap();
        let d_ba = distance_km(lhr(), jfk()).unwrap();
        assert_abs_diff_eq!(d_ab, d_ba, epsilon = 1e-9);
        assert_abs_diff_eq!(distance_km(jfk(), jfk()).unwrap(), 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_distance_rejects_nan() {
        let bad = GeoCoordinate { latitude: f64::NAN, longitude: 0.0 };
        assert!(matches!(
            distance_km(bad, lhr()),
            Err(EngineError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_bearing_jfk_lhr_northeast() {
        let b = bearing_degrees(jfk(), lhr()).unwrap();
        println!("JFK->LHR initial bearing: {:.1}°", b);
        assert!(b > 45.0 && b < 60.0, "transatlantic eastbound should start NE, got {}", b);
    }

    #[test]
    fn test_bearing_cardinal_directions() {
        let equator = GeoCoordinate::new(0.0, 0.0).unwrap();
        let north = GeoCoordinate::new(10.0, 0.0).unwrap();
        let east = GeoCoordinate::new(0.0, 10.0).unwrap();
        assert_abs_diff_eq!(bearing_degrees(equator, north).unwrap(), 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(bearing_degrees(equator, east).unwrap(), 90.0, epsilon = 1e-9);
        assert_abs_diff_eq!(bearing_degrees(north, equator).unwrap(), 180.0, epsilon = 1e-9);
    }

    #[test]
    fn test_bearing_coincident_is_degenerate() {
        let err = bearing_degrees(jfk(), jfk()).unwrap_err();
        assert!(matches!(err, EngineError::DegenerateInput { .. }));
    }

    #[test]
    fn test_interpolation_endpoints_inclusive() {
        for n in [2usize, 3, 10, 100] {
            let pts = interpolate_great_circle(jfk(), lhr(), n).unwrap();
            assert_eq!(pts.len(), n);
            assert_abs_diff_eq!(pts[0].latitude, jfk().latitude, epsilon = 1e-9);
            assert_abs_diff_eq!(pts[0].longitude, jfk().longitude, epsilon = 1e-9);
            assert_abs_diff_eq!(pts[n - 1].latitude, lhr().latitude, epsilon = 1e-9);
            assert_abs_diff_eq!(pts[n - 1].longitude, lhr().longitude, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_interpolation_arcs_north_of_rhumb() {
        // The JFK-LHR great circle passes well north of the straight-line
        // latitude midpoint; the midpoint should clear 50°N.
        let pts = interpolate_great_circle(jfk(), lhr(), 3).unwrap();
        println!("midpoint: {}", pts[1]);
        assert!(pts[1].latitude > 50.0);
    }

    #[test]
    fn test_interpolation_even_spacing() {
        let pts = interpolate_great_circle(jfk(), lhr(), 11).unwrap();
        let first = distance_km(pts[0], pts[1]).unwrap();
        for w in pts.windows(2) {
            let seg = distance_km(w[0], w[1]).unwrap();
            assert_abs_diff_eq!(seg, first, epsilon = 0.5);
        }
    }

    #[test]
    fn test_interpolation_count_too_small() {
        assert!(matches!(
            interpolate_great_circle(jfk(), lhr(), 1),
            Err(EngineError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_interpolation_antipodal_is_degenerate() {
        let a = GeoCoordinate::new(0.0, 0.0).unwrap();
        let b = GeoCoordinate::new(0.0, 180.0).unwrap();
        assert!(matches!(
            interpolate_great_circle(a, b, 10),
            Err(EngineError::DegenerateInput { .. })
        ));
    }

    #[test]
    fn test_duration_jfk_lhr() {
        let d = distance_km(jfk(), lhr()).unwrap();
        let dur = estimate_duration(d);
        println!("JFK-LHR at 900 km/h: {} ({} min total)", dur, dur.total_minutes);
        assert_eq!(dur.hours, 6);
        assert!((dur.minutes as i64 - 10).abs() <= 10);
        assert!((dur.total_minutes - 370).abs() <= 10);
    }

    #[test]
    fn test_duration_rounding_is_independent() {
        // 0.9959h: the minute remainder rounds to 60 rather than carrying.
        let dur = FlightDuration::estimate(896.3, 900.0);
        assert_eq!(dur.hours, 0);
        assert_eq!(dur.minutes, 60);
        assert_eq!(dur.total_minutes, 60);
    }
}
