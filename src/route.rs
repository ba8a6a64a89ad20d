//! Route sampling: turn a flight spec into N timestamped points with
//! bearings and sun geometry.

use crate::error::{EngineError, Result};
use crate::geo::{self, GeoCoordinate};
use crate::solar::{self, SunSample};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Default sample count for production routes. Balances resolution against
/// the cost of any per-point enrichment a caller may run afterwards.
pub const DEFAULT_SAMPLE_COUNT: usize = 100;

/// One recommendation request: where from, where to, when (UTC).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FlightSpec {
    pub origin: GeoCoordinate,
    pub destination: GeoCoordinate,
    pub departure: DateTime<Utc>,
}

/// One sampled position along the great circle.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RoutePoint {
    pub index: usize,
    /// Fraction of the route flown, 0.0 at origin, 1.0 at destination.
    pub progress_fraction: f64,
    pub coordinate: GeoCoordinate,
    pub timestamp: DateTime<Utc>,
    /// Direction of travel toward the destination, [0, 360).
    pub flight_bearing_degrees: f64,
    pub sun: SunSample,
}

/// Sample `sample_count` evenly spaced points along the great circle from
/// origin to destination, each with the timestamp the aircraft reaches it
/// and the sun's position there at that time.
///
/// The bearing at the final point is a zero-length leg toward the
/// destination; it is forward-filled from the previous point instead of
/// failing the whole route. A coincident origin/destination pair has no
/// previous bearing to fill from and surfaces `DegenerateInput`.
pub fn sample_route(spec: &FlightSpec, sample_count: usize) -> Result<Vec<RoutePoint>> {
    if sample_count < 2 {
        return Err(EngineError::InvalidInput(format!(
            "route sampling needs at least 2 points, got {}",
            sample_count
        )));
    }

    let distance = geo::distance_km(spec.origin, spec.destination)?;
    let duration = geo::estimate_duration(distance);
    let coordinates = geo::interpolate_great_circle(spec.origin, spec.destination, sample_count)?;

    let mut points = Vec::with_capacity(sample_count);
    let mut prev_bearing: Option<f64> = None;

    for (index, coordinate) in coordinates.into_iter().enumerate() {
        let progress_fraction = index as f64 / (sample_count - 1) as f64;
        let offset_ms = (progress_fraction * duration.total_minutes as f64 * 60_000.0).round();
        let timestamp = spec.departure + Duration::milliseconds(offset_ms as i64);

        let flight_bearing_degrees = match geo::bearing_degrees(coordinate, spec.destination) {
            Ok(b) => b,
            Err(EngineError::DegenerateInput { .. }) if prev_bearing.is_some() => {
                prev_bearing.unwrap()
            }
            Err(e) => return Err(e),
        };
        prev_bearing = Some(flight_bearing_degrees);

        points.push(RoutePoint {
            index,
            progress_fraction,
            coordinate,
            timestamp,
            flight_bearing_degrees,
            sun: solar::sun_position(coordinate, timestamp),
        });
    }

    Ok(points)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn jfk_lhr() -> FlightSpec {
        FlightSpec {
            origin: GeoCoordinate::new(40.6413, -73.7781).unwrap(),
            destination: GeoCoordinate::new(51.4700, -0.4543).unwrap(),
            departure: Utc.with_ymd_and_hms(2024, 6, 21, 22, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_sample_count_and_ordering() {
        let points = sample_route(&jfk_lhr(), 10).unwrap();
        assert_eq!(points.len(), 10);
        for (i, p) in points.iter().enumerate() {
            assert_eq!(p.index, i);
        }
        for w in points.windows(2) {
            assert!(w[0].progress_fraction < w[1].progress_fraction);
            assert!(w[0].timestamp < w[1].timestamp);
        }
        assert_eq!(points[0].progress_fraction, 0.0);
        assert_eq!(points[9].progress_fraction, 1.0);
    }

    #[test]
    fn test_endpoints_match_spec() {
        let spec = jfk_lhr();
        let points = sample_route(&spec, 10).unwrap();
        assert!((points[0].coordinate.latitude - spec.origin.latitude).abs() < 1e-9);
        assert!((points[9].coordinate.latitude - spec.destination.latitude).abs() < 1e-9);
        assert_eq!(points[0].timestamp, spec.departure);

        let distance = geo::distance_km(spec.origin, spec.destination).unwrap();
        let duration = geo::estimate_duration(distance);
        let expected_arrival = spec.departure + Duration::minutes(duration.total_minutes);
        assert_eq!(points[9].timestamp, expected_arrival);
    }

    #[test]
    fn test_terminal_bearing_forward_filled() {
        let points = sample_route(&jfk_lhr(), 10).unwrap();
        let last = &points[9];
        let prev = &points[8];
        assert_eq!(last.flight_bearing_degrees, prev.flight_bearing_degrees);
        for p in &points {
            assert!((0.0..360.0).contains(&p.flight_bearing_degrees));
        }
    }

    #[test]
    fn test_bearing_swings_east_over_atlantic() {
        // Great-circle tracks start northeast out of JFK and finish
        // pointing southeast into LHR.
        let points = sample_route(&jfk_lhr(), 10).unwrap();
        assert!(points[0].flight_bearing_degrees < 90.0);
        assert!(points[8].flight_bearing_degrees > 90.0);
    }

    #[test]
    fn test_sun_recomputed_per_point() {
        let points = sample_route(&jfk_lhr(), 10).unwrap();
        let distinct = points
            .windows(2)
            .filter(|w| w[0].sun != w[1].sun)
            .count();
        assert!(distinct > 0, "sun samples must vary along a 6-hour route");
    }

    #[test]
    fn test_sample_count_too_small() {
        assert!(matches!(
            sample_route(&jfk_lhr(), 1),
            Err(EngineError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_coincident_endpoints_degenerate() {
        let spec = FlightSpec {
            origin: GeoCoordinate::new(40.6413, -73.7781).unwrap(),
            destination: GeoCoordinate::new(40.6413, -73.7781).unwrap(),
            departure: Utc.with_ymd_and_hms(2024, 6, 21, 22, 0, 0).unwrap(),
        };
        assert!(matches!(
            sample_route(&spec, 10),
            Err(EngineError::DegenerateInput { .. })
        ));
    }

    #[test]
    fn test_antipodal_endpoints_degenerate() {
        let spec = FlightSpec {
            origin: GeoCoordinate::new(0.0, 0.0).unwrap(),
            destination: GeoCoordinate::new(0.0, 180.0).unwrap(),
            departure: Utc.with_ymd_and_hms(2024, 6, 21, 22, 0, 0).unwrap(),
        };
        assert!(matches!(
            sample_route(&spec, 10),
            Err(EngineError::DegenerateInput { .. })
        ));
    }
}
