//! Solar azimuth/altitude from a simplified SPA (Solar Position Algorithm).
//!
//! Pure function of (latitude, longitude, instant); topocentric, no
//! atmospheric refraction. Accuracy is a few hundredths of a degree for
//! dates within ±50 years of J2000 — ample for seat-side classification.
//!
//! Both output angles are rounded to two decimal places at this boundary so
//! downstream threshold comparisons stay stable across platforms.

use crate::geo::GeoCoordinate;
use chrono::{DateTime, Datelike, Timelike, Utc};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

const DEG: f64 = PI / 180.0;

/// Sun geometry at one coordinate and instant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SunSample {
    /// Compass direction of the sun, clockwise from north, [0, 360).
    pub azimuth_degrees: f64,
    /// Angle above (+) or below (−) the horizon, [-90, 90].
    pub altitude_degrees: f64,
    /// True when the rounded altitude is above the geometric horizon.
    pub visible: bool,
}

/// Convert a UTC instant to Julian Date.
fn julian_date(instant: DateTime<Utc>) -> f64 {
    let y = instant.year() as f64;
    let m = instant.month() as f64;
    let d = instant.day() as f64;
    let h = instant.hour() as f64
        + instant.minute() as f64 / 60.0
        + instant.second() as f64 / 3600.0;

    let (y2, m2) = if m <= 2.0 { (y - 1.0, m + 12.0) } else { (y, m) };
    let a = (y2 / 100.0_f64).floor();
    let b = 2.0 - a + (a / 4.0_f64).floor();

    (365.25_f64 * (y2 + 4716.0)).floor()
        + (30.6001_f64 * (m2 + 1.0)).floor()
        + d
        + h / 24.0
        + b
        - 1524.5
}

fn normalize_degrees(deg: f64) -> f64 {
    let mut d = deg % 360.0;
    if d < 0.0 {
        d += 360.0;
    }
    d
}

/// Solar declination (degrees) and equation of time (minutes) for a Julian
/// century `t`.
///
/// Standard NOAA low-precision series: mean longitude, mean anomaly, and
/// equation of center give the apparent ecliptic longitude; the corrected
/// obliquity then yields both outputs.
fn declination_and_eot(t: f64) -> (f64, f64) {
    let mean_lon = normalize_degrees(280.46646 + t * (36000.76983 + t * 0.0003032));
    let mean_anom = normalize_degrees(357.52911 + t * (35999.05029 - t * 0.0001537));
    let eccentricity = 0.016708634 - t * (0.000042037 + t * 0.0000001267);

    let m = mean_anom * DEG;
    let eq_center = m.sin() * (1.914602 - t * (0.004817 + t * 0.000014))
        + (2.0 * m).sin() * (0.019993 - t * 0.000101)
        + (3.0 * m).sin() * 0.000289;

    let omega = 125.04 - 1934.136 * t;
    let apparent_lon = mean_lon + eq_center - 0.00569 - 0.00478 * (omega * DEG).sin();

    let mean_obliquity =
        23.0 + (26.0 + (21.448 - t * (46.815 + t * (0.00059 - t * 0.001813))) / 60.0) / 60.0;
    let obliquity = (mean_obliquity + 0.00256 * (omega * DEG).cos()) * DEG;

    let declination = (obliquity.sin() * (apparent_lon * DEG).sin()).asin() / DEG;

    let y = (obliquity / 2.0).tan().powi(2);
    let l0 = mean_lon * DEG;
    let eot = y * (2.0 * l0).sin() - 2.0 * eccentricity * m.sin()
        + 4.0 * eccentricity * y * m.sin() * (2.0 * l0).cos()
        - 0.5 * y * y * (4.0 * l0).sin()
        - 1.25 * eccentricity * eccentricity * (2.0 * m).sin();

    (declination, 4.0 * eot / DEG)
}

/// Compute the sun's position as seen from `coordinate` at `instant`.
pub fn sun_position(coordinate: GeoCoordinate, instant: DateTime<Utc>) -> SunSample {
    let jd = julian_date(instant);
    let t = (jd - 2451545.0) / 36525.0;
    let (declination, eot_minutes) = declination_and_eot(t);

    let clock_minutes = instant.hour() as f64 * 60.0
        + instant.minute() as f64
        + instant.second() as f64 / 60.0;
    let solar_minutes = clock_minutes + eot_minutes + 4.0 * coordinate.longitude;
    let hour_angle = solar_minutes / 4.0 - 180.0;

    let lat_r = coordinate.latitude * DEG;
    let decl_r = declination * DEG;
    let ha_r = hour_angle * DEG;

    let sin_alt = lat_r.sin() * decl_r.sin() + lat_r.cos() * decl_r.cos() * ha_r.cos();
    let alt_r = sin_alt.clamp(-1.0, 1.0).asin();

    let azimuth = if lat_r.cos().abs() > 1e-10 {
        let cos_az = (decl_r.sin() - alt_r.sin() * lat_r.sin()) / (alt_r.cos() * lat_r.cos());
        let az = cos_az.clamp(-1.0, 1.0).acos() / DEG;
        if hour_angle > 0.0 {
            360.0 - az
        } else {
            az
        }
    } else {
        // At the poles every horizontal direction is the meridian.
        if declination > 0.0 {
            180.0
        } else {
            0.0
        }
    };

    let altitude_degrees = round2(alt_r / DEG);
    SunSample {
        azimuth_degrees: round2(normalize_degrees(azimuth)) % 360.0,
        altitude_degrees,
        visible: altitude_degrees > 0.0,
    }
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}
