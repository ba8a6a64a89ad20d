//! Seat-side evaluation: per-point classification and route-level
//! aggregation into a single deterministic verdict.
//!
//! The thresholds here (±30°/±150° ahead-behind cone, 1.3 side ratio) are
//! calibration values inherited from the original service, not physical
//! constants. They are the specified policy.

use crate::error::{EngineError, Result};
use crate::route::RoutePoint;
use serde::{Deserialize, Serialize};

/// Sun within this many degrees of dead ahead (or its mirror behind) is not
/// meaningfully on either side of the cabin.
const AHEAD_BEHIND_CONE_DEG: f64 = 30.0;

/// A side must carry this many times the other side's weighted minutes to
/// win outright.
const SIDE_RATIO_THRESHOLD: f64 = 1.3;

const RATIO_EPSILON: f64 = 1e-6;

/// Which cabin side the sun favors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeatSide {
    Left,
    Right,
    None,
}

impl std::fmt::Display for SeatSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SeatSide::Left => write!(f, "left"),
            SeatSide::Right => write!(f, "right"),
            SeatSide::None => write!(f, "none"),
        }
    }
}

/// Lighting condition at a point. Mutually exclusive, listed in the
/// priority order they are evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpecialCondition {
    /// Sun at or below the horizon.
    #[serde(rename = "not visible")]
    NotVisible,
    /// Altitude within ±6° of the horizon (and above it, given priority).
    #[serde(rename = "sunrise/sunset")]
    SunriseSunset,
    /// Altitude above 60°: little to see out a side window.
    #[serde(rename = "overhead sun")]
    OverheadSun,
    /// Low warm light, altitude 5–25°.
    #[serde(rename = "golden hour")]
    GoldenHour,
    #[serde(rename = "normal daylight")]
    NormalDaylight,
}

impl std::fmt::Display for SpecialCondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::NotVisible => "not visible",
            Self::SunriseSunset => "sunrise/sunset",
            Self::OverheadSun => "overhead sun",
            Self::GoldenHour => "golden hour",
            Self::NormalDaylight => "normal daylight",
        };
        write!(f, "{}", s)
    }
}

/// Deterministic classification of one route point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointVerdict {
    pub seat_side: SeatSide,
    /// 1 (nothing to see) .. 10 (golden hour on your window).
    pub view_score: u8,
    pub special_condition: SpecialCondition,
    /// Sun azimuth relative to the direction of travel, (−180, 180].
    /// Positive means starboard.
    pub relative_angle_degrees: f64,
}

/// How sure the aggregation is about the final side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

/// A stretch of the route worth watching, as fractions of the flight.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewingPeriod {
    pub start_fraction: f64,
    pub end_fraction: f64,
}

/// The final recommendation for a whole route.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteVerdict {
    pub final_seat_side: SeatSide,
    pub confidence: Confidence,
    pub overall_score: u8,
    /// Up to 3 longest golden-hour/sunrise-sunset stretches, sorted by
    /// start, never overlapping.
    pub best_viewing_periods: Vec<ViewingPeriod>,
    pub weighted_minutes_left: f64,
    pub weighted_minutes_right: f64,
    pub side_flip_count: usize,
}

/// Normalize an angle difference into (−180, 180].
fn normalize_relative(deg: f64) -> f64 {
    let mut a = deg % 360.0;
    if a < 0.0 {
        a += 360.0;
    }
    if a > 180.0 {
        a -= 360.0;
    }
    a
}

/// Classify a single route point. Pure function, no I/O.
pub fn classify_point(point: &RoutePoint) -> PointVerdict {
    let altitude = point.sun.altitude_degrees;
    let relative_angle_degrees =
        normalize_relative(point.sun.azimuth_degrees - point.flight_bearing_degrees);

    let special_condition = if altitude <= 0.0 {
        SpecialCondition::NotVisible
    } else if altitude <= 6.0 {
        SpecialCondition::SunriseSunset
    } else if altitude > 60.0 {
        SpecialCondition::OverheadSun
    } else if altitude <= 25.0 {
        SpecialCondition::GoldenHour
    } else {
        SpecialCondition::NormalDaylight
    };

    let abs_angle = relative_angle_degrees.abs();
    let seat_side = if altitude <= 0.0 {
        SeatSide::None
    } else if abs_angle <= AHEAD_BEHIND_CONE_DEG || abs_angle >= 180.0 - AHEAD_BEHIND_CONE_DEG {
        // Visible but ahead/behind: distinct from "not visible" via the
        // special condition and score band.
        SeatSide::None
    } else if relative_angle_degrees > 0.0 {
        SeatSide::Right
    } else {
        SeatSide::Left
    };

    let view_score = score_point(seat_side, special_condition, altitude, abs_angle);

    PointVerdict { seat_side, view_score, special_condition, relative_angle_degrees }
}

fn score_point(
    side: SeatSide,
    condition: SpecialCondition,
    altitude: f64,
    abs_angle: f64,
) -> u8 {
    if altitude <= 0.0 {
        return if altitude <= -6.0 {
            1
        } else if altitude > -3.0 {
            3
        } else {
            2
        };
    }

    match (side, condition) {
        (SeatSide::Left | SeatSide::Right, SpecialCondition::GoldenHour) => 10,
        (SeatSide::Left | SeatSide::Right, SpecialCondition::SunriseSunset) => 9,
        (SeatSide::Left | SeatSide::Right, SpecialCondition::NormalDaylight) => {
            // Sweet spot: sun well abeam rather than glancing.
            if (60.0..=120.0).contains(&abs_angle) {
                8
            } else {
                7
            }
        }
        (SeatSide::Left | SeatSide::Right, SpecialCondition::OverheadSun) => 6,
        (SeatSide::None, SpecialCondition::GoldenHour | SpecialCondition::SunriseSunset) => 6,
        (SeatSide::None, SpecialCondition::OverheadSun) => 5,
        (SeatSide::None, _) => 4,
        // unreachable: altitude <= 0 returned above
        (_, SpecialCondition::NotVisible) => 1,
    }
}

/// Aggregate per-point verdicts into one route-level verdict.
///
/// Each point is weighted by the minutes of flight it represents
/// (trapezoidal: half the interval to each neighbor, half-intervals at the
/// ends), so the weights sum to the flight duration.
pub fn evaluate_route(
    points: &[RoutePoint],
    verdicts: &[PointVerdict],
    total_duration_minutes: f64,
) -> Result<RouteVerdict> {
    if points.is_empty() {
        return Err(EngineError::InvalidInput(
            "cannot evaluate an empty route".to_string(),
        ));
    }
    if points.len() != verdicts.len() {
        return Err(EngineError::InvalidInput(format!(
            "point/verdict count mismatch: {} vs {}",
            points.len(),
            verdicts.len()
        )));
    }

    let weights = point_weights(points, total_duration_minutes);

    let mut minutes_left = 0.0;
    let mut minutes_right = 0.0;
    for (v, w) in verdicts.iter().zip(&weights) {
        match v.seat_side {
            SeatSide::Left => minutes_left += w,
            SeatSide::Right => minutes_right += w,
            SeatSide::None => {}
        }
    }

    let side_flip_count = verdicts
        .iter()
        .filter(|v| v.seat_side != SeatSide::None)
        .map(|v| v.seat_side)
        .collect::<Vec<_>>()
        .windows(2)
        .filter(|w| w[0] != w[1])
        .count();

    let final_seat_side =
        pick_final_side(points, verdicts, minutes_left, minutes_right);

    let confidence = grade_confidence(
        verdicts,
        &weights,
        minutes_left,
        minutes_right,
        total_duration_minutes,
        final_seat_side,
    );

    let best_viewing_periods = viewing_periods(points, verdicts);

    let overall_score = overall_score(verdicts, final_seat_side);

    Ok(RouteVerdict {
        final_seat_side,
        confidence,
        overall_score,
        best_viewing_periods,
        weighted_minutes_left: round2(minutes_left),
        weighted_minutes_right: round2(minutes_right),
        side_flip_count,
    })
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

fn point_weights(points: &[RoutePoint], total_minutes: f64) -> Vec<f64> {
    let n = points.len();
    if n == 1 {
        return vec![total_minutes];
    }
    (0..n)
        .map(|i| {
            let lo = if i == 0 { points[0].progress_fraction } else { points[i - 1].progress_fraction };
            let hi = if i == n - 1 { points[n - 1].progress_fraction } else { points[i + 1].progress_fraction };
            (hi - lo) / 2.0 * total_minutes
        })
        .collect()
}

fn pick_final_side(
    points: &[RoutePoint],
    verdicts: &[PointVerdict],
    minutes_left: f64,
    minutes_right: f64,
) -> SeatSide {
    let (stronger, stronger_side) = if minutes_left >= minutes_right {
        (minutes_left, SeatSide::Left)
    } else {
        (minutes_right, SeatSide::Right)
    };
    let weaker = minutes_left.min(minutes_right);

    if stronger / weaker.max(RATIO_EPSILON) >= SIDE_RATIO_THRESHOLD {
        return stronger_side;
    }

    // Near-even split: let the midpoint of the flight break the tie.
    let midpoint = points
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| {
            (a.progress_fraction - 0.5)
                .abs()
                .partial_cmp(&(b.progress_fraction - 0.5).abs())
                .unwrap()
        })
        .map(|(i, _)| i);

    match midpoint {
        Some(i) if verdicts[i].seat_side != SeatSide::None => verdicts[i].seat_side,
        _ => SeatSide::None,
    }
}

/// Longest contiguous run of `side`, in weighted minutes. A point on any
/// other side (including None) breaks the run.
fn longest_block_minutes(verdicts: &[PointVerdict], weights: &[f64], side: SeatSide) -> f64 {
    let mut best = 0.0_f64;
    let mut current = 0.0_f64;
    for (v, w) in verdicts.iter().zip(weights) {
        if v.seat_side == side {
            current += w;
            best = best.max(current);
        } else {
            current = 0.0;
        }
    }
    best
}

fn grade_confidence(
    verdicts: &[PointVerdict],
    weights: &[f64],
    minutes_left: f64,
    minutes_right: f64,
    total_minutes: f64,
    final_side: SeatSide,
) -> Confidence {
    let stronger = minutes_left.max(minutes_right);
    let weaker = minutes_left.min(minutes_right);

    // High: clear winner and a solid unbroken stretch on the chosen side.
    if final_side != SeatSide::None
        && stronger >= weaker * SIDE_RATIO_THRESHOLD
        && stronger > 0.0
        && longest_block_minutes(verdicts, weights, final_side) >= 20.0
    {
        return Confidence::High;
    }

    let any_block_10 = longest_block_minutes(verdicts, weights, SeatSide::Left) >= 10.0
        || longest_block_minutes(verdicts, weights, SeatSide::Right) >= 10.0;

    if (stronger - weaker) >= 0.10 * total_minutes || any_block_10 {
        return Confidence::Medium;
    }

    // Low is the fallthrough; it covers barely-visible routes and
    // side-flipping geometry without extra rules.
    Confidence::Low
}

fn viewing_periods(points: &[RoutePoint], verdicts: &[PointVerdict]) -> Vec<ViewingPeriod> {
    let is_prime = |c: SpecialCondition| {
        matches!(c, SpecialCondition::GoldenHour | SpecialCondition::SunriseSunset)
    };

    let mut runs: Vec<ViewingPeriod> = Vec::new();
    let mut start: Option<usize> = None;
    for i in 0..verdicts.len() {
        if is_prime(verdicts[i].special_condition) {
            start.get_or_insert(i);
        } else if let Some(s) = start.take() {
            runs.push(ViewingPeriod {
                start_fraction: points[s].progress_fraction,
                end_fraction: points[i - 1].progress_fraction,
            });
        }
    }
    if let Some(s) = start {
        runs.push(ViewingPeriod {
            start_fraction: points[s].progress_fraction,
            end_fraction: points[points.len() - 1].progress_fraction,
        });
    }

    // Keep the 3 longest, then restore route order.
    runs.sort_by(|a, b| {
        let la = a.end_fraction - a.start_fraction;
        let lb = b.end_fraction - b.start_fraction;
        lb.partial_cmp(&la).unwrap()
    });
    runs.truncate(3);
    runs.sort_by(|a, b| a.start_fraction.partial_cmp(&b.start_fraction).unwrap());
    runs
}

fn overall_score(verdicts: &[PointVerdict], final_side: SeatSide) -> u8 {
    let scores: Vec<f64> = if final_side == SeatSide::None {
        verdicts.iter().map(|v| v.view_score as f64).collect()
    } else {
        verdicts
            .iter()
            .filter(|v| v.seat_side == final_side)
            .map(|v| v.view_score as f64)
            .collect()
    };
    if scores.is_empty() {
        return 1;
    }
    let mean = scores.iter().sum::<f64>() / scores.len() as f64;
    (mean.round() as i64).clamp(1, 10) as u8
}
