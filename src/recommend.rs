//! The Recommender — primary public API.
//!
//! Composes route sampling and seat-side evaluation into one call and
//! assembles the serializable result the CLI, server, and any external
//! annotator consume.

use crate::error::Result;
use crate::evaluate::{self, PointVerdict, RouteVerdict, SeatSide};
use crate::geo::{self, FlightDuration, GeoCoordinate};
use crate::route::{self, FlightSpec, RoutePoint, DEFAULT_SAMPLE_COUNT};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One sampled point paired with its classification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzedPoint {
    pub point: RoutePoint,
    pub verdict: PointVerdict,
}

/// Everything a presentation layer needs: flight summary, the full
/// per-point sequence, and the aggregated verdict. Plain records only.
///
/// `narrative` and `highlights` are reserved for an external annotator
/// (e.g. an LLM writing prose about the verdict). The engine never fills
/// them and never reads them — the numeric verdict stands on its own.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    pub origin: GeoCoordinate,
    pub destination: GeoCoordinate,
    pub departure: DateTime<Utc>,
    pub distance_km: f64,
    pub duration: FlightDuration,
    pub sample_count: usize,
    pub points: Vec<AnalyzedPoint>,
    pub verdict: RouteVerdict,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub narrative: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub highlights: Option<Vec<String>>,
}

impl Recommendation {
    /// Attach decoration produced by an external annotator. Purely
    /// additive; the verdict is already final.
    pub fn with_annotation(
        mut self,
        narrative: impl Into<String>,
        highlights: Vec<String>,
    ) -> Self {
        self.narrative = Some(narrative.into());
        self.highlights = Some(highlights);
        self
    }
}

/// Compute a seat-side recommendation for a flight.
pub fn compute_recommendation(
    origin: GeoCoordinate,
    destination: GeoCoordinate,
    departure: DateTime<Utc>,
    sample_count: usize,
) -> Result<Recommendation> {
    let spec = FlightSpec { origin, destination, departure };

    let distance_km = geo::distance_km(origin, destination)?;
    let duration = geo::estimate_duration(distance_km);

    let points = route::sample_route(&spec, sample_count)?;
    let verdicts: Vec<PointVerdict> = points.iter().map(evaluate::classify_point).collect();
    let verdict = evaluate::evaluate_route(&points, &verdicts, duration.total_minutes as f64)?;

    let points = points
        .into_iter()
        .zip(verdicts)
        .map(|(point, verdict)| AnalyzedPoint { point, verdict })
        .collect();

    Ok(Recommendation {
        origin,
        destination,
        departure,
        distance_km,
        duration,
        sample_count,
        points,
        verdict,
        narrative: None,
        highlights: None,
    })
}

/// Compute with the production default of 100 samples.
pub fn compute_recommendation_default(
    origin: GeoCoordinate,
    destination: GeoCoordinate,
    departure: DateTime<Utc>,
) -> Result<Recommendation> {
    compute_recommendation(origin, destination, departure, DEFAULT_SAMPLE_COUNT)
}

// ─── ASCII Visualization ────────────────────────────────────────

/// Render a route summary for the terminal: one character per slice of the
/// flight (L/R for the sun's side, · for neither), the verdict, and the
/// best viewing windows.
pub fn render_ascii_summary(rec: &Recommendation) -> String {
    let bar_width = 60usize;
    let mut out = String::new();

    out.push_str(&format!(
        "  Flight {} \u{2192} {}  ({:.0} km, {})\n",
        rec.origin, rec.destination, rec.distance_km, rec.duration
    ));
    out.push_str("  ╔══════════════════════════════════════════════════════════════╗\n");

    // Side-per-slice bar: nearest sample decides each column.
    let mut bar = vec!['·'; bar_width];
    for col in 0..bar_width {
        let f = col as f64 / (bar_width - 1) as f64;
        let nearest = rec
            .points
            .iter()
            .min_by(|a, b| {
                (a.point.progress_fraction - f)
                    .abs()
                    .partial_cmp(&(b.point.progress_fraction - f).abs())
                    .unwrap()
            })
            .map(|ap| ap.verdict.seat_side);
        bar[col] = match nearest {
            Some(SeatSide::Left) => 'L',
            Some(SeatSide::Right) => 'R',
            _ => '·',
        };
    }
    out.push_str("  ║ ");
    out.push_str(&bar.iter().collect::<String>());
    out.push_str(" ║\n");

    // Viewing-period markers underneath.
    let mut marks = vec![' '; bar_width];
    for period in &rec.verdict.best_viewing_periods {
        let lo = (period.start_fraction * (bar_width - 1) as f64).round() as usize;
        let hi = (period.end_fraction * (bar_width - 1) as f64).round() as usize;
        for m in marks.iter_mut().take(hi.min(bar_width - 1) + 1).skip(lo) {
            *m = '▒';
        }
    }
    out.push_str("  ║ ");
    out.push_str(&marks.iter().collect::<String>());
    out.push_str(" ║\n");

    out.push_str("  ╠══════════════════════════════════════════════════════════════╣\n");

    let v = &rec.verdict;
    let mut line = |s: String| {
        let pad = 62usize.saturating_sub(s.chars().count()).max(1);
        out.push_str(&format!("  ║ {}{}║\n", s, " ".repeat(pad)));
    };
    line(format!("Sit on the {} ({:?} confidence)", v.final_seat_side, v.confidence));
    line(format!(
        "Score {}/10 \u{2014} left {:.0} min, right {:.0} min, {} flip(s)",
        v.overall_score, v.weighted_minutes_left, v.weighted_minutes_right, v.side_flip_count
    ));
    for (i, p) in v.best_viewing_periods.iter().enumerate() {
        line(format!(
            "Best window {}: {:.0}%\u{2013}{:.0}% of the flight",
            i + 1,
            p.start_fraction * 100.0,
            p.end_fraction * 100.0
        ));
    }

    out.push_str("  ╚══════════════════════════════════════════════════════════════╝\n");
    out.push_str("  takeoff                                               landing\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;
    use crate::evaluate::Confidence;
    use chrono::TimeZone;

    fn jfk() -> GeoCoordinate {
        GeoCoordinate::new(40.6413, -73.7781).unwrap()
    }

    fn lhr() -> GeoCoordinate {
        GeoCoordinate::new(51.4700, -0.4543).unwrap()
    }

    fn midsummer_depart() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 21, 22, 0, 0).unwrap()
    }

    #[test]
    fn test_jfk_lhr_midsummer_scenario() {
        let rec = compute_recommendation(jfk(), lhr(), midsummer_depart(), 10).unwrap();

        println!("{}", serde_json::to_string_pretty(&rec.verdict).unwrap());
        println!("{}", render_ascii_summary(&rec));

        assert!((rec.distance_km - 5550.0).abs() < 50.0);
        assert!((rec.duration.total_minutes - 370).abs() <= 10);
        assert_eq!(rec.points.len(), 10);
        assert!((1..=10).contains(&rec.verdict.overall_score));
        assert!(matches!(
            rec.verdict.confidence,
            Confidence::Low | Confidence::Medium | Confidence::High
        ));
        // A 22:00Z summer departure chases the sunrise across the Atlantic;
        // the engine must land on a definite answer or an honest none.
        assert!(matches!(
            rec.verdict.final_seat_side,
            SeatSide::Left | SeatSide::Right | SeatSide::None
        ));
        assert!(rec.narrative.is_none());
    }

    #[test]
    fn test_point_and_verdict_sequences_align() {
        let rec = compute_recommendation(jfk(), lhr(), midsummer_depart(), 25).unwrap();
        for (i, ap) in rec.points.iter().enumerate() {
            assert_eq!(ap.point.index, i);
            let reclassified = evaluate::classify_point(&ap.point);
            assert_eq!(reclassified, ap.verdict, "verdict must match its point");
        }
    }

    #[test]
    fn test_degenerate_route_propagates() {
        let err = compute_recommendation(jfk(), jfk(), midsummer_depart(), 10).unwrap_err();
        assert!(matches!(err, EngineError::DegenerateInput { .. }));
    }

    #[test]
    fn test_serializes_as_plain_records() {
        let rec = compute_recommendation(jfk(), lhr(), midsummer_depart(), 5).unwrap();
        let json = serde_json::to_value(&rec).unwrap();
        assert!(json["verdict"]["final_seat_side"].is_string());
        assert!(json["points"].as_array().unwrap().len() == 5);
        assert!(json["points"][0]["point"]["sun"]["azimuth_degrees"].is_number());
        // unset annotation fields stay off the wire
        assert!(json.get("narrative").is_none());

        let back: Recommendation = serde_json::from_value(json).unwrap();
        assert_eq!(back.sample_count, rec.sample_count);
    }

    #[test]
    fn test_annotation_is_decoration_only() {
        let rec = compute_recommendation(jfk(), lhr(), midsummer_depart(), 10).unwrap();
        let side = rec.verdict.final_seat_side;
        let score = rec.verdict.overall_score;

        let annotated = rec.with_annotation("Lovely sunrise over Ireland.", vec![
            "Sunrise near the Irish coast".to_string(),
        ]);
        assert_eq!(annotated.verdict.final_seat_side, side);
        assert_eq!(annotated.verdict.overall_score, score);
        assert!(annotated.narrative.is_some());
    }

    #[test]
    fn test_ascii_summary_mentions_verdict() {
        let rec = compute_recommendation(jfk(), lhr(), midsummer_depart(), 10).unwrap();
        let ascii = render_ascii_summary(&rec);
        println!("{}", ascii);
        assert!(ascii.contains("Sit on the"));
        assert!(ascii.contains("Score"));
        assert!(ascii.contains("takeoff"));
    }
}
