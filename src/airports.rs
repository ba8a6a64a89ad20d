//! Built-in airport directory.
//!
//! The engine never touches this: callers (CLI, server) resolve airport
//! identifiers to coordinates before invoking the recommender. The
//! directory is an explicit value handed to whoever needs it — no
//! module-level state, no lazy initialization flag.

use crate::error::{EngineError, Result};
use crate::geo::GeoCoordinate;
use serde::Serialize;

struct BuiltinAirport {
    iata: &'static str,
    names: &'static [&'static str], // canonical + aliases
    lat: f64,
    lon: f64,
}

const BUILTIN_AIRPORTS: &[BuiltinAirport] = &[
    BuiltinAirport { iata: "JFK", names: &["new york jfk", "john f. kennedy"], lat: 40.6413, lon: -73.7781 },
    BuiltinAirport { iata: "LHR", names: &["london heathrow", "heathrow"], lat: 51.4700, lon: -0.4543 },
    BuiltinAirport { iata: "LAX", names: &["los angeles"], lat: 33.9416, lon: -118.4085 },
    BuiltinAirport { iata: "SFO", names: &["san francisco"], lat: 37.6213, lon: -122.3790 },
    BuiltinAirport { iata: "ORD", names: &["chicago o'hare", "ohare"], lat: 41.9742, lon: -87.9073 },
    BuiltinAirport { iata: "ATL", names: &["atlanta"], lat: 33.6407, lon: -84.4277 },
    BuiltinAirport { iata: "SEA", names: &["seattle"], lat: 47.4502, lon: -122.3088 },
    BuiltinAirport { iata: "ANC", names: &["anchorage"], lat: 61.1743, lon: -149.9962 },
    BuiltinAirport { iata: "YYZ", names: &["toronto pearson", "toronto"], lat: 43.6777, lon: -79.6248 },
    BuiltinAirport { iata: "CDG", names: &["paris charles de gaulle", "charles de gaulle"], lat: 49.0097, lon: 2.5479 },
    BuiltinAirport { iata: "FRA", names: &["frankfurt"], lat: 50.0379, lon: 8.5622 },
    BuiltinAirport { iata: "AMS", names: &["amsterdam schiphol", "schiphol"], lat: 52.3105, lon: 4.7683 },
    BuiltinAirport { iata: "ARN", names: &["stockholm arlanda", "arlanda"], lat: 59.6498, lon: 17.9239 },
    BuiltinAirport { iata: "OSL", names: &["oslo gardermoen", "gardermoen"], lat: 60.1976, lon: 11.1004 },
    BuiltinAirport { iata: "KEF", names: &["reykjavik keflavik", "keflavik"], lat: 63.9850, lon: -22.6056 },
    BuiltinAirport { iata: "IST", names: &["istanbul"], lat: 41.2753, lon: 28.7519 },
    BuiltinAirport { iata: "DXB", names: &["dubai"], lat: 25.2532, lon: 55.3657 },
    BuiltinAirport { iata: "DOH", names: &["doha hamad", "hamad"], lat: 25.2609, lon: 51.6138 },
    BuiltinAirport { iata: "DEL", names: &["delhi", "indira gandhi"], lat: 28.5562, lon: 77.1000 },
    BuiltinAirport { iata: "PEK", names: &["beijing capital"], lat: 40.0799, lon: 116.6031 },
    BuiltinAirport { iata: "HND", names: &["tokyo haneda", "haneda"], lat: 35.5494, lon: 139.7798 },
    BuiltinAirport { iata: "NRT", names: &["tokyo narita", "narita"], lat: 35.7720, lon: 140.3929 },
    BuiltinAirport { iata: "SIN", names: &["singapore changi", "changi"], lat: 1.3644, lon: 103.9915 },
    BuiltinAirport { iata: "SYD", names: &["sydney kingsford smith", "sydney"], lat: -33.9399, lon: 151.1753 },
    BuiltinAirport { iata: "JNB", names: &["johannesburg", "o.r. tambo"], lat: -26.1392, lon: 28.2460 },
    BuiltinAirport { iata: "GRU", names: &["sao paulo guarulhos", "guarulhos"], lat: -23.4356, lon: -46.4731 },
    BuiltinAirport { iata: "MEX", names: &["mexico city"], lat: 19.4363, lon: -99.0721 },
];

/// An airport entry for lookup results and the list API.
#[derive(Debug, Clone, Serialize)]
pub struct AirportInfo {
    pub iata: String,
    pub name: String,
    pub coordinate: GeoCoordinate,
}

fn to_info(a: &BuiltinAirport) -> AirportInfo {
    AirportInfo {
        iata: a.iata.to_string(),
        name: a.names[0].to_string(),
        coordinate: GeoCoordinate { latitude: a.lat, longitude: a.lon },
    }
}

/// Compute edit distance between two strings (Levenshtein).
fn edit_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let (m, n) = (a.len(), b.len());

    let mut prev = (0..=n).collect::<Vec<_>>();
    let mut curr = vec![0; n + 1];

    for i in 1..=m {
        curr[0] = i;
        for j in 1..=n {
            let cost = if a[i - 1] == b[j - 1] { 0 } else { 1 };
            curr[j] = (prev[j] + 1).min(curr[j - 1] + 1).min(prev[j - 1] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[n]
}

/// The built-in airport table behind a value type, so ownership of the
/// lookup lifecycle stays with the caller.
#[derive(Debug, Default, Clone, Copy)]
pub struct AirportDirectory;

impl AirportDirectory {
    pub fn new() -> Self {
        Self
    }

    /// Resolve a single identifier: IATA code first, then exact name,
    /// substring, and finally fuzzy match (edit distance ≤ 2).
    pub fn lookup(&self, query: &str) -> Option<AirportInfo> {
        let code = query.trim().to_uppercase();
        let q = query.trim().to_lowercase();
        if q.is_empty() {
            return None;
        }

        for a in BUILTIN_AIRPORTS {
            if a.iata == code {
                return Some(to_info(a));
            }
        }

        for a in BUILTIN_AIRPORTS {
            if a.names.iter().any(|n| *n == q) {
                return Some(to_info(a));
            }
        }

        for a in BUILTIN_AIRPORTS {
            if a.names.iter().any(|n| n.contains(&q) || q.contains(n)) {
                return Some(to_info(a));
            }
        }

        let mut best: Option<(&BuiltinAirport, usize)> = None;
        for a in BUILTIN_AIRPORTS {
            for name in a.names {
                let dist = edit_distance(&q, name);
                if dist <= 2 && (best.is_none() || dist < best.unwrap().1) {
                    best = Some((a, dist));
                }
            }
        }
        best.map(|(a, _)| to_info(a))
    }

    /// Substring search for autocomplete. Empty query returns nothing.
    pub fn search(&self, query: &str) -> Vec<AirportInfo> {
        let q = query.trim().to_lowercase();
        if q.is_empty() {
            return Vec::new();
        }
        BUILTIN_AIRPORTS
            .iter()
            .filter(|a| {
                a.iata.to_lowercase().starts_with(&q)
                    || a.names.iter().any(|n| n.contains(&q))
            })
            .map(to_info)
            .collect()
    }

    /// The full directory (for list endpoints).
    pub fn list(&self) -> Vec<AirportInfo> {
        BUILTIN_AIRPORTS.iter().map(to_info).collect()
    }
}

/// Resolve a CLI/HTTP endpoint argument: either a raw "lat,lon" pair or an
/// airport identifier to look up in the directory.
pub fn resolve_endpoint(directory: &AirportDirectory, input: &str) -> Result<GeoCoordinate> {
    if let Some((lat_s, lon_s)) = input.split_once(',') {
        if let (Ok(lat), Ok(lon)) = (lat_s.trim().parse::<f64>(), lon_s.trim().parse::<f64>()) {
            return GeoCoordinate::new(lat, lon);
        }
    }
    directory
        .lookup(input)
        .map(|a| a.coordinate)
        .ok_or_else(|| {
            EngineError::InvalidInput(format!(
                "unknown airport or coordinate pair: '{}'",
                input
            ))
        })
}
