use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;

use crate::airports::AirportInfo;
use crate::error::EngineError;
use crate::geo::GeoCoordinate;
use crate::recommend;
use crate::route::DEFAULT_SAMPLE_COUNT;
use crate::solar::{self, SunSample};

use super::state::AppState;

// ─── Error response ──────────────────────────────────────────────

#[derive(Serialize)]
struct ApiErrorBody {
    error: String,
    code: u16,
}

pub(super) struct ApiError(StatusCode, String);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ApiErrorBody {
            error: self.1,
            code: self.0.as_u16(),
        };
        (self.0, Json(body)).into_response()
    }
}

fn api_error(status: StatusCode, msg: impl Into<String>) -> ApiError {
    ApiError(status, msg.into())
}

fn engine_error(e: EngineError) -> ApiError {
    let status = match e {
        EngineError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        EngineError::DegenerateInput { .. } => StatusCode::UNPROCESSABLE_ENTITY,
    };
    api_error(status, format!("{}", e))
}

// ─── GET /api/recommendation ─────────────────────────────────────

#[derive(Deserialize)]
pub struct RecommendationQuery {
    pub from: Option<String>,
    pub to: Option<String>,
    pub departure: Option<String>,
    pub samples: Option<usize>,
}

/// Resolve "lat,lon" or an airport identifier. Unknown airports are 404;
/// malformed coordinates are 400.
fn resolve(state: &AppState, input: &str) -> Result<GeoCoordinate, ApiError> {
    if let Some((lat_s, lon_s)) = input.split_once(',') {
        if let (Ok(lat), Ok(lon)) = (lat_s.trim().parse::<f64>(), lon_s.trim().parse::<f64>()) {
            return GeoCoordinate::new(lat, lon).map_err(engine_error);
        }
    }
    state
        .directory
        .lookup(input)
        .map(|a| a.coordinate)
        .ok_or_else(|| api_error(StatusCode::NOT_FOUND, format!("Unknown airport: '{}'", input)))
}

fn parse_departure(raw: Option<&str>) -> Result<DateTime<Utc>, ApiError> {
    match raw {
        Some(s) => DateTime::parse_from_rfc3339(s)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| {
                api_error(StatusCode::BAD_REQUEST, format!("Invalid departure '{}': {}", s, e))
            }),
        None => Ok(Utc::now()),
    }
}

pub async fn recommendation(
    State(state): State<Arc<AppState>>,
    Query(params): Query<RecommendationQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let start = Instant::now();

    let from = params
        .from
        .as_deref()
        .ok_or_else(|| api_error(StatusCode::BAD_REQUEST, "Missing 'from' parameter"))?;
    let to = params
        .to
        .as_deref()
        .ok_or_else(|| api_error(StatusCode::BAD_REQUEST, "Missing 'to' parameter"))?;

    let origin = resolve(&state, from)?;
    let destination = resolve(&state, to)?;
    let departure = parse_departure(params.departure.as_deref())?;
    let samples = params.samples.unwrap_or(DEFAULT_SAMPLE_COUNT);

    let rec = recommend::compute_recommendation(origin, destination, departure, samples)
        .map_err(engine_error)?;

    let elapsed = start.elapsed();
    eprintln!(
        "[{}] GET /api/recommendation {}->{} samples={} -> {} ({:.1}ms)",
        Utc::now().format("%H:%M:%S"),
        from,
        to,
        samples,
        rec.verdict.final_seat_side,
        elapsed.as_secs_f64() * 1000.0,
    );

    Ok(Json(rec))
}

// ─── GET /api/sun ────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct SunQuery {
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub time: Option<String>,
}

#[derive(Serialize)]
pub struct SunResponse {
    pub coordinate: GeoCoordinate,
    pub time: DateTime<Utc>,
    pub sun: SunSample,
}

pub async fn sun_position(
    Query(params): Query<SunQuery>,
) -> Result<Json<SunResponse>, ApiError> {
    let (lat, lon) = match (params.lat, params.lon) {
        (Some(lat), Some(lon)) => (lat, lon),
        _ => return Err(api_error(StatusCode::BAD_REQUEST, "Provide 'lat' and 'lon' parameters")),
    };
    let coordinate = GeoCoordinate::new(lat, lon).map_err(engine_error)?;
    let time = parse_departure(params.time.as_deref())?;

    Ok(Json(SunResponse {
        coordinate,
        time,
        sun: solar::sun_position(coordinate, time),
    }))
}

// ─── GET /api/airports/search ────────────────────────────────────

#[derive(Deserialize)]
pub struct SearchQuery {
    pub query: Option<String>,
}

#[derive(Serialize)]
pub struct SearchResponse {
    pub results: Vec<AirportInfo>,
}

pub async fn airport_search(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchQuery>,
) -> Json<SearchResponse> {
    let results = match params.query.as_deref() {
        Some(q) => state.directory.search(q),
        None => Vec::new(),
    };
    Json(SearchResponse { results })
}

// ─── GET /api/airports ───────────────────────────────────────────

pub async fn airport_list(State(state): State<Arc<AppState>>) -> Json<Vec<AirportInfo>> {
    Json(state.directory.list())
}
