//! Engine error taxonomy.
//!
//! Two kinds only: inputs that are malformed, and inputs that are
//! geometrically valid but make the requested quantity undefined.
//! The core performs no I/O, so nothing here is retryable or fatal.

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum EngineError {
    /// Malformed input: NaN/out-of-range coordinates, sample count < 2,
    /// empty point sequences. Surfaced to the caller, never retried.
    InvalidInput(String),
    /// Geometry with no defined answer: coincident points (bearing) or
    /// antipodal endpoints (great circle). `context` names the offending
    /// pair so the caller can decide a fallback.
    DegenerateInput { context: String },
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            Self::DegenerateInput { context } => {
                write!(f, "Degenerate geometry: {}", context)
            }
        }
    }
}

impl std::error::Error for EngineError {}

pub type Result<T> = std::result::Result<T, EngineError>;
