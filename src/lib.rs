//! Sunside — which side of the plane gets the view?
//!
//! Samples a flight's great-circle route, computes the sun's azimuth and
//! altitude at each point, and aggregates deterministic per-point verdicts
//! into a single seat-side recommendation with a confidence grade.
//!
//! The whole pipeline is pure and synchronous; the HTTP layer in
//! [`server`] and the airport directory in [`airports`] are conveniences
//! around [`recommend::compute_recommendation`].

pub mod airports;
pub mod error;
pub mod evaluate;
pub mod geo;
pub mod recommend;
pub mod route;
pub mod server;
pub mod solar;
