//! Error type shared by every stage of the planning pipeline.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlanError {
    /// A performance parameter is non-positive or not a finite number.
    #[error("invalid performance profile: {field} must be a positive number (got {value})")]
    InvalidProfile { field: &'static str, value: f64 },

    /// Two consecutive waypoints coincide, so the leg has no bearing.
    #[error("degenerate leg between waypoints {from} and {to}: positions coincide")]
    DegenerateLeg { from: usize, to: usize },

    /// The computed transit flight level cannot be flown.
    #[error("transit block {block}: flight level FL{flight_level} is not usable ({reason})")]
    InvalidFlightLevel {
        block: usize,
        flight_level: i64,
        reason: String,
    },

    /// Climb and descent do not leave room for a level cruise inside the block.
    #[error(
        "transit block {block}: climb and descent need {required_nm:.1} nm but only {available_nm:.1} nm are available"
    )]
    ProfileDoesNotFit {
        block: usize,
        available_nm: f64,
        required_nm: f64,
    },

    #[error("invalid low-level boundaries: {0}")]
    InvalidBoundarySet(String),

    #[error("invalid route: {0}")]
    InvalidRoute(String),
}
