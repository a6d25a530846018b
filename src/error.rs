//! Error taxonomy for phantom construction and beam projection

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimulationError {
    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    #[error("Invalid beam angle: {0}° (must lie strictly within ±90°)")]
    InvalidBeamAngle(f64),

    #[error("Invalid distance: source-to-phantom={distance_sp}, source-to-detector={distance_sd}")]
    InvalidDistance { distance_sp: f64, distance_sd: f64 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type SimResult<T> = Result<T, SimulationError>;

/// Shorthand for raising `InvalidGeometry` with a formatted message.
pub(crate) fn invalid_geometry<T>(message: impl Into<String>) -> SimResult<T> {
    Err(SimulationError::InvalidGeometry(message.into()))
}
