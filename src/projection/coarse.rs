//! Coarse projection: one coefficient for the whole object.
//!
//! Kept for callers that only know a single material. The path length is the
//! phantom diagonal stretched by `1 / cos(angle)`, and labels are never read,
//! so every detector column receives the same intensity.

use super::{BeamGeometry, ProjectionModel, TransmissionProfile, magnification};
use crate::error::{SimResult, invalid_geometry};
use crate::phantom::Phantom2D;

/// Single-μ projection model (coarse mode).
#[derive(Debug, Clone, Copy)]
pub struct CoarseUniform {
    pub mu: f64,
}

impl CoarseUniform {
    pub fn new(mu: f64) -> Self {
        CoarseUniform { mu }
    }

    /// Diagonal of the phantom divided by the beam obliquity.
    pub fn path_length(phantom: &Phantom2D, beam: &BeamGeometry) -> f64 {
        let (rows, cols) = phantom.shape();
        (rows as f64).hypot(cols as f64) / beam.angle_rad().cos()
    }
}

impl ProjectionModel for CoarseUniform {
    fn project(&self, phantom: &Phantom2D, beam: &BeamGeometry) -> SimResult<TransmissionProfile> {
        beam.validate()?;
        if !self.mu.is_finite() || self.mu < 0.0 {
            return invalid_geometry(format!("coarse μ must be finite and >= 0, got {}", self.mu));
        }

        let path = Self::path_length(phantom, beam);
        let value = (-self.mu * path).exp() * magnification(beam.distance_sp, beam.distance_sd);

        Ok(TransmissionProfile::from(vec![value; phantom.cols()]))
    }
}
