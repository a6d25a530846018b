//! Column-sampling projection: the default, angle-aware model.
//!
//! The beam is traced along the horizontal center row only. For each detector
//! column the source-to-phantom distance is swept by the beam angle, the label
//! under the center row picks μ, and the result is attenuated and magnified.
//! μ scales the swept distance itself rather than the material thickness
//! actually crossed.

use super::{BeamGeometry, MaterialMap, ProjectionModel, TransmissionProfile, magnification};
use crate::error::SimResult;
use crate::phantom::{BACKGROUND_LABEL, Phantom2D};

/// Default projection model: per-column label lookup through a material map.
#[derive(Debug, Clone, Default)]
pub struct ColumnSampling {
    pub materials: MaterialMap,
}

impl ColumnSampling {
    pub fn new(materials: MaterialMap) -> Self {
        ColumnSampling { materials }
    }
}

impl ProjectionModel for ColumnSampling {
    fn project(&self, phantom: &Phantom2D, beam: &BeamGeometry) -> SimResult<TransmissionProfile> {
        simulate_transmission(phantom, beam, &self.materials)
    }
}

/// Simulate transmission through the center row of `phantom`.
///
/// Columns whose swept distance falls behind the source stay at 0. Labels
/// missing from `mu_map` are treated as μ = 0 and logged once per call.
pub fn simulate_transmission(
    phantom: &Phantom2D,
    beam: &BeamGeometry,
    mu_map: &MaterialMap,
) -> SimResult<TransmissionProfile> {
    beam.validate()?;
    mu_map.validate()?;

    let (rows, cols) = phantom.shape();
    let center_y = rows / 2;
    let center_x = cols / 2;
    let tan_angle = beam.angle_rad().tan();

    let sampled_row = phantom.row(center_y);
    for label in unmapped_labels(sampled_row, mu_map) {
        log::warn!("Material label {} has no attenuation coefficient; using μ=0", label);
    }

    let mut profile = vec![0.0f64; cols];

    for (i, &label) in sampled_row.iter().enumerate() {
        let distance_column = beam.distance_sp + (i as f64 - center_x as f64) * tan_angle;
        if distance_column < 0.0 {
            continue;
        }

        let mu = mu_map.get(label).unwrap_or(0.0);

        let intensity_trans = (-mu * distance_column).exp();
        profile[i] = intensity_trans * magnification(distance_column, beam.distance_sd);
    }

    log::debug!(
        "Projected {} columns at {:.1}° (sp={}, sd={})",
        cols, beam.angle_deg, beam.distance_sp, beam.distance_sd
    );
    Ok(TransmissionProfile::from(profile))
}

/// Distinct non-background labels in `row` with no entry in `mu_map`, in
/// order of first appearance.
pub fn unmapped_labels(row: &[f64], mu_map: &MaterialMap) -> Vec<f64> {
    let mut unmapped: Vec<f64> = Vec::new();
    for &label in row {
        if label != BACKGROUND_LABEL && mu_map.get(label).is_none() && !unmapped.contains(&label) {
            unmapped.push(label);
        }
    }
    unmapped
}
