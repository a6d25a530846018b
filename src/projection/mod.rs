//! Layer 2: Beam projection (attenuation + magnification)
//!
//! Projection models turn a 2D phantom and a beam geometry into a 1D detector
//! profile. All models implement the `ProjectionModel` trait.

pub mod coarse;
pub mod column;
pub mod radiograph;

use std::ops::Index;

use serde::{Deserialize, Serialize};

use crate::error::{SimResult, SimulationError, invalid_geometry};
use crate::phantom::Phantom2D;

pub use coarse::CoarseUniform;
pub use column::{ColumnSampling, simulate_transmission};
pub use radiograph::{XrayImage, generate_xray_image};

/// Trait for beam projection models.
pub trait ProjectionModel {
    /// Project the beam through `phantom` onto the detector row.
    ///
    /// # Returns
    /// One relative intensity per phantom column, or an error if the beam
    /// geometry is unusable. Errors are raised before any column is computed.
    fn project(&self, phantom: &Phantom2D, beam: &BeamGeometry) -> SimResult<TransmissionProfile>;
}

/// Source / phantom / detector arrangement for one exposure.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BeamGeometry {
    /// Tube energy in keV. Carried through for callers; no model uses it yet.
    pub energy_kev: f64,
    /// Beam angle in degrees, strictly inside (-90, 90)
    pub angle_deg: f64,
    /// Source-to-phantom distance
    pub distance_sp: f64,
    /// Source-to-detector distance
    pub distance_sd: f64,
}

impl Default for BeamGeometry {
    fn default() -> Self {
        BeamGeometry {
            energy_kev: 60.0,
            angle_deg: 0.0,
            distance_sp: 100.0,
            distance_sd: 200.0,
        }
    }
}

impl BeamGeometry {
    pub fn new(energy_kev: f64, angle_deg: f64, distance_sp: f64, distance_sd: f64) -> Self {
        BeamGeometry {
            energy_kev,
            angle_deg,
            distance_sp,
            distance_sd,
        }
    }

    /// Reject angles where tan/cos blow up and non-positive distances.
    pub fn validate(&self) -> SimResult<()> {
        if !self.angle_deg.is_finite() || self.angle_deg.abs() >= 90.0 {
            return Err(SimulationError::InvalidBeamAngle(self.angle_deg));
        }
        let distances_ok = self.distance_sp.is_finite()
            && self.distance_sd.is_finite()
            && self.distance_sp > 0.0
            && self.distance_sd > 0.0
            && self.distance_sp + self.distance_sd > 0.0;
        if !distances_ok {
            return Err(SimulationError::InvalidDistance {
                distance_sp: self.distance_sp,
                distance_sd: self.distance_sd,
            });
        }
        Ok(())
    }

    pub fn angle_rad(&self) -> f64 {
        self.angle_deg.to_radians()
    }
}

/// One label → attenuation coefficient pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MaterialEntry {
    pub label: f64,
    pub mu: f64,
}

/// Material label → attenuation coefficient (μ).
///
/// Labels are compared exactly, the same way the builders write them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MaterialMap {
    entries: Vec<MaterialEntry>,
}

impl MaterialMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from (label, μ) pairs. A repeated label keeps its last μ.
    pub fn from_pairs(pairs: &[(f64, f64)]) -> Self {
        let mut map = MaterialMap::new();
        for &(label, mu) in pairs {
            map.insert(label, mu);
        }
        map
    }

    /// Chainable insert.
    pub fn with(mut self, label: f64, mu: f64) -> Self {
        self.insert(label, mu);
        self
    }

    pub fn insert(&mut self, label: f64, mu: f64) {
        match self.entries.iter_mut().find(|e| e.label == label) {
            Some(entry) => entry.mu = mu,
            None => self.entries.push(MaterialEntry { label, mu }),
        }
    }

    /// μ for `label`, if configured.
    pub fn get(&self, label: f64) -> Option<f64> {
        self.entries.iter().find(|e| e.label == label).map(|e| e.mu)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Every coefficient must be finite and non-negative.
    pub fn validate(&self) -> SimResult<()> {
        for entry in &self.entries {
            if !entry.mu.is_finite() || entry.mu < 0.0 {
                return invalid_geometry(format!(
                    "attenuation coefficient for label {} must be finite and >= 0, got {}",
                    entry.label, entry.mu
                ));
            }
        }
        Ok(())
    }
}

/// Relative transmitted intensity per detector column.
#[derive(Debug, Clone, PartialEq)]
pub struct TransmissionProfile(Vec<f64>);

impl TransmissionProfile {
    pub fn values(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<f64>> for TransmissionProfile {
    fn from(values: Vec<f64>) -> Self {
        TransmissionProfile(values)
    }
}

impl Index<usize> for TransmissionProfile {
    type Output = f64;

    fn index(&self, i: usize) -> &f64 {
        &self.0[i]
    }
}

/// Detector-plane scaling for a point source.
#[inline]
pub fn magnification(distance: f64, distance_sd: f64) -> f64 {
    distance_sd / (distance + distance_sd)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_beam_angle_limits() {
        let mut beam = BeamGeometry::default();
        assert!(beam.validate().is_ok());

        beam.angle_deg = 89.9;
        assert!(beam.validate().is_ok());

        for bad in [90.0, -90.0, 135.0, f64::NAN] {
            beam.angle_deg = bad;
            assert!(matches!(beam.validate(), Err(SimulationError::InvalidBeamAngle(_))));
        }
    }

    #[test]
    fn test_beam_distance_limits() {
        let zero_sp = BeamGeometry::new(60.0, 0.0, 0.0, 200.0);
        assert!(matches!(zero_sp.validate(), Err(SimulationError::InvalidDistance { .. })));

        let negative_sd = BeamGeometry::new(60.0, 0.0, 100.0, -1.0);
        assert!(matches!(negative_sd.validate(), Err(SimulationError::InvalidDistance { .. })));
    }

    #[test]
    fn test_material_map_lookup() {
        let mut map = MaterialMap::new().with(1.0, 0.5).with(2.0, 0.3);
        assert_eq!(map.get(1.0), Some(0.5));
        assert_eq!(map.get(2.0), Some(0.3));
        assert_eq!(map.get(3.0), None);

        map.insert(1.0, 0.9);
        assert_eq!(map.get(1.0), Some(0.9));
        assert_eq!(map.len(), 2);
        assert!(!map.is_empty());
        assert!(MaterialMap::new().is_empty());
    }

    #[test]
    fn test_profile_accessors() {
        let profile = TransmissionProfile::from(vec![0.5, 0.25]);
        assert_eq!(profile.len(), 2);
        assert!(!profile.is_empty());
        assert_eq!(profile[1], 0.25);
        assert!(TransmissionProfile::from(Vec::new()).is_empty());
    }

    #[test]
    fn test_material_map_rejects_negative_mu() {
        let map = MaterialMap::from_pairs(&[(1.0, -0.1)]);
        assert!(map.validate().is_err());
    }

    #[test]
    fn test_material_map_json_shape() {
        let map: MaterialMap =
            serde_json::from_str(r#"[{"label": 1.0, "mu": 0.5}, {"label": 2.0, "mu": 0.3}]"#).unwrap();
        assert_eq!(map, MaterialMap::from_pairs(&[(1.0, 0.5), (2.0, 0.3)]));
    }

    #[test]
    fn test_magnification() {
        assert!((magnification(100.0, 200.0) - 2.0 / 3.0).abs() < 1e-12);
        assert_eq!(magnification(0.0, 200.0), 1.0);
    }
}
