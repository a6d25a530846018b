//! Simulation requests, loadable from JSON.
//!
//! Every field has a default, so a config file only needs to name what it
//! changes. The defaults reproduce the classroom demo: a 100x100 thigh
//! cross-section imaged at 0° with the source 100 cm away and the detector
//! at 200 cm.

use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{SimResult, invalid_geometry};
use crate::phantom::{
    BONE_LABEL, Phantom2D, Rect, build_2d_circular, build_2d_multi_circle, build_2d_rectangular,
};
use crate::projection::{BeamGeometry, CoarseUniform, ColumnSampling, MaterialMap, ProjectionModel};

/// Single-material choices offered by the coarse mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaterialPreset {
    Water,
    Bone,
    Metal,
}

impl MaterialPreset {
    pub fn mu(self) -> f64 {
        match self {
            MaterialPreset::Water => 0.2,
            MaterialPreset::Bone => 0.5,
            MaterialPreset::Metal => 1.0,
        }
    }
}

/// Which 2D phantom to build.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PhantomSpec {
    Circular {
        dimensions: (usize, usize),
        outer_radius: f64,
        inner_radius: f64,
        outer_value: f64,
        inner_value: f64,
    },
    Rectangular {
        dimensions: (usize, usize),
        outer_rect: Rect,
        inner_rect: Rect,
        outer_value: f64,
        inner_value: f64,
    },
    MultiCircle {
        dimensions: (usize, usize),
        object_centers: Vec<(usize, usize)>,
        object_radii: Vec<f64>,
    },
}

impl Default for PhantomSpec {
    fn default() -> Self {
        PhantomSpec::Circular {
            dimensions: (100, 100),
            outer_radius: 40.0,
            inner_radius: 20.0,
            outer_value: 1.0,
            inner_value: 2.0,
        }
    }
}

impl PhantomSpec {
    pub fn build(&self) -> SimResult<Phantom2D> {
        match self {
            PhantomSpec::Circular {
                dimensions,
                outer_radius,
                inner_radius,
                outer_value,
                inner_value,
            } => build_2d_circular(*dimensions, *outer_radius, *inner_radius, *outer_value, *inner_value),
            PhantomSpec::Rectangular {
                dimensions,
                outer_rect,
                inner_rect,
                outer_value,
                inner_value,
            } => build_2d_rectangular(*dimensions, *outer_rect, *inner_rect, *outer_value, *inner_value),
            PhantomSpec::MultiCircle {
                dimensions,
                object_centers,
                object_radii,
            } => build_2d_multi_circle(*dimensions, object_centers, object_radii),
        }
    }
}

/// Projection model selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ProjectionMode {
    /// Per-column label lookup (default)
    Column { materials: MaterialMap },
    /// One preset μ for the whole object
    Coarse { material: MaterialPreset },
}

impl Default for ProjectionMode {
    fn default() -> Self {
        ProjectionMode::Column {
            materials: MaterialMap::from_pairs(&[(1.0, 0.5), (2.0, 0.3)]),
        }
    }
}

impl ProjectionMode {
    pub fn model(&self) -> Box<dyn ProjectionModel> {
        match self {
            ProjectionMode::Column { materials } => Box::new(ColumnSampling::new(materials.clone())),
            ProjectionMode::Coarse { material } => Box::new(CoarseUniform::new(material.mu())),
        }
    }
}

/// 2D transmission request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub phantom: PhantomSpec,
    pub beam: BeamGeometry,
    pub projection: ProjectionMode,
}

impl SimulationConfig {
    pub fn from_json_file(path: impl AsRef<Path>) -> SimResult<Self> {
        load_json(path)
    }
}

/// 3D leg request: phantom, orthogonal split and a set of angled fractures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LegStudyConfig {
    /// (depth, rows, cols)
    pub dimensions: (usize, usize, usize),
    pub leg_radius: f64,
    pub bone_radius: f64,
    pub leg_value: f64,
    pub bone_value: f64,
    pub split_depth: usize,
    pub split_value: f64,
    pub fracture_width: f64,
    pub fracture_angles: Vec<f64>,
}

impl Default for LegStudyConfig {
    fn default() -> Self {
        LegStudyConfig {
            dimensions: (128, 128, 128),
            leg_radius: 40.0,
            bone_radius: 15.0,
            leg_value: 1.0,
            bone_value: 2.0,
            split_depth: 64,
            split_value: 0.0,
            fracture_width: 4.0,
            fracture_angles: vec![0.0, 15.0, 30.0, 45.0],
        }
    }
}

impl LegStudyConfig {
    pub fn from_json_file(path: impl AsRef<Path>) -> SimResult<Self> {
        load_json(path)
    }

    /// Split and fracture carving key on `BONE_LABEL`, so bone must sit at or
    /// above it and soft tissue strictly below it.
    pub fn validate(&self) -> SimResult<()> {
        if self.bone_value.is_nan() || self.bone_value < BONE_LABEL {
            return invalid_geometry(format!(
                "bone_value ({}) must be >= {} for fractures to reach the bone",
                self.bone_value, BONE_LABEL
            ));
        }
        if self.leg_value.is_nan() || self.leg_value >= BONE_LABEL {
            return invalid_geometry(format!(
                "leg_value ({}) must be < {} so fractures leave soft tissue intact",
                self.leg_value, BONE_LABEL
            ));
        }
        Ok(())
    }
}

fn load_json<T: DeserializeOwned>(path: impl AsRef<Path>) -> SimResult<T> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)?;
    let config = serde_json::from_str(&text)?;
    log::info!("Loaded config from {}", path.display());
    Ok(config)
}
