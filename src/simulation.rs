//! Request/response pipeline: build the phantom, project it, hand back owned results.

use rayon::prelude::*;

use crate::config::{LegStudyConfig, SimulationConfig};
use crate::error::SimResult;
use crate::phantom::{Phantom2D, Phantom3D, add_fracture, add_orthogonal_split, build_3d_leg};
use crate::projection::{TransmissionProfile, XrayImage, generate_xray_image};

/// Result of a 2D transmission run.
#[derive(Debug, Clone)]
pub struct SimulationOutput {
    pub phantom: Phantom2D,
    pub profile: TransmissionProfile,
}

/// Run one 2D transmission request.
///
/// The beam is checked before the phantom is built so a bad request never
/// allocates a grid.
pub fn run_simulation(config: &SimulationConfig) -> SimResult<SimulationOutput> {
    config.beam.validate()?;

    let phantom = config.phantom.build()?;
    let model = config.projection.model();
    let profile = model.project(&phantom, &config.beam)?;

    log::info!(
        "Simulated {}x{} phantom at {:.1}° ({} keV): {} detector columns",
        phantom.rows(),
        phantom.cols(),
        config.beam.angle_deg,
        config.beam.energy_kev,
        profile.len()
    );
    Ok(SimulationOutput { phantom, profile })
}

/// One angled fracture and its radiograph.
#[derive(Debug, Clone)]
pub struct FractureVariant {
    pub angle_deg: f64,
    pub phantom: Phantom3D,
    pub image: XrayImage,
}

/// Result of a 3D leg study.
#[derive(Debug, Clone)]
pub struct LegStudyOutput {
    pub leg: Phantom3D,
    pub intact_image: XrayImage,
    pub split: Phantom3D,
    pub split_image: XrayImage,
    pub fractures: Vec<FractureVariant>,
}

/// Build a leg, split it, and fracture copies of it at every configured angle.
///
/// Each fracture angle is an independent unit of work over the read-only leg,
/// so the variants are produced on the rayon pool.
pub fn run_leg_study(config: &LegStudyConfig) -> SimResult<LegStudyOutput> {
    config.validate()?;

    let leg = build_3d_leg(
        config.dimensions,
        config.leg_radius,
        config.bone_radius,
        config.leg_value,
        config.bone_value,
    )?;

    let fractures = config
        .fracture_angles
        .par_iter()
        .map(|&angle_deg| -> SimResult<FractureVariant> {
            let phantom = add_fracture(&leg, config.bone_radius, config.fracture_width, angle_deg)?;
            let image = generate_xray_image(&phantom);
            Ok(FractureVariant { angle_deg, phantom, image })
        })
        .collect::<SimResult<Vec<_>>>()?;

    let intact_image = generate_xray_image(&leg);
    let split = add_orthogonal_split(leg.clone(), config.split_depth, config.split_value);
    let split_image = generate_xray_image(&split);

    log::info!(
        "Leg study {:?}: split at z={}, {} fracture variants",
        config.dimensions,
        config.split_depth,
        fractures.len()
    );
    Ok(LegStudyOutput {
        leg,
        intact_image,
        split,
        split_image,
        fractures,
    })
}
