//! Fracture carving on 3D leg phantoms.

use super::builder::{check_radius, distance_from};
use super::{BACKGROUND_LABEL, BONE_LABEL, Phantom3D};
use crate::error::{SimResult, invalid_geometry};

/// Separate the bone at a fixed depth.
///
/// Every bone cell (label >= `BONE_LABEL`) in slices `z >= split_depth` is
/// overwritten with `split_value`. The phantom is taken by value and modified
/// in place, so no other handle can observe the change. A `split_depth` past
/// the last slice leaves the phantom untouched.
pub fn add_orthogonal_split(mut phantom: Phantom3D, split_depth: usize, split_value: f64) -> Phantom3D {
    let mut carved = 0usize;
    for z in split_depth..phantom.depth() {
        for cell in phantom.slice_mut(z) {
            if *cell >= BONE_LABEL {
                *cell = split_value;
                carved += 1;
            }
        }
    }
    log::debug!("Orthogonal split at z={} cleared {} bone cells", split_depth, carved);
    phantom
}

/// Carve a planar gap through the bone, returning an independent copy.
///
/// The cut plane passes through the volume center with normal
/// `(cos θ, 0, sin θ)` in (z, y, x) order, i.e. tilted by `angle_deg` from the
/// depth axis towards x. A cell is cleared when it is bone, lies within
/// `bone_radius` of the cylinder axis, and sits closer than `split_width / 2`
/// to the plane. At 0° the gap is a slab of whole slices; a zero width
/// carves nothing.
pub fn add_fracture(
    phantom: &Phantom3D,
    bone_radius: f64,
    split_width: f64,
    angle_deg: f64,
) -> SimResult<Phantom3D> {
    check_radius("bone_radius", bone_radius)?;
    if bone_radius == 0.0 {
        return invalid_geometry("bone_radius must be positive for a fracture");
    }
    if !split_width.is_finite() || split_width < 0.0 {
        return invalid_geometry(format!("split_width must be finite and >= 0, got {}", split_width));
    }
    if !angle_deg.is_finite() {
        return invalid_geometry(format!("fracture angle must be finite, got {}", angle_deg));
    }

    let (depth, rows, cols) = phantom.shape();
    let axis = (rows / 2, cols / 2);
    let center_z = (depth / 2) as f64;
    let center_x = (cols / 2) as f64;
    let (sin_t, cos_t) = angle_deg.to_radians().sin_cos();
    let half_width = split_width / 2.0;

    let mut variant = phantom.clone();
    let mut carved = 0usize;

    for z in 0..depth {
        let dz = z as f64 - center_z;
        for y in 0..rows {
            for x in 0..cols {
                if phantom.get(z, y, x) < BONE_LABEL || distance_from(axis, y, x) >= bone_radius {
                    continue;
                }
                let plane_dist = dz * cos_t + (x as f64 - center_x) * sin_t;
                if plane_dist.abs() < half_width {
                    variant.set(z, y, x, BACKGROUND_LABEL);
                    carved += 1;
                }
            }
        }
    }

    log::debug!(
        "Fracture at {:.1}° (width {}) cleared {} bone cells",
        angle_deg, split_width, carved
    );
    Ok(variant)
}
