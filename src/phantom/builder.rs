//! Phantom builders: rasterize circles, rectangles and cylinders into label grids.
//!
//! Every builder is a pure function. Parameters are checked up front and a
//! bad request fails with `InvalidGeometry` before anything is allocated.

use super::{OBJECT_LABEL, Phantom2D, Phantom3D};
use crate::error::{SimResult, invalid_geometry};

/// Axis-aligned rectangle in grid-index space: `((top, left), (bottom, right))`.
/// The bottom-right corner is exclusive.
pub type Rect = ((usize, usize), (usize, usize));

/// Nested circles around the grid center.
///
/// # Arguments
/// * `dimensions` - (rows, cols)
/// * `outer_radius` / `inner_radius` - must satisfy `0 <= inner < outer`
/// * `outer_value` / `inner_value` - labels for the ring and the core
///
/// Cells closer than `inner_radius` get `inner_value`, cells closer than
/// `outer_radius` get `outer_value`, everything else stays 0.
pub fn build_2d_circular(
    dimensions: (usize, usize),
    outer_radius: f64,
    inner_radius: f64,
    outer_value: f64,
    inner_value: f64,
) -> SimResult<Phantom2D> {
    let (rows, cols) = dimensions;
    check_dimensions(&[rows, cols])?;
    check_radius("outer_radius", outer_radius)?;
    check_radius("inner_radius", inner_radius)?;
    if inner_radius >= outer_radius {
        return invalid_geometry(format!(
            "inner_radius ({}) must be smaller than outer_radius ({})",
            inner_radius, outer_radius
        ));
    }

    let mut phantom = Phantom2D::zeros(rows, cols);
    let center = (rows / 2, cols / 2);

    for y in 0..rows {
        for x in 0..cols {
            let dist = distance_from(center, y, x);
            if dist < inner_radius {
                phantom.set(y, x, inner_value);
            } else if dist < outer_radius {
                phantom.set(y, x, outer_value);
            }
        }
    }

    log::debug!(
        "Built {}x{} circular phantom (outer={}, inner={})",
        rows, cols, outer_radius, inner_radius
    );
    Ok(phantom)
}

/// Rectangle-in-rectangle phantom. The outer rectangle is painted first and
/// the inner one on top of it, so the inner region always wins.
pub fn build_2d_rectangular(
    dimensions: (usize, usize),
    outer_rect: Rect,
    inner_rect: Rect,
    outer_value: f64,
    inner_value: f64,
) -> SimResult<Phantom2D> {
    let (rows, cols) = dimensions;
    check_dimensions(&[rows, cols])?;
    check_rect("outer_rect", outer_rect, dimensions)?;
    check_rect("inner_rect", inner_rect, dimensions)?;

    let mut phantom = Phantom2D::zeros(rows, cols);
    paint_rect(&mut phantom, outer_rect, outer_value);
    paint_rect(&mut phantom, inner_rect, inner_value);

    Ok(phantom)
}

/// Union of discs, each marked with `OBJECT_LABEL`.
///
/// `object_centers` are (row, col) pairs and line up one-to-one with
/// `object_radii`. Overlapping discs simply share the label.
pub fn build_2d_multi_circle(
    dimensions: (usize, usize),
    object_centers: &[(usize, usize)],
    object_radii: &[f64],
) -> SimResult<Phantom2D> {
    let (rows, cols) = dimensions;
    check_dimensions(&[rows, cols])?;
    if object_centers.len() != object_radii.len() {
        return invalid_geometry(format!(
            "{} object centers but {} radii",
            object_centers.len(),
            object_radii.len()
        ));
    }
    for &radius in object_radii {
        check_radius("object radius", radius)?;
    }

    let mut phantom = Phantom2D::zeros(rows, cols);

    for (&center, &radius) in object_centers.iter().zip(object_radii) {
        let radius_sq = radius * radius;
        for y in 0..rows {
            for x in 0..cols {
                if distance_sq_from(center, y, x) < radius_sq {
                    phantom.set(y, x, OBJECT_LABEL);
                }
            }
        }
    }

    Ok(phantom)
}

/// Cylindrical leg with a concentric bone, running along the depth axis.
///
/// # Arguments
/// * `dimensions` - (depth, rows, cols)
/// * `leg_radius` / `bone_radius` - must satisfy `0 <= bone < leg`
///
/// The cross-section is computed once and copied into every depth slice.
pub fn build_3d_leg(
    dimensions: (usize, usize, usize),
    leg_radius: f64,
    bone_radius: f64,
    leg_value: f64,
    bone_value: f64,
) -> SimResult<Phantom3D> {
    let (depth, rows, cols) = dimensions;
    check_dimensions(&[depth, rows, cols])?;
    check_radius("leg_radius", leg_radius)?;
    check_radius("bone_radius", bone_radius)?;
    if bone_radius >= leg_radius {
        return invalid_geometry(format!(
            "bone_radius ({}) must be smaller than leg_radius ({})",
            bone_radius, leg_radius
        ));
    }

    // Same labeling rule as the circular phantom, bone taking the core.
    let cross_section = build_2d_circular((rows, cols), leg_radius, bone_radius, leg_value, bone_value)?;

    let mut phantom = Phantom3D::zeros(depth, rows, cols);
    for z in 0..depth {
        phantom.slice_mut(z).copy_from_slice(cross_section.data());
    }

    log::debug!(
        "Built {}x{}x{} leg phantom (leg={}, bone={})",
        depth, rows, cols, leg_radius, bone_radius
    );
    Ok(phantom)
}

// ============================================================================
// Geometry helpers
// ============================================================================

#[inline]
pub(crate) fn distance_sq_from(center: (usize, usize), y: usize, x: usize) -> f64 {
    let dy = y as f64 - center.0 as f64;
    let dx = x as f64 - center.1 as f64;
    dx * dx + dy * dy
}

#[inline]
pub(crate) fn distance_from(center: (usize, usize), y: usize, x: usize) -> f64 {
    distance_sq_from(center, y, x).sqrt()
}

fn paint_rect(phantom: &mut Phantom2D, rect: Rect, value: f64) {
    let ((top, left), (bottom, right)) = rect;
    for y in top..bottom {
        for x in left..right {
            phantom.set(y, x, value);
        }
    }
}

// ============================================================================
// Validation
// ============================================================================

pub(crate) fn check_dimensions(dims: &[usize]) -> SimResult<()> {
    if dims.iter().any(|&d| d == 0) {
        return invalid_geometry(format!("dimensions must be positive, got {:?}", dims));
    }
    Ok(())
}

pub(crate) fn check_radius(name: &str, radius: f64) -> SimResult<()> {
    if !radius.is_finite() || radius < 0.0 {
        return invalid_geometry(format!("{} must be finite and >= 0, got {}", name, radius));
    }
    Ok(())
}

fn check_rect(name: &str, rect: Rect, dimensions: (usize, usize)) -> SimResult<()> {
    let ((top, left), (bottom, right)) = rect;
    if top >= bottom || left >= right {
        return invalid_geometry(format!(
            "{}: top-left ({}, {}) must be strictly less than bottom-right ({}, {})",
            name, top, left, bottom, right
        ));
    }
    if bottom > dimensions.0 || right > dimensions.1 {
        return invalid_geometry(format!(
            "{}: bottom-right ({}, {}) exceeds grid {:?}",
            name, bottom, right, dimensions
        ));
    }
    Ok(())
}
