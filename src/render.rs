//! Output sink: normalize numeric grids and export them for display.
//!
//! Phantom slices and radiographs go out as grayscale PGM, profiles as a
//! two-column text table. Anything that plots or displays these lives outside
//! this crate.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::phantom::Phantom2D;
use crate::projection::{TransmissionProfile, XrayImage};

/// Read-only row-major 2D grid that can be exported as an image.
pub trait Raster {
    /// (rows, cols)
    fn shape(&self) -> (usize, usize);
    fn values(&self) -> &[f64];
}

impl Raster for Phantom2D {
    fn shape(&self) -> (usize, usize) {
        Phantom2D::shape(self)
    }

    fn values(&self) -> &[f64] {
        self.data()
    }
}

impl Raster for XrayImage {
    fn shape(&self) -> (usize, usize) {
        XrayImage::shape(self)
    }

    fn values(&self) -> &[f64] {
        self.data()
    }
}

/// Convert a float value (0.0-1.0) to a byte (0-255)
#[inline]
pub fn to_byte(value: f64) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0) as u8
}

/// Scale all values by the global maximum. An all-zero (or all-negative)
/// input comes back unchanged.
pub fn normalize_values(values: &[f64]) -> Vec<f64> {
    let max_val = values.iter().copied().fold(0.0f64, f64::max);
    if max_val <= 0.0 {
        return values.to_vec();
    }
    let scale = 1.0 / max_val;
    values.iter().map(|v| v * scale).collect()
}

/// Write a raster as plain (P2) PGM, each cell blown up to `scale` x `scale` pixels.
pub fn write_pgm<R: Raster, W: Write>(grid: &R, out: &mut W, scale: usize) -> io::Result<()> {
    let (rows, cols) = grid.shape();
    let scale = scale.max(1);
    let normalized = normalize_values(grid.values());

    writeln!(out, "P2")?;
    writeln!(out, "{} {}", cols * scale, rows * scale)?;
    writeln!(out, "255")?;

    for img_y in 0..rows * scale {
        let y = img_y / scale;
        for img_x in 0..cols * scale {
            let x = img_x / scale;
            write!(out, "{} ", to_byte(normalized[y * cols + x]))?;
        }
        writeln!(out)?;
    }

    Ok(())
}

/// Save a raster to a PGM file.
pub fn save_pgm<R: Raster>(grid: &R, filename: impl AsRef<Path>, scale: usize) -> io::Result<()> {
    let filename = filename.as_ref();
    let mut file = BufWriter::new(File::create(filename)?);
    write_pgm(grid, &mut file, scale)?;
    file.flush()?;
    log::info!("Wrote {}", filename.display());
    Ok(())
}

/// Converts a raster to a formatted string for debugging
pub fn grid_to_string<R: Raster>(grid: &R) -> String {
    let (rows, cols) = grid.shape();
    let values = grid.values();
    let mut result = String::new();

    for y in 0..rows {
        for x in 0..cols {
            result.push_str(&format!("{:5.2} ", values[y * cols + x]));
        }
        result.push('\n');
    }
    result
}

/// Detector column / intensity table, one line per column.
pub fn profile_to_string(profile: &TransmissionProfile) -> String {
    let mut result = String::from("column\tintensity\n");
    for (i, v) in profile.values().iter().enumerate() {
        result.push_str(&format!("{}\t{:.6e}\n", i, v));
    }
    result
}
