//! Layer 1: Phantom grids (labeled material maps)
//!
//! A phantom is a flat row-major grid of material labels. 2D phantoms index as
//! `y * cols + x`; 3D phantoms stack `depth` such slices back to back.

pub mod builder;
pub mod fracture;

pub use builder::{
    build_2d_circular, build_2d_multi_circle, build_2d_rectangular, build_3d_leg, Rect,
};
pub use fracture::{add_fracture, add_orthogonal_split};

/// Label for empty space around the object.
pub const BACKGROUND_LABEL: f64 = 0.0;

/// Label written by the multi-circle builder.
pub const OBJECT_LABEL: f64 = 1.0;

/// Any cell at or above this label counts as bone for fracture carving.
pub const BONE_LABEL: f64 = 2.0;

/// 2D labeled grid, shape fixed at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Phantom2D {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl Phantom2D {
    pub(crate) fn zeros(rows: usize, cols: usize) -> Self {
        Phantom2D {
            rows,
            cols,
            data: vec![BACKGROUND_LABEL; rows * cols],
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// (rows, cols)
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Label at row `y`, column `x`.
    #[inline]
    pub fn get(&self, y: usize, x: usize) -> f64 {
        self.data[y * self.cols + x]
    }

    #[inline]
    pub(crate) fn set(&mut self, y: usize, x: usize, value: f64) {
        self.data[y * self.cols + x] = value;
    }

    /// One horizontal row of labels.
    pub fn row(&self, y: usize) -> &[f64] {
        &self.data[y * self.cols..(y + 1) * self.cols]
    }

    /// Flat row-major view of every cell.
    pub fn data(&self) -> &[f64] {
        &self.data
    }

    /// Distinct labels present in the grid, ascending.
    pub fn labels(&self) -> Vec<f64> {
        distinct_labels(&self.data)
    }
}

/// 3D labeled grid ordered (depth, rows, cols).
#[derive(Debug, Clone, PartialEq)]
pub struct Phantom3D {
    depth: usize,
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl Phantom3D {
    pub(crate) fn zeros(depth: usize, rows: usize, cols: usize) -> Self {
        Phantom3D {
            depth,
            rows,
            cols,
            data: vec![BACKGROUND_LABEL; depth * rows * cols],
        }
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// (depth, rows, cols)
    pub fn shape(&self) -> (usize, usize, usize) {
        (self.depth, self.rows, self.cols)
    }

    #[inline]
    fn index(&self, z: usize, y: usize, x: usize) -> usize {
        (z * self.rows + y) * self.cols + x
    }

    #[inline]
    pub fn get(&self, z: usize, y: usize, x: usize) -> f64 {
        self.data[self.index(z, y, x)]
    }

    #[inline]
    pub(crate) fn set(&mut self, z: usize, y: usize, x: usize, value: f64) {
        let idx = self.index(z, y, x);
        self.data[idx] = value;
    }

    /// Flat view of one depth slice (row-major).
    pub fn slice(&self, z: usize) -> &[f64] {
        let plane = self.rows * self.cols;
        &self.data[z * plane..(z + 1) * plane]
    }

    pub(crate) fn slice_mut(&mut self, z: usize) -> &mut [f64] {
        let plane = self.rows * self.cols;
        &mut self.data[z * plane..(z + 1) * plane]
    }

    /// Copy one depth slice out as a standalone 2D phantom (for display).
    pub fn slice_2d(&self, z: usize) -> Phantom2D {
        Phantom2D {
            rows: self.rows,
            cols: self.cols,
            data: self.slice(z).to_vec(),
        }
    }

    pub fn data(&self) -> &[f64] {
        &self.data
    }

    /// Distinct labels present in the volume, ascending.
    pub fn labels(&self) -> Vec<f64> {
        distinct_labels(&self.data)
    }
}

fn distinct_labels(data: &[f64]) -> Vec<f64> {
    let mut labels: Vec<f64> = Vec::new();
    for &value in data {
        if !labels.contains(&value) {
            labels.push(value);
        }
    }
    labels.sort_by(f64::total_cmp);
    labels
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phantom_2d_indexing() {
        let mut phantom = Phantom2D::zeros(3, 4);
        phantom.set(1, 2, 5.0);

        assert_eq!(phantom.shape(), (3, 4));
        assert_eq!(phantom.get(1, 2), 5.0);
        assert_eq!(phantom.data()[1 * 4 + 2], 5.0);
        assert_eq!(phantom.row(1), &[0.0, 0.0, 5.0, 0.0]);
        assert_eq!(phantom.labels(), vec![0.0, 5.0]);
    }

    #[test]
    fn test_phantom_3d_slices() {
        let mut phantom = Phantom3D::zeros(2, 2, 3);
        phantom.set(1, 0, 2, 2.0);

        assert_eq!(phantom.slice(0), &[0.0; 6]);
        assert_eq!(phantom.slice(1)[2], 2.0);
        assert_eq!(phantom.slice_2d(1).get(0, 2), 2.0);
        assert_eq!(phantom.labels(), vec![0.0, 2.0]);
    }
}
