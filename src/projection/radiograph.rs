//! Flat-detector radiograph of a 3D phantom.
//!
//! Labels are summed along depth. There is no exponential compositing here;
//! the image is a plain label integral.

use crate::phantom::Phantom3D;

/// 2D projection image, row-major (`y * cols + x`).
#[derive(Debug, Clone, PartialEq)]
pub struct XrayImage {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl XrayImage {
    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    #[inline]
    pub fn get(&self, y: usize, x: usize) -> f64 {
        self.data[y * self.cols + x]
    }

    pub fn data(&self) -> &[f64] {
        &self.data
    }
}

/// Sum every depth slice into one image.
pub fn generate_xray_image(phantom: &Phantom3D) -> XrayImage {
    let (depth, rows, cols) = phantom.shape();
    let mut data = vec![0.0f64; rows * cols];

    for z in 0..depth {
        for (acc, &label) in data.iter_mut().zip(phantom.slice(z)) {
            *acc += label;
        }
    }

    XrayImage { rows, cols, data }
}
