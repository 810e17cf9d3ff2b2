// kernel.rs — Square, odd-sided convolution kernel.
//
// A kernel of side K has a unique center cell at offset pad = (K - 1) / 2.
// That is the whole reason K must be odd: with an even side, there is no
// pixel the window can be centered on, and the padding amount is undefined.
//
// Validation happens here, at construction. Once a `Kernel` exists it is
// known-good, so the convolution loop never has to re-check it and an
// invalid kernel is rejected before a single pixel is read.

use crate::error::{ConvolveError, Result};

/// A square grid of signed weights with odd side length, row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct Kernel {
    side: usize,
    weights: Vec<f32>,
}

impl Kernel {
    /// Build a kernel from `side * side` row-major weights.
    pub fn new(side: usize, weights: Vec<f32>) -> Result<Self> {
        if side == 0 || side % 2 == 0 {
            return Err(ConvolveError::InvalidKernel { side });
        }
        if side.checked_mul(side) != Some(weights.len()) {
            return Err(ConvolveError::KernelShape {
                side,
                len: weights.len(),
            });
        }
        Ok(Kernel { side, weights })
    }

    /// Build a kernel from a fixed-size 2D array.
    ///
    /// ```
    /// let k = edgeconv::kernel::Kernel::from_array([
    ///     [0.0, 1.0, 0.0],
    ///     [1.0, -4.0, 1.0],
    ///     [0.0, 1.0, 0.0],
    /// ]).unwrap();
    /// assert_eq!(k.pad(), 1);
    /// ```
    pub fn from_array<const K: usize>(rows: [[f32; K]; K]) -> Result<Self> {
        Self::new(K, rows.iter().flatten().copied().collect())
    }

    /// Build a kernel from a list of rows. Every row must be `rows.len()` long.
    pub fn from_rows<R: AsRef<[f32]>>(rows: &[R]) -> Result<Self> {
        let side = rows.len();
        if rows.iter().any(|r| r.as_ref().len() != side) {
            return Err(ConvolveError::KernelShape {
                side,
                len: rows
                    .iter()
                    .fold(0usize, |n, r| n.saturating_add(r.as_ref().len())),
            });
        }
        let weights = rows.iter().flat_map(|r| r.as_ref().iter().copied()).collect();
        Self::new(side, weights)
    }

    /// Side length K.
    #[inline]
    pub fn side(&self) -> usize {
        self.side
    }

    /// Offset of the center cell: (K - 1) / 2.
    #[inline]
    pub fn pad(&self) -> usize {
        (self.side - 1) / 2
    }

    /// Weights of row `ky`.
    #[inline]
    pub fn row(&self, ky: usize) -> &[f32] {
        let start = ky * self.side;
        &self.weights[start..start + self.side]
    }

    #[inline]
    pub fn weight(&self, kx: usize, ky: usize) -> f32 {
        self.row(ky)[kx]
    }

    /// Sum of all weights. The response of the kernel to a constant image of
    /// value v is `v * sum()`.
    pub fn sum(&self) -> f32 {
        self.weights.iter().sum()
    }
}
