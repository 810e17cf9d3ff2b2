// error.rs — Error taxonomy for the convolution pipeline.
//
// Every failure here is a pure function of the inputs: a malformed kernel,
// an empty image, a degenerate rescale range. Nothing is transient, so there
// is no retry path. Callers fix their inputs and call again.
//
// Invariants of the `Image` container itself (out-of-bounds `get`, a
// `from_vec` buffer of the wrong length) are programmer errors and stay as
// panics, the same way indexing a `Vec` out of range panics.

use thiserror::Error;

/// Errors returned by kernel construction, padding, convolution and rescale.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConvolveError {
    /// Kernel side length is even or zero, so no unique center cell exists.
    #[error("kernel side must be odd and >= 1 (got {side})")]
    InvalidKernel { side: usize },

    /// Number of weights does not form a `side × side` square.
    #[error("kernel with side {side} needs {side}×{side} weights (got {len})")]
    KernelShape { side: usize, len: usize },

    /// Image has zero width or height.
    #[error("image must be non-empty (got {width}×{height})")]
    InvalidImage { width: usize, height: usize },

    /// Fixed rescale range is empty, inverted or not finite.
    #[error("rescale range must satisfy min < max (got [{min}, {max}])")]
    InvalidRange { min: f32, max: f32 },

    /// A filter chain was built with no stages.
    #[error("filter chain has no stages")]
    EmptyChain,
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, ConvolveError>;
