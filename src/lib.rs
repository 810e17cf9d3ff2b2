// edgeconv: sliding-window spatial convolution for edge/feature detection.
//
// Pipeline per call:
//   border      — replicate-pad the image by (K - 1) / 2
//   convolution — K×K dot product at every original pixel, threshold detections
//   rescale     — map the raw sums into the [0, 255] display range
//
// `chain` strings several passes together (sharpen, then Laplacian).

pub mod error;
pub mod image;
pub mod kernel;
pub mod border;
pub mod convolution;
pub mod rescale;
pub mod convert;
pub mod chain;

pub use convolution::{convolve, convolve_with, ConvolveConfig, ConvolveOutput, Detection};
pub use error::{ConvolveError, Result};
pub use image::{Image, Pixel, Rgb};
pub use kernel::Kernel;
pub use rescale::RescaleMode;
