// chain.rs — Multi-stage filtering.
//
// Edge detection is usually two convolutions back to back: a sharpening
// pass to boost local contrast, then a Laplacian pass on the sharpened
// result to pick out edges. Each stage has its own kernel and threshold.
//
//   input ──► stage 0 ──► Image<f32> ──► stage 1 ──► ... ──► output
//                │                         │
//             detections               detections (kept)
//
// Stage i+1 consumes the *rescaled* output of stage i. Only the last stage's
// detections are returned; earlier stages contribute a count each so callers
// can see how many positions every pass flagged.

use log::trace;

use crate::convolution::{convolve_with, ConvolveConfig, ConvolveOutput, Detection};
use crate::error::{ConvolveError, Result};
use crate::image::{Image, Pixel};
use crate::kernel::Kernel;
use crate::rescale::RescaleMode;

/// One convolution pass in a chain.
#[derive(Debug, Clone)]
pub struct FilterStage {
    pub kernel: Kernel,
    pub config: ConvolveConfig,
}

impl FilterStage {
    /// Stage with the default fixed [0, 255] rescale.
    pub fn new(kernel: Kernel, threshold: f32) -> Self {
        FilterStage {
            kernel,
            config: ConvolveConfig::with_threshold(threshold),
        }
    }

    pub fn with_rescale(mut self, rescale: RescaleMode) -> Self {
        self.config.rescale = rescale;
        self
    }
}

/// Result of running a chain.
#[derive(Debug, Clone)]
pub struct ChainOutput {
    /// Output of the final stage.
    pub output: Image<f32>,
    /// Detections of the final stage, in scan order.
    pub detections: Vec<Detection>,
    /// Detection count per stage, in stage order.
    pub stage_counts: Vec<usize>,
}

/// An ordered sequence of filter stages.
#[derive(Debug, Clone)]
pub struct FilterChain {
    stages: Vec<FilterStage>,
}

impl FilterChain {
    /// # Errors
    /// `ConvolveError::EmptyChain` if `stages` is empty.
    pub fn new(stages: Vec<FilterStage>) -> Result<Self> {
        if stages.is_empty() {
            return Err(ConvolveError::EmptyChain);
        }
        Ok(FilterChain { stages })
    }

    pub fn stages(&self) -> &[FilterStage] {
        &self.stages
    }

    /// Run every stage in order over `image`.
    pub fn run<T: Pixel>(&self, image: &Image<T>) -> Result<ChainOutput> {
        let (first, rest) = self
            .stages
            .split_first()
            .ok_or(ConvolveError::EmptyChain)?;

        let mut current = convolve_with(image, &first.kernel, &first.config)?;
        let mut stage_counts = vec![current.detections.len()];
        trace!("chain stage 0: {} detections", current.detections.len());

        for (i, stage) in rest.iter().enumerate() {
            current = convolve_with(&current.output, &stage.kernel, &stage.config)?;
            stage_counts.push(current.detections.len());
            trace!("chain stage {}: {} detections", i + 1, current.detections.len());
        }

        let ConvolveOutput { output, detections } = current;
        Ok(ChainOutput {
            output,
            detections,
            stage_counts,
        })
    }
}
