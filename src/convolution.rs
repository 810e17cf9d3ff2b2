// convolution.rs — Sliding-window 2D convolution with threshold detection.
//
// For a K×K kernel with pad = (K - 1) / 2:
//
//   1. Pad the image by `pad` with replicated borders (border.rs).
//   2. For every original pixel, in row-major order, take the K×K window of
//      the padded image centered on it (the region of interest) and compute
//
//        k = Σ  kernel[ky][kx] · roi[ky][kx]
//
//      For multi-channel pixels the same kernel applies to every channel and
//      the per-channel results are summed (see `Pixel::channel_sum`).
//   3. Store k in the output grid at the original pixel's position.
//   4. If k > threshold (strict), record a Detection. The test uses the raw
//      sum, never the rescaled value.
//   5. Rescale the finished grid once (rescale.rs).
//
// Positions in the padded image run over [pad, W + pad) × [pad, H + pad),
// so every window is fully in bounds and the output is always W×H,
// whatever K is.
//
// Sums accumulate in f64 so integer-valued inputs stay exact well past
// 2^24 (u16 pixels times large weights). The threshold test runs on the f64
// sum; only the stored output cell is narrowed to f32.
//
// Each output cell reads only the padded image and the kernel, so rows are
// independent. This implementation stays single-threaded; a parallel one
// would have to concatenate per-row detections in row order to keep the
// scan-order guarantee.
//
// NEW RUST CONCEPTS:
// - `Result` + `?` to stop before any pixel work when inputs are invalid
// - Returning an owned `Vec<Detection>` instead of mutating shared state
// - Zipping two slices for a bounds-check-free dot product

use log::debug;

use crate::border::pad_replicate;
use crate::error::Result;
use crate::image::{Image, ImageView, Pixel};
use crate::kernel::Kernel;
use crate::rescale::{rescale, RescaleMode};

/// A pixel whose raw kernel response exceeded the threshold.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Detection {
    /// Column in the padded image.
    pub x: usize,
    /// Row in the padded image.
    pub y: usize,
    /// Column in the original image (`x - pad`).
    pub x_unpadded: usize,
    /// Row in the original image (`y - pad`).
    pub y_unpadded: usize,
    /// Raw weighted sum at this position, before any rescale.
    pub response: f64,
}

impl Detection {
    /// The `(x, y, x_unpadded, y_unpadded)` record.
    pub fn as_tuple(&self) -> (usize, usize, usize, usize) {
        (self.x, self.y, self.x_unpadded, self.y_unpadded)
    }

    /// Endpoints of the connector drawn between the two positions.
    pub fn connector(&self) -> ((usize, usize), (usize, usize)) {
        ((self.x, self.y), (self.x_unpadded, self.y_unpadded))
    }
}

/// Convolution settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConvolveConfig {
    /// Raw sums strictly greater than this are recorded as detections.
    pub threshold: f32,
    /// How the finished grid is mapped into the display range.
    pub rescale: RescaleMode,
}

impl Default for ConvolveConfig {
    fn default() -> Self {
        ConvolveConfig {
            threshold: 255.0,
            rescale: RescaleMode::default(),
        }
    }
}

impl ConvolveConfig {
    pub fn with_threshold(threshold: f32) -> Self {
        ConvolveConfig {
            threshold,
            ..Default::default()
        }
    }
}

/// Output grid and detections of one convolution.
#[derive(Debug, Clone)]
pub struct ConvolveOutput {
    /// Same size as the input image.
    pub output: Image<f32>,
    /// Detections in row-major scan order.
    pub detections: Vec<Detection>,
}

impl ConvolveOutput {
    pub fn into_parts(self) -> (Image<f32>, Vec<Detection>) {
        (self.output, self.detections)
    }
}

/// Convolve `image` with `kernel`, collect detections above `threshold`,
/// and rescale the output with the fixed [0, 255] source range.
///
/// # Errors
/// `ConvolveError::InvalidImage` if the image has zero width or height.
///
/// # Examples
/// ```
/// use edgeconv::convolution::convolve;
/// use edgeconv::image::Image;
/// use edgeconv::kernel::Kernel;
///
/// let img = Image::filled(3, 3, 100u8);
/// let k = Kernel::from_array([
///     [-2.0, -2.0, -2.0],
///     [-2.0, 29.0, -2.0],
///     [-2.0, -2.0, -2.0],
/// ]).unwrap();
/// let (out, detections) = convolve(&img, &k, 255.0).unwrap();
/// assert_eq!(out.get(1, 1), 255.0);
/// assert_eq!(detections.len(), 9);
/// ```
pub fn convolve<T: Pixel>(
    image: &Image<T>,
    kernel: &Kernel,
    threshold: f32,
) -> Result<(Image<f32>, Vec<Detection>)> {
    convolve_with(image, kernel, &ConvolveConfig::with_threshold(threshold))
        .map(ConvolveOutput::into_parts)
}

/// Convolve with explicit settings.
pub fn convolve_with<T: Pixel>(
    image: &Image<T>,
    kernel: &Kernel,
    config: &ConvolveConfig,
) -> Result<ConvolveOutput> {
    let mut out = convolve_raw(image, kernel, config.threshold)?;
    rescale(&mut out.output, config.rescale)?;
    Ok(out)
}

/// Convolve and collect detections, leaving the raw sums in the output.
pub fn convolve_raw<T: Pixel>(
    image: &Image<T>,
    kernel: &Kernel,
    threshold: f32,
) -> Result<ConvolveOutput> {
    let w = image.width();
    let h = image.height();
    let k = kernel.side();
    let pad = kernel.pad();
    let padded = pad_replicate(image, pad)?;

    let mut output = Image::<f32>::new(w, h);
    let mut detections = Vec::new();

    for y in pad..h + pad {
        let out_row = output.row_mut(y - pad);
        for x in pad..w + pad {
            let roi = padded.sub_image(x - pad, y - pad, k, k);
            let sum = window_response(&roi, kernel);
            out_row[x - pad] = sum as f32;
            if sum > f64::from(threshold) {
                detections.push(Detection {
                    x,
                    y,
                    x_unpadded: x - pad,
                    y_unpadded: y - pad,
                    response: sum,
                });
            }
        }
    }

    debug!(
        "convolve {w}×{h} with {k}×{k} kernel (pad {pad}): {} detections above {threshold}",
        detections.len()
    );
    Ok(ConvolveOutput { output, detections })
}

/// Weighted sum of one region of interest against the kernel.
#[inline]
fn window_response<T: Pixel>(roi: &ImageView<'_, T>, kernel: &Kernel) -> f64 {
    let mut acc = 0.0f64;
    for ky in 0..kernel.side() {
        for (&p, &wgt) in roi.row(ky).iter().zip(kernel.row(ky)) {
            acc += f64::from(p.channel_sum()) * f64::from(wgt);
        }
    }
    acc
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConvolveError;
    use crate::image::Rgb;

    fn sharpen() -> Kernel {
        Kernel::from_array([
            [-2.0, -2.0, -2.0],
            [-2.0, 29.0, -2.0],
            [-2.0, -2.0, -2.0],
        ])
        .unwrap()
    }

    #[test]
    fn test_identity_kernel() {
        let img = Image::from_vec(4, 3, (0..12u8).collect());
        let k = Kernel::from_array([[0.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 0.0]]).unwrap();
        let out = convolve_raw(&img, &k, f32::MAX).unwrap();
        for (x, y, v) in img.pixels() {
            assert_eq!(out.output.get(x, y), v as f32, "identity mismatch at ({x}, {y})");
        }
        assert!(out.detections.is_empty());
    }

    #[test]
    fn test_box_sum_uses_replicated_border() {
        // 1D row [10, 20, 30] as a 3×1 image; 3×3 box of ones.
        // At x=0 the window sees columns [10, 10, 20] on three identical rows.
        let img = Image::from_vec(3, 1, vec![10.0f32, 20.0, 30.0]);
        let k = Kernel::new(3, vec![1.0; 9]).unwrap();
        let out = convolve_raw(&img, &k, f32::MAX).unwrap();
        assert_eq!(out.output.get(0, 0), 3.0 * (10.0 + 10.0 + 20.0));
        assert_eq!(out.output.get(1, 0), 3.0 * (10.0 + 20.0 + 30.0));
        assert_eq!(out.output.get(2, 0), 3.0 * (20.0 + 30.0 + 30.0));
    }

    #[test]
    fn test_one_by_one_kernel_scales() {
        let img = Image::from_vec(2, 2, vec![1u8, 2, 3, 4]);
        let k = Kernel::new(1, vec![-3.0]).unwrap();
        let out = convolve_raw(&img, &k, -7.0).unwrap();
        assert_eq!(out.output.as_slice(), &[-3.0, -6.0, -9.0, -12.0]);
        // Only -3 and -6 are above -7.
        let tuples: Vec<_> = out.detections.iter().map(Detection::as_tuple).collect();
        assert_eq!(tuples, vec![(0, 0, 0, 0), (1, 0, 1, 0)]);
    }

    #[test]
    fn test_detection_coordinates_offset_by_pad() {
        let mut img: Image<f32> = Image::new(5, 5);
        img.set(3, 1, 1.0);
        let k = Kernel::new(5, {
            let mut w = vec![0.0; 25];
            w[12] = 1.0;
            w
        })
        .unwrap();
        let out = convolve_raw(&img, &k, 0.5).unwrap();
        assert_eq!(out.detections.len(), 1);
        let d = out.detections[0];
        assert_eq!(d.as_tuple(), (5, 3, 3, 1));
        assert_eq!(d.connector(), ((5, 3), (3, 1)));
        assert_eq!(d.response, 1.0);
    }

    #[test]
    fn test_rgb_sums_channels() {
        let img: Image<Rgb> = Image::filled(2, 2, [10, 20, 30]);
        let k = Kernel::from_array([[0.0, 0.0, 0.0], [0.0, 2.0, 0.0], [0.0, 0.0, 0.0]]).unwrap();
        let out = convolve_raw(&img, &k, f32::MAX).unwrap();
        assert!(out.output.pixels().all(|(_, _, v)| v == 120.0));
    }

    #[test]
    fn test_default_config_rescales() {
        let img = Image::filled(3, 3, 100u8);
        let out = convolve_with(&img, &sharpen(), &ConvolveConfig::default()).unwrap();
        assert!(out.output.pixels().all(|(_, _, v)| v == 255.0));
        // Detections are judged on the raw 1300, not on 255.
        assert!(out.detections.iter().all(|d| d.response == 1300.0));
    }

    #[test]
    fn test_raw_mode_keeps_sums() {
        let img = Image::filled(3, 3, 100u8);
        let config = ConvolveConfig {
            threshold: 255.0,
            rescale: RescaleMode::Raw,
        };
        let out = convolve_with(&img, &sharpen(), &config).unwrap();
        assert!(out.output.pixels().all(|(_, _, v)| v == 1300.0));
    }

    #[test]
    fn test_empty_image_error() {
        let img: Image<u8> = Image::new(4, 0);
        assert_eq!(
            convolve(&img, &sharpen(), 0.0).unwrap_err(),
            ConvolveError::InvalidImage { width: 4, height: 0 }
        );
    }

    #[test]
    fn test_bad_rescale_range_error() {
        let img = Image::filled(2, 2, 1u8);
        let config = ConvolveConfig {
            threshold: 0.0,
            rescale: RescaleMode::Fixed { min: 10.0, max: 0.0 },
        };
        assert!(matches!(
            convolve_with(&img, &sharpen(), &config),
            Err(ConvolveError::InvalidRange { .. })
        ));
    }
}
