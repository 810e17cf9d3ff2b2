// rescale.rs — Linear intensity rescaling of a finished output grid.
//
// The convolution writes raw weighted sums, which can be negative or run far
// past 255. Rescaling maps them into the [0, 255] display range:
//
//   out = (clamp(v, min, max) - min) / (max - min) * 255
//
// The default source range is FIXED at [0, 255]. It does not look at the
// grid's actual values, so sums below 0 become 0 and sums above 255 become
// 255; within [0, 255] the map is the identity. A Laplacian response that
// spans [-800, 800] is clipped, not stretched.
//
// `RescaleMode::Adaptive` is the min-max stretch alternative. It is opt-in
// and never substituted for the fixed mode.

use log::{trace, warn};

use crate::error::{ConvolveError, Result};
use crate::image::Image;

/// Upper end of the display range.
pub const DISPLAY_MAX: f32 = 255.0;

/// Share of clipped cells above which a fixed-range rescale logs a warning.
const CLIP_WARN_FRACTION: f32 = 0.5;

/// How raw convolution sums are mapped into the display range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RescaleMode {
    /// Clip to `[min, max]`, then map linearly to `[0, 255]`.
    Fixed { min: f32, max: f32 },
    /// Use the grid's own minimum and maximum as the source range.
    Adaptive,
    /// Leave the raw sums untouched.
    Raw,
}

impl Default for RescaleMode {
    fn default() -> Self {
        RescaleMode::Fixed {
            min: 0.0,
            max: DISPLAY_MAX,
        }
    }
}

/// Rescale `grid` in place according to `mode`.
pub fn rescale(grid: &mut Image<f32>, mode: RescaleMode) -> Result<()> {
    match mode {
        RescaleMode::Fixed { min, max } => rescale_intensity(grid, min, max),
        RescaleMode::Adaptive => {
            rescale_adaptive(grid);
            Ok(())
        }
        RescaleMode::Raw => Ok(()),
    }
}

/// Clip every value to `[min, max]` and map it linearly onto `[0, 255]`.
///
/// # Errors
/// `ConvolveError::InvalidRange` unless `min < max` and both are finite.
pub fn rescale_intensity(grid: &mut Image<f32>, min: f32, max: f32) -> Result<()> {
    if !(min.is_finite() && max.is_finite() && min < max) {
        return Err(ConvolveError::InvalidRange { min, max });
    }

    let span = max - min;
    let mut clipped = 0usize;
    for v in grid.as_mut_slice() {
        if *v < min || *v > max {
            clipped += 1;
        }
        let unit = ((*v).clamp(min, max) - min) / span;
        *v = unit * DISPLAY_MAX;
    }

    let total = grid.width() * grid.height();
    trace!("rescale_intensity: [{min}, {max}] clipped {clipped}/{total}");
    if total > 0 && clipped as f32 > CLIP_WARN_FRACTION * total as f32 {
        warn!(
            "fixed-range rescale [{min}, {max}] clipped {clipped} of {total} cells; \
             consider RescaleMode::Adaptive"
        );
    }
    Ok(())
}

/// Min-max stretch: the smallest value maps to 0, the largest to 255.
///
/// A flat grid has no range to stretch and maps to all zeros.
pub fn rescale_adaptive(grid: &mut Image<f32>) {
    let (lo, hi) = grid
        .as_slice()
        .iter()
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });

    if hi <= lo {
        grid.as_mut_slice().fill(0.0);
        return;
    }

    let span = hi - lo;
    for v in grid.as_mut_slice() {
        *v = (*v - lo) / span * DISPLAY_MAX;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn grid(values: &[f32]) -> Image<f32> {
        Image::from_vec(values.len(), 1, values.to_vec())
    }

    #[test]
    fn test_fixed_range_identity_inside() {
        let mut g = grid(&[0.0, 127.5, 255.0]);
        rescale(&mut g, RescaleMode::default()).unwrap();
        assert_relative_eq!(g.get(0, 0), 0.0);
        assert_relative_eq!(g.get(1, 0), 127.5, epsilon = 1e-4);
        assert_relative_eq!(g.get(2, 0), 255.0);
    }

    #[test]
    fn test_fixed_range_clips() {
        let mut g = grid(&[300.0, -40.0, 1300.0]);
        rescale_intensity(&mut g, 0.0, 255.0).unwrap();
        assert_eq!(g.as_slice(), &[255.0, 0.0, 255.0]);
    }

    #[test]
    fn test_fixed_range_ignores_data_extent() {
        // A min-max stretch would send 10 -> 0 and 20 -> 255.
        let mut g = grid(&[10.0, 20.0]);
        rescale(&mut g, RescaleMode::default()).unwrap();
        assert_relative_eq!(g.get(0, 0), 10.0, epsilon = 1e-4);
        assert_relative_eq!(g.get(1, 0), 20.0, epsilon = 1e-4);
    }

    #[test]
    fn test_custom_fixed_range() {
        let mut g = grid(&[-100.0, 0.0, 100.0]);
        rescale_intensity(&mut g, -100.0, 100.0).unwrap();
        assert_relative_eq!(g.get(0, 0), 0.0);
        assert_relative_eq!(g.get(1, 0), 127.5, epsilon = 1e-4);
        assert_relative_eq!(g.get(2, 0), 255.0);
    }

    #[test]
    fn test_invalid_range() {
        let mut g = grid(&[1.0]);
        assert_eq!(
            rescale_intensity(&mut g, 5.0, 5.0),
            Err(ConvolveError::InvalidRange { min: 5.0, max: 5.0 })
        );
        assert!(rescale_intensity(&mut g, 0.0, f32::NAN).is_err());
        // Grid untouched on error.
        assert_eq!(g.get(0, 0), 1.0);
    }

    #[test]
    fn test_adaptive_stretch() {
        let mut g = grid(&[-800.0, 0.0, 800.0]);
        rescale(&mut g, RescaleMode::Adaptive).unwrap();
        assert_relative_eq!(g.get(0, 0), 0.0);
        assert_relative_eq!(g.get(1, 0), 127.5, epsilon = 1e-4);
        assert_relative_eq!(g.get(2, 0), 255.0);
    }

    #[test]
    fn test_adaptive_flat_grid() {
        let mut g = grid(&[42.0, 42.0, 42.0]);
        rescale_adaptive(&mut g);
        assert!(g.as_slice().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_raw_untouched() {
        let mut g = grid(&[-5.0, 1300.0]);
        rescale(&mut g, RescaleMode::Raw).unwrap();
        assert_eq!(g.as_slice(), &[-5.0, 1300.0]);
    }
}
