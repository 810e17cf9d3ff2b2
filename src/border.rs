// border.rs — Replicate-border padding.
//
// Before the kernel slides over the image, the image is grown by `pad`
// pixels on every side so that a K×K window centered on any original pixel
// stays in bounds. New pixels copy the value of the nearest edge pixel:
//
//   original (3×2), pad = 1:        padded (5×4):
//
//                                     a a b c c
//     a b c                           a a b c c
//     d e f                           d d e f f
//                                     d d e f f
//
// Corners take the corner pixel's value (clamp addressing), not a diagonal
// reflection. This is the same clamp-to-edge rule GPU samplers use.

use log::trace;

use crate::error::{ConvolveError, Result};
use crate::image::{Image, Pixel};

/// Pad `image` by `pad` pixels on all four sides, replicating edge pixels.
///
/// The output is `(width + 2·pad) × (height + 2·pad)` and the original pixels
/// sit unchanged at offset `(pad, pad)`.
///
/// # Errors
/// `ConvolveError::InvalidImage` if the image has zero width or height.
pub fn pad_replicate<T: Pixel>(image: &Image<T>, pad: usize) -> Result<Image<T>> {
    let w = image.width();
    let h = image.height();
    if image.is_empty() {
        return Err(ConvolveError::InvalidImage {
            width: w,
            height: h,
        });
    }

    let pw = w + 2 * pad;
    let ph = h + 2 * pad;
    trace!("pad_replicate: {w}×{h} by {pad} -> {pw}×{ph}");

    let mut out = Image::new(pw, ph);
    for py in 0..ph {
        // Rows above the image copy row 0, rows below copy row h-1.
        let sy = py.saturating_sub(pad).min(h - 1);
        let src = image.row(sy);
        let dst = out.row_mut(py);

        let (left, rest) = dst.split_at_mut(pad);
        let (middle, right) = rest.split_at_mut(w);
        left.fill(src[0]);
        middle.copy_from_slice(src);
        right.fill(src[w - 1]);
    }
    Ok(out)
}
