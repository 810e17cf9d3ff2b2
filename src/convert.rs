// convert.rs — Pixel type conversions used around the convolution core.
//
// The convolution produces `Image<f32>`. Displaying or encoding it needs
// 8-bit pixels, and a colour image sometimes needs to become a single
// channel first. Both directions go through the raw (unnormalized) intensity
// path of the `Pixel` trait: u8 42 ↔ f32 42.0.

use crate::image::{Image, Pixel, Rgb};

/// Quantize an f32 image to u8, clamping to [0, 255] and rounding.
///
/// A rescaled convolution output already lies in [0, 255], so this is the
/// final step before display.
pub fn f32_to_u8(src: &Image<f32>) -> Image<u8> {
    src.map(u8::from_f32)
}

/// Convert any pixel type to raw f32 intensity.
pub fn to_f32<T: Pixel>(src: &Image<T>) -> Image<f32> {
    src.map(Pixel::to_f32)
}

/// Grayscale from interleaved RGB using ITU-R BT.601 luma:
/// Y = 0.299·R + 0.587·G + 0.114·B
pub fn rgb_to_luma(src: &Image<Rgb>) -> Image<u8> {
    src.map(|[r, g, b]| {
        u8::from_f32(0.299 * r as f32 + 0.587 * g as f32 + 0.114 * b as f32)
    })
}
