// image.rs — Runtime-sized image container, generic over pixel type.
//
// Layout is row-major and tightly packed: pixel (x, y) lives at index
// y * width + x. Dimensions are fixed at construction; the pixel buffer is
// mutable but never resized.
//
// Two pieces matter for convolution:
//
//   Pixel      — how a stored value turns into numbers. Single-channel types
//                (u8, u16, f32) contribute their value; Rgb contributes the
//                sum of its three channels, which is what applying the same
//                kernel per channel and summing the results reduces to.
//
//   ImageView  — a borrowed K×K window into a (padded) image. The
//                convolution engine reads each region of interest through
//                one of these, so no window is ever copied.
//
// NEW RUST CONCEPTS:
// - Associated constants on a trait (`Pixel::CHANNELS`)
// - Implementing a local trait for a foreign type (`[u8; 3]`)
// - Lifetime-bound borrowed views (`ImageView<'a, T>`)

use std::fmt;

// ---------------------------------------------------------------------------
// Pixel Trait
// ---------------------------------------------------------------------------

/// Trait for types that can serve as pixel values in an Image.
///
/// `Send + Sync + 'static` keeps `Image<T>` shareable across threads, so
/// independent convolutions can run side by side.
pub trait Pixel: Copy + Default + Send + Sync + 'static {
    /// Number of numeric channels carried by one pixel.
    const CHANNELS: usize;

    /// Collapse the pixel to a single intensity (raw, not normalized).
    fn to_f32(self) -> f32;

    /// Construct a pixel from an intensity (with clamping/rounding).
    fn from_f32(v: f32) -> Self;

    /// Sum of all channel values.
    ///
    /// Multiplying each channel by the same weight and adding the products
    /// equals multiplying this sum by the weight once.
    #[inline]
    fn channel_sum(self) -> f32 {
        self.to_f32()
    }
}

impl Pixel for u8 {
    const CHANNELS: usize = 1;

    #[inline]
    fn to_f32(self) -> f32 {
        self as f32
    }

    #[inline]
    fn from_f32(v: f32) -> Self {
        v.clamp(0.0, 255.0).round() as u8
    }
}

impl Pixel for u16 {
    const CHANNELS: usize = 1;

    #[inline]
    fn to_f32(self) -> f32 {
        self as f32
    }

    #[inline]
    fn from_f32(v: f32) -> Self {
        v.clamp(0.0, 65535.0).round() as u16
    }
}

impl Pixel for f32 {
    const CHANNELS: usize = 1;

    #[inline]
    fn to_f32(self) -> f32 {
        self
    }

    #[inline]
    fn from_f32(v: f32) -> Self {
        v
    }
}

/// Interleaved 8-bit colour pixel, channel order as delivered by the decoder.
pub type Rgb = [u8; 3];

impl Pixel for Rgb {
    const CHANNELS: usize = 3;

    /// Channel mean, i.e. an unweighted grey level.
    #[inline]
    fn to_f32(self) -> f32 {
        self.channel_sum() / 3.0
    }

    /// Grey pixel with every channel set to `v`.
    #[inline]
    fn from_f32(v: f32) -> Self {
        let c = u8::from_f32(v);
        [c, c, c]
    }

    #[inline]
    fn channel_sum(self) -> f32 {
        self[0] as f32 + self[1] as f32 + self[2] as f32
    }
}

// ---------------------------------------------------------------------------
// Image<T>
// ---------------------------------------------------------------------------

/// A 2D image with runtime dimensions, generic over pixel type `T`.
#[derive(Clone, PartialEq)]
pub struct Image<T: Pixel> {
    /// Pixel data in row-major order. Length = width * height.
    data: Vec<T>,
    width: usize,
    height: usize,
}

impl<T: Pixel> Image<T> {
    /// Create a zero-initialized image.
    pub fn new(width: usize, height: usize) -> Self {
        Self::filled(width, height, T::default())
    }

    /// Create an image with every pixel set to `value`.
    pub fn filled(width: usize, height: usize, value: T) -> Self {
        Image {
            data: vec![value; width * height],
            width,
            height,
        }
    }

    /// Create an image from a row-major pixel vector.
    ///
    /// # Panics
    /// Panics if `data.len() != width * height`.
    pub fn from_vec(width: usize, height: usize, data: Vec<T>) -> Self {
        assert_eq!(
            data.len(),
            width * height,
            "data length ({}) must equal width * height ({})",
            data.len(),
            width * height,
        );
        Image { data, width, height }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// True when either dimension is zero.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Get the pixel value at (x, y). x is column, y is row.
    ///
    /// # Panics
    /// Panics if (x, y) is out of bounds.
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> T {
        self.bounds_check(x, y);
        self.data[y * self.width + x]
    }

    /// Mutable reference to the pixel at (x, y).
    #[inline]
    pub fn get_mut(&mut self, x: usize, y: usize) -> &mut T {
        self.bounds_check(x, y);
        let idx = y * self.width + x;
        &mut self.data[idx]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, value: T) {
        *self.get_mut(x, y) = value;
    }

    /// Borrow row `y` as a slice.
    #[inline]
    pub fn row(&self, y: usize) -> &[T] {
        assert!(y < self.height, "row {y} out of bounds (height {})", self.height);
        let start = y * self.width;
        &self.data[start..start + self.width]
    }

    #[inline]
    pub fn row_mut(&mut self, y: usize) -> &mut [T] {
        assert!(y < self.height, "row {y} out of bounds (height {})", self.height);
        let start = y * self.width;
        &mut self.data[start..start + self.width]
    }

    /// Borrow a rectangular sub-region as an `ImageView`.
    ///
    /// The view cannot outlive `&self`, so the parent can be neither mutated
    /// nor dropped while a window into it is alive.
    ///
    /// # Panics
    /// Panics if the sub-region extends beyond image bounds.
    pub fn sub_image(&self, x: usize, y: usize, w: usize, h: usize) -> ImageView<'_, T> {
        assert!(
            x + w <= self.width && y + h <= self.height,
            "sub_image region ({x},{y},{w},{h}) exceeds image bounds ({},{})",
            self.width,
            self.height,
        );
        let start = y * self.width + x;
        // Covers every row of the window; the last row stops at its right edge.
        let end = if h == 0 { start } else { (y + h - 1) * self.width + x + w };
        ImageView {
            data: &self.data[start..end],
            width: w,
            height: h,
            parent_width: self.width,
        }
    }

    /// Iterate over all pixels as `(x, y, value)` in row-major order.
    pub fn pixels(&self) -> impl Iterator<Item = (usize, usize, T)> + '_ {
        let w = self.width;
        self.data
            .iter()
            .enumerate()
            .map(move |(i, &v)| (i % w, i / w, v))
    }

    /// Apply `f` to every pixel, producing a new image of the same size.
    pub fn map<U: Pixel>(&self, f: impl Fn(T) -> U) -> Image<U> {
        Image {
            data: self.data.iter().map(|&v| f(v)).collect(),
            width: self.width,
            height: self.height,
        }
    }

    /// The whole pixel buffer, row-major.
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    #[inline]
    fn bounds_check(&self, x: usize, y: usize) {
        assert!(
            x < self.width && y < self.height,
            "pixel ({x},{y}) out of bounds for image {}×{}",
            self.width,
            self.height,
        );
    }
}

impl<T: Pixel + fmt::Debug> fmt::Debug for Image<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Image<{}> {{ {}×{} }}",
            std::any::type_name::<T>(),
            self.width,
            self.height,
        )?;
        for y in 0..self.height.min(8) {
            write!(f, "  row {y}: {:?}", &self.row(y)[..self.width.min(16)])?;
            if self.width > 16 {
                write!(f, " ...")?;
            }
            writeln!(f)?;
        }
        if self.height > 8 {
            writeln!(f, "  ...")?;
        }
        Ok(())
    }
}

impl<T: Pixel> std::ops::Index<(usize, usize)> for Image<T> {
    type Output = T;

    #[inline]
    fn index(&self, (x, y): (usize, usize)) -> &T {
        self.bounds_check(x, y);
        &self.data[y * self.width + x]
    }
}

impl<T: Pixel> std::ops::IndexMut<(usize, usize)> for Image<T> {
    #[inline]
    fn index_mut(&mut self, (x, y): (usize, usize)) -> &mut T {
        self.get_mut(x, y)
    }
}

// ---------------------------------------------------------------------------
// ImageView<'a, T> — Borrowed sub-region of an Image
// ---------------------------------------------------------------------------

/// A borrowed, read-only view into a rectangular region of an `Image<T>`.
///
/// (0, 0) is the top-left of the view, not of the parent.
pub struct ImageView<'a, T: Pixel> {
    /// Parent buffer starting at the view's (0, 0) pixel.
    data: &'a [T],
    width: usize,
    height: usize,
    /// Elements per row in the parent buffer.
    parent_width: usize,
}

impl<'a, T: Pixel> ImageView<'a, T> {
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Get the pixel at (x, y) in view coordinates.
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> T {
        assert!(
            x < self.width && y < self.height,
            "ImageView pixel ({x},{y}) out of bounds for view {}×{}",
            self.width,
            self.height,
        );
        self.data[y * self.parent_width + x]
    }

    /// Row `y` of the view, exactly `width` pixels long.
    #[inline]
    pub fn row(&self, y: usize) -> &'a [T] {
        assert!(y < self.height, "ImageView row {y} out of bounds (height {})", self.height);
        let data: &'a [T] = self.data;
        let start = y * self.parent_width;
        &data[start..start + self.width]
    }

    /// Iterate over all pixels in the view as `(x, y, value)`.
    pub fn pixels(&self) -> impl Iterator<Item = (usize, usize, T)> + '_ {
        (0..self.height).flat_map(move |y| {
            self.row(y).iter().enumerate().map(move |(x, &v)| (x, y, v))
        })
    }

    /// Copy the view's pixels into a new owned Image.
    pub fn to_owned_image(&self) -> Image<T> {
        let mut data = Vec::with_capacity(self.width * self.height);
        for y in 0..self.height {
            data.extend_from_slice(self.row(y));
        }
        Image::from_vec(self.width, self.height, data)
    }
}
