//! Contains the borrowed pixel buffer type, deterministic subsampling,
//! and the average color computation used to seed palette synthesis.

use crate::{AboveMaxLen, MAX_PIXELS};
use palette::{cast::ComponentsAs, Srgb, Srgba};
use std::{error::Error, fmt::Display};

#[cfg(feature = "image")]
use image::RgbImage;

/// An error type for invalid pixel buffer construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelBufferError {
    /// The declared `width * height` does not match the number of pixels provided.
    DimensionMismatch {
        /// The declared width in pixels.
        width: u32,
        /// The declared height in pixels.
        height: u32,
        /// The number of pixels actually provided.
        len: usize,
    },
    /// The buffer holds more than [`MAX_PIXELS`] pixels.
    AboveMaxLen(AboveMaxLen<u32>),
}

impl Display for PixelBufferError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match *self {
            Self::DimensionMismatch { width, height, len } => {
                write!(f, "{width}x{height} does not match the {len} pixels provided")
            }
            Self::AboveMaxLen(err) => write!(f, "{err}"),
        }
    }
}

impl Error for PixelBufferError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::DimensionMismatch { .. } => None,
            Self::AboveMaxLen(err) => Some(err),
        }
    }
}

/// A borrowed rectangular buffer of decoded pixels.
///
/// The invariants `width * height == len` and `len <= MAX_PIXELS` are enforced
/// at construction; zero-area buffers are valid and simply contain no pixels.
/// The buffer is only borrowed for the duration of one extraction and is never
/// retained.
///
/// # Examples
/// From a raw color slice:
/// ```
/// # use swatchette::PixelBuffer;
/// # use palette::Srgb;
/// # fn main() -> Result<(), swatchette::PixelBufferError> {
/// let pixels = vec![Srgb::new(0u8, 0, 0); 6];
/// let buffer = PixelBuffer::new(&pixels, 3, 2)?;
/// # Ok(())
/// # }
/// ```
///
/// From an image (needs the `image` feature to be enabled):
/// ```no_run
/// # use swatchette::PixelBuffer;
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let img = image::open("some image")?.into_rgb8();
/// let buffer = PixelBuffer::try_from(&img)?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelBuffer<'a> {
    /// The pixels in row-major order.
    colors: &'a [Srgb<u8>],
    /// The width in pixels.
    width: u32,
    /// The height in pixels.
    height: u32,
}

impl<'a> PixelBuffer<'a> {
    /// Creates a [`PixelBuffer`] over `colors` in row-major order.
    ///
    /// # Errors
    /// Returns an error if `width * height` does not equal `colors.len()`
    /// or exceeds [`MAX_PIXELS`].
    pub fn new(colors: &'a [Srgb<u8>], width: u32, height: u32) -> Result<Self, PixelBufferError> {
        let area = u64::from(width) * u64::from(height);
        if area > u64::from(MAX_PIXELS) {
            return Err(PixelBufferError::AboveMaxLen(AboveMaxLen(MAX_PIXELS)));
        }
        if area != colors.len() as u64 {
            return Err(PixelBufferError::DimensionMismatch { width, height, len: colors.len() });
        }
        Ok(Self { colors, width, height })
    }

    /// Creates a [`PixelBuffer`] over tightly packed `R, G, B` bytes in
    /// row-major order, without copying.
    ///
    /// # Errors
    /// Returns an error if `width * height * 3` does not equal `bytes.len()`
    /// or the pixel count exceeds [`MAX_PIXELS`].
    pub fn from_rgb_bytes(
        bytes: &'a [u8],
        width: u32,
        height: u32,
    ) -> Result<Self, PixelBufferError> {
        let area = u64::from(width) * u64::from(height);
        if area > u64::from(MAX_PIXELS) {
            return Err(PixelBufferError::AboveMaxLen(AboveMaxLen(MAX_PIXELS)));
        }
        if area * 3 != bytes.len() as u64 {
            return Err(PixelBufferError::DimensionMismatch {
                width,
                height,
                len: bytes.len() / 3,
            });
        }
        let colors: &[Srgb<u8>] = bytes.components_as();
        Ok(Self { colors, width, height })
    }

    /// The width in pixels.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// The height in pixels.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// The total number of pixels.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn num_pixels(&self) -> u32 {
        self.colors.len() as u32
    }

    /// Whether the buffer has zero area.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// The pixels in row-major order.
    #[must_use]
    pub const fn colors(&self) -> &'a [Srgb<u8>] {
        self.colors
    }

    /// The row/column stride that keeps the sampled pixel count near `threshold`.
    ///
    /// A `threshold` of `0` disables subsampling.
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_precision_loss,
        clippy::cast_sign_loss
    )]
    fn sample_stride(&self, threshold: u32) -> usize {
        let pixels = u64::from(self.num_pixels());
        if threshold == 0 || pixels <= u64::from(threshold) {
            1
        } else {
            let ratio = pixels as f64 / f64::from(threshold);
            (ratio.sqrt().ceil() as usize).max(1)
        }
    }

    /// Walks every `stride`-th row and column, where the stride is chosen so
    /// that at most about `threshold` pixels are visited.
    ///
    /// The walk is deterministic and always starts at the top-left pixel, so a
    /// non-empty buffer yields a non-empty sample. A `threshold` of `0`
    /// disables subsampling and yields every pixel.
    pub fn sampled_colors(&self, threshold: u32) -> impl Iterator<Item = Srgb<u8>> + 'a {
        let stride = self.sample_stride(threshold);
        let width = self.width as usize;
        let colors = self.colors;
        (0..self.height as usize)
            .step_by(stride)
            .flat_map(move |y| (0..width).step_by(stride).map(move |x| colors[y * width + x]))
    }

    /// The arithmetic mean of the R, G, and B channels over the
    /// (subsampled, see [`sampled_colors`](Self::sampled_colors)) buffer,
    /// or `None` for a zero-area buffer.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn average_color(&self, threshold: u32) -> Option<Srgb<u8>> {
        if self.is_empty() {
            return None;
        }
        let (mut red, mut green, mut blue, mut count) = (0u64, 0u64, 0u64, 0u64);
        for color in self.sampled_colors(threshold) {
            red += u64::from(color.red);
            green += u64::from(color.green);
            blue += u64::from(color.blue);
            count += 1;
        }
        // count > 0 since the sample always includes the top-left pixel
        Some(Srgb::new(
            (red / count) as u8,
            (green / count) as u8,
            (blue / count) as u8,
        ))
    }
}

#[cfg(feature = "image")]
impl<'a> TryFrom<&'a RgbImage> for PixelBuffer<'a> {
    type Error = PixelBufferError;

    fn try_from(image: &'a RgbImage) -> Result<Self, Self::Error> {
        Self::from_rgb_bytes(image.as_raw(), image.width(), image.height())
    }
}

/// Drops the alpha channel from a slice of RGBA pixels.
///
/// Alpha never influences clustering weight; callers with RGBA sources strip
/// it once at the boundary and hand the result to [`PixelBuffer::new`].
#[must_use]
pub fn strip_alpha(colors: &[Srgba<u8>]) -> Vec<Srgb<u8>> {
    colors.iter().map(|color| color.color).collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn dimensions_must_match_pixel_count() {
        let pixels = vec![Srgb::new(0u8, 0, 0); 6];
        assert!(PixelBuffer::new(&pixels, 3, 2).is_ok());
        assert_eq!(
            PixelBuffer::new(&pixels, 3, 3),
            Err(PixelBufferError::DimensionMismatch { width: 3, height: 3, len: 6 })
        );
    }

    #[test]
    fn zero_area_buffers_are_valid() {
        let buffer = PixelBuffer::new(&[], 0, 0).unwrap();
        assert!(buffer.is_empty());
        assert_eq!(buffer.sampled_colors(0).count(), 0);
        assert_eq!(buffer.average_color(0), None);

        // one zero dimension is enough for zero area
        assert!(PixelBuffer::new(&[], 17, 0).is_ok());
    }

    #[test]
    fn area_above_max_len_is_rejected() {
        assert_eq!(
            PixelBuffer::new(&[], u32::MAX, u32::MAX),
            Err(PixelBufferError::AboveMaxLen(AboveMaxLen(MAX_PIXELS)))
        );
    }

    #[test]
    fn rgb_bytes_cast_without_copying() {
        let bytes = [1u8, 2, 3, 4, 5, 6];
        let buffer = PixelBuffer::from_rgb_bytes(&bytes, 2, 1).unwrap();
        assert_eq!(buffer.colors(), &[Srgb::new(1, 2, 3), Srgb::new(4, 5, 6)]);

        assert_eq!(
            PixelBuffer::from_rgb_bytes(&bytes, 2, 2),
            Err(PixelBufferError::DimensionMismatch { width: 2, height: 2, len: 2 })
        );
    }

    #[test]
    fn average_color_is_channel_mean() {
        let pixels = [Srgb::new(10u8, 20, 30), Srgb::new(20, 40, 50)];
        let buffer = PixelBuffer::new(&pixels, 2, 1).unwrap();
        assert_eq!(buffer.average_color(0), Some(Srgb::new(15, 30, 40)));
    }

    #[test]
    fn sampling_below_threshold_visits_every_pixel() {
        let pixels = vec![Srgb::new(0u8, 0, 0); 100];
        let buffer = PixelBuffer::new(&pixels, 10, 10).unwrap();
        assert_eq!(buffer.sampled_colors(200_000).count(), 100);
        assert_eq!(buffer.sampled_colors(0).count(), 100);
    }

    #[test]
    fn sampling_above_threshold_strides_rows_and_columns() {
        let pixels = vec![Srgb::new(0u8, 0, 0); 10_000];
        let buffer = PixelBuffer::new(&pixels, 100, 100).unwrap();
        // stride of 2 keeps every other row and column
        assert_eq!(buffer.sampled_colors(2_500).count(), 2_500);
    }

    #[test]
    fn sampling_is_deterministic() {
        let pixels: Vec<_> = (0..10_000u32)
            .map(|i| Srgb::new((i % 256) as u8, (i / 256) as u8, 0))
            .collect();
        let buffer = PixelBuffer::new(&pixels, 100, 100).unwrap();
        let first: Vec<_> = buffer.sampled_colors(1_000).collect();
        let second: Vec<_> = buffer.sampled_colors(1_000).collect();
        assert_eq!(first, second);
        assert_eq!(first[0], pixels[0]);
    }

    #[test]
    fn strip_alpha_discards_alpha() {
        let rgba = [Srgba::new(1u8, 2, 3, 0), Srgba::new(4, 5, 6, 255)];
        assert_eq!(strip_alpha(&rgba), vec![Srgb::new(1, 2, 3), Srgb::new(4, 5, 6)]);
    }
}
