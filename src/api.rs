//! Contains the high level pipeline builder API.

use crate::{rank, synth, wu, HexColor, PaletteSize, PixelBuffer, PixelBufferError};

use palette::Srgb;

#[cfg(feature = "image")]
use image::RgbImage;

/// The default maximum number of clusters produced by the quantizer.
pub const DEFAULT_MAX_CLUSTERS: u16 = 16;

/// The default minimum pixel population below which a cluster is discarded
/// as noise. The default of `1` discards nothing.
pub const DEFAULT_MIN_POPULATION: u32 = 1;

/// The default pixel count above which the buffer is subsampled.
pub const DEFAULT_SAMPLE_THRESHOLD: u32 = 200_000;

/// A builder struct to configure and run dominant color extraction.
///
/// The pipeline clusters the buffer into swatches, ranks them by pixel
/// population, and deterministically pads the result, so that it always
/// returns exactly [`palette_size`](Self::palette_size) unique colors
/// (the default is `5`).
///
/// # Examples
/// ```
/// # use swatchette::{PalettePipeline, PixelBuffer};
/// # use palette::Srgb;
/// # fn main() -> Result<(), swatchette::PixelBufferError> {
/// let pixels = vec![Srgb::new(255u8, 0, 0); 16];
/// let buffer = PixelBuffer::new(&pixels, 4, 4)?;
///
/// let palette = PalettePipeline::new(buffer).palette();
/// assert_eq!(palette.len(), 5);
/// assert_eq!(palette[0].to_string(), "#FF0000");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct PalettePipeline<'a> {
    /// The pixel buffer to extract from.
    pixels: PixelBuffer<'a>,
    /// The exact number of colors to return.
    k: PaletteSize,
    /// The maximum number of clusters for the quantizer.
    max_clusters: PaletteSize,
    /// The minimum pixel population for a cluster to survive.
    min_population: u32,
    /// The pixel count above which the buffer is subsampled.
    sample_threshold: u32,
}

impl<'a> PalettePipeline<'a> {
    /// Creates a new [`PalettePipeline`] with default settings.
    #[must_use]
    pub fn new(pixels: PixelBuffer<'a>) -> Self {
        Self {
            pixels,
            k: PaletteSize::default(),
            max_clusters: PaletteSize::from_clamped(DEFAULT_MAX_CLUSTERS),
            min_population: DEFAULT_MIN_POPULATION,
            sample_threshold: DEFAULT_SAMPLE_THRESHOLD,
        }
    }

    /// Sets the exact number of colors to return.
    ///
    /// The default is [`DEFAULT_PALETTE_SIZE`](crate::DEFAULT_PALETTE_SIZE).
    /// A size of `0` yields an empty palette.
    #[must_use]
    pub fn palette_size(mut self, size: PaletteSize) -> Self {
        self.k = size;
        self
    }

    /// Sets the maximum number of clusters the quantizer may produce.
    ///
    /// More clusters give the ranking stage more distinct candidates to pick
    /// from; the default of [`DEFAULT_MAX_CLUSTERS`] is plenty for a palette
    /// of five.
    #[must_use]
    pub fn max_clusters(mut self, max_clusters: PaletteSize) -> Self {
        self.max_clusters = max_clusters;
        self
    }

    /// Sets the minimum pixel population below which a cluster is discarded
    /// as noise.
    ///
    /// The default of [`DEFAULT_MIN_POPULATION`] discards nothing. Note that
    /// discarded clusters also leave the population total, so the sum over
    /// all swatches only equals the sampled pixel count at the default.
    #[must_use]
    pub fn min_population(mut self, min_population: u32) -> Self {
        self.min_population = min_population;
        self
    }

    /// Sets the pixel count above which the buffer is subsampled by striding
    /// rows and columns.
    ///
    /// Subsampling bounds processing cost without changing which colors
    /// dominate, only the precision of their populations. `0` disables
    /// subsampling; the default is [`DEFAULT_SAMPLE_THRESHOLD`].
    #[must_use]
    pub fn sample_threshold(mut self, sample_threshold: u32) -> Self {
        self.sample_threshold = sample_threshold;
        self
    }

    /// Runs the pipeline and returns exactly the configured number of unique
    /// colors, ordered by descending prominence with any synthesized colors
    /// after the real ones.
    ///
    /// This is a total, deterministic function of the buffer and settings;
    /// even a zero-area buffer produces a full (entirely synthesized)
    /// palette.
    #[must_use]
    pub fn palette(self) -> Vec<HexColor> {
        let Self {
            pixels,
            k,
            max_clusters,
            min_population,
            sample_threshold,
        } = self;

        let swatches = wu::swatches(
            pixels.sampled_colors(sample_threshold),
            max_clusters,
            min_population,
        );
        let ranked = rank::rank(swatches, k);

        if ranked.len() >= usize::from(k.into_inner()) {
            return ranked;
        }

        let seed = pixels
            .average_color(sample_threshold)
            .or_else(|| ranked.first().map(|hex| hex.into_srgb()))
            .unwrap_or_else(synth::neutral_seed);

        synth::pad(ranked, seed, k)
    }
}

#[cfg(feature = "image")]
impl<'a> TryFrom<&'a RgbImage> for PalettePipeline<'a> {
    type Error = PixelBufferError;

    fn try_from(image: &'a RgbImage) -> Result<Self, Self::Error> {
        Ok(Self::new(image.try_into()?))
    }
}

/// Extracts exactly `size` unique dominant colors from the given pixels with
/// default pipeline settings.
///
/// `pixels` is row-major and must contain `width * height` entries.
///
/// # Errors
/// Returns an error if the dimensions do not match the pixel count or exceed
/// [`MAX_PIXELS`](crate::MAX_PIXELS); extraction itself cannot fail.
///
/// # Examples
/// ```
/// # use swatchette::{extract_palette, PaletteSize};
/// # use palette::Srgb;
/// # fn main() -> Result<(), swatchette::PixelBufferError> {
/// let pixels = vec![Srgb::new(255u8, 0, 0); 9];
/// let palette = extract_palette(&pixels, 3, 3, PaletteSize::default())?;
/// assert_eq!(palette.len(), 5);
/// assert_eq!(palette[0].to_string(), "#FF0000");
/// # Ok(())
/// # }
/// ```
pub fn extract_palette(
    pixels: &[Srgb<u8>],
    width: u32,
    height: u32,
    size: PaletteSize,
) -> Result<Vec<HexColor>, PixelBufferError> {
    let buffer = PixelBuffer::new(pixels, width, height)?;
    Ok(PalettePipeline::new(buffer).palette_size(size).palette())
}
