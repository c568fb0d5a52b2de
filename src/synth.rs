//! Deterministic palette padding.
//!
//! When an image does not contain enough distinct dominant colors, additional
//! unique colors are synthesized from a seed color by scaling its brightness
//! through a fixed factor sequence. If the scaled variants cannot produce
//! enough unique colors (a pure black seed scales to black forever), a fixed
//! reserve palette takes over, so padding always terminates with exactly the
//! requested number of unique colors.

use crate::{HexColor, PaletteSize};
use palette::Srgb;

/// The fixed, ordered brightness factors tried first during synthesis.
///
/// Starting at `1.0` means the seed color itself is the first candidate.
pub const BRIGHTNESS_FACTORS: [f32; 7] = [1.0, 0.85, 1.15, 0.70, 1.30, 0.55, 1.45];

/// The total number of scaled-variant candidates tried (the fixed factors
/// plus the arithmetic extension) before falling back to the reserve palette.
const VARIANT_CANDIDATES: usize = 32;

/// The reserve palette: canonical colors applied in order once scaled
/// variants are exhausted, followed by the synthetic sequence
/// `#000001, #000002, ...`.
const RESERVE: [u32; 8] = [
    0x000000, 0xFFFFFF, 0xFF0000, 0x00FF00, 0x0000FF, 0xFFFF00, 0x00FFFF, 0xFF00FF,
];

/// The last-resort synthesis seed for inputs with no pixels and no swatches.
pub(crate) fn neutral_seed() -> Srgb<u8> {
    Srgb::new(0x88, 0x88, 0x88)
}

/// The `index`-th brightness factor.
///
/// The first seven are [`BRIGHTNESS_FACTORS`]; after that the sequence
/// continues the same pattern arithmetically, alternating below and above
/// `1.0` in growing `0.15` steps: `0.40, 1.60, 0.25, 1.75, ...`.
#[allow(clippy::cast_precision_loss)]
fn variant_factor(index: usize) -> f32 {
    if let Some(&factor) = BRIGHTNESS_FACTORS.get(index) {
        return factor;
    }
    let extension = index - BRIGHTNESS_FACTORS.len();
    let offset = 0.15 * (extension / 2 + 4) as f32;
    if extension % 2 == 0 {
        1.0 - offset
    } else {
        1.0 + offset
    }
}

/// Scales each channel of `seed` by `factor`, rounding and clamping to `[0, 255]`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn scaled(seed: Srgb<u8>, factor: f32) -> Srgb<u8> {
    let channel = |c: u8| (f32::from(c) * factor).round().clamp(0.0, 255.0) as u8;
    Srgb::new(channel(seed.red), channel(seed.green), channel(seed.blue))
}

/// Extends `palette` with deterministically synthesized colors until it holds
/// exactly `size` pairwise-unique entries.
///
/// Candidates are generated in a fixed order (scaled variants of `seed`
/// first, then the reserve palette) and accepted only if not already present,
/// so the original entries keep their positions and the result is reproducible
/// for any seed.
///
/// The entries of `palette` must already be unique and number at most `size`.
#[must_use]
pub fn pad(mut palette: Vec<HexColor>, seed: Srgb<u8>, size: PaletteSize) -> Vec<HexColor> {
    let target = usize::from(size.into_inner());
    debug_assert!(palette.len() <= target);

    for index in 0..VARIANT_CANDIDATES {
        if palette.len() >= target {
            return palette;
        }
        let candidate = HexColor::from(scaled(seed, variant_factor(index)));
        if !palette.contains(&candidate) {
            palette.push(candidate);
        }
    }

    // the synthetic tail alone holds more colors than any permitted size,
    // so this loop always fills the palette
    for value in RESERVE.iter().copied().chain(1..) {
        if palette.len() >= target {
            break;
        }
        let candidate = HexColor::from_u32(value);
        if !palette.contains(&candidate) {
            palette.push(candidate);
        }
    }

    palette
}
