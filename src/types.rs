//! Contains the core vocabulary types used across the crate.

use crate::{DEFAULT_PALETTE_SIZE, MAX_COLORS};
use palette::Srgb;
use std::{
    error::Error,
    fmt::{Debug, Display},
    str::FromStr,
};

/// An error type for when the length of an input (e.g., `Vec` or slice)
/// is above the maximum supported value.
///
/// The inner value is the maximum supported value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct AboveMaxLen<T>(pub T);

impl<T: Display> Display for AboveMaxLen<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "above the maximum length of {}", self.0)
    }
}

impl<T: Debug + Display> Error for AboveMaxLen<T> {}

/// This type is used to specify the number of colors in an extracted palette
/// (and, for the quantizer, the maximum number of clusters).
///
/// This is a simple new type wrapper around `u16` with the invariant that it must be
/// less than or equal to [`MAX_COLORS`].
///
/// If a [`PaletteSize`] of `0` is provided, extraction returns an empty palette.
/// Every other size yields exactly that many unique colors.
///
/// # Examples
/// Use `into` to create [`PaletteSize`]s from `u8`s.
/// For `u16`s, use `try_into` or [`PaletteSize::from_clamped`].
///
/// ```
/// # use swatchette::{PaletteSize, AboveMaxLen};
/// # fn main() -> Result<(), AboveMaxLen<u16>> {
/// let size = PaletteSize::from(16);
/// let size: PaletteSize = 128u16.try_into()?;
/// let size = PaletteSize::from_clamped(1024);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct PaletteSize(u16);

impl PaletteSize {
    /// The maximum supported palette size (given by [`MAX_COLORS`]).
    pub const MAX: Self = Self(MAX_COLORS);

    /// Gets the inner `u16` value.
    #[must_use]
    pub const fn into_inner(self) -> u16 {
        self.0
    }

    /// Creates a [`PaletteSize`] by clamping the given `u16` to be less than or equal to [`MAX_COLORS`].
    #[must_use]
    pub const fn from_clamped(value: u16) -> Self {
        if value <= MAX_COLORS {
            Self(value)
        } else {
            Self(MAX_COLORS)
        }
    }
}

impl Default for PaletteSize {
    fn default() -> Self {
        Self(DEFAULT_PALETTE_SIZE)
    }
}

impl From<PaletteSize> for u16 {
    fn from(val: PaletteSize) -> Self {
        val.into_inner()
    }
}

impl From<u8> for PaletteSize {
    fn from(value: u8) -> Self {
        Self(value.into())
    }
}

impl TryFrom<u16> for PaletteSize {
    type Error = AboveMaxLen<u16>;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        if value <= MAX_COLORS {
            Ok(PaletteSize(value))
        } else {
            Err(AboveMaxLen(MAX_COLORS))
        }
    }
}

impl Display for PaletteSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.into_inner())
    }
}

/// A representative color found by quantization together with the number of
/// pixels assigned to its cluster.
///
/// Swatches are created by [`wu::swatches`](crate::wu::swatches) and are
/// immutable afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Swatch {
    /// The cluster's mean color.
    color: Srgb<u8>,
    /// The number of (sampled) pixels assigned to the cluster.
    population: u32,
}

impl Swatch {
    /// Creates a new [`Swatch`] from a color and its pixel population.
    #[must_use]
    pub const fn new(color: Srgb<u8>, population: u32) -> Self {
        Self { color, population }
    }

    /// The cluster's mean color.
    #[must_use]
    pub const fn color(self) -> Srgb<u8> {
        self.color
    }

    /// The number of (sampled) pixels assigned to the cluster.
    #[must_use]
    pub const fn population(self) -> u32 {
        self.population
    }
}

/// A 24-bit color that displays as an uppercase `#RRGGBB` hex code.
///
/// Equality is exact 24-bit equality, so deduplicating [`HexColor`]s and
/// deduplicating their rendered hex strings are the same operation.
///
/// # Examples
/// ```
/// # use swatchette::HexColor;
/// # use palette::Srgb;
/// let red = HexColor::from(Srgb::new(255u8, 0, 0));
/// assert_eq!(red.to_string(), "#FF0000");
/// assert_eq!(red, HexColor::from_u32(0xFF0000));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(transparent)]
pub struct HexColor(Srgb<u8>);

impl HexColor {
    /// Creates a [`HexColor`] from the low 24 bits of the given value
    /// (`0xRRGGBB`); higher bits are discarded.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn from_u32(value: u32) -> Self {
        Self(Srgb::new((value >> 16) as u8, (value >> 8) as u8, value as u8))
    }

    /// Returns the color packed as `0xRRGGBB`.
    #[must_use]
    pub fn into_u32(self) -> u32 {
        u32::from(self.0.red) << 16 | u32::from(self.0.green) << 8 | u32::from(self.0.blue)
    }

    /// Returns the underlying color.
    #[must_use]
    pub fn into_srgb(self) -> Srgb<u8> {
        self.0
    }
}

impl From<Srgb<u8>> for HexColor {
    fn from(color: Srgb<u8>) -> Self {
        Self(color)
    }
}

impl From<HexColor> for Srgb<u8> {
    fn from(val: HexColor) -> Self {
        val.into_srgb()
    }
}

impl Display for HexColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let Srgb { red, green, blue, .. } = self.0;
        write!(f, "#{red:02X}{green:02X}{blue:02X}")
    }
}

/// An error type for when a string does not hold a `#RRGGBB` hex color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseHexColorError;

impl Display for ParseHexColorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "expected a hex color of the form #RRGGBB")
    }
}

impl Error for ParseHexColorError {}

impl FromStr for HexColor {
    type Err = ParseHexColorError;

    /// Parses a `#RRGGBB` hex code. Hex digits may be in either case;
    /// everything else about the format is strict.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.strip_prefix('#').ok_or(ParseHexColorError)?;
        if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ParseHexColorError);
        }
        let value = u32::from_str_radix(digits, 16).map_err(|_| ParseHexColorError)?;
        Ok(Self::from_u32(value))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn hex_display_is_uppercase_rrggbb() {
        assert_eq!(HexColor::from_u32(0x000000).to_string(), "#000000");
        assert_eq!(HexColor::from_u32(0xFFFFFF).to_string(), "#FFFFFF");
        assert_eq!(HexColor::from_u32(0x0A0B0C).to_string(), "#0A0B0C");
        assert_eq!(HexColor::from(Srgb::new(17u8, 34, 51)).to_string(), "#112233");
    }

    #[test]
    fn from_u32_masks_to_24_bits() {
        assert_eq!(HexColor::from_u32(0xFF123456), HexColor::from_u32(0x123456));
    }

    #[test]
    fn hex_round_trip() {
        for value in [0x000000, 0xFFFFFF, 0xFF0000, 0x00FF00, 0x0000FF, 0x0A0B0C, 0xABCDEF] {
            let color = HexColor::from_u32(value);
            assert_eq!(color.to_string().parse::<HexColor>().unwrap(), color);
            assert_eq!(color.into_u32(), value);
        }
    }

    #[test]
    fn parse_accepts_lowercase() {
        assert_eq!(
            "#abcdef".parse::<HexColor>().unwrap(),
            HexColor::from_u32(0xABCDEF)
        );
    }

    #[test]
    fn parse_rejects_malformed_input() {
        for s in ["123456", "#12345", "#1234567", "#GGGGGG", "#+12345", "", "#"] {
            assert_eq!(s.parse::<HexColor>(), Err(ParseHexColorError));
        }
    }

    #[test]
    fn palette_size_bounds() {
        assert_eq!(PaletteSize::default().into_inner(), 5);
        assert_eq!(PaletteSize::from(16u8).into_inner(), 16);
        assert_eq!(PaletteSize::from_clamped(1024), PaletteSize::MAX);
        assert_eq!(PaletteSize::try_from(128u16).unwrap().into_inner(), 128);
        assert_eq!(PaletteSize::try_from(300u16), Err(AboveMaxLen(MAX_COLORS)));
    }

    #[test]
    fn swatch_accessors() {
        let swatch = Swatch::new(Srgb::new(1u8, 2, 3), 42);
        assert_eq!(swatch.color(), Srgb::new(1, 2, 3));
        assert_eq!(swatch.population(), 42);
    }
}
