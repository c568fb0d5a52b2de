//! Contains the swatch ranking and deduplication stage.

use crate::{HexColor, PaletteSize, Swatch};
use std::cmp::Reverse;

/// Orders swatches by population descending (ties broken by packed RGB value
/// ascending), converts them to hex colors, removes exact duplicates keeping
/// the first (most populous) occurrence, and truncates to at most `size`
/// entries.
///
/// This stage never pads; a short result is the padding stage's problem.
pub(crate) fn rank(mut swatches: Vec<Swatch>, size: PaletteSize) -> Vec<HexColor> {
    swatches.sort_by_key(|swatch| {
        (
            Reverse(swatch.population()),
            HexColor::from(swatch.color()).into_u32(),
        )
    });

    let limit = usize::from(size.into_inner());
    let mut ranked = Vec::with_capacity(limit.min(swatches.len()));
    for swatch in swatches {
        if ranked.len() == limit {
            break;
        }
        let hex = HexColor::from(swatch.color());
        if !ranked.contains(&hex) {
            ranked.push(hex);
        }
    }
    ranked
}
