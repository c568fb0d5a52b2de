//! A library for deterministic dominant-color palette extraction.
//!
//! `swatchette` takes a decoded pixel buffer and returns exactly N unique
//! colors (five by default) as uppercase `#RRGGBB` hex codes, ordered by how
//! much of the image they cover. Images without enough distinct dominant
//! colors are padded by a deterministic synthesis procedure, so the result
//! always has exactly N entries, for every input, including an empty one.
//!
//! # Features
//! - `image`: enables integration with the [`image`] crate (on by default).
//!
//! # High-Level API
//! To get started, see [`PalettePipeline`], or use [`extract_palette`] for
//! the one-call case:
//! ```
//! # use swatchette::{extract_palette, PaletteSize};
//! # use palette::Srgb;
//! # fn main() -> Result<(), swatchette::PixelBufferError> {
//! let pixels = vec![Srgb::new(255u8, 0, 0); 9];
//!
//! let palette = extract_palette(&pixels, 3, 3, PaletteSize::default())?;
//!
//! assert_eq!(palette.len(), 5);
//! assert_eq!(palette[0].to_string(), "#FF0000");
//! # Ok(())
//! # }
//! ```
//!
//! Extraction is a pure function of its input: no I/O, no locks, no shared
//! state, and every loop is bounded, so it is safe to run concurrently for
//! different images from any threads.

#![deny(unsafe_code, unsafe_op_in_unsafe_fn)]
#![warn(
    clippy::pedantic,
    clippy::cargo,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::todo,
    clippy::unimplemented,
    clippy::unwrap_used,
    clippy::unwrap_in_result,
    clippy::expect_used,
    clippy::unneeded_field_pattern,
    clippy::rest_pat_in_fully_bound_structs,
    clippy::unnecessary_self_imports,
    clippy::str_to_string,
    clippy::string_to_string,
    clippy::string_slice,
    missing_docs,
    clippy::missing_docs_in_private_items,
    rustdoc::all,
    clippy::float_cmp_const,
    clippy::lossy_float_literal
)]
#![allow(
    clippy::doc_markdown,
    clippy::module_name_repetitions,
    clippy::many_single_char_names,
    clippy::missing_panics_doc,
    clippy::unreadable_literal,
    clippy::wildcard_imports
)]

mod api;
mod buffer;
mod rank;
mod types;

pub mod synth;
pub mod wu;

pub use api::*;
pub use buffer::*;
pub use types::*;

/// The maximum supported image size in number of pixels is `u32::MAX`.
pub const MAX_PIXELS: u32 = u32::MAX;

/// The maximum supported number of palette colors is `256`.
pub const MAX_COLORS: u16 = u8::MAX as u16 + 1;

/// The number of colors extracted by default.
pub const DEFAULT_PALETTE_SIZE: u16 = 5;
