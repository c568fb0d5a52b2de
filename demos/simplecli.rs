#![deny(unsafe_code, unsafe_op_in_unsafe_fn)]
#![warn(
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::todo,
    clippy::unimplemented,
    clippy::unneeded_field_pattern,
    clippy::rest_pat_in_fully_bound_structs,
    clippy::unnecessary_self_imports,
    clippy::str_to_string,
    clippy::string_to_string,
    clippy::string_slice
)]

use std::path::PathBuf;

use clap::Parser;
use swatchette::{PalettePipeline, PaletteSize, DEFAULT_SAMPLE_THRESHOLD};

#[derive(Parser)]
struct Options {
    #[arg(short, long, default_value_t = PaletteSize::default(), value_parser = parse_palette_size)]
    k: PaletteSize,

    #[arg(long, default_value_t = DEFAULT_SAMPLE_THRESHOLD)]
    sample_threshold: u32,

    input: PathBuf,
}

fn parse_palette_size(s: &str) -> Result<PaletteSize, String> {
    let value: u16 = s.parse().map_err(|e| format!("{e}"))?;
    value.try_into().map_err(|e| format!("{e}"))
}

fn main() {
    let Options { k, sample_threshold, input } = Options::parse();

    let image = image::open(input).unwrap().into_rgb8();

    let palette = PalettePipeline::try_from(&image)
        .unwrap()
        .palette_size(k)
        .sample_threshold(sample_threshold)
        .palette();

    for hex in palette {
        println!("{hex}");
    }
}
