//! Bitmap decoding and braille rendering for showing images in a terminal.

pub mod braille;
mod pixel_grid;

pub use braille::{render, render_to_string, BRAILLE_BASE, DEFAULT_THRESHOLD};
pub use pixel_grid::{PixelGrid, PixelGridError, Rgb};
