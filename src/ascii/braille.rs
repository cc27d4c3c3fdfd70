//! Braille character rendering for terminal display of bitmaps.
//!
//! Each braille character represents a 2x4 dot matrix, so one terminal cell
//! shows 8 source pixels. A dot is raised when the pixel's red channel is
//! darker than the threshold.

use super::pixel_grid::PixelGrid;

/// Braille base character (U+2800, empty braille pattern).
pub const BRAILLE_BASE: char = '\u{2800}';

/// Default darkness threshold for raising a dot.
pub const DEFAULT_THRESHOLD: u8 = 128;

/// Pixels per braille cell horizontally.
const BW: usize = 2;

/// Pixels per braille cell vertically.
const BH: usize = 4;

/// Dot bit for each sub-pixel, indexed `[y][x]`.
/// ```text
/// [0,0]=1   [1,0]=8
/// [0,1]=2   [1,1]=16
/// [0,2]=4   [1,2]=32
/// [0,3]=64  [1,3]=128
/// ```
const DOT_BITS: [[u8; BW]; BH] = [[0x01, 0x08], [0x02, 0x10], [0x04, 0x20], [0x40, 0x80]];

/// Convert an 8-bit dot mask to its braille character (U+2800 to U+28FF).
pub fn mask_to_braille(mask: u8) -> char {
    char::from_u32(BRAILLE_BASE as u32 | mask as u32).unwrap_or(BRAILLE_BASE)
}

/// Render a grid as braille lines, top to bottom.
///
/// Produces `ceil(height / 4)` lines of `ceil(width / 2)` characters. Cells
/// on a ragged right or bottom edge treat the missing pixels as unset.
pub fn render(grid: &PixelGrid, threshold: u8) -> Vec<String> {
    let x_blocks = grid.width().div_ceil(BW);
    let y_blocks = grid.height().div_ceil(BH);

    (0..y_blocks)
        .map(|yb| {
            (0..x_blocks)
                .map(|xb| mask_to_braille(cell_mask(grid, xb, yb, threshold)))
                .collect()
        })
        .collect()
}

/// Render a grid as a single newline-separated string.
pub fn render_to_string(grid: &PixelGrid, threshold: u8) -> String {
    render(grid, threshold).join("\n")
}

fn cell_mask(grid: &PixelGrid, xb: usize, yb: usize, threshold: u8) -> u8 {
    let mut mask = 0u8;
    for (y, row) in DOT_BITS.iter().enumerate() {
        for (x, bit) in row.iter().enumerate() {
            if let Some([r, _, _]) = grid.get(xb * BW + x, yb * BH + y) {
                if r < threshold {
                    mask |= bit;
                }
            }
        }
    }
    mask
}
