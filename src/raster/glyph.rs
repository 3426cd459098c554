//! Bitmap to text encoding.
//!
//! The lit bitmap is cut into blocks, one per output character. A block's
//! cells are read in raster order into a pattern key (bit `i` = cell `i`),
//! the key is optionally inverted, and the charset turns it into a glyph.
//!
//! # Braille
//!
//! 2x4 blocks. Each cell maps to one Unicode braille dot:
//! ```text
//! (0,0)=0x01  (1,0)=0x08
//! (0,1)=0x02  (1,1)=0x10
//! (0,2)=0x04  (1,2)=0x20
//! (0,3)=0x40  (1,3)=0x80
//! ```
//! and the glyph is `U+2800 + mask`.
//!
//! # Blocks and ASCII
//!
//! 2x2 blocks. The 4-bit key (bit0 = top-left, bit1 = top-right,
//! bit2 = bottom-left, bit3 = bottom-right) indexes a 16-entry table
//! directly, so every pattern keeps its position in the cell.

use std::fmt;
use std::str::FromStr;

use super::dither::BinaryBitmap;
use super::error::RasterError;

/// Braille base character (U+2800, empty braille pattern).
pub const BRAILLE_BASE: char = '\u{2800}';

/// Dot mask for each cell of a braille block, in raster order.
pub const BRAILLE_DOT_MASK: [u8; 8] = [0x01, 0x08, 0x02, 0x10, 0x04, 0x20, 0x40, 0x80];

/// Quadrant block glyphs indexed by 2x2 pattern key.
pub const QUADRANT_GLYPHS: [char; 16] = [
    ' ', '▘', '▝', '▀', '▖', '▌', '▞', '▛', '▗', '▚', '▐', '▜', '▄', '▙', '▟', '█',
];

/// ASCII approximations of [`QUADRANT_GLYPHS`], same indexing.
pub const ASCII_QUADRANT_GLYPHS: [char; 16] = [
    ' ', '`', '\'', '"', ',', '[', '/', 'P', '.', '\\', ']', '7', '_', 'L', 'J', '@',
];

/// Output character set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Charset {
    /// 2x4 braille dots, 8 sub-cells per character
    #[default]
    Braille,
    /// Unicode eighth, half and quadrant blocks, 2x2 sub-cells per character
    Blocks,
    /// Plain ASCII approximation, 2x2 sub-cells per character
    Ascii,
}

impl Charset {
    pub const ALL: [Charset; 3] = [Charset::Braille, Charset::Blocks, Charset::Ascii];

    /// Sub-cells per character as `(columns, rows)`.
    pub fn block_size(&self) -> (u32, u32) {
        match self {
            Charset::Braille => (2, 4),
            Charset::Blocks | Charset::Ascii => (2, 2),
        }
    }

    /// Key with every cell of a block set.
    pub fn full_mask(&self) -> u8 {
        let (kx, ky) = self.block_size();
        ((1u16 << (kx * ky)) - 1) as u8
    }

    /// Glyph for a pattern key, after optional inversion.
    pub fn glyph(&self, key: u8, invert: bool) -> char {
        let mask = self.full_mask();
        let key = if invert { !key & mask } else { key & mask };
        match self {
            Charset::Braille => braille(key),
            Charset::Blocks => QUADRANT_GLYPHS[key as usize],
            Charset::Ascii => ASCII_QUADRANT_GLYPHS[key as usize],
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Charset::Braille => "braille",
            Charset::Blocks => "blocks",
            Charset::Ascii => "ascii",
        }
    }
}

impl fmt::Display for Charset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Charset {
    type Err = RasterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "braille" => Ok(Charset::Braille),
            "blocks" => Ok(Charset::Blocks),
            "ascii" => Ok(Charset::Ascii),
            other => Err(RasterError::UnknownCharset(other.to_string())),
        }
    }
}

/// Braille character for a raster-order key (bit `i` = cell `i`).
pub fn braille(key: u8) -> char {
    let mut code = 0u32;
    for (i, mask) in BRAILLE_DOT_MASK.iter().enumerate() {
        if key & (1 << i) != 0 {
            code |= *mask as u32;
        }
    }
    char::from_u32(BRAILLE_BASE as u32 + code).unwrap_or(BRAILLE_BASE)
}

/// Pattern key of the character block at `(cx, cy)`.
pub fn block_key(bitmap: &BinaryBitmap, charset: Charset, cx: u32, cy: u32) -> u8 {
    let (kx, ky) = charset.block_size();
    let mut key = 0u8;
    for dy in 0..ky {
        for dx in 0..kx {
            if bitmap.get(cx * kx + dx, cy * ky + dy) {
                key |= 1 << (dy * kx + dx);
            }
        }
    }
    key
}

/// Lines of glyphs for a bitmap, top to bottom.
///
/// Cloning the iterator restarts it from its current row.
#[derive(Debug, Clone)]
pub struct GlyphRows<'a> {
    bitmap: &'a BinaryBitmap,
    charset: Charset,
    invert: bool,
    cols: u32,
    rows: u32,
    next_row: u32,
}

impl<'a> GlyphRows<'a> {
    pub fn new(bitmap: &'a BinaryBitmap, charset: Charset, invert: bool) -> Self {
        let (kx, ky) = charset.block_size();
        Self {
            bitmap,
            charset,
            invert,
            cols: bitmap.width() / kx,
            rows: bitmap.height() / ky,
            next_row: 0,
        }
    }

    fn encode_row(&self, cy: u32) -> String {
        (0..self.cols)
            .map(|cx| {
                let key = block_key(self.bitmap, self.charset, cx, cy);
                self.charset.glyph(key, self.invert)
            })
            .collect()
    }
}

impl Iterator for GlyphRows<'_> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        if self.next_row >= self.rows {
            return None;
        }
        let row = self.encode_row(self.next_row);
        self.next_row += 1;
        Some(row)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = (self.rows - self.next_row) as usize;
        (left, Some(left))
    }
}

impl ExactSizeIterator for GlyphRows<'_> {}

/// Encode a whole bitmap into text lines.
pub fn encode(bitmap: &BinaryBitmap, charset: Charset, invert: bool) -> Vec<String> {
    GlyphRows::new(bitmap, charset, invert).collect()
}
