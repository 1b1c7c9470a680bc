// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Glyph providers for the little text a page carries (running heads, folios).
//
// A TrueType font is used when one can be loaded; otherwise the built-in 5x7
// block font takes over. Font trouble is never fatal.

use std::path::{Path, PathBuf};

use ab_glyph::{FontVec, PxScale};
use corpus_core::error::{CorpusError, Result};
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_text_mut, text_size};
use imageproc::rect::Rect;
use tracing::{debug, info, warn};

/// Well-known install locations of DejaVu Sans.
const DEFAULT_FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/local/share/fonts/DejaVuSans.ttf",
    "/Library/Fonts/DejaVuSans.ttf",
];

/// Something that can measure and draw a line of text onto a page.
pub trait GlyphRenderer {
    /// Short provider name for logs.
    fn name(&self) -> &str;

    /// Advance width of `text` at `size` pixels.
    fn text_width(&self, text: &str, size: f32) -> u32;

    /// Draw `text` with its top-left corner at (`x`, `y`).
    fn draw_text(&self, image: &mut RgbImage, x: i32, y: i32, size: f32, text: &str, color: Rgb<u8>);
}

/// Pick a glyph provider: the explicit font if given, then the standard
/// DejaVu locations, then the built-in bitmap font.
pub fn resolve_glyphs(explicit: Option<&Path>) -> Box<dyn GlyphRenderer> {
    if let Some(path) = explicit {
        match TrueTypeGlyphs::load(path) {
            Ok(font) => {
                info!(path = %path.display(), "Using requested font");
                return Box::new(font);
            }
            Err(err) => {
                warn!(error = %err, "Requested font unavailable; falling back");
            }
        }
    }

    for candidate in DEFAULT_FONT_CANDIDATES {
        let path = PathBuf::from(candidate);
        if !path.is_file() {
            continue;
        }
        match TrueTypeGlyphs::load(&path) {
            Ok(font) => {
                debug!(path = %path.display(), "Using system font");
                return Box::new(font);
            }
            Err(err) => debug!(error = %err, "Skipping unreadable system font"),
        }
    }

    debug!("No TrueType font found; using built-in bitmap glyphs");
    Box::new(BitmapGlyphs)
}

// -- TrueType -----------------------------------------------------------------

/// Glyphs rasterised from a TrueType/OpenType font file.
pub struct TrueTypeGlyphs {
    font: FontVec,
    name: String,
}

impl TrueTypeGlyphs {
    /// Load a font from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path).map_err(|err| {
            CorpusError::Font(format!("failed to read {}: {}", path.display(), err))
        })?;
        let font = FontVec::try_from_vec(bytes).map_err(|err| {
            CorpusError::Font(format!("failed to parse {}: {}", path.display(), err))
        })?;
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "truetype".to_owned());
        Ok(Self { font, name })
    }
}

impl GlyphRenderer for TrueTypeGlyphs {
    fn name(&self) -> &str {
        &self.name
    }

    fn text_width(&self, text: &str, size: f32) -> u32 {
        text_size(PxScale::from(size), &self.font, text).0
    }

    fn draw_text(&self, image: &mut RgbImage, x: i32, y: i32, size: f32, text: &str, color: Rgb<u8>) {
        draw_text_mut(image, color, x, y, PxScale::from(size), &self.font, text);
    }
}

// -- Built-in bitmap font -------------------------------------------------------

const GLYPH_COLS: u32 = 5;
const GLYPH_ROWS: usize = 7;

/// Built-in 5x7 block font: A-Z, 0-9, space, `-` and `.`.
///
/// Cells are scaled so that `size` pixels roughly spans one line of text, with
/// one blank column between neighbouring cells.
#[derive(Debug, Clone, Copy, Default)]
pub struct BitmapGlyphs;

impl BitmapGlyphs {
    fn block(size: f32) -> u32 {
        ((size / 8.0).round() as u32).max(1)
    }
}

impl GlyphRenderer for BitmapGlyphs {
    fn name(&self) -> &str {
        "bitmap-5x7"
    }

    fn text_width(&self, text: &str, size: f32) -> u32 {
        let count = text.chars().count() as u32;
        if count == 0 {
            return 0;
        }
        let block = Self::block(size);
        count * (GLYPH_COLS + 1) * block - block
    }

    fn draw_text(&self, image: &mut RgbImage, x: i32, y: i32, size: f32, text: &str, color: Rgb<u8>) {
        let block = Self::block(size);
        let advance = ((GLYPH_COLS + 1) * block) as i32;
        for (index, ch) in text.chars().enumerate() {
            let origin_x = x + index as i32 * advance;
            let rows = glyph_rows(ch);
            for (row, bits) in rows.iter().enumerate() {
                for col in 0..GLYPH_COLS {
                    if bits & (1 << (GLYPH_COLS - 1 - col)) == 0 {
                        continue;
                    }
                    let px = origin_x + (col * block) as i32;
                    let py = y + (row as u32 * block) as i32;
                    draw_filled_rect_mut(image, Rect::at(px, py).of_size(block, block), color);
                }
            }
        }
    }
}

fn glyph_rows(ch: char) -> [u8; GLYPH_ROWS] {
    match ch.to_ascii_uppercase() {
        'A' => [0b01110, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001],
        'B' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10001, 0b10001, 0b11110],
        'C' => [0b01110, 0b10001, 0b10000, 0b10000, 0b10000, 0b10001, 0b01110],
        'D' => [0b11110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b11110],
        'E' => [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b11111],
        'F' => [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b10000],
        'G' => [0b01110, 0b10001, 0b10000, 0b10111, 0b10001, 0b10001, 0b01111],
        'H' => [0b10001, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001],
        'I' => [0b01110, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
        'J' => [0b00111, 0b00010, 0b00010, 0b00010, 0b00010, 0b10010, 0b01100],
        'K' => [0b10001, 0b10010, 0b10100, 0b11000, 0b10100, 0b10010, 0b10001],
        'L' => [0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b11111],
        'M' => [0b10001, 0b11011, 0b10101, 0b10101, 0b10001, 0b10001, 0b10001],
        'N' => [0b10001, 0b10001, 0b11001, 0b10101, 0b10011, 0b10001, 0b10001],
        'O' => [0b01110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110],
        'P' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10000, 0b10000, 0b10000],
        'Q' => [0b01110, 0b10001, 0b10001, 0b10001, 0b10101, 0b10010, 0b01101],
        'R' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10100, 0b10010, 0b10001],
        'S' => [0b01111, 0b10000, 0b10000, 0b01110, 0b00001, 0b00001, 0b11110],
        'T' => [0b11111, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100],
        'U' => [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110],
        'V' => [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01010, 0b00100],
        'W' => [0b10001, 0b10001, 0b10001, 0b10101, 0b10101, 0b10101, 0b01010],
        'X' => [0b10001, 0b10001, 0b01010, 0b00100, 0b01010, 0b10001, 0b10001],
        'Y' => [0b10001, 0b10001, 0b10001, 0b01010, 0b00100, 0b00100, 0b00100],
        'Z' => [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b10000, 0b11111],
        '0' => [0b01110, 0b10001, 0b10011, 0b10101, 0b11001, 0b10001, 0b01110],
        '1' => [0b00100, 0b01100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
        '2' => [0b01110, 0b10001, 0b00001, 0b00010, 0b00100, 0b01000, 0b11111],
        '3' => [0b11111, 0b00010, 0b00100, 0b00010, 0b00001, 0b10001, 0b01110],
        '4' => [0b00010, 0b00110, 0b01010, 0b10010, 0b11111, 0b00010, 0b00010],
        '5' => [0b11111, 0b10000, 0b11110, 0b00001, 0b00001, 0b10001, 0b01110],
        '6' => [0b00110, 0b01000, 0b10000, 0b11110, 0b10001, 0b10001, 0b01110],
        '7' => [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b01000, 0b01000],
        '8' => [0b01110, 0b10001, 0b10001, 0b01110, 0b10001, 0b10001, 0b01110],
        '9' => [0b01110, 0b10001, 0b10001, 0b01111, 0b00001, 0b00010, 0b01100],
        '-' => [0b00000, 0b00000, 0b00000, 0b11111, 0b00000, 0b00000, 0b00000],
        '.' => [0b00000, 0b00000, 0b00000, 0b00000, 0b00000, 0b01100, 0b01100],
        ' ' => [0; GLYPH_ROWS],
        _ => [0b01110, 0b10001, 0b00001, 0b00010, 0b00100, 0b00000, 0b00100],
    }
}
