// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Layout primitives — text-line bars, running heads, folios, ornaments, title
// bands, drop caps and illustration plates. All boxes are inclusive
// `[x0, y0, x1, y1]` pixel rectangles.

use corpus_core::{CorpusRng, PxRect};
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_hollow_rect_mut};
use imageproc::rect::Rect;
use tracing::trace;

use crate::glyphs::GlyphRenderer;

/// Fixed page margin every archetype lays out against.
pub const MARGIN: i32 = 140;

pub const TEXT_COLOR: Rgb<u8> = Rgb([25, 25, 25]);
const RUNNING_HEAD_COLOR: Rgb<u8> = Rgb([40, 40, 40]);
const FOLIO_COLOR: Rgb<u8> = Rgb([50, 50, 50]);
const ORNAMENT_COLOR: Rgb<u8> = Rgb([20, 20, 20]);
const TITLE_COLOR: Rgb<u8> = Rgb([30, 30, 30]);
const DROP_CAP_COLOR: Rgb<u8> = Rgb([35, 35, 35]);
const PLATE_BORDER_COLOR: Rgb<u8> = Rgb([20, 20, 20]);
const TRIM_COLOR: Rgb<u8> = Rgb([15, 15, 15]);

pub const RUNNING_HEAD_TEXT: &str = "THE GOLDEN CORPUS";
const RUNNING_HEAD_SIZE: f32 = 32.0;
const FOLIO_SIZE: f32 = 30.0;

/// Gap between the bottom of a text bar and the next row.
const LEADING_GAP: i32 = 6;
/// Every n-th row is a short paragraph-end line.
const PARAGRAPH_PERIOD: usize = 7;

/// Fill an inclusive box. Inverted boxes draw nothing.
pub fn fill_box(image: &mut RgbImage, bbox: PxRect, color: Rgb<u8>) {
    if bbox.is_inverted() {
        return;
    }
    let rect = Rect::at(bbox.x0, bbox.y0).of_size((bbox.width() + 1) as u32, (bbox.height() + 1) as u32);
    draw_filled_rect_mut(image, rect, color);
}

/// Draw an outline `thickness` pixels wide, growing inward from the box edge.
pub fn outline_box(image: &mut RgbImage, bbox: PxRect, thickness: i32, color: Rgb<u8>) {
    for inset in 0..thickness {
        let ring = PxRect::new(bbox.x0 + inset, bbox.y0 + inset, bbox.x1 - inset, bbox.y1 - inset);
        if ring.is_inverted() {
            break;
        }
        let rect = Rect::at(ring.x0, ring.y0).of_size((ring.width() + 1) as u32, (ring.height() + 1) as u32);
        draw_hollow_rect_mut(image, rect, color);
    }
}

/// Fill `bbox` top to bottom with solid bars standing in for lines of text.
///
/// Row `i` starts at `y0 + i * line_height` and is drawn only if it fits
/// entirely above `y1`. Bar length is a fraction of the box width drawn from
/// `[0.6, 0.98)`; every seventh row (starting with the first) redraws from
/// `[0.4, 0.7)` to imitate a paragraph end. Returns the number of rows drawn.
pub fn add_text_block(
    image: &mut RgbImage,
    bbox: PxRect,
    line_height: i32,
    rng: &mut CorpusRng,
    color: Rgb<u8>,
) -> usize {
    let max_width = bbox.width() as f64;
    let mut y = bbox.y0;
    let mut row = 0usize;
    while y + line_height <= bbox.y1 {
        let mut fraction = rng.uniform(0.6, 0.98);
        if row % PARAGRAPH_PERIOD == 0 {
            fraction = rng.uniform(0.4, 0.7);
        }
        let line_len = (max_width * fraction) as i32;
        fill_box(
            image,
            PxRect::new(bbox.x0, y, bbox.x0 + line_len, y + line_height - LEADING_GAP),
            color,
        );
        y += line_height;
        row += 1;
    }
    trace!(rows = row, ?bbox, "Text block drawn");
    row
}

/// Centred running head near the top of the page.
pub fn draw_running_head(image: &mut RgbImage, glyphs: &dyn GlyphRenderer, top: i32) {
    draw_centered(image, glyphs, top, RUNNING_HEAD_SIZE, RUNNING_HEAD_TEXT, RUNNING_HEAD_COLOR);
}

/// Centred page number near the bottom of the page.
pub fn draw_folio(image: &mut RgbImage, glyphs: &dyn GlyphRenderer, bottom: i32, folio: &str) {
    draw_centered(image, glyphs, bottom, FOLIO_SIZE, folio, FOLIO_COLOR);
}

fn draw_centered(
    image: &mut RgbImage,
    glyphs: &dyn GlyphRenderer,
    y: i32,
    size: f32,
    text: &str,
    color: Rgb<u8>,
) {
    let text_width = glyphs.text_width(text, size) as i32;
    let x = (image.width() as i32 - text_width) / 2;
    glyphs.draw_text(image, x, y, size, text, color);
}

/// Crossed-circle ornament centred on `center`, `size` pixels across.
///
/// The ring is 4px wide and the cross-bars 3px. Returns the ornament's
/// bounding box `[cx - r, cy - r, cx + r, cy + r]` for hashing.
pub fn draw_ornament(image: &mut RgbImage, center: (i32, i32), size: i32) -> PxRect {
    const RING_WIDTH: i32 = 4;
    let (cx, cy) = center;
    let radius = size / 2;
    let bbox = PxRect::new(cx - radius, cy - radius, cx + radius, cy + radius);

    let outer = radius as f32 + 0.5;
    let inner = (radius - RING_WIDTH) as f32 + 0.5;
    let (w, h) = (image.width() as i32, image.height() as i32);
    for y in bbox.y0.max(0)..=bbox.y1.min(h - 1) {
        for x in bbox.x0.max(0)..=bbox.x1.min(w - 1) {
            let dx = (x - cx) as f32;
            let dy = (y - cy) as f32;
            let dist = (dx * dx + dy * dy).sqrt();
            if dist >= inner && dist < outer {
                image.put_pixel(x as u32, y as u32, ORNAMENT_COLOR);
            }
        }
    }

    fill_box(image, PxRect::new(cx - radius, cy - 1, cx + radius, cy + 1), ORNAMENT_COLOR);
    fill_box(image, PxRect::new(cx - 1, cy - radius, cx + 1, cy + radius), ORNAMENT_COLOR);
    bbox
}

/// Solid title band.
pub fn draw_title_block(image: &mut RgbImage, bbox: PxRect) {
    fill_box(image, bbox, TITLE_COLOR);
}

/// Solid drop-cap block.
pub fn draw_drop_cap(image: &mut RgbImage, bbox: PxRect) {
    fill_box(image, bbox, DROP_CAP_COLOR);
}

/// Crop-mark style trim outline used by the crop stress page.
pub fn draw_trim_box(image: &mut RgbImage, bbox: PxRect) {
    outline_box(image, bbox, 4, TRIM_COLOR);
}

/// Illustration plate: a horizontal gray gradient (200 → 240) with a 4px
/// border.
///
/// The gradient spans `x1 - x0` columns and `y1 - y0` rows starting at the
/// box origin; the border is drawn on top along the full inclusive box.
pub fn draw_plate(image: &mut RgbImage, bbox: PxRect) {
    const FROM: f32 = 200.0;
    const TO: f32 = 240.0;
    let columns = bbox.width().max(0);
    let rows = bbox.height().max(0);
    let (w, h) = (image.width() as i32, image.height() as i32);

    for dx in 0..columns {
        let t = if columns > 1 { dx as f32 / (columns - 1) as f32 } else { 0.0 };
        let level = (FROM + (TO - FROM) * t) as u8;
        let x = bbox.x0 + dx;
        if x < 0 || x >= w {
            continue;
        }
        for dy in 0..rows {
            let y = bbox.y0 + dy;
            if y < 0 || y >= h {
                continue;
            }
            image.put_pixel(x as u32, y as u32, Rgb([level, level, level]));
        }
    }
    outline_box(image, bbox, 4, PLATE_BORDER_COLOR);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::{BACKGROUND, new_canvas};
    use crate::glyphs::BitmapGlyphs;

    fn is_ink(p: &Rgb<u8>) -> bool {
        p.0 != [BACKGROUND; 3]
    }

    #[test]
    fn text_block_never_draws_partial_rows() {
        let mut img = new_canvas(400, 300, BACKGROUND);
        let bbox = PxRect::new(20, 20, 380, 200);
        let rows = add_text_block(&mut img, bbox, 40, &mut CorpusRng::new(1), TEXT_COLOR);
        // Rows start at 20, 60, 100, 140; the next (180) would end at 220 > 200.
        assert_eq!(rows, 4);
        for y in 181..300 {
            for x in 0..400 {
                assert!(!is_ink(img.get_pixel(x, y)), "ink below block at ({x},{y})");
            }
        }
    }

    #[test]
    fn text_bars_stay_within_width_fractions() {
        let mut img = new_canvas(1100, 800, BACKGROUND);
        let bbox = PxRect::new(50, 0, 1050, 799);
        let rows = add_text_block(&mut img, bbox, 40, &mut CorpusRng::new(9), TEXT_COLOR);
        assert!(rows >= 14);
        for row in 0..rows {
            let y = (row as u32) * 40 + 5;
            let ink = (0..1100).filter(|&x| is_ink(img.get_pixel(x, y))).count() as f64;
            // Bars are line_len + 1 pixels wide for fraction in the drawn range.
            let fraction = (ink - 1.0) / 1000.0;
            if row % 7 == 0 {
                assert!((0.399..0.701).contains(&fraction), "row {row}: {fraction}");
            } else {
                assert!((0.599..0.981).contains(&fraction), "row {row}: {fraction}");
            }
        }
    }

    #[test]
    fn text_block_leaves_leading_gap() {
        let mut img = new_canvas(200, 100, BACKGROUND);
        add_text_block(&mut img, PxRect::new(0, 0, 199, 99), 40, &mut CorpusRng::new(4), TEXT_COLOR);
        assert!(is_ink(img.get_pixel(0, 34)));
        assert!(!is_ink(img.get_pixel(0, 35)));
        assert!(!is_ink(img.get_pixel(0, 39)));
        assert!(is_ink(img.get_pixel(0, 40)));
    }

    #[test]
    fn ornament_returns_its_bounding_box() {
        let mut img = new_canvas(300, 300, BACKGROUND);
        let bbox = draw_ornament(&mut img, (150, 120), 120);
        assert_eq!(bbox, PxRect::new(90, 60, 210, 180));
        // Centre is on the cross, ring pixels are inked, corners are not.
        assert!(is_ink(img.get_pixel(150, 120)));
        assert!(is_ink(img.get_pixel(90, 120)));
        assert!(is_ink(img.get_pixel(150, 61)));
        assert!(!is_ink(img.get_pixel(92, 62)));
        assert!(!is_ink(img.get_pixel(120, 90)));
    }

    #[test]
    fn plate_has_gradient_and_border() {
        let mut img = new_canvas(400, 300, BACKGROUND);
        let bbox = PxRect::new(50, 50, 350, 250);
        draw_plate(&mut img, bbox);
        assert_eq!(img.get_pixel(50, 100).0, [20, 20, 20]);
        assert_eq!(img.get_pixel(350, 100).0, [20, 20, 20]);
        let left = img.get_pixel(60, 100).0[0];
        let right = img.get_pixel(340, 100).0[0];
        assert!(left >= 200 && left < right && right <= 240, "{left} {right}");
    }

    #[test]
    fn running_head_is_centred() {
        let mut img = new_canvas(600, 200, BACKGROUND);
        draw_running_head(&mut img, &BitmapGlyphs, 50);
        let inked: Vec<u32> = img
            .enumerate_pixels()
            .filter(|(_, _, p)| is_ink(p))
            .map(|(x, _, _)| x)
            .collect();
        let min = *inked.iter().min().unwrap() as i32;
        let max = *inked.iter().max().unwrap() as i32;
        assert!(((min + max) / 2 - 300).abs() <= 4, "span {min}..{max}");
    }

    #[test]
    fn fill_box_is_inclusive() {
        let mut img = new_canvas(10, 10, BACKGROUND);
        fill_box(&mut img, PxRect::new(2, 2, 4, 4), TEXT_COLOR);
        let inked = img.pixels().filter(|p| is_ink(p)).count();
        assert_eq!(inked, 9);
        fill_box(&mut img, PxRect::new(5, 5, 4, 4), TEXT_COLOR);
        assert_eq!(img.pixels().filter(|p| is_ink(p)).count(), 9);
    }
}
