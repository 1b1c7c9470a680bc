// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Single pages with a photometric or geometric distortion applied after the
// text is laid out. Truth boxes are always the undistorted layout.

use corpus_core::error::Result;
use corpus_core::{BaselineGrid, CorpusRng, Gutter, GutterSide, ManifestEntry, PageSize, PxRect};
use corpus_render::layout::{MARGIN, TEXT_COLOR, add_text_block, draw_trim_box};
use corpus_render::{Axis, BACKGROUND, Distorter, add_paper_texture, new_canvas};
use image::RgbImage;

use super::{BuiltPage, SHADING_SKEW, TruthSpec, finish};

const SHADOW_WIDTH: u32 = 140;
const SHADOW_MIN_FACTOR: f32 = 0.55;

/// Textured page with one full-width text block of the given line height.
fn text_page(rng: &mut CorpusRng, size: PageSize, strength: f32, line_height: i32) -> (RgbImage, PxRect) {
    let (w, h) = (size.width as i32, size.height as i32);
    let mut page = new_canvas(size.width, size.height, BACKGROUND);
    add_paper_texture(&mut page, rng, strength);
    let content = PxRect::new(MARGIN, MARGIN + 40, w - MARGIN, h - MARGIN);
    add_text_block(&mut page, content, line_height, rng, TEXT_COLOR);
    (page, content)
}

pub(super) fn shadow(
    id: &str,
    rng: &mut CorpusRng,
    size: PageSize,
    side: GutterSide,
    baseline_spacing: f64,
) -> Result<BuiltPage> {
    let (page, content) = text_page(rng, size, 1.6, 40);
    let page = Distorter::new(page)
        .shadow_gradient(side, SHADOW_WIDTH, SHADOW_MIN_FACTOR)
        .linear_illumination(Axis::X, 0.95, 1.0)
        .into_image();

    let description = format!("{side} gutter shadow");
    let side_tag = format!("gutter-{side}");
    let entry = ManifestEntry::new(id, description, &["shadow", &side_tag], 0.985)?;
    let spec = TruthSpec {
        gutter: Gutter::new(side, SHADOW_WIDTH)?,
        ..TruthSpec::page(content, BaselineGrid::spacing(baseline_spacing), SHADING_SKEW)
    };
    finish(page, entry, spec)
}

pub(super) fn curved_warp(id: &str, rng: &mut CorpusRng, size: PageSize) -> Result<BuiltPage> {
    let (page, content) = text_page(rng, size, 1.5, 44);
    let page = Distorter::new(page).curved_warp(20.0).into_image();

    let entry = ManifestEntry::new(id, "curved warp baseline", &["warp", "baseline"], 0.985)?;
    finish(page, entry, TruthSpec::page(content, BaselineGrid::spacing(34.85), SHADING_SKEW))
}

pub(super) fn rotation_perspective(id: &str, rng: &mut CorpusRng, size: PageSize) -> Result<BuiltPage> {
    let (page, content) = text_page(rng, size, 1.5, 40);
    let page = Distorter::new(page).rotate_perspective(3.5).into_image();

    let entry = ManifestEntry::new(id, "rotation + perspective warp", &["warp", "perspective"], 0.985)?;
    finish(page, entry, TruthSpec::page(content, BaselineGrid::spacing(23.86), SHADING_SKEW))
}

pub(super) fn rotation_only(id: &str, rng: &mut CorpusRng, size: PageSize) -> Result<BuiltPage> {
    let (page, content) = text_page(rng, size, 1.6, 40);
    let page = Distorter::new(page).rotate(-2.8).into_image();

    let entry = ManifestEntry::new(id, "rotation only", &["rotation", "skew"], 0.985)?;
    finish(page, entry, TruthSpec::page(content, BaselineGrid::spacing(24.11), SHADING_SKEW))
}

/// Text that overruns the margins inside a heavy trim outline; the trim box
/// is the truth.
pub(super) fn crop_adjustment(id: &str, rng: &mut CorpusRng, size: PageSize) -> Result<BuiltPage> {
    let (w, h) = (size.width as i32, size.height as i32);
    let mut page = new_canvas(size.width, size.height, BACKGROUND);
    add_paper_texture(&mut page, rng, 1.9);

    let text = PxRect::new(MARGIN - 40, MARGIN + 10, w - MARGIN + 30, h - MARGIN + 10);
    add_text_block(&mut page, text, 38, rng, TEXT_COLOR);
    let trim = PxRect::new(MARGIN - 70, MARGIN - 30, w - MARGIN + 60, h - MARGIN + 60);
    draw_trim_box(&mut page, trim);

    let page = Distorter::new(page)
        .linear_illumination(Axis::Y, 1.02, 0.92)
        .into_image();

    let entry = ManifestEntry::new(id, "crop adjustment stress", &["crop", "adjustment"], 0.985)?;
    finish(page, entry, TruthSpec::page(trim, BaselineGrid::spacing(27.35), SHADING_SKEW))
}
