// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Undistorted single pages: clean columns, footnotes with marginalia, the
// blank verso and the illustration plate.

use corpus_core::error::Result;
use corpus_core::{BaselineGrid, CorpusRng, ManifestEntry, PageSize, PxRect};
use corpus_render::layout::{MARGIN, TEXT_COLOR, add_text_block, draw_plate};
use corpus_render::{BACKGROUND, BLANK_BACKGROUND, add_paper_texture, new_canvas};

use super::{BLANK, BuiltPage, PLATE, SHADING, SHADING_SKEW, TruthSpec, finish};

const COLUMN_GAP: i32 = 80;

pub(super) fn clean_single(id: &str, rng: &mut CorpusRng, size: PageSize) -> Result<BuiltPage> {
    let (w, h) = (size.width as i32, size.height as i32);
    let mut page = new_canvas(size.width, size.height, BACKGROUND);
    add_paper_texture(&mut page, rng, 1.5);

    let content = PxRect::new(MARGIN, MARGIN + 40, w - MARGIN, h - MARGIN);
    add_text_block(&mut page, content, 40, rng, TEXT_COLOR);

    let entry = ManifestEntry::new(id, "clean single column", &["clean", "single-column"], 0.99)?;
    finish(page, entry, TruthSpec::page(content, BaselineGrid::spacing(20.08), SHADING))
}

pub(super) fn clean_double(id: &str, rng: &mut CorpusRng, size: PageSize) -> Result<BuiltPage> {
    let (w, h) = (size.width as i32, size.height as i32);
    let mut page = new_canvas(size.width, size.height, BACKGROUND);
    add_paper_texture(&mut page, rng, 1.5);

    let column_width = (w - 2 * MARGIN - COLUMN_GAP) / 2;
    let left = PxRect::new(MARGIN, MARGIN + 40, MARGIN + column_width, h - MARGIN);
    let right = PxRect::new(MARGIN + column_width + COLUMN_GAP, MARGIN + 40, w - MARGIN, h - MARGIN);
    add_text_block(&mut page, left, 40, rng, TEXT_COLOR);
    add_text_block(&mut page, right, 40, rng, TEXT_COLOR);

    let content = PxRect::new(MARGIN, MARGIN + 40, w - MARGIN, h - MARGIN);
    let entry = ManifestEntry::new(id, "clean two column", &["clean", "double-column"], 0.99)?;
    finish(page, entry, TruthSpec::page(content, BaselineGrid::spacing(28.67), SHADING_SKEW))
}

pub(super) fn footnotes_marginalia(id: &str, rng: &mut CorpusRng, size: PageSize) -> Result<BuiltPage> {
    let (w, h) = (size.width as i32, size.height as i32);
    let mut page = new_canvas(size.width, size.height, BACKGROUND);
    add_paper_texture(&mut page, rng, 1.7);

    let body = PxRect::new(MARGIN + 80, MARGIN + 40, w - MARGIN, h - MARGIN - 220);
    add_text_block(&mut page, body, 38, rng, TEXT_COLOR);
    let footnotes = PxRect::new(MARGIN + 80, h - MARGIN - 180, w - MARGIN, h - MARGIN);
    add_text_block(&mut page, footnotes, 28, rng, TEXT_COLOR);
    // Marginalia hang into the left margin.
    let marginalia = PxRect::new(MARGIN - 90, MARGIN + 200, MARGIN + 40, h - MARGIN - 300);
    add_text_block(&mut page, marginalia, 30, rng, TEXT_COLOR);

    let content = PxRect::new(MARGIN - 90, MARGIN + 40, w - MARGIN, h - MARGIN);
    let entry = ManifestEntry::new(id, "footnotes and marginalia", &["footnotes", "marginalia"], 0.99)?;
    finish(page, entry, TruthSpec::page(content, BaselineGrid::spacing(25.76), SHADING_SKEW))
}

pub(super) fn blank_verso(id: &str, rng: &mut CorpusRng, size: PageSize) -> Result<BuiltPage> {
    let (w, h) = (size.width as i32, size.height as i32);
    let mut page = new_canvas(size.width, size.height, BLANK_BACKGROUND);
    add_paper_texture(&mut page, rng, 1.0);

    let content = PxRect::new(MARGIN, MARGIN, w - MARGIN, h - MARGIN);
    let entry = ManifestEntry::new(id, "blank verso", &["blank"], 0.99)?;
    finish(page, entry, TruthSpec::page(content, BaselineGrid::absent(), BLANK))
}

pub(super) fn plate(id: &str, rng: &mut CorpusRng, size: PageSize) -> Result<BuiltPage> {
    let (w, h) = (size.width as i32, size.height as i32);
    let mut page = new_canvas(size.width, size.height, BACKGROUND);
    add_paper_texture(&mut page, rng, 1.3);

    let plate_box = PxRect::new(MARGIN + 100, MARGIN + 200, w - MARGIN - 100, h - MARGIN - 300);
    draw_plate(&mut page, plate_box);

    let entry = ManifestEntry::new(id, "illustration plate", &["illustration", "plate"], 0.99)?;
    finish(page, entry, TruthSpec::page(plate_box, BaselineGrid::absent(), PLATE))
}
