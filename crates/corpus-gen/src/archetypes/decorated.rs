// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Pages carrying non-text elements: running head and folio, a hashed
// ornament, and the overlay showcase that stacks every element class.

use corpus_core::error::Result;
use corpus_core::{BaselineGrid, CorpusRng, ManifestEntry, Ornament, PageSize, PxRect};
use corpus_render::layout::{
    MARGIN, TEXT_COLOR, add_text_block, draw_drop_cap, draw_folio, draw_ornament,
    draw_running_head, draw_title_block,
};
use corpus_render::{
    Axis, BACKGROUND, Distorter, GlyphRenderer, add_paper_texture, new_canvas, ornament_hash,
};
use tracing::debug;

use super::{BuiltPage, SHADING_SKEW, TruthSpec, finish};

const RUNNING_HEAD_TOP: i32 = 50;
const FOLIO_FROM_BOTTOM: i32 = 80;

pub(super) fn running_head_folio(
    id: &str,
    rng: &mut CorpusRng,
    size: PageSize,
    glyphs: &dyn GlyphRenderer,
) -> Result<BuiltPage> {
    let (w, h) = (size.width as i32, size.height as i32);
    let mut page = new_canvas(size.width, size.height, BACKGROUND);
    add_paper_texture(&mut page, rng, 1.8);

    draw_running_head(&mut page, glyphs, RUNNING_HEAD_TOP);
    draw_folio(&mut page, glyphs, h - FOLIO_FROM_BOTTOM, "12");
    let content = PxRect::new(MARGIN, MARGIN + 140, w - MARGIN, h - MARGIN - 120);
    add_text_block(&mut page, content, 40, rng, TEXT_COLOR);

    let page = Distorter::new(page)
        .linear_illumination(Axis::X, 1.0, 0.93)
        .vignette(0.92)
        .into_image();

    let entry = ManifestEntry::new(
        id,
        "running head and folio bands",
        &["running-head", "folio"],
        0.99,
    )?;
    finish(page, entry, TruthSpec::page(content, BaselineGrid::spacing(18.71), SHADING_SKEW))
}

pub(super) fn ornament(id: &str, rng: &mut CorpusRng, size: PageSize) -> Result<BuiltPage> {
    let (w, h) = (size.width as i32, size.height as i32);
    let mut page = new_canvas(size.width, size.height, BACKGROUND);
    add_paper_texture(&mut page, rng, 1.5);

    let ornament_box = draw_ornament(&mut page, (w / 2, MARGIN + 120), 120);
    let content = PxRect::new(MARGIN, MARGIN + 220, w - MARGIN, h - MARGIN);
    add_text_block(&mut page, content, 40, rng, TEXT_COLOR);

    // Hash the finished page so the fingerprint matches what a reader crops.
    let hash = ornament_hash(&page, ornament_box)?;
    debug!(%hash, "Ornament hashed");

    let entry = ManifestEntry::new(id, "ornament page", &["ornament"], 0.99)?.with_ornament_hash(hash.clone());
    let spec = TruthSpec {
        ornaments: vec![Ornament {
            bbox: ornament_box,
            hash,
        }],
        ..TruthSpec::page(content, BaselineGrid::spacing(16.85), SHADING_SKEW)
    };
    finish(page, entry, spec)
}

pub(super) fn overlay_elements(
    id: &str,
    rng: &mut CorpusRng,
    size: PageSize,
    glyphs: &dyn GlyphRenderer,
) -> Result<BuiltPage> {
    let (w, h) = (size.width as i32, size.height as i32);
    let mut page = new_canvas(size.width, size.height, BACKGROUND);
    add_paper_texture(&mut page, rng, 1.6);

    draw_running_head(&mut page, glyphs, RUNNING_HEAD_TOP);
    draw_folio(&mut page, glyphs, h - FOLIO_FROM_BOTTOM, "247");
    // Mostly covered by the title band below; not listed in the truth record.
    draw_ornament(&mut page, (w / 2, MARGIN + 140), 110);
    draw_title_block(&mut page, PxRect::new(MARGIN + 120, MARGIN + 40, w - MARGIN - 120, MARGIN + 120));
    draw_drop_cap(&mut page, PxRect::new(MARGIN + 30, MARGIN + 200, MARGIN + 120, MARGIN + 320));

    let body = PxRect::new(MARGIN + 140, MARGIN + 180, w - MARGIN, h - MARGIN - 200);
    add_text_block(&mut page, body, 36, rng, TEXT_COLOR);
    let footnotes = PxRect::new(MARGIN + 120, h - MARGIN - 170, w - MARGIN, h - MARGIN);
    add_text_block(&mut page, footnotes, 26, rng, TEXT_COLOR);
    let marginalia = PxRect::new(MARGIN - 90, MARGIN + 260, MARGIN + 20, h - MARGIN - 320);
    add_text_block(&mut page, marginalia, 28, rng, TEXT_COLOR);

    let content = PxRect::new(MARGIN - 90, MARGIN + 40, w - MARGIN, h - MARGIN);
    let entry = ManifestEntry::new(
        id,
        "overlay element class showcase",
        &["overlay", "elements", "title", "drop-cap", "marginalia", "footnotes", "ornament"],
        0.985,
    )?;
    finish(page, entry, TruthSpec::page(content, BaselineGrid::spacing(23.02), SHADING_SKEW))
}
