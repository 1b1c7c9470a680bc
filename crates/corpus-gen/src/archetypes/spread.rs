// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Two-page spreads with a synthetic gutter tuned so the spread confidence
// heuristic lands in a chosen band.

use corpus_core::error::Result;
use corpus_core::{BaselineGrid, CorpusRng, Gutter, GutterSide, ManifestEntry, PageSize, PxRect};
use corpus_render::layout::{MARGIN, TEXT_COLOR, add_text_block};
use corpus_render::{BACKGROUND, GutterCalibration, add_paper_texture, calibrate_gutter, new_canvas};
use tracing::warn;

use super::{BuiltPage, SPREAD, TruthSpec, finish};

struct SpreadStyle {
    texture: f32,
    calibration: GutterCalibration,
    baseline: f64,
    description: &'static str,
    tags: &'static [&'static str],
    ssim: f64,
}

pub(super) fn dark_gutter(id: &str, rng: &mut CorpusRng, size: PageSize) -> Result<BuiltPage> {
    let style = SpreadStyle {
        texture: 1.4,
        calibration: GutterCalibration::dark(size.width),
        baseline: 22.83,
        description: "two-page spread with dark gutter",
        tags: &["spread", "gutter"],
        ssim: 0.985,
    };
    build(id, rng, size, style)
}

pub(super) fn light_gutter(id: &str, rng: &mut CorpusRng, size: PageSize) -> Result<BuiltPage> {
    let style = SpreadStyle {
        texture: 1.5,
        calibration: GutterCalibration::light(size.width),
        baseline: 21.44,
        description: "two-page spread with light gutter",
        tags: &["spread", "gutter", "split"],
        ssim: 0.98,
    };
    build(id, rng, size, style)
}

fn build(id: &str, rng: &mut CorpusRng, size: PageSize, style: SpreadStyle) -> Result<BuiltPage> {
    let spread = size.spread();
    let leaf = size.width as i32;
    let (w, h) = (spread.width as i32, spread.height as i32);
    let gutter_width = style.calibration.width();
    let half_gutter = gutter_width as i32 / 2;

    let mut page = new_canvas(spread.width, spread.height, BACKGROUND);
    add_paper_texture(&mut page, rng, style.texture);
    let left = PxRect::new(MARGIN, MARGIN + 40, leaf - MARGIN - half_gutter, h - MARGIN);
    let right = PxRect::new(leaf + half_gutter + MARGIN, MARGIN + 40, w - MARGIN, h - MARGIN);
    add_text_block(&mut page, left, 40, rng, TEXT_COLOR);
    add_text_block(&mut page, right, 40, rng, TEXT_COLOR);

    let outcome = calibrate_gutter(page, &style.calibration);
    let mut warnings = Vec::new();
    if !outcome.converged {
        let message = format!(
            "{id}: gutter confidence {:.3} outside [{}, {}) after {} attempts",
            outcome.confidence, style.calibration.target.start, style.calibration.target.end, outcome.attempts
        );
        warn!(page = id, confidence = outcome.confidence, "Spread gutter not calibrated");
        warnings.push(message);
    }

    let content = PxRect::new(MARGIN, MARGIN, w - MARGIN, h - MARGIN);
    let entry = ManifestEntry::new(id, style.description, style.tags, style.ssim)?;
    let spec = TruthSpec {
        gutter: Gutter::new(GutterSide::Center, gutter_width)?,
        ..TruthSpec::page(content, BaselineGrid::spacing(style.baseline), SPREAD)
    };
    let mut built = finish(outcome.image, entry, spec)?;
    built.warnings = warnings;
    Ok(built)
}
