// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Page archetype registry. Each archetype renders one page (or two-page
// spread) and produces its ground-truth record and manifest entry. The order
// of `Archetype::ALL` is part of the corpus format: every builder consumes
// the shared RNG, so reordering changes every later page.

mod decorated;
mod distorted;
mod plain;
mod spread;

use corpus_core::error::Result;
use corpus_core::{
    BaselineGrid, CorpusRng, Gutter, GutterSide, ManifestEntry, Ornament, PageSize, PxRect,
    TruthPage,
};
use corpus_render::GlyphRenderer;
use image::RgbImage;
use tracing::{debug, instrument};

/// Review reasons shared by most printed pages.
const SHADING: &[&str] = &["low-shading-confidence"];
const SHADING_SKEW: &[&str] = &["low-shading-confidence", "residual-skew-*"];
const BLANK: &[&str] = &["low-skew-confidence", "low-shading-confidence", "residual-skew-*"];
const PLATE: &[&str] = &["low-skew-confidence", "low-shading-confidence"];
const SPREAD: &[&str] = &[
    "low-shading-confidence",
    "residual-skew-*",
    "spread-split-low-confidence",
];

/// One rendered page with its annotations.
#[derive(Debug, Clone)]
pub struct BuiltPage {
    pub image: RgbImage,
    pub truth: TruthPage,
    pub entry: ManifestEntry,
    /// Non-fatal problems met while building (e.g. a gutter that missed its
    /// calibration band).
    pub warnings: Vec<String>,
}

/// The closed set of page archetypes in the corpus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Archetype {
    CleanSingle,
    CleanDouble,
    RunningHeadFolio,
    Ornament,
    FootnotesMarginalia,
    BlankVerso,
    Plate,
    ShadowLeft,
    ShadowRight,
    SpreadDarkGutter,
    CurvedWarp,
    RotationPerspective,
    RotationOnly,
    SpreadLightGutter,
    CropAdjustment,
    OverlayElements,
}

impl Archetype {
    /// Generation order.
    pub const ALL: [Archetype; 16] = [
        Self::CleanSingle,
        Self::CleanDouble,
        Self::RunningHeadFolio,
        Self::Ornament,
        Self::FootnotesMarginalia,
        Self::BlankVerso,
        Self::Plate,
        Self::ShadowLeft,
        Self::ShadowRight,
        Self::SpreadDarkGutter,
        Self::CurvedWarp,
        Self::RotationPerspective,
        Self::RotationOnly,
        Self::SpreadLightGutter,
        Self::CropAdjustment,
        Self::OverlayElements,
    ];

    pub fn page_id(self) -> &'static str {
        match self {
            Self::CleanSingle => "p01_clean_single",
            Self::CleanDouble => "p02_clean_double",
            Self::RunningHeadFolio => "p03_running_head_folio",
            Self::Ornament => "p04_ornament",
            Self::FootnotesMarginalia => "p05_footnotes_marginalia",
            Self::BlankVerso => "p06_blank_verso",
            Self::Plate => "p07_plate",
            Self::ShadowLeft => "p08_shadow_left",
            Self::ShadowRight => "p09_shadow_right",
            Self::SpreadDarkGutter => "p10_spread_dark_gutter",
            Self::CurvedWarp => "p11_curved_warp",
            Self::RotationPerspective => "p12_rot_perspective",
            Self::RotationOnly => "p13_rotation_only",
            Self::SpreadLightGutter => "p14_spread_light_gutter",
            Self::CropAdjustment => "p15_crop_adjustment",
            Self::OverlayElements => "p16_overlay_elements",
        }
    }

    /// Whether this archetype renders a two-page spread.
    pub fn is_spread(self) -> bool {
        matches!(self, Self::SpreadDarkGutter | Self::SpreadLightGutter)
    }

    /// Render the page, advancing `rng` by exactly the draws this archetype
    /// needs. `size` is the single-page size; spreads render at twice its
    /// width.
    #[instrument(skip(self, rng, glyphs), fields(page = self.page_id()))]
    pub fn build(
        self,
        rng: &mut CorpusRng,
        size: PageSize,
        glyphs: &dyn GlyphRenderer,
    ) -> Result<BuiltPage> {
        let id = self.page_id();
        let page = match self {
            Self::CleanSingle => plain::clean_single(id, rng, size),
            Self::CleanDouble => plain::clean_double(id, rng, size),
            Self::RunningHeadFolio => decorated::running_head_folio(id, rng, size, glyphs),
            Self::Ornament => decorated::ornament(id, rng, size),
            Self::FootnotesMarginalia => plain::footnotes_marginalia(id, rng, size),
            Self::BlankVerso => plain::blank_verso(id, rng, size),
            Self::Plate => plain::plate(id, rng, size),
            Self::ShadowLeft => distorted::shadow(id, rng, size, GutterSide::Left, 21.16),
            Self::ShadowRight => distorted::shadow(id, rng, size, GutterSide::Right, 25.58),
            Self::SpreadDarkGutter => spread::dark_gutter(id, rng, size),
            Self::CurvedWarp => distorted::curved_warp(id, rng, size),
            Self::RotationPerspective => distorted::rotation_perspective(id, rng, size),
            Self::RotationOnly => distorted::rotation_only(id, rng, size),
            Self::SpreadLightGutter => spread::light_gutter(id, rng, size),
            Self::CropAdjustment => distorted::crop_adjustment(id, rng, size),
            Self::OverlayElements => decorated::overlay_elements(id, rng, size, glyphs),
        }?;
        debug!(
            width = page.image.width(),
            height = page.image.height(),
            "Page built"
        );
        Ok(page)
    }
}

impl std::fmt::Display for Archetype {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.page_id())
    }
}

/// Annotation fields a builder decides; the rest derive from the image and
/// the manifest entry.
struct TruthSpec {
    content: PxRect,
    gutter: Gutter,
    baseline: BaselineGrid,
    ornaments: Vec<Ornament>,
    reasons: &'static [&'static str],
}

impl TruthSpec {
    /// Single page, no gutter, no ornaments.
    fn page(content: PxRect, baseline: BaselineGrid, reasons: &'static [&'static str]) -> Self {
        Self {
            content,
            gutter: Gutter::none(),
            baseline,
            ornaments: Vec::new(),
            reasons,
        }
    }
}

/// Pair a finished image with its validated records.
fn finish(image: RgbImage, entry: ManifestEntry, spec: TruthSpec) -> Result<BuiltPage> {
    let truth = TruthPage {
        page_id: entry.id.clone(),
        page_bounds_px: PxRect::image_bounds(image.width(), image.height()),
        content_box_px: spec.content,
        gutter: spec.gutter,
        baseline_grid: spec.baseline,
        ornaments: spec.ornaments,
        should_split: spec.gutter.side == GutterSide::Center,
        expected_review_reasons: spec.reasons.iter().map(|r| (*r).to_owned()).collect(),
    }
    .validated()?;
    Ok(BuiltPage {
        image,
        truth,
        entry,
        warnings: Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use corpus_render::{BitmapGlyphs, GutterCalibration, spread_confidence};
    use std::collections::HashSet;

    /// Smallest page the layouts are validated against; keeps tests quick.
    fn small() -> PageSize {
        PageSize::new(800, 1200)
    }

    #[test]
    fn registry_is_ordered_and_unique() {
        let ids: Vec<&str> = Archetype::ALL.iter().map(|a| a.page_id()).collect();
        let unique: HashSet<&str> = ids.iter().copied().collect();
        assert_eq!(unique.len(), 16);
        for (index, id) in ids.iter().enumerate() {
            assert!(id.starts_with(&format!("p{:02}_", index + 1)), "{id}");
        }
    }

    #[test]
    fn every_archetype_builds_consistent_records() {
        let mut rng = CorpusRng::new(1337);
        for archetype in Archetype::ALL {
            let page = archetype.build(&mut rng, small(), &BitmapGlyphs).unwrap();
            let (w, h) = page.image.dimensions();
            let expected_w = if archetype.is_spread() { 1600 } else { 800 };
            assert_eq!((w, h), (expected_w, 1200), "{archetype}");

            assert_eq!(page.truth.page_id, archetype.page_id());
            assert_eq!(page.entry.id, archetype.page_id());
            assert_eq!(page.entry.truth_file, format!("{}.json", archetype.page_id()));
            assert_eq!(page.truth.page_bounds_px, PxRect::image_bounds(w, h));
            assert!(page.truth.page_bounds_px.contains(&page.truth.content_box_px));
            assert_eq!(page.truth.should_split, archetype.is_spread());
            assert!(!page.truth.expected_review_reasons.is_empty());
            assert!(page.truth.validate().is_ok());
        }
    }

    #[test]
    fn builds_are_deterministic_per_seed() {
        let a = Archetype::CleanSingle
            .build(&mut CorpusRng::new(7), small(), &BitmapGlyphs)
            .unwrap();
        let b = Archetype::CleanSingle
            .build(&mut CorpusRng::new(7), small(), &BitmapGlyphs)
            .unwrap();
        let c = Archetype::CleanSingle
            .build(&mut CorpusRng::new(8), small(), &BitmapGlyphs)
            .unwrap();
        assert_eq!(a.image, b.image);
        assert_eq!(a.truth, b.truth);
        assert_ne!(a.image, c.image);
    }

    #[test]
    fn clean_single_matches_reference_record() {
        let page = Archetype::CleanSingle
            .build(&mut CorpusRng::new(1337), PageSize::default(), &BitmapGlyphs)
            .unwrap();
        assert_eq!(page.truth.page_bounds_px, PxRect::new(0, 0, 2174, 3074));
        assert_eq!(page.truth.content_box_px, PxRect::new(140, 180, 2035, 2935));
        assert_eq!(page.truth.gutter, Gutter::none());
        assert_eq!(page.truth.baseline_grid, BaselineGrid::spacing(20.08));
        assert!(!page.truth.should_split);
        assert_eq!(page.truth.expected_review_reasons, vec!["low-shading-confidence"]);
        assert_eq!(page.entry.description, "clean single column");
        assert_eq!(page.entry.tags, vec!["clean", "single-column"]);
        assert_eq!(page.entry.ssim_threshold, 0.99);
        assert!(page.entry.ornament_hash.is_none());
    }

    #[test]
    fn ornament_hash_is_shared_by_truth_and_manifest() {
        let page = Archetype::Ornament
            .build(&mut CorpusRng::new(1337), small(), &BitmapGlyphs)
            .unwrap();
        assert_eq!(page.truth.ornaments.len(), 1);
        let ornament = &page.truth.ornaments[0];
        assert_eq!(ornament.bbox, PxRect::new(340, 200, 460, 320));
        assert_eq!(page.entry.ornament_hash.as_deref(), Some(ornament.hash.as_str()));
        assert_eq!(ornament.hash.len(), 16);
    }

    #[test]
    fn shadow_pages_record_their_side() {
        let mut rng = CorpusRng::new(3);
        let left = Archetype::ShadowLeft.build(&mut rng, small(), &BitmapGlyphs).unwrap();
        let right = Archetype::ShadowRight.build(&mut rng, small(), &BitmapGlyphs).unwrap();
        assert_eq!(left.truth.gutter, Gutter { side: GutterSide::Left, width_px: 140 });
        assert_eq!(right.truth.gutter, Gutter { side: GutterSide::Right, width_px: 140 });
        assert_eq!(left.entry.description, "left gutter shadow");
        assert_eq!(right.entry.tags, vec!["shadow", "gutter-right"]);
        assert_eq!(left.entry.ssim_threshold, 0.985);
    }

    #[test]
    fn blank_and_plate_pages_have_no_baseline() {
        let mut rng = CorpusRng::new(5);
        for archetype in [Archetype::BlankVerso, Archetype::Plate] {
            let page = archetype.build(&mut rng, small(), &BitmapGlyphs).unwrap();
            assert_eq!(page.truth.baseline_grid, BaselineGrid::absent());
            let json = serde_json::to_value(&page.truth).unwrap();
            assert_eq!(json["baselineGrid"], serde_json::json!({}));
        }
    }

    #[test]
    fn spreads_split_on_a_centre_gutter() {
        let mut rng = CorpusRng::new(11);
        let dark = Archetype::SpreadDarkGutter.build(&mut rng, small(), &BitmapGlyphs).unwrap();
        let light = Archetype::SpreadLightGutter.build(&mut rng, small(), &BitmapGlyphs).unwrap();
        assert_eq!(dark.truth.gutter, Gutter { side: GutterSide::Center, width_px: 220 });
        assert_eq!(light.truth.gutter, Gutter { side: GutterSide::Center, width_px: 160 });
        assert_eq!(dark.truth.content_box_px, PxRect::new(140, 140, 1460, 1060));
        assert!(
            dark.truth
                .expected_review_reasons
                .contains(&"spread-split-low-confidence".to_owned())
        );
        assert_eq!(light.entry.tags, vec!["spread", "gutter", "split"]);
    }

    #[test]
    fn overlay_page_lists_no_ornaments() {
        let page = Archetype::OverlayElements
            .build(&mut CorpusRng::new(1), small(), &BitmapGlyphs)
            .unwrap();
        assert!(page.truth.ornaments.is_empty());
        assert!(page.entry.tags.contains(&"drop-cap".to_owned()));
        assert_eq!(page.truth.content_box_px, PxRect::new(50, 180, 660, 1060));
    }

    #[test]
    fn crop_page_truth_is_the_trim_box() {
        let page = Archetype::CropAdjustment
            .build(&mut CorpusRng::new(2), small(), &BitmapGlyphs)
            .unwrap();
        assert_eq!(page.truth.content_box_px, PxRect::new(70, 110, 720, 1120));
    }

    #[test]
    fn calibrated_spreads_land_in_their_band() {
        let size = PageSize::default();
        let cases = [
            (Archetype::SpreadDarkGutter, GutterCalibration::dark(size.width)),
            (Archetype::SpreadLightGutter, GutterCalibration::light(size.width)),
        ];
        for (archetype, calibration) in cases {
            let page = archetype.build(&mut CorpusRng::new(1337), size, &BitmapGlyphs).unwrap();
            let confidence = spread_confidence(&page.image);
            if page.warnings.is_empty() {
                assert!(calibration.target.contains(&confidence), "{archetype}: {confidence}");
            } else {
                assert!(!calibration.target.contains(&confidence), "{archetype}: {confidence}");
                assert!(page.warnings[0].contains("gutter confidence"));
            }
        }
    }
}
