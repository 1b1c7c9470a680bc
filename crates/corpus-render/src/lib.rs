// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// corpus-render — Page synthesis for the golden corpus.
//
// Provides the paper canvas and texture synthesizer, the layout primitives
// (text bars, running heads, folios, ornaments, plates), the distortion engine
// (shadow, illumination, vignette, curved warp, rotation, perspective), the
// spread gutter confidence estimator with its calibration loop, and the
// perceptual hash used to fingerprint ornaments.

pub mod canvas;
pub mod distort;
pub mod glyphs;
pub mod layout;
pub mod phash;
pub mod spread;

// Re-export the primary entry points so callers can use `corpus_render::Distorter` etc.
pub use canvas::{BACKGROUND, BLANK_BACKGROUND, add_paper_texture, luma, new_canvas, to_luma};
pub use distort::{Axis, Distorter};
pub use glyphs::{BitmapGlyphs, GlyphRenderer, TrueTypeGlyphs, resolve_glyphs};
pub use phash::{hamming_distance, ornament_hash, perceptual_hash};
pub use spread::{
    CalibrationOutcome, GutterCalibration, GutterEstimate, calibrate_gutter, estimate_gutter,
    spread_confidence,
};
