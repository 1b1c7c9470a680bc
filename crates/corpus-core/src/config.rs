// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Run configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{CorpusError, Result};

/// Canonical single-page size: US Letter-ish at 300 DPI.
pub const DEFAULT_WIDTH: u32 = 2175;
pub const DEFAULT_HEIGHT: u32 = 3075;
pub const DEFAULT_DPI: u32 = 300;
pub const DEFAULT_SEED: u64 = 1337;
pub const CORPUS_VERSION: &str = "1";

/// Single-page pixel dimensions. Spread archetypes render at twice the width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageSize {
    pub width: u32,
    pub height: u32,
}

impl PageSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Size of a two-page spread built from this page size.
    pub fn spread(&self) -> Self {
        Self {
            width: self.width * 2,
            height: self.height,
        }
    }
}

impl Default for PageSize {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
        }
    }
}

/// Settings for one corpus generation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorpusConfig {
    /// Seed for the run-wide RNG.
    pub seed: u64,
    /// Corpus format version written into the manifest.
    pub version: String,
    /// Nominal scan resolution recorded in the manifest.
    pub dpi: u32,
    /// Canonical single-page size.
    pub page: PageSize,
    /// Optional TrueType font for running heads and folios.
    pub font_path: Option<PathBuf>,
}

impl CorpusConfig {
    /// Reject geometry the archetype layouts cannot fit into.
    ///
    /// Every archetype lays content out against a fixed 140px margin, so the
    /// page has to be comfortably larger than the margins plus the deepest
    /// fixed-offset band (the footnote and plate layouts).
    pub fn validate(&self) -> Result<()> {
        const MIN_WIDTH: u32 = 800;
        const MIN_HEIGHT: u32 = 1200;
        if self.page.width < MIN_WIDTH || self.page.height < MIN_HEIGHT {
            return Err(CorpusError::Config(format!(
                "page size {}x{} is below the {}x{} minimum",
                self.page.width, self.page.height, MIN_WIDTH, MIN_HEIGHT
            )));
        }
        if self.dpi == 0 {
            return Err(CorpusError::Config("dpi must be positive".into()));
        }
        if self.version.trim().is_empty() {
            return Err(CorpusError::Config("version must not be empty".into()));
        }
        Ok(())
    }
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            version: CORPUS_VERSION.to_owned(),
            dpi: DEFAULT_DPI,
            page: PageSize::default(),
            font_path: None,
        }
    }
}
