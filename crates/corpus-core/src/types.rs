// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Ground-truth and manifest records. Every record validates on construction
// and serializes with camelCase keys; absent optional fields are omitted.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{CorpusError, Result};

/// Inclusive pixel rectangle, serialized as `[x0, y0, x1, y1]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "[i32; 4]", into = "[i32; 4]")]
pub struct PxRect {
    pub x0: i32,
    pub y0: i32,
    pub x1: i32,
    pub y1: i32,
}

impl PxRect {
    pub const fn new(x0: i32, y0: i32, x1: i32, y1: i32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Full extent of a `width` x `height` image: `[0, 0, w-1, h-1]`.
    pub fn image_bounds(width: u32, height: u32) -> Self {
        Self::new(0, 0, width as i32 - 1, height as i32 - 1)
    }

    pub fn width(&self) -> i32 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> i32 {
        self.y1 - self.y0
    }

    pub fn is_inverted(&self) -> bool {
        self.x1 < self.x0 || self.y1 < self.y0
    }

    /// True when `other` lies entirely within `self`.
    pub fn contains(&self, other: &PxRect) -> bool {
        self.x0 <= other.x0 && self.y0 <= other.y0 && other.x1 <= self.x1 && other.y1 <= self.y1
    }
}

impl From<[i32; 4]> for PxRect {
    fn from(v: [i32; 4]) -> Self {
        Self::new(v[0], v[1], v[2], v[3])
    }
}

impl From<PxRect> for [i32; 4] {
    fn from(r: PxRect) -> Self {
        [r.x0, r.y0, r.x1, r.y1]
    }
}

/// Where the bound edge of a page sits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GutterSide {
    None,
    Left,
    Right,
    Center,
}

impl GutterSide {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Left => "left",
            Self::Right => "right",
            Self::Center => "center",
        }
    }
}

impl std::fmt::Display for GutterSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Gutter annotation. `width_px == 0` exactly when `side == None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Gutter {
    pub side: GutterSide,
    pub width_px: u32,
}

impl Gutter {
    pub fn new(side: GutterSide, width_px: u32) -> Result<Self> {
        let gutter = Self { side, width_px };
        gutter.validate()?;
        Ok(gutter)
    }

    /// The gutter of a page with no bound edge.
    pub const fn none() -> Self {
        Self {
            side: GutterSide::None,
            width_px: 0,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if (self.width_px == 0) != (self.side == GutterSide::None) {
            return Err(CorpusError::InvalidRecord(format!(
                "gutter side {} is inconsistent with width {}px",
                self.side, self.width_px
            )));
        }
        Ok(())
    }
}

/// Median text baseline spacing; absent on pages without running text.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BaselineGrid {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub median_spacing_px: Option<f64>,
}

impl BaselineGrid {
    pub fn spacing(median_spacing_px: f64) -> Self {
        Self {
            median_spacing_px: Some(median_spacing_px),
        }
    }

    /// No measurable baseline (blank and plate pages).
    pub const fn absent() -> Self {
        Self {
            median_spacing_px: None,
        }
    }

    pub fn validate(&self) -> Result<()> {
        match self.median_spacing_px {
            Some(s) if !(s.is_finite() && s > 0.0) => Err(CorpusError::InvalidRecord(format!(
                "baseline spacing must be a positive number, got {s}"
            ))),
            _ => Ok(()),
        }
    }
}

/// A decorative element and the perceptual hash of its rendered crop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ornament {
    #[serde(rename = "box")]
    pub bbox: PxRect,
    pub hash: String,
}

/// Ground truth for one generated page image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TruthPage {
    pub page_id: String,
    pub page_bounds_px: PxRect,
    pub content_box_px: PxRect,
    pub gutter: Gutter,
    pub baseline_grid: BaselineGrid,
    pub ornaments: Vec<Ornament>,
    pub should_split: bool,
    pub expected_review_reasons: Vec<String>,
}

impl TruthPage {
    /// Consume a fully populated record, returning it only if every
    /// invariant holds.
    pub fn validated(self) -> Result<Self> {
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<()> {
        if self.page_id.trim().is_empty() {
            return Err(CorpusError::InvalidRecord("pageId must not be empty".into()));
        }
        let bounds = self.page_bounds_px;
        if bounds.x0 != 0 || bounds.y0 != 0 || bounds.is_inverted() {
            return Err(CorpusError::InvalidRecord(format!(
                "{}: page bounds {:?} must start at the origin",
                self.page_id, bounds
            )));
        }
        if self.content_box_px.is_inverted() || !bounds.contains(&self.content_box_px) {
            return Err(CorpusError::InvalidRecord(format!(
                "{}: content box {:?} is not within page bounds {:?}",
                self.page_id, self.content_box_px, bounds
            )));
        }
        self.gutter.validate()?;
        self.baseline_grid.validate()?;
        if self.should_split != (self.gutter.side == GutterSide::Center) {
            return Err(CorpusError::InvalidRecord(format!(
                "{}: shouldSplit={} contradicts gutter side {}",
                self.page_id, self.should_split, self.gutter.side
            )));
        }
        Ok(())
    }
}

/// Per-page manifest row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestEntry {
    pub id: String,
    pub description: String,
    pub tags: Vec<String>,
    pub truth_file: String,
    pub ssim_threshold: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ornament_hash: Option<String>,
}

impl ManifestEntry {
    /// Build an entry; the truth file name is always derived from the id.
    pub fn new(
        id: impl Into<String>,
        description: impl Into<String>,
        tags: &[&str],
        ssim_threshold: f64,
    ) -> Result<Self> {
        let id = id.into();
        let entry = Self {
            truth_file: truth_file_name(&id),
            id,
            description: description.into(),
            tags: tags.iter().map(|t| (*t).to_owned()).collect(),
            ssim_threshold,
            ornament_hash: None,
        };
        entry.validate()?;
        Ok(entry)
    }

    /// Attach the single ornament hash worth cross-checking at manifest level.
    pub fn with_ornament_hash(mut self, hash: impl Into<String>) -> Self {
        self.ornament_hash = Some(hash.into());
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(CorpusError::InvalidRecord("manifest id must not be empty".into()));
        }
        if !(self.ssim_threshold > 0.0 && self.ssim_threshold <= 1.0) {
            return Err(CorpusError::InvalidRecord(format!(
                "{}: ssimThreshold {} is outside (0, 1]",
                self.id, self.ssim_threshold
            )));
        }
        if self.truth_file != truth_file_name(&self.id) {
            return Err(CorpusError::InvalidRecord(format!(
                "{}: truthFile {} does not match id",
                self.id, self.truth_file
            )));
        }
        Ok(())
    }
}

/// Truth file name for a page id.
pub fn truth_file_name(page_id: &str) -> String {
    format!("{page_id}.json")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageSize {
    pub width: u32,
    pub height: u32,
}

/// Aggregate index of one corpus run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    pub version: String,
    pub seed: u64,
    pub dpi: u32,
    pub image_size_px: ImageSize,
    pub pages: Vec<ManifestEntry>,
}

impl Manifest {
    pub fn new(
        version: impl Into<String>,
        seed: u64,
        dpi: u32,
        image_size_px: ImageSize,
        pages: Vec<ManifestEntry>,
    ) -> Result<Self> {
        let manifest = Self {
            version: version.into(),
            seed,
            dpi,
            image_size_px,
            pages,
        };
        manifest.validate()?;
        Ok(manifest)
    }

    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for entry in &self.pages {
            entry.validate()?;
            if !seen.insert(entry.id.as_str()) {
                return Err(CorpusError::InvalidRecord(format!(
                    "duplicate manifest id {}",
                    entry.id
                )));
            }
        }
        Ok(())
    }

    pub fn entry(&self, id: &str) -> Option<&ManifestEntry> {
        self.pages.iter().find(|e| e.id == id)
    }
}
