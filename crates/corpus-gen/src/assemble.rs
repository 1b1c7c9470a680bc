// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Corpus assembly — output directory layout, PNG and JSON writing, and the
// end-to-end generation driver.
//
// Layout:
//   <out>/inputs/<pageId>.png
//   <out>/truth/<pageId>.json
//   <out>/expected/            (created empty)
//   <out>/manifest.json

use std::path::{Path, PathBuf};

use corpus_core::error::{CorpusError, Result};
use corpus_core::{CorpusConfig, CorpusRng, ImageSize, Manifest, Phase, PhaseStatus, ProgressSink};
use corpus_render::resolve_glyphs;
use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{ExtendedColorType, ImageEncoder, RgbImage};
use serde::Serialize;
use serde_json::{Map, Value, json};
use tracing::{debug, info, instrument};

use crate::archetypes::{Archetype, BuiltPage};
use crate::integrity::hash_bytes;

const MANIFEST_FILE: &str = "manifest.json";

/// Paths and digests of one page's artifacts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenPage {
    pub page_id: String,
    pub image_path: PathBuf,
    pub truth_path: PathBuf,
    pub image_sha256: String,
    pub truth_sha256: String,
}

/// Everything a finished run produced.
#[derive(Debug, Clone)]
pub struct CorpusSummary {
    pub out_dir: PathBuf,
    pub seed: u64,
    pub pages: Vec<WrittenPage>,
    pub manifest_path: PathBuf,
    pub manifest_sha256: String,
    pub warnings: Vec<String>,
}

impl CorpusSummary {
    /// Fields merged into the run reporter's summary event.
    pub fn to_attrs(&self) -> Map<String, Value> {
        let mut attrs = Map::new();
        attrs.insert("outDir".into(), json!(self.out_dir.display().to_string()));
        attrs.insert("seed".into(), json!(self.seed));
        attrs.insert("pages".into(), json!(self.pages.len()));
        attrs.insert("manifestSha256".into(), json!(self.manifest_sha256));
        attrs
    }
}

/// Writer rooted at one output directory.
#[derive(Debug, Clone)]
pub struct CorpusWriter {
    root: PathBuf,
    inputs: PathBuf,
    truth: PathBuf,
    expected: PathBuf,
}

impl CorpusWriter {
    /// Create (or reuse) the output tree under `root`.
    #[instrument(skip_all, fields(root = %root.as_ref().display()))]
    pub fn create(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        let writer = Self {
            inputs: root.join("inputs"),
            truth: root.join("truth"),
            expected: root.join("expected"),
            root,
        };
        for dir in [&writer.inputs, &writer.truth, &writer.expected] {
            std::fs::create_dir_all(dir)?;
        }
        debug!("Output directories ready");
        Ok(writer)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn inputs_dir(&self) -> &Path {
        &self.inputs
    }

    pub fn truth_dir(&self) -> &Path {
        &self.truth
    }

    pub fn expected_dir(&self) -> &Path {
        &self.expected
    }

    /// Write the page image and its truth record.
    #[instrument(skip_all, fields(page = %page.truth.page_id))]
    pub fn write_page(&self, page: &BuiltPage) -> Result<WrittenPage> {
        let png = encode_png(&page.image)?;
        let image_path = self.inputs.join(format!("{}.png", page.truth.page_id));
        std::fs::write(&image_path, &png)?;

        let truth_json = to_pretty_json(&page.truth)?;
        let truth_path = self.truth.join(&page.entry.truth_file);
        std::fs::write(&truth_path, &truth_json)?;

        debug!(png_bytes = png.len(), "Page written");
        Ok(WrittenPage {
            page_id: page.truth.page_id.clone(),
            image_path,
            truth_path,
            image_sha256: hash_bytes(&png),
            truth_sha256: hash_bytes(&truth_json),
        })
    }

    /// Write `manifest.json`, returning its path and digest.
    #[instrument(skip_all, fields(pages = manifest.pages.len()))]
    pub fn write_manifest(&self, manifest: &Manifest) -> Result<(PathBuf, String)> {
        manifest.validate()?;
        let bytes = to_pretty_json(manifest)?;
        let path = self.root.join(MANIFEST_FILE);
        std::fs::write(&path, &bytes)?;
        Ok((path, hash_bytes(&bytes)))
    }
}

/// Lossless PNG, default compression, adaptive filtering.
fn encode_png(image: &RgbImage) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    let encoder = PngEncoder::new_with_quality(&mut buf, CompressionType::Default, FilterType::Adaptive);
    encoder
        .write_image(image.as_raw(), image.width(), image.height(), ExtendedColorType::Rgb8)
        .map_err(|err| CorpusError::Image(format!("failed to encode PNG: {}", err)))?;
    Ok(buf)
}

/// Two-space indented JSON.
fn to_pretty_json<T: Serialize>(value: &T) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec_pretty(value)?)
}

/// Generate the full corpus into `out`.
///
/// Pages are built in registry order from a single RNG seeded with
/// `config.seed`, each written before the next is built. Progress is reported
/// as three phases: `setup`, `render` (one tick per page) and `assemble`.
#[instrument(skip_all, fields(seed = config.seed, out = %out.display()))]
pub fn generate_corpus(config: &CorpusConfig, out: &Path, sink: &dyn ProgressSink) -> Result<CorpusSummary> {
    config.validate()?;

    let mut setup = Phase::new(sink, "setup", None);
    setup.start();
    let writer = CorpusWriter::create(out)?;
    let glyphs = resolve_glyphs(config.font_path.as_deref());
    info!(glyphs = glyphs.name(), "Glyph provider selected");
    setup.end(PhaseStatus::Ok);

    let mut rng = CorpusRng::new(config.seed);
    let mut render = Phase::new(sink, "render", Some(Archetype::ALL.len() as u64));
    render.start();
    let mut pages = Vec::with_capacity(Archetype::ALL.len());
    let mut entries = Vec::with_capacity(Archetype::ALL.len());
    let mut warnings = Vec::new();
    for archetype in Archetype::ALL {
        let page = archetype.build(&mut rng, config.page, glyphs.as_ref())?;
        pages.push(writer.write_page(&page)?);
        for warning in &page.warnings {
            sink.warning(warning);
        }
        warnings.extend(page.warnings);
        entries.push(page.entry);
        render.tick(1);
    }
    render.end(if warnings.is_empty() { PhaseStatus::Ok } else { PhaseStatus::Warn });

    let mut assemble = Phase::new(sink, "assemble", None);
    assemble.start();
    let manifest = Manifest::new(
        config.version.clone(),
        config.seed,
        config.dpi,
        ImageSize {
            width: config.page.width,
            height: config.page.height,
        },
        entries,
    )?;
    let (manifest_path, manifest_sha256) = writer.write_manifest(&manifest)?;
    assemble.end(PhaseStatus::Ok);

    info!(pages = pages.len(), warnings = warnings.len(), "Golden corpus assembled");
    Ok(CorpusSummary {
        out_dir: writer.root().to_path_buf(),
        seed: config.seed,
        pages,
        manifest_path,
        manifest_sha256,
        warnings,
    })
}
