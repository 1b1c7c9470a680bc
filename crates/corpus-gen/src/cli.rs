// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Command-line interface for the `golden-corpus` binary.

use std::path::PathBuf;

use clap::Parser;
use corpus_core::CorpusConfig;
use corpus_core::config::DEFAULT_SEED;
use corpus_gen::DEFAULT_OBS_DIR;

#[derive(Parser, Debug)]
#[command(
    name = "golden-corpus",
    version,
    about = "Generate the deterministic golden corpus of synthetic scanned pages"
)]
pub struct Cli {
    /// Seed for the run-wide RNG.
    #[arg(long, default_value_t = DEFAULT_SEED)]
    pub seed: u64,

    /// Output directory (created if missing).
    #[arg(long)]
    pub out: PathBuf,

    /// TrueType font for running heads and folios.
    #[arg(long)]
    pub font: Option<PathBuf>,

    /// Root directory of the JSONL event log.
    #[arg(long, env = "CORPUS_OBS_DIR", default_value = DEFAULT_OBS_DIR)]
    pub obs_dir: PathBuf,

    /// Run identifier; defaults to `golden-corpus-<unix seconds>`.
    #[arg(long)]
    pub run_id: Option<String>,

    /// Extra JSONL file that receives a copy of every event (repeatable).
    #[arg(long = "mirror-log", value_name = "PATH")]
    pub mirror_logs: Vec<PathBuf>,

    /// Suppress the console progress stream.
    #[arg(long, default_value_t = false)]
    pub quiet: bool,
}

impl Cli {
    pub fn corpus_config(&self) -> CorpusConfig {
        CorpusConfig {
            seed: self.seed,
            font_path: self.font.clone(),
            ..CorpusConfig::default()
        }
    }
}
