// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// golden-corpus — Deterministic golden corpus generator.
//
// Entry point. Initialises logging, parses the command line, runs generation
// under a JSONL run reporter and exits non-zero on failure.

mod cli;

use clap::Parser;
use corpus_core::error::Result;
use corpus_core::progress::ErrorLocation;
use corpus_core::{PhaseStatus, ProgressSink};
use corpus_gen::{RunReporter, default_run_id, generate_corpus};
use serde_json::Map;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;

const TOOL: &str = "golden-corpus";

fn main() {
    init_tracing();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(PhaseStatus::Fail) => std::process::exit(1),
        Ok(_) => {}
        Err(err) => {
            error!(error = %err, "generation failed");
            std::process::exit(1);
        }
    }
}

fn run(cli: &Cli) -> Result<PhaseStatus> {
    let run_id = cli.run_id.clone().unwrap_or_else(|| default_run_id(TOOL));
    let mut reporter = RunReporter::new(TOOL, &run_id, &cli.obs_dir);
    for path in &cli.mirror_logs {
        reporter = reporter.with_mirror(path);
    }
    if !cli.quiet {
        reporter = reporter.with_console(Box::new(std::io::stdout()));
    }
    info!(run_id = %run_id, seed = cli.seed, out = %cli.out.display(), "Golden corpus starting");

    match generate_corpus(&cli.corpus_config(), &cli.out, &reporter) {
        Ok(summary) => {
            let status = reporter.finalize(summary.to_attrs());
            println!("Golden corpus written to {}", cli.out.display());
            Ok(status)
        }
        Err(err) => {
            reporter.error(
                "generation-failed",
                &err.to_string(),
                Some(ErrorLocation::new(file!(), line!(), column!())),
            );
            reporter.finalize(Map::new());
            Err(err)
        }
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
