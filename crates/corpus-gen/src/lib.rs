// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// corpus-gen — Golden corpus generator.
//
// Builds the sixteen page archetypes in a fixed order from one seeded RNG,
// writes each page image and its ground-truth record, assembles the manifest,
// and reports run progress as JSONL events.

pub mod archetypes;
pub mod assemble;
pub mod integrity;
pub mod reporter;

pub use archetypes::{Archetype, BuiltPage};
pub use assemble::{CorpusSummary, CorpusWriter, WrittenPage, generate_corpus};
pub use integrity::hash_bytes;
pub use reporter::{DEFAULT_OBS_DIR, RunReporter, default_run_id, format_duration};
