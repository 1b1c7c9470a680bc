// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Golden corpus — Core record types, errors, configuration, the progress sink
// contract, and the single deterministic RNG shared by every page builder.

pub mod config;
pub mod error;
pub mod progress;
pub mod rng;
pub mod types;

pub use config::{CorpusConfig, PageSize};
pub use error::CorpusError;
pub use progress::{NullSink, Phase, PhaseStatus, ProgressSink};
pub use rng::CorpusRng;
pub use types::*;
