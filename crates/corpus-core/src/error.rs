// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for the golden corpus generator.

use thiserror::Error;

/// Top-level error type for all corpus operations.
#[derive(Debug, Error)]
pub enum CorpusError {
    // -- Configuration --
    #[error("invalid configuration: {0}")]
    Config(String),

    // -- Records --
    #[error("invalid record: {0}")]
    InvalidRecord(String),

    // -- Rendering --
    #[error("image processing failed: {0}")]
    Image(String),

    #[error("font loading failed: {0}")]
    Font(String),

    // -- Storage / persistence --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, CorpusError>;
