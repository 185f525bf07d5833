// ── Core error types ──
//
// User-facing errors from netinv-core. A corrupt data file is *not* an
// error: it surfaces as `LoadOutcome::Corrupt` and reads as an empty
// inventory. Only failures the operator has to act on land here.

use std::path::PathBuf;

use thiserror::Error;

use crate::model::{DeviceRecord, ValidationError};

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Input errors ─────────────────────────────────────────────────
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    // ── Lookup errors ────────────────────────────────────────────────
    #[error("Search term cannot be empty")]
    EmptySearchTerm,

    #[error("No device matches '{term}'")]
    NotFound { term: String },

    #[error("'{term}' matches {} devices -- narrow the search", .matches.len())]
    AmbiguousMatch {
        term: String,
        matches: Vec<DeviceRecord>,
    },

    // ── Storage errors ───────────────────────────────────────────────
    #[error("Cannot read inventory at {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot write inventory at {}", .path.display())]
    Persistence {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Snapshot into {} failed -- nothing was written", .path.display())]
    Snapshot {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Snapshot {} is not a usable inventory: {reason}", .path.display())]
    InvalidSnapshot { path: PathBuf, reason: String },

    #[error("Failed to encode inventory: {0}")]
    Encode(#[from] serde_json::Error),
}
