//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` variants into user-facing errors with
//! actionable help text.

use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

use netinv_config::ConfigError;
use netinv_core::{CoreError, ValidationError};

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const NOT_FOUND: i32 = 4;
    pub const PERMISSION: i32 = 5;
    pub const CONFLICT: i32 = 6;
}

#[derive(Debug, Error, Diagnostic)]
#[allow(unused_assignments)]
pub enum CliError {
    // ── Lookup ───────────────────────────────────────────────────────
    #[error("No device matches '{term}'")]
    #[diagnostic(
        code(netinv::not_found),
        help("Run: netinv list to see registered devices")
    )]
    NotFound { term: String },

    #[error("'{term}' matches {count} devices: {names}")]
    #[diagnostic(
        code(netinv::ambiguous),
        help("Narrow the term to one device, e.g. use its full IP address.")
    )]
    Ambiguous {
        term: String,
        count: usize,
        names: String,
    },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(netinv::validation))]
    Validation { field: String, reason: String },

    // ── Storage ──────────────────────────────────────────────────────
    #[error("Cannot read {}", .path.display())]
    #[diagnostic(
        code(netinv::read),
        help("Check that the path is readable, or pick another with --data-file.")
    )]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot write {}", .path.display())]
    #[diagnostic(
        code(netinv::persistence),
        help("Check permissions and free space, or pick another path with --data-file.")
    )]
    Persistence {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Snapshot into {} failed; nothing was changed", .path.display())]
    #[diagnostic(
        code(netinv::snapshot),
        help("Make the snapshot directory writable, or set one with --snapshot-dir.")
    )]
    Snapshot {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Snapshot '{name}' not found")]
    #[diagnostic(
        code(netinv::snapshot_not_found),
        help("Run: netinv snapshots list to see available snapshots")
    )]
    SnapshotNotFound { name: String },

    #[error("{} is not a usable snapshot: {reason}", .path.display())]
    #[diagnostic(
        code(netinv::invalid_snapshot),
        help("Run: netinv snapshots list to see available snapshots")
    )]
    InvalidSnapshot { path: PathBuf, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(netinv::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: netinv config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error(transparent)]
    #[diagnostic(code(netinv::config))]
    Config(Box<figment::Error>),

    #[error("Failed to write configuration: {0}")]
    #[diagnostic(code(netinv::config_write))]
    ConfigWrite(#[from] toml::ser::Error),

    // ── Interactive ──────────────────────────────────────────────────
    #[error("'{action}' needs {field}, and there is no terminal to prompt on")]
    #[diagnostic(
        code(netinv::input_required),
        help("Pass every required field as a flag, or run from an interactive terminal.")
    )]
    InputRequired { action: String, field: String },

    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(netinv::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── IO / Serialization ────────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to encode output: {0}")]
    #[diagnostic(code(netinv::json))]
    Json(#[from] serde_json::Error),
}

impl From<figment::Error> for CliError {
    fn from(err: figment::Error) -> Self {
        Self::Config(Box::new(err))
    }
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::NotFound { .. } | Self::SnapshotNotFound { .. } => exit_code::NOT_FOUND,
            Self::Ambiguous { .. } => exit_code::CONFLICT,
            Self::Persistence { .. } | Self::Snapshot { .. } => exit_code::PERMISSION,
            Self::Validation { .. }
            | Self::ProfileNotFound { .. }
            | Self::InputRequired { .. }
            | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<ValidationError> for CliError {
    fn from(err: ValidationError) -> Self {
        CliError::Validation {
            field: err.field().to_string(),
            reason: err.to_string(),
        }
    }
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation(e) => e.into(),

            CoreError::EmptySearchTerm => CliError::Validation {
                field: "term".into(),
                reason: "search term cannot be empty".into(),
            },

            CoreError::NotFound { term } => CliError::NotFound { term },

            CoreError::AmbiguousMatch { term, matches } => CliError::Ambiguous {
                term,
                count: matches.len(),
                names: matches
                    .iter()
                    .map(|r| format!("{} ({})", r.name, r.ip))
                    .collect::<Vec<_>>()
                    .join(", "),
            },

            CoreError::Read { path, source } => CliError::Read { path, source },
            CoreError::Persistence { path, source } => CliError::Persistence { path, source },
            CoreError::Snapshot { path, source } => CliError::Snapshot { path, source },
            CoreError::InvalidSnapshot { path, reason } => {
                CliError::InvalidSnapshot { path, reason }
            }
            CoreError::Encode(e) => CliError::Json(e),
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::ProfileNotFound { name, available } => {
                CliError::ProfileNotFound { name, available }
            }
            ConfigError::Serialization(e) => CliError::ConfigWrite(e),
            ConfigError::Figment(e) => CliError::Config(e),
            ConfigError::Io(e) => CliError::Io(e),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use netinv_core::RecordField;

    #[test]
    fn core_errors_map_to_exit_codes() {
        let not_found: CliError = CoreError::NotFound { term: "x".into() }.into();
        assert_eq!(not_found.exit_code(), exit_code::NOT_FOUND);

        let ambiguous: CliError = CoreError::AmbiguousMatch {
            term: "sw".into(),
            matches: Vec::new(),
        }
        .into();
        assert_eq!(ambiguous.exit_code(), exit_code::CONFLICT);

        let invalid: CliError = CoreError::Validation(ValidationError::Empty {
            field: RecordField::Name,
        })
        .into();
        assert_eq!(invalid.exit_code(), exit_code::USAGE);

        let persist: CliError = CoreError::Persistence {
            path: "/x".into(),
            source: std::io::Error::other("denied"),
        }
        .into();
        assert_eq!(persist.exit_code(), exit_code::PERMISSION);
    }

    #[test]
    fn profile_errors_are_usage_errors() {
        let err: CliError = ConfigError::ProfileNotFound {
            name: "lab".into(),
            available: "(none)".into(),
        }
        .into();
        assert_eq!(err.exit_code(), exit_code::USAGE);
    }
}
