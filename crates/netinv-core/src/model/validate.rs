// ── Field validation ──
//
// Pure functions from raw operator input to typed values. Retrying on
// failure is the caller's business; nothing here prompts or loops.

use std::net::IpAddr;

use serde::Serialize;
use thiserror::Error;

use super::device::{NetworkService, RecordField};

/// A single field failed its domain constraint.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValidationError {
    #[error("{field} cannot be empty")]
    Empty { field: RecordField },

    #[error("'{value}' is not a valid IPv4 or IPv6 address")]
    InvalidIp { value: String },

    #[error("unknown device type '{value}' (expected one of: {expected})")]
    UnknownDeviceType { value: String, expected: String },

    #[error("unknown network layer '{value}' (expected one of: {expected})")]
    UnknownLayer { value: String, expected: String },

    #[error("unknown network service '{value}' (expected one of: {expected})")]
    UnknownService { value: String, expected: String },

    #[error("network service {service} is listed more than once")]
    DuplicateService { service: NetworkService },
}

impl ValidationError {
    /// The record field this error is about.
    pub fn field(&self) -> RecordField {
        match self {
            Self::Empty { field } => *field,
            Self::InvalidIp { .. } => RecordField::Ip,
            Self::UnknownDeviceType { .. } => RecordField::Type,
            Self::UnknownLayer { .. } => RecordField::Layer,
            Self::UnknownService { .. } | Self::DuplicateService { .. } => RecordField::Services,
        }
    }
}

/// Trim and require non-empty text.
pub fn required_text(field: RecordField, raw: &str) -> Result<String, ValidationError> {
    let value = raw.trim();
    if value.is_empty() {
        return Err(ValidationError::Empty { field });
    }
    Ok(value.to_owned())
}

/// Check that `raw` is an IPv4 or IPv6 address and return it trimmed.
///
/// The text is kept as typed: `2001:0DB8::1` is not rewritten to its
/// canonical form, so searches for what the operator entered still hit.
pub fn ip_address(raw: &str) -> Result<String, ValidationError> {
    let value = raw.trim();
    if value.is_empty() {
        return Err(ValidationError::Empty {
            field: RecordField::Ip,
        });
    }
    match value.parse::<IpAddr>() {
        Ok(_) => Ok(value.to_owned()),
        Err(_) => Err(ValidationError::InvalidIp {
            value: value.to_owned(),
        }),
    }
}

/// Lowercase and fold spaces/underscores into hyphens: `"Access Point"` →
/// `"access-point"`.
pub(crate) fn normalize_token(raw: &str) -> String {
    raw.trim().to_lowercase().replace([' ', '_'], "-")
}
