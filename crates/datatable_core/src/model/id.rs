//! Record identifier format shared by every entity.
//!
//! # Invariants
//! - Identifiers are canonical hyphenated UUIDs (8-4-4-4-12 hex digits).
//! - `parse_record_id` is the only gate between caller-supplied strings and
//!   store lookups; malformed input never reaches SQL.

use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for tables, columns, and rows.
pub type RecordId = Uuid;

static RECORD_ID_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$")
        .expect("valid record id regex")
});

/// Raw input that does not match the record identifier format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidRecordId(pub String);

impl Display for InvalidRecordId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid identifier: `{}`", self.0)
    }
}

impl Error for InvalidRecordId {}

/// Returns whether `value` is a well-formed record identifier.
pub fn is_valid_record_id(value: &str) -> bool {
    RECORD_ID_RE.is_match(value)
}

/// Parses a caller-supplied identifier.
///
/// Braced, URN, and unhyphenated UUID spellings are rejected even though
/// `Uuid::parse_str` would accept them.
pub fn parse_record_id(value: &str) -> Result<RecordId, InvalidRecordId> {
    if !is_valid_record_id(value) {
        return Err(InvalidRecordId(value.to_string()));
    }
    Uuid::parse_str(value).map_err(|_| InvalidRecordId(value.to_string()))
}

/// Generates a fresh identifier for a new record.
pub fn new_record_id() -> RecordId {
    Uuid::new_v4()
}
