//! Domain model for data tables, their columns, and their rows.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//! - Own write-time shape validation shared by every repository.
//!
//! # Invariants
//! - Every record is identified by a stable `RecordId`.
//! - Columns and rows belong to exactly one table via `table_id`.
//! - Deletion is a hard delete; dependents are removed by cascades.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod column;
pub mod id;
pub mod row;
pub mod table;

/// Shape violation detected before a record reaches storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelValidationError {
    /// Table name is absent or blank after trim.
    BlankTableName,
    /// Column name is absent or blank after trim.
    BlankColumnName,
    /// Column type is absent.
    MissingColumnType,
    /// Column type string is not one of the supported kinds.
    UnknownColumnType(String),
}

impl Display for ModelValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankTableName => write!(f, "Table name is required"),
            Self::BlankColumnName => write!(f, "Column name is required"),
            Self::MissingColumnType => write!(f, "Column type is required"),
            Self::UnknownColumnType(value) => write!(
                f,
                "Unsupported column type `{value}`; expected text|email|date|select|multi-select|file"
            ),
        }
    }
}

impl Error for ModelValidationError {}

/// Trims a required name, rejecting blank input with `error`.
pub(crate) fn normalize_required_name(
    value: &str,
    error: ModelValidationError,
) -> Result<String, ModelValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(error);
    }
    Ok(trimmed.to_string())
}
