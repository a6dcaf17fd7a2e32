//! Table domain model.
//!
//! # Invariants
//! - `name` is non-blank and stored trimmed.
//! - Timestamps are Unix epoch milliseconds assigned by the store.

use crate::model::id::RecordId;
use crate::model::{normalize_required_name, ModelValidationError};
use serde::{Deserialize, Serialize};

/// Identifier of a table record.
pub type TableId = RecordId;

/// Root entity owning columns and rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Table {
    pub id: TableId,
    pub name: String,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Validates and normalizes a table name for persistence.
pub fn normalize_table_name(name: &str) -> Result<String, ModelValidationError> {
    normalize_required_name(name, ModelValidationError::BlankTableName)
}
