//! Row domain model.
//!
//! # Invariants
//! - `cells` is keyed by column identifier text; values are opaque JSON.
//! - Keys are not checked against existing columns.

use crate::model::id::RecordId;
use crate::model::table::TableId;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Identifier of a row record.
pub type RowId = RecordId;

/// Sparse mapping from column identifier to cell value.
pub type Cells = Map<String, Value>;

/// One record of a table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Row {
    pub id: RowId,
    pub table_id: TableId,
    pub cells: Cells,
    pub created_at: i64,
    pub updated_at: i64,
}
