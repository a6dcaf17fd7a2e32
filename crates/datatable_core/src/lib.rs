//! Core domain logic for the data-table backend.
//! This crate is the single source of truth for table/column/row invariants
//! and their cascade rules.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::column::{Column, ColumnId, ColumnOption, ColumnPatch, ColumnType, NewColumn};
pub use model::id::{is_valid_record_id, parse_record_id, InvalidRecordId, RecordId};
pub use model::row::{Cells, Row, RowId};
pub use model::table::{Table, TableId};
pub use model::ModelValidationError;
pub use repo::column_repo::{ColumnRepository, SqliteColumnRepository};
pub use repo::row_repo::{RowRepository, SqliteRowRepository};
pub use repo::table_repo::{SqliteTableRepository, TableCascade, TableRepository};
pub use repo::{EntityKind, RepoError, RepoResult};
pub use service::column_service::ColumnService;
pub use service::row_service::RowService;
pub use service::table_service::TableService;
pub use service::{ServiceError, ServiceResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
