//! Column use-case service.
//!
//! # Responsibility
//! - Provide create/list/get/update/delete entry points for columns.
//!
//! # Invariants
//! - Column names are trimmed and must not be blank.
//! - Owning table existence is not verified on create.
//! - Deleting a column strips its cells from rows of the same table only.

use crate::model::column::{Column, ColumnId, ColumnPatch, NewColumn};
use crate::model::table::TableId;
use crate::repo::column_repo::ColumnRepository;
use crate::repo::EntityKind;
use crate::service::{require_found, ServiceResult};
use log::info;

/// Column service facade over repository implementations.
pub struct ColumnService<R: ColumnRepository> {
    repo: R,
}

impl<R: ColumnRepository> ColumnService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates one column.
    pub fn create_column(&self, column: &NewColumn) -> ServiceResult<Column> {
        let column = column.normalized()?;
        Ok(self.repo.create_column(&column)?)
    }

    /// Lists columns of one table ordered by `order` ascending.
    pub fn list_columns(&self, table_id: TableId) -> ServiceResult<Vec<Column>> {
        Ok(self.repo.list_columns(table_id)?)
    }

    /// Gets one column by id.
    pub fn get_column(&self, id: ColumnId) -> ServiceResult<Column> {
        require_found(self.repo.get_column(id)?, EntityKind::Column, id)
    }

    /// Applies a partial update to one column.
    pub fn update_column(&self, id: ColumnId, patch: &ColumnPatch) -> ServiceResult<Column> {
        Ok(self.repo.update_column(id, patch)?)
    }

    /// Deletes one column and removes its cells from the owning table's rows.
    pub fn delete_column(&self, id: ColumnId) -> ServiceResult<Column> {
        let (column, rows_updated) = self.repo.delete_column(id)?;
        info!(
            "event=column_delete module=service status=ok column_id={} table_id={} rows_updated={}",
            column.id, column.table_id, rows_updated
        );
        Ok(column)
    }
}
