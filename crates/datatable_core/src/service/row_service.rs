//! Row use-case service.
//!
//! # Invariants
//! - `update_row_cells` uses full replacement semantics.
//! - Cell keys and values are stored as given.

use crate::model::row::{Cells, Row, RowId};
use crate::model::table::TableId;
use crate::repo::row_repo::RowRepository;
use crate::repo::EntityKind;
use crate::service::{require_found, ServiceResult};

/// Row service facade over repository implementations.
pub struct RowService<R: RowRepository> {
    repo: R,
}

impl<R: RowRepository> RowService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates one row in `table_id` with the given cells.
    pub fn create_row(&self, table_id: TableId, cells: &Cells) -> ServiceResult<Row> {
        Ok(self.repo.create_row(table_id, cells)?)
    }

    /// Lists rows of one table in storage order.
    pub fn list_rows(&self, table_id: TableId) -> ServiceResult<Vec<Row>> {
        Ok(self.repo.list_rows(table_id)?)
    }

    /// Gets one row by id.
    pub fn get_row(&self, id: RowId) -> ServiceResult<Row> {
        require_found(self.repo.get_row(id)?, EntityKind::Row, id)
    }

    /// Replaces the entire cells map of one row.
    ///
    /// Cells omitted from `cells` are removed.
    pub fn update_row_cells(&self, id: RowId, cells: &Cells) -> ServiceResult<Row> {
        Ok(self.repo.replace_cells(id, cells)?)
    }

    /// Deletes one row and returns the removed record.
    pub fn delete_row(&self, id: RowId) -> ServiceResult<Row> {
        Ok(self.repo.delete_row(id)?)
    }
}
