//! Table use-case service.
//!
//! # Responsibility
//! - Provide create/list/get/rename/delete entry points for tables.
//! - Report cascade effects of table deletion.
//!
//! # Invariants
//! - Table names are trimmed and must not be blank.
//! - Deleting a table never leaves its columns or rows readable.

use crate::model::table::{normalize_table_name, Table, TableId};
use crate::repo::table_repo::TableRepository;
use crate::repo::EntityKind;
use crate::service::{require_found, ServiceResult};
use log::info;

/// Table service facade over repository implementations.
pub struct TableService<R: TableRepository> {
    repo: R,
}

impl<R: TableRepository> TableService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates one table from a required name.
    pub fn create_table(&self, name: &str) -> ServiceResult<Table> {
        let name = normalize_table_name(name)?;
        Ok(self.repo.create_table(name.as_str())?)
    }

    /// Lists all tables, newest first.
    pub fn list_tables(&self) -> ServiceResult<Vec<Table>> {
        Ok(self.repo.list_tables()?)
    }

    /// Gets one table by id.
    pub fn get_table(&self, id: TableId) -> ServiceResult<Table> {
        require_found(self.repo.get_table(id)?, EntityKind::Table, id)
    }

    /// Replaces the name of one table.
    pub fn rename_table(&self, id: TableId, name: &str) -> ServiceResult<Table> {
        let name = normalize_table_name(name)?;
        Ok(self.repo.rename_table(id, name.as_str())?)
    }

    /// Deletes one table along with its columns and rows.
    pub fn delete_table(&self, id: TableId) -> ServiceResult<Table> {
        let (table, cascade) = self.repo.delete_table(id)?;
        info!(
            "event=table_delete module=service status=ok table_id={} columns_deleted={} rows_deleted={}",
            table.id, cascade.columns_deleted, cascade.rows_deleted
        );
        Ok(table)
    }
}
