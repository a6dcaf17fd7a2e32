//! Table repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD APIs over `data_tables`.
//! - Cascade table deletion to `data_columns` and `data_rows`.
//!
//! # Invariants
//! - Listing is deterministic: `created_at DESC, rowid DESC`.
//! - Table delete removes rows, then columns, then the table in one
//!   transaction; a failure leaves all three untouched.

use crate::db::NOW_EPOCH_MS_SQL;
use crate::model::id::new_record_id;
use crate::model::table::{normalize_table_name, Table, TableId};
use crate::repo::{ensure_connection_ready, parse_stored_id, EntityKind, RepoError, RepoResult};
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction, TransactionBehavior};

const TABLE_SELECT_SQL: &str = "SELECT id, name, created_at, updated_at FROM data_tables";

/// Counts of dependents removed alongside a table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TableCascade {
    pub columns_deleted: usize,
    pub rows_deleted: usize,
}

/// Repository interface for table operations.
pub trait TableRepository {
    /// Creates one table and returns the stored record.
    fn create_table(&self, name: &str) -> RepoResult<Table>;
    /// Loads one table by id.
    fn get_table(&self, id: TableId) -> RepoResult<Option<Table>>;
    /// Lists all tables, newest first.
    fn list_tables(&self) -> RepoResult<Vec<Table>>;
    /// Replaces the table name.
    fn rename_table(&self, id: TableId, name: &str) -> RepoResult<Table>;
    /// Deletes one table together with its columns and rows.
    fn delete_table(&self, id: TableId) -> RepoResult<(Table, TableCascade)>;
}

/// SQLite-backed table repository.
pub struct SqliteTableRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTableRepository<'conn> {
    /// Creates repository from migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl TableRepository for SqliteTableRepository<'_> {
    fn create_table(&self, name: &str) -> RepoResult<Table> {
        let name = normalize_table_name(name)?;
        let id = new_record_id();
        self.conn.execute(
            "INSERT INTO data_tables (id, name) VALUES (?1, ?2);",
            params![id.to_string(), name],
        )?;

        load_table(self.conn, id)?.ok_or_else(|| {
            RepoError::InvalidData(format!("created table {id} missing in read-back"))
        })
    }

    fn get_table(&self, id: TableId) -> RepoResult<Option<Table>> {
        load_table(self.conn, id)
    }

    fn list_tables(&self) -> RepoResult<Vec<Table>> {
        let mut stmt = self.conn.prepare(&format!(
            "{TABLE_SELECT_SQL} ORDER BY created_at DESC, rowid DESC;"
        ))?;
        let mut rows = stmt.query([])?;
        let mut tables = Vec::new();
        while let Some(row) = rows.next()? {
            tables.push(parse_table_row(row)?);
        }
        Ok(tables)
    }

    fn rename_table(&self, id: TableId, name: &str) -> RepoResult<Table> {
        let name = normalize_table_name(name)?;
        let changed = self.conn.execute(
            &format!(
                "UPDATE data_tables
                 SET name = ?2,
                     updated_at = {NOW_EPOCH_MS_SQL}
                 WHERE id = ?1;"
            ),
            params![id.to_string(), name],
        )?;
        if changed == 0 {
            return Err(not_found(id));
        }

        load_table(self.conn, id)?.ok_or_else(|| not_found(id))
    }

    fn delete_table(&self, id: TableId) -> RepoResult<(Table, TableCascade)> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let table = load_table(&tx, id)?.ok_or_else(|| not_found(id))?;
        let key = id.to_string();

        let rows_deleted = tx.execute("DELETE FROM data_rows WHERE table_id = ?1;", [&key])?;
        let columns_deleted =
            tx.execute("DELETE FROM data_columns WHERE table_id = ?1;", [&key])?;
        tx.execute("DELETE FROM data_tables WHERE id = ?1;", [&key])?;

        tx.commit()?;
        Ok((
            table,
            TableCascade {
                columns_deleted,
                rows_deleted,
            },
        ))
    }
}

fn load_table(conn: &Connection, id: TableId) -> RepoResult<Option<Table>> {
    conn.query_row(
        &format!("{TABLE_SELECT_SQL} WHERE id = ?1;"),
        [id.to_string()],
        |row| Ok(parse_table_row(row)),
    )
    .optional()?
    .transpose()
}

fn parse_table_row(row: &Row<'_>) -> RepoResult<Table> {
    let id_text: String = row.get("id")?;
    Ok(Table {
        id: parse_stored_id(&id_text, "data_tables.id")?,
        name: row.get("name")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

fn not_found(id: TableId) -> RepoError {
    RepoError::NotFound {
        entity: EntityKind::Table,
        id,
    }
}
