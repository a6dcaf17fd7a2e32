//! Column repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD APIs over `data_columns`.
//! - Strip a deleted column's cells from every row of its table.
//!
//! # Invariants
//! - Listing is deterministic: `sort_order ASC, rowid ASC`.
//! - `options` is persisted as a JSON array and must parse on read.
//! - Column delete and cell stripping commit together or not at all.
//! - Table existence is not checked on create.

use crate::db::NOW_EPOCH_MS_SQL;
use crate::model::column::{Column, ColumnId, ColumnOption, ColumnPatch, ColumnType, NewColumn};
use crate::model::id::new_record_id;
use crate::model::table::TableId;
use crate::repo::{ensure_connection_ready, parse_stored_id, EntityKind, RepoError, RepoResult};
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction, TransactionBehavior};

const COLUMN_SELECT_SQL: &str = "SELECT
    id,
    table_id,
    name,
    kind,
    options,
    sort_order,
    created_at,
    updated_at
FROM data_columns";

/// Repository interface for column operations.
pub trait ColumnRepository {
    /// Creates one column and returns the stored record.
    fn create_column(&self, column: &NewColumn) -> RepoResult<Column>;
    /// Loads one column by id.
    fn get_column(&self, id: ColumnId) -> RepoResult<Option<Column>>;
    /// Lists columns of one table in display order.
    fn list_columns(&self, table_id: TableId) -> RepoResult<Vec<Column>>;
    /// Applies a partial update and returns the stored record.
    fn update_column(&self, id: ColumnId, patch: &ColumnPatch) -> RepoResult<Column>;
    /// Deletes one column and removes its cell from every row of its table.
    ///
    /// Returns the deleted column and the number of rows that lost a cell.
    fn delete_column(&self, id: ColumnId) -> RepoResult<(Column, usize)>;
}

/// SQLite-backed column repository.
pub struct SqliteColumnRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteColumnRepository<'conn> {
    /// Creates repository from migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl ColumnRepository for SqliteColumnRepository<'_> {
    fn create_column(&self, column: &NewColumn) -> RepoResult<Column> {
        let column = column.normalized()?;
        let id = new_record_id();
        self.conn.execute(
            "INSERT INTO data_columns (
                id,
                table_id,
                name,
                kind,
                options,
                sort_order
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
            params![
                id.to_string(),
                column.table_id.to_string(),
                column.name,
                column.kind.as_str(),
                options_to_db(&column.options)?,
                column.order,
            ],
        )?;

        load_column(self.conn, id)?.ok_or_else(|| {
            RepoError::InvalidData(format!("created column {id} missing in read-back"))
        })
    }

    fn get_column(&self, id: ColumnId) -> RepoResult<Option<Column>> {
        load_column(self.conn, id)
    }

    fn list_columns(&self, table_id: TableId) -> RepoResult<Vec<Column>> {
        let mut stmt = self.conn.prepare(&format!(
            "{COLUMN_SELECT_SQL}
             WHERE table_id = ?1
             ORDER BY sort_order ASC, rowid ASC;"
        ))?;
        let mut rows = stmt.query([table_id.to_string()])?;
        let mut columns = Vec::new();
        while let Some(row) = rows.next()? {
            columns.push(parse_column_row(row)?);
        }
        Ok(columns)
    }

    fn update_column(&self, id: ColumnId, patch: &ColumnPatch) -> RepoResult<Column> {
        let mut column = load_column(self.conn, id)?.ok_or_else(|| not_found(id))?;
        if patch.is_empty() {
            return Ok(column);
        }
        patch.apply_to(&mut column)?;

        let changed = self.conn.execute(
            &format!(
                "UPDATE data_columns
                 SET name = ?2,
                     kind = ?3,
                     options = ?4,
                     sort_order = ?5,
                     updated_at = {NOW_EPOCH_MS_SQL}
                 WHERE id = ?1;"
            ),
            params![
                id.to_string(),
                column.name,
                column.kind.as_str(),
                options_to_db(&column.options)?,
                column.order,
            ],
        )?;
        if changed == 0 {
            return Err(not_found(id));
        }

        load_column(self.conn, id)?.ok_or_else(|| not_found(id))
    }

    fn delete_column(&self, id: ColumnId) -> RepoResult<(Column, usize)> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let column = load_column(&tx, id)?.ok_or_else(|| not_found(id))?;

        tx.execute("DELETE FROM data_columns WHERE id = ?1;", [id.to_string()])?;
        let rows_updated = tx.execute(
            &format!(
                "UPDATE data_rows
                 SET cells = json_remove(cells, ?2),
                     updated_at = {NOW_EPOCH_MS_SQL}
                 WHERE table_id = ?1
                   AND json_type(cells, ?2) IS NOT NULL;"
            ),
            params![column.table_id.to_string(), cell_path(id)],
        )?;

        tx.commit()?;
        Ok((column, rows_updated))
    }
}

/// JSON path addressing the cell keyed by `id` inside `data_rows.cells`.
fn cell_path(id: ColumnId) -> String {
    format!("$.\"{id}\"")
}

fn load_column(conn: &Connection, id: ColumnId) -> RepoResult<Option<Column>> {
    conn.query_row(
        &format!("{COLUMN_SELECT_SQL} WHERE id = ?1;"),
        [id.to_string()],
        |row| Ok(parse_column_row(row)),
    )
    .optional()?
    .transpose()
}

fn parse_column_row(row: &Row<'_>) -> RepoResult<Column> {
    let id_text: String = row.get("id")?;
    let table_id_text: String = row.get("table_id")?;

    let kind_text: String = row.get("kind")?;
    let kind = ColumnType::parse(&kind_text).map_err(|_| {
        RepoError::InvalidData(format!(
            "invalid column type `{kind_text}` in data_columns.kind"
        ))
    })?;

    let options_text: String = row.get("options")?;
    let options: Vec<ColumnOption> = serde_json::from_str(&options_text).map_err(|err| {
        RepoError::InvalidData(format!("invalid options in data_columns.options: {err}"))
    })?;

    Ok(Column {
        id: parse_stored_id(&id_text, "data_columns.id")?,
        table_id: parse_stored_id(&table_id_text, "data_columns.table_id")?,
        name: row.get("name")?,
        kind,
        options,
        order: row.get("sort_order")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

fn options_to_db(options: &[ColumnOption]) -> RepoResult<String> {
    serde_json::to_string(options)
        .map_err(|err| RepoError::InvalidData(format!("unserializable column options: {err}")))
}

fn not_found(id: ColumnId) -> RepoError {
    RepoError::NotFound {
        entity: EntityKind::Column,
        id,
    }
}
