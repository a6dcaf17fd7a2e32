//! Row repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD APIs over `data_rows`.
//! - Persist `cells` as a JSON object.
//!
//! # Invariants
//! - Updates replace the whole cells map; nothing is merged.
//! - Listing follows insertion order (`rowid ASC`).
//! - Neither table existence nor cell keys are checked on write.

use crate::db::NOW_EPOCH_MS_SQL;
use crate::model::id::new_record_id;
use crate::model::row::{Cells, Row, RowId};
use crate::model::table::TableId;
use crate::repo::{ensure_connection_ready, parse_stored_id, EntityKind, RepoError, RepoResult};
use rusqlite::{params, Connection, OptionalExtension};

const ROW_SELECT_SQL: &str = "SELECT id, table_id, cells, created_at, updated_at FROM data_rows";

/// Repository interface for row operations.
pub trait RowRepository {
    /// Creates one row and returns the stored record.
    fn create_row(&self, table_id: TableId, cells: &Cells) -> RepoResult<Row>;
    /// Loads one row by id.
    fn get_row(&self, id: RowId) -> RepoResult<Option<Row>>;
    /// Lists rows of one table.
    fn list_rows(&self, table_id: TableId) -> RepoResult<Vec<Row>>;
    /// Replaces the cells map of one row.
    fn replace_cells(&self, id: RowId, cells: &Cells) -> RepoResult<Row>;
    /// Deletes one row and returns it.
    fn delete_row(&self, id: RowId) -> RepoResult<Row>;
}

/// SQLite-backed row repository.
pub struct SqliteRowRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteRowRepository<'conn> {
    /// Creates repository from migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl RowRepository for SqliteRowRepository<'_> {
    fn create_row(&self, table_id: TableId, cells: &Cells) -> RepoResult<Row> {
        let id = new_record_id();
        self.conn.execute(
            "INSERT INTO data_rows (id, table_id, cells) VALUES (?1, ?2, ?3);",
            params![id.to_string(), table_id.to_string(), cells_to_db(cells)?],
        )?;

        load_row(self.conn, id)?
            .ok_or_else(|| RepoError::InvalidData(format!("created row {id} missing in read-back")))
    }

    fn get_row(&self, id: RowId) -> RepoResult<Option<Row>> {
        load_row(self.conn, id)
    }

    fn list_rows(&self, table_id: TableId) -> RepoResult<Vec<Row>> {
        let mut stmt = self.conn.prepare(&format!(
            "{ROW_SELECT_SQL} WHERE table_id = ?1 ORDER BY rowid ASC;"
        ))?;
        let mut rows = stmt.query([table_id.to_string()])?;
        let mut items = Vec::new();
        while let Some(row) = rows.next()? {
            items.push(parse_row(row)?);
        }
        Ok(items)
    }

    fn replace_cells(&self, id: RowId, cells: &Cells) -> RepoResult<Row> {
        let changed = self.conn.execute(
            &format!(
                "UPDATE data_rows
                 SET cells = ?2,
                     updated_at = {NOW_EPOCH_MS_SQL}
                 WHERE id = ?1;"
            ),
            params![id.to_string(), cells_to_db(cells)?],
        )?;
        if changed == 0 {
            return Err(not_found(id));
        }

        load_row(self.conn, id)?.ok_or_else(|| not_found(id))
    }

    fn delete_row(&self, id: RowId) -> RepoResult<Row> {
        let row = load_row(self.conn, id)?.ok_or_else(|| not_found(id))?;
        let changed = self
            .conn
            .execute("DELETE FROM data_rows WHERE id = ?1;", [id.to_string()])?;
        if changed == 0 {
            return Err(not_found(id));
        }
        Ok(row)
    }
}

fn load_row(conn: &Connection, id: RowId) -> RepoResult<Option<Row>> {
    conn.query_row(
        &format!("{ROW_SELECT_SQL} WHERE id = ?1;"),
        [id.to_string()],
        |row| Ok(parse_row(row)),
    )
    .optional()?
    .transpose()
}

fn parse_row(row: &rusqlite::Row<'_>) -> RepoResult<Row> {
    let id_text: String = row.get("id")?;
    let table_id_text: String = row.get("table_id")?;
    let cells_text: String = row.get("cells")?;
    let cells: Cells = serde_json::from_str(&cells_text).map_err(|err| {
        RepoError::InvalidData(format!("invalid cells in data_rows.cells: {err}"))
    })?;

    Ok(Row {
        id: parse_stored_id(&id_text, "data_rows.id")?,
        table_id: parse_stored_id(&table_id_text, "data_rows.table_id")?,
        cells,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

fn cells_to_db(cells: &Cells) -> RepoResult<String> {
    serde_json::to_string(cells)
        .map_err(|err| RepoError::InvalidData(format!("unserializable cells: {err}")))
}

fn not_found(id: RowId) -> RepoError {
    RepoError::NotFound {
        entity: EntityKind::Row,
        id,
    }
}
