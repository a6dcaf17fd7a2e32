use datatable_core::db::open_db_in_memory;
use datatable_core::{
    Cells, ColumnService, ColumnType, NewColumn, RowService, ServiceError,
    SqliteColumnRepository, SqliteRowRepository, SqliteTableRepository, TableService,
};
use rusqlite::Connection;
use serde_json::json;

struct Services<'conn> {
    tables: TableService<SqliteTableRepository<'conn>>,
    columns: ColumnService<SqliteColumnRepository<'conn>>,
    rows: RowService<SqliteRowRepository<'conn>>,
}

fn services(conn: &Connection) -> Services<'_> {
    Services {
        tables: TableService::new(SqliteTableRepository::try_new(conn).unwrap()),
        columns: ColumnService::new(SqliteColumnRepository::try_new(conn).unwrap()),
        rows: RowService::new(SqliteRowRepository::try_new(conn).unwrap()),
    }
}

fn cells(value: serde_json::Value) -> Cells {
    value.as_object().cloned().unwrap()
}

#[test]
fn deleting_table_removes_its_columns_and_rows_only() {
    let conn = open_db_in_memory().unwrap();
    let svc = services(&conn);

    let doomed = svc.tables.create_table("Doomed").unwrap();
    let kept = svc.tables.create_table("Kept").unwrap();

    let doomed_col = svc
        .columns
        .create_column(&NewColumn::new(doomed.id, "A", ColumnType::Text))
        .unwrap();
    let kept_col = svc
        .columns
        .create_column(&NewColumn::new(kept.id, "B", ColumnType::Text))
        .unwrap();
    svc.rows
        .create_row(doomed.id, &cells(json!({ doomed_col.id.to_string(): "x" })))
        .unwrap();
    svc.rows
        .create_row(doomed.id, &Cells::new())
        .unwrap();
    let kept_row = svc
        .rows
        .create_row(kept.id, &cells(json!({ kept_col.id.to_string(): "y" })))
        .unwrap();

    svc.tables.delete_table(doomed.id).unwrap();

    assert!(svc.columns.list_columns(doomed.id).unwrap().is_empty());
    assert!(svc.rows.list_rows(doomed.id).unwrap().is_empty());
    assert_eq!(svc.columns.list_columns(kept.id).unwrap(), vec![kept_col]);
    assert_eq!(svc.rows.list_rows(kept.id).unwrap(), vec![kept_row]);
}

#[test]
fn deleting_column_strips_cells_from_rows_of_its_table() {
    let conn = open_db_in_memory().unwrap();
    let svc = services(&conn);

    let table = svc.tables.create_table("Inventory").unwrap();
    let other = svc.tables.create_table("Other").unwrap();
    let sku = svc
        .columns
        .create_column(&NewColumn::new(table.id, "SKU", ColumnType::Text))
        .unwrap();
    let qty = svc
        .columns
        .create_column(&NewColumn::new(table.id, "Qty", ColumnType::Text))
        .unwrap();
    let sku_key = sku.id.to_string();
    let qty_key = qty.id.to_string();

    let with_both = svc
        .rows
        .create_row(
            table.id,
            &cells(json!({ sku_key.clone(): "A100", qty_key.clone(): 3 })),
        )
        .unwrap();
    let without_sku = svc
        .rows
        .create_row(table.id, &cells(json!({ qty_key.clone(): 7 })))
        .unwrap();
    // Same key in a row of a different table must survive.
    let foreign = svc
        .rows
        .create_row(other.id, &cells(json!({ sku_key.clone(): "keep" })))
        .unwrap();

    let deleted = svc.columns.delete_column(sku.id).unwrap();
    assert_eq!(deleted, sku);

    let rows = svc.rows.list_rows(table.id).unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].id, with_both.id);
    assert_eq!(rows[0].cells, cells(json!({ qty_key.clone(): 3 })));
    assert_eq!(rows[1].id, without_sku.id);
    assert_eq!(rows[1].cells, without_sku.cells);
    assert_eq!(rows[1].updated_at, without_sku.updated_at);

    assert_eq!(svc.rows.get_row(foreign.id).unwrap(), foreign);
    assert_eq!(svc.columns.list_columns(table.id).unwrap(), vec![qty]);
}

#[test]
fn deleting_row_has_no_side_effects() {
    let conn = open_db_in_memory().unwrap();
    let svc = services(&conn);

    let table = svc.tables.create_table("T").unwrap();
    let column = svc
        .columns
        .create_column(&NewColumn::new(table.id, "C", ColumnType::Text))
        .unwrap();
    let row = svc.rows.create_row(table.id, &Cells::new()).unwrap();

    svc.rows.delete_row(row.id).unwrap();

    assert_eq!(svc.tables.get_table(table.id).unwrap(), table);
    assert_eq!(svc.columns.list_columns(table.id).unwrap(), vec![column]);
}

#[test]
fn failed_table_delete_rolls_back_child_deletes() {
    let conn = open_db_in_memory().unwrap();
    let svc = services(&conn);

    let table = svc.tables.create_table("Inventory").unwrap();
    let column = svc
        .columns
        .create_column(&NewColumn::new(table.id, "SKU", ColumnType::Text))
        .unwrap();
    let row = svc
        .rows
        .create_row(table.id, &cells(json!({ column.id.to_string(): "A100" })))
        .unwrap();

    // Fires on the last statement of the cascade, after rows and columns are gone.
    conn.execute_batch(
        "CREATE TRIGGER block_table_delete BEFORE DELETE ON data_tables
         BEGIN SELECT RAISE(ABORT, 'boom'); END;",
    )
    .unwrap();

    let err = svc.tables.delete_table(table.id).unwrap_err();
    assert!(matches!(err, ServiceError::Repo(_)), "{err:?}");

    assert_eq!(svc.tables.get_table(table.id).unwrap(), table);
    assert_eq!(svc.columns.list_columns(table.id).unwrap(), vec![column]);
    assert_eq!(svc.rows.list_rows(table.id).unwrap(), vec![row]);
}

#[test]
fn failed_column_delete_keeps_cells() {
    let conn = open_db_in_memory().unwrap();
    let svc = services(&conn);

    let table = svc.tables.create_table("Inventory").unwrap();
    let column = svc
        .columns
        .create_column(&NewColumn::new(table.id, "SKU", ColumnType::Text))
        .unwrap();
    let row = svc
        .rows
        .create_row(table.id, &cells(json!({ column.id.to_string(): "A100" })))
        .unwrap();

    conn.execute_batch(
        "CREATE TRIGGER block_column_delete BEFORE DELETE ON data_columns
         BEGIN SELECT RAISE(ABORT, 'boom'); END;",
    )
    .unwrap();

    let err = svc.columns.delete_column(column.id).unwrap_err();
    assert!(matches!(err, ServiceError::Repo(_)), "{err:?}");
    assert_eq!(svc.columns.list_columns(table.id).unwrap(), vec![column]);
    assert_eq!(svc.rows.list_rows(table.id).unwrap(), vec![row]);
}

#[test]
fn failed_cell_strip_restores_deleted_column() {
    let conn = open_db_in_memory().unwrap();
    let svc = services(&conn);

    let table = svc.tables.create_table("Inventory").unwrap();
    let column = svc
        .columns
        .create_column(&NewColumn::new(table.id, "SKU", ColumnType::Text))
        .unwrap();
    let row = svc
        .rows
        .create_row(table.id, &cells(json!({ column.id.to_string(): "A100" })))
        .unwrap();

    // Column row is already deleted inside the transaction when this fires.
    conn.execute_batch(
        "CREATE TRIGGER block_cell_strip BEFORE UPDATE ON data_rows
         BEGIN SELECT RAISE(ABORT, 'boom'); END;",
    )
    .unwrap();

    let err = svc.columns.delete_column(column.id).unwrap_err();
    assert!(matches!(err, ServiceError::Repo(_)), "{err:?}");
    assert_eq!(svc.columns.get_column(column.id).unwrap(), column);
    assert_eq!(svc.rows.get_row(row.id).unwrap(), row);
}
