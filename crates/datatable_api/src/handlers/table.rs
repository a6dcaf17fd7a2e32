//! Table endpoints.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use datatable_core::{EntityKind, ServiceResult, SqliteTableRepository, Table, TableService};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, ServiceResultExt};
use crate::handlers::parse_id;
use crate::state::AppState;

/// Request body for creating or renaming a table.
#[derive(Debug, Default, Deserialize)]
pub struct TableNameRequest {
    #[serde(default)]
    pub name: Option<String>,
}

/// Response body for table deletion.
#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteTableResponse {
    pub message: String,
    pub table: Table,
}

fn table_service(conn: &Connection) -> ServiceResult<TableService<SqliteTableRepository<'_>>> {
    Ok(TableService::new(SqliteTableRepository::try_new(conn)?))
}

/// `POST /api/table`
pub async fn create_table(
    State(state): State<AppState>,
    body: Result<Json<TableNameRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Table>), ApiError> {
    let Json(request) = body?;
    let name = request.name.unwrap_or_default();

    let table = state
        .run(move |conn| {
            table_service(conn)
                .and_then(|service| service.create_table(&name))
                .context("Failed to create table")
        })
        .await?;
    Ok((StatusCode::CREATED, Json(table)))
}

/// `GET /api/table`
pub async fn list_tables(State(state): State<AppState>) -> Result<Json<Vec<Table>>, ApiError> {
    let tables = state
        .run(|conn| {
            table_service(conn)
                .and_then(|service| service.list_tables())
                .context("Failed to fetch tables")
        })
        .await?;
    Ok(Json(tables))
}

/// `GET /api/table/{id}`
pub async fn get_table(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Table>, ApiError> {
    let id = parse_id(&id, EntityKind::Table)?;
    let table = state
        .run(move |conn| {
            table_service(conn)
                .and_then(|service| service.get_table(id))
                .context("Failed to fetch table")
        })
        .await?;
    Ok(Json(table))
}

/// `PUT /api/table/{id}`
pub async fn rename_table(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<TableNameRequest>, JsonRejection>,
) -> Result<Json<Table>, ApiError> {
    let id = parse_id(&id, EntityKind::Table)?;
    let Json(request) = body?;
    let name = request.name.unwrap_or_default();

    let table = state
        .run(move |conn| {
            table_service(conn)
                .and_then(|service| service.rename_table(id, &name))
                .context("Failed to update table")
        })
        .await?;
    Ok(Json(table))
}

/// `DELETE /api/table/{id}`
///
/// Removes the table's columns and rows as well.
pub async fn delete_table(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteTableResponse>, ApiError> {
    let id = parse_id(&id, EntityKind::Table)?;
    let table = state
        .run(move |conn| {
            table_service(conn)
                .and_then(|service| service.delete_table(id))
                .context("Failed to delete table")
        })
        .await?;
    Ok(Json(DeleteTableResponse {
        message: "Table deleted successfully".to_string(),
        table,
    }))
}
