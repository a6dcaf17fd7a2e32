//! Row endpoints.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::Json;
use datatable_core::{Cells, EntityKind, Row, RowService, ServiceResult, SqliteRowRepository};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ApiError, ServiceResultExt};
use crate::handlers::{parse_body_id, parse_id};
use crate::state::AppState;

/// Request body for creating a row.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRowRequest {
    #[serde(default)]
    pub table_id: Option<String>,
    #[serde(default)]
    pub cells: Option<Value>,
}

/// Request body for replacing a row's cells.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateRowRequest {
    #[serde(default)]
    pub cells: Option<Value>,
}

/// Response body for row deletion.
#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteRowResponse {
    pub message: String,
    pub row: Row,
}

fn row_service(conn: &Connection) -> ServiceResult<RowService<SqliteRowRepository<'_>>> {
    Ok(RowService::new(SqliteRowRepository::try_new(conn)?))
}

fn cells_object(value: Value) -> Result<Cells, ApiError> {
    match value {
        Value::Object(cells) => Ok(cells),
        _ => Err(ApiError::BadRequest("cells must be a JSON object".to_string())),
    }
}

/// `POST /api/row`
///
/// Neither the table nor the cell keys are checked for existence.
pub async fn create_row(
    State(state): State<AppState>,
    body: Result<Json<CreateRowRequest>, JsonRejection>,
) -> Result<Json<Row>, ApiError> {
    let Json(request) = body?;
    let table_id = parse_body_id(request.table_id.as_deref(), EntityKind::Table)?;
    let cells = match request.cells {
        Some(value) => cells_object(value)?,
        None => Cells::new(),
    };

    let row = state
        .run(move |conn| {
            row_service(conn)
                .and_then(|service| service.create_row(table_id, &cells))
                .context("Failed to create row")
        })
        .await?;
    Ok(Json(row))
}

/// `GET /api/row/table/{table_id}`
pub async fn list_rows(
    State(state): State<AppState>,
    Path(table_id): Path<String>,
) -> Result<Json<Vec<Row>>, ApiError> {
    let table_id = parse_id(&table_id, EntityKind::Table)?;
    let rows = state
        .run(move |conn| {
            row_service(conn)
                .and_then(|service| service.list_rows(table_id))
                .context("Failed to fetch rows")
        })
        .await?;
    Ok(Json(rows))
}

/// `GET /api/row/{id}`
pub async fn get_row(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Row>, ApiError> {
    let id = parse_id(&id, EntityKind::Row)?;
    let row = state
        .run(move |conn| {
            row_service(conn)
                .and_then(|service| service.get_row(id))
                .context("Failed to fetch row")
        })
        .await?;
    Ok(Json(row))
}

/// `PUT /api/row/{id}`
///
/// Replaces the whole cells map; omitted cells are dropped.
pub async fn update_row(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<UpdateRowRequest>, JsonRejection>,
) -> Result<Json<Row>, ApiError> {
    let id = parse_id(&id, EntityKind::Row)?;
    let Json(request) = body?;
    let cells = request
        .cells
        .ok_or_else(|| ApiError::BadRequest("cells is required".to_string()))
        .and_then(cells_object)?;

    let row = state
        .run(move |conn| {
            row_service(conn)
                .and_then(|service| service.update_row_cells(id, &cells))
                .context("Failed to update row")
        })
        .await?;
    Ok(Json(row))
}

/// `DELETE /api/row/{id}`
pub async fn delete_row(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteRowResponse>, ApiError> {
    let id = parse_id(&id, EntityKind::Row)?;
    let row = state
        .run(move |conn| {
            row_service(conn)
                .and_then(|service| service.delete_row(id))
                .context("Failed to delete row")
        })
        .await?;
    Ok(Json(DeleteRowResponse {
        message: "Row deleted successfully".to_string(),
        row,
    }))
}
