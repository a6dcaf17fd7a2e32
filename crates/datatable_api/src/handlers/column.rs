//! Column endpoints.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::Json;
use datatable_core::{
    Column, ColumnOption, ColumnPatch, ColumnService, ColumnType, EntityKind,
    ModelValidationError, NewColumn, ServiceResult, SqliteColumnRepository,
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, ServiceResultExt};
use crate::handlers::{parse_body_id, parse_id};
use crate::state::AppState;

/// Request body for creating a column.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateColumnRequest {
    #[serde(default)]
    pub table_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub options: Option<Vec<ColumnOption>>,
    #[serde(default)]
    pub order: Option<i64>,
}

/// Request body for a partial column update.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateColumnRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub options: Option<Vec<ColumnOption>>,
    #[serde(default)]
    pub order: Option<i64>,
}

/// Response body for column deletion.
#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteColumnResponse {
    pub message: String,
    pub column: Column,
}

fn column_service(conn: &Connection) -> ServiceResult<ColumnService<SqliteColumnRepository<'_>>> {
    Ok(ColumnService::new(SqliteColumnRepository::try_new(conn)?))
}

/// `POST /api/column`
///
/// The owning table is not required to exist.
pub async fn create_column(
    State(state): State<AppState>,
    body: Result<Json<CreateColumnRequest>, JsonRejection>,
) -> Result<Json<Column>, ApiError> {
    const ACTION: &str = "Failed to create column";

    let Json(request) = body?;
    let table_id = parse_body_id(request.table_id.as_deref(), EntityKind::Table)?;
    let kind = request
        .kind
        .as_deref()
        .ok_or(ModelValidationError::MissingColumnType)
        .and_then(ColumnType::parse)
        .map_err(|err| ApiError::validation(ACTION, err))?;

    let draft = NewColumn {
        table_id,
        name: request.name.unwrap_or_default(),
        kind,
        options: request.options.unwrap_or_default(),
        order: request.order.unwrap_or(0),
    };

    let column = state
        .run(move |conn| {
            column_service(conn)
                .and_then(|service| service.create_column(&draft))
                .context(ACTION)
        })
        .await?;
    Ok(Json(column))
}

/// `GET /api/column/table/{table_id}`
pub async fn list_columns(
    State(state): State<AppState>,
    Path(table_id): Path<String>,
) -> Result<Json<Vec<Column>>, ApiError> {
    let table_id = parse_id(&table_id, EntityKind::Table)?;
    let columns = state
        .run(move |conn| {
            column_service(conn)
                .and_then(|service| service.list_columns(table_id))
                .context("Failed to fetch columns")
        })
        .await?;
    Ok(Json(columns))
}

/// `GET /api/column/{id}`
pub async fn get_column(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Column>, ApiError> {
    let id = parse_id(&id, EntityKind::Column)?;
    let column = state
        .run(move |conn| {
            column_service(conn)
                .and_then(|service| service.get_column(id))
                .context("Failed to fetch column")
        })
        .await?;
    Ok(Json(column))
}

/// `PUT /api/column/{id}`
pub async fn update_column(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<UpdateColumnRequest>, JsonRejection>,
) -> Result<Json<Column>, ApiError> {
    const ACTION: &str = "Failed to update column";

    let id = parse_id(&id, EntityKind::Column)?;
    let Json(request) = body?;
    let kind = request
        .kind
        .as_deref()
        .map(ColumnType::parse)
        .transpose()
        .map_err(|err| ApiError::validation(ACTION, err))?;

    let patch = ColumnPatch {
        name: request.name,
        kind,
        options: request.options,
        order: request.order,
    };

    let column = state
        .run(move |conn| {
            column_service(conn)
                .and_then(|service| service.update_column(id, &patch))
                .context(ACTION)
        })
        .await?;
    Ok(Json(column))
}

/// `DELETE /api/column/{id}`
///
/// Also removes the column's cell from every row of its table.
pub async fn delete_column(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteColumnResponse>, ApiError> {
    let id = parse_id(&id, EntityKind::Column)?;
    let column = state
        .run(move |conn| {
            column_service(conn)
                .and_then(|service| service.delete_column(id))
                .context("Failed to delete column")
        })
        .await?;
    Ok(Json(DeleteColumnResponse {
        message: "Column deleted successfully".to_string(),
        column,
    }))
}
