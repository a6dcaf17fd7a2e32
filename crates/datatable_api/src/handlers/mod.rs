//! HTTP endpoint handlers.
//!
//! - `/health` - liveness probe
//! - `/api/table*` - table endpoints
//! - `/api/column*` - column endpoints
//! - `/api/row*` - row endpoints

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use datatable_core::{parse_record_id, EntityKind, RecordId};
use serde::Serialize;

use crate::error::{ApiError, ErrorResponse};

pub mod column;
pub mod row;
pub mod table;

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Health check endpoint. Does not touch the store.
pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, Json(HealthResponse { status: "ok" }))
}

/// Fallback for unknown routes.
pub async fn route_not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse::new("Route not found")),
    )
}

/// Validates a caller-supplied identifier before any store access.
pub(crate) fn parse_id(raw: &str, entity: EntityKind) -> Result<RecordId, ApiError> {
    parse_record_id(raw).map_err(|source| ApiError::InvalidIdentifier { entity, source })
}

/// Validates an optional body identifier; absence counts as malformed.
pub(crate) fn parse_body_id(raw: Option<&str>, entity: EntityKind) -> Result<RecordId, ApiError> {
    parse_id(raw.unwrap_or_default(), entity)
}
