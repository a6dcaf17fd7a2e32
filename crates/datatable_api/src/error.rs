//! HTTP error handling and response formatting.
//!
//! Every failure leaves a handler as an `ApiError`, which renders as a JSON
//! body with a `message` and, for store failures, the underlying `error`.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use datatable_core::{EntityKind, InvalidRecordId, ModelValidationError, ServiceError};
use log::{debug, error};
use serde::{Deserialize, Serialize};

/// JSON error response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub message: String,
    /// Underlying store error text; present only for server-side failures.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            error: None,
        }
    }

    pub fn with_error(message: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            error: Some(error.into()),
        }
    }
}

/// Application error type that converts to HTTP responses.
#[derive(Debug)]
pub enum ApiError {
    /// Identifier from path or body is not well-formed.
    InvalidIdentifier {
        entity: EntityKind,
        source: InvalidRecordId,
    },
    /// Request body could not be parsed or has the wrong shape.
    BadRequest(String),
    /// Use-case failure, tagged with the action that was attempted.
    Service {
        action: &'static str,
        source: ServiceError,
    },
    /// Failure outside the store, e.g. a panicked blocking task.
    Internal(String),
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::InvalidIdentifier { entity, source } => {
                write!(f, "invalid {entity} id: {source}")
            }
            ApiError::BadRequest(msg) => write!(f, "bad request: {msg}"),
            ApiError::Service { action, source } => write!(f, "{action}: {source}"),
            ApiError::Internal(msg) => write!(f, "internal error: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ApiError::InvalidIdentifier { source, .. } => Some(source),
            ApiError::Service { source, .. } => Some(source),
            ApiError::BadRequest(_) | ApiError::Internal(_) => None,
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl ApiError {
    /// Wraps a shape violation caught before the service was reached.
    pub fn validation(action: &'static str, err: ModelValidationError) -> Self {
        ApiError::Service {
            action,
            source: ServiceError::Validation(err),
        }
    }

    /// Status code this error maps to.
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidIdentifier { .. } | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Service { source, .. } => match source {
                ServiceError::Validation(_) => StatusCode::BAD_REQUEST,
                ServiceError::NotFound { .. } => StatusCode::NOT_FOUND,
                ServiceError::Repo(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            ApiError::InvalidIdentifier { entity, .. } => {
                ErrorResponse::new(format!("Invalid {entity} id"))
            }
            ApiError::BadRequest(msg) => ErrorResponse::new(msg.clone()),
            ApiError::Service { action, source } => match source {
                ServiceError::Validation(err) => ErrorResponse::new(err.to_string()),
                ServiceError::NotFound { entity, .. } => {
                    ErrorResponse::new(format!("{} not found", entity_label(*entity)))
                }
                ServiceError::Repo(err) => ErrorResponse::with_error(*action, err.to_string()),
            },
            ApiError::Internal(msg) => {
                ErrorResponse::with_error("Internal server error", msg.clone())
            }
        };

        if status.is_server_error() {
            error!(
                "event=request_failed module=api status=error http_status={} error={}",
                status.as_u16(),
                self
            );
        } else {
            debug!(
                "event=request_rejected module=api status=error http_status={} error={}",
                status.as_u16(),
                self
            );
        }

        (status, Json(body)).into_response()
    }
}

/// Attaches the attempted action to service results.
pub trait ServiceResultExt<T> {
    fn context(self, action: &'static str) -> Result<T, ApiError>;
}

impl<T> ServiceResultExt<T> for Result<T, ServiceError> {
    fn context(self, action: &'static str) -> Result<T, ApiError> {
        self.map_err(|source| ApiError::Service { action, source })
    }
}

fn entity_label(entity: EntityKind) -> &'static str {
    match entity {
        EntityKind::Table => "Table",
        EntityKind::Column => "Column",
        EntityKind::Row => "Row",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use datatable_core::RepoError;
    use uuid::Uuid;

    #[test]
    fn error_response_omits_missing_error_text() {
        let json = serde_json::to_string(&ErrorResponse::new("Table not found")).unwrap();
        assert_eq!(json, r#"{"message":"Table not found"}"#);
    }

    #[test]
    fn status_follows_error_taxonomy() {
        let invalid = ApiError::InvalidIdentifier {
            entity: EntityKind::Row,
            source: InvalidRecordId("x".into()),
        };
        assert_eq!(invalid.status(), StatusCode::BAD_REQUEST);

        let not_found = ApiError::Service {
            action: "Failed to fetch table",
            source: ServiceError::NotFound {
                entity: EntityKind::Table,
                id: Uuid::new_v4(),
            },
        };
        assert_eq!(not_found.status(), StatusCode::NOT_FOUND);

        let validation =
            ApiError::validation("Failed to create table", ModelValidationError::BlankTableName);
        assert_eq!(validation.status(), StatusCode::BAD_REQUEST);

        let store = ApiError::Service {
            action: "Failed to create table",
            source: ServiceError::Repo(RepoError::InvalidData("broken".into())),
        };
        assert_eq!(store.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(store.to_string(), "Failed to create table: invalid persisted data: broken");
    }
}
