//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Map repository outcomes into the caller-facing error taxonomy.
//! - Keep HTTP/adapter layers decoupled from storage details.

use crate::model::id::RecordId;
use crate::model::ModelValidationError;
use crate::repo::{EntityKind, RepoError};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod column_service;
pub mod row_service;
pub mod table_service;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Errors from table/column/row use-cases.
#[derive(Debug)]
pub enum ServiceError {
    /// Required field missing or malformed.
    Validation(ModelValidationError),
    /// Well-formed identifier with no matching record.
    NotFound { entity: EntityKind, id: RecordId },
    /// Unexpected persistence failure.
    Repo(RepoError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound { entity, id } => write!(f, "{entity} not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::NotFound { .. } => None,
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(err) => Self::Validation(err),
            RepoError::NotFound { entity, id } => Self::NotFound { entity, id },
            other => Self::Repo(other),
        }
    }
}

impl From<ModelValidationError> for ServiceError {
    fn from(value: ModelValidationError) -> Self {
        Self::Validation(value)
    }
}

pub(crate) fn require_found<T>(
    value: Option<T>,
    entity: EntityKind,
    id: RecordId,
) -> ServiceResult<T> {
    value.ok_or(ServiceError::NotFound { entity, id })
}
