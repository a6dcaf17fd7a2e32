//! HTTP/JSON adapter for the data-table backend.
//!
//! # Responsibility
//! - Expose table/column/row use-cases as REST endpoints under `/api`.
//! - Validate identifiers and request bodies before touching the store.
//! - Map service outcomes onto status codes and JSON payloads.
//!
//! # Invariants
//! - Handlers never panic on caller input.
//! - The store connection is reached only through `AppState`.

pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use error::{ApiError, ErrorResponse};
pub use routes::router;
pub use state::AppState;
