//! Router assembly.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{self, column, row, table};
use crate::state::AppState;

/// Path prefix shared by every data endpoint.
pub const API_PREFIX: &str = "/api";

/// Builds the full application router over `state`.
pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .route("/table", post(table::create_table).get(table::list_tables))
        .route(
            "/table/{id}",
            get(table::get_table)
                .put(table::rename_table)
                .delete(table::delete_table),
        )
        .route("/column", post(column::create_column))
        .route("/column/table/{table_id}", get(column::list_columns))
        .route(
            "/column/{id}",
            get(column::get_column)
                .put(column::update_column)
                .delete(column::delete_column),
        )
        .route("/row", post(row::create_row))
        .route("/row/table/{table_id}", get(row::list_rows))
        .route(
            "/row/{id}",
            get(row::get_row)
                .put(row::update_row)
                .delete(row::delete_row),
        );

    Router::new()
        .route("/health", get(handlers::health))
        .nest(API_PREFIX, api)
        .fallback(handlers::route_not_found)
        .with_state(state)
}
