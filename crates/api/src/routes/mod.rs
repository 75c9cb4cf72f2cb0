pub mod health;
pub mod songs;

use axum::routing::get;
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /songs                  list, create
/// /songs/{id}             update (PATCH), delete
/// /songs/{id}/lyrics      paginated couplets
///
/// /info                   lookup by group + song
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/songs", songs::router())
        .route("/info", get(handlers::songs::info))
}
