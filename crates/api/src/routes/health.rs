//! Root-level liveness probe.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

use crate::response::DataResponse;
use crate::state::AppState;

/// Liveness report. The endpoint answers 200 while the process is serving;
/// `database` tells whether the pool could round-trip a query.
#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub version: &'static str,
    pub database: &'static str,
}

/// GET /health
async fn health(State(state): State<AppState>) -> Json<DataResponse<HealthStatus>> {
    let database = match musiclib_db::health_check(&state.pool).await {
        Ok(()) => "up",
        Err(err) => {
            tracing::warn!(error = %err, "Database ping failed");
            "down"
        }
    };

    Json(DataResponse {
        data: HealthStatus {
            status: if database == "up" { "ok" } else { "degraded" },
            version: env!("CARGO_PKG_VERSION"),
            database,
        },
    })
}

/// Health routes, merged at the root rather than under `/api/v1`.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health))
}
