//! Shared response envelope types for API handlers.
//!
//! All successful responses use a `{ "data": ... }` envelope. Use
//! [`DataResponse`] instead of ad-hoc `serde_json::json!({ "data": ... })`.

use musiclib_core::types::DbId;
use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
///
/// # Example
///
/// ```ignore
/// Ok(Json(DataResponse { data: songs }))
/// ```
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

/// Payload of `GET /songs/{id}/lyrics`.
#[derive(Debug, Serialize)]
pub struct LyricsPage {
    pub song_id: DbId,
    pub couplets: Vec<String>,
}

/// Payload of `PATCH /songs/{id}`: rows touched across both tables.
#[derive(Debug, Serialize)]
pub struct UpdatedSong {
    pub song_id: DbId,
    pub updated: u64,
}

/// Payload of `DELETE /songs/{id}`.
#[derive(Debug, Serialize)]
pub struct DeletedSong {
    pub song_id: DbId,
    pub deleted: u64,
}
