//! Song entity models and DTOs.
//!
//! A song is split across two tables: `songs` (identity, group, title) and
//! `song_details` (release date, lyrics, link), joined 1:1 on `song_id`.

use musiclib_core::release_date;
use musiclib_core::types::{DbId, ReleaseDate, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::query::SqlValue;

/// A row from the `songs` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Song {
    pub id: DbId,
    #[sqlx(rename = "group_name")]
    #[serde(rename = "group")]
    pub group: String,
    #[sqlx(rename = "song_name")]
    #[serde(rename = "song")]
    pub title: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `song_details` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SongDetail {
    pub song_id: DbId,
    #[serde(serialize_with = "release_date::serialize_opt")]
    pub release_date: Option<ReleaseDate>,
    pub text: Option<String>,
    pub link: Option<String>,
    pub updated_at: Timestamp,
}

/// Joined projection of a song and its details.
///
/// Listing queries select only the requested columns, so every field is
/// optional and absent columns decode as `None`.
#[derive(Debug, Clone, Default, PartialEq, FromRow, Serialize)]
pub struct SongWithDetails {
    #[sqlx(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub song_id: Option<DbId>,
    #[sqlx(default, rename = "group_name")]
    #[serde(rename = "group", skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    #[sqlx(default, rename = "song_name")]
    #[serde(rename = "song", skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[sqlx(default)]
    #[serde(
        serialize_with = "release_date::serialize_opt",
        skip_serializing_if = "Option::is_none"
    )]
    pub release_date: Option<ReleaseDate>,
    #[sqlx(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[sqlx(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

// ---------------------------------------------------------------------------
// Write DTOs
// ---------------------------------------------------------------------------

/// DTO for creating a song (`POST /songs` body: `{"group", "song"}`).
///
/// Missing fields deserialize as empty strings so the handler can reject
/// them with a uniform validation error.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateSong {
    #[serde(default)]
    pub group: String,
    #[serde(default, rename = "song", alias = "title")]
    pub title: String,
}

/// Partial update of the `songs` row. Only `Some` fields are written.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateSong {
    pub group: Option<String>,
    pub title: Option<String>,
}

impl UpdateSong {
    pub fn is_empty(&self) -> bool {
        self.assignments().is_empty()
    }

    /// `(column, value)` pairs for the SET clause, present fields only.
    pub fn assignments(&self) -> Vec<(&'static str, SqlValue)> {
        let mut set = Vec::new();
        if let Some(group) = &self.group {
            set.push(("group_name", SqlValue::Text(group.clone())));
        }
        if let Some(title) = &self.title {
            set.push(("song_name", SqlValue::Text(title.clone())));
        }
        set
    }
}

/// Partial update of the `song_details` row. Only `Some` fields are written.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateSongDetails {
    pub release_date: Option<ReleaseDate>,
    pub text: Option<String>,
    pub link: Option<String>,
}

impl UpdateSongDetails {
    pub fn is_empty(&self) -> bool {
        self.assignments().is_empty()
    }

    /// `(column, value)` pairs for the SET clause, present fields only.
    pub fn assignments(&self) -> Vec<(&'static str, SqlValue)> {
        let mut set = Vec::new();
        if let Some(date) = self.release_date {
            set.push(("release_date", SqlValue::Date(date)));
        }
        if let Some(text) = &self.text {
            set.push(("text", SqlValue::Text(text.clone())));
        }
        if let Some(link) = &self.link {
            set.push(("link", SqlValue::Text(link.clone())));
        }
        set
    }
}

/// `PATCH /songs/{id}` body: `{"song": {...}, "song_details": {...}}`.
///
/// Dates arrive as `dd.mm.yyyy` strings and are parsed by the handler.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateSongRequest {
    #[serde(default)]
    pub song: Option<UpdateSongBody>,
    #[serde(default)]
    pub song_details: Option<UpdateSongDetailsBody>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateSongBody {
    pub group: Option<String>,
    #[serde(rename = "song", alias = "title")]
    pub title: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateSongDetailsBody {
    pub release_date: Option<String>,
    pub text: Option<String>,
    pub link: Option<String>,
}
