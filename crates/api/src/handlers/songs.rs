//! Handlers for the `/songs` resource and the `/info` lookup.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use musiclib_core::error::CoreError;
use musiclib_core::lyrics::paginate_couplets;
use musiclib_core::release_date::parse_release_date;
use musiclib_core::types::DbId;
use musiclib_db::models::song::{
    CreateSong, UpdateSong, UpdateSongBody, UpdateSongDetails, UpdateSongDetailsBody,
    UpdateSongRequest,
};
use musiclib_db::repositories::SongRepo;
use musiclib_db::transaction::transaction;

use crate::error::{AppError, AppResult};
use crate::middleware::extract::{ApiJson, ApiQuery, SongIdPath};
use crate::query::{PaginationParams, SongInfoParams, SongListParams};
use crate::response::{DataResponse, DeletedSong, LyricsPage, UpdatedSong};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/songs
///
/// Create a song together with its empty details row.
pub async fn create(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<CreateSong>,
) -> AppResult<impl IntoResponse> {
    validate_create(&input)?;

    let song = transaction::<_, AppError, _>(&state.pool, move |conn| {
        Box::pin(async move {
            let song = SongRepo::create(&mut *conn, &input).await?;
            SongRepo::create_details(&mut *conn, song.id).await?;
            Ok::<_, AppError>(song)
        })
    })
    .await?;

    tracing::info!(song_id = song.id, group = %song.group, song = %song.title, "Song created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: song })))
}

/// GET /api/v1/songs?limit=&offset=&fields=&filter=
///
/// List songs with their details, filtered, projected and paginated.
pub async fn list(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<SongListParams>,
) -> AppResult<impl IntoResponse> {
    let query = params.to_list_query()?;
    let songs = SongRepo::list(&state.pool, &query).await?;
    Ok(Json(DataResponse { data: songs }))
}

/// GET /api/v1/songs/{id}/lyrics?limit=&offset=
///
/// Return the song text split into couplets, paginated by couplet.
pub async fn lyrics(
    State(state): State<AppState>,
    SongIdPath(id): SongIdPath,
    ApiQuery(params): ApiQuery<PaginationParams>,
) -> AppResult<impl IntoResponse> {
    let page = params.page()?;

    let text = SongRepo::find_text(&state.pool, id)
        .await?
        .ok_or_else(|| song_not_found(id))?;

    let couplets = paginate_couplets(text.as_deref(), page);
    Ok(Json(DataResponse {
        data: LyricsPage {
            song_id: id,
            couplets,
        },
    }))
}

/// PATCH /api/v1/songs/{id}
///
/// Partially update a song and its details in one transaction. Only the
/// fields present in the body are written.
pub async fn update(
    State(state): State<AppState>,
    SongIdPath(id): SongIdPath,
    ApiJson(input): ApiJson<UpdateSongRequest>,
) -> AppResult<impl IntoResponse> {
    let song = song_update(input.song)?;
    let details = details_update(input.song_details)?;

    let updated = transaction::<_, AppError, _>(&state.pool, move |conn| {
        Box::pin(async move {
            let song_rows = SongRepo::update_song(&mut *conn, id, &song).await?;
            let detail_rows = SongRepo::update_details(&mut *conn, id, &details).await?;
            Ok::<_, AppError>(song_rows + detail_rows)
        })
    })
    .await?;

    if updated == 0 {
        let details = format!("song_id={id}, nothing was updated");
        return Err(CoreError::not_found("song", details).into());
    }

    tracing::info!(song_id = id, rows = updated, "Song updated");
    Ok(Json(DataResponse {
        data: UpdatedSong {
            song_id: id,
            updated,
        },
    }))
}

/// DELETE /api/v1/songs/{id}
///
/// Delete a song; its details are removed by cascade.
pub async fn delete(
    State(state): State<AppState>,
    SongIdPath(id): SongIdPath,
) -> AppResult<impl IntoResponse> {
    let deleted = SongRepo::delete(&state.pool, id).await?;
    if deleted == 0 {
        return Err(song_not_found(id).into());
    }

    tracing::info!(song_id = id, "Song deleted");
    Ok(Json(DataResponse {
        data: DeletedSong {
            song_id: id,
            deleted,
        },
    }))
}

/// GET /api/v1/info?group=&song=
///
/// Look up one song with its details by exact group and title.
pub async fn info(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<SongInfoParams>,
) -> AppResult<impl IntoResponse> {
    let (group, title) = params.require()?;

    let song = SongRepo::find_with_details(&state.pool, group, title)
        .await?
        .ok_or_else(|| CoreError::not_found("song", format!("group={group}, song={title}")))?;

    Ok(Json(DataResponse { data: song }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn song_not_found(id: DbId) -> CoreError {
    CoreError::not_found("song", format!("song_id={id}"))
}

fn validate_create(input: &CreateSong) -> Result<(), CoreError> {
    if input.group.trim().is_empty() || input.title.trim().is_empty() {
        return Err(CoreError::invalid_parameter(
            "group and song are required",
            format!("group={:?}, song={:?}", input.group, input.title),
        ));
    }
    Ok(())
}

fn song_update(body: Option<UpdateSongBody>) -> Result<UpdateSong, CoreError> {
    let Some(body) = body else {
        return Ok(UpdateSong::default());
    };

    for (name, value) in [("group", &body.group), ("song", &body.title)] {
        if value.as_deref().is_some_and(|v| v.trim().is_empty()) {
            return Err(CoreError::invalid_parameter(
                format!("{name} must not be empty"),
                format!("{name}={:?}", value.as_deref().unwrap_or_default()),
            ));
        }
    }

    Ok(UpdateSong {
        group: body.group,
        title: body.title,
    })
}

/// A blank `release_date` is treated as absent; anything else must be
/// `dd.mm.yyyy`.
fn details_update(body: Option<UpdateSongDetailsBody>) -> Result<UpdateSongDetails, CoreError> {
    let Some(body) = body else {
        return Ok(UpdateSongDetails::default());
    };

    let release_date = match body.release_date.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(raw) => Some(parse_release_date(raw).ok_or_else(|| {
            CoreError::invalid_parameter(
                "could not parse the release_date, expected format is dd.mm.yyyy",
                format!("release_date={raw}"),
            )
        })?),
    };

    Ok(UpdateSongDetails {
        release_date,
        text: body.text,
        link: body.link,
    })
}
