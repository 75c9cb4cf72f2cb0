//! Repository for the `songs` and `song_details` tables.

use musiclib_core::types::DbId;
use sqlx::PgExecutor;

use crate::models::song::{CreateSong, Song, SongWithDetails, UpdateSong, UpdateSongDetails};
use crate::query::{bind_values, bind_values_as, SongListQuery, SqlArgs, SqlValue};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, group_name, song_name, created_at, updated_at";

/// Joined columns returned by a point lookup.
const DETAIL_COLUMNS: &str = "song_id, group_name, song_name, release_date, link, text";

/// Provides CRUD operations for songs and their details.
pub struct SongRepo;

impl SongRepo {
    /// Insert a new song, returning the created row.
    ///
    /// A duplicate `(group, song)` pair fails with the
    /// `uq_songs_group_name_song_name` unique violation.
    pub async fn create<'e, E>(executor: E, input: &CreateSong) -> Result<Song, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "INSERT INTO songs (group_name, song_name) VALUES ($1, $2) RETURNING {COLUMNS}"
        );
        let song = sqlx::query_as::<_, Song>(&query)
            .bind(&input.group)
            .bind(&input.title)
            .fetch_one(executor)
            .await?;

        tracing::debug!(song_id = song.id, group = %song.group, "Inserted song");
        Ok(song)
    }

    /// Insert the empty detail row for `song_id`.
    pub async fn create_details<'e, E>(executor: E, song_id: DbId) -> Result<(), sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query("INSERT INTO song_details (song_id) VALUES ($1)")
            .bind(song_id)
            .execute(executor)
            .await?;

        tracing::debug!(song_id, "Inserted empty song details");
        Ok(())
    }

    /// Delete a song; its details go with it via `ON DELETE CASCADE`.
    ///
    /// Returns the number of rows removed (0 if the id is unknown).
    pub async fn delete<'e, E>(executor: E, id: DbId) -> Result<u64, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query("DELETE FROM songs WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;

        tracing::debug!(song_id = id, rows = result.rows_affected(), "Deleted song");
        Ok(result.rows_affected())
    }

    /// Find a song with its details by exact group and title.
    pub async fn find_with_details<'e, E>(
        executor: E,
        group: &str,
        title: &str,
    ) -> Result<Option<SongWithDetails>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "SELECT {DETAIL_COLUMNS} \
             FROM songs JOIN song_details ON songs.id = song_details.song_id \
             WHERE group_name = $1 AND song_name = $2"
        );
        sqlx::query_as::<_, SongWithDetails>(&query)
            .bind(group)
            .bind(title)
            .fetch_optional(executor)
            .await
    }

    /// Fetch the lyrics of a song.
    ///
    /// The outer `None` means the song does not exist; the inner `None`
    /// means it has no text yet.
    pub async fn find_text<'e, E>(
        executor: E,
        id: DbId,
    ) -> Result<Option<Option<String>>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_scalar::<_, Option<String>>(
            "SELECT text FROM song_details WHERE song_id = $1",
        )
        .bind(id)
        .fetch_optional(executor)
        .await
    }

    /// List songs with their details, projected, filtered and paginated.
    pub async fn list<'e, E>(
        executor: E,
        params: &SongListQuery,
    ) -> Result<Vec<SongWithDetails>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let built = params.to_sql();
        tracing::debug!(sql = %built.sql, args = built.args.len(), "Listing songs");

        bind_values_as(sqlx::query_as::<_, SongWithDetails>(&built.sql), &built.args)
            .fetch_all(executor)
            .await
    }

    /// Update the `songs` row. Only `Some` fields are written.
    ///
    /// Returns the number of rows updated; an empty update returns 0 without
    /// a round trip.
    pub async fn update_song<'e, E>(
        executor: E,
        id: DbId,
        input: &UpdateSong,
    ) -> Result<u64, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        Self::execute_update(executor, "songs", "id", id, input.assignments()).await
    }

    /// Update the `song_details` row. Only `Some` fields are written.
    pub async fn update_details<'e, E>(
        executor: E,
        song_id: DbId,
        input: &UpdateSongDetails,
    ) -> Result<u64, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        Self::execute_update(executor, "song_details", "song_id", song_id, input.assignments())
            .await
    }

    /// `UPDATE {table} SET ..., updated_at = NOW() WHERE {key_column} = $1`.
    ///
    /// `table` and the assignment columns are compile-time names, never
    /// caller input.
    async fn execute_update<'e, E>(
        executor: E,
        table: &'static str,
        key_column: &'static str,
        id: DbId,
        assignments: Vec<(&'static str, SqlValue)>,
    ) -> Result<u64, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        if assignments.is_empty() {
            return Ok(0);
        }

        let mut args = SqlArgs::starting_after(1);
        let mut set_clauses = Vec::with_capacity(assignments.len() + 1);
        for (column, value) in assignments {
            let placeholder = args.push(value);
            set_clauses.push(format!("{column} = {placeholder}"));
        }
        set_clauses.push("updated_at = NOW()".to_string());

        let query = format!(
            "UPDATE {table} SET {} WHERE {key_column} = $1",
            set_clauses.join(", ")
        );
        let result = bind_values(sqlx::query(&query).bind(id), args.values())
            .execute(executor)
            .await?;

        tracing::debug!(
            table,
            id,
            fields = args.len(),
            rows = result.rows_affected(),
            "Updated row"
        );
        Ok(result.rows_affected())
    }
}
