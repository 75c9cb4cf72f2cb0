//! Extractors that report failures as [`AppError`].

use axum::extract::{FromRequest, FromRequestParts, Path};
use axum::http::request::Parts;
use musiclib_core::error::CoreError;
use musiclib_core::types::DbId;

use crate::error::AppError;

/// `axum::Json` with rejections mapped to `INVALID_PARAMETER`.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

/// `axum::extract::Query` with rejections mapped to `INVALID_PARAMETER`.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct ApiQuery<T>(pub T);

/// The `{id}` path segment of `/songs/{id}/...`, parsed as a positive id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SongIdPath(pub DbId);

impl<S> FromRequestParts<S> for SongIdPath
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state).await?;
        Ok(SongIdPath(parse_song_id(&raw)?))
    }
}

/// Parse a path id; anything but an integer above zero is rejected.
pub fn parse_song_id(raw: &str) -> Result<DbId, CoreError> {
    match raw.trim().parse::<DbId>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(CoreError::invalid_parameter(
            "invalid song id",
            format!("id={raw}, but must be a positive integer"),
        )),
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn positive_ids_parse() {
        assert_eq!(parse_song_id("1").unwrap(), 1);
        assert_eq!(parse_song_id("9000").unwrap(), 9000);
    }

    #[test]
    fn zero_negative_and_garbage_are_rejected() {
        for raw in ["0", "-3", "abc", "", "1.5"] {
            assert_matches!(
                parse_song_id(raw),
                Err(CoreError::InvalidParameter { .. }),
                "{raw:?} should be rejected"
            );
        }
    }
}
