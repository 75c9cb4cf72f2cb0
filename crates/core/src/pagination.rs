//! Limit/offset rules shared by the song listing and lyrics endpoints.

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

/// Page size used when the caller does not send `limit`.
pub const DEFAULT_LIMIT: i64 = 10;

/// Upper bound for `limit`; larger values are clamped, not rejected.
pub const MAX_LIMIT: i64 = 1000;

/// A validated `LIMIT`/`OFFSET` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub limit: i64,
    pub offset: i64,
}

impl Default for Page {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            offset: 0,
        }
    }
}

impl Page {
    /// Validate an already parsed pair.
    ///
    /// `limit` below 1 and negative `offset` are rejected; `limit` above
    /// [`MAX_LIMIT`] is clamped.
    pub fn new(limit: i64, offset: i64) -> Result<Self, CoreError> {
        Ok(Self {
            limit: check_limit(limit)?,
            offset: check_offset(offset)?,
        })
    }

    /// Build a page from raw `?limit=&offset=` query values.
    ///
    /// Missing or blank values fall back to the defaults.
    pub fn from_query(limit: Option<&str>, offset: Option<&str>) -> Result<Self, CoreError> {
        Ok(Self {
            limit: resolve_limit(limit)?,
            offset: resolve_offset(offset)?,
        })
    }
}

/// Resolve a raw `limit` value.
///
/// - absent or blank: [`DEFAULT_LIMIT`]
/// - not an integer or below 1: `InvalidParameter`
/// - above [`MAX_LIMIT`]: clamped to [`MAX_LIMIT`]
pub fn resolve_limit(raw: Option<&str>) -> Result<i64, CoreError> {
    let Some(raw) = non_blank(raw) else {
        return Ok(DEFAULT_LIMIT);
    };

    let limit: i64 = raw.parse().map_err(|_| {
        CoreError::invalid_parameter("limit param must be a number", format!("limit={raw}"))
    })?;

    check_limit(limit)
}

/// Resolve a raw `offset` value. Absent or blank means 0; negatives are rejected.
pub fn resolve_offset(raw: Option<&str>) -> Result<i64, CoreError> {
    let Some(raw) = non_blank(raw) else {
        return Ok(0);
    };

    let offset: i64 = raw.parse().map_err(|_| {
        CoreError::invalid_parameter("offset param must be a number", format!("offset={raw}"))
    })?;

    check_offset(offset)
}

fn check_limit(limit: i64) -> Result<i64, CoreError> {
    if limit < 1 {
        return Err(CoreError::invalid_parameter(
            "invalid limit param",
            format!("limit={limit}, but must be >= 1"),
        ));
    }
    Ok(limit.min(MAX_LIMIT))
}

fn check_offset(offset: i64) -> Result<i64, CoreError> {
    if offset < 0 {
        return Err(CoreError::invalid_parameter(
            "invalid offset param",
            format!("offset={offset}, but must be >= 0"),
        ));
    }
    Ok(offset)
}

fn non_blank(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|s| !s.is_empty())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
