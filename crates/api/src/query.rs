//! Query parameter types for the song handlers.
//!
//! Every parameter is read as a raw string so malformed values surface as
//! `INVALID_PARAMETER` / `INVALID_FILTER` errors with the offending value,
//! rather than as a generic deserialization failure.

use musiclib_core::error::CoreError;
use musiclib_core::fields::parse_fields;
use musiclib_core::filter::FilterSpec;
use musiclib_core::pagination::Page;
use musiclib_db::query::SongListQuery;
use serde::Deserialize;

/// Pagination parameters (`?limit=&offset=`).
#[derive(Debug, Default, Deserialize)]
pub struct PaginationParams {
    pub limit: Option<String>,
    pub offset: Option<String>,
}

impl PaginationParams {
    pub fn page(&self) -> Result<Page, CoreError> {
        Page::from_query(self.limit.as_deref(), self.offset.as_deref())
    }
}

/// `GET /songs` parameters.
#[derive(Debug, Default, Deserialize)]
pub struct SongListParams {
    pub limit: Option<String>,
    pub offset: Option<String>,
    /// Space- or `+`-separated output aliases.
    pub fields: Option<String>,
    /// `key=value,key=value` filter string.
    pub filter: Option<String>,
}

impl SongListParams {
    /// Validate and assemble the listing query.
    pub fn to_list_query(&self) -> Result<SongListQuery, CoreError> {
        let page = Page::from_query(self.limit.as_deref(), self.offset.as_deref())?;
        let fields = parse_fields(self.fields.as_deref())?;
        let filter = match self.filter.as_deref() {
            Some(raw) => FilterSpec::parse(raw)?,
            None => FilterSpec::default(),
        };

        Ok(SongListQuery {
            fields,
            filter,
            page,
        })
    }
}

/// `GET /info` parameters.
#[derive(Debug, Default, Deserialize)]
pub struct SongInfoParams {
    pub group: Option<String>,
    pub song: Option<String>,
}

impl SongInfoParams {
    /// Both `group` and `song` are required and must not be blank.
    pub fn require(&self) -> Result<(&str, &str), CoreError> {
        let group = self.group.as_deref().filter(|g| !g.trim().is_empty());
        let song = self.song.as_deref().filter(|s| !s.trim().is_empty());

        match (group, song) {
            (Some(group), Some(song)) => Ok((group, song)),
            _ => Err(CoreError::invalid_parameter(
                "group and song params are required",
                format!(
                    "group={}, song={}",
                    self.group.as_deref().unwrap_or(""),
                    self.song.as_deref().unwrap_or("")
                ),
            )),
        }
    }
}
