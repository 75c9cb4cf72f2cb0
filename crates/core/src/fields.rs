//! Output field projection for the song listing (`?fields=`).
//!
//! Clients name fields by alias; the repository selects by column name.

use crate::error::CoreError;

/// One selectable field of a song listing row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SongField {
    SongId,
    Group,
    Song,
    ReleaseDate,
    Link,
    Text,
}

impl SongField {
    /// Every field, in the order used when `fields` is omitted.
    pub const ALL: [SongField; 6] = [
        SongField::SongId,
        SongField::Group,
        SongField::Song,
        SongField::ReleaseDate,
        SongField::Link,
        SongField::Text,
    ];

    pub fn from_alias(alias: &str) -> Option<Self> {
        match alias {
            "song_id" => Some(Self::SongId),
            "group" => Some(Self::Group),
            "song" => Some(Self::Song),
            "release_date" => Some(Self::ReleaseDate),
            "link" => Some(Self::Link),
            "text" => Some(Self::Text),
            _ => None,
        }
    }

    pub fn alias(self) -> &'static str {
        match self {
            Self::SongId => "song_id",
            Self::Group => "group",
            Self::Song => "song",
            Self::ReleaseDate => "release_date",
            Self::Link => "link",
            Self::Text => "text",
        }
    }

    /// Column name in the `songs JOIN song_details` result set.
    pub fn column(self) -> &'static str {
        match self {
            Self::SongId => "song_id",
            Self::Group => "group_name",
            Self::Song => "song_name",
            Self::ReleaseDate => "release_date",
            Self::Link => "link",
            Self::Text => "text",
        }
    }
}

/// Parse the raw `fields` query value into an ordered projection.
///
/// Aliases are separated by whitespace or `+`. A missing or blank value
/// selects [`SongField::ALL`]. Repeated aliases keep their first position.
///
/// # Examples
///
/// ```
/// use musiclib_core::fields::{parse_fields, SongField};
///
/// let fields = parse_fields(Some("song_id+group")).unwrap();
/// assert_eq!(fields, vec![SongField::SongId, SongField::Group]);
/// assert_eq!(parse_fields(None).unwrap(), SongField::ALL.to_vec());
/// ```
pub fn parse_fields(raw: Option<&str>) -> Result<Vec<SongField>, CoreError> {
    let Some(raw) = raw else {
        return Ok(SongField::ALL.to_vec());
    };

    let mut fields = Vec::new();
    for alias in raw.split(|c: char| c == '+' || c.is_whitespace()) {
        if alias.is_empty() {
            continue;
        }
        let field = SongField::from_alias(alias)
            .ok_or_else(|| CoreError::invalid_parameter("unknown field", alias))?;
        if !fields.contains(&field) {
            fields.push(field);
        }
    }

    if fields.is_empty() {
        return Ok(SongField::ALL.to_vec());
    }
    Ok(fields)
}
