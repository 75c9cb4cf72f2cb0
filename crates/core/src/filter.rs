//! Song listing filter grammar.
//!
//! The `filter` query parameter is a comma-separated list of `key=value`
//! entries (`filter=song_id=gt+2+lt+8,groups=Noize_MC+мы`). Each key has its
//! own value grammar; this module turns the raw strings into a typed
//! [`FilterSpec`] that the repository compiles into SQL.
//!
//! | Key            | Value grammar                                   | Condition            |
//! |----------------|-------------------------------------------------|----------------------|
//! | `song_id`      | `<id>`, `<op> <id>`, `<op> <id> <op> <id> ...`  | [`FieldFilter::IntComparison`] |
//! | `song_name`    | wildcard patterns (`*`), space separated        | [`FieldFilter::PatternList`]   |
//! | `text`, `link` | same as `song_name`                             | [`FieldFilter::PatternList`]   |
//! | `groups`       | exact names, `_` stands for a space             | [`FieldFilter::Equality`]      |
//! | `release_date` | `<date>`, `<op> <date>`, `<date>-<date>`        | [`FieldFilter::DateComparison`] / [`FieldFilter::DateRange`] |
//!
//! Operators: `gt`, `ge`, `lt`, `le`, `ne`, `eq`. Dates: `dd.mm.yyyy`.

use std::collections::BTreeMap;

use crate::error::CoreError;
use crate::release_date::parse_release_date;
use crate::types::{DbId, ReleaseDate};

// ---------------------------------------------------------------------------
// Keys and operators
// ---------------------------------------------------------------------------

/// A filterable field. Ordering fixes the order conditions are compiled in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FilterKey {
    SongId,
    SongName,
    Groups,
    ReleaseDate,
    Link,
    Text,
}

impl FilterKey {
    pub const ALL: [FilterKey; 6] = [
        FilterKey::SongId,
        FilterKey::SongName,
        FilterKey::Groups,
        FilterKey::ReleaseDate,
        FilterKey::Link,
        FilterKey::Text,
    ];

    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "song_id" => Some(Self::SongId),
            "song_name" => Some(Self::SongName),
            "groups" => Some(Self::Groups),
            "release_date" => Some(Self::ReleaseDate),
            "link" => Some(Self::Link),
            "text" => Some(Self::Text),
            _ => None,
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            Self::SongId => "song_id",
            Self::SongName => "song_name",
            Self::Groups => "groups",
            Self::ReleaseDate => "release_date",
            Self::Link => "link",
            Self::Text => "text",
        }
    }
}

/// Comparison operator accepted by `song_id` and `release_date`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Eq,
    Ne,
    Gt,
    Ge,
    Lt,
    Le,
}

impl Comparison {
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "eq" => Some(Self::Eq),
            "ne" => Some(Self::Ne),
            "gt" => Some(Self::Gt),
            "ge" => Some(Self::Ge),
            "lt" => Some(Self::Lt),
            "le" => Some(Self::Le),
            _ => None,
        }
    }

    pub fn as_sql(self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Ne => "!=",
            Self::Gt => ">",
            Self::Ge => ">=",
            Self::Lt => "<",
            Self::Le => "<=",
        }
    }
}

// ---------------------------------------------------------------------------
// Typed conditions
// ---------------------------------------------------------------------------

/// The parsed condition for one filter key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldFilter {
    /// Integer comparisons, all of which must hold.
    IntComparison(Vec<(Comparison, DbId)>),
    /// Case-insensitive `LIKE` patterns (already in SQL form), any of which may match.
    PatternList(Vec<String>),
    /// Exact values, any of which may match.
    Equality(Vec<String>),
    /// A single date comparison; a bare date is `Comparison::Eq`.
    DateComparison(Comparison, ReleaseDate),
    /// Inclusive date range.
    DateRange { from: ReleaseDate, to: ReleaseDate },
}

/// All conditions of one listing request, at most one per key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSpec {
    conditions: BTreeMap<FilterKey, FieldFilter>,
}

impl FilterSpec {
    /// Parse the raw `filter` query value (`key=value,key=value`).
    ///
    /// `+` inside a value is read as a space. Empty entries and empty values
    /// are skipped. Unknown keys, entries without `=` and repeated keys are
    /// rejected with `InvalidFilter`.
    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        let decoded = raw.replace('+', " ");
        let mut seen: Vec<&str> = Vec::new();
        let mut entries: Vec<(FilterKey, &str)> = Vec::new();

        for entry in decoded.split(',') {
            let entry = entry.trim();
            if entry.is_empty() {
                continue;
            }

            let (key, value) = entry.split_once('=').ok_or_else(|| {
                CoreError::invalid_filter(entry, "", "missing `=` in filter entry")
            })?;
            let key = key.trim();

            let filter_key = FilterKey::from_key(key)
                .ok_or_else(|| CoreError::invalid_filter(key, value, "unknown filter key"))?;

            if seen.contains(&key) {
                return Err(CoreError::invalid_filter(
                    key,
                    value,
                    "filter key given more than once",
                ));
            }
            seen.push(key);
            entries.push((filter_key, value));
        }

        Self::from_entries(entries)
    }

    /// Build a spec from already separated `(key, raw value)` pairs.
    pub fn from_entries<'a>(
        entries: impl IntoIterator<Item = (FilterKey, &'a str)>,
    ) -> Result<Self, CoreError> {
        let mut conditions = BTreeMap::new();

        for (key, raw) in entries {
            let raw = raw.trim();
            if raw.is_empty() {
                continue;
            }
            let condition = match key {
                FilterKey::SongId => parse_song_id(raw)?,
                FilterKey::SongName | FilterKey::Link | FilterKey::Text => parse_patterns(raw),
                FilterKey::Groups => parse_groups(raw),
                FilterKey::ReleaseDate => parse_release_date_filter(raw)?,
            };
            conditions.insert(key, condition);
        }

        Ok(Self { conditions })
    }

    /// Build a spec from a string map keyed by filter name.
    ///
    /// Keys outside the known set are rejected.
    pub fn from_map(map: &BTreeMap<String, String>) -> Result<Self, CoreError> {
        let mut entries = Vec::with_capacity(map.len());
        for (key, value) in map {
            let filter_key = FilterKey::from_key(key)
                .ok_or_else(|| CoreError::invalid_filter(key, value, "unknown filter key"))?;
            entries.push((filter_key, value.as_str()));
        }
        Self::from_entries(entries)
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    pub fn get(&self, key: FilterKey) -> Option<&FieldFilter> {
        self.conditions.get(&key)
    }

    /// Conditions in [`FilterKey`] order.
    pub fn iter(&self) -> impl Iterator<Item = (FilterKey, &FieldFilter)> {
        self.conditions.iter().map(|(k, v)| (*k, v))
    }
}

// ---------------------------------------------------------------------------
// Per-key grammars
// ---------------------------------------------------------------------------

fn parse_song_id(raw: &str) -> Result<FieldFilter, CoreError> {
    let tokens: Vec<&str> = raw.split_whitespace().collect();

    let comparisons = match tokens.as_slice() {
        [value] => vec![(Comparison::Eq, parse_id(raw, value)?)],
        pairs if pairs.len() % 2 == 0 => pairs
            .chunks(2)
            .map(|pair| -> Result<(Comparison, DbId), CoreError> {
                Ok((
                    parse_operator("song_id", raw, pair[0])?,
                    parse_id(raw, pair[1])?,
                ))
            })
            .collect::<Result<Vec<_>, _>>()?,
        _ => {
            return Err(CoreError::invalid_filter(
                "song_id",
                raw,
                "expected `<id>` or `<op> <id>` pairs",
            ))
        }
    };

    Ok(FieldFilter::IntComparison(comparisons))
}

fn parse_id(raw: &str, token: &str) -> Result<DbId, CoreError> {
    token
        .parse::<DbId>()
        .map_err(|_| CoreError::invalid_filter("song_id", raw, "song_id constraint must be a number"))
}

fn parse_operator(field: &str, raw: &str, token: &str) -> Result<Comparison, CoreError> {
    Comparison::from_token(token).ok_or_else(|| {
        CoreError::invalid_filter(
            field,
            raw,
            format!("invalid comparison operator `{token}`, expected one of gt, ge, lt, le, ne, eq"),
        )
    })
}

fn parse_patterns(raw: &str) -> FieldFilter {
    FieldFilter::PatternList(raw.split_whitespace().map(to_like_pattern).collect())
}

fn parse_groups(raw: &str) -> FieldFilter {
    FieldFilter::Equality(raw.split_whitespace().map(|g| g.replace('_', " ")).collect())
}

fn parse_release_date_filter(raw: &str) -> Result<FieldFilter, CoreError> {
    let tokens: Vec<&str> = raw.split_whitespace().collect();

    match tokens.as_slice() {
        [operator, date] => Ok(FieldFilter::DateComparison(
            parse_operator("release_date", raw, operator)?,
            parse_date(raw, date)?,
        )),
        [single] => match single.split_once('-') {
            None => Ok(FieldFilter::DateComparison(
                Comparison::Eq,
                parse_date(raw, single)?,
            )),
            Some((from, to)) => Ok(FieldFilter::DateRange {
                from: parse_date(raw, from)?,
                to: parse_date(raw, to)?,
            }),
        },
        _ => Err(CoreError::invalid_filter(
            "release_date",
            raw,
            "expected `<date>`, `<op> <date>` or `<date>-<date>`",
        )),
    }
}

fn parse_date(raw: &str, token: &str) -> Result<ReleaseDate, CoreError> {
    parse_release_date(token).ok_or_else(|| {
        CoreError::invalid_filter(
            "release_date",
            raw,
            "could not parse the release_date, expected format is dd.mm.yyyy",
        )
    })
}

/// Translate a user wildcard pattern into an `ILIKE` pattern.
///
/// `*` becomes `%`; literal `%`, `_` and `\` are escaped with `\`.
pub fn to_like_pattern(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len() + 2);
    for c in pattern.chars() {
        match c {
            '*' => out.push('%'),
            '%' | '_' | '\\' => {
                out.push('\\');
                out.push(c);
            }
            _ => out.push(c),
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
