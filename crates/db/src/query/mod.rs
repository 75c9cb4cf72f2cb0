//! SQL generation for the song listing.
//!
//! Compilation happens in two steps: [`filter::compile_filter`] turns a
//! typed [`FilterSpec`](musiclib_core::filter::FilterSpec) into a
//! [`Predicate`] tree, then [`select::SongListQuery`] renders the tree,
//! projection, ordering and pagination into one parameterized statement.
//! Values never appear in the SQL text; they are collected as positional
//! [`SqlValue`] arguments and bound in order.

pub mod filter;
pub mod predicate;
pub mod select;

use musiclib_core::types::ReleaseDate;
use sqlx::postgres::{PgArguments, Postgres};
use sqlx::query::{Query, QueryAs};

pub use filter::{compile_filter, compile_filter_map};
pub use predicate::Predicate;
pub use select::{BuiltQuery, SongListQuery};

/// A value bound to a positional (`$n`) placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlValue {
    BigInt(i64),
    Text(String),
    Date(ReleaseDate),
}

/// Positional argument list; hands out `$n` placeholders as values are pushed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SqlArgs {
    offset: usize,
    values: Vec<SqlValue>,
}

impl SqlArgs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number placeholders after `offset` parameters bound elsewhere
    /// (e.g. the key in `UPDATE ... WHERE id = $1`).
    pub fn starting_after(offset: usize) -> Self {
        Self {
            offset,
            values: Vec::new(),
        }
    }

    /// Append a value and return its placeholder.
    pub fn push(&mut self, value: SqlValue) -> String {
        self.values.push(value);
        format!("${}", self.offset + self.values.len())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &[SqlValue] {
        &self.values
    }

    pub fn into_values(self) -> Vec<SqlValue> {
        self.values
    }
}

/// Bind `values` in order onto a typed query.
pub fn bind_values_as<'q, O>(
    mut query: QueryAs<'q, Postgres, O, PgArguments>,
    values: &[SqlValue],
) -> QueryAs<'q, Postgres, O, PgArguments> {
    for value in values {
        query = match value {
            SqlValue::BigInt(v) => query.bind(*v),
            SqlValue::Text(v) => query.bind(v.clone()),
            SqlValue::Date(v) => query.bind(*v),
        };
    }
    query
}

/// Bind `values` in order onto an untyped query.
pub fn bind_values<'q>(
    mut query: Query<'q, Postgres, PgArguments>,
    values: &[SqlValue],
) -> Query<'q, Postgres, PgArguments> {
    for value in values {
        query = match value {
            SqlValue::BigInt(v) => query.bind(*v),
            SqlValue::Text(v) => query.bind(v.clone()),
            SqlValue::Date(v) => query.bind(*v),
        };
    }
    query
}
