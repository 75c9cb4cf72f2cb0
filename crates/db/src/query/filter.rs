//! Filter compiler: [`FilterSpec`] to [`Predicate`].
//!
//! Conditions of different keys are AND-ed. Within a key:
//!
//! - `song_id` comparisons are AND-ed (`song_id > $1 AND song_id < $2`)
//! - `song_name`, `link`, `text` patterns are OR-ed `ILIKE`s
//! - `groups` becomes `group_name IN (...)`
//! - `release_date` is a single comparison or an inclusive `BETWEEN`

use std::collections::BTreeMap;

use musiclib_core::error::CoreError;
use musiclib_core::filter::{FieldFilter, FilterKey, FilterSpec};

use super::predicate::Predicate;
use super::SqlValue;

/// Column each filter key constrains in the `songs JOIN song_details` set.
pub fn filter_column(key: FilterKey) -> &'static str {
    match key {
        FilterKey::SongId => "song_id",
        FilterKey::SongName => "song_name",
        FilterKey::Groups => "group_name",
        FilterKey::ReleaseDate => "release_date",
        FilterKey::Link => "link",
        FilterKey::Text => "text",
    }
}

/// Compile a parsed filter into one predicate. An empty spec yields
/// [`Predicate::True`].
pub fn compile_filter(spec: &FilterSpec) -> Predicate {
    Predicate::and(
        spec.iter()
            .map(|(key, condition)| compile_condition(filter_column(key), condition))
            .collect(),
    )
}

/// Parse and compile a raw `{key: value}` filter map in one step.
pub fn compile_filter_map(map: &BTreeMap<String, String>) -> Result<Predicate, CoreError> {
    FilterSpec::from_map(map).map(|spec| compile_filter(&spec))
}

fn compile_condition(column: &'static str, condition: &FieldFilter) -> Predicate {
    match condition {
        FieldFilter::IntComparison(comparisons) => Predicate::and(
            comparisons
                .iter()
                .map(|(op, value)| Predicate::Compare {
                    column,
                    op: *op,
                    value: SqlValue::BigInt(*value),
                })
                .collect(),
        ),
        FieldFilter::PatternList(patterns) => Predicate::or(
            patterns
                .iter()
                .map(|pattern| Predicate::ILike {
                    column,
                    pattern: pattern.clone(),
                })
                .collect(),
        ),
        FieldFilter::Equality(values) => Predicate::In {
            column,
            values: values.iter().cloned().map(SqlValue::Text).collect(),
        },
        FieldFilter::DateComparison(op, date) => Predicate::Compare {
            column,
            op: *op,
            value: SqlValue::Date(*date),
        },
        FieldFilter::DateRange { from, to } => Predicate::Between {
            column,
            low: SqlValue::Date(*from),
            high: SqlValue::Date(*to),
        },
    }
}
