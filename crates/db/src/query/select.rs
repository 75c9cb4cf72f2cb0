//! Listing query assembler.

use musiclib_core::fields::SongField;
use musiclib_core::filter::FilterSpec;
use musiclib_core::pagination::Page;

use super::filter::compile_filter;
use super::{SqlArgs, SqlValue};

/// Join every listing reads from.
pub const SONG_SOURCE: &str = "songs JOIN song_details ON songs.id = song_details.song_id";

/// Everything needed to list songs: projection, filter and page.
#[derive(Debug, Clone, PartialEq)]
pub struct SongListQuery {
    pub fields: Vec<SongField>,
    pub filter: FilterSpec,
    pub page: Page,
}

impl Default for SongListQuery {
    fn default() -> Self {
        Self {
            fields: SongField::ALL.to_vec(),
            filter: FilterSpec::default(),
            page: Page::default(),
        }
    }
}

/// SQL text plus its positional arguments, in binding order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltQuery {
    pub sql: String,
    pub args: Vec<SqlValue>,
}

impl SongListQuery {
    /// Render the statement. Rows are always ordered by song id ascending;
    /// `LIMIT` and `OFFSET` are bound after the filter arguments.
    pub fn to_sql(&self) -> BuiltQuery {
        let fields: &[SongField] = if self.fields.is_empty() {
            &SongField::ALL
        } else {
            &self.fields
        };
        let columns = fields
            .iter()
            .map(|f| f.column())
            .collect::<Vec<_>>()
            .join(", ");

        let mut args = SqlArgs::new();
        let mut sql = format!("SELECT {columns} FROM {SONG_SOURCE}");

        if let Some(condition) = compile_filter(&self.filter).render(&mut args) {
            sql.push_str(" WHERE ");
            sql.push_str(&condition);
        }

        let limit = args.push(SqlValue::BigInt(self.page.limit));
        let offset = args.push(SqlValue::BigInt(self.page.offset));
        sql.push_str(&format!(" ORDER BY song_id LIMIT {limit} OFFSET {offset}"));

        BuiltQuery {
            sql,
            args: args.into_values(),
        }
    }
}

#[cfg(test)]
mod tests {
    use musiclib_core::fields::parse_fields;

    use super::*;

    #[test]
    fn default_query_selects_all_columns_without_where() {
        let built = SongListQuery::default().to_sql();
        assert_eq!(
            built.sql,
            "SELECT song_id, group_name, song_name, release_date, link, text \
             FROM songs JOIN song_details ON songs.id = song_details.song_id \
             ORDER BY song_id LIMIT $1 OFFSET $2"
        );
        assert_eq!(built.args, vec![SqlValue::BigInt(10), SqlValue::BigInt(0)]);
    }

    #[test]
    fn projection_follows_requested_order() {
        let query = SongListQuery {
            fields: parse_fields(Some("text+song_id")).unwrap(),
            ..Default::default()
        };
        assert!(query.to_sql().sql.starts_with("SELECT text, song_id FROM"));
    }

    #[test]
    fn pagination_is_bound_after_filter_args() {
        let query = SongListQuery {
            fields: vec![SongField::SongId],
            filter: FilterSpec::parse("song_id=gt+2+lt+8,groups=Muse").unwrap(),
            page: Page::new(5, 20).unwrap(),
        };
        let built = query.to_sql();
        assert_eq!(
            built.sql,
            "SELECT song_id FROM songs JOIN song_details ON songs.id = song_details.song_id \
             WHERE song_id > $1 AND song_id < $2 AND group_name IN ($3) \
             ORDER BY song_id LIMIT $4 OFFSET $5"
        );
        assert_eq!(
            built.args[3..],
            [SqlValue::BigInt(5), SqlValue::BigInt(20)]
        );
    }
}
