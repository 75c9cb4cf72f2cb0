//! The `dd.mm.yyyy` release date format used on the wire.
//!
//! Filters, update bodies and JSON responses all speak this format; the
//! database stores a plain `DATE`.

use serde::Serializer;

use crate::types::ReleaseDate;

/// `chrono` format string for release dates (`31.12.2024`).
pub const RELEASE_DATE_FORMAT: &str = "%d.%m.%Y";

/// Parse a `dd.mm.yyyy` date. Surrounding whitespace is ignored.
///
/// # Examples
///
/// ```
/// use musiclib_core::release_date::parse_release_date;
///
/// assert!(parse_release_date("01.02.2022").is_some());
/// assert!(parse_release_date("2022-02-01").is_none());
/// ```
pub fn parse_release_date(raw: &str) -> Option<ReleaseDate> {
    ReleaseDate::parse_from_str(raw.trim(), RELEASE_DATE_FORMAT).ok()
}

pub fn format_release_date(date: &ReleaseDate) -> String {
    date.format(RELEASE_DATE_FORMAT).to_string()
}

/// Serde `serialize_with` helper for `Option<ReleaseDate>` fields.
///
/// Pair it with `skip_serializing_if = "Option::is_none"`; a `None` is
/// written as `null` otherwise.
pub fn serialize_opt<S>(date: &Option<ReleaseDate>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match date {
        Some(d) => serializer.serialize_str(&format_release_date(d)),
        None => serializer.serialize_none(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_day_month_year() {
        let date = parse_release_date("16.07.2006").unwrap();
        assert_eq!(date, ReleaseDate::from_ymd_opt(2006, 7, 16).unwrap());
    }

    #[test]
    fn rejects_iso_and_garbage() {
        assert!(parse_release_date("2006-07-16").is_none());
        assert!(parse_release_date("32.01.2020").is_none());
        assert!(parse_release_date("soon").is_none());
        assert!(parse_release_date("").is_none());
    }

    #[test]
    fn format_round_trips_through_parse() {
        let date = ReleaseDate::from_ymd_opt(2023, 1, 5).unwrap();
        assert_eq!(format_release_date(&date), "05.01.2023");
    }

    #[test]
    fn serializes_option_as_string_or_null() {
        #[derive(serde::Serialize)]
        struct Row {
            #[serde(serialize_with = "serialize_opt")]
            date: Option<ReleaseDate>,
        }

        let some = Row {
            date: ReleaseDate::from_ymd_opt(2020, 12, 31),
        };
        let none = Row { date: None };

        assert_eq!(
            serde_json::to_value(&some).unwrap(),
            serde_json::json!({"date": "31.12.2020"})
        );
        assert_eq!(
            serde_json::to_value(&none).unwrap(),
            serde_json::json!({"date": null})
        );
    }
}
