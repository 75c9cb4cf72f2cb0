/// All database primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// Release dates are calendar days without a time zone.
pub type ReleaseDate = chrono::NaiveDate;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
