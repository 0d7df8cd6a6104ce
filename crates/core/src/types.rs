/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Name of a schema field referenced by filters and sort keys.
pub type FieldName = String;

/// Wire form of a lifecycle status value (snake_case string).
pub type StatusValue = String;
