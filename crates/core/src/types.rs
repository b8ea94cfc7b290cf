/// Primary keys for content tables (prompts, tags, copy events) are
/// PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// Profiles are keyed by UUID.
pub type ProfileId = uuid::Uuid;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
