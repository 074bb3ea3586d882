/// Event model and database operations
///
/// Events are the per-user calendar records: a title, a timestamp, an
/// optional description, and a reminder flag. Every operation that touches
/// an existing row is scoped by both id and owner, so another user's event
/// behaves exactly like a missing one.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE events (
///     id INTEGER PRIMARY KEY AUTOINCREMENT,
///     owner_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     title TEXT NOT NULL,
///     occurs_at TEXT NOT NULL,
///     description TEXT NOT NULL DEFAULT '',
///     reminder BOOLEAN NOT NULL DEFAULT TRUE,
///     created_at TEXT NOT NULL,
///     updated_at TEXT NOT NULL
/// );
/// ```
///
/// # Timestamps
///
/// All timestamps are UTC. `parse_occurs_at` accepts ISO-8601 input with an
/// explicit offset (normalized to UTC) or without one (interpreted as UTC);
/// storage and serialization use `DateTime<Utc>` throughout.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

/// Event model representing one calendar entry
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Event {
    /// Unique event id (assigned by the database)
    pub id: i64,

    /// Id of the user who owns this event
    pub owner_id: i64,

    /// Event title (non-empty)
    pub title: String,

    /// When the event occurs (UTC)
    pub occurs_at: DateTime<Utc>,

    /// Free-form description, empty string when not provided
    pub description: String,

    /// Whether a reminder is wanted for this event
    pub reminder: bool,

    /// When the record was created
    pub created_at: DateTime<Utc>,

    /// When the record was last modified
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new event
#[derive(Debug, Clone)]
pub struct NewEvent {
    /// Event title (non-empty)
    pub title: String,

    /// When the event occurs
    pub occurs_at: DateTime<Utc>,

    /// Description, defaults to empty upstream
    pub description: String,

    /// Reminder flag, defaults to true upstream
    pub reminder: bool,
}

/// Input for partially updating an event
///
/// Only non-None fields are written; everything else is left unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdateEvent {
    /// New title
    pub title: Option<String>,

    /// New timestamp
    pub occurs_at: Option<DateTime<Utc>>,

    /// New description (empty string is a valid value)
    pub description: Option<String>,

    /// New reminder flag
    pub reminder: Option<bool>,
}

/// Error returned when a datetime string cannot be parsed
#[derive(Debug, thiserror::Error)]
#[error("Unrecognized datetime: {0:?}")]
pub struct TimestampParseError(pub String);

/// Parses an ISO-8601 datetime string into a UTC timestamp.
///
/// Accepted forms, tried in order:
/// - RFC 3339 with offset or `Z` (normalized to UTC)
/// - `YYYY-MM-DDTHH:MM[:SS[.f]]` (interpreted as UTC)
/// - the same with a space instead of `T`
/// - `YYYY-MM-DD` (midnight UTC)
pub fn parse_occurs_at(value: &str) -> Result<DateTime<Utc>, TimestampParseError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.with_timezone(&Utc));
    }

    const NAIVE_FORMATS: [&str; 4] = [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M",
    ];

    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(naive.and_utc());
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        if let Some(naive) = date.and_hms_opt(0, 0, 0) {
            return Ok(naive.and_utc());
        }
    }

    Err(TimestampParseError(value.to_string()))
}

impl Event {
    /// Creates a new event owned by the given user
    ///
    /// Returns the full created row, including the generated id.
    pub async fn create(
        pool: &SqlitePool,
        owner_id: i64,
        data: NewEvent,
    ) -> Result<Self, sqlx::Error> {
        let now = Utc::now();

        let event = sqlx::query_as::<_, Event>(
            r#"
            INSERT INTO events (owner_id, title, occurs_at, description, reminder, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            RETURNING id, owner_id, title, occurs_at, description, reminder, created_at, updated_at
            "#,
        )
        .bind(owner_id)
        .bind(data.title)
        .bind(data.occurs_at)
        .bind(data.description)
        .bind(data.reminder)
        .bind(now)
        .bind(now)
        .fetch_one(pool)
        .await?;

        Ok(event)
    }

    /// Finds an event by id, regardless of owner
    pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        let event = sqlx::query_as::<_, Event>(
            r#"
            SELECT id, owner_id, title, occurs_at, description, reminder, created_at, updated_at
            FROM events
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(event)
    }

    /// Finds an event by id, scoped to an owner
    ///
    /// Returns `None` both when the id does not exist and when it belongs to
    /// a different user; callers cannot tell the cases apart.
    pub async fn find_by_id_and_owner(
        pool: &SqlitePool,
        id: i64,
        owner_id: i64,
    ) -> Result<Option<Self>, sqlx::Error> {
        let event = sqlx::query_as::<_, Event>(
            r#"
            SELECT id, owner_id, title, occurs_at, description, reminder, created_at, updated_at
            FROM events
            WHERE id = ? AND owner_id = ?
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .fetch_optional(pool)
        .await?;

        Ok(event)
    }

    /// Lists all events owned by a user, in insertion order
    pub async fn list_by_owner(
        pool: &SqlitePool,
        owner_id: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let events = sqlx::query_as::<_, Event>(
            r#"
            SELECT id, owner_id, title, occurs_at, description, reminder, created_at, updated_at
            FROM events
            WHERE owner_id = ?
            ORDER BY id
            "#,
        )
        .bind(owner_id)
        .fetch_all(pool)
        .await?;

        Ok(events)
    }

    /// Applies a partial update to an event, scoped to an owner
    ///
    /// Only non-None fields in `data` are written; `updated_at` is always
    /// refreshed. Returns the updated row, or `None` if no row matched the
    /// id + owner pair.
    pub async fn update(
        pool: &SqlitePool,
        id: i64,
        owner_id: i64,
        data: UpdateEvent,
    ) -> Result<Option<Self>, sqlx::Error> {
        // Build the update statement from whichever fields are present;
        // bind order must match the placeholder order exactly
        let mut query = String::from("UPDATE events SET updated_at = ?");

        if data.title.is_some() {
            query.push_str(", title = ?");
        }
        if data.occurs_at.is_some() {
            query.push_str(", occurs_at = ?");
        }
        if data.description.is_some() {
            query.push_str(", description = ?");
        }
        if data.reminder.is_some() {
            query.push_str(", reminder = ?");
        }

        query.push_str(
            " WHERE id = ? AND owner_id = ? \
             RETURNING id, owner_id, title, occurs_at, description, reminder, created_at, updated_at",
        );

        let mut q = sqlx::query_as::<_, Event>(&query).bind(Utc::now());

        if let Some(title) = data.title {
            q = q.bind(title);
        }
        if let Some(occurs_at) = data.occurs_at {
            q = q.bind(occurs_at);
        }
        if let Some(description) = data.description {
            q = q.bind(description);
        }
        if let Some(reminder) = data.reminder {
            q = q.bind(reminder);
        }

        let event = q.bind(id).bind(owner_id).fetch_optional(pool).await?;

        Ok(event)
    }

    /// Deletes an event by id, scoped to an owner
    ///
    /// Returns true if a row was removed, false if nothing matched (absent
    /// or owned by someone else).
    pub async fn delete_by_id_and_owner(
        pool: &SqlitePool,
        id: i64,
        owner_id: i64,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM events WHERE id = ? AND owner_id = ?")
            .bind(id)
            .bind(owner_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
