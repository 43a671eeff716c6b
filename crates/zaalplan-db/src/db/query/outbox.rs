//! Statements for the calendar-sync outbox.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use uuid::Uuid;

use crate::db::schema::sync_outbox;
use crate::model::outbox::{NewOutboxRow, OutboxRow};

/// ## Summary
/// Returns a query for undelivered entries due at `now` with attempts left, oldest first.
#[must_use]
pub fn due(
    now: DateTime<Utc>,
    max_attempts: i32,
    limit: i64,
) -> sync_outbox::BoxedQuery<'static, diesel::pg::Pg> {
    sync_outbox::table
        .filter(sync_outbox::delivered_at.is_null())
        .filter(sync_outbox::next_attempt_at.le(now))
        .filter(sync_outbox::attempts.lt(max_attempts))
        .order(sync_outbox::created_at.asc())
        .limit(limit)
        .into_boxed()
}

/// ## Summary
/// Queues a notification.
///
/// ## Errors
/// Returns a database error if the insert fails.
pub async fn insert(conn: &mut AsyncPgConnection, row: &NewOutboxRow) -> QueryResult<()> {
    diesel::insert_into(sync_outbox::table)
        .values(row)
        .execute(conn)
        .await?;
    Ok(())
}

/// ## Summary
/// Loads due entries, see [`due`].
///
/// ## Errors
/// Returns a database error if the query fails.
pub async fn load_due(
    conn: &mut AsyncPgConnection,
    now: DateTime<Utc>,
    max_attempts: i32,
    limit: i64,
) -> QueryResult<Vec<OutboxRow>> {
    due(now, max_attempts, limit)
        .select(OutboxRow::as_select())
        .load(conn)
        .await
}

/// ## Summary
/// Marks an entry as delivered.
///
/// ## Errors
/// Returns a database error if the update fails.
pub async fn mark_delivered(
    conn: &mut AsyncPgConnection,
    id: Uuid,
    now: DateTime<Utc>,
) -> QueryResult<usize> {
    diesel::update(sync_outbox::table.filter(sync_outbox::id.eq(id)))
        .set((
            sync_outbox::delivered_at.eq(Some(now)),
            sync_outbox::attempts.eq(sync_outbox::attempts + 1),
            sync_outbox::last_error.eq(None::<String>),
        ))
        .execute(conn)
        .await
}

/// ## Summary
/// Records a failed attempt and schedules the next one.
///
/// ## Errors
/// Returns a database error if the update fails.
pub async fn reschedule(
    conn: &mut AsyncPgConnection,
    id: Uuid,
    next_attempt_at: DateTime<Utc>,
    error: &str,
) -> QueryResult<usize> {
    diesel::update(sync_outbox::table.filter(sync_outbox::id.eq(id)))
        .set((
            sync_outbox::attempts.eq(sync_outbox::attempts + 1),
            sync_outbox::next_attempt_at.eq(next_attempt_at),
            sync_outbox::last_error.eq(Some(error)),
        ))
        .execute(conn)
        .await
}
