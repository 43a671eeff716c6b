use diesel::{pg::Pg, prelude::*};

use crate::db::{enums::SyncEventKind, schema};

/// Pending or delivered calendar-sync notification.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable, Identifiable)]
#[diesel(table_name = schema::sync_outbox)]
#[diesel(check_for_backend(Pg))]
pub struct OutboxRow {
    pub id: uuid::Uuid,
    pub kind: SyncEventKind,
    pub booking_id: uuid::Uuid,
    pub payload: serde_json::Value,
    pub attempts: i32,
    pub next_attempt_at: chrono::DateTime<chrono::Utc>,
    pub delivered_at: Option<chrono::DateTime<chrono::Utc>>,
    pub last_error: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Insert struct for queueing a notification
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = schema::sync_outbox)]
pub struct NewOutboxRow {
    pub id: uuid::Uuid,
    pub kind: SyncEventKind,
    pub booking_id: uuid::Uuid,
    pub payload: serde_json::Value,
}
