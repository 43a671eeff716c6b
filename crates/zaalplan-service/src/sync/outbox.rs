//! Publishers that queue sync events for later delivery.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use zaalplan_db::db::DbProvider;
use zaalplan_db::db::connection::DbPool;
use zaalplan_db::db::enums::SyncEventKind;
use zaalplan_db::db::query::outbox;
use zaalplan_db::model::outbox::NewOutboxRow;

use super::{SyncError, SyncEvent, SyncPublisher, SyncResult};

impl From<&SyncEvent> for SyncEventKind {
    fn from(event: &SyncEvent) -> Self {
        match event {
            SyncEvent::Created { .. } => Self::Created,
            SyncEvent::Updated { .. } => Self::Updated,
            SyncEvent::Deleted { .. } => Self::Deleted,
        }
    }
}

/// Writes events to the `sync_outbox` table for the relay to deliver.
#[derive(Clone)]
pub struct OutboxPublisher {
    pool: DbPool,
}

impl OutboxPublisher {
    #[must_use]
    pub const fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SyncPublisher for OutboxPublisher {
    #[tracing::instrument(skip(self, event), fields(booking_id = %event.booking_id(), kind = event.kind()))]
    async fn publish(&self, event: SyncEvent) -> SyncResult<()> {
        let row = NewOutboxRow {
            id: uuid::Uuid::now_v7(),
            kind: SyncEventKind::from(&event),
            booking_id: event.booking_id(),
            payload: serde_json::to_value(&event)?,
        };

        let mut conn = self
            .pool
            .get_connection()
            .await
            .map_err(|e| SyncError::Outbox(e.to_string()))?;
        outbox::insert(&mut conn, &row)
            .await
            .map_err(|e| SyncError::Outbox(e.to_string()))?;

        tracing::debug!("Sync event queued");
        Ok(())
    }
}

/// Keeps published events in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryOutbox {
    events: Arc<Mutex<Vec<SyncEvent>>>,
}

impl MemoryOutbox {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything published so far, oldest first.
    pub async fn events(&self) -> Vec<SyncEvent> {
        self.events.lock().await.clone()
    }
}

#[async_trait]
impl SyncPublisher for MemoryOutbox {
    async fn publish(&self, event: SyncEvent) -> SyncResult<()> {
        tracing::debug!(booking_id = %event.booking_id(), kind = event.kind(), "Sync event recorded");
        self.events.lock().await.push(event);
        Ok(())
    }
}
