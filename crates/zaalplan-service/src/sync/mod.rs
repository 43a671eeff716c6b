//! Outbound calendar-sync notifications.
//!
//! Every successful booking mutation publishes a [`SyncEvent`]. Publishing
//! is best effort: failures are logged and never undo or fail the mutation.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use zaalplan_core::model::Booking;

pub mod outbox;
pub mod relay;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SyncEvent {
    Created {
        booking: Booking,
    },
    Updated {
        booking: Booking,
    },
    Deleted {
        booking_id: Uuid,
        external_event_id: String,
    },
}

impl SyncEvent {
    /// Event for a deleted booking, or `None` if it never reached the
    /// external calendar.
    #[must_use]
    pub fn deleted(booking: &Booking) -> Option<Self> {
        booking
            .external_event_id
            .clone()
            .map(|external_event_id| Self::Deleted {
                booking_id: booking.id,
                external_event_id,
            })
    }

    #[must_use]
    pub fn booking_id(&self) -> Uuid {
        match self {
            Self::Created { booking } | Self::Updated { booking } => booking.id,
            Self::Deleted { booking_id, .. } => *booking_id,
        }
    }

    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Created { .. } => "created",
            Self::Updated { .. } => "updated",
            Self::Deleted { .. } => "deleted",
        }
    }
}

/// Sync errors. Never surfaced to API callers.
#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Outbox write failed: {0}")]
    Outbox(String),

    #[error("Payload encoding failed: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Webhook request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Webhook rejected the event with status {0}")]
    Rejected(u16),
}

pub type SyncResult<T> = std::result::Result<T, SyncError>;

#[async_trait]
pub trait SyncPublisher: Send + Sync {
    async fn publish(&self, event: SyncEvent) -> SyncResult<()>;
}

/// ## Summary
/// Publishes `event`, logging and dropping any failure.
pub async fn publish_quietly(publisher: &dyn SyncPublisher, event: SyncEvent) {
    let booking_id = event.booking_id();
    let kind = event.kind();
    if let Err(error) = publisher.publish(event).await {
        tracing::warn!(%booking_id, kind, %error, "Failed to publish sync event");
    }
}

/// Publisher that drops every event, for deployments without sync.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopPublisher;

#[async_trait]
impl SyncPublisher for NoopPublisher {
    async fn publish(&self, event: SyncEvent) -> SyncResult<()> {
        tracing::trace!(
            booking_id = %event.booking_id(),
            kind = event.kind(),
            "Sync disabled, dropping event"
        );
        Ok(())
    }
}
