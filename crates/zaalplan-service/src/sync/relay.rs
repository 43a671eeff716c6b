//! Delivery of queued sync events to the external calendar webhook.
//!
//! The relay polls `sync_outbox` for due rows, POSTs each payload as JSON and
//! marks it delivered. Failed rows are retried with exponential backoff until
//! `max_attempts` is reached. Delivery is at least once; receivers dedupe on
//! `booking_id` and `kind`.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tokio::task::JoinHandle;

use zaalplan_core::config::SyncConfig;
use zaalplan_db::db::DbProvider;
use zaalplan_db::db::connection::DbPool;
use zaalplan_db::db::enums::SyncEventKind;
use zaalplan_db::db::query::{booking, outbox};
use zaalplan_db::model::outbox::OutboxRow;

use super::{SyncError, SyncResult};

/// Delay before the first retry.
pub const BACKOFF_BASE_SECS: i64 = 30;
/// Longest delay between retries.
pub const BACKOFF_CAP_SECS: i64 = 60 * 60;

/// ## Summary
/// Delay before the next attempt after `attempts` failures: 30 s doubling
/// per failure, capped at one hour.
#[must_use]
pub fn backoff_delay(attempts: u32) -> chrono::TimeDelta {
    // 30 s * 2^7 already exceeds the cap.
    let exponent = attempts.saturating_sub(1).min(8);
    let secs = (BACKOFF_BASE_SECS << exponent).min(BACKOFF_CAP_SECS);
    chrono::TimeDelta::seconds(secs)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelaySettings {
    pub webhook_url: String,
    pub max_attempts: u32,
    pub batch_size: u32,
    pub poll_interval: Duration,
    pub request_timeout: Duration,
}

impl RelaySettings {
    /// Relay settings, or `None` when sync is disabled or has no target.
    #[must_use]
    pub fn from_config(config: &SyncConfig) -> Option<Self> {
        config.relay_target().map(|url| Self {
            webhook_url: url.trim().to_string(),
            max_attempts: config.max_attempts.max(1),
            batch_size: config.batch_size.max(1),
            poll_interval: Duration::from_secs(config.poll_interval_secs.max(1)),
            request_timeout: Duration::from_secs(config.request_timeout_secs.max(1)),
        })
    }
}

/// Reply body of the webhook; created events may carry the calendar's id.
#[derive(Debug, Default, Deserialize)]
struct WebhookReply {
    #[serde(default)]
    event_id: Option<String>,
}

pub struct SyncRelay {
    pool: DbPool,
    client: reqwest::Client,
    settings: RelaySettings,
}

impl SyncRelay {
    /// ## Summary
    /// Builds a relay with its own HTTP client.
    ///
    /// ## Errors
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(pool: DbPool, settings: RelaySettings) -> SyncResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(settings.request_timeout)
            .build()?;
        Ok(Self {
            pool,
            client,
            settings,
        })
    }

    /// Runs the relay loop on its own task.
    #[must_use]
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    #[tracing::instrument(skip(self), fields(webhook = %self.settings.webhook_url))]
    async fn run(self) {
        tracing::info!("Sync relay started");
        let mut ticker = tokio::time::interval(self.settings.poll_interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            match self.relay_once(Utc::now()).await {
                Ok(0) => {}
                Ok(delivered) => tracing::debug!(delivered, "Relayed sync events"),
                Err(error) => tracing::warn!(%error, "Sync relay pass failed"),
            }
        }
    }

    /// ## Summary
    /// Delivers one batch of due events and returns how many were delivered.
    ///
    /// ## Errors
    /// Returns an error if the outbox cannot be read. Individual delivery
    /// failures are recorded on their rows instead.
    pub async fn relay_once(&self, now: DateTime<Utc>) -> SyncResult<usize> {
        let mut conn = self
            .pool
            .get_connection()
            .await
            .map_err(|e| SyncError::Outbox(e.to_string()))?;

        let max_attempts = i32::try_from(self.settings.max_attempts).unwrap_or(i32::MAX);
        let rows = outbox::load_due(&mut conn, now, max_attempts, i64::from(self.settings.batch_size))
            .await
            .map_err(|e| SyncError::Outbox(e.to_string()))?;

        let mut delivered = 0;
        for row in rows {
            let id = row.id;
            let attempts = u32::try_from(row.attempts).unwrap_or(0).saturating_add(1);
            match self.deliver(&row).await {
                Ok(reply) => {
                    if row.kind == SyncEventKind::Created {
                        if let Some(event_id) = reply.event_id.as_deref() {
                            booking::set_external_event_id(&mut conn, row.booking_id, event_id)
                                .await
                                .map_err(|e| SyncError::Outbox(e.to_string()))?;
                        }
                    }
                    outbox::mark_delivered(&mut conn, id, Utc::now())
                        .await
                        .map_err(|e| SyncError::Outbox(e.to_string()))?;
                    delivered += 1;
                }
                Err(error) => {
                    let next_attempt_at = Utc::now() + backoff_delay(attempts);
                    if attempts >= self.settings.max_attempts {
                        tracing::error!(outbox_id = %id, attempts, %error, "Giving up on sync event");
                    } else {
                        tracing::warn!(
                            outbox_id = %id,
                            attempts,
                            %error,
                            %next_attempt_at,
                            "Sync delivery failed, will retry"
                        );
                    }
                    outbox::reschedule(&mut conn, id, next_attempt_at, &error.to_string())
                        .await
                        .map_err(|e| SyncError::Outbox(e.to_string()))?;
                }
            }
        }

        Ok(delivered)
    }

    async fn deliver(&self, row: &OutboxRow) -> SyncResult<WebhookReply> {
        let response = self
            .client
            .post(&self.settings.webhook_url)
            .json(&row.payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SyncError::Rejected(status.as_u16()));
        }

        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body).unwrap_or_default())
    }
}
