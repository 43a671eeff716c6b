//! Storage seams used by the scheduler.
//!
//! The scheduler never talks to a database directly. It reads and writes
//! through these traits, which have a PostgreSQL implementation ([`pg`]) and
//! an in-memory one ([`memory`]) used by tests and the memory backend.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use zaalplan_core::model::{Booking, BookingDraft, BookingFilter, Company, Contact, Inquiry};
use zaalplan_db::error::DbError;

pub mod memory;
pub mod pg;

/// Storage layer errors
#[derive(Error, Debug)]
pub enum StoreError {
    /// The write would overlap an existing booking in the same room and date.
    #[error("Overlaps booking {}", .0.id)]
    Overlap(Box<Booking>),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    #[error(transparent)]
    Database(DbError),

    #[error("Storage backend error: {0}")]
    Backend(String),
}

impl From<DbError> for StoreError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::PoolError(pool_err) => Self::Unavailable(pool_err.to_string()),
            other => Self::Database(other),
        }
    }
}

impl From<diesel::result::Error> for StoreError {
    fn from(err: diesel::result::Error) -> Self {
        Self::from(DbError::from(err))
    }
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Booking persistence.
///
/// Implementations assign ids and timestamps. Callers run the conflict
/// detector before writing; implementations may guard again under their own
/// isolation and report [`StoreError::Overlap`].
#[async_trait]
pub trait BookingStore: Send + Sync {
    async fn list(&self, filter: &BookingFilter) -> StoreResult<Vec<Booking>>;

    async fn get(&self, id: Uuid) -> StoreResult<Option<Booking>>;

    async fn create(&self, draft: BookingDraft) -> StoreResult<Booking>;

    /// All or nothing: either every draft is stored or none is.
    async fn create_many(&self, drafts: Vec<BookingDraft>) -> StoreResult<Vec<Booking>>;

    async fn update(&self, booking: Booking) -> StoreResult<Booking>;

    async fn delete(&self, id: Uuid) -> StoreResult<Booking>;

    async fn set_external_event_id(&self, id: Uuid, external_event_id: &str) -> StoreResult<()>;
}

#[async_trait]
pub trait InquiryStore: Send + Sync {
    async fn get(&self, id: Uuid) -> StoreResult<Option<Inquiry>>;

    async fn update(&self, inquiry: Inquiry) -> StoreResult<Inquiry>;
}

/// Display-only CRM lookups.
#[async_trait]
pub trait ContactDirectory: Send + Sync {
    async fn contact(&self, id: Uuid) -> StoreResult<Option<Contact>>;

    async fn company(&self, id: Uuid) -> StoreResult<Option<Company>>;
}
