use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use zaalplan_core::error::CoreError;
use zaalplan_core::model::{Booking, Room};
use zaalplan_core::time::{SlotRange, WallTime};

use crate::store::StoreError;

/// The booking that stands in the way of a requested interval.
///
/// `booking_id` is `None` when the clash is with another, not yet stored,
/// instance of the same batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictDetails {
    pub booking_id: Option<Uuid>,
    pub title: String,
    pub room: Room,
    pub date: NaiveDate,
    pub start: WallTime,
    pub end: WallTime,
}

impl ConflictDetails {
    #[must_use]
    pub fn pending(title: &str, room: &Room, date: NaiveDate, range: SlotRange) -> Self {
        Self {
            booking_id: None,
            title: title.to_string(),
            room: room.clone(),
            date,
            start: range.start_time(),
            end: range.end_time(),
        }
    }
}

impl From<&Booking> for ConflictDetails {
    fn from(booking: &Booking) -> Self {
        Self {
            booking_id: Some(booking.id),
            title: booking.title.clone(),
            room: booking.room.clone(),
            date: booking.date,
            start: booking.start,
            end: booking.end,
        }
    }
}

impl std::fmt::Display for ConflictDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "conflicts with '{}' ({}, {} {}-{})",
            self.title, self.room, self.date, self.start, self.end
        )
    }
}

/// Service layer errors
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("{0}")]
    Conflict(Box<ConflictDetails>),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Persistence error: {0}")]
    PersistenceError(StoreError),

    #[error("Invariant violation: {0}")]
    InvariantViolation(&'static str),
}

impl ServiceError {
    #[must_use]
    pub fn conflict(details: ConflictDetails) -> Self {
        Self::Conflict(Box::new(details))
    }

    /// Short machine-readable name of the error kind.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::ValidationError(_) => "validation",
            Self::Conflict(_) => "conflict",
            Self::NotFound(_) => "not_found",
            Self::PersistenceError(_) => "persistence",
            Self::InvariantViolation(_) => "invariant_violation",
        }
    }
}

impl From<CoreError> for ServiceError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ValidationError(msg) | CoreError::InvalidInput(msg) => {
                Self::ValidationError(msg)
            }
            CoreError::InvariantViolation(msg) => Self::InvariantViolation(msg),
            CoreError::ConfigError(msg) => Self::PersistenceError(StoreError::Backend(msg)),
        }
    }
}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Overlap(existing) => Self::conflict(ConflictDetails::from(&*existing)),
            StoreError::NotFound(what) => Self::NotFound(what),
            other => Self::PersistenceError(other),
        }
    }
}

pub type ServiceResult<T> = std::result::Result<T, ServiceError>;
