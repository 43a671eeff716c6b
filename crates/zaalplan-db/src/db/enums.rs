//! Database enum types with Diesel serialization.
//!
//! This module provides type-safe enum wrappers for database CHECK constraints.
//! Each enum implements `ToSql` and `FromSql` for automatic conversion between Rust and `PostgreSQL`.

use diesel::deserialize::{self, FromSql, FromSqlRow};
use diesel::expression::AsExpression;
use diesel::pg::{Pg, PgValue};
use diesel::serialize::{self, IsNull, Output, ToSql};
use diesel::sql_types::Text;
use std::fmt;
use std::io::Write;

use zaalplan_core::model::{booking, inquiry};

/// Booking status.
///
/// Maps to `booking.status` CHECK constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsExpression, FromSqlRow)]
#[diesel(sql_type = Text)]
pub enum BookingStatus {
    Confirmed,
    Option,
}

impl ToSql<Text, Pg> for BookingStatus {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Pg>) -> serialize::Result {
        out.write_all(self.as_str().as_bytes())?;
        Ok(IsNull::No)
    }
}

impl FromSql<Text, Pg> for BookingStatus {
    fn from_sql(bytes: PgValue<'_>) -> deserialize::Result<Self> {
        match bytes.as_bytes() {
            b"confirmed" => Ok(Self::Confirmed),
            b"option" => Ok(Self::Option),
            _ => Err("Unrecognized enum variant".into()),
        }
    }
}

impl BookingStatus {
    /// Returns the database string representation of this status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Confirmed => "confirmed",
            Self::Option => "option",
        }
    }
}

impl From<BookingStatus> for booking::BookingStatus {
    fn from(db_status: BookingStatus) -> Self {
        match db_status {
            BookingStatus::Confirmed => Self::Confirmed,
            BookingStatus::Option => Self::Option,
        }
    }
}

impl From<booking::BookingStatus> for BookingStatus {
    fn from(core_status: booking::BookingStatus) -> Self {
        match core_status {
            booking::BookingStatus::Confirmed => Self::Confirmed,
            booking::BookingStatus::Option => Self::Option,
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Preparation workflow state.
///
/// Maps to `booking.preparation_status` CHECK constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsExpression, FromSqlRow)]
#[diesel(sql_type = Text)]
pub enum PreparationStatus {
    Pending,
    InfoWaiting,
    InProgress,
    Ready,
}

impl ToSql<Text, Pg> for PreparationStatus {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Pg>) -> serialize::Result {
        out.write_all(self.as_str().as_bytes())?;
        Ok(IsNull::No)
    }
}

impl FromSql<Text, Pg> for PreparationStatus {
    fn from_sql(bytes: PgValue<'_>) -> deserialize::Result<Self> {
        match bytes.as_bytes() {
            b"pending" => Ok(Self::Pending),
            b"info_waiting" => Ok(Self::InfoWaiting),
            b"in_progress" => Ok(Self::InProgress),
            b"ready" => Ok(Self::Ready),
            _ => Err("Unrecognized enum variant".into()),
        }
    }
}

impl PreparationStatus {
    /// Returns the database string representation of this preparation state.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InfoWaiting => "info_waiting",
            Self::InProgress => "in_progress",
            Self::Ready => "ready",
        }
    }
}

impl From<PreparationStatus> for booking::PreparationStatus {
    fn from(db_status: PreparationStatus) -> Self {
        match db_status {
            PreparationStatus::Pending => Self::Pending,
            PreparationStatus::InfoWaiting => Self::InfoWaiting,
            PreparationStatus::InProgress => Self::InProgress,
            PreparationStatus::Ready => Self::Ready,
        }
    }
}

impl From<booking::PreparationStatus> for PreparationStatus {
    fn from(core_status: booking::PreparationStatus) -> Self {
        match core_status {
            booking::PreparationStatus::Pending => Self::Pending,
            booking::PreparationStatus::InfoWaiting => Self::InfoWaiting,
            booking::PreparationStatus::InProgress => Self::InProgress,
            booking::PreparationStatus::Ready => Self::Ready,
        }
    }
}

impl fmt::Display for PreparationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inquiry pipeline stage.
///
/// Maps to `inquiry.status` CHECK constraint. The stage list itself lives in
/// the core model; the database form is its snake-case name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsExpression, FromSqlRow)]
#[diesel(sql_type = Text)]
pub struct InquiryStatus(pub inquiry::InquiryStatus);

impl ToSql<Text, Pg> for InquiryStatus {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Pg>) -> serialize::Result {
        out.write_all(self.0.as_str().as_bytes())?;
        Ok(IsNull::No)
    }
}

impl FromSql<Text, Pg> for InquiryStatus {
    fn from_sql(bytes: PgValue<'_>) -> deserialize::Result<Self> {
        let text = std::str::from_utf8(bytes.as_bytes())?;
        text.parse::<inquiry::InquiryStatus>()
            .map(Self)
            .map_err(|_err| "Unrecognized enum variant".into())
    }
}

impl From<InquiryStatus> for inquiry::InquiryStatus {
    fn from(db_status: InquiryStatus) -> Self {
        db_status.0
    }
}

impl From<inquiry::InquiryStatus> for InquiryStatus {
    fn from(core_status: inquiry::InquiryStatus) -> Self {
        Self(core_status)
    }
}

impl fmt::Display for InquiryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.as_str())
    }
}

/// Kind of change carried by an outbox entry.
///
/// Maps to `sync_outbox.kind` CHECK constraint.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    AsExpression,
    FromSqlRow,
    serde::Serialize,
    serde::Deserialize,
)]
#[diesel(sql_type = Text)]
#[serde(rename_all = "snake_case")]
pub enum SyncEventKind {
    Created,
    Updated,
    Deleted,
}

impl ToSql<Text, Pg> for SyncEventKind {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Pg>) -> serialize::Result {
        out.write_all(self.as_str().as_bytes())?;
        Ok(IsNull::No)
    }
}

impl FromSql<Text, Pg> for SyncEventKind {
    fn from_sql(bytes: PgValue<'_>) -> deserialize::Result<Self> {
        match bytes.as_bytes() {
            b"created" => Ok(Self::Created),
            b"updated" => Ok(Self::Updated),
            b"deleted" => Ok(Self::Deleted),
            _ => Err("Unrecognized enum variant".into()),
        }
    }
}

impl SyncEventKind {
    /// Returns the database string representation of this event kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Updated => "updated",
            Self::Deleted => "deleted",
        }
    }
}

impl fmt::Display for SyncEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
