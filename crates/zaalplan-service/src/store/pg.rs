//! PostgreSQL-backed stores.
//!
//! Booking writes run check-then-write inside a SERIALIZABLE transaction. The
//! `booking_no_overlap` exclusion constraint backs this up; when either the
//! constraint or serialization rejects a write, the clashing booking is
//! looked up again so callers still receive a concrete conflict.

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel::result::DatabaseErrorKind;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use uuid::Uuid;

use zaalplan_core::model::{Booking, BookingDraft, BookingFilter, Company, Contact, Inquiry};
use zaalplan_db::db::connection::{DbConnection, DbPool};
use zaalplan_db::db::query;
use zaalplan_db::db::{BOOKING_NO_OVERLAP, DbProvider};
use zaalplan_db::error::DbError;
use zaalplan_db::model::booking::{BookingChangeset, BookingRow, NewBookingRow};
use zaalplan_db::model::inquiry::InquiryChangeset;

use super::{BookingStore, ContactDirectory, InquiryStore, StoreError, StoreResult};
use crate::schedule::conflict::find_conflict;

/// Whether a failed write was rejected because of a concurrent or overlapping booking.
fn is_overlap_rejection(err: &StoreError) -> bool {
    let StoreError::Database(db_err) = err else {
        return false;
    };
    if db_err.constraint_name() == Some(BOOKING_NO_OVERLAP) {
        return true;
    }
    matches!(
        db_err,
        DbError::DatabaseError(diesel::result::Error::DatabaseError(
            DatabaseErrorKind::SerializationFailure,
            _
        ))
    )
}

fn to_bookings(rows: Vec<BookingRow>) -> StoreResult<Vec<Booking>> {
    rows.into_iter()
        .map(|row| Booking::try_from(row).map_err(|e| StoreError::from(DbError::from(e))))
        .collect()
}

async fn stored_overlap(
    conn: &mut AsyncPgConnection,
    booking: &Booking,
) -> StoreResult<Option<Booking>> {
    let row = query::booking::overlapping(
        &booking.room,
        booking.date,
        booking.slots(),
        Some(booking.id),
    )
    .select(BookingRow::as_select())
    .first(conn)
    .await
    .optional()?;
    Ok(row.map(Booking::try_from).transpose().map_err(DbError::from)?)
}

#[derive(Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    #[must_use]
    pub const fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    async fn connection(&self) -> StoreResult<DbConnection<'_>> {
        Ok(self.pool.get_connection().await?)
    }

    /// Turns a rejected write into [`StoreError::Overlap`] when the clash can be identified.
    async fn explain_rejection(
        &self,
        err: StoreError,
        candidates: &[Booking],
    ) -> StoreError {
        if !is_overlap_rejection(&err) {
            return err;
        }
        tracing::debug!(%err, "Booking write rejected, locating the clash");

        let Ok(mut conn) = self.connection().await else {
            return err;
        };
        for candidate in candidates {
            match stored_overlap(&mut conn, candidate).await {
                Ok(Some(existing)) => return StoreError::Overlap(Box::new(existing)),
                Ok(None) => {}
                Err(lookup_err) => {
                    tracing::warn!(%lookup_err, "Could not look up overlapping booking");
                    return err;
                }
            }
        }
        for (index, candidate) in candidates.iter().enumerate() {
            let earlier = &candidates[..index];
            if let Some(existing) = find_conflict(
                earlier,
                &candidate.room,
                candidate.date,
                candidate.slots(),
                None,
            ) {
                return StoreError::Overlap(Box::new(existing.clone()));
            }
        }
        StoreError::Backend("booking write rejected by a concurrent change, retry".into())
    }

    async fn insert_guarded(&self, bookings: &[Booking]) -> StoreResult<Vec<Booking>> {
        let mut conn = self.connection().await?;
        let result = conn
            .build_transaction()
            .serializable()
            .run(|tx| {
                async move {
                    for booking in bookings {
                        if let Some(existing) = stored_overlap(tx, booking).await? {
                            return Err(StoreError::Overlap(Box::new(existing)));
                        }
                    }
                    let rows: Vec<NewBookingRow<'_>> =
                        bookings.iter().map(NewBookingRow::from).collect();
                    let stored = query::booking::insert_batch(tx, &rows).await?;
                    to_bookings(stored)
                }
                .scope_boxed()
            })
            .await;
        drop(conn);

        match result {
            Ok(stored) => Ok(stored),
            Err(err) => Err(self.explain_rejection(err, bookings).await),
        }
    }
}

#[async_trait]
impl BookingStore for PgStore {
    #[tracing::instrument(skip(self))]
    async fn list(&self, filter: &BookingFilter) -> StoreResult<Vec<Booking>> {
        let mut conn = self.connection().await?;
        let rows = query::booking::filtered(filter)
            .select(BookingRow::as_select())
            .load(&mut conn)
            .await?;
        to_bookings(rows)
    }

    #[tracing::instrument(skip(self))]
    async fn get(&self, id: Uuid) -> StoreResult<Option<Booking>> {
        let mut conn = self.connection().await?;
        let row = query::booking::by_id(id)
            .select(BookingRow::as_select())
            .first(&mut conn)
            .await
            .optional()?;
        Ok(row.map(Booking::try_from).transpose().map_err(DbError::from)?)
    }

    #[tracing::instrument(skip(self, draft), fields(room = %draft.room, date = %draft.date))]
    async fn create(&self, draft: BookingDraft) -> StoreResult<Booking> {
        let booking = draft.into_booking(Uuid::now_v7(), Utc::now());
        let mut stored = self.insert_guarded(std::slice::from_ref(&booking)).await?;
        stored
            .pop()
            .ok_or_else(|| StoreError::Backend("insert returned no row".into()))
    }

    #[tracing::instrument(skip(self, drafts), fields(count = drafts.len()))]
    async fn create_many(&self, drafts: Vec<BookingDraft>) -> StoreResult<Vec<Booking>> {
        let now = Utc::now();
        let bookings: Vec<Booking> = drafts
            .into_iter()
            .map(|draft| draft.into_booking(Uuid::now_v7(), now))
            .collect();
        self.insert_guarded(&bookings).await
    }

    #[tracing::instrument(skip(self, booking), fields(booking_id = %booking.id))]
    async fn update(&self, booking: Booking) -> StoreResult<Booking> {
        let mut conn = self.connection().await?;
        let candidate = &booking;
        let result = conn
            .build_transaction()
            .serializable()
            .run(|tx| {
                async move {
                    if let Some(existing) = stored_overlap(tx, candidate).await? {
                        return Err(StoreError::Overlap(Box::new(existing)));
                    }
                    let changes = BookingChangeset::from(candidate);
                    let row = query::booking::update(tx, candidate.id, &changes)
                        .await?
                        .ok_or_else(|| StoreError::NotFound(format!("booking {}", candidate.id)))?;
                    Ok(Booking::try_from(row).map_err(DbError::from)?)
                }
                .scope_boxed()
            })
            .await;
        drop(conn);

        match result {
            Ok(updated) => Ok(updated),
            Err(err) => Err(self.explain_rejection(err, std::slice::from_ref(&booking)).await),
        }
    }

    #[tracing::instrument(skip(self))]
    async fn delete(&self, id: Uuid) -> StoreResult<Booking> {
        let mut conn = self.connection().await?;
        let row = query::booking::delete(&mut conn, id)
            .await?
            .ok_or_else(|| StoreError::NotFound(format!("booking {id}")))?;
        Ok(Booking::try_from(row).map_err(DbError::from)?)
    }

    #[tracing::instrument(skip(self))]
    async fn set_external_event_id(&self, id: Uuid, external_event_id: &str) -> StoreResult<()> {
        let mut conn = self.connection().await?;
        let updated = query::booking::set_external_event_id(&mut conn, id, external_event_id).await?;
        if updated == 0 {
            return Err(StoreError::NotFound(format!("booking {id}")));
        }
        Ok(())
    }
}

#[async_trait]
impl InquiryStore for PgStore {
    #[tracing::instrument(skip(self))]
    async fn get(&self, id: Uuid) -> StoreResult<Option<Inquiry>> {
        let mut conn = self.connection().await?;
        let row = query::inquiry::by_id(id)
            .select(zaalplan_db::model::inquiry::InquiryRow::as_select())
            .first(&mut conn)
            .await
            .optional()?;
        Ok(row.map(Inquiry::from))
    }

    #[tracing::instrument(skip(self, inquiry), fields(inquiry_id = %inquiry.id, status = %inquiry.status))]
    async fn update(&self, mut inquiry: Inquiry) -> StoreResult<Inquiry> {
        inquiry.updated_at = Utc::now();
        let mut conn = self.connection().await?;
        let changes = InquiryChangeset::from(&inquiry);
        let row = query::inquiry::update(&mut conn, inquiry.id, &changes)
            .await?
            .ok_or_else(|| StoreError::NotFound(format!("inquiry {}", inquiry.id)))?;
        Ok(Inquiry::from(row))
    }
}

#[async_trait]
impl ContactDirectory for PgStore {
    async fn contact(&self, id: Uuid) -> StoreResult<Option<Contact>> {
        let mut conn = self.connection().await?;
        Ok(query::contact::find_contact(&mut conn, id)
            .await?
            .map(Contact::from))
    }

    async fn company(&self, id: Uuid) -> StoreResult<Option<Company>> {
        let mut conn = self.connection().await?;
        Ok(query::contact::find_company(&mut conn, id)
            .await?
            .map(Company::from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn database_error(kind: DatabaseErrorKind, message: &str) -> StoreError {
        StoreError::from(diesel::result::Error::DatabaseError(
            kind,
            Box::new(message.to_string()),
        ))
    }

    #[test]
    fn test_serialization_failure_counts_as_overlap_rejection() {
        let err = database_error(DatabaseErrorKind::SerializationFailure, "could not serialize");
        assert!(is_overlap_rejection(&err));
    }

    #[test]
    fn test_other_database_errors_are_passed_through() {
        let err = database_error(DatabaseErrorKind::NotNullViolation, "null title");
        assert!(!is_overlap_rejection(&err));
        assert!(!is_overlap_rejection(&StoreError::NotFound("booking".into())));
    }
}
