//! Booking service: the scheduler's write path.
//!
//! Every create, edit, move and batch insert is validated, checked for
//! conflicts against fresh store data and then written. Successful writes
//! publish a sync event.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use zaalplan_core::model::{Booking, BookingDraft, BookingFilter, Inquiry, Room, Venue};
use zaalplan_core::time::SlotRange;

use crate::directory::{self, BookingDetails};
use crate::error::{ConflictDetails, ServiceError, ServiceResult};
use crate::schedule::conflict::{find_batch_conflict, find_conflict};
use crate::schedule::convert::{self, ConversionRequest};
use crate::schedule::drag::MoveRequest;
use crate::schedule::recurrence::{self, Recurrence};
use crate::store::{BookingStore, ContactDirectory, InquiryStore};
use crate::sync::{SyncEvent, SyncPublisher, publish_quietly};

/// Result of converting an inquiry.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ConversionOutcome {
    pub inquiry: Inquiry,
    pub bookings: Vec<Booking>,
}

#[derive(Clone)]
pub struct BookingService {
    venue: Venue,
    bookings: Arc<dyn BookingStore>,
    inquiries: Arc<dyn InquiryStore>,
    directory: Arc<dyn ContactDirectory>,
    sync: Arc<dyn SyncPublisher>,
}

impl BookingService {
    #[must_use]
    pub fn new(
        venue: Venue,
        bookings: Arc<dyn BookingStore>,
        inquiries: Arc<dyn InquiryStore>,
        directory: Arc<dyn ContactDirectory>,
        sync: Arc<dyn SyncPublisher>,
    ) -> Self {
        Self {
            venue,
            bookings,
            inquiries,
            directory,
            sync,
        }
    }

    #[must_use]
    pub const fn venue(&self) -> &Venue {
        &self.venue
    }

    /// ## Summary
    /// Lists bookings ordered by date, room column and start time.
    ///
    /// ## Errors
    /// Returns a persistence error if the store cannot be read.
    #[tracing::instrument(skip(self))]
    pub async fn list(&self, filter: &BookingFilter) -> ServiceResult<Vec<Booking>> {
        let mut bookings = self.bookings.list(filter).await?;
        bookings.sort_by_key(|booking| {
            (
                booking.date,
                self.venue.column_of(&booking.room).unwrap_or(usize::MAX),
                booking.start,
            )
        });
        Ok(bookings)
    }

    /// Bookings of every room on `date`, the working set of a planner day.
    ///
    /// ## Errors
    /// Returns a persistence error if the store cannot be read.
    pub async fn day(&self, date: NaiveDate) -> ServiceResult<Vec<Booking>> {
        self.list(&BookingFilter {
            date: Some(date),
            ..BookingFilter::default()
        })
        .await
    }

    /// ## Errors
    /// Returns `NotFound` for an unknown id.
    #[tracing::instrument(skip(self))]
    pub async fn get(&self, id: Uuid) -> ServiceResult<Booking> {
        self.bookings
            .get(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("booking {id}")))
    }

    /// ## Summary
    /// Loads a booking with its contact and company display names.
    ///
    /// ## Errors
    /// Returns `NotFound` for an unknown id. Directory failures are not errors.
    pub async fn details(&self, id: Uuid) -> ServiceResult<BookingDetails> {
        let booking = self.get(id).await?;
        Ok(directory::describe(self.directory.as_ref(), booking).await)
    }

    /// ## Summary
    /// Finds the booking, if any, that blocks `range` in `room` on `date`.
    ///
    /// ## Errors
    /// Returns a validation error for an unknown room and a persistence error
    /// if the store cannot be read.
    #[tracing::instrument(skip(self))]
    pub async fn check(
        &self,
        room: &Room,
        date: NaiveDate,
        range: SlotRange,
        exclude: Option<Uuid>,
    ) -> ServiceResult<Option<ConflictDetails>> {
        self.venue.require(room)?;
        let existing = self
            .bookings
            .list(&BookingFilter::room_on(room, date))
            .await?;
        Ok(find_conflict(&existing, room, date, range, exclude).map(ConflictDetails::from))
    }

    async fn ensure_free(
        &self,
        room: &Room,
        date: NaiveDate,
        range: SlotRange,
        exclude: Option<Uuid>,
    ) -> ServiceResult<()> {
        match self.check(room, date, range, exclude).await? {
            Some(conflict) => {
                tracing::debug!(%conflict, "Rejecting conflicting write");
                Err(ServiceError::conflict(conflict))
            }
            None => Ok(()),
        }
    }

    /// ## Summary
    /// Creates a booking, or a series when `recurrence` repeats.
    ///
    /// ## Side Effects
    /// - Stores every instance in one all-or-nothing batch
    /// - Publishes a created event per instance
    ///
    /// ## Errors
    /// Returns a validation error for an invalid draft or recurrence, and a
    /// conflict if any instance overlaps a stored booking or another instance.
    #[tracing::instrument(skip(self, draft), fields(room = %draft.room, date = %draft.date))]
    pub async fn create(
        &self,
        draft: BookingDraft,
        recurrence: &Recurrence,
    ) -> ServiceResult<Vec<Booking>> {
        draft.validate(&self.venue)?;
        let instances = recurrence::expand(&draft, recurrence)?;
        self.create_batch(instances).await
    }

    /// ## Summary
    /// Validates, conflict-checks and stores `drafts` as one batch.
    ///
    /// ## Errors
    /// Returns a conflict naming the first clash; nothing is stored then.
    async fn create_batch(&self, drafts: Vec<BookingDraft>) -> ServiceResult<Vec<Booking>> {
        let drafts = self.checked_batch(drafts).await?;
        let created = match <[BookingDraft; 1]>::try_from(drafts) {
            Ok([draft]) => vec![self.bookings.create(draft).await?],
            Err(drafts) => self.bookings.create_many(drafts).await?,
        };
        tracing::info!(count = created.len(), "Bookings created");
        self.publish_created(&created).await;
        Ok(created)
    }

    /// Validates every draft and checks the batch against the stored
    /// bookings of each (room, date) it touches and against itself.
    async fn checked_batch(&self, drafts: Vec<BookingDraft>) -> ServiceResult<Vec<BookingDraft>> {
        let mut checked = Vec::with_capacity(drafts.len());
        for draft in drafts {
            let range = draft.validate(&self.venue)?;
            checked.push((draft, range));
        }

        let mut existing: Vec<Booking> = Vec::new();
        let mut loaded: Vec<(&Room, NaiveDate)> = Vec::new();
        for (draft, _) in &checked {
            let key = (&draft.room, draft.date);
            if loaded.contains(&key) {
                continue;
            }
            existing.extend(
                self.bookings
                    .list(&BookingFilter::room_on(&draft.room, draft.date))
                    .await?,
            );
            loaded.push(key);
        }

        if let Some(conflict) = find_batch_conflict(&existing, &checked) {
            tracing::debug!(%conflict, instances = checked.len(), "Rejecting conflicting batch");
            return Err(ServiceError::conflict(conflict));
        }
        Ok(checked.into_iter().map(|(draft, _)| draft).collect())
    }

    async fn publish_created(&self, created: &[Booking]) {
        for booking in created {
            publish_quietly(
                self.sync.as_ref(),
                SyncEvent::Created {
                    booking: booking.clone(),
                },
            )
            .await;
        }
    }

    /// ## Summary
    /// Replaces the editable fields of a booking (edit and resize).
    ///
    /// ## Errors
    /// Returns `NotFound`, a validation error, or a conflict with any booking
    /// other than the edited one.
    #[tracing::instrument(skip(self, draft))]
    pub async fn update(&self, id: Uuid, draft: BookingDraft) -> ServiceResult<Booking> {
        let range = draft.validate(&self.venue)?;
        let current = self.get(id).await?;
        self.ensure_free(&draft.room, draft.date, range, Some(id))
            .await?;

        let updated = self
            .bookings
            .update(current.with_draft(draft, Utc::now()))
            .await?;
        tracing::info!(booking_id = %id, "Booking updated");
        publish_quietly(
            self.sync.as_ref(),
            SyncEvent::Updated {
                booking: updated.clone(),
            },
        )
        .await;
        Ok(updated)
    }

    /// ## Summary
    /// Commits a drag move after re-checking it against fresh store data.
    ///
    /// Only the target's room, date and start slot are taken from the request;
    /// the end follows from the stored booking's duration.
    ///
    /// ## Errors
    /// Returns `NotFound`, a validation error for a target outside the venue
    /// or one that would run past the last slot, or a conflict. Nothing is
    /// changed on error.
    #[tracing::instrument(skip(self, request), fields(booking_id = %request.booking_id))]
    pub async fn commit_move(&self, request: MoveRequest) -> ServiceResult<Booking> {
        let current = self.get(request.booking_id).await?;
        let target = request.target;
        let original = current.slots();
        if target.slots.start > original.latest_start() {
            return Err(ServiceError::ValidationError(format!(
                "a {}-slot booking cannot start at {}",
                original.duration_slots(),
                target.slots.start_time()
            )));
        }
        let slots = original.with_start(target.slots.start);

        let mut draft = current.to_draft();
        draft.room = target.room;
        draft.date = target.date;
        draft.start = slots.start_time();
        draft.end = slots.end_time();
        self.update(current.id, draft).await
    }

    /// ## Summary
    /// Deletes a booking.
    ///
    /// ## Side Effects
    /// Publishes a deleted event when the booking was synced before.
    ///
    /// ## Errors
    /// Returns `NotFound` for an unknown id.
    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, id: Uuid) -> ServiceResult<()> {
        let deleted = self.bookings.delete(id).await?;
        tracing::info!(booking_id = %id, "Booking deleted");
        if let Some(event) = SyncEvent::deleted(&deleted) {
            publish_quietly(self.sync.as_ref(), event).await;
        }
        Ok(())
    }

    /// ## Errors
    /// Returns `NotFound` for an unknown id.
    pub async fn inquiry(&self, id: Uuid) -> ServiceResult<Inquiry> {
        self.inquiries
            .get(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("inquiry {id}")))
    }

    /// Bookings created from an inquiry.
    ///
    /// ## Errors
    /// Returns `NotFound` for an unknown inquiry.
    pub async fn inquiry_bookings(&self, id: Uuid) -> ServiceResult<Vec<Booking>> {
        self.inquiry(id).await?;
        self.list(&BookingFilter {
            inquiry_id: Some(id),
            ..BookingFilter::default()
        })
        .await
    }

    /// ## Summary
    /// Converts an inquiry and its date options into bookings and moves the
    /// inquiry to `reserved` (any confirmed booking) or `option`.
    ///
    /// ## Side Effects
    /// - Stores all bookings in one batch
    /// - Updates the inquiry's pipeline stage
    /// - Publishes created events once both writes succeeded
    ///
    /// ## Errors
    /// Returns a validation error or conflict before anything is written. If
    /// the inquiry update fails, the created bookings are removed again and a
    /// persistence error is returned.
    #[tracing::instrument(skip(self, request), fields(options = request.options.len()))]
    pub async fn convert_inquiry(
        &self,
        inquiry_id: Uuid,
        request: &ConversionRequest,
    ) -> ServiceResult<ConversionOutcome> {
        let inquiry = self.inquiry(inquiry_id).await?;
        let drafts = convert::plan_conversion(&inquiry, request)?;
        let drafts = self.checked_batch(drafts).await?;
        let created = self.bookings.create_many(drafts).await?;

        let previous = inquiry.status;
        let mut updated_inquiry = inquiry;
        updated_inquiry.status = convert::next_status(&created);
        let inquiry = match self.inquiries.update(updated_inquiry).await {
            Ok(inquiry) => inquiry,
            Err(error) => {
                tracing::error!(%inquiry_id, %error, "Inquiry update failed, removing created bookings");
                self.compensate(&created).await;
                return Err(ServiceError::PersistenceError(error));
            }
        };

        tracing::info!(
            %inquiry_id,
            from = %previous,
            to = %inquiry.status,
            bookings = created.len(),
            "Inquiry converted"
        );
        self.publish_created(&created).await;

        Ok(ConversionOutcome {
            inquiry,
            bookings: created,
        })
    }

    async fn compensate(&self, created: &[Booking]) {
        for booking in created {
            if let Err(error) = self.bookings.delete(booking.id).await {
                tracing::error!(booking_id = %booking.id, %error, "Compensating delete failed");
            }
        }
    }
}
