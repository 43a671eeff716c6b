//! Turning a pipeline inquiry and its staged date options into booking drafts.
//!
//! This module only plans; [`crate::booking::BookingService::convert_inquiry`]
//! performs the writes.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use zaalplan_core::model::{
    Booking, BookingDraft, BookingStatus, Inquiry, InquiryStatus, PreparationStatus, Room,
};
use zaalplan_core::time::WallTime;

use crate::error::{ServiceError, ServiceResult};
use crate::schedule::recurrence::{self, Recurrence};

/// Most date options a single conversion accepts.
pub const MAX_DATE_OPTIONS: usize = 3;

/// Candidate slot staged in the scheduling dialog. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateOption {
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub room: Option<Room>,
    pub start: WallTime,
    pub end: WallTime,
    pub status: BookingStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionRequest {
    pub options: Vec<DateOption>,
    /// Shared by every option.
    #[serde(default)]
    pub recurrence: Recurrence,
    /// Overrides the title derived from the inquiry.
    #[serde(default)]
    pub title: Option<String>,
}

/// ## Summary
/// Builds the drafts a conversion would create, ordered by date.
///
/// Options without both a date and a room are skipped. With
/// [`Recurrence::SpecificDates`] the shared list replaces each option's own
/// date: every remaining option is booked in its room and window on each
/// listed date.
///
/// ## Errors
/// Returns a validation error when the inquiry is in a terminal stage, when
/// more than [`MAX_DATE_OPTIONS`] options are given, when no option has both
/// a date and a room, or when the recurrence is invalid.
pub fn plan_conversion(
    inquiry: &Inquiry,
    request: &ConversionRequest,
) -> ServiceResult<Vec<BookingDraft>> {
    if inquiry.status.is_terminal() {
        return Err(ServiceError::ValidationError(format!(
            "inquiry is {} and can no longer be scheduled",
            inquiry.status
        )));
    }
    if request.options.len() > MAX_DATE_OPTIONS {
        return Err(ServiceError::ValidationError(format!(
            "at most {MAX_DATE_OPTIONS} date options can be converted at once"
        )));
    }
    request.recurrence.check_inquiry_limits()?;

    let title = request
        .title
        .as_deref()
        .map(str::trim)
        .filter(|title| !title.is_empty())
        .map_or_else(|| inquiry.default_booking_title(), ToString::to_string);

    let bases: Vec<BookingDraft> = request
        .options
        .iter()
        .filter_map(|option| {
            let date = option.date?;
            let room = option.room.clone()?;
            Some(BookingDraft {
                inquiry_id: Some(inquiry.id),
                room,
                date,
                start: option.start,
                end: option.end,
                title: title.clone(),
                contact_name: inquiry.contact_name.clone(),
                contact_id: inquiry.contact_id,
                status: option.status,
                guest_count: inquiry.guest_count,
                room_setup: None,
                requirements: None,
                notes: inquiry.message.clone(),
                preparation_status: PreparationStatus::Pending,
            })
        })
        .collect();

    if bases.is_empty() {
        return Err(ServiceError::ValidationError(
            "at least one date option needs both a date and a room".into(),
        ));
    }

    recurrence::expand_all(&bases, &request.recurrence)
}

/// Pipeline stage after a successful conversion.
#[must_use]
pub fn next_status(created: &[Booking]) -> InquiryStatus {
    if created
        .iter()
        .any(|booking| booking.status == BookingStatus::Confirmed)
    {
        InquiryStatus::Reserved
    } else {
        InquiryStatus::Option
    }
}
