use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{CoreError, CoreResult};
use crate::model::room::{Room, Venue};
use crate::time::{SlotRange, WallTime};

/// Whether a booking is final or a tentative hold on the room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Confirmed,
    /// Tentative hold, not yet final.
    Option,
}

impl BookingStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Confirmed => "confirmed",
            Self::Option => "option",
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookingStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "confirmed" => Ok(Self::Confirmed),
            "option" => Ok(Self::Option),
            other => Err(CoreError::InvalidInput(format!(
                "unknown booking status '{other}'"
            ))),
        }
    }
}

/// Operational preparation workflow, independent of scheduling.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PreparationStatus {
    #[default]
    Pending,
    InfoWaiting,
    InProgress,
    Ready,
}

impl PreparationStatus {
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

impl fmt::Display for PreparationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PreparationStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "info_waiting" => Ok(Self::InfoWaiting),
            "in_progress" => Ok(Self::InProgress),
            "ready" => Ok(Self::Ready),
            other => Err(CoreError::InvalidInput(format!(
                "unknown preparation status '{other}'"
            ))),
        }
    }
}

/// A reservation of one room for one interval on one date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    pub id: Uuid,
    pub inquiry_id: Option<Uuid>,
    pub room: Room,
    pub date: NaiveDate,
    pub start: WallTime,
    pub end: WallTime,
    pub title: String,
    pub contact_name: String,
    pub contact_id: Option<Uuid>,
    pub status: BookingStatus,
    pub guest_count: Option<i32>,
    pub room_setup: Option<String>,
    pub requirements: Option<String>,
    pub notes: Option<String>,
    pub preparation_status: PreparationStatus,
    pub external_event_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    /// Slot interval of a stored booking. Stored bookings were validated on write.
    #[must_use]
    pub fn slots(&self) -> SlotRange {
        SlotRange {
            start: self.start.slot(),
            end: self.end.slot(),
        }
    }

    #[must_use]
    pub fn to_draft(&self) -> BookingDraft {
        BookingDraft {
            inquiry_id: self.inquiry_id,
            room: self.room.clone(),
            date: self.date,
            start: self.start,
            end: self.end,
            title: self.title.clone(),
            contact_name: self.contact_name.clone(),
            contact_id: self.contact_id,
            status: self.status,
            guest_count: self.guest_count,
            room_setup: self.room_setup.clone(),
            requirements: self.requirements.clone(),
            notes: self.notes.clone(),
            preparation_status: self.preparation_status,
        }
    }

    /// ## Summary
    /// Replaces the editable fields with those of `draft`, keeping identity,
    /// sync linkage and creation time.
    #[must_use]
    pub fn with_draft(self, draft: BookingDraft, now: DateTime<Utc>) -> Self {
        Self {
            id: self.id,
            inquiry_id: draft.inquiry_id.or(self.inquiry_id),
            room: draft.room,
            date: draft.date,
            start: draft.start,
            end: draft.end,
            title: draft.title,
            contact_name: draft.contact_name,
            contact_id: draft.contact_id,
            status: draft.status,
            guest_count: draft.guest_count,
            room_setup: draft.room_setup,
            requirements: draft.requirements,
            notes: draft.notes,
            preparation_status: draft.preparation_status,
            external_event_id: self.external_event_id,
            created_at: self.created_at,
            updated_at: now,
        }
    }
}

/// Everything needed to create a booking; the store assigns id and timestamps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingDraft {
    #[serde(default)]
    pub inquiry_id: Option<Uuid>,
    pub room: Room,
    pub date: NaiveDate,
    pub start: WallTime,
    pub end: WallTime,
    pub title: String,
    #[serde(default)]
    pub contact_name: String,
    #[serde(default)]
    pub contact_id: Option<Uuid>,
    pub status: BookingStatus,
    #[serde(default)]
    pub guest_count: Option<i32>,
    #[serde(default)]
    pub room_setup: Option<String>,
    #[serde(default)]
    pub requirements: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub preparation_status: PreparationStatus,
}

impl BookingDraft {
    /// ## Summary
    /// Checks the draft against the venue and returns its slot interval.
    ///
    /// ## Errors
    /// Returns a validation error for an unknown room, a blank title, a
    /// negative guest count, or an empty or inverted interval.
    pub fn validate(&self, venue: &Venue) -> CoreResult<SlotRange> {
        venue.require(&self.room)?;
        if self.title.trim().is_empty() {
            return Err(CoreError::ValidationError("title is required".into()));
        }
        if self.guest_count.is_some_and(|count| count < 0) {
            return Err(CoreError::ValidationError(
                "guest count must not be negative".into(),
            ));
        }
        SlotRange::between(self.start, self.end)
    }

    #[must_use]
    pub fn on_date(&self, date: NaiveDate) -> Self {
        Self {
            date,
            ..self.clone()
        }
    }

    /// Materialises the draft, as a store does on insert.
    #[must_use]
    pub fn into_booking(self, id: Uuid, now: DateTime<Utc>) -> Booking {
        Booking {
            id,
            inquiry_id: self.inquiry_id,
            room: self.room,
            date: self.date,
            start: self.start,
            end: self.end,
            title: self.title,
            contact_name: self.contact_name,
            contact_id: self.contact_id,
            status: self.status,
            guest_count: self.guest_count,
            room_setup: self.room_setup,
            requirements: self.requirements,
            notes: self.notes,
            preparation_status: self.preparation_status,
            external_event_id: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Listing filter; unset fields do not restrict.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingFilter {
    #[serde(default)]
    pub room: Option<Room>,
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub from: Option<NaiveDate>,
    #[serde(default)]
    pub to: Option<NaiveDate>,
    #[serde(default)]
    pub inquiry_id: Option<Uuid>,
}

impl BookingFilter {
    /// Bookings of one room on one date, the conflict detector's working set.
    #[must_use]
    pub fn room_on(room: &Room, date: NaiveDate) -> Self {
        Self {
            room: Some(room.clone()),
            date: Some(date),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn matches(&self, booking: &Booking) -> bool {
        self.room.as_ref().is_none_or(|room| *room == booking.room)
            && self.date.is_none_or(|date| date == booking.date)
            && self.from.is_none_or(|from| booking.date >= from)
            && self.to.is_none_or(|to| booking.date <= to)
            && self
                .inquiry_id
                .is_none_or(|id| booking.inquiry_id == Some(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> BookingDraft {
        BookingDraft {
            inquiry_id: None,
            room: Room::from("Oost"),
            date: NaiveDate::from_ymd_opt(2024, 6, 10).unwrap(),
            start: WallTime::new(9, 0).unwrap(),
            end: WallTime::new(12, 0).unwrap(),
            title: "Board meeting".into(),
            contact_name: "J. Jansen".into(),
            contact_id: None,
            status: BookingStatus::Confirmed,
            guest_count: Some(12),
            room_setup: None,
            requirements: None,
            notes: None,
            preparation_status: PreparationStatus::Pending,
        }
    }

    #[test]
    fn test_validate_returns_slots() {
        let range = draft().validate(&Venue::default()).unwrap();
        assert_eq!(range.start, 8);
        assert_eq!(range.end, 20);
    }

    #[test]
    fn test_validate_rejects_unknown_room_and_blank_title() {
        let venue = Venue::default();
        let mut unknown = draft();
        unknown.room = Room::from("Zolder");
        assert!(unknown.validate(&venue).is_err());

        let mut blank = draft();
        blank.title = "   ".into();
        assert!(blank.validate(&venue).is_err());
    }

    #[test]
    fn test_validate_rejects_inverted_interval() {
        let mut inverted = draft();
        inverted.end = WallTime::new(8, 0).unwrap();
        assert!(inverted.validate(&Venue::default()).is_err());
    }

    #[test]
    fn test_with_draft_keeps_identity() {
        let now = Utc::now();
        let mut booking = draft().into_booking(Uuid::new_v4(), now);
        booking.external_event_id = Some("crm-1".into());
        let id = booking.id;

        let mut edit = booking.to_draft();
        edit.title = "Renamed".into();
        let edited = booking.with_draft(edit, now);
        assert_eq!(edited.id, id);
        assert_eq!(edited.title, "Renamed");
        assert_eq!(edited.external_event_id.as_deref(), Some("crm-1"));
    }

    #[test]
    fn test_filter_matches() {
        let booking = draft().into_booking(Uuid::new_v4(), Utc::now());
        assert!(BookingFilter::default().matches(&booking));
        assert!(BookingFilter::room_on(&Room::from("Oost"), booking.date).matches(&booking));
        assert!(!BookingFilter::room_on(&Room::from("West"), booking.date).matches(&booking));

        let window = BookingFilter {
            from: NaiveDate::from_ymd_opt(2024, 6, 11),
            ..BookingFilter::default()
        };
        assert!(!window.matches(&booking));
    }

    #[test]
    fn test_status_round_trip_through_str() {
        for status in [BookingStatus::Confirmed, BookingStatus::Option] {
            assert_eq!(status.as_str().parse::<BookingStatus>().unwrap(), status);
        }
        assert!("maybe".parse::<BookingStatus>().is_err());
    }
}
