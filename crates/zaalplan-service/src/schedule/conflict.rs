//! Overlap detection on slot indices.
//!
//! Two bookings conflict when they share room and date and their half-open
//! slot ranges intersect. Back-to-back bookings do not conflict. Callers
//! reject empty and inverted intervals before asking.

use chrono::NaiveDate;
use uuid::Uuid;

use zaalplan_core::model::{Booking, BookingDraft, Room};
use zaalplan_core::time::SlotRange;

use crate::error::ConflictDetails;

/// ## Summary
/// Returns the first booking in `room` on `date` that overlaps `range`,
/// skipping the booking with id `exclude`.
pub fn find_conflict<'a, I>(
    bookings: I,
    room: &Room,
    date: NaiveDate,
    range: SlotRange,
    exclude: Option<Uuid>,
) -> Option<&'a Booking>
where
    I: IntoIterator<Item = &'a Booking>,
{
    bookings.into_iter().find(|booking| {
        Some(booking.id) != exclude
            && booking.room == *room
            && booking.date == date
            && range.overlaps(booking.slots())
    })
}

/// ## Summary
/// Checks a batch of validated drafts against the stored bookings and against
/// each other.
///
/// Returns the first clash in batch order. A clash with an earlier instance
/// of the same batch names that instance.
pub fn find_batch_conflict(
    existing: &[Booking],
    batch: &[(BookingDraft, SlotRange)],
) -> Option<ConflictDetails> {
    for (index, (draft, range)) in batch.iter().enumerate() {
        if let Some(booking) = find_conflict(existing, &draft.room, draft.date, *range, None) {
            return Some(ConflictDetails::from(booking));
        }

        let earlier = batch[..index].iter().find(|(other, other_range)| {
            other.room == draft.room && other.date == draft.date && range.overlaps(*other_range)
        });
        if let Some((other, other_range)) = earlier {
            return Some(ConflictDetails::pending(
                &other.title,
                &other.room,
                other.date,
                *other_range,
            ));
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use zaalplan_core::model::{BookingStatus, PreparationStatus};
    use zaalplan_core::time::WallTime;

    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 10).unwrap()
    }

    fn draft(room: &str, start: (u8, u8), end: (u8, u8)) -> BookingDraft {
        BookingDraft {
            inquiry_id: None,
            room: Room::from(room),
            date: date(),
            start: WallTime::new(start.0, start.1).unwrap(),
            end: WallTime::new(end.0, end.1).unwrap(),
            title: format!("{room} booking"),
            contact_name: String::new(),
            contact_id: None,
            status: BookingStatus::Confirmed,
            guest_count: None,
            room_setup: None,
            requirements: None,
            notes: None,
            preparation_status: PreparationStatus::Pending,
        }
    }

    fn booking(room: &str, start: (u8, u8), end: (u8, u8)) -> Booking {
        draft(room, start, end).into_booking(Uuid::new_v4(), Utc::now())
    }

    fn range(start: (u8, u8), end: (u8, u8)) -> SlotRange {
        SlotRange::between(
            WallTime::new(start.0, start.1).unwrap(),
            WallTime::new(end.0, end.1).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn test_overlap_in_same_room_is_found() {
        let existing = vec![booking("Oost", (9, 0), (12, 0))];
        let hit = find_conflict(&existing, &Room::from("Oost"), date(), range((11, 0), (13, 0)), None);
        assert_eq!(hit.map(|b| b.id), Some(existing[0].id));
    }

    #[test]
    fn test_adjacent_intervals_do_not_conflict() {
        let existing = vec![booking("Oost", (9, 0), (12, 0))];
        let room = Room::from("Oost");
        assert!(find_conflict(&existing, &room, date(), range((12, 0), (14, 0)), None).is_none());
        assert!(find_conflict(&existing, &room, date(), range((7, 0), (9, 0)), None).is_none());
    }

    #[test]
    fn test_other_room_or_date_does_not_conflict() {
        let existing = vec![booking("Oost", (9, 0), (12, 0))];
        assert!(
            find_conflict(&existing, &Room::from("West"), date(), range((9, 0), (12, 0)), None)
                .is_none()
        );
        let next_day = date().succ_opt().unwrap();
        assert!(
            find_conflict(&existing, &Room::from("Oost"), next_day, range((9, 0), (12, 0)), None)
                .is_none()
        );
    }

    #[test]
    fn test_excluded_booking_is_skipped() {
        let existing = vec![booking("Oost", (9, 0), (12, 0))];
        let hit = find_conflict(
            &existing,
            &Room::from("Oost"),
            date(),
            range((10, 0), (11, 0)),
            Some(existing[0].id),
        );
        assert!(hit.is_none());
    }

    #[test]
    fn test_overlap_is_symmetric() {
        let pairs = [
            (range((9, 0), (12, 0)), range((11, 45), (13, 0))),
            (range((22, 0), (1, 0)), range((0, 30), (1, 45))),
            (range((9, 0), (10, 0)), range((10, 0), (11, 0))),
        ];
        for (a, b) in pairs {
            let a_booking = booking("Oost", (9, 0), (9, 15));
            let mut a_stored = a_booking.clone();
            a_stored.start = a.start_time();
            a_stored.end = a.end_time();
            let mut b_stored = a_booking;
            b_stored.start = b.start_time();
            b_stored.end = b.end_time();

            let room = Room::from("Oost");
            let a_hits_b = find_conflict([&b_stored], &room, date(), a, None).is_some();
            let b_hits_a = find_conflict([&a_stored], &room, date(), b, None).is_some();
            assert_eq!(a_hits_b, b_hits_a);
        }
    }

    #[test]
    fn test_past_midnight_overlap_uses_slots() {
        let existing = vec![booking("Foyer", (23, 0), (1, 0))];
        let hit = find_conflict(&existing, &Room::from("Foyer"), date(), range((0, 30), (1, 30)), None);
        assert!(hit.is_some());
    }

    #[test]
    fn test_batch_conflict_with_stored_booking() {
        let existing = vec![booking("Oost", (9, 0), (12, 0))];
        let batch = vec![
            (draft("West", (9, 0), (12, 0)), range((9, 0), (12, 0))),
            (draft("Oost", (10, 0), (11, 0)), range((10, 0), (11, 0))),
        ];
        let clash = find_batch_conflict(&existing, &batch).unwrap();
        assert_eq!(clash.booking_id, Some(existing[0].id));
    }

    #[test]
    fn test_batch_conflict_between_instances() {
        let batch = vec![
            (draft("Oost", (9, 0), (12, 0)), range((9, 0), (12, 0))),
            (draft("Oost", (11, 0), (13, 0)), range((11, 0), (13, 0))),
        ];
        let clash = find_batch_conflict(&[], &batch).unwrap();
        assert_eq!(clash.booking_id, None);
        assert_eq!(clash.start, WallTime::new(9, 0).unwrap());
    }

    #[test]
    fn test_clean_batch_has_no_conflict() {
        let existing = vec![booking("Oost", (9, 0), (12, 0))];
        let batch = vec![
            (draft("Oost", (12, 0), (14, 0)), range((12, 0), (14, 0))),
            (draft("Oost", (14, 0), (16, 0)), range((14, 0), (16, 0))),
        ];
        assert!(find_batch_conflict(&existing, &batch).is_none());
    }
}
