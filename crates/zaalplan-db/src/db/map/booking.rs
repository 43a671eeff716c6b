use zaalplan_core::error::{CoreError, CoreResult};
use zaalplan_core::model::{Booking, Room};
use zaalplan_core::time::WallTime;

use crate::model::booking::{BookingChangeset, BookingRow, NewBookingRow};

fn wall_time(hour: i16, minute: i16) -> CoreResult<WallTime> {
    let hour = u8::try_from(hour)
        .map_err(|_| CoreError::InvalidInput(format!("stored hour {hour} out of range")))?;
    let minute = u8::try_from(minute)
        .map_err(|_| CoreError::InvalidInput(format!("stored minute {minute} out of range")))?;
    WallTime::new(hour, minute)
}

impl TryFrom<BookingRow> for Booking {
    type Error = CoreError;

    fn try_from(row: BookingRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            inquiry_id: row.inquiry_id,
            room: Room::new(row.room),
            date: row.date,
            start: wall_time(row.start_hour, row.start_minute)?,
            end: wall_time(row.end_hour, row.end_minute)?,
            title: row.title,
            contact_name: row.contact_name,
            contact_id: row.contact_id,
            status: row.status.into(),
            guest_count: row.guest_count,
            room_setup: row.room_setup,
            requirements: row.requirements,
            notes: row.notes,
            preparation_status: row.preparation_status.into(),
            external_event_id: row.external_event_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

impl<'a> From<&'a Booking> for NewBookingRow<'a> {
    fn from(booking: &'a Booking) -> Self {
        Self {
            id: booking.id,
            inquiry_id: booking.inquiry_id,
            room: booking.room.as_str(),
            date: booking.date,
            start_hour: i16::from(booking.start.hour()),
            start_minute: i16::from(booking.start.minute()),
            end_hour: i16::from(booking.end.hour()),
            end_minute: i16::from(booking.end.minute()),
            start_slot: i16::from(booking.start.slot()),
            end_slot: i16::from(booking.end.slot()),
            title: &booking.title,
            contact_name: &booking.contact_name,
            contact_id: booking.contact_id,
            status: booking.status.into(),
            guest_count: booking.guest_count,
            room_setup: booking.room_setup.as_deref(),
            requirements: booking.requirements.as_deref(),
            notes: booking.notes.as_deref(),
            preparation_status: booking.preparation_status.into(),
            created_at: booking.created_at,
            updated_at: booking.updated_at,
        }
    }
}

impl<'a> From<&'a Booking> for BookingChangeset<'a> {
    fn from(booking: &'a Booking) -> Self {
        Self {
            inquiry_id: booking.inquiry_id,
            room: booking.room.as_str(),
            date: booking.date,
            start_hour: i16::from(booking.start.hour()),
            start_minute: i16::from(booking.start.minute()),
            end_hour: i16::from(booking.end.hour()),
            end_minute: i16::from(booking.end.minute()),
            start_slot: i16::from(booking.start.slot()),
            end_slot: i16::from(booking.end.slot()),
            title: &booking.title,
            contact_name: &booking.contact_name,
            contact_id: booking.contact_id,
            status: booking.status.into(),
            guest_count: booking.guest_count,
            room_setup: booking.room_setup.as_deref(),
            requirements: booking.requirements.as_deref(),
            notes: booking.notes.as_deref(),
            preparation_status: booking.preparation_status.into(),
            updated_at: booking.updated_at,
        }
    }
}
