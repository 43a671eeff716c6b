use diesel::{pg::Pg, prelude::*};

use crate::db::{
    enums::{BookingStatus, PreparationStatus},
    schema,
};

/// Stored booking row. Wall times are kept next to their slot indices so the
/// exclusion constraint can compare plain integers.
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable, Identifiable)]
#[diesel(table_name = schema::booking)]
#[diesel(check_for_backend(Pg))]
pub struct BookingRow {
    pub id: uuid::Uuid,
    pub inquiry_id: Option<uuid::Uuid>,
    pub room: String,
    pub date: chrono::NaiveDate,
    pub start_hour: i16,
    pub start_minute: i16,
    pub end_hour: i16,
    pub end_minute: i16,
    pub start_slot: i16,
    pub end_slot: i16,
    pub title: String,
    pub contact_name: String,
    pub contact_id: Option<uuid::Uuid>,
    pub status: BookingStatus,
    pub guest_count: Option<i32>,
    pub room_setup: Option<String>,
    pub requirements: Option<String>,
    pub notes: Option<String>,
    pub preparation_status: PreparationStatus,
    pub external_event_id: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// Insert struct for creating new bookings
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = schema::booking)]
pub struct NewBookingRow<'a> {
    pub id: uuid::Uuid,
    pub inquiry_id: Option<uuid::Uuid>,
    pub room: &'a str,
    pub date: chrono::NaiveDate,
    pub start_hour: i16,
    pub start_minute: i16,
    pub end_hour: i16,
    pub end_minute: i16,
    pub start_slot: i16,
    pub end_slot: i16,
    pub title: &'a str,
    pub contact_name: &'a str,
    pub contact_id: Option<uuid::Uuid>,
    pub status: BookingStatus,
    pub guest_count: Option<i32>,
    pub room_setup: Option<&'a str>,
    pub requirements: Option<&'a str>,
    pub notes: Option<&'a str>,
    pub preparation_status: PreparationStatus,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// Full replacement of the editable columns. `None` options clear the column.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = schema::booking)]
#[diesel(treat_none_as_null = true)]
pub struct BookingChangeset<'a> {
    pub inquiry_id: Option<uuid::Uuid>,
    pub room: &'a str,
    pub date: chrono::NaiveDate,
    pub start_hour: i16,
    pub start_minute: i16,
    pub end_hour: i16,
    pub end_minute: i16,
    pub start_slot: i16,
    pub end_slot: i16,
    pub title: &'a str,
    pub contact_name: &'a str,
    pub contact_id: Option<uuid::Uuid>,
    pub status: BookingStatus,
    pub guest_count: Option<i32>,
    pub room_setup: Option<&'a str>,
    pub requirements: Option<&'a str>,
    pub notes: Option<&'a str>,
    pub preparation_status: PreparationStatus,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}
