//! Query builders and statements for bookings.

use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use uuid::Uuid;

use zaalplan_core::model::{BookingFilter, Room};
use zaalplan_core::time::SlotRange;

use crate::db::schema::booking;
use crate::model::booking::{BookingChangeset, BookingRow, NewBookingRow};

/// ## Summary
/// Returns a query to select all bookings in calendar order.
#[must_use]
pub fn all() -> booking::BoxedQuery<'static, diesel::pg::Pg> {
    booking::table
        .order((booking::date.asc(), booking::start_slot.asc(), booking::room.asc()))
        .into_boxed()
}

/// ## Summary
/// Returns a query to find a booking by ID.
#[must_use]
pub fn by_id(id: Uuid) -> booking::BoxedQuery<'static, diesel::pg::Pg> {
    booking::table.filter(booking::id.eq(id)).into_boxed()
}

/// ## Summary
/// Returns a query for the bookings matching `filter`. Unset fields do not restrict.
#[must_use]
pub fn filtered(filter: &BookingFilter) -> booking::BoxedQuery<'static, diesel::pg::Pg> {
    let mut query = all();
    if let Some(room) = &filter.room {
        query = query.filter(booking::room.eq(room.as_str().to_owned()));
    }
    if let Some(date) = filter.date {
        query = query.filter(booking::date.eq(date));
    }
    if let Some(from) = filter.from {
        query = query.filter(booking::date.ge(from));
    }
    if let Some(to) = filter.to {
        query = query.filter(booking::date.le(to));
    }
    if let Some(inquiry_id) = filter.inquiry_id {
        query = query.filter(booking::inquiry_id.eq(inquiry_id));
    }
    query
}

/// ## Summary
/// Returns a query for bookings in `room` on `date` whose slots overlap `range`,
/// optionally ignoring one booking.
#[must_use]
pub fn overlapping(
    room: &Room,
    date: chrono::NaiveDate,
    range: SlotRange,
    exclude: Option<Uuid>,
) -> booking::BoxedQuery<'static, diesel::pg::Pg> {
    let mut query = all()
        .filter(booking::room.eq(room.as_str().to_owned()))
        .filter(booking::date.eq(date))
        .filter(booking::start_slot.lt(i16::from(range.end)))
        .filter(booking::end_slot.gt(i16::from(range.start)));
    if let Some(exclude) = exclude {
        query = query.filter(booking::id.ne(exclude));
    }
    query
}

/// ## Summary
/// Inserts a booking and returns the stored row.
///
/// ## Errors
/// Returns a database error if the insert fails, including exclusion
/// constraint violations.
pub async fn insert(conn: &mut AsyncPgConnection, row: &NewBookingRow<'_>) -> QueryResult<BookingRow> {
    diesel::insert_into(booking::table)
        .values(row)
        .returning(BookingRow::as_returning())
        .get_result(conn)
        .await
}

/// ## Summary
/// Inserts several bookings in one statement.
///
/// ## Errors
/// Returns a database error if the insert fails.
pub async fn insert_batch(
    conn: &mut AsyncPgConnection,
    rows: &[NewBookingRow<'_>],
) -> QueryResult<Vec<BookingRow>> {
    if rows.is_empty() {
        return Ok(Vec::new());
    }

    diesel::insert_into(booking::table)
        .values(rows)
        .returning(BookingRow::as_returning())
        .get_results(conn)
        .await
}

/// ## Summary
/// Replaces the editable columns of a booking.
///
/// ## Returns
/// `Ok(None)` when no booking has the given ID.
///
/// ## Errors
/// Returns a database error if the update fails.
pub async fn update(
    conn: &mut AsyncPgConnection,
    id: Uuid,
    changes: &BookingChangeset<'_>,
) -> QueryResult<Option<BookingRow>> {
    diesel::update(booking::table.filter(booking::id.eq(id)))
        .set(changes)
        .returning(BookingRow::as_returning())
        .get_result(conn)
        .await
        .optional()
}

/// ## Summary
/// Deletes a booking and returns it.
///
/// ## Errors
/// Returns a database error if the delete fails.
pub async fn delete(conn: &mut AsyncPgConnection, id: Uuid) -> QueryResult<Option<BookingRow>> {
    diesel::delete(booking::table.filter(booking::id.eq(id)))
        .returning(BookingRow::as_returning())
        .get_result(conn)
        .await
        .optional()
}

/// ## Summary
/// Deletes several bookings, returning the number of removed rows.
///
/// ## Errors
/// Returns a database error if the delete fails.
pub async fn delete_many(conn: &mut AsyncPgConnection, ids: &[Uuid]) -> QueryResult<usize> {
    diesel::delete(booking::table.filter(booking::id.eq_any(ids)))
        .execute(conn)
        .await
}

/// ## Summary
/// Records the identifier the external calendar assigned to a booking.
///
/// ## Errors
/// Returns a database error if the update fails.
pub async fn set_external_event_id(
    conn: &mut AsyncPgConnection,
    id: Uuid,
    external_event_id: &str,
) -> QueryResult<usize> {
    diesel::update(booking::table.filter(booking::id.eq(id)))
        .set(booking::external_event_id.eq(external_event_id))
        .execute(conn)
        .await
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn sql<Q>(query: &Q) -> String
    where
        Q: diesel::query_builder::QueryFragment<diesel::pg::Pg>,
    {
        diesel::debug_query::<diesel::pg::Pg, _>(query).to_string()
    }

    #[test]
    fn test_all_orders_by_calendar_position() {
        let query_str = sql(&all().select(BookingRow::as_select()));
        assert!(query_str.contains("ORDER BY"));
        assert!(query_str.contains("\"booking\".\"start_slot\" ASC"));
    }

    #[test]
    fn test_empty_filter_adds_no_conditions() {
        let query_str = sql(&filtered(&BookingFilter::default()).select(BookingRow::as_select()));
        assert!(!query_str.contains("WHERE"));
    }

    #[test]
    fn test_filter_by_room_and_window() {
        let filter = BookingFilter {
            room: Some(Room::from("Oost")),
            from: NaiveDate::from_ymd_opt(2024, 6, 1),
            to: NaiveDate::from_ymd_opt(2024, 6, 30),
            ..BookingFilter::default()
        };
        let query_str = sql(&filtered(&filter).select(BookingRow::as_select()));
        assert!(query_str.contains("\"booking\".\"room\" = $1"));
        assert!(query_str.contains("\"booking\".\"date\" >= $2"));
        assert!(query_str.contains("\"booking\".\"date\" <= $3"));
        assert!(query_str.contains("Oost"));
    }

    #[test]
    fn test_overlapping_uses_half_open_comparison() {
        let range = SlotRange::new(8, 20).unwrap();
        let query_str = sql(
            &overlapping(
                &Room::from("West"),
                NaiveDate::from_ymd_opt(2024, 6, 10).unwrap(),
                range,
                None,
            )
            .select(BookingRow::as_select()),
        );
        assert!(query_str.contains("\"booking\".\"start_slot\" < $3"));
        assert!(query_str.contains("\"booking\".\"end_slot\" > $4"));
        assert!(!query_str.contains("\"booking\".\"id\" <>"));
    }

    #[test]
    fn test_overlapping_excludes_booking() {
        let range = SlotRange::new(8, 20).unwrap();
        let query_str = sql(
            &overlapping(
                &Room::from("West"),
                NaiveDate::from_ymd_opt(2024, 6, 10).unwrap(),
                range,
                Some(Uuid::new_v4()),
            )
            .select(BookingRow::as_select()),
        );
        assert!(query_str.contains("\"booking\".\"id\" <> $5"));
    }
}
