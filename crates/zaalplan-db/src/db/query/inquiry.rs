//! Query builders and statements for inquiries.

use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use uuid::Uuid;

use crate::db::schema::inquiry;
use crate::model::inquiry::{InquiryChangeset, InquiryRow, NewInquiryRow};

/// ## Summary
/// Returns a query to find an inquiry by ID.
#[must_use]
pub fn by_id(id: Uuid) -> inquiry::BoxedQuery<'static, diesel::pg::Pg> {
    inquiry::table.filter(inquiry::id.eq(id)).into_boxed()
}

/// ## Summary
/// Inserts an inquiry and returns the stored row.
///
/// ## Errors
/// Returns a database error if the insert fails.
pub async fn insert(conn: &mut AsyncPgConnection, row: &NewInquiryRow<'_>) -> QueryResult<InquiryRow> {
    diesel::insert_into(inquiry::table)
        .values(row)
        .returning(InquiryRow::as_returning())
        .get_result(conn)
        .await
}

/// ## Summary
/// Replaces the editable columns of an inquiry.
///
/// ## Returns
/// `Ok(None)` when no inquiry has the given ID.
///
/// ## Errors
/// Returns a database error if the update fails.
pub async fn update(
    conn: &mut AsyncPgConnection,
    id: Uuid,
    changes: &InquiryChangeset<'_>,
) -> QueryResult<Option<InquiryRow>> {
    diesel::update(inquiry::table.filter(inquiry::id.eq(id)))
        .set(changes)
        .returning(InquiryRow::as_returning())
        .get_result(conn)
        .await
        .optional()
}
