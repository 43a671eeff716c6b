//! Display lookups for CRM contacts and companies.

use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use uuid::Uuid;

use crate::db::schema::{company, contact};
use crate::model::contact::{CompanyRow, ContactRow};

/// ## Summary
/// Loads a contact by ID.
///
/// ## Errors
/// Returns a database error if the query fails.
pub async fn find_contact(conn: &mut AsyncPgConnection, id: Uuid) -> QueryResult<Option<ContactRow>> {
    contact::table
        .filter(contact::id.eq(id))
        .select(ContactRow::as_select())
        .first(conn)
        .await
        .optional()
}

/// ## Summary
/// Loads a company by ID.
///
/// ## Errors
/// Returns a database error if the query fails.
pub async fn find_company(conn: &mut AsyncPgConnection, id: Uuid) -> QueryResult<Option<CompanyRow>> {
    company::table
        .filter(company::id.eq(id))
        .select(CompanyRow::as_select())
        .first(conn)
        .await
        .optional()
}
