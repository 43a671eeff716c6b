use diesel::{pg::Pg, prelude::*};

use crate::db::{enums::InquiryStatus, schema};

/// Stored inquiry row
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable, Identifiable)]
#[diesel(table_name = schema::inquiry)]
#[diesel(check_for_backend(Pg))]
pub struct InquiryRow {
    pub id: uuid::Uuid,
    pub status: InquiryStatus,
    pub contact_name: String,
    pub contact_id: Option<uuid::Uuid>,
    pub event_type: Option<String>,
    pub preferred_date: Option<chrono::NaiveDate>,
    pub guest_count: Option<i32>,
    pub budget: Option<i64>,
    pub room_preference: Option<String>,
    pub message: Option<String>,
    pub source: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// Insert struct for inquiries, used when seeding and by the intake form.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = schema::inquiry)]
pub struct NewInquiryRow<'a> {
    pub id: uuid::Uuid,
    pub status: InquiryStatus,
    pub contact_name: &'a str,
    pub contact_id: Option<uuid::Uuid>,
    pub event_type: Option<&'a str>,
    pub preferred_date: Option<chrono::NaiveDate>,
    pub guest_count: Option<i32>,
    pub budget: Option<i64>,
    pub room_preference: Option<&'a str>,
    pub message: Option<&'a str>,
    pub source: Option<&'a str>,
}

/// Editable inquiry columns
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = schema::inquiry)]
#[diesel(treat_none_as_null = true)]
pub struct InquiryChangeset<'a> {
    pub status: InquiryStatus,
    pub contact_name: &'a str,
    pub contact_id: Option<uuid::Uuid>,
    pub event_type: Option<&'a str>,
    pub preferred_date: Option<chrono::NaiveDate>,
    pub guest_count: Option<i32>,
    pub budget: Option<i64>,
    pub room_preference: Option<&'a str>,
    pub message: Option<&'a str>,
    pub source: Option<&'a str>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}
