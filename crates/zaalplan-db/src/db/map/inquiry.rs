use zaalplan_core::model::Inquiry;

use crate::model::inquiry::{InquiryChangeset, InquiryRow, NewInquiryRow};

impl From<InquiryRow> for Inquiry {
    fn from(row: InquiryRow) -> Self {
        Self {
            id: row.id,
            status: row.status.into(),
            contact_name: row.contact_name,
            contact_id: row.contact_id,
            event_type: row.event_type,
            preferred_date: row.preferred_date,
            guest_count: row.guest_count,
            budget: row.budget,
            room_preference: row.room_preference,
            message: row.message,
            source: row.source,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

impl<'a> From<&'a Inquiry> for NewInquiryRow<'a> {
    fn from(inquiry: &'a Inquiry) -> Self {
        Self {
            id: inquiry.id,
            status: inquiry.status.into(),
            contact_name: &inquiry.contact_name,
            contact_id: inquiry.contact_id,
            event_type: inquiry.event_type.as_deref(),
            preferred_date: inquiry.preferred_date,
            guest_count: inquiry.guest_count,
            budget: inquiry.budget,
            room_preference: inquiry.room_preference.as_deref(),
            message: inquiry.message.as_deref(),
            source: inquiry.source.as_deref(),
        }
    }
}

impl<'a> From<&'a Inquiry> for InquiryChangeset<'a> {
    fn from(inquiry: &'a Inquiry) -> Self {
        Self {
            status: inquiry.status.into(),
            contact_name: &inquiry.contact_name,
            contact_id: inquiry.contact_id,
            event_type: inquiry.event_type.as_deref(),
            preferred_date: inquiry.preferred_date,
            guest_count: inquiry.guest_count,
            budget: inquiry.budget,
            room_preference: inquiry.room_preference.as_deref(),
            message: inquiry.message.as_deref(),
            source: inquiry.source.as_deref(),
            updated_at: inquiry.updated_at,
        }
    }
}
