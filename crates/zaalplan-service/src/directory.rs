//! Display enrichment from the CRM contact directory.

use serde::Serialize;

use zaalplan_core::model::Booking;

use crate::store::ContactDirectory;

/// A booking together with the names the planner shows next to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookingDetails {
    #[serde(flatten)]
    pub booking: Booking,
    pub contact_display_name: Option<String>,
    pub company_name: Option<String>,
}

/// ## Summary
/// Looks up the contact and company display names of `booking`.
///
/// Lookup failures are logged and leave the names empty; they never fail
/// the request.
#[tracing::instrument(skip(directory, booking), fields(booking_id = %booking.id))]
pub async fn describe(directory: &dyn ContactDirectory, booking: Booking) -> BookingDetails {
    let contact = match booking.contact_id {
        Some(contact_id) => directory.contact(contact_id).await.unwrap_or_else(|error| {
            tracing::warn!(%contact_id, %error, "Contact lookup failed");
            None
        }),
        None => None,
    };

    let company = match contact.as_ref().and_then(|contact| contact.company_id) {
        Some(company_id) => directory.company(company_id).await.unwrap_or_else(|error| {
            tracing::warn!(%company_id, %error, "Company lookup failed");
            None
        }),
        None => None,
    };

    BookingDetails {
        contact_display_name: contact.map(|contact| contact.display_name()),
        company_name: company.map(|company| company.name),
        booking,
    }
}
