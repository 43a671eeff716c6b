//! In-memory application wiring for handler tests.

use std::sync::Arc;

use chrono::Utc;
use salvo::{Router, Service};
use serde_json::{Value, json};
use uuid::Uuid;

use zaalplan_core::model::{Inquiry, InquiryStatus, Venue};
use zaalplan_service::booking::BookingService;
use zaalplan_service::store::memory::{MemoryBookingStore, MemoryDirectory, MemoryInquiryStore};
use zaalplan_service::sync::outbox::MemoryOutbox;

use crate::service_handler::BookingServiceHandler;

pub(crate) struct TestApp {
    pub service: Service,
    pub bookings: MemoryBookingStore,
    pub inquiries: MemoryInquiryStore,
    pub outbox: MemoryOutbox,
}

pub(crate) fn test_app() -> TestApp {
    let bookings = MemoryBookingStore::new();
    let inquiries = MemoryInquiryStore::new();
    let outbox = MemoryOutbox::new();
    let booking_service = BookingService::new(
        Venue::default(),
        Arc::new(bookings.clone()),
        Arc::new(inquiries.clone()),
        Arc::new(MemoryDirectory::new()),
        Arc::new(outbox.clone()),
    );
    let router = Router::new()
        .hoop(BookingServiceHandler {
            service: Arc::new(booking_service),
        })
        .push(super::routes());
    TestApp {
        service: Service::new(router),
        bookings,
        inquiries,
        outbox,
    }
}

pub(crate) fn url(path: &str) -> String {
    format!("http://127.0.0.1:5800{path}")
}

pub(crate) fn booking_body(room: &str, date: &str, start: &str, end: &str, title: &str) -> Value {
    json!({
        "room": room,
        "date": date,
        "start": start,
        "end": end,
        "title": title,
        "contact_name": "Pieter Jansen",
        "status": "confirmed",
    })
}

pub(crate) fn inquiry(status: InquiryStatus) -> Inquiry {
    let now = Utc::now();
    Inquiry {
        id: Uuid::new_v4(),
        status,
        contact_name: "Fleur de Groot".to_string(),
        contact_id: None,
        event_type: Some("Bruiloft".to_string()),
        preferred_date: None,
        guest_count: Some(150),
        budget: None,
        room_preference: Some("Foyer".to_string()),
        message: None,
        source: None,
        created_at: now,
        updated_at: now,
    }
}
