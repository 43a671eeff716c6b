//! In-memory stores for tests and the `memory` storage backend.
//!
//! The booking store re-checks overlaps under its write lock, mirroring the
//! exclusion constraint of the PostgreSQL schema.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use zaalplan_core::model::{Booking, BookingDraft, BookingFilter, Company, Contact, Inquiry};

use super::{BookingStore, ContactDirectory, InquiryStore, StoreError, StoreResult};
use crate::schedule::conflict::find_conflict;

fn overlap_in(bookings: &[Booking], candidate: &Booking) -> Option<Booking> {
    find_conflict(
        bookings,
        &candidate.room,
        candidate.date,
        candidate.slots(),
        Some(candidate.id),
    )
    .cloned()
}

#[derive(Debug, Clone, Default)]
pub struct MemoryBookingStore {
    bookings: Arc<RwLock<Vec<Booking>>>,
}

impl MemoryBookingStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-filled with `bookings`, taken as already validated.
    #[must_use]
    pub fn with_bookings(bookings: Vec<Booking>) -> Self {
        Self {
            bookings: Arc::new(RwLock::new(bookings)),
        }
    }

    pub async fn len(&self) -> usize {
        self.bookings.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.bookings.read().await.is_empty()
    }
}

#[async_trait]
impl BookingStore for MemoryBookingStore {
    async fn list(&self, filter: &BookingFilter) -> StoreResult<Vec<Booking>> {
        let bookings = self.bookings.read().await;
        let mut matching: Vec<Booking> = bookings
            .iter()
            .filter(|booking| filter.matches(booking))
            .cloned()
            .collect();
        matching.sort_by_key(|booking| (booking.date, booking.start, booking.room.clone()));
        Ok(matching)
    }

    async fn get(&self, id: Uuid) -> StoreResult<Option<Booking>> {
        let bookings = self.bookings.read().await;
        Ok(bookings.iter().find(|booking| booking.id == id).cloned())
    }

    async fn create(&self, draft: BookingDraft) -> StoreResult<Booking> {
        let booking = draft.into_booking(Uuid::now_v7(), Utc::now());
        let mut bookings = self.bookings.write().await;
        if let Some(existing) = overlap_in(&bookings, &booking) {
            return Err(StoreError::Overlap(Box::new(existing)));
        }
        bookings.push(booking.clone());
        Ok(booking)
    }

    async fn create_many(&self, drafts: Vec<BookingDraft>) -> StoreResult<Vec<Booking>> {
        let now = Utc::now();
        let mut bookings = self.bookings.write().await;
        let mut staged: Vec<Booking> = Vec::with_capacity(drafts.len());
        for draft in drafts {
            let booking = draft.into_booking(Uuid::now_v7(), now);
            let clash = overlap_in(&bookings, &booking).or_else(|| overlap_in(&staged, &booking));
            if let Some(existing) = clash {
                return Err(StoreError::Overlap(Box::new(existing)));
            }
            staged.push(booking);
        }
        bookings.extend(staged.iter().cloned());
        Ok(staged)
    }

    async fn update(&self, booking: Booking) -> StoreResult<Booking> {
        let mut bookings = self.bookings.write().await;
        if let Some(existing) = overlap_in(&bookings, &booking) {
            return Err(StoreError::Overlap(Box::new(existing)));
        }
        let slot = bookings
            .iter_mut()
            .find(|stored| stored.id == booking.id)
            .ok_or_else(|| StoreError::NotFound(format!("booking {}", booking.id)))?;
        *slot = booking.clone();
        Ok(booking)
    }

    async fn delete(&self, id: Uuid) -> StoreResult<Booking> {
        let mut bookings = self.bookings.write().await;
        let index = bookings
            .iter()
            .position(|booking| booking.id == id)
            .ok_or_else(|| StoreError::NotFound(format!("booking {id}")))?;
        Ok(bookings.remove(index))
    }

    async fn set_external_event_id(&self, id: Uuid, external_event_id: &str) -> StoreResult<()> {
        let mut bookings = self.bookings.write().await;
        let booking = bookings
            .iter_mut()
            .find(|booking| booking.id == id)
            .ok_or_else(|| StoreError::NotFound(format!("booking {id}")))?;
        booking.external_event_id = Some(external_event_id.to_string());
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryInquiryStore {
    inquiries: Arc<RwLock<HashMap<Uuid, Inquiry>>>,
}

impl MemoryInquiryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_inquiries(inquiries: impl IntoIterator<Item = Inquiry>) -> Self {
        Self {
            inquiries: Arc::new(RwLock::new(
                inquiries
                    .into_iter()
                    .map(|inquiry| (inquiry.id, inquiry))
                    .collect(),
            )),
        }
    }

    pub async fn insert(&self, inquiry: Inquiry) {
        self.inquiries.write().await.insert(inquiry.id, inquiry);
    }
}

#[async_trait]
impl InquiryStore for MemoryInquiryStore {
    async fn get(&self, id: Uuid) -> StoreResult<Option<Inquiry>> {
        Ok(self.inquiries.read().await.get(&id).cloned())
    }

    async fn update(&self, mut inquiry: Inquiry) -> StoreResult<Inquiry> {
        let mut inquiries = self.inquiries.write().await;
        let stored = inquiries
            .get_mut(&inquiry.id)
            .ok_or_else(|| StoreError::NotFound(format!("inquiry {}", inquiry.id)))?;
        inquiry.updated_at = Utc::now();
        *stored = inquiry.clone();
        Ok(inquiry)
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryDirectory {
    contacts: Arc<RwLock<HashMap<Uuid, Contact>>>,
    companies: Arc<RwLock<HashMap<Uuid, Company>>>,
}

impl MemoryDirectory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_contact(&self, contact: Contact) {
        self.contacts.write().await.insert(contact.id, contact);
    }

    pub async fn add_company(&self, company: Company) {
        self.companies.write().await.insert(company.id, company);
    }
}

#[async_trait]
impl ContactDirectory for MemoryDirectory {
    async fn contact(&self, id: Uuid) -> StoreResult<Option<Contact>> {
        Ok(self.contacts.read().await.get(&id).cloned())
    }

    async fn company(&self, id: Uuid) -> StoreResult<Option<Company>> {
        Ok(self.companies.read().await.get(&id).cloned())
    }
}
