//! Scheduler behaviour across the service and in-memory stores.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use zaalplan_core::model::{
    Booking, BookingDraft, BookingFilter, BookingStatus, Inquiry, InquiryStatus,
    PreparationStatus, Room, Venue,
};
use zaalplan_core::time::{SlotRange, WallTime};
use zaalplan_service::booking::BookingService;
use zaalplan_service::error::ServiceError;
use zaalplan_service::schedule::convert::{ConversionRequest, DateOption};
use zaalplan_service::schedule::drag::{
    DragState, GridGeometry, MoveRequest, Placement, Pointer, ReleaseOutcome, RoomColumn,
};
use zaalplan_service::schedule::recurrence::Recurrence;
use zaalplan_service::store::memory::{
    MemoryBookingStore, MemoryDirectory, MemoryInquiryStore,
};
use zaalplan_service::store::{BookingStore, InquiryStore, StoreError, StoreResult};
use zaalplan_service::sync::outbox::MemoryOutbox;
use zaalplan_service::sync::{SyncError, SyncEvent, SyncPublisher, SyncResult};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn draft(room: &str, on: NaiveDate, start: (u8, u8), end: (u8, u8), title: &str) -> BookingDraft {
    BookingDraft {
        inquiry_id: None,
        room: Room::from(room),
        date: on,
        start: WallTime::new(start.0, start.1).unwrap(),
        end: WallTime::new(end.0, end.1).unwrap(),
        title: title.to_string(),
        contact_name: "Jan de Vries".to_string(),
        contact_id: None,
        status: BookingStatus::Confirmed,
        guest_count: Some(40),
        room_setup: None,
        requirements: None,
        notes: None,
        preparation_status: PreparationStatus::Pending,
    }
}

fn inquiry(status: InquiryStatus) -> Inquiry {
    let now = Utc::now();
    Inquiry {
        id: Uuid::new_v4(),
        status,
        contact_name: "Sanne Visser".to_string(),
        contact_id: None,
        event_type: Some("Jubileum".to_string()),
        preferred_date: None,
        guest_count: Some(80),
        budget: None,
        room_preference: None,
        message: Some("Graag met podium".to_string()),
        source: None,
        created_at: now,
        updated_at: now,
    }
}

fn option(on: Option<NaiveDate>, room: Option<&str>, status: BookingStatus) -> DateOption {
    DateOption {
        date: on,
        room: room.map(Room::from),
        start: WallTime::new(18, 0).unwrap(),
        end: WallTime::new(23, 0).unwrap(),
        status,
    }
}

struct Harness {
    service: BookingService,
    bookings: MemoryBookingStore,
    inquiries: MemoryInquiryStore,
    outbox: MemoryOutbox,
}

fn harness() -> Harness {
    let bookings = MemoryBookingStore::new();
    let inquiries = MemoryInquiryStore::new();
    let outbox = MemoryOutbox::new();
    let service = BookingService::new(
        Venue::default(),
        Arc::new(bookings.clone()),
        Arc::new(inquiries.clone()),
        Arc::new(MemoryDirectory::new()),
        Arc::new(outbox.clone()),
    );
    Harness {
        service,
        bookings,
        inquiries,
        outbox,
    }
}

/// Booking store whose batch insert always fails.
struct FailingBatchStore(MemoryBookingStore);

#[async_trait]
impl BookingStore for FailingBatchStore {
    async fn list(&self, filter: &BookingFilter) -> StoreResult<Vec<Booking>> {
        self.0.list(filter).await
    }

    async fn get(&self, id: Uuid) -> StoreResult<Option<Booking>> {
        self.0.get(id).await
    }

    async fn create(&self, draft: BookingDraft) -> StoreResult<Booking> {
        self.0.create(draft).await
    }

    async fn create_many(&self, _drafts: Vec<BookingDraft>) -> StoreResult<Vec<Booking>> {
        Err(StoreError::Unavailable("connection reset".to_string()))
    }

    async fn update(&self, booking: Booking) -> StoreResult<Booking> {
        self.0.update(booking).await
    }

    async fn delete(&self, id: Uuid) -> StoreResult<Booking> {
        self.0.delete(id).await
    }

    async fn set_external_event_id(&self, id: Uuid, external_event_id: &str) -> StoreResult<()> {
        self.0.set_external_event_id(id, external_event_id).await
    }
}

/// Inquiry store that reads fine but refuses every update.
struct ReadOnlyInquiries(MemoryInquiryStore);

#[async_trait]
impl InquiryStore for ReadOnlyInquiries {
    async fn get(&self, id: Uuid) -> StoreResult<Option<Inquiry>> {
        self.0.get(id).await
    }

    async fn update(&self, _inquiry: Inquiry) -> StoreResult<Inquiry> {
        Err(StoreError::Backend("inquiry table is read-only".to_string()))
    }
}

/// Publisher whose webhook target is always down.
struct UnreachablePublisher;

#[async_trait]
impl SyncPublisher for UnreachablePublisher {
    async fn publish(&self, _event: SyncEvent) -> SyncResult<()> {
        Err(SyncError::Rejected(502))
    }
}

#[test_log::test(tokio::test)]
async fn test_overlapping_booking_is_rejected() {
    let h = harness();
    let on = date(2024, 6, 10);
    let created = h
        .service
        .create(draft("Oost", on, (9, 0), (12, 0), "A"), &Recurrence::None)
        .await
        .unwrap();
    let a = &created[0];

    let range = SlotRange::between(WallTime::new(11, 0).unwrap(), WallTime::new(13, 0).unwrap())
        .unwrap();
    let conflict = h
        .service
        .check(&Room::from("Oost"), on, range, None)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(conflict.booking_id, Some(a.id));

    let err = h
        .service
        .create(draft("Oost", on, (11, 0), (13, 0), "B"), &Recurrence::None)
        .await
        .unwrap_err();
    match err {
        ServiceError::Conflict(details) => assert_eq!(details.title, "A"),
        other => panic!("expected conflict, got {other:?}"),
    }
    assert_eq!(h.bookings.len().await, 1);
}

#[test_log::test(tokio::test)]
async fn test_adjacent_booking_is_accepted() {
    let h = harness();
    let on = date(2024, 6, 10);
    h.service
        .create(draft("Oost", on, (9, 0), (12, 0), "A"), &Recurrence::None)
        .await
        .unwrap();
    h.service
        .create(draft("Oost", on, (12, 0), (13, 0), "B"), &Recurrence::None)
        .await
        .unwrap();

    let listed = h.service.day(on).await.unwrap();
    let titles: Vec<&str> = listed.iter().map(|b| b.title.as_str()).collect();
    assert_eq!(titles, ["A", "B"]);
}

#[test_log::test(tokio::test)]
async fn test_same_time_in_another_room_is_fine() {
    let h = harness();
    let on = date(2024, 6, 10);
    h.service
        .create(draft("Oost", on, (9, 0), (12, 0), "A"), &Recurrence::None)
        .await
        .unwrap();
    h.service
        .create(draft("West", on, (9, 0), (12, 0), "B"), &Recurrence::None)
        .await
        .unwrap();
    assert_eq!(h.bookings.len().await, 2);
}

#[test_log::test(tokio::test)]
async fn test_unknown_room_is_a_validation_error() {
    let h = harness();
    let err = h
        .service
        .create(
            draft("Kelder", date(2024, 6, 10), (9, 0), (12, 0), "A"),
            &Recurrence::None,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::ValidationError(_)));
}

#[test_log::test(tokio::test)]
async fn test_weekly_series_is_created() {
    let h = harness();
    let created = h
        .service
        .create(
            draft("Zuid", date(2024, 1, 1), (19, 0), (21, 0), "Koorrepetitie"),
            &Recurrence::Weekly { repeat_count: 4 },
        )
        .await
        .unwrap();

    let dates: Vec<NaiveDate> = created.iter().map(|b| b.date).collect();
    assert_eq!(
        dates,
        [
            date(2024, 1, 1),
            date(2024, 1, 8),
            date(2024, 1, 15),
            date(2024, 1, 22)
        ]
    );
    assert!(created.iter().all(|b| b.title == "Koorrepetitie"));
    assert_eq!(h.outbox.events().await.len(), 4);
}

#[test_log::test(tokio::test)]
async fn test_series_with_one_clash_creates_nothing() {
    let h = harness();
    h.service
        .create(
            draft("Zuid", date(2024, 1, 15), (20, 0), (22, 0), "Lezing"),
            &Recurrence::None,
        )
        .await
        .unwrap();

    let err = h
        .service
        .create(
            draft("Zuid", date(2024, 1, 1), (19, 0), (21, 0), "Koorrepetitie"),
            &Recurrence::Weekly { repeat_count: 4 },
        )
        .await
        .unwrap_err();
    match err {
        ServiceError::Conflict(details) => {
            assert_eq!(details.title, "Lezing");
            assert_eq!(details.date, date(2024, 1, 15));
        }
        other => panic!("expected conflict, got {other:?}"),
    }
    assert_eq!(h.bookings.len().await, 1);
}

#[test_log::test(tokio::test)]
async fn test_resize_may_overlap_its_own_old_range() {
    let h = harness();
    let on = date(2024, 6, 10);
    let created = h
        .service
        .create(draft("Oost", on, (9, 0), (12, 0), "A"), &Recurrence::None)
        .await
        .unwrap();
    let id = created[0].id;

    let resized = h
        .service
        .update(id, draft("Oost", on, (9, 0), (14, 0), "A"))
        .await
        .unwrap();
    assert_eq!(resized.end, WallTime::new(14, 0).unwrap());
    assert_eq!(resized.created_at, created[0].created_at);
}

#[test_log::test(tokio::test)]
async fn test_booking_past_midnight() {
    let h = harness();
    let created = h
        .service
        .create(
            draft("Foyer", date(2024, 6, 14), (22, 0), (1, 30), "Nachtfeest"),
            &Recurrence::None,
        )
        .await
        .unwrap();
    assert_eq!(created[0].slots().duration_slots(), 14);

    let err = h
        .service
        .create(
            draft("Foyer", date(2024, 6, 14), (0, 0), (1, 0), "Afterparty"),
            &Recurrence::None,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Conflict(_)));
}

#[test_log::test(tokio::test)]
async fn test_drag_move_keeps_duration() {
    let h = harness();
    let on = date(2024, 6, 10);
    let created = h
        .service
        .create(draft("Oost", on, (9, 0), (12, 0), "A"), &Recurrence::None)
        .await
        .unwrap();
    let booking = created[0].clone();

    let geometry = GridGeometry {
        grid_top: 0.0,
        slot_height: 10.0,
        columns: vec![
            RoomColumn {
                room: Room::from("Oost"),
                left: 0.0,
                right: 100.0,
            },
            RoomColumn {
                room: Room::from("West"),
                left: 100.0,
                right: 200.0,
            },
        ],
    };
    let day = h.service.day(on).await.unwrap();

    // Grabbed at its first slot (09:00 is slot 8), dropped on West at 14:00.
    let state = DragState::Idle
        .begin(&booking, &geometry, Pointer { x: 50.0, y: 85.0 })
        .unwrap()
        .pointer_moved(&geometry, Pointer { x: 150.0, y: 285.0 }, &day);
    let (state, outcome) = state.release(&day);
    assert!(!state.is_dragging());

    let ReleaseOutcome::Move { request } = outcome else {
        panic!("expected a move, got {outcome:?}");
    };
    let moved = h.service.commit_move(request).await.unwrap();
    assert_eq!(moved.room, Room::from("West"));
    assert_eq!(moved.start, WallTime::new(14, 0).unwrap());
    assert_eq!(moved.end, WallTime::new(17, 0).unwrap());
    assert_eq!(
        moved.slots().duration_slots(),
        booking.slots().duration_slots()
    );
}

#[test_log::test(tokio::test)]
async fn test_delete_only_syncs_bookings_known_externally() {
    let h = harness();
    let on = date(2024, 6, 10);
    let created = h
        .service
        .create(draft("Oost", on, (9, 0), (10, 0), "A"), &Recurrence::None)
        .await
        .unwrap();
    let synced = h
        .service
        .create(draft("Oost", on, (10, 0), (11, 0), "B"), &Recurrence::None)
        .await
        .unwrap();
    h.bookings
        .set_external_event_id(synced[0].id, "evt-42")
        .await
        .unwrap();

    h.service.delete(created[0].id).await.unwrap();
    h.service.delete(synced[0].id).await.unwrap();

    let deletions: Vec<SyncEvent> = h
        .outbox
        .events()
        .await
        .into_iter()
        .filter(|event| matches!(event, SyncEvent::Deleted { .. }))
        .collect();
    assert_eq!(
        deletions,
        [SyncEvent::Deleted {
            booking_id: synced[0].id,
            external_event_id: "evt-42".to_string(),
        }]
    );

    let err = h.service.delete(created[0].id).await.unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));
}

#[test_log::test(tokio::test)]
async fn test_conversion_with_a_confirmed_option_reserves() {
    let h = harness();
    let lead = inquiry(InquiryStatus::Quoted);
    h.inquiries.insert(lead.clone()).await;

    let request = ConversionRequest {
        options: vec![
            option(Some(date(2024, 9, 14)), Some("Foyer"), BookingStatus::Confirmed),
            option(Some(date(2024, 9, 21)), Some("Foyer"), BookingStatus::Option),
        ],
        ..ConversionRequest::default()
    };
    let outcome = h.service.convert_inquiry(lead.id, &request).await.unwrap();

    assert_eq!(outcome.inquiry.status, InquiryStatus::Reserved);
    assert_eq!(outcome.bookings.len(), 2);
    assert!(outcome.bookings.iter().all(|b| b.inquiry_id == Some(lead.id)));

    let linked = h.service.inquiry_bookings(lead.id).await.unwrap();
    assert_eq!(linked.len(), 2);
    assert_eq!(
        h.service.inquiry(lead.id).await.unwrap().status,
        InquiryStatus::Reserved
    );
}

#[test_log::test(tokio::test)]
async fn test_conversion_of_options_only_holds() {
    let h = harness();
    let lead = inquiry(InquiryStatus::New);
    h.inquiries.insert(lead.clone()).await;

    let request = ConversionRequest {
        options: vec![option(
            Some(date(2024, 9, 14)),
            Some("West"),
            BookingStatus::Option,
        )],
        ..ConversionRequest::default()
    };
    let outcome = h.service.convert_inquiry(lead.id, &request).await.unwrap();
    assert_eq!(outcome.inquiry.status, InquiryStatus::Option);
}

#[test_log::test(tokio::test)]
async fn test_conversion_without_room_creates_nothing() {
    let h = harness();
    let lead = inquiry(InquiryStatus::New);
    h.inquiries.insert(lead.clone()).await;

    let request = ConversionRequest {
        options: vec![option(Some(date(2024, 9, 14)), None, BookingStatus::Confirmed)],
        ..ConversionRequest::default()
    };
    let err = h
        .service
        .convert_inquiry(lead.id, &request)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::ValidationError(_)));
    assert!(h.bookings.is_empty().await);
    assert_eq!(
        h.service.inquiry(lead.id).await.unwrap().status,
        InquiryStatus::New
    );
}

#[test_log::test(tokio::test)]
async fn test_failed_batch_leaves_inquiry_untouched() {
    let bookings = MemoryBookingStore::new();
    let inquiries = MemoryInquiryStore::new();
    let outbox = MemoryOutbox::new();
    let lead = inquiry(InquiryStatus::Negotiating);
    inquiries.insert(lead.clone()).await;

    let service = BookingService::new(
        Venue::default(),
        Arc::new(FailingBatchStore(bookings.clone())),
        Arc::new(inquiries.clone()),
        Arc::new(MemoryDirectory::new()),
        Arc::new(outbox.clone()),
    );
    let request = ConversionRequest {
        options: vec![option(Some(date(2024, 9, 14)), Some("Oost"), BookingStatus::Confirmed)],
        ..ConversionRequest::default()
    };

    let err = service.convert_inquiry(lead.id, &request).await.unwrap_err();
    assert!(matches!(err, ServiceError::PersistenceError(_)));
    assert_eq!(
        inquiries.get(lead.id).await.unwrap().unwrap().status,
        InquiryStatus::Negotiating
    );
    assert!(bookings.is_empty().await);
    assert!(outbox.events().await.is_empty());
}

#[test_log::test(tokio::test)]
async fn test_failed_inquiry_update_removes_created_bookings() {
    let bookings = MemoryBookingStore::new();
    let inquiries = MemoryInquiryStore::new();
    let outbox = MemoryOutbox::new();
    let lead = inquiry(InquiryStatus::Viewing);
    inquiries.insert(lead.clone()).await;

    let service = BookingService::new(
        Venue::default(),
        Arc::new(bookings.clone()),
        Arc::new(ReadOnlyInquiries(inquiries.clone())),
        Arc::new(MemoryDirectory::new()),
        Arc::new(outbox.clone()),
    );
    let request = ConversionRequest {
        options: vec![
            option(Some(date(2024, 9, 14)), Some("Oost"), BookingStatus::Confirmed),
            option(Some(date(2024, 9, 15)), Some("Oost"), BookingStatus::Option),
        ],
        ..ConversionRequest::default()
    };

    let err = service.convert_inquiry(lead.id, &request).await.unwrap_err();
    assert!(matches!(err, ServiceError::PersistenceError(_)));
    assert!(bookings.is_empty().await);
    assert!(outbox.events().await.is_empty());
    assert_eq!(
        inquiries.get(lead.id).await.unwrap().unwrap().status,
        InquiryStatus::Viewing
    );
}

#[test_log::test(tokio::test)]
async fn test_conversion_conflict_creates_nothing() {
    let h = harness();
    h.service
        .create(
            draft("Foyer", date(2024, 9, 21), (20, 0), (23, 30), "Bedrijfsborrel"),
            &Recurrence::None,
        )
        .await
        .unwrap();
    let lead = inquiry(InquiryStatus::Quoted);
    h.inquiries.insert(lead.clone()).await;

    let request = ConversionRequest {
        options: vec![
            option(Some(date(2024, 9, 14)), Some("Foyer"), BookingStatus::Confirmed),
            option(Some(date(2024, 9, 21)), Some("Foyer"), BookingStatus::Option),
        ],
        ..ConversionRequest::default()
    };
    let err = h
        .service
        .convert_inquiry(lead.id, &request)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Conflict(_)));
    assert_eq!(h.bookings.len().await, 1);
    assert_eq!(
        h.service.inquiry(lead.id).await.unwrap().status,
        InquiryStatus::Quoted
    );
}

#[test_log::test(tokio::test)]
async fn test_lost_inquiry_cannot_be_converted() {
    let h = harness();
    let lead = inquiry(InquiryStatus::Lost);
    h.inquiries.insert(lead.clone()).await;

    let request = ConversionRequest {
        options: vec![option(Some(date(2024, 9, 14)), Some("Foyer"), BookingStatus::Confirmed)],
        ..ConversionRequest::default()
    };
    let err = h
        .service
        .convert_inquiry(lead.id, &request)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::ValidationError(_)));
}

#[test_log::test(tokio::test)]
async fn test_move_takes_end_from_stored_duration() {
    let h = harness();
    let on = date(2024, 6, 10);
    let created = h
        .service
        .create(draft("Oost", on, (9, 0), (12, 0), "A"), &Recurrence::None)
        .await
        .unwrap();
    let booking = created[0].clone();

    // A stale client still thinks the booking spans four hours.
    let request = MoveRequest {
        booking_id: booking.id,
        target: Placement {
            room: Room::from("West"),
            date: on,
            slots: SlotRange::new(28, 44).unwrap(),
        },
    };
    let moved = h.service.commit_move(request).await.unwrap();
    assert_eq!(moved.start, WallTime::new(14, 0).unwrap());
    assert_eq!(moved.end, WallTime::new(17, 0).unwrap());
    assert_eq!(moved.slots().duration_slots(), 12);
}

#[test_log::test(tokio::test)]
async fn test_move_past_closing_is_rejected() {
    let h = harness();
    let on = date(2024, 6, 10);
    let created = h
        .service
        .create(draft("Oost", on, (9, 0), (12, 0), "A"), &Recurrence::None)
        .await
        .unwrap();
    let booking = created[0].clone();

    // 00:00 + 3 hours would end after 01:45.
    let request = MoveRequest {
        booking_id: booking.id,
        target: Placement {
            room: Room::from("Oost"),
            date: on,
            slots: SlotRange::new(68, 75).unwrap(),
        },
    };
    let err = h.service.commit_move(request).await.unwrap_err();
    assert!(matches!(err, ServiceError::ValidationError(_)));

    let stored = h.service.get(booking.id).await.unwrap();
    assert_eq!(stored.start, booking.start);
    assert_eq!(stored.end, booking.end);
}

#[test]
fn test_move_request_with_bad_slots_does_not_parse() {
    let id = Uuid::new_v4();
    for slots in [r#"{"start":70,"end":82}"#, r#"{"start":20,"end":8}"#] {
        let json = format!(
            r#"{{"booking_id":"{id}","target":{{"room":"Oost","date":"2024-06-10","slots":{slots}}}}}"#
        );
        assert!(serde_json::from_str::<MoveRequest>(&json).is_err(), "{slots}");
    }
}

#[test_log::test(tokio::test)]
async fn test_failed_sync_does_not_fail_mutations() {
    let bookings = MemoryBookingStore::new();
    let inquiries = MemoryInquiryStore::new();
    let lead = inquiry(InquiryStatus::Quoted);
    inquiries.insert(lead.clone()).await;
    let service = BookingService::new(
        Venue::default(),
        Arc::new(bookings.clone()),
        Arc::new(inquiries.clone()),
        Arc::new(MemoryDirectory::new()),
        Arc::new(UnreachablePublisher),
    );
    let on = date(2024, 6, 10);

    let created = service
        .create(draft("Oost", on, (9, 0), (12, 0), "A"), &Recurrence::None)
        .await
        .unwrap();
    let id = created[0].id;
    assert_eq!(bookings.len().await, 1);

    let updated = service
        .update(id, draft("Oost", on, (9, 0), (13, 0), "A"))
        .await
        .unwrap();
    assert_eq!(updated.end, WallTime::new(13, 0).unwrap());
    assert_eq!(
        bookings.get(id).await.unwrap().unwrap().end,
        WallTime::new(13, 0).unwrap()
    );

    bookings.set_external_event_id(id, "evt-9").await.unwrap();
    service.delete(id).await.unwrap();
    assert!(bookings.is_empty().await);

    let request = ConversionRequest {
        options: vec![option(Some(date(2024, 9, 14)), Some("Foyer"), BookingStatus::Confirmed)],
        ..ConversionRequest::default()
    };
    let outcome = service.convert_inquiry(lead.id, &request).await.unwrap();
    assert_eq!(outcome.bookings.len(), 1);
    assert_eq!(bookings.len().await, 1);
    assert_eq!(
        inquiries.get(lead.id).await.unwrap().unwrap().status,
        InquiryStatus::Reserved
    );
}
