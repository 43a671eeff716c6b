use chrono::NaiveDate;
use salvo::http::StatusCode;
use salvo::{Depot, Request, Response, handler};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use zaalplan_core::model::{Booking, BookingDraft, BookingFilter, Room};
use zaalplan_core::time::{SlotRange, WallTime};
use zaalplan_service::directory::BookingDetails;
use zaalplan_service::error::ConflictDetails;
use zaalplan_service::schedule::recurrence::Recurrence;

use crate::app::api::extract::{json_body, path_uuid, query};
use crate::error::{AppResult, render_error, render_result};
use crate::service_handler::get_service_from_depot;

/// ## Summary
/// Create booking request payload
///
/// The draft fields sit at the top level; `recurrence` defaults to a single
/// booking.
#[derive(Debug, Deserialize)]
pub struct CreateBookingRequest {
    #[serde(flatten)]
    pub draft: BookingDraft,
    #[serde(default)]
    pub recurrence: Recurrence,
}

/// ## Summary
/// Conflict check request payload
#[derive(Debug, Deserialize)]
pub struct CheckRequest {
    pub room: Room,
    pub date: NaiveDate,
    pub start: WallTime,
    pub end: WallTime,
    /// Booking being edited, which may overlap its own old interval.
    #[serde(default)]
    pub exclude_id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct CheckResponse {
    pub available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conflict: Option<ConflictDetails>,
}

/// ## Summary
/// GET /bookings - Lists bookings, filtered by `room`, `date`, `from`, `to`
/// and `inquiry_id` query parameters.
///
/// ## Errors
/// Returns HTTP 400 for a malformed query, 5xx if storage fails.
#[handler]
#[tracing::instrument(skip_all)]
pub async fn list(req: &mut Request, depot: &Depot, res: &mut Response) {
    async fn run(req: &mut Request, depot: &Depot) -> AppResult<Vec<Booking>> {
        let filter: BookingFilter = query(req)?;
        let service = get_service_from_depot(depot)?;
        Ok(service.list(&filter).await?)
    }
    render_result(res, StatusCode::OK, run(req, depot).await);
}

/// ## Summary
/// POST /bookings - Creates a booking or a recurring series.
///
/// ## Side Effects
/// - Stores every instance, all or nothing
/// - Publishes a sync event per created booking
///
/// ## Errors
/// Returns HTTP 422 for invalid input and HTTP 409 with the blocking booking
/// when any instance conflicts.
#[handler]
#[tracing::instrument(skip_all)]
pub async fn create(req: &mut Request, depot: &Depot, res: &mut Response) {
    async fn run(req: &mut Request, depot: &Depot) -> AppResult<Vec<Booking>> {
        let body: CreateBookingRequest = json_body(req).await?;
        let service = get_service_from_depot(depot)?;
        Ok(service.create(body.draft, &body.recurrence).await?)
    }
    render_result(res, StatusCode::CREATED, run(req, depot).await);
}

/// ## Summary
/// POST /bookings/check - Reports the booking, if any, blocking a slot.
///
/// ## Errors
/// Returns HTTP 422 for an unknown room or an invalid interval.
#[handler]
#[tracing::instrument(skip_all)]
pub async fn check(req: &mut Request, depot: &Depot, res: &mut Response) {
    async fn run(req: &mut Request, depot: &Depot) -> AppResult<CheckResponse> {
        let body: CheckRequest = json_body(req).await?;
        let range = SlotRange::between(body.start, body.end)?;
        let service = get_service_from_depot(depot)?;
        let conflict = service
            .check(&body.room, body.date, range, body.exclude_id)
            .await?;
        Ok(CheckResponse {
            available: conflict.is_none(),
            conflict,
        })
    }
    render_result(res, StatusCode::OK, run(req, depot).await);
}

/// ## Summary
/// GET /bookings/{id} - Returns a booking with contact and company names.
///
/// ## Errors
/// Returns HTTP 404 if the booking does not exist.
#[handler]
#[tracing::instrument(skip_all)]
pub async fn show(req: &mut Request, depot: &Depot, res: &mut Response) {
    async fn run(req: &Request, depot: &Depot) -> AppResult<BookingDetails> {
        let id = path_uuid(req, "id")?;
        let service = get_service_from_depot(depot)?;
        Ok(service.details(id).await?)
    }
    render_result(res, StatusCode::OK, run(req, depot).await);
}

/// ## Summary
/// PUT /bookings/{id} - Replaces the editable fields of a booking.
///
/// ## Side Effects
/// Publishes an update sync event.
///
/// ## Errors
/// Returns HTTP 404, 422, or 409 when the new interval is taken.
#[handler]
#[tracing::instrument(skip_all)]
pub async fn update(req: &mut Request, depot: &Depot, res: &mut Response) {
    async fn run(req: &mut Request, depot: &Depot) -> AppResult<Booking> {
        let id = path_uuid(req, "id")?;
        let draft: BookingDraft = json_body(req).await?;
        let service = get_service_from_depot(depot)?;
        Ok(service.update(id, draft).await?)
    }
    render_result(res, StatusCode::OK, run(req, depot).await);
}

/// ## Summary
/// DELETE /bookings/{id} - Deletes a booking.
///
/// ## Side Effects
/// Publishes a delete sync event if the booking was synced before.
///
/// ## Errors
/// Returns HTTP 404 if the booking does not exist.
#[handler]
#[tracing::instrument(skip_all)]
pub async fn remove(req: &mut Request, depot: &Depot, res: &mut Response) {
    async fn run(req: &Request, depot: &Depot) -> AppResult<()> {
        let id = path_uuid(req, "id")?;
        let service = get_service_from_depot(depot)?;
        Ok(service.delete(id).await?)
    }
    match run(req, depot).await {
        Ok(()) => {
            res.status_code(StatusCode::NO_CONTENT);
        }
        Err(err) => render_error(res, &err),
    }
}
