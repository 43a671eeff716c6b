use salvo::http::StatusCode;
use salvo::{Depot, Request, Response, handler};

use zaalplan_core::model::{Booking, Inquiry};
use zaalplan_service::booking::ConversionOutcome;
use zaalplan_service::schedule::convert::ConversionRequest;

use crate::app::api::extract::{json_body, path_uuid};
use crate::error::{AppResult, render_result};
use crate::service_handler::get_service_from_depot;

/// ## Summary
/// GET /inquiries/{id} - Returns an inquiry.
///
/// ## Errors
/// Returns HTTP 404 if the inquiry does not exist.
#[handler]
#[tracing::instrument(skip_all)]
pub async fn show(req: &mut Request, depot: &Depot, res: &mut Response) {
    async fn run(req: &Request, depot: &Depot) -> AppResult<Inquiry> {
        let id = path_uuid(req, "id")?;
        let service = get_service_from_depot(depot)?;
        Ok(service.inquiry(id).await?)
    }
    render_result(res, StatusCode::OK, run(req, depot).await);
}

/// ## Summary
/// GET /inquiries/{id}/bookings - Bookings created from an inquiry.
#[handler]
#[tracing::instrument(skip_all)]
pub async fn bookings(req: &mut Request, depot: &Depot, res: &mut Response) {
    async fn run(req: &Request, depot: &Depot) -> AppResult<Vec<Booking>> {
        let id = path_uuid(req, "id")?;
        let service = get_service_from_depot(depot)?;
        Ok(service.inquiry_bookings(id).await?)
    }
    render_result(res, StatusCode::OK, run(req, depot).await);
}

/// ## Summary
/// POST /inquiries/{id}/convert - Turns the staged date options into
/// bookings and advances the inquiry to `reserved` or `option`.
///
/// ## Side Effects
/// - Creates every booking in one batch
/// - Updates the inquiry's pipeline stage
/// - Publishes a sync event per created booking
///
/// ## Errors
/// Returns HTTP 422 when no option has a date and a room, HTTP 409 when an
/// option is taken, and 5xx if either write fails. Nothing is kept on error.
#[handler]
#[tracing::instrument(skip_all)]
pub async fn convert(req: &mut Request, depot: &Depot, res: &mut Response) {
    async fn run(req: &mut Request, depot: &Depot) -> AppResult<ConversionOutcome> {
        let id = path_uuid(req, "id")?;
        let body: ConversionRequest = json_body(req).await?;
        let service = get_service_from_depot(depot)?;
        Ok(service.convert_inquiry(id, &body).await?)
    }
    render_result(res, StatusCode::CREATED, run(req, depot).await);
}
