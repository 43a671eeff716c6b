use salvo::http::StatusCode;
use salvo::{Depot, Request, Response, handler};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use zaalplan_core::model::Booking;
use zaalplan_service::schedule::drag::{DragState, GridGeometry, Pointer, ReleaseOutcome};

use crate::app::api::extract::json_body;
use crate::error::{AppResult, render_result};
use crate::service_handler::get_service_from_depot;

#[derive(Debug, Deserialize)]
pub struct BeginRequest {
    #[serde(default)]
    pub state: DragState,
    pub booking_id: Uuid,
    pub geometry: GridGeometry,
    pub pointer: Pointer,
}

#[derive(Debug, Deserialize)]
pub struct PointerRequest {
    pub state: DragState,
    pub geometry: GridGeometry,
    pub pointer: Pointer,
}

#[derive(Debug, Deserialize)]
pub struct StateRequest {
    pub state: DragState,
}

#[derive(Debug, Serialize)]
pub struct StateResponse {
    pub state: DragState,
}

/// ## Summary
/// Result of a release. `booking` is the moved booking when the move was
/// committed.
#[derive(Debug, Serialize)]
pub struct ReleaseResponse {
    pub state: DragState,
    #[serde(flatten)]
    pub outcome: ReleaseOutcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub booking: Option<Booking>,
}

/// Bookings on the dragged booking's date, or nothing when idle.
async fn day_of(state: &DragState, depot: &Depot) -> AppResult<Vec<Booking>> {
    match state {
        DragState::Dragging(session) => {
            let service = get_service_from_depot(depot)?;
            Ok(service.day(session.original.date).await?)
        }
        DragState::Idle => Ok(Vec::new()),
    }
}

/// ## Summary
/// POST /planner/drag/begin - Starts dragging a booking.
///
/// ## Errors
/// Returns HTTP 404 for an unknown booking, 422 when the pointer is off the
/// grid and 400 when a drag is already active.
#[handler]
#[tracing::instrument(skip_all)]
pub async fn begin(req: &mut Request, depot: &Depot, res: &mut Response) {
    async fn run(req: &mut Request, depot: &Depot) -> AppResult<StateResponse> {
        let body: BeginRequest = json_body(req).await?;
        let service = get_service_from_depot(depot)?;
        let booking = service.get(body.booking_id).await?;
        let state = body.state.begin(&booking, &body.geometry, body.pointer)?;
        Ok(StateResponse { state })
    }
    render_result(res, StatusCode::OK, run(req, depot).await);
}

/// ## Summary
/// POST /planner/drag/pointer - Recomputes the candidate for a pointer move.
#[handler]
#[tracing::instrument(skip_all)]
pub async fn pointer(req: &mut Request, depot: &Depot, res: &mut Response) {
    async fn run(req: &mut Request, depot: &Depot) -> AppResult<StateResponse> {
        let body: PointerRequest = json_body(req).await?;
        let bookings = day_of(&body.state, depot).await?;
        let state = body
            .state
            .pointer_moved(&body.geometry, body.pointer, &bookings);
        Ok(StateResponse { state })
    }
    render_result(res, StatusCode::OK, run(req, depot).await);
}

/// ## Summary
/// POST /planner/drag/release - Ends the drag and commits a valid move.
///
/// The release is judged against freshly loaded bookings, and the commit
/// checks again, so a booking created during the drag is never overwritten.
///
/// ## Side Effects
/// Updates the booking and publishes a sync event when the move is valid.
///
/// ## Errors
/// Returns HTTP 409 if the commit finds a conflict the preview missed.
#[handler]
#[tracing::instrument(skip_all)]
pub async fn release(req: &mut Request, depot: &Depot, res: &mut Response) {
    async fn run(req: &mut Request, depot: &Depot) -> AppResult<ReleaseResponse> {
        let body: StateRequest = json_body(req).await?;
        let bookings = day_of(&body.state, depot).await?;
        let (state, outcome) = body.state.release(&bookings);
        let booking = match &outcome {
            ReleaseOutcome::Move { request } => {
                let service = get_service_from_depot(depot)?;
                Some(service.commit_move(request.clone()).await?)
            }
            ReleaseOutcome::NoChange | ReleaseOutcome::Rejected { .. } => None,
        };
        Ok(ReleaseResponse {
            state,
            outcome,
            booking,
        })
    }
    render_result(res, StatusCode::OK, run(req, depot).await);
}

/// ## Summary
/// POST /planner/drag/cancel - Abandons the drag without changes.
#[handler]
pub async fn cancel(req: &mut Request, res: &mut Response) {
    let result = json_body::<StateRequest>(req)
        .await
        .map(|body| StateResponse {
            state: body.state.cancel(),
        });
    render_result(res, StatusCode::OK, result);
}
