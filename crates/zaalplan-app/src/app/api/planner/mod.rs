//! Planner grid support under `/api/planner`: room columns and the drag
//! state machine.
//!
//! Drag state lives with the client. Every call takes the current
//! [`DragState`](zaalplan_service::schedule::drag::DragState) and returns
//! the next one, so the server keeps no per-user session.

use salvo::Router;

use zaalplan_core::constants::PLANNER_ROUTE_COMPONENT;

mod drag;
mod rooms;


#[must_use]
pub fn routes() -> Router {
    Router::with_path(PLANNER_ROUTE_COMPONENT)
        .push(Router::with_path("rooms").get(rooms::rooms))
        .push(
            Router::with_path("drag")
                .push(Router::with_path("begin").post(drag::begin))
                .push(Router::with_path("pointer").post(drag::pointer))
                .push(Router::with_path("release").post(drag::release))
                .push(Router::with_path("cancel").post(drag::cancel)),
        )
}
