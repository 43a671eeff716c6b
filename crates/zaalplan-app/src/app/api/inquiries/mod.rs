//! Inquiry lookups and conversion under `/api/inquiries`.

use salvo::Router;

use zaalplan_core::constants::INQUIRIES_ROUTE_COMPONENT;

mod handlers;


#[must_use]
pub fn routes() -> Router {
    Router::with_path(INQUIRIES_ROUTE_COMPONENT).push(
        Router::with_path("{id}")
            .get(handlers::show)
            .push(Router::with_path("bookings").get(handlers::bookings))
            .push(Router::with_path("convert").post(handlers::convert)),
    )
}
