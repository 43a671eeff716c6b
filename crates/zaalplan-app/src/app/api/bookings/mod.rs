//! Booking CRUD and conflict checks under `/api/bookings`.

use salvo::Router;

use zaalplan_core::constants::BOOKINGS_ROUTE_COMPONENT;

mod handlers;


#[must_use]
pub fn routes() -> Router {
    Router::with_path(BOOKINGS_ROUTE_COMPONENT)
        .get(handlers::list)
        .post(handlers::create)
        .push(Router::with_path("check").post(handlers::check))
        .push(
            Router::with_path("{id}")
                .get(handlers::show)
                .put(handlers::update)
                .delete(handlers::remove),
        )
}
