mod app_specific;
mod bookings;
pub mod extract;
mod inquiries;
mod planner;

#[cfg(test)]
pub(crate) mod test_support;

use salvo::Router;

pub use zaalplan_core::constants::{
    API_ROUTE_COMPONENT, API_ROUTE_PREFIX, BOOKINGS_ROUTE_PREFIX, INQUIRIES_ROUTE_PREFIX,
    PLANNER_ROUTE_PREFIX,
};

/// ## Summary
/// Constructs the main API router.
#[must_use]
pub fn routes() -> Router {
    Router::with_path(API_ROUTE_COMPONENT)
        .push(app_specific::routes())
        .push(bookings::routes())
        .push(planner::routes())
        .push(inquiries::routes())
}
