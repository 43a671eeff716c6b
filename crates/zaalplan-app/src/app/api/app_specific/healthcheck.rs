use salvo::writing::Json;
use salvo::{Depot, Router, handler};
use serde::Serialize;

use crate::service_handler::get_service_from_depot;

#[derive(Debug, Serialize)]
struct Health {
    status: &'static str,
    rooms: usize,
}

/// Liveness probe. Does not touch storage.
#[handler]
async fn healthcheck(depot: &Depot) -> Json<Health> {
    let rooms = get_service_from_depot(depot).map_or(0, |service| service.venue().rooms().len());
    Json(Health { status: "ok", rooms })
}

#[must_use]
pub fn routes() -> Router {
    Router::with_path("healthcheck").get(healthcheck)
}
