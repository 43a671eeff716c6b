use salvo::http::StatusCode;
use salvo::{Depot, Response, handler};

use crate::error::render_result;
use crate::service_handler::get_service_from_depot;

/// ## Summary
/// GET /planner/rooms - Room names in grid column order.
#[handler]
pub async fn rooms(depot: &Depot, res: &mut Response) {
    let result = get_service_from_depot(depot).map(|service| service.venue().rooms().to_vec());
    render_result(res, StatusCode::OK, result);
}
