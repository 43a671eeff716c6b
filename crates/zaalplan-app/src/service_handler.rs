use salvo::async_trait;
use std::sync::Arc;

use crate::error::AppResult;
use zaalplan_core::error::CoreError;
use zaalplan_service::booking::BookingService;

/// Makes the booking service available to every handler below it.
pub struct BookingServiceHandler {
    pub service: Arc<BookingService>,
}

#[async_trait]
impl salvo::Handler for BookingServiceHandler {
    #[tracing::instrument(skip(self, _req, depot, _res, _ctrl))]
    async fn handle(
        &self,
        _req: &mut salvo::Request,
        depot: &mut salvo::Depot,
        _res: &mut salvo::Response,
        _ctrl: &mut salvo::FlowCtrl,
    ) {
        depot.inject(Arc::clone(&self.service));
    }
}

/// ## Summary
/// Retrieves the booking service from the depot.
///
/// ## Errors
/// Returns an error if the service is not found in the depot.
pub fn get_service_from_depot(depot: &salvo::Depot) -> AppResult<Arc<BookingService>> {
    depot
        .obtain::<Arc<BookingService>>()
        .cloned()
        .map_err(|_err| CoreError::InvariantViolation("Booking service not found in depot").into())
}
