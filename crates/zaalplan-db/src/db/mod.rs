use crate::error::DbResult;
use std::future::Future;
use std::pin::Pin;

pub mod connection;
pub mod enums;
pub mod map;
pub mod query;
pub mod schema;

/// Name of the exclusion constraint that forbids overlapping bookings in one room.
pub const BOOKING_NO_OVERLAP: &str = "booking_no_overlap";

pub trait DbProvider: Send + Sync {
    fn get_connection<'a>(
        &'a self,
    ) -> Pin<Box<dyn Future<Output = DbResult<connection::DbConnection<'a>>> + Send + 'a>>;
}
