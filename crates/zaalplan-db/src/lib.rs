//! Zaalplan persistence: Diesel schema, row models and query builders for
//! bookings, inquiries, CRM contacts and the sync outbox.

pub mod db;
pub mod error;
pub mod migrations;
pub mod model;
