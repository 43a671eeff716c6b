//! Conversions between database rows and domain records.

pub mod booking;
pub mod contact;
pub mod inquiry;
