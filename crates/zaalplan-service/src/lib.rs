//! Zaalplan scheduler services: conflict detection, drag moves, recurrence,
//! inquiry conversion, storage adapters and calendar sync.

pub mod booking;
pub mod directory;
pub mod error;
pub mod schedule;
pub mod store;
pub mod sync;
