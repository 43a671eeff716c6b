//! Scheduling rules that do not touch storage.

pub mod conflict;
pub mod convert;
pub mod drag;
pub mod recurrence;
