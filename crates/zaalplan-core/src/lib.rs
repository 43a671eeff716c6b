//! Zaalplan core: configuration, errors, the slot time model and domain records.

pub mod config;
pub mod constants;
pub mod error;
pub mod model;
pub mod time;
