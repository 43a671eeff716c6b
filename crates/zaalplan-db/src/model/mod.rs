pub mod booking;
pub mod contact;
pub mod inquiry;
pub mod outbox;
