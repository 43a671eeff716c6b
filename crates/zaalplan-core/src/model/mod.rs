//! Domain records shared by the storage, scheduling and HTTP layers.

pub mod booking;
pub mod contact;
pub mod inquiry;
pub mod room;

pub use booking::{Booking, BookingDraft, BookingFilter, BookingStatus, PreparationStatus};
pub use contact::{Company, Contact};
pub use inquiry::{Inquiry, InquiryStatus};
pub use room::{Room, Venue};
