//! Check-in, cancellation and gate workflows.
//!
//! These sit on top of [`crate::rules`] and compute the record a store should
//! write next. They never write it themselves.

pub mod booking;
pub mod ticket;

pub use booking::{apply as apply_booking_action, BookingAction, TransitionError};
pub use ticket::{redeem as redeem_ticket, TicketValidationResponse};
