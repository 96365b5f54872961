pub mod booking;
pub mod park;
pub mod ticket;

pub use booking::{Booking, BookingStatus};
pub use park::{
    BookingAvailability, DayAvailability, ParkCapacity, SlotAvailability, TimeSlotConfig,
};
pub use ticket::{QrPayload, Ticket, TicketStatus, TicketType};
