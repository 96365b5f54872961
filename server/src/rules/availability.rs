use chrono::NaiveDate;
use uuid::Uuid;

use crate::models::{
    Booking, BookingAvailability, BookingStatus, DayAvailability, ParkCapacity, SlotAvailability,
    TimeSlotConfig,
};
use crate::utils::time::parse_hhmm;

/// Exactly full counts as fully booked.
pub fn day_availability(total_capacity: u32, current_bookings: u32) -> DayAvailability {
    let available_slots = i64::from(total_capacity) - i64::from(current_bookings);
    DayAvailability {
        total_capacity,
        current_bookings,
        available_slots,
        is_fully_booked: available_slots <= 0,
    }
}

/// A slot with nothing left is not available.
pub fn slot_availability(time: impl Into<String>, capacity: u32, booked: u32) -> SlotAvailability {
    let available = i64::from(capacity) - i64::from(booked);
    SlotAvailability {
        time: time.into(),
        capacity,
        booked,
        available,
        is_available: available > 0,
    }
}

/// Whether a booking still takes up park capacity.
pub fn holds_capacity(status: BookingStatus) -> bool {
    !matches!(status, BookingStatus::Cancelled | BookingStatus::NoShow)
}

/// Point-in-time view over the caller's booking snapshot. Nothing is reserved;
/// two callers can both see the last slot as free.
pub fn park_availability(
    park_id: Uuid,
    date: NaiveDate,
    capacity: &ParkCapacity,
    bookings: &[Booking],
) -> BookingAvailability {
    let day_bookings: Vec<&Booking> = bookings
        .iter()
        .filter(|b| b.park_id == park_id)
        .filter(|b| b.visit_date.date_naive() == date)
        .filter(|b| holds_capacity(b.status))
        .collect();

    let time_slots = capacity
        .time_slots
        .iter()
        .map(|slot| {
            let booked = count_in_slot(slot, &day_bookings);
            slot_availability(slot.label(), slot.capacity, booked)
        })
        .collect();

    BookingAvailability {
        park_id,
        date,
        day: day_availability(capacity.total_capacity, saturating_count(day_bookings.len())),
        time_slots,
    }
}

fn count_in_slot(slot: &TimeSlotConfig, bookings: &[&Booking]) -> u32 {
    let matching = bookings
        .iter()
        .filter_map(|b| b.visit_time.as_deref().and_then(parse_hhmm))
        .filter(|time| slot.contains(*time))
        .count();
    saturating_count(matching)
}

fn saturating_count(count: usize) -> u32 {
    u32::try_from(count).unwrap_or(u32::MAX)
}
