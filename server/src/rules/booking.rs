use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::models::{Booking, BookingStatus};
use crate::utils::time::until;

/// A confirmed booking can be cancelled until this long before the visit.
pub const CANCELLATION_CUTOFF_HOURS: i64 = 2;

/// Check-in opens this long either side of the visit instant.
pub const CHECK_IN_WINDOW_HOURS: i64 = 24;

pub fn can_cancel(booking: &Booking, now: DateTime<Utc>) -> bool {
    match booking.status {
        BookingStatus::Pending => true,
        BookingStatus::Confirmed => {
            until(booking.visit_date, now) > Duration::hours(CANCELLATION_CUTOFF_HOURS)
        }
        BookingStatus::CheckedIn
        | BookingStatus::Completed
        | BookingStatus::Cancelled
        | BookingStatus::NoShow => false,
    }
}

/// Distance-based, not calendar-based: a confirmed party may check in from a
/// day before the visit instant until a day after it.
pub fn can_check_in(booking: &Booking, now: DateTime<Utc>) -> bool {
    booking.status == BookingStatus::Confirmed
        && until(booking.visit_date, now).abs() < Duration::hours(CHECK_IN_WINDOW_HOURS)
}

/// `u64` holds the sum of any two `u32` counts.
pub fn total_guests(booking: &Booking) -> u64 {
    u64::from(booking.adults_count) + u64::from(booking.children_count)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookingEligibility {
    pub status: BookingStatus,
    pub status_label: &'static str,
    pub status_color: &'static str,
    pub can_cancel: bool,
    pub can_check_in: bool,
    pub total_guests: u64,
    pub allowed_transitions: Vec<BookingStatus>,
}

pub fn eligibility(booking: &Booking, now: DateTime<Utc>) -> BookingEligibility {
    BookingEligibility {
        status: booking.status,
        status_label: booking.status.label(),
        status_color: booking.status.color(),
        can_cancel: can_cancel(booking, now),
        can_check_in: can_check_in(booking, now),
        total_guests: total_guests(booking),
        allowed_transitions: booking.status.next_statuses().to_vec(),
    }
}
