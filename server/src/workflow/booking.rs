use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::models::{Booking, BookingStatus};
use crate::rules::booking::{can_cancel, can_check_in};
use crate::validation::cancellation_reason_ok;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BookingAction {
    Confirm,
    /// Staff may correct the head count at the gate; omitted counts keep the
    /// booked ones.
    CheckIn {
        #[serde(default)]
        actual_adults: Option<u32>,
        #[serde(default)]
        actual_children: Option<u32>,
        #[serde(default)]
        check_in_notes: Option<String>,
    },
    Complete,
    Cancel { reason: String },
    NoShow,
}

impl BookingAction {
    pub fn check_in() -> Self {
        BookingAction::CheckIn {
            actual_adults: None,
            actual_children: None,
            check_in_notes: None,
        }
    }

    pub fn target(&self) -> BookingStatus {
        match self {
            BookingAction::Confirm => BookingStatus::Confirmed,
            BookingAction::CheckIn { .. } => BookingStatus::CheckedIn,
            BookingAction::Complete => BookingStatus::Completed,
            BookingAction::Cancel { .. } => BookingStatus::Cancelled,
            BookingAction::NoShow => BookingStatus::NoShow,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransitionError {
    #[error("booking is already {0} and cannot change")]
    Terminal(BookingStatus),

    #[error("booking cannot move from {from} to {to}")]
    Illegal {
        from: BookingStatus,
        to: BookingStatus,
    },

    #[error("cancellation window has closed")]
    CancellationWindowClosed,

    #[error("check-in is only possible around the visit date")]
    OutsideCheckInWindow,

    #[error("cancellation reason must be 1 to 500 characters")]
    MissingReason,
}

/// Computes the snapshot that follows `action`. The input is left untouched;
/// persisting the result is up to the caller's store.
pub fn apply(
    booking: &Booking,
    action: &BookingAction,
    now: DateTime<Utc>,
) -> Result<Booking, TransitionError> {
    let from = booking.status;
    let to = action.target();

    if from.is_terminal() {
        return Err(TransitionError::Terminal(from));
    }
    if !from.can_transition_to(to) {
        return Err(TransitionError::Illegal { from, to });
    }

    let mut next = booking.clone();
    match action {
        BookingAction::Confirm | BookingAction::NoShow => {}
        BookingAction::CheckIn {
            actual_adults,
            actual_children,
            check_in_notes,
        } => {
            if !can_check_in(booking, now) {
                return Err(TransitionError::OutsideCheckInWindow);
            }
            next.checked_in_at.get_or_insert(now);
            if let Some(adults) = actual_adults {
                next.adults_count = *adults;
            }
            if let Some(children) = actual_children {
                next.children_count = *children;
            }
            if let Some(note) = check_in_notes.as_deref().map(str::trim) {
                if !note.is_empty() {
                    next.admin_notes = Some(match next.admin_notes.take() {
                        Some(existing) => format!("{}\n{}", existing, note),
                        None => note.to_string(),
                    });
                }
            }
        }
        BookingAction::Complete => {
            next.completed_at.get_or_insert(now);
        }
        BookingAction::Cancel { reason } => {
            if !can_cancel(booking, now) {
                return Err(TransitionError::CancellationWindowClosed);
            }
            if !cancellation_reason_ok(reason) {
                return Err(TransitionError::MissingReason);
            }
            next.cancelled_at.get_or_insert(now);
            next.cancellation_reason = Some(reason.trim().to_string());
        }
    }

    next.status = to;
    next.updated_at = now;
    Ok(next)
}
