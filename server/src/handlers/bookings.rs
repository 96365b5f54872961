use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::response::Response;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::models::{Booking, TimeSlotConfig};
use crate::rules::booking::eligibility;
use crate::rules::search::BookingSearch;
use crate::state::AppState;
use crate::utils::error::AppError;
use crate::utils::response::success;
use crate::validation::validate_booking;
use crate::workflow::{apply_booking_action, BookingAction};

#[derive(Debug, Deserialize)]
pub struct BookingSnapshot {
    pub booking: Booking,
    #[serde(default)]
    pub now: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct TransitionRequest {
    pub booking: Booking,
    pub action: BookingAction,
    #[serde(default)]
    pub now: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    pub bookings: Vec<Booking>,
    #[serde(default)]
    pub filter: BookingSearch,
}

#[derive(Serialize)]
struct ValidatedPayload {
    id: Uuid,
    booking_number: String,
    valid: bool,
}

#[derive(Serialize)]
struct TimeSlotsPayload<'a> {
    park_id: Uuid,
    time_slots: &'a [TimeSlotConfig],
    labels: Vec<String>,
}

pub async fn booking_eligibility(
    payload: Result<Json<BookingSnapshot>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(BookingSnapshot { booking, now }) = payload?;
    validate_booking(&booking)?;

    let now = now.unwrap_or_else(Utc::now);
    let summary = eligibility(&booking, now);
    debug!(
        booking_number = %booking.booking_number,
        status = %booking.status,
        can_cancel = summary.can_cancel,
        can_check_in = summary.can_check_in,
        "Evaluated booking eligibility"
    );

    Ok(success(summary, "Booking eligibility evaluated"))
}

pub async fn validate_booking_record(
    payload: Result<Json<BookingSnapshot>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(BookingSnapshot { booking, .. }) = payload?;
    validate_booking(&booking)?;

    let body = ValidatedPayload {
        id: booking.id,
        booking_number: booking.booking_number,
        valid: true,
    };
    Ok(success(body, "Booking is valid"))
}

pub async fn transition_booking(
    payload: Result<Json<TransitionRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(TransitionRequest {
        booking,
        action,
        now,
    }) = payload?;
    validate_booking(&booking)?;

    let now = now.unwrap_or_else(Utc::now);
    let next = apply_booking_action(&booking, &action, now)?;
    info!(
        booking_number = %next.booking_number,
        from = %booking.status,
        to = %next.status,
        "Booking transition computed"
    );

    Ok(success(next, "Booking transition applied"))
}

pub async fn search_bookings(
    payload: Result<Json<SearchRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(SearchRequest { bookings, filter }) = payload?;

    let page = filter.apply(&bookings);
    debug!(
        candidates = bookings.len(),
        total = page.total,
        page = page.page,
        "Searched bookings"
    );

    Ok(success(page, "Bookings retrieved"))
}

pub async fn time_slots(State(state): State<AppState>, Path(park_id): Path<Uuid>) -> Response {
    let slots = &state.config.park_capacity.time_slots;
    let body = TimeSlotsPayload {
        park_id,
        time_slots: slots,
        labels: slots.iter().map(TimeSlotConfig::label).collect(),
    };

    success(body, "Available time slots")
}
