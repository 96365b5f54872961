use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::response::Response;
use axum::Json;
use chrono::NaiveDate;
use serde::Deserialize;
use tracing::debug;
use uuid::Uuid;

use crate::models::{Booking, ParkCapacity};
use crate::rules::availability::park_availability;
use crate::state::AppState;
use crate::utils::error::AppError;
use crate::utils::response::success;

#[derive(Debug, Deserialize)]
pub struct AvailabilityRequest {
    pub date: NaiveDate,
    #[serde(default)]
    pub bookings: Vec<Booking>,
    /// Falls back to the server's configured capacity.
    #[serde(default)]
    pub capacity: Option<ParkCapacity>,
}

pub async fn park_day_availability(
    State(state): State<AppState>,
    Path(park_id): Path<Uuid>,
    payload: Result<Json<AvailabilityRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(AvailabilityRequest {
        date,
        bookings,
        capacity,
    }) = payload?;

    let capacity = capacity.unwrap_or_else(|| state.config.park_capacity.clone());
    let availability = park_availability(park_id, date, &capacity, &bookings);
    debug!(
        %park_id,
        %date,
        current_bookings = availability.day.current_bookings,
        fully_booked = availability.day.is_fully_booked,
        "Computed park availability"
    );

    Ok(success(availability, "Availability calculated"))
}
