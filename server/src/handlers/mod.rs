use axum::http::Uri;
use axum::response::Response;
use serde::Serialize;

use crate::utils::error::AppError;
use crate::utils::response::success;

pub mod availability;
pub mod bookings;
pub mod tickets;

#[derive(Serialize)]
struct HealthPayload {
    status: &'static str,
    service: &'static str,
}

pub async fn health_check() -> Response {
    let payload = HealthPayload {
        status: "ok",
        service: "skypark-api",
    };

    success(payload, "Health check successful")
}

pub async fn route_not_found(uri: Uri) -> AppError {
    AppError::NotFound(format!("No route for {}", uri.path()))
}
