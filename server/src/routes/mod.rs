use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::config::{create_cors_layer, create_security_headers_layer};
use crate::handlers::{availability, bookings, health_check, route_not_found, tickets};
use crate::state::AppState;

pub fn create_routes(state: AppState) -> Router {
    let cors = create_cors_layer(&state.config.cors_allowed_origins);
    let security = create_security_headers_layer(state.config.production);

    let bookings = Router::new()
        .route("/eligibility", post(bookings::booking_eligibility))
        .route("/validate", post(bookings::validate_booking_record))
        .route("/transition", post(bookings::transition_booking))
        .route("/search", post(bookings::search_bookings))
        .route("/parks/:park_id/time-slots", get(bookings::time_slots));

    let tickets = Router::new()
        .route("/check", post(tickets::check_ticket))
        .route("/qr-payload", post(tickets::ticket_qr_payload))
        .route("/redeem", post(tickets::redeem))
        .route("/search", post(tickets::search_tickets));

    let parks = Router::new().route(
        "/:park_id/availability",
        post(availability::park_day_availability),
    );

    let api = Router::new()
        .nest("/bookings", bookings)
        .nest("/tickets", tickets)
        .nest("/parks", parks);

    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api)
        .fallback(route_not_found)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(security)
        .layer(cors)
}
