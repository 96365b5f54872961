use axum::extract::rejection::JsonRejection;
use axum::response::Response;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::models::{QrPayload, Ticket};
use crate::rules::search::TicketSearch;
use crate::rules::ticket::{qr_payload, validity};
use crate::utils::error::AppError;
use crate::utils::response::success;
use crate::validation::validate_ticket;
use crate::workflow::redeem_ticket;

#[derive(Debug, Deserialize)]
pub struct TicketSnapshot {
    pub ticket: Ticket,
    #[serde(default)]
    pub now: Option<DateTime<Utc>>,
}

/// What the gate scanner posts after reading a code.
#[derive(Debug, Deserialize)]
pub struct RedeemRequest {
    pub ticket: Ticket,
    pub qr_code: String,
    pub park_id: Uuid,
    pub staff_id: Uuid,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub now: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct TicketSearchRequest {
    pub tickets: Vec<Ticket>,
    #[serde(default)]
    pub filter: TicketSearch,
}

#[derive(Serialize)]
struct QrPayloadBody {
    payload: QrPayload,
    /// The exact string to render into the printed code.
    encoded: String,
}

pub async fn check_ticket(
    payload: Result<Json<TicketSnapshot>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(TicketSnapshot { ticket, now }) = payload?;
    validate_ticket(&ticket)?;

    let report = validity(&ticket, now.unwrap_or_else(Utc::now));
    Ok(success(report, "Ticket checked"))
}

pub async fn ticket_qr_payload(
    payload: Result<Json<TicketSnapshot>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(TicketSnapshot { ticket, .. }) = payload?;
    validate_ticket(&ticket)?;

    let payload = qr_payload(&ticket);
    let encoded = serde_json::to_string(&payload)
        .map_err(|e| AppError::InternalServerError(format!("QR payload encoding failed: {}", e)))?;

    Ok(success(QrPayloadBody { payload, encoded }, "QR payload generated"))
}

pub async fn redeem(
    payload: Result<Json<RedeemRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(request) = payload?;
    validate_ticket(&request.ticket)?;

    let now = request.now.unwrap_or_else(Utc::now);
    let outcome = redeem_ticket(&request.ticket, &request.qr_code, request.staff_id, now);

    if outcome.can_enter {
        info!(
            ticket_number = %request.ticket.ticket_number,
            park_id = %request.park_id,
            staff_id = %request.staff_id,
            location = request.location.as_deref().unwrap_or("-"),
            "Ticket redeemed"
        );
    } else {
        warn!(
            ticket_number = %request.ticket.ticket_number,
            park_id = %request.park_id,
            reason = outcome.message,
            "Entry refused"
        );
    }

    Ok(success(outcome, "Ticket validation completed"))
}

pub async fn search_tickets(
    payload: Result<Json<TicketSearchRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(TicketSearchRequest { tickets, filter }) = payload?;

    let page = filter.apply(&tickets);
    debug!(
        candidates = tickets.len(),
        total = page.total,
        page = page.page,
        "Searched tickets"
    );

    Ok(success(page, "Tickets retrieved"))
}
