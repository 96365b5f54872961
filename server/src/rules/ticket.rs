use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::{QrPayload, Ticket, TicketStatus};
use crate::utils::time::floor_days;

/// `valid_from` and `valid_to` are both inclusive.
pub fn is_valid(ticket: &Ticket, now: DateTime<Utc>) -> bool {
    ticket.status == TicketStatus::Active && ticket.valid_from <= now && now <= ticket.valid_to
}

pub fn can_use(ticket: &Ticket, now: DateTime<Utc>) -> bool {
    is_valid(ticket, now) && ticket.used_at.is_none()
}

/// Reporting only; negative when `created_at` lies after `now`.
pub fn age_in_days(ticket: &Ticket, now: DateTime<Utc>) -> i64 {
    floor_days(ticket.created_at, now)
}

pub fn display_ticket_number(ticket_number: &str) -> String {
    ticket_number.to_uppercase()
}

pub fn qr_payload(ticket: &Ticket) -> QrPayload {
    QrPayload {
        id: ticket.id,
        number: ticket.ticket_number.clone(),
        qr: ticket.qr_code.clone(),
        booking: ticket.booking_id,
        ticket_type: ticket.ticket_type,
        valid_from: ticket.valid_from,
        valid_to: ticket.valid_to,
    }
}

/// What a scanner should tell the operator about a ticket right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "verdict", rename_all = "snake_case")]
pub enum TicketCheck {
    Usable,
    /// Inside its window but already redeemed, either stamped `used` or
    /// carrying `used_at`.
    AlreadyUsed,
    NotYetValid,
    Expired,
    Inactive { status: TicketStatus },
}

impl TicketCheck {
    pub fn message(&self) -> &'static str {
        match self {
            TicketCheck::Usable => "Билет действителен",
            TicketCheck::AlreadyUsed => "Билет уже использован",
            TicketCheck::NotYetValid => "Срок действия билета еще не начался",
            TicketCheck::Expired => "Срок действия билета истек",
            TicketCheck::Inactive { .. } => "Билет недействителен",
        }
    }
}

/// Redeemed tickets pass through the window checks like active ones; inside
/// the window they read as `AlreadyUsed`.
pub fn check_ticket(ticket: &Ticket, now: DateTime<Utc>) -> TicketCheck {
    match ticket.status {
        TicketStatus::Active | TicketStatus::Used => {}
        status @ (TicketStatus::Expired | TicketStatus::Cancelled) => {
            return TicketCheck::Inactive { status };
        }
    }
    if now < ticket.valid_from {
        return TicketCheck::NotYetValid;
    }
    if now > ticket.valid_to {
        return TicketCheck::Expired;
    }
    if ticket.status == TicketStatus::Used || ticket.used_at.is_some() {
        return TicketCheck::AlreadyUsed;
    }
    TicketCheck::Usable
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TicketValidity {
    pub display_number: String,
    pub status_label: &'static str,
    pub status_color: &'static str,
    pub type_label: &'static str,
    pub is_valid: bool,
    pub can_use: bool,
    pub age_in_days: i64,
    pub check: TicketCheck,
    pub message: &'static str,
}

pub fn validity(ticket: &Ticket, now: DateTime<Utc>) -> TicketValidity {
    let check = check_ticket(ticket, now);
    TicketValidity {
        display_number: display_ticket_number(&ticket.ticket_number),
        status_label: ticket.status.label(),
        status_color: ticket.status.color(),
        type_label: ticket.ticket_type.label(),
        is_valid: is_valid(ticket, now),
        can_use: can_use(ticket, now),
        age_in_days: age_in_days(ticket, now),
        check,
        message: check.message(),
    }
}
