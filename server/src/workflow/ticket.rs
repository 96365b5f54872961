use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::models::{Ticket, TicketStatus};
use crate::rules::ticket::{check_ticket, TicketCheck};

/// Outcome of presenting a ticket at the gate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TicketValidationResponse {
    pub valid: bool,
    pub can_enter: bool,
    pub message: &'static str,
    pub check: Option<TicketCheck>,
    /// Snapshot after redemption, present only when entry was granted.
    pub ticket: Option<Ticket>,
}

const TOKEN_MISMATCH: &str = "QR код не соответствует билету";

/// Compares the scanned token with the stored one and, when the ticket can be
/// used, returns it stamped as used by `staff_id`.
pub fn redeem(
    ticket: &Ticket,
    presented_qr: &str,
    staff_id: Uuid,
    now: DateTime<Utc>,
) -> TicketValidationResponse {
    if presented_qr != ticket.qr_code {
        return TicketValidationResponse {
            valid: false,
            can_enter: false,
            message: TOKEN_MISMATCH,
            check: None,
            ticket: None,
        };
    }

    let check = check_ticket(ticket, now);
    let valid = matches!(check, TicketCheck::Usable | TicketCheck::AlreadyUsed);

    if check != TicketCheck::Usable {
        return TicketValidationResponse {
            valid,
            can_enter: false,
            message: check.message(),
            check: Some(check),
            ticket: None,
        };
    }

    let mut redeemed = ticket.clone();
    redeemed.status = TicketStatus::Used;
    redeemed.used_at = Some(now);
    redeemed.used_by = Some(staff_id);
    redeemed.updated_at = now;

    TicketValidationResponse {
        valid,
        can_enter: true,
        message: check.message(),
        check: Some(check),
        ticket: Some(redeemed),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::ticket::fixtures::ticket;
    use crate::rules::ticket::{can_use, is_valid};
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 7, 14, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_redeem_stamps_usage() {
        let t = ticket(TicketStatus::Active, now());
        let staff = Uuid::new_v4();

        let response = redeem(&t, &t.qr_code, staff, now());
        assert!(response.valid);
        assert!(response.can_enter);

        let redeemed = response.ticket.unwrap();
        assert_eq!(redeemed.status, TicketStatus::Used);
        assert_eq!(redeemed.used_at, Some(now()));
        assert_eq!(redeemed.used_by, Some(staff));
        assert!(!can_use(&redeemed, now()));
    }

    #[test]
    fn test_second_scan_is_reported_as_already_used() {
        let mut t = ticket(TicketStatus::Active, now());
        t.used_at = Some(now() - Duration::minutes(10));
        t.used_by = Some(Uuid::new_v4());

        let response = redeem(&t, &t.qr_code, Uuid::new_v4(), now());
        assert!(is_valid(&t, now()));
        assert!(response.valid);
        assert!(!response.can_enter);
        assert_eq!(response.check, Some(TicketCheck::AlreadyUsed));
        assert!(response.ticket.is_none());
    }

    #[test]
    fn test_rescanning_the_redeemed_snapshot() {
        let t = ticket(TicketStatus::Active, now());
        let first = redeem(&t, &t.qr_code, Uuid::new_v4(), now());
        let redeemed = first.ticket.unwrap();

        let later = now() + Duration::minutes(15);
        let second = redeem(&redeemed, &redeemed.qr_code, Uuid::new_v4(), later);
        assert!(second.valid);
        assert!(!second.can_enter);
        assert_eq!(second.check, Some(TicketCheck::AlreadyUsed));
        assert_eq!(second.message, "Билет уже использован");
        assert!(second.ticket.is_none());
    }

    #[test]
    fn test_wrong_token_is_rejected() {
        let t = ticket(TicketStatus::Active, now());
        let response = redeem(&t, "qr_forged", Uuid::new_v4(), now());

        assert!(!response.valid);
        assert!(!response.can_enter);
        assert_eq!(response.message, TOKEN_MISMATCH);
    }

    #[test]
    fn test_expired_ticket_is_refused() {
        let t = ticket(TicketStatus::Active, now());
        let response = redeem(&t, &t.qr_code, Uuid::new_v4(), now() + Duration::hours(3));

        assert!(!response.valid);
        assert_eq!(response.check, Some(TicketCheck::Expired));
    }
}
