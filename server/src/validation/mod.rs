//! Field contracts for booking and ticket records arriving from forms and
//! storage. The rule functions assume a record has passed through here.

use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::booking::{MAX_DURATION_HOURS, MIN_DURATION_HOURS};
use crate::models::{Booking, Ticket};
use crate::utils::time::VISIT_TIME_PATTERN;

pub const MAX_NAME_LEN: usize = 200;
pub const MAX_REASON_LEN: usize = 500;
pub const MAX_HOLDER_AGE: u8 = 120;

/// Kyrgyz mobile numbers: `+996` followed by nine digits.
pub static PHONE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+996[0-9]{9}$").expect("phone pattern compiles"));

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles")
});

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{} field(s) failed validation", .0.len())]
pub struct ValidationErrors(pub Vec<FieldError>);

#[derive(Debug, Default)]
struct Collector(Vec<FieldError>);

impl Collector {
    fn check(&mut self, ok: bool, field: &'static str, message: &'static str) {
        if !ok {
            self.0.push(FieldError { field, message });
        }
    }

    fn finish(self) -> Result<(), ValidationErrors> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(ValidationErrors(self.0))
        }
    }
}

pub fn is_valid_phone(phone: &str) -> bool {
    PHONE_PATTERN.is_match(phone)
}

pub fn is_valid_visit_time(time: &str) -> bool {
    VISIT_TIME_PATTERN.is_match(time)
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}

fn name_length_ok(name: &str) -> bool {
    let len = name.chars().count();
    (1..=MAX_NAME_LEN).contains(&len)
}

pub fn validate_booking(booking: &Booking) -> Result<(), ValidationErrors> {
    let mut errors = Collector::default();

    errors.check(
        name_length_ok(&booking.contact_name),
        "contact_name",
        "Имя контактного лица обязательно",
    );
    errors.check(
        is_valid_phone(&booking.contact_phone),
        "contact_phone",
        "Неверный формат номера телефона",
    );
    errors.check(
        booking.contact_email.as_deref().map_or(true, is_valid_email),
        "contact_email",
        "Неверный формат email",
    );
    errors.check(
        booking.visit_time.as_deref().map_or(true, is_valid_visit_time),
        "visit_time",
        "Неверный формат времени",
    );
    errors.check(
        (MIN_DURATION_HOURS..=MAX_DURATION_HOURS).contains(&booking.duration_hours),
        "duration_hours",
        "Длительность должна быть от 0.5 до 8 часов",
    );

    for (field, amount) in [
        ("base_price", booking.base_price),
        ("discount_amount", booking.discount_amount),
        ("total_amount", booking.total_amount),
    ] {
        errors.check(amount >= Decimal::ZERO, field, "Сумма не может быть отрицательной");
    }

    for (field, stamp) in [
        ("checked_in_at", booking.checked_in_at),
        ("completed_at", booking.completed_at),
        ("cancelled_at", booking.cancelled_at),
    ] {
        errors.check(
            stamp.map_or(true, |at| at >= booking.created_at),
            field,
            "Отметка времени раньше создания бронирования",
        );
    }

    if let Some(reason) = booking.cancellation_reason.as_deref() {
        errors.check(
            cancellation_reason_ok(reason),
            "cancellation_reason",
            "Причина отмены обязательна",
        );
    }

    errors.finish()
}

pub fn cancellation_reason_ok(reason: &str) -> bool {
    let len = reason.trim().chars().count();
    (1..=MAX_REASON_LEN).contains(&len)
}

pub fn validate_ticket(ticket: &Ticket) -> Result<(), ValidationErrors> {
    let mut errors = Collector::default();

    errors.check(
        name_length_ok(&ticket.holder_name),
        "holder_name",
        "Имя держателя билета обязательно",
    );
    errors.check(
        ticket.holder_age.map_or(true, |age| age <= MAX_HOLDER_AGE),
        "holder_age",
        "Возраст должен быть от 0 до 120",
    );
    errors.check(
        ticket.price >= Decimal::ZERO,
        "price",
        "Сумма не может быть отрицательной",
    );
    errors.check(
        ticket.valid_from <= ticket.valid_to,
        "valid_to",
        "Окончание действия раньше начала",
    );
    errors.check(!ticket.qr_code.is_empty(), "qr_code", "QR код обязателен");
    errors.check(
        ticket.used_at.is_some() == ticket.used_by.is_some(),
        "used_by",
        "Отметка использования неполная",
    );

    errors.finish()
}
