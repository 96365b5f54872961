use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const DEFAULT_DURATION_HOURS: Decimal = Decimal::from_parts(3, 0, 0, false, 0);
pub const MIN_DURATION_HOURS: Decimal = Decimal::from_parts(5, 0, 0, false, 1);
pub const MAX_DURATION_HOURS: Decimal = Decimal::from_parts(8, 0, 0, false, 0);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    #[default]
    Pending,
    Confirmed,
    CheckedIn,
    Completed,
    Cancelled,
    NoShow,
}

impl BookingStatus {
    pub const ALL: [BookingStatus; 6] = [
        BookingStatus::Pending,
        BookingStatus::Confirmed,
        BookingStatus::CheckedIn,
        BookingStatus::Completed,
        BookingStatus::Cancelled,
        BookingStatus::NoShow,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::CheckedIn => "checked_in",
            BookingStatus::Completed => "completed",
            BookingStatus::Cancelled => "cancelled",
            BookingStatus::NoShow => "no_show",
        }
    }

    /// Customer-facing label shown in the booking lists.
    pub fn label(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "Ожидает подтверждения",
            BookingStatus::Confirmed => "Подтверждено",
            BookingStatus::CheckedIn => "Зарегистрирован",
            BookingStatus::Completed => "Завершено",
            BookingStatus::Cancelled => "Отменено",
            BookingStatus::NoShow => "Не явился",
        }
    }

    /// Color tag used by the dashboards to badge a status.
    pub fn color(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "yellow",
            BookingStatus::Confirmed => "blue",
            BookingStatus::CheckedIn | BookingStatus::Completed => "green",
            BookingStatus::Cancelled | BookingStatus::NoShow => "red",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            BookingStatus::Completed | BookingStatus::Cancelled | BookingStatus::NoShow
        )
    }

    /// Statuses reachable in one step from `self`.
    ///
    /// `cancelled` and `no_show` are side exits from the pre-visit states only;
    /// a checked-in party can only complete.
    pub fn next_statuses(&self) -> &'static [BookingStatus] {
        match self {
            BookingStatus::Pending => &[
                BookingStatus::Confirmed,
                BookingStatus::Cancelled,
                BookingStatus::NoShow,
            ],
            BookingStatus::Confirmed => &[
                BookingStatus::CheckedIn,
                BookingStatus::Cancelled,
                BookingStatus::NoShow,
            ],
            BookingStatus::CheckedIn => &[BookingStatus::Completed],
            BookingStatus::Completed | BookingStatus::Cancelled | BookingStatus::NoShow => &[],
        }
    }

    pub fn can_transition_to(&self, next: BookingStatus) -> bool {
        self.next_statuses().contains(&next)
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

fn default_duration_hours() -> Decimal {
    DEFAULT_DURATION_HOURS
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    pub id: Uuid,
    pub booking_number: String,
    pub user_id: Uuid,
    pub park_id: Uuid,
    #[serde(default)]
    pub status: BookingStatus,

    /// Calendar day of the visit; a bare `YYYY-MM-DD` reads as midnight UTC.
    #[serde(with = "crate::utils::time::date_or_instant")]
    pub visit_date: DateTime<Utc>,
    #[serde(default)]
    pub visit_time: Option<String>,
    #[serde(default = "default_duration_hours")]
    pub duration_hours: Decimal,

    #[serde(default)]
    pub adults_count: u32,
    #[serde(default)]
    pub children_count: u32,

    pub base_price: Decimal,
    #[serde(default)]
    pub discount_amount: Decimal,
    pub total_amount: Decimal,

    pub contact_name: String,
    pub contact_phone: String,
    #[serde(default)]
    pub contact_email: Option<String>,

    #[serde(default)]
    pub special_requirements: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub admin_notes: Option<String>,
    #[serde(default)]
    pub cancellation_reason: Option<String>,

    #[serde(default)]
    pub checked_in_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub cancelled_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_terminal_statuses_have_no_exits() {
        for status in BookingStatus::ALL {
            assert_eq!(status.is_terminal(), status.next_statuses().is_empty());
        }
    }

    #[test]
    fn test_no_show_only_from_pre_visit_states() {
        assert!(BookingStatus::Pending.can_transition_to(BookingStatus::NoShow));
        assert!(BookingStatus::Confirmed.can_transition_to(BookingStatus::NoShow));
        assert!(!BookingStatus::CheckedIn.can_transition_to(BookingStatus::NoShow));
        assert!(!BookingStatus::CheckedIn.can_transition_to(BookingStatus::Cancelled));
    }

    #[test]
    fn test_status_serializes_snake_case() {
        let json = serde_json::to_string(&BookingStatus::CheckedIn).unwrap();
        assert_eq!(json, "\"checked_in\"");

        let parsed: BookingStatus = serde_json::from_str("\"no_show\"").unwrap();
        assert_eq!(parsed, BookingStatus::NoShow);
    }

    fn booking_json(visit_date: &str) -> serde_json::Value {
        serde_json::json!({
            "id": Uuid::new_v4(),
            "booking_number": "SKP-2025-000310",
            "user_id": Uuid::new_v4(),
            "park_id": Uuid::new_v4(),
            "visit_date": visit_date,
            "base_price": "1200",
            "total_amount": "1200",
            "contact_name": "Эрмек",
            "contact_phone": "+996777000111",
            "created_at": "2025-07-20T08:00:00Z",
            "updated_at": "2025-07-20T08:00:00Z"
        })
    }

    #[test]
    fn test_visit_date_accepts_bare_calendar_date() {
        let booking: Booking = serde_json::from_value(booking_json("2025-08-02")).unwrap();
        assert_eq!(
            booking.visit_date,
            Utc.with_ymd_and_hms(2025, 8, 2, 0, 0, 0).unwrap()
        );
        assert_eq!(booking.status, BookingStatus::Pending);
        assert_eq!(booking.duration_hours, DEFAULT_DURATION_HOURS);

        let json = serde_json::to_value(&booking).unwrap();
        assert_eq!(json["visit_date"], "2025-08-02T00:00:00Z");
    }

    #[test]
    fn test_visit_date_accepts_rfc3339() {
        let booking: Booking =
            serde_json::from_value(booking_json("2025-08-02T10:30:00Z")).unwrap();
        assert_eq!(
            booking.visit_date,
            Utc.with_ymd_and_hms(2025, 8, 2, 10, 30, 0).unwrap()
        );

        assert!(serde_json::from_value::<Booking>(booking_json("02/08/2025")).is_err());
    }

    #[test]
    fn test_duration_bounds() {
        assert_eq!(MIN_DURATION_HOURS.to_string(), "0.5");
        assert_eq!(DEFAULT_DURATION_HOURS, Decimal::from(3));
        assert_eq!(MAX_DURATION_HOURS, Decimal::from(8));
    }
}
