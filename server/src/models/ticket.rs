use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TicketStatus {
    #[default]
    Active,
    Used,
    Expired,
    Cancelled,
}

impl TicketStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TicketStatus::Active => "active",
            TicketStatus::Used => "used",
            TicketStatus::Expired => "expired",
            TicketStatus::Cancelled => "cancelled",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TicketStatus::Active => "Активный",
            TicketStatus::Used => "Использован",
            TicketStatus::Expired => "Истек",
            TicketStatus::Cancelled => "Отменен",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            TicketStatus::Active => "green",
            TicketStatus::Used => "blue",
            TicketStatus::Expired => "gray",
            TicketStatus::Cancelled => "red",
        }
    }
}

impl std::fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TicketType {
    Adult,
    Child,
    Group,
    Vip,
}

impl TicketType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TicketType::Adult => "adult",
            TicketType::Child => "child",
            TicketType::Group => "group",
            TicketType::Vip => "vip",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TicketType::Adult => "Взрослый",
            TicketType::Child => "Детский",
            TicketType::Group => "Групповой",
            TicketType::Vip => "VIP",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ticket {
    pub id: Uuid,
    pub ticket_number: String,
    pub booking_id: Uuid,
    pub user_id: Uuid,
    #[serde(rename = "type")]
    pub ticket_type: TicketType,
    #[serde(default)]
    pub status: TicketStatus,

    pub holder_name: String,
    #[serde(default)]
    pub holder_age: Option<u8>,
    pub price: Decimal,

    pub valid_from: DateTime<Utc>,
    pub valid_to: DateTime<Utc>,

    /// Opaque token compared by the scanner. Never printed as-is; see
    /// [`QrPayload`] for what goes into the code.
    pub qr_code: String,

    #[serde(default)]
    pub used_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub used_by: Option<Uuid>,

    #[serde(default)]
    pub special_requirements: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Projection of a ticket that is encoded into the printed QR code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QrPayload {
    pub id: Uuid,
    pub number: String,
    pub qr: String,
    pub booking: Uuid,
    #[serde(rename = "type")]
    pub ticket_type: TicketType,
    pub valid_from: DateTime<Utc>,
    pub valid_to: DateTime<Utc>,
}
