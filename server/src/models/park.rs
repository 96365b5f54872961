use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::utils::time::parse_hhmm;

pub const DEFAULT_PARK_CAPACITY: u32 = 100;
pub const DEFAULT_SLOT_CAPACITY: u32 = 25;
pub const DEFAULT_TIME_SLOTS: &str = "09:00-12:00,12:00-15:00,15:00-18:00,18:00-21:00";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SlotParseError {
    #[error("time slot '{0}' must look like HH:MM-HH:MM")]
    Malformed(String),

    #[error("time slot '{0}' ends before it starts")]
    Inverted(String),
}

/// A bookable window within a park day, `[start, end)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlotConfig {
    #[serde(with = "crate::utils::time::hhmm")]
    pub start: NaiveTime,
    #[serde(with = "crate::utils::time::hhmm")]
    pub end: NaiveTime,
    pub capacity: u32,
}

impl TimeSlotConfig {
    pub fn parse(raw: &str, capacity: u32) -> Result<Self, SlotParseError> {
        let trimmed = raw.trim();
        let (start, end) = trimmed
            .split_once('-')
            .ok_or_else(|| SlotParseError::Malformed(trimmed.to_string()))?;

        let start = parse_hhmm(start.trim())
            .ok_or_else(|| SlotParseError::Malformed(trimmed.to_string()))?;
        let end =
            parse_hhmm(end.trim()).ok_or_else(|| SlotParseError::Malformed(trimmed.to_string()))?;

        if end <= start {
            return Err(SlotParseError::Inverted(trimmed.to_string()));
        }

        Ok(Self {
            start,
            end,
            capacity,
        })
    }

    /// `09:00-12:00`
    pub fn label(&self) -> String {
        format!("{}-{}", self.start.format("%H:%M"), self.end.format("%H:%M"))
    }

    pub fn contains(&self, time: NaiveTime) -> bool {
        time >= self.start && time < self.end
    }
}

/// Capacity configuration for one park, supplied by the caller or defaulted
/// from the server config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParkCapacity {
    pub total_capacity: u32,
    #[serde(default)]
    pub time_slots: Vec<TimeSlotConfig>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayAvailability {
    pub total_capacity: u32,
    pub current_bookings: u32,
    pub available_slots: i64,
    pub is_fully_booked: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotAvailability {
    pub time: String,
    pub capacity: u32,
    pub booked: u32,
    pub available: i64,
    pub is_available: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingAvailability {
    pub park_id: Uuid,
    pub date: NaiveDate,
    #[serde(flatten)]
    pub day: DayAvailability,
    pub time_slots: Vec<SlotAvailability>,
}
