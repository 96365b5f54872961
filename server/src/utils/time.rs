use std::sync::LazyLock;

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use regex::Regex;

/// 24-hour `HH:MM`, leading zero on the hour optional.
pub static VISIT_TIME_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-1]?[0-9]|2[0-3]):([0-5][0-9])$").expect("visit time pattern compiles")
});

pub fn parse_hhmm(raw: &str) -> Option<NaiveTime> {
    let captures = VISIT_TIME_PATTERN.captures(raw)?;
    let hour = captures.get(1)?.as_str().parse().ok()?;
    let minute = captures.get(2)?.as_str().parse().ok()?;
    NaiveTime::from_hms_opt(hour, minute, 0)
}

/// Whole days elapsed from `since` to `now`, rounded toward negative infinity.
pub fn floor_days(since: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let elapsed = now - since;
    let days = elapsed.num_days();
    // num_days truncates toward zero
    if elapsed < Duration::days(days) {
        days - 1
    } else {
        days
    }
}

/// Signed distance from `now` until `at`; negative once `at` has passed.
pub fn until(at: DateTime<Utc>, now: DateTime<Utc>) -> Duration {
    at - now
}

/// Accepts an RFC 3339 instant or a bare `YYYY-MM-DD` date, which is read as
/// midnight UTC.
pub fn parse_instant(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(at) = raw.parse::<DateTime<Utc>>() {
        return Some(at);
    }
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()?;
    Some(Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN)))
}

/// Serde adapter for calendar-date fields that may arrive with or without a
/// time of day. Always serializes as RFC 3339.
pub mod date_or_instant {
    use chrono::{DateTime, Utc};
    use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

    fn invalid<E: de::Error>(raw: &str) -> E {
        E::custom(format!("'{}' is not a date or RFC 3339 instant", raw))
    }

    pub fn serialize<S>(at: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        at.serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        super::parse_instant(&raw).ok_or_else(|| invalid(&raw))
    }

    /// Same as the parent module for optional filter bounds; pair with
    /// `#[serde(default)]`.
    pub mod option {
        use chrono::{DateTime, Utc};
        use serde::{Deserialize, Deserializer, Serialize, Serializer};

        pub fn serialize<S>(at: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            at.serialize(serializer)
        }

        pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
        where
            D: Deserializer<'de>,
        {
            match Option::<String>::deserialize(deserializer)? {
                None => Ok(None),
                Some(raw) => crate::utils::time::parse_instant(&raw)
                    .map(Some)
                    .ok_or_else(|| super::invalid(&raw)),
            }
        }
    }
}

pub mod hhmm {
    use chrono::NaiveTime;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(&time.format("%H:%M"))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        super::parse_hhmm(&raw)
            .ok_or_else(|| de::Error::custom(format!("'{}' is not a HH:MM time", raw)))
    }
}
