use std::env;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use crate::models::park::{
    DEFAULT_PARK_CAPACITY, DEFAULT_SLOT_CAPACITY, DEFAULT_TIME_SLOTS,
};
use crate::models::{ParkCapacity, TimeSlotConfig};

pub mod cors;
pub mod security;

pub use cors::create_cors_layer;
pub use security::create_security_headers_layer;

pub const DEFAULT_PORT: u16 = 3001;
pub const DEFAULT_ALLOWED_ORIGINS: &str = "http://localhost:3000,http://localhost:5173";

#[derive(Debug, Clone)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    /// `RUST_ENV=production`; turns on HSTS.
    pub production: bool,
    pub cors_allowed_origins: Vec<String>,
    /// Used for parks whose availability request carries no capacity.
    pub park_capacity: ParkCapacity,
}

impl Default for Config {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key/value source. Unparseable values are
    /// logged and replaced by their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let host = parse_or("HOST", lookup("HOST"), IpAddr::V4(Ipv4Addr::UNSPECIFIED));
        let port = parse_or("PORT", lookup("PORT"), DEFAULT_PORT);

        let production = lookup("RUST_ENV")
            .map(|v| v.to_lowercase() == "production")
            .unwrap_or(false);

        let cors_allowed_origins = lookup("CORS_ALLOWED_ORIGINS")
            .unwrap_or_else(|| DEFAULT_ALLOWED_ORIGINS.to_string())
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(str::to_string)
            .collect();

        let total_capacity = parse_or(
            "PARK_DEFAULT_CAPACITY",
            lookup("PARK_DEFAULT_CAPACITY"),
            DEFAULT_PARK_CAPACITY,
        );
        let slot_capacity = parse_or(
            "PARK_SLOT_CAPACITY",
            lookup("PARK_SLOT_CAPACITY"),
            DEFAULT_SLOT_CAPACITY,
        );
        let time_slots = parse_time_slots(
            lookup("PARK_TIME_SLOTS").as_deref(),
            slot_capacity,
        );

        Self {
            host,
            port,
            production,
            cors_allowed_origins,
            park_capacity: ParkCapacity {
                total_capacity,
                time_slots,
            },
        }
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn parse_or<T: std::str::FromStr>(key: &str, raw: Option<String>, default: T) -> T {
    match raw {
        None => default,
        Some(value) => match value.trim().parse() {
            Ok(parsed) => parsed,
            Err(_) => {
                tracing::warn!("Config: invalid {} '{}', using default", key, value);
                default
            }
        },
    }
}

fn parse_time_slots(raw: Option<&str>, capacity: u32) -> Vec<TimeSlotConfig> {
    let parse_all = |list: &str| -> Vec<TimeSlotConfig> {
        list.split(',')
            .filter(|slot| !slot.trim().is_empty())
            .filter_map(|slot| match TimeSlotConfig::parse(slot, capacity) {
                Ok(parsed) => Some(parsed),
                Err(e) => {
                    tracing::warn!("Config: skipping time slot: {}", e);
                    None
                }
            })
            .collect()
    };

    let slots = raw.map(parse_all).unwrap_or_default();
    if slots.is_empty() {
        parse_all(DEFAULT_TIME_SLOTS)
    } else {
        slots
    }
}
