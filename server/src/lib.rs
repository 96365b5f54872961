//! Booking and ticket rules for Sky Park, served over a small JSON API.
//!
//! [`rules`] holds the pure decisions (cancellation window, check-in window,
//! ticket validity, availability). [`workflow`] builds the next record
//! snapshot for check-in, cancellation and gate redemption. Everything under
//! [`handlers`] and [`routes`] is the HTTP shell around them.

pub mod config;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod rules;
pub mod state;
pub mod utils;
pub mod validation;
pub mod workflow;
