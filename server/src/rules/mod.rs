//! Pure decision functions over booking and ticket snapshots.
//!
//! Nothing here performs I/O, logs, or mutates its inputs. Callers hand in a
//! record they already trust (see [`crate::validation`]) together with the
//! instant to evaluate against.

pub mod availability;
pub mod booking;
pub mod search;
pub mod ticket;
