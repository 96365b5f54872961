use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{Booking, BookingStatus, Ticket, TicketStatus, TicketType};

pub const DEFAULT_PAGE_SIZE: u32 = 20;
pub const MAX_PAGE_SIZE: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingSortBy {
    #[default]
    CreatedAt,
    VisitDate,
    TotalAmount,
    ContactName,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

fn default_page() -> u32 {
    1
}

fn default_limit() -> u32 {
    DEFAULT_PAGE_SIZE
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingSearch {
    #[serde(default)]
    pub user_id: Option<Uuid>,
    #[serde(default)]
    pub park_id: Option<Uuid>,
    #[serde(default)]
    pub status: Option<BookingStatus>,
    #[serde(default, with = "crate::utils::time::date_or_instant::option")]
    pub visit_date_from: Option<DateTime<Utc>>,
    #[serde(default, with = "crate::utils::time::date_or_instant::option")]
    pub visit_date_to: Option<DateTime<Utc>>,
    #[serde(default, with = "crate::utils::time::date_or_instant::option")]
    pub created_from: Option<DateTime<Utc>>,
    #[serde(default, with = "crate::utils::time::date_or_instant::option")]
    pub created_to: Option<DateTime<Utc>>,
    /// Matched against contact name, phone and booking number.
    #[serde(default)]
    pub search_query: Option<String>,
    #[serde(default)]
    pub sort_by: BookingSortBy,
    #[serde(default)]
    pub sort_order: SortOrder,
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
}

impl Default for BookingSearch {
    fn default() -> Self {
        Self {
            user_id: None,
            park_id: None,
            status: None,
            visit_date_from: None,
            visit_date_to: None,
            created_from: None,
            created_to: None,
            search_query: None,
            sort_by: BookingSortBy::default(),
            sort_order: SortOrder::default(),
            page: default_page(),
            limit: default_limit(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookingPage {
    pub bookings: Vec<Booking>,
    pub total: usize,
    pub page: u32,
    pub limit: u32,
    pub has_more: bool,
}

impl BookingSearch {
    pub fn matches(&self, booking: &Booking) -> bool {
        if self.user_id.is_some_and(|id| id != booking.user_id) {
            return false;
        }
        if self.park_id.is_some_and(|id| id != booking.park_id) {
            return false;
        }
        if self.status.is_some_and(|status| status != booking.status) {
            return false;
        }
        if !within(booking.visit_date, self.visit_date_from, self.visit_date_to) {
            return false;
        }
        if !within(booking.created_at, self.created_from, self.created_to) {
            return false;
        }

        match self.search_query.as_deref().map(str::trim) {
            Some(query) if !query.is_empty() => {
                let needle = query.to_lowercase();
                booking.contact_name.to_lowercase().contains(&needle)
                    || booking.contact_phone.contains(query)
                    || booking.booking_number.to_lowercase().contains(&needle)
            }
            _ => true,
        }
    }

    fn compare(&self, a: &Booking, b: &Booking) -> Ordering {
        let ordering = match self.sort_by {
            BookingSortBy::CreatedAt => a.created_at.cmp(&b.created_at),
            BookingSortBy::VisitDate => a.visit_date.cmp(&b.visit_date),
            BookingSortBy::TotalAmount => a.total_amount.cmp(&b.total_amount),
            BookingSortBy::ContactName => a
                .contact_name
                .to_lowercase()
                .cmp(&b.contact_name.to_lowercase()),
        };

        match self.sort_order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    }

    /// Page and limit are clamped to `1..` and `1..=MAX_PAGE_SIZE`.
    pub fn apply(&self, bookings: &[Booking]) -> BookingPage {
        let matched: Vec<&Booking> = bookings.iter().filter(|b| self.matches(b)).collect();
        let window = paginate(matched, self.page, self.limit, |a, b| self.compare(a, b));

        BookingPage {
            bookings: window.items,
            total: window.total,
            page: window.page,
            limit: window.limit,
            has_more: window.has_more,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketSortBy {
    #[default]
    CreatedAt,
    ValidFrom,
    ValidTo,
    Price,
    HolderName,
}

/// Ticket lookup for the admin and cashier screens.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TicketSearch {
    #[serde(default)]
    pub user_id: Option<Uuid>,
    #[serde(default)]
    pub booking_id: Option<Uuid>,
    #[serde(default)]
    pub status: Option<TicketStatus>,
    #[serde(default, rename = "type")]
    pub ticket_type: Option<TicketType>,
    /// Keeps tickets still valid at or after this instant.
    #[serde(default, with = "crate::utils::time::date_or_instant::option")]
    pub valid_from: Option<DateTime<Utc>>,
    /// Keeps tickets already valid at or before this instant.
    #[serde(default, with = "crate::utils::time::date_or_instant::option")]
    pub valid_to: Option<DateTime<Utc>>,
    #[serde(default)]
    pub holder_name: Option<String>,
    #[serde(default)]
    pub ticket_number: Option<String>,
    #[serde(default)]
    pub sort_by: TicketSortBy,
    #[serde(default)]
    pub sort_order: SortOrder,
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
}

impl Default for TicketSearch {
    fn default() -> Self {
        Self {
            user_id: None,
            booking_id: None,
            status: None,
            ticket_type: None,
            valid_from: None,
            valid_to: None,
            holder_name: None,
            ticket_number: None,
            sort_by: TicketSortBy::default(),
            sort_order: SortOrder::default(),
            page: default_page(),
            limit: default_limit(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TicketPage {
    pub tickets: Vec<Ticket>,
    pub total: usize,
    pub page: u32,
    pub limit: u32,
    pub has_more: bool,
}

impl TicketSearch {
    /// The validity bounds select tickets whose window overlaps
    /// `[valid_from, valid_to]`.
    pub fn matches(&self, ticket: &Ticket) -> bool {
        if self.user_id.is_some_and(|id| id != ticket.user_id) {
            return false;
        }
        if self.booking_id.is_some_and(|id| id != ticket.booking_id) {
            return false;
        }
        if self.status.is_some_and(|status| status != ticket.status) {
            return false;
        }
        if self.ticket_type.is_some_and(|kind| kind != ticket.ticket_type) {
            return false;
        }
        if self.valid_from.is_some_and(|from| ticket.valid_to < from) {
            return false;
        }
        if self.valid_to.is_some_and(|to| ticket.valid_from > to) {
            return false;
        }

        contains_folded(&ticket.holder_name, self.holder_name.as_deref())
            && contains_folded(&ticket.ticket_number, self.ticket_number.as_deref())
    }

    fn compare(&self, a: &Ticket, b: &Ticket) -> Ordering {
        let ordering = match self.sort_by {
            TicketSortBy::CreatedAt => a.created_at.cmp(&b.created_at),
            TicketSortBy::ValidFrom => a.valid_from.cmp(&b.valid_from),
            TicketSortBy::ValidTo => a.valid_to.cmp(&b.valid_to),
            TicketSortBy::Price => a.price.cmp(&b.price),
            TicketSortBy::HolderName => a
                .holder_name
                .to_lowercase()
                .cmp(&b.holder_name.to_lowercase()),
        };

        match self.sort_order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    }

    pub fn apply(&self, tickets: &[Ticket]) -> TicketPage {
        let matched: Vec<&Ticket> = tickets.iter().filter(|t| self.matches(t)).collect();
        let window = paginate(matched, self.page, self.limit, |a, b| self.compare(a, b));

        TicketPage {
            tickets: window.items,
            total: window.total,
            page: window.page,
            limit: window.limit,
            has_more: window.has_more,
        }
    }
}

struct Window<T> {
    items: Vec<T>,
    total: usize,
    page: u32,
    limit: u32,
    has_more: bool,
}

fn paginate<T, F>(mut matched: Vec<&T>, page: u32, limit: u32, compare: F) -> Window<T>
where
    T: Clone,
    F: Fn(&T, &T) -> Ordering,
{
    let page = page.max(1);
    let limit = limit.clamp(1, MAX_PAGE_SIZE);
    matched.sort_by(|a, b| compare(*a, *b));

    let total = matched.len();
    let offset = (page as usize - 1).saturating_mul(limit as usize);
    let items: Vec<T> = matched
        .into_iter()
        .skip(offset)
        .take(limit as usize)
        .cloned()
        .collect();

    Window {
        has_more: offset.saturating_add(items.len()) < total,
        items,
        total,
        page,
        limit,
    }
}

/// Blank needles match everything.
fn contains_folded(haystack: &str, needle: Option<&str>) -> bool {
    match needle.map(str::trim) {
        Some(needle) if !needle.is_empty() => {
            haystack.to_lowercase().contains(&needle.to_lowercase())
        }
        _ => true,
    }
}

fn within(
    value: DateTime<Utc>,
    from: Option<DateTime<Utc>>,
    to: Option<DateTime<Utc>>,
) -> bool {
    from.map_or(true, |from| value >= from) && to.map_or(true, |to| value <= to)
}
