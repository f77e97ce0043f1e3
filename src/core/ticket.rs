//! Ticket data model
//!
//! A ticket represents one customer drop-off: the items held, the token
//! the customer carries, and the billing window. Tickets move through a
//! two-state machine: ACTIVE from check-in until the single transition
//! to CLOSED at check-out, which freezes the computed charge.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::ConsignaError;

/// Unique identifier for a ticket
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TicketId(Uuid);

impl TicketId {
    /// Generate a new random ticket ID
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TicketId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TicketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Category of item held under a ticket.
///
/// Closed enumeration; the rate table in [`crate::core::PricingConfig`]
/// is keyed by these categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ItemType {
    /// Hand bag or shopping bag
    Bolsa,
    /// Backpack
    Mochila,
    /// Suitcase
    Maleta,
}

impl ItemType {
    /// All known item types, for iteration and CLI help
    pub const ALL: [Self; 3] = [Self::Bolsa, Self::Mochila, Self::Maleta];
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Bolsa => "BOLSA",
            Self::Mochila => "MOCHILA",
            Self::Maleta => "MALETA",
        };
        write!(f, "{s}")
    }
}

impl FromStr for ItemType {
    type Err = ConsignaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "BOLSA" => Ok(Self::Bolsa),
            "MOCHILA" => Ok(Self::Mochila),
            "MALETA" => Ok(Self::Maleta),
            other => Err(ConsignaError::UnknownItemType {
                value: other.to_string(),
            }),
        }
    }
}

/// Ticket lifecycle state.
///
/// ACTIVE is initial; CLOSED is terminal. The only transition is
/// ACTIVE → CLOSED and it happens at most once per ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TicketStatus {
    Active,
    Closed,
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Active => "ACTIVE",
            Self::Closed => "CLOSED",
        };
        write!(f, "{s}")
    }
}

/// A single storage ticket.
///
/// Invariant: `closed_at`, `price_at_close` and `hours_billed` are all
/// `None` while the status is [`TicketStatus::Active`], and all `Some`
/// once it is [`TicketStatus::Closed`]. The billable window is
/// `[created_at, closed_at or now)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ticket {
    /// Repository-assigned identifier, immutable
    pub id: TicketId,
    /// Customer-facing tracking code, unique, immutable
    pub token: String,
    /// Branch where the item is held (external entity reference)
    pub branch_id: String,
    /// Storage category, immutable after creation
    pub item_type: ItemType,
    /// Number of items under this ticket, at least 1
    pub quantity: u32,
    /// Optional operational annotation
    pub notes: Option<String>,
    /// Current lifecycle state
    pub status: TicketStatus,
    /// Whether the charge has been collected (set true at close)
    pub paid: bool,
    /// Start of the billable interval, server-assigned
    pub created_at: DateTime<Utc>,
    /// End of the billable interval, set exactly once on close
    pub closed_at: Option<DateTime<Utc>>,
    /// Total charge frozen at close time, never recomputed
    pub price_at_close: Option<f64>,
    /// Billed hours frozen at close time
    pub hours_billed: Option<f64>,
    /// Operator who checked the item in
    pub created_by: Option<String>,
    /// Operator who delivered the item
    pub closed_by: Option<String>,
}

impl Ticket {
    /// Whether the ticket is still holding an item
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == TicketStatus::Active
    }

    /// Elapsed whole minutes from check-in to `end`, clamped at zero.
    ///
    /// Clock skew or a bad `end` must never yield a negative duration,
    /// so the lower bound is clamped here where the two timestamps meet.
    #[must_use]
    pub fn minutes_elapsed(&self, end: DateTime<Utc>) -> i64 {
        let ms = end
            .signed_duration_since(self.created_at)
            .num_milliseconds();
        (((ms as f64) / 60_000.0).round() as i64).max(0)
    }
}
