use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::{PricingConfig, Ticket, TicketId, TicketStatus};
use crate::error::Result;

/// Fields written when a ticket transitions to CLOSED.
///
/// Grouped so the repository can apply them atomically with the
/// status check in [`TicketRepository::close_if_active`].
#[derive(Debug, Clone)]
pub struct CloseFields {
    pub closed_at: DateTime<Utc>,
    pub price_at_close: f64,
    pub hours_billed: f64,
    pub closed_by: Option<String>,
}

/// Repository trait for ticket storage operations
///
/// This trait defines the interface for storing and retrieving tickets,
/// allowing for different storage implementations. The token is a unique
/// key; `insert` reports a violation as `DuplicateToken` so the caller
/// can retry with a fresh draw.
pub trait TicketRepository: Send + Sync {
    /// Persists a new ticket.
    ///
    /// Fails with `DuplicateToken` when another ticket already holds
    /// the same token.
    fn insert(&self, ticket: &Ticket) -> Result<()>;

    /// Loads a ticket by ID, `None` if absent
    fn get_by_id(&self, id: &TicketId) -> Result<Option<Ticket>>;

    /// Loads a ticket by its (already normalized) token, `None` if absent
    fn get_by_token(&self, token: &str) -> Result<Option<Ticket>>;

    /// Conditionally transitions a ticket to CLOSED.
    ///
    /// The write only happens if the persisted status is still ACTIVE
    /// at the moment of the update; a concurrent close that got there
    /// first surfaces as `AlreadyClosed`, never as an overwrite of the
    /// frozen price. Returns the ticket as persisted after the close.
    fn close_if_active(&self, id: &TicketId, fields: &CloseFields) -> Result<Ticket>;

    /// Lists tickets in the given status, newest first by the timestamp
    /// relevant to that status (`created_at` for ACTIVE, `closed_at`
    /// for CLOSED), bounded by `limit`.
    fn list_by_status(&self, status: TicketStatus, limit: usize) -> Result<Vec<Ticket>>;
}

/// Store for the singleton pricing configuration
pub trait PricingStore: Send + Sync {
    /// Reads the active pricing; documented defaults if never configured
    fn read(&self) -> Result<PricingConfig>;

    /// Replaces the active pricing (administrative path)
    fn write(&self, pricing: &PricingConfig) -> Result<()>;
}

/// A branch where items are physically held.
///
/// Only the fields the billing core reads; everything else about
/// branches lives outside this crate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Branch {
    pub id: String,
    pub name: String,
    pub active: bool,
}

/// Read-only view of the branch directory
pub trait BranchDirectory: Send + Sync {
    /// Whether the branch exists and accepts check-ins
    fn is_active(&self, branch_id: &str) -> Result<bool>;
}

/// Wall-clock source, injectable for tests
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// The real clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Sorts `tickets` newest-first by the timestamp relevant to `status`
/// and truncates to `limit`. Shared by storage implementations.
pub(crate) fn order_for_listing(
    mut tickets: Vec<Ticket>,
    status: TicketStatus,
    limit: usize,
) -> Vec<Ticket> {
    match status {
        TicketStatus::Active => tickets.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        TicketStatus::Closed => tickets.sort_by(|a, b| b.closed_at.cmp(&a.closed_at)),
    }
    tickets.truncate(limit);
    tickets
}
