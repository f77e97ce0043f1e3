//! In-memory storage
//!
//! Backs tests and demos with real compare-and-swap semantics: the
//! conditional close takes the write lock, re-checks the persisted
//! status, and applies the close fields in one critical section.

use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

use crate::core::{PricingConfig, Ticket, TicketId, TicketStatus};
use crate::error::{ConsignaError, Result};

use super::repository::{
    BranchDirectory, CloseFields, PricingStore, TicketRepository, order_for_listing,
};

#[derive(Default)]
struct Tickets {
    by_id: HashMap<TicketId, Ticket>,
    tokens: HashSet<String>,
}

/// Thread-safe in-memory implementation of the storage contracts
#[derive(Default)]
pub struct MemoryStorage {
    tickets: RwLock<Tickets>,
    pricing: RwLock<Option<PricingConfig>>,
    branches: RwLock<HashMap<String, bool>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a branch, marking it active or not
    pub fn add_branch(&self, branch_id: impl Into<String>, active: bool) {
        self.branches
            .write()
            .expect("branch lock poisoned")
            .insert(branch_id.into(), active);
    }

    /// Number of stored tickets
    #[must_use]
    pub fn len(&self) -> usize {
        self.tickets.read().expect("ticket lock poisoned").by_id.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl TicketRepository for MemoryStorage {
    fn insert(&self, ticket: &Ticket) -> Result<()> {
        let mut tickets = self.tickets.write().expect("ticket lock poisoned");
        if tickets.tokens.contains(&ticket.token) {
            return Err(ConsignaError::DuplicateToken {
                token: ticket.token.clone(),
            });
        }
        tickets.tokens.insert(ticket.token.clone());
        tickets.by_id.insert(ticket.id.clone(), ticket.clone());
        Ok(())
    }

    fn get_by_id(&self, id: &TicketId) -> Result<Option<Ticket>> {
        let tickets = self.tickets.read().expect("ticket lock poisoned");
        Ok(tickets.by_id.get(id).cloned())
    }

    fn get_by_token(&self, token: &str) -> Result<Option<Ticket>> {
        let tickets = self.tickets.read().expect("ticket lock poisoned");
        Ok(tickets.by_id.values().find(|t| t.token == token).cloned())
    }

    fn close_if_active(&self, id: &TicketId, fields: &CloseFields) -> Result<Ticket> {
        let mut tickets = self.tickets.write().expect("ticket lock poisoned");
        let ticket = tickets
            .by_id
            .get_mut(id)
            .ok_or_else(|| ConsignaError::TicketIdNotFound { id: id.to_string() })?;

        // The status check and the write share the lock: at most one
        // concurrent close can observe ACTIVE here.
        if ticket.status != TicketStatus::Active {
            return Err(ConsignaError::AlreadyClosed { id: id.to_string() });
        }

        ticket.status = TicketStatus::Closed;
        ticket.paid = true;
        ticket.closed_at = Some(fields.closed_at);
        ticket.price_at_close = Some(fields.price_at_close);
        ticket.hours_billed = Some(fields.hours_billed);
        ticket.closed_by = fields.closed_by.clone();
        Ok(ticket.clone())
    }

    fn list_by_status(&self, status: TicketStatus, limit: usize) -> Result<Vec<Ticket>> {
        let tickets = self.tickets.read().expect("ticket lock poisoned");
        let matching: Vec<Ticket> = tickets
            .by_id
            .values()
            .filter(|t| t.status == status)
            .cloned()
            .collect();
        Ok(order_for_listing(matching, status, limit))
    }
}

impl PricingStore for MemoryStorage {
    fn read(&self) -> Result<PricingConfig> {
        let pricing = self.pricing.read().expect("pricing lock poisoned");
        Ok(pricing.clone().unwrap_or_default())
    }

    fn write(&self, pricing: &PricingConfig) -> Result<()> {
        *self.pricing.write().expect("pricing lock poisoned") = Some(pricing.clone());
        Ok(())
    }
}

impl BranchDirectory for MemoryStorage {
    fn is_active(&self, branch_id: &str) -> Result<bool> {
        let branches = self.branches.read().expect("branch lock poisoned");
        Ok(branches.get(branch_id).copied().unwrap_or(false))
    }
}
