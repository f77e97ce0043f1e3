//! Ticket lifecycle manager
//!
//! Owns ticket creation, the ACTIVE → CLOSED transition, and the charge
//! freeze at check-out. Everything stateful is reached through the
//! collaborator traits in [`crate::storage`], so the manager itself
//! carries no ambient state and tests can wire in fixed clocks and
//! in-memory stores.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, warn};

use crate::core::{
    Charge, ItemType, TOKEN_LENGTH, Ticket, TicketBuilder, TicketId, TicketStatus, compute_charge,
    generate_token, parse_token,
};
use crate::error::{ConsignaError, Result};
use crate::storage::{BranchDirectory, Clock, CloseFields, PricingStore, TicketRepository};

/// Retries before a token-uniqueness collision is treated as fatal.
/// With 32^8 combinations, hitting this bound means the alphabet or
/// length is misconfigured, not bad luck.
const MAX_TOKEN_RETRIES: u32 = 5;

/// Input for a check-in
#[derive(Debug, Clone)]
pub struct NewTicket {
    pub branch_id: String,
    pub item_type: ItemType,
    pub quantity: u32,
    pub notes: Option<String>,
    pub created_by: Option<String>,
}

/// What the customer walks away with at check-in
#[derive(Debug, Clone, Serialize)]
pub struct CreatedTicket {
    pub id: TicketId,
    pub token: String,
}

/// The frozen outcome of a successful check-out
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Receipt {
    pub hours_billed: f64,
    pub price_at_close: f64,
    pub minutes_elapsed: i64,
}

/// Charge shown for a ticket at read time.
///
/// For an ACTIVE ticket this is a live recomputation against the
/// current pricing and clock; for a CLOSED ticket it is the frozen
/// charge verbatim, never recomputed.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Estimate {
    pub minutes_elapsed: i64,
    pub hours_billed: f64,
    pub total: f64,
    /// True while the ticket is ACTIVE and the amount can still move
    pub live: bool,
}

/// The ticket lifecycle manager
pub struct TicketService {
    repo: Arc<dyn TicketRepository>,
    pricing: Arc<dyn PricingStore>,
    branches: Arc<dyn BranchDirectory>,
    clock: Arc<dyn Clock>,
    token_length: usize,
}

impl TicketService {
    pub fn new(
        repo: Arc<dyn TicketRepository>,
        pricing: Arc<dyn PricingStore>,
        branches: Arc<dyn BranchDirectory>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repo,
            pricing,
            branches,
            clock,
            token_length: TOKEN_LENGTH,
        }
    }

    /// Override the issued token length (tokens shorter than the lookup
    /// minimum are still rejected on lookup)
    #[must_use]
    pub const fn with_token_length(mut self, token_length: usize) -> Self {
        self.token_length = token_length;
        self
    }

    /// Check an item in: validate, issue a token, persist an ACTIVE
    /// ticket stamped with the server clock.
    ///
    /// A token collision reported by the repository is retried with a
    /// fresh draw up to [`MAX_TOKEN_RETRIES`] times, then surfaces as
    /// the fatal `TokenExhausted`.
    pub fn create_ticket(&self, new: NewTicket) -> Result<CreatedTicket> {
        if new.quantity < 1 {
            return Err(ConsignaError::InvalidQuantity {
                quantity: new.quantity,
            });
        }
        if !self.branches.is_active(&new.branch_id)? {
            return Err(ConsignaError::InactiveBranch {
                branch_id: new.branch_id,
            });
        }

        for attempt in 1..=MAX_TOKEN_RETRIES {
            let token = generate_token(self.token_length);
            let mut builder = TicketBuilder::new()
                .id(TicketId::new())
                .token(&token)
                .branch_id(&new.branch_id)
                .item_type(new.item_type)
                .quantity(new.quantity)
                .created_at(self.clock.now());
            if let Some(notes) = &new.notes {
                builder = builder.notes(notes);
            }
            if let Some(operator) = &new.created_by {
                builder = builder.created_by(operator);
            }
            let ticket = builder.build();

            match self.repo.insert(&ticket) {
                Ok(()) => {
                    debug!(token = %token, branch = %ticket.branch_id, "checked in");
                    return Ok(CreatedTicket {
                        id: ticket.id,
                        token,
                    });
                },
                Err(ConsignaError::DuplicateToken { token }) => {
                    warn!(%token, attempt, "token collision, drawing again");
                },
                Err(e) => return Err(e),
            }
        }

        Err(ConsignaError::TokenExhausted {
            attempts: MAX_TOKEN_RETRIES,
        })
    }

    /// Look a ticket up by its token as entered, scanned, or parsed out
    /// of a shared URL. The token is trimmed and uppercased first.
    pub fn find_by_token(&self, raw_token: &str) -> Result<Ticket> {
        let token = parse_token(raw_token)?;
        self.repo
            .get_by_token(&token)?
            .ok_or(ConsignaError::TicketNotFound { token })
    }

    /// Check an item out: compute the charge against the pricing in
    /// effect right now and freeze it, transitioning the ticket to
    /// CLOSED.
    ///
    /// At most one close succeeds per ticket. The write is conditioned
    /// on the persisted status still being ACTIVE; a concurrent close
    /// that won the race surfaces here as `AlreadyClosed`, and the
    /// frozen price is never overwritten.
    pub fn close_ticket(&self, id: &TicketId, operator: Option<String>) -> Result<Receipt> {
        let ticket = self
            .repo
            .get_by_id(id)?
            .ok_or_else(|| ConsignaError::TicketIdNotFound { id: id.to_string() })?;

        let now = self.clock.now();
        let minutes = ticket.minutes_elapsed(now);
        let pricing = self.pricing.read()?;
        let charge = compute_charge(ticket.item_type, ticket.quantity, minutes, &pricing);
        if charge.rate_missing {
            warn!(
                item_type = %ticket.item_type,
                token = %ticket.token,
                "no rate configured for item type, closing at zero"
            );
        }

        let fields = CloseFields {
            closed_at: now,
            price_at_close: charge.total,
            hours_billed: charge.hours_billed,
            closed_by: operator,
        };
        let closed = self.repo.close_if_active(id, &fields)?;
        debug!(token = %closed.token, total = charge.total, "checked out");

        Ok(Receipt {
            hours_billed: charge.hours_billed,
            price_at_close: charge.total,
            minutes_elapsed: minutes,
        })
    }

    /// Convenience: look up by token, then close. The public check-out
    /// flow works from the customer's token, not the internal id.
    pub fn close_by_token(&self, raw_token: &str, operator: Option<String>) -> Result<Receipt> {
        let ticket = self.find_by_token(raw_token)?;
        self.close_ticket(&ticket.id, operator)
    }

    /// Tickets in `status`, newest first, at most `limit`
    pub fn list_by_status(&self, status: TicketStatus, limit: usize) -> Result<Vec<Ticket>> {
        self.repo.list_by_status(status, limit)
    }

    /// Charge to display for a ticket right now.
    ///
    /// ACTIVE tickets get a live recomputation (rates may have changed
    /// since check-in, and the window keeps growing); CLOSED tickets
    /// return the frozen values verbatim even if pricing has since
    /// changed.
    pub fn estimate(&self, ticket: &Ticket) -> Result<Estimate> {
        match ticket.status {
            TicketStatus::Active => {
                let minutes = ticket.minutes_elapsed(self.clock.now());
                let pricing = self.pricing.read()?;
                let charge: Charge =
                    compute_charge(ticket.item_type, ticket.quantity, minutes, &pricing);
                if charge.rate_missing {
                    warn!(item_type = %ticket.item_type, "no rate configured for item type");
                }
                Ok(Estimate {
                    minutes_elapsed: minutes,
                    hours_billed: charge.hours_billed,
                    total: charge.total,
                    live: true,
                })
            },
            TicketStatus::Closed => {
                let closed_at = ticket.closed_at.unwrap_or(ticket.created_at);
                Ok(Estimate {
                    minutes_elapsed: ticket.minutes_elapsed(closed_at),
                    hours_billed: ticket.hours_billed.unwrap_or(0.0),
                    total: ticket.price_at_close.unwrap_or(0.0),
                    live: false,
                })
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{PricingConfig, Rounding};
    use crate::storage::MemoryStorage;
    use crate::test_utils::{FixedClock, TestHarness};
    use std::collections::HashMap;
    use std::sync::Barrier;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn new_ticket(quantity: u32) -> NewTicket {
        NewTicket {
            branch_id: "centro".to_string(),
            item_type: ItemType::Mochila,
            quantity,
            notes: None,
            created_by: Some("op-1".to_string()),
        }
    }

    #[test]
    fn check_in_issues_a_well_formed_token() {
        let h = TestHarness::new();
        let created = h.service.create_ticket(new_ticket(1)).unwrap();

        assert_eq!(created.token.len(), TOKEN_LENGTH);
        let stored = h.service.find_by_token(&created.token).unwrap();
        assert_eq!(stored.status, TicketStatus::Active);
        assert_eq!(stored.created_by.as_deref(), Some("op-1"));
        assert!(stored.closed_at.is_none());
    }

    #[test]
    fn zero_quantity_is_rejected_and_nothing_persists() {
        let h = TestHarness::new();
        let err = h.service.create_ticket(new_ticket(0)).unwrap_err();
        assert!(matches!(err, ConsignaError::InvalidQuantity { quantity: 0 }));
        assert!(h.storage.is_empty());
    }

    #[test]
    fn inactive_branch_is_rejected() {
        let h = TestHarness::new();
        let mut new = new_ticket(1);
        new.branch_id = "ghost-branch".to_string();
        let err = h.service.create_ticket(new).unwrap_err();
        assert!(matches!(err, ConsignaError::InactiveBranch { .. }));
        assert!(h.storage.is_empty());
    }

    #[test]
    fn lookup_normalizes_the_token() {
        let h = TestHarness::new();
        let created = h.service.create_ticket(new_ticket(1)).unwrap();

        let messy = format!("  {} ", created.token.to_lowercase());
        let found = h.service.find_by_token(&messy).unwrap();
        assert_eq!(found.token, created.token);
    }

    #[test]
    fn lookup_of_unknown_token_is_not_found() {
        let h = TestHarness::new();
        let err = h.service.find_by_token("ZZZZ9999").unwrap_err();
        assert!(matches!(err, ConsignaError::TicketNotFound { .. }));
    }

    #[test]
    fn malformed_token_is_a_validation_error() {
        let h = TestHarness::new();
        let err = h.service.find_by_token(" ab ").unwrap_err();
        assert!(matches!(err, ConsignaError::MalformedToken { .. }));
    }

    #[test]
    fn checkout_freezes_the_charge() {
        let h = TestHarness::new();
        let created = h.service.create_ticket(new_ticket(1)).unwrap();

        h.clock.advance_minutes(95);
        let receipt = h
            .service
            .close_ticket(&created.id, Some("op-2".to_string()))
            .unwrap();

        // 95 min, CEIL, MOCHILA at 8/h -> 2h, 16
        assert_eq!(receipt.hours_billed, 2.0);
        assert_eq!(receipt.price_at_close, 16.0);
        assert_eq!(receipt.minutes_elapsed, 95);

        let stored = h.service.find_by_token(&created.token).unwrap();
        assert_eq!(stored.status, TicketStatus::Closed);
        assert!(stored.paid);
        assert_eq!(stored.closed_by.as_deref(), Some("op-2"));
        assert_eq!(stored.price_at_close, Some(16.0));
    }

    #[test]
    fn second_close_conflicts_and_price_stays_frozen() {
        let h = TestHarness::new();
        let created = h.service.create_ticket(new_ticket(1)).unwrap();

        h.clock.advance_minutes(10);
        let receipt = h.service.close_ticket(&created.id, None).unwrap();

        // Rates change and time passes; a re-close must still conflict
        // and the frozen charge must not move.
        h.clock.advance_minutes(600);
        for _ in 0..3 {
            let err = h.service.close_ticket(&created.id, None).unwrap_err();
            assert!(matches!(err, ConsignaError::AlreadyClosed { .. }));
        }

        let stored = h.service.find_by_token(&created.token).unwrap();
        assert_eq!(stored.price_at_close, Some(receipt.price_at_close));
        assert_eq!(stored.hours_billed, Some(receipt.hours_billed));
    }

    #[test]
    fn concurrent_closes_let_exactly_one_win() {
        let h = TestHarness::new();
        let created = h.service.create_ticket(new_ticket(1)).unwrap();
        h.clock.advance_minutes(30);

        let service = Arc::new(h.service);
        let barrier = Arc::new(Barrier::new(2));
        let handles: Vec<_> = (0..2)
            .map(|i| {
                let service = Arc::clone(&service);
                let barrier = Arc::clone(&barrier);
                let id = created.id.clone();
                std::thread::spawn(move || {
                    barrier.wait();
                    service.close_ticket(&id, Some(format!("op-{i}")))
                })
            })
            .collect();

        let results: Vec<_> = handles.into_iter().map(|j| j.join().unwrap()).collect();
        let successes = results.iter().filter(|r| r.is_ok()).count();
        let conflicts = results
            .iter()
            .filter(|r| matches!(r, Err(ConsignaError::AlreadyClosed { .. })))
            .count();
        assert_eq!(successes, 1);
        assert_eq!(conflicts, 1);

        // Final persisted price equals the winner's receipt
        let winner = results.iter().find_map(|r| r.as_ref().ok()).unwrap();
        let stored = service.find_by_token(&created.token).unwrap();
        assert_eq!(stored.price_at_close, Some(winner.price_at_close));
    }

    #[test]
    fn listing_is_ordered_and_bounded() {
        let h = TestHarness::new();
        let mut tokens = Vec::new();
        for _ in 0..3 {
            tokens.push(h.service.create_ticket(new_ticket(1)).unwrap());
            h.clock.advance_minutes(1);
        }
        h.service.close_ticket(&tokens[0].id, None).unwrap();

        let active = h.service.list_by_status(TicketStatus::Active, 10).unwrap();
        assert_eq!(active.len(), 2);
        // newest first
        assert_eq!(active[0].token, tokens[2].token);

        let active_capped = h.service.list_by_status(TicketStatus::Active, 1).unwrap();
        assert_eq!(active_capped.len(), 1);

        let closed = h.service.list_by_status(TicketStatus::Closed, 10).unwrap();
        assert_eq!(closed.len(), 1);
        assert_eq!(closed[0].token, tokens[0].token);
    }

    #[test]
    fn live_estimate_tracks_the_clock_and_pricing() {
        let h = TestHarness::new();
        let created = h.service.create_ticket(new_ticket(2)).unwrap();
        h.clock.advance_minutes(61);

        let ticket = h.service.find_by_token(&created.token).unwrap();
        let estimate = h.service.estimate(&ticket).unwrap();
        assert!(estimate.live);
        assert_eq!(estimate.hours_billed, 2.0);
        assert_eq!(estimate.total, 8.0 * 2.0 * 2.0);

        // Rates can move the live estimate before check-out
        let mut pricing = h.pricing();
        pricing.hourly.insert(ItemType::Mochila, 10.0);
        h.set_pricing(&pricing);
        let estimate = h.service.estimate(&ticket).unwrap();
        assert_eq!(estimate.total, 10.0 * 2.0 * 2.0);
    }

    #[test]
    fn closed_estimate_is_the_frozen_charge_verbatim() {
        let h = TestHarness::new();
        let created = h.service.create_ticket(new_ticket(1)).unwrap();
        h.clock.advance_minutes(95);
        h.service.close_ticket(&created.id, None).unwrap();

        // Pricing changes after close must not leak into the estimate
        let pricing = PricingConfig {
            hourly: HashMap::from([(ItemType::Mochila, 99.0)]),
            min_hours: 5.0,
            rounding: Rounding::Ceil,
            updated_at: None,
        };
        h.set_pricing(&pricing);
        h.clock.advance_minutes(1000);

        let ticket = h.service.find_by_token(&created.token).unwrap();
        let estimate = h.service.estimate(&ticket).unwrap();
        assert!(!estimate.live);
        assert_eq!(estimate.hours_billed, 2.0);
        assert_eq!(estimate.total, 16.0);
        assert_eq!(estimate.minutes_elapsed, 95);
    }

    #[test]
    fn missing_rate_closes_at_zero_instead_of_blocking() {
        let h = TestHarness::new();
        let pricing = PricingConfig {
            hourly: HashMap::new(),
            min_hours: 1.0,
            rounding: Rounding::Ceil,
            updated_at: None,
        };
        h.set_pricing(&pricing);

        let created = h.service.create_ticket(new_ticket(1)).unwrap();
        h.clock.advance_minutes(120);
        let receipt = h.service.close_ticket(&created.id, None).unwrap();
        assert_eq!(receipt.price_at_close, 0.0);
        assert_eq!(receipt.hours_billed, 2.0);
    }

    /// Repository wrapper that reports a token collision for the first
    /// `failures` inserts, standing in for a unique-key race.
    struct CollidingRepo {
        inner: MemoryStorage,
        failures: AtomicU32,
    }

    impl TicketRepository for CollidingRepo {
        fn insert(&self, ticket: &Ticket) -> Result<()> {
            if self.failures.fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| {
                n.checked_sub(1)
            }).is_ok()
            {
                return Err(ConsignaError::DuplicateToken {
                    token: ticket.token.clone(),
                });
            }
            self.inner.insert(ticket)
        }

        fn get_by_id(&self, id: &TicketId) -> Result<Option<Ticket>> {
            self.inner.get_by_id(id)
        }

        fn get_by_token(&self, token: &str) -> Result<Option<Ticket>> {
            self.inner.get_by_token(token)
        }

        fn close_if_active(&self, id: &TicketId, fields: &CloseFields) -> Result<Ticket> {
            self.inner.close_if_active(id, fields)
        }

        fn list_by_status(&self, status: TicketStatus, limit: usize) -> Result<Vec<Ticket>> {
            self.inner.list_by_status(status, limit)
        }
    }

    fn harness_with_repo(failures: u32) -> TicketService {
        let repo = Arc::new(CollidingRepo {
            inner: {
                let s = MemoryStorage::new();
                s.add_branch("centro", true);
                s
            },
            failures: AtomicU32::new(failures),
        });
        let aux = Arc::new({
            let s = MemoryStorage::new();
            s.add_branch("centro", true);
            s
        });
        TicketService::new(
            repo,
            aux.clone(),
            aux,
            Arc::new(FixedClock::default()),
        )
    }

    #[test]
    fn token_collisions_are_retried_transparently() {
        let service = harness_with_repo(2);
        let created = service.create_ticket(new_ticket(1)).unwrap();
        assert_eq!(created.token.len(), TOKEN_LENGTH);
    }

    #[test]
    fn collisions_past_the_bound_are_fatal() {
        let service = harness_with_repo(MAX_TOKEN_RETRIES);
        let err = service.create_ticket(new_ticket(1)).unwrap_err();
        assert!(matches!(
            err,
            ConsignaError::TokenExhausted {
                attempts: MAX_TOKEN_RETRIES
            }
        ));
    }
}
