//! Test utilities for consigna
//!
//! Common fixtures wiring the lifecycle manager to in-memory storage
//! and a controllable clock, to reduce duplication in test code.

#![cfg(test)]

use std::sync::{Arc, RwLock};

use chrono::{DateTime, Duration, Utc};

use crate::core::{ItemType, PricingConfig, TicketStatus};
use crate::lifecycle::{NewTicket, TicketService};
use crate::storage::{Clock, MemoryStorage, PricingStore};

/// A clock that only moves when a test tells it to
pub struct FixedClock {
    now: RwLock<DateTime<Utc>>,
}

impl FixedClock {
    pub fn at(start: DateTime<Utc>) -> Self {
        Self {
            now: RwLock::new(start),
        }
    }

    /// Move the clock forward
    pub fn advance_minutes(&self, minutes: i64) {
        let mut now = self.now.write().expect("clock lock poisoned");
        *now = *now + Duration::minutes(minutes);
    }
}

impl Default for FixedClock {
    fn default() -> Self {
        Self::at(Utc::now())
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.read().expect("clock lock poisoned")
    }
}

/// Lifecycle manager wired to in-memory collaborators.
///
/// The branch "centro" is registered active so check-ins pass the
/// branch check out of the box.
pub struct TestHarness {
    pub storage: Arc<MemoryStorage>,
    pub clock: Arc<FixedClock>,
    pub service: TicketService,
}

impl TestHarness {
    pub fn new() -> Self {
        let storage = Arc::new(MemoryStorage::new());
        storage.add_branch("centro", true);
        let clock = Arc::new(FixedClock::default());
        let service = TicketService::new(
            storage.clone(),
            storage.clone(),
            storage.clone(),
            clock.clone(),
        );
        Self {
            storage,
            clock,
            service,
        }
    }

    /// Current pricing as the service sees it
    pub fn pricing(&self) -> PricingConfig {
        self.storage.read().expect("pricing read failed")
    }

    /// Replace the active pricing
    pub fn set_pricing(&self, pricing: &PricingConfig) {
        self.storage.write(pricing).expect("pricing write failed");
    }

    /// Check in a single MOCHILA at branch "centro"
    pub fn check_in_one(&self) -> crate::lifecycle::CreatedTicket {
        self.service
            .create_ticket(NewTicket {
                branch_id: "centro".to_string(),
                item_type: ItemType::Mochila,
                quantity: 1,
                notes: None,
                created_by: None,
            })
            .expect("check-in failed")
    }

    /// Count stored tickets in a status
    pub fn count_in_status(&self, status: TicketStatus) -> usize {
        self.service
            .list_by_status(status, usize::MAX)
            .expect("listing failed")
            .len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_clock_advances_on_demand() {
        let clock = FixedClock::default();
        let start = clock.now();
        clock.advance_minutes(42);
        assert_eq!(clock.now() - start, Duration::minutes(42));
    }

    #[test]
    fn harness_checks_in_against_an_active_branch() {
        let h = TestHarness::new();
        h.check_in_one();
        assert_eq!(h.count_in_status(TicketStatus::Active), 1);
        assert_eq!(h.count_in_status(TicketStatus::Closed), 0);
    }
}
