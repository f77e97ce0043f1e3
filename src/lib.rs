//! consigna - a cloakroom ticket lifecycle and billing engine
//!
//! This crate implements the core of a walk-in item-storage service:
//! - Collision-resistant tracking tokens from a human-friendly alphabet
//! - The ACTIVE → CLOSED ticket state machine with an at-most-once close
//! - Time-based charging with configurable rate tables, minimum-duration
//!   billing, and rounding policy
//!
//! # Concurrent safety
//!
//! Check-out is guarded by a conditional write: the transition to CLOSED
//! only happens if the persisted status is still ACTIVE at write time, so
//! two racing check-outs can never both charge the customer. The losing
//! caller observes a distinct "already closed" error.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use consigna::lifecycle::{NewTicket, TicketService};
//! use consigna::storage::{MemoryStorage, SystemClock};
//!
//! let storage = Arc::new(MemoryStorage::new());
//! storage.add_branch("centro", true);
//! let service = TicketService::new(
//!     storage.clone(),
//!     storage.clone(),
//!     storage,
//!     Arc::new(SystemClock),
//! );
//!
//! let created = service.create_ticket(NewTicket {
//!     branch_id: "centro".into(),
//!     item_type: "MOCHILA".parse()?,
//!     quantity: 1,
//!     notes: None,
//!     created_by: None,
//! })?;
//!
//! // later, at pickup
//! let receipt = service.close_by_token(&created.token, None)?;
//! ```

#![allow(clippy::missing_errors_doc)]
#![allow(clippy::module_name_repetitions)]

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod lifecycle;
pub mod storage;

#[cfg(test)]
pub mod test_utils;

// Re-export commonly used types
pub use error::{ConsignaError, Result};
