//! Core domain types for the cloakroom engine
//!
//! Everything here is pure: tickets, tokens, and the charge calculator.
//! Persistence and the lifecycle state machine live in `storage` and
//! `lifecycle` respectively.

mod builders;
mod pricing;
mod ticket;
mod token;

pub use builders::TicketBuilder;
pub use pricing::{Charge, PricingConfig, Rounding, compute_charge};
pub use ticket::{ItemType, Ticket, TicketId, TicketStatus};
pub use token::{
    TOKEN_ALPHABET, TOKEN_LENGTH, TOKEN_MIN_LOOKUP_LEN, generate_token, normalize_token,
    parse_token,
};
