//! Command-line interface
//!
//! Argument definitions plus one handler module per command. The CLI is
//! a thin frontend over [`crate::lifecycle::TicketService`]; all
//! correctness-sensitive logic stays in the core.

pub mod handlers;
mod output;

pub use output::OutputFormatter;

use clap::{Parser, Subcommand};

use crate::core::TicketStatus;
use crate::error::{ConsignaError, Result};

/// Cloakroom ticket lifecycle and billing
#[derive(Parser)]
#[command(name = "consigna", version, about, propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize storage in the current directory
    Init,

    /// Check an item in and issue a tracking token
    #[command(name = "check-in")]
    CheckIn {
        /// Branch receiving the item
        #[arg(short, long)]
        branch: Option<String>,
        /// Item category (BOLSA, MOCHILA, MALETA)
        #[arg(short, long)]
        item_type: String,
        /// Number of items under one ticket
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
        /// Operational note (e.g. "red suitcase, fragile")
        #[arg(short, long)]
        notes: Option<String>,
        /// Operator reference recorded on the ticket
        #[arg(short, long)]
        operator: Option<String>,
    },

    /// Deliver an item: compute the charge and close the ticket
    #[command(name = "check-out")]
    CheckOut {
        /// The customer's tracking token
        token: String,
        /// Operator reference recorded on the close
        #[arg(short, long)]
        operator: Option<String>,
    },

    /// Show a ticket and its current charge by token
    Show {
        /// The tracking token (case and whitespace are tolerated)
        token: String,
    },

    /// List tickets by status, newest first
    List {
        /// ACTIVE or CLOSED (synonyms like DELIVERED are accepted)
        #[arg(short, long, default_value = "ACTIVE")]
        status: String,
        /// Maximum number of tickets shown
        #[arg(short, long, default_value_t = 50)]
        limit: usize,
    },

    /// Inspect or update the rate table
    Pricing {
        #[command(subcommand)]
        command: PricingCommands,
    },

    /// Manage the branches items can be checked in at
    Branch {
        #[command(subcommand)]
        command: BranchCommands,
    },
}

#[derive(Subcommand)]
pub enum PricingCommands {
    /// Show the active pricing configuration
    Show,
    /// Update the pricing configuration
    Set {
        /// Hourly rate as TYPE=RATE (repeatable), e.g. MOCHILA=8
        #[arg(long = "rate", value_name = "TYPE=RATE")]
        rates: Vec<String>,
        /// Minimum hours billed regardless of elapsed time
        #[arg(long)]
        min_hours: Option<f64>,
        /// Rounding policy: CEIL, FLOOR, or ROUND
        #[arg(long)]
        rounding: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum BranchCommands {
    /// Register a branch (or replace its record)
    Add {
        /// Branch identifier used at check-in
        id: String,
        /// Human-readable name
        name: String,
        /// Register the branch as not accepting check-ins
        #[arg(long)]
        inactive: bool,
    },
    /// List registered branches
    List,
}

/// Normalize a user-entered status to the canonical two-value
/// enumeration. Synonyms from the old public views are accepted here
/// at the boundary; the core only ever sees ACTIVE or CLOSED.
pub fn parse_status(raw: &str) -> Result<TicketStatus> {
    match raw.trim().to_uppercase().as_str() {
        "ACTIVE" | "OPEN" | "ABIERTO" | "ACTIVO" => Ok(TicketStatus::Active),
        "CLOSED" | "DELIVERED" | "DONE" | "ENTREGADO" => Ok(TicketStatus::Closed),
        other => Err(ConsignaError::Other(anyhow::anyhow!(
            "unknown status '{other}' (expected ACTIVE or CLOSED)"
        ))),
    }
}
