//! `show` command handler
//!
//! The public tag view: a ticket and its charge, live for ACTIVE
//! tickets and frozen for CLOSED ones. Read-only.

use crate::cli::OutputFormatter;
use crate::cli::handlers::common::{load_context, print_ticket};
use crate::error::Result;

pub fn handle_show_command(token: &str, formatter: &OutputFormatter) -> Result<()> {
    let ctx = load_context()?;

    let ticket = ctx.service.find_by_token(token)?;
    let estimate = ctx.service.estimate(&ticket)?;
    print_ticket(formatter, &ticket, &estimate);
    Ok(())
}
