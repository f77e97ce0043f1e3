//! `list` command handler

use crate::cli::handlers::common::load_context;
use crate::cli::{OutputFormatter, parse_status};
use crate::core::TicketStatus;
use crate::error::Result;

/// Parameters for listing tickets
pub struct ListParams {
    pub status: String,
    pub limit: usize,
}

pub fn handle_list_command(params: ListParams, formatter: &OutputFormatter) -> Result<()> {
    let ctx = load_context()?;
    let status = parse_status(&params.status)?;

    let tickets = ctx.service.list_by_status(status, params.limit)?;

    if formatter.is_json() {
        formatter.json_value(&tickets);
        return Ok(());
    }

    if tickets.is_empty() {
        formatter.info(&format!("No {status} tickets"));
        return Ok(());
    }

    for ticket in &tickets {
        let when = match status {
            TicketStatus::Active => ticket.created_at,
            TicketStatus::Closed => ticket.closed_at.unwrap_or(ticket.created_at),
        };
        let charge = match ticket.price_at_close {
            Some(total) => format!("{total:>8.2}"),
            None => format!("{:>8}", "-"),
        };
        formatter.info(&format!(
            "{}  {}  {} x {:<8} {}  {}",
            ticket.token,
            when.format("%Y-%m-%d %H:%M"),
            ticket.quantity,
            ticket.item_type.to_string(),
            charge,
            ticket.branch_id,
        ));
    }
    formatter.info(&format!("{} ticket(s)", tickets.len()));
    Ok(())
}
