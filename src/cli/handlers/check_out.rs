//! `check-out` command handler
//!
//! The delivery path: look the ticket up by token, charge for the
//! elapsed time, and close it. The close is conditional on the ticket
//! still being ACTIVE, so a double check-out reports "already closed"
//! instead of charging twice.

use crate::cli::OutputFormatter;
use crate::cli::handlers::common::load_context;
use crate::error::Result;

/// Parameters for delivering an item
pub struct CheckOutParams {
    pub token: String,
    pub operator: Option<String>,
}

pub fn handle_check_out_command(params: CheckOutParams, formatter: &OutputFormatter) -> Result<()> {
    let ctx = load_context()?;
    let operator = params.operator.or_else(|| ctx.config.operator.clone());

    let receipt = ctx.service.close_by_token(&params.token, operator)?;

    formatter.success(&format!(
        "Ticket closed. {} h billed, total {:.2}",
        receipt.hours_billed, receipt.price_at_close
    ));
    formatter.info(&format!(
        "Held for {} minutes; the charge is now frozen",
        receipt.minutes_elapsed
    ));
    formatter.json_value(&receipt);
    Ok(())
}
