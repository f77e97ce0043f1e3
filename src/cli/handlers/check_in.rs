//! `check-in` command handler
//!
//! Receives an item, issues a token, and persists an ACTIVE ticket.

use crate::cli::OutputFormatter;
use crate::cli::handlers::common::load_context;
use crate::error::{ConsignaError, Result};
use crate::lifecycle::NewTicket;

/// Parameters for checking an item in
pub struct CheckInParams {
    pub branch: Option<String>,
    pub item_type: String,
    pub quantity: u32,
    pub notes: Option<String>,
    pub operator: Option<String>,
}

pub fn handle_check_in_command(params: CheckInParams, formatter: &OutputFormatter) -> Result<()> {
    let ctx = load_context()?;

    let branch_id = params
        .branch
        .or_else(|| ctx.config.default_branch.clone())
        .ok_or_else(|| {
            ConsignaError::Other(anyhow::anyhow!(
                "no branch given; pass --branch or set default_branch in consigna.toml"
            ))
        })?;
    let operator = params.operator.or_else(|| ctx.config.operator.clone());

    let created = ctx.service.create_ticket(NewTicket {
        branch_id,
        item_type: params.item_type.parse()?,
        quantity: params.quantity,
        notes: params.notes,
        created_by: operator,
    })?;

    formatter.success(&format!("Item checked in. Token: {}", created.token));
    formatter.info("Give this token to the customer; it is required for pickup");
    formatter.json_value(&created);
    Ok(())
}
