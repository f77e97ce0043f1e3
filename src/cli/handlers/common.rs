//! Shared plumbing for command handlers

use std::sync::Arc;

use serde_json::json;

use crate::cli::OutputFormatter;
use crate::config::AppConfig;
use crate::core::Ticket;
use crate::error::{ConsignaError, Result};
use crate::lifecycle::{Estimate, TicketService};
use crate::storage::{FileStorage, SystemClock};

/// Everything a handler needs: settings, the storage handle (for the
/// admin paths that bypass the lifecycle manager), and the service.
pub struct AppContext {
    pub config: AppConfig,
    pub storage: Arc<FileStorage>,
    pub service: TicketService,
}

/// Load configuration and wire the lifecycle manager to file storage.
///
/// Fails with `NotInitialized` when the storage directory is missing,
/// so every command except `init` gives the same hint.
pub fn load_context() -> Result<AppContext> {
    let config = AppConfig::load()?;
    let storage = Arc::new(FileStorage::new(&config.storage_dir));
    if !storage.is_initialized() {
        return Err(ConsignaError::NotInitialized);
    }
    let service = TicketService::new(
        storage.clone(),
        storage.clone(),
        storage.clone(),
        Arc::new(SystemClock),
    )
    .with_token_length(config.token_length);
    Ok(AppContext {
        config,
        storage,
        service,
    })
}

/// Render one ticket with its current charge
pub fn print_ticket(formatter: &OutputFormatter, ticket: &Ticket, estimate: &Estimate) {
    if formatter.is_json() {
        formatter.json_value(&json!({
            "ticket": ticket,
            "charge": estimate,
        }));
        return;
    }

    formatter.field("Token", &ticket.token);
    formatter.field("Status", &ticket.status.to_string());
    formatter.field("Branch", &ticket.branch_id);
    formatter.field(
        "Items",
        &format!("{} x {}", ticket.quantity, ticket.item_type),
    );
    if let Some(notes) = &ticket.notes {
        formatter.field("Notes", notes);
    }
    formatter.field(
        "Checked in",
        &ticket.created_at.format("%Y-%m-%d %H:%M").to_string(),
    );
    if let Some(closed_at) = ticket.closed_at {
        formatter.field("Delivered", &closed_at.format("%Y-%m-%d %H:%M").to_string());
    }

    let kind = if estimate.live {
        "Current charge"
    } else {
        "Final charge"
    };
    formatter.field(
        kind,
        &format!(
            "{:.2} ({} h billed, {} min elapsed)",
            estimate.total, estimate.hours_billed, estimate.minutes_elapsed
        ),
    );
}
