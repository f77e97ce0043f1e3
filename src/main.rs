//! consigna - cloakroom ticket lifecycle and billing
//!
//! This is the main entry point for the consigna CLI application.
//! It handles command-line argument parsing and dispatches to the
//! appropriate command handlers.

use clap::Parser;
use std::process;

use consigna::cli::{
    BranchCommands, Cli, Commands, OutputFormatter, PricingCommands,
    handlers::{
        CheckInParams, CheckOutParams, ListParams, PricingSetParams, handle_branch_add_command,
        handle_branch_list_command, handle_check_in_command, handle_check_out_command,
        handle_init_command, handle_list_command, handle_pricing_set_command,
        handle_pricing_show_command, handle_show_command,
    },
};
use consigna::error::{ConsignaError, Result};

/// Main entry point for the consigna CLI
///
/// Parses command-line arguments and executes the requested command.
/// Handles errors gracefully and provides helpful messages to users.
fn main() {
    let cli = Cli::parse();

    // Configure output formatter based on flags
    let formatter = OutputFormatter::new(cli.json, cli.no_color);

    if let Err(e) = run(cli, &formatter) {
        handle_error(&e, &formatter);
        process::exit(1);
    }
}

/// Dispatch to the appropriate command handler
fn run(cli: Cli, formatter: &OutputFormatter) -> Result<()> {
    // Set up logging if verbose mode is enabled
    if cli.verbose {
        tracing_subscriber::fmt().with_env_filter("debug").init();
    }

    match cli.command {
        Commands::Init => handle_init_command(formatter),
        Commands::CheckIn {
            branch,
            item_type,
            quantity,
            notes,
            operator,
        } => handle_check_in_command(
            CheckInParams {
                branch,
                item_type,
                quantity,
                notes,
                operator,
            },
            formatter,
        ),
        Commands::CheckOut { token, operator } => {
            handle_check_out_command(CheckOutParams { token, operator }, formatter)
        },
        Commands::Show { token } => handle_show_command(&token, formatter),
        Commands::List { status, limit } => {
            handle_list_command(ListParams { status, limit }, formatter)
        },
        Commands::Pricing { command } => match command {
            PricingCommands::Show => handle_pricing_show_command(formatter),
            PricingCommands::Set {
                rates,
                min_hours,
                rounding,
            } => handle_pricing_set_command(
                PricingSetParams {
                    rates,
                    min_hours,
                    rounding,
                },
                formatter,
            ),
        },
        Commands::Branch { command } => match command {
            BranchCommands::Add { id, name, inactive } => {
                handle_branch_add_command(id, name, !inactive, formatter)
            },
            BranchCommands::List => handle_branch_list_command(formatter),
        },
    }
}

/// Print an error with its hint, if any
fn handle_error(error: &ConsignaError, formatter: &OutputFormatter) {
    formatter.error(&error.to_string());
    if let Some(hint) = error.user_hint() {
        formatter.info(&format!("hint: {hint}"));
    }
}
