//! Command handlers, one module per command

mod branch;
mod check_in;
mod check_out;
mod common;
mod init;
mod list;
mod pricing;
mod show;

pub use branch::{handle_branch_add_command, handle_branch_list_command};
pub use check_in::{CheckInParams, handle_check_in_command};
pub use check_out::{CheckOutParams, handle_check_out_command};
pub use init::handle_init_command;
pub use list::{ListParams, handle_list_command};
pub use pricing::{PricingSetParams, handle_pricing_set_command, handle_pricing_show_command};
pub use show::handle_show_command;
