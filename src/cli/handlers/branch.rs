//! `branch` command handlers
//!
//! Minimal branch plumbing: enough to register where items can be
//! checked in. Fuller branch management lives outside this tool.

use crate::cli::OutputFormatter;
use crate::cli::handlers::common::load_context;
use crate::error::Result;
use crate::storage::Branch;

pub fn handle_branch_add_command(
    id: String,
    name: String,
    active: bool,
    formatter: &OutputFormatter,
) -> Result<()> {
    let ctx = load_context()?;
    let branch = Branch { id, name, active };
    ctx.storage.save_branch(branch.clone())?;

    let state = if branch.active { "active" } else { "inactive" };
    formatter.success(&format!("Branch '{}' registered ({state})", branch.id));
    formatter.json_value(&branch);
    Ok(())
}

pub fn handle_branch_list_command(formatter: &OutputFormatter) -> Result<()> {
    let ctx = load_context()?;
    let branches = ctx.storage.load_branches()?;

    if formatter.is_json() {
        formatter.json_value(&branches);
        return Ok(());
    }

    if branches.is_empty() {
        formatter.info("No branches registered");
        return Ok(());
    }
    for branch in &branches {
        let state = if branch.active { "active" } else { "inactive" };
        formatter.info(&format!("{:<12} {}  [{state}]", branch.id, branch.name));
    }
    Ok(())
}
