//! `init` command handler

use crate::cli::OutputFormatter;
use crate::config::AppConfig;
use crate::error::Result;
use crate::storage::FileStorage;

/// Create the storage layout in the configured directory
pub fn handle_init_command(formatter: &OutputFormatter) -> Result<()> {
    let config = AppConfig::load()?;
    let storage = FileStorage::new(&config.storage_dir);

    if storage.is_initialized() {
        formatter.info(&format!(
            "Storage already initialized at {}",
            config.storage_dir
        ));
        return Ok(());
    }

    storage.init()?;
    formatter.success(&format!("Initialized storage at {}", config.storage_dir));
    formatter.info("Register a branch with 'consigna branch add <id> <name>' to start checking items in");
    Ok(())
}
