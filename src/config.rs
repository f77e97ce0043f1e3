//! Application configuration
//!
//! Layered the usual way: built-in defaults, then an optional
//! `consigna.toml` in the working directory, then `CONSIGNA_*`
//! environment variables. This is operator-side configuration only;
//! pricing is domain data and lives in the storage layer.

use serde::Deserialize;

use crate::core::TOKEN_LENGTH;
use crate::error::Result;

/// Settings for the CLI frontend
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Directory holding tickets, pricing, and branches
    pub storage_dir: String,
    /// Branch used when `--branch` is not given
    pub default_branch: Option<String>,
    /// Operator recorded on created/closed tickets when `--operator`
    /// is not given
    pub operator: Option<String>,
    /// Length of issued tokens
    pub token_length: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            storage_dir: ".consigna".to_string(),
            default_branch: None,
            operator: None,
            token_length: TOKEN_LENGTH,
        }
    }
}

impl AppConfig {
    /// Load configuration from defaults, `consigna.toml` (if present),
    /// and `CONSIGNA_*` environment variables, in increasing priority.
    pub fn load() -> Result<Self> {
        let settings = config::Config::builder()
            .set_default("storage_dir", ".consigna")?
            .set_default("token_length", TOKEN_LENGTH as i64)?
            .add_source(config::File::with_name("consigna").required(false))
            .add_source(config::Environment::with_prefix("CONSIGNA"))
            .build()?;
        Ok(settings.try_deserialize()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sensible() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.storage_dir, ".consigna");
        assert_eq!(cfg.token_length, TOKEN_LENGTH);
        assert!(cfg.default_branch.is_none());
    }
}
