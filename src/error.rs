//! Error types for consigna
//!
//! The taxonomy separates caller mistakes (validation), lookup misses,
//! lost close races, and infrastructure failures, so the CLI and any
//! other frontend can react to each differently.

use thiserror::Error;

/// Result type alias used throughout the crate
pub type Result<T> = std::result::Result<T, ConsignaError>;

/// All errors that can occur in consigna
#[derive(Debug, Error)]
pub enum ConsignaError {
    /// Quantity must be a positive integer
    #[error("Invalid quantity: {quantity} (must be at least 1)")]
    InvalidQuantity { quantity: u32 },

    /// Item type is not one of the known storage categories
    #[error("Unknown item type: '{value}'")]
    UnknownItemType { value: String },

    /// Token failed shape validation after normalization
    #[error("Malformed token: '{token}'")]
    MalformedToken { token: String },

    /// No ticket resolves to the given token
    #[error("No ticket found for token '{token}'")]
    TicketNotFound { token: String },

    /// No ticket with the given id exists
    #[error("Ticket '{id}' does not exist")]
    TicketIdNotFound { id: String },

    /// The conditional close lost the race: the ticket is already CLOSED
    #[error("Ticket '{id}' is already closed")]
    AlreadyClosed { id: String },

    /// Token uniqueness violation reported by the repository.
    /// Internal: the lifecycle manager retries with a fresh token.
    #[error("Token '{token}' already exists")]
    DuplicateToken { token: String },

    /// Token generation kept colliding past the retry bound.
    /// Fatal: signals a misconfigured alphabet or token length.
    #[error("Could not generate a unique token after {attempts} attempts")]
    TokenExhausted { attempts: u32 },

    /// Check-in against a branch that is inactive or unknown
    #[error("Branch '{branch_id}' is inactive or unknown")]
    InactiveBranch { branch_id: String },

    /// Storage directory has not been initialized
    #[error("Storage not initialized. Run 'consigna init' first")]
    NotInitialized,

    /// IO operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML serialization/deserialization failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_yaml::Error),

    /// Configuration loading failed
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Catch-all for wrapped errors
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ConsignaError {
    /// Whether the caller can recover by correcting input and retrying.
    ///
    /// Validation and lookup failures are recoverable; a lost close race
    /// is terminal for that ticket, and token exhaustion is fatal.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::InvalidQuantity { .. }
                | Self::UnknownItemType { .. }
                | Self::MalformedToken { .. }
                | Self::TicketNotFound { .. }
                | Self::TicketIdNotFound { .. }
        )
    }

    /// Hint shown to CLI users alongside the error message
    #[must_use]
    pub fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::MalformedToken { .. } => {
                Some("Tokens are 8 characters, letters and digits (no 0/O/1/I)")
            },
            Self::AlreadyClosed { .. } => {
                Some("The item was already delivered; the charge was frozen at close time")
            },
            Self::TicketNotFound { .. } => Some("Check the token and try again"),
            Self::NotInitialized => Some("Run 'consigna init' in the working directory"),
            _ => None,
        }
    }
}
