//! Storage layer: collaborator contracts and their implementations
//!
//! The lifecycle manager only sees the traits in [`repository`];
//! [`FileStorage`] backs the CLI and [`MemoryStorage`] backs tests.

mod file;
mod memory;
mod repository;

pub use file::FileStorage;
pub use memory::MemoryStorage;
pub use repository::{
    Branch, BranchDirectory, Clock, CloseFields, PricingStore, SystemClock, TicketRepository,
};
