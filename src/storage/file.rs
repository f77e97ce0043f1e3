//! File-backed storage
//!
//! One YAML document per ticket under `<root>/tickets/`, plus
//! `pricing.yaml` and `branches.yaml` at the root. Writes go through a
//! temp file and an atomic rename so a crash never leaves a
//! half-written record. Token uniqueness and the conditional close are
//! serialized by an internal mutex; this makes the CAS guarantee hold
//! within one process, which is the scope of this store (a database
//! implementation would map `close_if_active` to a conditional UPDATE).

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::debug;

use crate::core::{PricingConfig, Ticket, TicketId, TicketStatus};
use crate::error::{ConsignaError, Result};

use super::repository::{
    Branch, BranchDirectory, CloseFields, PricingStore, TicketRepository, order_for_listing,
};

const TICKETS_DIR: &str = "tickets";
const PRICING_FILE: &str = "pricing.yaml";
const BRANCHES_FILE: &str = "branches.yaml";

/// YAML-file storage rooted at a dot-directory (`.consigna` by default)
pub struct FileStorage {
    root: PathBuf,
    write_lock: Mutex<()>,
}

impl FileStorage {
    /// Create a handle rooted at `root`. Does not touch the filesystem;
    /// call [`FileStorage::init`] to create the layout.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Create the storage directory layout
    pub fn init(&self) -> Result<()> {
        fs::create_dir_all(self.root.join(TICKETS_DIR))?;
        debug!(root = %self.root.display(), "initialized storage");
        Ok(())
    }

    /// Whether the layout exists on disk
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.root.join(TICKETS_DIR).is_dir()
    }

    fn ensure_initialized(&self) -> Result<()> {
        if self.is_initialized() {
            Ok(())
        } else {
            Err(ConsignaError::NotInitialized)
        }
    }

    fn ticket_path(&self, id: &TicketId) -> PathBuf {
        self.root.join(TICKETS_DIR).join(format!("{id}.yaml"))
    }

    fn write_yaml<T: serde::Serialize>(&self, path: &Path, value: &T) -> Result<()> {
        let yaml = serde_yaml::to_string(value)?;
        let tmp = path.with_extension("yaml.tmp");
        fs::write(&tmp, yaml)?;
        fs::rename(&tmp, path)?;
        Ok(())
    }

    fn load_ticket_file(&self, path: &Path) -> Result<Ticket> {
        let contents = fs::read_to_string(path)?;
        Ok(serde_yaml::from_str(&contents)?)
    }

    /// Loads every stored ticket
    pub fn load_all_tickets(&self) -> Result<Vec<Ticket>> {
        self.ensure_initialized()?;
        let mut tickets = Vec::new();
        for entry in fs::read_dir(self.root.join(TICKETS_DIR))? {
            let path = entry?.path();
            if path.extension().is_some_and(|e| e == "yaml") {
                tickets.push(self.load_ticket_file(&path)?);
            }
        }
        Ok(tickets)
    }

    /// All branches on record
    pub fn load_branches(&self) -> Result<Vec<Branch>> {
        let path = self.root.join(BRANCHES_FILE);
        if !path.exists() {
            return Ok(Vec::new());
        }
        let contents = fs::read_to_string(path)?;
        Ok(serde_yaml::from_str(&contents)?)
    }

    /// Adds or replaces a branch record
    pub fn save_branch(&self, branch: Branch) -> Result<()> {
        self.ensure_initialized()?;
        let _guard = self.write_lock.lock().expect("storage lock poisoned");
        let mut branches = self.load_branches()?;
        branches.retain(|b| b.id != branch.id);
        branches.push(branch);
        branches.sort_by(|a, b| a.id.cmp(&b.id));
        self.write_yaml(&self.root.join(BRANCHES_FILE), &branches)
    }
}

impl TicketRepository for FileStorage {
    fn insert(&self, ticket: &Ticket) -> Result<()> {
        self.ensure_initialized()?;
        let _guard = self.write_lock.lock().expect("storage lock poisoned");

        // Token is a unique key; the scan stands in for the index a
        // database store would use.
        if self
            .load_all_tickets()?
            .iter()
            .any(|t| t.token == ticket.token)
        {
            return Err(ConsignaError::DuplicateToken {
                token: ticket.token.clone(),
            });
        }

        self.write_yaml(&self.ticket_path(&ticket.id), ticket)?;
        debug!(token = %ticket.token, id = %ticket.id, "persisted ticket");
        Ok(())
    }

    fn get_by_id(&self, id: &TicketId) -> Result<Option<Ticket>> {
        self.ensure_initialized()?;
        let path = self.ticket_path(id);
        if !path.exists() {
            return Ok(None);
        }
        self.load_ticket_file(&path).map(Some)
    }

    fn get_by_token(&self, token: &str) -> Result<Option<Ticket>> {
        Ok(self
            .load_all_tickets()?
            .into_iter()
            .find(|t| t.token == token))
    }

    fn close_if_active(&self, id: &TicketId, fields: &CloseFields) -> Result<Ticket> {
        self.ensure_initialized()?;
        // Status check and rewrite are one critical section
        let _guard = self.write_lock.lock().expect("storage lock poisoned");

        let path = self.ticket_path(id);
        if !path.exists() {
            return Err(ConsignaError::TicketIdNotFound { id: id.to_string() });
        }
        let mut ticket = self.load_ticket_file(&path)?;

        if ticket.status != TicketStatus::Active {
            return Err(ConsignaError::AlreadyClosed { id: id.to_string() });
        }

        ticket.status = TicketStatus::Closed;
        ticket.paid = true;
        ticket.closed_at = Some(fields.closed_at);
        ticket.price_at_close = Some(fields.price_at_close);
        ticket.hours_billed = Some(fields.hours_billed);
        ticket.closed_by = fields.closed_by.clone();

        self.write_yaml(&path, &ticket)?;
        debug!(token = %ticket.token, "closed ticket");
        Ok(ticket)
    }

    fn list_by_status(&self, status: TicketStatus, limit: usize) -> Result<Vec<Ticket>> {
        let matching: Vec<Ticket> = self
            .load_all_tickets()?
            .into_iter()
            .filter(|t| t.status == status)
            .collect();
        Ok(order_for_listing(matching, status, limit))
    }
}

impl PricingStore for FileStorage {
    fn read(&self) -> Result<PricingConfig> {
        let path = self.root.join(PRICING_FILE);
        if !path.exists() {
            // Seed defaults until an administrator writes a table
            return Ok(PricingConfig::default());
        }
        let contents = fs::read_to_string(path)?;
        Ok(serde_yaml::from_str(&contents)?)
    }

    fn write(&self, pricing: &PricingConfig) -> Result<()> {
        self.ensure_initialized()?;
        let _guard = self.write_lock.lock().expect("storage lock poisoned");
        self.write_yaml(&self.root.join(PRICING_FILE), pricing)
    }
}

impl BranchDirectory for FileStorage {
    fn is_active(&self, branch_id: &str) -> Result<bool> {
        Ok(self
            .load_branches()?
            .iter()
            .any(|b| b.id == branch_id && b.active))
    }
}
