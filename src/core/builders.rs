use super::{ItemType, Ticket, TicketId, TicketStatus};
use chrono::{DateTime, Utc};

/// Builder for creating Ticket instances
#[derive(Default)]
pub struct TicketBuilder {
    id: Option<TicketId>,
    token: Option<String>,
    branch_id: Option<String>,
    item_type: Option<ItemType>,
    quantity: Option<u32>,
    notes: Option<String>,
    status: Option<TicketStatus>,
    paid: bool,
    created_at: Option<DateTime<Utc>>,
    closed_at: Option<DateTime<Utc>>,
    price_at_close: Option<f64>,
    hours_billed: Option<f64>,
    created_by: Option<String>,
    closed_by: Option<String>,
}

impl TicketBuilder {
    /// Create a new ticket builder
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the ticket ID
    #[must_use]
    pub const fn id(mut self, id: TicketId) -> Self {
        self.id = Some(id);
        self
    }

    /// Set the token
    #[must_use]
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Set the branch
    #[must_use]
    pub fn branch_id(mut self, branch_id: impl Into<String>) -> Self {
        self.branch_id = Some(branch_id.into());
        self
    }

    /// Set the item type
    #[must_use]
    pub const fn item_type(mut self, item_type: ItemType) -> Self {
        self.item_type = Some(item_type);
        self
    }

    /// Set the quantity
    #[must_use]
    pub const fn quantity(mut self, quantity: u32) -> Self {
        self.quantity = Some(quantity);
        self
    }

    /// Set the notes
    #[must_use]
    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Set the status
    #[must_use]
    pub const fn status(mut self, status: TicketStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Set the paid flag
    #[must_use]
    pub const fn paid(mut self, paid: bool) -> Self {
        self.paid = paid;
        self
    }

    /// Set `created_at` timestamp
    #[must_use]
    pub const fn created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }

    /// Set `closed_at` timestamp
    #[must_use]
    pub const fn closed_at(mut self, closed_at: DateTime<Utc>) -> Self {
        self.closed_at = Some(closed_at);
        self
    }

    /// Set the frozen price
    #[must_use]
    pub const fn price_at_close(mut self, price: f64) -> Self {
        self.price_at_close = Some(price);
        self
    }

    /// Set the frozen billed hours
    #[must_use]
    pub const fn hours_billed(mut self, hours: f64) -> Self {
        self.hours_billed = Some(hours);
        self
    }

    /// Set the creating operator
    #[must_use]
    pub fn created_by(mut self, operator: impl Into<String>) -> Self {
        self.created_by = Some(operator.into());
        self
    }

    /// Set the closing operator
    #[must_use]
    pub fn closed_by(mut self, operator: impl Into<String>) -> Self {
        self.closed_by = Some(operator.into());
        self
    }

    /// Build the ticket
    pub fn build(self) -> Ticket {
        Ticket {
            id: self.id.unwrap_or_default(),
            token: self.token.unwrap_or_default(),
            branch_id: self.branch_id.unwrap_or_default(),
            item_type: self.item_type.unwrap_or(ItemType::Bolsa),
            quantity: self.quantity.unwrap_or(1),
            notes: self.notes,
            status: self.status.unwrap_or(TicketStatus::Active),
            paid: self.paid,
            created_at: self.created_at.unwrap_or_else(Utc::now),
            closed_at: self.closed_at,
            price_at_close: self.price_at_close,
            hours_billed: self.hours_billed,
            created_by: self.created_by,
            closed_by: self.closed_by,
        }
    }
}
