//! Pricing configuration and the charge calculator
//!
//! The calculator is a pure function: the active [`PricingConfig`] is
//! passed in explicitly, never read from ambient state, so any charge
//! can be recomputed and tested without a data store. An ACTIVE
//! ticket's live estimate uses whatever config is current at read time;
//! the price frozen at close locks in the config in effect at that
//! exact moment.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::ItemType;

/// How fractional elapsed hours convert to billed hours
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Rounding {
    /// Smallest integer ≥ the raw hours (any started hour is billed)
    #[default]
    Ceil,
    /// Largest integer ≤ the raw hours
    Floor,
    /// Nearest integer, ties away from zero
    Round,
}

/// The active rate table and billing policy.
///
/// A singleton mutated by an administrative action; the engine only
/// ever reads the value in effect at the moment of computation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingConfig {
    /// Hourly rate per item category
    pub hourly: HashMap<ItemType, f64>,
    /// Minimum hours billed regardless of elapsed time
    pub min_hours: f64,
    /// Fractional-hour rounding policy
    pub rounding: Rounding,
    /// Informational only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Default for PricingConfig {
    /// Seed configuration used until an administrator writes one
    fn default() -> Self {
        Self {
            hourly: HashMap::from([
                (ItemType::Bolsa, 5.0),
                (ItemType::Mochila, 8.0),
                (ItemType::Maleta, 12.0),
            ]),
            min_hours: 1.0,
            rounding: Rounding::Ceil,
            updated_at: None,
        }
    }
}

/// Result of a charge computation
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Charge {
    /// Hourly rate applied for the item type
    pub rate: f64,
    /// Hours billed after rounding and the minimum-duration floor
    pub hours_billed: f64,
    /// `rate * quantity * hours_billed`, exactly
    pub total: f64,
    /// The rate table had no entry for the item type and 0 was used.
    /// A warning condition, not a failure: a misconfigured rate must
    /// never block returning a customer's item.
    pub rate_missing: bool,
}

/// Compute the charge for holding `quantity` items of `item_type` for
/// `minutes_elapsed` minutes under `pricing`.
///
/// Pure, no side effects. Negative elapsed minutes are clamped to zero
/// so clock skew can never produce a negative charge. `quantity` below
/// 1 is the caller's validation problem, not handled here.
#[must_use]
pub fn compute_charge(
    item_type: ItemType,
    quantity: u32,
    minutes_elapsed: i64,
    pricing: &PricingConfig,
) -> Charge {
    let rate = pricing.hourly.get(&item_type).copied();
    let rate_missing = rate.is_none();
    let rate = rate.unwrap_or(0.0);

    let raw_hours = (minutes_elapsed.max(0) as f64) / 60.0;
    let rounded = match pricing.rounding {
        Rounding::Ceil => raw_hours.ceil(),
        Rounding::Floor => raw_hours.floor(),
        Rounding::Round => raw_hours.round(),
    };

    let mut hours_billed = rounded.max(pricing.min_hours);
    if !hours_billed.is_finite() {
        hours_billed = pricing.min_hours;
    }

    let total = rate * f64::from(quantity) * hours_billed;

    Charge {
        rate,
        hours_billed,
        total,
        rate_missing,
    }
}
