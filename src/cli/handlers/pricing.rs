//! `pricing` command handlers
//!
//! The administrative path for the rate table. Updates are partial:
//! only the flags given change, the rest of the configuration carries
//! over, and `updated_at` is stamped on every write.

use chrono::Utc;

use crate::cli::OutputFormatter;
use crate::cli::handlers::common::load_context;
use crate::core::{ItemType, Rounding};
use crate::error::{ConsignaError, Result};
use crate::storage::PricingStore;

pub fn handle_pricing_show_command(formatter: &OutputFormatter) -> Result<()> {
    let ctx = load_context()?;
    let pricing = ctx.storage.read()?;

    if formatter.is_json() {
        formatter.json_value(&pricing);
        return Ok(());
    }

    for item_type in ItemType::ALL {
        match pricing.hourly.get(&item_type) {
            Some(rate) => formatter.field(&item_type.to_string(), &format!("{rate:.2}/h")),
            None => formatter.field(&item_type.to_string(), "(no rate configured)"),
        }
    }
    formatter.field("Min hours", &pricing.min_hours.to_string());
    formatter.field("Rounding", &format!("{:?}", pricing.rounding).to_uppercase());
    if let Some(updated_at) = pricing.updated_at {
        formatter.field("Updated", &updated_at.format("%Y-%m-%d %H:%M").to_string());
    }
    Ok(())
}

/// Parameters for updating pricing
pub struct PricingSetParams {
    pub rates: Vec<String>,
    pub min_hours: Option<f64>,
    pub rounding: Option<String>,
}

pub fn handle_pricing_set_command(
    params: PricingSetParams,
    formatter: &OutputFormatter,
) -> Result<()> {
    let ctx = load_context()?;
    let mut pricing = ctx.storage.read()?;

    for entry in &params.rates {
        let (item_type, rate) = parse_rate_spec(entry)?;
        pricing.hourly.insert(item_type, rate);
    }
    if let Some(min_hours) = params.min_hours {
        if min_hours < 0.0 {
            return Err(ConsignaError::Other(anyhow::anyhow!(
                "min_hours must be non-negative, got {min_hours}"
            )));
        }
        pricing.min_hours = min_hours;
    }
    if let Some(rounding) = &params.rounding {
        pricing.rounding = parse_rounding(rounding)?;
    }
    pricing.updated_at = Some(Utc::now());

    ctx.storage.write(&pricing)?;
    formatter.success("Pricing updated");
    formatter.json_value(&pricing);
    Ok(())
}

/// Parse a `TYPE=RATE` flag value, e.g. `MOCHILA=8`
fn parse_rate_spec(entry: &str) -> Result<(ItemType, f64)> {
    let (name, rate) = entry.split_once('=').ok_or_else(|| {
        ConsignaError::Other(anyhow::anyhow!(
            "rate must look like TYPE=RATE, got '{entry}'"
        ))
    })?;
    let item_type: ItemType = name.parse()?;
    let rate: f64 = rate.trim().parse().map_err(|_| {
        ConsignaError::Other(anyhow::anyhow!("'{rate}' is not a number in '{entry}'"))
    })?;
    if rate < 0.0 {
        return Err(ConsignaError::Other(anyhow::anyhow!(
            "rates must be non-negative, got {rate}"
        )));
    }
    Ok((item_type, rate))
}

fn parse_rounding(raw: &str) -> Result<Rounding> {
    match raw.trim().to_uppercase().as_str() {
        "CEIL" => Ok(Rounding::Ceil),
        "FLOOR" => Ok(Rounding::Floor),
        "ROUND" => Ok(Rounding::Round),
        other => Err(ConsignaError::Other(anyhow::anyhow!(
            "unknown rounding '{other}' (expected CEIL, FLOOR, or ROUND)"
        ))),
    }
}
