//! One-shot bill estimate command

use anyhow::Result;
use watersave_core::billing::estimate_bill;
use watersave_core::session::validate_volume;

use super::render::render_bill;

/// Print the bill for a monthly volume
pub fn cmd_bill(monthly_liters: f64) -> Result<()> {
    validate_volume("monthly liters", monthly_liters)?;
    println!("{}", render_bill(&estimate_bill(monthly_liters), None));
    Ok(())
}
