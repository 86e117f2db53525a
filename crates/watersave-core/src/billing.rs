//! Monthly water bill estimate
//!
//! Flat two-tier tariff: a base charge plus a unit price for every whole
//! block of 1000 liters. Partial blocks are free.

use chrono::{Datelike, NaiveDate};

use crate::models::BillEstimate;

/// Fixed monthly base charge
pub const BASE_RATE: u64 = 5000;

/// Price per whole block
pub const UNIT_PRICE: u64 = 1000;

/// Liters in one billed block
pub const BLOCK_LITERS: f64 = 1000.0;

/// Estimate the bill for a month's usage
///
/// Callers must pass a non-negative volume; the CLI rejects negatives
/// before they get here. Volumes too large to bill (including an infinite
/// projection) saturate at `u64::MAX` instead of overflowing.
pub fn estimate_bill(monthly_liters: f64) -> BillEstimate {
    let blocks = (monthly_liters / BLOCK_LITERS).floor() as u64;
    BillEstimate {
        monthly_liters,
        blocks,
        amount: BASE_RATE.saturating_add(blocks.saturating_mul(UNIT_PRICE)),
    }
}

/// Project a month's volume from an average daily usage
pub fn projected_monthly_liters(average_daily: f64, days: u32) -> f64 {
    average_daily * f64::from(days)
}

/// Number of days in the month containing `date`
pub fn days_in_month(date: NaiveDate) -> u32 {
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|next| next.pred_opt())
        .map(|last| last.day())
        .unwrap_or(30)
}
