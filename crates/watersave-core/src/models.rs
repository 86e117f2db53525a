//! Data models for WaterSave

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Water used on a single day
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UsageRecord {
    pub date: NaiveDate,
    /// Volume in liters (non-negative)
    pub liters: f64,
}

/// Household behaviors logged for a single day
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Behavior {
    /// Total shower time in minutes
    pub shower_minutes: u32,
    /// Number of laundry loads run
    pub laundry_loads: u32,
}

impl std::fmt::Display for Behavior {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{{shower_minutes: {}, laundry_loads: {}}}",
            self.shower_minutes, self.laundry_loads
        )
    }
}

/// A behavior entry together with its date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BehaviorRecord {
    pub date: NaiveDate,
    #[serde(flatten)]
    pub behavior: Behavior,
}

/// Confirmed daily usage target
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    pub liters_per_day: f64,
}

/// Result of a bill estimate (derived, never stored)
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BillEstimate {
    /// Monthly volume the estimate was computed from
    pub monthly_liters: f64,
    /// Number of whole 1000-liter blocks charged at the unit price
    pub blocks: u64,
    /// Estimated amount in opaque currency units
    pub amount: u64,
}

/// One point of the usage line chart
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChartPoint {
    pub date: NaiveDate,
    pub liters: f64,
}

impl From<UsageRecord> for ChartPoint {
    fn from(record: UsageRecord) -> Self {
        Self {
            date: record.date,
            liters: record.liters,
        }
    }
}
