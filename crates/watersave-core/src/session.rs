//! Interactive session state
//!
//! A `Session` owns both ledgers and the confirmed goal. It is created when
//! the user starts the dashboard and dropped when they quit; nothing is
//! persisted.

use chrono::NaiveDate;
use tracing::info;

use crate::error::{Error, Result};
use crate::goal::GoalTracker;
use crate::ledger::{BehaviorLedger, UsageLedger};
use crate::models::{Behavior, Goal};

#[derive(Debug, Clone, Default)]
pub struct Session {
    usage: UsageLedger,
    behavior: BehaviorLedger,
    goal: GoalTracker,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn usage(&self) -> &UsageLedger {
        &self.usage
    }

    pub fn behavior(&self) -> &BehaviorLedger {
        &self.behavior
    }

    pub fn goal(&self) -> Option<Goal> {
        self.goal.current()
    }

    /// Record liters used on `date`, returning the value it replaced
    pub fn record_usage(&mut self, date: NaiveDate, liters: f64) -> Result<Option<f64>> {
        validate_volume("liters", liters)?;
        let previous = self.usage.record(date, liters);
        info!(%date, liters, overwritten = previous.is_some(), "Recorded usage");
        Ok(previous)
    }

    /// Record behaviors for `date`, returning the record it replaced
    pub fn record_behavior(&mut self, date: NaiveDate, behavior: Behavior) -> Option<Behavior> {
        let previous = self.behavior.record(date, behavior);
        info!(
            %date,
            shower_minutes = behavior.shower_minutes,
            laundry_loads = behavior.laundry_loads,
            overwritten = previous.is_some(),
            "Recorded behavior"
        );
        previous
    }

    /// Goal suggestion from the current average (snapshot, not stored)
    pub fn suggested_goal(&self) -> f64 {
        GoalTracker::suggest(&self.usage)
    }

    pub fn confirm_goal(&mut self, liters_per_day: f64) -> Result<Goal> {
        validate_volume("goal", liters_per_day)?;
        Ok(self.goal.confirm(liters_per_day))
    }
}

/// Volumes must be finite and non-negative
pub fn validate_volume(field: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(Error::InvalidData(format!(
            "{} must be a non-negative number, got {}",
            field, value
        )));
    }
    Ok(())
}
