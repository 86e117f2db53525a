//! Daily savings goal
//!
//! The suggestion is a snapshot (90% of the current average) taken when the
//! goal screen is shown. The confirmed goal is informational only.

use crate::ledger::UsageLedger;
use crate::models::Goal;

/// Fraction of the current average suggested as the next goal
pub const SUGGESTION_FACTOR: f64 = 0.9;

/// Holds the user's confirmed goal for the session
#[derive(Debug, Clone, Default)]
pub struct GoalTracker {
    current: Option<Goal>,
}

impl GoalTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Suggested daily goal: 90% of average usage, 0 when nothing is recorded
    pub fn suggest(usage: &UsageLedger) -> f64 {
        usage.average().unwrap_or(0.0) * SUGGESTION_FACTOR
    }

    /// Store a confirmed goal, replacing any previous one
    pub fn confirm(&mut self, liters_per_day: f64) -> Goal {
        let goal = Goal { liters_per_day };
        self.current = Some(goal);
        goal
    }

    pub fn current(&self) -> Option<Goal> {
        self.current
    }
}
