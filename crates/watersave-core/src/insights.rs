//! Usage statistics and prompt summaries
//!
//! Everything here produces text fragments for advice prompts. Empty ledgers
//! yield `None` so callers can report insufficient data instead of sending
//! degenerate numbers to the model.
//!
//! Summaries are windowed: only the most recent `window` records are
//! rendered, so prompt size stays bounded however long the session runs.

use std::fmt::Write;

use crate::ledger::{BehaviorLedger, UsageLedger};

/// Default number of most recent records rendered into a prompt
pub const DEFAULT_SUMMARY_WINDOW: usize = 30;

/// Aggregate statistics over the usage ledger
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UsageStats {
    pub count: usize,
    pub mean: f64,
    pub max: f64,
    pub min: f64,
}

/// Compute mean, max and min over every recorded volume
pub fn usage_stats(usage: &UsageLedger) -> Option<UsageStats> {
    let mean = usage.average()?;
    let (min, max) = usage
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), (_, &v)| {
            (min.min(v), max.max(v))
        });

    Some(UsageStats {
        count: usage.len(),
        mean,
        max,
        min,
    })
}

/// One `date: liters` line per day for the most recent `window` days
pub fn usage_summary(usage: &UsageLedger, window: usize) -> Option<String> {
    if usage.is_empty() {
        return None;
    }
    let lines = usage
        .recent(window)
        .map(|(date, liters)| format!("{}: {:.1} L", date, liters))
        .collect::<Vec<_>>();
    Some(with_omitted_note(lines, usage.len(), window))
}

/// One `date: {record}` line per day for the most recent `window` days
pub fn behavior_summary(behavior: &BehaviorLedger, window: usize) -> Option<String> {
    if behavior.is_empty() {
        return None;
    }
    let lines = behavior
        .recent(window)
        .map(|(date, record)| format!("{}: {}", date, record))
        .collect::<Vec<_>>();
    Some(with_omitted_note(lines, behavior.len(), window))
}

fn with_omitted_note(lines: Vec<String>, total: usize, window: usize) -> String {
    let mut out = lines.join("\n");
    let omitted = total.saturating_sub(window);
    if omitted > 0 {
        let _ = write!(out, "\n({} earlier days omitted)", omitted);
    }
    out
}
