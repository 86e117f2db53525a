//! Date-keyed in-memory ledgers
//!
//! A ledger holds at most one value per calendar date. Writing a date that
//! is already present replaces the previous value; nothing is ever removed.
//! Iteration is always ascending by date.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::models::{Behavior, BehaviorRecord, ChartPoint, UsageRecord};

/// Generic date → value store with last-write-wins semantics
#[derive(Debug, Clone)]
pub struct Ledger<V> {
    entries: BTreeMap<NaiveDate, V>,
}

impl<V> Ledger<V> {
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Insert or overwrite the value for `date`, returning the previous value
    pub fn record(&mut self, date: NaiveDate, value: V) -> Option<V> {
        self.entries.insert(date, value)
    }

    pub fn get(&self, date: NaiveDate) -> Option<&V> {
        self.entries.get(&date)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries ascending by date
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (NaiveDate, &V)> + '_ {
        self.entries.iter().map(|(date, value)| (*date, value))
    }

    /// The `n` most recent entries, still ascending by date
    pub fn recent(&self, n: usize) -> impl Iterator<Item = (NaiveDate, &V)> + '_ {
        let skip = self.entries.len().saturating_sub(n);
        self.iter().skip(skip)
    }
}

impl<V> Default for Ledger<V> {
    fn default() -> Self {
        Self::new()
    }
}

/// Daily water usage in liters
pub type UsageLedger = Ledger<f64>;

/// Daily household behaviors
pub type BehaviorLedger = Ledger<Behavior>;

impl UsageLedger {
    /// Arithmetic mean of all recorded volumes, or `None` when empty
    pub fn average(&self) -> Option<f64> {
        if self.is_empty() {
            return None;
        }
        let total: f64 = self.entries.values().sum();
        Some(total / self.len() as f64)
    }

    pub fn records(&self) -> impl Iterator<Item = UsageRecord> + '_ {
        self.iter().map(|(date, liters)| UsageRecord {
            date,
            liters: *liters,
        })
    }

    /// Chart-ready (date, liters) pairs, ascending by date
    pub fn chart_points(&self) -> Vec<ChartPoint> {
        self.records().map(ChartPoint::from).collect()
    }
}

impl BehaviorLedger {
    pub fn records(&self) -> impl Iterator<Item = BehaviorRecord> + '_ {
        self.iter().map(|(date, behavior)| BehaviorRecord {
            date,
            behavior: *behavior,
        })
    }
}
