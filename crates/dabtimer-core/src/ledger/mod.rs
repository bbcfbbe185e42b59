//! Usage ledger and aggregation.
//!
//! The ledger is an append-only, time-ordered log of completed cycles.
//! Statistics are computed on demand over an inclusive time window; see
//! [`UsageLedger::aggregate`] and [`StatsRange`] for the named calendar
//! windows (day, week, month, year).

mod range;
mod stats;

pub use range::StatsRange;
pub use stats::{CategoryCount, UsageStats};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::duration::CycleDurations;
use crate::error::Result;

/// One full heat→cool traversal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletedCycle {
    pub timestamp: DateTime<Utc>,
    pub material: String,
    pub concentrate: String,
    pub heater: String,
    pub heat_secs: u32,
    pub cool_secs: u32,
}

impl CompletedCycle {
    pub fn from_durations(durations: &CycleDurations, timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp,
            material: durations.selection.material.clone(),
            concentrate: durations.selection.concentrate.clone(),
            heater: durations.selection.heater.clone(),
            heat_secs: durations.heat_secs,
            cool_secs: durations.cool_secs,
        }
    }

    pub fn total_secs(&self) -> u32 {
        self.heat_secs.saturating_add(self.cool_secs)
    }

    /// Calendar day (UTC) the cycle completed on.
    pub fn day(&self) -> NaiveDate {
        self.timestamp.date_naive()
    }
}

/// Time-ordered, append-only collection of completed cycles.
///
/// Serialized as a plain list; a deserialized list is sorted on the way in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<CompletedCycle>", into = "Vec<CompletedCycle>")]
pub struct UsageLedger {
    entries: Vec<CompletedCycle>,
}

impl From<Vec<CompletedCycle>> for UsageLedger {
    fn from(entries: Vec<CompletedCycle>) -> Self {
        Self::from_entries(entries)
    }
}

impl From<UsageLedger> for Vec<CompletedCycle> {
    fn from(ledger: UsageLedger) -> Self {
        ledger.entries
    }
}

impl UsageLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a ledger from stored entries in any order.
    pub fn from_entries(mut entries: Vec<CompletedCycle>) -> Self {
        entries.sort_by_key(|e| e.timestamp);
        Self { entries }
    }

    /// Append a completed cycle.
    ///
    /// Identical records are kept as separate entries. A record older than
    /// the newest entry is placed after every entry with an equal or earlier
    /// timestamp so the ledger stays time-ordered.
    pub fn record(&mut self, cycle: CompletedCycle) {
        tracing::info!(
            concentrate = %cycle.concentrate,
            at = %cycle.timestamp,
            "recording completed cycle"
        );
        let idx = self
            .entries
            .partition_point(|e| e.timestamp <= cycle.timestamp);
        self.entries.insert(idx, cycle);
    }

    pub fn entries(&self) -> &[CompletedCycle] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries with `start <= timestamp <= end`, oldest first.
    pub fn in_window(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> impl Iterator<Item = &CompletedCycle> {
        let lo = self.entries.partition_point(|e| e.timestamp < start);
        let hi = self.entries.partition_point(|e| e.timestamp <= end);
        self.entries[lo..hi.max(lo)].iter()
    }

    /// Entries in the window, newest first.
    pub fn history(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Vec<&CompletedCycle> {
        let mut items: Vec<&CompletedCycle> = self.in_window(start, end).collect();
        items.reverse();
        items
    }

    /// Statistics over the inclusive window `[start, end]`.
    ///
    /// Ties for the most frequent concentrate resolve to the key declared
    /// first in `catalog`; ties for the busiest day resolve to the earliest.
    pub fn aggregate(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        catalog: &Catalog,
    ) -> Result<UsageStats> {
        UsageStats::compute(self.in_window(start, end), start, end, catalog)
    }

    /// Statistics over a named calendar range containing `anchor`.
    pub fn aggregate_range(
        &self,
        range: StatsRange,
        anchor: NaiveDate,
        catalog: &Catalog,
    ) -> Result<UsageStats> {
        let (start, end) = range.window(anchor)?;
        self.aggregate(start, end, catalog)
    }
}
