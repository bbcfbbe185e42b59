use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::CompletedCycle;
use crate::catalog::{Catalog, Category};
use crate::error::{CoreError, Result};

/// Number of cycles recorded for one catalog key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCount {
    pub key: String,
    pub count: u64,
}

/// Aggregate statistics over a time window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageStats {
    pub window_start: DateTime<Utc>,
    pub window_end: DateTime<Utc>,
    pub total_count: u64,
    /// Calendar days touched by the window.
    pub days_in_window: u32,
    /// `total_count / days_in_window`, unrounded.
    pub sessions_per_day: f64,
    pub per_day_counts: BTreeMap<NaiveDate, u64>,
    pub most_frequent_concentrate: Option<String>,
    pub most_frequent_day: Option<NaiveDate>,
    /// Catalog order first, then keys unknown to the catalog by first appearance.
    pub concentrate_counts: Vec<CategoryCount>,
    pub material_counts: Vec<CategoryCount>,
    pub heater_counts: Vec<CategoryCount>,
    pub total_heat_secs: u64,
    pub total_cool_secs: u64,
}

impl UsageStats {
    pub(super) fn compute<'a>(
        cycles: impl Iterator<Item = &'a CompletedCycle>,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        catalog: &Catalog,
    ) -> Result<Self> {
        if end < start {
            return Err(CoreError::InvalidTimeRange { start, end });
        }
        let cycles: Vec<&CompletedCycle> = cycles.collect();

        let mut per_day_counts: BTreeMap<NaiveDate, u64> = BTreeMap::new();
        let mut total_heat_secs = 0u64;
        let mut total_cool_secs = 0u64;
        for cycle in &cycles {
            *per_day_counts.entry(cycle.day()).or_default() += 1;
            total_heat_secs += u64::from(cycle.heat_secs);
            total_cool_secs += u64::from(cycle.cool_secs);
        }

        let concentrate_counts = ordered_counts(
            cycles.iter().map(|c| c.concentrate.as_str()),
            &catalog.keys(Category::Concentrate),
        );
        let material_counts = ordered_counts(
            cycles.iter().map(|c| c.material.as_str()),
            &catalog.keys(Category::Material),
        );
        let heater_counts = ordered_counts(
            cycles.iter().map(|c| c.heater.as_str()),
            &catalog.keys(Category::Heater),
        );

        // BTreeMap iterates oldest first, so a strict comparison keeps the earliest day on ties.
        let mut most_frequent_day: Option<(NaiveDate, u64)> = None;
        for (&day, &count) in &per_day_counts {
            if most_frequent_day.map_or(true, |(_, best)| count > best) {
                most_frequent_day = Some((day, count));
            }
        }

        let days_in_window = days_touched(start, end);
        let total_count = cycles.len() as u64;

        Ok(Self {
            window_start: start,
            window_end: end,
            total_count,
            days_in_window,
            sessions_per_day: total_count as f64 / f64::from(days_in_window),
            per_day_counts,
            most_frequent_concentrate: most_frequent(&concentrate_counts),
            most_frequent_day: most_frequent_day.map(|(day, _)| day),
            concentrate_counts,
            material_counts,
            heater_counts,
            total_heat_secs,
            total_cool_secs,
        })
    }

    /// Count for one concentrate key, zero when absent.
    pub fn concentrate_count(&self, key: &str) -> u64 {
        self.concentrate_counts
            .iter()
            .find(|c| c.key == key)
            .map_or(0, |c| c.count)
    }
}

fn days_touched(start: DateTime<Utc>, end: DateTime<Utc>) -> u32 {
    let days = (end.date_naive() - start.date_naive()).num_days() + 1;
    u32::try_from(days).unwrap_or(u32::MAX)
}

/// Count keys, ordered by `declared` and then by first appearance.
fn ordered_counts<'a>(keys: impl Iterator<Item = &'a str>, declared: &[&str]) -> Vec<CategoryCount> {
    let mut counts: HashMap<&str, u64> = HashMap::new();
    let mut unknown: Vec<&str> = Vec::new();
    for key in keys {
        let count = counts.entry(key).or_default();
        if *count == 0 && !declared.contains(&key) {
            unknown.push(key);
        }
        *count += 1;
    }

    declared
        .iter()
        .chain(unknown.iter())
        .filter_map(|key| {
            counts.get(key).map(|&count| CategoryCount {
                key: (*key).to_string(),
                count,
            })
        })
        .collect()
}

/// First key with the highest count; `counts` is already in tie-break order.
fn most_frequent(counts: &[CategoryCount]) -> Option<String> {
    let mut best: Option<&CategoryCount> = None;
    for entry in counts {
        if best.map_or(true, |b| entry.count > b.count) {
            best = Some(entry);
        }
    }
    best.map(|b| b.key.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordered_counts_puts_catalog_keys_first() {
        let keys = ["diamonds", "wax", "shatter", "wax", "diamonds", "sauce"];
        let counts = ordered_counts(keys.into_iter(), &["shatter", "wax", "resin"]);
        let order: Vec<(&str, u64)> = counts.iter().map(|c| (c.key.as_str(), c.count)).collect();
        assert_eq!(
            order,
            vec![("shatter", 1), ("wax", 2), ("diamonds", 2), ("sauce", 1)]
        );
        // wax and diamonds tie; wax is declared.
        assert_eq!(most_frequent(&counts).as_deref(), Some("wax"));
    }

    #[test]
    fn most_frequent_of_nothing_is_none() {
        assert!(most_frequent(&[]).is_none());
    }

    #[test]
    fn days_touched_counts_partial_days() {
        let start = "2026-01-01T23:00:00Z".parse::<DateTime<Utc>>().unwrap();
        let end = "2026-01-02T01:00:00Z".parse::<DateTime<Utc>>().unwrap();
        assert_eq!(days_touched(start, end), 2);
        assert_eq!(days_touched(start, start), 1);
    }
}
