//! DPS breakdowns and phase merging.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Encounter phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Target above the execute threshold
    NonExecute,
    /// Target below the execute threshold
    Execute,
}

impl Phase {
    /// Both phases, non-execute first.
    pub const ALL: [Phase; 2] = [Phase::NonExecute, Phase::Execute];
}

/// Damage per second by source name.
///
/// Only strictly positive contributions are stored, so an ability that is
/// never used is absent rather than present with zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DpsBreakdown {
    entries: BTreeMap<String, f64>,
}

impl DpsBreakdown {
    /// Empty breakdown.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add DPS to a source. Non-positive amounts are ignored.
    pub fn add(&mut self, source: &str, dps: f64) {
        if dps > 0.0 {
            *self.entries.entry(source.to_string()).or_insert(0.0) += dps;
        }
    }

    /// DPS of one source, if present.
    #[must_use]
    pub fn get(&self, source: &str) -> Option<f64> {
        self.entries.get(source).copied()
    }

    /// Sum over all sources.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.entries.values().sum()
    }

    /// Number of sources.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no sources.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sources in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries.iter().map(|(name, dps)| (name.as_str(), *dps))
    }

    /// Sources sorted by DPS, highest first.
    #[must_use]
    pub fn sorted_desc(&self) -> Vec<(&str, f64)> {
        let mut sorted: Vec<_> = self.iter().collect();
        sorted.sort_by(|a, b| b.1.total_cmp(&a.1));
        sorted
    }

    /// Time-weighted merge of the two phases.
    ///
    /// `merged[k] = non_execute[k]·(1−t) + execute[k]·t`, with a missing key
    /// counting as zero. Keys whose weighted value is zero are left out, so
    /// `t = 0` and `t = 1` reproduce the corresponding phase exactly.
    #[must_use]
    pub fn merge(non_execute: &Self, execute: &Self, time_in_execute_range: f64) -> Self {
        let t = time_in_execute_range;
        let mut merged = Self::new();
        let keys = non_execute
            .entries
            .keys()
            .chain(execute.entries.keys())
            .collect::<std::collections::BTreeSet<_>>();
        for key in keys {
            let ne = non_execute.get(key).unwrap_or(0.0);
            let ex = execute.get(key).unwrap_or(0.0);
            merged.add(key, ne * (1.0 - t) + ex * t);
        }
        merged
    }
}

impl FromIterator<(String, f64)> for DpsBreakdown {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        let mut breakdown = Self::new();
        for (name, dps) in iter {
            breakdown.add(&name, dps);
        }
        breakdown
    }
}

/// Result of a full run: merged, or both phases side by side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DpsReport {
    /// Phases merged by time spent in each
    Merged(DpsBreakdown),
    /// Phases kept apart
    Split {
        /// Non-execute breakdown
        non_execute: DpsBreakdown,
        /// Execute breakdown
        execute: DpsBreakdown,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    use proptest::prelude::*;

    fn breakdown(pairs: &[(&str, f64)]) -> DpsBreakdown {
        pairs.iter().map(|(k, v)| ((*k).to_string(), *v)).collect()
    }

    #[test]
    fn add_accumulates_and_skips_zero() {
        let mut b = DpsBreakdown::new();
        b.add("mutilate", 100.0);
        b.add("mutilate", 50.0);
        b.add("dispatch", 0.0);
        assert_eq!(b.get("mutilate"), Some(150.0));
        assert_eq!(b.get("dispatch"), None);
        assert_eq!(b.len(), 1);
    }

    #[test]
    fn merge_with_missing_keys() {
        let ne = breakdown(&[("mutilate", 1000.0), ("envenom", 500.0)]);
        let ex = breakdown(&[("dispatch", 1200.0), ("envenom", 700.0)]);
        let merged = DpsBreakdown::merge(&ne, &ex, 0.25);
        assert!((merged.get("mutilate").unwrap() - 750.0).abs() < 1e-9);
        assert!((merged.get("dispatch").unwrap() - 300.0).abs() < 1e-9);
        assert!((merged.get("envenom").unwrap() - 550.0).abs() < 1e-9);
    }

    #[test]
    fn sorted_desc_orders_by_value() {
        let b = breakdown(&[("a", 1.0), ("b", 3.0), ("c", 2.0)]);
        let names: Vec<_> = b.sorted_desc().into_iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["b", "c", "a"]);
    }

    #[test]
    fn report_serializes_as_tagged_source_maps() {
        let report = DpsReport::Split {
            non_execute: breakdown(&[("mutilate", 1000.0)]),
            execute: breakdown(&[("dispatch", 1200.0)]),
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["split"]["non_execute"]["mutilate"], 1000.0);
        assert_eq!(json["split"]["execute"]["dispatch"], 1200.0);
        let back: DpsReport = serde_json::from_value(json).unwrap();
        assert_eq!(back, report);
    }

    proptest! {
        #[test]
        fn merge_endpoints_are_exact(
            ne in proptest::collection::btree_map("[a-e]", 0.1f64..1e5, 0..5usize),
            ex in proptest::collection::btree_map("[c-h]", 0.1f64..1e5, 0..5usize),
        ) {
            let ne: DpsBreakdown = ne.into_iter().collect();
            let ex: DpsBreakdown = ex.into_iter().collect();
            prop_assert_eq!(DpsBreakdown::merge(&ne, &ex, 0.0), ne.clone());
            prop_assert_eq!(DpsBreakdown::merge(&ne, &ex, 1.0), ex.clone());
        }

        #[test]
        fn merge_is_weighted_average_for_shared_keys(
            a in 0.1f64..1e5,
            b in 0.1f64..1e5,
            t in 0.0f64..=1.0,
        ) {
            let ne = breakdown(&[("shared", a)]);
            let ex = breakdown(&[("shared", b)]);
            let merged = DpsBreakdown::merge(&ne, &ex, t);
            let expected = a * (1.0 - t) + b * t;
            prop_assert!((merged.get("shared").unwrap() - expected).abs() <= 1e-9 * expected.max(1.0));
        }
    }
}
