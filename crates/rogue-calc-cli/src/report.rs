//! Plain-text tables.

use std::fmt::Write as _;

use armory::Attribute;
use rogue_calc::{DpsBreakdown, EpTable, Ranking, TierRanking};

/// Name column width for a set of labels.
fn width<'a>(labels: impl Iterator<Item = &'a str>) -> usize {
    labels.map(str::len).max().unwrap_or(0)
}

fn rule(width: usize) -> String {
    "-".repeat(width + 15)
}

/// Sources highest first with their share of the total, then the total.
pub fn breakdown(title: &str, breakdown: &DpsBreakdown) -> String {
    let total = breakdown.total();
    let rows = breakdown.sorted_desc();
    let pad = width(rows.iter().map(|(name, _)| *name));

    let mut out = format!("{title}:\n");
    for (name, dps) in &rows {
        let share = if total > 0.0 { 100.0 * dps / total } else { 0.0 };
        if share >= 0.005 {
            let _ = writeln!(out, "{name:<pad$}: {dps:>12.3} ({share:.2}%)");
        } else {
            let _ = writeln!(out, "{name:<pad$}: {dps:>12.3}");
        }
    }
    let _ = writeln!(out, "{}", rule(pad));
    let _ = writeln!(out, "{:<pad$}  {total:>12.3} total damage per second.", "");
    out
}

/// DPS per point, highest first.
pub fn ep(table: &EpTable) -> String {
    let mut rows: Vec<(Attribute, f64)> = table.iter().collect();
    rows.sort_by(|a, b| b.1.total_cmp(&a.1));
    let pad = width(rows.iter().map(|(a, _)| a.as_str()));

    let mut out = String::new();
    for (attribute, value) in rows {
        let _ = writeln!(out, "{:<pad$}: {value:.4}", attribute.as_str());
    }
    let _ = writeln!(out, "{}", rule(pad));
    out
}

/// A ranking as already sorted.
pub fn ranking(ranking: &Ranking) -> String {
    let pad = width(ranking.iter().map(|entry| entry.label.as_str()));
    let mut out = String::new();
    for entry in ranking.iter() {
        let _ = writeln!(out, "{:<pad$}: {:.3}", entry.label, entry.delta);
    }
    let _ = writeln!(out, "{}", rule(pad));
    out
}

/// One block per talent tier.
pub fn talents(tiers: &[TierRanking]) -> String {
    let mut out = String::new();
    for tier in tiers {
        let _ = writeln!(out, "tier {}:", tier.tier + 1);
        out.push_str(&ranking(&tier.ranking));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn breakdown_lists_highest_first_with_total() {
        let mut bd = DpsBreakdown::new();
        bd.add("envenom", 30.0);
        bd.add("mutilate", 70.0);
        let text = breakdown("execute breakdown", &bd);
        let mutilate = text.find("mutilate").unwrap();
        let envenom = text.find("envenom").unwrap();
        assert!(mutilate < envenom);
        assert!(text.contains("(70.00%)"));
        assert!(text.contains("100.000 total damage per second."));
    }

    #[test]
    fn empty_breakdown_prints_zero_total() {
        let text = breakdown("nothing", &DpsBreakdown::new());
        assert!(text.contains("0.000 total"));
    }
}
