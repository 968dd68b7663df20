//! Ranking discrete options by the DPS they add.
//!
//! Each option is applied on its own to a fresh copy of the baseline
//! character, and its value is `DPS(with option) − DPS(baseline)` using the
//! phase-merged total. Options do not interact beyond what
//! [`CharacterContext::with_option`] composes.

use armory::{CharacterContext, ContextOption, GearBuffs, Glyph, Talent, TIER_COUNT};
use rayon::prelude::*;
use serde::Serialize;
use tracing::debug;

use crate::calc::DamageCalculator;
use crate::config::Settings;
use crate::error::CalcError;

/// One ranked option.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankEntry {
    /// Option label
    pub label: String,
    /// DPS gained over the baseline (negative if it loses DPS)
    pub delta: f64,
}

/// Options sorted by DPS gained, highest first.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Ranking {
    entries: Vec<RankEntry>,
}

impl Ranking {
    /// Entries, highest first.
    #[must_use]
    pub fn entries(&self) -> &[RankEntry] {
        &self.entries
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Delta of an option by label.
    #[must_use]
    pub fn get(&self, label: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|entry| entry.label == label)
            .map(|entry| entry.delta)
    }

    /// Entries, highest first.
    pub fn iter(&self) -> impl Iterator<Item = &RankEntry> {
        self.entries.iter()
    }
}

/// Talent ranking for one tier.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TierRanking {
    /// Zero-based tier
    pub tier: usize,
    /// The tier's talents against the tier left empty
    pub ranking: Ranking,
}

// ============================================================================
// Core
// ============================================================================

/// Rank options against a baseline character.
///
/// Returns exactly one entry per option. Entries are sorted by delta,
/// highest first; equal deltas keep the order they were given in.
///
/// # Errors
///
/// - [`CalcError::EmptyOptions`] if `options` is empty.
/// - Any error of [`compute_breakdown`](crate::compute_breakdown).
pub fn rank_options(
    settings: &Settings,
    ctx: &CharacterContext,
    options: &[ContextOption],
) -> Result<Ranking, CalcError> {
    if options.is_empty() {
        return Err(CalcError::EmptyOptions);
    }
    let baseline = DamageCalculator::new(settings, ctx).total_dps()?;

    let mut entries = options
        .par_iter()
        .map(|option| {
            let modified = ctx.with_option(option);
            let dps = DamageCalculator::new(settings, &modified).total_dps()?;
            Ok(RankEntry {
                label: option.label(),
                delta: dps - baseline,
            })
        })
        .collect::<Result<Vec<_>, CalcError>>()?;
    entries.sort_by(|a, b| b.delta.total_cmp(&a.delta));

    debug!(baseline, options = entries.len(), "ranked options");
    Ok(Ranking { entries })
}

// ============================================================================
// Convenience rankings
// ============================================================================

/// For every tier, clear the tier and rank its three talents against the
/// empty tier.
///
/// # Errors
///
/// Any error of [`compute_breakdown`](crate::compute_breakdown).
pub fn talents_ranking(
    settings: &Settings,
    ctx: &CharacterContext,
) -> Result<Vec<TierRanking>, CalcError> {
    (0..TIER_COUNT)
        .filter_map(|tier| Talent::tier_choices(tier).map(|choices| (tier, choices)))
        .map(|(tier, choices)| {
            let baseline = CharacterContext {
                talents: ctx.talents.without_tier(tier),
                ..ctx.clone()
            };
            let options: Vec<_> = choices.iter().map(|t| ContextOption::Talent(*t)).collect();
            Ok(TierRanking {
                tier,
                ranking: rank_options(settings, &baseline, &options)?,
            })
        })
        .collect()
}

/// Rank glyphs against the character with none of them active.
///
/// # Errors
///
/// - [`CalcError::EmptyOptions`] if `glyphs` is empty.
/// - Any error of [`compute_breakdown`](crate::compute_breakdown).
pub fn glyphs_ranking(
    settings: &Settings,
    ctx: &CharacterContext,
    glyphs: &[Glyph],
) -> Result<Ranking, CalcError> {
    let baseline = CharacterContext {
        glyphs: glyphs
            .iter()
            .fold(ctx.glyphs.clone(), |active, glyph| active.without_glyph(*glyph)),
        ..ctx.clone()
    };
    let options: Vec<_> = glyphs.iter().map(|g| ContextOption::Glyph(*g)).collect();
    rank_options(settings, &baseline, &options)
}

/// Rank trinkets and other procs against the character wearing none of them.
///
/// # Errors
///
/// - [`CalcError::EmptyOptions`] if `candidates` is empty.
/// - [`CalcError::UnknownEffect`] for a name the proc catalog does not know.
/// - Any other error of [`compute_breakdown`](crate::compute_breakdown).
pub fn trinkets_ranking(
    settings: &Settings,
    ctx: &CharacterContext,
    candidates: &[&str],
) -> Result<Ranking, CalcError> {
    let mut baseline = ctx.clone();
    baseline.stats.procs = candidates
        .iter()
        .fold(ctx.stats.procs.clone(), |procs, name| procs.without_proc(name));
    let options: Vec<_> = candidates
        .iter()
        .map(|name| ContextOption::Proc((*name).to_string()))
        .collect();
    rank_options(settings, &baseline, &options)
}

/// DPS value of gear buffs (set bonuses, meta gem, potions) against the
/// character without any of them.
///
/// # Errors
///
/// - [`CalcError::EmptyOptions`] if `gear_buffs` is empty.
/// - Any error of [`compute_breakdown`](crate::compute_breakdown).
pub fn other_ep(
    settings: &Settings,
    ctx: &CharacterContext,
    gear_buffs: &[GearBuffs],
) -> Result<Ranking, CalcError> {
    let mut baseline = ctx.clone();
    for flags in gear_buffs {
        baseline.stats.gear_buffs.remove(*flags);
    }
    let options: Vec<_> = gear_buffs.iter().map(|b| ContextOption::GearBuff(*b)).collect();
    rank_options(settings, &baseline, &options)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_by_label() {
        let ranking = Ranking {
            entries: vec![
                RankEntry {
                    label: "anticipation".to_string(),
                    delta: 120.0,
                },
                RankEntry {
                    label: "marked_for_death".to_string(),
                    delta: 80.0,
                },
            ],
        };
        assert_eq!(ranking.get("marked_for_death"), Some(80.0));
        assert_eq!(ranking.get("subterfuge"), None);
        assert_eq!(ranking.len(), 2);
    }
}
