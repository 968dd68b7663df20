//! Closed-form proc uptimes and proc damage.
//!
//! Stat procs are turned into their average stat value over the fight:
//!
//! - RPPM: `uptime = 1 − e^(−λ·d)` with `λ` procs per second, scaled by
//!   haste when the item says so;
//! - chance with internal cooldown: `uptime = d / (icd + 1/(p·a))` with `a`
//!   landed hits per second.
//!
//! Damage procs contribute `rate × expected damage` under their own name.

use armory::{CharacterContext, ProcCatalog, ProcDef, ProcEffect, ProcSchool, ProcStat, ProcTrigger};

use crate::error::CalcError;

use super::breakdown::DpsBreakdown;
use super::damage::Damage;
use super::sheet::StatBonus;
use super::table::Hand;

/// Landed-hit rates the procs are driven by.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub(crate) struct HitRates {
    /// Landed melee hits per second, autos and abilities
    pub melee: f64,
    /// Landed spell hits per second (poisons, Envenom)
    pub spell: f64,
    /// Haste multiplier in effect
    pub haste: f64,
}

/// Look up every equipped proc and weapon enchant.
///
/// # Errors
///
/// Returns [`CalcError::UnknownEffect`] for the first name the catalog does
/// not know.
pub(crate) fn resolve(ctx: &CharacterContext) -> Result<Vec<ProcDef>, CalcError> {
    let catalog = ProcCatalog::new();
    let stats = &ctx.stats;
    stats
        .procs
        .iter()
        .chain(stats.mh.enchant.as_deref())
        .chain(stats.oh.enchant.as_deref())
        .map(|name| {
            catalog
                .lookup(name)
                .ok_or_else(|| CalcError::UnknownEffect(name.to_string()))
        })
        .collect()
}

/// Triggers per second.
pub(crate) fn trigger_rate(def: &ProcDef, hits: &HitRates) -> f64 {
    match def.trigger {
        ProcTrigger::Passive => 0.0,
        ProcTrigger::Rppm { rate, haste_scaled } => {
            let haste = if haste_scaled { hits.haste } else { 1.0 };
            rate / 60.0 * haste
        }
        ProcTrigger::Chance { chance, icd } => {
            let attempts = chance * (hits.melee + hits.spell);
            if attempts <= 0.0 {
                0.0
            } else {
                1.0 / (icd + 1.0 / attempts)
            }
        }
    }
}

/// Fraction of the fight a stat proc is active.
pub(crate) fn uptime(def: &ProcDef, hits: &HitRates) -> f64 {
    match def.trigger {
        ProcTrigger::Passive => 1.0,
        ProcTrigger::Rppm { .. } => 1.0 - (-trigger_rate(def, hits) * def.duration).exp(),
        ProcTrigger::Chance { .. } => (trigger_rate(def, hits) * def.duration).min(1.0),
    }
}

/// Average stat gains from every stat proc.
pub(crate) fn stat_bonus(defs: &[ProcDef], hits: &HitRates) -> StatBonus {
    let mut bonus = StatBonus::default();
    for def in defs {
        if let ProcEffect::Stat { stat, value } = def.effect {
            let average = value * uptime(def, hits);
            match stat {
                ProcStat::Agi => bonus.agi += average,
                ProcStat::Str => bonus.str += average,
                ProcStat::AttackPower => bonus.ap += average,
                ProcStat::Crit => bonus.crit += average,
                ProcStat::Haste => bonus.haste += average,
                ProcStat::Mastery => bonus.mastery += average,
            }
        }
    }
    bonus
}

/// Add every damage proc to the breakdown.
pub(crate) fn add_damage(
    defs: &[ProcDef],
    hits: &HitRates,
    dmg: &Damage<'_>,
    breakdown: &mut DpsBreakdown,
) {
    for def in defs {
        if let ProcEffect::Damage { value, school } = def.effect {
            let per_proc = match school {
                ProcSchool::Physical => dmg.strike(Hand::Main, value),
                ProcSchool::Spell => dmg.spell(value),
            };
            breakdown.add(&def.name, trigger_rate(def, hits) * per_proc);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn def(trigger: ProcTrigger, duration: f64) -> ProcDef {
        ProcDef {
            name: "test".to_string(),
            effect: ProcEffect::Stat {
                stat: ProcStat::Agi,
                value: 1000.0,
            },
            trigger,
            duration,
        }
    }

    fn hits() -> HitRates {
        HitRates {
            melee: 3.0,
            spell: 1.0,
            haste: 1.5,
        }
    }

    #[test]
    fn rppm_uptime_is_exponential() {
        let proc = def(
            ProcTrigger::Rppm {
                rate: 1.0,
                haste_scaled: true,
            },
            10.0,
        );
        let lambda: f64 = 1.5 / 60.0;
        assert!((uptime(&proc, &hits()) - (1.0 - (-lambda * 10.0).exp())).abs() < 1e-12);
    }

    #[test]
    fn chance_uptime_respects_icd() {
        let proc = def(
            ProcTrigger::Chance {
                chance: 0.15,
                icd: 55.0,
            },
            20.0,
        );
        let expected = 20.0 / (55.0 + 1.0 / (0.15 * 4.0));
        assert!((uptime(&proc, &hits()) - expected).abs() < 1e-12);
    }

    #[test]
    fn no_hits_no_chance_procs() {
        let proc = def(
            ProcTrigger::Chance {
                chance: 0.15,
                icd: 55.0,
            },
            20.0,
        );
        assert_eq!(uptime(&proc, &HitRates::default()), 0.0);
    }

    #[test]
    fn stat_bonus_sums_by_stat() {
        let procs = vec![def(ProcTrigger::Passive, 0.0), def(ProcTrigger::Passive, 0.0)];
        let bonus = stat_bonus(&procs, &hits());
        assert_eq!(bonus.agi, 2000.0);
        assert_eq!(bonus.mastery, 0.0);
    }
}
