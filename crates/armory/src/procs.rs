//! Trinkets, weapon enchants and other proc-based effects.
//!
//! The character only carries proc *names*. Definitions live in the
//! [`ProcCatalog`], which the damage model consults when it needs the numbers,
//! so an unknown name surfaces as an error at calculation time.
//!
//! Item names may carry a raid-difficulty prefix (`lfr_`, `flex_`, `war_`,
//! `heroic_`, `heroic_war_`, `thunder_`, `heroic_thunder_`, `timeless_`) that
//! scales the base value of the effect.

use serde::{Deserialize, Serialize};

/// Stat raised by a proc.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcStat {
    /// Agility
    Agi,
    /// Strength
    Str,
    /// Attack power
    AttackPower,
    /// Crit rating
    Crit,
    /// Haste rating
    Haste,
    /// Mastery rating
    Mastery,
}

/// Damage school of a damaging proc.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcSchool {
    /// Mitigated by armor, uses the melee table
    Physical,
    /// Uses the spell table
    Spell,
}

/// What the proc does when it fires.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ProcEffect {
    /// Raises a stat for `duration` seconds.
    Stat {
        /// Stat raised
        stat: ProcStat,
        /// Amount raised
        value: f64,
    },
    /// Deals damage once per trigger.
    Damage {
        /// Damage per trigger
        value: f64,
        /// Damage school
        school: ProcSchool,
    },
}

/// How often the proc fires.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ProcTrigger {
    /// Always active.
    Passive,
    /// Real procs per minute, optionally scaled by haste.
    Rppm {
        /// Procs per minute
        rate: f64,
        /// Whether melee haste raises the rate
        haste_scaled: bool,
    },
    /// Flat chance per landed hit with an internal cooldown.
    Chance {
        /// Chance per landed hit
        chance: f64,
        /// Internal cooldown in seconds
        icd: f64,
    },
}

/// A resolved proc definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcDef {
    /// Name as it appeared in the procs list, tier prefix included
    pub name: String,
    /// Effect of each trigger
    pub effect: ProcEffect,
    /// Trigger rule
    pub trigger: ProcTrigger,
    /// Buff duration in seconds (ignored for damage procs)
    pub duration: f64,
}

struct BaseProc {
    name: &'static str,
    effect: ProcEffect,
    trigger: ProcTrigger,
    duration: f64,
}

const fn stat(stat: ProcStat, value: f64) -> ProcEffect {
    ProcEffect::Stat { stat, value }
}

const fn rppm(rate: f64, haste_scaled: bool) -> ProcTrigger {
    ProcTrigger::Rppm { rate, haste_scaled }
}

const fn chance(chance: f64, icd: f64) -> ProcTrigger {
    ProcTrigger::Chance { chance, icd }
}

const BASE_PROCS: [BaseProc; 19] = [
    BaseProc {
        name: "assurance_of_consequence",
        effect: stat(ProcStat::Agi, 1624.0),
        trigger: ProcTrigger::Passive,
        duration: 0.0,
    },
    BaseProc {
        name: "haromms_talisman",
        effect: stat(ProcStat::Agi, 3500.0),
        trigger: rppm(0.92, true),
        duration: 10.0,
    },
    BaseProc {
        name: "sigil_of_rampage",
        effect: stat(ProcStat::Agi, 5940.0),
        trigger: chance(0.15, 85.0),
        duration: 15.0,
    },
    BaseProc {
        name: "ticking_ebon_detonator",
        effect: stat(ProcStat::Agi, 2900.0),
        trigger: rppm(1.0, true),
        duration: 10.0,
    },
    BaseProc {
        name: "thoks_tail_tip",
        effect: stat(ProcStat::Str, 5940.0),
        trigger: chance(0.15, 115.0),
        duration: 20.0,
    },
    BaseProc {
        name: "discipline_of_xuen",
        effect: stat(ProcStat::Mastery, 6121.0),
        trigger: chance(0.15, 115.0),
        duration: 20.0,
    },
    BaseProc {
        name: "fury_of_xuen",
        effect: ProcEffect::Damage {
            value: 21000.0,
            school: ProcSchool::Physical,
        },
        trigger: rppm(1.55, true),
        duration: 0.0,
    },
    BaseProc {
        name: "rune_of_re_origination",
        effect: stat(ProcStat::Mastery, 7000.0),
        trigger: rppm(1.1, true),
        duration: 10.0,
    },
    BaseProc {
        name: "bad_juju",
        effect: stat(ProcStat::Agi, 4583.0),
        trigger: chance(0.15, 105.0),
        duration: 20.0,
    },
    BaseProc {
        name: "talisman_of_bloodlust",
        effect: stat(ProcStat::Haste, 2950.0),
        trigger: rppm(3.5, true),
        duration: 10.0,
    },
    BaseProc {
        name: "renatakis_soul_charm",
        effect: stat(ProcStat::Agi, 2900.0),
        trigger: rppm(1.21, true),
        duration: 20.0,
    },
    BaseProc {
        name: "vicious_talisman_of_the_shado-pan_assault",
        effect: stat(ProcStat::Agi, 8800.0),
        trigger: chance(0.15, 115.0),
        duration: 20.0,
    },
    BaseProc {
        name: "bottle_of_infinite_stars",
        effect: stat(ProcStat::Agi, 3653.0),
        trigger: chance(0.15, 55.0),
        duration: 20.0,
    },
    BaseProc {
        name: "terror_in_the_mists",
        effect: stat(ProcStat::Crit, 7796.0),
        trigger: chance(0.15, 115.0),
        duration: 20.0,
    },
    BaseProc {
        name: "relic_of_xuen",
        effect: stat(ProcStat::Agi, 3027.0),
        trigger: chance(0.20, 55.0),
        duration: 15.0,
    },
    BaseProc {
        name: "legendary_capacitive_meta",
        effect: ProcEffect::Damage {
            value: 26000.0,
            school: ProcSchool::Spell,
        },
        trigger: rppm(3.85, true),
        duration: 0.0,
    },
    BaseProc {
        name: "dancing_steel",
        effect: stat(ProcStat::Agi, 1650.0),
        trigger: rppm(2.53, false),
        duration: 12.0,
    },
    BaseProc {
        name: "elemental_force",
        effect: ProcEffect::Damage {
            value: 3000.0,
            school: ProcSchool::Spell,
        },
        trigger: rppm(9.17, true),
        duration: 0.0,
    },
    BaseProc {
        name: "blood_fury_attack_power",
        effect: stat(ProcStat::AttackPower, 4514.0),
        trigger: chance(1.0, 120.0),
        duration: 15.0,
    },
];

/// Difficulty prefixes, longest first so `heroic_war_` wins over `heroic_`.
const TIER_PREFIXES: [(&str, f64); 8] = [
    ("heroic_thunder_", 1.19),
    ("heroic_war_", 1.19),
    ("heroic_", 1.12),
    ("thunder_", 1.06),
    ("war_", 1.06),
    ("flex_", 0.95),
    ("timeless_", 0.90),
    ("lfr_", 0.89),
];

/// Lookup of proc definitions by name.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcCatalog;

impl ProcCatalog {
    /// Create the catalog.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Resolve a proc name, applying any difficulty prefix.
    ///
    /// Returns `None` when neither the name nor its unprefixed form is known.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<ProcDef> {
        let (scale, base_name) = TIER_PREFIXES
            .iter()
            .find_map(|(prefix, scale)| {
                name.strip_prefix(prefix)
                    .filter(|rest| Self::base(rest).is_some())
                    .map(|rest| (*scale, rest))
            })
            .unwrap_or((1.0, name));
        let base = Self::base(base_name)?;
        let effect = match base.effect {
            ProcEffect::Stat { stat, value } => ProcEffect::Stat {
                stat,
                value: value * scale,
            },
            ProcEffect::Damage { value, school } => ProcEffect::Damage {
                value: value * scale,
                school,
            },
        };
        Some(ProcDef {
            name: name.to_string(),
            effect,
            trigger: base.trigger,
            duration: base.duration,
        })
    }

    /// Names of every base item in the catalog.
    pub fn base_names(&self) -> impl Iterator<Item = &'static str> {
        BASE_PROCS.iter().map(|proc| proc.name)
    }

    fn base(name: &str) -> Option<&'static BaseProc> {
        BASE_PROCS.iter().find(|proc| proc.name == name)
    }
}

/// Names of the procs a character has equipped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProcsList {
    names: Vec<String>,
}

impl ProcsList {
    /// Build from names. Names are not validated here.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    /// Whether a proc is equipped.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|known| known == name)
    }

    /// Copy with an extra proc; unchanged if already present.
    #[must_use]
    pub fn with_proc(&self, name: &str) -> Self {
        let mut procs = self.clone();
        if !procs.contains(name) {
            procs.names.push(name.to_string());
        }
        procs
    }

    /// Copy without a proc.
    #[must_use]
    pub fn without_proc(&self, name: &str) -> Self {
        Self {
            names: self
                .names
                .iter()
                .filter(|known| *known != name)
                .cloned()
                .collect(),
        }
    }

    /// Names in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// Number of procs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether the list is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn looks_up_base_item() {
        let catalog = ProcCatalog::new();
        let proc = catalog.lookup("fury_of_xuen").unwrap();
        assert_eq!(proc.name, "fury_of_xuen");
        assert!(matches!(
            proc.effect,
            ProcEffect::Damage {
                school: ProcSchool::Physical,
                ..
            }
        ));
    }

    #[test]
    fn difficulty_prefix_scales_value() {
        let catalog = ProcCatalog::new();
        let base = catalog.lookup("haromms_talisman").unwrap();
        let heroic_war = catalog.lookup("heroic_war_haromms_talisman").unwrap();
        let lfr = catalog.lookup("lfr_haromms_talisman").unwrap();
        let value = |def: &ProcDef| match def.effect {
            ProcEffect::Stat { value, .. } => value,
            ProcEffect::Damage { value, .. } => value,
        };
        assert!((value(&heroic_war) / value(&base) - 1.19).abs() < 1e-9);
        assert!((value(&lfr) / value(&base) - 0.89).abs() < 1e-9);
        assert_eq!(heroic_war.trigger, base.trigger);
    }

    #[test]
    fn every_base_name_resolves_with_prefixes() {
        let catalog = ProcCatalog::new();
        for name in catalog.base_names() {
            assert!(catalog.lookup(name).is_some(), "{name}");
            assert!(catalog.lookup(&format!("heroic_{name}")).is_some(), "{name}");
        }
    }

    #[test]
    fn unknown_names_are_none() {
        let catalog = ProcCatalog::new();
        assert!(catalog.lookup("heroic_war_mirror_of_nothing").is_none());
        assert!(catalog.lookup("").is_none());
    }

    #[test]
    fn procs_list_copies() {
        let procs = ProcsList::new(["fury_of_xuen"]);
        let more = procs.with_proc("relic_of_xuen");
        assert_eq!(more.len(), 2);
        assert_eq!(procs.len(), 1);
        assert_eq!(more.with_proc("relic_of_xuen").len(), 2);
        assert_eq!(more.without_proc("relic_of_xuen"), procs);
    }
}
