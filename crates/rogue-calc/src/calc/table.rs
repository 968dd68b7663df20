//! Attack tables against a raid boss or a player.
//!
//! Yellow (ability) attacks use a two-roll table: miss and dodge first, then a
//! separate crit roll for whatever lands. White (auto) attacks use a single
//! roll where glancing blows push crits off the table. Every probability is
//! clipped to [0, 1].

use super::sheet::StatSheet;

/// Base miss chance against a boss three levels higher.
const BOSS_MISS: f64 = 0.075;
/// Base dodge chance of a boss.
const BOSS_DODGE: f64 = 0.075;
/// Base spell miss against a boss.
const BOSS_SPELL_MISS: f64 = 0.15;
/// Glancing blow chance for auto attacks against a boss.
const BOSS_GLANCE: f64 = 0.24;
/// Crit chance lost against a boss.
const BOSS_CRIT_SUPPRESSION: f64 = 0.03;
/// Extra white miss from dual wielding.
const DUAL_WIELD_MISS: f64 = 0.19;

const PVP_MISS: f64 = 0.03;
const PVP_DODGE: f64 = 0.03;
const PVP_SPELL_MISS: f64 = 0.06;

/// Damage dealt by a glancing blow.
pub(crate) const GLANCE_DAMAGE: f64 = 0.75;

fn clip(p: f64) -> f64 {
    p.clamp(0.0, 1.0)
}

/// Which weapon swings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Hand {
    Main,
    Off,
}

/// Outcome of a two-roll attack.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Roll {
    /// Chance to land
    pub land: f64,
    /// Chance to crit once landed
    pub crit: f64,
}

impl Roll {
    /// Expected damage factor per attempt.
    pub fn expected(&self, crit_multiplier: f64) -> f64 {
        self.land * (1.0 + self.crit * (crit_multiplier - 1.0))
    }

    /// Chance that an attempt lands as a crit.
    pub fn crit_per_attempt(&self) -> f64 {
        self.land * self.crit
    }
}

/// Outcome of a single-roll auto attack.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct WhiteRoll {
    /// Chance to land at all (hit, glance or crit)
    pub land: f64,
    pub glance: f64,
    pub crit: f64,
}

impl WhiteRoll {
    pub fn expected(&self, crit_multiplier: f64) -> f64 {
        let hit = (self.land - self.glance - self.crit).max(0.0);
        hit + self.glance * GLANCE_DAMAGE + self.crit * crit_multiplier
    }
}

/// Miss, dodge, glance and crit chances for one target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct AttackTable {
    yellow_miss: f64,
    white_miss: f64,
    spell_miss: f64,
    mh_dodge: f64,
    oh_dodge: f64,
    glance: f64,
    crit: f64,
}

impl AttackTable {
    pub fn new(sheet: &StatSheet, is_pvp: bool) -> Self {
        let (miss, dodge, spell_miss, glance, suppression) = if is_pvp {
            (PVP_MISS, PVP_DODGE, PVP_SPELL_MISS, 0.0, 0.0)
        } else {
            (
                BOSS_MISS,
                BOSS_DODGE,
                BOSS_SPELL_MISS,
                BOSS_GLANCE,
                BOSS_CRIT_SUPPRESSION,
            )
        };
        Self {
            yellow_miss: clip(miss - sheet.hit),
            white_miss: clip(miss + DUAL_WIELD_MISS - sheet.hit),
            spell_miss: clip(spell_miss - sheet.spell_hit),
            mh_dodge: clip(dodge - sheet.mh_expertise),
            oh_dodge: clip(dodge - sheet.oh_expertise),
            glance,
            crit: clip(sheet.crit - suppression),
        }
    }

    fn dodge(&self, hand: Hand) -> f64 {
        match hand {
            Hand::Main => self.mh_dodge,
            Hand::Off => self.oh_dodge,
        }
    }

    /// Ability strike with a weapon.
    pub fn yellow(&self, hand: Hand) -> Roll {
        Roll {
            land: clip(1.0 - self.yellow_miss - self.dodge(hand)),
            crit: self.crit,
        }
    }

    /// Auto attack with a weapon.
    pub fn white(&self, hand: Hand) -> WhiteRoll {
        let land = clip(1.0 - self.white_miss - self.dodge(hand));
        let glance = self.glance.min(land);
        WhiteRoll {
            land,
            glance,
            crit: self.crit.min(land - glance),
        }
    }

    /// Nature, shadow or other magic damage that can miss.
    pub fn spell(&self) -> Roll {
        Roll {
            land: clip(1.0 - self.spell_miss),
            crit: self.crit,
        }
    }

    /// Periodic damage, which always lands once applied.
    pub fn periodic(&self) -> Roll {
        Roll {
            land: 1.0,
            crit: self.crit,
        }
    }
}
