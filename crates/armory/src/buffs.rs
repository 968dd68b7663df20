//! Raid-wide buffs, target debuffs and consumables.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::error::ArmoryError;

bitflags! {
    /// Set of active raid buffs and debuffs.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct Buffs: u32 {
        const SHORT_TERM_HASTE_BUFF         = 1 << 0;
        const STAT_MULTIPLIER_BUFF          = 1 << 1;
        const CRIT_CHANCE_BUFF              = 1 << 2;
        const MASTERY_BUFF                  = 1 << 3;
        const MELEE_HASTE_BUFF              = 1 << 4;
        const ATTACK_POWER_BUFF             = 1 << 5;
        const SPELL_HASTE_BUFF              = 1 << 6;
        const ARMOR_DEBUFF                  = 1 << 7;
        const PHYSICAL_VULNERABILITY_DEBUFF = 1 << 8;
        const SPELL_DAMAGE_DEBUFF           = 1 << 9;
        const AGI_FLASK_MOP                 = 1 << 10;
        const FOOD_300_AGI                  = 1 << 11;
    }
}

const BUFF_NAMES: [(&str, Buffs); 12] = [
    ("short_term_haste_buff", Buffs::SHORT_TERM_HASTE_BUFF),
    ("stat_multiplier_buff", Buffs::STAT_MULTIPLIER_BUFF),
    ("crit_chance_buff", Buffs::CRIT_CHANCE_BUFF),
    ("mastery_buff", Buffs::MASTERY_BUFF),
    ("melee_haste_buff", Buffs::MELEE_HASTE_BUFF),
    ("attack_power_buff", Buffs::ATTACK_POWER_BUFF),
    ("spell_haste_buff", Buffs::SPELL_HASTE_BUFF),
    ("armor_debuff", Buffs::ARMOR_DEBUFF),
    ("physical_vulnerability_debuff", Buffs::PHYSICAL_VULNERABILITY_DEBUFF),
    ("spell_damage_debuff", Buffs::SPELL_DAMAGE_DEBUFF),
    ("agi_flask_mop", Buffs::AGI_FLASK_MOP),
    ("food_300_agi", Buffs::FOOD_300_AGI),
];

/// Bloodlust-style haste: 30% for 40 seconds, once every 10 minutes.
pub const SHORT_TERM_HASTE: f64 = 0.30;
/// Duration of the short-term haste buff.
pub const SHORT_TERM_HASTE_DURATION: f64 = 40.0;
/// Cooldown of the short-term haste buff (the exhaustion debuff).
pub const SHORT_TERM_HASTE_COOLDOWN: f64 = 600.0;

impl Buffs {
    /// Look up a single buff by name.
    ///
    /// # Errors
    ///
    /// Returns [`ArmoryError::UnknownBuff`] if the name is not known.
    pub fn from_name(name: &str) -> Result<Self, ArmoryError> {
        BUFF_NAMES
            .iter()
            .find(|(known, _)| *known == name)
            .map(|(_, flag)| *flag)
            .ok_or_else(|| ArmoryError::UnknownBuff(name.to_string()))
    }

    /// Build a set from names.
    ///
    /// # Errors
    ///
    /// Fails on the first unknown name.
    pub fn from_names<'a, I>(names: I) -> Result<Self, ArmoryError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        names
            .into_iter()
            .try_fold(Self::empty(), |acc, name| Ok(acc | Self::from_name(name)?))
    }

    /// Names of the active buffs.
    #[must_use]
    pub fn names(self) -> Vec<&'static str> {
        BUFF_NAMES
            .iter()
            .filter(|(_, flag)| self.contains(*flag))
            .map(|(name, _)| *name)
            .collect()
    }

    /// Multiplier on strength and agility.
    #[must_use]
    pub fn stat_multiplier(self) -> f64 {
        if self.contains(Self::STAT_MULTIPLIER_BUFF) {
            1.05
        } else {
            1.0
        }
    }

    /// Multiplier on attack power.
    #[must_use]
    pub fn attack_power_multiplier(self) -> f64 {
        if self.contains(Self::ATTACK_POWER_BUFF) {
            1.10
        } else {
            1.0
        }
    }

    /// Flat crit chance added by the raid.
    #[must_use]
    pub fn crit_chance_bonus(self) -> f64 {
        if self.contains(Self::CRIT_CHANCE_BUFF) {
            0.05
        } else {
            0.0
        }
    }

    /// Flat mastery rating added by the raid.
    #[must_use]
    pub fn mastery_rating_bonus(self) -> f64 {
        if self.contains(Self::MASTERY_BUFF) {
            3000.0
        } else {
            0.0
        }
    }

    /// Permanent melee haste multiplier.
    #[must_use]
    pub fn melee_haste_multiplier(self) -> f64 {
        if self.contains(Self::MELEE_HASTE_BUFF) {
            1.10
        } else {
            1.0
        }
    }

    /// Fraction of target armor removed.
    #[must_use]
    pub fn armor_reduction(self) -> f64 {
        if self.contains(Self::ARMOR_DEBUFF) {
            0.12
        } else {
            0.0
        }
    }

    /// Multiplier on physical damage taken by the target.
    #[must_use]
    pub fn physical_damage_multiplier(self) -> f64 {
        if self.contains(Self::PHYSICAL_VULNERABILITY_DEBUFF) {
            1.04
        } else {
            1.0
        }
    }

    /// Multiplier on spell (nature, shadow) damage taken by the target.
    #[must_use]
    pub fn spell_damage_multiplier(self) -> f64 {
        if self.contains(Self::SPELL_DAMAGE_DEBUFF) {
            1.05
        } else {
            1.0
        }
    }

    /// Flat agility from flask and food. `food_multiplier` doubles food for
    /// races that get more out of it.
    #[must_use]
    pub fn consumable_agility(self, food_multiplier: f64) -> f64 {
        let mut agility = 0.0;
        if self.contains(Self::AGI_FLASK_MOP) {
            agility += 1000.0;
        }
        if self.contains(Self::FOOD_300_AGI) {
            agility += 300.0 * food_multiplier;
        }
        agility
    }
}
