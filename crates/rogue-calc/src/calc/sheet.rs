//! Derived combat stats.
//!
//! Converts the character's gear totals into percentages, multipliers and
//! target mitigation using the level's rating conversions, then folds in raid
//! buffs, racial traits, consumables and the average value of anything that
//! is only up for part of the fight (potions, racial cooldowns, Bloodlust,
//! proc uptimes).

use armory::buffs::{SHORT_TERM_HASTE, SHORT_TERM_HASTE_COOLDOWN, SHORT_TERM_HASTE_DURATION};
use armory::{Buffs, CharacterContext, RacialCooldown};

use crate::config::{Settings, Spec};
use crate::error::CalcError;

use super::timing::cooldown_uptime;

/// Armor of a raid boss three levels above the player.
pub(crate) const BOSS_ARMOR: f64 = 24_835.0;

/// Base mastery points before rating.
const BASE_MASTERY: f64 = 8.0;
/// Crit damage multiplier of melee and spells.
const BASE_CRIT_MULTIPLIER: f64 = 2.0;

/// Subtlety's agility bonus.
const SINISTER_CALLING: f64 = 1.30;
/// Combat's attack power bonus.
const VITALITY_ATTACK_POWER: f64 = 1.40;

/// Stat gains averaged over the fight, added on top of gear.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub(crate) struct StatBonus {
    pub agi: f64,
    pub str: f64,
    pub ap: f64,
    pub crit: f64,
    pub haste: f64,
    pub mastery: f64,
}

/// Everything the rotation and damage formulas read.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct StatSheet {
    pub agi: f64,
    pub ap: f64,
    /// Melee and spell crit chance before crit suppression
    pub crit: f64,
    /// Melee hit chance bonus
    pub hit: f64,
    /// Spell hit chance bonus; expertise counts toward it
    pub spell_hit: f64,
    pub mh_expertise: f64,
    pub oh_expertise: f64,
    /// Multiplier on attack speed and energy regeneration
    pub haste: f64,
    /// Mastery points
    pub mastery: f64,
    pub crit_multiplier: f64,
    /// Target-side multiplier on physical damage (buffs only, not armor)
    pub physical_multiplier: f64,
    /// Target-side multiplier on magic damage
    pub spell_multiplier: f64,
    /// Target armor after debuffs
    pub armor: f64,
    armor_constant: f64,
}

impl StatSheet {
    /// Build the sheet for a spec.
    ///
    /// # Errors
    ///
    /// Fails when the `target_armor` advanced parameter is not a
    /// non-negative number.
    pub fn build(
        ctx: &CharacterContext,
        settings: &Settings,
        bonus: &StatBonus,
    ) -> Result<Self, CalcError> {
        let stats = &ctx.stats;
        let buffs = ctx.buffs;
        let race = ctx.race;
        let ratings = ctx.level.ratings();
        let fight = settings.duration();

        let spec_agility = if settings.spec() == Spec::Subtlety {
            SINISTER_CALLING
        } else {
            1.0
        };
        let agi = (stats.agi
            + race.agility_offset()
            + buffs.consumable_agility(race.food_multiplier())
            + stats.gear_buffs.average_potion_agility(fight)
            + bonus.agi)
            * stats.gear_buffs.agility_multiplier()
            * buffs.stat_multiplier()
            * spec_agility;
        let str = (stats.str + bonus.str) * buffs.stat_multiplier();

        let mut racial_ap = 0.0;
        let mut racial_haste = 0.0;
        match race.cooldown() {
            Some(RacialCooldown::AttackPower {
                value,
                duration,
                cooldown,
            }) => racial_ap = value * cooldown_uptime(duration, cooldown, fight),
            Some(RacialCooldown::Haste {
                value,
                duration,
                cooldown,
            }) => racial_haste = value * cooldown_uptime(duration, cooldown, fight),
            Some(RacialCooldown::Energy { .. }) | None => {}
        }

        let spec_ap = if settings.spec() == Spec::Combat {
            VITALITY_ATTACK_POWER
        } else {
            1.0
        };
        let ap = (2.0 * agi + str + stats.ap + bonus.ap + racial_ap)
            * buffs.attack_power_multiplier()
            * spec_ap;

        let crit = agi / ratings.agi_per_crit / 100.0
            + (stats.crit + bonus.crit) / ratings.crit / 100.0
            + buffs.crit_chance_bonus()
            + race.passive_crit();

        let hit = stats.hit / ratings.hit / 100.0;
        let expertise = stats.exp / ratings.expertise / 100.0;

        let lust = if buffs.contains(Buffs::SHORT_TERM_HASTE_BUFF) {
            SHORT_TERM_HASTE
                * cooldown_uptime(
                    SHORT_TERM_HASTE_DURATION,
                    SHORT_TERM_HASTE_COOLDOWN,
                    fight,
                )
        } else {
            0.0
        };
        let haste = (1.0 + (stats.haste + bonus.haste) / ratings.haste / 100.0)
            * buffs.melee_haste_multiplier()
            * (1.0 + race.passive_haste())
            * (1.0 + lust)
            * (1.0 + racial_haste);

        let mastery = BASE_MASTERY
            + (stats.mastery + buffs.mastery_rating_bonus() + bonus.mastery) / ratings.mastery;

        let base_armor = match settings.adv_params().get("target_armor") {
            Some(text) => text
                .parse::<f64>()
                .ok()
                .filter(|armor| armor.is_finite() && *armor >= 0.0)
                .ok_or_else(|| CalcError::InvalidAdvParam {
                    key: "target_armor".to_string(),
                    value: text.to_string(),
                })?,
            None => BOSS_ARMOR,
        };

        Ok(Self {
            agi,
            ap,
            crit,
            hit,
            spell_hit: hit + expertise,
            mh_expertise: expertise + race.expertise_bonus(stats.mh.kind),
            oh_expertise: expertise + race.expertise_bonus(stats.oh.kind),
            haste,
            mastery,
            crit_multiplier: BASE_CRIT_MULTIPLIER * stats.gear_buffs.crit_damage_multiplier(),
            physical_multiplier: buffs.physical_damage_multiplier(),
            spell_multiplier: buffs.spell_damage_multiplier(),
            armor: base_armor * (1.0 - buffs.armor_reduction()),
            armor_constant: ctx.level.armor_constant(),
        })
    }

    /// Fraction of physical damage that gets through armor, with an extra
    /// fraction of armor ignored.
    pub fn armor_multiplier(&self, ignored: f64) -> f64 {
        let armor = self.armor * (1.0 - ignored.clamp(0.0, 1.0));
        1.0 - armor / (armor + self.armor_constant)
    }
}
