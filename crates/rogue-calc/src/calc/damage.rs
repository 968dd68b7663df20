//! Expected damage per use.
//!
//! Each helper multiplies a base amount by the multiplier chain of its school
//! and by the expected outcome of the matching attack-table roll.

use super::sheet::StatSheet;
use super::table::{AttackTable, Hand, Roll};

/// Off-hand damage after Ambidexterity.
pub(crate) const OFF_HAND_PENALTY: f64 = 0.875;

/// Damage calculator for one stat sheet, with multipliers that apply to
/// every source the spec controls.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Damage<'a> {
    sheet: &'a StatSheet,
    table: AttackTable,
    armor: f64,
    global: f64,
}

impl<'a> Damage<'a> {
    pub fn new(sheet: &'a StatSheet, table: AttackTable) -> Self {
        Self {
            sheet,
            table,
            armor: sheet.armor_multiplier(0.0),
            global: 1.0,
        }
    }

    /// Same calculator with an extra multiplier on everything.
    #[must_use]
    pub fn scaled(self, multiplier: f64) -> Self {
        Self {
            global: self.global * multiplier,
            ..self
        }
    }

    /// Same calculator with a blended armor multiplier.
    #[must_use]
    pub fn with_armor_multiplier(self, armor: f64) -> Self {
        Self { armor, ..self }
    }

    pub fn ap(&self) -> f64 {
        self.sheet.ap
    }

    fn physical(&self) -> f64 {
        self.global * self.sheet.physical_multiplier * self.armor
    }

    fn magic(&self) -> f64 {
        self.global * self.sheet.spell_multiplier
    }

    /// Weapon strike from an ability.
    pub fn strike(&self, hand: Hand, base: f64) -> f64 {
        base * self.physical() * self.table.yellow(hand).expected(self.sheet.crit_multiplier)
    }

    /// Auto attack.
    pub fn auto(&self, hand: Hand, base: f64) -> f64 {
        base * self.physical() * self.table.white(hand).expected(self.sheet.crit_multiplier)
    }

    /// Magic damage that uses a weapon roll, such as Shadow Blades swings.
    pub fn shadow_strike(&self, hand: Hand, base: f64) -> f64 {
        base * self.magic() * self.table.yellow(hand).expected(self.sheet.crit_multiplier)
    }

    /// Nature damage that can miss.
    pub fn spell(&self, base: f64) -> f64 {
        self.spell_with(self.table.spell(), base)
    }

    /// Nature damage with a custom roll.
    pub fn spell_with(&self, roll: Roll, base: f64) -> f64 {
        base * self.magic() * roll.expected(self.sheet.crit_multiplier)
    }

    /// One bleed tick. Bleeds ignore armor.
    pub fn bleed(&self, base: f64) -> f64 {
        base * self.global
            * self.sheet.physical_multiplier
            * self.table.periodic().expected(self.sheet.crit_multiplier)
    }

    /// One poison tick.
    pub fn poison_tick(&self, base: f64) -> f64 {
        base * self.magic() * self.table.periodic().expected(self.sheet.crit_multiplier)
    }
}
