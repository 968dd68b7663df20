//! Stat blocks, weapons and the attributes that EP is computed for.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ArmoryError;
use crate::gear::GearBuffs;
use crate::procs::ProcsList;

/// Weapon class, which decides normalization and racial expertise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeaponKind {
    /// Daggers (normalized speed 1.7)
    Dagger,
    /// One-handed swords
    Sword,
    /// One-handed maces
    Mace,
    /// One-handed axes
    Axe,
    /// Fist weapons
    Fist,
}

impl WeaponKind {
    /// Speed used by normalized weapon strikes.
    #[must_use]
    pub const fn normalized_speed(self) -> f64 {
        match self {
            Self::Dagger => 1.7,
            _ => 2.4,
        }
    }

    /// Lowercase name of the weapon kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Dagger => "dagger",
            Self::Sword => "sword",
            Self::Mace => "mace",
            Self::Axe => "axe",
            Self::Fist => "fist",
        }
    }
}

impl FromStr for WeaponKind {
    type Err = ArmoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dagger" => Ok(Self::Dagger),
            "sword" | "1h_sword" => Ok(Self::Sword),
            "mace" | "1h_mace" => Ok(Self::Mace),
            "axe" | "1h_axe" => Ok(Self::Axe),
            "fist" => Ok(Self::Fist),
            other => Err(ArmoryError::UnknownWeaponKind(other.to_string())),
        }
    }
}

/// A single weapon.
///
/// `damage` is the average damage of one swing before attack power, and
/// `enchant` is an optional enchant name resolved against the proc catalog
/// when damage is calculated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Weapon {
    /// Average weapon damage per swing
    pub damage: f64,
    /// Swing time in seconds
    pub speed: f64,
    /// Weapon class
    pub kind: WeaponKind,
    /// Enchant name, if any
    #[serde(default)]
    pub enchant: Option<String>,
}

impl Weapon {
    /// Create a weapon.
    #[must_use]
    pub fn new(damage: f64, speed: f64, kind: WeaponKind, enchant: Option<&str>) -> Self {
        Self {
            damage,
            speed,
            kind,
            enchant: enchant.map(str::to_string),
        }
    }

    /// Weapon damage per second.
    #[must_use]
    pub fn dps(&self) -> f64 {
        self.damage / self.speed
    }

    /// Whether this is a dagger.
    #[must_use]
    pub fn is_dagger(&self) -> bool {
        self.kind == WeaponKind::Dagger
    }

    /// Damage of an auto-attack swing at the given attack power.
    #[must_use]
    pub fn swing_damage(&self, attack_power: f64) -> f64 {
        self.damage + self.speed * attack_power / 14.0
    }

    /// Damage of a normalized weapon strike at the given attack power.
    #[must_use]
    pub fn normalized_damage(&self, attack_power: f64) -> f64 {
        self.damage + self.kind.normalized_speed() * attack_power / 14.0
    }
}

/// Attributes that can be perturbed to compute equivalence points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Attribute {
    /// Strength
    Str,
    /// Agility
    Agi,
    /// Bonus attack power
    Ap,
    /// Crit rating
    Crit,
    /// Hit rating
    Hit,
    /// Expertise rating
    Exp,
    /// Haste rating
    Haste,
    /// Mastery rating
    Mastery,
    /// Stamina
    Stam,
    /// Main-hand weapon damage per second
    MhDps,
    /// Off-hand weapon damage per second
    OhDps,
}

impl Attribute {
    /// Every attribute, in reporting order.
    pub const ALL: [Attribute; 11] = [
        Attribute::Agi,
        Attribute::Str,
        Attribute::Ap,
        Attribute::Crit,
        Attribute::Hit,
        Attribute::Exp,
        Attribute::Haste,
        Attribute::Mastery,
        Attribute::Stam,
        Attribute::MhDps,
        Attribute::OhDps,
    ];

    /// Short lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Str => "str",
            Self::Agi => "agi",
            Self::Ap => "ap",
            Self::Crit => "crit",
            Self::Hit => "hit",
            Self::Exp => "exp",
            Self::Haste => "haste",
            Self::Mastery => "mastery",
            Self::Stam => "stam",
            Self::MhDps => "mh_dps",
            Self::OhDps => "oh_dps",
        }
    }

    /// Finite-difference step used when computing EP for this attribute.
    #[must_use]
    pub const fn default_delta(self) -> f64 {
        match self {
            Self::MhDps | Self::OhDps => 1.0,
            _ => 10.0,
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Attribute {
    type Err = ArmoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|attribute| attribute.as_str() == s)
            .ok_or_else(|| ArmoryError::UnknownAttribute(s.to_string()))
    }
}

/// Gear-derived stat totals plus weapons, procs and gear buffs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stats {
    /// Strength
    pub str: f64,
    /// Agility
    pub agi: f64,
    /// Stamina
    pub stam: f64,
    /// Bonus attack power from gear
    #[serde(default)]
    pub ap: f64,
    /// Crit rating
    pub crit: f64,
    /// Hit rating
    pub hit: f64,
    /// Expertise rating
    pub exp: f64,
    /// Haste rating
    pub haste: f64,
    /// Mastery rating
    pub mastery: f64,
    /// Main-hand weapon
    pub mh: Weapon,
    /// Off-hand weapon
    pub oh: Weapon,
    /// Active procs (trinkets, meta gems, special effects)
    #[serde(default)]
    pub procs: ProcsList,
    /// Set bonuses, consumables and similar
    #[serde(default)]
    pub gear_buffs: GearBuffs,
}

impl Stats {
    /// Create a stat block with no bonus attack power.
    #[allow(clippy::too_many_arguments)]
    #[must_use]
    pub fn new(
        mh: Weapon,
        oh: Weapon,
        procs: ProcsList,
        gear_buffs: GearBuffs,
        str: f64,
        agi: f64,
        stam: f64,
        crit: f64,
        hit: f64,
        exp: f64,
        haste: f64,
        mastery: f64,
    ) -> Self {
        Self {
            str,
            agi,
            stam,
            ap: 0.0,
            crit,
            hit,
            exp,
            haste,
            mastery,
            mh,
            oh,
            procs,
            gear_buffs,
        }
    }

    /// Current value of an attribute.
    #[must_use]
    pub fn get(&self, attribute: Attribute) -> f64 {
        match attribute {
            Attribute::Str => self.str,
            Attribute::Agi => self.agi,
            Attribute::Ap => self.ap,
            Attribute::Crit => self.crit,
            Attribute::Hit => self.hit,
            Attribute::Exp => self.exp,
            Attribute::Haste => self.haste,
            Attribute::Mastery => self.mastery,
            Attribute::Stam => self.stam,
            Attribute::MhDps => self.mh.dps(),
            Attribute::OhDps => self.oh.dps(),
        }
    }

    /// Copy of these stats with one attribute raised by `delta`.
    ///
    /// Weapon DPS deltas are applied by scaling per-swing damage with the
    /// weapon's speed.
    #[must_use]
    pub fn with_delta(&self, attribute: Attribute, delta: f64) -> Self {
        let mut stats = self.clone();
        match attribute {
            Attribute::Str => stats.str += delta,
            Attribute::Agi => stats.agi += delta,
            Attribute::Ap => stats.ap += delta,
            Attribute::Crit => stats.crit += delta,
            Attribute::Hit => stats.hit += delta,
            Attribute::Exp => stats.exp += delta,
            Attribute::Haste => stats.haste += delta,
            Attribute::Mastery => stats.mastery += delta,
            Attribute::Stam => stats.stam += delta,
            Attribute::MhDps => stats.mh.damage += delta * stats.mh.speed,
            Attribute::OhDps => stats.oh.damage += delta * stats.oh.speed,
        }
        stats
    }
}
