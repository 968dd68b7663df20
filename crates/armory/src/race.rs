//! Racial traits relevant to melee damage.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ArmoryError;
use crate::stats::WeaponKind;

/// Playable races.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Race {
    /// Human
    Human,
    /// Dwarf
    Dwarf,
    /// Night elf
    NightElf,
    /// Gnome
    Gnome,
    /// Draenei
    Draenei,
    /// Worgen
    Worgen,
    /// Pandaren
    Pandaren,
    /// Orc
    Orc,
    /// Undead
    Undead,
    /// Troll
    Troll,
    /// Blood elf
    BloodElf,
    /// Goblin
    Goblin,
}

/// An on-use racial ability that raises a stat for part of the fight.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum RacialCooldown {
    /// Flat attack power
    AttackPower {
        /// Attack power granted
        value: f64,
        /// Duration in seconds
        duration: f64,
        /// Cooldown in seconds
        cooldown: f64,
    },
    /// Melee haste multiplier bonus
    Haste {
        /// Haste fraction (0.15 = 15%)
        value: f64,
        /// Duration in seconds
        duration: f64,
        /// Cooldown in seconds
        cooldown: f64,
    },
    /// Instant energy
    Energy {
        /// Energy restored per use
        value: f64,
        /// Cooldown in seconds
        cooldown: f64,
    },
}

impl Race {
    /// All races.
    pub const ALL: [Race; 12] = [
        Race::Human,
        Race::Dwarf,
        Race::NightElf,
        Race::Gnome,
        Race::Draenei,
        Race::Worgen,
        Race::Pandaren,
        Race::Orc,
        Race::Undead,
        Race::Troll,
        Race::BloodElf,
        Race::Goblin,
    ];

    /// Lowercase race name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Human => "human",
            Self::Dwarf => "dwarf",
            Self::NightElf => "night_elf",
            Self::Gnome => "gnome",
            Self::Draenei => "draenei",
            Self::Worgen => "worgen",
            Self::Pandaren => "pandaren",
            Self::Orc => "orc",
            Self::Undead => "undead",
            Self::Troll => "troll",
            Self::BloodElf => "blood_elf",
            Self::Goblin => "goblin",
        }
    }

    /// Racial agility offset from the base rogue value.
    #[must_use]
    pub const fn agility_offset(self) -> f64 {
        match self {
            Self::Human | Self::Undead => 0.0,
            Self::Dwarf => -4.0,
            Self::NightElf => 4.0,
            Self::Gnome | Self::Troll | Self::BloodElf | Self::Goblin | Self::Worgen => 2.0,
            Self::Draenei | Self::Orc => -3.0,
            Self::Pandaren => -2.0,
        }
    }

    /// Expertise percent granted for a weapon kind.
    #[must_use]
    pub fn expertise_bonus(self, kind: WeaponKind) -> f64 {
        let matches = match self {
            Self::Human => matches!(kind, WeaponKind::Sword | WeaponKind::Mace),
            Self::Dwarf => kind == WeaponKind::Mace,
            Self::Gnome => matches!(kind, WeaponKind::Dagger | WeaponKind::Sword),
            Self::Orc => matches!(kind, WeaponKind::Axe | WeaponKind::Fist),
            _ => false,
        };
        if matches {
            0.01
        } else {
            0.0
        }
    }

    /// Passive melee haste fraction.
    #[must_use]
    pub fn passive_haste(self) -> f64 {
        if self == Self::Goblin {
            0.01
        } else {
            0.0
        }
    }

    /// Passive crit chance.
    #[must_use]
    pub fn passive_crit(self) -> f64 {
        if self == Self::Worgen {
            0.01
        } else {
            0.0
        }
    }

    /// Multiplier applied to well-fed food buffs.
    #[must_use]
    pub fn food_multiplier(self) -> f64 {
        if self == Self::Pandaren {
            2.0
        } else {
            1.0
        }
    }

    /// On-use racial that the model fires on cooldown, if any.
    #[must_use]
    pub fn cooldown(self) -> Option<RacialCooldown> {
        match self {
            Self::Orc => Some(RacialCooldown::AttackPower {
                value: 4514.0,
                duration: 15.0,
                cooldown: 120.0,
            }),
            Self::Troll => Some(RacialCooldown::Haste {
                value: 0.15,
                duration: 10.0,
                cooldown: 180.0,
            }),
            Self::BloodElf => Some(RacialCooldown::Energy {
                value: 15.0,
                cooldown: 120.0,
            }),
            _ => None,
        }
    }
}

impl Default for Race {
    fn default() -> Self {
        Self::Human
    }
}

impl FromStr for Race {
    type Err = ArmoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|race| race.as_str() == s)
            .ok_or_else(|| ArmoryError::UnknownRace(s.to_string()))
    }
}
