//! Gear-derived buffs: tier set bonuses, consumables and meta gems.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::error::ArmoryError;

bitflags! {
    /// Set of active gear buffs.
    ///
    /// Flags carry no numbers themselves; the damage model decides what each
    /// bonus does for the active spec.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct GearBuffs: u32 {
        const ROGUE_T14_2PC          = 1 << 0;
        const ROGUE_T14_4PC          = 1 << 1;
        const ROGUE_T15_2PC          = 1 << 2;
        const ROGUE_T15_4PC          = 1 << 3;
        const ROGUE_T16_2PC          = 1 << 4;
        const ROGUE_T16_4PC          = 1 << 5;
        const LEATHER_SPECIALIZATION = 1 << 6;
        const VIRMENS_BITE           = 1 << 7;
        const VIRMENS_BITE_PREPOT    = 1 << 8;
        const CHAOTIC_METAGEM        = 1 << 9;
    }
}

const GEAR_BUFF_NAMES: [(&str, GearBuffs); 10] = [
    ("rogue_t14_2pc", GearBuffs::ROGUE_T14_2PC),
    ("rogue_t14_4pc", GearBuffs::ROGUE_T14_4PC),
    ("rogue_t15_2pc", GearBuffs::ROGUE_T15_2PC),
    ("rogue_t15_4pc", GearBuffs::ROGUE_T15_4PC),
    ("rogue_t16_2pc", GearBuffs::ROGUE_T16_2PC),
    ("rogue_t16_4pc", GearBuffs::ROGUE_T16_4PC),
    ("leather_specialization", GearBuffs::LEATHER_SPECIALIZATION),
    ("virmens_bite", GearBuffs::VIRMENS_BITE),
    ("virmens_bite_prepot", GearBuffs::VIRMENS_BITE_PREPOT),
    ("chaotic_metagem", GearBuffs::CHAOTIC_METAGEM),
];

/// Agility granted by one Virmen's Bite potion.
pub const POTION_AGILITY: f64 = 4000.0;
/// Duration of one potion in seconds.
pub const POTION_DURATION: f64 = 25.0;

impl GearBuffs {
    /// Look up a single gear buff by name.
    ///
    /// # Errors
    ///
    /// Returns [`ArmoryError::UnknownGearBuff`] if the name is not known.
    pub fn from_name(name: &str) -> Result<Self, ArmoryError> {
        GEAR_BUFF_NAMES
            .iter()
            .find(|(known, _)| *known == name)
            .map(|(_, flag)| *flag)
            .ok_or_else(|| ArmoryError::UnknownGearBuff(name.to_string()))
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
        GEAR_BUFF_NAMES
            .iter()
            .filter(|(_, flag)| self.contains(*flag))
            .map(|(name, _)| *name)
            .collect()
    }

    /// Primary-stat multiplier from wearing all leather.
    #[must_use]
    pub fn agility_multiplier(self) -> f64 {
        if self.contains(Self::LEATHER_SPECIALIZATION) {
            1.05
        } else {
            1.0
        }
    }

    /// Crit damage multiplier from the meta gem.
    #[must_use]
    pub fn crit_damage_multiplier(self) -> f64 {
        if self.contains(Self::CHAOTIC_METAGEM) {
            1.03
        } else {
            1.0
        }
    }

    /// Average agility from potions over a fight of `duration` seconds.
    ///
    /// The pre-pot covers the opening seconds of the fight minus the time it
    /// was drunk before the pull; the in-combat potion is a full duration.
    #[must_use]
    pub fn average_potion_agility(self, duration: f64) -> f64 {
        let mut seconds = 0.0;
        if self.contains(Self::VIRMENS_BITE) {
            seconds += POTION_DURATION;
        }
        if self.contains(Self::VIRMENS_BITE_PREPOT) {
            seconds += POTION_DURATION - 2.0;
        }
        POTION_AGILITY * (seconds / duration).min(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_names() {
        let buffs =
            GearBuffs::from_names(["rogue_t16_2pc", "leather_specialization"]).unwrap();
        assert!(buffs.contains(GearBuffs::ROGUE_T16_2PC));
        assert!(buffs.contains(GearBuffs::LEATHER_SPECIALIZATION));
        assert!(!buffs.contains(GearBuffs::ROGUE_T16_4PC));
        assert_eq!(buffs.names(), vec!["rogue_t16_2pc", "leather_specialization"]);
    }

    #[test]
    fn rejects_unknown_name() {
        assert_eq!(
            GearBuffs::from_names(["rogue_t99_2pc"]),
            Err(ArmoryError::UnknownGearBuff("rogue_t99_2pc".to_string()))
        );
    }

    #[test]
    fn potion_agility_is_uptime_weighted() {
        let buffs = GearBuffs::VIRMENS_BITE;
        assert!((buffs.average_potion_agility(250.0) - 400.0).abs() < 1e-9);
        assert_eq!(GearBuffs::empty().average_potion_agility(250.0), 0.0);
    }

    #[test]
    fn leather_specialization_multiplier() {
        assert_eq!(GearBuffs::LEATHER_SPECIALIZATION.agility_multiplier(), 1.05);
        assert_eq!(GearBuffs::empty().agility_multiplier(), 1.0);
    }
}
