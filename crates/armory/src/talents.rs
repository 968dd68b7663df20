//! Talent tiers and the six-digit talent string.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ArmoryError;

/// Number of talent tiers.
pub const TIER_COUNT: usize = 6;

/// A single talent.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Talent {
    Nightstalker,
    Subterfuge,
    ShadowFocus,
    DeadlyThrow,
    NerveStrike,
    CombatReadiness,
    CheatDeath,
    LeechingPoison,
    Elusiveness,
    CloakAndDagger,
    Shadowstep,
    BurstOfSpeed,
    PreyOnTheWeak,
    ParalyticPoison,
    DirtyTricks,
    ShurikenToss,
    MarkedForDeath,
    Anticipation,
}

const TIERS: [[Talent; 3]; TIER_COUNT] = [
    [Talent::Nightstalker, Talent::Subterfuge, Talent::ShadowFocus],
    [Talent::DeadlyThrow, Talent::NerveStrike, Talent::CombatReadiness],
    [Talent::CheatDeath, Talent::LeechingPoison, Talent::Elusiveness],
    [Talent::CloakAndDagger, Talent::Shadowstep, Talent::BurstOfSpeed],
    [Talent::PreyOnTheWeak, Talent::ParalyticPoison, Talent::DirtyTricks],
    [Talent::ShurikenToss, Talent::MarkedForDeath, Talent::Anticipation],
];

impl Talent {
    /// Lowercase talent name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Nightstalker => "nightstalker",
            Self::Subterfuge => "subterfuge",
            Self::ShadowFocus => "shadow_focus",
            Self::DeadlyThrow => "deadly_throw",
            Self::NerveStrike => "nerve_strike",
            Self::CombatReadiness => "combat_readiness",
            Self::CheatDeath => "cheat_death",
            Self::LeechingPoison => "leeching_poison",
            Self::Elusiveness => "elusiveness",
            Self::CloakAndDagger => "cloak_and_dagger",
            Self::Shadowstep => "shadowstep",
            Self::BurstOfSpeed => "burst_of_speed",
            Self::PreyOnTheWeak => "prey_on_the_weak",
            Self::ParalyticPoison => "paralytic_poison",
            Self::DirtyTricks => "dirty_tricks",
            Self::ShurikenToss => "shuriken_toss",
            Self::MarkedForDeath => "marked_for_death",
            Self::Anticipation => "anticipation",
        }
    }

    /// Zero-based tier this talent belongs to.
    #[must_use]
    pub fn tier(self) -> usize {
        TIERS
            .iter()
            .position(|tier| tier.contains(&self))
            .unwrap_or_default()
    }

    /// The three talents of a tier, or `None` if the tier is out of range.
    #[must_use]
    pub fn tier_choices(tier: usize) -> Option<[Talent; 3]> {
        TIERS.get(tier).copied()
    }

    /// Every talent, tier by tier.
    pub fn all() -> impl Iterator<Item = Talent> {
        TIERS.iter().flat_map(|tier| tier.iter().copied())
    }
}

impl fmt::Display for Talent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Talent {
    type Err = ArmoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .find(|talent| talent.as_str() == s)
            .ok_or_else(|| ArmoryError::UnknownTalent(s.to_string()))
    }
}

/// One optional talent per tier.
///
/// Serialized as the six-digit string used by talent calculators: each digit
/// is the 1-based column in that tier, or `0` for no talent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Talents {
    picks: [Option<Talent>; TIER_COUNT],
}

impl Talents {
    /// No talents selected.
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// Whether a talent is selected.
    #[must_use]
    pub fn has(&self, talent: Talent) -> bool {
        self.picks[talent.tier()] == Some(talent)
    }

    /// Talent chosen in a tier.
    #[must_use]
    pub fn in_tier(&self, tier: usize) -> Option<Talent> {
        self.picks.get(tier).copied().flatten()
    }

    /// Copy with `talent` selected, replacing whatever was in its tier.
    #[must_use]
    pub fn with_talent(&self, talent: Talent) -> Self {
        let mut talents = *self;
        talents.picks[talent.tier()] = Some(talent);
        talents
    }

    /// Copy with a tier cleared.
    #[must_use]
    pub fn without_tier(&self, tier: usize) -> Self {
        let mut talents = *self;
        if let Some(pick) = talents.picks.get_mut(tier) {
            *pick = None;
        }
        talents
    }

    /// Selected talents in tier order.
    pub fn selected(&self) -> impl Iterator<Item = Talent> + '_ {
        self.picks.iter().filter_map(|pick| *pick)
    }
}

impl FromStr for Talents {
    type Err = ArmoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || ArmoryError::MalformedTalentString(s.to_string());
        if s.chars().count() != TIER_COUNT {
            return Err(malformed());
        }
        let mut picks = [None; TIER_COUNT];
        for (tier, digit) in s.chars().enumerate() {
            let column = digit.to_digit(10).ok_or_else(malformed)?;
            picks[tier] = match column {
                0 => None,
                1..=3 => Some(TIERS[tier][column as usize - 1]),
                _ => return Err(malformed()),
            };
        }
        Ok(Self { picks })
    }
}

impl TryFrom<String> for Talents {
    type Error = ArmoryError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Talents> for String {
    fn from(talents: Talents) -> Self {
        talents.to_string()
    }
}

impl fmt::Display for Talents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (tier, pick) in self.picks.iter().enumerate() {
            let column = pick
                .and_then(|talent| TIERS[tier].iter().position(|t| *t == talent))
                .map_or(0, |index| index + 1);
            write!(f, "{column}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_talent_string() {
        let talents: Talents = "122213".parse().unwrap();
        assert!(talents.has(Talent::Nightstalker));
        assert!(talents.has(Talent::NerveStrike));
        assert!(talents.has(Talent::LeechingPoison));
        assert!(talents.has(Talent::Shadowstep));
        assert!(talents.has(Talent::PreyOnTheWeak));
        assert!(talents.has(Talent::Anticipation));
        assert_eq!(talents.to_string(), "122213");
    }

    #[test]
    fn zero_means_no_talent() {
        let talents: Talents = "000003".parse().unwrap();
        assert_eq!(talents.in_tier(0), None);
        assert_eq!(talents.selected().collect::<Vec<_>>(), vec![Talent::Anticipation]);
    }

    #[test]
    fn rejects_malformed_strings() {
        assert!("12221".parse::<Talents>().is_err());
        assert!("1222134".parse::<Talents>().is_err());
        assert!("12221x".parse::<Talents>().is_err());
        assert!("122214".parse::<Talents>().is_err());
    }

    #[test]
    fn with_talent_replaces_tier() {
        let talents: Talents = "100000".parse().unwrap();
        let swapped = talents.with_talent(Talent::ShadowFocus);
        assert!(swapped.has(Talent::ShadowFocus));
        assert!(!swapped.has(Talent::Nightstalker));
        assert!(talents.has(Talent::Nightstalker));
        assert_eq!(swapped.without_tier(0), Talents::none());
    }

    #[test]
    fn talents_serialize_as_string() {
        let talents: Talents = "322213".parse().unwrap();
        let json = serde_json::to_string(&talents).unwrap();
        assert_eq!(json, "\"322213\"");
        let back: Talents = serde_json::from_str(&json).unwrap();
        assert_eq!(back, talents);
    }
}
