//! Glyph selections.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ArmoryError;

/// Known rogue glyphs.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Glyph {
    AdrenalineRush,
    Ambush,
    BladeFlurry,
    Blind,
    CheapShot,
    CloakOfShadows,
    DeadlyMomentum,
    Evasion,
    ExposeArmor,
    Feint,
    Garrote,
    Gouge,
    HemorrhagingVeins,
    Kick,
    Recuperate,
    Sap,
    ShadowWalk,
    Shiv,
    SmokeBomb,
    Sprint,
    Stealth,
    Vanish,
    Vendetta,
}

impl Glyph {
    /// All glyphs.
    pub const ALL: [Glyph; 23] = [
        Glyph::AdrenalineRush,
        Glyph::Ambush,
        Glyph::BladeFlurry,
        Glyph::Blind,
        Glyph::CheapShot,
        Glyph::CloakOfShadows,
        Glyph::DeadlyMomentum,
        Glyph::Evasion,
        Glyph::ExposeArmor,
        Glyph::Feint,
        Glyph::Garrote,
        Glyph::Gouge,
        Glyph::HemorrhagingVeins,
        Glyph::Kick,
        Glyph::Recuperate,
        Glyph::Sap,
        Glyph::ShadowWalk,
        Glyph::Shiv,
        Glyph::SmokeBomb,
        Glyph::Sprint,
        Glyph::Stealth,
        Glyph::Vanish,
        Glyph::Vendetta,
    ];

    /// Lowercase glyph name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AdrenalineRush => "adrenaline_rush",
            Self::Ambush => "ambush",
            Self::BladeFlurry => "blade_flurry",
            Self::Blind => "blind",
            Self::CheapShot => "cheap_shot",
            Self::CloakOfShadows => "cloak_of_shadows",
            Self::DeadlyMomentum => "deadly_momentum",
            Self::Evasion => "evasion",
            Self::ExposeArmor => "expose_armor",
            Self::Feint => "feint",
            Self::Garrote => "garrote",
            Self::Gouge => "gouge",
            Self::HemorrhagingVeins => "hemorrhaging_veins",
            Self::Kick => "kick",
            Self::Recuperate => "recuperate",
            Self::Sap => "sap",
            Self::ShadowWalk => "shadow_walk",
            Self::Shiv => "shiv",
            Self::SmokeBomb => "smoke_bomb",
            Self::Sprint => "sprint",
            Self::Stealth => "stealth",
            Self::Vanish => "vanish",
            Self::Vendetta => "vendetta",
        }
    }
}

impl fmt::Display for Glyph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Glyph {
    type Err = ArmoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|glyph| glyph.as_str() == s)
            .ok_or_else(|| ArmoryError::UnknownGlyph(s.to_string()))
    }
}

/// The set of active glyphs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Glyphs {
    active: BTreeSet<Glyph>,
}

impl Glyphs {
    /// Build from glyph names.
    ///
    /// # Errors
    ///
    /// Fails on the first unknown glyph name.
    pub fn from_names<'a, I>(names: I) -> Result<Self, ArmoryError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let active = names
            .into_iter()
            .map(str::parse)
            .collect::<Result<BTreeSet<Glyph>, _>>()?;
        Ok(Self { active })
    }

    /// Whether a glyph is active.
    #[must_use]
    pub fn has(&self, glyph: Glyph) -> bool {
        self.active.contains(&glyph)
    }

    /// Copy with an extra glyph.
    #[must_use]
    pub fn with_glyph(&self, glyph: Glyph) -> Self {
        let mut glyphs = self.clone();
        glyphs.active.insert(glyph);
        glyphs
    }

    /// Copy without a glyph.
    #[must_use]
    pub fn without_glyph(&self, glyph: Glyph) -> Self {
        let mut glyphs = self.clone();
        glyphs.active.remove(&glyph);
        glyphs
    }

    /// Active glyphs in name order.
    pub fn iter(&self) -> impl Iterator<Item = Glyph> + '_ {
        self.active.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_from_names() {
        let glyphs = Glyphs::from_names(["recuperate", "sprint", "vendetta"]).unwrap();
        assert!(glyphs.has(Glyph::Vendetta));
        assert!(!glyphs.has(Glyph::Feint));
        assert_eq!(glyphs.iter().count(), 3);
    }

    #[test]
    fn rejects_unknown_glyph() {
        assert_eq!(
            Glyphs::from_names(["vendetta", "mutilate"]),
            Err(ArmoryError::UnknownGlyph("mutilate".to_string()))
        );
    }

    #[test]
    fn with_and_without_return_copies() {
        let glyphs = Glyphs::default();
        let with = glyphs.with_glyph(Glyph::Vendetta);
        assert!(with.has(Glyph::Vendetta));
        assert!(!glyphs.has(Glyph::Vendetta));
        assert_eq!(with.without_glyph(Glyph::Vendetta), glyphs);
    }
}
