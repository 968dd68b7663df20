//! Character level and the rating conversions that depend on it.
//!
//! Ratings are converted to percentages (or mastery points) using per-level
//! constants. Only the levels the model has been tuned for are accepted.

use serde::{Deserialize, Serialize};

use crate::error::ArmoryError;

/// Rating needed for one percent (or one mastery point) at a given level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatingConversions {
    /// Crit rating per 1% crit
    pub crit: f64,
    /// Haste rating per 1% haste
    pub haste: f64,
    /// Hit rating per 1% melee or spell hit
    pub hit: f64,
    /// Expertise rating per 1% expertise
    pub expertise: f64,
    /// Mastery rating per mastery point
    pub mastery: f64,
    /// Agility per 1% crit
    pub agi_per_crit: f64,
}

/// Supported character levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Level {
    /// Cataclysm level cap
    L85,
    /// Mists of Pandaria level cap
    L90,
}

impl Level {
    /// Parse a numeric level.
    ///
    /// # Errors
    ///
    /// Returns [`ArmoryError::UnsupportedLevel`] for any level without a
    /// conversion table.
    pub fn from_number(level: u32) -> Result<Self, ArmoryError> {
        match level {
            85 => Ok(Self::L85),
            90 => Ok(Self::L90),
            other => Err(ArmoryError::UnsupportedLevel(other)),
        }
    }

    /// Numeric value of the level.
    #[must_use]
    pub const fn as_number(self) -> u32 {
        match self {
            Self::L85 => 85,
            Self::L90 => 90,
        }
    }

    /// Rating conversion constants for this level.
    #[must_use]
    pub const fn ratings(self) -> RatingConversions {
        match self {
            Self::L85 => RatingConversions {
                crit: 179.28,
                haste: 128.057,
                hit: 120.109,
                expertise: 120.109,
                mastery: 179.28,
                agi_per_crit: 324.72,
            },
            Self::L90 => RatingConversions {
                crit: 600.0,
                haste: 425.0,
                hit: 340.0,
                expertise: 340.0,
                mastery: 600.0,
                agi_per_crit: 1259.52,
            },
        }
    }

    /// Armor constant used in the mitigation formula `armor / (armor + k)`.
    #[must_use]
    pub fn armor_constant(self) -> f64 {
        let level = f64::from(self.as_number());
        4037.5 * level - 317_117.5
    }
}

impl Default for Level {
    fn default() -> Self {
        Self::L90
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_supported_levels() {
        assert_eq!(Level::from_number(90), Ok(Level::L90));
        assert_eq!(Level::from_number(85), Ok(Level::L85));
    }

    #[test]
    fn rejects_unsupported_level() {
        assert_eq!(
            Level::from_number(80),
            Err(ArmoryError::UnsupportedLevel(80))
        );
    }

    #[test]
    fn armor_constant_at_90() {
        assert!((Level::L90.armor_constant() - 46_257.5).abs() < 1e-9);
    }
}
