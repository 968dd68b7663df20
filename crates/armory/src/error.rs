//! Errors raised while assembling character data.

use thiserror::Error;

/// Failure to build a piece of the character context from names or strings.
///
/// All variants are validation failures: the input names something the
/// armory does not know about, or a string is structurally malformed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArmoryError {
    /// A talent string had the wrong length or a digit outside `0..=3`.
    #[error("talent string '{0}' must be six digits between 0 and 3")]
    MalformedTalentString(String),

    /// A talent name that is not part of any tier.
    #[error("unknown talent '{0}'")]
    UnknownTalent(String),

    /// A glyph name that is not in the glyph list.
    #[error("unknown glyph '{0}'")]
    UnknownGlyph(String),

    /// A raid buff or debuff name that is not recognized.
    #[error("unknown buff '{0}'")]
    UnknownBuff(String),

    /// A gear buff (set bonus, consumable, meta gem) that is not recognized.
    #[error("unknown gear buff '{0}'")]
    UnknownGearBuff(String),

    /// A race name that is not recognized.
    #[error("unknown race '{0}'")]
    UnknownRace(String),

    /// A weapon type name that is not recognized.
    #[error("unknown weapon type '{0}'")]
    UnknownWeaponKind(String),

    /// Only a fixed set of character levels carry rating conversions.
    #[error("level {0} is not supported (expected 85 or 90)")]
    UnsupportedLevel(u32),

    /// An attribute name used for EP or perturbation that is not known.
    #[error("unknown attribute '{0}'")]
    UnknownAttribute(String),
}
