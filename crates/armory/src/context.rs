//! The read-only character handed to the damage model.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::buffs::Buffs;
use crate::gear::GearBuffs;
use crate::glyphs::{Glyph, Glyphs};
use crate::level::Level;
use crate::race::Race;
use crate::stats::{Attribute, Stats};
use crate::talents::{Talent, Talents};

/// Everything the damage model reads about a character.
///
/// Values are never edited in place; perturbations produce fresh copies via
/// [`CharacterContext::with_attribute_delta`] and
/// [`CharacterContext::with_option`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterContext {
    /// Gear stats, weapons, procs and gear buffs
    pub stats: Stats,
    /// Talent picks
    pub talents: Talents,
    /// Active glyphs
    #[serde(default)]
    pub glyphs: Glyphs,
    /// Raid buffs, debuffs and consumables
    #[serde(default)]
    pub buffs: Buffs,
    /// Race
    #[serde(default)]
    pub race: Race,
    /// Character level
    #[serde(default)]
    pub level: Level,
}

/// A single discrete change that can be applied to a character.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContextOption {
    /// Select a talent, replacing the current pick in its tier.
    Talent(Talent),
    /// Activate a glyph.
    Glyph(Glyph),
    /// Equip a proc by name (trinket, meta gem, enchant).
    Proc(String),
    /// Add gear buffs.
    GearBuff(GearBuffs),
    /// Add raid buffs.
    Buff(Buffs),
}

impl ContextOption {
    /// Name used when reporting a ranking.
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            Self::Talent(talent) => talent.as_str().to_string(),
            Self::Glyph(glyph) => glyph.as_str().to_string(),
            Self::Proc(name) => name.clone(),
            Self::GearBuff(buffs) => buffs.names().join("+"),
            Self::Buff(buffs) => buffs.names().join("+"),
        }
    }
}

impl fmt::Display for ContextOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

impl CharacterContext {
    /// Assemble a context.
    #[must_use]
    pub fn new(
        stats: Stats,
        talents: Talents,
        glyphs: Glyphs,
        buffs: Buffs,
        race: Race,
        level: Level,
    ) -> Self {
        Self {
            stats,
            talents,
            glyphs,
            buffs,
            race,
            level,
        }
    }

    /// Copy with one attribute raised by `delta`.
    #[must_use]
    pub fn with_attribute_delta(&self, attribute: Attribute, delta: f64) -> Self {
        Self {
            stats: self.stats.with_delta(attribute, delta),
            ..self.clone()
        }
    }

    /// Copy with a discrete option applied.
    #[must_use]
    pub fn with_option(&self, option: &ContextOption) -> Self {
        trace!(option = %option, "applying context option");
        let mut ctx = self.clone();
        match option {
            ContextOption::Talent(talent) => ctx.talents = ctx.talents.with_talent(*talent),
            ContextOption::Glyph(glyph) => ctx.glyphs = ctx.glyphs.with_glyph(*glyph),
            ContextOption::Proc(name) => ctx.stats.procs = ctx.stats.procs.with_proc(name),
            ContextOption::GearBuff(buffs) => ctx.stats.gear_buffs |= *buffs,
            ContextOption::Buff(buffs) => ctx.buffs |= *buffs,
        }
        ctx
    }
}
