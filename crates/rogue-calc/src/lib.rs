//! # Rogue Calc
//!
//! Closed-form damage-per-second model for the three rogue specs.
//!
//! The calculator works out the expected rate of every ability a rotation
//! uses and the expected damage of each use, algebraically, with no
//! simulated combat log. On top of it sit two engines that call it many
//! times with modified characters:
//!
//! - **EP**: DPS per point of each attribute ([`compute_ep`])
//! - **Ranking**: DPS gained from talents, glyphs, trinkets and gear buffs
//!   ([`rank_options`] and friends)
//!
//! ## Architecture
//!
//! - [`config`]: cycles and settings, validated before any math runs
//! - [`calc`]: stat sheet, attack tables, combo point chain, energy budget
//!   and the per-spec rotations
//! - [`ep`] and [`ranking`]: perturbation engines, parallel over options
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use rogue_calc::{AssassinationCycle, DamageCalculator, Settings};
//!
//! let settings = Settings::builder(AssassinationCycle::default())
//!     .dmg_poison(Some("dp"))
//!     .utl_poison(Some("lp"))
//!     .duration(360.0)
//!     .opener_name("envenom")
//!     .build()?;
//! let report = DamageCalculator::new(&settings, &ctx).dps_breakdown()?;
//! let ep = rogue_calc::compute_ep(&settings, &ctx)?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod calc;
pub mod config;
pub mod ep;
pub mod error;
pub mod ranking;

#[cfg(test)]
mod tests;

// Re-exports for convenience
pub use calc::{compute_breakdown, DamageCalculator, DpsBreakdown, DpsReport, Phase};
pub use config::{
    AdvancedParams, AssassinationCycle, CombatCycle, ConfigError, Cycle, DamagePoison,
    HemorrhageUsage, Opener, SbTiming, Settings, SettingsBuilder, Spec, SubtletyCycle, Translator,
    UseOpener, UtilityPoison,
};
pub use ep::{compute_ep, compute_ep_with, EpConfig, EpTable};
pub use error::CalcError;
pub use ranking::{
    glyphs_ranking, other_ep, rank_options, talents_ranking, trinkets_ranking, RankEntry, Ranking,
    TierRanking,
};
