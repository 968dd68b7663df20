//! Configuration and validation.
//!
//! Everything here runs before any damage math: a [`Cycle`] and a
//! [`Settings`] value either construct cleanly or fail with a
//! [`ConfigError`].

mod adv_params;
mod cycle;
mod error;
mod settings;

pub use adv_params::{AdvancedParams, MAX_ADV_PARAMS};
pub use cycle::{
    AssassinationCycle, CombatCycle, Cycle, HemorrhageUsage, SbTiming, Spec, SubtletyCycle,
};
pub use error::{ConfigError, Translator, Untranslated};
pub use settings::{
    DamagePoison, Opener, Settings, SettingsBuilder, UseOpener, UtilityPoison, MIN_SHIV_INTERVAL,
};
