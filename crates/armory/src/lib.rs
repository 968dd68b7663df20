//! # Armory
//!
//! Read-only character data for the rogue damage model.
//!
//! The armory owns everything the calculator *reads* about a character:
//!
//! - **Stats**: gear totals, weapons and the attributes EP is computed for
//! - **Procs**: trinket and enchant names plus the catalog that resolves them
//! - **Buffs**: gear buffs (set bonuses, potions, meta gems) and raid buffs
//! - **Character**: race, level, talents and glyphs
//!
//! Nothing here does damage math. The only operations are lookups and
//! copy-with-modification, used by sensitivity and ranking runs.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use armory::{CharacterContext, ContextOption, Talent};
//!
//! let ctx: CharacterContext = serde_json::from_str(&json)?;
//! let with_anticipation = ctx.with_option(&ContextOption::Talent(Talent::Anticipation));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod buffs;
pub mod context;
pub mod error;
pub mod gear;
pub mod glyphs;
pub mod level;
pub mod procs;
pub mod race;
pub mod stats;
pub mod talents;

// Re-exports for convenience
pub use buffs::Buffs;
pub use context::{CharacterContext, ContextOption};
pub use error::ArmoryError;
pub use gear::GearBuffs;
pub use glyphs::{Glyph, Glyphs};
pub use level::{Level, RatingConversions};
pub use procs::{ProcCatalog, ProcDef, ProcEffect, ProcSchool, ProcStat, ProcTrigger, ProcsList};
pub use race::{Race, RacialCooldown};
pub use stats::{Attribute, Stats, Weapon, WeaponKind};
pub use talents::{Talent, Talents, TIER_COUNT};
