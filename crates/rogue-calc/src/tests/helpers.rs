//! Characters and settings shared by the tests.

use armory::{
    Buffs, CharacterContext, GearBuffs, Glyphs, Level, ProcsList, Race, Stats, Talent, Talents,
    Weapon, WeaponKind,
};

use crate::config::{AssassinationCycle, CombatCycle, Settings, SubtletyCycle};

// =============================================================================
// Characters
// =============================================================================

/// Item-level-appropriate gear with chosen weapons. Hit and expertise sit
/// below their caps so every rating has a smooth effect.
pub(crate) fn stats_with(mh: Weapon, oh: Weapon) -> Stats {
    Stats::new(
        mh,
        oh,
        ProcsList::new(["haromms_talisman", "assurance_of_consequence"]),
        GearBuffs::LEATHER_SPECIALIZATION | GearBuffs::CHAOTIC_METAGEM | GearBuffs::VIRMENS_BITE,
        80.0,
        20_000.0,
        24_000.0,
        4_000.0,
        2_000.0,
        2_000.0,
        6_000.0,
        5_000.0,
    )
}

fn dagger() -> Weapon {
    Weapon::new(9_000.0, 1.8, WeaponKind::Dagger, Some("dancing_steel"))
}

fn sword(speed: f64) -> Weapon {
    Weapon::new(13_000.0, speed, WeaponKind::Sword, Some("dancing_steel"))
}

fn context(stats: Stats, talents: Talents) -> CharacterContext {
    CharacterContext::new(
        stats,
        talents,
        Glyphs::default(),
        Buffs::all(),
        Race::NightElf,
        Level::default(),
    )
}

/// Dual daggers with Anticipation.
pub(crate) fn assassination_context() -> CharacterContext {
    context(
        stats_with(dagger(), dagger()),
        Talents::none()
            .with_talent(Talent::Subterfuge)
            .with_talent(Talent::Anticipation),
    )
}

/// A slow main-hand sword and a fast off-hand sword.
pub(crate) fn combat_context() -> CharacterContext {
    context(
        stats_with(sword(2.6), sword(2.6)),
        Talents::none()
            .with_talent(Talent::Nightstalker)
            .with_talent(Talent::MarkedForDeath),
    )
}

/// Dual daggers with Shadow Focus.
pub(crate) fn subtlety_context() -> CharacterContext {
    context(
        stats_with(dagger(), dagger()),
        Talents::none()
            .with_talent(Talent::ShadowFocus)
            .with_talent(Talent::Anticipation),
    )
}

/// The same character with swords in both hands.
pub(crate) fn with_swords(ctx: &CharacterContext) -> CharacterContext {
    let mut ctx = ctx.clone();
    ctx.stats.mh = sword(2.6);
    ctx.stats.oh = sword(2.6);
    ctx
}

// =============================================================================
// Settings
// =============================================================================

/// The documented assassination scenario.
pub(crate) fn assassination_settings() -> Settings {
    let cycle = AssassinationCycle::new(4, 5, true, true, false).unwrap();
    Settings::builder(cycle)
        .dmg_poison(Some("dp"))
        .utl_poison(Some("lp"))
        .duration(360.0)
        .opener_name("envenom")
        .build()
        .unwrap()
}

pub(crate) fn combat_settings() -> Settings {
    Settings::builder(CombatCycle::default())
        .dmg_poison(Some("dp"))
        .build()
        .unwrap()
}

pub(crate) fn subtlety_settings() -> Settings {
    Settings::builder(SubtletyCycle::default())
        .dmg_poison(Some("dp"))
        .build()
        .unwrap()
}
