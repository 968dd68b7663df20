//! The damage calculator.
//!
//! [`compute_breakdown`] turns a validated [`Settings`] and a
//! [`CharacterContext`] into expected damage per second by source for one
//! encounter phase. It is a pure function: the same inputs always give the
//! same breakdown, and nothing is cached between calls.
//!
//! The pipeline per phase:
//!
//! 1. build the [`StatSheet`](sheet::StatSheet) and attack tables;
//! 2. resolve the spec's rotation into uses per second and expected damage,
//!    with proc stat gains at zero;
//! 3. turn the resulting hit rates into average proc stat gains, rebuild the
//!    sheet and resolve the rotation again;
//! 4. add damage procs and check every value is finite.

mod assassination;
mod breakdown;
mod budget;
mod chain;
mod combat;
mod damage;
mod procs;
mod sheet;
mod subtlety;
mod table;
mod timing;

use armory::{CharacterContext, GearBuffs, Glyph, RacialCooldown, Talent, WeaponKind};
use tracing::debug;

use crate::config::{Cycle, DamagePoison, Opener, Settings};
use crate::error::CalcError;

pub use breakdown::{DpsBreakdown, DpsReport, Phase};

use chain::ChainRules;
use damage::{Damage, OFF_HAND_PENALTY};
use procs::HitRates;
use sheet::{StatBonus, StatSheet};
use table::{AttackTable, Hand};
use timing::cooldown_uptime;

// ============================================================================
// Shared constants
// ============================================================================

/// Energy per second before haste.
const BASE_ENERGY_REGEN: f64 = 10.0;
/// Energy returned per combo point spent (Relentless Strikes).
const RELENTLESS_STRIKES_PER_CP: f64 = 5.0;

const SHIV_COST: f64 = 20.0;
const SHIV_WEAPON_DAMAGE: f64 = 0.25;
const FEINT_COST: f64 = 20.0;
const TRICKS_COST: f64 = 15.0;
const TRICKS_COOLDOWN: f64 = 30.0;

const SHADOW_BLADES_DURATION: f64 = 12.0;
const SHADOW_BLADES_T14_EXTENSION: f64 = 12.0;
/// Cooldown of Shadow Blades.
pub(crate) const SHADOW_BLADES_COOLDOWN: f64 = 180.0;

/// Chance per landed melee hit to apply the damage poison.
const POISON_CHANCE: f64 = 0.30;
const DEADLY_INSTANT_BASE: f64 = 313.0;
const DEADLY_INSTANT_AP: f64 = 0.109;
const DEADLY_TICK_BASE: f64 = 143.0;
const DEADLY_TICK_AP: f64 = 0.108;
const DEADLY_TICK_INTERVAL: f64 = 3.0;
const WOUND_BASE: f64 = 417.0;
const WOUND_AP: f64 = 0.12;

const STORMLASH_AP: f64 = 0.2;
const STORMLASH_DURATION: f64 = 10.0;
const STORMLASH_COOLDOWN: f64 = 300.0;
const STORMLASH_ICD: f64 = 0.1;

const MARKED_FOR_DEATH_CP: f64 = 5.0;
const MARKED_FOR_DEATH_COOLDOWN: f64 = 60.0;
const NIGHTSTALKER_MULTIPLIER: f64 = 1.5;
const SHADOW_FOCUS_COST: f64 = 0.25;

const AMBUSH_COST: f64 = 60.0;
const AMBUSH_WEAPON_DAMAGE: f64 = 3.25;
/// Extra Ambush damage with a dagger.
const AMBUSH_DAGGER_BONUS: f64 = 1.447;
const AMBUSH_CP: f64 = 2.0;
const GARROTE_COST: f64 = 45.0;
const GARROTE_TICKS: f64 = 6.0;
const GARROTE_TICK_BASE: f64 = 118.0;
const GARROTE_TICK_AP: f64 = 0.078;

const RUPTURE_COST: f64 = 25.0;
const RUPTURE_TICK_INTERVAL: f64 = 2.0;
const RUPTURE_TICK_BASE: f64 = 71.0;
/// Attack power per tick by combo points, one to five.
const RUPTURE_TICK_AP: [f64; 5] = [0.025, 0.04, 0.05, 0.056, 0.062];

const T14_2PC_MULTIPLIER: f64 = 1.05;
const T15_4PC_DISCOUNT: f64 = 0.15;
const T16_2PC_REFUND: f64 = 2.0;
const T16_4PC_MULTIPLIER: f64 = 1.05;

// ============================================================================
// Public entry points
// ============================================================================

/// Expected damage per second by source for one phase.
///
/// # Errors
///
/// - [`CalcError::UnknownEffect`] for a proc or enchant the catalog cannot
///   resolve.
/// - [`CalcError::WeaponRequirement`] when the rotation needs weapons the
///   character does not have.
/// - [`CalcError::InvalidAdvParam`] for an unusable advanced parameter.
/// - [`CalcError::NonFinite`] if any source comes out as NaN or infinity.
pub fn compute_breakdown(
    settings: &Settings,
    ctx: &CharacterContext,
    phase: Phase,
) -> Result<DpsBreakdown, CalcError> {
    let proc_defs = procs::resolve(ctx)?;

    let first = Model::new(settings, ctx, phase, &StatBonus::default())?.resolve()?;
    let bonus = procs::stat_bonus(&proc_defs, &first.hits);

    let model = Model::new(settings, ctx, phase, &bonus)?;
    let mut resolution = model.resolve()?;
    procs::add_damage(&proc_defs, &resolution.hits, &model.damage(), &mut resolution.breakdown);

    if let Some((name, _)) = resolution.breakdown.iter().find(|(_, dps)| !dps.is_finite()) {
        return Err(CalcError::NonFinite {
            source_name: name.to_string(),
        });
    }
    debug!(
        spec = %settings.spec(),
        ?phase,
        total = resolution.breakdown.total(),
        sources = resolution.breakdown.len(),
        "computed breakdown"
    );
    Ok(resolution.breakdown)
}

/// Both phases of one character under one set of settings.
///
/// A thin convenience over [`compute_breakdown`]; it holds references only.
#[derive(Debug, Clone, Copy)]
pub struct DamageCalculator<'a> {
    settings: &'a Settings,
    ctx: &'a CharacterContext,
}

impl<'a> DamageCalculator<'a> {
    /// Calculator for a character.
    #[must_use]
    pub fn new(settings: &'a Settings, ctx: &'a CharacterContext) -> Self {
        Self { settings, ctx }
    }

    /// Settings in use.
    #[must_use]
    pub fn settings(&self) -> &'a Settings {
        self.settings
    }

    /// Breakdown for one phase.
    ///
    /// # Errors
    ///
    /// See [`compute_breakdown`].
    pub fn phase_breakdown(&self, phase: Phase) -> Result<DpsBreakdown, CalcError> {
        compute_breakdown(self.settings, self.ctx, phase)
    }

    /// Both phases, merged or kept apart according to
    /// [`Settings::merge_damage`].
    ///
    /// # Errors
    ///
    /// See [`compute_breakdown`].
    pub fn dps_breakdown(&self) -> Result<DpsReport, CalcError> {
        let non_execute = self.phase_breakdown(Phase::NonExecute)?;
        let execute = self.phase_breakdown(Phase::Execute)?;
        Ok(if self.settings.merge_damage() {
            DpsReport::Merged(DpsBreakdown::merge(
                &non_execute,
                &execute,
                self.settings.time_in_execute_range(),
            ))
        } else {
            DpsReport::Split {
                non_execute,
                execute,
            }
        })
    }

    /// Phase-merged total DPS, whatever `merge_damage` says.
    ///
    /// # Errors
    ///
    /// See [`compute_breakdown`].
    pub fn total_dps(&self) -> Result<f64, CalcError> {
        let non_execute = self.phase_breakdown(Phase::NonExecute)?;
        let execute = self.phase_breakdown(Phase::Execute)?;
        Ok(
            DpsBreakdown::merge(&non_execute, &execute, self.settings.time_in_execute_range())
                .total(),
        )
    }
}

// ============================================================================
// Model shared by the spec rotations
// ============================================================================

/// Output of a rotation: damage plus the hit rates procs are driven by.
pub(crate) struct Resolution {
    pub breakdown: DpsBreakdown,
    pub hits: HitRates,
}

/// Landed auto attacks per second.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct Swings {
    pub mh_landed: f64,
    pub oh_landed: f64,
}

impl Swings {
    pub fn landed(&self) -> f64 {
        self.mh_landed + self.oh_landed
    }
}

/// What one opener costs and gives.
#[derive(Debug, Clone, Copy)]
pub(crate) struct OpenerPlan {
    /// Breakdown key the damage is filed under
    pub name: &'static str,
    pub energy: f64,
    /// Combo points gained, negative for a finisher
    pub cp: f64,
    pub damage: f64,
}

/// Everything a rotation reads: settings, character and derived stats for
/// one phase.
pub(crate) struct Model<'a> {
    pub settings: &'a Settings,
    pub ctx: &'a CharacterContext,
    pub phase: Phase,
    pub sheet: StatSheet,
    pub table: AttackTable,
}

impl<'a> Model<'a> {
    fn new(
        settings: &'a Settings,
        ctx: &'a CharacterContext,
        phase: Phase,
        bonus: &StatBonus,
    ) -> Result<Self, CalcError> {
        let sheet = StatSheet::build(ctx, settings, bonus)?;
        let table = AttackTable::new(&sheet, settings.is_pvp());
        Ok(Self {
            settings,
            ctx,
            phase,
            sheet,
            table,
        })
    }

    fn resolve(&self) -> Result<Resolution, CalcError> {
        match self.settings.cycle() {
            Cycle::Assassination(cycle) => assassination::resolve(self, cycle),
            Cycle::Combat(cycle) => combat::resolve(self, cycle),
            Cycle::Subtlety(cycle) => subtlety::resolve(self, cycle),
        }
    }

    pub fn damage(&self) -> Damage<'_> {
        Damage::new(&self.sheet, self.table)
    }

    pub fn fight(&self) -> f64 {
        self.settings.duration()
    }

    pub fn talent(&self, talent: Talent) -> bool {
        self.ctx.talents.has(talent)
    }

    pub fn glyph(&self, glyph: Glyph) -> bool {
        self.ctx.glyphs.has(glyph)
    }

    pub fn gear(&self, flag: GearBuffs) -> bool {
        self.ctx.stats.gear_buffs.contains(flag)
    }

    pub fn chain_rules(&self, ruthlessness: bool) -> ChainRules {
        ChainRules {
            anticipation: self.talent(Talent::Anticipation),
            ruthlessness,
        }
    }

    /// Energy regeneration before spec bonuses.
    pub fn regen(&self) -> f64 {
        BASE_ENERGY_REGEN * self.sheet.haste
    }

    /// Delay between a buff falling off and the player reacting.
    pub fn reaction_gap(&self) -> f64 {
        self.settings.response_time() + self.settings.latency()
    }

    pub fn shiv_rate(&self) -> f64 {
        let interval = self.settings.shiv_interval();
        if interval > 0.0 {
            1.0 / interval
        } else {
            0.0
        }
    }

    /// Energy per second spent on utility, less racial energy.
    pub fn fixed_energy_costs(&self) -> f64 {
        let feint = if self.settings.feint_interval() > 0.0 {
            FEINT_COST / self.settings.feint_interval()
        } else {
            0.0
        };
        let tricks = if self.settings.tricks_on_cooldown() {
            TRICKS_COST / TRICKS_COOLDOWN
        } else {
            0.0
        };
        let racial = match self.ctx.race.cooldown() {
            Some(RacialCooldown::Energy { value, cooldown }) => value / cooldown,
            _ => 0.0,
        };
        self.shiv_rate() * SHIV_COST + feint + tricks - racial
    }

    /// Combo points per second from Marked for Death.
    pub fn marked_for_death_cp(&self) -> f64 {
        if self.talent(Talent::MarkedForDeath) {
            MARKED_FOR_DEATH_CP / MARKED_FOR_DEATH_COOLDOWN
        } else {
            0.0
        }
    }

    /// Fraction of the fight Shadow Blades is up when used every `cooldown`
    /// seconds.
    pub fn shadow_blades_uptime(&self, cooldown: f64) -> f64 {
        let duration = if self.gear(GearBuffs::ROGUE_T14_4PC) {
            SHADOW_BLADES_DURATION + SHADOW_BLADES_T14_EXTENSION
        } else {
            SHADOW_BLADES_DURATION
        };
        cooldown_uptime(duration, cooldown.max(SHADOW_BLADES_COOLDOWN), self.fight())
    }

    /// Net energy of a generator cast after tier discounts.
    pub fn generator_cost(&self, base: f64, shadow_blades_uptime: f64) -> f64 {
        let mut cost = base;
        if self.gear(GearBuffs::ROGUE_T15_4PC) {
            cost *= 1.0 - T15_4PC_DISCOUNT * shadow_blades_uptime;
        }
        if self.gear(GearBuffs::ROGUE_T16_2PC) {
            cost -= T16_2PC_REFUND;
        }
        cost.max(0.0)
    }

    /// Net energy of a finisher spending `cp` combo points.
    pub fn finisher_cost(&self, base: f64, cp: f64) -> f64 {
        base - RELENTLESS_STRIKES_PER_CP * cp
    }

    /// Combo points finishers are treated as having on top of what they spend.
    pub fn finisher_bonus_cp(&self) -> f64 {
        if self.gear(GearBuffs::ROGUE_T15_2PC) {
            1.0
        } else {
            0.0
        }
    }

    /// Damage bonus on finishers from set bonuses.
    pub fn finisher_multiplier(&self) -> f64 {
        if self.gear(GearBuffs::ROGUE_T16_4PC) {
            T16_4PC_MULTIPLIER
        } else {
            1.0
        }
    }

    /// Damage bonus on each spec's signature generator.
    pub fn t14_multiplier(&self) -> f64 {
        if self.gear(GearBuffs::ROGUE_T14_2PC) {
            T14_2PC_MULTIPLIER
        } else {
            1.0
        }
    }

    /// Add one combo point to a share `extra` of generator outcomes.
    pub fn shift_gains(gains: &[(usize, f64)], extra: f64) -> Vec<(usize, f64)> {
        let extra = extra.clamp(0.0, 1.0);
        let mut shifted = Vec::with_capacity(gains.len() * 2);
        for &(cp, p) in gains {
            shifted.push((cp, p * (1.0 - extra)));
            shifted.push((cp + 1, p * extra));
        }
        shifted
    }

    // ------------------------------------------------------------------------
    // Openers
    // ------------------------------------------------------------------------

    /// Ambush or Garrote, which any spec can open with. Other openers belong
    /// to the spec.
    pub fn stealth_opener(&self, dmg: &Damage<'_>, opener: Opener) -> Option<OpenerPlan> {
        let mh = &self.ctx.stats.mh;
        match opener {
            Opener::Ambush => {
                let dagger = if mh.kind == WeaponKind::Dagger {
                    AMBUSH_DAGGER_BONUS
                } else {
                    1.0
                };
                Some(OpenerPlan {
                    name: "ambush",
                    energy: AMBUSH_COST,
                    cp: AMBUSH_CP,
                    damage: dmg.strike(
                        Hand::Main,
                        AMBUSH_WEAPON_DAMAGE * dagger * mh.normalized_damage(dmg.ap()),
                    ),
                })
            }
            Opener::Garrote => Some(OpenerPlan {
                name: "garrote",
                energy: GARROTE_COST,
                cp: 1.0,
                damage: GARROTE_TICKS
                    * dmg.bleed(GARROTE_TICK_BASE + GARROTE_TICK_AP * dmg.ap()),
            }),
            _ => None,
        }
    }

    /// Openers per second, with their energy and combo points per second.
    /// Damage goes straight into the breakdown.
    pub fn apply_opener(&self, plan: OpenerPlan, breakdown: &mut DpsBreakdown) -> (f64, f64) {
        let rate = timing::opener_rate(self.settings.use_opener(), self.fight());
        let cost = if self.talent(Talent::ShadowFocus) {
            plan.energy * SHADOW_FOCUS_COST
        } else {
            plan.energy
        };
        let multiplier = if self.talent(Talent::Nightstalker) {
            NIGHTSTALKER_MULTIPLIER
        } else {
            1.0
        };
        breakdown.add(plan.name, rate * plan.damage * multiplier);
        (rate * cost, rate * plan.cp)
    }

    /// Openers per second.
    pub fn opener_rate(&self) -> f64 {
        timing::opener_rate(self.settings.use_opener(), self.fight())
    }

    // ------------------------------------------------------------------------
    // Damage shared by every spec
    // ------------------------------------------------------------------------

    /// Auto attacks, split between normal and Shadow Blades swings.
    ///
    /// `speed` multiplies attack speed on top of haste.
    pub fn auto_attacks(
        &self,
        dmg: &Damage<'_>,
        speed: f64,
        shadow_blades_uptime: f64,
        breakdown: &mut DpsBreakdown,
    ) -> Swings {
        let stats = &self.ctx.stats;
        let sb = shadow_blades_uptime.clamp(0.0, 1.0);
        let mut swings = Swings::default();
        for (hand, weapon, penalty, key, sb_key) in [
            (Hand::Main, &stats.mh, 1.0, "mh_autoattack", "mh_shadow_blade"),
            (Hand::Off, &stats.oh, OFF_HAND_PENALTY, "oh_autoattack", "oh_shadow_blade"),
        ] {
            if weapon.speed <= 0.0 {
                continue;
            }
            let rate = self.sheet.haste * speed / weapon.speed;
            let base = weapon.swing_damage(dmg.ap()) * penalty;
            breakdown.add(key, rate * (1.0 - sb) * dmg.auto(hand, base));
            breakdown.add(sb_key, rate * sb * dmg.shadow_strike(hand, base));
            let landed = rate
                * ((1.0 - sb) * self.table.white(hand).land + sb * self.table.yellow(hand).land);
            match hand {
                Hand::Main => swings.mh_landed = landed,
                Hand::Off => swings.oh_landed = landed,
            }
        }
        swings
    }

    /// Shiv casts. Returns landed Shivs per second.
    pub fn shiv(&self, dmg: &Damage<'_>, breakdown: &mut DpsBreakdown) -> f64 {
        let rate = self.shiv_rate();
        let oh = &self.ctx.stats.oh;
        let base = SHIV_WEAPON_DAMAGE * oh.normalized_damage(dmg.ap()) * OFF_HAND_PENALTY;
        breakdown.add("shiv", rate * dmg.strike(Hand::Off, base));
        rate * self.table.yellow(Hand::Off).land
    }

    /// Damage poison from `landed` melee hits per second at `chance` each,
    /// plus `guaranteed` applications per second. Returns landed poison hits
    /// per second.
    pub fn poisons(
        &self,
        dmg: &Damage<'_>,
        landed: f64,
        chance: f64,
        guaranteed: f64,
        breakdown: &mut DpsBreakdown,
    ) -> f64 {
        let applications = landed * chance.clamp(0.0, 1.0) + guaranteed;
        let spell_land = self.table.spell().land;
        match self.settings.dmg_poison() {
            Some(DamagePoison::Deadly) => {
                breakdown.add(
                    "deadly_instant_poison",
                    applications * dmg.spell(DEADLY_INSTANT_BASE + DEADLY_INSTANT_AP * dmg.ap()),
                );
                let dot_up = if applications > 0.0 { 1.0 } else { 0.0 };
                breakdown.add(
                    "deadly_poison",
                    dot_up * dmg.poison_tick(DEADLY_TICK_BASE + DEADLY_TICK_AP * dmg.ap())
                        / DEADLY_TICK_INTERVAL,
                );
                applications * spell_land + dot_up / DEADLY_TICK_INTERVAL
            }
            Some(DamagePoison::Wound) => {
                breakdown.add(
                    "wound_poison",
                    applications * dmg.spell(WOUND_BASE + WOUND_AP * dmg.ap()),
                );
                applications * spell_land
            }
            None => 0.0,
        }
    }

    /// Stormlash totem procs off landed hits.
    pub fn stormlash(&self, dmg: &Damage<'_>, landed: f64, breakdown: &mut DpsBreakdown) {
        if !self.settings.use_stormlash() || landed <= 0.0 {
            return;
        }
        let uptime = cooldown_uptime(STORMLASH_DURATION, STORMLASH_COOLDOWN, self.fight());
        let rate = 1.0 / (STORMLASH_ICD + 1.0 / landed);
        breakdown.add("stormlash", uptime * rate * dmg.spell(STORMLASH_AP * dmg.ap()));
    }

    /// Rupture tick damage at a possibly fractional combo point count.
    pub fn rupture_tick(&self, dmg: &Damage<'_>, cp: f64) -> f64 {
        let cp = cp.clamp(1.0, 5.0);
        // Fractional points interpolate between the table entries.
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let low = (cp.floor() as usize).clamp(1, 5);
        let high = (low + 1).min(5);
        let frac = cp - cp.floor();
        let coefficient =
            RUPTURE_TICK_AP[low - 1] * (1.0 - frac) + RUPTURE_TICK_AP[high - 1] * frac;
        dmg.bleed(RUPTURE_TICK_BASE * cp + coefficient * dmg.ap())
    }

    pub fn rupture_ticks_per_second(&self) -> f64 {
        1.0 / RUPTURE_TICK_INTERVAL
    }

    pub fn rupture_cost(&self, cp: f64) -> f64 {
        self.finisher_cost(RUPTURE_COST, cp)
    }
}

/// Rupture's duration at a combo point count.
pub(crate) fn rupture_duration(cp: f64) -> f64 {
    4.0 + 4.0 * cp
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shifting_gains_preserves_mass() {
        let shifted = Model::shift_gains(&[(2, 0.6), (3, 0.4)], 0.25);
        let mass: f64 = shifted.iter().map(|(_, p)| p).sum();
        assert!((mass - 1.0).abs() < 1e-12);
        #[allow(clippy::cast_precision_loss)]
        let mean: f64 = shifted.iter().map(|(cp, p)| *cp as f64 * p).sum();
        assert!((mean - (2.4 + 0.25)).abs() < 1e-12);
    }

    #[test]
    fn rupture_grows_with_points() {
        assert_eq!(rupture_duration(1.0), 8.0);
        assert_eq!(rupture_duration(5.0), 24.0);
    }
}
