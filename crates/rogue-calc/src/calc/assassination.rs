//! Assassination: Mutilate (Dispatch in execute) into Envenom, with Rupture
//! maintained and poisons doing much of the work.

use armory::Glyph;
use tracing::debug;

use crate::config::{AssassinationCycle, Opener};
use crate::error::CalcError;

use super::breakdown::{DpsBreakdown, Phase};
use super::budget::Budget;
use super::chain;
use super::damage::{Damage, OFF_HAND_PENALTY};
use super::procs::HitRates;
use super::table::Hand;
use super::timing::{cooldown_uptime, maintenance_rate, maintenance_uptime};
use super::{rupture_duration, Model, OpenerPlan, Resolution, SHADOW_BLADES_COOLDOWN};

const MUTILATE_COST: f64 = 55.0;
const MUTILATE_WEAPON_DAMAGE: f64 = 2.8;
const DISPATCH_COST: f64 = 30.0;
const DISPATCH_WEAPON_DAMAGE: f64 = 6.45;
/// Chance per landed Mutilate of a free Dispatch.
const BLINDSIDE_CHANCE: f64 = 0.30;

const ENVENOM_COST: f64 = 35.0;
const ENVENOM_BASE_PER_CP: f64 = 513.0;
const ENVENOM_AP_PER_CP: f64 = 0.112;
/// Deadly Poison proc chance added while Envenom is up.
const ENVENOM_POISON_CHANCE: f64 = 0.15;

const VENOMOUS_WOUNDS_CHANCE: f64 = 0.75;
const VENOMOUS_WOUNDS_ENERGY: f64 = 10.0;
const VENOMOUS_WOUNDS_BASE: f64 = 675.0;
const VENOMOUS_WOUNDS_AP: f64 = 0.16;

/// Assassin's Resolve.
const ASSASSINS_RESOLVE: f64 = 1.20;
/// Potent Poisons per mastery point.
const POTENT_POISONS_PER_MASTERY: f64 = 0.035;

const VENDETTA_BONUS: f64 = 0.30;
const VENDETTA_DURATION: f64 = 20.0;
const VENDETTA_GLYPH_BONUS: f64 = 0.25;
const VENDETTA_GLYPH_DURATION: f64 = 30.0;
const VENDETTA_COOLDOWN: f64 = 120.0;

/// Resolve the Assassination rotation for one phase.
pub(super) fn resolve(
    model: &Model<'_>,
    cycle: &AssassinationCycle,
) -> Result<Resolution, CalcError> {
    let stats = &model.ctx.stats;
    if !(stats.mh.is_dagger() && stats.oh.is_dagger()) {
        return Err(CalcError::WeaponRequirement {
            ability: "mutilate",
            requirement: "a dagger in each hand",
        });
    }

    let execute = model.phase == Phase::Execute;
    let (min_envenom, prioritize_uptime) = if execute {
        (
            cycle.min_envenom_size_execute(),
            cycle.prioritize_rupture_uptime_execute(),
        )
    } else {
        (
            cycle.min_envenom_size_non_execute(),
            cycle.prioritize_rupture_uptime_non_execute(),
        )
    };

    let (vendetta_bonus, vendetta_duration) = if model.glyph(Glyph::Vendetta) {
        (VENDETTA_GLYPH_BONUS, VENDETTA_GLYPH_DURATION)
    } else {
        (VENDETTA_BONUS, VENDETTA_DURATION)
    };
    let vendetta =
        1.0 + vendetta_bonus * cooldown_uptime(vendetta_duration, VENDETTA_COOLDOWN, model.fight());
    let dmg = model.damage().scaled(ASSASSINS_RESOLVE * vendetta);
    let potent_poisons = 1.0 + POTENT_POISONS_PER_MASTERY * model.sheet.mastery;
    let poison_dmg = dmg.scaled(potent_poisons);

    // Held Shadow Blades line up with every other Vendetta.
    let sb_cooldown = if cycle.stack_cds() {
        2.0 * VENDETTA_COOLDOWN
    } else {
        SHADOW_BLADES_COOLDOWN
    };
    let sb_uptime = model.shadow_blades_uptime(sb_cooldown);

    // Generator: Mutilate, or Dispatch below the execute threshold. A
    // Blindside Dispatch rides along with a share of Mutilates.
    let mh_roll = model.table.yellow(Hand::Main);
    let (generator_cost, generator_land, base_gains) = if execute {
        let crit = mh_roll.crit;
        (DISPATCH_COST, mh_roll.land, vec![(1, 1.0 - crit), (2, crit)])
    } else {
        let oh_roll = model.table.yellow(Hand::Off);
        let crit = 1.0 - (1.0 - mh_roll.crit) * (1.0 - oh_roll.crit);
        let mutilate = [(2, 1.0 - crit), (3, crit)];
        let dispatch = [(1, 1.0 - mh_roll.crit), (2, mh_roll.crit)];
        let mut gains = Vec::new();
        for &(cp, p) in &mutilate {
            gains.push((cp, p * (1.0 - BLINDSIDE_CHANCE)));
            for &(extra, q) in &dispatch {
                gains.push((cp + extra, p * BLINDSIDE_CHANCE * q));
            }
        }
        (MUTILATE_COST, mh_roll.land, gains)
    };
    let gains = Model::shift_gains(&base_gains, sb_uptime);
    let result = chain::solve(&gains, min_envenom, model.chain_rules(false));
    let envenom_cp = result.average_cp();

    let regen = model.regen();
    let cost_per_landed =
        model.generator_cost(generator_cost, sb_uptime) / generator_land.max(f64::EPSILON);
    let envenom_cost = model.finisher_cost(ENVENOM_COST, envenom_cp);

    // Rupture: refreshed on fall-off at whatever the bar holds, or held for a
    // full-size finisher.
    let (rupture_cp, rupture_gap) = if prioritize_uptime {
        (result.average_occupancy(), model.reaction_gap())
    } else {
        let cycle_energy =
            result.generators_per_finisher * cost_per_landed + envenom_cost.max(0.0);
        (envenom_cp, 0.5 * cycle_energy / regen.max(f64::EPSILON))
    };
    let rupture_duration = rupture_duration(rupture_cp);
    let rupture_rate = maintenance_rate(rupture_duration, rupture_gap);
    let rupture_uptime = maintenance_uptime(rupture_duration, rupture_gap);
    let rupture_ticks = rupture_uptime * model.rupture_ticks_per_second();
    let venomous_wounds = rupture_ticks * VENOMOUS_WOUNDS_CHANCE;

    let mut breakdown = DpsBreakdown::new();
    let opener = opener_plan(model, &dmg, envenom_cp, potent_poisons);
    let (opener_energy, opener_cp) = model.apply_opener(opener, &mut breakdown);

    let energy = regen + venomous_wounds * VENOMOUS_WOUNDS_ENERGY
        - model.fixed_energy_costs()
        - rupture_rate * model.rupture_cost(rupture_cp)
        - opener_energy;
    let rates = Budget {
        energy,
        generator_cost: cost_per_landed,
        finisher_cost: envenom_cost,
        mean_gain: result.mean_gain,
        cp_per_finisher: result.generator_cp_per_finisher(),
        extra_cp: model.marked_for_death_cp() + opener_cp - rupture_rate * rupture_cp,
    }
    .solve();
    let generator_casts = rates.generator / generator_land.max(f64::EPSILON);

    // Generators.
    let mh = &stats.mh;
    let oh = &stats.oh;
    let dispatch_hit = dmg.strike(
        Hand::Main,
        DISPATCH_WEAPON_DAMAGE * mh.normalized_damage(dmg.ap()),
    );
    let mut melee_landed = 0.0;
    if execute {
        breakdown.add("dispatch", generator_casts * dispatch_hit);
        melee_landed += rates.generator;
    } else {
        let mutilate = MUTILATE_WEAPON_DAMAGE
            * (dmg.strike(Hand::Main, mh.normalized_damage(dmg.ap()))
                + dmg.strike(Hand::Off, oh.normalized_damage(dmg.ap()) * OFF_HAND_PENALTY));
        breakdown.add("mutilate", generator_casts * mutilate);
        let blindside = rates.generator * BLINDSIDE_CHANCE;
        breakdown.add("dispatch", blindside * dispatch_hit);
        melee_landed += 2.0 * rates.generator + blindside * mh_roll.land;
    }

    // Finishers and bleeds.
    let envenom = envenom_hit(model, &dmg, envenom_cp, potent_poisons);
    breakdown.add("envenom", rates.finisher * envenom);
    let envenom_uptime = (rates.finisher * (1.0 + envenom_cp)).min(1.0);

    breakdown.add(
        "rupture",
        rupture_ticks * model.rupture_tick(&dmg, rupture_cp + model.finisher_bonus_cp()),
    );
    let wound_hit = dmg.spell(VENOMOUS_WOUNDS_BASE + VENOMOUS_WOUNDS_AP * dmg.ap())
        * model.t14_multiplier();
    breakdown.add("venomous_wounds", venomous_wounds * wound_hit);

    // Slice and Dice is kept up by Cut to the Chase.
    let swings = model.auto_attacks(&dmg, 1.4, sb_uptime, &mut breakdown);
    let shiv_landed = model.shiv(&dmg, &mut breakdown);
    melee_landed += swings.landed() + shiv_landed + rupture_rate * mh_roll.land;

    let poison_landed = model.poisons(
        &poison_dmg,
        melee_landed,
        super::POISON_CHANCE + ENVENOM_POISON_CHANCE * envenom_uptime,
        shiv_landed,
        &mut breakdown,
    );
    model.stormlash(&dmg, melee_landed, &mut breakdown);

    debug!(
        execute,
        envenoms = rates.finisher,
        generators = rates.generator,
        envenom_cp,
        rupture_uptime,
        "resolved assassination rotation"
    );
    Ok(Resolution {
        breakdown,
        hits: HitRates {
            melee: melee_landed,
            spell: poison_landed + rates.finisher,
            haste: model.sheet.haste,
        },
    })
}

/// One Envenom spending `cp` combo points.
fn envenom_hit(model: &Model<'_>, dmg: &Damage<'_>, cp: f64, potent_poisons: f64) -> f64 {
    let size = cp + model.finisher_bonus_cp();
    dmg.spell_with(
        model.table.yellow(Hand::Main),
        size * (ENVENOM_BASE_PER_CP + ENVENOM_AP_PER_CP * dmg.ap()),
    ) * potent_poisons
        * model.finisher_multiplier()
}

fn opener_plan(
    model: &Model<'_>,
    dmg: &Damage<'_>,
    envenom_cp: f64,
    potent_poisons: f64,
) -> OpenerPlan {
    let opener = model.settings.opener();
    if let Some(plan) = model.stealth_opener(dmg, opener) {
        return plan;
    }
    let stats = &model.ctx.stats;
    let ap = dmg.ap();
    match opener {
        Opener::Dispatch => OpenerPlan {
            name: "dispatch",
            energy: DISPATCH_COST,
            cp: 1.0,
            damage: dmg.strike(
                Hand::Main,
                DISPATCH_WEAPON_DAMAGE * stats.mh.normalized_damage(ap),
            ),
        },
        Opener::Envenom => OpenerPlan {
            name: "envenom",
            energy: model.finisher_cost(ENVENOM_COST, envenom_cp),
            cp: -envenom_cp,
            damage: envenom_hit(model, dmg, envenom_cp, potent_poisons),
        },
        _ => OpenerPlan {
            name: "mutilate",
            energy: MUTILATE_COST,
            cp: 2.0,
            damage: MUTILATE_WEAPON_DAMAGE
                * (dmg.strike(Hand::Main, stats.mh.normalized_damage(ap))
                    + dmg.strike(
                        Hand::Off,
                        stats.oh.normalized_damage(ap) * OFF_HAND_PENALTY,
                    )),
        },
    }
}

#[cfg(test)]
mod tests {
    use armory::GearBuffs;

    use super::*;
    use crate::calc::sheet::StatBonus;
    use crate::tests::helpers::{assassination_context, assassination_settings};

    #[test]
    fn opening_envenom_matches_rotation_envenom() {
        let settings = assassination_settings();
        let mut ctx = assassination_context();
        ctx.stats.gear_buffs |= GearBuffs::ROGUE_T15_2PC | GearBuffs::ROGUE_T16_4PC;
        let model =
            Model::new(&settings, &ctx, Phase::NonExecute, &StatBonus::default()).unwrap();
        let dmg = model.damage();
        let potent_poisons = 1.0 + POTENT_POISONS_PER_MASTERY * model.sheet.mastery;

        let plan = opener_plan(&model, &dmg, 4.0, potent_poisons);
        assert_eq!(plan.name, "envenom");
        assert_eq!(plan.damage, envenom_hit(&model, &dmg, 4.0, potent_poisons));

        // Tier bonuses and Potent Poisons all reach the opening hit.
        let bare = dmg.spell_with(
            model.table.yellow(Hand::Main),
            4.0 * (ENVENOM_BASE_PER_CP + ENVENOM_AP_PER_CP * dmg.ap()),
        );
        let expected = bare * 5.0 / 4.0 * potent_poisons * model.finisher_multiplier();
        assert!(model.finisher_multiplier() > 1.0);
        assert!((plan.damage - expected).abs() < 1e-9 * expected);
    }
}
