//! Combat: Sinister Strike into Eviscerate under Revealing Strike, with
//! Slice and Dice maintained and cooldowns shortened by Restless Blades.

use tracing::debug;

use crate::config::{CombatCycle, Opener};
use crate::error::CalcError;

use super::breakdown::DpsBreakdown;
use super::budget::Budget;
use super::chain;
use super::damage::{Damage, OFF_HAND_PENALTY};
use super::procs::HitRates;
use super::table::Hand;
use super::timing::{maintenance_rate, maintenance_uptime};
use super::{rupture_duration, Model, OpenerPlan, Resolution, SHADOW_BLADES_COOLDOWN};

const SINISTER_STRIKE_COST: f64 = 50.0;
const SINISTER_STRIKE_WEAPON_DAMAGE: f64 = 2.4;
/// Extra combo point chance on Sinister Strike while Revealing Strike is up.
const SINISTER_STRIKE_EXTRA_CP: f64 = 0.20;

const REVEALING_STRIKE_COST: f64 = 40.0;
const REVEALING_STRIKE_WEAPON_DAMAGE: f64 = 1.6;
const REVEALING_STRIKE_DURATION: f64 = 24.0;
const REVEALING_STRIKE_FINISHER_BONUS: f64 = 0.35;

const EVISCERATE_COST: f64 = 35.0;
const EVISCERATE_BASE_PER_CP: f64 = 300.0;
const EVISCERATE_AP_PER_CP: f64 = 0.18;

const SLICE_AND_DICE_COST: f64 = 25.0;
const SLICE_AND_DICE_SPEED: f64 = 0.40;

/// Main Gauche chance per mastery point.
const MAIN_GAUCHE_PER_MASTERY: f64 = 0.02;
const COMBAT_POTENCY_CHANCE: f64 = 0.20;
const COMBAT_POTENCY_ENERGY: f64 = 15.0;
/// Off-hand speed Combat Potency's chance is normalized to.
const COMBAT_POTENCY_SPEED: f64 = 1.4;

/// Vitality energy regeneration bonus.
const VITALITY_REGEN: f64 = 1.2;

const ADRENALINE_RUSH_DURATION: f64 = 15.0;
const ADRENALINE_RUSH_COOLDOWN: f64 = 180.0;
const ADRENALINE_RUSH_SPEED: f64 = 0.20;

const KILLING_SPREE_COOLDOWN: f64 = 120.0;
const KILLING_SPREE_HITS: f64 = 7.0;
const KILLING_SPREE_BONUS: f64 = 1.5;
/// Extra cooldown while Killing Spree waits for Deep Insight.
const KILLING_SPREE_DELAY: f64 = 7.5;
const KILLING_SPREE_DELAYED_GUILE: f64 = 1.3;

/// Seconds of cooldown shaved per combo point spent.
const RESTLESS_BLADES_PER_CP: f64 = 2.0;
const RESTLESS_BLADES_ITERATIONS: usize = 3;

const BLADE_FLURRY_DAMAGE: f64 = 0.40;
const BLADE_FLURRY_REGEN: f64 = 0.8;

/// Bandit's Guile bonus at each of its three stages.
const GUILE_STAGES: [f64; 3] = [0.1, 0.2, 0.3];
/// Landed hits needed to reach each stage.
const GUILE_HITS_PER_STAGE: f64 = 4.0;
const DEEP_INSIGHT_DURATION: f64 = 15.0;

/// Average Bandit's Guile bonus at `hits` landed Sinister and Revealing
/// Strikes per second.
///
/// Four hits build to Shallow Insight, four more to Moderate, four more to
/// Deep, which lasts fifteen seconds before the cycle starts over with no
/// bonus.
fn bandits_guile(hits: f64) -> f64 {
    if hits <= 0.0 {
        return 0.0;
    }
    let stage = GUILE_HITS_PER_STAGE / hits;
    let weighted = GUILE_STAGES[0] * stage + GUILE_STAGES[1] * stage
        + GUILE_STAGES[2] * DEEP_INSIGHT_DURATION;
    weighted / (3.0 * stage + DEEP_INSIGHT_DURATION)
}

/// Resolve the Combat rotation. The execute phase plays the same way.
pub(super) fn resolve(model: &Model<'_>, cycle: &CombatCycle) -> Result<Resolution, CalcError> {
    let stats = &model.ctx.stats;
    let mh_roll = model.table.yellow(Hand::Main);
    let land = mh_roll.land.max(f64::EPSILON);

    let adds = model.settings.num_boss_adds().floor();
    let flurry_targets = if cycle.blade_flurry {
        adds.min(f64::from(cycle.bf_targets))
    } else {
        0.0
    };
    let base_regen = model.regen()
        * VITALITY_REGEN
        * if flurry_targets > 0.0 {
            BLADE_FLURRY_REGEN
        } else {
            1.0
        };

    // Main Gauche off main-hand hits, Combat Potency off off-hand hits.
    let main_gauche = (MAIN_GAUCHE_PER_MASTERY * model.sheet.mastery).clamp(0.0, 1.0);
    let potency =
        COMBAT_POTENCY_CHANCE * stats.oh.speed / COMBAT_POTENCY_SPEED * COMBAT_POTENCY_ENERGY;
    let oh_land = model.table.yellow(Hand::Off).land;
    let potency_per_main_hand_hit = main_gauche * oh_land * potency;

    // Revealing Strike is pooled for, or slotted in at the next free global.
    let sb_guess = model.shadow_blades_uptime(SHADOW_BLADES_COOLDOWN);
    let ss_cost =
        model.generator_cost(SINISTER_STRIKE_COST, sb_guess) / land - potency_per_main_hand_hit;
    let rvs_gap = if cycle.revealing_strike_pooling {
        model.reaction_gap()
    } else {
        0.5 * ss_cost.max(0.0) / base_regen.max(f64::EPSILON)
    };
    let rvs_rate = maintenance_rate(REVEALING_STRIKE_DURATION, rvs_gap);
    let rvs_uptime = maintenance_uptime(REVEALING_STRIKE_DURATION, rvs_gap);
    let rvs_cost = model.generator_cost(REVEALING_STRIKE_COST, sb_guess);

    let dmg = model.damage();

    // One pass of the rotation at a given Adrenaline Rush cooldown.
    let solve_pass = |ar_cooldown: f64| {
        let ar_uptime = (ADRENALINE_RUSH_DURATION / ar_cooldown).min(1.0);
        // Held Shadow Blades go out with the next Adrenaline Rush.
        let sb_cooldown = if cycle.stack_cds {
            (SHADOW_BLADES_COOLDOWN / ar_cooldown).ceil() * ar_cooldown
        } else {
            SHADOW_BLADES_COOLDOWN
        };
        let sb_uptime = model.shadow_blades_uptime(sb_cooldown);

        let extra_cp = SINISTER_STRIKE_EXTRA_CP * rvs_uptime;
        let gains = Model::shift_gains(&[(1, 1.0 - extra_cp), (2, extra_cp)], sb_uptime);
        let result = chain::solve(&gains, 5, model.chain_rules(true));
        let finisher_cp = result.average_cp();

        let regen = base_regen * (1.0 + ar_uptime);
        let snd_cp = finisher_cp;
        let snd_duration = 6.0 + 6.0 * snd_cp;
        let snd_rate = maintenance_rate(snd_duration, model.reaction_gap());
        let snd_uptime = maintenance_uptime(snd_duration, model.reaction_gap());
        let (rupture_rate, rupture_uptime) = if cycle.use_rupture {
            let duration = rupture_duration(finisher_cp);
            (
                maintenance_rate(duration, model.reaction_gap()),
                maintenance_uptime(duration, model.reaction_gap()),
            )
        } else {
            (0.0, 0.0)
        };

        // Off-hand autos proc Combat Potency independently of the rotation.
        let speed = (1.0 + SLICE_AND_DICE_SPEED * snd_uptime)
            * (1.0 + ADRENALINE_RUSH_SPEED * ar_uptime);
        let mh_auto_landed = model.sheet.haste * speed / stats.mh.speed.max(f64::EPSILON)
            * model.table.white(Hand::Main).land;
        let oh_auto_landed = model.sheet.haste * speed / stats.oh.speed.max(f64::EPSILON)
            * model.table.white(Hand::Off).land;
        let auto_energy = oh_auto_landed * potency + mh_auto_landed * potency_per_main_hand_hit;

        // Stacked, every Shadow Blades swing is made at Adrenaline Rush speed.
        let sb_swing_share = if cycle.stack_cds {
            (sb_uptime * (1.0 + ADRENALINE_RUSH_SPEED) / (1.0 + ADRENALINE_RUSH_SPEED * ar_uptime))
                .min(1.0)
        } else {
            sb_uptime
        };

        let rvs_gain = 1.0 + sb_uptime;
        let maintenance_cost = snd_rate * model.finisher_cost(SLICE_AND_DICE_COST, snd_cp)
            + rupture_rate * model.rupture_cost(finisher_cp);
        let mut plan_breakdown = DpsBreakdown::new();
        let (opener_energy, opener_cp) =
            model.apply_opener(opener_plan(model, &dmg, finisher_cp), &mut plan_breakdown);
        let energy = regen + auto_energy
            - model.fixed_energy_costs()
            - rvs_rate * (rvs_cost - land * potency_per_main_hand_hit)
            - maintenance_cost
            - opener_energy;
        let rates = Budget {
            energy,
            generator_cost: model.generator_cost(SINISTER_STRIKE_COST, sb_uptime) / land
                - potency_per_main_hand_hit,
            finisher_cost: model.finisher_cost(EVISCERATE_COST, finisher_cp),
            mean_gain: result.mean_gain,
            cp_per_finisher: result.generator_cp_per_finisher(),
            extra_cp: rvs_rate * land * rvs_gain + model.marked_for_death_cp() + opener_cp
                - (snd_rate + rupture_rate) * snd_cp,
        }
        .solve();

        let cp_spent = (rates.finisher + snd_rate + rupture_rate) * finisher_cp;
        Rotation {
            rates_finisher: rates.finisher,
            rates_generator: rates.generator,
            finisher_cp,
            snd_rate,
            rupture_rate,
            rupture_uptime,
            speed,
            sb_swing_share,
            shorten: 1.0 + RESTLESS_BLADES_PER_CP * cp_spent,
            plan_breakdown,
        }
    };

    // Restless Blades feeds back through Adrenaline Rush, so iterate.
    let mut rotation = solve_pass(ADRENALINE_RUSH_COOLDOWN);
    for _ in 1..RESTLESS_BLADES_ITERATIONS {
        rotation = solve_pass(ADRENALINE_RUSH_COOLDOWN / rotation.shorten);
    }
    let ar_cooldown = ADRENALINE_RUSH_COOLDOWN / rotation.shorten;
    let ksp_cooldown = KILLING_SPREE_COOLDOWN / rotation.shorten;

    let mut breakdown = DpsBreakdown::new();
    for (name, dps) in rotation.plan_breakdown.iter() {
        breakdown.add(name, dps);
    }

    let ss_landed = rotation.rates_generator;
    let rvs_landed = rvs_rate * land;
    let guile = bandits_guile(ss_landed + rvs_landed);
    let ksp_guile = if cycle.ksp_immediately {
        guile
    } else {
        guile * KILLING_SPREE_DELAYED_GUILE
    };
    let ksp_cooldown = if cycle.ksp_immediately {
        ksp_cooldown
    } else {
        ksp_cooldown + KILLING_SPREE_DELAY
    };
    let guile_dmg = dmg.scaled(1.0 + guile);

    let mh = &stats.mh;
    let oh = &stats.oh;
    let ap = dmg.ap();
    let mh_normalized = mh.normalized_damage(ap);

    let ss_hit = guile_dmg.strike(Hand::Main, SINISTER_STRIKE_WEAPON_DAMAGE * mh_normalized)
        * model.t14_multiplier();
    breakdown.add("sinister_strike", ss_landed / land * ss_hit);
    let rvs_hit = guile_dmg.strike(Hand::Main, REVEALING_STRIKE_WEAPON_DAMAGE * mh_normalized);
    breakdown.add("revealing_strike", rvs_rate * rvs_hit);

    let finisher_dmg = guile_dmg
        .scaled((1.0 + REVEALING_STRIKE_FINISHER_BONUS * rvs_uptime) * model.finisher_multiplier());
    let eviscerate_size = rotation.finisher_cp + model.finisher_bonus_cp();
    let eviscerate_hit = finisher_dmg.strike(
        Hand::Main,
        eviscerate_size * (EVISCERATE_BASE_PER_CP + EVISCERATE_AP_PER_CP * ap),
    );
    breakdown.add("eviscerate", rotation.rates_finisher * eviscerate_hit);
    breakdown.add(
        "rupture",
        rotation.rupture_uptime
            * model.rupture_ticks_per_second()
            * model.rupture_tick(&finisher_dmg, eviscerate_size),
    );

    let swings = model.auto_attacks(
        &guile_dmg,
        rotation.speed,
        rotation.sb_swing_share,
        &mut breakdown,
    );

    // Main Gauche from every landed main-hand hit.
    let mh_hits = swings.mh_landed + ss_landed + rvs_landed;
    let main_gauche_rate = mh_hits * main_gauche;
    let main_gauche_hit = guile_dmg.strike(Hand::Off, oh.normalized_damage(ap) * OFF_HAND_PENALTY);
    breakdown.add("main_gauche", main_gauche_rate * main_gauche_hit);

    // Killing Spree, with the off hand swapped to main-hand stats if asked.
    let ksp_dmg = dmg.scaled((1.0 + ksp_guile) * KILLING_SPREE_BONUS);
    let ksp_off = if cycle.weapon_swap { mh } else { oh };
    let ksp_hits = KILLING_SPREE_HITS
        * (ksp_dmg.strike(Hand::Main, mh_normalized)
            + ksp_dmg.strike(Hand::Off, ksp_off.normalized_damage(ap) * OFF_HAND_PENALTY));
    let ksp_rate = 1.0 / ksp_cooldown.max(f64::EPSILON);
    breakdown.add("killing_spree", ksp_rate * ksp_hits);

    let shiv_landed = model.shiv(&guile_dmg, &mut breakdown);
    let melee_landed = swings.landed()
        + ss_landed
        + rvs_landed
        + main_gauche_rate * oh_land
        + rotation.rates_finisher * land
        + (rotation.snd_rate + rotation.rupture_rate) * land
        + ksp_rate * KILLING_SPREE_HITS * 2.0 * land
        + shiv_landed;

    let poison_landed =
        model.poisons(&guile_dmg, melee_landed, super::POISON_CHANCE, shiv_landed, &mut breakdown);
    model.stormlash(&guile_dmg, melee_landed, &mut breakdown);

    // Blade Flurry copies single-target melee damage to nearby targets.
    if flurry_targets > 0.0 {
        let single_target: f64 = [
            "sinister_strike",
            "revealing_strike",
            "eviscerate",
            "mh_autoattack",
            "oh_autoattack",
            "main_gauche",
            "killing_spree",
        ]
        .iter()
        .filter_map(|key| breakdown.get(key))
        .sum();
        breakdown.add("blade_flurry", single_target * BLADE_FLURRY_DAMAGE * flurry_targets);
    }

    debug!(
        eviscerates = rotation.rates_finisher,
        sinister_strikes = ss_landed,
        guile,
        ksp_cooldown,
        ar_cooldown,
        "resolved combat rotation"
    );
    Ok(Resolution {
        breakdown,
        hits: HitRates {
            melee: melee_landed,
            spell: poison_landed,
            haste: model.sheet.haste,
        },
    })
}

/// One pass of the Restless Blades iteration.
struct Rotation {
    rates_finisher: f64,
    rates_generator: f64,
    finisher_cp: f64,
    snd_rate: f64,
    rupture_rate: f64,
    rupture_uptime: f64,
    speed: f64,
    /// Share of auto attacks made under Shadow Blades
    sb_swing_share: f64,
    /// Cooldown divisor from Restless Blades
    shorten: f64,
    plan_breakdown: DpsBreakdown,
}

fn opener_plan(model: &Model<'_>, dmg: &Damage<'_>, finisher_cp: f64) -> OpenerPlan {
    let opener = model.settings.opener();
    if let Some(plan) = model.stealth_opener(dmg, opener) {
        return plan;
    }
    let ap = dmg.ap();
    let mh_normalized = model.ctx.stats.mh.normalized_damage(ap);
    match opener {
        Opener::RevealingStrike => OpenerPlan {
            name: "revealing_strike",
            energy: REVEALING_STRIKE_COST,
            cp: 1.0,
            damage: dmg.strike(Hand::Main, REVEALING_STRIKE_WEAPON_DAMAGE * mh_normalized),
        },
        Opener::Eviscerate => OpenerPlan {
            name: "eviscerate",
            energy: model.finisher_cost(EVISCERATE_COST, finisher_cp),
            cp: -finisher_cp,
            damage: dmg.strike(
                Hand::Main,
                (finisher_cp + model.finisher_bonus_cp())
                    * (EVISCERATE_BASE_PER_CP + EVISCERATE_AP_PER_CP * ap),
            ) * model.finisher_multiplier(),
        },
        _ => OpenerPlan {
            name: "sinister_strike",
            energy: SINISTER_STRIKE_COST,
            cp: 1.0,
            damage: dmg.strike(Hand::Main, SINISTER_STRIKE_WEAPON_DAMAGE * mh_normalized),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guile_averages_between_stages() {
        let guile = bandits_guile(1.0);
        // 4 s at nothing, 4 s at 10%, 4 s at 20%, 15 s at 30%.
        let expected = (0.4 + 0.8 + 4.5) / 27.0;
        assert!((guile - expected).abs() < 1e-12);
    }

    #[test]
    fn guile_grows_with_hit_rate() {
        assert!(bandits_guile(2.0) > bandits_guile(0.5));
        assert!(bandits_guile(1e9) < 0.3 + 1e-6);
        assert_eq!(bandits_guile(0.0), 0.0);
    }
}
