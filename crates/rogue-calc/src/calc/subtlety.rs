//! Subtlety: Backstab (or Hemorrhage) into Eviscerate, with Rupture and
//! Slice and Dice maintained, Honor Among Thieves feeding combo points and
//! Shadow Dance windows spent on Ambush.

use armory::Glyph;
use tracing::debug;

use crate::config::{HemorrhageUsage, Opener, SbTiming, SubtletyCycle};
use crate::error::CalcError;

use super::breakdown::DpsBreakdown;
use super::budget::Budget;
use super::chain;
use super::damage::Damage;
use super::procs::HitRates;
use super::table::Hand;
use super::timing::{maintenance_rate, maintenance_uptime};
use super::{
    rupture_duration, Model, OpenerPlan, Resolution, AMBUSH_COST, AMBUSH_CP, AMBUSH_DAGGER_BONUS,
    AMBUSH_WEAPON_DAMAGE, SHADOW_BLADES_COOLDOWN,
};

const BACKSTAB_COST: f64 = 35.0;
const BACKSTAB_WEAPON_DAMAGE: f64 = 3.8;
const HEMORRHAGE_COST: f64 = 30.0;
const HEMORRHAGE_WEAPON_DAMAGE: f64 = 1.6;
const HEMORRHAGE_DAGGER_BONUS: f64 = 1.45;
/// Share of Hemorrhage's hit added as a bleed.
const HEMORRHAGE_DOT_SHARE: f64 = 0.5;
const HEMORRHAGE_DOT_DURATION: f64 = 24.0;

const EVISCERATE_COST: f64 = 35.0;
const EVISCERATE_BASE_PER_CP: f64 = 300.0;
const EVISCERATE_AP_PER_CP: f64 = 0.18;

const SLICE_AND_DICE_COST: f64 = 25.0;
const SLICE_AND_DICE_SPEED: f64 = 0.40;
const ENERGETIC_RECOVERY: f64 = 4.0;

const SHADOW_DANCE_DURATION: f64 = 8.0;
const SHADOW_DANCE_COOLDOWN: f64 = 60.0;
/// Energy pooled before a dance.
const SHADOW_DANCE_POOL: f64 = 75.0;
/// Global cooldowns in a dance.
const SHADOW_DANCE_MAX_AMBUSHES: f64 = 8.0;
const PREMEDITATION_CP: f64 = 2.0;

const FIND_WEAKNESS_ARMOR: f64 = 0.70;
const FIND_WEAKNESS_DURATION: f64 = 10.0;
const MASTER_OF_SUBTLETY: f64 = 0.10;
const MASTER_OF_SUBTLETY_DURATION: f64 = 6.0;
const SANGUINARY_VEIN: f64 = 0.25;
/// Executioner per mastery point.
const EXECUTIONER_PER_MASTERY: f64 = 0.03;

/// Seconds between raid crits feeding Honor Among Thieves are at least this.
const HONOR_AMONG_THIEVES_ICD: f64 = 2.0;

/// Resolve the Subtlety rotation. The execute phase plays the same way.
pub(super) fn resolve(model: &Model<'_>, cycle: &SubtletyCycle) -> Result<Resolution, CalcError> {
    let stats = &model.ctx.stats;
    let hemorrhage = cycle.use_hemorrhage();
    let uses_backstab = !matches!(hemorrhage, HemorrhageUsage::Always);
    if uses_backstab && !stats.mh.is_dagger() {
        return Err(CalcError::WeaponRequirement {
            ability: "backstab",
            requirement: "a main-hand dagger",
        });
    }

    let mh_roll = model.table.yellow(Hand::Main);
    let land = mh_roll.land.max(f64::EPSILON);
    let regen_base = model.regen();
    let reaction = model.reaction_gap();
    let opener_rate = model.opener_rate();

    let sb_uptime = model.shadow_blades_uptime(SHADOW_BLADES_COOLDOWN);
    let dance_rate = 1.0 / SHADOW_DANCE_COOLDOWN;
    let dance_uptime = SHADOW_DANCE_DURATION * dance_rate;

    // Share of dance ambushes that land inside Shadow Blades.
    let sb_on_ambush = match cycle.sub_sb_timing() {
        SbTiming::ShadowDance => (SHADOW_DANCE_COOLDOWN / SHADOW_BLADES_COOLDOWN).min(1.0),
        SbTiming::FindWeakness => 0.0,
        SbTiming::Other => sb_uptime,
    };

    let generator_cost = if uses_backstab {
        BACKSTAB_COST
    } else {
        HEMORRHAGE_COST
    };
    let hemo_interval_rate = match hemorrhage {
        HemorrhageUsage::Interval(interval) if interval > 0.0 => 1.0 / interval,
        _ => 0.0,
    };

    let gains = Model::shift_gains(&[(1, 1.0)], sb_uptime);
    let result = chain::solve(&gains, 5, model.chain_rules(false));
    let finisher_cp = result.average_cp();

    // Maintenance finishers.
    let snd_duration = 6.0 + 6.0 * finisher_cp;
    let snd_rate = maintenance_rate(snd_duration, reaction);
    let snd_uptime = maintenance_uptime(snd_duration, reaction);
    let rupture_len = rupture_duration(finisher_cp);
    let rupture_rate = maintenance_rate(rupture_len, reaction);
    let rupture_uptime = maintenance_uptime(rupture_len, reaction);

    let regen = regen_base + ENERGETIC_RECOVERY * snd_uptime;
    let ambush_cost = model.generator_cost(AMBUSH_COST, sb_on_ambush);
    let ambushes_per_dance = ((SHADOW_DANCE_POOL + SHADOW_DANCE_DURATION * regen)
        / ambush_cost.max(1.0))
    .min(SHADOW_DANCE_MAX_AMBUSHES);
    let ambush_rate = dance_rate * ambushes_per_dance;

    let raid_crits = cycle.raid_crits_per_second();
    let hat = if raid_crits > 0.0 {
        1.0 / (HONOR_AMONG_THIEVES_ICD + 1.0 / raid_crits)
    } else {
        0.0
    };

    let mut breakdown = DpsBreakdown::new();
    let find_weakness = (dance_rate * (SHADOW_DANCE_DURATION + FIND_WEAKNESS_DURATION)
        + opener_rate * FIND_WEAKNESS_DURATION)
        .min(1.0);
    let master_of_subtlety = (dance_rate * (SHADOW_DANCE_DURATION + MASTER_OF_SUBTLETY_DURATION)
        + opener_rate * MASTER_OF_SUBTLETY_DURATION)
        .min(1.0);
    let armor = (1.0 - find_weakness) * model.sheet.armor_multiplier(0.0)
        + find_weakness * model.sheet.armor_multiplier(FIND_WEAKNESS_ARMOR);

    let hemo_cost = model.generator_cost(HEMORRHAGE_COST, sb_uptime);
    let dmg = model
        .damage()
        .with_armor_multiplier(armor)
        .scaled(1.0 + MASTER_OF_SUBTLETY * master_of_subtlety);
    let opener = opener_plan(model, &dmg, finisher_cp, uses_backstab);
    let (opener_energy, opener_cp) = model.apply_opener(opener, &mut breakdown);

    let energy = regen
        - model.fixed_energy_costs()
        - snd_rate * model.finisher_cost(SLICE_AND_DICE_COST, finisher_cp)
        - rupture_rate * model.rupture_cost(finisher_cp)
        - ambush_rate * ambush_cost
        - hemo_interval_rate * hemo_cost
        - opener_energy;
    let extra_cp = hat
        + PREMEDITATION_CP * (dance_rate + opener_rate)
        + ambush_rate * land * (AMBUSH_CP + sb_on_ambush)
        + hemo_interval_rate * land * (1.0 + sb_uptime)
        + model.marked_for_death_cp()
        + opener_cp
        - (snd_rate + rupture_rate) * finisher_cp;
    let rates = Budget {
        energy,
        generator_cost: model.generator_cost(generator_cost, sb_uptime) / land,
        finisher_cost: model.finisher_cost(EVISCERATE_COST, finisher_cp),
        mean_gain: result.mean_gain,
        cp_per_finisher: result.generator_cp_per_finisher(),
        extra_cp,
    }
    .solve();

    // Bleeds on the target feed Sanguinary Vein; with the glyph Hemorrhage
    // counts too.
    let hemo_casts = match hemorrhage {
        HemorrhageUsage::Always => rates.generator / land,
        HemorrhageUsage::Interval(_) => hemo_interval_rate,
        HemorrhageUsage::Never => 0.0,
    };
    let hemo_dot_uptime = (hemo_casts * land * HEMORRHAGE_DOT_DURATION).min(1.0);
    let bleed_uptime = if model.glyph(Glyph::HemorrhagingVeins) {
        rupture_uptime.max(hemo_dot_uptime)
    } else {
        rupture_uptime
    };
    let dmg = dmg.scaled(1.0 + SANGUINARY_VEIN * bleed_uptime);

    let mh = &stats.mh;
    let ap = dmg.ap();
    let mh_normalized = mh.normalized_damage(ap);
    let dagger = mh.is_dagger();

    let hemo_hit = dmg.strike(
        Hand::Main,
        HEMORRHAGE_WEAPON_DAMAGE
            * mh_normalized
            * if dagger { HEMORRHAGE_DAGGER_BONUS } else { 1.0 },
    );
    breakdown.add("hemorrhage", hemo_casts * hemo_hit);
    breakdown.add("hemorrhage_dot", hemo_casts * HEMORRHAGE_DOT_SHARE * hemo_hit);
    if uses_backstab {
        let backstab_hit = dmg.strike(Hand::Main, BACKSTAB_WEAPON_DAMAGE * mh_normalized)
            * model.t14_multiplier();
        breakdown.add("backstab", rates.generator / land * backstab_hit);
    }

    let ambush_hit = dmg.strike(
        Hand::Main,
        AMBUSH_WEAPON_DAMAGE * mh_normalized * if dagger { AMBUSH_DAGGER_BONUS } else { 1.0 },
    );
    breakdown.add("ambush", ambush_rate * ambush_hit);

    let executioner = 1.0 + EXECUTIONER_PER_MASTERY * model.sheet.mastery;
    let finisher_dmg = dmg.scaled(executioner * model.finisher_multiplier());
    let size = finisher_cp + model.finisher_bonus_cp();
    let eviscerate_hit = finisher_dmg.strike(
        Hand::Main,
        size * (EVISCERATE_BASE_PER_CP + EVISCERATE_AP_PER_CP * ap),
    );
    breakdown.add("eviscerate", rates.finisher * eviscerate_hit);
    breakdown.add(
        "rupture",
        rupture_uptime * model.rupture_ticks_per_second() * model.rupture_tick(&finisher_dmg, size),
    );

    let speed = 1.0 + SLICE_AND_DICE_SPEED * snd_uptime;
    let swings = model.auto_attacks(&dmg, speed, sb_uptime, &mut breakdown);
    let shiv_landed = model.shiv(&dmg, &mut breakdown);
    let melee_landed = swings.landed()
        + rates.generator
        + hemo_interval_rate * land
        + ambush_rate * land
        + (rates.finisher + snd_rate + rupture_rate) * land
        + shiv_landed;
    let poison_landed =
        model.poisons(&dmg, melee_landed, super::POISON_CHANCE, shiv_landed, &mut breakdown);
    model.stormlash(&dmg, melee_landed, &mut breakdown);

    debug!(
        eviscerates = rates.finisher,
        generators = rates.generator,
        ambushes = ambush_rate,
        find_weakness,
        dance_uptime,
        "resolved subtlety rotation"
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

fn opener_plan(
    model: &Model<'_>,
    dmg: &Damage<'_>,
    finisher_cp: f64,
    uses_backstab: bool,
) -> OpenerPlan {
    let opener = model.settings.opener();
    if let Some(plan) = model.stealth_opener(dmg, opener) {
        return plan;
    }
    let ap = dmg.ap();
    if opener == Opener::Eviscerate {
        return OpenerPlan {
            name: "eviscerate",
            energy: model.finisher_cost(EVISCERATE_COST, finisher_cp),
            cp: -finisher_cp,
            damage: dmg.strike(
                Hand::Main,
                finisher_cp * (EVISCERATE_BASE_PER_CP + EVISCERATE_AP_PER_CP * ap),
            ),
        };
    }
    let mh_normalized = model.ctx.stats.mh.normalized_damage(ap);
    if uses_backstab {
        OpenerPlan {
            name: "backstab",
            energy: BACKSTAB_COST,
            cp: 1.0,
            damage: dmg.strike(Hand::Main, BACKSTAB_WEAPON_DAMAGE * mh_normalized),
        }
    } else {
        OpenerPlan {
            name: "hemorrhage",
            energy: HEMORRHAGE_COST,
            cp: 1.0,
            damage: dmg.strike(Hand::Main, HEMORRHAGE_WEAPON_DAMAGE * mh_normalized),
        }
    }
}
