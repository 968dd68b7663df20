//! Full breakdowns for each spec.

use crate::calc::{compute_breakdown, DamageCalculator, DpsBreakdown, DpsReport, Phase};
use crate::config::{AssassinationCycle, CombatCycle, Settings, SubtletyCycle};
use crate::error::CalcError;

use super::helpers::{
    assassination_context, assassination_settings, combat_context, combat_settings,
    subtlety_context, subtlety_settings, with_swords,
};

fn assert_sane(breakdown: &DpsBreakdown) {
    assert!(!breakdown.is_empty());
    assert!(breakdown.total().is_finite());
    assert!(breakdown.total() > 0.0);
    assert!(breakdown.iter().all(|(_, dps)| dps > 0.0 && dps.is_finite()));
}

// =============================================================================
// Assassination
// =============================================================================

mod assassination_tests {
    use super::*;

    #[test]
    fn documented_scenario_execute_phase() {
        let settings = assassination_settings();
        let breakdown =
            compute_breakdown(&settings, &assassination_context(), Phase::Execute).unwrap();
        assert_sane(&breakdown);
        assert!(breakdown.get("dispatch").is_some());
        assert!(breakdown.get("envenom").is_some());
        assert!(breakdown.get("mutilate").is_none());
    }

    #[test]
    fn non_execute_uses_mutilate_and_blindside() {
        let settings = assassination_settings();
        let breakdown =
            compute_breakdown(&settings, &assassination_context(), Phase::NonExecute).unwrap();
        assert_sane(&breakdown);
        for key in [
            "mutilate",
            "dispatch",
            "envenom",
            "rupture",
            "venomous_wounds",
            "deadly_poison",
            "deadly_instant_poison",
            "mh_autoattack",
            "oh_autoattack",
        ] {
            assert!(breakdown.get(key).is_some(), "missing {key}");
        }
        assert!(breakdown.get("mutilate").unwrap() > breakdown.get("dispatch").unwrap());
    }

    #[test]
    fn mutilate_needs_daggers() {
        let settings = assassination_settings();
        let result = compute_breakdown(
            &settings,
            &with_swords(&assassination_context()),
            Phase::NonExecute,
        );
        assert!(matches!(
            result,
            Err(CalcError::WeaponRequirement {
                ability: "mutilate",
                ..
            })
        ));
    }

    #[test]
    fn size_priority_changes_rupture() {
        let ctx = assassination_context();
        let uptime = assassination_settings();
        let size = Settings::builder(AssassinationCycle::new(4, 5, false, false, false).unwrap())
            .dmg_poison(Some("dp"))
            .build()
            .unwrap();
        let a = compute_breakdown(&uptime, &ctx, Phase::NonExecute).unwrap();
        let b = compute_breakdown(&size, &ctx, Phase::NonExecute).unwrap();
        assert_ne!(a.get("rupture"), b.get("rupture"));
    }

    #[test]
    fn wound_poison_replaces_deadly() {
        let settings = Settings::builder(AssassinationCycle::default())
            .dmg_poison(Some("wp"))
            .build()
            .unwrap();
        let breakdown =
            compute_breakdown(&settings, &assassination_context(), Phase::NonExecute).unwrap();
        assert!(breakdown.get("wound_poison").is_some());
        assert!(breakdown.get("deadly_poison").is_none());
        assert!(breakdown.get("deadly_instant_poison").is_none());
    }

    #[test]
    fn no_damage_poison() {
        let settings = Settings::builder(AssassinationCycle::default())
            .dmg_poison(None)
            .build()
            .unwrap();
        let breakdown =
            compute_breakdown(&settings, &assassination_context(), Phase::NonExecute).unwrap();
        assert!(breakdown.get("wound_poison").is_none());
        assert!(breakdown.get("deadly_poison").is_none());
    }
}

// =============================================================================
// Combat
// =============================================================================

mod combat_tests {
    use super::*;

    #[test]
    fn combat_rotation() {
        let breakdown =
            compute_breakdown(&combat_settings(), &combat_context(), Phase::NonExecute).unwrap();
        assert_sane(&breakdown);
        for key in [
            "sinister_strike",
            "revealing_strike",
            "eviscerate",
            "rupture",
            "main_gauche",
            "killing_spree",
            "ambush",
        ] {
            assert!(breakdown.get(key).is_some(), "missing {key}");
        }
        assert!(breakdown.get("blade_flurry").is_none());
    }

    #[test]
    fn phases_are_identical() {
        let settings = combat_settings();
        let ctx = combat_context();
        assert_eq!(
            compute_breakdown(&settings, &ctx, Phase::NonExecute).unwrap(),
            compute_breakdown(&settings, &ctx, Phase::Execute).unwrap()
        );
    }

    #[test]
    fn blade_flurry_needs_adds() {
        let cycle = CombatCycle {
            blade_flurry: true,
            ..CombatCycle::default()
        };
        let settings = Settings::builder(cycle).num_boss_adds(2.0).build().unwrap();
        let breakdown =
            compute_breakdown(&settings, &combat_context(), Phase::NonExecute).unwrap();
        assert!(breakdown.get("blade_flurry").is_some());
    }

    #[test]
    fn stacking_shadow_blades_with_adrenaline_rush_pays() {
        let ctx = combat_context();
        let dps = |stack_cds: bool| {
            let cycle = CombatCycle {
                stack_cds,
                ..CombatCycle::default()
            };
            let settings = Settings::builder(cycle).build().unwrap();
            DamageCalculator::new(&settings, &ctx).total_dps().unwrap()
        };
        let stacked = dps(true);
        let apart = dps(false);
        assert!(stacked > apart, "stacked {stacked} vs apart {apart}");
    }

    #[test]
    fn opener_usage_scales_ambush() {
        let ctx = combat_context();
        let ambush = |use_opener: &str| {
            let settings = Settings::builder(CombatCycle::default())
                .use_opener(use_opener)
                .build()
                .unwrap();
            compute_breakdown(&settings, &ctx, Phase::NonExecute)
                .unwrap()
                .get("ambush")
        };
        let always = ambush("always").unwrap();
        let once = ambush("opener").unwrap();
        assert!(always > once);
        assert_eq!(ambush("never"), None);
    }

    #[test]
    fn dropping_rupture() {
        let cycle = CombatCycle {
            use_rupture: false,
            ..CombatCycle::default()
        };
        let settings = Settings::builder(cycle).build().unwrap();
        let breakdown =
            compute_breakdown(&settings, &combat_context(), Phase::NonExecute).unwrap();
        assert!(breakdown.get("rupture").is_none());
        assert!(breakdown.get("eviscerate").is_some());
    }
}

// =============================================================================
// Subtlety
// =============================================================================

mod subtlety_tests {
    use super::*;

    #[test]
    fn subtlety_rotation() {
        let breakdown =
            compute_breakdown(&subtlety_settings(), &subtlety_context(), Phase::NonExecute)
                .unwrap();
        assert_sane(&breakdown);
        for key in [
            "backstab",
            "hemorrhage",
            "hemorrhage_dot",
            "ambush",
            "eviscerate",
            "rupture",
        ] {
            assert!(breakdown.get(key).is_some(), "missing {key}");
        }
    }

    #[test]
    fn backstab_needs_a_dagger() {
        let result = compute_breakdown(
            &subtlety_settings(),
            &with_swords(&subtlety_context()),
            Phase::NonExecute,
        );
        assert!(matches!(
            result,
            Err(CalcError::WeaponRequirement {
                ability: "backstab",
                ..
            })
        ));
    }

    #[test]
    fn hemorrhage_only_works_with_swords() {
        let settings = Settings::builder(SubtletyCycle::new(5.0, "always", "shd").unwrap())
            .build()
            .unwrap();
        let breakdown = compute_breakdown(
            &settings,
            &with_swords(&subtlety_context()),
            Phase::NonExecute,
        )
        .unwrap();
        assert!(breakdown.get("hemorrhage").is_some());
        assert!(breakdown.get("backstab").is_none());
    }

    #[test]
    fn shadow_blades_with_dance_feeds_finishers() {
        let ctx = subtlety_context();
        let run = |timing: &str| {
            let settings = Settings::builder(SubtletyCycle::new(5.0, "24", timing).unwrap())
                .build()
                .unwrap();
            compute_breakdown(&settings, &ctx, Phase::NonExecute).unwrap()
        };
        let dance = run("shd");
        let weakness = run("fw");
        let other = run("other");
        // Ambushes under Shadow Blades give an extra combo point each.
        assert!(dance.get("eviscerate").unwrap() > other.get("eviscerate").unwrap());
        assert!(other.get("eviscerate").unwrap() > weakness.get("eviscerate").unwrap());
        assert!(dance.total() > weakness.total());
    }

    #[test]
    fn shorter_hemorrhage_interval_casts_more() {
        let ctx = subtlety_context();
        let run = |usage: &str| {
            let settings = Settings::builder(SubtletyCycle::new(5.0, usage, "shd").unwrap())
                .build()
                .unwrap();
            compute_breakdown(&settings, &ctx, Phase::NonExecute).unwrap()
        };
        let often = run("12");
        let rarely = run("48");
        assert!(often.get("hemorrhage").unwrap() > rarely.get("hemorrhage").unwrap());
        assert!(often.get("backstab").unwrap() < rarely.get("backstab").unwrap());
    }

    #[test]
    fn never_hemorrhage() {
        let settings = Settings::builder(SubtletyCycle::new(5.0, "never", "other").unwrap())
            .build()
            .unwrap();
        let breakdown =
            compute_breakdown(&settings, &subtlety_context(), Phase::NonExecute).unwrap();
        assert!(breakdown.get("hemorrhage").is_none());
        assert!(breakdown.get("hemorrhage_dot").is_none());
    }
}

// =============================================================================
// Shared behavior
// =============================================================================

mod shared_tests {
    use super::*;

    #[test]
    fn unknown_proc_is_fatal() {
        let mut ctx = assassination_context();
        ctx.stats.procs = ctx.stats.procs.with_proc("mystery_trinket");
        let result = compute_breakdown(&assassination_settings(), &ctx, Phase::NonExecute);
        assert_eq!(
            result,
            Err(CalcError::UnknownEffect("mystery_trinket".to_string()))
        );
    }

    #[test]
    fn unknown_enchant_is_fatal() {
        let mut ctx = assassination_context();
        ctx.stats.oh.enchant = Some("glowing_runes".to_string());
        let result = compute_breakdown(&assassination_settings(), &ctx, Phase::Execute);
        assert_eq!(result, Err(CalcError::UnknownEffect("glowing_runes".to_string())));
    }

    #[test]
    fn damage_procs_get_their_own_entry() {
        let mut ctx = assassination_context();
        ctx.stats.procs = ctx.stats.procs.with_proc("legendary_capacitive_meta");
        let breakdown =
            compute_breakdown(&assassination_settings(), &ctx, Phase::NonExecute).unwrap();
        assert!(breakdown.get("legendary_capacitive_meta").is_some());
    }

    #[test]
    fn difficulty_prefixed_trinket_beats_base() {
        let settings = assassination_settings();
        let base = assassination_context();
        let mut heroic = base.clone();
        heroic.stats.procs = heroic
            .stats
            .procs
            .without_proc("haromms_talisman")
            .with_proc("heroic_haromms_talisman");
        let base_dps = DamageCalculator::new(&settings, &base).total_dps().unwrap();
        let heroic_dps = DamageCalculator::new(&settings, &heroic).total_dps().unwrap();
        assert!(heroic_dps > base_dps);
    }

    #[test]
    fn stormlash_adds_a_source() {
        let settings = Settings::builder(AssassinationCycle::default())
            .use_stormlash(true)
            .build()
            .unwrap();
        let breakdown =
            compute_breakdown(&settings, &assassination_context(), Phase::NonExecute).unwrap();
        assert!(breakdown.get("stormlash").is_some());
    }

    #[test]
    fn invalid_target_armor() {
        let settings = Settings::builder(AssassinationCycle::default())
            .adv_params("target_armor:plenty")
            .build()
            .unwrap();
        let result = compute_breakdown(&settings, &assassination_context(), Phase::NonExecute);
        assert!(matches!(result, Err(CalcError::InvalidAdvParam { .. })));
    }

    #[test]
    fn pvp_changes_damage() {
        let ctx = combat_context();
        let pve = DamageCalculator::new(&combat_settings(), &ctx).total_dps().unwrap();
        let pvp_settings = Settings::builder(CombatCycle::default())
            .is_pvp(true)
            .build()
            .unwrap();
        let pvp = DamageCalculator::new(&pvp_settings, &ctx).total_dps().unwrap();
        assert_ne!(pve, pvp);
    }

    #[test]
    fn merged_report_matches_phase_merge() {
        let settings = assassination_settings();
        let ctx = assassination_context();
        let calc = DamageCalculator::new(&settings, &ctx);
        let ne = calc.phase_breakdown(Phase::NonExecute).unwrap();
        let ex = calc.phase_breakdown(Phase::Execute).unwrap();
        let expected = DpsBreakdown::merge(&ne, &ex, settings.time_in_execute_range());
        assert_eq!(calc.dps_breakdown().unwrap(), DpsReport::Merged(expected));
    }

    #[test]
    fn split_report_when_not_merging() {
        let settings = Settings::builder(AssassinationCycle::default())
            .merge_damage(false)
            .build()
            .unwrap();
        let ctx = assassination_context();
        let report = DamageCalculator::new(&settings, &ctx).dps_breakdown().unwrap();
        let DpsReport::Split {
            non_execute,
            execute,
        } = report
        else {
            panic!("expected split report");
        };
        assert!(non_execute.get("mutilate").is_some());
        assert!(execute.get("dispatch").is_some());
    }

    #[test]
    fn no_execute_time_gives_non_execute_total() {
        let settings = Settings::builder(AssassinationCycle::default())
            .time_in_execute_range(0.0)
            .build()
            .unwrap();
        let ctx = assassination_context();
        let calc = DamageCalculator::new(&settings, &ctx);
        let ne = calc.phase_breakdown(Phase::NonExecute).unwrap();
        assert_eq!(calc.total_dps().unwrap(), ne.total());
    }
}
