//! Repeatability tests.
//!
//! Every engine is a pure function of its inputs. Parallel EP and ranking
//! runs must give bit-identical results regardless of scheduling.

use armory::{ContextOption, Talent};

use crate::calc::{compute_breakdown, Phase};
use crate::ep::compute_ep;
use crate::ranking::rank_options;

use super::helpers::{
    assassination_context, assassination_settings, combat_context, combat_settings,
    subtlety_context, subtlety_settings,
};

#[test]
fn breakdowns_repeat_exactly() {
    let cases = [
        (assassination_settings(), assassination_context()),
        (combat_settings(), combat_context()),
        (subtlety_settings(), subtlety_context()),
    ];
    for (settings, ctx) in &cases {
        for phase in [Phase::NonExecute, Phase::Execute] {
            let first = compute_breakdown(settings, ctx, phase).unwrap();
            let second = compute_breakdown(settings, ctx, phase).unwrap();
            assert_eq!(first, second);
        }
    }
}

#[test]
fn ep_repeats_exactly() {
    let settings = assassination_settings();
    let ctx = assassination_context();
    let first = compute_ep(&settings, &ctx).unwrap();
    for _ in 0..3 {
        assert_eq!(compute_ep(&settings, &ctx).unwrap(), first);
    }
}

#[test]
fn ranking_repeats_exactly() {
    let settings = combat_settings();
    let ctx = combat_context();
    let options: Vec<_> = Talent::all().map(ContextOption::Talent).collect();
    let first = rank_options(&settings, &ctx, &options).unwrap();
    for _ in 0..3 {
        assert_eq!(rank_options(&settings, &ctx, &options).unwrap(), first);
    }
}
