use armory::{
    Buffs, CharacterContext, GearBuffs, Glyphs, Level, ProcsList, Race, Stats, Talent, Talents,
    Weapon, WeaponKind,
};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rogue_calc::{
    compute_breakdown, compute_ep, talents_ranking, AssassinationCycle, CombatCycle, Phase,
    Settings, SubtletyCycle,
};

fn character(kind: WeaponKind, speed: f64) -> CharacterContext {
    let weapon = Weapon::new(9_000.0, speed, kind, Some("dancing_steel"));
    let stats = Stats::new(
        weapon.clone(),
        weapon,
        ProcsList::new(["haromms_talisman", "assurance_of_consequence"]),
        GearBuffs::LEATHER_SPECIALIZATION | GearBuffs::CHAOTIC_METAGEM,
        80.0,
        20_000.0,
        24_000.0,
        4_000.0,
        2_000.0,
        2_000.0,
        6_000.0,
        5_000.0,
    );
    CharacterContext::new(
        stats,
        Talents::none().with_talent(Talent::Anticipation),
        Glyphs::default(),
        Buffs::all(),
        Race::NightElf,
        Level::default(),
    )
}

fn bench_breakdowns(c: &mut Criterion) {
    let daggers = character(WeaponKind::Dagger, 1.8);
    let swords = character(WeaponKind::Sword, 2.6);
    let cases = [
        ("assassination", Settings::builder(AssassinationCycle::default()), &daggers),
        ("combat", Settings::builder(CombatCycle::default()), &swords),
        ("subtlety", Settings::builder(SubtletyCycle::default()), &daggers),
    ];

    for (name, builder, ctx) in cases {
        let Ok(settings) = builder.build() else {
            continue;
        };
        c.bench_function(&format!("breakdown_{name}"), |b| {
            b.iter(|| black_box(compute_breakdown(&settings, ctx, black_box(Phase::NonExecute))))
        });
    }
}

fn bench_engines(c: &mut Criterion) {
    let ctx = character(WeaponKind::Dagger, 1.8);
    let Ok(settings) = Settings::builder(AssassinationCycle::default()).build() else {
        return;
    };

    c.bench_function("ep_all_attributes", |b| {
        b.iter(|| black_box(compute_ep(&settings, &ctx)))
    });
    c.bench_function("talents_ranking", |b| {
        b.iter(|| black_box(talents_ranking(&settings, &ctx)))
    });
}

criterion_group!(benches, bench_breakdowns, bench_engines);
criterion_main!(benches);
