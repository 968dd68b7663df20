//! Scenario files: a character, a cycle and fight settings in one JSON
//! document.
//!
//! Everything read from disk goes through the same validating constructors
//! as library callers use, so a scenario that loads is a scenario that runs.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use armory::{
    Buffs, CharacterContext, GearBuffs, Glyph, Glyphs, Level, ProcsList, Race, Stats, Talents,
    Weapon, WeaponKind,
};
use rogue_calc::{AssassinationCycle, CombatCycle, Cycle, Settings, SubtletyCycle};
use serde::Deserialize;
use tracing::debug;

/// Poison name meaning "no poison".
const NO_POISON: &str = "none";

/// A complete run description.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioFile {
    /// Character to model
    pub character: CharacterContext,
    /// Rotation policy, tagged with its spec
    pub cycle: CycleFile,
    /// Fight settings; missing fields keep their defaults
    #[serde(default)]
    pub settings: SettingsFile,
    /// What to print besides the breakdown
    #[serde(default)]
    pub report: ReportFile,
}

/// Rotation policy as written in a scenario.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "spec", rename_all = "snake_case")]
pub enum CycleFile {
    /// Assassination knobs
    Assassination(AssassinationFile),
    /// Combat knobs
    Combat(CombatCycle),
    /// Subtlety knobs
    Subtlety(SubtletyFile),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AssassinationFile {
    pub min_envenom_size_non_execute: u8,
    pub min_envenom_size_execute: u8,
    pub prioritize_rupture_uptime_non_execute: bool,
    pub prioritize_rupture_uptime_execute: bool,
    pub stack_cds: bool,
}

impl Default for AssassinationFile {
    fn default() -> Self {
        Self {
            min_envenom_size_non_execute: 4,
            min_envenom_size_execute: 5,
            prioritize_rupture_uptime_non_execute: true,
            prioritize_rupture_uptime_execute: true,
            stack_cds: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SubtletyFile {
    pub raid_crits_per_second: f64,
    /// `always`, `never` or an interval in seconds
    pub use_hemorrhage: String,
    /// `shd`, `fw` or `other`
    pub sub_sb_timing: String,
}

impl Default for SubtletyFile {
    fn default() -> Self {
        Self {
            raid_crits_per_second: 5.0,
            use_hemorrhage: "24".to_string(),
            sub_sb_timing: "shd".to_string(),
        }
    }
}

/// Fight settings. `None` keeps the library default.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SettingsFile {
    pub duration: Option<f64>,
    pub time_in_execute_range: Option<f64>,
    pub tricks_on_cooldown: Option<bool>,
    pub response_time: Option<f64>,
    pub latency: Option<f64>,
    /// Damage poison, or `none`
    pub dmg_poison: Option<String>,
    /// Utility poison, or `none`
    pub utl_poison: Option<String>,
    pub use_opener: Option<String>,
    pub opener_name: Option<String>,
    pub is_pvp: Option<bool>,
    pub stormlash: Option<bool>,
    pub shiv_interval: Option<f64>,
    pub num_boss_adds: Option<f64>,
    pub feint_interval: Option<f64>,
    pub merge_damage: Option<bool>,
    pub adv_params: Option<String>,
}

/// Extra tables to print.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReportFile {
    pub ep: bool,
    pub talents: bool,
    pub glyphs: Vec<Glyph>,
    pub trinkets: Vec<String>,
    pub gear_buffs: Vec<String>,
}

impl Default for ReportFile {
    fn default() -> Self {
        Self {
            ep: true,
            talents: true,
            glyphs: Vec::new(),
            trinkets: Vec::new(),
            gear_buffs: Vec::new(),
        }
    }
}

// =============================================================================
// Loading
// =============================================================================

impl ScenarioFile {
    /// Read and parse a scenario from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading scenario {}", path.display()))?;
        let scenario: Self = serde_json::from_str(&text)
            .with_context(|| format!("parsing scenario {}", path.display()))?;
        debug!(path = %path.display(), "loaded scenario");
        Ok(scenario)
    }

    /// Validated cycle and settings.
    pub fn settings(&self) -> Result<Settings> {
        let cycle = self.cycle.to_cycle()?;
        let s = &self.settings;
        let mut builder = Settings::builder(cycle);
        if let Some(value) = s.duration {
            builder = builder.duration(value);
        }
        if let Some(value) = s.time_in_execute_range {
            builder = builder.time_in_execute_range(value);
        }
        if let Some(value) = s.tricks_on_cooldown {
            builder = builder.tricks_on_cooldown(value);
        }
        if let Some(value) = s.response_time {
            builder = builder.response_time(value);
        }
        if let Some(value) = s.latency {
            builder = builder.latency(value);
        }
        if let Some(name) = &s.dmg_poison {
            builder = builder.dmg_poison(poison(name));
        }
        if let Some(name) = &s.utl_poison {
            builder = builder.utl_poison(poison(name));
        }
        if let Some(mode) = &s.use_opener {
            builder = builder.use_opener(mode);
        }
        if let Some(name) = &s.opener_name {
            builder = builder.opener_name(name);
        }
        if let Some(value) = s.is_pvp {
            builder = builder.is_pvp(value);
        }
        if let Some(value) = s.stormlash {
            builder = builder.use_stormlash(value);
        }
        if let Some(value) = s.shiv_interval {
            builder = builder.shiv_interval(value);
        }
        if let Some(value) = s.num_boss_adds {
            builder = builder.num_boss_adds(value);
        }
        if let Some(value) = s.feint_interval {
            builder = builder.feint_interval(value);
        }
        if let Some(value) = s.merge_damage {
            builder = builder.merge_damage(value);
        }
        if let Some(text) = &s.adv_params {
            builder = builder.adv_params(text);
        }
        builder.build().context("invalid settings")
    }

    /// Gear buffs named in the report section.
    pub fn report_gear_buffs(&self) -> Result<Vec<GearBuffs>> {
        self.report
            .gear_buffs
            .iter()
            .map(|name| GearBuffs::from_name(name).context("invalid report gear buff"))
            .collect()
    }
}

impl CycleFile {
    fn to_cycle(&self) -> Result<Cycle> {
        let cycle = match self {
            Self::Assassination(a) => AssassinationCycle::new(
                a.min_envenom_size_non_execute,
                a.min_envenom_size_execute,
                a.prioritize_rupture_uptime_non_execute,
                a.prioritize_rupture_uptime_execute,
                a.stack_cds,
            )?
            .into(),
            Self::Combat(c) => (*c).into(),
            Self::Subtlety(s) => {
                SubtletyCycle::new(s.raid_crits_per_second, &s.use_hemorrhage, &s.sub_sb_timing)?
                    .into()
            }
        };
        Ok(cycle)
    }
}

fn poison(name: &str) -> Option<&str> {
    (name != NO_POISON).then_some(name)
}

// =============================================================================
// Built-in scenario
// =============================================================================

/// A level 90 pandaren assassination rogue in heroic gear, fighting a raid
/// boss for six minutes.
pub fn builtin() -> Result<ScenarioFile> {
    let weapon = Weapon::new(12_337.75, 1.8, WeaponKind::Dagger, Some("dancing_steel"));
    let stats = Stats::new(
        weapon.clone(),
        weapon,
        ProcsList::new([
            "heroic_war_ticking_ebon_detonator",
            "heroic_war_haromms_talisman",
            "legendary_capacitive_meta",
            "fury_of_xuen",
        ]),
        GearBuffs::from_names([
            "rogue_t16_2pc",
            "rogue_t16_4pc",
            "leather_specialization",
            "virmens_bite",
            "virmens_bite_prepot",
        ])?,
        80.0,
        25_928.0,
        35_816.0,
        8_358.0,
        2_549.0,
        2_548.0,
        14_116.0,
        10_212.0,
    );
    let character = CharacterContext::new(
        stats,
        "122213".parse::<Talents>()?,
        Glyphs::from_names(["recuperate", "sprint", "vendetta"])?,
        Buffs::all(),
        Race::Pandaren,
        Level::L90,
    );

    Ok(ScenarioFile {
        character,
        cycle: CycleFile::Assassination(AssassinationFile::default()),
        settings: SettingsFile {
            duration: Some(360.0),
            response_time: Some(0.5),
            tricks_on_cooldown: Some(false),
            dmg_poison: Some("dp".to_string()),
            utl_poison: Some("lp".to_string()),
            use_opener: Some("always".to_string()),
            opener_name: Some("envenom".to_string()),
            stormlash: Some(true),
            ..SettingsFile::default()
        },
        report: ReportFile::default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_scenario_validates() {
        let scenario = builtin().unwrap();
        let settings = scenario.settings().unwrap();
        assert_eq!(settings.duration(), 360.0);
        assert!(settings.use_stormlash());
    }

    #[test]
    fn parses_minimal_json() {
        let json = r#"{
            "character": {
                "stats": {
                    "mh": {"damage": 9000.0, "speed": 2.6, "kind": "sword", "enchant": null},
                    "oh": {"damage": 9000.0, "speed": 2.6, "kind": "sword", "enchant": null},
                    "procs": [],
                    "gear_buffs": "",
                    "str": 80.0, "agi": 20000.0, "stam": 20000.0, "crit": 4000.0,
                    "hit": 2000.0, "exp": 2000.0, "haste": 6000.0, "mastery": 5000.0
                },
                "talents": "000000"
            },
            "cycle": {"spec": "combat", "use_rupture": true, "ksp_immediately": true,
                      "revealing_strike_pooling": true, "blade_flurry": false,
                      "stack_cds": true, "bf_targets": 1, "weapon_swap": false},
            "settings": {"dmg_poison": "none"}
        }"#;
        let scenario: ScenarioFile = serde_json::from_str(json).unwrap();
        let settings = scenario.settings().unwrap();
        assert_eq!(settings.dmg_poison(), None);
        assert!(scenario.report.ep);
    }

    #[test]
    fn bad_cycle_knob_is_reported() {
        let mut scenario = builtin().unwrap();
        scenario.cycle = CycleFile::Assassination(AssassinationFile {
            min_envenom_size_execute: 7,
            ..AssassinationFile::default()
        });
        assert!(scenario.settings().is_err());
    }
}
