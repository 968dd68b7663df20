//! Run-wide settings and their builder.
//!
//! [`SettingsBuilder`] takes the loosely-typed inputs a harness has on hand
//! (opener and poison names as text, the advanced-parameter string) and
//! produces an immutable [`Settings`] in one validated step. Two numeric
//! inputs are clamped silently instead of rejected: the Shiv interval and the
//! number of boss adds.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use super::adv_params::AdvancedParams;
use super::cycle::{Cycle, Spec};
use super::error::ConfigError;

/// Smallest nonzero Shiv interval.
pub const MIN_SHIV_INTERVAL: f64 = 10.0;

// =============================================================================
// Enumerated inputs
// =============================================================================

/// How often the stealth opener is used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UseOpener {
    /// Every time Vanish comes off cooldown
    Always,
    /// Once at the pull
    Opener,
    /// Never
    Never,
}

impl FromStr for UseOpener {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "always" => Ok(Self::Always),
            "opener" => Ok(Self::Opener),
            "never" => Ok(Self::Never),
            other => Err(ConfigError::InvalidUseOpener {
                value: other.to_string(),
            }),
        }
    }
}

/// A resolved opener. There is no "default" opener once settings exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Opener {
    /// Assassination generator
    Mutilate,
    /// Assassination execute generator
    Dispatch,
    /// Assassination finisher
    Envenom,
    /// Combat generator
    SinisterStrike,
    /// Combat debuff generator
    RevealingStrike,
    /// Combat and subtlety finisher
    Eviscerate,
    /// Stealth strike
    Ambush,
    /// Stealth bleed
    Garrote,
    /// The spec's normal combo point generator
    Cpg,
}

const UNIVERSAL_OPENERS: [&str; 4] = ["ambush", "garrote", "default", "cpg"];

impl Opener {
    /// Lowercase opener name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Mutilate => "mutilate",
            Self::Dispatch => "dispatch",
            Self::Envenom => "envenom",
            Self::SinisterStrike => "sinister_strike",
            Self::RevealingStrike => "revealing_strike",
            Self::Eviscerate => "eviscerate",
            Self::Ambush => "ambush",
            Self::Garrote => "garrote",
            Self::Cpg => "cpg",
        }
    }

    /// Opener names specific to a spec (universal openers excluded).
    #[must_use]
    pub const fn spec_openers(spec: Spec) -> &'static [&'static str] {
        match spec {
            Spec::Assassination => &["mutilate", "dispatch", "envenom"],
            Spec::Combat => &["sinister_strike", "revealing_strike", "eviscerate"],
            Spec::Subtlety => &["eviscerate"],
        }
    }

    /// What `default` means for a spec.
    #[must_use]
    pub const fn default_for(spec: Spec) -> Self {
        match spec {
            Spec::Assassination => Self::Mutilate,
            Spec::Combat | Spec::Subtlety => Self::Ambush,
        }
    }

    /// Resolve an opener name for a spec, rewriting `default`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::IllegalOpener`] if the name is neither one of
    /// the spec's openers nor a universal one.
    pub fn resolve(name: &str, spec: Spec) -> Result<Self, ConfigError> {
        let illegal = || ConfigError::IllegalOpener {
            opener: name.to_string(),
            spec,
        };
        if !Self::spec_openers(spec).contains(&name) && !UNIVERSAL_OPENERS.contains(&name) {
            return Err(illegal());
        }
        match name {
            "default" => Ok(Self::default_for(spec)),
            "mutilate" => Ok(Self::Mutilate),
            "dispatch" => Ok(Self::Dispatch),
            "envenom" => Ok(Self::Envenom),
            "sinister_strike" => Ok(Self::SinisterStrike),
            "revealing_strike" => Ok(Self::RevealingStrike),
            "eviscerate" => Ok(Self::Eviscerate),
            "ambush" => Ok(Self::Ambush),
            "garrote" => Ok(Self::Garrote),
            "cpg" => Ok(Self::Cpg),
            _ => Err(illegal()),
        }
    }
}

impl fmt::Display for Opener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Damage poison choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DamagePoison {
    /// Deadly Poison (`dp`)
    Deadly,
    /// Wound Poison (`wp`)
    Wound,
}

impl FromStr for DamagePoison {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dp" => Ok(Self::Deadly),
            "wp" => Ok(Self::Wound),
            other => Err(ConfigError::InvalidDamagePoison {
                value: other.to_string(),
            }),
        }
    }
}

/// Utility poison choice. None of them deal damage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UtilityPoison {
    /// Crippling Poison (`cp`)
    Crippling,
    /// Mind-numbing Poison (`mnp`)
    MindNumbing,
    /// Leeching Poison (`lp`)
    Leeching,
    /// Paralytic Poison (`pp`)
    Paralytic,
}

impl FromStr for UtilityPoison {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cp" => Ok(Self::Crippling),
            "mnp" => Ok(Self::MindNumbing),
            "lp" => Ok(Self::Leeching),
            "pp" => Ok(Self::Paralytic),
            other => Err(ConfigError::InvalidUtilityPoison {
                value: other.to_string(),
            }),
        }
    }
}

// =============================================================================
// Settings
// =============================================================================

/// Validated, immutable settings for one run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Settings {
    cycle: Cycle,
    duration: f64,
    time_in_execute_range: f64,
    tricks_on_cooldown: bool,
    response_time: f64,
    latency: f64,
    dmg_poison: Option<DamagePoison>,
    utl_poison: Option<UtilityPoison>,
    use_opener: UseOpener,
    opener: Opener,
    is_pvp: bool,
    use_stormlash: bool,
    shiv_interval: f64,
    num_boss_adds: f64,
    feint_interval: f64,
    merge_damage: bool,
    adv_params: AdvancedParams,
}

impl Settings {
    /// Start building settings for a cycle.
    #[must_use]
    pub fn builder(cycle: impl Into<Cycle>) -> SettingsBuilder {
        SettingsBuilder::new(cycle)
    }

    /// Rotation policy.
    #[must_use]
    pub fn cycle(&self) -> &Cycle {
        &self.cycle
    }

    /// Spec of the rotation policy.
    #[must_use]
    pub fn spec(&self) -> Spec {
        self.cycle.spec()
    }

    /// Encounter length in seconds.
    #[must_use]
    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Fraction of the encounter spent in execute range.
    #[must_use]
    pub fn time_in_execute_range(&self) -> f64 {
        self.time_in_execute_range
    }

    /// Whether Tricks of the Trade is cast on cooldown.
    #[must_use]
    pub fn tricks_on_cooldown(&self) -> bool {
        self.tricks_on_cooldown
    }

    /// Player reaction time in seconds.
    #[must_use]
    pub fn response_time(&self) -> f64 {
        self.response_time
    }

    /// Network latency in seconds.
    #[must_use]
    pub fn latency(&self) -> f64 {
        self.latency
    }

    /// Damage poison, if any.
    #[must_use]
    pub fn dmg_poison(&self) -> Option<DamagePoison> {
        self.dmg_poison
    }

    /// Utility poison, if any.
    #[must_use]
    pub fn utl_poison(&self) -> Option<UtilityPoison> {
        self.utl_poison
    }

    /// Opener frequency.
    #[must_use]
    pub fn use_opener(&self) -> UseOpener {
        self.use_opener
    }

    /// Resolved opener.
    #[must_use]
    pub fn opener(&self) -> Opener {
        self.opener
    }

    /// Name of the resolved opener. Never `default`.
    #[must_use]
    pub fn opener_name(&self) -> &'static str {
        self.opener.as_str()
    }

    /// Whether the target is a player.
    #[must_use]
    pub fn is_pvp(&self) -> bool {
        self.is_pvp
    }

    /// Whether a Stormlash Totem is dropped for the group.
    #[must_use]
    pub fn use_stormlash(&self) -> bool {
        self.use_stormlash
    }

    /// Seconds between Shivs; 0 means Shiv is not used.
    #[must_use]
    pub fn shiv_interval(&self) -> f64 {
        self.shiv_interval
    }

    /// Number of adds next to the boss.
    #[must_use]
    pub fn num_boss_adds(&self) -> f64 {
        self.num_boss_adds
    }

    /// Seconds between Feints; 0 means Feint is not used.
    #[must_use]
    pub fn feint_interval(&self) -> f64 {
        self.feint_interval
    }

    /// Whether phase breakdowns are merged.
    #[must_use]
    pub fn merge_damage(&self) -> bool {
        self.merge_damage
    }

    /// Advanced parameters.
    #[must_use]
    pub fn adv_params(&self) -> &AdvancedParams {
        &self.adv_params
    }
}

/// Builder for [`Settings`]. Defaults match a standard raid encounter.
#[derive(Debug, Clone)]
pub struct SettingsBuilder {
    cycle: Cycle,
    duration: f64,
    time_in_execute_range: f64,
    tricks_on_cooldown: bool,
    response_time: f64,
    latency: f64,
    dmg_poison: Option<String>,
    utl_poison: Option<String>,
    use_opener: String,
    opener_name: String,
    is_pvp: bool,
    use_stormlash: bool,
    shiv_interval: f64,
    num_boss_adds: f64,
    feint_interval: f64,
    merge_damage: bool,
    adv_params: String,
}

impl SettingsBuilder {
    /// Builder with default values for everything but the cycle.
    #[must_use]
    pub fn new(cycle: impl Into<Cycle>) -> Self {
        Self {
            cycle: cycle.into(),
            duration: 300.0,
            time_in_execute_range: 0.35,
            tricks_on_cooldown: true,
            response_time: 0.5,
            latency: 0.03,
            dmg_poison: Some("dp".to_string()),
            utl_poison: None,
            use_opener: "always".to_string(),
            opener_name: "default".to_string(),
            is_pvp: false,
            use_stormlash: false,
            shiv_interval: 0.0,
            num_boss_adds: 0.0,
            feint_interval: 0.0,
            merge_damage: true,
            adv_params: String::new(),
        }
    }

    /// Encounter length in seconds.
    #[must_use]
    pub fn duration(mut self, duration: f64) -> Self {
        self.duration = duration;
        self
    }

    /// Fraction of the encounter in execute range.
    #[must_use]
    pub fn time_in_execute_range(mut self, fraction: f64) -> Self {
        self.time_in_execute_range = fraction;
        self
    }

    /// Cast Tricks of the Trade on cooldown.
    #[must_use]
    pub fn tricks_on_cooldown(mut self, on: bool) -> Self {
        self.tricks_on_cooldown = on;
        self
    }

    /// Player reaction time.
    #[must_use]
    pub fn response_time(mut self, seconds: f64) -> Self {
        self.response_time = seconds;
        self
    }

    /// Network latency.
    #[must_use]
    pub fn latency(mut self, seconds: f64) -> Self {
        self.latency = seconds;
        self
    }

    /// Damage poison by short name (`dp`, `wp`), or `None`.
    #[must_use]
    pub fn dmg_poison(mut self, poison: Option<&str>) -> Self {
        self.dmg_poison = poison.map(str::to_string);
        self
    }

    /// Utility poison by short name (`cp`, `mnp`, `lp`, `pp`), or `None`.
    #[must_use]
    pub fn utl_poison(mut self, poison: Option<&str>) -> Self {
        self.utl_poison = poison.map(str::to_string);
        self
    }

    /// Opener frequency: `always`, `opener` or `never`.
    #[must_use]
    pub fn use_opener(mut self, mode: &str) -> Self {
        self.use_opener = mode.to_string();
        self
    }

    /// Opener name, or `default`.
    #[must_use]
    pub fn opener_name(mut self, name: &str) -> Self {
        self.opener_name = name.to_string();
        self
    }

    /// Fight a player instead of a raid boss.
    #[must_use]
    pub fn is_pvp(mut self, pvp: bool) -> Self {
        self.is_pvp = pvp;
        self
    }

    /// Include Stormlash Totem.
    #[must_use]
    pub fn use_stormlash(mut self, on: bool) -> Self {
        self.use_stormlash = on;
        self
    }

    /// Seconds between Shivs.
    #[must_use]
    pub fn shiv_interval(mut self, seconds: f64) -> Self {
        self.shiv_interval = seconds;
        self
    }

    /// Number of adds.
    #[must_use]
    pub fn num_boss_adds(mut self, adds: f64) -> Self {
        self.num_boss_adds = adds;
        self
    }

    /// Seconds between Feints.
    #[must_use]
    pub fn feint_interval(mut self, seconds: f64) -> Self {
        self.feint_interval = seconds;
        self
    }

    /// Merge phase breakdowns.
    #[must_use]
    pub fn merge_damage(mut self, merge: bool) -> Self {
        self.merge_damage = merge;
        self
    }

    /// Advanced parameter string.
    #[must_use]
    pub fn adv_params(mut self, text: &str) -> Self {
        self.adv_params = text.to_string();
        self
    }

    /// Validate and build.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found. Nothing is computed when
    /// validation fails.
    pub fn build(self) -> Result<Settings, ConfigError> {
        if !self.duration.is_finite() || self.duration <= 0.0 {
            return Err(ConfigError::InvalidDuration {
                value: self.duration,
            });
        }
        if !(0.0..=1.0).contains(&self.time_in_execute_range) {
            return Err(ConfigError::InvalidExecuteFraction {
                value: self.time_in_execute_range,
            });
        }
        for (knob, value) in [
            ("response_time", self.response_time),
            ("latency", self.latency),
            ("feint_interval", self.feint_interval),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidSeconds { knob, value });
            }
        }
        for (knob, value) in [
            ("shiv_interval", self.shiv_interval),
            ("num_boss_adds", self.num_boss_adds),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::NonFiniteSetting { knob, value });
            }
        }
        let spec = self.cycle.spec();
        let opener = Opener::resolve(&self.opener_name, spec)?;
        let use_opener = self.use_opener.parse::<UseOpener>()?;
        let dmg_poison = self
            .dmg_poison
            .as_deref()
            .map(str::parse::<DamagePoison>)
            .transpose()?;
        let utl_poison = self
            .utl_poison
            .as_deref()
            .map(str::parse::<UtilityPoison>)
            .transpose()?;
        let adv_params = AdvancedParams::parse(&self.adv_params)?;

        let shiv_interval = if self.shiv_interval < MIN_SHIV_INTERVAL && self.shiv_interval != 0.0
        {
            MIN_SHIV_INTERVAL
        } else {
            self.shiv_interval
        };

        Ok(Settings {
            cycle: self.cycle,
            duration: self.duration,
            time_in_execute_range: self.time_in_execute_range,
            tricks_on_cooldown: self.tricks_on_cooldown,
            response_time: self.response_time,
            latency: self.latency,
            dmg_poison,
            utl_poison,
            use_opener,
            opener,
            is_pvp: self.is_pvp,
            use_stormlash: self.use_stormlash,
            shiv_interval,
            num_boss_adds: self.num_boss_adds.max(0.0),
            feint_interval: self.feint_interval,
            merge_damage: self.merge_damage,
            adv_params,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::cycle::{AssassinationCycle, CombatCycle, SubtletyCycle};

    use proptest::prelude::*;

    fn cycles() -> [Cycle; 3] {
        [
            AssassinationCycle::default().into(),
            CombatCycle::default().into(),
            SubtletyCycle::default().into(),
        ]
    }

    const ALL_OPENER_NAMES: [&str; 9] = [
        "mutilate",
        "dispatch",
        "envenom",
        "sinister_strike",
        "revealing_strike",
        "eviscerate",
        "ambush",
        "garrote",
        "cpg",
    ];

    mod opener_tests {
        use super::*;

        #[test]
        fn default_resolves_per_spec() {
            let expected = ["mutilate", "ambush", "ambush"];
            for (cycle, name) in cycles().into_iter().zip(expected) {
                let settings = Settings::builder(cycle).build().unwrap();
                assert_eq!(settings.opener_name(), name);
                assert_ne!(settings.opener_name(), "default");
            }
        }

        #[test]
        fn legality_follows_spec() {
            for cycle in cycles() {
                let spec = cycle.spec();
                for name in ALL_OPENER_NAMES {
                    let allowed = Opener::spec_openers(spec).contains(&name)
                        || UNIVERSAL_OPENERS.contains(&name);
                    let result = Settings::builder(cycle).opener_name(name).build();
                    assert_eq!(result.is_ok(), allowed, "{spec} {name}");
                }
            }
        }

        #[test]
        fn unknown_opener_is_illegal() {
            let result = Settings::builder(CombatCycle::default())
                .opener_name("backstab")
                .build();
            assert_eq!(
                result,
                Err(ConfigError::IllegalOpener {
                    opener: "backstab".to_string(),
                    spec: Spec::Combat,
                })
            );
        }

        #[test]
        fn use_opener_must_be_known() {
            assert!(Settings::builder(CombatCycle::default())
                .use_opener("sometimes")
                .build()
                .is_err());
        }
    }

    mod poison_tests {
        use super::*;

        #[test]
        fn accepts_known_poisons() {
            let settings = Settings::builder(AssassinationCycle::default())
                .dmg_poison(Some("wp"))
                .utl_poison(Some("lp"))
                .build()
                .unwrap();
            assert_eq!(settings.dmg_poison(), Some(DamagePoison::Wound));
            assert_eq!(settings.utl_poison(), Some(UtilityPoison::Leeching));
        }

        #[test]
        fn none_is_allowed() {
            let settings = Settings::builder(AssassinationCycle::default())
                .dmg_poison(None)
                .build()
                .unwrap();
            assert_eq!(settings.dmg_poison(), None);
        }

        #[test]
        fn rejects_swapped_poisons() {
            assert!(Settings::builder(AssassinationCycle::default())
                .dmg_poison(Some("lp"))
                .build()
                .is_err());
            assert!(Settings::builder(AssassinationCycle::default())
                .utl_poison(Some("dp"))
                .build()
                .is_err());
        }
    }

    mod clamp_tests {
        use super::*;

        #[test]
        fn shiv_zero_stays_zero() {
            let settings = Settings::builder(CombatCycle::default())
                .shiv_interval(0.0)
                .build()
                .unwrap();
            assert_eq!(settings.shiv_interval(), 0.0);
        }

        #[test]
        fn negative_shiv_becomes_floor() {
            let settings = Settings::builder(CombatCycle::default())
                .shiv_interval(-4.0)
                .build()
                .unwrap();
            assert_eq!(settings.shiv_interval(), MIN_SHIV_INTERVAL);
        }

        #[test]
        fn rejects_bad_duration_and_execute_fraction() {
            assert!(Settings::builder(CombatCycle::default())
                .duration(0.0)
                .build()
                .is_err());
            assert!(Settings::builder(CombatCycle::default())
                .time_in_execute_range(1.2)
                .build()
                .is_err());
            assert!(Settings::builder(CombatCycle::default())
                .time_in_execute_range(f64::NAN)
                .build()
                .is_err());
        }

        #[test]
        fn rejects_bad_delays_and_intervals() {
            for value in [f64::NAN, f64::INFINITY, -0.5] {
                let base = Settings::builder(CombatCycle::default());
                for (knob, builder) in [
                    ("response_time", base.clone().response_time(value)),
                    ("latency", base.clone().latency(value)),
                    ("feint_interval", base.clone().feint_interval(value)),
                ] {
                    let err = builder.build().unwrap_err();
                    assert!(
                        matches!(err, ConfigError::InvalidSeconds { knob: k, .. } if k == knob),
                        "{knob} = {value}: {err:?}"
                    );
                }
            }
        }

        #[test]
        fn rejects_non_finite_shiv_and_adds() {
            for value in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
                let err = Settings::builder(CombatCycle::default())
                    .shiv_interval(value)
                    .build()
                    .unwrap_err();
                assert!(matches!(
                    err,
                    ConfigError::NonFiniteSetting {
                        knob: "shiv_interval",
                        ..
                    }
                ));
                let err = Settings::builder(CombatCycle::default())
                    .num_boss_adds(value)
                    .build()
                    .unwrap_err();
                assert!(matches!(
                    err,
                    ConfigError::NonFiniteSetting {
                        knob: "num_boss_adds",
                        ..
                    }
                ));
            }
        }

        #[test]
        fn zero_delays_are_accepted() {
            let settings = Settings::builder(CombatCycle::default())
                .response_time(0.0)
                .latency(0.0)
                .feint_interval(0.0)
                .build()
                .unwrap();
            assert_eq!(settings.feint_interval(), 0.0);
        }

        #[test]
        fn defaults() {
            let settings = Settings::builder(AssassinationCycle::default()).build().unwrap();
            assert_eq!(settings.duration(), 300.0);
            assert_eq!(settings.time_in_execute_range(), 0.35);
            assert_eq!(settings.use_opener(), UseOpener::Always);
            assert_eq!(settings.dmg_poison(), Some(DamagePoison::Deadly));
            assert!(settings.merge_damage());
            assert!(settings.adv_params().is_empty());
        }
    }

    proptest! {
        #[test]
        fn shiv_below_floor_is_raised(interval in 0.001f64..9.999) {
            let settings = Settings::builder(CombatCycle::default())
                .shiv_interval(interval)
                .build()
                .unwrap();
            prop_assert_eq!(settings.shiv_interval(), MIN_SHIV_INTERVAL);
        }

        #[test]
        fn shiv_at_or_above_floor_is_kept(interval in 10.0f64..500.0) {
            let settings = Settings::builder(CombatCycle::default())
                .shiv_interval(interval)
                .build()
                .unwrap();
            prop_assert_eq!(settings.shiv_interval(), interval);
        }

        #[test]
        fn boss_adds_never_negative(adds in -50.0f64..50.0) {
            let settings = Settings::builder(CombatCycle::default())
                .num_boss_adds(adds)
                .build()
                .unwrap();
            prop_assert!(settings.num_boss_adds() >= 0.0);
            prop_assert_eq!(settings.num_boss_adds(), adds.max(0.0));
        }
    }
}
