//! Rotation policies, one per specialization.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::ConfigError;

/// Rogue specialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Spec {
    /// Poisons and daggers
    Assassination,
    /// Sinister Strike and cooldowns
    Combat,
    /// Stealth windows and bleeds
    Subtlety,
}

impl Spec {
    /// Lowercase spec name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Assassination => "assassination",
            Self::Combat => "combat",
            Self::Subtlety => "subtlety",
        }
    }
}

impl fmt::Display for Spec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn finisher_size(knob: &'static str, value: u8) -> Result<u8, ConfigError> {
    if (1..=5).contains(&value) {
        Ok(value)
    } else {
        Err(ConfigError::InvalidFinisherSize { knob, value })
    }
}

// =============================================================================
// Assassination
// =============================================================================

/// Envenom thresholds and Rupture priority for assassination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AssassinationCycle {
    min_envenom_size_non_execute: u8,
    min_envenom_size_execute: u8,
    prioritize_rupture_uptime_non_execute: bool,
    prioritize_rupture_uptime_execute: bool,
    stack_cds: bool,
}

impl AssassinationCycle {
    /// Create a validated assassination cycle.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidFinisherSize`] if either Envenom size is
    /// outside 1..=5.
    pub fn new(
        min_envenom_size_non_execute: u8,
        min_envenom_size_execute: u8,
        prioritize_rupture_uptime_non_execute: bool,
        prioritize_rupture_uptime_execute: bool,
        stack_cds: bool,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            min_envenom_size_non_execute: finisher_size(
                "min_envenom_size_non_execute",
                min_envenom_size_non_execute,
            )?,
            min_envenom_size_execute: finisher_size(
                "min_envenom_size_execute",
                min_envenom_size_execute,
            )?,
            prioritize_rupture_uptime_non_execute,
            prioritize_rupture_uptime_execute,
            stack_cds,
        })
    }

    /// Smallest Envenom outside execute range.
    #[must_use]
    pub fn min_envenom_size_non_execute(&self) -> u8 {
        self.min_envenom_size_non_execute
    }

    /// Smallest Envenom inside execute range.
    #[must_use]
    pub fn min_envenom_size_execute(&self) -> u8 {
        self.min_envenom_size_execute
    }

    /// Refresh Rupture as soon as it drops outside execute range.
    #[must_use]
    pub fn prioritize_rupture_uptime_non_execute(&self) -> bool {
        self.prioritize_rupture_uptime_non_execute
    }

    /// Refresh Rupture as soon as it drops inside execute range.
    #[must_use]
    pub fn prioritize_rupture_uptime_execute(&self) -> bool {
        self.prioritize_rupture_uptime_execute
    }

    /// Hold Shadow Blades for Vendetta.
    #[must_use]
    pub fn stack_cds(&self) -> bool {
        self.stack_cds
    }
}

impl Default for AssassinationCycle {
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

// =============================================================================
// Combat
// =============================================================================

/// Cooldown and multi-target choices for combat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatCycle {
    /// Keep Rupture up
    pub use_rupture: bool,
    /// Use Killing Spree on cooldown instead of waiting for Deep Insight
    pub ksp_immediately: bool,
    /// Pool energy so Revealing Strike is refreshed without a gap
    pub revealing_strike_pooling: bool,
    /// Keep Blade Flurry on while adds are present
    pub blade_flurry: bool,
    /// Hold Shadow Blades for Adrenaline Rush
    pub stack_cds: bool,
    /// Maximum number of extra Blade Flurry targets
    pub bf_targets: u32,
    /// Swap weapons around Killing Spree
    pub weapon_swap: bool,
}

impl Default for CombatCycle {
    fn default() -> Self {
        Self {
            use_rupture: true,
            ksp_immediately: true,
            revealing_strike_pooling: true,
            blade_flurry: false,
            stack_cds: true,
            bf_targets: 1,
            weapon_swap: false,
        }
    }
}

// =============================================================================
// Subtlety
// =============================================================================

/// How often Hemorrhage is used.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HemorrhageUsage {
    /// Hemorrhage is the only generator.
    Always,
    /// Backstab only.
    Never,
    /// Reapply the bleed every this many seconds.
    Interval(f64),
}

impl FromStr for HemorrhageUsage {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ConfigError::InvalidHemorrhage {
            value: s.to_string(),
        };
        match s.trim() {
            "always" => Ok(Self::Always),
            "never" => Ok(Self::Never),
            other => {
                let seconds: f64 = other.parse().map_err(|_| invalid())?;
                if seconds.is_finite() && seconds > 0.0 {
                    Ok(Self::Interval(seconds))
                } else {
                    Err(invalid())
                }
            }
        }
    }
}

/// When Shadow Blades is lined up in a subtlety rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SbTiming {
    /// With Shadow Dance
    ShadowDance,
    /// With Find Weakness
    FindWeakness,
    /// On cooldown
    Other,
}

impl FromStr for SbTiming {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "shd" => Ok(Self::ShadowDance),
            "fw" => Ok(Self::FindWeakness),
            "other" => Ok(Self::Other),
            other => Err(ConfigError::InvalidSbTiming {
                value: other.to_string(),
            }),
        }
    }
}

/// Honor Among Thieves input and generator choice for subtlety.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SubtletyCycle {
    raid_crits_per_second: f64,
    use_hemorrhage: HemorrhageUsage,
    sub_sb_timing: SbTiming,
}

impl SubtletyCycle {
    /// Create a validated subtlety cycle from text knobs.
    ///
    /// # Errors
    ///
    /// Fails on a negative or non-finite crit rate, or text that is not a
    /// known Hemorrhage usage or Shadow Blades timing.
    pub fn new(
        raid_crits_per_second: f64,
        use_hemorrhage: &str,
        sub_sb_timing: &str,
    ) -> Result<Self, ConfigError> {
        if !raid_crits_per_second.is_finite() || raid_crits_per_second < 0.0 {
            return Err(ConfigError::NegativeRaidCrits {
                value: raid_crits_per_second,
            });
        }
        Ok(Self {
            raid_crits_per_second,
            use_hemorrhage: use_hemorrhage.parse()?,
            sub_sb_timing: sub_sb_timing.parse()?,
        })
    }

    /// Crits per second from the rest of the group.
    #[must_use]
    pub fn raid_crits_per_second(&self) -> f64 {
        self.raid_crits_per_second
    }

    /// Hemorrhage usage.
    #[must_use]
    pub fn use_hemorrhage(&self) -> HemorrhageUsage {
        self.use_hemorrhage
    }

    /// Shadow Blades timing.
    #[must_use]
    pub fn sub_sb_timing(&self) -> SbTiming {
        self.sub_sb_timing
    }
}

impl Default for SubtletyCycle {
    fn default() -> Self {
        Self {
            raid_crits_per_second: 5.0,
            use_hemorrhage: HemorrhageUsage::Interval(24.0),
            sub_sb_timing: SbTiming::ShadowDance,
        }
    }
}

// =============================================================================
// Cycle
// =============================================================================

/// The rotation policy of a run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "spec", rename_all = "snake_case")]
pub enum Cycle {
    /// Assassination policy
    Assassination(AssassinationCycle),
    /// Combat policy
    Combat(CombatCycle),
    /// Subtlety policy
    Subtlety(SubtletyCycle),
}

impl Cycle {
    /// Spec this cycle belongs to.
    #[must_use]
    pub const fn spec(&self) -> Spec {
        match self {
            Self::Assassination(_) => Spec::Assassination,
            Self::Combat(_) => Spec::Combat,
            Self::Subtlety(_) => Spec::Subtlety,
        }
    }
}

impl From<AssassinationCycle> for Cycle {
    fn from(cycle: AssassinationCycle) -> Self {
        Self::Assassination(cycle)
    }
}

impl From<CombatCycle> for Cycle {
    fn from(cycle: CombatCycle) -> Self {
        Self::Combat(cycle)
    }
}

impl From<SubtletyCycle> for Cycle {
    fn from(cycle: SubtletyCycle) -> Self {
        Self::Subtlety(cycle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod assassination_tests {
        use super::*;

        #[test]
        fn accepts_sizes_one_to_five() {
            for size in 1..=5 {
                assert!(AssassinationCycle::new(size, size, true, false, false).is_ok());
            }
        }

        #[test]
        fn rejects_sizes_outside_range() {
            assert_eq!(
                AssassinationCycle::new(0, 5, true, true, false),
                Err(ConfigError::InvalidFinisherSize {
                    knob: "min_envenom_size_non_execute",
                    value: 0,
                })
            );
            assert_eq!(
                AssassinationCycle::new(4, 6, true, true, false),
                Err(ConfigError::InvalidFinisherSize {
                    knob: "min_envenom_size_execute",
                    value: 6,
                })
            );
        }

        #[test]
        fn defaults() {
            let cycle = AssassinationCycle::default();
            assert_eq!(cycle.min_envenom_size_non_execute(), 4);
            assert_eq!(cycle.min_envenom_size_execute(), 5);
            assert!(!cycle.stack_cds());
        }
    }

    mod subtlety_tests {
        use super::*;

        #[test]
        fn parses_hemorrhage_usage() {
            assert_eq!("always".parse(), Ok(HemorrhageUsage::Always));
            assert_eq!("never".parse(), Ok(HemorrhageUsage::Never));
            assert_eq!("24".parse(), Ok(HemorrhageUsage::Interval(24.0)));
            assert!("0".parse::<HemorrhageUsage>().is_err());
            assert!("-3".parse::<HemorrhageUsage>().is_err());
            assert!("often".parse::<HemorrhageUsage>().is_err());
        }

        #[test]
        fn rejects_negative_raid_crits() {
            assert!(SubtletyCycle::new(-1.0, "24", "shd").is_err());
            assert!(SubtletyCycle::new(0.0, "24", "shd").is_ok());
        }

        #[test]
        fn rejects_unknown_sb_timing() {
            assert_eq!(
                SubtletyCycle::new(5.0, "always", "late"),
                Err(ConfigError::InvalidSbTiming {
                    value: "late".to_string()
                })
            );
        }
    }

    #[test]
    fn cycle_reports_spec() {
        assert_eq!(
            Cycle::from(AssassinationCycle::default()).spec(),
            Spec::Assassination
        );
        assert_eq!(Cycle::from(CombatCycle::default()).spec(), Spec::Combat);
        assert_eq!(Cycle::from(SubtletyCycle::default()).spec(), Spec::Subtlety);
        assert_eq!(Spec::Subtlety.to_string(), "subtlety");
    }
}
