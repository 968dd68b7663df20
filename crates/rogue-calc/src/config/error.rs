//! Configuration errors and message localization.
//!
//! Every [`ConfigError`] renders an English message through `Display`. Callers
//! that need another language pass a [`Translator`] to
//! [`ConfigError::localized`]; the translator sees the message template with
//! `{name}` placeholders and the parameters are substituted afterwards.

use thiserror::Error;

use super::cycle::Spec;

/// Turns an English message template into another language.
///
/// Templates keep their `{name}` placeholders; translations must keep them
/// too so the parameters can be filled in.
pub trait Translator {
    /// Translate one template.
    fn translate(&self, template: &str) -> String;
}

/// Translator that returns templates unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct Untranslated;

impl Translator for Untranslated {
    fn translate(&self, template: &str) -> String {
        template.to_string()
    }
}

/// Invalid configuration, detected before any damage is calculated.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// A finisher size knob outside 1..=5.
    #[error("{knob} must be between 1 and 5, got {value}")]
    InvalidFinisherSize {
        /// Name of the knob
        knob: &'static str,
        /// Rejected value
        value: u8,
    },

    /// `use_hemorrhage` was not `always`, `never` or a positive interval.
    #[error("use_hemorrhage must be always, never or a positive number of seconds, got {value}")]
    InvalidHemorrhage {
        /// Rejected text
        value: String,
    },

    /// `sub_sb_timing` was not `shd`, `fw` or `other`.
    #[error("sub_sb_timing must be shd, fw or other, got {value}")]
    InvalidSbTiming {
        /// Rejected text
        value: String,
    },

    /// Negative raid crit rate.
    #[error("raid_crits_per_second must not be negative, got {value}")]
    NegativeRaidCrits {
        /// Rejected value
        value: f64,
    },

    /// Opener not usable by the spec.
    #[error("opener {opener} is not allowed for {spec}")]
    IllegalOpener {
        /// Rejected opener name
        opener: String,
        /// Spec of the cycle
        spec: Spec,
    },

    /// `use_opener` outside always/opener/never.
    #[error("use_opener must be always, opener or never, got {value}")]
    InvalidUseOpener {
        /// Rejected text
        value: String,
    },

    /// Damage poison outside dp/wp.
    #[error("dmg_poison must be dp or wp, got {value}")]
    InvalidDamagePoison {
        /// Rejected text
        value: String,
    },

    /// Utility poison outside cp/mnp/lp/pp.
    #[error("utl_poison must be cp, mnp, lp or pp, got {value}")]
    InvalidUtilityPoison {
        /// Rejected text
        value: String,
    },

    /// An advanced parameter entry without a `:` separator.
    #[error("advanced parameter entry {entry} must look like key:value")]
    MalformedAdvParam {
        /// The offending entry as written
        entry: String,
    },

    /// Encounter length that is not a positive number.
    #[error("duration must be a positive number of seconds, got {value}")]
    InvalidDuration {
        /// Rejected value
        value: f64,
    },

    /// Execute fraction outside [0, 1].
    #[error("time_in_execute_range must be between 0 and 1, got {value}")]
    InvalidExecuteFraction {
        /// Rejected value
        value: f64,
    },

    /// A delay or interval that is negative, infinite or NaN.
    #[error("{knob} must be a non-negative number of seconds, got {value}")]
    InvalidSeconds {
        /// Name of the setting
        knob: &'static str,
        /// Rejected value
        value: f64,
    },

    /// A numeric setting that is infinite or NaN.
    #[error("{knob} must be a finite number, got {value}")]
    NonFiniteSetting {
        /// Name of the setting
        knob: &'static str,
        /// Rejected value
        value: f64,
    },
}

impl ConfigError {
    /// English message template with `{name}` placeholders.
    #[must_use]
    pub fn template(&self) -> &'static str {
        match self {
            Self::InvalidFinisherSize { .. } => "{knob} must be between 1 and 5, got {value}",
            Self::InvalidHemorrhage { .. } => {
                "use_hemorrhage must be always, never or a positive number of seconds, got {value}"
            }
            Self::InvalidSbTiming { .. } => "sub_sb_timing must be shd, fw or other, got {value}",
            Self::NegativeRaidCrits { .. } => {
                "raid_crits_per_second must not be negative, got {value}"
            }
            Self::IllegalOpener { .. } => "opener {opener} is not allowed for {spec}",
            Self::InvalidUseOpener { .. } => {
                "use_opener must be always, opener or never, got {value}"
            }
            Self::InvalidDamagePoison { .. } => "dmg_poison must be dp or wp, got {value}",
            Self::InvalidUtilityPoison { .. } => {
                "utl_poison must be cp, mnp, lp or pp, got {value}"
            }
            Self::MalformedAdvParam { .. } => {
                "advanced parameter entry {entry} must look like key:value"
            }
            Self::InvalidDuration { .. } => {
                "duration must be a positive number of seconds, got {value}"
            }
            Self::InvalidExecuteFraction { .. } => {
                "time_in_execute_range must be between 0 and 1, got {value}"
            }
            Self::InvalidSeconds { .. } => {
                "{knob} must be a non-negative number of seconds, got {value}"
            }
            Self::NonFiniteSetting { .. } => "{knob} must be a finite number, got {value}",
        }
    }

    /// Values substituted into the template.
    #[must_use]
    pub fn params(&self) -> Vec<(&'static str, String)> {
        match self {
            Self::InvalidFinisherSize { knob, value } => {
                vec![("knob", (*knob).to_string()), ("value", value.to_string())]
            }
            Self::InvalidHemorrhage { value }
            | Self::InvalidSbTiming { value }
            | Self::InvalidUseOpener { value }
            | Self::InvalidDamagePoison { value }
            | Self::InvalidUtilityPoison { value } => vec![("value", value.clone())],
            Self::NegativeRaidCrits { value }
            | Self::InvalidDuration { value }
            | Self::InvalidExecuteFraction { value } => vec![("value", value.to_string())],
            Self::IllegalOpener { opener, spec } => {
                vec![("opener", opener.clone()), ("spec", spec.to_string())]
            }
            Self::InvalidSeconds { knob, value } | Self::NonFiniteSetting { knob, value } => {
                vec![("knob", (*knob).to_string()), ("value", value.to_string())]
            }
            Self::MalformedAdvParam { entry } => vec![("entry", entry.clone())],
        }
    }

    /// Render the message through a translator.
    #[must_use]
    pub fn localized(&self, translator: &dyn Translator) -> String {
        self.params()
            .into_iter()
            .fold(translator.translate(self.template()), |message, (name, value)| {
                message.replace(&format!("{{{name}}}"), &value)
            })
    }
}
