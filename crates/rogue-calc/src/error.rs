//! Errors raised while calculating damage, EP or rankings.

use thiserror::Error;

/// A calculation could not be completed.
///
/// Configuration problems are caught earlier by
/// [`ConfigError`](crate::config::ConfigError); these are failures that only
/// show up once the character is combined with the settings, plus invalid
/// input to the EP and ranking engines.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CalcError {
    /// A proc or enchant name that the catalog cannot resolve.
    #[error("unknown proc or enchant '{0}'")]
    UnknownEffect(String),

    /// The equipped weapons cannot be used with an ability the rotation needs.
    #[error("{ability} requires {requirement}")]
    WeaponRequirement {
        /// Ability that cannot be used
        ability: &'static str,
        /// What it needs
        requirement: &'static str,
    },

    /// An advanced parameter the model reads has an unusable value.
    #[error("advanced parameter {key} has invalid value '{value}'")]
    InvalidAdvParam {
        /// Parameter key
        key: String,
        /// Rejected value
        value: String,
    },

    /// EP perturbation of zero or a non-finite size.
    #[error("EP delta for {attribute} must be finite and nonzero, got {delta}")]
    ZeroDelta {
        /// Attribute being perturbed
        attribute: String,
        /// Rejected delta
        delta: f64,
    },

    /// Normalizing EP against an attribute whose EP is zero.
    #[error("cannot normalize EP against {attribute}: its value is zero")]
    ZeroReference {
        /// Reference attribute
        attribute: String,
    },

    /// Ranking requested with nothing to rank.
    #[error("ranking needs at least one option")]
    EmptyOptions,

    /// The model produced a non-finite total, which means an input is out of
    /// the range it can handle.
    #[error("damage for {source_name} is not a finite number")]
    NonFinite {
        /// Breakdown key that went bad
        source_name: String,
    },
}
