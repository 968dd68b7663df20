//! Equivalence points: DPS gained per point of each attribute.
//!
//! Each attribute is raised by a small delta on a fresh copy of the
//! character, the merged DPS is recomputed, and the difference from one
//! shared baseline is divided by the delta. Perturbations are independent
//! and run in parallel.

use std::collections::BTreeMap;

use armory::{Attribute, CharacterContext};
use rayon::prelude::*;
use serde::Serialize;
use tracing::debug;

use crate::calc::DamageCalculator;
use crate::config::Settings;
use crate::error::CalcError;

// ============================================================================
// Configuration
// ============================================================================

/// Which attributes to measure, by how much to perturb each, and what to
/// normalize against.
#[derive(Debug, Clone, PartialEq)]
pub struct EpConfig {
    deltas: Vec<(Attribute, f64)>,
    reference: Attribute,
}

impl Default for EpConfig {
    /// Every attribute at its default delta, normalized to agility.
    fn default() -> Self {
        Self {
            deltas: Attribute::ALL
                .iter()
                .map(|attribute| (*attribute, attribute.default_delta()))
                .collect(),
            reference: Attribute::Agi,
        }
    }
}

impl EpConfig {
    /// No attributes yet, normalized to `reference`.
    #[must_use]
    pub fn new(reference: Attribute) -> Self {
        Self {
            deltas: Vec::new(),
            reference,
        }
    }

    /// Measure `attribute` with `delta`, replacing any earlier delta.
    #[must_use]
    pub fn with_delta(mut self, attribute: Attribute, delta: f64) -> Self {
        match self.deltas.iter_mut().find(|(a, _)| *a == attribute) {
            Some(entry) => entry.1 = delta,
            None => self.deltas.push((attribute, delta)),
        }
        self
    }

    /// Normalize against another attribute.
    #[must_use]
    pub fn with_reference(mut self, reference: Attribute) -> Self {
        self.reference = reference;
        self
    }

    /// Attributes and their deltas, in insertion order.
    pub fn deltas(&self) -> impl Iterator<Item = (Attribute, f64)> + '_ {
        self.deltas.iter().copied()
    }

    /// The normalization attribute.
    #[must_use]
    pub fn reference(&self) -> Attribute {
        self.reference
    }

    fn validate(&self) -> Result<(), CalcError> {
        for (attribute, delta) in self.deltas() {
            if delta == 0.0 || !delta.is_finite() {
                return Err(CalcError::ZeroDelta {
                    attribute: attribute.as_str().to_string(),
                    delta,
                });
            }
        }
        Ok(())
    }
}

// ============================================================================
// Table
// ============================================================================

/// DPS per point by attribute.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EpTable {
    raw: BTreeMap<Attribute, f64>,
    reference: Attribute,
    baseline_dps: f64,
}

impl EpTable {
    /// DPS per point of one attribute.
    #[must_use]
    pub fn get(&self, attribute: Attribute) -> Option<f64> {
        self.raw.get(&attribute).copied()
    }

    /// Raw values in attribute order.
    pub fn iter(&self) -> impl Iterator<Item = (Attribute, f64)> + '_ {
        self.raw.iter().map(|(a, v)| (*a, *v))
    }

    /// Merged DPS of the unperturbed character.
    #[must_use]
    pub fn baseline_dps(&self) -> f64 {
        self.baseline_dps
    }

    /// The normalization attribute.
    #[must_use]
    pub fn reference(&self) -> Attribute {
        self.reference
    }

    /// Values divided by the reference attribute's value.
    ///
    /// # Errors
    ///
    /// Returns [`CalcError::ZeroReference`] if the reference was not
    /// measured or is worth nothing.
    pub fn normalized(&self) -> Result<BTreeMap<Attribute, f64>, CalcError> {
        let reference = self
            .get(self.reference)
            .filter(|value| *value != 0.0 && value.is_finite())
            .ok_or_else(|| CalcError::ZeroReference {
                attribute: self.reference.as_str().to_string(),
            })?;
        Ok(self.iter().map(|(a, v)| (a, v / reference)).collect())
    }
}

// ============================================================================
// Computation
// ============================================================================

/// EP for every attribute with default deltas, normalized to agility.
///
/// # Errors
///
/// Any error of [`compute_breakdown`](crate::compute_breakdown).
pub fn compute_ep(settings: &Settings, ctx: &CharacterContext) -> Result<EpTable, CalcError> {
    compute_ep_with(settings, ctx, &EpConfig::default())
}

/// EP with custom attributes and deltas.
///
/// # Errors
///
/// - [`CalcError::ZeroDelta`] for a zero or non-finite delta, before any
///   damage is computed.
/// - Any error of [`compute_breakdown`](crate::compute_breakdown).
pub fn compute_ep_with(
    settings: &Settings,
    ctx: &CharacterContext,
    config: &EpConfig,
) -> Result<EpTable, CalcError> {
    config.validate()?;
    let baseline = DamageCalculator::new(settings, ctx).total_dps()?;

    let raw = config
        .deltas
        .par_iter()
        .map(|&(attribute, delta)| {
            let perturbed = ctx.with_attribute_delta(attribute, delta);
            let dps = DamageCalculator::new(settings, &perturbed).total_dps()?;
            Ok((attribute, (dps - baseline) / delta))
        })
        .collect::<Result<BTreeMap<_, _>, CalcError>>()?;

    debug!(
        baseline,
        attributes = raw.len(),
        reference = config.reference.as_str(),
        "computed EP"
    );
    Ok(EpTable {
        raw,
        reference: config.reference,
        baseline_dps: baseline,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_covers_every_attribute() {
        let config = EpConfig::default();
        assert_eq!(config.deltas().count(), Attribute::ALL.len());
        assert_eq!(config.reference(), Attribute::Agi);
    }

    #[test]
    fn with_delta_replaces() {
        let config = EpConfig::new(Attribute::Agi)
            .with_delta(Attribute::Agi, 1.0)
            .with_delta(Attribute::Agi, 2.0);
        assert_eq!(config.deltas().collect::<Vec<_>>(), vec![(Attribute::Agi, 2.0)]);
    }

    #[test]
    fn zero_and_nan_deltas_are_rejected() {
        for delta in [0.0, f64::NAN, f64::INFINITY] {
            let config = EpConfig::new(Attribute::Agi).with_delta(Attribute::Hit, delta);
            assert!(matches!(
                config.validate(),
                Err(CalcError::ZeroDelta { ref attribute, .. }) if attribute == "hit"
            ));
        }
    }

    #[test]
    fn normalizing_against_zero_fails() {
        let table = EpTable {
            raw: [(Attribute::Agi, 0.0), (Attribute::Str, 1.0)].into_iter().collect(),
            reference: Attribute::Agi,
            baseline_dps: 100.0,
        };
        assert_eq!(
            table.normalized(),
            Err(CalcError::ZeroReference {
                attribute: "agi".to_string()
            })
        );
    }

    #[test]
    fn normalized_reference_is_one() {
        let table = EpTable {
            raw: [(Attribute::Agi, 4.0), (Attribute::Str, 2.0)].into_iter().collect(),
            reference: Attribute::Agi,
            baseline_dps: 100.0,
        };
        let normalized = table.normalized().unwrap();
        assert_eq!(normalized[&Attribute::Agi], 1.0);
        assert_eq!(normalized[&Attribute::Str], 0.5);
    }
}
