//! Linear energy and combo point balance.
//!
//! In steady state two flows must balance:
//!
//! - combo points: `g·m + X = F·C`, where `g` is landed generators per second,
//!   `m` the mean gain per landed generator, `X` combo points per second from
//!   everything else (negative for maintenance finishers) and `C` the
//!   generator combo points needed per main finisher;
//! - energy: `E = g·c_g + F·c_f`, where `E` is the energy per second left
//!   after fixed costs and `c_g`, `c_f` are net costs.
//!
//! Solving for `F` gives `F = (E + X·c_g/m) / (C·c_g/m + c_f)`.

use tracing::trace;

/// Inputs of the balance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Budget {
    /// Energy per second after fixed costs and sources
    pub energy: f64,
    /// Net energy per landed generator
    pub generator_cost: f64,
    /// Net energy per landed main finisher
    pub finisher_cost: f64,
    /// Mean combo points per landed generator
    pub mean_gain: f64,
    /// Generator combo points needed per main finisher
    pub cp_per_finisher: f64,
    /// Combo points per second from outside the generator chain
    pub extra_cp: f64,
}

/// Solved rates, per second.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Rates {
    pub finisher: f64,
    pub generator: f64,
}

impl Budget {
    /// Solve for the main finisher and generator rates. Both are clamped at
    /// zero.
    pub fn solve(&self) -> Rates {
        let m = self.mean_gain.max(f64::EPSILON);
        let gen_cost = self.generator_cost.max(0.0);
        let denominator = (self.cp_per_finisher * gen_cost / m + self.finisher_cost).max(1e-9);
        let mut finisher = (self.energy + self.extra_cp * gen_cost / m) / denominator;
        let mut generator = (finisher * self.cp_per_finisher - self.extra_cp) / m;

        if finisher < 0.0 {
            // Fixed costs eat all the energy; whatever is left goes to generators.
            finisher = 0.0;
            generator = if gen_cost > 0.0 {
                self.energy.max(0.0) / gen_cost
            } else {
                0.0
            };
        } else if generator < 0.0 {
            // Outside sources supply more points than energy can spend.
            generator = 0.0;
            let by_energy = if self.finisher_cost > 0.0 {
                self.energy.max(0.0) / self.finisher_cost
            } else {
                f64::INFINITY
            };
            let by_points = self.extra_cp.max(0.0) / self.cp_per_finisher.max(f64::EPSILON);
            finisher = by_energy.min(by_points);
        }
        trace!(finisher, generator, "solved energy budget");
        Rates {
            finisher,
            generator,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn budget() -> Budget {
        Budget {
            energy: 12.0,
            generator_cost: 50.0,
            finisher_cost: 10.0,
            mean_gain: 1.0,
            cp_per_finisher: 5.0,
            extra_cp: 0.0,
        }
    }

    #[test]
    fn balances_energy_and_points() {
        let b = budget();
        let rates = b.solve();
        // 12 = 5F·50 + 10F → F = 12/260
        assert!((rates.finisher - 12.0 / 260.0).abs() < 1e-12);
        assert!((rates.generator - 5.0 * rates.finisher).abs() < 1e-12);
        let spent = rates.generator * b.generator_cost + rates.finisher * b.finisher_cost;
        assert!((spent - b.energy).abs() < 1e-9);
    }

    #[test]
    fn extra_points_raise_finisher_rate() {
        let base = budget().solve();
        let boosted = Budget {
            extra_cp: 0.1,
            ..budget()
        }
        .solve();
        assert!(boosted.finisher > base.finisher);
        assert!(boosted.generator < base.generator * 1.0001 + 1e-12);
    }

    #[test]
    fn negative_energy_clamps_to_zero() {
        let rates = Budget {
            energy: -3.0,
            ..budget()
        }
        .solve();
        assert_eq!(rates.finisher, 0.0);
        assert_eq!(rates.generator, 0.0);
    }

    #[test]
    fn plenty_of_outside_points() {
        let rates = Budget {
            extra_cp: 10.0,
            ..budget()
        }
        .solve();
        assert_eq!(rates.generator, 0.0);
        assert!((rates.finisher - 1.2).abs() < 1e-12);
    }
}
