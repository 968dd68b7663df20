//! Combo point accumulation as an absorbing Markov chain.
//!
//! Starting from the combo points left after a finisher, landed generators
//! add combo points according to a gain distribution until the total reaches
//! the minimum finisher size. The finisher then spends up to five. Without
//! Anticipation the bar caps at five and overflow is wasted; with it up to
//! five extra points carry into the next cycle. Ruthlessness can add one
//! point after each finisher. The start-state distribution is found by power
//! iteration, so carried points are weighted correctly.

/// Combo points a finisher can spend.
pub(crate) const MAX_COMBO_POINTS: usize = 5;
/// Highest total tracked: five on the bar plus five Anticipation charges.
const MAX_TOTAL: usize = 2 * MAX_COMBO_POINTS;
/// Chance per spent combo point that Ruthlessness grants one back.
const RUTHLESSNESS_PER_CP: f64 = 0.2;

const POWER_ITERATIONS: usize = 256;

/// How the chain treats points beyond what a finisher spends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ChainRules {
    pub anticipation: bool,
    pub ruthlessness: bool,
}

/// Steady-state result of the chain.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ChainResult {
    /// Expected landed generators per finisher
    pub generators_per_finisher: f64,
    /// Mean combo points per landed generator
    pub mean_gain: f64,
    /// Probability that a finisher spends `i` combo points
    pub finisher_cp: [f64; MAX_COMBO_POINTS + 1],
    /// Expected combo points wasted per finisher
    pub wasted_per_finisher: f64,
    /// Share of generator casts made while holding `i` combo points
    pub occupancy: [f64; MAX_COMBO_POINTS + 1],
}

impl ChainResult {
    /// Expected combo points spent per finisher.
    pub fn average_cp(&self) -> f64 {
        weighted_mean(&self.finisher_cp)
    }

    /// Combo points gained per finisher, spent or wasted.
    pub fn cp_per_finisher(&self) -> f64 {
        self.average_cp() + self.wasted_per_finisher
    }

    /// Combo points per finisher that had to come from generators.
    pub fn generator_cp_per_finisher(&self) -> f64 {
        self.generators_per_finisher * self.mean_gain
    }

    /// Expected combo points on the bar when a generator is cast, at least
    /// one.
    pub fn average_occupancy(&self) -> f64 {
        weighted_mean(&self.occupancy).max(1.0)
    }
}

#[allow(clippy::cast_precision_loss)]
fn weighted_mean(distribution: &[f64]) -> f64 {
    distribution
        .iter()
        .enumerate()
        .map(|(cp, p)| cp as f64 * p)
        .sum()
}

/// Per-start-state absorption data.
struct Absorption {
    /// Expected generators until a finisher, by starting total
    generators: [f64; MAX_TOTAL + 1],
    /// Distribution of the total at finisher time, by starting total
    finish: [[f64; MAX_TOTAL + 1]; MAX_TOTAL + 1],
    /// Expected generator casts from each total, by starting total
    visits: [[f64; MAX_TOTAL + 1]; MAX_TOTAL + 1],
}

fn absorb(gains: &[(usize, f64)], min_size: usize, cap: usize) -> Absorption {
    let mut generators = [0.0; MAX_TOTAL + 1];
    let mut finish = [[0.0; MAX_TOTAL + 1]; MAX_TOTAL + 1];
    let mut visits = [[0.0; MAX_TOTAL + 1]; MAX_TOTAL + 1];
    for x in (0..=cap).rev() {
        if x >= min_size {
            finish[x][x] = 1.0;
            continue;
        }
        generators[x] = 1.0;
        visits[x][x] = 1.0;
        for &(gain, p) in gains {
            let next = (x + gain).min(cap);
            generators[x] += p * generators[next];
            for t in 0..=cap {
                finish[x][t] += p * finish[next][t];
                visits[x][t] += p * visits[next][t];
            }
        }
    }
    Absorption {
        generators,
        finish,
        visits,
    }
}

/// Solve the chain for a gain distribution over landed generators.
///
/// `gains` lists `(combo points, probability)`; zero-point entries are
/// dropped and the rest renormalized. `min_size` is clamped to 1..=5.
pub(crate) fn solve(gains: &[(usize, f64)], min_size: u8, rules: ChainRules) -> ChainResult {
    let mut gains: Vec<(usize, f64)> = gains
        .iter()
        .copied()
        .filter(|(gain, p)| *gain > 0 && *p > 0.0)
        .collect();
    let mass: f64 = gains.iter().map(|(_, p)| p).sum();
    if mass <= 0.0 {
        gains = vec![(1, 1.0)];
    } else {
        for entry in &mut gains {
            entry.1 /= mass;
        }
    }

    let min_size = usize::from(min_size).clamp(1, MAX_COMBO_POINTS);
    let cap = if rules.anticipation {
        MAX_TOTAL
    } else {
        MAX_COMBO_POINTS
    };
    let chain = absorb(&gains, min_size, cap);

    // Distribution of the total a cycle starts from.
    let mut start = [0.0; MAX_TOTAL + 1];
    start[0] = 1.0;
    for _ in 0..POWER_ITERATIONS {
        let mut next = [0.0; MAX_TOTAL + 1];
        for (s, ps) in start.iter().enumerate().filter(|(_, p)| **p > 0.0) {
            for (total, pt) in chain.finish[s].iter().enumerate().filter(|(_, p)| **p > 0.0) {
                let spent = total.min(MAX_COMBO_POINTS);
                let carried = if rules.anticipation {
                    total - spent
                } else {
                    0
                };
                let weight = ps * pt;
                if rules.ruthlessness {
                    #[allow(clippy::cast_precision_loss)]
                    let bonus = (RUTHLESSNESS_PER_CP * spent as f64).min(1.0);
                    next[(carried + 1).min(cap)] += weight * bonus;
                    next[carried] += weight * (1.0 - bonus);
                } else {
                    next[carried] += weight;
                }
            }
        }
        // Lazy step so periodic chains (carry one point, then none)
        // converge to their average.
        for (s, p) in start.iter_mut().enumerate() {
            *p = 0.5 * *p + 0.5 * next[s];
        }
    }

    let mut generators_per_finisher = 0.0;
    let mut finisher_cp = [0.0; MAX_COMBO_POINTS + 1];
    let mut visits = [0.0; MAX_COMBO_POINTS + 1];
    for (s, ps) in start.iter().enumerate().filter(|(_, p)| **p > 0.0) {
        generators_per_finisher += ps * chain.generators[s];
        for (total, pt) in chain.finish[s].iter().enumerate() {
            finisher_cp[total.min(MAX_COMBO_POINTS)] += ps * pt;
        }
        for (x, v) in chain.visits[s].iter().enumerate() {
            visits[x.min(MAX_COMBO_POINTS)] += ps * v;
        }
    }
    let wasted_per_finisher = overflow_waste(&gains, &chain, &start, min_size, cap);
    let total_visits: f64 = visits.iter().sum();
    let occupancy = if total_visits > 0.0 {
        visits.map(|v| v / total_visits)
    } else {
        let mut occupancy = [0.0; MAX_COMBO_POINTS + 1];
        occupancy[0] = 1.0;
        occupancy
    };

    #[allow(clippy::cast_precision_loss)]
    let mean_gain: f64 = gains.iter().map(|(gain, p)| *gain as f64 * p).sum();

    ChainResult {
        generators_per_finisher,
        mean_gain,
        finisher_cp,
        wasted_per_finisher,
        occupancy,
    }
}

/// Expected points lost to the cap per finisher.
#[allow(clippy::cast_precision_loss)]
fn overflow_waste(
    gains: &[(usize, f64)],
    chain: &Absorption,
    start: &[f64; MAX_TOTAL + 1],
    min_size: usize,
    cap: usize,
) -> f64 {
    let mut waste = 0.0;
    for (s, ps) in start.iter().enumerate().filter(|(_, p)| **p > 0.0) {
        for (x, v) in chain.visits[s].iter().enumerate().take(min_size) {
            for &(gain, p) in gains {
                let lost = (x + gain).saturating_sub(cap) as f64;
                waste += ps * v * p * lost;
            }
        }
    }
    waste
}
