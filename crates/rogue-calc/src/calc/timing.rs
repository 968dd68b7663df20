//! Cooldown counting and maintenance rates.

use crate::config::UseOpener;

/// Slack subtracted from the fight length so a cooldown that would come
/// back exactly at the end of the fight is not counted.
const FIGHT_END_SLACK: f64 = 1e-6;

/// Cooldown of Vanish, which gates repeated openers.
pub(crate) const VANISH_COOLDOWN: f64 = 120.0;

/// Number of times an ability on a `cooldown` is used in a fight, counting
/// the use at the pull.
pub(crate) fn uses_in_fight(cooldown: f64, fight: f64) -> f64 {
    1.0 + ((fight - FIGHT_END_SLACK).max(0.0) / cooldown).floor()
}

/// Fraction of the fight covered by a buff of `active` seconds used on
/// cooldown from the pull.
pub(crate) fn cooldown_uptime(active: f64, cooldown: f64, fight: f64) -> f64 {
    if active <= 0.0 {
        return 0.0;
    }
    (uses_in_fight(cooldown, fight) * active / fight).min(1.0)
}

/// Openers per second.
pub(crate) fn opener_rate(use_opener: UseOpener, fight: f64) -> f64 {
    match use_opener {
        UseOpener::Always => uses_in_fight(VANISH_COOLDOWN, fight) / fight,
        UseOpener::Opener => 1.0 / fight,
        UseOpener::Never => 0.0,
    }
}

/// Applications per second of a buff or debuff kept up by reapplying it
/// `gap` seconds after it falls off.
pub(crate) fn maintenance_rate(duration: f64, gap: f64) -> f64 {
    1.0 / (duration + gap.max(0.0))
}

/// Uptime of a buff or debuff maintained with a `gap`.
pub(crate) fn maintenance_uptime(duration: f64, gap: f64) -> f64 {
    duration / (duration + gap.max(0.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_uses_including_pull() {
        assert_eq!(uses_in_fight(120.0, 360.0), 3.0);
        assert_eq!(uses_in_fight(120.0, 361.0), 4.0);
        assert_eq!(uses_in_fight(120.0, 60.0), 1.0);
    }

    #[test]
    fn opener_rates() {
        assert!((opener_rate(UseOpener::Always, 360.0) - 3.0 / 360.0).abs() < 1e-12);
        assert!((opener_rate(UseOpener::Opener, 360.0) - 1.0 / 360.0).abs() < 1e-12);
        assert_eq!(opener_rate(UseOpener::Never, 360.0), 0.0);
    }

    #[test]
    fn uptime_is_capped() {
        assert!((cooldown_uptime(20.0, 120.0, 300.0) - 0.2).abs() < 1e-12);
        assert_eq!(cooldown_uptime(200.0, 120.0, 300.0), 1.0);
        assert_eq!(cooldown_uptime(0.0, 120.0, 300.0), 0.0);
    }

    #[test]
    fn maintenance() {
        assert!((maintenance_rate(24.0, 1.0) - 0.04).abs() < 1e-12);
        assert!((maintenance_uptime(24.0, 1.0) - 0.96).abs() < 1e-12);
    }
}
