//! Boundary detection.

use crate::state::{Signals, SphereState, Thresholds};

/// Derive the discrete state from already-clamped signals.
///
/// First matching rule wins:
/// - **Dissolve**: `contradiction + pressure >= th_dissolve`
/// - **Freeze**: `meaning + resolution*10 >= th_freeze` and `pressure >= th_freeze/2`
/// - **Float**: `pressure + fatigue >= th_float` and `meaning >= th_float/3`
/// - otherwise **Stable**
///
/// Halved and third thresholds use truncating integer division.
pub fn detect_state(signals: &Signals, th: &Thresholds) -> SphereState {
    let chaos = signals.contradiction + signals.pressure;
    if chaos >= th.th_dissolve {
        return SphereState::Dissolve;
    }

    let fixation = signals.meaning + signals.resolution * 10;
    if fixation >= th.th_freeze && signals.pressure >= th.th_freeze / 2 {
        return SphereState::Freeze;
    }

    let overload = signals.pressure + signals.fatigue;
    if overload >= th.th_float && signals.meaning >= th.th_float / 3 {
        return SphereState::Float;
    }

    SphereState::Stable
}

#[cfg(test)]
mod tests {
    use super::*;

    fn th() -> Thresholds {
        Thresholds::new(900, 1400, 2100)
    }

    #[test]
    fn test_stable_baseline() {
        let s = Signals::new(120, 40, 80, 18, 50);
        assert_eq!(detect_state(&s, &th()), SphereState::Stable);
    }

    #[test]
    fn test_dissolve_boundary_inclusive() {
        let s = Signals::new(1000, 1100, 0, 1, 0);
        assert_eq!(detect_state(&s, &th()), SphereState::Dissolve);

        let s = Signals::new(1000, 1099, 0, 1, 0);
        assert_ne!(detect_state(&s, &th()), SphereState::Dissolve);
    }

    #[test]
    fn test_dissolve_wins_over_freeze() {
        // Satisfies Freeze and Float as well
        let s = Signals::new(1500, 700, 2000, 100, 500);
        assert_eq!(detect_state(&s, &th()), SphereState::Dissolve);
    }

    #[test]
    fn test_freeze_needs_pressure() {
        let mut s = Signals::new(700, 0, 1000, 40, 0);
        assert_eq!(detect_state(&s, &th()), SphereState::Freeze);

        s.pressure = 699;
        assert_eq!(detect_state(&s, &th()), SphereState::Stable);
    }

    #[test]
    fn test_float_needs_meaning() {
        let mut s = Signals::new(600, 0, 300, 1, 300);
        assert_eq!(detect_state(&s, &th()), SphereState::Float);

        s.meaning = 299;
        assert_eq!(detect_state(&s, &th()), SphereState::Stable);
    }

    #[test]
    fn test_truncating_threshold_division() {
        // 1001/2 = 500 and 1000/3 = 333
        let th = Thresholds::new(1000, 1001, 5000);

        let s = Signals::new(500, 0, 991, 1, 0);
        assert_eq!(detect_state(&s, &th), SphereState::Freeze);

        let s = Signals::new(400, 0, 333, 1, 600);
        assert_eq!(detect_state(&s, &th), SphereState::Float);
    }
}
