use std::fmt;

use crate::engine::classify::detect_state;
use crate::engine::regulation::REBUILD_RESOLUTION;
use crate::state::{Signals, Sphere};

#[derive(Debug, Clone)]
pub struct InvariantViolation {
    pub msg: String,
}

impl fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invariant violated: {}", self.msg)
    }
}

impl std::error::Error for InvariantViolation {}

pub fn assert_signal_ranges(signals: &Signals) -> Result<(), InvariantViolation> {
    if !signals.in_range() {
        return Err(InvariantViolation {
            msg: format!("signals out of range: {:?}", signals),
        });
    }
    Ok(())
}

/// Stored state must equal a fresh classification of the stored signals.
pub fn assert_classification_consistent(sphere: &Sphere) -> Result<(), InvariantViolation> {
    let recomputed = detect_state(sphere.signals(), sphere.thresholds());
    if recomputed != sphere.state() {
        return Err(InvariantViolation {
            msg: format!(
                "stored state {} but signals classify as {}",
                sphere.state(),
                recomputed
            ),
        });
    }
    Ok(())
}

/// `rebuilt` must be `vented` after the dissolve reset.
pub fn assert_dissolve_reset(
    vented: &Signals,
    rebuilt: &Signals,
) -> Result<(), InvariantViolation> {
    let expected = Signals::new(
        vented.pressure / 2,
        vented.contradiction / 2,
        vented.meaning / 2,
        REBUILD_RESOLUTION,
        vented.fatigue / 2,
    );
    if *rebuilt != expected {
        return Err(InvariantViolation {
            msg: format!("dissolve reset mismatch: expected {:?}, got {:?}", expected, rebuilt),
        });
    }
    Ok(())
}

/// Everything that must hold after any `ingest` call.
pub fn assert_sphere_invariants(sphere: &Sphere) -> Result<(), InvariantViolation> {
    assert_signal_ranges(sphere.signals())?;
    assert_classification_consistent(sphere)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::regulation::{apply_ignorance_utility, rebuild, DISSOLVE_STRENGTH};
    use crate::state::Thresholds;

    #[test]
    fn test_out_of_range_detected() {
        let s = Signals::new(0, 0, 0, 0, 0);
        assert!(assert_signal_ranges(&s).is_err());
        let s = Signals::new(5001, 0, 0, 1, 0);
        assert!(assert_signal_ranges(&s).is_err());
        let s = Signals::new(5000, 0, 0, 100, 0);
        assert!(assert_signal_ranges(&s).is_ok());
    }

    #[test]
    fn test_fresh_sphere_consistency() {
        // Constructed Stable even though the signals classify as Dissolve
        let sp = Sphere::new(
            "hot",
            Signals::new(2000, 2000, 0, 1, 0),
            Thresholds::new(900, 1400, 2100),
        );
        assert!(assert_classification_consistent(&sp).is_err());
    }

    #[test]
    fn test_dissolve_reset_check() {
        let th = Thresholds::new(900, 1400, 2100);
        let mut s = Signals::new(1301, 999, 777, 33, 555);
        apply_ignorance_utility(&mut s, &th, DISSOLVE_STRENGTH);
        let vented = s;
        rebuild(&mut s);
        assert!(assert_dissolve_reset(&vented, &s).is_ok());

        s.fatigue += 1;
        assert!(assert_dissolve_reset(&vented, &s).is_err());
    }
}
