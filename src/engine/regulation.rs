//! Ignorance utility: deliberate signal reduction.
//!
//! Three moves, applied in order:
//! - **Downshift**: lower resolution to cut integration cost
//! - **Vent**: burn meaning and contradiction, only while pressure sits above
//!   the dissolve threshold
//! - **Re-center**: bleed off pressure and fatigue
//!
//! Called directly by `Rest` events and automatically after a risky
//! classification (see [`damp`]).

use serde::{Deserialize, Serialize};

use crate::state::{Signals, SphereState, Thresholds};

pub const FLOAT_STRENGTH: i32 = 240;
pub const FREEZE_STRENGTH: i32 = 420;
pub const DISSOLVE_STRENGTH: i32 = 800;
/// Resolution a dissolved sphere is rebuilt at.
pub const REBUILD_RESOLUTION: i32 = 8;

/// Reduce signal load by `strength` (nominally 0..=1000) and clamp.
pub fn apply_ignorance_utility(signals: &mut Signals, th: &Thresholds, strength: i32) {
    let down = strength / 80;
    if down > 0 {
        signals.resolution = signals.resolution.saturating_sub(down);
    }

    // Vent gate uses the dissolve threshold, not a dedicated one
    if signals.pressure > th.th_dissolve {
        signals.meaning = signals.meaning.saturating_sub(strength / 8);
        signals.contradiction = signals.contradiction.saturating_sub(strength / 10);
    }

    signals.pressure = signals.pressure.saturating_sub(strength / 6);
    signals.fatigue = signals.fatigue.saturating_sub(strength / 5);

    signals.clamp();
}

/// Automatic regulation fired by reaching a non-stable classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Damping {
    Float,
    Freeze,
    /// Strong vent followed by a low-resolution rebuild
    Dissolve,
}

impl Damping {
    pub fn for_state(state: SphereState) -> Option<Self> {
        match state {
            SphereState::Stable => None,
            SphereState::Float => Some(Damping::Float),
            SphereState::Freeze => Some(Damping::Freeze),
            SphereState::Dissolve => Some(Damping::Dissolve),
        }
    }

    pub fn strength(&self) -> i32 {
        match self {
            Damping::Float => FLOAT_STRENGTH,
            Damping::Freeze => FREEZE_STRENGTH,
            Damping::Dissolve => DISSOLVE_STRENGTH,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Damping::Float => "float",
            Damping::Freeze => "freeze",
            Damping::Dissolve => "dissolve",
        }
    }
}

/// Apply the damping policy for a first-pass classification.
///
/// Returns the branch that fired, `None` for `Stable`.
pub fn damp(signals: &mut Signals, th: &Thresholds, state: SphereState) -> Option<Damping> {
    let damping = Damping::for_state(state)?;
    apply_ignorance_utility(signals, th, damping.strength());

    if damping == Damping::Dissolve {
        rebuild(signals);
    }

    Some(damping)
}

/// Hard reset after dissolving: fixed low resolution, everything else halved.
pub fn rebuild(signals: &mut Signals) {
    signals.resolution = REBUILD_RESOLUTION;
    signals.meaning /= 2;
    signals.contradiction /= 2;
    signals.pressure /= 2;
    signals.fatigue /= 2;
}
