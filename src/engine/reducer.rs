//! Reducer: (Sphere, Event) -> IngestOutput
//!
//! All state transitions happen here. One call is one atomic step:
//! effects and clamp, first classification, damping, final classification.

use serde::Serialize;

use super::classify::detect_state;
use super::effects::apply_event;
use super::regulation::{damp, Damping};
use crate::events::Event;
use crate::state::{Sphere, SphereState};

/// Result of processing one event
#[derive(Debug, Clone, Serialize)]
pub struct IngestOutput {
    pub event: Event,
    /// Automatic regulation branch that fired, if any
    pub damping: Option<Damping>,
    /// Public state after regulation
    pub state: SphereState,
    /// State before this event
    pub prev_state: SphereState,
    pub state_hash: String,
}

impl IngestOutput {
    /// The observable state moved.
    pub fn changed_state(&self) -> bool {
        self.state != self.prev_state
    }
}

pub fn ingest(sphere: &mut Sphere, event: Event) -> IngestOutput {
    let prev_state = sphere.state;
    let th = *sphere.thresholds();

    apply_event(&mut sphere.signals, &th, event);

    // First pass only picks the damping branch
    let boundary = detect_state(&sphere.signals, &th);
    let damping = damp(&mut sphere.signals, &th, boundary);

    sphere.state = detect_state(&sphere.signals, &th);

    IngestOutput {
        event,
        damping,
        state: sphere.state,
        prev_state,
        state_hash: sphere.snapshot().digest(),
    }
}
