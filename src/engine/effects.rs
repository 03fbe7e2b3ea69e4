//! Event → signal deltas.
//!
//! | kind          | pressure | fatigue | other                           |
//! |---------------|----------|---------|---------------------------------|
//! | Info          | i/10     | i/15    | resolution +1 when i > 300      |
//! | Contradiction | i/6      | i/8     | contradiction += i/3            |
//! | MeaningOver   | i/5      | i/7     | meaning += i/2                  |
//! | Threat        | i/2      | i/3     | meaning += i/6                  |
//! | Rest          | -        | -       | regulation with strength = i    |

use crate::events::{Event, EventKind};
use crate::state::{Signals, Thresholds};

use super::regulation::apply_ignorance_utility;

/// Apply an event's deltas, then clamp all signals.
pub fn apply_event(signals: &mut Signals, th: &Thresholds, event: Event) {
    let i = event.intensity;

    match event.kind {
        EventKind::Info => {
            signals.pressure = signals.pressure.saturating_add(i / 10);
            signals.fatigue = signals.fatigue.saturating_add(i / 15);
            if i > 300 {
                signals.resolution = signals.resolution.saturating_add(1);
            }
        }
        EventKind::Contradiction => {
            signals.contradiction = signals.contradiction.saturating_add(i / 3);
            signals.pressure = signals.pressure.saturating_add(i / 6);
            signals.fatigue = signals.fatigue.saturating_add(i / 8);
        }
        EventKind::MeaningOver => {
            signals.meaning = signals.meaning.saturating_add(i / 2);
            signals.pressure = signals.pressure.saturating_add(i / 5);
            signals.fatigue = signals.fatigue.saturating_add(i / 7);
        }
        EventKind::Threat => {
            signals.pressure = signals.pressure.saturating_add(i / 2);
            // threat forces meaning-making
            signals.meaning = signals.meaning.saturating_add(i / 6);
            signals.fatigue = signals.fatigue.saturating_add(i / 3);
        }
        EventKind::Rest => {
            apply_ignorance_utility(signals, th, i);
        }
    }

    signals.clamp();
}
