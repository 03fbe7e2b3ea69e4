//! Scripted runs: the reference event sequence and a trace-recording harness.

use serde::Serialize;

use crate::engine::reducer::IngestOutput;
use crate::events::Event;
use crate::state::{Snapshot, Sphere};

/// Ten-event reference run. Rest events at 7 and 10 are deliberate venting.
pub const REFERENCE_SCRIPT: [Event; 10] = [
    Event::info(300),
    Event::meaning_over(600),
    Event::contradiction(700),
    Event::threat(500),
    Event::info(400),
    Event::contradiction(900),
    Event::rest(600),
    Event::meaning_over(800),
    Event::info(200),
    Event::rest(300),
];

/// One processed event with the sphere on either side of it.
#[derive(Debug, Clone, Serialize)]
pub struct Step {
    pub index: usize,
    pub before: Snapshot,
    pub output: IngestOutput,
    pub after: Snapshot,
}

/// Feed `events` in order, recording a step per event.
pub fn run_script(sphere: &mut Sphere, events: &[Event]) -> Vec<Step> {
    let mut steps = Vec::with_capacity(events.len());
    for (index, event) in events.iter().enumerate() {
        let before = sphere.snapshot();
        let output = sphere.ingest(*event);
        steps.push(Step {
            index,
            before,
            output,
            after: sphere.snapshot(),
        });
    }
    steps
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Config;

    #[test]
    fn test_steps_chain() {
        let mut sp = Config::default().sphere();
        let steps = run_script(&mut sp, &REFERENCE_SCRIPT);

        assert_eq!(steps.len(), REFERENCE_SCRIPT.len());
        for pair in steps.windows(2) {
            assert_eq!(pair[0].after, pair[1].before);
        }
        assert_eq!(steps.last().map(|s| &s.after), Some(&sp.snapshot()));
    }

    #[test]
    fn test_empty_script() {
        let mut sp = Config::default().sphere();
        let before = sp.snapshot();
        assert!(run_script(&mut sp, &[]).is_empty());
        assert_eq!(sp.snapshot(), before);
    }
}
