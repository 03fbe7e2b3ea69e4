//! Reference run: literal trajectory, determinism and invariants.

use rand::{rngs::StdRng, Rng, SeedableRng};

use sphere_boundary::script::{run_script, REFERENCE_SCRIPT};
use sphere_boundary::verify::invariants::assert_sphere_invariants;
use sphere_boundary::{detect_state, Config, Damping, Event, EventKind, Signals, SphereState};

use sphere_boundary::SphereState::{Float, Stable};

// (state, pressure, contradiction, meaning, resolution, fatigue, damping)
const EXPECTED: [(SphereState, i32, i32, i32, i32, i32, Option<Damping>); 10] = [
    (Stable, 150, 40, 80, 18, 70, None),
    (Stable, 270, 40, 380, 18, 155, None),
    (Stable, 386, 273, 380, 18, 242, None),
    (Float, 596, 273, 463, 15, 360, Some(Damping::Float)),
    (Float, 596, 273, 463, 13, 338, Some(Damping::Float)),
    (Float, 706, 573, 463, 10, 402, Some(Damping::Float)),
    (Stable, 606, 573, 463, 3, 282, None),
    (Float, 726, 573, 863, 1, 348, Some(Damping::Float)),
    (Float, 706, 573, 863, 1, 313, Some(Damping::Float)),
    (Stable, 616, 573, 863, 1, 205, Some(Damping::Float)),
];

#[test]
fn reference_trajectory_is_literal() {
    let mut sphere = Config::default().sphere();
    let steps = run_script(&mut sphere, &REFERENCE_SCRIPT);

    for (step, (state, p, c, m, r, f, damping)) in steps.iter().zip(EXPECTED.iter()) {
        assert_eq!(
            step.after.signals,
            Signals::new(*p, *c, *m, *r, *f),
            "signals after step {} ({})",
            step.index,
            step.output.event
        );
        assert_eq!(step.after.state, *state, "state after step {}", step.index);
        assert_eq!(step.output.damping, *damping, "damping at step {}", step.index);
    }
}

#[test]
fn first_four_events_leave_sphere_loaded() {
    let mut sphere = Config::default().sphere();
    run_script(&mut sphere, &REFERENCE_SCRIPT[..4]);

    assert_ne!(sphere.state(), Stable);
    assert!(sphere.contradiction() > 40);
    assert!(sphere.pressure() > 120);
}

#[test]
fn rest_can_skip_back_to_stable() {
    // Last reference step classifies Float first, then damping lands Stable
    let mut sphere = Config::default().sphere();
    let steps = run_script(&mut sphere, &REFERENCE_SCRIPT);
    let last = steps.last().unwrap();

    assert_eq!(last.before.state, Float);
    assert_eq!(last.output.damping, Some(Damping::Float));
    assert_eq!(last.after.state, Stable);
}

#[test]
fn identical_runs_are_bit_identical() {
    let run = || {
        let mut sphere = Config::default().sphere();
        run_script(&mut sphere, &REFERENCE_SCRIPT)
            .into_iter()
            .map(|s| s.output.state_hash)
            .collect::<Vec<_>>()
    };
    assert_eq!(run(), run());
}

#[test]
fn rest_zero_changes_nothing() {
    let mut sphere = Config::default().sphere();
    let before = sphere.snapshot();

    sphere.ingest(Event::rest(0));
    sphere.ingest(Event::rest(0));

    assert_eq!(sphere.snapshot(), before);
    assert_eq!(sphere.state(), Stable);
}

#[test]
fn state_always_matches_signals() {
    let mut sphere = Config::default().sphere();
    for step in run_script(&mut sphere, &REFERENCE_SCRIPT) {
        let th = step.after.thresholds;
        assert_eq!(step.after.state, detect_state(&step.after.signals, &th));
    }
}

#[test]
fn seeded_streams_hold_invariants() {
    let mut rng = StdRng::seed_from_u64(7);
    let mut sphere = Config::default().sphere();

    for _ in 0..5_000 {
        let kind = EventKind::ALL[rng.gen_range(0..EventKind::ALL.len())];
        let intensity = rng.gen_range(-2_000..=20_000);
        sphere.ingest(Event::new(kind, intensity));
        assert_sphere_invariants(&sphere).unwrap();
    }
}
