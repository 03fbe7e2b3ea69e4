//! Seeded random event streams against random spheres.
//!
//! Env: SEED (42), EVENTS (10000), SPHERES (16).
//! Checks range and classification invariants after every event and
//! replays each stream on a clone to confirm identical digests.

use std::env;

use anyhow::{Context, Result};
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde_json::json;

use sphere_boundary::logging::{self, log, obj, v_str, Domain, Level};
use sphere_boundary::state::{RESOLUTION_MAX, RESOLUTION_MIN, SIGNAL_MAX};
use sphere_boundary::verify::invariants::assert_sphere_invariants;
use sphere_boundary::{Event, EventKind, Signals, Sphere, SphereState, Thresholds};

fn random_sphere(rng: &mut StdRng, id: usize) -> Sphere {
    let signals = Signals::new(
        rng.gen_range(0..=SIGNAL_MAX),
        rng.gen_range(0..=SIGNAL_MAX),
        rng.gen_range(0..=SIGNAL_MAX),
        rng.gen_range(RESOLUTION_MIN..=RESOLUTION_MAX),
        rng.gen_range(0..=SIGNAL_MAX),
    );
    let th_float = rng.gen_range(100..2000);
    let th_freeze = th_float + rng.gen_range(1..2000);
    let th_dissolve = th_freeze + rng.gen_range(1..3000);
    Sphere::new(format!("fuzz-{}", id), signals, Thresholds::new(th_float, th_freeze, th_dissolve))
}

fn random_event(rng: &mut StdRng) -> Event {
    let kind = EventKind::ALL[rng.gen_range(0..EventKind::ALL.len())];
    // Mostly nominal, sometimes outside [0, 1000]
    let intensity = if rng.gen_bool(0.9) {
        rng.gen_range(0..=1000)
    } else {
        rng.gen_range(-5000..=50_000)
    };
    Event::new(kind, intensity)
}

fn state_index(state: SphereState) -> usize {
    match state {
        SphereState::Stable => 0,
        SphereState::Float => 1,
        SphereState::Freeze => 2,
        SphereState::Dissolve => 3,
    }
}

fn main() -> Result<()> {
    let seed = env::var("SEED").ok().and_then(|v| v.parse().ok()).unwrap_or(42u64);
    let events = env::var("EVENTS").ok().and_then(|v| v.parse().ok()).unwrap_or(10_000usize);
    let spheres = env::var("SPHERES").ok().and_then(|v| v.parse().ok()).unwrap_or(16usize).max(1);

    let mut rng = StdRng::seed_from_u64(seed);
    let per_sphere = events / spheres;
    let mut visits = [0u64; 4];
    let mut damped = 0u64;

    for id in 0..spheres {
        let mut sphere = random_sphere(&mut rng, id);
        let mut shadow = sphere.clone();

        for n in 0..per_sphere {
            let event = random_event(&mut rng);
            let out = sphere.ingest(event);
            let replay = shadow.ingest(event);

            assert_sphere_invariants(&sphere)
                .with_context(|| format!("{} after event {} ({})", sphere.name(), n, event))?;
            if out.state_hash != replay.state_hash {
                anyhow::bail!("{} diverged from its replay at event {}", sphere.name(), n);
            }

            visits[state_index(out.state)] += 1;
            if out.damping.is_some() {
                damped += 1;
            }
        }
    }

    log(
        Level::Info,
        Domain::Verify,
        "fuzz_summary",
        obj(&[
            ("msg", v_str("all invariants held")),
            ("seed", json!(seed)),
            ("spheres", json!(spheres)),
            ("events", json!(per_sphere * spheres)),
            ("damped", json!(damped)),
            (
                "visits",
                json!({
                    "stable": visits[0],
                    "float": visits[1],
                    "freeze": visits[2],
                    "dissolve": visits[3],
                }),
            ),
        ]),
    );
    logging::flush();
    Ok(())
}
