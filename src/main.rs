use anyhow::{Context, Result};

use sphere_boundary::logging::{
    self, log_ingest, log_session_summary, log_snapshot, log_warning, Domain,
};
use sphere_boundary::script::{run_script, REFERENCE_SCRIPT};
use sphere_boundary::state::Config;
use sphere_boundary::verify::invariants::assert_sphere_invariants;
use sphere_boundary::Damping;

fn main() -> Result<()> {
    let cfg = Config::from_env();
    if let Err(err) = cfg.thresholds().validate() {
        // Misordered thresholds still run; classification may look odd
        log_warning(Domain::Config, "threshold_order", &err.to_string());
    }

    let mut sphere = cfg.sphere();
    let initial = sphere.snapshot();
    log_snapshot("initial", &initial);

    println!("== Boundary of Spheres simulation ==");
    println!("{}", initial);

    let steps = run_script(&mut sphere, &REFERENCE_SCRIPT);

    let mut dampings = [(Damping::Float, 0u64), (Damping::Freeze, 0), (Damping::Dissolve, 0)];
    for step in &steps {
        println!("\n-- ingest: {}", step.output.event);
        println!("{}", step.after);
        log_ingest(step.index, &step.before, &step.output, &step.after);

        if let Some(fired) = step.output.damping {
            if let Some(slot) = dampings.iter_mut().find(|(d, _)| *d == fired) {
                slot.1 += 1;
            }
        }
        if !step.after.signals.in_range() {
            anyhow::bail!(
                "step {} left signals out of range: {:?}",
                step.index,
                step.after.signals
            );
        }
    }

    assert_sphere_invariants(&sphere).context("final sphere failed invariant check")?;

    let counts: Vec<(&str, u64)> = dampings.iter().map(|(d, n)| (d.as_str(), *n)).collect();
    log_session_summary(sphere.name(), steps.len() as u64, &counts, sphere.state().as_str());

    println!("\nDone.");
    logging::flush();
    Ok(())
}
