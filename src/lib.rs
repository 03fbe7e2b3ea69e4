//! Boundary of Spheres: a bounded entity under load.
//!
//! A [`Sphere`] holds five bounded integer signals (pressure, contradiction,
//! meaning, resolution, fatigue) and three thresholds. Every event shifts the
//! signals, the sphere is classified into [`SphereState`], and a risky
//! classification triggers the ignorance utility (resolution downshift,
//! venting, re-centering) before the state is classified again.
//!
//! ```
//! use sphere_boundary::{Config, Event};
//!
//! let mut sphere = Config::default().sphere();
//! let out = sphere.ingest(Event::threat(500));
//! assert_eq!(out.state, sphere.state());
//! assert!(sphere.signals().in_range());
//! ```

pub mod engine;
pub mod events;
pub mod logging;
pub mod script;
pub mod state;
pub mod verify;

pub use engine::classify::detect_state;
pub use engine::reducer::IngestOutput;
pub use engine::regulation::{apply_ignorance_utility, Damping};
pub use events::{Event, EventKind};
pub use state::{Config, Signals, Snapshot, Sphere, SphereState, Thresholds};
