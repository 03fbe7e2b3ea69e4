//! Event processor: pure functions over a sphere's signals.
//!
//! ```text
//! ┌──────────┐    ┌──────────┐    ┌──────────┐    ┌──────────┐    ┌──────────┐
//! │  Event   │───►│ Effects  │───►│ Classify │───►│ Regulate │───►│ Classify │
//! │          │    │ + clamp  │    │ (branch) │    │ (damping)│    │ (public) │
//! └──────────┘    └──────────┘    └──────────┘    └──────────┘    └──────────┘
//! ```
//!
//! Only the second classification is stored on the sphere. None of these
//! functions perform I/O; callers log what the reducer reports.

pub mod classify;
pub mod effects;
pub mod reducer;
pub mod regulation;
