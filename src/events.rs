//! Events fed into a sphere.
//!
//! An event is transient: built by the caller, consumed by one `ingest`
//! call, then dropped.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Nominal intensity domain. Not enforced by `ingest`.
pub const INTENSITY_MIN: i32 = 0;
pub const INTENSITY_MAX: i32 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// New information to integrate
    Info,
    /// Contradicting input
    Contradiction,
    /// Excess meaning-making
    MeaningOver,
    /// Fear / crisis
    Threat,
    /// Deliberate rest: direct regulation
    Rest,
}

impl EventKind {
    pub const ALL: [EventKind; 5] = [
        EventKind::Info,
        EventKind::Contradiction,
        EventKind::MeaningOver,
        EventKind::Threat,
        EventKind::Rest,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Info => "INFO",
            EventKind::Contradiction => "CONTRADICTION",
            EventKind::MeaningOver => "MEANING_OVER",
            EventKind::Threat => "THREAT",
            EventKind::Rest => "REST",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct EventRejected {
    pub msg: String,
}

impl fmt::Display for EventRejected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "event rejected: {}", self.msg)
    }
}

impl std::error::Error for EventRejected {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub kind: EventKind,
    pub intensity: i32,
}

impl Event {
    /// Build an event without range checks. Out-of-domain intensities are
    /// accepted and processed with the same arithmetic.
    pub const fn new(kind: EventKind, intensity: i32) -> Self {
        Self { kind, intensity }
    }

    /// Build an event, rejecting intensities outside [0, 1000].
    pub fn checked(kind: EventKind, intensity: i32) -> Result<Self, EventRejected> {
        if !(INTENSITY_MIN..=INTENSITY_MAX).contains(&intensity) {
            return Err(EventRejected {
                msg: format!(
                    "{} intensity {} outside [{}, {}]",
                    kind, intensity, INTENSITY_MIN, INTENSITY_MAX
                ),
            });
        }
        Ok(Self::new(kind, intensity))
    }

    pub const fn info(intensity: i32) -> Self {
        Self::new(EventKind::Info, intensity)
    }

    pub const fn contradiction(intensity: i32) -> Self {
        Self::new(EventKind::Contradiction, intensity)
    }

    pub const fn meaning_over(intensity: i32) -> Self {
        Self::new(EventKind::MeaningOver, intensity)
    }

    pub const fn threat(intensity: i32) -> Self {
        Self::new(EventKind::Threat, intensity)
    }

    pub const fn rest(intensity: i32) -> Self {
        Self::new(EventKind::Rest, intensity)
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:<14} intensity={}", self.kind.as_str(), self.intensity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels() {
        let labels: Vec<_> = EventKind::ALL.iter().map(|k| k.as_str()).collect();
        assert_eq!(
            labels,
            vec!["INFO", "CONTRADICTION", "MEANING_OVER", "THREAT", "REST"]
        );
    }

    #[test]
    fn test_checked_bounds() {
        assert!(Event::checked(EventKind::Info, 0).is_ok());
        assert!(Event::checked(EventKind::Info, 1000).is_ok());
        assert!(Event::checked(EventKind::Threat, -1).is_err());

        let err = Event::checked(EventKind::Rest, 1001).unwrap_err();
        assert!(err.msg.contains("REST"));
    }

    #[test]
    fn test_unchecked_accepts_anything() {
        let e = Event::new(EventKind::Threat, 50_000);
        assert_eq!(e.intensity, 50_000);
    }
}
