//! Signal store: one sphere, its bounded signals and its policy knobs.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

use crate::engine::reducer::{ingest, IngestOutput};
use crate::events::Event;

/// Upper bound for pressure, contradiction, meaning and fatigue.
pub const SIGNAL_MAX: i32 = 5000;
pub const SIGNAL_MIN: i32 = 0;
/// Resolution never reaches zero.
pub const RESOLUTION_MIN: i32 = 1;
pub const RESOLUTION_MAX: i32 = 100;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SphereState {
    /// Frame works as intended
    #[default]
    Stable,
    /// Too many open possibilities, boundary blurs
    Float,
    /// Over-fixated on one axis
    Freeze,
    /// Structure breaks down, awaiting rebuild
    Dissolve,
}

impl SphereState {
    pub fn as_str(&self) -> &'static str {
        match self {
            SphereState::Stable => "STABLE",
            SphereState::Float => "FLOAT",
            SphereState::Freeze => "FREEZE",
            SphereState::Dissolve => "DISSOLVE",
        }
    }
}

impl fmt::Display for SphereState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // pad() so width specifiers like {:<8} apply
        f.pad(self.as_str())
    }
}

/// The five scalar signals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Signals {
    pub pressure: i32,
    pub contradiction: i32,
    pub meaning: i32,
    pub resolution: i32,
    pub fatigue: i32,
}

impl Signals {
    pub fn new(
        pressure: i32,
        contradiction: i32,
        meaning: i32,
        resolution: i32,
        fatigue: i32,
    ) -> Self {
        Self {
            pressure,
            contradiction,
            meaning,
            resolution,
            fatigue,
        }
    }

    /// Pull every signal back into its valid range.
    pub fn clamp(&mut self) {
        self.pressure = self.pressure.clamp(SIGNAL_MIN, SIGNAL_MAX);
        self.contradiction = self.contradiction.clamp(SIGNAL_MIN, SIGNAL_MAX);
        self.meaning = self.meaning.clamp(SIGNAL_MIN, SIGNAL_MAX);
        self.resolution = self.resolution.clamp(RESOLUTION_MIN, RESOLUTION_MAX);
        self.fatigue = self.fatigue.clamp(SIGNAL_MIN, SIGNAL_MAX);
    }

    pub fn clamped(mut self) -> Self {
        self.clamp();
        self
    }

    pub fn in_range(&self) -> bool {
        let bounded = |v: i32| (SIGNAL_MIN..=SIGNAL_MAX).contains(&v);
        bounded(self.pressure)
            && bounded(self.contradiction)
            && bounded(self.meaning)
            && bounded(self.fatigue)
            && (RESOLUTION_MIN..=RESOLUTION_MAX).contains(&self.resolution)
    }
}

#[derive(Debug, Clone)]
pub struct ConfigError {
    pub msg: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "config error: {}", self.msg)
    }
}

impl std::error::Error for ConfigError {}

/// Classification thresholds. Immutable once the sphere is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Thresholds {
    pub th_float: i32,
    pub th_freeze: i32,
    pub th_dissolve: i32,
}

impl Thresholds {
    pub fn new(th_float: i32, th_freeze: i32, th_dissolve: i32) -> Self {
        Self {
            th_float,
            th_freeze,
            th_dissolve,
        }
    }

    /// Check the ordering float < freeze < dissolve. Never called by the
    /// model itself; a misordered sphere still runs.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.th_float <= 0 || self.th_freeze <= 0 || self.th_dissolve <= 0 {
            return Err(ConfigError {
                msg: format!("thresholds must be positive: {:?}", self),
            });
        }
        if !(self.th_float < self.th_freeze && self.th_freeze < self.th_dissolve) {
            return Err(ConfigError {
                msg: format!(
                    "expected th_float < th_freeze < th_dissolve, got {} / {} / {}",
                    self.th_float, self.th_freeze, self.th_dissolve
                ),
            });
        }
        Ok(())
    }
}

/// One bounded entity under load.
#[derive(Debug, Clone)]
pub struct Sphere {
    name: String,
    pub(crate) signals: Signals,
    pub(crate) state: SphereState,
    thresholds: Thresholds,
}

impl Sphere {
    /// Build a sphere in the `Stable` state. Initial signals are clamped.
    pub fn new(name: impl Into<String>, signals: Signals, thresholds: Thresholds) -> Self {
        Self {
            name: name.into(),
            signals: signals.clamped(),
            state: SphereState::Stable,
            thresholds,
        }
    }

    /// Process one event in place.
    pub fn ingest(&mut self, event: Event) -> IngestOutput {
        ingest(self, event)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn state(&self) -> SphereState {
        self.state
    }

    pub fn signals(&self) -> &Signals {
        &self.signals
    }

    pub fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    pub fn pressure(&self) -> i32 {
        self.signals.pressure
    }

    pub fn contradiction(&self) -> i32 {
        self.signals.contradiction
    }

    pub fn meaning(&self) -> i32 {
        self.signals.meaning
    }

    pub fn resolution(&self) -> i32 {
        self.signals.resolution
    }

    pub fn fatigue(&self) -> i32 {
        self.signals.fatigue
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            name: self.name.clone(),
            state: self.state,
            signals: self.signals,
            thresholds: self.thresholds,
        }
    }
}

/// Point-in-time copy of a sphere, for rendering and comparison.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub name: String,
    pub state: SphereState,
    pub signals: Signals,
    pub thresholds: Thresholds,
}

impl Snapshot {
    /// SHA-256 over the observable fields, hex encoded.
    pub fn digest(&self) -> String {
        let s = &self.signals;
        let t = &self.thresholds;
        let mut hasher = Sha256::new();
        hasher.update(self.name.as_bytes());
        hasher.update([0u8]);
        hasher.update(self.state.as_str().as_bytes());
        for v in [
            s.pressure,
            s.contradiction,
            s.meaning,
            s.resolution,
            s.fatigue,
            t.th_float,
            t.th_freeze,
            t.th_dissolve,
        ] {
            hasher.update(v.to_le_bytes());
        }
        hex::encode(hasher.finalize())
    }
}

impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = &self.signals;
        write!(
            f,
            "Sphere[{}] state={:<8} | pressure={:4} contr={:4} meaning={:4} res={:3} fatigue={:4}",
            self.name, self.state, s.pressure, s.contradiction, s.meaning, s.resolution, s.fatigue
        )
    }
}

/// Sphere setup read from the environment. Defaults reproduce the
/// reference run.
#[derive(Debug, Clone)]
pub struct Config {
    pub name: String,
    pub pressure: i32,
    pub contradiction: i32,
    pub meaning: i32,
    pub resolution: i32,
    pub fatigue: i32,
    pub th_float: i32,
    pub th_freeze: i32,
    pub th_dissolve: i32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            name: "GU_BOUNDARY_CORE".to_string(),
            pressure: 120,
            contradiction: 40,
            meaning: 80,
            resolution: 18,
            fatigue: 50,
            th_float: 900,
            th_freeze: 1400,
            th_dissolve: 2100,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build from a key lookup. Missing or unparseable values keep the default.
    pub fn from_vars(get: impl Fn(&str) -> Option<String>) -> Self {
        let d = Self::default();
        let int = |key: &str, default: i32| {
            get(key).and_then(|v| v.parse().ok()).unwrap_or(default)
        };
        Self {
            name: get("SPHERE_NAME").unwrap_or(d.name),
            pressure: int("PRESSURE", d.pressure),
            contradiction: int("CONTRADICTION", d.contradiction),
            meaning: int("MEANING", d.meaning),
            resolution: int("RESOLUTION", d.resolution),
            fatigue: int("FATIGUE", d.fatigue),
            th_float: int("TH_FLOAT", d.th_float),
            th_freeze: int("TH_FREEZE", d.th_freeze),
            th_dissolve: int("TH_DISSOLVE", d.th_dissolve),
        }
    }

    pub fn signals(&self) -> Signals {
        Signals::new(self.pressure, self.contradiction, self.meaning, self.resolution, self.fatigue)
    }

    pub fn thresholds(&self) -> Thresholds {
        Thresholds::new(self.th_float, self.th_freeze, self.th_dissolve)
    }

    pub fn sphere(&self) -> Sphere {
        Sphere::new(self.name.clone(), self.signals(), self.thresholds())
    }
}
