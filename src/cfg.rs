#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::prelude::{Duration, Epoch, Error};

fn default_interval() -> Duration {
    Duration::from_seconds(60.0)
}

fn default_start() -> Option<Epoch> {
    None
}

fn default_theta_step() -> f64 {
    5.0
}

fn default_phi_step() -> f64 {
    5.0
}

/// Angular sampling of a radiation pattern.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PatternGrid {
    /// Theta (from +Z) step, in degrees. Thetas span [0, 180].
    #[cfg_attr(feature = "serde", serde(default = "default_theta_step"))]
    pub theta_step_deg: f64,
    /// Phi (from +X, in the XY plane) step, in degrees. Phis span [0, 360].
    #[cfg_attr(feature = "serde", serde(default = "default_phi_step"))]
    pub phi_step_deg: f64,
}

impl Default for PatternGrid {
    fn default() -> Self {
        Self {
            theta_step_deg: default_theta_step(),
            phi_step_deg: default_phi_step(),
        }
    }
}

impl PatternGrid {
    /// Verifies both steps are finite and strictly positive.
    pub fn validate(&self) -> Result<(), Error> {
        for step in [self.theta_step_deg, self.phi_step_deg] {
            if !step.is_finite() || step <= 0.0 {
                return Err(Error::InvalidPatternGrid(step));
            }
        }
        Ok(())
    }

    /// Sampled thetas, in radians. Empty when the step is invalid.
    pub fn thetas(&self) -> Vec<f64> {
        Self::samples(180.0, self.theta_step_deg)
    }

    /// Sampled phis, in radians. Empty when the step is invalid.
    pub fn phis(&self) -> Vec<f64> {
        Self::samples(360.0, self.phi_step_deg)
    }

    fn samples(span_deg: f64, step_deg: f64) -> Vec<f64> {
        if !step_deg.is_finite() || step_deg <= 0.0 {
            return Vec::new();
        }
        let n = (span_deg / step_deg).round() as usize;
        (0..=n)
            .map(|i| (i as f64 * step_deg).min(span_deg).to_radians())
            .collect()
    }
}

/// Scenario [Config]uration
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Config {
    /// Time between two measurements
    #[cfg_attr(feature = "serde", serde(default = "default_interval"))]
    pub measurement_interval: Duration,
    /// Simulation start time. Defaults to the suggested start of
    /// the duration policy, or system time.
    #[cfg_attr(feature = "serde", serde(default = "default_start"))]
    pub start: Option<Epoch>,
    /// Radiation pattern sampling of the [SegmentSolver](crate::prelude::SegmentSolver)
    /// built from this configuration.
    #[cfg_attr(feature = "serde", serde(default))]
    pub pattern_grid: PatternGrid,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            measurement_interval: default_interval(),
            start: default_start(),
            pattern_grid: PatternGrid::default(),
        }
    }
}

impl Config {
    /// Returns a new [Config] with given measurement interval.
    pub fn with_interval(&self, interval: Duration) -> Self {
        let mut s = self.clone();
        s.measurement_interval = interval;
        s
    }

    /// Returns a new [Config] with given radiation pattern sampling.
    pub fn with_pattern_grid(&self, grid: PatternGrid) -> Self {
        let mut s = self.clone();
        s.pattern_grid = grid;
        s
    }

    /// Returns a new [Config] starting at `t`.
    pub fn with_start(&self, t: Epoch) -> Self {
        let mut s = self.clone();
        s.start = Some(t);
        s
    }
}
