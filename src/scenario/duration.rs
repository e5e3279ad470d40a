use crate::{
    error::Error,
    orbit::{Propagator, TlePropagator},
    prelude::{Duration, Epoch},
};

use log::debug;

/// [DurationPolicy] defines how long a scenario lasts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DurationPolicy {
    /// Fixed duration
    Seconds(Duration),
    /// A number of orbital periods of a spacecraft,
    /// starting at the propagator reference epoch.
    Orbits {
        period: Duration,
        epoch: Epoch,
        n_orbits: f64,
    },
}

impl DurationPolicy {
    pub fn seconds(seconds: f64) -> Self {
        Self::Seconds(Duration::from_seconds(seconds))
    }

    /// Builds [DurationPolicy::Orbits], querying the [Propagator] period once.
    pub fn orbits(propagator: &dyn Propagator, n_orbits: f64) -> Result<Self, Error> {
        let period = propagator.period()?;
        let epoch = propagator.epoch();

        debug!(
            "{}: orbital period {} - {} orbits",
            epoch, period, n_orbits
        );

        Ok(Self::Orbits {
            period,
            epoch,
            n_orbits,
        })
    }

    /// Builds [DurationPolicy::Orbits] from a two line element set.
    pub fn from_tle(line1: &str, line2: &str, n_orbits: f64) -> Result<Self, Error> {
        let propagator = TlePropagator::from_tle(line1, line2)?;
        Self::orbits(&propagator, n_orbits)
    }

    /// Total scenario [Duration].
    pub fn duration(&self) -> Duration {
        match self {
            Self::Seconds(duration) => *duration,
            Self::Orbits {
                period, n_orbits, ..
            } => *period * *n_orbits,
        }
    }

    /// Start [Epoch] this policy relates to, if any.
    pub fn suggested_start(&self) -> Option<Epoch> {
        match self {
            Self::Seconds(_) => None,
            Self::Orbits { epoch, .. } => Some(*epoch),
        }
    }
}

impl From<Duration> for DurationPolicy {
    fn from(duration: Duration) -> Self {
        Self::Seconds(duration)
    }
}
