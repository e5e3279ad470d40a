//! Orbit propagation boundary.
use crate::{
    constants::EARTH_GRAVITATION_MU_KM3_S2,
    error::Error,
    prelude::{Duration, Epoch, Orbit, Vector3},
};

use anise::constants::frames::EARTH_J2000;
use log::debug;
use nalgebra::Rotation3;

/// Julian date of the Unix epoch
const UNIX_EPOCH_JD: f64 = 2440587.5;

/// Julian date of J2000
const J2000_JD: f64 = 2451545.0;

/// Any orbital state provider should implement the [Propagator] trait
/// to drive a propagated location.
pub trait Propagator: Send + Sync + std::fmt::Debug {
    /// Reference [Epoch] of the trajectory (TLE epoch, initial state..).
    fn epoch(&self) -> Epoch;

    /// Inertial position at requested [Epoch], in meters.
    fn position_at(&self, t: Epoch) -> Result<Vector3<f64>, Error>;

    /// Orbital period of this trajectory.
    fn period(&self) -> Result<Duration, Error>;

    /// Earth-fixed position at requested [Epoch], in meters.
    fn earth_fixed_position_at(&self, t: Epoch) -> Result<Vector3<f64>, Error> {
        let inertial = self.position_at(t)?;
        Ok(inertial_to_earth_fixed(&inertial, t))
    }
}

/// Greenwich Mean Sidereal Time (IAU-82), in radians.
/// UT1 is approximated by UTC.
pub fn gmst_rad(t: Epoch) -> f64 {
    let jd = t.to_unix_seconds() / 86400.0 + UNIX_EPOCH_JD;
    let tu = (jd - J2000_JD) / 36525.0;

    let gmst_s = 67310.54841 + (876600.0 * 3600.0 + 8640184.812866) * tu + 0.093104 * tu.powi(2)
        - 6.2E-6 * tu.powi(3);

    (gmst_s.rem_euclid(86400.0) / 240.0).to_radians()
}

/// Rotates an inertial position into the Earth-fixed frame,
/// taking into account Earth rotation only.
pub fn inertial_to_earth_fixed(position: &Vector3<f64>, t: Epoch) -> Vector3<f64> {
    let rot = Rotation3::from_axis_angle(&Vector3::z_axis(), -gmst_rad(t));
    rot * position
}

/// [TlePropagator] propagates two line elements with SGP4.
pub struct TlePropagator {
    elements: sgp4::Elements,
    constants: sgp4::Constants,
    epoch: Epoch,
}

impl std::fmt::Debug for TlePropagator {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("TlePropagator")
            .field("norad_id", &self.elements.norad_id)
            .field("epoch", &self.epoch)
            .finish()
    }
}

impl TlePropagator {
    /// Builds a new [TlePropagator] from the two TLE lines.
    pub fn from_tle(line1: &str, line2: &str) -> Result<Self, Error> {
        let elements = sgp4::Elements::from_tle(None, line1.as_bytes(), line2.as_bytes())
            .map_err(|e| Error::Tle(format!("{:?}", e)))?;

        let constants = sgp4::Constants::from_elements(&elements)
            .map_err(|e| Error::Propagation(format!("{:?}", e)))?;

        let epoch_us = elements.datetime.and_utc().timestamp_micros();
        let epoch = Epoch::from_unix_seconds(epoch_us as f64 * 1.0E-6);

        debug!("{}: tle propagator (norad={})", epoch, elements.norad_id);

        Ok(Self {
            elements,
            constants,
            epoch,
        })
    }
}

impl Propagator for TlePropagator {
    fn epoch(&self) -> Epoch {
        self.epoch
    }

    fn position_at(&self, t: Epoch) -> Result<Vector3<f64>, Error> {
        let minutes = (t - self.epoch).to_seconds() / 60.0;

        let prediction = self
            .constants
            .propagate(minutes)
            .map_err(|e| Error::Propagation(format!("{:?}", e)))?;

        let [x, y, z] = prediction.position;
        Ok(Vector3::new(x, y, z) * 1.0E3)
    }

    fn period(&self) -> Result<Duration, Error> {
        if self.elements.mean_motion <= 0.0 {
            return Err(Error::Tle("non positive mean motion".to_string()));
        }
        Ok(Duration::from_seconds(86400.0 / self.elements.mean_motion))
    }
}

/// [KeplerianPropagator] propagates a two-body Earth orbit.
#[derive(Debug, Clone)]
pub struct KeplerianPropagator {
    orbit: Orbit,
}

impl KeplerianPropagator {
    /// Builds a new [KeplerianPropagator] from classical orbital elements
    /// (angles in degrees) defined at `epoch`.
    pub fn new(
        sma_km: f64,
        ecc: f64,
        inc_deg: f64,
        raan_deg: f64,
        aop_deg: f64,
        ta_deg: f64,
        epoch: Epoch,
    ) -> Result<Self, Error> {
        let mut frame = EARTH_J2000;
        frame.mu_km3_s2 = Some(EARTH_GRAVITATION_MU_KM3_S2);

        let orbit =
            Orbit::try_keplerian(sma_km, ecc, inc_deg, raan_deg, aop_deg, ta_deg, epoch, frame)?;

        Ok(Self { orbit })
    }

    /// Builds a new [KeplerianPropagator] from an [Orbit]al state.
    pub fn from_orbit(orbit: Orbit) -> Self {
        Self { orbit }
    }
}

impl Propagator for KeplerianPropagator {
    fn epoch(&self) -> Epoch {
        self.orbit.epoch
    }

    fn position_at(&self, t: Epoch) -> Result<Vector3<f64>, Error> {
        let state = self.orbit.at_epoch(t)?;
        Ok(state.radius_km * 1.0E3)
    }

    fn period(&self) -> Result<Duration, Error> {
        Ok(self.orbit.period()?)
    }
}
