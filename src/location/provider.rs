use std::sync::Arc;

use crate::{
    constants::ALTITUDE_REFERENCE_M,
    coordinates::{ecef_to_lla, CoordinateSystem},
    error::Error,
    orbit::Propagator,
    prelude::{Epoch, Vector3},
    simulated::Simulated,
};

use log::{trace, warn};

/// [ArrayProvider] replays a pre-computed, time ordered table of positions.
///
/// Each row of `locations` is associated to the row of `timestamps` with the same index.
/// Advancing the provider moves to the next row, whatever the requested time:
/// the table is expected to be sampled at the scenario measurement interval.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayProvider {
    timestamps: Vec<Epoch>,
    locations: Vec<Vector3<f64>>,
    cursor: usize,
}

impl ArrayProvider {
    /// Builds a new [ArrayProvider]. Both tables must have the same number of rows
    /// and timestamps must be in ascending order.
    pub fn new(timestamps: Vec<Epoch>, locations: Vec<Vector3<f64>>) -> Result<Self, Error> {
        if timestamps.len() != locations.len() {
            return Err(Error::ShapeMismatch {
                expected: timestamps.len(),
                got: locations.len(),
            });
        }

        if locations.is_empty() {
            return Err(Error::EmptyLocationTable);
        }

        if timestamps.windows(2).any(|w| w[1] < w[0]) {
            return Err(Error::UnsortedTimestamps);
        }

        Ok(Self {
            timestamps,
            locations,
            cursor: 0,
        })
    }

    /// Builds a new [ArrayProvider] from flat rows of 3 components.
    /// A single row of 3 components is accepted as a one row table.
    pub fn from_rows(timestamps: Vec<Epoch>, rows: &[Vec<f64>]) -> Result<Self, Error> {
        let locations = rows
            .iter()
            .map(|row| match row.len() {
                3 => Ok(Vector3::new(row[0], row[1], row[2])),
                n => Err(Error::InvalidCoordinates(n)),
            })
            .collect::<Result<Vec<_>, _>>()?;

        Self::new(timestamps, locations)
    }

    pub fn current_location(&self) -> Vector3<f64> {
        self.locations[self.cursor]
    }

    pub fn current_date(&self) -> Epoch {
        self.timestamps[self.cursor]
    }

    /// Current row index
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }
}

impl Simulated for ArrayProvider {
    /// Steps to the next row. `t` is not used to seek.
    fn simulate_to(&mut self, t: Epoch) -> Result<(), Error> {
        if self.cursor + 1 < self.locations.len() {
            self.cursor += 1;
            trace!("{}: array provider row #{}", t, self.cursor);
        } else {
            warn!(
                "{}: array provider exhausted, holding last row #{}",
                t, self.cursor
            );
        }
        Ok(())
    }
}

/// [PropagatedProvider] seeks an external [Propagator] to any requested time.
#[derive(Debug, Clone)]
pub struct PropagatedProvider {
    propagator: Arc<dyn Propagator>,
    coordinate_system: CoordinateSystem,
    current_date: Epoch,
    current_location: Vector3<f64>,
}

impl PropagatedProvider {
    /// Builds a new [PropagatedProvider], initialized at the [Propagator] epoch.
    pub fn new(
        propagator: Arc<dyn Propagator>,
        coordinate_system: CoordinateSystem,
    ) -> Result<Self, Error> {
        let t = propagator.epoch();
        let mut s = Self {
            propagator,
            coordinate_system,
            current_date: t,
            current_location: Vector3::zeros(),
        };
        s.seek(t)?;
        Ok(s)
    }

    fn seek(&mut self, t: Epoch) -> Result<(), Error> {
        let ecef = self.propagator.earth_fixed_position_at(t)?;

        self.current_location = match self.coordinate_system {
            CoordinateSystem::Cartesian => ecef,
            CoordinateSystem::Geodetic => {
                let lla = ecef_to_lla(&ecef, true);
                Vector3::new(lla[0], lla[1], lla[2] + ALTITUDE_REFERENCE_M)
            },
        };

        self.current_date = t;
        Ok(())
    }

    pub fn current_location(&self) -> Vector3<f64> {
        self.current_location
    }

    pub fn current_date(&self) -> Epoch {
        self.current_date
    }

    pub fn coordinate_system(&self) -> CoordinateSystem {
        self.coordinate_system
    }
}

impl Simulated for PropagatedProvider {
    fn simulate_to(&mut self, t: Epoch) -> Result<(), Error> {
        self.seek(t)?;
        trace!("{}: propagated to {:?}", t, self.current_location);
        Ok(())
    }
}

/// [LocationProvider] feeds a dynamic location.
#[derive(Debug, Clone)]
pub enum LocationProvider {
    /// Steps through a pre-computed table
    Array(ArrayProvider),
    /// Seeks a propagated trajectory
    Propagated(PropagatedProvider),
}

impl LocationProvider {
    pub fn current_location(&self) -> Vector3<f64> {
        match self {
            Self::Array(p) => p.current_location(),
            Self::Propagated(p) => p.current_location(),
        }
    }

    pub fn current_date(&self) -> Epoch {
        match self {
            Self::Array(p) => p.current_date(),
            Self::Propagated(p) => p.current_date(),
        }
    }

    /// True when this provider may seek to arbitrary times.
    pub fn can_seek(&self) -> bool {
        matches!(self, Self::Propagated(_))
    }
}

impl Simulated for LocationProvider {
    fn simulate_to(&mut self, t: Epoch) -> Result<(), Error> {
        match self {
            Self::Array(p) => p.simulate_to(t),
            Self::Propagated(p) => p.simulate_to(t),
        }
    }
}

impl From<ArrayProvider> for LocationProvider {
    fn from(p: ArrayProvider) -> Self {
        Self::Array(p)
    }
}

impl From<PropagatedProvider> for LocationProvider {
    fn from(p: PropagatedProvider) -> Self {
        Self::Propagated(p)
    }
}
