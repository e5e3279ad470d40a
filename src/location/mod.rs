//! Fixed and dynamic locations.
use crate::{
    constants::ALTITUDE_REFERENCE_M,
    coordinates::CoordinateSystem,
    error::Error,
    prelude::{Epoch, Vector3},
    simulated::Simulated,
};

mod provider;
pub use provider::{ArrayProvider, LocationProvider, PropagatedProvider};

/// [FixedLocation] never moves.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedLocation {
    coordinates: Vector3<f64>,
    coordinate_system: CoordinateSystem,
}

impl FixedLocation {
    /// Builds a new geodetic [FixedLocation] from latitude [°], longitude [°] and
    /// optional altitude [m]. When omitted, altitude defaults to the equatorial radius.
    pub fn geodetic(coordinates: &[f64]) -> Result<Self, Error> {
        let coordinates = match coordinates.len() {
            2 => Vector3::new(coordinates[0], coordinates[1], ALTITUDE_REFERENCE_M),
            3 => Vector3::new(coordinates[0], coordinates[1], coordinates[2]),
            n => return Err(Error::InvalidCoordinates(n)),
        };

        Ok(Self {
            coordinates,
            coordinate_system: CoordinateSystem::Geodetic,
        })
    }

    /// Builds a new Cartesian [FixedLocation] from X, Y, Z [m].
    pub fn cartesian(coordinates: &[f64]) -> Result<Self, Error> {
        match coordinates.len() {
            3 => Ok(Self {
                coordinates: Vector3::new(coordinates[0], coordinates[1], coordinates[2]),
                coordinate_system: CoordinateSystem::Cartesian,
            }),
            n => Err(Error::InvalidCoordinates(n)),
        }
    }

    pub fn coordinates(&self) -> Vector3<f64> {
        self.coordinates
    }

    pub fn coordinate_system(&self) -> CoordinateSystem {
        self.coordinate_system
    }
}

/// [DynamicLocation] follows a [LocationProvider], expressed
/// in the [CoordinateSystem] declared at construction.
#[derive(Debug, Clone)]
pub struct DynamicLocation {
    coordinate_system: CoordinateSystem,
    provider: LocationProvider,
}

impl DynamicLocation {
    pub fn new(coordinate_system: CoordinateSystem, provider: LocationProvider) -> Self {
        Self {
            coordinate_system,
            provider,
        }
    }

    pub fn provider(&self) -> &LocationProvider {
        &self.provider
    }

    pub fn coordinate_system(&self) -> CoordinateSystem {
        self.coordinate_system
    }
}

/// [Location] of an asset.
#[derive(Debug, Clone)]
pub enum Location {
    Fixed(FixedLocation),
    Dynamic(DynamicLocation),
}

impl Location {
    /// Current position, in this location [CoordinateSystem].
    pub fn current_location(&self) -> Vector3<f64> {
        match self {
            Self::Fixed(fixed) => fixed.coordinates,
            Self::Dynamic(dynamic) => dynamic.provider.current_location(),
        }
    }

    /// Alias of [Self::current_location].
    pub fn coordinates(&self) -> Vector3<f64> {
        self.current_location()
    }

    pub fn coordinate_system(&self) -> CoordinateSystem {
        match self {
            Self::Fixed(fixed) => fixed.coordinate_system,
            Self::Dynamic(dynamic) => dynamic.coordinate_system,
        }
    }

    /// Date of the current position, when known.
    pub fn current_date(&self) -> Option<Epoch> {
        match self {
            Self::Fixed(_) => None,
            Self::Dynamic(dynamic) => Some(dynamic.provider.current_date()),
        }
    }

    /// Component names of [Self::coordinate_system]
    pub fn names(&self) -> [&'static str; 3] {
        self.coordinate_system().names()
    }
}

impl Simulated for Location {
    fn simulate_to(&mut self, t: Epoch) -> Result<(), Error> {
        match self {
            Self::Fixed(_) => Ok(()),
            Self::Dynamic(dynamic) => dynamic.provider.simulate_to(t),
        }
    }
}

impl From<FixedLocation> for Location {
    fn from(fixed: FixedLocation) -> Self {
        Self::Fixed(fixed)
    }
}

impl From<DynamicLocation> for Location {
    fn from(dynamic: DynamicLocation) -> Self {
        Self::Dynamic(dynamic)
    }
}
