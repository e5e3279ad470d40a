use crate::{
    antenna::{Antenna, AntennaDescriptor, EmSolver},
    coordinates::{convert, CoordinateSystem},
    error::Error,
    location::Location,
    prelude::{Epoch, Vector3},
    simulated::Simulated,
};

use log::trace;

/// [Asset] is any platform carrying antennas: a spacecraft,
/// a ground station or a vehicle.
#[derive(Debug, Clone)]
pub struct Asset {
    /// Unique name within a scenario
    name: String,
    location: Location,
    antennas: Vec<Antenna>,
    /// Last simulated [Epoch]
    last_t: Option<Epoch>,
}

impl Asset {
    /// Builds a new [Asset].
    pub fn new(name: &str, location: Location, antennas: Vec<Antenna>) -> Self {
        Self {
            name: name.to_string(),
            location,
            antennas,
            last_t: None,
        }
    }

    /// Builds a new [Asset], resolving each [AntennaDescriptor] with the [EmSolver].
    pub fn from_descriptors<S: EmSolver>(
        name: &str,
        location: Location,
        descriptors: &[AntennaDescriptor],
        solver: &S,
    ) -> Result<Self, Error> {
        let antennas = descriptors
            .iter()
            .map(|descriptor| descriptor.resolve(solver))
            .collect::<Result<Vec<_>, Error>>()?;

        Ok(Self::new(name, location, antennas))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn antennas(&self) -> &[Antenna] {
        &self.antennas
    }

    /// Last simulated [Epoch], if any.
    pub fn last_t(&self) -> Option<Epoch> {
        self.last_t
    }

    pub fn add_antenna(&mut self, antenna: Antenna) {
        self.antennas.push(antenna);
    }

    /// Copies and returns [Asset] with one more [Antenna].
    pub fn with_antenna(&self, antenna: Antenna) -> Self {
        let mut s = self.clone();
        s.add_antenna(antenna);
        s
    }

    /// Current position, expressed in `frame`.
    pub fn current_location(&self, frame: CoordinateSystem) -> Vector3<f64> {
        convert(
            &self.location.current_location(),
            self.location.coordinate_system(),
            frame,
        )
    }

    /// Position of the named [Antenna], expressed in `frame`. The antenna offset
    /// is added to the asset position as is, whatever the frame.
    pub fn get_antenna_location(
        &self,
        name: &str,
        frame: CoordinateSystem,
    ) -> Result<Vector3<f64>, Error> {
        let antenna = self.get_antenna(name)?;
        Ok(self.current_location(frame) + antenna.relative_location())
    }

    /// Returns the first [Antenna] with this name.
    pub fn get_antenna(&self, name: &str) -> Result<&Antenna, Error> {
        self.antennas
            .iter()
            .find(|ant| ant.name() == name)
            .ok_or_else(|| Error::AntennaNotFound {
                asset: self.name.clone(),
                antenna: name.to_string(),
            })
    }
}

impl Simulated for Asset {
    /// Advances the location, then every antenna.
    /// Has no effect unless `t` is past the last simulated [Epoch].
    fn simulate_to(&mut self, t: Epoch) -> Result<(), Error> {
        if let Some(last_t) = self.last_t {
            if t <= last_t {
                trace!("{}: \"{}\" already simulated", t, self.name);
                return Ok(());
            }
        }

        self.location.simulate_to(t)?;

        for antenna in self.antennas.iter_mut() {
            antenna.simulate_to(t)?;
        }

        self.last_t = Some(t);
        Ok(())
    }
}
