//! Antenna capabilities, wire geometries and radiation.
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::{
    constants::DEFAULT_FREQUENCY_MHZ,
    error::Error,
    prelude::{Epoch, Vector3},
    simulated::Simulated,
};

use log::debug;
use nalgebra::DMatrix;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

mod geometry;
mod solver;

pub use geometry::{Wire, WireGeometry, DEFAULT_WIRE_RADIUS_M};
pub use solver::{
    wavelength_m, EmSolver, RadiationPattern, RadiationSource, SegmentContext, SegmentSolver,
    GAIN_FLOOR_DB,
};

static ANTENNA_COUNTER: AtomicUsize = AtomicUsize::new(0);

fn default_name() -> String {
    format!("antenna-{}", ANTENNA_COUNTER.fetch_add(1, Ordering::Relaxed))
}

fn default_frequency() -> f64 {
    DEFAULT_FREQUENCY_MHZ
}

fn default_actions() -> Vec<AntennaAction> {
    vec![AntennaAction::Receive]
}

const fn default_n() -> f64 {
    1.0
}

const fn default_segments() -> usize {
    5
}

const fn default_num_sets() -> usize {
    10
}

const fn default_reduction_ratio() -> f64 {
    0.5
}

/// What an antenna is allowed to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "UPPERCASE"))]
pub enum AntennaAction {
    Transmit,
    Receive,
}

impl std::fmt::Display for AntennaAction {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Transmit => write!(f, "TRANSMIT"),
            Self::Receive => write!(f, "RECEIVE"),
        }
    }
}

impl std::str::FromStr for AntennaAction {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim().to_lowercase();
        match trimmed.as_str() {
            "transmit" | "tx" => Ok(Self::Transmit),
            "receive" | "rx" => Ok(Self::Receive),
            _ => Err(Error::UnknownAction(trimmed)),
        }
    }
}

/// Location of the excitation on a turnstile arm.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum FeedPoint {
    /// At the junction of the arms
    #[default]
    Center,
    /// At the tip of the first arm
    Start,
}

/// Wire geometry family of an antenna. Antennas radiate
/// towards +Y when ideal, symmetric and center fed.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "geometry_type"))]
pub enum AntennaKind {
    /// Two arms along Z, `n` half wavelengths long in total.
    Dipole {
        #[cfg_attr(feature = "serde", serde(default = "default_n"))]
        n: f64,
        #[cfg_attr(feature = "serde", serde(default = "default_segments"))]
        segments: usize,
    },
    /// Two crossed dipoles in the XZ plane, each `n` wavelengths long.
    Turnstile {
        #[cfg_attr(feature = "serde", serde(default = "default_n"))]
        n: f64,
        #[cfg_attr(feature = "serde", serde(default))]
        feed: FeedPoint,
        #[cfg_attr(feature = "serde", serde(default = "default_segments"))]
        segments: usize,
    },
    /// Flat Yagi-Uda: element sets along X, elements in the XY plane.
    YagiUda2D {
        #[cfg_attr(feature = "serde", serde(default = "default_num_sets"))]
        num_sets: usize,
        /// Last to first element length ratio
        #[cfg_attr(feature = "serde", serde(default = "default_reduction_ratio"))]
        reduction_ratio: f64,
        #[cfg_attr(feature = "serde", serde(default = "default_segments"))]
        segments: usize,
    },
    /// Crossed Yagi-Uda: elements in both the XY and XZ planes.
    YagiUda3D {
        #[cfg_attr(feature = "serde", serde(default = "default_num_sets"))]
        num_sets: usize,
        #[cfg_attr(feature = "serde", serde(default = "default_reduction_ratio"))]
        reduction_ratio: f64,
        #[cfg_attr(feature = "serde", serde(default = "default_segments"))]
        segments: usize,
    },
}

impl Default for AntennaKind {
    fn default() -> Self {
        Self::dipole()
    }
}

impl AntennaKind {
    pub fn dipole() -> Self {
        Self::Dipole {
            n: default_n(),
            segments: default_segments(),
        }
    }

    pub fn turnstile() -> Self {
        Self::Turnstile {
            n: default_n(),
            feed: FeedPoint::default(),
            segments: default_segments(),
        }
    }

    pub fn yagi_uda_2d() -> Self {
        Self::YagiUda2D {
            num_sets: default_num_sets(),
            reduction_ratio: default_reduction_ratio(),
            segments: default_segments(),
        }
    }

    pub fn yagi_uda_3d() -> Self {
        Self::YagiUda3D {
            num_sets: default_num_sets(),
            reduction_ratio: default_reduction_ratio(),
            segments: default_segments(),
        }
    }

    /// Absolute (1 based) index of the fed segment.
    pub fn source_index(&self) -> usize {
        match self {
            Self::Dipole { segments, .. } => *segments,
            Self::Turnstile { feed, segments, .. } => match feed {
                FeedPoint::Center => *segments,
                FeedPoint::Start => 1,
            },
            Self::YagiUda2D { segments, .. } | Self::YagiUda3D { segments, .. } => *segments,
        }
    }

    /// Effective diameter [m] at given wavelength [m].
    pub fn diameter(&self, wavelength: f64) -> f64 {
        match self {
            Self::Dipole { n, .. } => n * wavelength / 2.0,
            Self::Turnstile { n, .. } => n * wavelength,
            Self::YagiUda2D { .. } | Self::YagiUda3D { .. } => wavelength / 2.0,
        }
    }

    /// Generates the [WireGeometry] at given wavelength [m].
    pub fn geometry(&self, wavelength: f64) -> Result<WireGeometry, Error> {
        let mut geo = WireGeometry::new(self.source_index());
        let origin = Vector3::zeros();

        match *self {
            Self::Dipole { n, segments } => {
                let half = n * wavelength / 4.0;
                geo.create_wire(0, segments, Vector3::new(0.0, 0.0, -half), origin)
                    .create_wire(1, segments, origin, Vector3::new(0.0, 0.0, half));
            },
            Self::Turnstile { n, segments, .. } => {
                let arm = n / 2.0 * wavelength;
                geo.create_wire(0, segments, Vector3::new(0.0, 0.0, arm), origin)
                    .create_wire(1, segments, Vector3::new(-arm, 0.0, 0.0), origin)
                    .create_wire(2, segments, Vector3::new(0.0, 0.0, -arm), origin)
                    .create_wire(3, segments, Vector3::new(arm, 0.0, 0.0), origin);
            },
            Self::YagiUda2D {
                num_sets,
                reduction_ratio,
                segments,
            } => Self::yagi_uda(&mut geo, wavelength, num_sets, reduction_ratio, segments, false)?,
            Self::YagiUda3D {
                num_sets,
                reduction_ratio,
                segments,
            } => Self::yagi_uda(&mut geo, wavelength, num_sets, reduction_ratio, segments, true)?,
        }

        Ok(geo)
    }

    fn yagi_uda(
        geo: &mut WireGeometry,
        wavelength: f64,
        num_sets: usize,
        reduction_ratio: f64,
        segments: usize,
        crossed: bool,
    ) -> Result<(), Error> {
        if num_sets < 2 {
            return Err(Error::InvalidGeometry("yagi-uda requires at least 2 element sets"));
        }

        let pitch = wavelength / 4.0;
        let start_width = wavelength / 4.0;
        let end_width = reduction_ratio * start_width;
        let shrink = (start_width - end_width) / (num_sets - 1) as f64;
        let tags_per_set = if crossed { 5 } else { 3 };

        for set in 0..num_sets {
            let x = set as f64 * pitch;
            let width = start_width - set as f64 * shrink;
            let tag = tags_per_set * set;
            let center = Vector3::new(x, 0.0, 0.0);

            geo.create_wire(tag, segments, Vector3::new(x, -width, 0.0), center)
                .create_wire(tag + 1, segments, Vector3::new(x, width, 0.0), center);

            if crossed {
                geo.create_wire(tag + 2, segments, Vector3::new(x, 0.0, width), center)
                    .create_wire(tag + 3, segments, Vector3::new(x, 0.0, -width), center);
            }

            // boom
            if set < num_sets - 1 {
                geo.create_wire(
                    tag + tags_per_set - 1,
                    segments,
                    center,
                    Vector3::new(x + pitch, 0.0, 0.0),
                );
            }
        }
        Ok(())
    }
}

/// [AntennaDescriptor] fully describes an antenna, prior any resolution.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AntennaDescriptor {
    /// Descriptive name, unique within an asset
    #[cfg_attr(feature = "serde", serde(default = "default_name"))]
    pub name: String,
    /// Operating frequency [MHz]
    #[cfg_attr(feature = "serde", serde(default = "default_frequency"))]
    pub frequency_mhz: f64,
    /// Position relative to the asset body
    #[cfg_attr(feature = "serde", serde(default))]
    pub relative_location: Vector3<f64>,
    /// Allowed actions
    #[cfg_attr(feature = "serde", serde(default = "default_actions"))]
    pub actions: Vec<AntennaAction>,
    /// Wire geometry
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub kind: AntennaKind,
}

impl Default for AntennaDescriptor {
    fn default() -> Self {
        Self::new(AntennaKind::default())
    }
}

impl AntennaDescriptor {
    /// Builds a new receive only [AntennaDescriptor], with a generated name.
    pub fn new(kind: AntennaKind) -> Self {
        Self {
            kind,
            name: default_name(),
            frequency_mhz: default_frequency(),
            relative_location: Vector3::zeros(),
            actions: default_actions(),
        }
    }

    pub fn with_name(&self, name: &str) -> Self {
        let mut s = self.clone();
        s.name = name.to_string();
        s
    }

    pub fn with_frequency_mhz(&self, frequency_mhz: f64) -> Self {
        let mut s = self.clone();
        s.frequency_mhz = frequency_mhz;
        s
    }

    pub fn with_relative_location(&self, relative_location: Vector3<f64>) -> Self {
        let mut s = self.clone();
        s.relative_location = relative_location;
        s
    }

    /// Replaces the allowed actions (duplicates are ignored).
    pub fn with_actions(&self, actions: &[AntennaAction]) -> Self {
        let mut s = self.clone();
        s.actions.clear();
        for action in actions {
            if !s.actions.contains(action) {
                s.actions.push(*action);
            }
        }
        s
    }

    pub fn can(&self, action: AntennaAction) -> bool {
        self.actions.contains(&action)
    }

    /// Wavelength [m]
    pub fn wavelength_m(&self) -> f64 {
        wavelength_m(self.frequency_mhz)
    }

    /// Resolves this [AntennaDescriptor] into an [Antenna]:
    /// generates and completes the geometry, then solves it once.
    pub fn resolve<S: EmSolver>(&self, solver: &S) -> Result<Antenna, Error> {
        let wavelength = self.wavelength_m();

        let mut geometry = self.kind.geometry(wavelength)?;
        geometry.complete()?;

        let context = solver.build(&geometry)?;
        let pattern = context.radiation_pattern(self.frequency_mhz)?;

        debug!(
            "antenna \"{}\": {:?} @ {} MHz - peak gain {:.3} dB",
            self.name,
            self.kind,
            self.frequency_mhz,
            pattern.max_gain_db()
        );

        Ok(Antenna {
            diameter: self.kind.diameter(wavelength),
            source_index: geometry.source_index(),
            descriptor: self.clone(),
            pattern,
        })
    }
}

/// [Antenna] resolved from an [AntennaDescriptor].
/// Gain and diameter are solved once and for all, at the descriptor frequency.
#[derive(Debug, Clone, PartialEq)]
pub struct Antenna {
    descriptor: AntennaDescriptor,
    pattern: RadiationPattern,
    diameter: f64,
    source_index: usize,
}

impl Antenna {
    pub fn descriptor(&self) -> &AntennaDescriptor {
        &self.descriptor
    }

    pub fn name(&self) -> &str {
        &self.descriptor.name
    }

    /// Operating frequency [MHz]
    pub fn frequency_mhz(&self) -> f64 {
        self.descriptor.frequency_mhz
    }

    pub fn wavelength_m(&self) -> f64 {
        self.descriptor.wavelength_m()
    }

    pub fn relative_location(&self) -> Vector3<f64> {
        self.descriptor.relative_location
    }

    pub fn actions(&self) -> &[AntennaAction] {
        &self.descriptor.actions
    }

    pub fn can(&self, action: AntennaAction) -> bool {
        self.descriptor.can(action)
    }

    pub fn kind(&self) -> AntennaKind {
        self.descriptor.kind
    }

    /// Absolute (1 based) index of the fed segment
    pub fn source_index(&self) -> usize {
        self.source_index
    }

    /// Effective diameter [m]
    pub fn diameter(&self) -> f64 {
        self.diameter
    }

    pub fn pattern(&self) -> &RadiationPattern {
        &self.pattern
    }

    /// Full gain table [dB]
    pub fn gain_db(&self) -> &DMatrix<f64> {
        self.pattern.gain_db()
    }

    /// Full gain table, linear
    pub fn gain_pw(&self) -> DMatrix<f64> {
        self.pattern.gain_db().map(|g| 10.0_f64.powf(g / 10.0))
    }

    /// Gain [dB] towards (theta, phi) [rad]
    pub fn gain_db_at(&self, theta: f64, phi: f64) -> f64 {
        self.pattern.gain_db_at(theta, phi)
    }

    /// Linear gain towards (theta, phi) [rad]
    pub fn gain_pw_at(&self, theta: f64, phi: f64) -> f64 {
        10.0_f64.powf(self.gain_db_at(theta, phi) / 10.0)
    }

    pub fn max_gain_db(&self) -> f64 {
        self.pattern.max_gain_db()
    }

    /// Pattern theta angles [rad]
    pub fn thetas(&self) -> &[f64] {
        self.pattern.thetas()
    }

    /// Pattern phi angles [rad]
    pub fn phis(&self) -> &[f64] {
        self.pattern.phis()
    }
}

impl Simulated for Antenna {
    /// Antennas are static: the pattern is never re-solved.
    fn simulate_to(&mut self, _: Epoch) -> Result<(), Error> {
        Ok(())
    }
}
