//! EM solver boundary and its far-field segment implementation.
use std::f64::consts::PI;

use crate::{
    antenna::geometry::WireGeometry,
    cfg::{Config, PatternGrid},
    constants::SPEED_OF_LIGHT_M_S,
    error::Error,
    prelude::Vector3,
};

use log::{debug, trace};
use nalgebra::{Complex, DMatrix};

/// Gain reported in pattern nulls [dB]
pub const GAIN_FLOOR_DB: f64 = -999.99;

/// Two endpoints closer than this are electrically connected [m]
const CONNECTION_TOLERANCE_M: f64 = 1.0E-9;

/// Fed wires closer than this to (anti) parallel share one current axis
const PARALLEL_COS: f64 = 0.9;

/// Converts a frequency [MHz] to a wavelength [m]
pub fn wavelength_m(frequency_mhz: f64) -> f64 {
    SPEED_OF_LIGHT_M_S / (frequency_mhz * 1.0E6)
}

/// Sampled antenna [RadiationPattern]: gain as a function of (theta, phi).
#[derive(Debug, Clone, PartialEq)]
pub struct RadiationPattern {
    /// Theta angles [rad], one per row
    thetas: Vec<f64>,
    /// Phi angles [rad], one per column
    phis: Vec<f64>,
    /// Gain [dB]
    gain_db: DMatrix<f64>,
}

impl RadiationPattern {
    /// Builds a new [RadiationPattern]; `gain_db` must be thetas x phis.
    pub fn new(thetas: Vec<f64>, phis: Vec<f64>, gain_db: DMatrix<f64>) -> Result<Self, Error> {
        if gain_db.nrows() != thetas.len() {
            return Err(Error::ShapeMismatch {
                expected: thetas.len(),
                got: gain_db.nrows(),
            });
        }
        if gain_db.ncols() != phis.len() {
            return Err(Error::ShapeMismatch {
                expected: phis.len(),
                got: gain_db.ncols(),
            });
        }
        Ok(Self {
            thetas,
            phis,
            gain_db,
        })
    }

    pub fn thetas(&self) -> &[f64] {
        &self.thetas
    }

    pub fn phis(&self) -> &[f64] {
        &self.phis
    }

    /// Full gain table [dB], thetas x phis
    pub fn gain_db(&self) -> &DMatrix<f64> {
        &self.gain_db
    }

    /// Gain [dB] at the grid point closest to (theta, phi) [rad]
    pub fn gain_db_at(&self, theta: f64, phi: f64) -> f64 {
        let phi = phi.rem_euclid(2.0 * PI);
        let i = nearest(&self.thetas, theta);
        let j = nearest(&self.phis, phi);
        self.gain_db[(i, j)]
    }

    /// Peak gain [dB]
    pub fn max_gain_db(&self) -> f64 {
        self.gain_db.max()
    }
}

fn nearest(grid: &[f64], value: f64) -> usize {
    grid.iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| {
            (*a - value)
                .abs()
                .partial_cmp(&(*b - value).abs())
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .map(|(i, _)| i)
        .unwrap_or(0)
}

/// A solver context, built for one geometry, that
/// may be evaluated at a given frequency.
pub trait RadiationSource {
    fn radiation_pattern(&self, frequency_mhz: f64) -> Result<RadiationPattern, Error>;
}

/// Any antenna EM solver should implement the [EmSolver] trait.
pub trait EmSolver {
    type Context: RadiationSource;

    /// Builds a [Self::Context] for a completed [WireGeometry].
    fn build(&self, geometry: &WireGeometry) -> Result<Self::Context, Error>;
}

/// [SegmentSolver] sums the far-field of every segment, assuming a standing wave
/// current on the wires connected to the feed point. Parasitic wires carry no current.
/// Separate dipoles sharing the feed are driven in phase quadrature.
#[derive(Debug, Clone, Copy, Default)]
pub struct SegmentSolver {
    pub grid: PatternGrid,
}

impl SegmentSolver {
    pub fn new(grid: PatternGrid) -> Self {
        Self { grid }
    }
}

impl From<&Config> for SegmentSolver {
    /// Solves on the [Config] pattern grid.
    fn from(cfg: &Config) -> Self {
        Self::new(cfg.pattern_grid)
    }
}

#[derive(Debug, Clone)]
struct Segment {
    center: Vector3<f64>,
    length: f64,
    /// Distance from the segment center to the open end of its wire [m]
    open_end_distance: f64,
    /// Current axis, oriented
    axis: Vector3<f64>,
    /// Excitation phase [rad]
    phase: f64,
}

/// [SegmentContext] is the [SegmentSolver] context.
#[derive(Debug, Clone)]
pub struct SegmentContext {
    grid: PatternGrid,
    segments: Vec<Segment>,
}

impl EmSolver for SegmentSolver {
    type Context = SegmentContext;

    fn build(&self, geometry: &WireGeometry) -> Result<SegmentContext, Error> {
        self.grid.validate()?;

        if !geometry.is_complete() {
            return Err(Error::InvalidGeometry("geometry is not complete"));
        }

        let feed = geometry
            .feed_point()
            .ok_or(Error::InvalidGeometry("source segment out of range"))?;

        // current axes of the fed dipoles
        let mut axes = Vec::<Vector3<f64>>::new();
        let mut segments = Vec::new();

        for wire in geometry.wires() {
            let far_end = if (wire.start - feed).norm() < CONNECTION_TOLERANCE_M {
                wire.end
            } else if (wire.end - feed).norm() < CONNECTION_TOLERANCE_M {
                wire.start
            } else {
                continue;
            };

            let outward = (far_end - feed).normalize();

            let (axis, phase) = match axes
                .iter()
                .enumerate()
                .find(|(_, a)| a.dot(&outward).abs() > PARALLEL_COS)
            {
                Some((i, a)) => (*a, i as f64 * PI / 2.0),
                None => {
                    axes.push(outward);
                    (outward, (axes.len() - 1) as f64 * PI / 2.0)
                },
            };

            for i in 0..wire.segments {
                let center = wire.segment_center(i);
                segments.push(Segment {
                    center,
                    length: wire.segment_length(),
                    open_end_distance: (far_end - center).norm(),
                    axis,
                    phase,
                });
            }
        }

        debug!(
            "segment solver: {} wires, {} fed segments, {} current axes",
            geometry.wires().len(),
            segments.len(),
            axes.len()
        );

        Ok(SegmentContext {
            grid: self.grid,
            segments,
        })
    }
}

impl RadiationSource for SegmentContext {
    fn radiation_pattern(&self, frequency_mhz: f64) -> Result<RadiationPattern, Error> {
        if frequency_mhz <= 0.0 || !frequency_mhz.is_finite() {
            return Err(Error::SolverDivergence);
        }

        let k = 2.0 * PI / wavelength_m(frequency_mhz);

        let thetas = self.grid.thetas();
        let phis = self.grid.phis();

        let currents = self
            .segments
            .iter()
            .map(|seg| {
                let amplitude = (k * seg.open_end_distance).sin() * seg.length;
                Complex::from_polar(amplitude, seg.phase)
            })
            .collect::<Vec<_>>();

        // radiation intensity
        let mut intensity = DMatrix::<f64>::zeros(thetas.len(), phis.len());

        for (i, theta) in thetas.iter().enumerate() {
            let (sin_t, cos_t) = theta.sin_cos();
            for (j, phi) in phis.iter().enumerate() {
                let (sin_p, cos_p) = phi.sin_cos();
                let r = Vector3::new(sin_t * cos_p, sin_t * sin_p, cos_t);

                let mut field = [Complex::new(0.0, 0.0); 3];

                for (seg, current) in self.segments.iter().zip(currents.iter()) {
                    let transverse = seg.axis - r * seg.axis.dot(&r);
                    let propagation = Complex::from_polar(1.0, k * r.dot(&seg.center));
                    let c = current * propagation;
                    for (n, e) in field.iter_mut().enumerate() {
                        *e += c * transverse[n];
                    }
                }

                intensity[(i, j)] = field.iter().map(|e| e.norm_sqr()).sum();
            }
        }

        // total radiated power (phi = 360° duplicates phi = 0°)
        let d_theta = self.grid.theta_step_deg.to_radians();
        let d_phi = self.grid.phi_step_deg.to_radians();
        let n_phi = if phis.len() > 1 { phis.len() - 1 } else { 1 };

        let mut power = 0.0;
        for (i, theta) in thetas.iter().enumerate() {
            for j in 0..n_phi {
                power += intensity[(i, j)] * theta.sin() * d_theta * d_phi;
            }
        }

        if !power.is_finite() || power <= 0.0 {
            debug!("segment solver: radiated power {} at {} MHz", power, frequency_mhz);
            return Err(Error::SolverDivergence);
        }

        let gain_db = intensity.map(|u| {
            let directivity = 4.0 * PI * u / power;
            if directivity > 0.0 {
                (10.0 * directivity.log10()).max(GAIN_FLOOR_DB)
            } else {
                GAIN_FLOOR_DB
            }
        });

        trace!("segment solver: peak gain {:.3} dB", gain_db.max());

        RadiationPattern::new(thetas, phis, gain_db)
    }
}
