//! Geodetic (LLA) and Earth-centered Cartesian coordinates on the WGS84 ellipsoid.
use crate::{
    constants::{
        EARTH_ECCENTRICITY_SQUARED_WGS84, EARTH_SEMI_MAJOR_AXIS_WGS84,
        EARTH_SEMI_MINOR_AXIS_WGS84,
    },
    error::Error,
};

use log::warn;
use nalgebra::{MatrixXx3, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Height convergence criterion of the inverse transform, in meters
const HEIGHT_CONVERGENCE_M: f64 = 2.0E-5;

/// Iteration bound of the inverse transform
const MAX_ITERATIONS: usize = 64;

/// [CoordinateSystem] in which a position is expressed.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum CoordinateSystem {
    /// Latitude [°], longitude [°], altitude [m]
    #[default]
    #[cfg_attr(feature = "serde", serde(alias = "LLA", alias = "lla"))]
    Geodetic,
    /// Earth-centered X, Y, Z [m]
    #[cfg_attr(feature = "serde", serde(alias = "ECI", alias = "eci"))]
    Cartesian,
}

impl CoordinateSystem {
    /// Component names, in order.
    pub fn names(&self) -> [&'static str; 3] {
        match self {
            Self::Geodetic => ["latitude", "longitude", "altitude"],
            Self::Cartesian => ["x", "y", "z"],
        }
    }
}

impl std::fmt::Display for CoordinateSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Geodetic => write!(f, "LLA"),
            Self::Cartesian => write!(f, "ECI"),
        }
    }
}

impl std::str::FromStr for CoordinateSystem {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let c = s.trim().to_lowercase();
        match c.as_str() {
            "lla" | "geodetic" | "gcs" => Ok(Self::Geodetic),
            "eci" | "ecef" | "cartesian" => Ok(Self::Cartesian),
            _ => Err(Error::UnknownCoordinateSystem(s.to_string())),
        }
    }
}

/// Converts geodetic coordinates to Cartesian coordinates.
/// - lla: latitude, longitude (radians, or degrees when `in_degrees`), altitude [m]
/// - returns: X, Y, Z [m]
pub fn lla_to_ecef(lla: &Vector3<f64>, in_degrees: bool) -> Vector3<f64> {
    let (lat, lon) = if in_degrees {
        (lla[0].to_radians(), lla[1].to_radians())
    } else {
        (lla[0], lla[1])
    };

    let alt = lla[2];

    let (sin_lat, cos_lat) = lat.sin_cos();
    let (sin_lon, cos_lon) = lon.sin_cos();

    // prime vertical radius of curvature
    let n = EARTH_SEMI_MAJOR_AXIS_WGS84
        / (1.0 - EARTH_ECCENTRICITY_SQUARED_WGS84 * sin_lat.powi(2)).sqrt();

    Vector3::new(
        (n + alt) * cos_lat * cos_lon,
        (n + alt) * cos_lat * sin_lon,
        (n * (1.0 - EARTH_ECCENTRICITY_SQUARED_WGS84) + alt) * sin_lat,
    )
}

/// Converts Cartesian coordinates to geodetic coordinates,
/// iterating on latitude and height until the height estimate is stable.
/// - ecef: X, Y, Z [m]
/// - returns: latitude, longitude (radians, or degrees when `in_degrees`), altitude [m]
pub fn ecef_to_lla(ecef: &Vector3<f64>, in_degrees: bool) -> Vector3<f64> {
    let (x, y, z) = (ecef[0], ecef[1], ecef[2]);

    let a = EARTH_SEMI_MAJOR_AXIS_WGS84;
    let b = EARTH_SEMI_MINOR_AXIS_WGS84;
    let e2 = EARTH_ECCENTRICITY_SQUARED_WGS84;

    let lon = y.atan2(x);
    let p = (x.powi(2) + y.powi(2)).sqrt();

    let radius_of_curvature = |lat: f64| {
        let (sn, cs) = lat.sin_cos();
        a.powi(2) / ((a * cs).powi(2) + (b * sn).powi(2)).sqrt()
    };

    let mut lat = z.atan2(p * (1.0 - e2));
    let mut n = radius_of_curvature(lat);
    let mut h = p / lat.cos() - n;
    let mut h_old = f64::INFINITY;
    let mut iter = 0;

    while (h - h_old).abs() > HEIGHT_CONVERGENCE_M {
        if iter == MAX_ITERATIONS {
            warn!(
                "ecef_to_lla: no convergence after {} iterations (dh={:.3E})",
                MAX_ITERATIONS,
                (h - h_old).abs()
            );
            break;
        }

        h_old = h;
        lat = z.atan2(p * (1.0 - e2 * n / (n + h)));
        n = radius_of_curvature(lat);
        h = p / lat.cos() - n;
        iter += 1;
    }

    if in_degrees {
        Vector3::new(lat.to_degrees(), lon.to_degrees(), h)
    } else {
        Vector3::new(lat, lon, h)
    }
}

/// Batched [lla_to_ecef]: one output row per input row.
pub fn lla_to_ecef_batch(lla: &MatrixXx3<f64>, in_degrees: bool) -> MatrixXx3<f64> {
    map_rows(lla, |row| lla_to_ecef(&row, in_degrees))
}

/// Batched [ecef_to_lla]: one output row per input row.
pub fn ecef_to_lla_batch(ecef: &MatrixXx3<f64>, in_degrees: bool) -> MatrixXx3<f64> {
    map_rows(ecef, |row| ecef_to_lla(&row, in_degrees))
}

fn map_rows<F: Fn(Vector3<f64>) -> Vector3<f64>>(input: &MatrixXx3<f64>, f: F) -> MatrixXx3<f64> {
    let mut output = MatrixXx3::<f64>::zeros(input.nrows());
    for (i, row) in input.row_iter().enumerate() {
        let converted = f(row.transpose());
        output.set_row(i, &converted.transpose());
    }
    output
}

/// Converts `position` from one [CoordinateSystem] to another.
/// Geodetic coordinates are always expressed in degrees.
pub fn convert(position: &Vector3<f64>, from: CoordinateSystem, to: CoordinateSystem) -> Vector3<f64> {
    match (from, to) {
        (CoordinateSystem::Geodetic, CoordinateSystem::Cartesian) => lla_to_ecef(position, true),
        (CoordinateSystem::Cartesian, CoordinateSystem::Geodetic) => ecef_to_lla(position, true),
        _ => *position,
    }
}

/// Look angles of a target, as seen from an observer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LookAngles {
    /// Elevation above the observer local horizon [°]
    pub elevation_deg: f64,
    /// Azimuth from North, clockwise, in [0, 360[ [°]
    pub azimuth_deg: f64,
    /// Straight line distance [m]
    pub range_m: f64,
}

/// Computes the [LookAngles] of `target_lla` as seen from `observer_lla`,
/// in the observer local East North Up frame. Both in degrees / meters.
pub fn look_angles(observer_lla: &Vector3<f64>, target_lla: &Vector3<f64>) -> LookAngles {
    let observer = lla_to_ecef(observer_lla, true);
    let target = lla_to_ecef(target_lla, true);
    let d = target - observer;

    let (sin_lat, cos_lat) = observer_lla[0].to_radians().sin_cos();
    let (sin_lon, cos_lon) = observer_lla[1].to_radians().sin_cos();

    let east = -sin_lon * d[0] + cos_lon * d[1];
    let north = -sin_lat * cos_lon * d[0] - sin_lat * sin_lon * d[1] + cos_lat * d[2];
    let up = cos_lat * cos_lon * d[0] + cos_lat * sin_lon * d[1] + sin_lat * d[2];

    let elevation_deg = up.atan2((east.powi(2) + north.powi(2)).sqrt()).to_degrees();

    let mut azimuth_deg = east.atan2(north).to_degrees();
    if azimuth_deg < 0.0 {
        azimuth_deg += 360.0;
    }

    LookAngles {
        elevation_deg,
        azimuth_deg,
        range_m: d.norm(),
    }
}

/// Builds a single row batch from one position.
pub(crate) fn single_row(position: &Vector3<f64>) -> MatrixXx3<f64> {
    MatrixXx3::from_rows(&[position.transpose()])
}
