use anise::constants::SPEED_OF_LIGHT_KM_S;

/// WGS84 Earth Frame Ellipsoid semi-major axis (equatorial radius), in meters
pub const EARTH_SEMI_MAJOR_AXIS_WGS84: f64 = 6378137.0_f64;

/// WGS84 Earth flattening
pub const EARTH_FLATTENING_WGS84: f64 = 1.0 / 298.257223563;

/// WGS84 Earth polar radius, in meters
pub const EARTH_SEMI_MINOR_AXIS_WGS84: f64 =
    EARTH_SEMI_MAJOR_AXIS_WGS84 * (1.0 - EARTH_FLATTENING_WGS84);

/// WGS84 first eccentricity, squared
pub const EARTH_ECCENTRICITY_SQUARED_WGS84: f64 =
    EARTH_FLATTENING_WGS84 * (2.0 - EARTH_FLATTENING_WGS84);

/// Earth gravitational constant (km^3 s-2)
pub const EARTH_GRAVITATION_MU_KM3_S2: f64 = 398600.435436;

/// Geodetic altitude reference: geodetic points declared without altitude,
/// and propagated geodetic states, are expressed relative to this radius.
pub const ALTITUDE_REFERENCE_M: f64 = EARTH_SEMI_MAJOR_AXIS_WGS84;

/// Speed of light in m.s⁻¹
pub const SPEED_OF_LIGHT_M_S: f64 = SPEED_OF_LIGHT_KM_S * 1000.0;

/// Default antenna operating frequency, in MHz
pub const DEFAULT_FREQUENCY_MHZ: f64 = 400.0;
