use std::sync::Arc;

use crate::{
    antenna::Antenna,
    coordinates::look_angles,
    error::Error,
    measurements::{default_missing_value, Measure},
    prelude::Vector3,
};

use log::trace;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[cfg(feature = "serde")]
use crate::measurements::deserialize_missing_value;

/// Elevations are clamped to this minimum [°]
const MIN_ELEVATION_DEG: f64 = 5.0;

/// Upper validity bound of the gaseous absorption model [GHz]
const MAX_FREQUENCY_GHZ: f64 = 54.0;

fn default_p() -> f64 {
    1.0
}

fn default_hs() -> f64 {
    0.031382984
}

fn default_eta() -> f64 {
    0.65
}

fn default_model() -> Arc<dyn AtmosphericModel> {
    Arc::new(GasScintillationModel::default())
}

/// Earth-space [SlantPath] on which atmospheric attenuation applies.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlantPath {
    /// Ground station latitude [°]
    pub latitude_deg: f64,
    /// Ground station longitude [°]
    pub longitude_deg: f64,
    /// Ground station height above sea level [km]
    pub station_height_km: f64,
    /// Path elevation [°]
    pub elevation_deg: f64,
    /// Frequency [GHz]
    pub frequency_ghz: f64,
    /// Receive antenna diameter [m]
    pub diameter_m: f64,
    /// Receive antenna efficiency
    pub efficiency: f64,
    /// Percentage of time the attenuation is exceeded [%]
    pub exceedance: f64,
}

/// Any atmospheric attenuation model should implement [AtmosphericModel].
pub trait AtmosphericModel: std::fmt::Debug + Send + Sync {
    /// Total attenuation [dB] along this path.
    fn loss_db(&self, path: &SlantPath) -> Result<f64, Error>;
}

/// [GasScintillationModel] adds gaseous absorption (oxygen and water vapour,
/// standard atmosphere reduced to the station height) and tropospheric scintillation.
/// Rain and clouds are not modeled.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GasScintillationModel {
    /// Surface water vapour density [g/m³]
    pub water_vapour_density: f64,
    /// Wet term of the surface refractivity
    pub wet_refractivity: f64,
    /// Turbulent layer height [m]
    pub turbulence_height_m: f64,
}

impl Default for GasScintillationModel {
    fn default() -> Self {
        Self {
            water_vapour_density: 7.5,
            wet_refractivity: 42.5,
            turbulence_height_m: 1000.0,
        }
    }
}

impl GasScintillationModel {
    /// Oxygen specific attenuation [dB/km], standard pressure and temperature.
    fn oxygen_specific(f: f64) -> f64 {
        let f2 = f.powi(2);
        (7.2 / (f2 + 0.34) + 0.62 / ((54.0 - f).powf(1.16) + 0.83)) * f2 * 1.0E-3
    }

    /// Water vapour specific attenuation [dB/km], standard temperature.
    fn water_vapour_specific(&self, f: f64) -> f64 {
        let rho = self.water_vapour_density;
        let eta1 = 0.955 + 0.006 * rho;
        let eta2 = 0.735 + 0.0353 * rho;

        let g = |fi: f64| 1.0 + ((f - fi) / (f + fi)).powi(2);

        let lines = 3.98 * eta1 / ((f - 22.235).powi(2) + 9.42 * eta1.powi(2)) * g(22.0)
            + 11.96 * eta1 / ((f - 183.31).powi(2) + 11.14 * eta1.powi(2))
            + 0.081 * eta1 / ((f - 321.226).powi(2) + 6.29 * eta1.powi(2))
            + 3.66 * eta1 / ((f - 325.153).powi(2) + 9.22 * eta1.powi(2))
            + 25.37 * eta1 / (f - 380.0).powi(2)
            + 17.4 * eta1 / (f - 448.0).powi(2)
            + 844.6 * eta1 / (f - 557.0).powi(2) * g(557.0)
            + 290.0 * eta1 / (f - 752.0).powi(2) * g(752.0)
            + 8.3328E4 * eta2 / (f - 1780.0).powi(2) * g(1780.0);

        lines * f.powi(2) * rho * 1.0E-4
    }

    /// Oxygen equivalent height [km]
    fn oxygen_height(f: f64) -> f64 {
        let t1 = 4.64 / 1.066 * (-((f - 59.7) / (2.87 + 12.4 * (-7.9_f64).exp())).powi(2)).exp();
        6.1 / 1.17 * (1.0 + t1)
    }

    /// Water vapour equivalent height [km]
    fn water_vapour_height(f: f64) -> f64 {
        let sigma = 1.013 / (1.0 + (-8.6 * (1.0 - 0.57_f64)).exp());
        1.66 * (1.0
            + 1.39 * sigma / ((f - 22.235).powi(2) + 2.56 * sigma)
            + 3.37 * sigma / ((f - 183.31).powi(2) + 4.69 * sigma)
            + 1.58 * sigma / ((f - 325.1).powi(2) + 2.89 * sigma))
    }

    /// Gaseous attenuation [dB]
    fn gaseous_db(&self, path: &SlantPath) -> f64 {
        let f = path.frequency_ghz.min(MAX_FREQUENCY_GHZ - 0.1);
        let hs = path.station_height_km.max(0.0);

        let ho = Self::oxygen_height(f);
        let hw = Self::water_vapour_height(f);

        let zenith = Self::oxygen_specific(f) * ho * (-hs / ho).exp()
            + self.water_vapour_specific(f) * hw * (-hs / hw).exp();

        zenith / path.elevation_deg.to_radians().sin()
    }

    /// Scintillation fade depth [dB]
    fn scintillation_db(&self, path: &SlantPath) -> f64 {
        let f = path.frequency_ghz;
        let sin_el = path.elevation_deg.to_radians().sin();

        let sigma_ref = 3.6E-3 + 1.0E-4 * self.wet_refractivity;
        let hl = self.turbulence_height_m;
        let path_length = 2.0 * hl / ((sin_el.powi(2) + 2.35E-4).sqrt() + sin_el);

        let d_eff = path.efficiency.sqrt() * path.diameter_m;
        let x = 1.22 * d_eff.powi(2) * f / path_length;

        let g2 = 3.86 * (x.powi(2) + 1.0).powf(11.0 / 12.0) * (11.0 / 6.0 * (1.0 / x).atan()).sin()
            - 7.08 * x.powf(5.0 / 6.0);

        if g2 <= 0.0 || !g2.is_finite() {
            return 0.0;
        }

        let sigma = sigma_ref * f.powf(7.0 / 12.0) * g2.sqrt() / sin_el.powf(1.2);

        let log_p = path.exceedance.log10();
        let a = -0.061 * log_p.powi(3) + 0.072 * log_p.powi(2) - 1.71 * log_p + 3.0;

        a * sigma
    }
}

impl AtmosphericModel for GasScintillationModel {
    fn loss_db(&self, path: &SlantPath) -> Result<f64, Error> {
        if path.frequency_ghz <= 0.0 || path.elevation_deg <= 0.0 || path.exceedance <= 0.0 {
            return Err(Error::Propagation(format!(
                "invalid atmospheric slant path: {:?}",
                path
            )));
        }

        let gas = self.gaseous_db(path);
        let scintillation = self.scintillation_db(path);

        trace!(
            "el={:.3}° f={:.3} GHz - gas={:.6} dB scint={:.6} dB",
            path.elevation_deg,
            path.frequency_ghz,
            gas,
            scintillation
        );

        Ok(gas + scintillation)
    }
}

/// [AtmosphericLoss] is the total atmospheric attenuation [dB] between
/// a ground transmitter and a receiver above it.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AtmosphericLoss {
    /// Percentage of time the attenuation is exceeded [%]
    #[cfg_attr(feature = "serde", serde(default = "default_p"))]
    pub p: f64,
    /// Ground station height above sea level [km]
    #[cfg_attr(feature = "serde", serde(default = "default_hs"))]
    pub hs: f64,
    /// Receive antenna efficiency
    #[cfg_attr(feature = "serde", serde(default = "default_eta"))]
    pub eta: f64,
    #[cfg_attr(
        feature = "serde",
        serde(
            default = "default_missing_value",
            rename = "nan_value",
            deserialize_with = "deserialize_missing_value"
        )
    )]
    pub missing_value: f64,
    #[cfg_attr(feature = "serde", serde(skip, default = "default_model"))]
    model: Arc<dyn AtmosphericModel>,
}

impl Default for AtmosphericLoss {
    fn default() -> Self {
        Self {
            p: default_p(),
            hs: default_hs(),
            eta: default_eta(),
            missing_value: default_missing_value(),
            model: default_model(),
        }
    }
}

impl AtmosphericLoss {
    /// Copies and returns [AtmosphericLoss] evaluated with another [AtmosphericModel].
    pub fn with_model(&self, model: Arc<dyn AtmosphericModel>) -> Self {
        let mut s = self.clone();
        s.model = model;
        s
    }

    pub fn with_missing_value(&self, missing_value: f64) -> Self {
        let mut s = self.clone();
        s.missing_value = missing_value;
        s
    }

    pub fn model(&self) -> &dyn AtmosphericModel {
        self.model.as_ref()
    }

    /// Builds the [SlantPath] from the transmitter (ground) to the receiver.
    pub fn slant_path(
        &self,
        tx_location: &Vector3<f64>,
        rx_location: &Vector3<f64>,
        tx_antenna: &Antenna,
        rx_antenna: &Antenna,
    ) -> SlantPath {
        // elevation is seen from the transmitter at sea level
        let ground = Vector3::new(tx_location[0], tx_location[1], 0.0);
        let angles = look_angles(&ground, rx_location);

        SlantPath {
            latitude_deg: tx_location[0],
            longitude_deg: tx_location[1],
            station_height_km: self.hs,
            elevation_deg: angles.elevation_deg.max(MIN_ELEVATION_DEG),
            frequency_ghz: tx_antenna.frequency_mhz() / 1000.0,
            diameter_m: rx_antenna.diameter(),
            efficiency: self.eta,
            exceedance: self.p,
        }
    }
}

impl Measure for AtmosphericLoss {
    fn kind(&self) -> &str {
        "AtmosphericLoss"
    }

    fn missing_value(&self) -> f64 {
        self.missing_value
    }

    fn evaluate(
        &self,
        tx_location: &Vector3<f64>,
        rx_location: &Vector3<f64>,
        tx_antenna: &Antenna,
        rx_antenna: &Antenna,
    ) -> Result<f64, Error> {
        let path = self.slant_path(tx_location, rx_location, tx_antenna, rx_antenna);
        self.model.loss_db(&path)
    }
}
