use std::f64::consts::PI;

use crate::{
    antenna::Antenna,
    constants::SPEED_OF_LIGHT_M_S,
    coordinates::lla_to_ecef,
    error::Error,
    measurements::{default_missing_value, Measure},
    prelude::Vector3,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[cfg(feature = "serde")]
use crate::measurements::deserialize_missing_value;

/// [FreeSpaceLoss] is the free space path loss [dB] over the straight line
/// between both antennas, at the transmitter frequency.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FreeSpaceLoss {
    #[cfg_attr(
        feature = "serde",
        serde(
            default = "default_missing_value",
            rename = "nan_value",
            deserialize_with = "deserialize_missing_value"
        )
    )]
    pub missing_value: f64,
}

impl Default for FreeSpaceLoss {
    fn default() -> Self {
        Self {
            missing_value: default_missing_value(),
        }
    }
}

impl FreeSpaceLoss {
    /// Free space path loss [dB] at distance [m] and frequency [Hz].
    pub fn fspl_db(distance_m: f64, frequency_hz: f64) -> f64 {
        20.0 * (4.0 * PI * distance_m * frequency_hz / SPEED_OF_LIGHT_M_S).log10()
    }
}

impl Measure for FreeSpaceLoss {
    fn kind(&self) -> &str {
        "FreeSpaceLoss"
    }

    fn missing_value(&self) -> f64 {
        self.missing_value
    }

    fn evaluate(
        &self,
        tx_location: &Vector3<f64>,
        rx_location: &Vector3<f64>,
        tx_antenna: &Antenna,
        _: &Antenna,
    ) -> Result<f64, Error> {
        let distance = (lla_to_ecef(rx_location, true) - lla_to_ecef(tx_location, true)).norm();

        if distance <= 0.0 {
            return Ok(self.missing_value);
        }

        Ok(Self::fspl_db(distance, tx_antenna.frequency_mhz() * 1.0E6))
    }
}
