//! Link measurements, evaluated for every antenna pair and simulated time.
use std::sync::Arc;

use crate::{antenna::Antenna, error::Error, prelude::Vector3};

use nalgebra::{DVector, MatrixXx3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

mod atmospheric;
mod free_space;

pub use atmospheric::{AtmosphericLoss, AtmosphericModel, GasScintillationModel, SlantPath};
pub use free_space::FreeSpaceLoss;

pub(crate) fn default_missing_value() -> f64 {
    f64::NAN
}

/// Missing values are either numbers, null or the "nan" string.
#[cfg(feature = "serde")]
pub(crate) fn deserialize_missing_value<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Value {
        Number(f64),
        Text(String),
    }

    match Option::<Value>::deserialize(deserializer)? {
        None => Ok(f64::NAN),
        Some(Value::Number(value)) => Ok(value),
        Some(Value::Text(s)) if s.trim().eq_ignore_ascii_case("nan") => Ok(f64::NAN),
        Some(Value::Text(s)) => Err(serde::de::Error::custom(format!(
            "invalid missing value \"{}\"",
            s
        ))),
    }
}

/// Any link measurement should implement the [Measure] trait.
///
/// Locations are geodetic (latitude [°], longitude [°], altitude [m]) tables,
/// one row per sample. Implementors only need to provide [Measure::evaluate]:
/// the default [Measure::process] validates the inputs and never evaluates
/// samples without line of sight, that are set to [Measure::missing_value].
pub trait Measure: std::fmt::Debug + Send + Sync {
    /// Short name, used as result column suffix
    fn kind(&self) -> &str;

    /// Value reported when the measurement does not apply
    fn missing_value(&self) -> f64;

    /// Evaluates a single sample, line of sight being granted.
    fn evaluate(
        &self,
        tx_location: &Vector3<f64>,
        rx_location: &Vector3<f64>,
        tx_antenna: &Antenna,
        rx_antenna: &Antenna,
    ) -> Result<f64, Error>;

    /// Evaluates every sample.
    fn process(
        &self,
        tx_location: &MatrixXx3<f64>,
        rx_location: &MatrixXx3<f64>,
        tx_antenna: &Antenna,
        rx_antenna: &Antenna,
        line_of_sight: &[bool],
    ) -> Result<DVector<f64>, Error> {
        let nrows = tx_location.nrows();

        if rx_location.nrows() != nrows {
            return Err(Error::ShapeMismatch {
                expected: nrows,
                got: rx_location.nrows(),
            });
        }

        if line_of_sight.len() != nrows {
            return Err(Error::ShapeMismatch {
                expected: nrows,
                got: line_of_sight.len(),
            });
        }

        let mut values = DVector::from_element(nrows, self.missing_value());

        for (i, (tx, rx)) in tx_location
            .row_iter()
            .zip(rx_location.row_iter())
            .enumerate()
        {
            if line_of_sight[i] {
                values[i] =
                    self.evaluate(&tx.transpose(), &rx.transpose(), tx_antenna, rx_antenna)?;
            }
        }

        Ok(values)
    }
}

/// [Measurement]s supported by a scenario.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type"))]
pub enum Measurement {
    /// Total atmospheric attenuation along the slant path
    AtmosphericLoss(AtmosphericLoss),
    /// Free space path loss
    FreeSpaceLoss(FreeSpaceLoss),
    /// Any user defined [Measure]
    #[cfg_attr(feature = "serde", serde(skip))]
    Custom(Arc<dyn Measure>),
}

impl Default for Measurement {
    fn default() -> Self {
        Self::AtmosphericLoss(AtmosphericLoss::default())
    }
}

impl Measurement {
    /// Wraps a user defined [Measure].
    pub fn custom<M: Measure + 'static>(measure: M) -> Self {
        Self::Custom(Arc::new(measure))
    }

    fn inner(&self) -> &dyn Measure {
        match self {
            Self::AtmosphericLoss(m) => m,
            Self::FreeSpaceLoss(m) => m,
            Self::Custom(m) => m.as_ref(),
        }
    }
}

impl Measure for Measurement {
    fn kind(&self) -> &str {
        self.inner().kind()
    }

    fn missing_value(&self) -> f64 {
        self.inner().missing_value()
    }

    fn evaluate(
        &self,
        tx_location: &Vector3<f64>,
        rx_location: &Vector3<f64>,
        tx_antenna: &Antenna,
        rx_antenna: &Antenna,
    ) -> Result<f64, Error> {
        self.inner()
            .evaluate(tx_location, rx_location, tx_antenna, rx_antenna)
    }

    fn process(
        &self,
        tx_location: &MatrixXx3<f64>,
        rx_location: &MatrixXx3<f64>,
        tx_antenna: &Antenna,
        rx_antenna: &Antenna,
        line_of_sight: &[bool],
    ) -> Result<DVector<f64>, Error> {
        self.inner().process(
            tx_location,
            rx_location,
            tx_antenna,
            rx_antenna,
            line_of_sight,
        )
    }
}

impl From<AtmosphericLoss> for Measurement {
    fn from(m: AtmosphericLoss) -> Self {
        Self::AtmosphericLoss(m)
    }
}

impl From<FreeSpaceLoss> for Measurement {
    fn from(m: FreeSpaceLoss) -> Self {
        Self::FreeSpaceLoss(m)
    }
}
