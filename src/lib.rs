#![doc = include_str!("../README.md")]
#![cfg_attr(docrs, feature(doc_cfg))]

// private modules
mod cfg;
mod constants;
mod error;
mod simulated;

// public modules
pub mod antenna;
pub mod asset;
pub mod coordinates;
pub mod location;
pub mod los;
pub mod measurements;
pub mod orbit;
pub mod scenario;

#[cfg(test)]
mod tests;

// prelude
pub mod prelude {
    pub use crate::antenna::{
        Antenna, AntennaAction, AntennaDescriptor, AntennaKind, EmSolver, FeedPoint,
        RadiationPattern, RadiationSource, SegmentSolver,
    };
    pub use crate::asset::Asset;
    pub use crate::cfg::{Config, PatternGrid};
    pub use crate::coordinates::{ecef_to_lla, lla_to_ecef, CoordinateSystem, LookAngles};
    pub use crate::error::Error;
    pub use crate::location::{
        ArrayProvider, DynamicLocation, FixedLocation, Location, LocationProvider,
        PropagatedProvider,
    };
    pub use crate::los::line_of_sight;
    pub use crate::measurements::{
        AtmosphericLoss, AtmosphericModel, FreeSpaceLoss, GasScintillationModel, Measure,
        Measurement,
    };
    pub use crate::orbit::{KeplerianPropagator, Propagator, TlePropagator};
    pub use crate::scenario::{
        AntennaPair, DurationPolicy, MeasurementHistory, PairDescriptor, ResultTable, Scenario,
    };
    pub use crate::simulated::Simulated;
    // re-export
    pub use anise::prelude::Orbit;
    pub use hifitime::{Duration, Epoch, TimeScale, TimeSeries, Unit};
    pub use nalgebra::Vector3;
}

// pub export
pub use error::Error;

/// Physical constants.
pub mod consts {
    pub use crate::constants::*;
}
