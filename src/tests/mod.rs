mod measurements;
mod pair;
mod scenario;


use log::LevelFilter;
use std::{str::FromStr, sync::Once};

use crate::prelude::{
    Antenna, AntennaAction, AntennaDescriptor, AntennaKind, Asset, Epoch, FixedLocation,
    SegmentSolver,
};

static INIT: Once = Once::new();

pub fn init_logger() {
    INIT.call_once(|| {
        env_logger::builder()
            .is_test(true)
            .filter_level(LevelFilter::Debug)
            .init();
    });
}

/// ISS two line elements
pub const ISS_TLE_LINE1: &str =
    "1 25544U 98067A   20194.88612269 -.00002218  00000-0 -31515-4 0  9992";
pub const ISS_TLE_LINE2: &str =
    "2 25544  51.6461 221.2784 0001413  89.1723 280.4612 15.49507896236008";

/// Reference simulation start
pub fn reference_epoch() -> Epoch {
    Epoch::from_str("2024-01-01T00:00:00 UTC").unwrap_or_else(|e| panic!("invalid epoch: {}", e))
}

pub fn solver() -> SegmentSolver {
    SegmentSolver::default()
}

/// Resolved dipole with given name and actions
pub fn dipole(name: &str, actions: &[AntennaAction]) -> Antenna {
    AntennaDescriptor::new(AntennaKind::dipole())
        .with_name(name)
        .with_actions(actions)
        .resolve(&solver())
        .unwrap_or_else(|e| panic!("failed to resolve dipole: {}", e))
}

/// Ground station, equipped with a single transmitter
pub fn ground_station(name: &str) -> Asset {
    let location = FixedLocation::geodetic(&[38.8895, -77.0353, 0.0])
        .unwrap_or_else(|e| panic!("invalid location: {}", e));

    Asset::new(
        name,
        location.into(),
        vec![dipole("uplink", &[AntennaAction::Transmit])],
    )
}

/// Asset hovering 500 km above the ground station, equipped with a single receiver
pub fn overhead_receiver(name: &str) -> Asset {
    let location = FixedLocation::geodetic(&[38.8895, -77.0353, 500.0E3])
        .unwrap_or_else(|e| panic!("invalid location: {}", e));

    Asset::new(
        name,
        location.into(),
        vec![dipole("downlink", &[AntennaAction::Receive])],
    )
}
