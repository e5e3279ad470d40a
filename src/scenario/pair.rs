use crate::{
    antenna::{Antenna, AntennaAction},
    asset::Asset,
    coordinates::{single_row, CoordinateSystem},
    error::Error,
    los::line_of_sight,
    measurements::{Measure, Measurement},
    prelude::Epoch,
    scenario::history::MeasurementHistory,
    simulated::Simulated,
};

use itertools::iproduct;
use log::{debug, trace};

/// [PairDescriptor] designates a transmitting and a receiving antenna,
/// prior any simulation. Assets are designated by their scenario index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairDescriptor {
    pub tx_asset: usize,
    pub tx_antenna: String,
    pub rx_asset: usize,
    pub rx_antenna: String,
}

/// Lists every (transmitter, receiver) antenna combination
/// allowed by the antenna actions. Antennas of a same asset never pair.
pub fn pair_descriptors(assets: &[Asset]) -> Vec<PairDescriptor> {
    let capable = |action: AntennaAction| {
        assets
            .iter()
            .enumerate()
            .flat_map(move |(index, asset)| {
                asset
                    .antennas()
                    .iter()
                    .filter(move |ant| ant.can(action))
                    .map(move |ant| (index, ant.name().to_string()))
            })
            .collect::<Vec<_>>()
    };

    let transmitters = capable(AntennaAction::Transmit);
    let receivers = capable(AntennaAction::Receive);

    iproduct!(transmitters.iter(), receivers.iter())
        .filter(|((tx, _), (rx, _))| tx != rx)
        .map(|((tx_asset, tx_antenna), (rx_asset, rx_antenna))| PairDescriptor {
            tx_asset: *tx_asset,
            tx_antenna: tx_antenna.clone(),
            rx_asset: *rx_asset,
            rx_antenna: rx_antenna.clone(),
        })
        .collect()
}

/// [AntennaPair] simulates and records one transmitter to receiver link.
/// It does not own the assets: they are indexed within the scenario asset list.
#[derive(Debug, Clone)]
pub struct AntennaPair {
    descriptor: PairDescriptor,
    tx_name: String,
    rx_name: String,
    measurements: Vec<Measurement>,
    history: MeasurementHistory,
}

impl AntennaPair {
    /// Builds a new [AntennaPair], verifying both antennas exist
    /// and are respectively allowed to transmit and receive.
    pub fn new(
        descriptor: PairDescriptor,
        assets: &[Asset],
        measurements: Vec<Measurement>,
        history: MeasurementHistory,
    ) -> Result<Self, Error> {
        let tx_asset = asset(assets, descriptor.tx_asset)?;
        let rx_asset = asset(assets, descriptor.rx_asset)?;

        let tx_antenna = tx_asset.get_antenna(&descriptor.tx_antenna)?;
        if !tx_antenna.can(AntennaAction::Transmit) {
            return Err(Error::NotATransmitter(tx_antenna.name().to_string()));
        }

        let rx_antenna = rx_asset.get_antenna(&descriptor.rx_antenna)?;
        if !rx_antenna.can(AntennaAction::Receive) {
            return Err(Error::NotAReceiver(rx_antenna.name().to_string()));
        }

        if history.num_measurements() != measurements.len() {
            return Err(Error::MeasurementCount {
                expected: measurements.len(),
                got: history.num_measurements(),
            });
        }

        Ok(Self {
            tx_name: tx_asset.name().to_string(),
            rx_name: rx_asset.name().to_string(),
            descriptor,
            measurements,
            history,
        })
    }

    pub fn descriptor(&self) -> &PairDescriptor {
        &self.descriptor
    }

    pub fn history(&self) -> &MeasurementHistory {
        &self.history
    }

    pub fn measurements(&self) -> &[Measurement] {
        &self.measurements
    }

    pub fn transmitter_asset<'a>(&self, assets: &'a [Asset]) -> Result<&'a Asset, Error> {
        asset(assets, self.descriptor.tx_asset)
    }

    pub fn receiver_asset<'a>(&self, assets: &'a [Asset]) -> Result<&'a Asset, Error> {
        asset(assets, self.descriptor.rx_asset)
    }

    pub fn transmitter_antenna<'a>(&self, assets: &'a [Asset]) -> Result<&'a Antenna, Error> {
        self.transmitter_asset(assets)?
            .get_antenna(&self.descriptor.tx_antenna)
    }

    pub fn receiver_antenna<'a>(&self, assets: &'a [Asset]) -> Result<&'a Antenna, Error> {
        self.receiver_asset(assets)?
            .get_antenna(&self.descriptor.rx_antenna)
    }

    /// Advances both assets to `t`, then records `t`.
    pub fn simulate_to(&mut self, t: Epoch, assets: &mut [Asset]) -> Result<(), Error> {
        for index in [self.descriptor.tx_asset, self.descriptor.rx_asset] {
            assets
                .get_mut(index)
                .ok_or(Error::UnknownAsset(index))?
                .simulate_to(t)?;
        }
        self.record(t, assets)
    }

    /// Records `t` from the current state of both assets,
    /// which must have been simulated to `t` already.
    pub fn record(&mut self, t: Epoch, assets: &[Asset]) -> Result<(), Error> {
        let tx_asset = self.transmitter_asset(assets)?;
        let rx_asset = self.receiver_asset(assets)?;

        let tx_antenna = tx_asset.get_antenna(&self.descriptor.tx_antenna)?;
        let rx_antenna = rx_asset.get_antenna(&self.descriptor.rx_antenna)?;

        let tx_ecef =
            tx_asset.get_antenna_location(&self.descriptor.tx_antenna, CoordinateSystem::Cartesian)?;
        let rx_ecef =
            rx_asset.get_antenna_location(&self.descriptor.rx_antenna, CoordinateSystem::Cartesian)?;

        let tx_lla =
            tx_asset.get_antenna_location(&self.descriptor.tx_antenna, CoordinateSystem::Geodetic)?;
        let rx_lla =
            rx_asset.get_antenna_location(&self.descriptor.rx_antenna, CoordinateSystem::Geodetic)?;

        let los = [line_of_sight(&tx_ecef, &rx_ecef)];

        let (tx_row, rx_row) = (single_row(&tx_lla), single_row(&rx_lla));

        let values = self
            .measurements
            .iter()
            .map(|m| {
                let value = m.process(&tx_row, &rx_row, tx_antenna, rx_antenna, &los)?;
                Ok(value[0])
            })
            .collect::<Result<Vec<_>, Error>>()?;

        trace!("{}: {} los={} {:?}", t, self.identifier(), los[0], values);

        self.history.add_measurements(t, &tx_lla, &rx_lla, &values)?;

        if self.history.is_full() {
            debug!("{}: {} history complete", t, self.identifier());
        }

        Ok(())
    }

    /// Recorded timestamps
    pub fn timestamps(&self) -> &[Epoch] {
        self.history.timestamps()
    }

    /// Location table, one row per step: tx lat, lon, alt, rx lat, lon, alt.
    pub fn location_history(&self) -> &nalgebra::DMatrix<f64> {
        self.history.locations()
    }

    /// Measurement table, one row per step, one column per measurement.
    pub fn measurement_history(&self) -> &nalgebra::DMatrix<f64> {
        self.history.measurements()
    }

    /// Column names of [Self::location_history].
    pub fn location_names(&self) -> Vec<String> {
        let tx = format!("{}_{}", self.tx_name, self.descriptor.tx_antenna);
        let rx = format!("{}_{}", self.rx_name, self.descriptor.rx_antenna);
        [tx, rx]
            .iter()
            .flat_map(|prefix| {
                ["lat", "lon", "alt"]
                    .iter()
                    .map(move |c| format!("{}_location_{}", prefix, c))
            })
            .collect()
    }

    /// Column names of [Self::measurement_history].
    pub fn measurement_names(&self) -> Vec<String> {
        self.measurements
            .iter()
            .map(|m| {
                format!(
                    "{}_{}_{}_{}_{}",
                    self.rx_name,
                    self.descriptor.rx_antenna,
                    self.tx_name,
                    self.descriptor.tx_antenna,
                    m.kind()
                )
            })
            .collect()
    }

    pub fn identifier(&self) -> String {
        format!(
            "{}_{}_{}_{}",
            self.tx_name, self.descriptor.tx_antenna, self.rx_name, self.descriptor.rx_antenna
        )
    }
}

fn asset(assets: &[Asset], index: usize) -> Result<&Asset, Error> {
    assets.get(index).ok_or(Error::UnknownAsset(index))
}
