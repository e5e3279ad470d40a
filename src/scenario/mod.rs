//! Time stepped simulation of every antenna pair.
use std::collections::HashSet;

use crate::{
    asset::Asset,
    cfg::Config,
    error::Error,
    measurements::Measurement,
    prelude::{Epoch, TimeSeries},
    simulated::Simulated,
};

use log::{debug, info};
use nalgebra::DMatrix;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

mod duration;
mod history;
mod pair;

pub use duration::DurationPolicy;
pub use history::MeasurementHistory;
pub use pair::{pair_descriptors, AntennaPair, PairDescriptor};

/// [ResultTable] gathers the history of every antenna pair.
/// First column is "t" (Unix seconds), followed by the antenna locations
/// (each location reported once) then every measurement.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultTable {
    pub names: Vec<String>,
    pub data: DMatrix<f64>,
}

impl ResultTable {
    /// Returns the column with this name, if it exists.
    pub fn column(&self, name: &str) -> Option<Vec<f64>> {
        let index = self.names.iter().position(|n| n == name)?;
        Some(self.data.column(index).iter().copied().collect())
    }
}

/// [Scenario] simulates all antenna pairs formed by its [Asset]s
/// over a given duration, at a fixed measurement interval.
#[derive(Debug, Clone)]
pub struct Scenario {
    assets: Vec<Asset>,
    cfg: Config,
    duration: DurationPolicy,
    measurements: Vec<Measurement>,
    pairs: Vec<AntennaPair>,
    end_time: Epoch,
    timestamps: Vec<Epoch>,
}

impl Scenario {
    /// Builds a new [Scenario].
    /// - assets: uniquely named [Asset]s
    /// - cfg: [Config] preset
    /// - duration: [DurationPolicy]
    /// - measurements: [Measurement]s taken for each pair at each step.
    ///   Defaults to [Measurement::AtmosphericLoss] when empty.
    pub fn new(
        assets: Vec<Asset>,
        cfg: Config,
        duration: DurationPolicy,
        measurements: Vec<Measurement>,
    ) -> Result<Self, Error> {
        let interval = cfg.measurement_interval;
        if interval.total_nanoseconds() <= 0 {
            return Err(Error::InvalidInterval);
        }

        let total = duration.duration();
        if total.total_nanoseconds() <= 0 {
            return Err(Error::InvalidDuration);
        }

        let mut names = HashSet::with_capacity(assets.len());
        for asset in assets.iter() {
            if !names.insert(asset.name()) {
                return Err(Error::DuplicateAssetName(asset.name().to_string()));
            }
        }

        let measurements = if measurements.is_empty() {
            vec![Measurement::default()]
        } else {
            measurements
        };

        let start = match cfg.start.or(duration.suggested_start()) {
            Some(start) => start,
            None => Epoch::now().map_err(|e| Error::SystemTime(e.to_string()))?,
        };

        let end_time = start + total;

        let timestamps = TimeSeries::exclusive(start, end_time, interval).collect::<Vec<_>>();

        let num_steps = Self::steps(total.total_nanoseconds(), interval.total_nanoseconds());

        let pairs = pair_descriptors(&assets)
            .into_iter()
            .map(|descriptor| {
                let history = MeasurementHistory::new(num_steps, measurements.len());
                AntennaPair::new(descriptor, &assets, measurements.clone(), history)
            })
            .collect::<Result<Vec<_>, Error>>()?;

        info!(
            "{}: scenario with {} assets, {} pairs - {} steps until {}",
            start,
            assets.len(),
            pairs.len(),
            timestamps.len(),
            end_time
        );

        Ok(Self {
            assets,
            cfg,
            duration,
            measurements,
            pairs,
            end_time,
            timestamps,
        })
    }

    /// ceil(duration / interval)
    fn steps(duration_ns: i128, interval_ns: i128) -> usize {
        ((duration_ns + interval_ns - 1) / interval_ns) as usize
    }

    /// Runs the simulation: at each timestamp, every [Asset] is advanced
    /// once, then every [AntennaPair] records that timestamp.
    pub fn run(&mut self) -> Result<(), Error> {
        for t in self.timestamps.iter() {
            for asset in self.assets.iter_mut() {
                asset.simulate_to(*t)?;
            }

            let assets = &self.assets;

            #[cfg(feature = "parallel")]
            self.pairs
                .par_iter_mut()
                .try_for_each(|pair| pair.record(*t, assets))?;

            #[cfg(not(feature = "parallel"))]
            for pair in self.pairs.iter_mut() {
                pair.record(*t, assets)?;
            }

            debug!("{}: recorded {} pairs", t, self.pairs.len());
        }
        Ok(())
    }

    /// Gathers every pair history into one [ResultTable].
    pub fn collect_results(&self) -> ResultTable {
        let nrows = self.timestamps.len();

        let mut names = vec!["t".to_string()];
        let mut columns = vec![self
            .timestamps
            .iter()
            .map(|t| t.to_unix_seconds())
            .collect::<Vec<_>>()];

        let mut measurement_names = Vec::new();
        let mut measurement_columns: Vec<Vec<f64>> = Vec::new();

        for pair in self.pairs.iter() {
            let locations = pair.location_history();
            for (j, name) in pair.location_names().into_iter().enumerate() {
                if !names.contains(&name) {
                    names.push(name);
                    columns.push(locations.column(j).iter().take(nrows).copied().collect());
                }
            }

            let values = pair.measurement_history();
            for (j, name) in pair.measurement_names().into_iter().enumerate() {
                measurement_names.push(name);
                measurement_columns.push(values.column(j).iter().take(nrows).copied().collect());
            }
        }

        names.extend(measurement_names);
        columns.extend(measurement_columns);

        let data = DMatrix::from_fn(nrows, columns.len(), |i, j| {
            columns[j].get(i).copied().unwrap_or(0.0)
        });

        ResultTable { names, data }
    }

    pub fn assets(&self) -> &[Asset] {
        &self.assets
    }

    pub fn config(&self) -> &Config {
        &self.cfg
    }

    pub fn duration(&self) -> &DurationPolicy {
        &self.duration
    }

    pub fn measurements(&self) -> &[Measurement] {
        &self.measurements
    }

    pub fn antenna_pairs(&self) -> &[AntennaPair] {
        &self.pairs
    }

    /// Simulated timestamps, in chronological order
    pub fn timestamps(&self) -> &[Epoch] {
        &self.timestamps
    }

    pub fn start_time(&self) -> Option<Epoch> {
        self.timestamps.first().copied()
    }

    pub fn end_time(&self) -> Epoch {
        self.end_time
    }

    pub fn num_steps(&self) -> usize {
        self.timestamps.len()
    }
}
