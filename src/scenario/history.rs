use crate::{error::Error, prelude::Epoch};

use nalgebra::{DMatrix, Vector3};

/// [MeasurementHistory] is the bounded, pre-allocated storage of one antenna pair.
/// Each row holds one timestamp, both antenna (geodetic) locations and one value
/// per measurement. Rows are written in order and never rewritten.
#[derive(Debug, Clone, PartialEq)]
pub struct MeasurementHistory {
    timestamps: Vec<Epoch>,
    /// tx lat, lon, alt, rx lat, lon, alt
    locations: DMatrix<f64>,
    values: DMatrix<f64>,
    cursor: usize,
}

impl MeasurementHistory {
    /// Builds a new [MeasurementHistory] with `capacity` rows of `num_measurements` values.
    pub fn new(capacity: usize, num_measurements: usize) -> Self {
        Self {
            timestamps: Vec::with_capacity(capacity),
            locations: DMatrix::zeros(capacity, 6),
            values: DMatrix::zeros(capacity, num_measurements),
            cursor: 0,
        }
    }

    /// Appends one row.
    pub fn add_measurements(
        &mut self,
        t: Epoch,
        tx_location: &Vector3<f64>,
        rx_location: &Vector3<f64>,
        values: &[f64],
    ) -> Result<(), Error> {
        if values.len() != self.values.ncols() {
            return Err(Error::MeasurementCount {
                expected: self.values.ncols(),
                got: values.len(),
            });
        }

        if self.is_full() {
            return Err(Error::HistoryCapacity(self.capacity()));
        }

        let row = self.cursor;

        for i in 0..3 {
            self.locations[(row, i)] = tx_location[i];
            self.locations[(row, i + 3)] = rx_location[i];
        }

        for (j, value) in values.iter().enumerate() {
            self.values[(row, j)] = *value;
        }

        self.timestamps.push(t);
        self.cursor += 1;
        Ok(())
    }

    /// Recorded timestamps
    pub fn timestamps(&self) -> &[Epoch] {
        &self.timestamps
    }

    /// Location table, capacity x 6. Rows not written yet are null.
    pub fn locations(&self) -> &DMatrix<f64> {
        &self.locations
    }

    /// Measurement table, capacity x measurements. Rows not written yet are null.
    pub fn measurements(&self) -> &DMatrix<f64> {
        &self.values
    }

    pub fn num_measurements(&self) -> usize {
        self.values.ncols()
    }

    pub fn capacity(&self) -> usize {
        self.locations.nrows()
    }

    /// Number of rows written
    pub fn len(&self) -> usize {
        self.cursor
    }

    pub fn is_empty(&self) -> bool {
        self.cursor == 0
    }

    pub fn is_full(&self) -> bool {
        self.cursor >= self.capacity()
    }
}
