use std::sync::Arc;

use crate::{
    measurements::SlantPath,
    prelude::{
        Antenna, AntennaAction, AtmosphericLoss, AtmosphericModel, Error, FreeSpaceLoss,
        GasScintillationModel, Measure, Measurement, Vector3,
    },
    tests::{dipole, init_logger},
};

use nalgebra::MatrixXx3;
use rstest::*;

const GROUND: [f64; 3] = [38.8895, -77.0353, 0.0];
const OVERHEAD: [f64; 3] = [38.8895, -77.0353, 500.0E3];

fn rows(points: &[[f64; 3]]) -> MatrixXx3<f64> {
    let rows = points
        .iter()
        .map(|p| Vector3::new(p[0], p[1], p[2]).transpose())
        .collect::<Vec<_>>();
    MatrixXx3::from_rows(&rows)
}

#[fixture]
fn antennas() -> (Antenna, Antenna) {
    (
        dipole("tx", &[AntennaAction::Transmit]),
        dipole("rx", &[AntennaAction::Receive]),
    )
}

/// Constant value, for any sample
#[derive(Debug)]
struct Constant(f64);

impl Measure for Constant {
    fn kind(&self) -> &str {
        "Constant"
    }

    fn missing_value(&self) -> f64 {
        -1.0
    }

    fn evaluate(
        &self,
        _: &Vector3<f64>,
        _: &Vector3<f64>,
        _: &Antenna,
        _: &Antenna,
    ) -> Result<f64, Error> {
        Ok(self.0)
    }
}

#[rstest]
fn atmospheric_loss_zenith(antennas: (Antenna, Antenna)) {
    init_logger();

    let (tx, rx) = antennas;
    let measurement = AtmosphericLoss::default();

    assert_eq!(measurement.kind(), "AtmosphericLoss");
    assert!(measurement.missing_value().is_nan());

    let values = measurement
        .process(&rows(&[GROUND]), &rows(&[OVERHEAD]), &tx, &rx, &[true])
        .unwrap();

    assert_eq!(values.len(), 1);
    assert!(values[0].is_finite());
    assert!(values[0] > 0.0, "loss: {}", values[0]);
    // UHF losses through the atmosphere remain tiny
    assert!(values[0] < 1.0, "loss: {}", values[0]);
}

#[rstest]
fn missing_values(antennas: (Antenna, Antenna)) {
    let (tx, rx) = antennas;

    let tx_rows = rows(&[GROUND, GROUND, GROUND]);
    let rx_rows = rows(&[OVERHEAD, OVERHEAD, OVERHEAD]);

    let values = AtmosphericLoss::default()
        .process(&tx_rows, &rx_rows, &tx, &rx, &[true, false, true])
        .unwrap();

    assert!(values[0].is_finite());
    assert!(values[1].is_nan());
    assert_eq!(values[0], values[2]);

    let values = AtmosphericLoss::default()
        .with_missing_value(-999.0)
        .process(&tx_rows, &rx_rows, &tx, &rx, &[false, false, false])
        .unwrap();

    assert!(values.iter().all(|v| *v == -999.0));
}

#[rstest]
fn low_elevations_are_clamped(antennas: (Antenna, Antenna)) {
    let (tx, rx) = antennas;
    let measurement = AtmosphericLoss::default();

    // far below the horizon
    let rx_location = Vector3::new(-38.0, 100.0, 500.0E3);
    let tx_location = Vector3::new(GROUND[0], GROUND[1], GROUND[2]);

    let path = measurement.slant_path(&tx_location, &rx_location, &tx, &rx);
    assert_eq!(path.elevation_deg, 5.0);
    assert_eq!(path.frequency_ghz, 0.4);
    assert_eq!(path.diameter_m, rx.diameter());

    let clamped = measurement
        .evaluate(&tx_location, &rx_location, &tx, &rx)
        .unwrap();

    let expected = GasScintillationModel::default().loss_db(&path).unwrap();
    assert_eq!(clamped, expected);
}

#[test]
fn gas_scintillation_model() {
    let path = SlantPath {
        latitude_deg: 45.0,
        longitude_deg: 0.0,
        station_height_km: 0.031382984,
        elevation_deg: 30.0,
        frequency_ghz: 12.0,
        diameter_m: 1.0,
        efficiency: 0.65,
        exceedance: 1.0,
    };

    let model = GasScintillationModel::default();
    let reference = model.loss_db(&path).unwrap();
    assert!(reference > 0.0 && reference.is_finite());

    // longer path through the atmosphere
    let low = SlantPath {
        elevation_deg: 10.0,
        ..path
    };
    assert!(model.loss_db(&low).unwrap() > reference);

    // water vapour line
    let humid = SlantPath {
        frequency_ghz: 22.235,
        ..path
    };
    assert!(model.loss_db(&humid).unwrap() > reference);

    let invalid = SlantPath {
        elevation_deg: 0.0,
        ..path
    };
    assert!(model.loss_db(&invalid).is_err());
}

#[test]
fn custom_atmospheric_model() {
    #[derive(Debug)]
    struct Flat;

    impl AtmosphericModel for Flat {
        fn loss_db(&self, _: &SlantPath) -> Result<f64, Error> {
            Ok(3.0)
        }
    }

    let (tx, rx) = (
        dipole("tx", &[AntennaAction::Transmit]),
        dipole("rx", &[AntennaAction::Receive]),
    );

    let measurement = AtmosphericLoss::default().with_model(Arc::new(Flat));

    let values = measurement
        .process(&rows(&[GROUND]), &rows(&[OVERHEAD]), &tx, &rx, &[true])
        .unwrap();

    assert_eq!(values[0], 3.0);
}

#[rstest]
fn free_space_loss(antennas: (Antenna, Antenna)) {
    let (tx, rx) = antennas;
    let measurement = FreeSpaceLoss::default();

    assert_eq!(measurement.kind(), "FreeSpaceLoss");

    let values = measurement
        .process(
            &rows(&[GROUND, GROUND]),
            &rows(&[OVERHEAD, OVERHEAD]),
            &tx,
            &rx,
            &[true, false],
        )
        .unwrap();

    assert!((values[0] - 138.468383).abs() < 1.0E-3, "fspl: {}", values[0]);
    assert!(values[1].is_nan());
}

#[rstest]
fn shape_mismatches(antennas: (Antenna, Antenna)) {
    let (tx, rx) = antennas;
    let measurement = Measurement::default();

    assert_eq!(
        measurement.process(
            &rows(&[GROUND, GROUND]),
            &rows(&[OVERHEAD]),
            &tx,
            &rx,
            &[true, true]
        ),
        Err(Error::ShapeMismatch {
            expected: 2,
            got: 1
        })
    );

    assert_eq!(
        measurement.process(&rows(&[GROUND]), &rows(&[OVERHEAD]), &tx, &rx, &[]),
        Err(Error::ShapeMismatch {
            expected: 1,
            got: 0
        })
    );
}

#[rstest]
fn measurement_dispatch(antennas: (Antenna, Antenna)) {
    let (tx, rx) = antennas;

    let measurements = [
        Measurement::default(),
        FreeSpaceLoss::default().into(),
        Measurement::custom(Constant(42.0)),
    ];

    let kinds = measurements.iter().map(|m| m.kind()).collect::<Vec<_>>();
    assert_eq!(kinds, ["AtmosphericLoss", "FreeSpaceLoss", "Constant"]);

    let values = measurements[2]
        .process(
            &rows(&[GROUND, GROUND]),
            &rows(&[OVERHEAD, OVERHEAD]),
            &tx,
            &rx,
            &[true, false],
        )
        .unwrap();

    assert_eq!(values.as_slice(), &[42.0, -1.0]);
}
