use crate::{
    prelude::{
        AntennaAction, AntennaPair, Asset, Duration, Epoch, Error, FixedLocation,
        FreeSpaceLoss, Measurement, MeasurementHistory, PairDescriptor, Vector3,
    },
    scenario::pair_descriptors,
    tests::{dipole, ground_station, init_logger, overhead_receiver, reference_epoch},
};

fn descriptor() -> PairDescriptor {
    PairDescriptor {
        tx_asset: 0,
        tx_antenna: "uplink".to_string(),
        rx_asset: 1,
        rx_antenna: "downlink".to_string(),
    }
}

fn assets() -> Vec<Asset> {
    vec![ground_station("gs"), overhead_receiver("sat")]
}

#[test]
fn descriptors_respect_actions() {
    let assets = assets();
    let descriptors = pair_descriptors(&assets);
    assert_eq!(descriptors, vec![descriptor()]);
}

#[test]
fn descriptors_exclude_same_asset() {
    let location = FixedLocation::geodetic(&[0.0, 0.0, 0.0]).unwrap();
    let asset = Asset::new(
        "transceiver",
        location.into(),
        vec![
            dipole("tx", &[AntennaAction::Transmit]),
            dipole("rx", &[AntennaAction::Receive]),
        ],
    );

    assert!(pair_descriptors(&[asset]).is_empty());
}

#[test]
fn descriptors_combinations() {
    let location = FixedLocation::geodetic(&[0.0, 0.0, 0.0]).unwrap();
    let both = [AntennaAction::Transmit, AntennaAction::Receive];

    let assets = vec![
        Asset::new("a", location.into(), vec![dipole("a0", &both)]),
        Asset::new("b", location.into(), vec![dipole("b0", &both)]),
        Asset::new(
            "c",
            location.into(),
            vec![dipole("c0", &both), dipole("c1", &[AntennaAction::Receive])],
        ),
    ];

    let descriptors = pair_descriptors(&assets);

    // 3 transmitters x 4 receivers, minus same asset combinations
    assert_eq!(descriptors.len(), 3 * 4 - 1 - 1 - 2);
    assert!(descriptors.iter().all(|d| d.tx_asset != d.rx_asset));

    // transmitter major order
    assert_eq!(descriptors[0].tx_antenna, "a0");
    assert_eq!(descriptors[0].rx_antenna, "b0");
    assert_eq!(descriptors.last().unwrap().tx_antenna, "c0");
    assert_eq!(descriptors.last().unwrap().rx_antenna, "b0");
}

#[test]
fn capability_checks() {
    let assets = assets();

    let reversed = PairDescriptor {
        tx_asset: 1,
        tx_antenna: "downlink".to_string(),
        rx_asset: 0,
        rx_antenna: "uplink".to_string(),
    };

    let err = AntennaPair::new(
        reversed,
        &assets,
        vec![Measurement::default()],
        MeasurementHistory::new(1, 1),
    )
    .unwrap_err();
    assert_eq!(err, Error::NotATransmitter("downlink".to_string()));

    let no_receiver = PairDescriptor {
        rx_asset: 0,
        rx_antenna: "uplink".to_string(),
        ..descriptor()
    };

    let err = AntennaPair::new(
        no_receiver,
        &assets,
        vec![Measurement::default()],
        MeasurementHistory::new(1, 1),
    )
    .unwrap_err();
    assert_eq!(err, Error::NotAReceiver("uplink".to_string()));

    let unknown = PairDescriptor {
        rx_antenna: "none".to_string(),
        ..descriptor()
    };

    assert!(matches!(
        AntennaPair::new(
            unknown,
            &assets,
            vec![Measurement::default()],
            MeasurementHistory::new(1, 1)
        ),
        Err(Error::AntennaNotFound { .. })
    ));

    let out_of_range = PairDescriptor {
        rx_asset: 2,
        ..descriptor()
    };

    assert!(matches!(
        AntennaPair::new(
            out_of_range,
            &assets,
            vec![Measurement::default()],
            MeasurementHistory::new(1, 1)
        ),
        Err(Error::UnknownAsset(2))
    ));
}

#[test]
fn names() {
    let assets = assets();
    let pair = AntennaPair::new(
        descriptor(),
        &assets,
        vec![Measurement::default(), FreeSpaceLoss::default().into()],
        MeasurementHistory::new(1, 2),
    )
    .unwrap();

    assert_eq!(pair.identifier(), "gs_uplink_sat_downlink");

    assert_eq!(
        pair.location_names(),
        vec![
            "gs_uplink_location_lat",
            "gs_uplink_location_lon",
            "gs_uplink_location_alt",
            "sat_downlink_location_lat",
            "sat_downlink_location_lon",
            "sat_downlink_location_alt",
        ]
    );

    assert_eq!(
        pair.measurement_names(),
        vec![
            "sat_downlink_gs_uplink_AtmosphericLoss",
            "sat_downlink_gs_uplink_FreeSpaceLoss",
        ]
    );

    assert_eq!(pair.transmitter_asset(&assets).unwrap().name(), "gs");
    assert_eq!(pair.receiver_asset(&assets).unwrap().name(), "sat");
    assert_eq!(pair.transmitter_antenna(&assets).unwrap().name(), "uplink");
    assert_eq!(pair.receiver_antenna(&assets).unwrap().name(), "downlink");
}

#[test]
fn simulation() {
    init_logger();

    let mut assets = assets();
    let t0 = reference_epoch();

    let mut pair = AntennaPair::new(
        descriptor(),
        &assets,
        vec![Measurement::default(), FreeSpaceLoss::default().into()],
        MeasurementHistory::new(2, 2),
    )
    .unwrap();

    let t1 = t0 + Duration::from_seconds(10.0);

    pair.simulate_to(t0, &mut assets).unwrap();
    pair.simulate_to(t1, &mut assets).unwrap();

    assert_eq!(pair.timestamps(), &[t0, t1]);

    let locations = pair.location_history();
    assert_eq!(locations.nrows(), 2);
    assert_eq!(locations.ncols(), 6);

    for row in 0..2 {
        assert_eq!(locations[(row, 0)], 38.8895);
        assert_eq!(locations[(row, 1)], -77.0353);
        assert_eq!(locations[(row, 2)], 0.0);
        assert_eq!(locations[(row, 5)], 500.0E3);
    }

    let values = pair.measurement_history();
    assert_eq!(values.ncols(), 2);
    assert!(values[(0, 0)] > 0.0 && values[(0, 0)].is_finite());
    assert!((values[(1, 1)] - 138.468383).abs() < 1.0E-3);

    // history is full
    let t2 = t1 + Duration::from_seconds(10.0);
    assert_eq!(
        pair.simulate_to(t2, &mut assets),
        Err(Error::HistoryCapacity(2))
    );

    assert_eq!(assets[0].last_t(), Some(t2));
}

#[test]
fn obstructed_link() {
    let mut assets = vec![
        ground_station("gs"),
        Asset::new(
            "antipode",
            FixedLocation::geodetic(&[-38.8895, 102.9647, 500.0E3])
                .unwrap()
                .into(),
            vec![dipole("downlink", &[AntennaAction::Receive])],
        ),
    ];

    let mut pair = AntennaPair::new(
        descriptor(),
        &assets,
        vec![Measurement::default()],
        MeasurementHistory::new(1, 1),
    )
    .unwrap();

    pair.simulate_to(reference_epoch(), &mut assets).unwrap();
    assert!(pair.measurement_history()[(0, 0)].is_nan());
}

#[test]
fn history_capacity() {
    let mut history = MeasurementHistory::new(1, 2);
    assert!(history.is_empty());
    assert_eq!(history.capacity(), 1);

    let t = Epoch::from_unix_seconds(0.0);
    let p = Vector3::zeros();

    assert_eq!(
        history.add_measurements(t, &p, &p, &[1.0]),
        Err(Error::MeasurementCount {
            expected: 2,
            got: 1
        })
    );

    history.add_measurements(t, &p, &p, &[1.0, 2.0]).unwrap();
    assert!(history.is_full());
    assert_eq!(history.len(), 1);

    assert_eq!(
        history.add_measurements(t, &p, &p, &[1.0, 2.0]),
        Err(Error::HistoryCapacity(1))
    );
}
