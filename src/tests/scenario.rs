use crate::{
    coordinates::CoordinateSystem,
    prelude::{
        AntennaAction, ArrayProvider, Asset, Config, Duration, DurationPolicy, DynamicLocation,
        Error, FixedLocation, FreeSpaceLoss, Measurement, Scenario, Vector3,
    },
    tests::{dipole, ground_station, init_logger, overhead_receiver, reference_epoch},
};

use rstest::*;
use std::collections::HashSet;

#[fixture]
fn config() -> Config {
    Config::default()
        .with_interval(Duration::from_seconds(5.0))
        .with_start(reference_epoch())
}

#[rstest]
fn end_to_end(config: Config) {
    init_logger();

    let assets = vec![ground_station("gs"), overhead_receiver("sat")];

    let mut scenario =
        Scenario::new(assets, config, DurationPolicy::seconds(50.0), vec![]).unwrap();

    assert_eq!(scenario.num_steps(), 10);
    assert_eq!(scenario.timestamps().len(), 10);
    assert_eq!(scenario.antenna_pairs().len(), 1);
    assert_eq!(scenario.measurements().len(), 1);
    assert_eq!(scenario.start_time(), Some(reference_epoch()));
    assert_eq!(
        scenario.end_time(),
        reference_epoch() + Duration::from_seconds(50.0)
    );

    for pair in scenario.timestamps().windows(2) {
        assert_eq!(pair[1] - pair[0], Duration::from_seconds(5.0));
    }

    scenario.run().unwrap();

    let pair = &scenario.antenna_pairs()[0];
    assert_eq!(pair.timestamps(), scenario.timestamps());

    let results = scenario.collect_results();

    assert_eq!(
        results.names,
        vec![
            "t",
            "gs_uplink_location_lat",
            "gs_uplink_location_lon",
            "gs_uplink_location_alt",
            "sat_downlink_location_lat",
            "sat_downlink_location_lon",
            "sat_downlink_location_alt",
            "sat_downlink_gs_uplink_AtmosphericLoss",
        ]
    );

    assert_eq!(results.data.nrows(), 10);
    assert_eq!(results.data.ncols(), 8);

    let t = results.column("t").unwrap();
    assert_eq!(t[0], reference_epoch().to_unix_seconds());
    assert_eq!(t[9] - t[0], 45.0);

    let losses = results
        .column("sat_downlink_gs_uplink_AtmosphericLoss")
        .unwrap();

    // static geometry: constant loss
    assert!(losses.iter().all(|l| l.is_finite() && *l > 0.0));
    assert!(losses.iter().all(|l| *l == losses[0]));

    let alt = results.column("sat_downlink_location_alt").unwrap();
    assert!(alt.iter().all(|a| *a == 500.0E3));

    assert!(results.column("unknown").is_none());
}

/// Receiver replaying a 10 row geodetic table, 1° of latitude per row
fn moving_receiver(name: &str) -> Asset {
    let t0 = reference_epoch();

    let timestamps = (0..10)
        .map(|i| t0 + Duration::from_seconds(5.0 * i as f64))
        .collect();

    let rows = (0..10)
        .map(|i| Vector3::new(38.0 + i as f64, -77.0353, 500.0E3))
        .collect();

    let provider = ArrayProvider::new(timestamps, rows)
        .unwrap_or_else(|e| panic!("invalid location table: {}", e));

    Asset::new(
        name,
        DynamicLocation::new(CoordinateSystem::Geodetic, provider.into()).into(),
        vec![dipole("rx", &[AntennaAction::Receive])],
    )
}

#[rstest]
fn end_to_end_location_table(config: Config) {
    init_logger();

    let assets = vec![ground_station("gs"), moving_receiver("mov")];

    let mut scenario =
        Scenario::new(assets, config, DurationPolicy::seconds(50.0), vec![]).unwrap();

    assert_eq!(scenario.num_steps(), 10);
    assert_eq!(scenario.antenna_pairs().len(), 1);

    scenario.run().unwrap();

    let results = scenario.collect_results();

    assert_eq!(
        results.names,
        vec![
            "t",
            "gs_uplink_location_lat",
            "gs_uplink_location_lon",
            "gs_uplink_location_alt",
            "mov_rx_location_lat",
            "mov_rx_location_lon",
            "mov_rx_location_alt",
            "mov_rx_gs_uplink_AtmosphericLoss",
        ]
    );

    assert_eq!(results.data.nrows(), 10);

    // one row per step: the first step already moves to row 1,
    // the last row is held once the table is exhausted
    let lat = results.column("mov_rx_location_lat").unwrap();
    assert_eq!(
        lat,
        vec![39.0, 40.0, 41.0, 42.0, 43.0, 44.0, 45.0, 46.0, 47.0, 47.0]
    );

    let alt = results.column("mov_rx_location_alt").unwrap();
    assert!(alt.iter().all(|a| *a == 500.0E3));

    let gs_lat = results.column("gs_uplink_location_lat").unwrap();
    assert!(gs_lat.iter().all(|l| *l == 38.8895));

    let losses = results
        .column("mov_rx_gs_uplink_AtmosphericLoss")
        .unwrap();
    assert!(losses.iter().all(|l| l.is_finite() && *l > 0.0));

    // receiver drifts away: lower elevations, larger losses
    assert!(losses[8] > losses[0]);
    assert_eq!(losses[8], losses[9]);
}

#[rstest]
fn partial_last_step(config: Config) {
    let assets = vec![ground_station("gs"), overhead_receiver("sat")];

    let mut scenario =
        Scenario::new(assets, config, DurationPolicy::seconds(52.0), vec![]).unwrap();

    assert_eq!(scenario.num_steps(), 11);
    scenario.run().unwrap();

    let results = scenario.collect_results();
    assert_eq!(results.data.nrows(), 11);
}

#[rstest]
fn self_pairing(config: Config) {
    let location = FixedLocation::geodetic(&[0.0, 0.0, 0.0]).unwrap();
    let asset = Asset::new(
        "transceiver",
        location.into(),
        vec![
            dipole("tx", &[AntennaAction::Transmit]),
            dipole("rx", &[AntennaAction::Receive]),
        ],
    );

    let mut scenario =
        Scenario::new(vec![asset], config, DurationPolicy::seconds(50.0), vec![]).unwrap();

    assert!(scenario.antenna_pairs().is_empty());
    scenario.run().unwrap();

    let results = scenario.collect_results();
    assert_eq!(results.names, vec!["t"]);
    assert_eq!(results.data.ncols(), 1);
}

#[rstest]
fn duplicate_asset_names(config: Config) {
    let assets = vec![ground_station("twin"), overhead_receiver("twin")];

    assert_eq!(
        Scenario::new(assets, config, DurationPolicy::seconds(50.0), vec![]).unwrap_err(),
        Error::DuplicateAssetName("twin".to_string())
    );
}

#[rstest]
#[case(0.0, 50.0, Error::InvalidInterval)]
#[case(-5.0, 50.0, Error::InvalidInterval)]
#[case(5.0, 0.0, Error::InvalidDuration)]
fn invalid_timing(#[case] interval: f64, #[case] duration: f64, #[case] error: Error) {
    let assets = vec![ground_station("gs"), overhead_receiver("sat")];
    let cfg = Config::default()
        .with_interval(Duration::from_seconds(interval))
        .with_start(reference_epoch());

    assert_eq!(
        Scenario::new(assets, cfg, DurationPolicy::seconds(duration), vec![]).unwrap_err(),
        error
    );
}

#[rstest]
fn multiple_pairs_and_measurements(config: Config) {
    init_logger();

    let both = [AntennaAction::Transmit, AntennaAction::Receive];

    let assets = vec![
        ground_station("gs"),
        Asset::new(
            "sat",
            FixedLocation::geodetic(&[38.8895, -77.0353, 500.0E3])
                .unwrap()
                .into(),
            vec![dipole("tt&c", &both)],
        ),
        Asset::new(
            "relay",
            FixedLocation::geodetic(&[40.0, -75.0, 0.0]).unwrap().into(),
            vec![dipole("tt&c", &both)],
        ),
    ];

    let measurements = vec![Measurement::default(), FreeSpaceLoss::default().into()];

    let mut scenario =
        Scenario::new(assets, config, DurationPolicy::seconds(10.0), measurements).unwrap();

    // gs -> sat, gs -> relay, sat -> relay, relay -> sat
    assert_eq!(scenario.antenna_pairs().len(), 4);

    scenario.run().unwrap();

    let results = scenario.collect_results();

    // t + 3 antenna locations + 4 pairs x 2 measurements
    assert_eq!(results.names.len(), 1 + 3 * 3 + 4 * 2);
    assert_eq!(results.data.ncols(), results.names.len());
    assert_eq!(results.data.nrows(), 2);

    let locations = results
        .names
        .iter()
        .filter(|n| n.contains("_location_"))
        .collect::<Vec<_>>();
    let unique = locations.iter().collect::<HashSet<_>>();
    assert_eq!(locations.len(), 9);
    assert_eq!(unique.len(), 9, "location columns are not unique");

    assert!(results
        .column("relay_tt&c_sat_tt&c_FreeSpaceLoss")
        .is_some());
}

#[test]
fn start_from_duration_policy() {
    let epoch = reference_epoch() + Duration::from_seconds(3600.0);

    let policy = DurationPolicy::Orbits {
        period: Duration::from_seconds(100.0),
        epoch,
        n_orbits: 0.5,
    };

    let assets = vec![ground_station("gs"), overhead_receiver("sat")];
    let cfg = Config::default().with_interval(Duration::from_seconds(10.0));

    let scenario = Scenario::new(assets, cfg, policy, vec![]).unwrap();

    assert_eq!(scenario.start_time(), Some(epoch));
    assert_eq!(scenario.num_steps(), 5);
}
