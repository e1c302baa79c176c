//! Scenario tests for the spread engine
//!
//! Small hand-built landscapes with expectations that hold for any seed.

use wildfire_spread_core::{
    normalize, slope_from_elevation, CompassDirection, Grid, SpreadEngine, SpreadError,
    WindVector,
};

#[ctor::ctor]
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn uniform(rows: usize, cols: usize, risk: f32, fuel: f32, wind: WindVector, seed: u64) -> SpreadEngine {
    SpreadEngine::new(
        Grid::filled(rows, cols, risk),
        Grid::filled(rows, cols, fuel),
        None,
        wind,
        seed,
    )
    .unwrap()
}

fn in_block(r: usize, c: usize, centre: (usize, usize), radius: usize) -> bool {
    r.abs_diff(centre.0) <= radius && c.abs_diff(centre.1) <= radius
}

#[test]
fn test_ignited_block_keeps_burning_and_consumes_fuel() {
    for seed in [1, 2, 3, 42, 1234] {
        let mut engine = uniform(10, 10, 0.9, 0.9, WindVector::calm(), seed);
        engine.ignite(5, 5, 1).unwrap();

        let before = engine.snapshot();
        for r in 0..10 {
            for c in 0..10 {
                let expected = if in_block(r, c, (5, 5), 1) { 0.8 } else { 0.0 };
                assert_eq!(before.intensity.get(r, c), expected);
            }
        }

        engine.step(0.25).unwrap();

        let cooling_delta = 0.4 * 0.25;
        for r in 4..=6 {
            for c in 4..=6 {
                assert!(engine.intensity().get(r, c) >= before.intensity.get(r, c) - cooling_delta);
                assert!(engine.fuel_remaining().get(r, c) < before.fuel_remaining.get(r, c));
            }
        }

        // Anything outside the block either stayed unburnt or caught at 0.5 and grew
        for r in 0..10 {
            for c in 0..10 {
                if !in_block(r, c, (5, 5), 1) {
                    let i = engine.intensity().get(r, c);
                    assert!(i == 0.0 || i >= 0.5, "unexpected intensity {} at ({}, {})", i, r, c);
                }
            }
        }
    }
}

#[test]
fn test_zero_fuel_availability_confines_fire_to_seed() {
    let mut engine = uniform(10, 10, 0.9, 0.0, WindVector::new(2.0, 1.0), 17);
    engine.ignite(5, 5, 1).unwrap();

    for _ in 0..5 {
        engine.step(0.25).unwrap();
        for r in 0..10 {
            for c in 0..10 {
                if !in_block(r, c, (5, 5), 1) {
                    assert_eq!(engine.intensity().get(r, c), 0.0);
                }
            }
        }
    }
}

#[test]
fn test_mismatched_shapes_rejected() {
    let result = SpreadEngine::new(
        Grid::filled(5, 5, 0.5),
        Grid::filled(6, 6, 0.5),
        None,
        WindVector::calm(),
        0,
    );
    assert!(matches!(
        result,
        Err(SpreadError::ShapeMismatch {
            expected: (5, 5),
            found: (6, 6),
            ..
        })
    ));

    let result = SpreadEngine::new(Grid::new(0, 0), Grid::new(0, 0), None, WindVector::calm(), 0);
    assert!(result.is_err_and(|e| e.is_shape_error()));
}

#[test]
fn test_wind_pushes_fire_downwind() {
    let wind = WindVector::from_compass(CompassDirection::East, 30.0);
    let mut engine = uniform(41, 41, 0.8, 0.9, wind, 2024);
    engine.ignite(20, 20, 1).unwrap();
    engine.run_with_snapshots(&[4.0], 4).unwrap();

    let burned = |cols: std::ops::Range<usize>| -> usize {
        let fuel = engine.fuel_remaining();
        (0..41)
            .flat_map(|r| cols.clone().map(move |c| (r, c)))
            .filter(|&(r, c)| fuel.get(r, c) < 1.0)
            .count()
    };
    let east = burned(22..41);
    let west = burned(0..19);
    assert!(east > west, "expected downwind bias, east={} west={}", east, west);
}

#[test]
fn test_checkpoint_snapshots_are_owned() {
    let mut engine = uniform(12, 12, 0.9, 0.9, WindVector::calm(), 8);
    engine.ignite(6, 6, 1).unwrap();
    let snapshots = engine.run_with_snapshots(&[1.0], 2).unwrap();
    let at_one = snapshots.get(1.0).unwrap().clone();

    engine.step(0.5).unwrap();
    engine.reset();
    assert_eq!(snapshots.get(1.0).unwrap(), &at_one);
    assert!(at_one.max() > 0.0);
}

#[test]
fn test_prepared_inputs_from_dem() {
    // Gaussian hill DEM -> slope, raw risk scores -> [0,1]
    let size = 32;
    let mut dem = Grid::new(size, size);
    let mut raw_risk = Grid::new(size, size);
    for r in 0..size {
        for c in 0..size {
            let y = r as f32 - 16.0;
            let x = c as f32 - 16.0;
            dem.set(r, c, 500.0 + 200.0 * (-(x * x + y * y) / (size * size) as f32 * 10.0).exp());
            raw_risk.set(r, c, 3.0 + (x * 0.1).sin() * 2.0);
        }
    }
    let slope = slope_from_elevation(&dem, 90.0);
    let risk = normalize(&raw_risk);
    assert!(risk.as_slice().iter().all(|&v| (0.0..=1.0).contains(&v)));

    let mut engine = SpreadEngine::new(
        risk,
        Grid::filled(size, size, 0.8),
        Some(slope),
        WindVector::from_compass(CompassDirection::NorthEast, 15.0),
        3,
    )
    .unwrap();
    engine.ignite_default(16, 16).unwrap();
    let snapshots = engine.run_with_snapshots(&[1.0, 2.0, 3.0], 4).unwrap();
    assert_eq!(snapshots.len(), 3);
    assert!(engine.statistics().burned_cells >= 25);
}
