//! Scenario tests for the point isolation algorithm.
//!
//! Point dispositions with known isolation features are run through the
//! algorithm and checked against the expected index sets: a growing
//! low-multiplicity fixture (single point, far pair, close pair, two
//! pairs), error reporting, boundary semantics, and a star-shaped
//! distribution swept with shrinking isolation radii.

use point_isolation::prelude::*;

fn cube_config<T: CoordinateScalar>(half_width: T, radius2: T) -> IsolationConfig<T> {
    let range = CoordRange::new(-half_width, half_width);
    IsolationConfig {
        range_x: range,
        range_y: range,
        range_z: range,
        radius2,
        ..IsolationConfig::default()
    }
}

fn sorted(mut indices: Vec<usize>) -> Vec<usize> {
    indices.sort_unstable();
    indices
}

// =============================================================================
// LOW-MULTIPLICITY SCENARIOS
// =============================================================================

/// Growing fixture: each stage adds one point and re-runs the algorithm.
#[test]
fn low_multiplicity_scenarios_f32() {
    let algo = PointIsolationAlg::new(cube_config(2.0f32, 1.0));
    let mut points: Vec<[f32; 3]> = Vec::new();

    // a single point is isolated
    points.push([1.0, 1.0, 1.0]);
    assert_eq!(sorted(algo.remove_isolated_points(&points).unwrap()), vec![]);

    // two far points: still everything isolated
    points.push([-1.0, -1.0, -1.0]);
    assert_eq!(sorted(algo.remove_isolated_points(&points).unwrap()), vec![]);

    // a third point close to the first one
    points.push([0.5, 1.0, 1.0]);
    assert_eq!(
        sorted(algo.remove_isolated_points(&points).unwrap()),
        vec![0, 2]
    );

    // a fourth point close to the second one: two pairs, nothing isolated
    points.push([-0.5, -1.0, -1.0]);
    assert_eq!(
        sorted(algo.remove_isolated_points(&points).unwrap()),
        vec![0, 1, 2, 3]
    );
}

#[test]
fn results_agree_with_the_brute_force_oracle() {
    let algo = PointIsolationAlg::new(cube_config(2.0f64, 1.0));
    let points = vec![
        [1.0, 1.0, 1.0],
        [-1.0, -1.0, -1.0],
        [0.5, 1.0, 1.0],
        [-0.5, -1.0, -1.0],
        [0.0, 0.0, 0.0],
        [1.9, -1.9, 0.0],
    ];
    assert_eq!(
        sorted(algo.remove_isolated_points(&points).unwrap()),
        sorted(algo.brute_force_remove_isolated_points(&points))
    );
}

// =============================================================================
// BOUNDARY AND EDGE-CASE SEMANTICS
// =============================================================================

/// Two points exactly one radius apart are mutual neighbors (`<=`).
#[test]
fn boundary_distance_is_inclusive() {
    let algo = PointIsolationAlg::new(cube_config(2.0f64, 1.0));
    let points = vec![[0.0, 0.0, 0.0], [0.0, 0.0, 1.0]];
    assert_eq!(
        sorted(algo.remove_isolated_points(&points).unwrap()),
        vec![0, 1]
    );
}

#[test]
fn nudging_past_the_boundary_isolates_the_pair() {
    let algo = PointIsolationAlg::new(cube_config(2.0f64, 1.0));
    let points = vec![[0.0, 0.0, 0.0], [0.0, 0.0, 1.0 + 1e-9]];
    assert_eq!(sorted(algo.remove_isolated_points(&points).unwrap()), vec![]);
}

#[test]
fn coincident_duplicates_are_mutual_neighbors() {
    let algo = PointIsolationAlg::new(cube_config(2.0f64, 0.25));
    let points = vec![[1.5, 1.5, 1.5], [1.5, 1.5, 1.5], [-1.5, -1.5, -1.5]];
    assert_eq!(
        sorted(algo.remove_isolated_points(&points).unwrap()),
        vec![0, 1]
    );
}

/// A degenerate range still produces a usable one-cell-thick axis.
#[test]
fn degenerate_axis_range_is_usable() {
    let flat = CoordRange::new(1.0f64, 1.0);
    let config = IsolationConfig {
        range_x: CoordRange::new(-2.0, 2.0),
        range_y: flat,
        range_z: CoordRange::new(-2.0, 2.0),
        radius2: 1.0,
        ..IsolationConfig::default()
    };
    let algo = PointIsolationAlg::new(config);

    let points = vec![[0.0, 1.0, 0.0], [0.5, 1.0, 0.0], [-1.9, 1.0, 1.9]];
    assert_eq!(
        sorted(algo.remove_isolated_points(&points).unwrap()),
        vec![0, 1]
    );
}

/// Starving the memory budget degrades the grid, not the answer.
#[test]
fn memory_starved_grid_agrees_with_the_oracle() {
    let mut config = cube_config(2.0f64, 1.0);
    config.max_memory = 1;
    let algo = PointIsolationAlg::new(config);

    let points = vec![
        [1.0, 1.0, 1.0],
        [-1.0, -1.0, -1.0],
        [0.5, 1.0, 1.0],
        [1.9, 1.9, 1.9],
        [0.0, 0.0, 0.0],
    ];
    assert_eq!(
        sorted(algo.remove_isolated_points(&points).unwrap()),
        sorted(algo.brute_force_remove_isolated_points(&points))
    );
}

#[test]
fn empty_input_yields_an_empty_result() {
    let algo = PointIsolationAlg::new(cube_config(2.0f64, 1.0));
    let points: Vec<[f64; 3]> = Vec::new();
    assert_eq!(algo.remove_isolated_points(&points).unwrap(), vec![]);
}

// =============================================================================
// ERROR REPORTING
// =============================================================================

#[test]
fn out_of_volume_points_are_reported_with_axis_and_value() {
    let algo = PointIsolationAlg::new(cube_config(2.0f64, 1.0));
    let points = vec![[0.0, 0.0, 0.0], [3.0, 0.0, 0.0]];

    let error = algo.remove_isolated_points(&points).unwrap_err();
    assert_eq!(error.axis, Axis::X);
    assert!(error.to_string().contains("x = 3"));
}

#[test]
fn validation_reports_every_defect_at_once() {
    let mut config = cube_config(2.0f64, -1.0);
    config.range_x = CoordRange::new(5.0, -5.0);

    let error = PointIsolationAlg::validate_config(&config).unwrap_err();
    assert_eq!(error.problems.len(), 2);
}

// =============================================================================
// STAR-DISTRIBUTED POINTS
// =============================================================================

/// Points on each coordinate semi-axis, sparser and sparser away from the
/// origin: one point per semi-axis at `distance`, `distance / 2`, ... down
/// to `distance / 2^(shells - 1)`, shell by shell, with the origin
/// appended last.
///
/// The key characteristic is that points farther than the isolation
/// radius from the origin are isolated, which makes the expected count a
/// closed formula per radius level.
fn create_star_of_points(shells: u32, distance: f64) -> Vec<[f64; 3]> {
    let mut points = Vec::with_capacity(1 + 6 * shells as usize);
    let mut distance = distance;
    for _ in 0..shells {
        points.push([distance, 0.0, 0.0]);
        points.push([-distance, 0.0, 0.0]);
        points.push([0.0, distance, 0.0]);
        points.push([0.0, -distance, 0.0]);
        points.push([0.0, 0.0, distance]);
        points.push([0.0, 0.0, -distance]);
        distance /= 2.0;
    }
    points.push([0.0, 0.0, 0.0]);
    points
}

/// Sweeps shrinking isolation radii over a star of points; each halving of
/// the radius strips the outermost remaining shell.
#[test]
fn star_of_points_shrinking_radius_sweep() {
    const LEVELS: u32 = 5;
    const STAR_RADIUS: f64 = 1.0;

    let points = create_star_of_points(LEVELS, STAR_RADIUS);
    let total = points.len();
    assert_eq!(total, 1 + 6 * LEVELS as usize);

    let mut config = cube_config(2.0f64, 1.0);
    let mut algo = PointIsolationAlg::new(config);

    // a step smaller than the smallest distance between shells, so each
    // tested radius falls strictly between two shells
    let epsilon_step = STAR_RADIUS / f64::from(2 << LEVELS);
    let mut base_radius = STAR_RADIUS;

    for level in (1..=LEVELS).rev() {
        base_radius /= 2.0;
        let radius = base_radius + epsilon_step;
        config.radius2 = radius * radius;
        algo.reconfigure(config);

        // radius covers `level` shells plus the origin; with a single
        // shell left, even the origin loses its last neighbor
        let expected_count = if level > 1 { 1 + 6 * level as usize } else { 0 };
        let expected: Vec<usize> = (total - expected_count..total).collect();

        let result = sorted(algo.remove_isolated_points(&points).unwrap());
        assert_eq!(result, expected, "radius {radius} (level {level})");
        assert_eq!(
            result,
            sorted(algo.brute_force_remove_isolated_points(&points)),
            "oracle disagreement at radius {radius}"
        );
    }
}
