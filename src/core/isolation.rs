//! Detection of isolated points in 3D space.
//!
//! A point is isolated when no other point of the input lies within the
//! isolation radius R of it. [`PointIsolationAlg`] returns the complement:
//! the indices of all points that do have a neighbor within R.
//!
//! The basic method is brute force, comparing each point with all others
//! (kept as [`PointIsolationAlg::brute_force_remove_isolated_points`], a
//! correctness oracle for tests). The optimized path sorts points into a
//! uniform grid of cubic cells sized so that, whenever possible, any two
//! points sharing a cell are guaranteed mutual neighbors; the remaining
//! comparisons are confined to a precomputed neighborhood of cells around
//! each point. The grid allocates one list per cell whether occupied or
//! not, so the cell size is enlarged until the grid fits the configured
//! memory budget.

use num_traits::Float;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::grid::{CellId, CellOffset, GridIndexer};
use crate::core::partition::{Axis, OutOfVolumeError, SpacePartition, dice_volume};
use crate::geometry::position::{Position, squared_distance};
use crate::geometry::range::CoordRange;
use crate::geometry::traits::coordinate::CoordinateScalar;

/// Default grid memory budget: 100 MiB.
pub const DEFAULT_MAX_MEMORY: usize = 100 * 1_048_576;

// =============================================================================
// CONFIGURATION
// =============================================================================

/// Configuration of [`PointIsolationAlg`].
///
/// Describes the volume the points span and the square of the isolation
/// radius. The volume information is used to size the grid and is not
/// checked against the points up front; a point outside the volume is
/// reported by [`PointIsolationAlg::remove_isolated_points`] as an
/// [`OutOfVolumeError`].
///
/// No validation happens on construction or reconfiguration; call
/// [`PointIsolationAlg::validate_config`] explicitly when desired.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct IsolationConfig<T>
where
    T: CoordinateScalar,
{
    /// Range in x of the covered volume.
    pub range_x: CoordRange<T>,
    /// Range in y of the covered volume.
    pub range_y: CoordRange<T>,
    /// Range in z of the covered volume.
    pub range_z: CoordRange<T>,
    /// Square of the isolation radius.
    pub radius2: T,
    /// Grid memory budget in bytes; the cell size is doubled until the
    /// grid's cell containers fit. `0` disables the budget entirely.
    ///
    /// The budget is a soft floor: once the grid is down to a single cell
    /// it cannot shrink further, and the remaining cost is accepted even
    /// if it exceeds the budget.
    #[serde(default = "default_max_memory")]
    pub max_memory: usize,
}

impl<T> Default for IsolationConfig<T>
where
    T: CoordinateScalar,
{
    fn default() -> Self {
        Self {
            range_x: CoordRange::default(),
            range_y: CoordRange::default(),
            range_z: CoordRange::default(),
            radius2: T::zero(),
            max_memory: DEFAULT_MAX_MEMORY,
        }
    }
}

const fn default_max_memory() -> usize {
    DEFAULT_MAX_MEMORY
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// A single defect found in an [`IsolationConfig`].
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ConfigProblem {
    /// The squared isolation radius is negative.
    #[error("invalid radius squared ({radius2})")]
    NegativeRadius2 {
        /// The offending value.
        radius2: String,
    },
    /// The squared isolation radius is NaN or infinite.
    #[error("non-finite radius squared ({radius2})")]
    NonFiniteRadius2 {
        /// The offending value.
        radius2: String,
    },
    /// An axis range has its lower bound above its upper bound.
    #[error("invalid {axis} range ({lower} to {upper})")]
    InvalidRange {
        /// Axis of the invalid range.
        axis: Axis,
        /// Lower bound of the invalid range.
        lower: String,
        /// Upper bound of the invalid range.
        upper: String,
    },
}

/// Aggregated report of every defect in an [`IsolationConfig`].
///
/// Validation collects all problems before reporting, so the caller gets
/// the complete picture in one pass instead of fixing fields one at a
/// time.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("{}", format_problems(.problems))]
pub struct ConfigError {
    /// Every problem found, in field declaration order.
    pub problems: Vec<ConfigProblem>,
}

fn format_problems(problems: &[ConfigProblem]) -> String {
    use std::fmt::Write as _;

    let mut message = format!("{} configuration errors found:", problems.len());
    for problem in problems {
        let _ = write!(message, "\n * {problem}");
    }
    message
}

// =============================================================================
// ALGORITHM
// =============================================================================

/// Algorithm to detect isolated points.
///
/// Point `i` is non-isolated when some other point `j` satisfies
/// `|r_i - r_j|^2 <= radius2`; the comparison is inclusive, so two points
/// exactly one radius apart are mutual neighbors. Self-comparison is
/// excluded by position in the input slice, not by value, so coincident
/// duplicate points count as neighbors of each other.
///
/// The algorithm can be run on any slice of points whose type implements
/// [`Position`]. A typical cycle of use:
///
/// ```
/// use point_isolation::prelude::*;
///
/// let config = IsolationConfig {
///     range_x: CoordRange::new(-1.0, 1.0),
///     range_y: CoordRange::new(-1.0, 1.0),
///     range_z: CoordRange::new(-5.0, 5.0),
///     radius2: 0.25,
///     ..IsolationConfig::default()
/// };
/// let algo = PointIsolationAlg::new(config);
///
/// let points = vec![[0.0, 0.0, 0.4], [0.0, 0.0, 0.0], [0.0, 0.0, 3.0]];
/// let mut indices = algo.remove_isolated_points(&points).unwrap();
/// indices.sort_unstable();
/// assert_eq!(indices, vec![0, 1]); // the point at z = 3 is isolated
/// ```
///
/// The configuration can be replaced between runs with
/// [`reconfigure`](Self::reconfigure); nothing else survives a run, each
/// call building and discarding its own grid.
#[derive(Clone, Debug)]
pub struct PointIsolationAlg<T>
where
    T: CoordinateScalar,
{
    config: IsolationConfig<T>,
}

impl<T> PointIsolationAlg<T>
where
    T: CoordinateScalar,
{
    /// Creates the algorithm with the given configuration.
    ///
    /// No validation is performed; see [`validate_config`](Self::validate_config).
    #[must_use]
    pub const fn new(config: IsolationConfig<T>) -> Self {
        Self { config }
    }

    /// Replaces the configuration wholesale (no validation is performed).
    pub fn reconfigure(&mut self, config: IsolationConfig<T>) {
        self.config = config;
    }

    /// Returns the current configuration.
    #[must_use]
    pub const fn configuration(&self) -> &IsolationConfig<T> {
        &self.config
    }

    /// Checks a configuration for defects, collecting every problem found.
    ///
    /// # Errors
    ///
    /// [`ConfigError`] listing all defects: a negative or non-finite
    /// squared radius and any axis range with inverted bounds.
    pub fn validate_config(config: &IsolationConfig<T>) -> Result<(), ConfigError> {
        let mut problems = Vec::new();

        if !config.radius2.is_finite_generic() {
            problems.push(ConfigProblem::NonFiniteRadius2 {
                radius2: config.radius2.to_string(),
            });
        } else if config.radius2 < T::zero() {
            problems.push(ConfigProblem::NegativeRadius2 {
                radius2: config.radius2.to_string(),
            });
        }

        let ranges = [
            (Axis::X, &config.range_x),
            (Axis::Y, &config.range_y),
            (Axis::Z, &config.range_z),
        ];
        for (axis, range) in ranges {
            if !range.valid() {
                problems.push(ConfigProblem::InvalidRange {
                    axis,
                    lower: range.lower.to_string(),
                    upper: range.upper.to_string(),
                });
            }
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(ConfigError { problems })
        }
    }

    /// Returns the largest cell edge such that any two points sharing a
    /// cell are guaranteed to be within `radius` of each other.
    ///
    /// The worst case is a pair at opposite corners, one cube diagonal
    /// apart: `edge * sqrt(3) <= radius` bounds the edge to
    /// `radius / sqrt(3)`.
    #[must_use]
    pub fn maximum_optimal_cell_size(radius: T) -> T {
        let three = T::one() + T::one() + T::one();
        radius / Float::sqrt(three)
    }

    /// Returns the indices of the points that are not isolated.
    ///
    /// The index of a point is its position in `points`; the order of the
    /// returned indices is unspecified.
    ///
    /// The configured volume must contain every point. The squared radius
    /// must be positive (a zero radius cannot size the grid).
    ///
    /// # Errors
    ///
    /// [`OutOfVolumeError`] if a point falls outside the configured
    /// volume.
    ///
    /// # Panics
    ///
    /// If the configured squared radius is not positive.
    pub fn remove_isolated_points<P>(&self, points: &[P]) -> Result<Vec<usize>, OutOfVolumeError>
    where
        P: Position<Coord = T>,
    {
        let radius = Float::sqrt(self.config.radius2);
        // a zero radius would zero the cell size and stall the budget loop
        assert!(
            radius > T::zero(),
            "isolation radius must be positive to size the grid"
        );
        let cell_size = self.compute_cell_size(radius);

        let mut partition = SpacePartition::new(
            self.config.range_x,
            self.config.range_y,
            self.config.range_z,
            cell_size,
        );

        // holds unless memory pressure forced the cell size past the
        // diagonal bound
        let cell_contained_in_isolation_sphere =
            cell_size <= Self::maximum_optimal_cell_size(radius);

        // cells that might contain points closer than R to a reference
        // cell: R in cell-size units, rounded up, on every axis
        let neigh_extent = Float::ceil(radius / cell_size)
            .to_isize()
            .unwrap_or(CellOffset::MAX);
        let neighborhood = Self::build_neighborhood(
            partition.indexer(),
            neigh_extent,
            !cell_contained_in_isolation_sphere,
        );

        tracing::debug!(
            "partition: cell size {cell_size}, grid {nx} x {ny} x {nz} ({cells} cells), \
             neighborhood extent {neigh_extent}, own-cell check {own_cell}",
            nx = partition.indexer().len_x(),
            ny = partition.indexer().len_y(),
            nz = partition.indexer().len_z(),
            cells = partition.indexer().len(),
            own_cell = !cell_contained_in_isolation_sphere,
        );

        partition.fill(points)?;

        let mut non_isolated = Vec::new();
        for (base, cell_points) in (0..).zip(partition.cells()) {
            // any two points sharing a cell this small are mutual
            // neighbors, no distance checks needed
            if cell_contained_in_isolation_sphere && cell_points.len() > 1 {
                non_isolated.extend_from_slice(cell_points);
                continue;
            }

            for &point in cell_points {
                if !self.is_point_isolated_within_neighborhood(
                    points,
                    &partition,
                    base,
                    point,
                    &neighborhood,
                ) {
                    non_isolated.push(point);
                }
            }
        }

        Ok(non_isolated)
    }

    /// Brute-force reference implementation of
    /// [`remove_isolated_points`](Self::remove_isolated_points).
    ///
    /// Exhaustive O(n²) pairwise comparison, independent of the configured
    /// volume (it cannot fail). Intended as a correctness oracle for
    /// small-scale verification, not for production use.
    #[must_use]
    pub fn brute_force_remove_isolated_points<P>(&self, points: &[P]) -> Vec<usize>
    where
        P: Position<Coord = T>,
    {
        let mut non_isolated = Vec::new();
        for (i, point) in points.iter().enumerate() {
            let close = points.iter().enumerate().any(|(j, other)| {
                i != j && squared_distance(point, other) <= self.config.radius2
            });
            if close {
                non_isolated.push(i);
            }
        }
        non_isolated
    }

    /// Cell size to be used: the largest size preserving the same-cell
    /// guarantee, doubled until the grid fits the memory budget.
    fn compute_cell_size(&self, radius: T) -> T {
        let mut cell_size = Self::maximum_optimal_cell_size(radius);

        if self.config.max_memory == 0 {
            return cell_size;
        }

        let two = T::one() + T::one();
        loop {
            let dims = dice_volume(
                &self.config.range_x,
                &self.config.range_y,
                &self.config.range_z,
                cell_size,
            );
            let cells = dims[0].saturating_mul(dims[1]).saturating_mul(dims[2]);
            if cells <= 1 {
                break; // the grid cannot shrink any further
            }

            let memory = cells.saturating_mul(std::mem::size_of::<Vec<usize>>());
            if memory < self.config.max_memory {
                break;
            }

            cell_size = cell_size * two;
        }

        cell_size
    }

    /// Flat-index deltas of all cells within `neigh_extent` cells of a
    /// reference cell on each axis, excluding the reference cell itself.
    ///
    /// When `include_own_cell` is set the zero offset is placed at the
    /// front of the list, so points sharing the reference cell are
    /// cross-checked like any other neighbor.
    fn build_neighborhood(
        indexer: &GridIndexer,
        neigh_extent: CellOffset,
        include_own_cell: bool,
    ) -> Vec<CellOffset> {
        let side = (2 * neigh_extent + 1).unsigned_abs();
        let mut neighborhood = Vec::with_capacity(side * side * side - 1 + usize::from(include_own_cell));

        if include_own_cell {
            neighborhood.push(0);
        }

        let origin: CellId = [0, 0, 0];
        for ix in -neigh_extent..=neigh_extent {
            for iy in -neigh_extent..=neigh_extent {
                for iz in -neigh_extent..=neigh_extent {
                    if ix == 0 && iy == 0 && iz == 0 {
                        continue;
                    }
                    neighborhood.push(indexer.offset(origin, [ix, iy, iz]));
                }
            }
        }

        neighborhood
    }

    /// Returns whether a point is isolated from all points stored in one
    /// cell, self-comparison excluded by input position.
    fn is_point_isolated_from<P>(&self, points: &[P], point: usize, other_points: &[usize]) -> bool
    where
        P: Position<Coord = T>,
    {
        other_points.iter().all(|&other| {
            other == point || squared_distance(&points[point], &points[other]) > self.config.radius2
        })
    }

    /// Returns whether a point is isolated within the neighborhood of its
    /// cell, skipping neighbor offsets that leave the grid.
    fn is_point_isolated_within_neighborhood<P>(
        &self,
        points: &[P],
        partition: &SpacePartition<T>,
        base: CellOffset,
        point: usize,
        neighborhood: &[CellOffset],
    ) -> bool
    where
        P: Position<Coord = T>,
    {
        neighborhood.iter().all(|&offset| {
            partition
                .get(base + offset)
                .is_none_or(|other_points| self.is_point_isolated_from(points, point, other_points))
        })
    }
}
