//! # point-isolation
//!
//! Spatial isolation queries on 3D point clouds: given a set of points, a
//! bounding volume and an isolation radius R, find the points that are
//! **not** isolated — each has at least one other point within R.
//!
//! The crate is a filtering building block: the caller owns the points
//! (any type implementing [`Position`](geometry::position::Position)) and
//! gets back indices into its own sequence.
//!
//! # Algorithm
//!
//! Points are sorted into a uniform grid of cubic cells
//! ([`SpacePartition`](core::partition::SpacePartition)). The cell edge is
//! chosen as `R / sqrt(3)`, the largest size for which any two points
//! sharing a cell are guaranteed mutual neighbors: such cells are resolved
//! without a single distance computation. The remaining points are
//! compared only against the cells of a precomputed neighborhood whose
//! extent is derived from the ratio of radius to cell size. Since the grid
//! eagerly allocates one container per cell, the cell size is doubled
//! until the grid fits a configurable memory budget, trading search
//! precision for bounded memory.
//!
//! # Basic Usage
//!
//! ```rust
//! use point_isolation::prelude::*;
//!
//! let config = IsolationConfig {
//!     range_x: CoordRange::new(-2.0, 2.0),
//!     range_y: CoordRange::new(-2.0, 2.0),
//!     range_z: CoordRange::new(-2.0, 2.0),
//!     radius2: 1.0,
//!     ..IsolationConfig::default()
//! };
//! let algo = PointIsolationAlg::new(config);
//!
//! let points = vec![
//!     [1.0, 1.0, 1.0],
//!     [-1.0, -1.0, -1.0],
//!     [0.5, 1.0, 1.0], // within one radius of the first point
//! ];
//!
//! let mut non_isolated = algo.remove_isolated_points(&points).unwrap();
//! non_isolated.sort_unstable();
//! assert_eq!(non_isolated, vec![0, 2]);
//! ```
//!
//! # Errors
//!
//! Failures are surfaced to the caller unchanged, never swallowed:
//!
//! - [`OutOfVolumeError`](core::partition::OutOfVolumeError) — a point
//!   fell outside the configured volume; fail-fast, carries the axis and
//!   the offending coordinate.
//! - [`ConfigError`](core::isolation::ConfigError) — explicit validation
//!   via [`PointIsolationAlg::validate_config`](core::isolation::PointIsolationAlg::validate_config)
//!   found defects; every problem is collected and reported together.

#![forbid(unsafe_code)]

/// Primary data structures and algorithms: the uniform grid, the space
/// partition, and the isolation algorithm itself.
pub mod core {
    pub mod grid;
    pub mod isolation;
    pub mod partition;
    pub use grid::*;
    pub use isolation::*;
    pub use partition::*;
}

/// Geometric types: coordinate ranges, the point-position capability, and
/// the coordinate scalar abstraction.
pub mod geometry {
    pub mod position;
    pub mod range;
    /// Traits module containing the coordinate scalar abstraction.
    pub mod traits {
        pub mod coordinate;
        pub use coordinate::*;
    }
    pub use position::*;
    pub use range::*;
    pub use traits::*;
}

/// A prelude module that re-exports the commonly used types.
pub mod prelude {
    pub use crate::core::{grid::*, isolation::*, partition::*};
    pub use crate::geometry::{position::*, range::*, traits::coordinate::*};
}
