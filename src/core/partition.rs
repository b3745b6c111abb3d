//! Space partition: points binned into a uniform grid.
//!
//! A [`SpacePartition`] covers a box described by three coordinate ranges
//! with cubic cells of a fixed edge length, and sorts points into the cell
//! that contains them. Cells store indices into the caller's point slice,
//! never the points themselves, so the partition is cheap to build and
//! discard while the caller retains ownership of the data.
//!
//! A point outside the covered volume is a hard error
//! ([`OutOfVolumeError`]), not a silently dropped point: downstream
//! neighborhood queries assume every input point landed in some cell.

use num_traits::Float;
use thiserror::Error;

use crate::core::grid::{CellIndex, CellOffset, GridContainer, GridIndexer};
use crate::geometry::position::Position;
use crate::geometry::range::CoordRange;
use crate::geometry::traits::coordinate::CoordinateScalar;

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Coordinate axis, used to report which range a point violated.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    /// The x axis.
    X,
    /// The y axis.
    Y,
    /// The z axis.
    Z,
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::X => write!(f, "x"),
            Self::Y => write!(f, "y"),
            Self::Z => write!(f, "z"),
        }
    }
}

/// A point fell outside the volume covered by the partition.
///
/// Raised by [`SpacePartition::fill`] and [`SpacePartition::point_index`]
/// for the first offending point; carries the axis on which the point
/// escaped and the offending coordinate. The coordinate is captured as a
/// string so the error stays non-generic.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("point out of the partition volume ({axis} = {coordinate})")]
pub struct OutOfVolumeError {
    /// Axis on which the coordinate left the configured range.
    pub axis: Axis,
    /// The offending coordinate value.
    pub coordinate: String,
}

// =============================================================================
// SPACE PARTITION
// =============================================================================

/// A container of point indices sorted into cubic grid cells.
///
/// # Examples
///
/// ```
/// use point_isolation::core::partition::SpacePartition;
/// use point_isolation::geometry::range::CoordRange;
///
/// let range = CoordRange::new(0.0, 4.0);
/// let mut partition = SpacePartition::new(range, range, range, 1.0);
///
/// let points = vec![[0.5, 0.5, 0.5], [0.7, 0.5, 0.5], [3.5, 3.5, 3.5]];
/// partition.fill(&points).unwrap();
///
/// // the first two points share a cell
/// let cell = partition.point_index(&points[0]).unwrap();
/// assert_eq!(partition.cell(cell), &[0, 1]);
/// ```
#[derive(Clone, Debug)]
pub struct SpacePartition<T>
where
    T: CoordinateScalar,
{
    /// Length of the side of each cubic cell.
    cell_size: T,
    range_x: CoordRange<T>,
    range_y: CoordRange<T>,
    range_z: CoordRange<T>,
    grid: GridContainer<usize>,
}

impl<T> SpacePartition<T>
where
    T: CoordinateScalar,
{
    /// Constructs the partition over a given volume with the given cell size.
    ///
    /// Grid dimensions are `ceil(range.size() / cell_size)` per axis; a
    /// degenerate (empty) range still gets one cell on its axis so the
    /// partition stays usable.
    #[must_use]
    pub fn new(
        range_x: CoordRange<T>,
        range_y: CoordRange<T>,
        range_z: CoordRange<T>,
        cell_size: T,
    ) -> Self {
        let dims = dice_volume(&range_x, &range_y, &range_z, cell_size);
        Self {
            cell_size,
            range_x,
            range_y,
            range_z,
            grid: GridContainer::new(dims),
        }
    }

    /// Fills the partition with the given points, storing each point's
    /// position in its slice.
    ///
    /// Fails fast on the first point outside the covered volume. Points
    /// inserted before the failure are left in place; the whole operation
    /// must be treated as failed by the caller.
    ///
    /// # Errors
    ///
    /// [`OutOfVolumeError`] if a point's coordinate on some axis falls
    /// outside the configured range.
    pub fn fill<P>(&mut self, points: &[P]) -> Result<(), OutOfVolumeError>
    where
        P: Position<Coord = T>,
    {
        for (position, point) in points.iter().enumerate() {
            let index = self.point_index(point)?;
            self.grid.insert(index, position);
        }
        Ok(())
    }

    /// Returns the flat index of the cell owning the given point, without
    /// inserting anything.
    ///
    /// # Errors
    ///
    /// [`OutOfVolumeError`] if the point lies outside the covered volume.
    pub fn point_index<P>(&self, point: &P) -> Result<CellIndex, OutOfVolumeError>
    where
        P: Position<Coord = T>,
    {
        let xc = self.cell_number(point.x(), &self.range_x);
        if !self.grid.has_x(xc) {
            return Err(out_of_volume(Axis::X, point.x()));
        }

        let yc = self.cell_number(point.y(), &self.range_y);
        if !self.grid.has_y(yc) {
            return Err(out_of_volume(Axis::Y, point.y()));
        }

        let zc = self.cell_number(point.z(), &self.range_z);
        if !self.grid.has_z(zc) {
            return Err(out_of_volume(Axis::Z, point.z()));
        }

        let index = self.grid.indexer().index([xc, yc, zc]);
        Ok(usize::try_from(index).expect("cell id validated on every axis"))
    }

    /// Returns the index manager of the underlying grid.
    #[must_use]
    pub const fn indexer(&self) -> &GridIndexer {
        self.grid.indexer()
    }

    /// Returns whether there is a cell with the specified signed index.
    #[must_use]
    pub fn has(&self, index: CellOffset) -> bool {
        self.grid.has(index)
    }

    /// Returns the cell with the specified flat index.
    ///
    /// Panics if the index is out of range.
    #[must_use]
    pub fn cell(&self, index: CellIndex) -> &[usize] {
        self.grid.cell(index)
    }

    /// Returns the cell at the given signed flat index, or `None` when the
    /// index falls outside the grid.
    #[must_use]
    pub fn get(&self, index: CellOffset) -> Option<&[usize]> {
        self.grid.get(index)
    }

    /// Iterates over all cells in flat-index order.
    pub fn cells(&self) -> std::slice::Iter<'_, Vec<usize>> {
        self.grid.cells()
    }

    /// Cell number for a coordinate in the specified range.
    ///
    /// Flooring (not truncation) keeps coordinates just below the lower
    /// bound in cell -1, where the per-axis bounds check rejects them.
    fn cell_number(&self, c: T, range: &CoordRange<T>) -> CellOffset {
        let cell = Float::floor(range.offset(c) / self.cell_size);
        cell.to_isize().unwrap_or(if cell < T::zero() {
            CellOffset::MIN
        } else {
            CellOffset::MAX
        })
    }
}

fn out_of_volume<T: CoordinateScalar>(axis: Axis, coordinate: T) -> OutOfVolumeError {
    OutOfVolumeError {
        axis,
        coordinate: coordinate.to_string(),
    }
}

/// Dimensions of a grid dicing the given volume with cubic cells of the
/// specified size, at least one cell per axis.
pub(crate) fn dice_volume<T>(
    range_x: &CoordRange<T>,
    range_y: &CoordRange<T>,
    range_z: &CoordRange<T>,
    cell_size: T,
) -> [usize; 3]
where
    T: CoordinateScalar,
{
    [
        axis_cells(range_x, cell_size),
        axis_cells(range_y, cell_size),
        axis_cells(range_z, cell_size),
    ]
}

fn axis_cells<T>(range: &CoordRange<T>, cell_size: T) -> usize
where
    T: CoordinateScalar,
{
    let cells = Float::ceil(range.size() / cell_size);
    if cells <= T::zero() {
        // degenerate range: keep the axis one cell wide
        return 1;
    }
    cells.to_usize().unwrap_or(usize::MAX)
}
