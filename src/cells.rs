use smallvec::SmallVec;
use std::fmt;

use crate::grid_dimensions::SquareGridDimensions;
use crate::units::{ColumnIndex, Dimension, RowIndex};

pub type CoordinateSmallVec = SmallVec<[Cartesian2DCoordinate; 4]>;

#[derive(Hash, Eq, PartialEq, Copy, Clone, Debug, Ord, PartialOrd)]
pub struct Cartesian2DCoordinate {
    pub x: u32,
    pub y: u32,
}

impl Cartesian2DCoordinate {
    pub fn new(x: u32, y: u32) -> Cartesian2DCoordinate {
        Cartesian2DCoordinate { x, y }
    }

    #[inline]
    pub fn from_row_major_index(index: usize, dimensions: &SquareGridDimensions) -> Cartesian2DCoordinate {
        let Dimension(width) = dimensions.dimension();
        let x = index % width;
        let y = index / width;

        Cartesian2DCoordinate::new(x as u32, y as u32)
    }

    #[inline]
    pub fn from_row_column_indices(col_index: ColumnIndex, row_index: RowIndex) -> Cartesian2DCoordinate {
        let (ColumnIndex(col), RowIndex(row)) = (col_index, row_index);
        Cartesian2DCoordinate::new(col as u32, row as u32)
    }

    /// Creates a new coordinate offset 1 cell away in the given direction.
    /// Returns None if the coordinate is not representable (off the top or left edge).
    /// The result is not checked against any grid's dimensions.
    pub fn offset(self, dir: CompassPrimary) -> Option<Cartesian2DCoordinate> {
        let (x, y) = (self.x, self.y);
        match dir {
            CompassPrimary::North => y.checked_sub(1).map(|y| Cartesian2DCoordinate::new(x, y)),
            CompassPrimary::South => y.checked_add(1).map(|y| Cartesian2DCoordinate::new(x, y)),
            CompassPrimary::East => x.checked_add(1).map(|x| Cartesian2DCoordinate::new(x, y)),
            CompassPrimary::West => x.checked_sub(1).map(|x| Cartesian2DCoordinate::new(x, y)),
        }
    }

    /// The direction leading from `self` to an orthogonally adjacent `other`.
    pub fn direction_to(self, other: Cartesian2DCoordinate) -> Option<CompassPrimary> {
        CompassPrimary::ALL
            .iter()
            .cloned()
            .find(|dir| self.offset(*dir) == Some(other))
    }
}

impl fmt::Display for Cartesian2DCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// The four moves out of a square cell. North is up the screen (the cell's top wall).
#[derive(Eq, PartialEq, Copy, Clone, Debug, Hash)]
pub enum CompassPrimary {
    North,
    South,
    East,
    West,
}

impl CompassPrimary {
    /// Up, right, down, left.
    pub const ALL: [CompassPrimary; 4] = [CompassPrimary::North,
                                          CompassPrimary::East,
                                          CompassPrimary::South,
                                          CompassPrimary::West];

    /// The direction that faces back the way we came. Applying it twice is the identity.
    pub fn opposite(self) -> CompassPrimary {
        match self {
            CompassPrimary::North => CompassPrimary::South,
            CompassPrimary::South => CompassPrimary::North,
            CompassPrimary::East => CompassPrimary::West,
            CompassPrimary::West => CompassPrimary::East,
        }
    }
}

/// The wall flags of one cell, `true` meaning the wall is standing.
///
/// Derived from the grid's passages, so a cell's wall towards a neighbour and the
/// neighbour's wall back towards it always agree.
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub struct Walls {
    pub top: bool,
    pub right: bool,
    pub bottom: bool,
    pub left: bool,
}

impl Walls {
    pub fn closed() -> Walls {
        Walls {
            top: true,
            right: true,
            bottom: true,
            left: true,
        }
    }

    pub fn has_wall(&self, dir: CompassPrimary) -> bool {
        match dir {
            CompassPrimary::North => self.top,
            CompassPrimary::East => self.right,
            CompassPrimary::South => self.bottom,
            CompassPrimary::West => self.left,
        }
    }
}
