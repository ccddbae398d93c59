use std::fmt;

use crate::cells::Cartesian2DCoordinate;
use crate::grid_dimensions::SquareGridDimensions;
use crate::units::{ColumnIndex, Dimension, RowIndex};

/// Iterate all cells of a grid in row major order.
#[derive(Clone)]
pub struct CellIter {
    dimensions: SquareGridDimensions,
    current_cell_number: usize,
    cells_count: usize,
}

impl CellIter {
    pub fn new(dimensions: SquareGridDimensions) -> CellIter {
        CellIter {
            dimensions,
            current_cell_number: 0,
            cells_count: dimensions.size().0,
        }
    }
}

impl fmt::Debug for CellIter {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f,
               "CellIter :: current_cell_number: {:?}, cells_count: {:?}",
               self.current_cell_number,
               self.cells_count)
    }
}

impl ExactSizeIterator for CellIter {} // default impl using size_hint()
impl Iterator for CellIter {
    type Item = Cartesian2DCoordinate;
    fn next(&mut self) -> Option<Self::Item> {
        if self.current_cell_number < self.cells_count {
            let coord = Cartesian2DCoordinate::from_row_major_index(self.current_cell_number,
                                                                    &self.dimensions);
            self.current_cell_number += 1;
            Some(coord)
        } else {
            None
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let lower_bound = self.cells_count - self.current_cell_number;
        let upper_bound = lower_bound;
        (lower_bound, Some(upper_bound))
    }
}

/// Iterate a grid one whole row at a time, top row first.
#[derive(Debug, Copy, Clone)]
pub struct RowIter {
    current_row: usize,
    dimension: Dimension,
}

impl RowIter {
    pub fn new(dimensions: SquareGridDimensions) -> RowIter {
        RowIter {
            current_row: 0,
            dimension: dimensions.dimension(),
        }
    }
}

impl ExactSizeIterator for RowIter {} // default impl using size_hint()
impl Iterator for RowIter {
    type Item = Vec<Cartesian2DCoordinate>;
    fn next(&mut self) -> Option<Self::Item> {
        let Dimension(length) = self.dimension;
        if self.current_row >= length {
            return None;
        }

        let row_index = self.current_row;
        let coords = (0..length)
            .map(|i| Cartesian2DCoordinate::from_row_column_indices(ColumnIndex(i), RowIndex(row_index)))
            .collect();
        self.current_row += 1;
        Some(coords)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let lower_bound = self.dimension.0 - self.current_row;
        (lower_bound, Some(lower_bound))
    }
}
