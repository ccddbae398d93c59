use crate::units::{ColumnsCount, Dimension, EdgesCount, NodesCount, RowsCount};


#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct SquareGridDimensions {
    dimension: Dimension,
}

impl SquareGridDimensions {
    pub fn new(dimension: Dimension) -> SquareGridDimensions {
        SquareGridDimensions { dimension }
    }

    #[inline(always)]
    pub fn dimension(&self) -> Dimension {
        self.dimension
    }

    #[inline(always)]
    pub fn size(&self) -> NodesCount {
        NodesCount(self.dimension.0 * self.dimension.0)
    }

    #[inline(always)]
    pub fn rows(&self) -> RowsCount {
        RowsCount(self.dimension.0)
    }

    #[inline(always)]
    pub fn columns(&self) -> ColumnsCount {
        ColumnsCount(self.dimension.0)
    }

    /// Node count and an edge capacity hint.
    /// A perfect maze needs exactly `cells - 1` passages, which is all we ever carve.
    pub fn graph_size(&self) -> (NodesCount, EdgesCount) {
        let cells_count = self.size();
        let edges_count_hint = cells_count.0.saturating_sub(1);
        (cells_count, EdgesCount(edges_count_hint))
    }
}
