use petgraph::{Graph, Undirected};
use petgraph::graph;
pub use petgraph::graph::IndexType;
use std::error::Error;
use std::fmt;
use std::rc::Rc;
use std::slice;

use crate::cells::{Cartesian2DCoordinate, CompassPrimary, CoordinateSmallVec, Walls};
use crate::grid_dimensions::SquareGridDimensions;
use crate::grid_iterators::{CellIter, RowIter};
use crate::grid_traits::{GridDisplay, PayloadSlots};
use crate::placement::PlacementError;
use crate::units::{ColumnsCount, Dimension, EdgesCount, NodesCount, RowsCount};


/// Per cell data held on each graph node.
#[derive(Debug, Clone, PartialEq)]
pub struct CellState<Payload> {
    pub visited: bool,
    pub payload: Option<Payload>,
}

impl<Payload> Default for CellState<Payload> {
    fn default() -> Self {
        CellState {
            visited: false,
            payload: None,
        }
    }
}

/// A square grid of cells where every passage (a knocked down wall pair) is one undirected
/// edge between two adjacent cells.
pub struct Grid<GridIndexType: IndexType, Payload = ()> {
    graph: Graph<CellState<Payload>, (), Undirected, GridIndexType>,
    dimensions: SquareGridDimensions,
    grid_display: Option<Rc<dyn GridDisplay>>,
}

#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum CellLinkError {
    InvalidGridCoordinate,
    SelfLink,
    NotAdjacent,
}

impl fmt::Display for CellLinkError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            CellLinkError::InvalidGridCoordinate => write!(f, "cell coordinate is outside the grid"),
            CellLinkError::SelfLink => write!(f, "a cell cannot be linked to itself"),
            CellLinkError::NotAdjacent => write!(f, "only adjacent cells can be linked"),
        }
    }
}

impl Error for CellLinkError {}

impl<GridIndexType: IndexType, Payload> fmt::Debug for Grid<GridIndexType, Payload> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Grid :: dimension: {:?}, links: {:?}, visited: {:?}",
               self.dimensions.dimension(), self.links_count(), self.visited_count())
    }
}

impl<GridIndexType: IndexType, Payload> Grid<GridIndexType, Payload> {

    /// A fresh `dimension` x `dimension` grid: every cell unvisited, every wall standing.
    ///
    /// Returns None if the cell count does not fit the grid's index type.
    pub fn new(dimension: Dimension) -> Option<Grid<GridIndexType, Payload>> {
        let dimensions = SquareGridDimensions::new(dimension);
        let NodesCount(nodes) = dimension.0.checked_mul(dimension.0).map(NodesCount)?;
        if nodes > <GridIndexType as IndexType>::max().index() {
            return None;
        }

        Some(Grid {
            graph: Self::fresh_graph(&dimensions),
            dimensions,
            grid_display: None,
        })
    }

    fn fresh_graph(dimensions: &SquareGridDimensions)
                   -> Graph<CellState<Payload>, (), Undirected, GridIndexType> {
        let (NodesCount(nodes), EdgesCount(edges)) = dimensions.graph_size();
        let mut graph = Graph::with_capacity(nodes, edges);
        for _ in 0..nodes {
            let _ = graph.add_node(CellState::default());
        }
        graph
    }

    /// Back to the freshly allocated state: all passages walled up, visits and payloads gone.
    pub fn reset(&mut self) {
        self.graph = Self::fresh_graph(&self.dimensions);
    }

    #[inline]
    pub fn set_grid_display(&mut self, grid_display: Option<Rc<dyn GridDisplay>>) {
        self.grid_display = grid_display;
    }

    #[inline]
    pub fn grid_display(&self) -> &Option<Rc<dyn GridDisplay>> {
        &self.grid_display
    }

    #[inline]
    pub fn dimensions(&self) -> &SquareGridDimensions {
        &self.dimensions
    }

    /// Cells along one side.
    #[inline]
    pub fn dimension(&self) -> usize {
        self.dimensions.dimension().0
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.dimensions.size().0
    }

    #[inline]
    pub fn links_count(&self) -> usize {
        self.graph.edge_count()
    }

    #[inline]
    pub fn rows(&self) -> RowsCount {
        self.dimensions.rows()
    }

    #[inline]
    pub fn columns(&self) -> ColumnsCount {
        self.dimensions.columns()
    }

    /// Link two adjacent cells, knocking down the wall pair between them.
    /// Linking already linked cells is a no-op.
    pub fn link(&mut self,
                a: Cartesian2DCoordinate,
                b: Cartesian2DCoordinate)
                -> Result<(), CellLinkError> {
        if a == b {
            return Err(CellLinkError::SelfLink);
        }
        let a_index_opt = self.grid_coordinate_graph_index(a);
        let b_index_opt = self.grid_coordinate_graph_index(b);
        match (a_index_opt, b_index_opt) {
            (Some(a_index), Some(b_index)) => {
                if a.direction_to(b).is_none() {
                    return Err(CellLinkError::NotAdjacent);
                }
                let _ = self.graph.update_edge(a_index, b_index, ());
                Ok(())
            }
            _ => Err(CellLinkError::InvalidGridCoordinate),
        }
    }

    /// Cells that are linked to a particular cell by a passage.
    pub fn links(&self, coord: Cartesian2DCoordinate) -> Option<CoordinateSmallVec> {
        self.grid_coordinate_graph_index(coord).map(|graph_node_index| {
            self.graph
                .neighbors(graph_node_index)
                .map(|node_index| {
                    Cartesian2DCoordinate::from_row_major_index(node_index.index(),
                                                                &self.dimensions)
                })
                .collect()
        })
    }

    pub fn neighbour_at_direction(&self,
                                  coord: Cartesian2DCoordinate,
                                  direction: CompassPrimary)
                                  -> Option<Cartesian2DCoordinate> {
        if !self.is_valid_coordinate(coord) {
            return None;
        }
        coord.offset(direction)
             .filter(|neighbour_coord| self.is_valid_coordinate(*neighbour_coord))
    }

    /// Are two cells in the grid linked?
    pub fn is_linked(&self, a: Cartesian2DCoordinate, b: Cartesian2DCoordinate) -> bool {
        let a_index_opt = self.grid_coordinate_graph_index(a);
        let b_index_opt = self.grid_coordinate_graph_index(b);
        if let (Some(a_index), Some(b_index)) = (a_index_opt, b_index_opt) {
            self.graph.find_edge(a_index, b_index).is_some()
        } else {
            false
        }
    }

    pub fn is_neighbour_linked(&self, coord: Cartesian2DCoordinate, direction: CompassPrimary) -> bool {
        self.neighbour_at_direction(coord, direction)
            .map_or(false, |neighbour_coord| self.is_linked(coord, neighbour_coord))
    }

    /// The wall flags of a cell. A wall on the grid boundary is always standing.
    pub fn walls(&self, coord: Cartesian2DCoordinate) -> Option<Walls> {
        if !self.is_valid_coordinate(coord) {
            return None;
        }
        let closed = |dir| !self.is_neighbour_linked(coord, dir);
        Some(Walls {
            top: closed(CompassPrimary::North),
            right: closed(CompassPrimary::East),
            bottom: closed(CompassPrimary::South),
            left: closed(CompassPrimary::West),
        })
    }

    pub fn is_visited(&self, coord: Cartesian2DCoordinate) -> bool {
        self.cell_state(coord).map_or(false, |state| state.visited)
    }

    /// Mark a cell visited. Returns true if it was not visited before.
    pub fn visit(&mut self, coord: Cartesian2DCoordinate) -> bool {
        match self.cell_state_mut(coord) {
            Some(state) if !state.visited => {
                state.visited = true;
                true
            }
            _ => false,
        }
    }

    pub fn visited_count(&self) -> usize {
        self.graph.raw_nodes().iter().filter(|node| node.weight.visited).count()
    }

    /// No cell visited and no passage carved yet.
    pub fn is_fresh(&self) -> bool {
        self.links_count() == 0 && self.visited_count() == 0
    }

    pub fn cell_state(&self, coord: Cartesian2DCoordinate) -> Option<&CellState<Payload>> {
        self.grid_coordinate_graph_index(coord)
            .and_then(move |index| self.graph.node_weight(index))
    }

    fn cell_state_mut(&mut self, coord: Cartesian2DCoordinate) -> Option<&mut CellState<Payload>> {
        let index = self.grid_coordinate_graph_index(coord)?;
        self.graph.node_weight_mut(index)
    }

    /// Convert a grid coordinate to a one dimensional index in the range 0...grid.size().
    /// Returns None if the grid coordinate is invalid.
    #[inline]
    pub fn grid_coordinate_to_index(&self, coord: Cartesian2DCoordinate) -> Option<usize> {
        if self.is_valid_coordinate(coord) {
            Some((coord.y as usize * self.dimension()) + coord.x as usize)
        } else {
            None
        }
    }

    #[inline]
    pub fn iter(&self) -> CellIter {
        CellIter::new(self.dimensions)
    }

    #[inline]
    pub fn iter_row(&self) -> RowIter {
        RowIter::new(self.dimensions)
    }

    pub fn iter_links(&self) -> LinksIter<GridIndexType> {
        LinksIter {
            graph_edge_iter: self.graph.raw_edges().iter(),
            dimensions: &self.dimensions,
        }
    }

    /// Is the grid coordinate valid for this grid - within the grid's dimensions
    #[inline]
    pub fn is_valid_coordinate(&self, coord: Cartesian2DCoordinate) -> bool {
        let dim = self.dimension();
        (coord.x as usize) < dim && (coord.y as usize) < dim
    }

    /// Convert a grid coordinate into petgraph nodeindex
    /// Returns None if the grid coordinate is invalid (out of the grid's dimensions).
    #[inline]
    fn grid_coordinate_graph_index(&self,
                                   coord: Cartesian2DCoordinate)
                                   -> Option<graph::NodeIndex<GridIndexType>> {
        self.grid_coordinate_to_index(coord)
            .map(graph::NodeIndex::<GridIndexType>::new)
    }

    pub fn payload(&self, coord: Cartesian2DCoordinate) -> Option<&Payload> {
        self.cell_state(coord).and_then(|state| state.payload.as_ref())
    }

    pub fn has_payload(&self, coord: Cartesian2DCoordinate) -> bool {
        self.payload(coord).is_some()
    }

    /// Coordinates of every cell currently carrying a payload, in row major order.
    pub fn payload_coordinates(&self) -> Vec<Cartesian2DCoordinate> {
        self.iter().filter(|coord| self.has_payload(*coord)).collect()
    }
}

impl<GridIndexType: IndexType, Payload> PayloadSlots for Grid<GridIndexType, Payload> {
    type Payload = Payload;

    fn slot_coordinates(&self) -> Vec<Cartesian2DCoordinate> {
        self.iter().collect()
    }

    fn attach_payload(&mut self,
                      coord: Cartesian2DCoordinate,
                      payload: Payload)
                      -> Result<Option<Payload>, PlacementError> {
        let state = self.cell_state_mut(coord)
                        .ok_or(PlacementError::InvalidGridCoordinate)?;
        Ok(state.payload.replace(payload))
    }

    fn payload(&self, coord: Cartesian2DCoordinate) -> Option<&Payload> {
        Grid::payload(self, coord)
    }

    fn take_payload(&mut self, coord: Cartesian2DCoordinate) -> Option<Payload> {
        self.cell_state_mut(coord).and_then(|state| state.payload.take())
    }
}

pub struct LinksIter<'a, GridIndexType: IndexType> {
    graph_edge_iter: slice::Iter<'a, graph::Edge<(), GridIndexType>>,
    dimensions: &'a SquareGridDimensions,
}

impl<'a, GridIndexType: IndexType> Iterator for LinksIter<'a, GridIndexType> {
    type Item = (Cartesian2DCoordinate, Cartesian2DCoordinate);

    fn next(&mut self) -> Option<Self::Item> {
        let dimensions = self.dimensions;
        self.graph_edge_iter.next().map(|edge| {
            let src_cell_coord = Cartesian2DCoordinate::from_row_major_index(edge.source().index(),
                                                                             dimensions);
            let dst_cell_coord = Cartesian2DCoordinate::from_row_major_index(edge.target().index(),
                                                                             dimensions);
            (src_cell_coord, dst_cell_coord)
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.graph_edge_iter.size_hint()
    }
}
impl<'a, GridIndexType: IndexType> ExactSizeIterator for LinksIter<'a, GridIndexType> {} // default impl using size_hint()

impl<'a, GridIndexType: IndexType> fmt::Debug for LinksIter<'a, GridIndexType> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "LinksIter :: remaining edges : {:?}", self.graph_edge_iter.len())
    }
}
