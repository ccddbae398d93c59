use log::debug;
use petgraph::graph::IndexType;
use rand::Rng;
use rand::seq::SliceRandom;
use std::error::Error;
use std::fmt;

use crate::cells::{Cartesian2DCoordinate, CompassPrimary};
use crate::grid::{CellLinkError, Grid};

#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum GenerateError {
    /// The root cell is not inside the grid. Never clamped.
    StartOutOfBounds {
        start: Cartesian2DCoordinate,
        dimension: usize,
    },
    /// Some cell is already visited or some passage already carved.
    GridNotFresh,
    Link(CellLinkError),
}

impl fmt::Display for GenerateError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            GenerateError::StartOutOfBounds { start, dimension } => {
                write!(f, "start cell {} is outside the {}x{} grid", start, dimension, dimension)
            }
            GenerateError::GridNotFresh => {
                write!(f, "maze generation needs a fresh grid with no visited cells or passages")
            }
            GenerateError::Link(ref e) => write!(f, "failed to carve a passage: {}", e),
        }
    }
}

impl Error for GenerateError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match *self {
            GenerateError::Link(ref e) => Some(e),
            _ => None,
        }
    }
}

impl From<CellLinkError> for GenerateError {
    fn from(e: CellLinkError) -> GenerateError {
        GenerateError::Link(e)
    }
}

/// The four moves out of a cell (up, right, down, left) in a uniformly random order.
pub fn shuffled_directions<R: Rng + ?Sized>(rng: &mut R) -> [CompassPrimary; 4] {
    let mut dirs = CompassPrimary::ALL;
    dirs.shuffle(rng);
    dirs
}

/// One level of the depth first descent: a cell and how far through its shuffled moves we are.
#[derive(Debug)]
struct Frame {
    coord: Cartesian2DCoordinate,
    directions: [CompassPrimary; 4],
    next_direction: usize,
}

impl Frame {
    fn new<R: Rng + ?Sized>(coord: Cartesian2DCoordinate, rng: &mut R) -> Frame {
        Frame {
            coord,
            directions: shuffled_directions(rng),
            next_direction: 0,
        }
    }
}

/// Apply the recursive backtracker maze generation algorithm to a fresh grid, rooted at `start`.
///
/// A randomized depth first walk: from the current cell try each of the four directions in a
/// freshly shuffled order, and whenever the neighbour that way is inside the grid and unvisited
/// knock down the wall pair between the two cells and carry on from the neighbour. Once every
/// direction of a cell is exhausted we back up to the cell we came from.
///
/// The descent is held on an explicit stack rather than the call stack, a long corridor can make
/// it as deep as the number of cells.
///
/// Every cell ends up visited and the passages form a spanning tree: `size - 1` of them, no loops,
/// and every cell reachable from `start`.
pub fn recursive_backtracker<GridIndexType, Payload, R>(grid: &mut Grid<GridIndexType, Payload>,
                                                        start: Cartesian2DCoordinate,
                                                        rng: &mut R)
                                                        -> Result<(), GenerateError>
    where GridIndexType: IndexType,
          R: Rng + ?Sized
{
    if !grid.is_valid_coordinate(start) {
        return Err(GenerateError::StartOutOfBounds {
            start,
            dimension: grid.dimension(),
        });
    }
    if !grid.is_fresh() {
        return Err(GenerateError::GridNotFresh);
    }

    grid.visit(start);
    let mut stack = vec![Frame::new(start, rng)];
    let mut deepest = stack.len();

    while let Some(frame) = stack.last_mut() {

        if frame.next_direction == frame.directions.len() {
            // All four ways tried, backtrack.
            stack.pop();
            continue;
        }

        let coord = frame.coord;
        let direction = frame.directions[frame.next_direction];
        frame.next_direction += 1;

        if let Some(neighbour) = grid.neighbour_at_direction(coord, direction) {
            if !grid.is_visited(neighbour) {
                grid.link(coord, neighbour)?;
                grid.visit(neighbour);
                stack.push(Frame::new(neighbour, rng));
                deepest = deepest.max(stack.len());
            }
        }
    }

    debug!("recursive backtracker: {}x{} grid from {}, {} passages carved, deepest descent {}",
           grid.dimension(),
           grid.dimension(),
           start,
           grid.links_count(),
           deepest);

    Ok(())
}

#[cfg(test)]
mod tests {

    use quickcheck::{quickcheck, TestResult};
    use rand::SeedableRng;
    use rand_xorshift::XorShiftRng;
    use std::collections::VecDeque;

    use super::*;
    use crate::cells::Walls;
    use crate::grids::{large_grid, small_grid, LargeGrid, SmallGrid};
    use crate::pathing::{shortest_path, Distances};
    use crate::units::Dimension;
    use crate::utils;

    fn gc(x: u32, y: u32) -> Cartesian2DCoordinate {
        Cartesian2DCoordinate::new(x, y)
    }

    fn generated(n: usize, start: Cartesian2DCoordinate, seed: u64) -> LargeGrid {
        let mut g = large_grid(Dimension(n)).expect("grid too large");
        let mut rng = XorShiftRng::seed_from_u64(seed);
        recursive_backtracker(&mut g, start, &mut rng).expect("generation failed");
        g
    }

    /// Breadth first walk over passages from `root`. Returns the number of cells reached, or None
    /// if some cell is reached twice (a loop).
    fn tree_walk(g: &LargeGrid, root: Cartesian2DCoordinate) -> Option<usize> {
        let mut seen = utils::fnv_hashset(g.size());
        let mut queue = VecDeque::new();
        seen.insert(root);
        queue.push_back((root, None));

        while let Some((coord, parent)) = queue.pop_front() {
            for linked in g.links(coord).expect("invalid coordinate").iter().cloned() {
                if Some(linked) == parent {
                    continue;
                }
                if !seen.insert(linked) {
                    return None;
                }
                queue.push_back((linked, Some(coord)));
            }
        }
        Some(seen.len())
    }

    fn is_perfect_maze(g: &LargeGrid, root: Cartesian2DCoordinate) -> bool {
        let cells = g.size();
        g.visited_count() == cells &&
        g.links_count() == cells - 1 &&
        tree_walk(g, root) == Some(cells)
    }

    #[test]
    fn every_cell_visited() {
        for n in 1..12 {
            let g = generated(n, gc(0, 0), n as u64);
            assert!(g.iter().all(|coord| g.is_visited(coord)), "unvisited cell on {}x{}", n, n);
        }
    }

    #[test]
    fn spanning_tree_passage_count() {
        for n in 1..12 {
            let g = generated(n, gc(0, 0), 100 + n as u64);
            assert_eq!(g.links_count(), n * n - 1);
        }
    }

    #[test]
    fn no_loops_and_fully_connected() {
        for seed in 0..20 {
            let root = gc(3, 5);
            let g = generated(9, root, seed);
            assert_eq!(tree_walk(&g, root), Some(81));

            let distances = Distances::<u32>::new(&g, root).expect("valid root");
            assert!(g.iter().all(|coord| distances.distance_from_start_to(coord).is_some()));
        }
    }

    #[test]
    fn wall_pairs_are_symmetric() {
        let g = generated(10, gc(4, 4), 42);
        for coord in g.iter() {
            let walls: Walls = g.walls(coord).unwrap();
            for dir in CompassPrimary::ALL.iter().cloned() {
                match g.neighbour_at_direction(coord, dir) {
                    Some(neighbour) => {
                        let back = g.walls(neighbour).unwrap();
                        assert_eq!(walls.has_wall(dir), back.has_wall(dir.opposite()));
                    }
                    None => assert!(walls.has_wall(dir), "boundary wall open at {}", coord),
                }
            }
        }
    }

    #[test]
    fn single_cell_grid() {
        let g = generated(1, gc(0, 0), 1);
        assert!(g.is_visited(gc(0, 0)));
        assert_eq!(g.links_count(), 0);
        assert_eq!(g.walls(gc(0, 0)), Some(Walls::closed()));
    }

    #[test]
    fn eight_by_eight_has_path_between_corners() {
        let g = generated(8, gc(0, 0), 2017);
        assert_eq!(g.links_count(), 63);

        let distances = Distances::<u32>::new(&g, gc(0, 0)).unwrap();
        let path = shortest_path(&g, &distances, gc(7, 7)).expect("no path to the exit");
        assert_eq!(path.first(), Some(&gc(0, 0)));
        assert_eq!(path.last(), Some(&gc(7, 7)));
        for step in path.windows(2) {
            assert!(g.is_linked(step[0], step[1]));
        }
    }

    #[test]
    fn start_out_of_bounds_is_rejected() {
        let mut g: SmallGrid = small_grid(Dimension(4)).unwrap();
        let mut rng = XorShiftRng::seed_from_u64(3);
        assert_eq!(recursive_backtracker(&mut g, gc(4, 0), &mut rng),
                   Err(GenerateError::StartOutOfBounds {
                       start: gc(4, 0),
                       dimension: 4,
                   }));
        assert!(recursive_backtracker(&mut g, gc(0, 9), &mut rng).is_err());
        // Nothing was touched
        assert!(g.is_fresh());
    }

    #[test]
    fn empty_grid_has_no_valid_start() {
        let mut g: SmallGrid = small_grid(Dimension(0)).unwrap();
        let mut rng = XorShiftRng::seed_from_u64(3);
        assert!(recursive_backtracker(&mut g, gc(0, 0), &mut rng).is_err());
    }

    #[test]
    fn used_grid_is_rejected_until_reset() {
        let mut g: SmallGrid = small_grid(Dimension(5)).unwrap();
        let mut rng = XorShiftRng::seed_from_u64(11);
        recursive_backtracker(&mut g, gc(0, 0), &mut rng).unwrap();
        assert_eq!(recursive_backtracker(&mut g, gc(0, 0), &mut rng),
                   Err(GenerateError::GridNotFresh));

        g.reset();
        recursive_backtracker(&mut g, gc(2, 2), &mut rng).unwrap();
        assert_eq!(g.links_count(), 24);
    }

    #[test]
    fn same_seed_same_maze() {
        let a = generated(12, gc(0, 0), 99);
        let b = generated(12, gc(0, 0), 99);
        assert_eq!(a.iter_links().collect::<Vec<_>>(), b.iter_links().collect::<Vec<_>>());
    }

    #[test]
    fn deep_descent_does_not_overflow_the_stack() {
        let n = 400;
        let g = generated(n, gc(0, 0), 5);
        assert_eq!(g.visited_count(), n * n);
        assert_eq!(g.links_count(), n * n - 1);
    }

    #[test]
    fn shuffle_is_a_permutation() {
        let mut rng = XorShiftRng::seed_from_u64(8);
        for _ in 0..100 {
            let mut dirs = shuffled_directions(&mut rng).to_vec();
            dirs.sort_by_key(|d| CompassPrimary::ALL.iter().position(|a| a == d));
            assert_eq!(dirs, CompassPrimary::ALL.to_vec());
        }
    }

    #[test]
    fn shuffle_fairness() {
        let trials = 40_000;
        let mut rng = XorShiftRng::seed_from_u64(1234);
        let mut first_counts = [0usize; 4];
        for _ in 0..trials {
            let first = shuffled_directions(&mut rng)[0];
            let slot = CompassPrimary::ALL.iter().position(|d| *d == first).unwrap();
            first_counts[slot] += 1;
        }

        // Expect 10000 each, allow 5%
        let expected = trials / 4;
        for count in first_counts.iter() {
            assert!((*count as isize - expected as isize).abs() < (expected / 20) as isize,
                    "uneven first direction counts: {:?}",
                    first_counts);
        }
    }

    #[test]
    fn first_passage_from_root_is_uniformly_random() {
        // From an interior root every neighbour is in bounds and unvisited, so the first
        // passage carved follows the first shuffled direction. Passages are stored in carving
        // order, so it is the first link.
        let trials = 4_000;
        let root = gc(2, 2);
        let mut first_counts = [0usize; 4];
        for seed in 0..trials {
            let g = generated(5, root, seed as u64);
            let (from, to) = g.iter_links().next().expect("a 5x5 maze has passages");
            assert_eq!(from, root);
            let dir = from.direction_to(to).expect("passages join adjacent cells");
            let slot = CompassPrimary::ALL.iter().position(|d| *d == dir).unwrap();
            first_counts[slot] += 1;
        }

        // Expect 1000 each, allow 10%
        let expected = trials / 4;
        for count in first_counts.iter() {
            assert!((*count as isize - expected as isize).abs() < (expected / 10) as isize,
                    "uneven first passage directions: {:?}",
                    first_counts);
        }
    }

    #[test]
    fn quickcheck_perfect_mazes() {
        fn prop(side: u8, x: u8, y: u8, seed: u64) -> TestResult {
            let n = (side % 16) as usize + 1;
            let root = gc((x as usize % n) as u32, (y as usize % n) as u32);
            let g = generated(n, root, seed);
            TestResult::from_bool(is_perfect_maze(&g, root))
        }
        quickcheck(prop as fn(u8, u8, u8, u64) -> TestResult);
    }
}
