use std::fmt::{Debug, Display, LowerHex};
use std::ops::Add;

use itertools::Itertools;
use num::traits::{Bounded, One, Unsigned, Zero};
use smallvec::SmallVec;

use crate::cells::{Cartesian2DCoordinate, CoordinateSmallVec};
use crate::grid::{Grid, IndexType};
use crate::grid_traits::GridDisplay;
use crate::utils;
use crate::utils::FnvHashMap;


// Trait (hack) used purely as a generic type parameter alias because it looks ugly to type this out each time
pub trait MaxDistance
    : Zero + One + Bounded + Unsigned + Add + Debug + Clone + Copy + Display + LowerHex + Ord
    {
}
impl<T: Zero + One + Bounded + Unsigned + Add + Debug + Clone + Copy + Display + LowerHex + Ord> MaxDistance for T {}


/// Step counts from one start cell to every cell reachable through passages.
#[derive(Debug, Clone)]
pub struct Distances<MaxDistanceT = u32> {
    start_coordinate: Cartesian2DCoordinate,
    distances: FnvHashMap<Cartesian2DCoordinate, MaxDistanceT>,
    max_distance: MaxDistanceT,
}

impl<MaxDistanceT> Distances<MaxDistanceT>
    where MaxDistanceT: MaxDistance
{
    /// Flood fill outwards from `start_coordinate`. None if the start is not on the grid.
    pub fn new<GridIndexType, Payload>(grid: &Grid<GridIndexType, Payload>,
                                       start_coordinate: Cartesian2DCoordinate)
                                       -> Option<Distances<MaxDistanceT>>
        where GridIndexType: IndexType
    {
        if !grid.is_valid_coordinate(start_coordinate) {
            return None;
        }

        let mut max = Zero::zero();
        let mut distances = utils::fnv_hashmap(grid.size());
        distances.insert(start_coordinate, Zero::zero());

        // Every passage is one step, so the first time a cell is reached is by a shortest route.
        // The distances map doubles as the visited set.
        let mut frontier = vec![start_coordinate];
        while !frontier.is_empty() {

            let mut new_frontier = vec![];
            for cell_coord in &frontier {

                let distance_to_cell: MaxDistanceT = distances[cell_coord];
                if distance_to_cell > max {
                    max = distance_to_cell;
                }

                let links: CoordinateSmallVec = grid.links(*cell_coord)
                    .unwrap_or_else(CoordinateSmallVec::new);
                for link_coordinate in &links {
                    if !distances.contains_key(link_coordinate) {
                        distances.insert(*link_coordinate, distance_to_cell + One::one());
                        new_frontier.push(*link_coordinate);
                    }
                }
            }
            frontier = new_frontier;
        }

        Some(Distances {
            start_coordinate,
            distances,
            max_distance: max,
        })
    }

    #[inline(always)]
    pub fn start(&self) -> Cartesian2DCoordinate {
        self.start_coordinate
    }

    #[inline(always)]
    pub fn max(&self) -> MaxDistanceT {
        self.max_distance
    }

    /// Number of cells reachable from the start, the start included.
    #[inline(always)]
    pub fn reachable_count(&self) -> usize {
        self.distances.len()
    }

    #[inline(always)]
    pub fn distance_from_start_to(&self, coord: Cartesian2DCoordinate) -> Option<MaxDistanceT> {
        self.distances.get(&coord).cloned()
    }

    pub fn furthest_points_on_grid(&self) -> SmallVec<[Cartesian2DCoordinate; 8]> {
        let furthest_distance = self.max();
        self.distances
            .iter()
            .filter(|&(_, distance)| *distance == furthest_distance)
            .map(|(coord, _)| *coord)
            .sorted()
            .collect()
    }
}

impl<MaxDistanceT> GridDisplay for Distances<MaxDistanceT>
    where MaxDistanceT: MaxDistance
{
    fn render_cell_body(&self, coord: Cartesian2DCoordinate) -> String {
        if let Some(d) = self.distances.get(&coord) {
            // centre align, padding 3, lowercase hexadecimal
            format!("{:^3x}", d)
        } else {
            String::from("   ")
        }
    }
}

/// Walk back from `end_point` to the start of `distances_from_start`, always stepping to a linked
/// neighbour one closer. None if the end is unreachable.
pub fn shortest_path<GridIndexType, Payload, MaxDistanceT>(grid: &Grid<GridIndexType, Payload>,
                                                           distances_from_start: &Distances<MaxDistanceT>,
                                                           end_point: Cartesian2DCoordinate)
                                                           -> Option<Vec<Cartesian2DCoordinate>>
    where GridIndexType: IndexType,
          MaxDistanceT: MaxDistance
{
    distances_from_start.distance_from_start_to(end_point)?;

    let mut path = vec![end_point];
    let start = distances_from_start.start();
    let mut current_coord = end_point;

    while current_coord != start {

        let current_distance_to_start = distances_from_start.distance_from_start_to(current_coord)?;

        let closest_to_start = grid.links(current_coord)?
            .iter()
            .filter_map(|coord| {
                distances_from_start.distance_from_start_to(*coord)
                                    .map(|distance| (*coord, distance))
            })
            .min_by_key(|&(_, distance)| distance);

        match closest_to_start {
            Some((closer_coord, closer_distance)) if closer_distance < current_distance_to_start => {
                current_coord = closer_coord;
                path.push(current_coord);
            }
            // No linked neighbour gets us any closer, the distances do not belong to this grid.
            _ => return None,
        }
    }

    path.reverse();
    Some(path)
}


#[cfg(test)]
mod tests {

    use std::u32;

    use super::*;
    use crate::grids::{small_grid, SmallGrid};
    use crate::units::Dimension;

    type SmallDistances = Distances<u8>;

    static OUT_OF_GRID_COORDINATE: Cartesian2DCoordinate = Cartesian2DCoordinate {
        x: u32::MAX,
        y: u32::MAX,
    };

    fn grid(n: usize) -> SmallGrid {
        small_grid(Dimension(n)).unwrap()
    }

    fn gc(x: u32, y: u32) -> Cartesian2DCoordinate {
        Cartesian2DCoordinate::new(x, y)
    }

    fn open_two_by_two() -> SmallGrid {
        let mut g = grid(2);
        g.link(gc(0, 0), gc(1, 0)).expect("Link Failed");
        g.link(gc(0, 0), gc(0, 1)).expect("Link Failed");
        g.link(gc(1, 0), gc(1, 1)).expect("Link Failed");
        g.link(gc(0, 1), gc(1, 1)).expect("Link Failed");
        g
    }

    #[test]
    fn distances_construction_requires_valid_start_coordinate() {
        let g = grid(3);
        let distances = SmallDistances::new(&g, OUT_OF_GRID_COORDINATE);
        assert!(distances.is_none());
    }

    #[test]
    fn start() {
        let g = grid(3);
        let start_coordinate = gc(1, 1);
        let distances = SmallDistances::new(&g, start_coordinate).unwrap();
        assert_eq!(start_coordinate, distances.start());
    }

    #[test]
    fn distances_to_unreachable_cells_is_none() {
        let g = grid(3);
        let start_coordinate = gc(0, 0);
        let distances = SmallDistances::new(&g, start_coordinate).unwrap();
        for coord in g.iter() {
            let d = distances.distance_from_start_to(coord);
            if coord != start_coordinate {
                assert!(d.is_none());
            } else {
                assert_eq!(d, Some(0));
            }
        }
        assert_eq!(distances.reachable_count(), 1);
        assert_eq!(distances.distance_from_start_to(OUT_OF_GRID_COORDINATE), None);
    }

    #[test]
    fn distances_on_open_grid() {
        let g = open_two_by_two();
        let distances = SmallDistances::new(&g, gc(0, 0)).unwrap();

        assert_eq!(distances.distance_from_start_to(gc(0, 0)), Some(0));
        assert_eq!(distances.distance_from_start_to(gc(1, 0)), Some(1));
        assert_eq!(distances.distance_from_start_to(gc(0, 1)), Some(1));
        assert_eq!(distances.distance_from_start_to(gc(1, 1)), Some(2));
        assert_eq!(distances.max(), 2);
        assert_eq!(&*distances.furthest_points_on_grid(), &[gc(1, 1)]);
    }

    #[test]
    fn path_along_a_corridor() {
        let mut g = grid(3);
        // A snake: along the top, down the right, back along the middle
        g.link(gc(0, 0), gc(1, 0)).unwrap();
        g.link(gc(1, 0), gc(2, 0)).unwrap();
        g.link(gc(2, 0), gc(2, 1)).unwrap();
        g.link(gc(2, 1), gc(1, 1)).unwrap();
        g.link(gc(1, 1), gc(0, 1)).unwrap();

        let distances = SmallDistances::new(&g, gc(0, 0)).unwrap();
        let path = shortest_path(&g, &distances, gc(0, 1)).expect("path exists");
        assert_eq!(path, vec![gc(0, 0), gc(1, 0), gc(2, 0), gc(2, 1), gc(1, 1), gc(0, 1)]);

        assert_eq!(shortest_path(&g, &distances, gc(0, 2)), None);
        assert_eq!(shortest_path(&g, &distances, gc(0, 0)), Some(vec![gc(0, 0)]));
    }

    #[test]
    fn rendering_distances_as_hex() {
        let g = open_two_by_two();
        let distances = SmallDistances::new(&g, gc(0, 0)).unwrap();
        assert_eq!(distances.render_cell_body(gc(1, 1)), " 2 ");
        assert_eq!(distances.render_cell_body(OUT_OF_GRID_COORDINATE), "   ");
    }
}
