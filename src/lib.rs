//! **equation_mazes** generates perfect square mazes with a randomized recursive backtracker and
//! runs the maze explorer game on top of them: walk each maze to its exit, solving the equations
//! hidden along the way.

pub mod cells;
pub mod equations;
pub mod game;
pub mod generators;
pub mod grid;
pub mod grid_dimensions;
pub mod grid_displays;
pub mod grid_iterators;
pub mod grid_traits;
pub mod grids;
pub mod pathing;
pub mod placement;
pub mod units;
mod utils;
