use std::error::Error;
use std::fmt;

use crate::grid::Grid;
use crate::units::{Dimension, Level};

pub type SmallGrid<Payload = ()> = Grid<u8, Payload>;
pub type MediumGrid<Payload = ()> = Grid<u16, Payload>;
pub type LargeGrid<Payload = ()> = Grid<u32, Payload>;

/// Smallest maze side, used by level 1.
pub const BASE_LEVEL_DIMENSION: usize = 8;

#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum LevelError {
    /// Levels count from 1.
    ZeroLevel,
    /// The level's maze has more cells than the grid index type can address.
    GridTooLarge(Level),
}

impl fmt::Display for LevelError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            LevelError::ZeroLevel => write!(f, "levels start at 1"),
            LevelError::GridTooLarge(Level(level)) => {
                write!(f, "the maze for level {} is too large", level)
            }
        }
    }
}

impl Error for LevelError {}

pub fn small_grid<Payload>(dimension: Dimension) -> Option<SmallGrid<Payload>> {
    SmallGrid::new(dimension)
}

pub fn medium_grid<Payload>(dimension: Dimension) -> Option<MediumGrid<Payload>> {
    MediumGrid::new(dimension)
}

pub fn large_grid<Payload>(dimension: Dimension) -> Option<LargeGrid<Payload>> {
    LargeGrid::new(dimension)
}

/// The maze grows by one cell per side every second level: `8 + level / 2`.
pub fn level_dimension(level: Level) -> Result<Dimension, LevelError> {
    match level {
        Level(0) => Err(LevelError::ZeroLevel),
        Level(n) => Ok(Dimension(BASE_LEVEL_DIMENSION + (n / 2) as usize)),
    }
}

/// A fresh grid sized for the given level.
pub fn level_grid<Payload>(level: Level) -> Result<LargeGrid<Payload>, LevelError> {
    let dimension = level_dimension(level)?;
    large_grid(dimension).ok_or(LevelError::GridTooLarge(level))
}
