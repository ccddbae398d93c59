//! The maze explorer game: find the way from the top left corner of each maze to the bottom
//! right one, solving the equations met on the way, before the clock runs out.

use log::{info, trace};
use rand::Rng;
use rand_xorshift::XorShiftRng;
use std::error::Error;
use std::fmt;

use crate::cells::{Cartesian2DCoordinate, CompassPrimary};
use crate::equations::Equation;
use crate::generators::{self, GenerateError};
use crate::grid_displays::PuzzleDisplay;
use crate::grid_traits::PayloadSlots;
use crate::grids::{self, LargeGrid, LevelError};
use crate::placement::{self, PlacementError};
use crate::units::Level;

pub const STARTING_SECONDS: u32 = 300;
pub const LEVEL_BONUS_SECONDS: u32 = 60;
/// Multiplied by the current level.
pub const SOLVED_EQUATION_POINTS: i64 = 100;
pub const WRONG_ANSWER_PENALTY: i64 = 10;
/// Multiplied by the level just reached.
pub const COMPLETED_LEVEL_POINTS: i64 = 500;
/// Each level hides this many equations plus one per level.
pub const BASE_EQUATIONS_PER_LEVEL: usize = 3;

pub type MazeGrid = LargeGrid<Equation>;

#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum GameState {
    Playing,
    Over,
}

#[derive(Eq, PartialEq, Clone, Debug)]
pub enum MoveOutcome {
    /// The game is over or an equation is waiting for an answer.
    Ignored,
    /// A wall stands that way.
    Blocked,
    Moved,
    /// Moved onto a cell holding an equation, which must now be answered.
    PuzzleFound(String),
    /// Reached the exit, the game has moved on to this new level.
    LevelComplete(Level),
}

#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum AnswerOutcome {
    /// No equation is waiting, or the game is over.
    Ignored,
    Correct,
    Incorrect,
}

#[derive(Debug)]
pub enum GameError {
    Level(LevelError),
    Generate(GenerateError),
    Placement(PlacementError),
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            GameError::Level(ref e) => write!(f, "bad level: {}", e),
            GameError::Generate(ref e) => write!(f, "maze generation failed: {}", e),
            GameError::Placement(ref e) => write!(f, "equation placement failed: {}", e),
        }
    }
}

impl Error for GameError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match *self {
            GameError::Level(ref e) => Some(e),
            GameError::Generate(ref e) => Some(e),
            GameError::Placement(ref e) => Some(e),
        }
    }
}

impl From<LevelError> for GameError {
    fn from(e: LevelError) -> GameError {
        GameError::Level(e)
    }
}

impl From<GenerateError> for GameError {
    fn from(e: GenerateError) -> GameError {
        GameError::Generate(e)
    }
}

impl From<PlacementError> for GameError {
    fn from(e: PlacementError) -> GameError {
        GameError::Placement(e)
    }
}

/// One play through. The host drives it with moves, answers and one `tick` per second.
pub struct Game<R: Rng = XorShiftRng> {
    rng: R,
    state: GameState,
    level: Level,
    score: i64,
    seconds_left: u32,
    grid: MazeGrid,
    player: Cartesian2DCoordinate,
    pending_puzzle: Option<Cartesian2DCoordinate>,
}

impl<R: Rng> fmt::Debug for Game<R> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Game :: state: {:?}, level: {:?}, score: {}, seconds left: {}, player: {}",
               self.state, self.level, self.score, self.seconds_left, self.player)
    }
}

impl<R: Rng> Game<R> {

    /// Start playing level 1.
    pub fn new(rng: R) -> Result<Game<R>, GameError> {
        let level = Level(1);
        let mut rng = rng;
        let grid = Self::build_level(level, &mut rng)?;
        Ok(Game {
            rng,
            state: GameState::Playing,
            level,
            score: 0,
            seconds_left: STARTING_SECONDS,
            grid,
            player: Self::entrance(),
            pending_puzzle: None,
        })
    }

    /// Back to level 1 with no points and a full clock.
    pub fn restart(&mut self) -> Result<(), GameError> {
        let level = Level(1);
        let grid = Self::build_level(level, &mut self.rng)?;
        self.level = level;
        self.score = 0;
        self.seconds_left = STARTING_SECONDS;
        self.enter_level(grid);
        self.state = GameState::Playing;
        info!("game restarted");
        Ok(())
    }

    fn entrance() -> Cartesian2DCoordinate {
        Cartesian2DCoordinate::new(0, 0)
    }

    /// The bottom right cell.
    pub fn exit(&self) -> Cartesian2DCoordinate {
        let last = self.grid.dimension().saturating_sub(1) as u32;
        Cartesian2DCoordinate::new(last, last)
    }

    fn build_level(level: Level, rng: &mut R) -> Result<MazeGrid, GameError> {
        let mut grid: MazeGrid = grids::level_grid(level)?;
        let entrance = Self::entrance();
        generators::recursive_backtracker(&mut grid, entrance, rng)?;

        let last = grid.dimension().saturating_sub(1) as u32;
        let exit = Cartesian2DCoordinate::new(last, last);
        let equations_count = BASE_EQUATIONS_PER_LEVEL + level.0 as usize;
        let placed = placement::place_payloads(&mut grid,
                                               equations_count,
                                               &[entrance, exit],
                                               rng,
                                               |rng| Equation::random(rng))?;

        info!("level {} ready: {}x{} maze with {} equations",
              level.0,
              grid.dimension(),
              grid.dimension(),
              placed.len());
        Ok(grid)
    }

    /// Swap in a freshly built maze with the player back at the entrance.
    fn enter_level(&mut self, grid: MazeGrid) {
        self.grid = grid;
        self.player = Self::entrance();
        self.pending_puzzle = None;
    }

    /// Try to walk one cell. Only open walls can be walked through.
    pub fn move_player(&mut self, direction: CompassPrimary) -> Result<MoveOutcome, GameError> {
        if self.state != GameState::Playing || self.pending_puzzle.is_some() {
            return Ok(MoveOutcome::Ignored);
        }

        let destination = match self.grid.neighbour_at_direction(self.player, direction) {
            Some(neighbour) if self.grid.is_linked(self.player, neighbour) => neighbour,
            _ => {
                trace!("blocked moving {:?} from {}", direction, self.player);
                return Ok(MoveOutcome::Blocked);
            }
        };
        self.player = destination;
        trace!("moved {:?} to {}", direction, destination);

        if let Some(equation) = self.grid.payload(destination) {
            let text = equation.text().to_owned();
            self.pending_puzzle = Some(destination);
            return Ok(MoveOutcome::PuzzleFound(text));
        }

        if destination == self.exit() {
            self.complete_level()?;
            return Ok(MoveOutcome::LevelComplete(self.level));
        }

        Ok(MoveOutcome::Moved)
    }

    /// Nothing changes unless the next level's maze could be built.
    fn complete_level(&mut self) -> Result<(), GameError> {
        let next_level = Level(self.level.0 + 1);
        let grid = Self::build_level(next_level, &mut self.rng)?;
        self.level = next_level;
        self.score += COMPLETED_LEVEL_POINTS * i64::from(next_level.0);
        self.seconds_left += LEVEL_BONUS_SECONDS;
        self.enter_level(grid);
        info!("level complete, moving on to level {} with score {}", self.level.0, self.score);
        Ok(())
    }

    /// Answer the waiting equation. A correct answer removes the equation from the maze.
    pub fn submit_answer(&mut self, input: &str) -> AnswerOutcome {
        if self.state != GameState::Playing {
            return AnswerOutcome::Ignored;
        }
        let puzzle_coord = match self.pending_puzzle {
            Some(coord) => coord,
            None => return AnswerOutcome::Ignored,
        };
        let correct = self.grid
                          .payload(puzzle_coord)
                          .map_or(false, |equation| equation.check(input));

        if correct {
            self.score += SOLVED_EQUATION_POINTS * i64::from(self.level.0);
            self.grid.take_payload(puzzle_coord);
            self.pending_puzzle = None;
            trace!("solved the equation at {}", puzzle_coord);
            AnswerOutcome::Correct
        } else {
            self.score -= WRONG_ANSWER_PENALTY;
            trace!("wrong answer {:?} at {}", input, puzzle_coord);
            AnswerOutcome::Incorrect
        }
    }

    /// One second passes.
    pub fn tick(&mut self) -> GameState {
        if self.state == GameState::Playing {
            self.seconds_left = self.seconds_left.saturating_sub(1);
            if self.seconds_left == 0 {
                self.state = GameState::Over;
                info!("time is up: level {}, final score {}", self.level.0, self.score);
            }
        }
        self.state
    }

    pub fn tick_seconds(&mut self, seconds: u64) -> GameState {
        for _ in 0..seconds {
            if self.tick() == GameState::Over {
                break;
            }
        }
        self.state
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn level(&self) -> Level {
        self.level
    }

    pub fn score(&self) -> i64 {
        self.score
    }

    pub fn seconds_left(&self) -> u32 {
        self.seconds_left
    }

    pub fn player(&self) -> Cartesian2DCoordinate {
        self.player
    }

    pub fn grid(&self) -> &MazeGrid {
        &self.grid
    }

    pub fn pending_equation(&self) -> Option<&Equation> {
        self.pending_puzzle.and_then(|coord| self.grid.payload(coord))
    }

    /// The maze as text: `@` for the player, `?` for unsolved equations, `E` for the exit.
    pub fn render(&self) -> String {
        let display = PuzzleDisplay::new(self.player,
                                         self.exit(),
                                         &self.grid.payload_coordinates());
        self.grid.render_with(Some(&display))
    }
}

impl<R: Rng> fmt::Display for Game<R> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Score: {}  Level: {}  Time: {}:{:02}",
               self.score,
               self.level.0,
               self.seconds_left / 60,
               self.seconds_left % 60)
    }
}

#[cfg(test)]
mod tests {

    use rand::SeedableRng;

    use super::*;
    use crate::pathing::{shortest_path, Distances};

    fn game(seed: u64) -> Game {
        Game::new(XorShiftRng::seed_from_u64(seed)).expect("game setup")
    }

    /// Directions leading from the player to `target`, through the maze.
    fn route(g: &Game, target: Cartesian2DCoordinate) -> Vec<CompassPrimary> {
        let distances = Distances::<u32>::new(g.grid(), g.player()).unwrap();
        let path = shortest_path(g.grid(), &distances, target).expect("maze is connected");
        path.windows(2)
            .map(|step| step[0].direction_to(step[1]).expect("adjacent steps"))
            .collect()
    }

    /// Walk to `target`, answering every equation met correctly.
    fn walk_solving(g: &mut Game, target: Cartesian2DCoordinate) -> MoveOutcome {
        let mut last = MoveOutcome::Moved;
        for dir in route(g, target) {
            last = g.move_player(dir).unwrap();
            if let MoveOutcome::PuzzleFound(_) = last {
                let answer = g.pending_equation().unwrap().answer().to_string();
                assert_eq!(g.submit_answer(&answer), AnswerOutcome::Correct);
            }
        }
        last
    }

    #[test]
    fn first_level_setup() {
        let g = game(1);
        assert_eq!(g.state(), GameState::Playing);
        assert_eq!(g.level(), Level(1));
        assert_eq!(g.score(), 0);
        assert_eq!(g.seconds_left(), 300);
        assert_eq!(g.player(), Cartesian2DCoordinate::new(0, 0));
        assert_eq!(g.exit(), Cartesian2DCoordinate::new(7, 7));
        assert_eq!(g.grid().links_count(), 63);

        let puzzles = g.grid().payload_coordinates();
        assert_eq!(puzzles.len(), 4);
        assert!(!puzzles.contains(&g.player()));
        assert!(!puzzles.contains(&g.exit()));
    }

    #[test]
    fn walls_block_movement() {
        let mut g = game(2);
        let start = g.player();
        let walls = g.grid().walls(start).unwrap();
        for dir in CompassPrimary::ALL.iter().cloned().filter(|d| walls.has_wall(*d)) {
            assert_eq!(g.move_player(dir).unwrap(), MoveOutcome::Blocked);
            assert_eq!(g.player(), start);
        }
    }

    #[test]
    fn equations_gate_movement_until_solved() {
        let mut g = game(3);
        let exit = g.exit();
        // A puzzle we can walk to without passing through the exit
        let directions = g.grid()
                          .payload_coordinates()
                          .into_iter()
                          .map(|puzzle| route(&g, puzzle))
                          .find(|dirs| {
                              let mut at = g.player();
                              dirs.iter().all(|dir| {
                                  at = at.offset(*dir).unwrap();
                                  at != exit
                              })
                          })
                          .expect("a puzzle away from the exit");

        // Walk up to it without solving anything on the way
        let mut found = None;
        for dir in directions {
            match g.move_player(dir).unwrap() {
                MoveOutcome::PuzzleFound(text) => {
                    found = Some(text);
                    break;
                }
                MoveOutcome::Moved => {}
                other => panic!("unexpected move outcome {:?}", other),
            }
        }
        let text = found.expect("an equation on the way");
        let equation = g.pending_equation().unwrap().clone();
        assert_eq!(equation.text(), text);

        // Stuck until it is solved
        for dir in CompassPrimary::ALL.iter().cloned() {
            assert_eq!(g.move_player(dir).unwrap(), MoveOutcome::Ignored);
        }

        let wrong = (equation.answer() + 1).to_string();
        assert_eq!(g.submit_answer(&wrong), AnswerOutcome::Incorrect);
        assert_eq!(g.score(), -10);
        assert_eq!(g.submit_answer("not a number"), AnswerOutcome::Incorrect);
        assert_eq!(g.score(), -20);

        let here = g.player();
        assert_eq!(g.submit_answer(&equation.answer().to_string()), AnswerOutcome::Correct);
        assert_eq!(g.score(), 80);
        assert!(g.pending_equation().is_none());
        assert!(!g.grid().has_payload(here));
        assert_eq!(g.submit_answer("1"), AnswerOutcome::Ignored);
    }

    #[test]
    fn reaching_the_exit_completes_the_level() {
        let mut g = game(4);
        let exit = g.exit();
        let outcome = walk_solving(&mut g, exit);
        assert_eq!(outcome, MoveOutcome::LevelComplete(Level(2)));
        assert_eq!(g.level(), Level(2));
        assert_eq!(g.seconds_left(), 360);
        assert_eq!(g.player(), Cartesian2DCoordinate::new(0, 0));
        assert_eq!(g.grid().dimension(), 9);
        assert_eq!(g.grid().payload_coordinates().len(), 5);
        // 500 x level 2, plus 100 for each equation solved on the way
        assert!(g.score() >= 1000);
        assert_eq!((g.score() - 1000) % 100, 0);
    }

    #[test]
    fn clock_runs_out() {
        let mut g = game(5);
        assert_eq!(g.tick(), GameState::Playing);
        assert_eq!(g.seconds_left(), 299);
        assert_eq!(g.to_string(), "Score: 0  Level: 1  Time: 4:59");

        assert_eq!(g.tick_seconds(1000), GameState::Over);
        assert_eq!(g.seconds_left(), 0);
        assert_eq!(g.to_string(), "Score: 0  Level: 1  Time: 0:00");

        assert_eq!(g.move_player(CompassPrimary::East).unwrap(), MoveOutcome::Ignored);
        assert_eq!(g.submit_answer("3"), AnswerOutcome::Ignored);

        g.restart().unwrap();
        assert_eq!(g.state(), GameState::Playing);
        assert_eq!(g.seconds_left(), 300);
        assert_eq!(g.level(), Level(1));
    }

    #[test]
    fn failed_level_setup_leaves_the_game_untouched() {
        let mut g = game(7);
        // The level after this one needs a maze too large for the grid index type
        g.level = Level(u32::MAX - 1);
        g.score = 1234;
        let links_before = g.grid().iter_links().collect::<Vec<_>>();
        let puzzles_before = g.grid().payload_coordinates();

        let result = g.complete_level();
        assert!(matches!(result, Err(GameError::Level(LevelError::GridTooLarge(Level(n))))
                         if n == u32::MAX));
        assert_eq!(g.level(), Level(u32::MAX - 1));
        assert_eq!(g.score(), 1234);
        assert_eq!(g.seconds_left(), STARTING_SECONDS);
        assert_eq!(g.player(), Cartesian2DCoordinate::new(0, 0));
        assert_eq!(g.grid().iter_links().collect::<Vec<_>>(), links_before);
        assert_eq!(g.grid().payload_coordinates(), puzzles_before);
    }

    #[test]
    fn restart_builds_a_fresh_first_level() {
        let mut g = game(8);
        g.level = Level(6);
        g.score = 4321;
        g.seconds_left = 12;
        g.restart().unwrap();
        assert_eq!(g.level(), Level(1));
        assert_eq!(g.score(), 0);
        assert_eq!(g.seconds_left(), STARTING_SECONDS);
        assert_eq!(g.grid().dimension(), 8);
        assert_eq!(g.grid().payload_coordinates().len(), 4);
    }

    #[test]
    fn rendering_marks_player_exit_and_equations() {
        let g = game(6);
        let text = g.render();
        assert_eq!(text.matches('@').count(), 1);
        assert_eq!(text.matches('E').count(), 1);
        assert_eq!(text.matches('?').count(), 4);
    }
}
