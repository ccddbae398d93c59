use docopt::Docopt;
use log::{debug, warn};
use rand::SeedableRng;
use rand_xorshift::XorShiftRng;
use serde_derive::Deserialize;
use equation_mazes::{
    cells::{Cartesian2DCoordinate, CompassPrimary},
    equations::Equation,
    game::{self, AnswerOutcome, Game, GameState, MoveOutcome},
    generators,
    grid_displays::{LayeredDisplay, PathDisplay, PuzzleDisplay, StartEndPointsDisplay},
    grid_traits::GridDisplay,
    grids::{self, LargeGrid},
    pathing,
    placement,
    units::{Dimension, Level},
};
use std::{
    io,
    io::prelude::*,
    fs::File,
    rc::Rc,
    time::{Duration, Instant},
};

const USAGE: &str = "Maze Explorer

Usage:
    maze_explorer -h | --help
    maze_explorer render [--level=<n> | --grid-size=<n>] [--start-x=<x> --start-y=<y>] [--seed=<s>] [--show-path | --show-distances] [--show-puzzles] [--text-out=<path>] [--save-edges=<path>]
    maze_explorer play [--seed=<s>]

Options:
    -h --help              Show this screen.
    --level=<n>            Size the maze for game level n (8 + n/2 cells per side) [default: 1].
    --grid-size=<n>        The grid size is n * n. Overrides the level size.
    --start-x=<x>          x coordinate of the cell the maze is grown from [default: 0].
    --start-y=<y>          y coordinate of the cell the maze is grown from [default: 0].
    --seed=<s>             Seed for the random number generator, for repeatable mazes.
    --show-path            Show the path from the start cell to the opposite corner.
    --show-distances       Show the distance from the start cell to every other cell, in hex.
    --show-puzzles         Hide equations in the maze as a game level would and mark them with '?'.
    --text-out=<path>      Output file path for a textual rendering of a maze.
    --save-edges=<path>    Serialize the maze to a text file: each line is a pair of numbers. Line 1: n(#vertices) m(#edges). Line 2+ edge between vertices. Uses 1-based vertex indices.

Playing:
    w/a/s/d to move up/left/down/right, a number to answer an equation, r to restart, q to quit.
    While an equation waits for an answer, h shows a hint and s the solution steps.
";
#[derive(Debug, Deserialize)]
struct MazeArgs {
    cmd_render: bool,
    cmd_play: bool,
    flag_level: u32,
    flag_grid_size: Option<usize>,
    flag_start_x: u32,
    flag_start_y: u32,
    flag_seed: Option<u64>,
    flag_show_path: bool,
    flag_show_distances: bool,
    flag_show_puzzles: bool,
    flag_text_out: String,
    flag_save_edges: String,
}

// We'll put our errors in an `errors` module, and other modules in
// this crate will `use errors::*;` to get access to everything
// `error_chain!` creates.
mod errors {
    use error_chain::*;
    error_chain! {

        foreign_links {
            DocOptFailure(::docopt::Error);
            Io(::std::io::Error);
            Level(::equation_mazes::grids::LevelError);
            Generate(::equation_mazes::generators::GenerateError);
            Placement(::equation_mazes::placement::PlacementError);
            Game(::equation_mazes::game::GameError);
        }
    }
}
use crate::errors::*;

fn main() -> Result<()> {

    env_logger::init();

    let args: MazeArgs = Docopt::new(USAGE).and_then(|d| d.deserialize())?;
    debug!("{:?}", args);

    if args.cmd_play {
        play(args.flag_seed)
    } else if args.cmd_render {
        render(&args)
    } else {
        Ok(())
    }
}

fn make_rng(seed: Option<u64>) -> XorShiftRng {
    match seed {
        Some(seed) => XorShiftRng::seed_from_u64(seed),
        None => XorShiftRng::from_entropy(),
    }
}

/// The corner furthest from `start` on an n * n grid.
fn opposite_corner(start: Cartesian2DCoordinate, dimension: usize) -> Cartesian2DCoordinate {
    let last = dimension.saturating_sub(1) as u32;
    let half = (dimension / 2) as u32;
    let x = if start.x < half { last } else { 0 };
    let y = if start.y < half { last } else { 0 };
    Cartesian2DCoordinate::new(x, y)
}

fn render(maze_args: &MazeArgs) -> Result<()> {

    let level = Level(maze_args.flag_level);
    let dimension = match maze_args.flag_grid_size {
        Some(size) => Dimension(size),
        None => grids::level_dimension(level)?,
    };
    let mut maze_grid: LargeGrid<Equation> =
        grids::large_grid(dimension).ok_or("Grid size too large to address every cell.")?;

    let mut rng = make_rng(maze_args.flag_seed);
    let start = Cartesian2DCoordinate::new(maze_args.flag_start_x, maze_args.flag_start_y);
    generators::recursive_backtracker(&mut maze_grid, start, &mut rng)?;
    let end = opposite_corner(start, dimension.0);

    if !maze_args.flag_save_edges.is_empty() {

        save_maze_graph(&maze_grid, &maze_args.flag_save_edges)?;
    }

    // The start and end markers take precedence over everything else drawn in a cell
    let mut layers: Vec<Rc<dyn GridDisplay>> =
        vec![Rc::new(StartEndPointsDisplay::new(Some(start), Some(end)))];

    if maze_args.flag_show_puzzles {
        let equations_count = game::BASE_EQUATIONS_PER_LEVEL + level.0 as usize;
        let puzzles = placement::place_payloads(&mut maze_grid,
                                                equations_count,
                                                &[start, end],
                                                &mut rng,
                                                |rng| Equation::random(rng))?;
        for coord in &puzzles {
            if let Some(equation) = maze_grid.payload(*coord) {
                println!("{} {}", coord, equation);
            }
        }
        layers.push(Rc::new(PuzzleDisplay::new(start, end, &puzzles)));
    }

    if maze_args.flag_show_distances || maze_args.flag_show_path {

        let distances = pathing::Distances::<u32>::new(&maze_grid, start)
            .ok_or("Provided invalid start coordinate from which to show path distances.")?;

        if maze_args.flag_show_distances {
            layers.push(Rc::new(distances));
        } else if let Some(path) = pathing::shortest_path(&maze_grid, &distances, end) {
            layers.push(Rc::new(PathDisplay::new(&path)));
        } else {
            // Somehow there is no route, maze generation failed to make a perfect maze
            warn!("no path from {} to {}", start, end);
        }
    }

    maze_grid.set_grid_display(Some(Rc::new(LayeredDisplay::new(layers))));

    if maze_args.flag_text_out.is_empty() {
        println!("{}", maze_grid);
    } else {
        write_text_to_file(&format!("{}", maze_grid), &maze_args.flag_text_out)
            .chain_err(|| format!("Failed to write maze to text file {}", maze_args.flag_text_out))?;
    }

    Ok(())
}

fn play(seed: Option<u64>) -> Result<()> {

    let mut game = Game::new(make_rng(seed))?;
    let mut clock = Instant::now();
    show_game(&game);

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;

        // Whole seconds since the last input become clock ticks, the remainder carries over
        let elapsed = clock.elapsed().as_secs();
        if elapsed > 0 {
            clock += Duration::from_secs(elapsed);
            game.tick_seconds(elapsed);
        }

        let input = line.trim();
        match input {
            "q" => break,
            "r" => game.restart()?,
            "h" | "s" if game.state() == GameState::Playing && game.pending_equation().is_some() => {
                if let Some(equation) = game.pending_equation() {
                    if input == "h" {
                        println!("Hint: {}", equation.hint());
                    } else {
                        for step in equation.steps() {
                            println!("  {}", step);
                        }
                    }
                }
            }
            "w" | "a" | "s" | "d" if game.state() == GameState::Playing => {
                let direction = match input {
                    "w" => CompassPrimary::North,
                    "a" => CompassPrimary::West,
                    "s" => CompassPrimary::South,
                    _ => CompassPrimary::East,
                };
                match game.move_player(direction)? {
                    MoveOutcome::Blocked => println!("A wall blocks the way."),
                    MoveOutcome::Ignored => println!("Solve the equation first."),
                    MoveOutcome::PuzzleFound(text) => println!("Solve for x: {}", text),
                    MoveOutcome::LevelComplete(Level(level)) => {
                        println!("Level complete! On to level {}.", level)
                    }
                    MoveOutcome::Moved => {}
                }
            }
            _ if game.state() == GameState::Playing && game.pending_equation().is_some() => {
                match game.submit_answer(input) {
                    AnswerOutcome::Correct => println!("Correct!"),
                    AnswerOutcome::Incorrect => println!("Wrong answer, try again."),
                    AnswerOutcome::Ignored => {}
                }
            }
            _ => warn!("ignoring input {:?}", input),
        }

        show_game(&game);
    }

    Ok(())
}

fn show_game(game: &Game) {
    println!("{}", game.render());
    println!("{}", game);
    if game.state() == GameState::Over {
        println!("Time is up! Final score {}. Enter r to play again or q to quit.", game.score());
    } else if let Some(equation) = game.pending_equation() {
        println!("Solve for x: {}  (h for a hint, s for the solution steps)", equation);
    }
    let _ = io::stdout().flush();
}

fn write_text_to_file(data: &str, file_name: &str) -> io::Result<()> {
    let mut f = File::create(file_name)?;
    f.write_all(data.as_bytes())?;
    Ok(())
}

fn save_maze_graph(maze_grid: &LargeGrid<Equation>, file_path: &str) -> Result<()> {

    let mut graph_data = String::new();
    let vertices_count = maze_grid.size();
    let edges_count = maze_grid.links_count();
    graph_data.push_str(vertices_count.to_string().as_ref());
    graph_data.push(' ');
    graph_data.push_str(edges_count.to_string().as_ref());
    graph_data.push('\n');

    for (src, dst) in maze_grid.iter_links() {
        let index_a = maze_grid
            .grid_coordinate_to_index(src)
            .ok_or("Links iter should give valid coordinate")?;
        let index_b = maze_grid
            .grid_coordinate_to_index(dst)
            .ok_or("Links iter should give valid coordinate")?;
        let src_as_1_based_index = index_a + 1;
        let dst_as_1_based_index = index_b + 1;

        graph_data.push_str(src_as_1_based_index.to_string().as_ref());
        graph_data.push(' ');
        graph_data.push_str(dst_as_1_based_index.to_string().as_ref());
        graph_data.push('\n');
    }

    write_text_to_file(&graph_data, file_path)
        .chain_err(|| format!("Failed to write maze graph to text file {}", file_path))?;

    Ok(())
}
