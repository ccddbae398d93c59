use std::fmt;
use std::rc::Rc;

use crate::cells::{Cartesian2DCoordinate, CompassPrimary};
use crate::grid::{Grid, IndexType};
use crate::grid_traits::GridDisplay;
use crate::utils::FnvHashSet;


#[derive(Debug)]
pub struct PathDisplay {
    on_path_coordinates: FnvHashSet<Cartesian2DCoordinate>,
}
impl PathDisplay {
    pub fn new(path: &[Cartesian2DCoordinate]) -> Self {
        PathDisplay { on_path_coordinates: path.iter().cloned().collect() }
    }
}
impl GridDisplay for PathDisplay {
    fn render_cell_body(&self, coord: Cartesian2DCoordinate) -> String {
        if self.on_path_coordinates.contains(&coord) {
            String::from(" . ")
        } else {
            String::from("   ")
        }
    }
}


#[derive(Debug)]
pub struct StartEndPointsDisplay {
    start_coordinate: Option<Cartesian2DCoordinate>,
    end_coordinate: Option<Cartesian2DCoordinate>,
}
impl StartEndPointsDisplay {
    pub fn new(start: Option<Cartesian2DCoordinate>,
               end: Option<Cartesian2DCoordinate>)
               -> StartEndPointsDisplay {
        StartEndPointsDisplay {
            start_coordinate: start,
            end_coordinate: end,
        }
    }
}
impl GridDisplay for StartEndPointsDisplay {
    fn render_cell_body(&self, coord: Cartesian2DCoordinate) -> String {
        if self.start_coordinate == Some(coord) {
            String::from(" S ")
        } else if self.end_coordinate == Some(coord) {
            String::from(" E ")
        } else {
            String::from("   ")
        }
    }
}


/// The game board: the player, the cells still hiding an equation and the exit.
#[derive(Debug)]
pub struct PuzzleDisplay {
    player: Cartesian2DCoordinate,
    exit: Cartesian2DCoordinate,
    puzzle_coordinates: FnvHashSet<Cartesian2DCoordinate>,
}
impl PuzzleDisplay {
    pub fn new(player: Cartesian2DCoordinate,
               exit: Cartesian2DCoordinate,
               puzzles: &[Cartesian2DCoordinate])
               -> PuzzleDisplay {
        PuzzleDisplay {
            player,
            exit,
            puzzle_coordinates: puzzles.iter().cloned().collect(),
        }
    }
}
impl GridDisplay for PuzzleDisplay {
    fn render_cell_body(&self, coord: Cartesian2DCoordinate) -> String {
        if coord == self.player {
            String::from(" @ ")
        } else if self.puzzle_coordinates.contains(&coord) {
            String::from(" ? ")
        } else if coord == self.exit {
            String::from(" E ")
        } else {
            String::from("   ")
        }
    }
}


/// Overlays several displays, the first with something to show for a cell wins.
pub struct LayeredDisplay {
    layers: Vec<Rc<dyn GridDisplay>>,
}
impl LayeredDisplay {
    pub fn new(layers: Vec<Rc<dyn GridDisplay>>) -> LayeredDisplay {
        LayeredDisplay { layers }
    }
}
impl GridDisplay for LayeredDisplay {
    fn render_cell_body(&self, coord: Cartesian2DCoordinate) -> String {
        self.layers
            .iter()
            .map(|layer| layer.render_cell_body(coord))
            .find(|body| !body.trim().is_empty())
            .unwrap_or_else(|| String::from("   "))
    }
}


impl<GridIndexType, Payload> Grid<GridIndexType, Payload>
    where GridIndexType: IndexType
{
    /// Box drawing text of the maze, cell bodies filled in by `displayer` if there is one.
    pub fn render_with(&self, displayer: Option<&dyn GridDisplay>) -> String {
        const WALL_L: &str = "╴";
        const WALL_R: &str = "╶";
        const WALL_U: &str = "╵";
        const WALL_D: &str = "╷";
        const WALL_LR_3: &str = "───";
        const WALL_LR: &str = "─";
        const WALL_UD: &str = "│";
        const WALL_LD: &str = "┐";
        const WALL_RU: &str = "└";
        const WALL_LU: &str = "┘";
        const WALL_RD: &str = "┌";
        const WALL_LRU: &str = "┴";
        const WALL_LRD: &str = "┬";
        const WALL_LRUD: &str = "┼";
        const WALL_RUD: &str = "├";
        const WALL_LUD: &str = "┤";
        let default_cell_body = String::from("   ");

        let columns_count = self.columns().0;
        let rows_count = self.rows().0;
        if rows_count == 0 {
            return String::new();
        }

        // Start by special case rendering the text for the north most boundary
        let mut output = String::from(WALL_RD);
        if let Some(first_grid_row) = self.iter_row().next() {
            for (index, coord) in first_grid_row.iter().enumerate() {
                output.push_str(WALL_LR_3);
                let is_east_open = self.is_neighbour_linked(*coord, CompassPrimary::East);
                if is_east_open {
                    output.push_str(WALL_LR);
                } else {
                    let is_last_cell = index == (columns_count - 1);
                    if is_last_cell {
                        output.push_str(WALL_LD);
                    } else {
                        output.push_str(WALL_LRD);
                    }
                }
            }
        }
        output.push('\n');

        for (index_row, row) in self.iter_row().enumerate() {

            let is_last_row = index_row == (rows_count - 1);

            // Starts of by special case rendering the west most boundary of the row
            // The top section of the cell is done by the previous row.
            let mut row_middle_section_render = String::from(WALL_UD);
            let mut row_bottom_section_render = String::new();

            for (index_column, cell_coord) in row.into_iter().enumerate() {

                let render_cell_side = |direction, passage_clear_text, blocking_wall_text| {
                    if self.is_neighbour_linked(cell_coord, direction) {
                        passage_clear_text
                    } else {
                        blocking_wall_text
                    }
                };
                let is_first_column = index_column == 0;
                let is_last_column = index_column == (columns_count - 1);
                let east_open = self.is_neighbour_linked(cell_coord, CompassPrimary::East);
                let south_open = self.is_neighbour_linked(cell_coord, CompassPrimary::South);

                // Each cell uses the southern wall of the cell above it as its own northern wall,
                // so we only draw the body, the eastern boundary and the southern boundary.
                let east_boundary = render_cell_side(CompassPrimary::East, " ", WALL_UD);

                // Cell Body
                match displayer {
                    Some(d) => row_middle_section_render.push_str(&d.render_cell_body(cell_coord)),
                    None => row_middle_section_render.push_str(&default_cell_body),
                }

                row_middle_section_render.push_str(east_boundary);

                if is_first_column {
                    row_bottom_section_render = if is_last_row {
                        String::from(WALL_RU)
                    } else if south_open {
                        String::from(WALL_UD)
                    } else {
                        String::from(WALL_RUD)
                    };
                }
                let south_boundary = render_cell_side(CompassPrimary::South, "   ", WALL_LR_3);
                row_bottom_section_render.push_str(south_boundary);

                let corner = match (is_last_row, is_last_column) {
                    (true, true) => WALL_LU,
                    (true, false) => if east_open { WALL_LR } else { WALL_LRU },
                    (false, true) => if south_open { WALL_UD } else { WALL_LUD },
                    (false, false) => {
                        let access_se_from_east =
                            self.neighbour_at_direction(cell_coord, CompassPrimary::East)
                                .map_or(false,
                                        |c| self.is_neighbour_linked(c, CompassPrimary::South));
                        let access_se_from_south =
                            self.neighbour_at_direction(cell_coord, CompassPrimary::South)
                                .map_or(false,
                                        |c| self.is_neighbour_linked(c, CompassPrimary::East));
                        let show_right_section = !access_se_from_east;
                        let show_down_section = !access_se_from_south;
                        let show_up_section = !east_open;
                        let show_left_section = !south_open;

                        match (show_left_section,
                               show_right_section,
                               show_up_section,
                               show_down_section) {
                            (true, true, true, true) => WALL_LRUD,
                            (true, true, true, false) => WALL_LRU,
                            (true, true, false, true) => WALL_LRD,
                            (true, false, true, true) => WALL_LUD,
                            (false, true, true, true) => WALL_RUD,
                            (true, true, false, false) => WALL_LR,
                            (false, false, true, true) => WALL_UD,
                            (false, true, true, false) => WALL_RU,
                            (true, false, false, true) => WALL_LD,
                            (true, false, true, false) => WALL_LU,
                            (false, true, false, true) => WALL_RD,
                            (true, false, false, false) => WALL_L,
                            (false, true, false, false) => WALL_R,
                            (false, false, true, false) => WALL_U,
                            (false, false, false, true) => WALL_D,
                            _ => " ",
                        }
                    }
                };

                row_bottom_section_render.push_str(corner);
            }

            output.push_str(&row_middle_section_render);
            output.push('\n');
            output.push_str(&row_bottom_section_render);
            output.push('\n');
        }

        output
    }
}

impl<GridIndexType, Payload> fmt::Display for Grid<GridIndexType, Payload>
    where GridIndexType: IndexType
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let displayer = self.grid_display().as_ref().map(|d| &**d);
        write!(f, "{}", self.render_with(displayer))
    }
}
