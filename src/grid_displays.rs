use std::fmt;

use crate::cells::{CompassPrimary, Coordinate};
use crate::maze::Maze;
use crate::units::{ColumnsCount, RowsCount};
use crate::utils::{self, FnvHashSet};

pub trait GridDisplay {
    /// Render the contents of a grid cell as text.
    /// The String should be 3 glyphs long, padded if required.
    fn render_cell_body(&self, _: Coordinate) -> String {
        String::from("   ")
    }
}

#[derive(Debug)]
pub struct PathDisplay {
    on_path_coordinates: FnvHashSet<Coordinate>,
}
impl PathDisplay {
    pub fn new(path: &[Coordinate]) -> Self {
        let mut on_path_coordinates = utils::fnv_hashset(path.len());
        on_path_coordinates.extend(path.iter().cloned());
        PathDisplay { on_path_coordinates }
    }
}
impl GridDisplay for PathDisplay {
    fn render_cell_body(&self, coord: Coordinate) -> String {
        if self.on_path_coordinates.contains(&coord) {
            String::from(" . ")
        } else {
            String::from("   ")
        }
    }
}

#[derive(Debug)]
pub struct StartEndPointsDisplay {
    start: Coordinate,
    end: Coordinate,
}
impl StartEndPointsDisplay {
    pub fn new(start: Coordinate, end: Coordinate) -> StartEndPointsDisplay {
        StartEndPointsDisplay { start, end }
    }

    pub fn for_maze(maze: &Maze) -> StartEndPointsDisplay {
        StartEndPointsDisplay::new(maze.start(), maze.goal())
    }
}
impl GridDisplay for StartEndPointsDisplay {
    fn render_cell_body(&self, coord: Coordinate) -> String {
        if coord == self.start {
            String::from(" S ")
        } else if coord == self.end {
            String::from(" E ")
        } else {
            String::from("   ")
        }
    }
}

/// A maze paired with a way of filling in its cell bodies, ready for text output.
pub struct MazeDisplay<'a> {
    maze: &'a Maze,
    grid_display: Option<&'a dyn GridDisplay>,
}

impl Maze {
    pub fn display_with<'a>(&'a self, grid_display: &'a dyn GridDisplay) -> MazeDisplay<'a> {
        MazeDisplay {
            maze: self,
            grid_display: Some(grid_display),
        }
    }
}

impl fmt::Display for Maze {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let plain = MazeDisplay {
            maze: self,
            grid_display: None,
        };
        write!(f, "{}", plain)
    }
}

impl<'a> fmt::Display for MazeDisplay<'a> {
    /// Walls are drawn on the lattice of cell corners: a line of corner glyphs joined by
    /// horizontal walls above each row of cells, and one below the last row.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let maze = self.maze;
        let RowsCount(rows) = maze.rows();
        let ColumnsCount(columns) = maze.columns();

        for row in 0..=rows {
            for column in 0..=columns {
                write!(f, "{}", corner_glyph(maze, row, column))?;
                if column < columns {
                    let wall = if horizontal_wall(maze, row, column) { "───" } else { "   " };
                    write!(f, "{}", wall)?;
                }
            }
            writeln!(f)?;

            if row == rows {
                break;
            }

            for column in 0..=columns {
                write!(f, "{}", if vertical_wall(maze, row, column) { "│" } else { " " })?;
                if column < columns {
                    let coord = Coordinate::new(row as u32, column as u32);
                    match self.grid_display {
                        Some(displayer) => write!(f, "{}", displayer.render_cell_body(coord))?,
                        None => write!(f, "   ")?,
                    }
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Wall on the vertical line left of `column`, within `row`. Line `columns` is the east boundary.
fn vertical_wall(maze: &Maze, row: usize, column: usize) -> bool {
    let ColumnsCount(columns) = maze.columns();
    column == 0 || column == columns ||
    !maze.is_open(Coordinate::new(row as u32, (column - 1) as u32), CompassPrimary::East)
}

/// Wall on the horizontal line above `row`, within `column`. Line `rows` is the south boundary.
fn horizontal_wall(maze: &Maze, row: usize, column: usize) -> bool {
    let RowsCount(rows) = maze.rows();
    row == 0 || row == rows ||
    !maze.is_open(Coordinate::new((row - 1) as u32, column as u32), CompassPrimary::South)
}

/// Box drawing glyph for the corner at the top left of cell (`row`, `column`), joining the
/// walls that meet there.
fn corner_glyph(maze: &Maze, row: usize, column: usize) -> char {
    let RowsCount(rows) = maze.rows();
    let ColumnsCount(columns) = maze.columns();
    let up = row > 0 && vertical_wall(maze, row - 1, column);
    let down = row < rows && vertical_wall(maze, row, column);
    let left = column > 0 && horizontal_wall(maze, row, column - 1);
    let right = column < columns && horizontal_wall(maze, row, column);

    match (up, down, left, right) {
        (false, false, false, false) => ' ',
        (true, false, false, false) => '╵',
        (false, true, false, false) => '╷',
        (false, false, true, false) => '╴',
        (false, false, false, true) => '╶',
        (true, true, false, false) => '│',
        (false, false, true, true) => '─',
        (false, true, false, true) => '┌',
        (false, true, true, false) => '┐',
        (true, false, false, true) => '└',
        (true, false, true, false) => '┘',
        (true, true, false, true) => '├',
        (true, true, true, false) => '┤',
        (false, true, true, true) => '┬',
        (true, false, true, true) => '┴',
        (true, true, true, true) => '┼',
    }
}
