use serde_derive::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;

use crate::units::ColumnsCount;

/// Fixed size storage for the (at most four) cells a cell can be linked to.
pub type CoordinateSmallVec = SmallVec<[Coordinate; 4]>;

/// Location of a cell in a maze, `row` counted from the top and `column` from the left.
#[derive(Hash, Eq, PartialEq, Copy, Clone, Debug, Ord, PartialOrd, Serialize, Deserialize)]
pub struct Coordinate {
    pub row: u32,
    pub column: u32,
}

impl Coordinate {
    pub fn new(row: u32, column: u32) -> Coordinate {
        Coordinate { row, column }
    }

    #[inline]
    pub fn from_row_major_index(index: usize, columns: ColumnsCount) -> Coordinate {
        let ColumnsCount(width) = columns;
        Coordinate::new((index / width) as u32, (index % width) as u32)
    }

    /// Creates a new `Coordinate` offset 1 cell away in the given direction.
    /// Returns None if the coordinate is not representable, e.g. north of row 0.
    /// No maze bounds are checked here.
    pub fn offset(self, direction: CompassPrimary) -> Option<Coordinate> {
        let (row, column) = (self.row, self.column);
        match direction {
            CompassPrimary::North => row.checked_sub(1).map(|r| Coordinate::new(r, column)),
            CompassPrimary::South => row.checked_add(1).map(|r| Coordinate::new(r, column)),
            CompassPrimary::East => column.checked_add(1).map(|c| Coordinate::new(row, c)),
            CompassPrimary::West => column.checked_sub(1).map(|c| Coordinate::new(row, c)),
        }
    }

    /// The direction to take from `self` to reach the orthogonally adjacent `other`.
    pub fn direction_to(self, other: Coordinate) -> Option<CompassPrimary> {
        CompassPrimary::ALL
            .iter()
            .cloned()
            .find(|dir| self.offset(*dir) == Some(other))
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.column)
    }
}

#[derive(Eq, PartialEq, Copy, Clone, Debug, Hash)]
pub enum CompassPrimary {
    West,
    South,
    East,
    North,
}

impl CompassPrimary {
    /// Listed in wall flag order.
    pub const ALL: [CompassPrimary; 4] = [CompassPrimary::West,
                                          CompassPrimary::South,
                                          CompassPrimary::East,
                                          CompassPrimary::North];

    #[inline]
    pub fn wall_index(self) -> usize {
        match self {
            CompassPrimary::West => 0,
            CompassPrimary::South => 1,
            CompassPrimary::East => 2,
            CompassPrimary::North => 3,
        }
    }

    pub fn opposite(self) -> CompassPrimary {
        match self {
            CompassPrimary::West => CompassPrimary::East,
            CompassPrimary::South => CompassPrimary::North,
            CompassPrimary::East => CompassPrimary::West,
            CompassPrimary::North => CompassPrimary::South,
        }
    }
}

/// Wall flags of a cell indexed west, south, east, north. `true` is a wall, `false` a passage.
#[derive(Eq, PartialEq, Copy, Clone, Debug, Serialize, Deserialize)]
pub struct Walls([bool; 4]);

impl Walls {
    pub fn all_closed() -> Walls {
        Walls([true; 4])
    }

    #[inline]
    pub fn is_present(&self, direction: CompassPrimary) -> bool {
        self.0[direction.wall_index()]
    }

    #[inline]
    pub fn is_open(&self, direction: CompassPrimary) -> bool {
        !self.is_present(direction)
    }

    pub fn open(&mut self, direction: CompassPrimary) {
        self.0[direction.wall_index()] = false;
    }

    pub fn as_flags(&self) -> [bool; 4] {
        self.0
    }
}

/// A grid node: its fixed coordinate, its wall flags and the cells registered as linked to it.
///
/// Wall and link agreement with the adjacent cells is kept by the owning `Maze`, never by the
/// cell itself.
#[derive(Eq, PartialEq, Clone, Debug, Serialize, Deserialize)]
pub struct Cell {
    coordinate: Coordinate,
    walls: Walls,
    neighbours: CoordinateSmallVec,
}

impl Cell {
    pub fn new(coordinate: Coordinate) -> Cell {
        Cell {
            coordinate,
            walls: Walls::all_closed(),
            neighbours: CoordinateSmallVec::new(),
        }
    }

    #[inline]
    pub fn coordinate(&self) -> Coordinate {
        self.coordinate
    }

    #[inline]
    pub fn walls(&self) -> Walls {
        self.walls
    }

    #[inline]
    pub fn has_wall(&self, direction: CompassPrimary) -> bool {
        self.walls.is_present(direction)
    }

    /// Cells this cell has been explicitly linked to.
    pub fn neighbours(&self) -> &[Coordinate] {
        &self.neighbours
    }

    pub fn is_neighbour(&self, coord: Coordinate) -> bool {
        self.neighbours.contains(&coord)
    }

    /// The registered neighbour one step away in `direction`, if a link was made to it.
    ///
    /// This is not a query on the grid geometry: an adjacent cell that was never linked
    /// gives `None`.
    pub fn neighbour_in_direction(&self, direction: CompassPrimary) -> Option<Coordinate> {
        self.coordinate
            .offset(direction)
            .filter(|target| self.is_neighbour(*target))
    }

    pub(crate) fn open_wall(&mut self, direction: CompassPrimary) {
        self.walls.open(direction);
    }

    /// Returns false if the link already existed.
    pub(crate) fn add_neighbour(&mut self, coord: Coordinate) -> bool {
        if self.is_neighbour(coord) {
            false
        } else {
            self.neighbours.push(coord);
            true
        }
    }
}

/// Transient traversal tag of a cell during one solve.
#[derive(Eq, PartialEq, Copy, Clone, Debug, Serialize, Deserialize)]
pub enum CellState {
    /// Not yet visited by the search.
    Naive,
    /// Backtracking stops here, an unexplored passage remains.
    Start,
    /// On the active path.
    Visited,
    /// Proven dead end.
    Blocked,
}
