use serde_derive::{Deserialize, Serialize};

use crate::cells::{CellState, CompassPrimary, Coordinate};
use crate::maze::Maze;
use crate::units::{ColumnsCount, RowsCount};

/// Per-solve traversal state of every cell of one maze, kept apart from the maze structure
/// so that the same maze can be solved repeatedly.
#[derive(Eq, PartialEq, Clone, Debug, Serialize, Deserialize)]
pub struct CellStates {
    rows: RowsCount,
    columns: ColumnsCount,
    states: Vec<CellState>,
}

impl CellStates {
    /// Every cell `Naive` except the maze's start cell, which is `Start`.
    pub fn new(maze: &Maze) -> CellStates {
        let mut states = CellStates {
            rows: maze.rows(),
            columns: maze.columns(),
            states: vec![CellState::Naive; maze.size()],
        };
        states.reset();
        states
    }

    /// Back to the state of a fresh table, ready for another solve.
    pub fn reset(&mut self) {
        for state in self.states.iter_mut() {
            *state = CellState::Naive;
        }
        if let Some(first) = self.states.first_mut() {
            *first = CellState::Start;
        }
    }

    /// Was this table built for a maze of the same dimensions?
    pub fn is_for(&self, maze: &Maze) -> bool {
        self.rows == maze.rows() && self.columns == maze.columns() &&
        self.states.len() == maze.size()
    }

    #[inline]
    fn index(&self, coord: Coordinate) -> Option<usize> {
        if (coord.row as usize) < self.rows.0 && (coord.column as usize) < self.columns.0 {
            Some(coord.row as usize * self.columns.0 + coord.column as usize)
        } else {
            None
        }
    }

    pub fn get(&self, coord: Coordinate) -> Option<CellState> {
        self.index(coord).and_then(|index| self.states.get(index).cloned())
    }

    /// Returns false, changing nothing, when the coordinate is outside the table.
    pub fn set(&mut self, coord: Coordinate, state: CellState) -> bool {
        match self.index(coord).and_then(|index| self.states.get_mut(index)) {
            Some(slot) => {
                *slot = state;
                true
            }
            None => false,
        }
    }

    /// Recompute the state of the cell at `coord` from its south and east neighbours.
    ///
    /// The first matching rule wins:
    ///
    /// 1. Both forward directions are walled, unlinked or lead to a blocked cell: `Blocked`.
    /// 2. The south passage is open and leads to a naive cell: `Start`.
    /// 3. The east passage is open and leads to a naive cell: `Start`.
    /// 4. Otherwise the state is left as it is.
    ///
    /// Returns the state after the update, or None for a coordinate outside the maze.
    pub fn update_state(&mut self, maze: &Maze, coord: Coordinate) -> Option<CellState> {
        let cell = maze.cell(coord)?;
        let south = cell.neighbour_in_direction(CompassPrimary::South).and_then(|c| self.get(c));
        let east = cell.neighbour_in_direction(CompassPrimary::East).and_then(|c| self.get(c));
        let south_wall = cell.has_wall(CompassPrimary::South);
        let east_wall = cell.has_wall(CompassPrimary::East);

        let closed = |wall: bool, neighbour: Option<CellState>| {
            wall || neighbour.map_or(true, |state| state == CellState::Blocked)
        };

        let new_state = if closed(east_wall, east) && closed(south_wall, south) {
            Some(CellState::Blocked)
        } else if south == Some(CellState::Naive) && !south_wall {
            Some(CellState::Start)
        } else if east == Some(CellState::Naive) && !east_wall {
            Some(CellState::Start)
        } else {
            None
        };

        if let Some(state) = new_state {
            self.set(coord, state);
        }
        self.get(coord)
    }
}
