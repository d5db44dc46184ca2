// Create the Error, ErrorKind, ResultExt, and Result types.
// Other modules `use crate::errors::*;` to get access to everything `error_chain!` creates.
#![allow(deprecated)]

use crate::cells::Coordinate;
use error_chain::*;

error_chain! {

    foreign_links {
        Io(::std::io::Error);
        Json(::serde_json::Error);
    }

    errors {
        InvalidDimensions(rows: usize, columns: usize) {
            description("maze dimensions must be positive")
            display("invalid maze dimensions: {} rows by {} columns", rows, columns)
        }

        InvalidCoordinate(coord: Coordinate) {
            description("coordinate outside of the maze")
            display("coordinate {} is outside of the maze", coord)
        }

        InvalidConnection(a: Coordinate, b: Coordinate) {
            description("cells cannot be linked")
            display("cannot link cell {} to cell {}: cells must be distinct and adjacent", a, b)
        }

        CorruptMaze(reason: String) {
            description("maze data is inconsistent")
            display("maze data is inconsistent: {}", reason)
        }

        MazeAlreadyGenerated {
            description("maze already has passages")
            display("maze generation needs a maze with no passages carved yet")
        }

        InvalidStart(coord: Coordinate) {
            description("solving must start at the top left cell")
            display("solving must start at (0, 0), not {}", coord)
        }

        StateTableMismatch {
            description("cell states belong to a different maze")
            display("cell states were built for a maze of different dimensions")
        }

        NoSolution {
            description("maze has no solution")
            display("no route from the start cell to the goal cell")
        }

        StepLimitExceeded(limit: usize) {
            description("solver step limit reached")
            display("solver gave up after {} steps", limit)
        }
    }
}
