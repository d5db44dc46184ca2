//! **mazes** generates perfect mazes on rectangular grids with the binary tree algorithm and
//! solves them with a depth first, backtracking walk that only ever moves south or east.

// error_chain! recursion depth
#![recursion_limit = "1024"]

pub mod cell_states;
pub mod cells;
pub mod errors;
pub mod generators;
pub mod grid_displays;
pub mod maze;
pub mod pathing;
pub mod persistence;
pub mod units;
mod utils;
