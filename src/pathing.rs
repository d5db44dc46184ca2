use error_chain::bail;
use log::{debug, trace, warn};

use crate::cell_states::CellStates;
use crate::cells::{CellState, CompassPrimary, Coordinate};
use crate::errors::*;
use crate::maze::Maze;

/// Depth first backtracking search from the top left cell to the bottom right cell, moving
/// only south or east.
///
/// On a perfect maze made by the binary tree generator every cell has a route back to the
/// top left cell going only north or west, so the reverse of the goal's route is found by a
/// south/east search and it is the only route there is.
///
/// The search walks an explicit path stack, marking cells in a `CellStates` table:
/// cells it steps into become `Visited`, cells it proves to be dead ends become `Blocked`,
/// and cells it leaves with an unexplored passage behind become `Start`, which is where
/// backtracking stops.
#[derive(Debug, Copy, Clone, Default)]
pub struct Solver {
    step_limit: Option<usize>,
}

impl Solver {
    pub fn new() -> Solver {
        Solver { step_limit: None }
    }

    /// Give up with `StepLimitExceeded` after `limit` moves or backtracks.
    pub fn with_step_limit(limit: usize) -> Solver {
        Solver { step_limit: Some(limit) }
    }

    /// Solve with a fresh state table.
    pub fn solve(&self, maze: &Maze) -> Result<Vec<Coordinate>> {
        let mut states = CellStates::new(maze);
        self.solve_with_states(maze, &mut states)
    }

    /// Solve from `start`, which must be the maze's top left cell.
    pub fn solve_from(&self,
                      maze: &Maze,
                      start: Coordinate,
                      states: &mut CellStates)
                      -> Result<Vec<Coordinate>> {
        if start != maze.start() {
            bail!(ErrorKind::InvalidStart(start));
        }
        self.solve_with_states(maze, states)
    }

    /// Solve using, and leaving behind, the caller's state table.
    ///
    /// The table is normally fresh (see `CellStates::reset`). Cells already marked in it are
    /// honoured, so a table with a blocked start cell fails straight away.
    pub fn solve_with_states(&self,
                             maze: &Maze,
                             states: &mut CellStates)
                             -> Result<Vec<Coordinate>> {
        if !states.is_for(maze) {
            bail!(ErrorKind::StateTableMismatch);
        }

        let goal = maze.goal();
        let mut path = vec![maze.start()];
        let mut steps = 0;

        loop {
            let current = match path.last() {
                Some(&coord) => coord,
                None => {
                    warn!("backtracked past the start cell, maze has no solution");
                    bail!(ErrorKind::NoSolution);
                }
            };

            if current == goal {
                debug!("solved {}x{} maze in {} steps, path length {}",
                       maze.rows().0,
                       maze.columns().0,
                       steps,
                       path.len());
                return Ok(path);
            }

            if is_start_exhausted(maze, states, path[0]) {
                warn!("start cell {} is blocked, maze has no solution", path[0]);
                bail!(ErrorKind::NoSolution);
            }

            if let Some(limit) = self.step_limit {
                if steps >= limit {
                    bail!(ErrorKind::StepLimitExceeded(limit));
                }
            }
            steps += 1;

            match next_forward_cell(maze, states, current) {
                Some(next) => {
                    states.set(next, CellState::Visited);
                    states.update_state(maze, current);
                    path.push(next);
                }
                None => {
                    states.update_state(maze, current);
                    backtrack(states, &mut path);
                }
            }
        }
    }
}

/// Solve `maze` with a default `Solver`.
pub fn solve(maze: &Maze) -> Result<Vec<Coordinate>> {
    Solver::new().solve(maze)
}

/// Is `path` a route through linked cells from the maze start to the maze goal that never
/// repeats a cell?
pub fn is_valid_solution(maze: &Maze, path: &[Coordinate]) -> bool {
    let ends_ok = path.first() == Some(&maze.start()) && path.last() == Some(&maze.goal());
    let steps_ok = path.windows(2).all(|pair| maze.is_linked(pair[0], pair[1]));
    let mut seen = crate::utils::fnv_hashset(path.len());
    let simple = path.iter().all(|coord| seen.insert(*coord));
    ends_ok && steps_ok && simple
}

fn is_start_exhausted(maze: &Maze, states: &CellStates, start: Coordinate) -> bool {
    let is_blocked = |coord: Option<Coordinate>| {
        coord.and_then(|c| states.get(c)) == Some(CellState::Blocked)
    };
    is_blocked(Some(start)) ||
    (is_blocked(maze.neighbour_in_direction(start, CompassPrimary::South)) &&
     is_blocked(maze.neighbour_in_direction(start, CompassPrimary::East)))
}

/// South first, then east: an open passage to a cell the search has not been to.
fn next_forward_cell(maze: &Maze, states: &CellStates, coord: Coordinate) -> Option<Coordinate> {
    let cell = maze.cell(coord)?;
    [CompassPrimary::South, CompassPrimary::East]
        .iter()
        .filter(|dir| !cell.has_wall(**dir))
        .filter_map(|dir| cell.neighbour_in_direction(*dir))
        .find(|next| states.get(*next) == Some(CellState::Naive))
}

/// Block and drop the dead end at the tip of the path, then keep going until the tip is a
/// cell with an unexplored passage left.
fn backtrack(states: &mut CellStates, path: &mut Vec<Coordinate>) {
    while let Some(dead_end) = path.pop() {
        states.set(dead_end, CellState::Blocked);
        trace!("backtracking from {}", dead_end);

        match path.last() {
            Some(&tip) if states.get(tip) == Some(CellState::Start) => break,
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {

    use quickcheck::{quickcheck, TestResult};
    use rand::rngs::mock::StepRng;

    use super::*;
    use crate::generators;
    use crate::units::{ColumnsCount, RowsCount};

    fn maze(rows: usize, columns: usize) -> Maze {
        Maze::new(RowsCount(rows), ColumnsCount(columns)).expect("valid maze dimensions")
    }

    fn gc(row: u32, column: u32) -> Coordinate {
        Coordinate::new(row, column)
    }

    fn assert_no_solution(result: Result<Vec<Coordinate>>) {
        match result {
            Err(ref e) if matches!(e.kind(), ErrorKind::NoSolution) => {}
            other => panic!("expected no solution, got {:?}", other),
        }
    }

    #[test]
    fn single_cell_maze() {
        let m = maze(1, 1);
        assert_eq!(solve(&m).unwrap(), vec![gc(0, 0)]);
    }

    #[test]
    fn two_by_two_west_choice() {
        // (1,1) carves west: the route runs down the left column then east.
        let mut m = maze(2, 2);
        generators::binary_tree(&mut m, &mut StepRng::new(0, 0)).unwrap();
        assert_eq!(solve(&m).unwrap(), vec![gc(0, 0), gc(1, 0), gc(1, 1)]);
    }

    #[test]
    fn two_by_two_north_choice() {
        // (1,1) carves north: going south first hits a dead end at (1,0), the search
        // backtracks to the start and finds the route along the top row.
        let mut m = maze(2, 2);
        generators::binary_tree(&mut m, &mut StepRng::new(u64::from(u32::MAX), 0)).unwrap();

        let mut states = CellStates::new(&m);
        let path = Solver::new().solve_with_states(&m, &mut states).unwrap();
        assert_eq!(path, vec![gc(0, 0), gc(0, 1), gc(1, 1)]);

        assert_eq!(states.get(gc(0, 0)), Some(CellState::Start));
        assert_eq!(states.get(gc(1, 0)), Some(CellState::Blocked));
        assert_eq!(states.get(gc(0, 1)), Some(CellState::Visited));
        assert_eq!(states.get(gc(1, 1)), Some(CellState::Visited));
    }

    #[test]
    fn hand_built_backtracking() {
        // 3x3, a dead end branch two cells deep before the route:
        // (0,0)-(1,0)-(2,0) dead end going south, (1,0)-(1,1) dead end east,
        // (0,0)-(0,1)-(0,2)-(1,2)-(2,2) the route.
        let mut m = maze(3, 3);
        m.carve_passage(gc(0, 0), CompassPrimary::South).unwrap();
        m.carve_passage(gc(1, 0), CompassPrimary::South).unwrap();
        m.carve_passage(gc(1, 0), CompassPrimary::East).unwrap();
        m.carve_passage(gc(0, 0), CompassPrimary::East).unwrap();
        m.carve_passage(gc(0, 1), CompassPrimary::East).unwrap();
        m.carve_passage(gc(0, 2), CompassPrimary::South).unwrap();
        m.carve_passage(gc(1, 2), CompassPrimary::South).unwrap();
        m.carve_passage(gc(2, 0), CompassPrimary::East).unwrap();

        let mut states = CellStates::new(&m);
        let path = Solver::new().solve_with_states(&m, &mut states).unwrap();
        assert_eq!(path, vec![gc(0, 0), gc(0, 1), gc(0, 2), gc(1, 2), gc(2, 2)]);
        for dead_end in &[gc(1, 0), gc(2, 0), gc(2, 1), gc(1, 1)] {
            assert_eq!(states.get(*dead_end), Some(CellState::Blocked));
        }
        assert!(is_valid_solution(&m, &path));
    }

    #[test]
    fn blocked_start_has_no_solution() {
        let mut m = maze(2, 2);
        generators::binary_tree_seeded(&mut m, 3).unwrap();
        let mut states = CellStates::new(&m);
        states.set(m.start(), CellState::Blocked);
        assert_no_solution(Solver::new().solve_with_states(&m, &mut states));
    }

    #[test]
    fn blocked_start_neighbours_have_no_solution() {
        let mut m = maze(3, 3);
        generators::binary_tree_seeded(&mut m, 11).unwrap();
        let mut states = CellStates::new(&m);
        states.set(gc(0, 1), CellState::Blocked);
        states.set(gc(1, 0), CellState::Blocked);
        assert_no_solution(Solver::new().solve_with_states(&m, &mut states));
    }

    #[test]
    fn ungenerated_maze_has_no_solution() {
        assert_no_solution(solve(&maze(3, 4)));
        assert_no_solution(solve(&maze(1, 2)));
        assert_no_solution(solve(&maze(5, 1)));
    }

    #[test]
    fn disconnected_goal_has_no_solution() {
        let mut m = maze(2, 3);
        m.carve_passage(gc(0, 0), CompassPrimary::East).unwrap();
        m.carve_passage(gc(0, 1), CompassPrimary::East).unwrap();
        m.carve_passage(gc(0, 0), CompassPrimary::South).unwrap();
        m.carve_passage(gc(1, 0), CompassPrimary::East).unwrap();
        assert_no_solution(solve(&m));
    }

    #[test]
    fn solving_again_needs_no_reset() {
        let mut m = maze(8, 8);
        generators::binary_tree_seeded(&mut m, 42).unwrap();
        let first = solve(&m).unwrap();
        let second = solve(&m).unwrap();
        assert_eq!(first, second);

        let mut states = CellStates::new(&m);
        let third = Solver::new().solve_with_states(&m, &mut states).unwrap();
        states.reset();
        let fourth = Solver::new().solve_with_states(&m, &mut states).unwrap();
        assert_eq!(third, fourth);
        assert_eq!(first, third);
    }

    #[test]
    fn start_must_be_top_left() {
        let m = maze(2, 2);
        let mut states = CellStates::new(&m);
        let err = Solver::new().solve_from(&m, gc(1, 0), &mut states).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::InvalidStart(_)));
    }

    #[test]
    fn mismatched_state_table_rejected() {
        let m = maze(2, 2);
        let mut states = CellStates::new(&maze(3, 3));
        let err = Solver::new().solve_with_states(&m, &mut states).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::StateTableMismatch));
    }

    #[test]
    fn step_limit() {
        let mut m = maze(10, 10);
        generators::binary_tree_seeded(&mut m, 5).unwrap();
        let err = Solver::with_step_limit(3).solve(&m).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::StepLimitExceeded(3)));

        // Every cell is stepped into at most once and popped at most once.
        assert!(Solver::with_step_limit(2 * m.size()).solve(&m).is_ok());
    }

    #[test]
    fn large_maze_without_recursion() {
        let mut m = maze(300, 300);
        generators::binary_tree_seeded(&mut m, 99).unwrap();
        let path = solve(&m).unwrap();
        assert!(is_valid_solution(&m, &path));
    }

    #[test]
    fn solutions_are_simple_routes_to_the_goal() {
        fn prop(rows: u8, columns: u8, seed: u64) -> TestResult {
            let (rows, columns) = (rows as usize % 24 + 1, columns as usize % 24 + 1);
            let mut m = maze(rows, columns);
            if generators::binary_tree_seeded(&mut m, seed).is_err() {
                return TestResult::failed();
            }
            match solve(&m) {
                Ok(path) => {
                    // Monotone south/east steps: the length is fixed by the dimensions.
                    TestResult::from_bool(is_valid_solution(&m, &path) &&
                                          path.len() == rows + columns - 1)
                }
                Err(_) => TestResult::failed(),
            }
        }
        quickcheck(prop as fn(u8, u8, u64) -> TestResult);
    }

    #[test]
    fn solution_validation() {
        let mut m = maze(2, 2);
        generators::binary_tree(&mut m, &mut StepRng::new(0, 0)).unwrap();
        assert!(is_valid_solution(&m, &[gc(0, 0), gc(1, 0), gc(1, 1)]));
        assert!(!is_valid_solution(&m, &[gc(0, 0), gc(0, 1), gc(1, 1)]));
        assert!(!is_valid_solution(&m, &[gc(0, 0), gc(1, 0)]));
        assert!(!is_valid_solution(&m, &[]));
        assert!(!is_valid_solution(&m,
                                   &[gc(0, 0), gc(1, 0), gc(0, 0), gc(1, 0), gc(1, 1)]));
    }
}
