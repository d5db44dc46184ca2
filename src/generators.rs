use error_chain::bail;
use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::cells::{CompassPrimary, Coordinate};
use crate::errors::*;
use crate::maze::Maze;

/// Apply the binary tree maze generation algorithm to a maze
/// It works simply by visiting each cell in row-major order and carving a passage
/// either north or west, towards cells that were already visited.
/// Every cell but the top left one gets exactly one passage back into the connected region
/// that holds `(0, 0)`, so the result is a perfect maze: a spanning tree of the grid.
///
/// Cells on the top row can only go west and cells in the left column can only go north;
/// those consume nothing from `rng`. Every other cell takes one `bool` from `rng`, `true`
/// meaning north.
///
/// The maze must not have any passages yet.
pub fn binary_tree<R: Rng>(maze: &mut Maze, rng: &mut R) -> Result<()> {
    if maze.passages_count() != 0 {
        bail!(ErrorKind::MazeAlreadyGenerated);
    }

    let columns = maze.columns();
    let mut coin_flips = 0;

    for index in 0..maze.size() {
        let cell_coord = Coordinate::from_row_major_index(index, columns);

        let north = maze.neighbour_at_direction(cell_coord, CompassPrimary::North);
        let west = maze.neighbour_at_direction(cell_coord, CompassPrimary::West);

        let direction = match (north, west) {
            (None, None) => continue,
            (Some(_), None) => CompassPrimary::North,
            (None, Some(_)) => CompassPrimary::West,
            (Some(_), Some(_)) => {
                coin_flips += 1;
                rand_north_or_west(rng)
            }
        };

        maze.carve_passage(cell_coord, direction)?;
    }

    debug!("binary tree generated {}x{} maze: {} passages, {} random choices",
           maze.rows().0,
           maze.columns().0,
           maze.passages_count(),
           coin_flips);
    Ok(())
}

/// Binary tree generation that is reproducible from `seed`.
pub fn binary_tree_seeded(maze: &mut Maze, seed: u64) -> Result<()> {
    let mut rng = StdRng::seed_from_u64(seed);
    binary_tree(maze, &mut rng)
}

/// Binary tree generation seeded from the thread local generator.
pub fn binary_tree_random(maze: &mut Maze) -> Result<()> {
    let mut rng = rand::thread_rng();
    binary_tree(maze, &mut rng)
}

fn rand_north_or_west<R: Rng>(rng: &mut R) -> CompassPrimary {
    if rng.gen() {
        CompassPrimary::North
    } else {
        CompassPrimary::West
    }
}

#[cfg(test)]
mod tests {

    use itertools::Itertools;
    use petgraph::algo::is_cyclic_undirected;
    use quickcheck::{quickcheck, TestResult};
    use rand::rngs::mock::StepRng;

    use super::*;
    use crate::units::{ColumnsCount, RowsCount};

    fn maze(rows: usize, columns: usize) -> Maze {
        Maze::new(RowsCount(rows), ColumnsCount(columns)).expect("valid maze dimensions")
    }

    fn gc(row: u32, column: u32) -> Coordinate {
        Coordinate::new(row, column)
    }

    // Every `gen::<bool>()` from these is the sign bit of 0 or of u32::MAX.
    fn always_west() -> StepRng {
        StepRng::new(0, 0)
    }

    fn always_north() -> StepRng {
        StepRng::new(u64::from(u32::MAX), 0)
    }

    #[test]
    fn two_by_two_west_choice() {
        let mut m = maze(2, 2);
        binary_tree(&mut m, &mut always_west()).unwrap();

        assert_eq!(m.iter_passages().sorted().collect::<Vec<_>>(),
                   vec![(gc(0, 0), gc(0, 1)), (gc(0, 0), gc(1, 0)), (gc(1, 0), gc(1, 1))]);
        assert_eq!(m.cell(gc(0, 0)).unwrap().walls().as_flags(), [true, false, false, true]);
        assert_eq!(m.cell(gc(0, 1)).unwrap().walls().as_flags(), [false, true, true, true]);
        assert_eq!(m.cell(gc(1, 0)).unwrap().walls().as_flags(), [true, true, false, false]);
        assert_eq!(m.cell(gc(1, 1)).unwrap().walls().as_flags(), [false, true, true, true]);
    }

    #[test]
    fn two_by_two_north_choice() {
        let mut m = maze(2, 2);
        binary_tree(&mut m, &mut always_north()).unwrap();

        assert_eq!(m.iter_passages().sorted().collect::<Vec<_>>(),
                   vec![(gc(0, 0), gc(0, 1)), (gc(0, 0), gc(1, 0)), (gc(0, 1), gc(1, 1))]);
        assert_eq!(m.cell(gc(1, 1)).unwrap().walls().as_flags(), [true, true, true, false]);
        assert_eq!(m.cell(gc(0, 1)).unwrap().walls().as_flags(), [false, false, true, true]);
    }

    #[test]
    fn forced_cells_consume_no_randomness() {
        // 1 x n and n x 1 mazes never need a coin flip, so a generator that
        // would pick the impossible direction has no effect.
        let mut row = maze(1, 4);
        binary_tree(&mut row, &mut always_north()).unwrap();
        for col in 1..4 {
            assert!(row.is_linked(gc(0, col), gc(0, col - 1)));
        }

        let mut column = maze(4, 1);
        binary_tree(&mut column, &mut always_west()).unwrap();
        for r in 1..4 {
            assert!(column.is_linked(gc(r, 0), gc(r - 1, 0)));
        }
    }

    #[test]
    fn all_north_gives_open_top_row_and_columns() {
        let mut m = maze(3, 3);
        binary_tree(&mut m, &mut always_north()).unwrap();
        for coord in m.iter() {
            let expected_links = if coord.row == 0 {
                // top row links west, and is the target of every cell beneath
                (coord.column > 0) as usize + (coord.column < 2) as usize + 1
            } else {
                1 + (coord.row < 2) as usize
            };
            assert_eq!(m.cell(coord).unwrap().neighbours().len(), expected_links);
        }
    }

    #[test]
    fn same_seed_same_maze() {
        let mut a = maze(12, 9);
        let mut b = maze(12, 9);
        binary_tree_seeded(&mut a, 1234).unwrap();
        binary_tree_seeded(&mut b, 1234).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn single_cell_has_no_passages() {
        let mut m = maze(1, 1);
        binary_tree_random(&mut m).unwrap();
        assert_eq!(m.passages_count(), 0);
        assert_eq!(m.cell(gc(0, 0)).unwrap().walls().as_flags(), [true; 4]);
    }

    #[test]
    fn generating_twice_rejected() {
        let mut m = maze(3, 3);
        binary_tree_seeded(&mut m, 7).unwrap();
        let before = m.clone();
        let err = binary_tree_seeded(&mut m, 7).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::MazeAlreadyGenerated));
        assert_eq!(m, before);
    }

    #[test]
    fn generated_mazes_are_spanning_trees() {
        fn prop(rows: u8, columns: u8, seed: u64) -> TestResult {
            let (rows, columns) = (rows as usize % 24 + 1, columns as usize % 24 + 1);
            let mut m = maze(rows, columns);
            if binary_tree_seeded(&mut m, seed).is_err() {
                return TestResult::failed();
            }
            let graph = m.passage_graph();
            TestResult::from_bool(m.passages_count() == rows * columns - 1 &&
                                  m.is_perfect() &&
                                  !is_cyclic_undirected(&graph) &&
                                  m.is_connected(m.start(), m.goal()))
        }
        quickcheck(prop as fn(u8, u8, u64) -> TestResult);
    }

    #[test]
    fn generated_walls_are_mutual() {
        fn prop(rows: u8, columns: u8, seed: u64) -> bool {
            let (rows, columns) = (rows as usize % 24 + 1, columns as usize % 24 + 1);
            let mut m = maze(rows, columns);
            binary_tree_seeded(&mut m, seed).is_ok() && m.is_consistent()
        }
        quickcheck(prop as fn(u8, u8, u64) -> bool);
    }

    #[test]
    fn every_cell_links_north_or_west() {
        fn prop(rows: u8, columns: u8, seed: u64) -> bool {
            let (rows, columns) = (rows as usize % 16 + 1, columns as usize % 16 + 1);
            let mut m = maze(rows, columns);
            if binary_tree_seeded(&mut m, seed).is_err() {
                return false;
            }
            let single_back_link = m.iter().filter(|c| *c != m.start()).all(|coord| {
                let back_links = [CompassPrimary::North, CompassPrimary::West]
                    .iter()
                    .filter(|dir| m.neighbour_in_direction(coord, **dir).is_some())
                    .count();
                back_links == 1
            });
            single_back_link
        }
        quickcheck(prop as fn(u8, u8, u64) -> bool);
    }
}
