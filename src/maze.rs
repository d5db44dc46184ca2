use error_chain::bail;
use petgraph::algo;
use petgraph::graph::{NodeIndex, UnGraph};
use serde_derive::{Deserialize, Serialize};
use std::convert::TryFrom;

use crate::cells::{Cell, CompassPrimary, Coordinate};
use crate::errors::*;
use crate::units::{ColumnsCount, EdgesCount, NodesCount, RowsCount};

/// A rectangular grid of cells stored row-major, `(0, 0)` first.
///
/// The top left cell is where solving starts and the bottom right cell is the goal.
/// Cells reference each other by coordinate only, so a maze is plain data that can be
/// cloned, compared and serialized freely.
///
/// Deserializing goes through `validate`, so a maze read from outside is always whole.
#[derive(Eq, PartialEq, Clone, Debug, Serialize, Deserialize)]
#[serde(try_from = "MazeData")]
pub struct Maze {
    rows: RowsCount,
    columns: ColumnsCount,
    cells: Vec<Cell>,
}

/// Unchecked serialized form of a `Maze`.
#[derive(Deserialize)]
struct MazeData {
    rows: RowsCount,
    columns: ColumnsCount,
    cells: Vec<Cell>,
}

impl TryFrom<MazeData> for Maze {
    type Error = Error;

    fn try_from(data: MazeData) -> Result<Maze> {
        let maze = Maze {
            rows: data.rows,
            columns: data.columns,
            cells: data.cells,
        };
        maze.validate()?;
        Ok(maze)
    }
}

impl Maze {
    /// Creates a `rows` by `columns` maze where every cell is walled in.
    pub fn new(rows: RowsCount, columns: ColumnsCount) -> Result<Maze> {
        let (RowsCount(rows_count), ColumnsCount(columns_count)) = (rows, columns);
        if rows_count == 0 || columns_count == 0 ||
           rows_count > u32::MAX as usize || columns_count > u32::MAX as usize {
            bail!(ErrorKind::InvalidDimensions(rows_count, columns_count));
        }

        let size = rows_count.checked_mul(columns_count)
            .ok_or(ErrorKind::InvalidDimensions(rows_count, columns_count))?;
        let cells = (0..size)
            .map(|index| Cell::new(Coordinate::from_row_major_index(index, columns)))
            .collect();

        Ok(Maze { rows, columns, cells })
    }

    #[inline]
    pub fn rows(&self) -> RowsCount {
        self.rows
    }

    #[inline]
    pub fn columns(&self) -> ColumnsCount {
        self.columns
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn start(&self) -> Coordinate {
        Coordinate::new(0, 0)
    }

    #[inline]
    pub fn goal(&self) -> Coordinate {
        Coordinate::new((self.rows.0 - 1) as u32, (self.columns.0 - 1) as u32)
    }

    /// Is the grid coordinate valid for this maze - within the maze's dimensions
    #[inline]
    pub fn is_valid_coordinate(&self, coord: Coordinate) -> bool {
        (coord.row as usize) < self.rows.0 && (coord.column as usize) < self.columns.0
    }

    /// Convert a grid coordinate to a one dimensional index in the range 0...maze.size().
    /// Returns None if the grid coordinate is invalid.
    #[inline]
    pub fn grid_coordinate_to_index(&self, coord: Coordinate) -> Option<usize> {
        if self.is_valid_coordinate(coord) {
            Some(coord.row as usize * self.columns.0 + coord.column as usize)
        } else {
            None
        }
    }

    pub fn cell(&self, coord: Coordinate) -> Option<&Cell> {
        self.grid_coordinate_to_index(coord).map(|index| &self.cells[index])
    }

    fn cell_mut(&mut self, coord: Coordinate) -> Option<&mut Cell> {
        match self.grid_coordinate_to_index(coord) {
            Some(index) => Some(&mut self.cells[index]),
            None => None,
        }
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// The cell adjacent to `coord` in `direction` on the grid, linked to it or not.
    pub fn neighbour_at_direction(&self,
                                  coord: Coordinate,
                                  direction: CompassPrimary)
                                  -> Option<Coordinate> {
        coord.offset(direction).filter(|neighbour| self.is_valid_coordinate(*neighbour))
    }

    /// The neighbour registered as linked to `coord` in `direction`.
    ///
    /// Absent at the maze boundary and wherever no passage has been carved yet.
    pub fn neighbour_in_direction(&self,
                                  coord: Coordinate,
                                  direction: CompassPrimary)
                                  -> Option<Coordinate> {
        self.cell(coord).and_then(|cell| cell.neighbour_in_direction(direction))
    }

    /// Is there an open wall between `coord` and its adjacent cell in `direction`?
    /// The maze boundary is always closed.
    pub fn is_open(&self, coord: Coordinate, direction: CompassPrimary) -> bool {
        self.neighbour_at_direction(coord, direction).is_some() &&
        self.cell(coord).map_or(false, |cell| !cell.has_wall(direction))
    }

    /// Register a mutual link between two adjacent cells. Walls are not touched.
    ///
    /// Linking cells that are already linked is a no-op. Self links, links to cells outside
    /// the maze and links between cells that are not adjacent are rejected without mutating
    /// anything.
    pub fn add_neighbour(&mut self, a: Coordinate, b: Coordinate) -> Result<()> {
        self.check_link(a, b)?;

        if let Some(cell) = self.cell_mut(a) {
            cell.add_neighbour(b);
        }
        if let Some(cell) = self.cell_mut(b) {
            cell.add_neighbour(a);
        }
        Ok(())
    }

    /// Open the wall between `coord` and its adjacent cell in `direction` on both sides and
    /// link the two cells. Returns the coordinate of the cell linked to.
    pub fn carve_passage(&mut self,
                         coord: Coordinate,
                         direction: CompassPrimary)
                         -> Result<Coordinate> {
        if !self.is_valid_coordinate(coord) {
            bail!(ErrorKind::InvalidCoordinate(coord));
        }
        let neighbour = match self.neighbour_at_direction(coord, direction) {
            Some(n) => n,
            None => {
                let outside = coord.offset(direction).unwrap_or(coord);
                bail!(ErrorKind::InvalidConnection(coord, outside));
            }
        };

        self.add_neighbour(coord, neighbour)?;
        if let Some(cell) = self.cell_mut(coord) {
            cell.open_wall(direction);
        }
        if let Some(cell) = self.cell_mut(neighbour) {
            cell.open_wall(direction.opposite());
        }
        Ok(neighbour)
    }

    /// Are two cells in the maze linked?
    pub fn is_linked(&self, a: Coordinate, b: Coordinate) -> bool {
        self.cell(a).map_or(false, |cell| cell.is_neighbour(b))
    }

    pub fn passages_count(&self) -> usize {
        self.cells.iter().map(|cell| cell.neighbours().len()).sum::<usize>() / 2
    }

    /// Every link once, as (earlier cell, later cell) in row-major order.
    pub fn iter_passages<'a>(&'a self) -> impl Iterator<Item = (Coordinate, Coordinate)> + 'a {
        self.cells.iter().flat_map(|cell| {
            let src = cell.coordinate();
            cell.neighbours()
                .iter()
                .cloned()
                .filter(move |dst| src < *dst)
                .map(move |dst| (src, dst))
        })
    }

    /// Cell coordinates in row-major order.
    pub fn iter<'a>(&'a self) -> impl Iterator<Item = Coordinate> + 'a {
        self.cells.iter().map(Cell::coordinate)
    }

    /// Cell coordinates batched one row at a time, top row first.
    pub fn iter_row<'a>(&'a self) -> impl Iterator<Item = Vec<Coordinate>> + 'a {
        self.cells
            .chunks(self.columns.0)
            .map(|row| row.iter().map(Cell::coordinate).collect())
    }

    /// Node count and edge count of a perfect maze with these dimensions.
    pub fn graph_size(&self) -> (NodesCount, EdgesCount) {
        (NodesCount(self.size()), EdgesCount(self.size() - 1))
    }

    /// The passages as an undirected graph. Node indices follow the row-major cell index.
    pub fn passage_graph(&self) -> UnGraph<Coordinate, ()> {
        let (NodesCount(nodes), EdgesCount(edges)) = self.graph_size();
        let mut graph = UnGraph::with_capacity(nodes, edges);
        for coord in self.iter() {
            let _ = graph.add_node(coord);
        }
        for (src, dst) in self.iter_passages() {
            if let (Some(a), Some(b)) = (self.grid_coordinate_to_index(src),
                                         self.grid_coordinate_to_index(dst)) {
                let _ = graph.add_edge(NodeIndex::new(a), NodeIndex::new(b), ());
            }
        }
        graph
    }

    /// Whether a route of passages joins two cells. Cells outside the maze are never
    /// connected.
    pub fn is_connected(&self, a: Coordinate, b: Coordinate) -> bool {
        match (self.grid_coordinate_to_index(a), self.grid_coordinate_to_index(b)) {
            (Some(a_index), Some(b_index)) => {
                let graph = self.passage_graph();
                algo::has_path_connecting(&graph, NodeIndex::new(a_index), NodeIndex::new(b_index), None)
            }
            _ => false,
        }
    }

    /// A perfect maze: every cell reachable from every other by exactly one route.
    pub fn is_perfect(&self) -> bool {
        let graph = self.passage_graph();
        let (_, EdgesCount(tree_edges)) = self.graph_size();
        graph.edge_count() == tree_edges && algo::connected_components(&graph) == 1
    }

    /// Walls and links agree. The outer boundary is closed, links only join adjacent cells and
    /// are mutual, and an open wall always leads through a link into a cell whose facing wall
    /// is open too. A link with both walls still standing is a closed passage.
    pub fn is_consistent(&self) -> bool {
        self.cells.iter().all(|cell| {
            let coord = cell.coordinate();
            let adjacent_links = CompassPrimary::ALL
                .iter()
                .filter(|dir| cell.neighbour_in_direction(**dir).is_some())
                .count();

            adjacent_links == cell.neighbours().len() &&
            CompassPrimary::ALL.iter().all(|&dir| {
                let facing = self.neighbour_at_direction(coord, dir).and_then(|n| self.cell(n));
                match (facing, cell.neighbour_in_direction(dir)) {
                    (Some(other), Some(_)) => {
                        other.is_neighbour(coord) &&
                        cell.has_wall(dir) == other.has_wall(dir.opposite())
                    }
                    _ => cell.has_wall(dir),
                }
            })
        })
    }

    /// Checks data loaded from outside: dimensions agree with the cells, every cell is where
    /// its coordinate says, every link points into the maze and walls agree with links.
    pub fn validate(&self) -> Result<()> {
        let (RowsCount(rows), ColumnsCount(columns)) = (self.rows, self.columns);
        if rows == 0 || columns == 0 ||
           rows > u32::MAX as usize || columns > u32::MAX as usize {
            bail!(ErrorKind::InvalidDimensions(rows, columns));
        }
        let expected_cells = rows.checked_mul(columns)
            .ok_or(ErrorKind::InvalidDimensions(rows, columns))?;
        if self.cells.len() != expected_cells {
            bail!(ErrorKind::CorruptMaze(format!("expected {} cells, found {}",
                                                 expected_cells,
                                                 self.cells.len())));
        }
        for (index, cell) in self.cells.iter().enumerate() {
            let expected = Coordinate::from_row_major_index(index, self.columns);
            if cell.coordinate() != expected {
                bail!(ErrorKind::CorruptMaze(format!("cell {} stored at the position of {}",
                                                     cell.coordinate(),
                                                     expected)));
            }
            for neighbour in cell.neighbours() {
                if !self.is_valid_coordinate(*neighbour) {
                    bail!(ErrorKind::InvalidCoordinate(*neighbour));
                }
            }
        }
        if !self.is_consistent() {
            bail!(ErrorKind::CorruptMaze(String::from("walls and links disagree")));
        }
        Ok(())
    }

    fn check_link(&self, a: Coordinate, b: Coordinate) -> Result<()> {
        if !self.is_valid_coordinate(a) {
            bail!(ErrorKind::InvalidCoordinate(a));
        }
        if !self.is_valid_coordinate(b) {
            bail!(ErrorKind::InvalidCoordinate(b));
        }
        if a.direction_to(b).is_none() {
            bail!(ErrorKind::InvalidConnection(a, b));
        }
        Ok(())
    }
}
