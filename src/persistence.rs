//! Saving and loading mazes.
//!
//! Mazes round trip through JSON with `serde_json`. The edge list format written by
//! [`write_edges`](fn.write_edges.html) is output only: line 1 is `n m` (vertex count, edge count)
//! and every following line is one passage as a pair of 1-based row-major cell indices.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use log::debug;

use crate::errors::*;
use crate::maze::Maze;

pub fn save_maze<W: Write>(maze: &Maze, writer: W) -> Result<()> {
    serde_json::to_writer_pretty(writer, maze)?;
    Ok(())
}

/// Read a maze. Deserializing validates it: dimensions, cell positions, links and walls must
/// all agree.
pub fn load_maze<R: Read>(reader: R) -> Result<Maze> {
    let maze = serde_json::from_reader(reader)?;
    Ok(maze)
}

pub fn save_maze_to_path<P: AsRef<Path>>(maze: &Maze, path: P) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path)
        .chain_err(|| format!("Failed to create maze file {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    save_maze(maze, &mut writer)
        .chain_err(|| format!("Failed to save maze to {}", path.display()))?;
    writer.flush()?;
    debug!("saved {}x{} maze to {}", maze.rows().0, maze.columns().0, path.display());
    Ok(())
}

pub fn load_maze_from_path<P: AsRef<Path>>(path: P) -> Result<Maze> {
    let path = path.as_ref();
    let file = File::open(path)
        .chain_err(|| format!("Failed to open maze file {}", path.display()))?;
    let maze = load_maze(BufReader::new(file))
        .chain_err(|| format!("Failed to load maze from {}", path.display()))?;
    debug!("loaded {}x{} maze from {}", maze.rows().0, maze.columns().0, path.display());
    Ok(maze)
}

pub fn write_edges<W: Write>(maze: &Maze, mut writer: W) -> Result<()> {
    writeln!(writer, "{} {}", maze.size(), maze.passages_count())?;

    for (src, dst) in maze.iter_passages() {
        let index_a = maze.grid_coordinate_to_index(src)
            .ok_or_else(|| ErrorKind::InvalidCoordinate(src))?;
        let index_b = maze.grid_coordinate_to_index(dst)
            .ok_or_else(|| ErrorKind::InvalidCoordinate(dst))?;
        writeln!(writer, "{} {}", index_a + 1, index_b + 1)?;
    }
    Ok(())
}

pub fn write_edges_to_path<P: AsRef<Path>>(maze: &Maze, path: P) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path)
        .chain_err(|| format!("Failed to create edge list file {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    write_edges(maze, &mut writer)
        .chain_err(|| format!("Failed to write maze graph to text file {}", path.display()))?;
    writer.flush()?;
    Ok(())
}
