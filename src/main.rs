use docopt::Docopt;
use log::{info, warn, Level, LevelFilter, Log, Metadata, Record};
use serde_derive::Deserialize;
use mazes::{
    generators,
    grid_displays::{PathDisplay, StartEndPointsDisplay},
    maze::Maze,
    pathing,
    persistence,
    units::{ColumnsCount, RowsCount},
};
use std::{
    io,
    io::prelude::*,
    fs::File,
};

const USAGE: &str = "Mazes

Usage:
    mazes_driver -h | --help
    mazes_driver [(--grid-size=<n>|[--grid-rows=<r> --grid-columns=<c>])] [--seed=<s>] [--show-path] [--text-out=<path>] [--save=<path>] [--save-edges=<path>] [--verbose]
    mazes_driver load <path> [--show-path] [--text-out=<path>] [--save-edges=<path>] [--verbose]

Options:
    -h --help              Show this screen.
    --grid-size=<n>        The grid size is n * n.
    --grid-rows=<r>        The number of rows in an r*c grid [default: 10].
    --grid-columns=<c>     The number of columns in an r*c grid [default: 10].
    --seed=<s>             Seed for the random choices of the binary tree generator. Random if not given.
    --show-path            Show the path from the top left cell to the bottom right cell.
    --text-out=<path>      Output file path for a textual rendering of a maze. Printed to stdout if not given.
    --save=<path>          Save the generated maze as JSON, to be read back with the load command.
    --save-edges=<path>    Serialize the maze to a text file: each line is a pair of numbers. Line 1: n(#vertices) m(#edges). Line 2+ edge between vertices. Uses 1-based vertex indices.
    --verbose              Log generation and solving details to stderr.
";
#[derive(Debug, Deserialize)]
struct MazeArgs {
    flag_grid_size: Option<usize>,
    flag_grid_rows: usize,
    flag_grid_columns: usize,
    flag_seed: Option<u64>,
    flag_show_path: bool,
    flag_text_out: String,
    flag_save: String,
    flag_save_edges: String,
    flag_verbose: bool,
    cmd_load: bool,
    arg_path: String,
}

mod errors {
    use error_chain::*;
    error_chain! {

        links {
            Maze(::mazes::errors::Error, ::mazes::errors::ErrorKind);
        }

        foreign_links {
            Io(::std::io::Error);
            Logger(::log::SetLoggerError);
        }
    }
}
use crate::errors::*;

/// Writes log records to stderr.
struct StderrLogger {
    level: Level,
}

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            eprintln!("[{}] {}: {}", record.level(), record.target(), record.args());
        }
    }

    fn flush(&self) {}
}

fn init_logging(verbose: bool) -> Result<()> {
    let level = if verbose { Level::Debug } else { Level::Warn };
    log::set_boxed_logger(Box::new(StderrLogger { level }))?;
    log::set_max_level(if verbose { LevelFilter::Debug } else { LevelFilter::Warn });
    Ok(())
}

fn main() {
    if let Err(ref e) = run() {
        eprintln!("error: {}", e);
        for e in e.iter().skip(1) {
            eprintln!("caused by: {}", e);
        }
        ::std::process::exit(1);
    }
}

fn run() -> Result<()> {

    let args: MazeArgs = Docopt::new(USAGE)
        .and_then(|d| d.deserialize())
        .unwrap_or_else(|e| e.exit());

    init_logging(args.flag_verbose)?;

    let maze = if args.cmd_load {
        persistence::load_maze_from_path(&args.arg_path)?
    } else {
        generate_maze(&args)?
    };

    if !args.flag_save.is_empty() {
        persistence::save_maze_to_path(&maze, &args.flag_save)?;
    }

    if !args.flag_save_edges.is_empty() {
        persistence::write_edges_to_path(&maze, &args.flag_save_edges)?;
    }

    let text = render_text(&maze, args.flag_show_path)?;

    if args.flag_text_out.is_empty() {
        print!("{}", text);
    } else {
        write_text_to_file(&text, &args.flag_text_out)
            .chain_err(|| format!("Failed to write maze to text file {}", args.flag_text_out))?;
    }

    Ok(())
}

fn generate_maze(maze_args: &MazeArgs) -> Result<Maze> {

    let (rows, columns) = if let Some(square_grid_size) = maze_args.flag_grid_size {
        (square_grid_size, square_grid_size)
    } else {
        (maze_args.flag_grid_rows, maze_args.flag_grid_columns)
    };

    let mut maze = Maze::new(RowsCount(rows), ColumnsCount(columns))?;

    match maze_args.flag_seed {
        Some(seed) => {
            info!("generating with seed {}", seed);
            generators::binary_tree_seeded(&mut maze, seed)?
        }
        None => generators::binary_tree_random(&mut maze)?,
    }

    Ok(maze)
}

/// Text rendering of the maze, with the solved path drawn in when asked for.
/// An unsolvable maze falls back to marking the start and end points.
fn render_text(maze: &Maze, show_path: bool) -> Result<String> {

    if !show_path {
        return Ok(maze.to_string());
    }

    match pathing::solve(maze) {
        Ok(path) => {
            info!("solved with a path of {} cells", path.len());
            Ok(maze.display_with(&PathDisplay::new(&path)).to_string())
        }
        Err(e) => {
            let no_solution = matches!(e.kind(), mazes::errors::ErrorKind::NoSolution);
            if !no_solution {
                return Err(e.into());
            }
            warn!("{}", e);
            Ok(maze.display_with(&StartEndPointsDisplay::for_maze(maze)).to_string())
        }
    }
}

fn write_text_to_file(data: &str, file_name: &str) -> io::Result<()> {
    let mut f = File::create(file_name)?;
    f.write_all(data.as_bytes())?;
    Ok(())
}
