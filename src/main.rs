//! fogbox command line.
//!
//! - `fogbox print`: generate a maze and print it to stdout
//! - `fogbox save`: generate a level and write it as JSON
//! - `fogbox play`: play a level file, or endless generated levels
//!
//! Logs go to stderr, except in `play` where the game owns the terminal and
//! logs are written to `logs/debug.log`.

use clap::{Parser, Subcommand};
use fogbox::app::{self, LevelSource};
use fogbox::config::{GameConfig, PlacementMode};
use fogbox::game::END_GLYPH;
use fogbox::game::player::PLAYER_GLYPH;
use fogbox::math::coordinates::MatrixPos;
use fogbox::maze::Maze;
use fogbox::maze::layout::layout_boxes;
use fogbox::maze::save_data::SaveData;
use fogbox::Result;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::path::PathBuf;
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;

#[cfg(feature = "dhat-heap")]
#[global_allocator]
static ALLOC: dhat::Alloc = dhat::Alloc;

#[derive(Parser, Debug)]
#[command(name = "fogbox", version, about = "A terminal maze you only see once")]
struct Cli {
    /// JSON config file; missing fields use defaults
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Debug-level logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Put the start in the leftmost column and the end in the rightmost
    #[arg(long, global = true)]
    opposite_sides: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a maze and print it
    Print {
        #[arg(long, default_value_t = 20)]
        width: usize,
        #[arg(long, default_value_t = 10)]
        height: usize,
        #[arg(long)]
        seed: Option<u64>,
        /// Also print every box
        #[arg(long)]
        boxes: bool,
    },
    /// Generate a level and save it as JSON
    Save {
        #[arg(long, default_value_t = 20)]
        width: usize,
        #[arg(long, default_value_t = 10)]
        height: usize,
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long, default_value = "levels")]
        dir: PathBuf,
    },
    /// Play a level file, or endless generated levels without one
    Play {
        #[arg(long)]
        level: Option<PathBuf>,
        #[arg(long, default_value_t = 10)]
        width: usize,
        #[arg(long, default_value_t = 5)]
        height: usize,
        #[arg(long)]
        seed: Option<u64>,
        /// Frames the maze stays visible at the start of a level
        #[arg(long)]
        show_frames: Option<u32>,
    },
}

fn init_logging(verbose: bool, to_file: bool) -> Option<WorkerGuard> {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    if to_file {
        let appender = tracing_appender::rolling::never("logs", "debug.log");
        let (writer, guard) = tracing_appender::non_blocking(appender);
        tracing_subscriber::fmt()
            .with_max_level(level)
            .with_ansi(false)
            .with_writer(writer)
            .init();
        Some(guard)
    } else {
        tracing_subscriber::fmt()
            .with_max_level(level)
            .with_writer(std::io::stderr)
            .init();
        None
    }
}

fn rng_for(seed: Option<u64>) -> StdRng {
    seed.map_or_else(StdRng::from_entropy, StdRng::seed_from_u64)
}

/// Maze text with the start and end marked.
fn marked_text(maze: &Maze) -> String {
    let mut lines: Vec<Vec<char>> = maze.render().0.lines().map(|l| l.chars().collect()).collect();
    let mut mark = |pos: Option<MatrixPos>, ch: char| {
        let Some(pos) = pos else { return };
        let screen = maze.matrix_to_screen(pos) - maze.top_left();
        if let Some(cell) = usize::try_from(screen.y)
            .ok()
            .zip(usize::try_from(screen.x).ok())
            .and_then(|(row, col)| lines.get_mut(row)?.get_mut(col))
        {
            *cell = ch;
        }
    };
    mark(maze.start, PLAYER_GLYPH);
    mark(maze.end, END_GLYPH);
    lines
        .into_iter()
        .map(|line| line.into_iter().collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}

fn execute(cli: Cli) -> Result<()> {
    let mut config = match &cli.config {
        Some(path) => GameConfig::from_file(path)?,
        None => GameConfig::default(),
    };
    if cli.opposite_sides {
        config.placement_mode = PlacementMode::OppositeSides;
    }

    match cli.command {
        Command::Print {
            width,
            height,
            seed,
            boxes,
        } => {
            let mut rng = rng_for(seed);
            let maze = Maze::generate(width, height, &config, &mut rng)?;
            println!("{}", marked_text(&maze));
            if boxes {
                for reveal_box in layout_boxes(&maze, &config, &mut rng) {
                    let center = reveal_box.center();
                    println!(
                        "\n{} box at [{}, {}], radius {}",
                        reveal_box.color(),
                        center.row,
                        center.col,
                        reveal_box.radius()
                    );
                    println!("{}", reveal_box.rendered().text);
                }
            }
        }
        Command::Save {
            width,
            height,
            seed,
            dir,
        } => {
            let mut rng = rng_for(seed);
            let maze = Maze::generate(width, height, &config, &mut rng)?;
            let boxes = layout_boxes(&maze, &config, &mut rng);
            let path = SaveData::from_maze(&maze, &boxes, &[]).save_to_file(&dir)?;
            println!("{}", path.display());
        }
        Command::Play {
            level,
            width,
            height,
            seed,
            show_frames,
        } => {
            if let Some(frames) = show_frames {
                config.show_frames = frames;
            }
            let source = match level {
                Some(path) => LevelSource::File(path),
                None => LevelSource::Endless { width, height },
            };
            let summary = app::run(source, &config, seed)?;
            println!(
                "{:?} after {} level(s), persistence {:.0}",
                summary.last_status,
                summary.levels_won,
                summary.score.max(0.0)
            );
        }
    }
    Ok(())
}

fn main() {
    #[cfg(feature = "dhat-heap")]
    let _profiler = dhat::Profiler::new_heap();

    let cli = Cli::parse();
    let log_guard = init_logging(cli.verbose, matches!(cli.command, Command::Play { .. }));
    let result = execute(cli);
    // Flush the log writer before exiting.
    drop(log_guard);

    if let Err(err) = result {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}
