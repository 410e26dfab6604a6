use std::env;

use anyhow::{anyhow, Result};

use blockroll::{Level, PuzzleGame, TileKind, WindowInitError};

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("Error: {err:?}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let options = CliOptions::parse()?;
    let level = Level::load(&options.path)?;
    print_summary(&level);

    if options.summary_only {
        return Ok(());
    }

    match blockroll::run("Blockroll Puzzle", PuzzleGame::new(level)) {
        Ok(()) => Ok(()),
        Err(err) => {
            if err.downcast_ref::<WindowInitError>().is_some() {
                eprintln!(
                    "{err}. Falling back to --summary-only mode (set DISPLAY or install X11 libs to enable rendering)."
                );
                Ok(())
            } else {
                Err(err)
            }
        }
    }
}

fn print_summary(level: &Level) {
    let goals = level
        .tiles()
        .filter(|&(_, _, kind)| kind == TileKind::Goal)
        .count();
    println!(
        "Loaded level {}x{} with {} tiles ({} goals)",
        level.width(),
        level.height(),
        level.tiles().count(),
        goals
    );
    let (x, z) = level.start_position();
    println!("Start at ({x}, {z})");
}

struct CliOptions {
    path: String,
    summary_only: bool,
}

impl CliOptions {
    fn parse() -> Result<Self> {
        let mut args = env::args().skip(1);
        let Some(path) = args.next() else {
            return Err(anyhow!("Usage: blockroll-puzzle <level.txt> [--summary-only]"));
        };
        let mut summary_only = false;
        for arg in args {
            match arg.as_str() {
                "--summary-only" => summary_only = true,
                other => {
                    return Err(anyhow!("Unknown argument: {other}. Expected --summary-only"));
                }
            }
        }
        Ok(Self { path, summary_only })
    }
}
