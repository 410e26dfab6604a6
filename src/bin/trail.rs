use std::env;

use anyhow::{anyhow, Context, Result};

use blockroll::{TrailGame, WindowInitError};

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("Error: {err:?}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let options = CliOptions::parse()?;
    let game = TrailGame::new(options.half_side, options.seed);
    print_summary(&game);

    if options.summary_only {
        return Ok(());
    }

    match blockroll::run("Blockroll Trail", game) {
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

fn print_summary(game: &TrailGame) {
    let ground = game.ground();
    let side = ground.side();
    println!("Ground {side}x{side} with one hole");
    let (x, z) = ground.center();
    println!("Spawn at ({x}, {z})");
}

struct CliOptions {
    half_side: i32,
    seed: Option<u64>,
    summary_only: bool,
}

impl CliOptions {
    fn parse() -> Result<Self> {
        let mut options = Self {
            half_side: 5,
            seed: None,
            summary_only: false,
        };
        let mut args = env::args().skip(1);
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--size" => {
                    let value = args.next().ok_or_else(|| anyhow!("--size needs a value"))?;
                    options.half_side = value
                        .parse()
                        .with_context(|| format!("invalid --size value {value:?}"))?;
                    if options.half_side < 1 {
                        return Err(anyhow!("--size must be at least 1"));
                    }
                }
                "--seed" => {
                    let value = args.next().ok_or_else(|| anyhow!("--seed needs a value"))?;
                    options.seed = Some(
                        value
                            .parse()
                            .with_context(|| format!("invalid --seed value {value:?}"))?,
                    );
                }
                "--summary-only" => options.summary_only = true,
                other => {
                    return Err(anyhow!(
                        "Unknown argument: {other}. Usage: blockroll-trail [--size N] [--seed S] [--summary-only]"
                    ));
                }
            }
        }
        Ok(options)
    }
}
