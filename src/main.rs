use docopt::Docopt;
use rand::{Rng, SeedableRng};
use rand_xorshift::XorShiftRng;
use serde_derive::Deserialize;
use mazes::{
    config::MazeConfig,
    maze::{Maze, MazeOptions},
    pathing,
};
use std::{
    fs::File,
    io::prelude::*,
    path::Path,
};
use tracing::{info, Level};

const USAGE: &str = "Mazes

Reads maze settings from <config>, or config.txt when not given.

Usage:
    mazes_driver -h | --help
    mazes_driver [<config>] [--seed=<n>] [--loop-density=<p>] [--max-steps=<n>] [--no-solve] [--show] [--verbose]

Options:
    -h --help              Show this screen.
    --seed=<n>             Seed for the random source, overrides SEED from the config file.
    --loop-density=<p>     Chance of opening each remaining wall of an imperfect maze, overrides LOOP_DENSITY.
    --max-steps=<n>        Give up generating after n random walk steps.
    --no-solve             Do not solve the maze or write the solution line.
    --show                 Print the maze as text with the solution marked.
    --verbose              Log debug output.
";
#[derive(Debug, Deserialize)]
struct MazeArgs {
    arg_config: Option<String>,
    flag_seed: Option<u64>,
    flag_loop_density: Option<f64>,
    flag_max_steps: Option<usize>,
    flag_no_solve: bool,
    flag_show: bool,
    flag_verbose: bool,
}

// We'll put our errors in an `errors` module, and other modules in
// this crate will `use errors::*;` to get access to everything
// `error_chain!` creates.
mod errors {
    // Create the Error, ErrorKind, ResultExt, and Result types
    // Result is a typedef of std `Result` with the error type our own `Error`
    // Defines the From conversions that let ? work for our `Error`.
    // ResultExt adds the `chain_err` trait method.
    use error_chain::*;
    error_chain! {

        links {
            Maze(::mazes::errors::Error, ::mazes::errors::ErrorKind);
        }

        foreign_links {
            DocOptFailure(::docopt::Error);
            Io(::std::io::Error);
        }
    }
}
use crate::errors::*;

fn main() -> Result<()> {

    let args: MazeArgs = Docopt::new(USAGE).and_then(|d| d.deserialize())?;

    tracing_subscriber::fmt()
        .with_max_level(if args.flag_verbose { Level::DEBUG } else { Level::INFO })
        .init();

    let config_path = args.arg_config.clone().unwrap_or_else(|| String::from("config.txt"));
    let mut config = MazeConfig::load(&config_path)
        .chain_err(|| format!("Failed to load maze config {}", config_path))?;

    // Command line values win over the config file
    if args.flag_seed.is_some() {
        config.seed = args.flag_seed;
    }
    if args.flag_loop_density.is_some() {
        config.loop_density = args.flag_loop_density;
    }

    let seed = config.seed.unwrap_or_else(|| rand::thread_rng().gen());
    info!(seed, config = %config_path, "generating maze");
    let mut rng = XorShiftRng::seed_from_u64(seed);

    let options = MazeOptions {
        loop_policy: None,
        step_limit: args.flag_max_steps,
        solve: !args.flag_no_solve,
    };
    let maze = Maze::generate(&config, &options, &mut rng)?;

    if let Some(distances) = pathing::Distances::<u32>::for_grid(maze.grid(), maze.entry()) {
        info!(furthest = distances.max(),
              reachable = distances.reachable_count(),
              "distances from the entry");
    }

    write_text_to_file(&maze.encode()?, &config.output_file)
        .chain_err(|| format!("Failed to write maze to {}", config.output_file.display()))?;
    info!(output = %config.output_file.display(), "maze saved");

    if args.flag_show {
        println!("{}", maze.render());
    }

    Ok(())
}

fn write_text_to_file(data: &str, file_name: &Path) -> Result<()> {
    let mut f = File::create(file_name)?;
    f.write_all(data.as_bytes())?;
    Ok(())
}
