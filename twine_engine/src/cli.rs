use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    about = "Runs actor life scripts for a scene fixture and reports what they did",
    version
)]
pub struct Args {
    /// Scene fixture JSON (actors, scripts, game state)
    #[arg(long)]
    pub scene: PathBuf,

    /// Optional JSON file overriding the interpreter configuration
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Number of scene ticks to simulate
    #[arg(long, default_value_t = 1)]
    pub ticks: u32,

    /// Answer index to pick at the next dialogue choice (repeatable)
    #[arg(long = "choice")]
    pub choices: Vec<usize>,

    /// Print each actor's disassembled life script before running
    #[arg(long)]
    pub dump_scripts: bool,

    /// Print every host event and log interpreter traces at debug level
    #[arg(long)]
    pub verbose: bool,

    /// Path to write the recorded host events as JSON
    #[arg(long)]
    pub event_log_json: Option<PathBuf>,

    /// Path to write the tick history and final engine state as JSON
    #[arg(long)]
    pub state_json: Option<PathBuf>,
}

pub fn parse() -> Result<Args> {
    let args = Args::parse();
    args.validate()?;
    Ok(args)
}

impl Args {
    /// Default `env_logger` filter when `RUST_LOG` is unset.
    pub fn log_filter(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else {
            "warn"
        }
    }

    fn validate(&self) -> Result<()> {
        if self.ticks == 0 {
            bail!("--ticks must be at least 1");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbose_raises_the_log_filter() {
        let quiet = Args::try_parse_from(["twine_engine", "--scene", "scene.json"]).expect("args");
        assert_eq!(quiet.log_filter(), "warn");
        let verbose = Args::try_parse_from(["twine_engine", "--scene", "scene.json", "--verbose"])
            .expect("args");
        assert_eq!(verbose.log_filter(), "debug");
    }
}
