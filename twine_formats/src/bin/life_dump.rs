use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use twine_formats::{disassemble, format_instruction, read_script_file};

/// Disassemble an actor life script.
#[derive(Parser)]
struct Args {
    /// Path to the script (raw bytes unless --hex is given)
    path: PathBuf,

    /// Treat the input as hex text
    #[arg(long)]
    hex: bool,

    /// Print the decoded instructions as JSON
    #[arg(long)]
    json: bool,

    /// Log decoder traces at debug level
    #[arg(long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let filter = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter)).init();
    let bytes = read_script_file(&args.path, args.hex)?;
    let instructions = disassemble(&bytes)
        .with_context(|| format!("disassembling {}", args.path.display()))?;

    if args.json {
        let json = serde_json::to_string_pretty(&instructions)
            .context("serializing disassembly to JSON")?;
        println!("{json}");
        return Ok(());
    }

    println!("script: {} bytes", bytes.len());
    println!("instructions: {}", instructions.len());
    for instruction in &instructions {
        println!("{}", format_instruction(instruction));
    }

    Ok(())
}
