use std::{fs, path::Path};

use anyhow::{Context, Result};
use serde::Serialize;
use twine_formats::{disassemble, format_instruction};

use crate::cli::Args;
use crate::config::LifeConfig;
use crate::engine::{EngineSnapshot, LifeEngine};
use crate::fixture::SceneFixture;
use crate::recording::{HostEvent, RecordingCallbacks};
use crate::scheduler::{TickScheduler, TickSummary};

#[derive(Serialize)]
struct RunReport<'a> {
    ticks: &'a [TickSummary],
    state: EngineSnapshot<'a>,
}

pub fn execute(args: Args) -> Result<()> {
    let config = LifeConfig::from_json_file(args.config.as_deref())
        .context("loading interpreter config")?;
    let fixture = SceneFixture::from_json_file(&args.scene)?;

    let recorder = RecordingCallbacks::new();
    for choice in &args.choices {
        recorder.queue_choice(*choice);
    }
    let mut engine = LifeEngine::from_fixture(fixture, config, recorder.collaborators());

    if args.dump_scripts {
        dump_scripts(&engine)?;
    }

    let mut scheduler = TickScheduler::new();
    let outcome = scheduler.run(&mut engine, args.ticks);

    for tick in scheduler.history() {
        println!(
            "tick {:>3} @ {:>6}: ran {:?} -> {:?}",
            tick.tick, tick.lba_time, tick.actors_run, tick.loop_state
        );
    }

    let events = recorder.events();
    if args.verbose {
        println!("\nHost events:");
        for event in &events {
            println!("  {event:?}");
        }
    } else {
        println!("Host events: {}", events.len());
    }

    if let Some(path) = args.event_log_json.as_ref() {
        write_event_log(path, &events)?;
    }
    if let Some(path) = args.state_json.as_ref() {
        let report = RunReport {
            ticks: scheduler.history(),
            state: engine.snapshot(),
        };
        let json =
            serde_json::to_string_pretty(&report).context("serializing run report to JSON")?;
        fs::write(path, json)
            .with_context(|| format!("writing run report to {}", path.display()))?;
        println!("Saved run report to {}", path.display());
    }

    outcome.context("running life scripts")
}

fn dump_scripts(engine: &LifeEngine) -> Result<()> {
    for (idx, actor) in engine.scene.actors.iter().enumerate() {
        println!("actor {idx} ({}), cursor {}:", actor.name, actor.life_cursor);
        let bytes = actor.life_script.effective_bytes();
        let instructions = disassemble(&bytes)
            .with_context(|| format!("disassembling life script of actor {idx}"))?;
        for instruction in &instructions {
            println!("  {}", format_instruction(instruction));
        }
    }
    Ok(())
}

fn write_event_log(path: &Path, events: &[HostEvent]) -> Result<()> {
    let json = serde_json::to_string_pretty(events).context("serializing host events to JSON")?;
    fs::write(path, json)
        .with_context(|| format!("writing host event log to {}", path.display()))?;
    println!("Saved host event log to {}", path.display());
    Ok(())
}
