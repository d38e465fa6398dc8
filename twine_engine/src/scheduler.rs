use serde::Serialize;

use crate::engine::{LifeEngine, SceneLoopState};
use crate::error::LifeResult;

/// What one simulated tick did, kept for the JSON run report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TickSummary {
    pub tick: u32,
    pub lba_time: i32,
    /// Actors whose life script was entered this tick, in run order.
    pub actors_run: Vec<usize>,
    pub loop_state: SceneLoopState,
}

/// Drives every actor's life script once per tick, in actor-table order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TickScheduler {
    history: Vec<TickSummary>,
}

impl TickScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run one tick. Dead or halted actors are skipped, and the pass stops
    /// early once a script ends the scene loop.
    pub fn run_tick(&mut self, engine: &mut LifeEngine) -> LifeResult<&TickSummary> {
        let mut actors_run = Vec::new();
        for actor_idx in 0..engine.scene.actors.len() {
            let actor = &engine.scene.actors[actor_idx];
            if actor.is_dead() || actor.is_halted() {
                continue;
            }
            actors_run.push(actor_idx);
            engine.process_life_script(actor_idx)?;
            if engine.loop_state != SceneLoopState::Continue {
                break;
            }
        }

        engine.clock.advance(1);
        let now = engine.clock.now();
        engine.overlays.purge_expired(now);

        self.history.push(TickSummary {
            tick: self.history.len() as u32,
            lba_time: now,
            actors_run,
            loop_state: engine.loop_state,
        });
        Ok(&self.history[self.history.len() - 1])
    }

    /// Run up to `ticks` ticks, stopping when the scene loop leaves
    /// `Continue`.
    pub fn run(&mut self, engine: &mut LifeEngine, ticks: u32) -> LifeResult<()> {
        for _ in 0..ticks {
            if self.run_tick(engine)?.loop_state != SceneLoopState::Continue {
                break;
            }
        }
        Ok(())
    }

    pub fn history(&self) -> &[TickSummary] {
        &self.history
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::Actor;
    use crate::callbacks::Collaborators;
    use crate::config::LifeConfig;
    use crate::scene::Scene;
    use crate::script::LifeScript;

    fn engine_with(scripts: &[&[u8]]) -> LifeEngine {
        let actors = scripts
            .iter()
            .enumerate()
            .map(|(idx, bytes)| Actor::with_script(&format!("actor{idx}"), LifeScript::new(bytes.to_vec())))
            .collect();
        LifeEngine::new(
            LifeConfig::default(),
            Scene::new(0, actors),
            Collaborators::silent(),
        )
    }

    #[test]
    fn skips_halted_and_dead_actors() {
        // RETURN keeps the cursor; END halts the actor for later ticks.
        let mut engine = engine_with(&[&[0x0B], &[0x00], &[0x0B]]);
        engine.scene.actors[2].dynamic_flags.is_dead = true;
        let mut scheduler = TickScheduler::new();

        let first = scheduler.run_tick(&mut engine).expect("tick").clone();
        assert_eq!(first.actors_run, vec![0, 1]);
        let second = scheduler.run_tick(&mut engine).expect("tick").clone();
        assert_eq!(second.actors_run, vec![0]);
        assert_eq!(second.lba_time, 2);
    }

    #[test]
    fn scriptless_actors_do_not_stop_the_tick() {
        let hero = Actor::with_script("hero", LifeScript::new(vec![0x2D, 0x0B]));
        let mut engine = LifeEngine::new(
            LifeConfig::default(),
            Scene::new(0, vec![hero, Actor::default()]),
            Collaborators::silent(),
        );
        let mut scheduler = TickScheduler::new();
        scheduler.run(&mut engine, 2).expect("run");
        assert_eq!(engine.game.chapter, 2);
        assert_eq!(scheduler.history()[1].actors_run, vec![0]);
    }

    #[test]
    fn stops_when_the_scene_loop_ends() {
        // BRUTAL_EXIT on actor 0 means actor 1 never runs.
        let mut engine = engine_with(&[&[0x69], &[0x0B]]);
        let mut scheduler = TickScheduler::new();
        scheduler.run(&mut engine, 5).expect("run");
        assert_eq!(scheduler.len(), 1);
        assert_eq!(scheduler.history()[0].actors_run, vec![0]);
        assert_eq!(
            scheduler.history()[0].loop_state,
            SceneLoopState::ReturnToMenu
        );
    }
}
