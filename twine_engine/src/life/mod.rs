//! Life-script interpreter: runs one actor's script until it yields.

pub mod conditions;
pub mod context;
pub mod handlers;
pub mod operators;
pub mod table;

use log::{debug, warn};

use crate::engine::LifeEngine;
use crate::error::{LifeError, LifeResult};

pub use context::{LifeContext, ScriptStream};
pub use table::{life_function, LifeFunction, LifeHandler, LifeSignal, LIFE_FUNCTIONS};

impl LifeEngine {
    /// Execute `actor_idx`'s life script from its stored cursor until a
    /// handler ends the invocation. Halted actors are skipped.
    pub fn process_life_script(&mut self, actor_idx: usize) -> LifeResult<()> {
        self.run_life_script(actor_idx, &LIFE_FUNCTIONS)
    }

    pub(crate) fn run_life_script(
        &mut self,
        actor_idx: usize,
        functions: &[LifeFunction],
    ) -> LifeResult<()> {
        let actor = self.scene.actor(actor_idx)?;
        if actor.is_halted() {
            return Ok(());
        }
        let script = actor.life_script.clone();
        let cursor = actor.life_cursor;
        if cursor as usize >= script.len() {
            return Err(LifeError::InvalidCursor {
                actor: actor_idx,
                cursor,
                len: script.len(),
            });
        }

        debug!("LIFE::BEGIN actor {actor_idx} at {cursor}");
        let mut ctx = LifeContext::new(actor_idx, script, cursor as usize);
        loop {
            let offset = ctx.stream.pos();
            let opcode = ctx.stream.read_u8()?;
            let function = functions
                .get(usize::from(opcode))
                .ok_or(LifeError::UnknownOpcode {
                    actor: actor_idx,
                    offset,
                    opcode,
                })?;
            debug!("LIFE::EXEC {offset:04X}: {:02X} {}", opcode, function.name);

            match (function.handler)(self, &mut ctx)? {
                LifeSignal::Continue => {}
                LifeSignal::NotImplemented => {
                    warn!(
                        "actor {actor_idx}: opcode {opcode:#04x} {} at {offset} is not implemented",
                        function.name
                    );
                }
                LifeSignal::Break => {
                    debug!("LIFE::BREAK actor {actor_idx} at {offset}");
                    break;
                }
            }
            ctx.update_opcode_pos();
        }
        debug!("LIFE::END actor {actor_idx}");
        Ok(())
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

    fn engine(bytes: &[u8]) -> LifeEngine {
        let actor = Actor::with_script("hero", LifeScript::new(bytes.to_vec()));
        LifeEngine::new(
            LifeConfig::default(),
            Scene::new(0, vec![actor]),
            Collaborators::silent(),
        )
    }

    fn unimplemented(_: &mut LifeEngine, ctx: &mut LifeContext) -> LifeResult<LifeSignal> {
        ctx.stream.skip(1)?;
        Ok(LifeSignal::NotImplemented)
    }

    #[test]
    fn not_implemented_handlers_do_not_stop_the_script() {
        let mut functions = LIFE_FUNCTIONS;
        functions[0x01] = LifeFunction {
            name: "NOP",
            handler: unimplemented,
        };
        // NOP(7), INC_CHAPTER, RETURN
        let mut engine = engine(&[0x01, 0x07, 0x2D, 0x0B]);
        engine.run_life_script(0, &functions).expect("runs");
        assert_eq!(engine.game.chapter, 1);
    }

    #[test]
    fn halted_actor_is_a_no_op() {
        let mut engine = engine(&[0x2D, 0x0B]);
        engine.scene.actors[0].life_cursor = -1;
        engine.process_life_script(0).expect("no-op");
        assert_eq!(engine.game.chapter, 0);
    }

    #[test]
    fn actor_without_a_script_is_a_no_op() {
        let mut engine = engine(&[]);
        engine.process_life_script(0).expect("no-op");
        assert_eq!(engine.scene.actors[0].life_cursor, 0);
    }

    #[test]
    fn cursor_past_the_script_is_fatal() {
        let mut engine = engine(&[0x0B]);
        engine.scene.actors[0].life_cursor = 4;
        assert_eq!(
            engine.process_life_script(0),
            Err(LifeError::InvalidCursor {
                actor: 0,
                cursor: 4,
                len: 1
            })
        );
    }

    #[test]
    fn cursor_survives_return() {
        let mut engine = engine(&[0x2D, 0x0B]);
        engine.process_life_script(0).expect("first run");
        engine.process_life_script(0).expect("second run");
        assert_eq!(engine.game.chapter, 2);
        assert_eq!(engine.scene.actors[0].life_cursor, 0);
    }
}
