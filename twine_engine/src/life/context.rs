use byteorder::{ByteOrder, LittleEndian};

use crate::error::{LifeError, LifeResult};
use crate::scene::Scene;
use crate::script::LifeScript;

/// Seekable read cursor over one actor's life script.
#[derive(Debug, Clone)]
pub struct ScriptStream {
    script: LifeScript,
    pos: usize,
}

impl ScriptStream {
    pub fn new(script: LifeScript, pos: usize) -> Self {
        Self { script, pos }
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn len(&self) -> usize {
        self.script.len()
    }

    pub fn is_empty(&self) -> bool {
        self.script.is_empty()
    }

    pub fn script(&self) -> &LifeScript {
        &self.script
    }

    fn truncated(&self, needed: usize) -> LifeError {
        LifeError::Truncated {
            offset: self.pos,
            needed,
            len: self.script.len(),
        }
    }

    pub fn read_u8(&mut self) -> LifeResult<u8> {
        let byte = self
            .script
            .byte_at(self.pos)
            .ok_or_else(|| self.truncated(1))?;
        self.pos += 1;
        Ok(byte)
    }

    pub fn read_i16(&mut self) -> LifeResult<i16> {
        match (self.script.byte_at(self.pos), self.script.byte_at(self.pos + 1)) {
            (Some(lo), Some(hi)) => {
                self.pos += 2;
                Ok(LittleEndian::read_i16(&[lo, hi]))
            }
            _ => Err(self.truncated(2)),
        }
    }

    pub fn skip(&mut self, count: usize) -> LifeResult<()> {
        if self.pos + count > self.script.len() {
            return Err(self.truncated(count));
        }
        self.pos += count;
        Ok(())
    }

    /// Jump to an absolute offset inside the same script.
    pub fn seek(&mut self, target: i16) -> LifeResult<()> {
        let len = self.script.len();
        if target < 0 || target as usize > len {
            return Err(LifeError::InvalidJump {
                target: i32::from(target),
                len,
            });
        }
        self.pos = target as usize;
        Ok(())
    }
}

/// Per-invocation state: the actor being run, its cursor, and where the
/// opcode currently executing starts.
#[derive(Debug)]
pub struct LifeContext {
    pub actor_idx: usize,
    pub stream: ScriptStream,
    pub opcode_pos: usize,
}

impl LifeContext {
    pub fn new(actor_idx: usize, script: LifeScript, start: usize) -> Self {
        Self {
            actor_idx,
            stream: ScriptStream::new(script, start),
            opcode_pos: start,
        }
    }

    pub fn update_opcode_pos(&mut self) {
        self.opcode_pos = self.stream.pos();
    }

    /// Rewrite the opcode that is executing, both in this invocation's view
    /// and in the actor's stored script so later ticks see it.
    pub fn set_opcode(&mut self, scene: &mut Scene, opcode: u8) -> LifeResult<()> {
        self.stream.script.patch_opcode(self.opcode_pos, opcode)?;
        scene
            .actor_mut(self.actor_idx)?
            .life_script
            .patch_opcode(self.opcode_pos, opcode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::Actor;

    #[test]
    fn reads_little_endian_words() {
        let mut stream = ScriptStream::new(LifeScript::new(vec![0x28, 0x64, 0x00, 0xFF, 0xFF]), 1);
        assert_eq!(stream.read_i16(), Ok(100));
        assert_eq!(stream.read_i16(), Ok(-1));
        assert_eq!(
            stream.read_u8(),
            Err(LifeError::Truncated {
                offset: 5,
                needed: 1,
                len: 5
            })
        );
    }

    #[test]
    fn seeks_are_bounded_by_the_script() {
        let mut stream = ScriptStream::new(LifeScript::new(vec![0; 4]), 0);
        stream.seek(4).expect("end of script");
        assert_eq!(stream.pos(), 4);
        assert_eq!(
            stream.seek(5),
            Err(LifeError::InvalidJump { target: 5, len: 4 })
        );
        assert!(stream.seek(-1).is_err());
        assert!(stream.skip(1).is_err());
    }

    #[test]
    fn opcode_rewrites_reach_the_stored_script() {
        let script = LifeScript::new(vec![0x01, 0x00, 0x0E]);
        let mut scene = Scene::new(0, vec![Actor::with_script("hero", script.clone())]);
        let mut ctx = LifeContext::new(0, script, 2);

        ctx.set_opcode(&mut scene, 0x04).expect("patched");
        assert_eq!(ctx.stream.script().opcode_at(2), Some(0x04));
        assert_eq!(scene.actors[0].life_script.opcode_at(2), Some(0x04));
        assert_eq!(scene.actors[0].life_script.asset_bytes()[2], 0x0E);
    }
}
