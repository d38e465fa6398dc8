use glam::IVec3;
use serde::{Deserialize, Serialize};

use crate::script::LifeScript;

pub const HERO_INDEX: usize = 0;
pub const ACTOR_MAX_LIFE: i32 = 50;

pub const ANIM_STANDING: i32 = 0;
pub const ANIM_HIT: i32 = 5;
pub const ANIM_BIG_HIT: i32 = 6;
pub const ANIM_HIT2: i32 = 22;
pub const ANIM_NONE: i32 = 255;
pub const ANIM_INVALID: i32 = -1;

/// How an actor's movement is driven.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlMode {
    #[default]
    NoMove,
    Manual,
    Follow,
    Track,
    Follow2,
    TrackAttack,
    SameXz,
    Random,
}

impl TryFrom<u8> for ControlMode {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Ok(match value {
            0 => ControlMode::NoMove,
            1 => ControlMode::Manual,
            2 => ControlMode::Follow,
            3 => ControlMode::Track,
            4 => ControlMode::Follow2,
            5 => ControlMode::TrackAttack,
            6 => ControlMode::SameXz,
            7 => ControlMode::Random,
            other => return Err(other),
        })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeroBehaviour {
    #[default]
    Normal,
    Athletic,
    Aggressive,
    Discrete,
    ProtoPack,
}

impl HeroBehaviour {
    pub fn index(self) -> i32 {
        self as i32
    }
}

impl TryFrom<u8> for HeroBehaviour {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Ok(match value {
            0 => HeroBehaviour::Normal,
            1 => HeroBehaviour::Athletic,
            2 => HeroBehaviour::Aggressive,
            3 => HeroBehaviour::Discrete,
            4 => HeroBehaviour::ProtoPack,
            other => return Err(other),
        })
    }
}

/// Hero state that lives outside the actor table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HeroState {
    pub behaviour: HeroBehaviour,
    pub previous_behaviour: HeroBehaviour,
    pub previous_angle: i32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StaticFlags {
    pub compute_collision_with_obj: bool,
    pub compute_collision_with_bricks: bool,
    pub compute_low_collision: bool,
    pub can_fall: bool,
    pub is_hidden: bool,
    pub is_carrier_actor: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DynamicFlags {
    pub is_dead: bool,
    pub is_sprite_moving: bool,
    pub anim_ended: bool,
}

/// What an actor drops when it hands out its bonus.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BonusParameter {
    pub cloverleaf: bool,
    pub kashes: bool,
    pub key: bool,
    pub lifepoints: bool,
    pub magicpoints: bool,
    pub given_nothing: bool,
}

impl BonusParameter {
    pub fn has_bonus(&self) -> bool {
        self.cloverleaf || self.kashes || self.key || self.lifepoints || self.magicpoints
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Actor {
    pub name: String,
    pub pos: IVec3,
    pub last_pos: IVec3,
    pub angle: i32,
    pub speed: i32,
    pub life: i32,
    pub armor: i32,
    pub body: i32,
    pub anim: i32,
    pub previous_anim: i32,
    pub entity: i32,
    pub collision: i32,
    pub zone: i32,
    pub hit_by: i32,
    pub carried_by: i32,
    pub label_idx: i32,
    pub current_label_ptr: i32,
    pub paused_track_ptr: i32,
    pub control_mode: ControlMode,
    pub followed_actor: i32,
    pub talk_color: i32,
    pub static_flags: StaticFlags,
    pub dynamic_flags: DynamicFlags,
    pub bonus_parameter: BonusParameter,
    pub life_script: LifeScript,
    /// Offset the next invocation starts at, or -1 once halted.
    pub life_cursor: i32,
    /// Cursor of the companion track interpreter.
    pub track_cursor: i32,
}

impl Default for Actor {
    fn default() -> Self {
        Self {
            name: String::new(),
            pos: IVec3::ZERO,
            last_pos: IVec3::ZERO,
            angle: 0,
            speed: 0,
            life: ACTOR_MAX_LIFE,
            armor: 1,
            body: 0,
            anim: ANIM_STANDING,
            previous_anim: -1,
            entity: 0,
            collision: -1,
            zone: -1,
            hit_by: -1,
            carried_by: -1,
            label_idx: -1,
            current_label_ptr: -1,
            paused_track_ptr: -1,
            control_mode: ControlMode::NoMove,
            followed_actor: -1,
            talk_color: 15,
            static_flags: StaticFlags::default(),
            dynamic_flags: DynamicFlags::default(),
            bonus_parameter: BonusParameter::default(),
            life_script: LifeScript::default(),
            life_cursor: 0,
            track_cursor: -1,
        }
    }
}

impl Actor {
    pub fn with_script(name: &str, script: LifeScript) -> Self {
        Self {
            name: name.to_string(),
            life_script: script,
            ..Self::default()
        }
    }

    pub fn is_dead(&self) -> bool {
        self.dynamic_flags.is_dead
    }

    /// No life script to run: halted by a terminator, or never given one.
    pub fn is_halted(&self) -> bool {
        self.life_cursor < 0 || self.life_script.is_empty()
    }

    /// Set life points, capped at the actor maximum.
    pub fn set_life(&mut self, life: i32) {
        self.life = life.min(ACTOR_MAX_LIFE);
    }

    pub fn add_life(&mut self, delta: i32) {
        self.set_life(self.life + delta);
    }

    /// Dead actors keep their slot but drop out of rendering and zones.
    pub fn kill(&mut self) {
        self.dynamic_flags.is_dead = true;
        self.entity = -1;
        self.zone = -1;
        self.set_life(0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn life_is_capped_at_the_maximum() {
        let mut actor = Actor::default();
        actor.set_life(80);
        assert_eq!(actor.life, ACTOR_MAX_LIFE);
        actor.add_life(-60);
        assert_eq!(actor.life, -10);
    }

    #[test]
    fn kill_clears_entity_and_zone() {
        let mut actor = Actor {
            zone: 3,
            entity: 2,
            ..Actor::default()
        };
        actor.kill();
        assert!(actor.is_dead());
        assert_eq!((actor.entity, actor.zone, actor.life), (-1, -1, 0));
    }

    #[test]
    fn control_modes_decode_from_script_bytes() {
        assert_eq!(ControlMode::try_from(2), Ok(ControlMode::Follow));
        assert_eq!(ControlMode::try_from(4), Ok(ControlMode::Follow2));
        assert_eq!(ControlMode::try_from(8), Err(8));
        assert_eq!(HeroBehaviour::try_from(3), Ok(HeroBehaviour::Discrete));
        assert_eq!(HeroBehaviour::Discrete.index(), 3);
    }

    #[test]
    fn fixture_actors_fill_missing_fields() {
        let json = r#"{"name":"guard","pos":[10,0,20],"life_script":{"bytes":"00"}}"#;
        let actor: Actor = serde_json::from_str(json).expect("parsed");
        assert_eq!(actor.pos, IVec3::new(10, 0, 20));
        assert_eq!(actor.life, ACTOR_MAX_LIFE);
        assert_eq!(actor.life_script.len(), 1);
        assert_eq!(actor.zone, -1);
    }
}
