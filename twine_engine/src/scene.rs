use glam::IVec3;
use serde::{Deserialize, Serialize};

use crate::actor::{Actor, HERO_INDEX};
use crate::error::{check_index, LifeError, LifeResult};

pub const NUM_SCENE_FLAGS: usize = 80;

/// Where the hero is placed when the requested scene loads.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenePositionType {
    #[default]
    NoPosition,
    Zone,
    Scene,
    Reborn,
}

/// The currently loaded scene: actor table, cube flags and track points.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Scene {
    pub current_scene: i32,
    pub actors: Vec<Actor>,
    pub flags: Vec<u8>,
    pub tracks: Vec<IVec3>,
    pub current_script_value: i32,
    pub talking_actor: i32,
    pub need_change_scene: i32,
    pub hero_position_type: ScenePositionType,
    pub followed_actor: i32,
    pub meca_penguin: i32,
    pub holomap_trajectory: i32,
    pub new_hero_pos: IVec3,
    pub grid_tile_rendering: bool,
    pub ceiling_grid: i32,
}

impl Default for Scene {
    fn default() -> Self {
        Self {
            current_scene: 0,
            actors: Vec::new(),
            flags: vec![0; NUM_SCENE_FLAGS],
            tracks: Vec::new(),
            current_script_value: 0,
            talking_actor: -1,
            need_change_scene: -1,
            hero_position_type: ScenePositionType::NoPosition,
            followed_actor: HERO_INDEX as i32,
            meca_penguin: -1,
            holomap_trajectory: -1,
            new_hero_pos: IVec3::ZERO,
            grid_tile_rendering: true,
            ceiling_grid: -1,
        }
    }
}

impl Scene {
    pub fn new(current_scene: i32, actors: Vec<Actor>) -> Self {
        Self {
            current_scene,
            actors,
            ..Self::default()
        }
    }

    fn actor_error(&self, index: usize) -> LifeError {
        LifeError::InvalidActor {
            index: i32::try_from(index).unwrap_or(i32::MAX),
            count: self.actors.len(),
        }
    }

    /// Actor-table lookup; any index outside the table is fatal.
    pub fn actor(&self, index: usize) -> LifeResult<&Actor> {
        self.actors
            .get(index)
            .ok_or_else(|| self.actor_error(index))
    }

    pub fn actor_mut(&mut self, index: usize) -> LifeResult<&mut Actor> {
        let error = self.actor_error(index);
        self.actors.get_mut(index).ok_or(error)
    }

    pub fn hero(&self) -> LifeResult<&Actor> {
        self.actor(HERO_INDEX)
    }

    pub fn hero_mut(&mut self) -> LifeResult<&mut Actor> {
        self.actor_mut(HERO_INDEX)
    }

    pub fn flag(&self, index: u8) -> LifeResult<u8> {
        let slot = check_index("scene flag", i32::from(index), self.flags.len())?;
        Ok(self.flags[slot])
    }

    pub fn set_flag(&mut self, index: u8, value: u8) -> LifeResult<()> {
        let slot = check_index("scene flag", i32::from(index), self.flags.len())?;
        self.flags[slot] = value;
        Ok(())
    }

    pub fn track(&self, index: u8) -> LifeResult<IVec3> {
        let slot = check_index("track", i32::from(index), self.tracks.len())?;
        Ok(self.tracks[slot])
    }

    /// Drop every passenger riding on `carrier`.
    pub fn release_carried_actors(&mut self, carrier: usize) -> LifeResult<()> {
        if !self.actor(carrier)?.static_flags.is_carrier_actor {
            return Ok(());
        }
        for actor in &mut self.actors {
            if actor.carried_by == carrier as i32 {
                actor.carried_by = -1;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn actor_lookup_fails_fast() {
        let scene = Scene::new(0, vec![Actor::default()]);
        assert!(scene.hero().is_ok());
        assert_eq!(
            scene.actor(3).unwrap_err(),
            LifeError::InvalidActor { index: 3, count: 1 }
        );
    }

    #[test]
    fn scene_flags_are_bounded() {
        let mut scene = Scene::default();
        scene.set_flag(79, 1).expect("last flag");
        assert_eq!(scene.flag(79), Ok(1));
        assert!(scene.set_flag(80, 1).is_err());
    }

    #[test]
    fn carriers_release_their_passengers() {
        let mut carrier = Actor::default();
        carrier.static_flags.is_carrier_actor = true;
        let passenger = Actor {
            carried_by: 1,
            ..Actor::default()
        };
        let mut scene = Scene::new(0, vec![passenger, carrier]);
        scene.release_carried_actors(1).expect("released");
        assert_eq!(scene.actors[0].carried_by, -1);
    }
}
