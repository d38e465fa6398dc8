use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::actor::HeroState;
use crate::game_state::GameState;
use crate::scene::Scene;

/// JSON description of a loaded scene, used by the CLI and tests.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneFixture {
    pub scene: Scene,
    pub game: GameState,
    pub hero: HeroState,
    pub lba_time: i32,
    pub loop_inventory_item: Option<u8>,
    pub zone_action: bool,
}

impl SceneFixture {
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("reading scene fixture {}", path.display()))?;
        serde_json::from_str(&data)
            .with_context(|| format!("parsing scene fixture {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixtures_load_actor_scripts_from_hex() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("scene.json");
        fs::write(
            &path,
            r#"{
                "scene": {
                    "current_scene": 4,
                    "actors": [
                        {"name": "hero", "life_script": {"bytes": "00"}},
                        {"name": "guard", "pos": [512, 0, 256], "life_script": {"bytes": "0d1000000008000000"}}
                    ],
                    "tracks": [[0, 0, 0]]
                },
                "game": {"kashes": 120}
            }"#,
        )
        .expect("write fixture");

        let fixture = SceneFixture::from_json_file(&path).expect("fixture");
        assert_eq!(fixture.scene.current_scene, 4);
        assert_eq!(fixture.scene.actors.len(), 2);
        assert_eq!(fixture.scene.actors[1].life_script.len(), 9);
        assert_eq!(fixture.scene.flags.len(), 80);
        assert_eq!(fixture.game.kashes, 120);
        assert_eq!(fixture.game.game_flags.len(), 256);
    }
}
