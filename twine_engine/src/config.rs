use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Scene/actor/text combination that unlocks an achievement when spoken.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AchievementTrigger {
    pub scene: i32,
    pub actor: usize,
    pub text: i16,
    pub id: String,
}

/// Interpreter settings and the content ids the handlers depend on.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LifeConfig {
    pub screen_width: i32,
    pub screen_height: i32,
    /// Allow ZOOM to enter the scenery view.
    pub scenery_zoom: bool,
    pub display_text: bool,
    pub rng_seed: u64,
    /// Text id substitutions applied by TEXT (localised builds).
    pub text_remap: BTreeMap<i16, i16>,
    pub sendell_text_id: i16,
    pub final_battle_scene: i32,
    pub achievements: Vec<AchievementTrigger>,
}

impl Default for LifeConfig {
    fn default() -> Self {
        Self {
            screen_width: 640,
            screen_height: 480,
            scenery_zoom: true,
            display_text: true,
            rng_seed: 0,
            text_remap: BTreeMap::new(),
            sendell_text_id: 6,
            final_battle_scene: 114,
            achievements: vec![AchievementTrigger {
                scene: 10,
                actor: 8,
                text: 284,
                id: "LBA_ACH_008".to_string(),
            }],
        }
    }
}

impl LifeConfig {
    /// Load a JSON config, or the defaults when no path is given.
    pub fn from_json_file(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let data = fs::read_to_string(path)
            .with_context(|| format!("reading life config {}", path.display()))?;
        serde_json::from_str(&data)
            .with_context(|| format!("parsing life config {}", path.display()))
    }

    pub fn achievement_for(&self, scene: i32, actor: usize, text: i16) -> Option<&str> {
        self.achievements
            .iter()
            .find(|trigger| trigger.scene == scene && trigger.actor == actor && trigger.text == text)
            .map(|trigger| trigger.id.as_str())
    }

    pub fn remap_text(&self, text: i16) -> i16 {
        self.text_remap.get(&text).copied().unwrap_or(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_path_yields_defaults() {
        let config = LifeConfig::from_json_file(None).expect("defaults");
        assert_eq!((config.screen_width, config.screen_height), (640, 480));
        assert_eq!(config.achievement_for(10, 8, 284), Some("LBA_ACH_008"));
        assert_eq!(config.achievement_for(10, 7, 284), None);
    }

    #[test]
    fn partial_files_keep_other_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("life.json");
        fs::write(&path, r#"{"rng_seed": 9, "text_remap": {"0": 47}}"#).expect("write");

        let config = LifeConfig::from_json_file(Some(&path)).expect("loaded");
        assert_eq!(config.rng_seed, 9);
        assert_eq!(config.remap_text(0), 47);
        assert_eq!(config.remap_text(5), 5);
        assert!(config.scenery_zoom);
    }

    #[test]
    fn malformed_files_name_the_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("broken.json");
        fs::write(&path, "{").expect("write");
        let err = LifeConfig::from_json_file(Some(&path)).unwrap_err();
        assert!(format!("{err:#}").contains("broken.json"));
    }
}
