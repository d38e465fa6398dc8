use std::collections::BTreeSet;

use rand::rngs::SmallRng;
use rand::SeedableRng;
use serde::Serialize;

use crate::actor::HeroState;
use crate::callbacks::Collaborators;
use crate::clock::{Clock, ClockSnapshot};
use crate::config::LifeConfig;
use crate::fixture::SceneFixture;
use crate::game_state::GameState;
use crate::overlay::OverlayList;
use crate::presentation::{ScreenState, TextState};
use crate::scene::Scene;

/// Outcome the scene loop acts on after the current tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SceneLoopState {
    #[default]
    Continue,
    Finished,
    ReturnToMenu,
}

/// Everything a life script can observe or mutate, plus the host handles.
#[derive(Debug)]
pub struct LifeEngine {
    pub config: LifeConfig,
    pub scene: Scene,
    pub game: GameState,
    pub hero: HeroState,
    pub clock: Clock,
    pub overlays: OverlayList,
    pub text: TextState,
    pub screen: ScreenState,
    pub loop_state: SceneLoopState,
    /// Item the player is currently using from the inventory menu.
    pub loop_inventory_item: Option<u8>,
    /// Set by the movement code when the hero presses action inside a zone.
    pub zone_action: bool,
    pub achievements: BTreeSet<String>,
    pub(crate) rng: SmallRng,
    pub(crate) host: Collaborators,
}

#[derive(Debug, Serialize)]
pub struct EngineSnapshot<'a> {
    pub scene: &'a Scene,
    pub game: &'a GameState,
    pub hero: &'a HeroState,
    pub clock: ClockSnapshot,
    pub overlays: &'a OverlayList,
    pub text: &'a TextState,
    pub screen: &'a ScreenState,
    pub loop_state: SceneLoopState,
    pub achievements: &'a BTreeSet<String>,
}

impl LifeEngine {
    pub fn new(config: LifeConfig, scene: Scene, host: Collaborators) -> Self {
        let rng = SmallRng::seed_from_u64(config.rng_seed);
        let text = TextState::new(config.display_text);
        Self {
            config,
            scene,
            game: GameState::default(),
            hero: HeroState::default(),
            clock: Clock::default(),
            overlays: OverlayList::default(),
            text,
            screen: ScreenState::default(),
            loop_state: SceneLoopState::Continue,
            loop_inventory_item: None,
            zone_action: false,
            achievements: BTreeSet::new(),
            rng,
            host,
        }
    }

    pub fn from_fixture(fixture: SceneFixture, config: LifeConfig, host: Collaborators) -> Self {
        let SceneFixture {
            scene,
            game,
            hero,
            lba_time,
            loop_inventory_item,
            zone_action,
        } = fixture;
        let mut engine = Self::new(config, scene, host);
        engine.game = game;
        engine.hero = hero;
        engine.clock = Clock::new(lba_time);
        engine.loop_inventory_item = loop_inventory_item;
        engine.zone_action = zone_action;
        engine
    }

    pub fn host(&self) -> &Collaborators {
        &self.host
    }

    pub fn set_host(&mut self, host: Collaborators) {
        self.host = host;
    }

    pub fn snapshot(&self) -> EngineSnapshot<'_> {
        EngineSnapshot {
            scene: &self.scene,
            game: &self.game,
            hero: &self.hero,
            clock: self.clock.snapshot(),
            overlays: &self.overlays,
            text: &self.text,
            screen: &self.screen,
            loop_state: self.loop_state,
            achievements: &self.achievements,
        }
    }
}
