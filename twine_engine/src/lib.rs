//! Interpreter for the per-actor "life" scripts that drive scene behaviour.

pub mod actor;
pub mod callbacks;
pub mod cli;
pub mod clock;
pub mod config;
pub mod engine;
pub mod error;
pub mod fixture;
pub mod game_state;
pub mod geometry;
pub mod life;
pub mod overlay;
pub mod presentation;
pub mod recording;
pub mod runtime;
pub mod scene;
pub mod scheduler;
pub mod script;

pub use callbacks::Collaborators;
pub use config::LifeConfig;
pub use engine::{LifeEngine, SceneLoopState};
pub use error::{LifeError, LifeResult};
pub use fixture::SceneFixture;
pub use recording::{HostEvent, RecordingCallbacks};
pub use scheduler::{TickScheduler, TickSummary};
pub use script::LifeScript;
