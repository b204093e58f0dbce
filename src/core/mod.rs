//! Core engine types: seats, RNG, configuration and match state.

pub mod config;
pub mod player;
pub mod rng;
pub mod state;

pub use config::EngineConfig;
pub use player::{PlayerId, PlayerMap};
pub use rng::{GameRng, GameRngState};
pub use state::{MatchState, TurnPhase, TurnResources};
