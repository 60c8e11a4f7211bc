//! Game simulation
//!
//! The [`SimulationEngine`] owns a single [`EpisodeState`] and advances it one
//! discrete tick per [`SimulationEngine::step`] call: agent move, pellet
//! consumption, ghost moves and collision resolution, in that order. Rewards
//! and difficulty scaling come from an immutable [`SimulationConfig`].

pub mod config;
pub mod engine;
pub mod ghost;
pub mod outcome;
pub mod state;

pub use config::{
    GhostBehavior, GhostSpeed, PointValues, RewardConfig, ScaredDuration, SimulationConfig,
};
pub use engine::SimulationEngine;
pub use ghost::Ghost;
pub use outcome::{StepEvent, StepInfo, StepOutcome};
pub use state::EpisodeState;
