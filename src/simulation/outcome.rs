//! Structured result of a single simulation tick

use serde::{Deserialize, Serialize};

/// What happened on a tick, beyond the reward.
///
/// Level transitions, life loss and timeouts are ordinary control flow and
/// are reported here rather than as errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum StepEvent {
    /// Nothing episode-changing happened
    #[default]
    Continue,
    /// All pellets eaten on a non-final level; call `advance_level` to go on
    LevelCleared,
    /// All pellets eaten on the final level
    GameWon,
    /// A hostile ghost caught the agent, lives remain
    Hit,
    /// A hostile ghost caught the agent on its last life
    Died,
    /// The per-level step cap was reached
    TimedOut,
}

/// Auxiliary information attached to a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StepInfo {
    pub event: StepEvent,
    /// Ghosts eaten so far this episode
    pub ghosts_eaten: u32,
}

/// Reward, termination flag and info for one call to `step`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct StepOutcome {
    pub reward: f64,
    pub terminal: bool,
    pub info: StepInfo,
}

impl StepOutcome {
    pub fn level_cleared(&self) -> bool {
        self.info.event == StepEvent::LevelCleared
    }

    pub fn game_won(&self) -> bool {
        self.info.event == StepEvent::GameWon
    }
}
