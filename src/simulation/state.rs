//! Mutable per-episode state

use serde::{Deserialize, Serialize};

use super::ghost::Ghost;
use crate::{
    gridworld::{Grid, Tile},
    types::{Action, Position},
};

/// Everything that changes while an episode is played.
///
/// Owned exclusively by the engine; observers and the encoder only ever see
/// it by shared reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpisodeState {
    pub grid: Grid,
    pub agent: Position,
    pub ghosts: Vec<Ghost>,
    /// 1-based
    pub level: u32,
    pub score: u32,
    pub lives: u32,
    /// Dots and power pellets left on `grid`
    pub remaining_pellets: usize,
    /// Ticks on the current level
    pub steps: u32,
    /// Ticks across all levels of the episode
    pub total_steps: u32,
    /// `None` right after a reset, a level start or a lost life
    pub last_action: Option<Action>,
    pub ghosts_eaten: u32,
    pub done: bool,
    /// Level-scaled chance a hostile ghost moves on a tick
    pub ghost_move_prob: f64,
    /// Level-scaled scared timer applied by a power pellet
    pub scared_duration: u32,
}

impl EpisodeState {
    pub fn any_ghost_fleeing(&self) -> bool {
        self.ghosts.iter().any(Ghost::is_fleeing)
    }

    /// First ghost (in processing order) standing on `pos`.
    pub fn ghost_at(&self, pos: Position) -> Option<&Ghost> {
        self.ghosts.iter().find(|ghost| ghost.position == pos)
    }

    pub fn tile_under_agent(&self) -> Option<Tile> {
        self.grid.tile(self.agent)
    }

    /// The pellet counter agrees with the live grid.
    pub fn pellets_consistent(&self) -> bool {
        self.remaining_pellets == self.grid.pellet_count()
    }
}
