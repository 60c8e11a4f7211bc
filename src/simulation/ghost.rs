//! Ghost records and their movement policy

use rand::{Rng, seq::IndexedRandom};
use serde::{Deserialize, Serialize};

use super::config::GhostBehavior;
use crate::{
    gridworld::Grid,
    types::{Action, Position},
};

/// Neighbour enumeration order. Ties in the pursuit/flight choice resolve to
/// the earliest entry.
const MOVE_ORDER: [Action; 4] = [Action::Right, Action::Left, Action::Down, Action::Up];

/// A single ghost. Owned by value inside the episode state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ghost {
    pub position: Position,
    pub home: Position,
    /// Ticks left fleeing; zero means hostile
    pub scared: u32,
    /// Cosmetic only
    pub color: (u8, u8, u8),
}

impl Ghost {
    pub fn new(home: Position, color: (u8, u8, u8)) -> Self {
        Self {
            position: home,
            home,
            scared: 0,
            color,
        }
    }

    pub fn is_fleeing(&self) -> bool {
        self.scared > 0
    }

    /// Back to the home cell, hostile again.
    pub fn send_home(&mut self) {
        self.position = self.home;
        self.scared = 0;
    }

    /// One tick of ghost behaviour: count down the scared timer, decide
    /// whether to move, and if so pick a passable neighbour.
    ///
    /// Fleeing ghosts always move; hostile ghosts move with probability
    /// `move_prob`.
    pub fn advance<R: Rng>(
        &mut self,
        grid: &Grid,
        agent: Position,
        move_prob: f64,
        behavior: &GhostBehavior,
        rng: &mut R,
    ) {
        if self.scared > 0 {
            self.scared -= 1;
        }

        let should_move = self.is_fleeing() || rng.random::<f64>() < move_prob;
        if !should_move {
            return;
        }

        let moves = passable_neighbours(grid, self.position);
        if moves.is_empty() {
            return;
        }

        let target = if self.is_fleeing() {
            if rng.random::<f64>() < behavior.flee_random_prob {
                moves.choose(rng).copied()
            } else {
                farthest_from(&moves, agent)
            }
        } else if rng.random::<f64>() < behavior.chase_random_prob {
            moves.choose(rng).copied()
        } else {
            closest_to(&moves, agent)
        };

        if let Some(target) = target {
            self.position = target;
        }
    }
}

/// Passable orthogonal neighbours of `pos`, in [`MOVE_ORDER`].
pub fn passable_neighbours(grid: &Grid, pos: Position) -> Vec<Position> {
    MOVE_ORDER
        .iter()
        .map(|&action| pos.step(action))
        .filter(|&next| grid.is_passable(next))
        .collect()
}

/// First candidate with the smallest Manhattan distance to `agent`.
fn closest_to(moves: &[Position], agent: Position) -> Option<Position> {
    let mut best: Option<(Position, u32)> = None;
    for &candidate in moves {
        let distance = candidate.manhattan(agent);
        if best.is_none_or(|(_, d)| distance < d) {
            best = Some((candidate, distance));
        }
    }
    best.map(|(pos, _)| pos)
}

/// First candidate with the largest Manhattan distance to `agent`.
fn farthest_from(moves: &[Position], agent: Position) -> Option<Position> {
    let mut best: Option<(Position, u32)> = None;
    for &candidate in moves {
        let distance = candidate.manhattan(agent);
        if best.is_none_or(|(_, d)| distance > d) {
            best = Some((candidate, distance));
        }
    }
    best.map(|(pos, _)| pos)
}
