//! Discretization of the raw episode state into a table key
//!
//! The encoder looks along the four movement directions from the agent and
//! records, per direction, whether the adjacent cell is blocked, whether a
//! ghost threatens (or can be hunted) along that line, and whether stepping
//! that way brings the agent closer to the nearest pellet.

use serde::{Deserialize, Serialize};

use crate::{
    simulation::EpisodeState,
    types::{Action, Position},
};

/// Ghost situation along one direction.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub enum Threat {
    #[default]
    None,
    /// A hostile ghost within striking distance
    HostileNear,
    /// A fleeing ghost somewhere within the lookahead
    Fleeing,
}

/// Features of a single direction, as seen from the agent.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct DirectionFeatures {
    /// Adjacent cell is a wall or off the grid
    pub wall: bool,
    pub threat: Threat,
    /// One step this way strictly shortens the distance to the nearest pellet
    pub toward_pellet: bool,
}

/// Compact lookup key for the value tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EncodedState {
    /// Indexed by [`Action::index`]
    pub directions: [DirectionFeatures; Action::COUNT],
    pub any_fleeing: bool,
    pub last_action: Option<Action>,
}

impl EncodedState {
    pub fn direction(&self, action: Action) -> &DirectionFeatures {
        &self.directions[action.index()]
    }
}

/// Stateless projection of [`EpisodeState`] onto [`EncodedState`].
#[derive(Debug, Clone, Copy, Default)]
pub struct StateEncoder;

impl StateEncoder {
    /// Cells scanned along each direction for ghosts.
    pub const LOOKAHEAD: u32 = 7;
    /// A hostile ghost this close (or closer) counts as a threat.
    pub const NEAR: u32 = 2;

    pub fn encode(state: &EpisodeState) -> EncodedState {
        let nearest = nearest_pellet(state);
        let directions = Action::ALL.map(|action| DirectionFeatures {
            wall: !state.grid.is_passable(state.agent.step(action)),
            threat: scan_threat(state, action),
            toward_pellet: nearest.is_some_and(|pellet| {
                state.agent.step(action).manhattan(pellet) < state.agent.manhattan(pellet)
            }),
        });

        EncodedState {
            directions,
            any_fleeing: state.any_ghost_fleeing(),
            last_action: state.last_action,
        }
    }
}

/// Walls do not block the line of sight; only the first ghost on each cell
/// counts.
fn scan_threat(state: &EpisodeState, action: Action) -> Threat {
    let mut threat = Threat::None;
    for distance in 1..=StateEncoder::LOOKAHEAD {
        let cell = state.agent.offset(action, distance as i32);
        let Some(ghost) = state.ghost_at(cell) else {
            continue;
        };
        if ghost.is_fleeing() {
            threat = Threat::Fleeing;
        } else if distance <= StateEncoder::NEAR {
            return Threat::HostileNear;
        }
    }
    threat
}

/// Nearest remaining pellet by Manhattan distance; row-major order breaks ties.
fn nearest_pellet(state: &EpisodeState) -> Option<Position> {
    let mut best: Option<(Position, u32)> = None;
    for pellet in state.grid.pellets() {
        let distance = state.agent.manhattan(pellet);
        if best.is_none_or(|(_, d)| distance < d) {
            best = Some((pellet, distance));
        }
    }
    best.map(|(pos, _)| pos)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::{
        gridworld::{Layout, Map},
        simulation::{SimulationConfig, SimulationEngine},
    };

    fn state_on(map: &str, agent: Position, ghosts: Vec<Position>) -> EpisodeState {
        let layout = Layout::new(Map::from_ascii(map).unwrap(), agent, ghosts).unwrap();
        SimulationEngine::with_layout(SimulationConfig::default(), layout)
            .unwrap()
            .state()
            .clone()
    }

    const CORRIDOR: &str = "\
##########
#       .#
##########";

    #[test]
    fn test_wall_flags() {
        let state = state_on(CORRIDOR, Position::new(1, 1), vec![]);
        let encoded = StateEncoder::encode(&state);

        assert!(encoded.direction(Action::Up).wall);
        assert!(encoded.direction(Action::Down).wall);
        assert!(encoded.direction(Action::Left).wall);
        assert!(!encoded.direction(Action::Right).wall);
    }

    #[test]
    fn test_border_counts_as_wall() {
        let state = state_on("  .\n . ", Position::new(0, 0), vec![]);
        let encoded = StateEncoder::encode(&state);

        assert!(encoded.direction(Action::Up).wall);
        assert!(encoded.direction(Action::Left).wall);
        assert!(!encoded.direction(Action::Down).wall);
    }

    #[test]
    fn test_hostile_ghost_only_threatens_when_near() {
        let near = state_on(CORRIDOR, Position::new(1, 1), vec![Position::new(1, 3)]);
        assert_eq!(
            StateEncoder::encode(&near).direction(Action::Right).threat,
            Threat::HostileNear
        );

        let far = state_on(CORRIDOR, Position::new(1, 1), vec![Position::new(1, 4)]);
        assert_eq!(
            StateEncoder::encode(&far).direction(Action::Right).threat,
            Threat::None
        );
    }

    #[test]
    fn test_fleeing_ghost_seen_across_lookahead() {
        let mut state = state_on(CORRIDOR, Position::new(1, 1), vec![Position::new(1, 7)]);
        state.ghosts[0].scared = 10;

        let encoded = StateEncoder::encode(&state);
        assert_eq!(encoded.direction(Action::Right).threat, Threat::Fleeing);
        assert_eq!(encoded.direction(Action::Left).threat, Threat::None);
        assert!(encoded.any_fleeing);
    }

    #[test]
    fn test_hostile_near_overrides_fleeing() {
        let mut state = state_on(
            CORRIDOR,
            Position::new(1, 1),
            vec![Position::new(1, 2), Position::new(1, 3)],
        );
        state.ghosts[0].scared = 10;

        assert_eq!(
            StateEncoder::encode(&state).direction(Action::Right).threat,
            Threat::HostileNear
        );
    }

    #[test]
    fn test_scan_sees_through_walls() {
        let state = state_on(
            "#######\n# # ..#\n#######",
            Position::new(1, 1),
            vec![Position::new(1, 3)],
        );
        assert_eq!(
            StateEncoder::encode(&state).direction(Action::Right).threat,
            Threat::HostileNear
        );
    }

    #[test]
    fn test_progress_toward_nearest_pellet() {
        let state = state_on(CORRIDOR, Position::new(1, 1), vec![]);
        let encoded = StateEncoder::encode(&state);

        assert!(encoded.direction(Action::Right).toward_pellet);
        assert!(!encoded.direction(Action::Left).toward_pellet);
        assert!(!encoded.direction(Action::Up).toward_pellet);
        assert!(!encoded.direction(Action::Down).toward_pellet);
    }

    #[test]
    fn test_nearest_pellet_tie_resolves_row_major() {
        let state = state_on("#####\n# . #\n#   #\n# . #\n#####", Position::new(2, 2), vec![]);
        let encoded = StateEncoder::encode(&state);

        assert!(encoded.direction(Action::Up).toward_pellet);
        assert!(!encoded.direction(Action::Down).toward_pellet);
    }

    #[test]
    fn test_no_pellets_no_progress() {
        let mut state = state_on(CORRIDOR, Position::new(1, 1), vec![]);
        state.grid.clear(Position::new(1, 8));
        let encoded = StateEncoder::encode(&state);

        assert!(encoded.directions.iter().all(|d| !d.toward_pellet));
    }

    #[test]
    fn test_last_action_copied_and_keys_hash_structurally() {
        let mut state = state_on(CORRIDOR, Position::new(1, 1), vec![]);
        let fresh = StateEncoder::encode(&state);
        assert_eq!(fresh.last_action, None);

        state.last_action = Some(Action::Left);
        let moved = StateEncoder::encode(&state);
        assert_eq!(moved.last_action, Some(Action::Left));

        let keys: HashSet<EncodedState> = [fresh, moved, StateEncoder::encode(&state)]
            .into_iter()
            .collect();
        assert_eq!(keys.len(), 2);
    }
}
