//! Maze plus start cells

use serde::{Deserialize, Serialize};

use super::map::Map;
use crate::{Error, Result, types::Position};

/// The 9x13 maze used by default.
pub const DEFAULT_MAP: &str = "\
#############
#.....#.....#
#.###.#.###.#
#o#.......#o#
#.#.##.##.#.#
#...#...#...#
#.###.#.###.#
#.....#.....#
#############";

/// Display colors assigned to ghosts in order (RGB). Cosmetic only.
pub const GHOST_COLORS: [(u8, u8, u8); 4] = [
    (255, 0, 0),
    (255, 182, 193),
    (0, 255, 255),
    (255, 165, 0),
];

/// A map together with the cells the agent and ghosts start on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Layout {
    map: Map,
    agent_start: Position,
    ghost_homes: Vec<Position>,
}

impl Layout {
    /// Build a layout, checking every start cell is passable.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidLayout`] if a start cell is off-grid or a wall.
    pub fn new(map: Map, agent_start: Position, ghost_homes: Vec<Position>) -> Result<Self> {
        if !map.is_passable(agent_start) {
            return Err(Error::InvalidLayout {
                message: format!("agent start {agent_start} is not a passable cell"),
            });
        }
        if let Some(home) = ghost_homes.iter().find(|home| !map.is_passable(**home)) {
            return Err(Error::InvalidLayout {
                message: format!("ghost home {home} is not a passable cell"),
            });
        }
        Ok(Self {
            map,
            agent_start,
            ghost_homes,
        })
    }

    pub fn map(&self) -> &Map {
        &self.map
    }

    pub fn agent_start(&self) -> Position {
        self.agent_start
    }

    pub fn ghost_homes(&self) -> &[Position] {
        &self.ghost_homes
    }
}

impl Default for Layout {
    fn default() -> Self {
        let map = Map::from_ascii(DEFAULT_MAP).expect("default map is well-formed");
        Self::new(
            map,
            Position::new(5, 5),
            vec![Position::new(3, 5), Position::new(5, 7)],
        )
        .expect("default start cells are passable")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gridworld::Tile;

    #[test]
    fn test_default_layout() {
        let layout = Layout::default();
        assert_eq!(layout.map().rows(), 9);
        assert_eq!(layout.map().cols(), 13);
        assert_eq!(layout.ghost_homes().len(), 2);
        assert_eq!(
            layout.map().tile(Position::new(3, 1)),
            Some(Tile::Power)
        );
        assert_eq!(
            layout.map().tile(Position::new(3, 11)),
            Some(Tile::Power)
        );
        assert_eq!(layout.map().pellet_count(), 51);
    }

    #[test]
    fn test_start_on_wall_rejected() {
        let map = Map::from_ascii(DEFAULT_MAP).unwrap();
        let err = Layout::new(map, Position::new(0, 0), vec![]).unwrap_err();
        assert!(matches!(err, Error::InvalidLayout { .. }));
    }

    #[test]
    fn test_ghost_home_off_grid_rejected() {
        let map = Map::from_ascii(DEFAULT_MAP).unwrap();
        let err =
            Layout::new(map, Position::new(5, 5), vec![Position::new(20, 1)]).unwrap_err();
        assert!(matches!(err, Error::InvalidLayout { .. }));
    }
}
