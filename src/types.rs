//! Small value types shared by the simulation, encoder and learner.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One of the four moves available to the agent.
///
/// The discriminant doubles as the index into an action-value vector, so the
/// order here is part of the persisted model format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Action {
    Up,
    Down,
    Left,
    Right,
}

impl Action {
    /// Number of actions in the discrete action set.
    pub const COUNT: usize = 4;

    /// All actions in index order.
    pub const ALL: [Action; Action::COUNT] = [Action::Up, Action::Down, Action::Left, Action::Right];

    /// Index of this action in an action-value vector.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Look up an action by its index.
    ///
    /// # Panics
    ///
    /// Panics if `index >= Action::COUNT`. An out-of-range action index is a
    /// caller defect, never a recoverable condition.
    pub fn from_index(index: usize) -> Action {
        match Self::ALL.get(index) {
            Some(&action) => action,
            None => panic!(
                "action index {index} is outside the action set (0..{})",
                Self::COUNT
            ),
        }
    }

    /// Row/column displacement of a single step in this direction.
    pub fn delta(self) -> (i32, i32) {
        match self {
            Action::Up => (-1, 0),
            Action::Down => (1, 0),
            Action::Left => (0, -1),
            Action::Right => (0, 1),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Action::Up => "UP",
            Action::Down => "DOWN",
            Action::Left => "LEFT",
            Action::Right => "RIGHT",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A cell coordinate on the maze.
///
/// Coordinates are signed so that probing one step past the border (or
/// scanning several cells ahead) never needs special casing; bounds are
/// checked by the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub row: i32,
    pub col: i32,
}

impl Position {
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// The cell reached by taking `steps` steps in direction `action`.
    pub fn offset(self, action: Action, steps: i32) -> Position {
        let (dr, dc) = action.delta();
        Position::new(self.row + dr * steps, self.col + dc * steps)
    }

    /// The neighbouring cell in direction `action`.
    pub fn step(self, action: Action) -> Position {
        self.offset(action, 1)
    }

    /// Manhattan (taxicab) distance between two cells.
    pub fn manhattan(self, other: Position) -> u32 {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}
