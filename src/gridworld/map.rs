//! Tiles, the immutable map and its mutable per-level copy

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Error, Result, types::Position};

/// Contents of a single maze cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tile {
    Empty,
    Wall,
    Dot,
    Power,
}

impl Tile {
    pub fn to_char(self) -> char {
        match self {
            Tile::Empty => ' ',
            Tile::Wall => '#',
            Tile::Dot => '.',
            Tile::Power => 'o',
        }
    }

    pub fn from_char(c: char) -> Option<Tile> {
        match c {
            ' ' | '_' => Some(Tile::Empty),
            '#' => Some(Tile::Wall),
            '.' => Some(Tile::Dot),
            'o' | 'O' => Some(Tile::Power),
            _ => None,
        }
    }

    /// Whether the agent scores by standing on this tile.
    pub fn is_pellet(self) -> bool {
        matches!(self, Tile::Dot | Tile::Power)
    }
}

/// Immutable rectangular tile layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Map {
    rows: usize,
    cols: usize,
    tiles: Vec<Tile>,
}

impl Map {
    /// Parse a map from ASCII art: `#` wall, `.` dot, `o` power pellet,
    /// space (or `_`) empty. Blank leading/trailing lines are ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if the map is empty, ragged, or contains an unknown
    /// character.
    pub fn from_ascii(text: &str) -> Result<Self> {
        let lines: Vec<&str> = text
            .lines()
            .map(|line| line.trim_end_matches('\r'))
            .skip_while(|line| line.trim().is_empty())
            .collect();
        let lines: Vec<&str> = {
            let end = lines
                .iter()
                .rposition(|line| !line.trim().is_empty())
                .map_or(0, |idx| idx + 1);
            lines[..end].to_vec()
        };

        if lines.is_empty() {
            return Err(Error::InvalidLayout {
                message: "map has no rows".to_string(),
            });
        }

        let cols = lines[0].chars().count();
        if cols == 0 {
            return Err(Error::InvalidLayout {
                message: "map has no columns".to_string(),
            });
        }

        let mut tiles = Vec::with_capacity(lines.len() * cols);
        for (row, line) in lines.iter().enumerate() {
            let width = line.chars().count();
            if width != cols {
                return Err(Error::InvalidLayout {
                    message: format!("row {row} has {width} columns, expected {cols}"),
                });
            }
            for (col, c) in line.chars().enumerate() {
                let tile = Tile::from_char(c).ok_or(Error::InvalidTileCharacter {
                    character: c,
                    row,
                    col,
                })?;
                tiles.push(tile);
            }
        }

        Ok(Self {
            rows: lines.len(),
            cols,
            tiles,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn in_bounds(&self, pos: Position) -> bool {
        index_of(self.rows, self.cols, pos).is_some()
    }

    /// Tile at `pos`, or `None` if off-grid.
    pub fn tile(&self, pos: Position) -> Option<Tile> {
        index_of(self.rows, self.cols, pos).map(|idx| self.tiles[idx])
    }

    /// In bounds and not a wall.
    pub fn is_passable(&self, pos: Position) -> bool {
        matches!(self.tile(pos), Some(tile) if tile != Tile::Wall)
    }

    /// Number of dots and power pellets in the pristine layout.
    pub fn pellet_count(&self) -> usize {
        self.tiles.iter().filter(|tile| tile.is_pellet()).count()
    }

    /// Fresh mutable copy for a new level.
    pub fn instantiate(&self) -> Grid {
        Grid {
            rows: self.rows,
            cols: self.cols,
            tiles: self.tiles.clone(),
        }
    }
}

/// Mutable per-level copy of a [`Map`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    rows: usize,
    cols: usize,
    tiles: Vec<Tile>,
}

impl Grid {
    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn in_bounds(&self, pos: Position) -> bool {
        index_of(self.rows, self.cols, pos).is_some()
    }

    pub fn tile(&self, pos: Position) -> Option<Tile> {
        index_of(self.rows, self.cols, pos).map(|idx| self.tiles[idx])
    }

    pub fn is_passable(&self, pos: Position) -> bool {
        matches!(self.tile(pos), Some(tile) if tile != Tile::Wall)
    }

    /// Replace the tile at `pos` with [`Tile::Empty`], returning what was there.
    pub fn clear(&mut self, pos: Position) -> Option<Tile> {
        let idx = index_of(self.rows, self.cols, pos)?;
        let previous = self.tiles[idx];
        if previous != Tile::Wall {
            self.tiles[idx] = Tile::Empty;
        }
        Some(previous)
    }

    /// Live count of dots and power pellets.
    pub fn pellet_count(&self) -> usize {
        self.tiles.iter().filter(|tile| tile.is_pellet()).count()
    }

    /// Cells holding a pellet, in row-major order.
    pub fn pellets(&self) -> impl Iterator<Item = Position> + '_ {
        self.tiles
            .iter()
            .enumerate()
            .filter(|(_, tile)| tile.is_pellet())
            .map(|(idx, _)| Position::new((idx / self.cols) as i32, (idx % self.cols) as i32))
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.tiles.chunks(self.cols) {
            let line: String = row.iter().map(|tile| tile.to_char()).collect();
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

fn index_of(rows: usize, cols: usize, pos: Position) -> Option<usize> {
    if pos.row < 0 || pos.col < 0 {
        return None;
    }
    let (row, col) = (pos.row as usize, pos.col as usize);
    (row < rows && col < cols).then(|| row * cols + col)
}
