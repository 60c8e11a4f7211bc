//! Terminal renderer observing the episode loop.

use std::{
    io::{self, Write},
    thread,
    time::Duration,
};

use crate::{
    Error, Result,
    pipeline::EpisodeSummary,
    ports::Observer,
    simulation::{EpisodeState, StepEvent, StepOutcome},
    types::Position,
};

const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

/// Draws the maze after every tick: `C` for the agent, `G` for a hostile
/// ghost, `g` for a fleeing one.
pub struct AsciiRenderer<W: Write + Send = io::Stdout> {
    out: W,
    delay: Option<Duration>,
    clear_screen: bool,
}

impl AsciiRenderer {
    /// Render to stdout, clearing the terminal between frames.
    pub fn stdout(delay: Option<Duration>) -> Self {
        Self {
            out: io::stdout(),
            delay,
            clear_screen: true,
        }
    }
}

impl<W: Write + Send> AsciiRenderer<W> {
    /// Render to any writer, without terminal control codes or delay.
    pub fn with_writer(out: W) -> Self {
        Self {
            out,
            delay: None,
            clear_screen: false,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// One frame of the maze as text, without the status line.
    pub fn frame(state: &EpisodeState) -> String {
        let mut frame = String::with_capacity((state.grid.cols() + 1) * state.grid.rows());
        for row in 0..state.grid.rows() {
            for col in 0..state.grid.cols() {
                let pos = Position::new(row as i32, col as i32);
                let glyph = if pos == state.agent {
                    'C'
                } else if let Some(ghost) = state.ghost_at(pos) {
                    if ghost.is_fleeing() { 'g' } else { 'G' }
                } else {
                    state.grid.tile(pos).map_or(' ', |tile| tile.to_char())
                };
                frame.push(glyph);
            }
            frame.push('\n');
        }
        frame
    }

    fn write_err(source: io::Error) -> Error {
        Error::Io {
            operation: "render frame".to_string(),
            source,
        }
    }
}

impl<W: Write + Send> Observer for AsciiRenderer<W> {
    fn on_step(&mut self, episode: u32, state: &EpisodeState, outcome: &StepOutcome) -> Result<()> {
        if self.clear_screen {
            write!(self.out, "{CLEAR_SCREEN}").map_err(Self::write_err)?;
        }
        write!(self.out, "{}", Self::frame(state)).map_err(Self::write_err)?;
        writeln!(
            self.out,
            "Episode {episode} | Score {} | Lives {} | Level {} | Pellets {}",
            state.score, state.lives, state.level, state.remaining_pellets
        )
        .map_err(Self::write_err)?;
        if outcome.info.event == StepEvent::LevelCleared {
            writeln!(
                self.out,
                "Level {} cleared, on to level {}",
                state.level.saturating_sub(1),
                state.level
            )
            .map_err(Self::write_err)?;
        }
        self.out.flush().map_err(Self::write_err)?;

        if let Some(delay) = self.delay {
            thread::sleep(delay);
        }
        Ok(())
    }

    fn on_episode_end(&mut self, summary: &EpisodeSummary) -> Result<()> {
        writeln!(
            self.out,
            "Episode {} over | Score {} | Level reached {}",
            summary.episode, summary.score, summary.level
        )
        .map_err(Self::write_err)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        gridworld::{Layout, Map},
        simulation::{SimulationConfig, SimulationEngine},
        types::Action,
    };

    fn engine() -> SimulationEngine {
        let layout = Layout::new(
            Map::from_ascii("######\n#.  o#\n######").unwrap(),
            Position::new(1, 3),
            vec![Position::new(1, 1)],
        )
        .unwrap();
        SimulationEngine::with_layout(SimulationConfig::default(), layout)
            .unwrap()
            .with_seed(1)
    }

    #[test]
    fn test_frame_glyphs() {
        let engine = engine();
        assert_eq!(
            AsciiRenderer::<Vec<u8>>::frame(engine.state()),
            "######\n#G Co#\n######\n"
        );

        let mut state = engine.state().clone();
        state.ghosts[0].scared = 3;
        assert_eq!(
            AsciiRenderer::<Vec<u8>>::frame(&state),
            "######\n#g Co#\n######\n"
        );
    }

    #[test]
    fn test_renders_frame_and_status_on_step() {
        let mut engine = engine();
        let mut renderer = AsciiRenderer::with_writer(Vec::new());

        let outcome = engine.step(Action::Up);
        renderer.on_step(0, engine.state(), &outcome).unwrap();

        let text = String::from_utf8(renderer.into_inner()).unwrap();
        assert!(text.contains("Lives 3 | Level 1 | Pellets 2"));
        assert!(!text.contains(CLEAR_SCREEN));
    }
}
