//! Observer port - abstraction for training observation
//!
//! Progress bars, console reports, CSV logs and the terminal renderer all
//! plug into the training pipeline through this trait, so the episode loop
//! never depends on a particular output format.

use crate::{
    Result,
    pipeline::EpisodeSummary,
    simulation::{EpisodeState, StepOutcome},
};

/// Observer trait for monitoring training and demo runs
///
/// # Event Sequence
///
/// 1. `on_training_start(total_episodes)` - Once at the beginning
/// 2. For each episode:
///    - `on_episode_start(episode)`
///    - `on_step(...)` - After every simulation tick
///    - `on_episode_end(summary)`
/// 3. `on_training_end()` - Once at the end
///
/// Every method defaults to a no-op.
///
/// # Examples
///
/// ```no_run
/// use pacman_rl::{pipeline::EpisodeSummary, ports::Observer};
///
/// struct BestScore(u32);
///
/// impl Observer for BestScore {
///     fn on_episode_end(&mut self, summary: &EpisodeSummary) -> pacman_rl::Result<()> {
///         self.0 = self.0.max(summary.score);
///         Ok(())
///     }
/// }
/// ```
pub trait Observer: Send {
    /// Called once before the first episode.
    fn on_training_start(&mut self, _total_episodes: usize) -> Result<()> {
        Ok(())
    }

    /// Called when an episode starts (after the engine was reset).
    fn on_episode_start(&mut self, _episode: u32) -> Result<()> {
        Ok(())
    }

    /// Called after each simulation tick with a read-only view of the state.
    ///
    /// When a tick clears a non-final level, `state` already shows the next
    /// level.
    fn on_step(
        &mut self,
        _episode: u32,
        _state: &EpisodeState,
        _outcome: &StepOutcome,
    ) -> Result<()> {
        Ok(())
    }

    /// Called when an episode reaches a terminal state.
    fn on_episode_end(&mut self, _summary: &EpisodeSummary) -> Result<()> {
        Ok(())
    }

    /// Called once after the last episode. Use this to flush outputs or print
    /// summaries.
    fn on_training_end(&mut self) -> Result<()> {
        Ok(())
    }
}
