//! Observer implementations for training and demo runs
//!
//! Observers allow composable reporting during training without coupling
//! the episode loop to specific output formats.

use std::{
    fs::{File, OpenOptions},
    path::Path,
};

use indicatif::{ProgressBar, ProgressStyle};

use super::history::EpisodeSummary;
use crate::{Error, Result, ports::Observer};

/// Progress bar observer - Shows training progress
pub struct ProgressObserver {
    progress_bar: Option<ProgressBar>,
    best_score: u32,
    wins: u32,
}

impl ProgressObserver {
    /// Create a new progress observer
    pub fn new() -> Self {
        Self {
            progress_bar: None,
            best_score: 0,
            wins: 0,
        }
    }

    fn message(&self, epsilon: f64) -> String {
        format!(
            "best {} | won {} | eps {:.3}",
            self.best_score, self.wins, epsilon
        )
    }
}

impl Default for ProgressObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl Observer for ProgressObserver {
    fn on_training_start(&mut self, total_episodes: usize) -> Result<()> {
        let pb = ProgressBar::new(total_episodes as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} episodes ({msg})")
                .map_err(|e| Error::ProgressBarTemplate {
                    message: e.to_string(),
                })?
                .progress_chars("=>-"),
        );
        self.progress_bar = Some(pb);
        Ok(())
    }

    fn on_episode_end(&mut self, summary: &EpisodeSummary) -> Result<()> {
        self.best_score = self.best_score.max(summary.score);
        if summary.won {
            self.wins += 1;
        }

        if let Some(pb) = &self.progress_bar {
            pb.inc(1);
            pb.set_message(self.message(summary.epsilon));
        }
        Ok(())
    }

    fn on_training_end(&mut self) -> Result<()> {
        if let Some(pb) = &self.progress_bar {
            pb.finish_with_message(format!("best {} | won {}", self.best_score, self.wins));
        }
        Ok(())
    }
}

/// Console observer - Prints a one-line report every `report_every` episodes
pub struct ConsoleObserver {
    report_every: u32,
    last_episode: Option<u32>,
    total_episodes: usize,
}

impl ConsoleObserver {
    pub fn new(report_every: u32) -> Self {
        Self {
            report_every: report_every.max(1),
            last_episode: None,
            total_episodes: 0,
        }
    }

    /// Whether `episode` is due for a report. Episode 1 is always reported.
    pub fn should_report(&self, episode: u32) -> bool {
        episode == 1 || episode.is_multiple_of(self.report_every)
    }

    pub fn format_line(summary: &EpisodeSummary) -> String {
        format!(
            "Ep {} | Score: {} | Lvl: {} | Eps: {:.3} | Alpha: {:.3} | Q-table size: {}",
            summary.episode,
            summary.score,
            summary.level,
            summary.epsilon,
            summary.alpha,
            summary.table_size
        )
    }
}

impl Observer for ConsoleObserver {
    fn on_training_start(&mut self, total_episodes: usize) -> Result<()> {
        self.total_episodes = total_episodes;
        Ok(())
    }

    fn on_episode_end(&mut self, summary: &EpisodeSummary) -> Result<()> {
        self.last_episode = Some(summary.episode);
        if self.should_report(summary.episode) {
            println!("{}", Self::format_line(summary));
        }
        Ok(())
    }

    fn on_training_end(&mut self) -> Result<()> {
        if let Some(last) = self.last_episode {
            println!(
                "Finished {} episode(s), last episode {last}",
                self.total_episodes
            );
        }
        Ok(())
    }
}

/// CSV log observer - Appends one row per episode
///
/// Columns: `Episode,Score,Steps,Epsilon,GhostsEaten`. The header is written
/// only when the file is new or empty, so resumed runs keep appending to
/// the same log.
pub struct CsvLogObserver {
    writer: csv::Writer<File>,
}

impl CsvLogObserver {
    pub const HEADER: [&'static str; 5] = ["Episode", "Score", "Steps", "Epsilon", "GhostsEaten"];

    /// Open `path` for appending, creating it if needed.
    pub fn append<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let needs_header = std::fs::metadata(path).map_or(true, |meta| meta.len() == 0);

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|source| Error::Io {
                operation: format!("open log file {}", path.display()),
                source,
            })?;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        if needs_header {
            writer.write_record(Self::HEADER)?;
            writer.flush()?;
        }
        Ok(Self { writer })
    }
}

impl Observer for CsvLogObserver {
    fn on_episode_end(&mut self, summary: &EpisodeSummary) -> Result<()> {
        self.writer.write_record([
            summary.episode.to_string(),
            summary.score.to_string(),
            summary.steps.to_string(),
            summary.epsilon.to_string(),
            summary.ghosts_eaten.to_string(),
        ])?;
        Ok(())
    }

    fn on_training_end(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
