//! Per-episode training record

use serde::{Deserialize, Serialize};

/// What happened in one episode, as reported to observers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EpisodeSummary {
    /// 0-based, continues across resumed runs
    pub episode: u32,
    pub score: u32,
    /// Ticks on the level the episode ended on
    pub steps: u32,
    /// Ticks across all levels of the episode
    pub total_steps: u32,
    /// ε after the end-of-episode decay, the value saved with the model
    pub epsilon: f64,
    /// α after the end-of-episode decay
    pub alpha: f64,
    pub ghosts_eaten: u32,
    /// Highest level reached
    pub level: u32,
    pub table_size: usize,
    pub total_reward: f64,
    /// Final level cleared
    pub won: bool,
}

/// Parallel per-episode series, in episode order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingHistory {
    pub episodes: Vec<u32>,
    pub scores: Vec<u32>,
    pub epsilons: Vec<f64>,
    pub ghosts_eaten: Vec<u32>,
    pub levels: Vec<u32>,
}

impl TrainingHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, summary: &EpisodeSummary) {
        self.episodes.push(summary.episode);
        self.scores.push(summary.score);
        self.epsilons.push(summary.epsilon);
        self.ghosts_eaten.push(summary.ghosts_eaten);
        self.levels.push(summary.level);
    }

    /// Append another run's history, e.g. after resuming.
    pub fn extend(&mut self, other: &TrainingHistory) {
        self.episodes.extend_from_slice(&other.episodes);
        self.scores.extend_from_slice(&other.scores);
        self.epsilons.extend_from_slice(&other.epsilons);
        self.ghosts_eaten.extend_from_slice(&other.ghosts_eaten);
        self.levels.extend_from_slice(&other.levels);
    }

    pub fn len(&self) -> usize {
        self.episodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.episodes.is_empty()
    }

    pub fn last_episode(&self) -> Option<u32> {
        self.episodes.last().copied()
    }

    pub fn best_score(&self) -> Option<u32> {
        self.scores.iter().copied().max()
    }

    pub fn max_level(&self) -> Option<u32> {
        self.levels.iter().copied().max()
    }

    pub fn mean_score(&self) -> f64 {
        mean(&self.scores)
    }

    /// Trailing mean of the scores over at most `window` episodes.
    pub fn avg_scores(&self, window: usize) -> Vec<f64> {
        moving_average(&self.scores, window)
    }

    pub fn avg_ghosts(&self, window: usize) -> Vec<f64> {
        moving_average(&self.ghosts_eaten, window)
    }

    pub fn avg_levels(&self, window: usize) -> Vec<f64> {
        moving_average(&self.levels, window)
    }
}

fn mean(values: &[u32]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().map(|&v| f64::from(v)).sum::<f64>() / values.len() as f64
}

/// Entry `i` is the mean of `values[i + 1 - w..=i]` with `w = min(window, i + 1)`.
pub fn moving_average(values: &[u32], window: usize) -> Vec<f64> {
    let window = window.max(1);
    (0..values.len())
        .map(|idx| {
            let start = (idx + 1).saturating_sub(window);
            mean(&values[start..=idx])
        })
        .collect()
}
