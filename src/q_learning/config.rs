//! Learner hyperparameters and decay schedules

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Temporal-difference control algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Algorithm {
    /// Off-policy, bootstraps from `max_a Q(s', a)`
    #[default]
    QLearning,
    /// On-policy, bootstraps from `Q(s', a')` for the action actually chosen
    Sarsa,
    /// Two estimators, each valuing the other's greedy choice
    DoubleQ,
}

impl Algorithm {
    pub const ALL: [Algorithm; 3] = [Algorithm::QLearning, Algorithm::Sarsa, Algorithm::DoubleQ];

    /// Human-readable name for reports.
    pub fn label(self) -> &'static str {
        match self {
            Algorithm::QLearning => "Q-Learning",
            Algorithm::Sarsa => "SARSA",
            Algorithm::DoubleQ => "Double Q-Learning",
        }
    }

    /// Number of value tables the algorithm maintains.
    pub fn table_count(self) -> usize {
        match self {
            Algorithm::DoubleQ => 2,
            Algorithm::QLearning | Algorithm::Sarsa => 1,
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Algorithm::QLearning => "q-learning",
            Algorithm::Sarsa => "sarsa",
            Algorithm::DoubleQ => "double-q",
        };
        f.write_str(label)
    }
}

impl FromStr for Algorithm {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "q-learning" | "q_learning" | "qlearning" | "q" => Ok(Algorithm::QLearning),
            "sarsa" => Ok(Algorithm::Sarsa),
            "double-q" | "double_q" | "doubleq" | "double-q-learning" => Ok(Algorithm::DoubleQ),
            _ => Err(Error::ParseAlgorithm {
                input: s.to_string(),
                expected: "q-learning, sarsa, double-q".to_string(),
            }),
        }
    }
}

/// Shape of the per-episode exploration decay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecayKind {
    /// `ε ← max(ε_min, ε · rate)`
    #[default]
    Exponential,
    /// `ε ← max(ε_min, ε − (ε_start − ε_min) / linear_episodes)`
    Linear,
}

impl fmt::Display for DecayKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            DecayKind::Exponential => "exponential",
            DecayKind::Linear => "linear",
        };
        f.write_str(label)
    }
}

impl FromStr for DecayKind {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "exponential" | "exp" => Ok(DecayKind::Exponential),
            "linear" | "lin" => Ok(DecayKind::Linear),
            _ => Err(Error::ParseDecayKind {
                input: s.to_string(),
                expected: "exponential, linear".to_string(),
            }),
        }
    }
}

/// ε-greedy exploration schedule.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplorationSchedule {
    pub start: f64,
    pub min: f64,
    /// Multiplier for [`DecayKind::Exponential`]
    pub decay_rate: f64,
    pub decay: DecayKind,
    /// Episodes over which [`DecayKind::Linear`] reaches `min`
    pub linear_episodes: u32,
}

impl Default for ExplorationSchedule {
    fn default() -> Self {
        Self {
            start: 1.0,
            min: 0.02,
            decay_rate: 0.9996,
            decay: DecayKind::Exponential,
            linear_episodes: 4000,
        }
    }
}

impl ExplorationSchedule {
    /// Linear decrement per episode.
    pub fn linear_step(&self) -> f64 {
        (self.start - self.min) / f64::from(self.linear_episodes.max(1))
    }

    /// ε after one more episode.
    pub fn next(&self, epsilon: f64) -> f64 {
        let decayed = match self.decay {
            DecayKind::Exponential => epsilon * self.decay_rate,
            DecayKind::Linear => epsilon - self.linear_step(),
        };
        decayed.max(self.min)
    }
}

/// Step-size schedule. A `decay_rate` of 1.0 keeps α constant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LearningRateSchedule {
    pub start: f64,
    pub min: f64,
    pub decay_rate: f64,
}

impl Default for LearningRateSchedule {
    fn default() -> Self {
        Self {
            start: 0.1,
            min: 0.01,
            decay_rate: 1.0,
        }
    }
}

impl LearningRateSchedule {
    pub fn next(&self, alpha: f64) -> f64 {
        (alpha * self.decay_rate).max(self.min)
    }
}

/// Everything needed to build a [`TabularLearner`](super::TabularLearner).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LearnerConfig {
    pub algorithm: Algorithm,
    pub learning_rate: LearningRateSchedule,
    /// γ
    pub discount: f64,
    pub exploration: ExplorationSchedule,
}

impl Default for LearnerConfig {
    fn default() -> Self {
        Self {
            algorithm: Algorithm::default(),
            learning_rate: LearningRateSchedule::default(),
            discount: 0.95,
            exploration: ExplorationSchedule::default(),
        }
    }
}

impl LearnerConfig {
    pub fn new(algorithm: Algorithm) -> Self {
        Self {
            algorithm,
            ..Self::default()
        }
    }

    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        let invalid = |message: String| Err(Error::InvalidConfiguration { message });

        let unit = |value: f64| (0.0..=1.0).contains(&value);
        for (name, value) in [
            ("learning_rate.start", self.learning_rate.start),
            ("learning_rate.min", self.learning_rate.min),
            ("learning_rate.decay_rate", self.learning_rate.decay_rate),
            ("discount", self.discount),
            ("exploration.start", self.exploration.start),
            ("exploration.min", self.exploration.min),
            ("exploration.decay_rate", self.exploration.decay_rate),
        ] {
            if !unit(value) {
                return invalid(format!("{name} must be in [0, 1], got {value}"));
            }
        }
        if self.learning_rate.min > self.learning_rate.start {
            return invalid("learning_rate.min exceeds learning_rate.start".to_string());
        }
        if self.exploration.min > self.exploration.start {
            return invalid("exploration.min exceeds exploration.start".to_string());
        }
        if self.exploration.decay == DecayKind::Linear && self.exploration.linear_episodes == 0 {
            return invalid("exploration.linear_episodes must be at least 1".to_string());
        }
        Ok(())
    }
}
