//! Simulation configuration: reward shaping, scoring and level scaling

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Reward signal handed to the learner for each event.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RewardConfig {
    /// Applied every tick, to encourage urgency
    pub step: f64,
    /// Added when the agent bumps into a wall or the border
    pub wall: f64,
    pub dot: f64,
    pub power: f64,
    pub ghost_eaten: f64,
    /// Terminal reward for losing the last life; a quarter of it is applied
    /// for every other life lost
    pub death: f64,
    /// Terminal reward for clearing a non-final level
    pub level_clear: f64,
    /// Terminal reward for clearing the final level
    pub game_clear: f64,
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self {
            step: -5.0,
            wall: -10.0,
            dot: 10.0,
            power: 50.0,
            ghost_eaten: 800.0,
            death: -500.0,
            level_clear: 1000.0,
            game_clear: 5000.0,
        }
    }
}

/// In-game score awarded per event (what the player sees, not the reward).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PointValues {
    pub dot: u32,
    pub power: u32,
    pub ghost: u32,
}

impl Default for PointValues {
    fn default() -> Self {
        Self {
            dot: 10,
            power: 50,
            ghost: 200,
        }
    }
}

/// Probability that a hostile ghost moves on a given tick, by level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GhostSpeed {
    pub base: f64,
    pub increment: f64,
    pub max: f64,
}

impl GhostSpeed {
    /// `min(max, base + (level - 1) * increment)`
    pub fn at_level(&self, level: u32) -> f64 {
        let scaled = self.base + f64::from(level.saturating_sub(1)) * self.increment;
        scaled.min(self.max)
    }
}

impl Default for GhostSpeed {
    fn default() -> Self {
        Self {
            base: 0.5,
            increment: 0.05,
            max: 0.9,
        }
    }
}

/// Number of ticks ghosts stay scared after a power pellet, by level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScaredDuration {
    pub base: u32,
    pub decrement: u32,
    pub min: u32,
}

impl ScaredDuration {
    /// `max(min, base - (level - 1) * decrement)`
    pub fn at_level(&self, level: u32) -> u32 {
        let reduction = level.saturating_sub(1).saturating_mul(self.decrement);
        self.base.saturating_sub(reduction).max(self.min)
    }
}

impl Default for ScaredDuration {
    fn default() -> Self {
        Self {
            base: 30,
            decrement: 2,
            min: 10,
        }
    }
}

/// Mix between deterministic pursuit/flight and random wandering.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GhostBehavior {
    /// Chance a hostile ghost picks a random neighbour instead of chasing
    pub chase_random_prob: f64,
    /// Chance a fleeing ghost picks a random neighbour instead of the
    /// farthest one
    pub flee_random_prob: f64,
}

impl Default for GhostBehavior {
    fn default() -> Self {
        Self {
            chase_random_prob: 0.3,
            flee_random_prob: 0.2,
        }
    }
}

/// Complete, immutable simulation configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub rewards: RewardConfig,
    pub points: PointValues,
    pub ghost_speed: GhostSpeed,
    pub scared_duration: ScaredDuration,
    pub ghost_behavior: GhostBehavior,
    /// Ticks per level before the episode times out
    pub max_steps: u32,
    pub initial_lives: u32,
    pub max_level: u32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            rewards: RewardConfig::default(),
            points: PointValues::default(),
            ghost_speed: GhostSpeed::default(),
            scared_duration: ScaredDuration::default(),
            ghost_behavior: GhostBehavior::default(),
            max_steps: 2000,
            initial_lives: 3,
            max_level: 10,
        }
    }
}

impl SimulationConfig {
    /// Check the configuration describes a playable game.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        let invalid = |message: String| Err(Error::InvalidConfiguration { message });

        if self.max_level == 0 {
            return invalid("max_level must be at least 1".to_string());
        }
        if self.initial_lives == 0 {
            return invalid("initial_lives must be at least 1".to_string());
        }
        if self.max_steps == 0 {
            return invalid("max_steps must be at least 1".to_string());
        }
        for (name, value) in [
            ("ghost_speed.base", self.ghost_speed.base),
            ("ghost_speed.max", self.ghost_speed.max),
            (
                "ghost_behavior.chase_random_prob",
                self.ghost_behavior.chase_random_prob,
            ),
            (
                "ghost_behavior.flee_random_prob",
                self.ghost_behavior.flee_random_prob,
            ),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return invalid(format!("{name} must be a probability in [0, 1], got {value}"));
            }
        }
        if !self.ghost_speed.increment.is_finite() {
            return invalid("ghost_speed.increment must be finite".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ghost_speed_scaling_is_capped() {
        let speed = GhostSpeed::default();
        assert!((speed.at_level(1) - 0.5).abs() < 1e-12);
        assert!((speed.at_level(3) - 0.6).abs() < 1e-12);
        assert!((speed.at_level(10) - 0.9).abs() < 1e-12);
        assert!((speed.at_level(50) - 0.9).abs() < 1e-12);
    }

    #[test]
    fn test_scared_duration_scaling_is_floored() {
        let duration = ScaredDuration::default();
        assert_eq!(duration.at_level(1), 30);
        assert_eq!(duration.at_level(4), 24);
        assert_eq!(duration.at_level(10), 12);
        assert_eq!(duration.at_level(11), 10);
        assert_eq!(duration.at_level(40), 10);
    }

    #[test]
    fn test_default_config_is_valid() {
        SimulationConfig::default().validate().unwrap();
    }

    #[test]
    fn test_invalid_probability_rejected() {
        let mut config = SimulationConfig::default();
        config.ghost_behavior.flee_random_prob = 1.5;
        assert!(matches!(
            config.validate(),
            Err(Error::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: SimulationConfig =
            serde_json::from_str(r#"{ "max_level": 3, "rewards": { "dot": 20.0 } }"#).unwrap();
        assert_eq!(config.max_level, 3);
        assert_eq!(config.rewards.dot, 20.0);
        assert_eq!(config.rewards.step, -5.0);
        assert_eq!(config.initial_lives, 3);
    }
}
