//! Persisted form of a trained learner.

use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    pipeline::TrainingHistory,
    q_learning::{
        config::{Algorithm, LearnerConfig},
        q_table::ValueTable,
    },
};

/// Provenance recorded alongside a saved model.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingMetadata {
    /// Episodes trained so far, across resumed runs
    pub episodes_trained: u32,
    /// Experiment seed (if any)
    pub seed: Option<u64>,
    /// Seed of the learner's exploration stream
    pub rng_seed: Option<u64>,
}

/// Everything needed to resume training or replay a policy.
///
/// Fields added after the first format version are `#[serde(default)]` so
/// older files keep loading; files must be written with named fields for
/// that to work.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedAgent {
    pub version: u32,
    pub algorithm: Algorithm,
    #[serde(default)]
    pub config: LearnerConfig,
    /// One table, or two for Double Q-learning
    pub tables: Vec<ValueTable>,
    pub epsilon: f64,
    pub alpha: f64,
    #[serde(default)]
    pub history: TrainingHistory,
    #[serde(default)]
    pub metadata: TrainingMetadata,
}

impl SavedAgent {
    pub const VERSION: u32 = 1;

    pub fn check_version(&self) -> Result<()> {
        if self.version != Self::VERSION {
            return Err(Error::UnsupportedVersion {
                found: self.version,
                expected: Self::VERSION,
            });
        }
        Ok(())
    }

    pub fn with_history(mut self, history: TrainingHistory) -> Self {
        self.history = history;
        self
    }

    /// Episode to continue from when resuming.
    pub fn next_episode(&self) -> u32 {
        self.history.last_episode().map_or(0, |last| last + 1)
    }

    /// Total rows across all tables.
    pub fn entry_count(&self) -> usize {
        self.tables.iter().map(ValueTable::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        encoding::StateEncoder,
        q_learning::{TabularLearner, TableId},
        simulation::{SimulationConfig, SimulationEngine},
        types::Action,
    };

    fn trained() -> SavedAgent {
        let engine = SimulationEngine::new(SimulationConfig::default()).unwrap();
        let state = StateEncoder::encode(engine.state());
        let mut learner = TabularLearner::new(LearnerConfig::new(Algorithm::Sarsa))
            .unwrap()
            .with_seed(3);
        learner.value(&state, TableId::First)[Action::Left.index()] = 12.5;
        learner.export(TrainingMetadata {
            episodes_trained: 10,
            seed: Some(3),
            ..TrainingMetadata::default()
        })
    }

    #[test]
    fn test_msgpack_roundtrip_preserves_tables() {
        let saved = trained();
        let bytes = rmp_serde::to_vec_named(&saved).unwrap();
        let loaded: SavedAgent = rmp_serde::from_slice(&bytes).unwrap();

        assert_eq!(loaded, saved);
        assert_eq!(loaded.entry_count(), 1);
        assert_eq!(loaded.metadata.episodes_trained, 10);
    }

    #[test]
    fn test_missing_optional_fields_default() {
        #[derive(Serialize)]
        struct Minimal {
            version: u32,
            algorithm: Algorithm,
            tables: Vec<ValueTable>,
            epsilon: f64,
            alpha: f64,
        }

        let minimal = Minimal {
            version: SavedAgent::VERSION,
            algorithm: Algorithm::QLearning,
            tables: vec![ValueTable::new()],
            epsilon: 0.3,
            alpha: 0.1,
        };
        let bytes = rmp_serde::to_vec_named(&minimal).unwrap();
        let loaded: SavedAgent = rmp_serde::from_slice(&bytes).unwrap();

        assert_eq!(loaded.epsilon, 0.3);
        assert!(loaded.history.is_empty());
        assert_eq!(loaded.metadata, TrainingMetadata::default());
        assert_eq!(loaded.config, LearnerConfig::default());
        assert_eq!(loaded.next_episode(), 0);
    }

    #[test]
    fn test_version_mismatch_rejected() {
        let mut saved = trained();
        saved.version = 99;
        assert!(matches!(
            saved.check_version(),
            Err(Error::UnsupportedVersion {
                found: 99,
                expected: 1
            })
        ));
        assert!(TabularLearner::from_saved(saved).is_err());
    }
}
