//! Tabular TD control agent
//!
//! A single learner type covers Q-learning, SARSA and Double Q-learning. The
//! algorithm only changes how many value tables are kept and which target
//! the update bootstraps from; action selection, schedules and persistence
//! are shared.

use rand::{Rng, SeedableRng, rngs::StdRng, seq::IndexedRandom};

use crate::{
    Error, Result,
    encoding::EncodedState,
    q_learning::{
        config::{Algorithm, LearnerConfig},
        q_table::{ActionValues, ValueTable, argmax_set},
        serialization::{SavedAgent, TrainingMetadata},
    },
    types::Action,
};

fn build_rng(seed: Option<u64>) -> StdRng {
    if let Some(seed) = seed {
        StdRng::seed_from_u64(seed)
    } else {
        StdRng::from_rng(&mut rand::rng())
    }
}

/// Which of the learner's value tables to address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableId {
    First,
    /// Only exists for [`Algorithm::DoubleQ`]
    Second,
}

#[derive(Debug, Clone)]
enum Estimator {
    QLearning(ValueTable),
    Sarsa(ValueTable),
    DoubleQ {
        first: ValueTable,
        second: ValueTable,
    },
}

impl Estimator {
    fn empty(algorithm: Algorithm) -> Self {
        match algorithm {
            Algorithm::QLearning => Estimator::QLearning(ValueTable::new()),
            Algorithm::Sarsa => Estimator::Sarsa(ValueTable::new()),
            Algorithm::DoubleQ => Estimator::DoubleQ {
                first: ValueTable::new(),
                second: ValueTable::new(),
            },
        }
    }

    fn from_tables(algorithm: Algorithm, mut tables: Vec<ValueTable>) -> Result<Self> {
        if tables.len() != algorithm.table_count() {
            return Err(Error::SerializationContext {
                operation: format!("restore {} agent", algorithm.label()),
                message: format!(
                    "expected {} value table(s), found {}",
                    algorithm.table_count(),
                    tables.len()
                ),
            });
        }
        let estimator = match algorithm {
            Algorithm::QLearning => Estimator::QLearning(tables.remove(0)),
            Algorithm::Sarsa => Estimator::Sarsa(tables.remove(0)),
            Algorithm::DoubleQ => {
                let second = tables.remove(1);
                let first = tables.remove(0);
                Estimator::DoubleQ { first, second }
            }
        };
        Ok(estimator)
    }

    fn tables(&self) -> Vec<&ValueTable> {
        match self {
            Estimator::QLearning(table) | Estimator::Sarsa(table) => vec![table],
            Estimator::DoubleQ { first, second } => vec![first, second],
        }
    }
}

/// ε-greedy tabular learner.
#[derive(Debug, Clone)]
pub struct TabularLearner {
    config: LearnerConfig,
    estimator: Estimator,
    epsilon: f64,
    alpha: f64,
    rng: StdRng,
    rng_seed: Option<u64>,
}

impl TabularLearner {
    /// Create a learner with empty tables and schedules at their start
    /// values.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] if `config` fails validation.
    pub fn new(config: LearnerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            estimator: Estimator::empty(config.algorithm),
            epsilon: config.exploration.start,
            alpha: config.learning_rate.start,
            config,
            rng: build_rng(None),
            rng_seed: None,
        })
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.set_rng_seed(seed);
        self
    }

    pub fn set_rng_seed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
        self.rng_seed = Some(seed);
    }

    pub fn rng_seed(&self) -> Option<u64> {
        self.rng_seed
    }

    pub fn algorithm(&self) -> Algorithm {
        self.config.algorithm
    }

    pub fn config(&self) -> &LearnerConfig {
        &self.config
    }

    /// Current exploration rate ε.
    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Current learning rate α.
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Number of distinct states with a materialized row in any table.
    ///
    /// Rows are created by [`update`](Self::update) for the state being
    /// updated and by [`value`](Self::value). States only looked at by
    /// [`choose_action`](Self::choose_action), or seen only as the bootstrap
    /// target of an update, are not counted, so greedy play never grows the
    /// tables.
    pub fn table_size(&self) -> usize {
        match &self.estimator {
            Estimator::QLearning(table) | Estimator::Sarsa(table) => table.len(),
            Estimator::DoubleQ { first, second } => {
                first.len()
                    + second
                        .iter()
                        .filter(|(state, _)| !first.contains(state))
                        .count()
            }
        }
    }

    /// Read-only access to a value table, `None` if the algorithm keeps no
    /// such table.
    pub fn table(&self, id: TableId) -> Option<&ValueTable> {
        match (&self.estimator, id) {
            (Estimator::QLearning(table) | Estimator::Sarsa(table), TableId::First) => Some(table),
            (Estimator::QLearning(_) | Estimator::Sarsa(_), TableId::Second) => None,
            (Estimator::DoubleQ { first, .. }, TableId::First) => Some(first),
            (Estimator::DoubleQ { second, .. }, TableId::Second) => Some(second),
        }
    }

    /// Mutable action values for `state` in table `id`, zero-initialized on
    /// first access. Writes through the returned reference are seen by every
    /// later read.
    ///
    /// # Panics
    ///
    /// Panics if `id` is [`TableId::Second`] and the algorithm keeps a single
    /// table.
    pub fn value(&mut self, state: &EncodedState, id: TableId) -> &mut ActionValues {
        let algorithm = self.config.algorithm;
        match (&mut self.estimator, id) {
            (Estimator::QLearning(table) | Estimator::Sarsa(table), TableId::First) => {
                table.values_mut(state)
            }
            (Estimator::DoubleQ { first, .. }, TableId::First) => first.values_mut(state),
            (Estimator::DoubleQ { second, .. }, TableId::Second) => second.values_mut(state),
            (Estimator::QLearning(_) | Estimator::Sarsa(_), TableId::Second) => {
                panic!("{} keeps a single value table", algorithm.label())
            }
        }
    }

    /// Values used for action selection: the table itself, or the sum of both
    /// tables for Double Q-learning. Does not materialize rows.
    pub fn action_values(&self, state: &EncodedState) -> ActionValues {
        match &self.estimator {
            Estimator::QLearning(table) | Estimator::Sarsa(table) => table.values(state),
            Estimator::DoubleQ { first, second } => {
                let (a, b) = (first.values(state), second.values(state));
                std::array::from_fn(|idx| a[idx] + b[idx])
            }
        }
    }

    /// ε-greedy selection. With `exploring` false the choice is purely
    /// greedy; ties are broken uniformly at random either way.
    pub fn choose_action(&mut self, state: &EncodedState, exploring: bool) -> Action {
        if exploring && self.rng.random::<f64>() < self.epsilon {
            return Self::pick(&Action::ALL, &mut self.rng);
        }

        let best = argmax_set(&self.action_values(state));
        Self::pick(&best, &mut self.rng)
    }

    fn pick(actions: &[Action], rng: &mut StdRng) -> Action {
        match actions.choose(rng) {
            Some(&action) => action,
            None => Action::Up,
        }
    }

    /// Apply one TD update for the transition `(state, action, reward,
    /// next_state, next_action)`.
    ///
    /// SARSA needs the next action and silently skips the update without
    /// one. The bootstrap term is never zeroed on terminal transitions.
    pub fn update(
        &mut self,
        state: &EncodedState,
        action: Action,
        reward: f64,
        next_state: &EncodedState,
        next_action: Option<Action>,
    ) {
        let alpha = self.alpha;
        let gamma = self.config.discount;
        let a = action.index();

        match &mut self.estimator {
            // Q(s,a) ← Q(s,a) + α[r + γ max_a' Q(s',a') − Q(s,a)]
            Estimator::QLearning(table) => {
                let target = reward + gamma * table.max_value(next_state);
                let q = table.values_mut(state);
                q[a] += alpha * (target - q[a]);
            }
            // Q(s,a) ← Q(s,a) + α[r + γ Q(s',a') − Q(s,a)]
            Estimator::Sarsa(table) => {
                let Some(next_action) = next_action else {
                    return;
                };
                let target = reward + gamma * table.values(next_state)[next_action.index()];
                let q = table.values_mut(state);
                q[a] += alpha * (target - q[a]);
            }
            // Q_A(s,a) ← Q_A(s,a) + α[r + γ Q_B(s', argmax_a' Q_A(s',a')) − Q_A(s,a)]
            Estimator::DoubleQ { first, second } => {
                let (learn, judge) = if self.rng.random::<bool>() {
                    (first, second)
                } else {
                    (second, first)
                };
                let best_next = learn.first_greedy(next_state);
                let target = reward + gamma * judge.values(next_state)[best_next.index()];
                let q = learn.values_mut(state);
                q[a] += alpha * (target - q[a]);
            }
        }
    }

    /// Per-episode schedule step for ε and α.
    pub fn decay(&mut self) {
        self.epsilon = self.config.exploration.next(self.epsilon);
        self.alpha = self.config.learning_rate.next(self.alpha);
    }

    /// Snapshot the learner for persistence.
    pub fn export(&self, metadata: TrainingMetadata) -> SavedAgent {
        SavedAgent {
            version: SavedAgent::VERSION,
            algorithm: self.config.algorithm,
            config: self.config,
            tables: self.estimator.tables().into_iter().cloned().collect(),
            epsilon: self.epsilon,
            alpha: self.alpha,
            history: Default::default(),
            metadata: TrainingMetadata {
                rng_seed: self.rng_seed,
                ..metadata
            },
        }
    }

    /// Rebuild a learner from a snapshot, resuming its ε and α.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedVersion`] for a snapshot from another
    /// format version, or an error if the tables do not match the algorithm.
    pub fn from_saved(saved: SavedAgent) -> Result<Self> {
        saved.check_version()?;
        let config = LearnerConfig {
            algorithm: saved.algorithm,
            ..saved.config
        };
        config.validate()?;
        let rng_seed = saved.metadata.rng_seed;
        Ok(Self {
            estimator: Estimator::from_tables(saved.algorithm, saved.tables)?,
            epsilon: saved.epsilon,
            alpha: saved.alpha,
            config,
            rng: build_rng(rng_seed),
            rng_seed,
        })
    }
}
