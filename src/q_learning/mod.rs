//! Tabular temporal-difference learning
//!
//! One [`TabularLearner`] implements three control algorithms over sparse
//! value tables keyed by [`EncodedState`](crate::encoding::EncodedState):
//!
//! | Algorithm | Tables | Bootstrap target |
//! |-----------|--------|------------------|
//! | Q-learning | 1 | `r + γ max_a' Q(s',a')` |
//! | SARSA | 1 | `r + γ Q(s',a')` for the action actually chosen |
//! | Double Q-learning | 2 | `r + γ Q_B(s', argmax_a' Q_A(s',a'))`, roles picked by coin flip |
//!
//! Exploration is ε-greedy with an exponential or linear per-episode decay;
//! the learning rate may decay too (constant by default).
//!
//! ## Usage Example
//!
//! ```no_run
//! use pacman_rl::{
//!     encoding::StateEncoder,
//!     q_learning::{Algorithm, LearnerConfig, TabularLearner},
//!     simulation::{SimulationConfig, SimulationEngine},
//! };
//!
//! let mut engine = SimulationEngine::new(SimulationConfig::default())?.with_seed(1);
//! let mut learner = TabularLearner::new(LearnerConfig::new(Algorithm::Sarsa))?.with_seed(2);
//!
//! let state = StateEncoder::encode(engine.reset());
//! let action = learner.choose_action(&state, true);
//! let outcome = engine.step(action);
//! let next_state = StateEncoder::encode(engine.state());
//! let next_action = learner.choose_action(&next_state, true);
//! learner.update(&state, action, outcome.reward, &next_state, Some(next_action));
//! # Ok::<(), pacman_rl::Error>(())
//! ```

pub mod agent;
pub mod config;
pub mod q_table;
pub mod serialization;

pub use agent::{TableId, TabularLearner};
pub use config::{Algorithm, DecayKind, ExplorationSchedule, LearnerConfig, LearningRateSchedule};
pub use q_table::{ActionValues, TableEntry, ValueTable};
pub use serialization::{SavedAgent, TrainingMetadata};
