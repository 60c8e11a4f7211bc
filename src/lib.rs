//! Tabular reinforcement learning on a grid chase game
//!
//! This crate provides:
//! - A grid maze with pellets, power pellets and ghosts, stepped one tick at a time
//! - A compact, hashable encoding of what the agent can see around it
//! - Q-learning, SARSA and Double Q-learning over sparse value tables
//! - A training pipeline with observers, model persistence and a CLI

pub mod adapters;
pub mod app;
pub mod cli;
pub mod encoding;
pub mod error;
pub mod gridworld;
pub mod pipeline;
pub mod ports;
pub mod q_learning;
pub mod simulation;
pub mod types;

pub use encoding::{EncodedState, StateEncoder};
pub use error::{Error, Result};
pub use q_learning::{Algorithm, LearnerConfig, TabularLearner};
pub use simulation::{SimulationConfig, SimulationEngine};
pub use types::{Action, Position};
