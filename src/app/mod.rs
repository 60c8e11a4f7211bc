//! Application layer with dependency injection container.
//!
//! The container owns infrastructure (the model repository) and builds the
//! domain objects for a run from an [`ExperimentConfig`].
//!
//! ```text
//! ┌──────────────────────────────────────────┐
//! │  app: App (container) + ExperimentConfig │
//! └──────────────┬───────────────────────────┘
//!                │ owns
//!                ▼
//! ┌──────────────────────────────────────────┐
//! │  adapters: MsgPackRepository,            │
//! │            InMemoryRepository (tests)    │
//! └──────────────┬───────────────────────────┘
//!                │ implements
//!                ▼
//! ┌──────────────────────────────────────────┐
//! │  ports: AgentRepository, Observer        │
//! └──────────────┬───────────────────────────┘
//!                │ used by
//!                ▼
//! ┌──────────────────────────────────────────┐
//! │  domain: SimulationEngine, StateEncoder, │
//! │          TabularLearner                  │
//! └──────────────────────────────────────────┘
//! ```

pub mod config;
pub mod container;

pub use config::ExperimentConfig;
pub use container::{App, AppBuilder};
