//! Ports (trait boundaries) for external dependencies.
//!
//! The simulation and learner never talk to the outside world directly;
//! rendering, metrics, logs and persistence go through these traits and are
//! implemented by adapters.

pub mod observer;
pub mod repository;

pub use observer::Observer;
pub use repository::AgentRepository;
