//! Training and demo pipeline
//!
//! This module provides:
//! - The episode loop tying simulation, encoder and learner together
//! - Per-episode summaries and the accumulated training history
//! - Observers for progress bars, console reports and CSV logs

pub mod history;
pub mod observers;
pub mod training;

pub use history::{EpisodeSummary, TrainingHistory, moving_average};
pub use observers::{ConsoleObserver, CsvLogObserver, ProgressObserver};
pub use training::{TrainingConfig, TrainingPipeline, TrainingResult};

pub use crate::ports::Observer;
