//! Experiment configuration.

use std::{
    fs::File,
    io::{BufReader, BufWriter, Write},
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    pipeline::TrainingConfig,
    q_learning::{Algorithm, LearnerConfig},
    simulation::SimulationConfig,
};

/// Everything a training run needs, loadable from a single JSON file.
///
/// Every section is optional in the file; missing fields fall back to their
/// defaults.
///
/// # Examples
///
/// ```
/// use pacman_rl::app::ExperimentConfig;
/// use pacman_rl::q_learning::Algorithm;
///
/// let config = ExperimentConfig::default().with_algorithm(Algorithm::Sarsa);
/// assert_eq!(config.learner.algorithm, Algorithm::Sarsa);
/// config.validate()?;
/// # Ok::<(), pacman_rl::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperimentConfig {
    pub simulation: SimulationConfig,
    pub learner: LearnerConfig,
    pub training: TrainingConfig,
    /// Where the trained model is read from and written to
    pub model_path: PathBuf,
    /// Per-episode CSV log, appended to across runs
    pub log_path: Option<PathBuf>,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            simulation: SimulationConfig::default(),
            learner: LearnerConfig::default(),
            training: TrainingConfig::default(),
            model_path: PathBuf::from("pacman_model.msgpack"),
            log_path: Some(PathBuf::from("training_log.csv")),
        }
    }
}

impl ExperimentConfig {
    pub fn with_algorithm(mut self, algorithm: Algorithm) -> Self {
        self.learner.algorithm = algorithm;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.training.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<()> {
        self.simulation.validate()?;
        self.learner.validate()
    }

    /// Read and validate a configuration file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| Error::Io {
            operation: format!("open config {path:?}"),
            source,
        })?;
        let config: Self = serde_json::from_reader(BufReader::new(file))?;
        config.validate()?;
        Ok(config)
    }

    /// Write the configuration as pretty-printed JSON.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|source| Error::Io {
            operation: format!("create config {path:?}"),
            source,
        })?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writeln!(writer)?;
        writer.flush()?;
        Ok(())
    }
}
