//! Dependency injection container.
//!
//! The container owns infrastructure dependencies (the model repository and a
//! default seed) and builds the engine and learner for a run.

use std::{path::Path, sync::Arc};

use super::config::ExperimentConfig;
use crate::{
    Result,
    adapters::MsgPackRepository,
    ports::AgentRepository,
    q_learning::{SavedAgent, TabularLearner},
    simulation::SimulationEngine,
};

/// Application with dependency injection.
///
/// # Examples
///
/// ```
/// use pacman_rl::app::{App, ExperimentConfig};
/// use pacman_rl::adapters::InMemoryRepository;
///
/// let app = App::for_testing()
///     .with_repository(InMemoryRepository::new())
///     .with_default_seed(42)
///     .build();
///
/// let config = ExperimentConfig::default();
/// let engine = app.build_engine(&config)?;
/// let learner = app.build_learner(&config)?;
/// assert_eq!(engine.rng_seed(), Some(42));
/// assert_eq!(learner.rng_seed(), Some(43));
/// # Ok::<(), pacman_rl::Error>(())
/// ```
pub struct App {
    repository: Arc<dyn AgentRepository + Send + Sync>,
    /// Used when the experiment itself carries no seed
    default_seed: Option<u64>,
}

impl App {
    /// Production defaults: `MsgPackRepository`, non-deterministic RNG.
    pub fn new() -> Self {
        Self {
            repository: Arc::new(MsgPackRepository::new()),
            default_seed: None,
        }
    }

    /// Builder for injecting in-memory repositories and fixed seeds.
    pub fn for_testing() -> AppBuilder {
        AppBuilder::new()
    }

    pub fn repository(&self) -> Arc<dyn AgentRepository + Send + Sync> {
        Arc::clone(&self.repository)
    }

    fn seed(&self, config: &ExperimentConfig) -> Option<u64> {
        config.training.seed.or(self.default_seed)
    }

    /// Build a simulation engine on the default maze.
    pub fn build_engine(&self, config: &ExperimentConfig) -> Result<SimulationEngine> {
        let engine = SimulationEngine::new(config.simulation.clone())?;
        Ok(match self.seed(config) {
            Some(seed) => engine.with_seed(seed),
            None => engine,
        })
    }

    /// Build a fresh learner with empty tables.
    pub fn build_learner(&self, config: &ExperimentConfig) -> Result<TabularLearner> {
        let learner = TabularLearner::new(config.learner)?;
        Ok(match self.seed(config) {
            Some(seed) => learner.with_seed(seed.wrapping_add(1)),
            None => learner,
        })
    }

    /// Load a saved model, if one exists at `path`.
    pub fn load_model(&self, path: &Path) -> Result<Option<SavedAgent>> {
        self.repository.load(path)
    }

    /// Restore the learner saved at `path`, or build a fresh one when the
    /// file does not exist yet.
    ///
    /// Returns the snapshot alongside the learner so callers can continue
    /// its episode numbering and history.
    pub fn load_or_new_learner(
        &self,
        config: &ExperimentConfig,
        path: &Path,
    ) -> Result<(TabularLearner, Option<SavedAgent>)> {
        match self.load_model(path)? {
            Some(saved) => {
                let mut learner = TabularLearner::from_saved(saved.clone())?;
                if let Some(seed) = self.seed(config) {
                    learner.set_rng_seed(seed.wrapping_add(1));
                }
                Ok((learner, Some(saved)))
            }
            None => Ok((self.build_learner(config)?, None)),
        }
    }

    pub fn save_model(&self, saved: &SavedAgent, path: &Path) -> Result<()> {
        self.repository.save(saved, path)
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for constructing an app with custom dependencies.
pub struct AppBuilder {
    repository: Option<Arc<dyn AgentRepository + Send + Sync>>,
    default_seed: Option<u64>,
}

impl AppBuilder {
    pub fn new() -> Self {
        Self {
            repository: None,
            default_seed: None,
        }
    }

    pub fn with_repository<R: AgentRepository + Send + Sync + 'static>(mut self, repo: R) -> Self {
        self.repository = Some(Arc::new(repo));
        self
    }

    /// Seed every engine and learner built by this app.
    pub fn with_default_seed(mut self, seed: u64) -> Self {
        self.default_seed = Some(seed);
        self
    }

    /// If no repository was specified, uses `MsgPackRepository`.
    pub fn build(self) -> App {
        App {
            repository: self
                .repository
                .unwrap_or_else(|| Arc::new(MsgPackRepository::new())),
            default_seed: self.default_seed,
        }
    }
}

impl Default for AppBuilder {
    fn default() -> Self {
        Self::new()
    }
}
