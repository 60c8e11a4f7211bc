//! Training and demo loops

use std::{
    path::Path,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
};

use serde::{Deserialize, Serialize};

use super::history::{EpisodeSummary, TrainingHistory};
use crate::{
    Result,
    encoding::StateEncoder,
    ports::Observer,
    q_learning::TabularLearner,
    simulation::SimulationEngine,
};

/// Training configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    /// Number of episodes to play in this run
    pub episodes: u32,

    /// Index of the first episode (non-zero when resuming)
    pub start_episode: u32,

    /// Random seed; the engine gets `seed`, the learner `seed + 1`
    pub seed: Option<u64>,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            episodes: 5000,
            start_episode: 0,
            seed: None,
        }
    }
}

/// Result of a training or demo run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingResult {
    /// Episodes played in this run
    pub episodes: u32,

    pub mean_score: f64,

    pub best_score: u32,

    /// Episodes in which the final level was cleared
    pub games_won: u32,

    /// Highest level reached in any episode
    pub max_level: u32,

    /// Distinct states in the learner's tables at the end of the run
    pub table_size: usize,

    pub history: TrainingHistory,

    /// The run stopped early on request
    #[serde(default)]
    pub interrupted: bool,
}

impl TrainingResult {
    fn new(
        history: TrainingHistory,
        games_won: u32,
        table_size: usize,
        interrupted: bool,
    ) -> Self {
        Self {
            episodes: history.len() as u32,
            mean_score: history.mean_score(),
            best_score: history.best_score().unwrap_or(0),
            games_won,
            max_level: history.max_level().unwrap_or(0),
            table_size,
            history,
            interrupted,
        }
    }

    /// Fraction of episodes won
    pub fn win_rate(&self) -> f64 {
        if self.episodes == 0 {
            0.0
        } else {
            f64::from(self.games_won) / f64::from(self.episodes)
        }
    }

    /// Save result to JSON file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    /// Load result from JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let result = serde_json::from_reader(file)?;
        Ok(result)
    }
}

/// Drives the engine and learner through whole episodes.
///
/// This is the only place the simulation, encoder and learner meet: encode,
/// choose, step, encode, update.
pub struct TrainingPipeline {
    config: TrainingConfig,
    observers: Vec<Box<dyn Observer>>,
    stop: Option<Arc<AtomicBool>>,
}

impl TrainingPipeline {
    pub fn new(config: TrainingConfig) -> Self {
        Self {
            config,
            observers: Vec::new(),
            stop: None,
        }
    }

    /// Add an observer to the pipeline
    pub fn with_observer(mut self, observer: Box<dyn Observer>) -> Self {
        self.observers.push(observer);
        self
    }

    pub fn add_observer(&mut self, observer: Box<dyn Observer>) {
        self.observers.push(observer);
    }

    /// Stop before the next episode once `flag` is set.
    ///
    /// The episode in progress is finished and the result covers the
    /// episodes played so far.
    pub fn with_stop_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.stop = Some(flag);
        self
    }

    fn stop_requested(&self) -> bool {
        self.stop
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::SeqCst))
    }

    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    /// Train `learner` for the configured number of episodes.
    ///
    /// The learner's schedules decay once at the end of every episode.
    pub fn train(
        &mut self,
        engine: &mut SimulationEngine,
        learner: &mut TabularLearner,
    ) -> Result<TrainingResult> {
        self.seed_pair(engine, learner);
        let start = self.config.start_episode;
        let end = start.saturating_add(self.config.episodes);
        self.run(start..end, engine, learner, true)
    }

    /// Play `episodes` greedy episodes without exploring or learning.
    pub fn demo(
        &mut self,
        engine: &mut SimulationEngine,
        learner: &mut TabularLearner,
        episodes: u32,
    ) -> Result<TrainingResult> {
        self.seed_pair(engine, learner);
        self.run(0..episodes, engine, learner, false)
    }

    fn run(
        &mut self,
        episodes: std::ops::Range<u32>,
        engine: &mut SimulationEngine,
        learner: &mut TabularLearner,
        learn: bool,
    ) -> Result<TrainingResult> {
        for observer in &mut self.observers {
            observer.on_training_start(episodes.len())?;
        }

        let mut history = TrainingHistory::new();
        let mut games_won = 0;
        let mut interrupted = false;
        for episode in episodes {
            if self.stop_requested() {
                interrupted = true;
                break;
            }
            let summary = self.play_episode(episode, engine, learner, learn)?;
            if summary.won {
                games_won += 1;
            }
            history.record(&summary);

            for observer in &mut self.observers {
                observer.on_episode_end(&summary)?;
            }
        }

        for observer in &mut self.observers {
            observer.on_training_end()?;
        }

        Ok(TrainingResult::new(
            history,
            games_won,
            learner.table_size(),
            interrupted,
        ))
    }

    fn seed_pair(&self, engine: &mut SimulationEngine, learner: &mut TabularLearner) {
        if let Some(seed) = self.config.seed {
            engine.set_rng_seed(seed);
            learner.set_rng_seed(seed.wrapping_add(1));
        }
    }

    fn play_episode(
        &mut self,
        episode: u32,
        engine: &mut SimulationEngine,
        learner: &mut TabularLearner,
        learn: bool,
    ) -> Result<EpisodeSummary> {
        for observer in &mut self.observers {
            observer.on_episode_start(episode)?;
        }

        let mut state = StateEncoder::encode(engine.reset());
        let mut action = learner.choose_action(&state, learn);
        let mut total_reward = 0.0;
        let mut max_level = engine.state().level;
        let mut won = false;

        loop {
            let mut outcome = engine.step(action);
            total_reward += outcome.reward;
            if outcome.level_cleared() {
                engine.advance_level()?;
                outcome.terminal = false;
            }
            won |= outcome.game_won();
            max_level = max_level.max(engine.state().level);

            for observer in &mut self.observers {
                observer.on_step(episode, engine.state(), &outcome)?;
            }

            let next_state = StateEncoder::encode(engine.state());
            let next_action = if outcome.terminal {
                None
            } else {
                Some(learner.choose_action(&next_state, learn))
            };
            if learn {
                learner.update(&state, action, outcome.reward, &next_state, next_action);
            }

            let Some(next_action) = next_action else {
                break;
            };
            state = next_state;
            action = next_action;
        }

        if learn {
            learner.decay();
        }

        let final_state = engine.state();
        Ok(EpisodeSummary {
            episode,
            score: final_state.score,
            steps: final_state.steps,
            total_steps: final_state.total_steps,
            epsilon: learner.epsilon(),
            alpha: learner.alpha(),
            ghosts_eaten: final_state.ghosts_eaten,
            level: max_level,
            table_size: learner.table_size(),
            total_reward,
            won,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::{
        q_learning::{Algorithm, LearnerConfig},
        simulation::{EpisodeState, SimulationConfig, StepEvent, StepOutcome},
    };

    struct Recorder {
        events: Arc<Mutex<Vec<String>>>,
    }

    impl Observer for Recorder {
        fn on_training_start(&mut self, total: usize) -> Result<()> {
            self.events.lock().unwrap().push(format!("start {total}"));
            Ok(())
        }

        fn on_step(&mut self, _: u32, state: &EpisodeState, outcome: &StepOutcome) -> Result<()> {
            assert!(state.pellets_consistent());
            if outcome.info.event == StepEvent::LevelCleared {
                assert!(!outcome.terminal);
            }
            Ok(())
        }

        fn on_episode_end(&mut self, summary: &EpisodeSummary) -> Result<()> {
            self.events
                .lock()
                .unwrap()
                .push(format!("end {}", summary.episode));
            Ok(())
        }

        fn on_training_end(&mut self) -> Result<()> {
            self.events.lock().unwrap().push("done".to_string());
            Ok(())
        }
    }

    fn short_game() -> SimulationConfig {
        SimulationConfig {
            max_steps: 200,
            ..SimulationConfig::default()
        }
    }

    #[test]
    fn test_training_pipeline() {
        let events = Arc::new(Mutex::new(Vec::new()));
        let config = TrainingConfig {
            episodes: 3,
            start_episode: 0,
            seed: Some(42),
        };
        let mut pipeline = TrainingPipeline::new(config).with_observer(Box::new(Recorder {
            events: Arc::clone(&events),
        }));
        let mut engine = SimulationEngine::new(short_game()).unwrap();
        let mut learner = TabularLearner::new(LearnerConfig::new(Algorithm::QLearning)).unwrap();

        let result = pipeline.train(&mut engine, &mut learner).unwrap();

        assert_eq!(result.episodes, 3);
        assert_eq!(result.history.episodes, vec![0, 1, 2]);
        assert!(result.table_size > 0);
        assert!(learner.epsilon() < 1.0);
        assert_eq!(
            *events.lock().unwrap(),
            vec!["start 3", "end 0", "end 1", "end 2", "done"]
        );
    }

    #[test]
    fn test_resume_continues_episode_numbering() {
        let config = TrainingConfig {
            episodes: 2,
            start_episode: 10,
            seed: Some(1),
        };
        let mut engine = SimulationEngine::new(short_game()).unwrap();
        let mut learner = TabularLearner::new(LearnerConfig::new(Algorithm::Sarsa)).unwrap();

        let result = TrainingPipeline::new(config)
            .train(&mut engine, &mut learner)
            .unwrap();
        assert_eq!(result.history.episodes, vec![10, 11]);
    }

    #[test]
    fn test_same_seed_reproduces_run() {
        let run = || {
            let config = TrainingConfig {
                episodes: 4,
                start_episode: 0,
                seed: Some(7),
            };
            let mut engine = SimulationEngine::new(short_game()).unwrap();
            let mut learner =
                TabularLearner::new(LearnerConfig::new(Algorithm::DoubleQ)).unwrap();
            TrainingPipeline::new(config)
                .train(&mut engine, &mut learner)
                .unwrap()
        };

        assert_eq!(run(), run());
    }

    #[test]
    fn test_demo_does_not_learn() {
        let config = TrainingConfig {
            seed: Some(5),
            ..TrainingConfig::default()
        };
        let mut engine = SimulationEngine::new(short_game()).unwrap();
        let mut learner = TabularLearner::new(LearnerConfig::new(Algorithm::QLearning)).unwrap();

        let result = TrainingPipeline::new(config)
            .demo(&mut engine, &mut learner, 2)
            .unwrap();

        assert_eq!(result.episodes, 2);
        assert_eq!(result.table_size, 0);
        assert_eq!(learner.epsilon(), 1.0);
    }

    struct StopAfter {
        episode: u32,
        flag: Arc<AtomicBool>,
    }

    impl Observer for StopAfter {
        fn on_episode_end(&mut self, summary: &EpisodeSummary) -> Result<()> {
            if summary.episode == self.episode {
                self.flag.store(true, Ordering::SeqCst);
            }
            Ok(())
        }
    }

    #[test]
    fn test_stop_flag_ends_run_between_episodes() {
        let flag = Arc::new(AtomicBool::new(false));
        let events = Arc::new(Mutex::new(Vec::new()));
        let config = TrainingConfig {
            episodes: 10,
            start_episode: 0,
            seed: Some(3),
        };
        let mut pipeline = TrainingPipeline::new(config)
            .with_stop_flag(Arc::clone(&flag))
            .with_observer(Box::new(StopAfter {
                episode: 1,
                flag: Arc::clone(&flag),
            }))
            .with_observer(Box::new(Recorder {
                events: Arc::clone(&events),
            }));
        let mut engine = SimulationEngine::new(short_game()).unwrap();
        let mut learner = TabularLearner::new(LearnerConfig::new(Algorithm::Sarsa)).unwrap();

        let result = pipeline.train(&mut engine, &mut learner).unwrap();

        assert!(result.interrupted);
        assert_eq!(result.episodes, 2);
        assert_eq!(result.history.episodes, vec![0, 1]);
        assert_eq!(
            *events.lock().unwrap(),
            vec!["start 10", "end 0", "end 1", "done"]
        );
    }

    #[test]
    fn test_summary_reports_decayed_schedules() {
        let config = TrainingConfig {
            episodes: 2,
            start_episode: 0,
            seed: Some(4),
        };
        let mut learner_config = LearnerConfig::new(Algorithm::QLearning);
        learner_config.exploration.decay_rate = 0.5;
        let mut engine = SimulationEngine::new(short_game()).unwrap();
        let mut learner = TabularLearner::new(learner_config).unwrap();
        let summaries = Arc::new(Mutex::new(Vec::new()));

        struct Keep(Arc<Mutex<Vec<EpisodeSummary>>>);
        impl Observer for Keep {
            fn on_episode_end(&mut self, summary: &EpisodeSummary) -> Result<()> {
                self.0.lock().unwrap().push(*summary);
                Ok(())
            }
        }

        let result = TrainingPipeline::new(config)
            .with_observer(Box::new(Keep(Arc::clone(&summaries))))
            .train(&mut engine, &mut learner)
            .unwrap();

        assert!(!result.interrupted);
        let summaries = summaries.lock().unwrap();
        assert_eq!(summaries[0].epsilon, 0.5);
        assert_eq!(summaries[1].epsilon, 0.25);
        assert_eq!(summaries[1].epsilon, learner.epsilon());
        assert_eq!(summaries[1].alpha, learner.alpha());
        assert!(summaries.iter().all(|s| s.steps <= s.total_steps));
    }

    #[test]
    fn test_result_json_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summary.json");
        let config = TrainingConfig {
            episodes: 1,
            start_episode: 0,
            seed: Some(9),
        };
        let mut engine = SimulationEngine::new(short_game()).unwrap();
        let mut learner = TabularLearner::new(LearnerConfig::default()).unwrap();
        let result = TrainingPipeline::new(config)
            .train(&mut engine, &mut learner)
            .unwrap();

        result.save(&path).unwrap();
        let loaded = TrainingResult::load(&path).unwrap();
        assert_eq!(loaded.episodes, result.episodes);
        assert_eq!(loaded.history, result.history);
    }
}
