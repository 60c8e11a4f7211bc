//! The simulation engine: one tick of game logic per `step`

use rand::{SeedableRng, rngs::StdRng};

use super::{
    config::SimulationConfig,
    ghost::Ghost,
    outcome::{StepEvent, StepInfo, StepOutcome},
    state::EpisodeState,
};
use crate::{
    Error, Result,
    gridworld::{Layout, Tile, layout::GHOST_COLORS},
    types::Action,
};

fn build_rng(seed: Option<u64>) -> StdRng {
    if let Some(seed) = seed {
        StdRng::seed_from_u64(seed)
    } else {
        StdRng::from_rng(&mut rand::rng())
    }
}

/// Deterministic game simulation (apart from ghost randomness, which draws
/// from a seedable generator owned by the engine).
#[derive(Debug, Clone)]
pub struct SimulationEngine {
    config: SimulationConfig,
    layout: Layout,
    state: EpisodeState,
    rng: StdRng,
    rng_seed: Option<u64>,
}

impl SimulationEngine {
    /// Create an engine on the default maze.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] if `config` fails validation.
    pub fn new(config: SimulationConfig) -> Result<Self> {
        Self::with_layout(config, Layout::default())
    }

    /// Create an engine on a custom maze.
    pub fn with_layout(config: SimulationConfig, layout: Layout) -> Result<Self> {
        config.validate()?;
        let state = initial_state(&config, &layout);
        Ok(Self {
            config,
            layout,
            state,
            rng: build_rng(None),
            rng_seed: None,
        })
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.set_rng_seed(seed);
        self
    }

    /// Reseed the ghost-behaviour generator.
    pub fn set_rng_seed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
        self.rng_seed = Some(seed);
    }

    pub fn rng_seed(&self) -> Option<u64> {
        self.rng_seed
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Read-only view of the current episode.
    pub fn state(&self) -> &EpisodeState {
        &self.state
    }

    /// Start a new episode at level 1 with full lives and a fresh maze.
    pub fn reset(&mut self) -> &EpisodeState {
        self.state = initial_state(&self.config, &self.layout);
        &self.state
    }

    /// Move on to the next level after the current one was cleared.
    ///
    /// Score, lives and the ghosts-eaten tally carry over; the maze, actor
    /// positions and level-scaled difficulty are re-initialized.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoNextLevel`] if the current level is the last one.
    pub fn advance_level(&mut self) -> Result<&EpisodeState> {
        if self.state.level >= self.config.max_level {
            return Err(Error::NoNextLevel {
                level: self.state.level,
                max_level: self.config.max_level,
            });
        }
        let next = self.state.level + 1;
        start_level(&mut self.state, &self.config, &self.layout, next);
        Ok(&self.state)
    }

    /// Advance the game by one tick.
    ///
    /// Calling this once the episode is done is a no-op that returns zero
    /// reward and `terminal = true`.
    pub fn step(&mut self, action: Action) -> StepOutcome {
        let Self {
            config,
            layout,
            state,
            rng,
            ..
        } = self;

        if state.done {
            return finish(state, 0.0, true, StepEvent::Continue);
        }

        let rewards = &config.rewards;
        state.steps += 1;
        state.total_steps += 1;
        let mut reward = rewards.step;

        let target = state.agent.step(action);
        if state.grid.is_passable(target) {
            state.agent = target;
            state.last_action = Some(action);
        } else {
            reward += rewards.wall;
        }

        match state.grid.tile(state.agent) {
            Some(Tile::Dot) => {
                state.grid.clear(state.agent);
                state.remaining_pellets -= 1;
                state.score += config.points.dot;
                reward += rewards.dot;
            }
            Some(Tile::Power) => {
                state.grid.clear(state.agent);
                state.remaining_pellets -= 1;
                state.score += config.points.power;
                reward += rewards.power;
                let duration = state.scared_duration;
                for ghost in &mut state.ghosts {
                    ghost.scared = duration;
                }
            }
            _ => {}
        }

        if state.remaining_pellets == 0 {
            state.done = true;
            return if state.level >= config.max_level {
                finish(state, rewards.game_clear, true, StepEvent::GameWon)
            } else {
                finish(state, rewards.level_clear, true, StepEvent::LevelCleared)
            };
        }

        let agent = state.agent;
        for ghost in &mut state.ghosts {
            ghost.advance(
                &state.grid,
                agent,
                state.ghost_move_prob,
                &config.ghost_behavior,
                rng,
            );
        }

        for idx in 0..state.ghosts.len() {
            if state.ghosts[idx].position != state.agent {
                continue;
            }

            if state.ghosts[idx].is_fleeing() {
                reward += rewards.ghost_eaten;
                state.score += config.points.ghost;
                state.ghosts_eaten += 1;
                state.ghosts[idx].send_home();
                continue;
            }

            state.lives = state.lives.saturating_sub(1);
            if state.lives == 0 {
                state.done = true;
                return finish(state, rewards.death, true, StepEvent::Died);
            }
            reward += rewards.death / 4.0;
            place_actors(state, layout);
            return finish(state, reward, false, StepEvent::Hit);
        }

        if state.steps >= config.max_steps {
            state.done = true;
            return finish(state, reward, true, StepEvent::TimedOut);
        }

        finish(state, reward, false, StepEvent::Continue)
    }
}

fn finish(state: &EpisodeState, reward: f64, terminal: bool, event: StepEvent) -> StepOutcome {
    StepOutcome {
        reward,
        terminal,
        info: StepInfo {
            event,
            ghosts_eaten: state.ghosts_eaten,
        },
    }
}

fn initial_state(config: &SimulationConfig, layout: &Layout) -> EpisodeState {
    let grid = layout.map().instantiate();
    let mut state = EpisodeState {
        remaining_pellets: grid.pellet_count(),
        grid,
        agent: layout.agent_start(),
        ghosts: Vec::new(),
        level: 1,
        score: 0,
        lives: config.initial_lives,
        steps: 0,
        total_steps: 0,
        last_action: None,
        ghosts_eaten: 0,
        done: false,
        ghost_move_prob: 0.0,
        scared_duration: 0,
    };
    start_level(&mut state, config, layout, 1);
    state
}

fn start_level(state: &mut EpisodeState, config: &SimulationConfig, layout: &Layout, level: u32) {
    state.level = level;
    state.grid = layout.map().instantiate();
    state.remaining_pellets = state.grid.pellet_count();
    state.steps = 0;
    state.done = false;
    state.ghost_move_prob = config.ghost_speed.at_level(level);
    state.scared_duration = config.scared_duration.at_level(level);
    place_actors(state, layout);
}

/// Agent and ghosts back on their start cells, ghosts hostile.
fn place_actors(state: &mut EpisodeState, layout: &Layout) {
    state.agent = layout.agent_start();
    state.ghosts = layout
        .ghost_homes()
        .iter()
        .enumerate()
        .map(|(idx, &home)| Ghost::new(home, GHOST_COLORS[idx % GHOST_COLORS.len()]))
        .collect();
    state.last_action = None;
}
