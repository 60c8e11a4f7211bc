//! Shared helpers for the integration tests.

use pacman_rl::{
    Action,
    simulation::{SimulationConfig, SimulationEngine},
};
use rand::{Rng, rngs::StdRng};

/// Default game with a short step cap so episodes stay quick.
pub fn short_game() -> SimulationConfig {
    SimulationConfig {
        max_steps: 150,
        ..SimulationConfig::default()
    }
}

pub fn seeded_engine(seed: u64) -> SimulationEngine {
    SimulationEngine::new(short_game())
        .expect("default layout is valid")
        .with_seed(seed)
}

pub fn random_action(rng: &mut StdRng) -> Action {
    Action::from_index(rng.random_range(0..Action::COUNT))
}
