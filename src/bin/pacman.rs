//! Chase-game trainer CLI
//!
//! - Train Q-learning, SARSA or Double Q-learning agents
//! - Watch a trained agent play in the terminal
//! - Write a default experiment configuration to edit

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "pacman")]
#[command(version, about = "Tabular reinforcement learning on a grid chase game", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train an agent, optionally resuming a saved model
    Train(Box<pacman_rl::cli::commands::train::TrainArgs>),

    /// Watch a trained agent play
    Play(pacman_rl::cli::commands::play::PlayArgs),

    /// Write the default experiment configuration
    Config(pacman_rl::cli::commands::config::ConfigArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Train(args) => pacman_rl::cli::commands::train::execute(*args),
        Commands::Play(args) => pacman_rl::cli::commands::play::execute(args),
        Commands::Config(args) => pacman_rl::cli::commands::config::execute(args),
    }
}
