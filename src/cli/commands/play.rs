//! Play command - Watch a trained agent play greedily

use std::{path::PathBuf, time::Duration};

use anyhow::{Context, Result};
use clap::Parser;

use crate::{
    adapters::AsciiRenderer,
    app::{App, ExperimentConfig},
    cli::output::{print_section, print_stats_table, result_stats},
    pipeline::{TrainingConfig, TrainingPipeline, TrainingResult},
    q_learning::TabularLearner,
};

#[derive(Parser, Debug)]
#[command(about = "Watch a trained agent play")]
pub struct PlayArgs {
    /// Trained model file
    #[arg(long, short = 'm')]
    pub model: Option<PathBuf>,

    /// Number of demo episodes
    #[arg(long, short = 'e', default_value_t = 3)]
    pub episodes: u32,

    /// Delay between frames
    #[arg(long, default_value_t = 100)]
    pub delay_ms: u64,

    /// Experiment configuration supplying the game settings
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Random seed for the ghosts
    #[arg(long)]
    pub seed: Option<u64>,
}

pub fn execute(args: PlayArgs) -> Result<()> {
    run(&App::new(), args).map(|_| ())
}

/// Play greedy episodes with the dependencies of `app`.
pub fn run(app: &App, args: PlayArgs) -> Result<TrainingResult> {
    let mut config = match &args.config {
        Some(path) => ExperimentConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => ExperimentConfig::default(),
    };
    if let Some(model) = &args.model {
        config.model_path = model.clone();
    }
    if let Some(seed) = args.seed {
        config.training.seed = Some(seed);
    }

    let model_path = config.model_path.as_path();
    let mut learner = match app
        .load_model(model_path)
        .with_context(|| format!("failed to load model {}", model_path.display()))?
    {
        Some(saved) => TabularLearner::from_saved(saved)?,
        None => {
            println!(
                "No saved model at {}, playing with an untrained agent",
                model_path.display()
            );
            app.build_learner(&config)?
        }
    };
    let mut engine = app.build_engine(&config)?;

    let delay = (args.delay_ms > 0).then(|| Duration::from_millis(args.delay_ms));
    let mut pipeline = TrainingPipeline::new(TrainingConfig {
        episodes: args.episodes,
        start_episode: 0,
        seed: config.training.seed,
    })
    .with_observer(Box::new(AsciiRenderer::stdout(delay)));

    let result = pipeline
        .demo(&mut engine, &mut learner, args.episodes)
        .context("demo failed")?;

    print_section(&format!("Demo of {}", learner.algorithm().label()));
    print_stats_table(&result_stats(&result));
    Ok(result)
}
