//! Train command - Train a tabular agent on the chase game

use std::{
    fs::{self, File},
    path::{Path, PathBuf},
    sync::{
        Arc, OnceLock,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use serde::Serialize;
use serde_json::to_writer_pretty;

use crate::{
    adapters::AsciiRenderer,
    app::{App, ExperimentConfig},
    cli::output::{print_kv, print_section, print_stats_table, result_stats},
    pipeline::{
        ConsoleObserver, CsvLogObserver, ProgressObserver, TrainingConfig, TrainingHistory,
        TrainingPipeline, TrainingResult,
    },
    q_learning::{Algorithm, DecayKind, TrainingMetadata},
};

/// Window of the running averages reported in the summary
const AVERAGE_WINDOW: usize = 100;

#[derive(Debug, Serialize)]
struct SummaryStats {
    episodes: u32,
    mean_score: f64,
    recent_mean_score: Option<f64>,
    best_score: u32,
    games_won: u32,
    win_rate: f64,
    max_level: u32,
    table_size: usize,
}

impl From<&TrainingResult> for SummaryStats {
    fn from(result: &TrainingResult) -> Self {
        Self {
            episodes: result.episodes,
            mean_score: result.mean_score,
            recent_mean_score: result.history.avg_scores(AVERAGE_WINDOW).last().copied(),
            best_score: result.best_score,
            games_won: result.games_won,
            win_rate: result.win_rate(),
            max_level: result.max_level,
            table_size: result.table_size,
        }
    }
}

#[derive(Debug, Serialize)]
struct TrainingSummaryFile {
    training: SummaryStats,
    algorithm: String,
    start_episode: u32,
    metadata: SummaryMetadata,
}

#[derive(Debug, Serialize)]
struct SummaryMetadata {
    model: String,
    episodes_trained: u32,
    seed: Option<u64>,
}

fn sanitize_summary_path(raw: &Path) -> PathBuf {
    let mut normalized = raw.to_path_buf();
    let raw_str = raw.as_os_str().to_string_lossy();

    // Treat trailing separators or missing filename as a directory target.
    if raw_str.ends_with(std::path::MAIN_SEPARATOR) || normalized.file_name().is_none() {
        normalized.push("training_summary.json");
        return normalized;
    }

    match normalized.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("json") => normalized,
        _ => {
            normalized.set_extension("json");
            normalized
        }
    }
}

#[derive(Parser, Debug)]
#[command(about = "Train an agent")]
pub struct TrainArgs {
    /// Number of training episodes (overrides the config file)
    #[arg(long, short = 'e')]
    pub episodes: Option<u32>,

    /// Learning algorithm (overrides the config file)
    #[arg(long, short = 'a', value_enum)]
    pub algorithm: Option<AlgorithmArg>,

    /// Exploration decay shape: exponential or linear (overrides the config file)
    #[arg(long)]
    pub epsilon_decay: Option<DecayKind>,

    /// Episodes for linear decay to reach the minimum ε
    #[arg(long)]
    pub linear_episodes: Option<u32>,

    /// Continue from the saved model, keeping its episode numbering and history
    #[arg(long)]
    pub resume: bool,

    /// Model file to resume from and save to
    #[arg(long, short = 'm')]
    pub model: Option<PathBuf>,

    /// CSV file receiving one row per episode
    #[arg(long)]
    pub log: Option<PathBuf>,

    /// Do not write the CSV log
    #[arg(long, conflicts_with = "log")]
    pub no_log: bool,

    /// Experiment configuration (JSON, see `pacman config`)
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Random seed for reproducibility
    #[arg(long)]
    pub seed: Option<u64>,

    /// Render every step in the terminal
    #[arg(long)]
    pub visual: bool,

    /// Delay between rendered frames with --visual
    #[arg(long, default_value_t = 50)]
    pub delay_ms: u64,

    /// Print a report line every --report-every episodes instead of a progress bar
    #[arg(long)]
    pub no_progress: bool,

    #[arg(long, default_value_t = 100)]
    pub report_every: u32,

    /// Optional path for writing a summary JSON file
    #[arg(long)]
    pub summary: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum AlgorithmArg {
    /// Off-policy TD control
    QLearning,
    /// On-policy TD control
    Sarsa,
    /// Two tables, one selects and the other evaluates
    DoubleQ,
}

impl From<AlgorithmArg> for Algorithm {
    fn from(arg: AlgorithmArg) -> Self {
        match arg {
            AlgorithmArg::QLearning => Algorithm::QLearning,
            AlgorithmArg::Sarsa => Algorithm::Sarsa,
            AlgorithmArg::DoubleQ => Algorithm::DoubleQ,
        }
    }
}

/// Merge the config file (or defaults) with command-line overrides.
fn resolve_config(args: &TrainArgs) -> Result<ExperimentConfig> {
    let mut config = match &args.config {
        Some(path) => ExperimentConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => ExperimentConfig::default(),
    };

    if let Some(episodes) = args.episodes {
        config.training.episodes = episodes;
    }
    if let Some(algorithm) = args.algorithm {
        config.learner.algorithm = algorithm.into();
    }
    if let Some(decay) = args.epsilon_decay {
        config.learner.exploration.decay = decay;
    }
    if let Some(episodes) = args.linear_episodes {
        config.learner.exploration.linear_episodes = episodes;
    }
    if let Some(seed) = args.seed {
        config.training.seed = Some(seed);
    }
    if let Some(model) = &args.model {
        config.model_path = model.clone();
    }
    if args.no_log {
        config.log_path = None;
    } else if let Some(log) = &args.log {
        config.log_path = Some(log.clone());
    }

    config.validate()?;
    Ok(config)
}

/// Flag raised by Ctrl-C. The handler is installed on first use.
fn interrupt_flag() -> Arc<AtomicBool> {
    static FLAG: OnceLock<Arc<AtomicBool>> = OnceLock::new();
    let flag = FLAG.get_or_init(|| {
        let flag = Arc::new(AtomicBool::new(false));
        let raised = Arc::clone(&flag);
        if let Err(err) = ctrlc::set_handler(move || raised.store(true, Ordering::SeqCst)) {
            eprintln!("Warning: progress will not be saved on Ctrl-C ({err})");
        }
        flag
    });
    Arc::clone(flag)
}

pub fn execute(args: TrainArgs) -> Result<()> {
    run_until(&App::new(), args, interrupt_flag()).map(|_| ())
}

/// Train with the dependencies of `app` and return the result of this run.
pub fn run(app: &App, args: TrainArgs) -> Result<TrainingResult> {
    run_until(app, args, Arc::new(AtomicBool::new(false)))
}

/// Like [`run`], but stop before the next episode once `stop` is raised.
///
/// An interrupted run still saves the model, history and summary of the
/// episodes it completed.
pub fn run_until(app: &App, args: TrainArgs, stop: Arc<AtomicBool>) -> Result<TrainingResult> {
    let config = resolve_config(&args)?;
    let model_path = config.model_path.as_path();

    let mut engine = app.build_engine(&config)?;
    let (mut learner, previous) = if args.resume {
        app.load_or_new_learner(&config, model_path)
            .with_context(|| format!("failed to load model {}", model_path.display()))?
    } else {
        (app.build_learner(&config)?, None)
    };

    let mut history = TrainingHistory::new();
    let mut start_episode = 0;
    let mut episodes_before = 0;
    match &previous {
        Some(saved) => {
            start_episode = saved.next_episode();
            episodes_before = saved.metadata.episodes_trained;
            history = saved.history.clone();
            println!("Resuming training at episode {start_episode}");
            if saved.algorithm != config.learner.algorithm {
                println!(
                    "Saved model uses {}; ignoring requested {}",
                    saved.algorithm, config.learner.algorithm
                );
            }
        }
        None if args.resume => {
            println!(
                "No saved model at {}, starting from scratch",
                model_path.display()
            );
        }
        None => {}
    }

    let training = TrainingConfig {
        start_episode,
        ..config.training.clone()
    };
    let mut pipeline = TrainingPipeline::new(training.clone()).with_stop_flag(stop);
    if args.visual {
        pipeline.add_observer(Box::new(AsciiRenderer::stdout(Some(
            Duration::from_millis(args.delay_ms),
        ))));
    } else if args.no_progress {
        pipeline.add_observer(Box::new(ConsoleObserver::new(args.report_every)));
    } else {
        pipeline.add_observer(Box::new(ProgressObserver::new()));
    }
    if let Some(log_path) = &config.log_path {
        let observer = CsvLogObserver::append(log_path)
            .with_context(|| format!("failed to open log {}", log_path.display()))?;
        pipeline.add_observer(Box::new(observer));
    }

    print_section(&format!(
        "Training {} for {} episodes",
        learner.algorithm().label(),
        training.episodes
    ));
    let result = pipeline
        .train(&mut engine, &mut learner)
        .context("training failed")?;
    if result.interrupted {
        println!(
            "\nInterrupted after {} episodes, saving progress",
            result.episodes
        );
    }

    history.extend(&result.history);
    let episodes_trained = episodes_before.saturating_add(result.episodes);
    let saved = learner
        .export(TrainingMetadata {
            episodes_trained,
            seed: config.training.seed,
            rng_seed: None,
        })
        .with_history(history);
    app.save_model(&saved, model_path)
        .with_context(|| format!("failed to save model {}", model_path.display()))?;

    print_section("Training complete");
    print_stats_table(&result_stats(&result));
    print_kv("Epsilon", &format!("{:.3}", learner.epsilon()));
    print_kv("Model", &model_path.display().to_string());

    if let Some(raw) = &args.summary {
        let summary_path = sanitize_summary_path(raw);
        if let Some(parent) = summary_path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }

        let summary = TrainingSummaryFile {
            training: SummaryStats::from(&result),
            algorithm: learner.algorithm().to_string(),
            start_episode,
            metadata: SummaryMetadata {
                model: model_path.display().to_string(),
                episodes_trained,
                seed: config.training.seed,
            },
        };

        let file = File::create(&summary_path)
            .with_context(|| format!("failed to create {}", summary_path.display()))?;
        to_writer_pretty(file, &summary)?;
        println!("\nSummary written to {}", summary_path.display());
    }

    Ok(result)
}
