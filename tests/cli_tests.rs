//! Command-line entry points driven through `parse_from`.

use std::sync::{Arc, atomic::AtomicBool};

use clap::Parser;
use pacman_rl::{
    adapters::{InMemoryRepository, MsgPackRepository},
    app::{App, ExperimentConfig},
    cli::commands::{
        config::{self, ConfigArgs},
        play::{self, PlayArgs},
        train::{self, AlgorithmArg, TrainArgs},
    },
    ports::AgentRepository,
    q_learning::Algorithm,
};
use tempfile::tempdir;

fn train_args<I, T>(args: I) -> TrainArgs
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    TrainArgs::parse_from(args)
}

#[test]
fn train_parses_every_option() {
    let args = train_args([
        "pacman-train",
        "--episodes",
        "12",
        "--algorithm",
        "sarsa",
        "--resume",
        "--model",
        "m.msgpack",
        "--log",
        "log.csv",
        "--config",
        "exp.json",
        "--seed",
        "4",
        "--visual",
        "--no-progress",
        "--report-every",
        "10",
        "--summary",
        "out/",
    ]);

    assert_eq!(args.episodes, Some(12));
    assert_eq!(args.algorithm, Some(AlgorithmArg::Sarsa));
    assert!(args.resume && args.visual && args.no_progress);
    assert_eq!(args.seed, Some(4));
    assert_eq!(args.report_every, 10);
}

#[test]
fn train_writes_model_log_and_summary() {
    let tmp = tempdir().unwrap();
    let model = tmp.path().join("model.msgpack");
    let log = tmp.path().join("log.csv");
    let summary = tmp.path().join("summary");

    let args = train_args([
        "pacman-train",
        "--episodes",
        "3",
        "--algorithm",
        "double-q",
        "--seed",
        "1",
        "--no-progress",
        "--model",
        model.to_str().unwrap(),
        "--log",
        log.to_str().unwrap(),
        "--summary",
        summary.to_str().unwrap(),
    ]);
    train::execute(args).expect("training should succeed");

    let saved = MsgPackRepository::new().load(&model).unwrap().unwrap();
    assert_eq!(saved.algorithm, Algorithm::DoubleQ);
    assert_eq!(saved.metadata.episodes_trained, 3);
    assert_eq!(saved.tables.len(), 2);
    assert_eq!(saved.history.episodes, vec![0, 1, 2]);

    let contents = std::fs::read_to_string(&log).unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines[0], "Episode,Score,Steps,Epsilon,GhostsEaten");
    assert_eq!(lines.len(), 4);
    let first_epsilon: f64 = lines[1].split(',').nth(3).unwrap().parse().unwrap();
    assert!(first_epsilon < 1.0);
    assert_eq!(saved.epsilon.to_string(), lines[3].split(',').nth(3).unwrap());

    let parsed: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(summary.with_extension("json")).unwrap())
            .unwrap();
    assert_eq!(parsed["training"]["episodes"], 3);
    assert_eq!(parsed["algorithm"], "double-q");
}

#[test]
fn resumed_training_appends_to_log_and_history() {
    let tmp = tempdir().unwrap();
    let model = tmp.path().join("model.msgpack");
    let log = tmp.path().join("log.csv");
    let run = || {
        train::execute(train_args([
            "pacman-train",
            "--episodes",
            "2",
            "--resume",
            "--no-progress",
            "--model",
            model.to_str().unwrap(),
            "--log",
            log.to_str().unwrap(),
        ]))
        .unwrap();
    };

    run();
    run();

    let saved = MsgPackRepository::new().load(&model).unwrap().unwrap();
    assert_eq!(saved.history.episodes, vec![0, 1, 2, 3]);
    assert_eq!(saved.metadata.episodes_trained, 4);

    let contents = std::fs::read_to_string(&log).unwrap();
    let headers = contents.lines().filter(|l| l.starts_with("Episode")).count();
    assert_eq!(headers, 1);
    assert_eq!(contents.lines().count(), 5);
}

#[test]
fn train_uses_injected_repository() {
    let repo = InMemoryRepository::new();
    let app = App::for_testing().with_repository(repo.clone()).build();

    let result = train::run(
        &app,
        train_args([
            "pacman-train",
            "--episodes",
            "2",
            "--seed",
            "6",
            "--no-log",
            "--no-progress",
            "--model",
            "in-memory-model",
        ]),
    )
    .unwrap();

    assert_eq!(result.episodes, 2);
    assert!(repo.contains(std::path::Path::new("in-memory-model")));
}

#[test]
fn interrupted_training_still_saves_progress() {
    let repo = InMemoryRepository::new();
    let app = App::for_testing().with_repository(repo.clone()).build();
    let args = |resume: bool| {
        let mut argv = vec![
            "pacman-train",
            "--episodes",
            "2",
            "--seed",
            "8",
            "--no-log",
            "--no-progress",
            "--model",
            "interrupted",
        ];
        if resume {
            argv.push("--resume");
        }
        train_args(argv)
    };
    train::run(&app, args(false)).unwrap();

    let stop = Arc::new(AtomicBool::new(true));
    let result = train::run_until(&app, args(true), stop).unwrap();

    assert!(result.interrupted);
    assert_eq!(result.episodes, 0);
    let saved = repo
        .load(std::path::Path::new("interrupted"))
        .unwrap()
        .unwrap();
    assert_eq!(saved.history.episodes, vec![0, 1]);
    assert_eq!(saved.metadata.episodes_trained, 2);
}

#[test]
fn train_rejects_invalid_config_file() {
    let tmp = tempdir().unwrap();
    let path = tmp.path().join("bad.json");
    std::fs::write(&path, r#"{ "learner": { "exploration": { "start": 4.0 } } }"#).unwrap();

    let args = train_args([
        "pacman-train",
        "--no-log",
        "--config",
        path.to_str().unwrap(),
    ]);
    assert!(train::execute(args).is_err());
}

#[test]
fn config_command_writes_loadable_defaults() {
    let tmp = tempdir().unwrap();
    let path = tmp.path().join("experiment.json");

    config::execute(ConfigArgs::parse_from([
        "pacman-config",
        "--output",
        path.to_str().unwrap(),
    ]))
    .unwrap();

    assert_eq!(
        ExperimentConfig::load(&path).unwrap(),
        ExperimentConfig::default()
    );
}

#[test]
fn play_runs_greedy_episodes_from_a_saved_model() {
    let repo = InMemoryRepository::new();
    let app = App::for_testing()
        .with_repository(repo.clone())
        .with_default_seed(2)
        .build();
    train::run(
        &app,
        train_args([
            "pacman-train",
            "--episodes",
            "2",
            "--no-log",
            "--no-progress",
            "--model",
            "shared",
        ]),
    )
    .unwrap();

    let result = play::run(
        &app,
        PlayArgs::parse_from([
            "pacman-play",
            "--model",
            "shared",
            "--episodes",
            "1",
            "--delay-ms",
            "0",
        ]),
    )
    .unwrap();
    assert_eq!(result.episodes, 1);
}
