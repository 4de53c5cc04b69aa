//! CLI commands against temporary directories

mod common;

use clap::Parser;
use common::{battle, winning_episode};
use skirmish::{
    adapters::{TextWeightStore, WEIGHTS_FILE},
    cli::commands::{
        init::{self, InitArgs},
        inspect::{self, InspectArgs},
        train::{self, TrainArgs},
    },
    ports::WeightStore,
};
use tempfile::tempdir;

#[test]
fn train_writes_results_summary_and_weights() {
    let tmp = tempdir().unwrap();
    let recording = tmp.path().join("battle.json");
    battle(vec![winning_episode()]).save_json(&recording).unwrap();
    let weights_dir = tmp.path().join("weights");
    let results = tmp.path().join("results.csv");
    let summary = tmp.path().join("summary.json");
    let episode_log = tmp.path().join("episodes.jsonl");

    let args = TrainArgs::parse_from([
        "train",
        recording.to_str().unwrap(),
        "--episodes",
        "15",
        "--seed",
        "7",
        "--weights-dir",
        weights_dir.to_str().unwrap(),
        "--results",
        results.to_str().unwrap(),
        "--summary",
        summary.to_str().unwrap(),
        "--episode-log",
        episode_log.to_str().unwrap(),
        "--no-progress",
        "--quiet",
    ]);

    let run = train::run(&args).expect("training should succeed");
    assert_eq!(run.episodes_played(), 15);
    assert!(results.exists());
    assert!(summary.exists());
    assert!(weights_dir.join(WEIGHTS_FILE).exists());

    let log = std::fs::read_to_string(&episode_log).unwrap();
    assert_eq!(log.lines().count(), 15);

    let parsed: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&summary).unwrap()).unwrap();
    assert_eq!(parsed["episodes_won"], 15);
}

#[test]
fn train_reports_missing_recording() {
    let tmp = tempdir().unwrap();
    let args = TrainArgs::parse_from([
        "train",
        tmp.path().join("missing.json").to_str().unwrap(),
        "--no-progress",
        "--quiet",
        "--no-results",
    ]);
    let err = train::run(&args).unwrap_err();
    assert!(err.to_string().contains("Failed to load recording"));
}

#[test]
fn init_then_inspect() {
    let tmp = tempdir().unwrap();
    let dir = tmp.path().join("agent_weights");

    let args = InitArgs::parse_from([
        "init",
        "--weights-dir",
        dir.to_str().unwrap(),
        "--seed",
        "1",
        "--best",
    ]);
    init::execute(args).unwrap();

    let store = TextWeightStore::in_dir(&dir);
    let weights = store.load().unwrap().unwrap();
    assert_eq!(weights.len(), 6);
    assert_eq!(store.load_best().unwrap(), Some(weights));

    let again = InitArgs::parse_from(["init", "--weights-dir", dir.to_str().unwrap()]);
    assert!(init::execute(again).is_err());

    let inspect_args =
        InspectArgs::parse_from(["inspect", dir.join(WEIGHTS_FILE).to_str().unwrap()]);
    inspect::execute(inspect_args).unwrap();
}

#[test]
fn inspect_rejects_wrong_length() {
    let tmp = tempdir().unwrap();
    let path = tmp.path().join("weights.txt");
    std::fs::write(&path, "0.5\n0.25\n").unwrap();

    let args = InspectArgs::parse_from(["inspect", path.to_str().unwrap()]);
    assert!(inspect::execute(args).is_err());
}
