//! Weight files and run summaries on disk

mod common;

use common::{WINNING_REWARD, battle, winning_episode};
use skirmish::{
    adapters::{BEST_WEIGHTS_FILE, ReplayEngine, TextWeightStore, WEIGHTS_FILE},
    app::{App, ControllerConfig, Pretrained},
    pipeline::{CSV_HEADER, RunSummary, TrainingRun, read_reward_csv},
    ports::WeightStore,
    q_learning::WeightVector,
};
use tempfile::TempDir;

#[test]
fn test_weights_roundtrip_exactly() {
    let temp_dir = TempDir::new().unwrap();
    let store = TextWeightStore::in_dir(temp_dir.path());
    let weights = WeightVector::new(vec![
        0.123456789012345,
        -0.987654321098765,
        1.0e-300,
        -7.0,
        0.1 + 0.2,
        f64::MIN_POSITIVE,
    ]);

    store.save(&weights).unwrap();
    store.save_best(&weights).unwrap();
    assert_eq!(store.load().unwrap(), Some(weights.clone()));
    assert_eq!(store.load_best().unwrap(), Some(weights));
}

#[test]
fn test_training_run_writes_weights_and_csv() {
    let temp_dir = TempDir::new().unwrap();
    let weights_dir = temp_dir.path().join("agent_weights");
    let results = temp_dir.path().join("results.csv");
    let summary_path = temp_dir.path().join("summary.json");

    let app = App::builder()
        .with_store(TextWeightStore::in_dir(&weights_dir))
        .with_default_seed(11)
        .build();
    let mut ctl = app.create_controller(ControllerConfig::default()).unwrap();
    let mut engine = ReplayEngine::new(battle(vec![winning_episode()])).unwrap();

    let summary = TrainingRun::new(15)
        .with_results_path(Some(results.clone()))
        .with_summary_path(&summary_path)
        .run(&mut ctl, &mut engine)
        .unwrap();

    assert!(weights_dir.join(WEIGHTS_FILE).exists());
    assert!(weights_dir.join(BEST_WEIGHTS_FILE).exists());

    let text = std::fs::read_to_string(&results).unwrap();
    assert_eq!(text.lines().next(), Some(CSV_HEADER));
    assert_eq!(text.lines().nth(1), Some("1, 228.40000"));

    let rows = read_reward_csv(&results).unwrap();
    assert_eq!(rows.len(), 15);
    assert_eq!(rows[14].0, 15);
    assert!((rows[0].1 - WINNING_REWARD).abs() < 1e-4);

    assert_eq!(RunSummary::load_json(&summary_path).unwrap(), summary);
}

#[test]
fn test_resume_from_latest_weights() {
    let temp_dir = TempDir::new().unwrap();
    let store = TextWeightStore::in_dir(temp_dir.path());

    let app = App::builder().with_store(store.clone()).build();
    let mut first = app
        .create_controller(ControllerConfig::default().with_seed(3))
        .unwrap();
    let mut engine = ReplayEngine::new(battle(vec![winning_episode()])).unwrap();
    let summary = TrainingRun::new(2)
        .with_results_path(None)
        .run(&mut first, &mut engine)
        .unwrap();

    let config = ControllerConfig::default().with_pretrained(Pretrained::Latest);
    let mut resumed = app.create_controller(config).unwrap();
    assert_eq!(resumed.initial_state().weights(), &summary.final_weights);
}

#[test]
fn test_unwritable_weight_dir_does_not_abort_training() {
    let temp_dir = TempDir::new().unwrap();
    let blocker = temp_dir.path().join("not_a_dir");
    std::fs::write(&blocker, "file").unwrap();

    let app = App::builder()
        .with_store(TextWeightStore::in_dir(blocker.join("weights")))
        .with_default_seed(5)
        .build();
    let mut ctl = app.create_controller(ControllerConfig::default()).unwrap();
    let mut engine = ReplayEngine::new(battle(vec![winning_episode()])).unwrap();

    let summary = TrainingRun::new(3)
        .with_results_path(Some(blocker.join("results.csv")))
        .run(&mut ctl, &mut engine)
        .unwrap();
    assert_eq!(summary.episodes_played(), 3);
}
