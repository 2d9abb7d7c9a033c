//! Behavior tests for the `Model` enum: trait dispatch, whole-object
//! serialization, and the report contract shared by both variants.

use std::io::Write;

use foresight_models::{Model, ModelError, ModelInterface, ModelKind};

fn linear_csv(dir: &tempfile::TempDir, name: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    let mut file = std::fs::File::create(&path).unwrap();
    writeln!(file, "x1,x2,y").unwrap();
    for i in 0..12 {
        let a = i as f64;
        let b = (11 - i) as f64;
        writeln!(file, "{},{},{}", a, b, a + 0.5 * b).unwrap();
    }
    path
}

// ---------------------------------------------------------------------------
// Trait dispatch through the enum
// ---------------------------------------------------------------------------

#[test]
fn both_kinds_train_and_predict_through_the_enum() {
    let dir = tempfile::tempdir().unwrap();
    let train = linear_csv(&dir, "train.csv");

    for kind in [ModelKind::Neural, ModelKind::Ridge] {
        let mut model = kind.construct();
        assert_eq!(model.kind(), kind);
        assert!(model.report().is_none());

        let report = model.train(&train).unwrap();
        assert_eq!(report.get("Model"), Some(kind.label()));
        assert_eq!(model.report(), Some(&report));

        let out_dir = tempfile::tempdir().unwrap();
        let name = model.predict(&train, out_dir.path()).unwrap();
        assert!(out_dir.path().join(&name).exists());
    }
}

#[test]
fn training_failure_leaves_no_report() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty.csv");
    std::fs::write(&path, "").unwrap();

    for kind in [ModelKind::Neural, ModelKind::Ridge] {
        let mut model = kind.construct();
        assert!(matches!(model.train(&path), Err(ModelError::Training(_))));
        assert!(model.report().is_none());
    }
}

// ---------------------------------------------------------------------------
// Whole-object serialization
// ---------------------------------------------------------------------------

#[test]
fn serialization_round_trips_a_trained_model() {
    let dir = tempfile::tempdir().unwrap();
    let train = linear_csv(&dir, "train.csv");

    for kind in [ModelKind::Neural, ModelKind::Ridge] {
        let mut model = kind.construct();
        let report = model.train(&train).unwrap();

        let blob = serde_json::to_string(&model).unwrap();
        let reloaded: Model = serde_json::from_str(&blob).unwrap();

        assert_eq!(reloaded.kind(), kind);
        assert_eq!(reloaded.report(), Some(&report));

        // The reloaded model must predict, not just carry the report.
        let out_dir = tempfile::tempdir().unwrap();
        reloaded.predict(&train, out_dir.path()).unwrap();
    }
}

#[test]
fn untrained_model_round_trips_as_untrained() {
    let model = ModelKind::Ridge.construct();
    let blob = serde_json::to_string(&model).unwrap();
    let reloaded: Model = serde_json::from_str(&blob).unwrap();
    assert!(reloaded.report().is_none());

    let dir = tempfile::tempdir().unwrap();
    let data = linear_csv(&dir, "data.csv");
    assert!(matches!(
        reloaded.predict(&data, dir.path()),
        Err(ModelError::NotTrained)
    ));
}
