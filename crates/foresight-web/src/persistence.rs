//! Whole-model persistence: one JSON blob on disk holding the promoted
//! active model.
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use foresight_models::{Model, ModelKind};

/// Load the persisted active model, or construct a fresh untrained model of
/// `default_kind` when no blob exists. A blob that exists but does not
/// deserialize is an error: silently replacing a trained model with an empty
/// one would lose the promotion the user accepted.
pub fn load(path: &Path, default_kind: ModelKind) -> Result<Model> {
    if !path.exists() {
        log::info!(
            "no saved model at {}, constructing a fresh {} model",
            path.display(),
            default_kind
        );
        return Ok(default_kind.construct());
    }

    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read model blob: {}", path.display()))?;
    let model: Model = serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse model blob: {}", path.display()))?;
    log::info!("loaded saved model from {}", path.display());
    Ok(model)
}

/// Serialize the whole model and overwrite the blob atomically from a
/// reader's point of view: write to a sibling temp file, then rename.
pub fn save(model: &Model, path: &Path) -> Result<()> {
    let blob = serde_json::to_string(model).context("Failed to serialize model")?;

    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, blob)
        .with_context(|| format!("Failed to write model blob: {}", tmp.display()))?;
    fs::rename(&tmp, path)
        .with_context(|| format!("Failed to move model blob into place: {}", path.display()))?;

    log::info!("saved active model to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use foresight_models::ModelInterface;
    use std::io::Write;

    #[test]
    fn missing_blob_falls_back_to_a_fresh_default() {
        let dir = tempfile::tempdir().unwrap();
        let model = load(&dir.path().join("absent.json"), ModelKind::Ridge).unwrap();
        assert_eq!(model.kind(), ModelKind::Ridge);
        assert!(model.report().is_none());
    }

    #[test]
    fn save_then_load_round_trips_a_trained_model() {
        let dir = tempfile::tempdir().unwrap();
        let csv = dir.path().join("train.csv");
        let mut file = std::fs::File::create(&csv).unwrap();
        writeln!(file, "x,y").unwrap();
        for i in 0..10 {
            writeln!(file, "{},{}", i, 5 * i).unwrap();
        }

        let mut model = ModelKind::Neural.construct();
        let report = model.train(&csv).unwrap();

        let blob = dir.path().join("model.json");
        save(&model, &blob).unwrap();

        let reloaded = load(&blob, ModelKind::Ridge).unwrap();
        assert_eq!(reloaded.kind(), ModelKind::Neural);
        assert_eq!(reloaded.report(), Some(&report));

        // No temp file is left behind.
        assert!(!dir.path().join("model.json.tmp").exists());
    }

    #[test]
    fn corrupt_blob_is_an_error_not_a_silent_reset() {
        let dir = tempfile::tempdir().unwrap();
        let blob = dir.path().join("model.json");
        std::fs::write(&blob, "{ not json").unwrap();
        assert!(load(&blob, ModelKind::Neural).is_err());
    }

    #[test]
    fn save_overwrites_a_previous_blob() {
        let dir = tempfile::tempdir().unwrap();
        let blob = dir.path().join("model.json");

        save(&ModelKind::Neural.construct(), &blob).unwrap();
        save(&ModelKind::Ridge.construct(), &blob).unwrap();

        let reloaded = load(&blob, ModelKind::Neural).unwrap();
        assert_eq!(reloaded.kind(), ModelKind::Ridge);
    }
}
