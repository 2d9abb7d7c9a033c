use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use foresight_models::ModelKind;
use serde::{Deserialize, Serialize};

/// Application configuration, loaded from a JSON file. Every field has a
/// default so a partial file (or none at all) works out of the box.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Listen address for the HTTP server.
    pub listen: String,
    /// Directory where training datasets are uploaded.
    pub train_upload_dir: PathBuf,
    /// Directory where prediction datasets are uploaded.
    pub predict_upload_dir: PathBuf,
    /// Directory where prediction results are written and served from.
    pub download_dir: PathBuf,
    /// Path of the persisted active-model blob.
    pub model_path: PathBuf,
    /// Variant constructed when no persisted model exists.
    pub default_model: ModelKind,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            listen: "127.0.0.1:8080".to_string(),
            train_upload_dir: PathBuf::from("data/uploads/train"),
            predict_upload_dir: PathBuf::from("data/uploads/predict"),
            download_dir: PathBuf::from("data/downloads"),
            model_path: PathBuf::from("data/active_model.json"),
            default_model: ModelKind::Neural,
        }
    }
}

impl AppConfig {
    /// Load a configuration from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config: {}", path.as_ref().display()))?;
        let config: AppConfig = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse config: {}", path.as_ref().display()))?;
        Ok(config)
    }

    /// Pretty-printed default configuration, shown by `--print-config`.
    pub fn template() -> String {
        serde_json::to_string_pretty(&AppConfig::default())
            .expect("default config always serializes")
    }

    /// Create the upload/download directories and the blob's parent.
    pub fn ensure_dirs(&self) -> Result<()> {
        for dir in [
            &self.train_upload_dir,
            &self.predict_upload_dir,
            &self.download_dir,
        ] {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
        }
        if let Some(parent) = self.model_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create directory: {}", parent.display())
                })?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn template_lists_every_field() {
        let template = AppConfig::template();
        for key in [
            "listen",
            "train_upload_dir",
            "predict_upload_dir",
            "download_dir",
            "model_path",
            "default_model",
        ] {
            assert!(template.contains(key), "template is missing {}", key);
        }
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "listen": "0.0.0.0:9000", "default_model": "ridge" }"#)
            .unwrap();

        let config = AppConfig::load(&path).unwrap();
        assert_eq!(config.listen, "0.0.0.0:9000");
        assert_eq!(config.default_model, ModelKind::Ridge);
        assert_eq!(config.download_dir, AppConfig::default().download_dir);
    }

    #[test]
    fn missing_file_errors() {
        assert!(AppConfig::load("/nonexistent/config.json").is_err());
    }

    #[test]
    fn ensure_dirs_creates_the_tree() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig {
            train_upload_dir: dir.path().join("up/train"),
            predict_upload_dir: dir.path().join("up/predict"),
            download_dir: dir.path().join("down"),
            model_path: dir.path().join("blob/model.json"),
            ..AppConfig::default()
        };
        config.ensure_dirs().unwrap();
        assert!(config.train_upload_dir.is_dir());
        assert!(config.predict_upload_dir.is_dir());
        assert!(config.download_dir.is_dir());
        assert!(dir.path().join("blob").is_dir());
    }
}
