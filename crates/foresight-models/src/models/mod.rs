use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::kind::ModelKind;
use crate::report::Report;

pub mod model_interface;
pub mod neural;
pub mod ridge;

use model_interface::ModelInterface;
use neural::NeuralModel;
use ridge::RidgeModel;

/// A model of either variant. This enum is what the registry holds and what
/// persistence serializes: whole-object serialization needs a closed set of
/// variants, so dynamic dispatch stays inside the trait impl below.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Model {
    Neural(NeuralModel),
    Ridge(RidgeModel),
}

impl ModelInterface for Model {
    fn kind(&self) -> ModelKind {
        match self {
            Model::Neural(_) => ModelKind::Neural,
            Model::Ridge(_) => ModelKind::Ridge,
        }
    }

    fn train(&mut self, dataset: &Path) -> Result<Report, ModelError> {
        match self {
            Model::Neural(m) => m.train(dataset),
            Model::Ridge(m) => m.train(dataset),
        }
    }

    fn predict(&self, dataset: &Path, output_dir: &Path) -> Result<String, ModelError> {
        match self {
            Model::Neural(m) => m.predict(dataset, output_dir),
            Model::Ridge(m) => m.predict(dataset, output_dir),
        }
    }

    fn report(&self) -> Option<&Report> {
        match self {
            Model::Neural(m) => m.report(),
            Model::Ridge(m) => m.report(),
        }
    }
}

/// File stem of the uploaded dataset, used to name the results file.
pub(crate) fn dataset_stem(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("results")
        .to_string()
}
