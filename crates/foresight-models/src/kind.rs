use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::models::neural::NeuralModel;
use crate::models::ridge::RidgeModel;
use crate::models::Model;

/// Tag identifying a model variant.
///
/// New variants are added here and in [`ModelKind::construct`]; everything
/// else (swap, persistence, the registry) goes through this table and
/// never names a concrete model type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelKind {
    Neural,
    Ridge,
}

impl ModelKind {
    /// Construct a fresh, untrained model of this kind.
    pub fn construct(self) -> Model {
        match self {
            ModelKind::Neural => Model::Neural(NeuralModel::new()),
            ModelKind::Ridge => Model::Ridge(RidgeModel::new()),
        }
    }

    /// The alternate kind, used when swapping the active model variant.
    pub fn other(self) -> ModelKind {
        match self {
            ModelKind::Neural => ModelKind::Ridge,
            ModelKind::Ridge => ModelKind::Neural,
        }
    }

    /// Human readable name shown in reports and pages.
    pub fn label(&self) -> &'static str {
        match self {
            ModelKind::Neural => "neural network",
            ModelKind::Ridge => "ridge regression",
        }
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ModelKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "neural" | "nn" | "neural_network" => Ok(ModelKind::Neural),
            "ridge" | "rr" | "ridge_regression" => Ok(ModelKind::Ridge),
            _ => Err(format!(
                "Unknown model kind: {}. Valid options are: neural, ridge",
                s
            )),
        }
    }
}
