use std::error::Error;
use std::fmt;

/// Failures produced by model training and prediction.
#[derive(Debug)]
pub enum ModelError {
    /// The training dataset was malformed, empty, or structurally
    /// incompatible with the model. No report was produced and the
    /// candidate must be considered invalid.
    Training(String),
    /// The prediction dataset was malformed or incompatible with the
    /// trained model. No output file was written.
    Prediction(String),
    /// `predict` was called on a model that has never been trained.
    NotTrained,
}

impl fmt::Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ModelError::Training(msg) => write!(f, "training failed: {}", msg),
            ModelError::Prediction(msg) => write!(f, "prediction failed: {}", msg),
            ModelError::NotTrained => write!(f, "the model has not been trained yet"),
        }
    }
}

impl Error for ModelError {}
