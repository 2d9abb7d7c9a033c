use std::error::Error;
use std::fmt;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::pages;

/// Application error taxonomy. Every collaborator failure is caught at the
/// route/workflow boundary, logged, and reduced to one of a small set of
/// user-facing messages; nothing here crashes the process.
#[derive(Debug)]
pub enum AppError {
    /// The upload was rejected before reaching the workflow (bad or
    /// missing file extension, unusable file name).
    Validation(String),
    /// The model's `train` failed; the registry was left unchanged.
    Training(String),
    /// The model's `predict` failed or the download could not be served.
    Prediction(String),
    /// Saving the promoted model failed; the promotion did not happen.
    Persistence(String),
    /// The session store failed.
    Session(String),
    /// Infrastructure faults (task join failures, render failures).
    Internal(String),
}

impl AppError {
    /// The message shown to the user. Diagnostic detail stays in the log.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Validation(msg) => msg.clone(),
            AppError::Training(_) => {
                "Unable to generate a report based on the training data. Training data is \
                 invalid. Please upload another set of training data."
                    .to_string()
            }
            AppError::Prediction(_) => {
                "Unable to generate predictions for the uploaded data.".to_string()
            }
            AppError::Persistence(_) => {
                "The accepted model could not be saved. The previous model is still active."
                    .to_string()
            }
            AppError::Session(_) | AppError::Internal(_) => "Unknown error occurred.".to_string(),
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AppError::Validation(msg) => write!(f, "validation failed: {}", msg),
            AppError::Training(msg) => write!(f, "training failed: {}", msg),
            AppError::Prediction(msg) => write!(f, "prediction failed: {}", msg),
            AppError::Persistence(msg) => write!(f, "persistence failed: {}", msg),
            AppError::Session(msg) => write!(f, "session store failed: {}", msg),
            AppError::Internal(msg) => write!(f, "internal error: {}", msg),
        }
    }
}

impl Error for AppError {}

impl From<tower_sessions::session::Error> for AppError {
    fn from(err: tower_sessions::session::Error) -> Self {
        AppError::Session(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Training(_) | AppError::Prediction(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Persistence(_) | AppError::Session(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        log::error!("request failed: {}", self);
        (status, pages::error_page(&self.user_message())).into_response()
    }
}
