//! The training-review-promotion workflow: the transitions that move a
//! candidate model from "just trained" to "the model used for predictions".
//!
//! Training and prediction are blocking, potentially slow calls; both run on
//! blocking worker threads and touch the registry lock only briefly before
//! and after.
use std::sync::Arc;

use foresight_models::{ModelError, ModelInterface, Report};

use crate::error::AppError;
use crate::persistence;
use crate::state::AppState;

fn join_error(err: tokio::task::JoinError) -> AppError {
    AppError::Internal(format!("worker task failed: {}", err))
}

/// Train a fresh candidate of the currently active kind on the named file in
/// the training upload directory. On success the candidate (carrying its
/// report) is installed in the registry for review; on failure the registry
/// keeps only the side effect of the attempt having started (any previous
/// candidate is gone).
pub async fn run_training(state: Arc<AppState>, file_name: &str) -> Result<(), AppError> {
    let path = state.config.train_upload_dir.join(file_name);
    let kind = {
        let mut registry = state.registry.write();
        registry.begin_attempt();
        registry.active_kind()
    };
    log::info!("executing training sequence for {} ({})", file_name, kind);

    let mut candidate = kind.construct();
    let outcome = tokio::task::spawn_blocking(move || candidate.train(&path).map(|_| candidate))
        .await
        .map_err(join_error)?;

    match outcome {
        Ok(candidate) => {
            state.registry.write().install_candidate(candidate);
            log::info!("training complete, candidate awaiting review");
            Ok(())
        }
        Err(err) => {
            log::error!("training failed: {}", err);
            Err(AppError::Training(err.to_string()))
        }
    }
}

/// The two reports for the comparison view, `(previous, latest)`, or `None`
/// when no candidate is awaiting review. A never-trained active model shows
/// the "first training" sentinel as its previous report.
pub fn comparison_reports(state: &AppState) -> Option<(Report, Report)> {
    let registry = state.registry.read();
    let latest = registry.candidate_report()?.clone();
    let previous = registry
        .active_report()
        .cloned()
        .unwrap_or_else(Report::untrained);
    Some((previous, latest))
}

/// Promote the candidate: persist it, then make it the active model. Both
/// happen under the registry lock so promotion is atomic with respect to
/// other promotions, swaps, and prediction reads. When persistence fails the
/// candidate is restored for retry and the previous active model stays
/// authoritative.
pub async fn promote(state: Arc<AppState>) -> Result<(), AppError> {
    tokio::task::spawn_blocking(move || {
        let mut registry = state.registry.write();
        let candidate = registry.take_candidate().ok_or_else(|| {
            AppError::Training("no candidate model is awaiting review".to_string())
        })?;
        match persistence::save(&candidate, &state.config.model_path) {
            Ok(()) => {
                registry.promote(candidate);
                log::info!("changes accepted, candidate promoted to active model");
                Ok(())
            }
            Err(err) => {
                log::error!("promotion aborted, model could not be saved: {:#}", err);
                registry.restore_candidate(candidate);
                Err(AppError::Persistence(err.to_string()))
            }
        }
    })
    .await
    .map_err(join_error)?
}

/// Discard the candidate; the active model and durable blob are untouched.
pub fn discard(state: &AppState) {
    state.registry.write().discard();
    log::info!("changes rejected, candidate model discarded");
}

/// Predict with the active model on the named file in the prediction upload
/// directory; returns the name of the results file written to the download
/// directory. The model is cloned out of the registry so the (potentially
/// slow) prediction holds no lock.
pub async fn run_prediction(state: Arc<AppState>, file_name: &str) -> Result<String, AppError> {
    let path = state.config.predict_upload_dir.join(file_name);
    let download_dir = state.config.download_dir.clone();
    let model = state.registry.read().clone_active();

    let outcome = tokio::task::spawn_blocking(move || model.predict(&path, &download_dir))
        .await
        .map_err(join_error)?;

    outcome.map_err(|err| {
        log::error!("prediction failed: {}", err);
        match err {
            ModelError::NotTrained => AppError::Validation(
                "The active model has not been trained yet. Train it before requesting \
                 predictions."
                    .to_string(),
            ),
            other => AppError::Prediction(other.to_string()),
        }
    })
}
