//! Route handlers. Every collaborator failure is caught here (or in the
//! workflow) and reduced to a redirect-with-session-error or an error page;
//! none of them can take the process down.
use std::sync::Arc;

use axum::extract::{Multipart, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::routing::get;
use axum::{Form, Router};
use foresight_models::Report;
use serde::Deserialize;
use tower_sessions::Session;

use crate::error::AppError;
use crate::pages;
use crate::session::SessionData;
use crate::state::AppState;
use crate::upload;
use crate::workflow;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/train", get(train_form).post(train_submit))
        .route(
            "/training_in_progress",
            get(training_loading).post(training_run),
        )
        .route(
            "/train_result",
            get(train_result_view).post(train_result_decision),
        )
        .route("/loading", get(accept_loading).post(accept_commit))
        .route("/predict", get(predict_form).post(predict_submit))
        .route("/download", get(download))
        .route("/change_model", get(change_model).post(change_model))
        .with_state(state)
}

fn multipart_error(err: axum::extract::multipart::MultipartError) -> AppError {
    AppError::Validation(format!("malformed upload: {}", err))
}

/// The parts of an upload form we care about: the file (when one was
/// chosen) and whether the "Change Model" button was pressed.
async fn read_upload_form(
    multipart: &mut Multipart,
) -> Result<(Option<(String, Vec<u8>)>, bool), AppError> {
    let mut file = None;
    let mut change_requested = false;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "file" => {
                let original = field.file_name().unwrap_or("").to_string();
                let bytes = field.bytes().await.map_err(multipart_error)?;
                if !original.is_empty() {
                    file = Some((original, bytes.to_vec()));
                }
            }
            "change" => {
                change_requested = field
                    .text()
                    .await
                    .map(|value| value == "Change Model")
                    .unwrap_or(false);
            }
            _ => {}
        }
    }
    Ok((file, change_requested))
}

async fn home(session: Session) -> Result<Redirect, AppError> {
    log::info!("initial redirect");
    let mut data = SessionData::load(&session).await?;
    data.changed_model = false;
    data.store(&session).await?;
    Ok(Redirect::to("/train"))
}

async fn train_form(
    State(state): State<Arc<AppState>>,
    session: Session,
) -> Result<Html<String>, AppError> {
    let mut data = SessionData::load(&session).await?;
    let notice = data.take_notice();
    let error = data.take_error();
    data.store(&session).await?;

    let label = state.registry.read().active_kind().label();
    Ok(pages::train_page(label, notice, error.as_deref()))
}

async fn train_submit(
    State(state): State<Arc<AppState>>,
    session: Session,
    mut multipart: Multipart,
) -> Result<Response, AppError> {
    let (file, change_requested) = read_upload_form(&mut multipart).await?;

    if let Some((original, bytes)) = file {
        if !upload::allowed_file(&original) {
            log::warn!("rejected training upload with disallowed extension: {}", original);
            let label = state.registry.read().active_kind().label();
            return Ok(pages::train_page(
                label,
                false,
                Some("Only .csv files can be used for training."),
            )
            .into_response());
        }
        let name = upload::sanitize_file_name(&original).ok_or_else(|| {
            AppError::Validation("The uploaded file name is not usable.".to_string())
        })?;
        upload::save_upload(&state.config.train_upload_dir, &name, &bytes).await?;
        log::info!("training file {} saved", name);

        let mut data = SessionData::load(&session).await?;
        data.training_file = Some(name);
        data.store(&session).await?;
        return Ok(Redirect::to("/training_in_progress").into_response());
    }

    if change_requested {
        return Ok(Redirect::to("/change_model").into_response());
    }

    let label = state.registry.read().active_kind().label();
    Ok(pages::train_page(label, false, Some("Please choose a .csv file to upload.")).into_response())
}

async fn training_loading() -> Html<String> {
    pages::training_progress_page()
}

async fn training_run(
    State(state): State<Arc<AppState>>,
    session: Session,
) -> Result<Redirect, AppError> {
    let mut data = SessionData::load(&session).await?;
    let Some(file_name) = data.training_file.clone() else {
        data.error = Some("No training dataset has been uploaded yet.".to_string());
        data.store(&session).await?;
        return Ok(Redirect::to("/train"));
    };

    match workflow::run_training(state.clone(), &file_name).await {
        Ok(()) => {
            data.error = None;
            data.store(&session).await?;
            Ok(Redirect::to("/train_result"))
        }
        Err(err) => {
            data.error = Some(err.user_message());
            data.store(&session).await?;
            Ok(Redirect::to("/train"))
        }
    }
}

async fn train_result_view(State(state): State<Arc<AppState>>) -> Response {
    match workflow::comparison_reports(&state) {
        Some((previous, latest)) => {
            log::info!("training results rendered");
            pages::train_result_page(&previous, &latest, None).into_response()
        }
        None => Redirect::to("/train").into_response(),
    }
}

#[derive(Deserialize)]
struct Decision {
    accept: Option<String>,
}

async fn train_result_decision(
    State(state): State<Arc<AppState>>,
    Form(decision): Form<Decision>,
) -> Response {
    match decision.accept.as_deref() {
        Some("Accept Changes") => {
            log::info!("changes accepted");
            Redirect::to("/loading").into_response()
        }
        Some("Discard Changes") => {
            workflow::discard(&state);
            Redirect::to("/train").into_response()
        }
        // A decision-less re-submission re-renders the comparison; if the
        // reports cannot be gathered the review stays open with whatever we
        // have, alongside a generic error.
        _ => match workflow::comparison_reports(&state) {
            Some((previous, latest)) => {
                pages::train_result_page(&previous, &latest, None).into_response()
            }
            None => {
                log::error!("training results requested with no candidate in the registry");
                pages::train_result_page(
                    &Report::untrained(),
                    &Report::untrained(),
                    Some("Unable to gather model training results."),
                )
                .into_response()
            }
        },
    }
}

async fn accept_loading() -> Html<String> {
    pages::accepted_page()
}

async fn accept_commit(
    State(state): State<Arc<AppState>>,
    session: Session,
) -> Result<Redirect, AppError> {
    let mut data = SessionData::load(&session).await?;
    match workflow::promote(state.clone()).await {
        Ok(()) => {
            data.error = None;
        }
        Err(err) => {
            data.error = Some(err.user_message());
        }
    }
    data.store(&session).await?;
    Ok(Redirect::to("/train"))
}

async fn predict_form() -> Html<String> {
    log::info!("currently on prediction page");
    pages::predict_page(None)
}

async fn predict_submit(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Response, AppError> {
    let (file, _) = read_upload_form(&mut multipart).await?;

    let Some((original, bytes)) = file else {
        return Ok(pages::predict_page(Some("Please choose a .csv file to upload.")).into_response());
    };
    if !upload::allowed_file(&original) {
        log::warn!("rejected prediction upload with disallowed extension: {}", original);
        return Ok(
            pages::predict_page(Some("Only .csv files can be used for predictions."))
                .into_response(),
        );
    }
    let name = upload::sanitize_file_name(&original).ok_or_else(|| {
        AppError::Validation("The uploaded file name is not usable.".to_string())
    })?;
    upload::save_upload(&state.config.predict_upload_dir, &name, &bytes).await?;
    log::info!("prediction file {} saved", name);

    match workflow::run_prediction(state.clone(), &name).await {
        Ok(result_name) => Ok(Redirect::to(&format!("/download?file={}", result_name)).into_response()),
        Err(err) => Ok(pages::predict_page(Some(&err.user_message())).into_response()),
    }
}

#[derive(Deserialize)]
struct DownloadQuery {
    file: String,
}

async fn download(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DownloadQuery>,
) -> Response {
    if !upload::is_bare_file_name(&query.file) {
        log::warn!("rejected download request for {}", query.file);
        return (
            StatusCode::BAD_REQUEST,
            pages::error_page("Unknown error occurred."),
        )
            .into_response();
    }

    match tokio::fs::read(state.config.download_dir.join(&query.file)).await {
        Ok(bytes) => {
            log::info!("downloading processed file {}", query.file);
            (
                [
                    (header::CONTENT_TYPE, "text/csv".to_string()),
                    (
                        header::CONTENT_DISPOSITION,
                        format!("attachment; filename=\"{}\"", query.file),
                    ),
                ],
                bytes,
            )
                .into_response()
        }
        Err(err) => {
            log::error!("download of {} failed: {}", query.file, err);
            (
                StatusCode::NOT_FOUND,
                pages::error_page("Unknown error occurred."),
            )
                .into_response()
        }
    }
}

async fn change_model(
    State(state): State<Arc<AppState>>,
    session: Session,
) -> Result<Redirect, AppError> {
    state.registry.write().swap();

    let mut data = SessionData::load(&session).await?;
    data.changed_model = true;
    data.store(&session).await?;
    Ok(Redirect::to("/train"))
}
