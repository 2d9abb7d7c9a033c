//! HTML rendering for every page the application serves.
use axum::response::Html;
use foresight_models::Report;
use maud::{html, Markup, PreEscaped, DOCTYPE};

const STYLE: &str = "\
body{font-family:sans-serif;margin:2em auto;max-width:56em;padding:0 1em;color:#222;}\
nav a{margin-right:1.2em;}\
table{border-collapse:collapse;margin:1em 0;}\
th,td{border:1px solid #aaa;padding:0.3em 0.8em;text-align:left;}\
.notice{background:#e8f4e2;border:1px solid #5a8a4a;padding:0.6em;}\
.error{background:#f7e0e0;border:1px solid #a85454;padding:0.6em;}\
form{margin:1em 0;}";

fn layout(title: &str, body: Markup) -> Html<String> {
    let markup = html! {
        (DOCTYPE)
        html {
            head {
                meta charset="utf-8";
                title { (title) " - Foresight" }
                style { (PreEscaped(STYLE)) }
            }
            body {
                nav {
                    a href="/train" { "Training" }
                    a href="/predict" { "Prediction" }
                }
                h1 { (title) }
                (body)
            }
        }
    };
    Html(markup.into_string())
}

fn report_table(title: &str, report: &Report) -> Markup {
    html! {
        h2 { (title) }
        table {
            @for entry in report.entries() {
                tr {
                    th { (entry.label) }
                    td { (entry.value) }
                }
            }
        }
    }
}

/// A page that advances on its own by re-submitting as a POST, with a
/// fallback button for browsers without scripting.
fn auto_advance(action: &str, label: &str) -> Markup {
    html! {
        form id="advance" method="post" action=(action) {
            noscript { input type="submit" value=(label); }
        }
        script { (PreEscaped("document.getElementById('advance').submit();")) }
    }
}

pub fn train_page(active_label: &str, model_changed: bool, error: Option<&str>) -> Html<String> {
    layout(
        "Train a model",
        html! {
            @if model_changed {
                p class="notice" {
                    "The model type was changed. The " (active_label)
                    " model is now active."
                }
            }
            @if let Some(message) = error {
                p class="error" { (message) }
            }
            p { "Active model: " b { (active_label) } }
            form method="post" action="/train" enctype="multipart/form-data" {
                label for="file" { "Training dataset (.csv): " }
                input type="file" name="file" id="file";
                input type="submit" name="upload" value="Upload";
                input type="submit" name="change" value="Change Model";
            }
        },
    )
}

pub fn training_progress_page() -> Html<String> {
    layout(
        "Training in progress",
        html! {
            p { "Training the model on the uploaded dataset. This can take a moment; \
                 the page advances automatically." }
            (auto_advance("/training_in_progress", "Continue"))
        },
    )
}

pub fn train_result_page(previous: &Report, latest: &Report, error: Option<&str>) -> Html<String> {
    layout(
        "Training results",
        html! {
            @if let Some(message) = error {
                p class="error" { (message) }
            }
            p { "Review the newly trained model against the previous one, then accept \
                 or discard the changes." }
            (report_table("Previous model", previous))
            (report_table("New model", latest))
            form method="post" action="/train_result" {
                input type="submit" name="accept" value="Accept Changes";
                input type="submit" name="accept" value="Discard Changes";
            }
        },
    )
}

pub fn accepted_page() -> Html<String> {
    layout(
        "Saving the accepted model",
        html! {
            p { "The new model is being promoted and saved. The page advances \
                 automatically." }
            (auto_advance("/loading", "Continue"))
        },
    )
}

pub fn predict_page(error: Option<&str>) -> Html<String> {
    layout(
        "Predict",
        html! {
            @if let Some(message) = error {
                p class="error" { (message) }
            }
            p { "Upload a dataset with the same feature columns the active model was \
                 trained on; the predictions come back as a CSV download." }
            form method="post" action="/predict" enctype="multipart/form-data" {
                label for="file" { "Prediction dataset (.csv): " }
                input type="file" name="file" id="file";
                input type="submit" value="Upload and predict";
            }
        },
    )
}

pub fn error_page(message: &str) -> Html<String> {
    layout(
        "Something went wrong",
        html! {
            p class="error" { (message) }
            p { a href="/train" { "Back to the training page" } }
        },
    )
}
