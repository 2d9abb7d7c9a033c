//! foresight-web: the Foresight web application.
//!
//! Routes, session state, the process-wide model registry, the
//! training-review-promotion workflow, and model persistence. The model
//! mathematics live in `foresight-models`; this crate is the glue that
//! moves a candidate model from "just trained" to "the model used for
//! predictions".
pub mod config;
pub mod error;
pub mod handlers;
pub mod pages;
pub mod persistence;
pub mod registry;
pub mod session;
pub mod state;
pub mod upload;
pub mod workflow;
