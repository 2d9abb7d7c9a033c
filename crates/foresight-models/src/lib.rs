//! foresight-models: the model layer of the Foresight web application.
//!
//! This crate provides two interchangeable regression models (a small
//! feed-forward neural network and a ridge regression) behind a common
//! trait, CSV dataset loading, and the key/value training reports shown
//! to the user for before/after comparison.
//!
//! The design favors small, testable modules: everything a model learns
//! is plain serde data so a whole model can be persisted and reloaded as
//! a single blob.
pub mod dataset;
pub mod error;
pub mod kind;
pub mod models;
pub mod preprocessing;
pub mod report;

pub use error::ModelError;
pub use kind::ModelKind;
pub use models::model_interface::ModelInterface;
pub use models::Model;
pub use report::Report;
