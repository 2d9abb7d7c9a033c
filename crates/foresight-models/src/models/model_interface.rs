use std::path::Path;

use crate::error::ModelError;
use crate::kind::ModelKind;
use crate::report::Report;

/// The contract every model variant implements. The workflow, registry and
/// persistence layers depend on nothing beyond this trait: two variants are
/// interchangeable wherever it is used, and no cross-instance state exists.
pub trait ModelInterface {
    /// The variant tag of this model.
    fn kind(&self) -> ModelKind;

    /// Train on the CSV dataset at `dataset`, replacing any previous state
    /// of this instance. Either fully succeeds (a report is captured and
    /// returned) or fails with no report produced.
    fn train(&mut self, dataset: &Path) -> Result<Report, ModelError>;

    /// Predict on the CSV dataset at `dataset`, writing a results file into
    /// `output_dir` and returning its file name. Fails with
    /// [`ModelError::NotTrained`] when this instance has never been trained.
    fn predict(&self, dataset: &Path, output_dir: &Path) -> Result<String, ModelError>;

    /// The report captured by the most recent successful `train` call on
    /// this instance, or `None` if it has never been trained.
    fn report(&self) -> Option<&Report>;
}
