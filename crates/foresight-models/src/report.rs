//! Training reports: the ordered key/value statistics shown to the user
//! when deciding whether to accept or discard a newly trained model.
use chrono::Utc;
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;

use crate::dataset::Dataset;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportEntry {
    pub label: String,
    pub value: String,
}

/// An ordered collection of descriptive statistics produced by a
/// successful training run. Display/comparison only; no schema is
/// enforced beyond "serializable key/value pairs".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Report {
    entries: Vec<ReportEntry>,
}

impl Report {
    pub fn new() -> Self {
        Report::default()
    }

    pub fn push(&mut self, label: &str, value: impl ToString) {
        self.entries.push(ReportEntry {
            label: label.to_string(),
            value: value.to_string(),
        });
    }

    pub fn entries(&self) -> &[ReportEntry] {
        &self.entries
    }

    /// Look up an entry by label. Test and comparison helper.
    pub fn get(&self, label: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.label == label)
            .map(|e| e.value.as_str())
    }

    /// Shared descriptive statistics for a freshly trained model. Variant
    /// specific entries (epochs, regularization, ...) are appended by the
    /// model itself.
    pub fn training(kind_label: &str, dataset: &Dataset, rmse: f64) -> Report {
        let mut report = Report::new();
        report.push("Model", kind_label);
        report.push("Trained at", Utc::now().format("%Y-%m-%d %H:%M:%S UTC"));
        report.push("Training rows", dataset.n_rows());
        report.push("Feature columns", dataset.n_features());
        report.push("Target column", dataset.headers.last().map(String::as_str).unwrap_or("?"));
        report.push("Target mean", format!("{:.4}", dataset.target.iter().mean()));
        report.push("Target std dev", format!("{:.4}", dataset.target.iter().std_dev()));
        report.push("Target min", format!("{:.4}", Statistics::min(dataset.target.iter())));
        report.push("Target max", format!("{:.4}", Statistics::max(dataset.target.iter())));
        report.push("Training RMSE", format!("{:.4}", rmse));
        report
    }

    /// Sentinel shown as the "previous" side of the comparison when the
    /// active model has never been trained.
    pub fn untrained() -> Report {
        let mut report = Report::new();
        report.push(
            "No model has been trained before",
            "This is the first training of the model.",
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array1, Array2};

    fn sample_dataset() -> Dataset {
        Dataset {
            headers: vec!["x".to_string(), "y".to_string()],
            features: Array2::from_shape_vec((4, 1), vec![1.0, 2.0, 3.0, 4.0]).unwrap(),
            target: Array1::from_vec(vec![2.0, 4.0, 6.0, 8.0]),
        }
    }

    #[test]
    fn entries_keep_insertion_order() {
        let report = Report::training("ridge regression", &sample_dataset(), 0.1);
        let labels: Vec<_> = report.entries().iter().map(|e| e.label.as_str()).collect();
        assert_eq!(labels[0], "Model");
        assert_eq!(*labels.last().unwrap(), "Training RMSE");
    }

    #[test]
    fn training_report_carries_target_stats() {
        let report = Report::training("neural network", &sample_dataset(), 0.25);
        assert_eq!(report.get("Model"), Some("neural network"));
        assert_eq!(report.get("Training rows"), Some("4"));
        assert_eq!(report.get("Target mean"), Some("5.0000"));
        assert_eq!(report.get("Target min"), Some("2.0000"));
        assert_eq!(report.get("Target max"), Some("8.0000"));
        assert_eq!(report.get("Training RMSE"), Some("0.2500"));
    }

    #[test]
    fn sentinel_mentions_first_training() {
        let report = Report::untrained();
        assert_eq!(
            report.get("No model has been trained before"),
            Some("This is the first training of the model.")
        );
    }
}
