//! Ridge regression solved in closed form via the normal equations.
use std::path::Path;

use ndarray::{Array1, Array2, ArrayView1};
use serde::{Deserialize, Serialize};

use crate::dataset;
use crate::error::ModelError;
use crate::kind::ModelKind;
use crate::models::dataset_stem;
use crate::models::model_interface::ModelInterface;
use crate::preprocessing::Standardizer;
use crate::report::Report;

const DEFAULT_LAMBDA: f64 = 1.0;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct TrainedRidge {
    scaler: Standardizer,
    coefficients: Array1<f64>,
    intercept: f64,
}

impl TrainedRidge {
    fn forward(&self, x: ArrayView1<f64>) -> f64 {
        self.coefficients.dot(&self.scaler.transform_row(x)) + self.intercept
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RidgeModel {
    lambda: f64,
    trained: Option<TrainedRidge>,
    report: Option<Report>,
}

impl RidgeModel {
    pub fn new() -> Self {
        RidgeModel {
            lambda: DEFAULT_LAMBDA,
            trained: None,
            report: None,
        }
    }
}

impl Default for RidgeModel {
    fn default() -> Self {
        RidgeModel::new()
    }
}

/// Solve `a * x = b` by Gaussian elimination with partial pivoting.
///
/// The ridge system `XᵀX + λI` is symmetric positive definite for λ > 0, so
/// this always succeeds on well-formed input; `None` signals a numerically
/// singular system.
///
/// # Arguments
///
/// * `a` - The coefficient matrix (consumed; must be square).
/// * `b` - The right-hand side (consumed; same length as `a`'s side).
///
/// # Returns
///
/// The solution vector, or `None` if a pivot collapses to zero.
fn solve_linear_system(mut a: Array2<f64>, mut b: Array1<f64>) -> Option<Array1<f64>> {
    let n = b.len();
    debug_assert_eq!(a.nrows(), n);
    debug_assert_eq!(a.ncols(), n);

    for col in 0..n {
        let mut pivot = col;
        for row in col + 1..n {
            if a[[row, col]].abs() > a[[pivot, col]].abs() {
                pivot = row;
            }
        }
        if a[[pivot, col]].abs() < 1e-12 {
            return None;
        }
        if pivot != col {
            for k in 0..n {
                let tmp = a[[col, k]];
                a[[col, k]] = a[[pivot, k]];
                a[[pivot, k]] = tmp;
            }
            b.swap(col, pivot);
        }
        for row in col + 1..n {
            let factor = a[[row, col]] / a[[col, col]];
            if factor == 0.0 {
                continue;
            }
            for k in col..n {
                a[[row, k]] -= factor * a[[col, k]];
            }
            b[row] -= factor * b[col];
        }
    }

    let mut x = Array1::<f64>::zeros(n);
    for row in (0..n).rev() {
        let mut sum = b[row];
        for k in row + 1..n {
            sum -= a[[row, k]] * x[k];
        }
        x[row] = sum / a[[row, row]];
    }
    Some(x)
}

impl ModelInterface for RidgeModel {
    fn kind(&self) -> ModelKind {
        ModelKind::Ridge
    }

    fn train(&mut self, path: &Path) -> Result<Report, ModelError> {
        let data = dataset::load_training(path).map_err(|e| ModelError::Training(e.to_string()))?;

        let scaler = Standardizer::fit(&data.features);
        let x = scaler.transform(&data.features);

        let intercept = data.target.mean().unwrap_or(0.0);
        let centered = data.target.mapv(|v| v - intercept);

        // Normal equations on standardized, centered data; the intercept is
        // the target mean and stays unpenalized.
        let mut gram = x.t().dot(&x);
        for i in 0..gram.nrows() {
            gram[[i, i]] += self.lambda;
        }
        let rhs = x.t().dot(&centered);

        let coefficients = solve_linear_system(gram, rhs).ok_or_else(|| {
            ModelError::Training("the normal equations are numerically singular".to_string())
        })?;

        let residuals = &x.dot(&coefficients) - &centered;
        let rmse = (residuals.mapv(|v| v * v).sum() / data.n_rows() as f64).sqrt();

        let mut report = Report::training(self.kind().label(), &data, rmse);
        report.push("Regularization lambda", self.lambda);

        self.trained = Some(TrainedRidge {
            scaler,
            coefficients,
            intercept,
        });
        self.report = Some(report.clone());
        Ok(report)
    }

    fn predict(&self, path: &Path, output_dir: &Path) -> Result<String, ModelError> {
        let fit = self.trained.as_ref().ok_or(ModelError::NotTrained)?;

        let input = dataset::load_prediction(path, fit.scaler.n_features())
            .map_err(|e| ModelError::Prediction(e.to_string()))?;

        let predictions: Vec<f64> = input
            .features
            .rows()
            .into_iter()
            .map(|row| fit.forward(row))
            .collect();

        dataset::write_predictions(&input, &predictions, output_dir, &dataset_stem(path))
            .map_err(|e| ModelError::Prediction(e.to_string()))
    }

    fn report(&self) -> Option<&Report> {
        self.report.as_ref()
    }
}
