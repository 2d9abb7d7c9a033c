//! Feature standardization shared by the model variants.
use ndarray::{Array1, Array2, ArrayView1, Axis};
use serde::{Deserialize, Serialize};

/// Per-column standardization (zero mean, unit variance) fitted on the
/// training features and reapplied to prediction input. Constant columns
/// keep a scale of 1 so transformed values stay finite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Standardizer {
    mean: Array1<f64>,
    scale: Array1<f64>,
}

impl Standardizer {
    pub fn fit(features: &Array2<f64>) -> Self {
        let mean = features
            .mean_axis(Axis(0))
            .unwrap_or_else(|| Array1::zeros(features.ncols()));
        let scale = features
            .std_axis(Axis(0), 0.0)
            .mapv(|s| if s < 1e-12 { 1.0 } else { s });
        Standardizer { mean, scale }
    }

    pub fn n_features(&self) -> usize {
        self.mean.len()
    }

    pub fn transform(&self, features: &Array2<f64>) -> Array2<f64> {
        (features - &self.mean) / &self.scale
    }

    pub fn transform_row(&self, row: ArrayView1<f64>) -> Array1<f64> {
        (&row - &self.mean) / &self.scale
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn standardizes_columns_independently() {
        let x = array![[1.0, 10.0], [3.0, 30.0]];
        let scaler = Standardizer::fit(&x);
        let t = scaler.transform(&x);
        assert!((t.column(0).sum()).abs() < 1e-9);
        assert!((t.column(1).sum()).abs() < 1e-9);
        assert!((t[[0, 0]] + 1.0).abs() < 1e-9);
        assert!((t[[1, 0]] - 1.0).abs() < 1e-9);
    }

    #[test]
    fn constant_column_stays_finite() {
        let x = array![[5.0], [5.0], [5.0]];
        let scaler = Standardizer::fit(&x);
        let t = scaler.transform(&x);
        assert!(t.iter().all(|v| v.is_finite()));
        assert!(t.iter().all(|v| v.abs() < 1e-9));
    }
}
