//! A small feed-forward neural network regressor: one tanh hidden layer,
//! linear output, trained with per-sample stochastic gradient descent on
//! standardized features and target.
use std::path::Path;

use ndarray::{Array1, Array2, ArrayView1, Axis};
use rand::distributions::Uniform;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::dataset;
use crate::error::ModelError;
use crate::kind::ModelKind;
use crate::models::dataset_stem;
use crate::models::model_interface::ModelInterface;
use crate::preprocessing::Standardizer;
use crate::report::Report;

const DEFAULT_HIDDEN: usize = 8;
const DEFAULT_EPOCHS: usize = 300;
const DEFAULT_LEARNING_RATE: f64 = 0.05;

// Fixed seed: retraining the same dataset yields the same weights, which
// keeps the before/after comparison meaningful across attempts.
const WEIGHT_SEED: u64 = 42;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct TrainedNet {
    scaler: Standardizer,
    target_mean: f64,
    target_scale: f64,
    w1: Array2<f64>,
    b1: Array1<f64>,
    w2: Array1<f64>,
    b2: f64,
}

impl TrainedNet {
    fn forward(&self, x: ArrayView1<f64>) -> f64 {
        let h = (self.w1.dot(&x) + &self.b1).mapv(f64::tanh);
        self.w2.dot(&h) + self.b2
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NeuralModel {
    hidden: usize,
    epochs: usize,
    learning_rate: f64,
    trained: Option<TrainedNet>,
    report: Option<Report>,
}

impl NeuralModel {
    pub fn new() -> Self {
        NeuralModel {
            hidden: DEFAULT_HIDDEN,
            epochs: DEFAULT_EPOCHS,
            learning_rate: DEFAULT_LEARNING_RATE,
            trained: None,
            report: None,
        }
    }
}

impl Default for NeuralModel {
    fn default() -> Self {
        NeuralModel::new()
    }
}

impl ModelInterface for NeuralModel {
    fn kind(&self) -> ModelKind {
        ModelKind::Neural
    }

    fn train(&mut self, path: &Path) -> Result<Report, ModelError> {
        let data = dataset::load_training(path).map_err(|e| ModelError::Training(e.to_string()))?;

        let scaler = Standardizer::fit(&data.features);
        let x = scaler.transform(&data.features);

        let target_mean = data.target.mean().unwrap_or(0.0);
        let mut target_scale = data.target.std(0.0);
        if target_scale < 1e-12 {
            target_scale = 1.0;
        }
        let y = data.target.mapv(|v| (v - target_mean) / target_scale);

        let n_rows = x.nrows();
        let n_features = x.ncols();
        let mut rng = StdRng::seed_from_u64(WEIGHT_SEED);

        let input_init = Uniform::new_inclusive(
            -1.0 / (n_features as f64).sqrt(),
            1.0 / (n_features as f64).sqrt(),
        );
        let hidden_init = Uniform::new_inclusive(
            -1.0 / (self.hidden as f64).sqrt(),
            1.0 / (self.hidden as f64).sqrt(),
        );
        let mut w1 = Array2::from_shape_fn((self.hidden, n_features), |_| rng.sample(input_init));
        let mut b1 = Array1::<f64>::zeros(self.hidden);
        let mut w2 = Array1::from_shape_fn(self.hidden, |_| rng.sample(hidden_init));
        let mut b2 = 0.0_f64;

        let lr = self.learning_rate;
        let mut order: Vec<usize> = (0..n_rows).collect();
        let mut epoch_mse = 0.0;

        for epoch in 0..self.epochs {
            order.shuffle(&mut rng);
            let mut sq_err = 0.0;
            for &i in &order {
                let x_i = x.row(i);
                let h = (w1.dot(&x_i) + &b1).mapv(f64::tanh);
                let out = w2.dot(&h) + b2;
                let err = out - y[i];
                sq_err += err * err;

                let grad_w2 = &h * err;
                let grad_h = (&w2 * err) * &h.mapv(|v| 1.0 - v * v);
                let grad_w1 = grad_h
                    .view()
                    .insert_axis(Axis(1))
                    .dot(&x_i.insert_axis(Axis(0)));

                w2.scaled_add(-lr, &grad_w2);
                b2 -= lr * err;
                w1.scaled_add(-lr, &grad_w1);
                b1.scaled_add(-lr, &grad_h);
            }
            epoch_mse = sq_err / n_rows as f64;
            if epoch % 100 == 0 {
                log::trace!("epoch {}: mse {:.6}", epoch, epoch_mse);
            }
        }

        // RMSE reported in the target's original units.
        let rmse = epoch_mse.sqrt() * target_scale;

        let mut report = Report::training(self.kind().label(), &data, rmse);
        report.push("Hidden units", self.hidden);
        report.push("Epochs", self.epochs);
        report.push("Learning rate", self.learning_rate);

        self.trained = Some(TrainedNet {
            scaler,
            target_mean,
            target_scale,
            w1,
            b1,
            w2,
            b2,
        });
        self.report = Some(report.clone());
        Ok(report)
    }

    fn predict(&self, path: &Path, output_dir: &Path) -> Result<String, ModelError> {
        let net = self.trained.as_ref().ok_or(ModelError::NotTrained)?;

        let input = dataset::load_prediction(path, net.scaler.n_features())
            .map_err(|e| ModelError::Prediction(e.to_string()))?;

        let predictions: Vec<f64> = input
            .features
            .rows()
            .into_iter()
            .map(|row| {
                let standardized = net.scaler.transform_row(row);
                net.forward(standardized.view()) * net.target_scale + net.target_mean
            })
            .collect();

        dataset::write_predictions(&input, &predictions, output_dir, &dataset_stem(path))
            .map_err(|e| ModelError::Prediction(e.to_string()))
    }

    fn report(&self) -> Option<&Report> {
        self.report.as_ref()
    }
}
