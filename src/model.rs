//! ONNX classifier loading and inference.

use anyhow::{Context, Result};
use ndarray::Array2;
use ort::session::Session;
use ort::value::Tensor;
use std::path::Path;
use std::sync::Mutex;

use crate::config::ModelConfig;

/// Binary classifier scoring a batch of feature rows.
pub trait Classifier {
    /// Probability of the positive class (home win) for each row, in row order.
    ///
    /// # Arguments
    /// * `features` - 2D array of shape (n_rows, n_features)
    fn predict_proba(&self, features: Array2<f32>) -> Result<Vec<f64>>;
}

impl<T: Classifier + ?Sized> Classifier for &T {
    fn predict_proba(&self, features: Array2<f32>) -> Result<Vec<f64>> {
        (**self).predict_proba(features)
    }
}

/// ONNX model wrapper for a binary classifier exported with probability
/// tensor output (e.g. skl2onnx with `zipmap=False`).
pub struct OnnxClassifier {
    session: Mutex<Session>,
    probability_output: usize,
    positive_class: usize,
}

impl OnnxClassifier {
    /// Load ONNX model from file.
    pub fn load<P: AsRef<Path>>(path: P, config: &ModelConfig) -> Result<Self> {
        let path = path.as_ref();
        let session = Session::builder()?
            .with_optimization_level(ort::session::builder::GraphOptimizationLevel::Level3)?
            .with_intra_threads(1)?
            .commit_from_file(path)
            .with_context(|| format!("Failed to load ONNX model from {}", path.display()))?;

        Ok(Self {
            session: Mutex::new(session),
            probability_output: config.probability_output,
            positive_class: config.positive_class,
        })
    }

    /// Load the model named in the configuration.
    pub fn from_config(config: &ModelConfig) -> Result<Self> {
        Self::load(&config.path, config)
    }
}

impl Classifier for OnnxClassifier {
    fn predict_proba(&self, features: Array2<f32>) -> Result<Vec<f64>> {
        let n_rows = features.nrows();

        let input_tensor = Tensor::from_array(features)?;

        let mut session = self
            .session
            .lock()
            .map_err(|e| anyhow::anyhow!("Failed to lock session: {}", e))?;

        let outputs = session
            .run(ort::inputs![input_tensor])
            .context("Model inference failed (feature width may not match the model)")?;

        if outputs.len() <= self.probability_output {
            anyhow::bail!(
                "Model has {} outputs, expected probabilities at index {}",
                outputs.len(),
                self.probability_output
            );
        }

        // Shape is [n_rows, n_classes]
        let (shape, probs_data) = outputs[self.probability_output]
            .try_extract_tensor::<f32>()
            .context("Failed to extract probability tensor")?;

        let shape_dims: Vec<i64> = shape.iter().copied().collect();
        if shape_dims.len() != 2
            || shape_dims[0] as usize != n_rows
            || shape_dims[1] as usize <= self.positive_class
        {
            anyhow::bail!(
                "Unexpected output shape: {:?}, expected [{}, >{}]",
                shape_dims,
                n_rows,
                self.positive_class
            );
        }

        let n_cols = shape_dims[1] as usize;

        Ok((0..n_rows)
            .map(|i| probs_data[i * n_cols + self.positive_class] as f64)
            .collect())
    }
}
