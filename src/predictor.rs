//! Batch scoring of assembled feature rows.

use anyhow::{bail, Result};
use tracing::{debug, info};

use crate::features::FeatureMatrix;
use crate::model::Classifier;
use crate::types::Prediction;

/// Scores a feature matrix with a classifier
pub struct Predictor<'a, C: Classifier> {
    classifier: &'a C,
}

impl<'a, C: Classifier> Predictor<'a, C> {
    pub fn new(classifier: &'a C) -> Self {
        Self { classifier }
    }

    /// One prediction per row, in row order. The whole matrix is scored in
    /// a single classifier call; an empty matrix skips the classifier.
    pub fn predict(&self, matrix: &FeatureMatrix) -> Result<Vec<Prediction>> {
        if matrix.is_empty() {
            info!("No matchups to score");
            return Ok(Vec::new());
        }

        let probs = self.classifier.predict_proba(matrix.to_array())?;

        if probs.len() != matrix.len() {
            bail!(
                "Classifier returned {} probabilities for {} rows",
                probs.len(),
                matrix.len()
            );
        }

        let predictions = matrix
            .matchups()
            .zip(probs)
            .map(|(matchup, prob)| {
                if !(0.0..=1.0).contains(&prob) {
                    bail!("Probability {} out of range for {}", prob, matchup);
                }
                let prediction = Prediction::from_probability(matchup, prob);
                debug!("{}: p(home)={:.3} -> {}", matchup, prob, prediction.winner);
                Ok(prediction)
            })
            .collect::<Result<Vec<_>>>()?;

        info!("Scored {} matchups", predictions.len());

        Ok(predictions)
    }
}
