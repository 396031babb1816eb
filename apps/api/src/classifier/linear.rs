//! Linear classifier: one weight row per class, argmax over decision scores.
//!
//! Binary models may store a single row; a positive score selects `classes[1]`.

use serde::{Deserialize, Serialize};

use crate::classifier::{Classifier, FeatureVector, ModelError};

/// How (and whether) decision scores are turned into class probabilities.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProbabilityMode {
    /// Scores only (e.g. a linear SVM). No confidence is reported.
    #[default]
    None,
    /// Multinomial: softmax over all class scores.
    Softmax,
    /// One logistic model per class, sigmoid outputs renormalized to sum to 1.
    OneVsRest,
}

/// On-disk form of a fitted linear classifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearArtifact {
    pub classes: Vec<i64>,
    pub coef: Vec<Vec<f64>>,
    pub intercept: Vec<f64>,
    #[serde(default)]
    pub probability: ProbabilityMode,
}

#[derive(Debug)]
pub struct LinearClassifier {
    classes: Vec<i64>,
    coef: Vec<Vec<f64>>,
    intercept: Vec<f64>,
    n_features: usize,
    probability: ProbabilityMode,
}

impl LinearClassifier {
    pub fn from_artifact(artifact: LinearArtifact) -> Result<Self, ModelError> {
        let n_classes = artifact.classes.len();
        let n_rows = artifact.coef.len();

        if n_classes < 2 {
            return Err(ModelError::Invalid(format!(
                "classifier needs at least 2 classes, found {n_classes}"
            )));
        }
        let rows_ok = n_rows == n_classes || (n_classes == 2 && n_rows == 1);
        if !rows_ok {
            return Err(ModelError::Invalid(format!(
                "{n_rows} coefficient rows for {n_classes} classes"
            )));
        }
        if artifact.intercept.len() != n_rows {
            return Err(ModelError::Invalid(format!(
                "{} intercepts for {n_rows} coefficient rows",
                artifact.intercept.len()
            )));
        }

        let n_features = artifact.coef[0].len();
        if n_features == 0 || artifact.coef.iter().any(|row| row.len() != n_features) {
            return Err(ModelError::Invalid(
                "coefficient rows must be non-empty and equally sized".to_string(),
            ));
        }

        Ok(Self {
            classes: artifact.classes,
            coef: artifact.coef,
            intercept: artifact.intercept,
            n_features,
            probability: artifact.probability,
        })
    }

    pub fn probability_mode(&self) -> ProbabilityMode {
        self.probability
    }

    pub fn decision_function(&self, features: &FeatureVector) -> Result<Vec<f64>, ModelError> {
        if features.dim() != self.n_features {
            return Err(ModelError::DimensionMismatch {
                expected: self.n_features,
                actual: features.dim(),
            });
        }

        let scores: Vec<f64> = self
            .coef
            .iter()
            .zip(&self.intercept)
            .map(|(row, b)| features.dot(row) + b)
            .collect();

        if scores.iter().any(|s| !s.is_finite()) {
            return Err(ModelError::Prediction(
                "classifier produced a non-finite decision score".to_string(),
            ));
        }
        Ok(scores)
    }

    fn is_single_row_binary(&self) -> bool {
        self.coef.len() == 1
    }
}

impl Classifier for LinearClassifier {
    fn classes(&self) -> &[i64] {
        &self.classes
    }

    fn n_features(&self) -> Option<usize> {
        Some(self.n_features)
    }

    fn predict(&self, features: &FeatureVector) -> Result<i64, ModelError> {
        let scores = self.decision_function(features)?;

        if self.is_single_row_binary() {
            let idx = usize::from(scores[0] > 0.0);
            return Ok(self.classes[idx]);
        }

        // First maximum wins on ties.
        let mut best = 0;
        for (i, &s) in scores.iter().enumerate().skip(1) {
            if s > scores[best] {
                best = i;
            }
        }
        Ok(self.classes[best])
    }

    fn predict_proba(&self, features: &FeatureVector) -> Result<Option<Vec<f64>>, ModelError> {
        if self.probability == ProbabilityMode::None {
            return Ok(None);
        }
        let scores = self.decision_function(features)?;

        if self.is_single_row_binary() {
            let p = sigmoid(scores[0]);
            return Ok(Some(vec![1.0 - p, p]));
        }

        let probs = match self.probability {
            ProbabilityMode::Softmax => softmax(&scores),
            ProbabilityMode::OneVsRest => {
                let raw: Vec<f64> = scores.iter().map(|&s| sigmoid(s)).collect();
                let total: f64 = raw.iter().sum();
                if total <= 0.0 {
                    return Err(ModelError::Prediction(
                        "one-vs-rest probabilities sum to zero".to_string(),
                    ));
                }
                raw.iter().map(|p| p / total).collect()
            }
            ProbabilityMode::None => unreachable!("handled above"),
        };
        Ok(Some(probs))
    }
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

fn softmax(scores: &[f64]) -> Vec<f64> {
    let max = scores.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let exp: Vec<f64> = scores.iter().map(|s| (s - max).exp()).collect();
    let sum: f64 = exp.iter().sum();
    exp.iter().map(|e| e / sum).collect()
}
