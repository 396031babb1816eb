//! Pre-fit resume model: a TF-IDF vectorizer feeding a linear classifier.
//!
//! Both artifacts are JSON documents loaded once at startup into a `ModelBundle`.
//! The bundle is immutable afterwards and shared by every request through `AppState`.
//!
//! Backends sit behind the `Vectorizer` / `Classifier` traits so handlers and
//! tests can swap them without touching the screening pipeline.

pub mod labels;
pub mod linear;
pub mod tfidf;

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

pub use linear::LinearClassifier;
pub use tfidf::TfidfVectorizer;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("Failed to read model artifact '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse model artifact '{path}': {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid model artifact: {0}")]
    Invalid(String),

    #[error("Feature dimension mismatch: model expects {expected} features, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Classifier labels {0:?} have no entry in the category table")]
    UnmappedLabels(Vec<i64>),

    #[error("{0}")]
    Prediction(String),
}

// ────────────────────────────────────────────────────────────────────────────
// Feature vectors
// ────────────────────────────────────────────────────────────────────────────

/// Sparse feature vector produced by a `Vectorizer` for a single document.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    dim: usize,
    /// (column, value), sorted by column, no duplicates.
    entries: Vec<(usize, f64)>,
}

impl FeatureVector {
    pub fn new(dim: usize, mut entries: Vec<(usize, f64)>) -> Self {
        entries.retain(|&(col, _)| col < dim);
        entries.sort_by_key(|&(col, _)| col);
        entries.dedup_by_key(|(col, _)| *col);
        Self { dim, entries }
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    #[cfg(test)]
    pub fn entries(&self) -> &[(usize, f64)] {
        &self.entries
    }

    pub fn nnz(&self) -> usize {
        self.entries.len()
    }

    /// Dot product with a dense weight row. Columns past the row's end contribute 0.
    pub fn dot(&self, weights: &[f64]) -> f64 {
        self.entries
            .iter()
            .filter_map(|&(col, value)| weights.get(col).map(|w| w * value))
            .sum()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Traits
// ────────────────────────────────────────────────────────────────────────────

/// A fitted text → feature transform.
pub trait Vectorizer: Send + Sync {
    fn n_features(&self) -> usize;

    fn transform(&self, text: &str) -> FeatureVector;
}

/// A fitted feature → label model.
pub trait Classifier: Send + Sync {
    /// Labels this model can emit.
    fn classes(&self) -> &[i64];

    /// Input width, when the backend knows it.
    fn n_features(&self) -> Option<usize> {
        None
    }

    fn predict(&self, features: &FeatureVector) -> Result<i64, ModelError>;

    /// Per-class probabilities in `classes()` order.
    /// `Ok(None)` means the backend has no probability output.
    fn predict_proba(&self, _features: &FeatureVector) -> Result<Option<Vec<f64>>, ModelError> {
        Ok(None)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Prediction output
// ────────────────────────────────────────────────────────────────────────────

/// Highest class probability reported for a prediction. Always within [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct Confidence(f64);

impl Confidence {
    pub fn from_probability(p: f64) -> Option<Self> {
        (p.is_finite() && (0.0..=1.0).contains(&p)).then_some(Self(p))
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}%", self.0 * 100.0)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PredictionResult {
    pub label: i64,
    pub category: String,
    pub confidence: Option<Confidence>,
}

impl PredictionResult {
    pub fn new(label: i64, confidence: Option<Confidence>) -> Self {
        Self {
            label,
            category: labels::map_label(label).into_owned(),
            confidence,
        }
    }
}

/// Max entry of a probability vector, or `None` if the vector is empty or malformed.
pub fn confidence_from_probabilities(probs: &[f64]) -> Option<Confidence> {
    if probs.is_empty() || probs.iter().any(|p| !p.is_finite()) {
        return None;
    }
    let max = probs.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    Confidence::from_probability(max)
}

// ────────────────────────────────────────────────────────────────────────────
// Model bundle
// ────────────────────────────────────────────────────────────────────────────

/// The loaded vectorizer + classifier pair. Cheap to clone.
#[derive(Clone)]
pub struct ModelBundle {
    pub vectorizer: Arc<dyn Vectorizer>,
    pub classifier: Arc<dyn Classifier>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ModelSummary {
    pub n_features: usize,
    pub classes: Vec<i64>,
    pub unmapped_labels: Vec<i64>,
}

impl ModelBundle {
    /// Pairs a vectorizer with a classifier, checking that they agree on the
    /// feature width and that every class has a category name.
    ///
    /// With `allow_unmapped_labels` set, unknown classes are logged instead of rejected
    /// and render as their raw number.
    pub fn new(
        vectorizer: Arc<dyn Vectorizer>,
        classifier: Arc<dyn Classifier>,
        allow_unmapped_labels: bool,
    ) -> Result<Self, ModelError> {
        if let Some(expected) = classifier.n_features() {
            let actual = vectorizer.n_features();
            if expected != actual {
                return Err(ModelError::DimensionMismatch { expected, actual });
            }
        }

        let unmapped = labels::unmapped_labels(classifier.classes());
        if !unmapped.is_empty() {
            if allow_unmapped_labels {
                warn!(
                    "Classifier labels {:?} have no category name; they will be shown as numbers",
                    unmapped
                );
            } else {
                return Err(ModelError::UnmappedLabels(unmapped));
            }
        }

        Ok(Self {
            vectorizer,
            classifier,
        })
    }

    /// Loads the TF-IDF and linear classifier artifacts from disk.
    pub fn load(
        vectorizer_path: &Path,
        classifier_path: &Path,
        allow_unmapped_labels: bool,
    ) -> Result<Self, ModelError> {
        let vectorizer = TfidfVectorizer::from_artifact(read_artifact(vectorizer_path)?)?;
        info!(
            "Loaded vectorizer from {} ({} features)",
            vectorizer_path.display(),
            vectorizer.n_features()
        );

        let classifier = LinearClassifier::from_artifact(read_artifact(classifier_path)?)?;
        info!(
            "Loaded classifier from {} ({} classes, probability output: {:?})",
            classifier_path.display(),
            classifier.classes().len(),
            classifier.probability_mode()
        );

        Self::new(
            Arc::new(vectorizer),
            Arc::new(classifier),
            allow_unmapped_labels,
        )
    }

    pub fn summary(&self) -> ModelSummary {
        let classes = self.classifier.classes().to_vec();
        ModelSummary {
            n_features: self.vectorizer.n_features(),
            unmapped_labels: labels::unmapped_labels(&classes),
            classes,
        }
    }
}

fn read_artifact<T: DeserializeOwned>(path: &Path) -> Result<T, ModelError> {
    let raw = std::fs::read_to_string(path).map_err(|source| ModelError::Io {
        path: path.display().to_string(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| ModelError::Parse {
        path: path.display().to_string(),
        source,
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Classification
// ────────────────────────────────────────────────────────────────────────────

/// Vectorizes cleaned resume text and predicts its category.
///
/// A failing `predict` is returned as an error. Probability output is best-effort:
/// any failure there just leaves `confidence` empty.
pub fn classify(text: &str, models: &ModelBundle) -> Result<PredictionResult, ModelError> {
    let features = models.vectorizer.transform(text);
    debug!(
        "Vectorized {} chars into {} non-zero features",
        text.len(),
        features.nnz()
    );

    let label = models.classifier.predict(&features)?;

    let confidence = match models.classifier.predict_proba(&features) {
        Ok(Some(probs)) => confidence_from_probabilities(&probs),
        Ok(None) => None,
        Err(e) => {
            debug!("Probability output unavailable: {e}");
            None
        }
    };

    Ok(PredictionResult::new(label, confidence))
}
