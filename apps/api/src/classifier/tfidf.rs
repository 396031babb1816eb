//! TF-IDF vectorizer: maps cleaned resume text onto the fitted vocabulary.
//!
//! Transform (per document):
//! 1. optional lowercasing
//! 2. tokenize with `token_pattern` (default: runs of 2+ word characters)
//! 3. drop stop words, build n-grams over the remaining tokens
//! 4. count in-vocabulary terms; tf = count, or `1 + ln(count)` when `sublinear_tf`
//! 5. multiply by the term's idf weight, then normalize (`l2` by default)

use std::collections::{HashMap, HashSet};

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::classifier::{FeatureVector, ModelError, Vectorizer};

pub const DEFAULT_TOKEN_PATTERN: &str = r"(?u)\b\w\w+\b";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Norm {
    #[default]
    L2,
    L1,
    None,
}

/// On-disk form of a fitted vectorizer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TfidfArtifact {
    pub vocabulary: HashMap<String, usize>,
    pub idf: Vec<f64>,
    #[serde(default = "default_lowercase")]
    pub lowercase: bool,
    #[serde(default = "default_token_pattern")]
    pub token_pattern: String,
    #[serde(default = "default_ngram_range")]
    pub ngram_range: (usize, usize),
    #[serde(default)]
    pub stop_words: Vec<String>,
    #[serde(default)]
    pub sublinear_tf: bool,
    #[serde(default)]
    pub norm: Norm,
}

fn default_lowercase() -> bool {
    true
}

fn default_token_pattern() -> String {
    DEFAULT_TOKEN_PATTERN.to_string()
}

fn default_ngram_range() -> (usize, usize) {
    (1, 1)
}

#[derive(Debug)]
pub struct TfidfVectorizer {
    vocabulary: HashMap<String, usize>,
    idf: Vec<f64>,
    lowercase: bool,
    token_pattern: Regex,
    ngram_range: (usize, usize),
    stop_words: HashSet<String>,
    sublinear_tf: bool,
    norm: Norm,
}

impl TfidfVectorizer {
    pub fn from_artifact(artifact: TfidfArtifact) -> Result<Self, ModelError> {
        let n_features = artifact.idf.len();
        if artifact.vocabulary.len() != n_features {
            return Err(ModelError::Invalid(format!(
                "vocabulary has {} terms but idf has {} weights",
                artifact.vocabulary.len(),
                n_features
            )));
        }
        if let Some((term, &col)) = artifact
            .vocabulary
            .iter()
            .find(|&(_, &col)| col >= n_features)
        {
            return Err(ModelError::Invalid(format!(
                "term '{term}' maps to column {col}, outside 0..{n_features}"
            )));
        }
        if artifact.idf.iter().any(|w| !w.is_finite()) {
            return Err(ModelError::Invalid("idf contains non-finite weights".to_string()));
        }

        let (min_n, max_n) = artifact.ngram_range;
        if min_n == 0 || min_n > max_n {
            return Err(ModelError::Invalid(format!(
                "invalid ngram_range ({min_n}, {max_n})"
            )));
        }

        let token_pattern = Regex::new(&artifact.token_pattern).map_err(|e| {
            ModelError::Invalid(format!(
                "token_pattern '{}' does not compile: {e}",
                artifact.token_pattern
            ))
        })?;

        Ok(Self {
            vocabulary: artifact.vocabulary,
            idf: artifact.idf,
            lowercase: artifact.lowercase,
            token_pattern,
            ngram_range: artifact.ngram_range,
            stop_words: artifact.stop_words.into_iter().collect(),
            sublinear_tf: artifact.sublinear_tf,
            norm: artifact.norm,
        })
    }

    fn tokenize<'a>(&self, doc: &'a str) -> Vec<&'a str> {
        self.token_pattern
            .find_iter(doc)
            .map(|m| m.as_str())
            .filter(|t| !self.stop_words.contains(*t))
            .collect()
    }

    fn term_counts(&self, tokens: &[&str]) -> HashMap<usize, f64> {
        let mut counts = HashMap::new();
        let (min_n, max_n) = self.ngram_range;
        for n in min_n..=max_n.min(tokens.len()) {
            for window in tokens.windows(n) {
                let term = window.join(" ");
                if let Some(&col) = self.vocabulary.get(&term) {
                    *counts.entry(col).or_insert(0.0) += 1.0;
                }
            }
        }
        counts
    }
}

impl Vectorizer for TfidfVectorizer {
    fn n_features(&self) -> usize {
        self.idf.len()
    }

    fn transform(&self, text: &str) -> FeatureVector {
        let doc = if self.lowercase {
            text.to_lowercase()
        } else {
            text.to_string()
        };
        let tokens = self.tokenize(&doc);

        let mut entries: Vec<(usize, f64)> = self
            .term_counts(&tokens)
            .into_iter()
            .map(|(col, count)| {
                let tf = if self.sublinear_tf {
                    1.0 + count.ln()
                } else {
                    count
                };
                (col, tf * self.idf[col])
            })
            .collect();

        let norm = match self.norm {
            Norm::L2 => entries.iter().map(|(_, v)| v * v).sum::<f64>().sqrt(),
            Norm::L1 => entries.iter().map(|(_, v)| v.abs()).sum::<f64>(),
            Norm::None => 1.0,
        };
        if norm > 0.0 {
            for (_, v) in entries.iter_mut() {
                *v /= norm;
            }
        }

        FeatureVector::new(self.n_features(), entries)
    }
}
