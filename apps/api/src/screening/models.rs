use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::classifier::PredictionResult;

/// A file received from the upload form. Lives for a single request.
#[derive(Debug, Clone)]
pub struct UploadedDocument {
    pub filename: String,
    pub bytes: Bytes,
}

impl UploadedDocument {
    pub fn new(filename: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            filename: filename.into(),
            bytes: bytes.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    Text,
    Pdf,
}

impl DocumentKind {
    /// Detects the kind from the filename's extension, case-insensitively.
    pub fn from_filename(filename: &str) -> Option<Self> {
        let name = filename.to_lowercase();
        if name.ends_with(".txt") {
            Some(DocumentKind::Text)
        } else if name.ends_with(".pdf") {
            Some(DocumentKind::Pdf)
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentKind::Text => "txt",
            DocumentKind::Pdf => "pdf",
        }
    }
}

/// Everything shown to the user after a successful screening.
#[derive(Debug, Clone, Serialize)]
pub struct ScreeningOutcome {
    pub screening_id: Uuid,
    pub filename: String,
    pub document_kind: DocumentKind,
    #[serde(flatten)]
    pub prediction: PredictionResult,
    /// Leading characters of the cleaned text.
    pub cleaned_preview: String,
    pub cleaned_chars: usize,
    pub screened_at: DateTime<Utc>,
}
