use anyhow::anyhow;
use chrono::Utc;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::classifier::{classify, ModelBundle};
use crate::errors::AppError;
use crate::screening::extract::extract_text;
use crate::screening::models::{DocumentKind, ScreeningOutcome, UploadedDocument};
use crate::screening::normalize::{clean_resume_text, is_blank};
use crate::state::AppState;

/// Runs one upload through extraction, cleaning and classification.
///
/// Fails with `UnsupportedFileType` before any model call for unknown extensions,
/// with `EmptyText` when nothing but whitespace was extracted, and with
/// `PredictionFailed` when the classifier cannot produce a label.
pub fn screen_document(
    doc: &UploadedDocument,
    models: &ModelBundle,
    preview_chars: usize,
) -> Result<ScreeningOutcome, AppError> {
    let screening_id = Uuid::new_v4();
    let kind = DocumentKind::from_filename(&doc.filename).ok_or_else(|| {
        warn!(%screening_id, filename = %doc.filename, "Rejected unsupported file type");
        AppError::UnsupportedFileType
    })?;
    info!(
        %screening_id,
        filename = %doc.filename,
        kind = kind.as_str(),
        bytes = doc.bytes.len(),
        "Screening uploaded resume"
    );

    let raw_text = extract_text(doc)?;
    if is_blank(&raw_text) {
        warn!(%screening_id, "No text could be extracted");
        return Err(AppError::EmptyText);
    }

    let cleaned = clean_resume_text(&raw_text);

    let prediction = classify(&cleaned, models).map_err(|e| {
        error!(%screening_id, "Prediction failed: {e}");
        AppError::PredictionFailed(e.to_string())
    })?;

    info!(
        %screening_id,
        label = prediction.label,
        category = %prediction.category,
        confidence = prediction.confidence.map(|c| c.value()),
        "Resume classified"
    );

    Ok(ScreeningOutcome {
        screening_id,
        filename: doc.filename.clone(),
        document_kind: kind,
        prediction,
        cleaned_preview: cleaned.chars().take(preview_chars).collect(),
        cleaned_chars: cleaned.chars().count(),
        screened_at: Utc::now(),
    })
}

/// `screen_document` on a blocking thread, so PDF parsing never stalls the runtime.
pub async fn screen_upload(
    state: &AppState,
    doc: UploadedDocument,
) -> Result<ScreeningOutcome, AppError> {
    let models = state.models.clone();
    let preview_chars = state.config.preview_chars;
    tokio::task::spawn_blocking(move || screen_document(&doc, &models, preview_chars))
        .await
        .map_err(|e| AppError::Internal(anyhow!("Screening task failed: {e}")))?
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;

    use super::*;
    use crate::classifier::testing::{bundle_with, fixture_bundle, FailingClassifier, StubClassifier};
    use crate::config::Config;
    use crate::screening::testing::pdf_with_pages;

    #[test]
    fn test_screen_python_resume() {
        let doc = UploadedDocument::new(
            "resume.txt",
            b"Senior Python developer. Django & Flask, see https://example.com #hire".to_vec(),
        );
        let outcome = screen_document(&doc, &fixture_bundle(), 2000).unwrap();
        assert_eq!(outcome.prediction.label, 20);
        assert_eq!(outcome.prediction.category, "Python Developer");
        assert_eq!(outcome.cleaned_preview, "Senior Python developer Django Flask see");
        assert_eq!(outcome.document_kind, DocumentKind::Text);
        let confidence = outcome.prediction.confidence.unwrap().value();
        assert!((0.0..=1.0).contains(&confidence));
    }

    #[test]
    fn test_preview_is_truncated_by_chars() {
        let body = "python ".repeat(1000);
        let doc = UploadedDocument::new("long.txt", body.into_bytes());
        let outcome = screen_document(&doc, &fixture_bundle(), 2000).unwrap();
        assert_eq!(outcome.cleaned_preview.chars().count(), 2000);
        assert_eq!(outcome.cleaned_chars, 6999);
    }

    #[test]
    fn test_csv_rejected_before_prediction() {
        let stub = StubClassifier::new(6, Ok(None));
        let calls = stub.predict_calls.clone();
        let models = bundle_with(stub);

        let doc = UploadedDocument::new("resume.csv", b"name,skills\nJane,Python".to_vec());
        let err = screen_document(&doc, &models, 2000).unwrap_err();

        assert!(matches!(err, AppError::UnsupportedFileType));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_whitespace_only_txt_is_empty_text() {
        let stub = StubClassifier::new(6, Ok(None));
        let calls = stub.predict_calls.clone();
        let models = bundle_with(stub);

        let doc = UploadedDocument::new("blank.txt", b" \n\t  \r\n".to_vec());
        let err = screen_document(&doc, &models, 2000).unwrap_err();

        assert!(matches!(err, AppError::EmptyText));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_separator_only_txt_is_empty_text() {
        let stub = StubClassifier::new(6, Ok(None));
        let calls = stub.predict_calls.clone();
        let models = bundle_with(stub);

        let doc = UploadedDocument::new("sep.txt", "\u{1c}\u{1f} \u{1d}\n".as_bytes().to_vec());
        let err = screen_document(&doc, &models, 2000).unwrap_err();

        assert!(matches!(err, AppError::EmptyText));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_screen_two_page_pdf() {
        let pdf = pdf_with_pages(&["Java Developer", "Spring Hibernate"]);
        let doc = UploadedDocument::new("cv.pdf", pdf);
        let outcome = screen_document(&doc, &fixture_bundle(), 2000).unwrap();
        assert_eq!(outcome.document_kind, DocumentKind::Pdf);
        assert_eq!(outcome.cleaned_preview, "Java Developer Spring Hibernate");
        assert_eq!(outcome.prediction.category, "Java Developer");
    }

    #[test]
    fn test_predict_failure_surfaces_message() {
        let models = bundle_with(FailingClassifier);
        let doc = UploadedDocument::new("cv.txt", b"Data engineer".to_vec());
        let err = screen_document(&doc, &models, 2000).unwrap_err();
        assert_eq!(err.to_string(), "Prediction failed: model exploded");
    }

    #[test]
    fn test_stub_probability_becomes_confidence() {
        let models = bundle_with(StubClassifier::new(23, Ok(Some(vec![0.25, 0.6, 0.15]))));
        let doc = UploadedDocument::new("qa.txt", b"Manual and automated testing".to_vec());
        let outcome = screen_document(&doc, &models, 2000).unwrap();
        assert_eq!(outcome.prediction.category, "Testing");
        assert!((outcome.prediction.confidence.unwrap().value() - 0.6).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn test_screen_upload_runs_off_runtime() {
        let state = AppState {
            models: fixture_bundle(),
            config: Config::default(),
        };
        let doc = UploadedDocument::new(
            "cv.txt",
            b"Java developer, Spring Boot and Hibernate".to_vec(),
        );
        let outcome = screen_upload(&state, doc).await.unwrap();
        assert_eq!(outcome.prediction.category, "Java Developer");
    }
}
