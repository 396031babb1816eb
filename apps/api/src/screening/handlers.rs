use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    http::StatusCode,
    response::Html,
    Json,
};

use crate::classifier::labels::{categories, Category};
use crate::errors::AppError;
use crate::screening::models::{ScreeningOutcome, UploadedDocument};
use crate::screening::page::{render, PageView};
use crate::screening::pipeline::screen_upload;
use crate::state::AppState;

/// Multipart field carrying the resume file.
pub const UPLOAD_FIELD: &str = "resume";

/// GET /
pub async fn handle_index() -> Html<String> {
    Html(render(PageView::Empty))
}

/// POST /
/// Renders the page with the prediction, or with the error that stopped it.
pub async fn handle_upload_page(
    State(state): State<AppState>,
    multipart: Multipart,
) -> (StatusCode, Html<String>) {
    let result = match read_upload(multipart, state.config.max_upload_bytes).await {
        Ok(doc) => screen_upload(&state, doc).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(outcome) => (StatusCode::OK, Html(render(PageView::Result(&outcome)))),
        Err(err) => (err.status(), Html(render(PageView::Error(&err)))),
    }
}

/// POST /api/v1/screen
pub async fn handle_screen(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<ScreeningOutcome>, AppError> {
    let doc = read_upload(multipart, state.config.max_upload_bytes).await?;
    let outcome = screen_upload(&state, doc).await?;
    Ok(Json(outcome))
}

/// GET /api/v1/categories
pub async fn handle_categories() -> Json<Vec<Category>> {
    Json(categories())
}

/// Pulls the first file from the `resume` field. Other fields are ignored.
/// Files over `max_bytes` are rejected with `PayloadTooLarge`.
async fn read_upload(
    mut multipart: Multipart,
    max_bytes: usize,
) -> Result<UploadedDocument, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, max_bytes, "Invalid multipart body"))?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        let filename = field
            .file_name()
            .map(str::to_string)
            .filter(|name| !name.trim().is_empty())
            .ok_or_else(|| AppError::Validation("Uploaded file has no filename".to_string()))?;

        let bytes = field
            .bytes()
            .await
            .map_err(|e| multipart_error(e, max_bytes, "Failed to read uploaded file"))?;
        if bytes.len() > max_bytes {
            return Err(AppError::PayloadTooLarge { limit: max_bytes });
        }

        return Ok(UploadedDocument::new(filename, bytes));
    }

    Err(AppError::Validation(format!(
        "No file uploaded in the '{UPLOAD_FIELD}' field"
    )))
}

/// A body cut off by the request size limit is reported as 413, anything else as 400.
fn multipart_error(err: MultipartError, max_bytes: usize, context: &str) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge { limit: max_bytes }
    } else {
        AppError::Validation(format!("{context}: {err}"))
    }
}
