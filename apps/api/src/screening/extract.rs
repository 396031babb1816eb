use std::panic::{catch_unwind, AssertUnwindSafe};

use tracing::{debug, warn};

use crate::errors::AppError;
use crate::screening::models::{DocumentKind, UploadedDocument};

/// Extracts raw text from an uploaded resume.
///
/// Only `.txt` and `.pdf` are accepted. Decoding problems never fail the request;
/// an unreadable PDF yields whatever text its raw bytes contain, possibly none.
/// Callers decide what to do with empty text.
pub fn extract_text(doc: &UploadedDocument) -> Result<String, AppError> {
    let kind = DocumentKind::from_filename(&doc.filename).ok_or(AppError::UnsupportedFileType)?;
    let text = match kind {
        DocumentKind::Text => decode_text(&doc.bytes),
        DocumentKind::Pdf => extract_pdf_text(&doc.bytes),
    };
    debug!(
        "Extracted {} chars from {} ({})",
        text.chars().count(),
        doc.filename,
        kind.as_str()
    );
    Ok(text)
}

/// UTF-8, falling back to Latin-1 (every byte is a valid code point there).
pub fn decode_text(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => decode_latin1(bytes),
    }
}

fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}

/// UTF-8 with invalid sequences dropped.
fn decode_utf8_ignoring_invalid(bytes: &[u8]) -> String {
    bytes.utf8_chunks().map(|chunk| chunk.valid()).collect()
}

/// Text of every page, space-separated. Falls back to the raw bytes when the
/// PDF cannot be parsed; the parser panics on some malformed files.
pub fn extract_pdf_text(bytes: &[u8]) -> String {
    let parsed = catch_unwind(AssertUnwindSafe(|| {
        pdf_extract::extract_text_from_mem_by_pages(bytes)
    }));

    match parsed {
        Ok(Ok(pages)) => {
            debug!("PDF has {} pages", pages.len());
            join_pages(&pages)
        }
        Ok(Err(e)) => {
            warn!("PDF text extraction failed, decoding raw bytes instead: {e}");
            decode_utf8_ignoring_invalid(bytes)
        }
        Err(_) => {
            warn!("PDF parser panicked, decoding raw bytes instead");
            decode_utf8_ignoring_invalid(bytes)
        }
    }
}

/// Blank pages are skipped so they never add stray separators.
fn join_pages(pages: &[String]) -> String {
    pages
        .iter()
        .map(|page| page.trim())
        .filter(|page| !page.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
