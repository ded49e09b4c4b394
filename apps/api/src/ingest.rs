//! Resume ingest — PDF byte stream in, plain text out.

use crate::errors::AppError;

/// Maximum accepted resume upload size.
pub const MAX_RESUME_BYTES: usize = 10 * 1024 * 1024;

/// Extracts plain text from an uploaded PDF.
///
/// The extraction itself is delegated to `pdf-extract`; this function only
/// bounds the input and rejects documents that yield no text at all (a
/// scanned image, an encrypted file).
pub fn extract_resume_text(bytes: &[u8]) -> Result<String, AppError> {
    if bytes.is_empty() {
        return Err(AppError::Ingest("Uploaded resume is empty".to_string()));
    }
    if bytes.len() > MAX_RESUME_BYTES {
        return Err(AppError::Ingest(format!(
            "Resume exceeds the {} MiB upload limit",
            MAX_RESUME_BYTES / (1024 * 1024)
        )));
    }

    let text = pdf_extract::extract_text_from_mem(bytes)
        .map_err(|e| AppError::Ingest(format!("Could not read PDF: {e}")))?;

    if text.trim().is_empty() {
        return Err(AppError::Ingest(
            "No extractable text found in the PDF. Scanned-image resumes are not supported."
                .to_string(),
        ));
    }

    Ok(text)
}
