//! PDF text extraction.
//!
//! Thin wrapper over pdf-extract: concatenated per-page text, no
//! layout reconstruction, no OCR. Scanned/image-only pages extract to
//! nothing, which is reported as an extraction failure rather than fed
//! to the language model as an empty paper.

use std::path::Path;

use crate::error::PipelineError;

/// Extract the text of a PDF file.
pub fn extract_text<P: AsRef<Path>>(path: P) -> Result<String, PipelineError> {
    let text = pdf_extract::extract_text(path.as_ref())
        .map_err(|e| PipelineError::ExtractionError(e.to_string()))?;
    ensure_non_empty(text)
}

/// Extract the text of an in-memory PDF.
pub fn extract_text_from_bytes(bytes: &[u8]) -> Result<String, PipelineError> {
    let text = pdf_extract::extract_text_from_mem(bytes)
        .map_err(|e| PipelineError::ExtractionError(e.to_string()))?;
    ensure_non_empty(text)
}

fn ensure_non_empty(text: String) -> Result<String, PipelineError> {
    if text.trim().is_empty() {
        return Err(PipelineError::ExtractionError(
            "no extractable text (scanned or image-only PDF?)".to_string(),
        ));
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_is_extraction_error() {
        let err = extract_text("/nonexistent/paper.pdf").unwrap_err();
        assert!(matches!(err, PipelineError::ExtractionError(_)));
    }

    #[test]
    fn test_garbage_bytes_are_extraction_error() {
        let err = extract_text_from_bytes(b"not a pdf at all").unwrap_err();
        assert!(matches!(err, PipelineError::ExtractionError(_)));
    }
}
