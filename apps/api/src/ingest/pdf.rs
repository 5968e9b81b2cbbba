use tracing::error;

use crate::errors::AppError;
use crate::i18n::{messages, Locale};

/// Plain text of an uploaded PDF. A PDF without extractable text (a scanned
/// image, for instance) is rejected the same way as an empty document.
pub fn text_from_pdf(bytes: &[u8], locale: Locale) -> Result<String, AppError> {
    if bytes.is_empty() {
        return Err(AppError::BadRequest(messages::empty_file(locale)));
    }

    let text = pdf_extract::extract_text_from_mem(bytes).map_err(|e| {
        error!(error = %e, "PDF extraction failed");
        AppError::BadRequest(messages::pdf_extract_failed(locale, &e.to_string()))
    })?;

    let text = text.trim();
    if text.is_empty() {
        return Err(AppError::BadRequest(messages::resume_no_text(locale)));
    }
    Ok(text.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_upload_is_rejected() {
        let err = text_from_pdf(&[], Locale::EnUs).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(m) if m.contains("empty")));
    }

    #[test]
    fn test_non_pdf_bytes_are_rejected() {
        let err = text_from_pdf(b"not a pdf", Locale::EnUs).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }
}
