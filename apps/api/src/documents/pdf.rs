//! PDF → plain text via `pdf-extract`.

use std::panic::{self, AssertUnwindSafe};

use tracing::{debug, warn};

/// True when the upload looks like a PDF, judged by file name or MIME type.
pub fn is_pdf(file_name: &str, content_type: Option<&str>) -> bool {
    let by_name = file_name.to_ascii_lowercase().ends_with(".pdf");
    let by_type = content_type
        .map(|ct| ct.eq_ignore_ascii_case("application/pdf"))
        .unwrap_or(false);
    by_name || by_type
}

/// Extracts the text layer of an in-memory PDF.
///
/// Returns `None` when the document cannot be parsed or has no text
/// (e.g. a scanned image without OCR). Never errors.
pub fn extract_text(bytes: &[u8]) -> Option<String> {
    // pdf-extract panics on some malformed font tables
    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        pdf_extract::extract_text_from_mem(bytes)
    }));

    let text = match result {
        Ok(Ok(text)) => text,
        Ok(Err(e)) => {
            warn!("PDF extraction error: {e}");
            return None;
        }
        Err(_) => {
            warn!("PDF extraction aborted on a malformed document");
            return None;
        }
    };

    if text.trim().is_empty() {
        debug!("PDF parsed but contained no text layer");
        return None;
    }
    Some(text)
}
