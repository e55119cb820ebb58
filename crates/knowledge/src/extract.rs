//! Text extraction from fetched document bytes.

use thiserror::Error;

/// Magic bytes at the start of every PDF file.
const PDF_MAGIC: &[u8] = b"%PDF";

/// Failure to pull text out of a document.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("PDF extraction failed: {0}")]
    Pdf(String),

    #[error("Document is neither a PDF nor UTF-8 text")]
    NotText,
}

pub fn is_pdf(bytes: &[u8]) -> bool {
    bytes.starts_with(PDF_MAGIC)
}

/// Extract plain text. PDFs go through `pdf-extract`; anything else must be UTF-8 text.
///
/// CPU-bound: call from a blocking thread.
pub fn extract_text(bytes: &[u8]) -> Result<String, ExtractError> {
    if is_pdf(bytes) {
        return pdf_extract::extract_text_from_mem(bytes)
            .map_err(|e| ExtractError::Pdf(e.to_string()));
    }

    String::from_utf8(bytes.to_vec()).map_err(|_| ExtractError::NotText)
}
