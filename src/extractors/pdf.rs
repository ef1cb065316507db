// src/extractors/pdf.rs
use std::panic;

use crate::extractors::text::normalize_flat_text;

/// Extracts the raw text of a bill PDF in page order.
///
/// Returns `None` when the bytes are not a readable PDF. `pdf-extract` can
/// panic on malformed input, so the call is unwound here rather than taking
/// the worker down with it.
pub fn pdf_to_text(bytes: &[u8]) -> Option<String> {
    let extracted = panic::catch_unwind(|| pdf_extract::extract_text_from_mem(bytes));

    let raw = match extracted {
        Ok(Ok(text)) => text,
        Ok(Err(e)) => {
            tracing::warn!("PDF text extraction failed: {}", e);
            return None;
        }
        Err(_) => {
            tracing::warn!("PDF text extraction panicked on a {} byte document", bytes.len());
            return None;
        }
    };

    // Lines arrive newline-separated; a vertical gap wider than a line
    // (paragraph or page break) comes through as an extra newline.
    let text = normalize_flat_text(&raw);
    tracing::debug!("Extracted {} chars of text from PDF", text.len());
    Some(text)
}
