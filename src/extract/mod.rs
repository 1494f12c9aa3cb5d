//! Document text extraction for uploaded Purchase Order files.
//!
//! The dispatch is driven by the declared filename extension: `.pdf` goes to
//! the PDF page-text concatenator, `.docx` to the paragraph concatenator,
//! anything else yields an empty string. Corrupt or unreadable inputs also
//! collapse to an empty string so the caller only ever learns "no text was
//! extracted".

pub mod docx;
pub mod pdf;

use tracing::{debug, warn};

/// Supported upload formats, detected from the filename extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Docx,
}

/// Detects the document kind from the declared filename, case-insensitively.
pub fn detect_kind(filename: &str) -> Option<DocumentKind> {
    let ends_with = |ext: &str| {
        let bytes = filename.as_bytes();
        bytes.len() >= ext.len()
            && bytes[bytes.len() - ext.len()..].eq_ignore_ascii_case(ext.as_bytes())
    };

    if ends_with(".pdf") {
        Some(DocumentKind::Pdf)
    } else if ends_with(".docx") {
        Some(DocumentKind::Docx)
    } else {
        None
    }
}

/// Extracts a flat text string from the uploaded bytes.
///
/// Pure given identical input bytes; page/paragraph order is preserved.
/// Unsupported extensions and unparsable documents both produce an empty
/// string rather than an error.
pub fn extract_text(bytes: &[u8], filename: &str) -> String {
    let result = match detect_kind(filename) {
        Some(DocumentKind::Pdf) => {
            if !pdf::is_pdf(None, bytes) {
                warn!("{} has a .pdf extension but no %PDF- header", filename);
            }
            pdf::extract_text_from_pdf_mem(bytes)
        }
        Some(DocumentKind::Docx) => docx::extract_text_from_docx_mem(bytes),
        None => {
            debug!("Unsupported file extension, no text extracted: {}", filename);
            return String::new();
        }
    };

    match result {
        Ok(text) => text,
        Err(err) => {
            warn!("Text extraction failed for {}: {:#}", filename, err);
            String::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_kind_case_insensitively() {
        assert_eq!(detect_kind("Vendor_Contract.PDF"), Some(DocumentKind::Pdf));
        assert_eq!(detect_kind("order.docx"), Some(DocumentKind::Docx));
        assert_eq!(detect_kind("notes.txt"), None);
        assert_eq!(detect_kind("no_extension"), None);
    }

    #[test]
    fn detects_kind_for_multibyte_filenames() {
        assert_eq!(detect_kind("Änderung.PDF"), Some(DocumentKind::Pdf));
        assert_eq!(detect_kind("契約書.docx"), Some(DocumentKind::Docx));
        assert_eq!(detect_kind("契"), None);
    }

    #[test]
    fn unsupported_extension_yields_empty_string() {
        assert_eq!(extract_text(b"plain text content", "notes.txt"), "");
    }

    #[test]
    fn corrupt_pdf_yields_empty_string() {
        assert_eq!(extract_text(b"not a pdf at all", "broken.pdf"), "");
    }

    #[test]
    fn corrupt_docx_yields_empty_string() {
        assert_eq!(extract_text(b"not a zip archive", "broken.docx"), "");
    }
}
