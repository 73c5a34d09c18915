//! Text extraction from PDF files.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::Path;
use thiserror::Error;

/// A document whose text could not be extracted.
#[derive(Debug, Error)]
#[error("Could not read text from {path}: {message}")]
pub struct ReadError {
    /// Display form of the document path.
    pub path: String,
    /// Reason reported by the extractor.
    pub message: String,
}

/// Turns a document on disk into plain text.
pub trait DocumentReader {
    /// Extracts all text from the document at `path`, pages in order.
    ///
    /// # Errors
    ///
    /// Returns `ReadError` if the file cannot be opened or decoded.
    fn read_text(&self, path: &Path) -> Result<String, ReadError>;
}

/// [`DocumentReader`] backed by the `pdf-extract` crate.
///
/// `pdf-extract` panics on some well-formed files (an unknown font
/// encoding, for one). Those panics are caught and reported as a
/// `ReadError` for that document.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfTextReader;

impl DocumentReader for PdfTextReader {
    fn read_text(&self, path: &Path) -> Result<String, ReadError> {
        let read_error = |message: String| ReadError {
            path: path.display().to_string(),
            message,
        };
        match catch_unwind(AssertUnwindSafe(|| pdf_extract::extract_text(path))) {
            Ok(Ok(text)) => Ok(text),
            Ok(Err(e)) => Err(read_error(e.to_string())),
            Err(payload) => Err(read_error(format!(
                "extractor crashed: {}",
                panic_message(payload.as_ref())
            ))),
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("unknown panic")
}

/// Minimal single-page PDFs for tests.
#[cfg(test)]
pub(crate) mod fixtures {
    /// One page showing `text` in Helvetica with the named `/Encoding`.
    pub fn single_page_pdf(encoding: &str, text: &str) -> Vec<u8> {
        let content = format!("BT /F1 12 Tf 72 720 Td ({text}) Tj ET");
        let objects = [
            "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
            "<< /Type /Pages /Kids [3 0 R] /Count 1 >>".to_string(),
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] \
             /Resources << /Font << /F1 5 0 R >> >> /Contents 4 0 R >>"
                .to_string(),
            format!(
                "<< /Length {} >>\nstream\n{content}\nendstream",
                content.len()
            ),
            format!("<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /{encoding} >>"),
        ];

        let mut pdf = b"%PDF-1.4\n".to_vec();
        let mut offsets = Vec::new();
        for (i, body) in objects.iter().enumerate() {
            offsets.push(pdf.len());
            pdf.extend_from_slice(format!("{} 0 obj\n{body}\nendobj\n", i + 1).as_bytes());
        }
        let xref_at = pdf.len();
        pdf.extend_from_slice(format!("xref\n0 {}\n", objects.len() + 1).as_bytes());
        pdf.extend_from_slice(b"0000000000 65535 f \n");
        for offset in offsets {
            pdf.extend_from_slice(format!("{offset:010} 00000 n \n").as_bytes());
        }
        pdf.extend_from_slice(
            format!(
                "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{xref_at}\n%%EOF\n",
                objects.len() + 1
            )
            .as_bytes(),
        );
        pdf
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::single_page_pdf;
    use super::*;

    #[test]
    fn test_reads_simple_pdf() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hello.pdf");
        std::fs::write(&path, single_page_pdf("WinAnsiEncoding", "Hello")).unwrap();

        let text = PdfTextReader.read_text(&path).unwrap();
        assert!(text.contains("Hello"), "{text:?}");
    }

    #[test]
    fn test_extractor_panic_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("odd-font.pdf");
        std::fs::write(&path, single_page_pdf("BogusEncoding", "Hello")).unwrap();

        let err = PdfTextReader.read_text(&path).unwrap_err();
        assert!(err.path.ends_with("odd-font.pdf"));
        assert!(err.message.contains("unexpected encoding"), "{}", err.message);
    }

    #[test]
    fn test_garbage_file_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.pdf");
        std::fs::write(&path, b"this is not a pdf").unwrap();

        let err = PdfTextReader.read_text(&path).unwrap_err();
        assert!(err.path.ends_with("broken.pdf"));
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(PdfTextReader
            .read_text(&dir.path().join("missing.pdf"))
            .is_err());
    }
}
