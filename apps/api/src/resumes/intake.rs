//! Intake — turns uploaded resume files into `Document`s.
//!
//! - `.pdf` → text via `pdf-extract` (in memory, no temp files)
//! - `.txt` → UTF-8, invalid sequences dropped
//! - anything else → no text
//!
//! The candidate name is the file name without its extension. Files that fail to
//! extract or come out blank are skipped with a warning.

use std::path::Path;

use bytes::Bytes;
use thiserror::Error;
use tracing::{debug, warn};

use crate::models::document::Document;

#[derive(Debug, Error)]
pub enum IntakeError {
    #[error("PDF extraction failed for '{file}': {message}")]
    Pdf { file: String, message: String },

    #[error("Unsupported file type: '{0}' (expected .pdf or .txt)")]
    UnsupportedFormat(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResumeFormat {
    Pdf,
    Text,
    Unsupported,
}

impl ResumeFormat {
    pub fn from_file_name(file_name: &str) -> Self {
        let lower = file_name.to_lowercase();
        if lower.ends_with(".pdf") {
            ResumeFormat::Pdf
        } else if lower.ends_with(".txt") {
            ResumeFormat::Text
        } else {
            ResumeFormat::Unsupported
        }
    }
}

/// A resume file as received from the client.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub bytes: Bytes,
}

/// Candidate name derived from the file name: `jane_doe.pdf` → `jane_doe`.
pub fn candidate_name(file_name: &str) -> String {
    Path::new(file_name)
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| file_name.to_string())
}

/// Extracts raw text from one file according to its extension.
pub fn extract_text(file_name: &str, bytes: &[u8]) -> Result<String, IntakeError> {
    match ResumeFormat::from_file_name(file_name) {
        ResumeFormat::Pdf => extract_pdf(file_name, bytes),
        ResumeFormat::Text => Ok(String::from_utf8_lossy(bytes).replace('\u{FFFD}', "")),
        ResumeFormat::Unsupported => Err(IntakeError::UnsupportedFormat(file_name.to_string())),
    }
}

/// `pdf-extract` panics on some malformed font encodings instead of returning an error.
fn extract_pdf(file_name: &str, bytes: &[u8]) -> Result<String, IntakeError> {
    let pdf_error = |message: String| IntakeError::Pdf {
        file: file_name.to_string(),
        message,
    };

    match std::panic::catch_unwind(|| pdf_extract::extract_text_from_mem(bytes)) {
        Ok(Ok(text)) => Ok(text),
        Ok(Err(e)) => Err(pdf_error(e.to_string())),
        Err(_panic) => Err(pdf_error("PDF parser panicked on malformed input".to_string())),
    }
}

/// Parses every upload, keeping only files that produced non-blank text.
pub fn parse_uploads(files: Vec<UploadedFile>) -> Vec<Document> {
    let total = files.len();
    let documents: Vec<Document> = files
        .into_iter()
        .filter_map(|file| match extract_text(&file.file_name, &file.bytes) {
            Ok(text) => {
                let document = Document::new(candidate_name(&file.file_name), text);
                if document.is_blank() {
                    warn!(file = %file.file_name, "No text extracted from resume; skipping");
                    return None;
                }
                Some(document)
            }
            Err(e) => {
                warn!(file = %file.file_name, "Skipping resume: {e}");
                None
            }
        })
        .collect();

    debug!(received = total, parsed = documents.len(), "Resume uploads parsed");
    documents
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upload(name: &str, body: &[u8]) -> UploadedFile {
        UploadedFile {
            file_name: name.to_string(),
            bytes: Bytes::copy_from_slice(body),
        }
    }

    #[test]
    fn test_candidate_name_strips_extension() {
        assert_eq!(candidate_name("jane_doe.pdf"), "jane_doe");
        assert_eq!(candidate_name("John.Smith.TXT"), "John.Smith");
        assert_eq!(candidate_name("no_extension"), "no_extension");
    }

    #[test]
    fn test_format_detection_is_case_insensitive() {
        assert_eq!(ResumeFormat::from_file_name("CV.PDF"), ResumeFormat::Pdf);
        assert_eq!(ResumeFormat::from_file_name("cv.Txt"), ResumeFormat::Text);
        assert_eq!(ResumeFormat::from_file_name("cv.docx"), ResumeFormat::Unsupported);
    }

    #[test]
    fn test_txt_extraction_drops_invalid_utf8() {
        let text = extract_text("cv.txt", b"Rust \xFF\xFEengineer").unwrap();
        assert_eq!(text, "Rust engineer");
    }

    #[test]
    fn test_unsupported_format_errors() {
        let err = extract_text("cv.docx", b"whatever").unwrap_err();
        assert!(matches!(err, IntakeError::UnsupportedFormat(_)));
    }

    /// Single-page PDF drawing `text` in Helvetica, with a correct xref table.
    fn minimal_pdf(text: &str) -> Vec<u8> {
        let content = format!("BT /F1 12 Tf 72 720 Td ({text}) Tj ET");
        let objects = [
            "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
            "<< /Type /Pages /Kids [3 0 R] /Count 1 >>".to_string(),
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] /Contents 4 0 R \
             /Resources << /Font << /F1 5 0 R >> >> >>"
                .to_string(),
            format!("<< /Length {} >>\nstream\n{content}\nendstream", content.len()),
            "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>"
                .to_string(),
        ];

        let mut pdf = b"%PDF-1.4\n".to_vec();
        let mut offsets = Vec::with_capacity(objects.len());
        for (i, body) in objects.iter().enumerate() {
            offsets.push(pdf.len());
            pdf.extend_from_slice(format!("{} 0 obj\n{body}\nendobj\n", i + 1).as_bytes());
        }

        let xref_start = pdf.len();
        let mut tail = format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1);
        for offset in offsets {
            tail.push_str(&format!("{offset:010} 00000 n \n"));
        }
        tail.push_str(&format!(
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{xref_start}\n%%EOF\n",
            objects.len() + 1
        ));
        pdf.extend_from_slice(tail.as_bytes());
        pdf
    }

    #[test]
    fn test_pdf_extraction_reads_text() {
        let text = extract_text("Jane_Doe.PDF", &minimal_pdf("Rust engineer Tokio")).unwrap();
        assert!(text.contains("Rust"), "extracted {text:?}");
        assert!(text.contains("Tokio"), "extracted {text:?}");
    }

    #[test]
    fn test_parse_uploads_accepts_pdf() {
        let docs = parse_uploads(vec![UploadedFile {
            file_name: "jane_doe.pdf".to_string(),
            bytes: Bytes::from(minimal_pdf("Data scientist Python")),
        }]);
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].name, "jane_doe");
        assert!(docs[0].text.contains("Python"));
    }

    #[test]
    fn test_invalid_pdf_errors() {
        let err = extract_text("cv.pdf", b"definitely not a pdf").unwrap_err();
        assert!(matches!(err, IntakeError::Pdf { .. }));
        assert!(err.to_string().contains("cv.pdf"));
    }

    #[test]
    fn test_parse_uploads_skips_blank_and_unreadable() {
        let docs = parse_uploads(vec![
            upload("alice.txt", b"Data scientist, Python"),
            upload("blank.txt", b"   \n  "),
            upload("broken.pdf", b"not a pdf at all"),
            upload("photo.png", b"\x89PNG"),
            upload("bob.TXT", b"Chef"),
        ]);
        let names: Vec<&str> = docs.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["alice", "bob"]);
        assert_eq!(docs[0].text, "Data scientist, Python");
    }
}
