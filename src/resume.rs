//! Resume loading.
//!
//! The engine only ever sees extracted plain text; this module turns a file
//! path into that text. PDF resumes are extracted with `pdf-extract`, any
//! other file is read as UTF-8.

use anyhow::{Context, Result, bail};
use std::path::Path;

/// Load resume text from a file, extracting from PDF when needed.
///
/// Fails if the file is missing, unreadable, or yields no text.
pub fn load_resume(path: &Path) -> Result<String> {
    let is_pdf = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("pdf"));

    let text = if is_pdf {
        pdf_extract::extract_text(path)
            .with_context(|| format!("Failed to extract text from PDF: {}", path.display()))?
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read resume file: {}", path.display()))?
    };

    let text = text.trim().to_string();
    if text.is_empty() {
        bail!("Resume file {} contains no text", path.display());
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_load_plain_text_resume() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("resume.txt");
        std::fs::write(&path, "  Senior engineer, ten years of Rust.\n").unwrap();
        let text = load_resume(&path).unwrap();
        assert_eq!(text, "Senior engineer, ten years of Rust.");
    }

    #[test]
    fn test_load_markdown_resume_is_read_verbatim() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("resume.md");
        std::fs::write(&path, "# Jane Doe\n\n- Rust\n- SQL").unwrap();
        let text = load_resume(&path).unwrap();
        assert!(text.contains("# Jane Doe"));
    }

    #[test]
    fn test_empty_resume_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("resume.txt");
        std::fs::write(&path, "   \n\n").unwrap();
        let err = load_resume(&path).unwrap_err();
        assert!(err.to_string().contains("no text"));
    }

    #[test]
    fn test_missing_file_rejected() {
        let err = load_resume(Path::new("/nonexistent/resume.txt")).unwrap_err();
        assert!(err.to_string().contains("Failed to read resume file"));
    }

    #[test]
    fn test_invalid_pdf_reports_extraction_failure() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("resume.pdf");
        std::fs::write(&path, "this is not a pdf").unwrap();
        let err = load_resume(&path).unwrap_err();
        assert!(err.to_string().contains("extract text from PDF"));
    }
}
