//! Text Extractor — turns a stored PDF into one document string with
//! 1-indexed page-boundary markers.

use std::path::Path;

use tracing::info;

use crate::errors::AppError;

/// Extracts plain text from every page of the PDF at `path`, in document
/// order, each page preceded by a `--- Page N ---` marker. Empty pages still
/// contribute a marker. Any read/parse failure maps to
/// `AppError::Extraction`.
pub fn extract_text(path: &Path) -> Result<String, AppError> {
    let pages = pdf_extract::extract_text_by_pages(path)
        .map_err(|e| AppError::Extraction(format!("Error reading PDF resume: {e}")))?;

    let text = join_pages(&pages);
    info!(
        pdf_path = %path.display(),
        pages = pages.len(),
        chars = text.len(),
        "Resume read successfully"
    );
    Ok(text)
}

fn join_pages(pages: &[String]) -> String {
    pages
        .iter()
        .enumerate()
        .map(|(i, page)| format!("\n--- Page {} ---\n{}", i + 1, page))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_pages_emits_one_marker_per_page_in_order() {
        let pages = vec![
            "first page".to_string(),
            String::new(),
            "third page".to_string(),
        ];
        let text = join_pages(&pages);

        let markers: Vec<usize> = (1..=3)
            .map(|n| text.find(&format!("--- Page {n} ---")).unwrap())
            .collect();
        assert!(markers.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(text.matches("--- Page").count(), 3);
        assert!(text.contains("first page"));
        assert!(text.contains("third page"));
    }

    #[test]
    fn test_join_pages_empty_document() {
        assert_eq!(join_pages(&[]), "");
    }

    #[test]
    fn test_extract_fails_on_missing_file() {
        let err = extract_text(Path::new("/nonexistent/resume.pdf")).unwrap_err();
        assert!(matches!(err, AppError::Extraction(_)));
    }

    #[test]
    fn test_extract_fails_on_corrupt_file() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("garbage.pdf");
        std::fs::write(&path, b"this is not a pdf").unwrap();

        let err = extract_text(&path).unwrap_err();
        assert!(matches!(err, AppError::Extraction(_)));
    }
}
