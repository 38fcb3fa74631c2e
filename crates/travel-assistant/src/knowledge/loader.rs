//! Document Loading

use std::path::Path;

use crate::error::{AssistantError, Result};

/// Read a document as a list of pages. PDFs go through text extraction,
/// one entry per page; anything else is read as UTF-8 and forms a single
/// page.
pub async fn load_pages(path: &Path) -> Result<Vec<String>> {
    let is_pdf = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("pdf"));

    if !is_pdf {
        return Ok(vec![tokio::fs::read_to_string(path).await?]);
    }

    let owned = path.to_path_buf();
    tokio::task::spawn_blocking(move || pdf_extract::extract_text_by_pages(&owned))
        .await
        .map_err(|e| AssistantError::DocumentLoad(e.to_string()))?
        .map_err(|e| AssistantError::DocumentLoad(e.to_string()))
}
