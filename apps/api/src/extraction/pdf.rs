//! Primary PDF reader, backed by `pdf-extract`.

use async_trait::async_trait;
use tracing::debug;

use super::{require_text, ExtractError, RawText, TextAdapter};
use crate::models::UploadedDocument;

pub const ADAPTER_ID: &str = "pdf_extract";

/// Inserted between pages so downstream line logic never glues two pages together.
pub const PAGE_BREAK: &str = "\n\u{c}\n";

pub struct PdfExtractAdapter;

#[async_trait]
impl TextAdapter for PdfExtractAdapter {
    async fn extract(&self, doc: &UploadedDocument) -> Result<RawText, ExtractError> {
        if doc.is_empty() {
            return Err(ExtractError::EmptyPayload);
        }

        // pdf-extract is CPU-bound and panics on some malformed inputs; the join
        // error keeps that local to this attempt.
        let bytes = doc.content.clone();
        let pages = tokio::task::spawn_blocking(move || {
            pdf_extract::extract_text_from_mem_by_pages(&bytes)
        })
        .await
        .map_err(|e| ExtractError::from_join(ADAPTER_ID, e))?
        .map_err(|e| ExtractError::MalformedContainer(e.to_string()))?;

        debug!(adapter = ADAPTER_ID, pages = pages.len(), "pdf pages decoded");
        require_text(pages.join(PAGE_BREAK), ADAPTER_ID)
    }
}
