//! Adapter registry: which adapters exist, which document kinds they accept and
//! in which order they are tried. Built once at startup and shared read-only.

use std::sync::Arc;

use serde::Serialize;

use super::docx::{self, DocxAdapter};
use super::lopdf_text::{self, LopdfTextAdapter};
use super::pdf::{self, PdfExtractAdapter};
use super::plain_text::{self, PlainTextAdapter};
use super::TextAdapter;
use crate::models::{DocumentKind, UploadedDocument};

#[derive(Clone, Serialize)]
pub struct AdapterDescriptor {
    pub id: &'static str,
    pub kinds: Vec<DocumentKind>,
    /// Lower runs first.
    pub priority: u8,
    #[serde(skip)]
    pub adapter: Arc<dyn TextAdapter>,
}

impl AdapterDescriptor {
    pub fn new(
        id: &'static str,
        kinds: impl Into<Vec<DocumentKind>>,
        priority: u8,
        adapter: Arc<dyn TextAdapter>,
    ) -> Self {
        Self {
            id,
            kinds: kinds.into(),
            priority,
            adapter,
        }
    }

    pub fn accepts_any(&self, kinds: &[DocumentKind]) -> bool {
        self.kinds.iter().any(|k| kinds.contains(k))
    }
}

impl std::fmt::Debug for AdapterDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdapterDescriptor")
            .field("id", &self.id)
            .field("kinds", &self.kinds)
            .field("priority", &self.priority)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, Default)]
pub struct AdapterRegistry {
    descriptors: Vec<AdapterDescriptor>,
}

impl AdapterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The production set: one plain-text reader, two PDF technologies, one DOCX reader.
    pub fn with_defaults() -> Self {
        Self::new()
            .register(AdapterDescriptor::new(
                plain_text::ADAPTER_ID,
                [DocumentKind::PlainText],
                10,
                Arc::new(PlainTextAdapter),
            ))
            .register(AdapterDescriptor::new(
                pdf::ADAPTER_ID,
                [DocumentKind::Pdf],
                10,
                Arc::new(PdfExtractAdapter),
            ))
            .register(AdapterDescriptor::new(
                lopdf_text::ADAPTER_ID,
                [DocumentKind::Pdf],
                20,
                Arc::new(LopdfTextAdapter),
            ))
            .register(AdapterDescriptor::new(
                docx::ADAPTER_ID,
                [DocumentKind::Docx],
                10,
                Arc::new(DocxAdapter),
            ))
    }

    pub fn register(mut self, descriptor: AdapterDescriptor) -> Self {
        self.descriptors.push(descriptor);
        self
    }

    /// All descriptors in registration order.
    pub fn descriptors(&self) -> &[AdapterDescriptor] {
        &self.descriptors
    }

    pub fn get(&self, id: &str) -> Option<&AdapterDescriptor> {
        self.descriptors.iter().find(|d| d.id == id)
    }

    /// Adapters accepting any of the document's kinds, priority ascending.
    /// The sort is stable, so equal priorities keep registration order.
    pub fn applicable(&self, doc: &UploadedDocument) -> Vec<AdapterDescriptor> {
        let kinds = doc.kinds();
        let mut selected: Vec<AdapterDescriptor> = self
            .descriptors
            .iter()
            .filter(|d| d.accepts_any(&kinds))
            .cloned()
            .collect();
        selected.sort_by_key(|d| d.priority);
        selected
    }
}
