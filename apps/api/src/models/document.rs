use bytes::Bytes;
use serde::Serialize;

const PDF_MAGIC: &[u8] = b"%PDF-";
const ZIP_MAGIC: &[u8] = b"PK\x03\x04";

pub const MIME_PDF: &str = "application/pdf";
pub const MIME_DOCX: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// Container family an adapter can be registered against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    PlainText,
    Pdf,
    Docx,
}

impl DocumentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentKind::PlainText => "plain_text",
            DocumentKind::Pdf => "pdf",
            DocumentKind::Docx => "docx",
        }
    }

    fn from_mime(mime: &str) -> Option<Self> {
        let essence = mime
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        match essence.as_str() {
            MIME_PDF | "application/x-pdf" => Some(DocumentKind::Pdf),
            MIME_DOCX => Some(DocumentKind::Docx),
            "text/plain" | "text/markdown" | "text/csv" | "text/x-markdown" => {
                Some(DocumentKind::PlainText)
            }
            _ => None,
        }
    }
}

/// An upload as handed over by the HTTP boundary. Immutable and request-scoped.
///
/// `content` is a `Bytes` handle so adapter tasks can share the buffer without copying.
#[derive(Debug, Clone)]
pub struct UploadedDocument {
    pub content: Bytes,
    pub mime_type: String,
    pub filename: String,
}

impl UploadedDocument {
    pub fn new(
        content: impl Into<Bytes>,
        mime_type: impl Into<String>,
        filename: impl Into<String>,
    ) -> Self {
        Self {
            content: content.into(),
            mime_type: mime_type.into(),
            filename: filename.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Every kind this upload plausibly belongs to: declared MIME type, filename
    /// extension and magic bytes. A mislabelled upload can therefore match several
    /// kinds; the adapter chain sorts out which one actually yields text.
    pub fn kinds(&self) -> Vec<DocumentKind> {
        let mut kinds = Vec::with_capacity(2);
        let mut push = |kind: DocumentKind| {
            if !kinds.contains(&kind) {
                kinds.push(kind);
            }
        };

        if let Some(kind) = DocumentKind::from_mime(&self.mime_type) {
            push(kind);
        }

        if let Some(guess) = mime_guess::from_path(&self.filename).first() {
            if let Some(kind) = DocumentKind::from_mime(guess.essence_str()) {
                push(kind);
            }
        }

        if let Some(kind) = self.sniff() {
            push(kind);
        }

        kinds
    }

    fn sniff(&self) -> Option<DocumentKind> {
        let head = &self.content[..self.content.len().min(1024)];
        if head.starts_with(ZIP_MAGIC) {
            // Any zip could be an OOXML package; only claim it when the part name is visible.
            let marker = b"word/";
            return head
                .windows(marker.len())
                .any(|w| w == marker)
                .then_some(DocumentKind::Docx);
        }
        if head
            .windows(PDF_MAGIC.len())
            .any(|w| w == PDF_MAGIC)
        {
            return Some(DocumentKind::Pdf);
        }
        None
    }
}
