//! Raw text extractors.
//!
//! Every container technology sits behind `TextAdapter` so the orchestrator can
//! try them in order, time them out, and compare them without knowing which
//! library is underneath. Adapters only produce text; fields come from `engine`.

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use crate::models::UploadedDocument;

pub mod docx;
pub mod lopdf_text;
pub mod pdf;
pub mod plain_text;
pub mod registry;

pub use registry::{AdapterDescriptor, AdapterRegistry};

/// Text recovered by one adapter, before normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawText {
    pub text: String,
    /// Adapter id that produced the text.
    pub source_label: &'static str,
}

impl RawText {
    pub fn new(text: impl Into<String>, source_label: &'static str) -> Self {
        Self {
            text: text.into(),
            source_label,
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ExtractError {
    #[error("document is empty")]
    EmptyPayload,

    #[error("malformed container: {0}")]
    MalformedContainer(String),

    #[error("unsupported encoding: {0}")]
    UnsupportedEncoding(String),

    #[error("no text recovered from document")]
    NoText,

    #[error("internal adapter error: {0}")]
    Internal(String),
}

impl ExtractError {
    pub fn kind(&self) -> FailureKind {
        match self {
            ExtractError::EmptyPayload => FailureKind::EmptyPayload,
            ExtractError::MalformedContainer(_) => FailureKind::MalformedContainer,
            ExtractError::UnsupportedEncoding(_) => FailureKind::UnsupportedEncoding,
            ExtractError::NoText => FailureKind::NoText,
            ExtractError::Internal(_) => FailureKind::Internal,
        }
    }

    /// Maps a failed `spawn_blocking` join (a panic inside a vendor reader) to an
    /// adapter-local error.
    pub(crate) fn from_join(adapter: &str, e: tokio::task::JoinError) -> Self {
        ExtractError::Internal(format!("{adapter} reader task failed: {e}"))
    }
}

/// Why an attempt failed, as reported on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    EmptyPayload,
    MalformedContainer,
    UnsupportedEncoding,
    NoText,
    Timeout,
    Internal,
}

/// One raw-text extraction technology.
///
/// Implementations must not panic on hostile input and must run CPU-bound
/// parsing inside `tokio::task::spawn_blocking`.
#[async_trait]
pub trait TextAdapter: Send + Sync {
    async fn extract(&self, doc: &UploadedDocument) -> Result<RawText, ExtractError>;
}

/// `NoText` for output that is blank once whitespace and page breaks are ignored.
pub(crate) fn require_text(text: String, source_label: &'static str) -> Result<RawText, ExtractError> {
    if text.trim().is_empty() {
        Err(ExtractError::NoText)
    } else {
        Ok(RawText::new(text, source_label))
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    //! In-test document builders shared by the adapter and orchestration tests.

    use std::io::{Cursor, Write};

    use lopdf::{dictionary, Document, Object, Stream};

    /// A one-font PDF with one page per entry; each line is drawn 14pt below the last.
    pub fn pdf_with_pages(pages: &[&[&str]]) -> Vec<u8> {
        let mut doc = Document::with_version("1.4");
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
        });

        let mut page_ids = Vec::new();
        for lines in pages {
            let mut content = String::from("BT /F1 12 Tf 72 720 Td ");
            for (i, line) in lines.iter().enumerate() {
                if i > 0 {
                    content.push_str("0 -14 Td ");
                }
                let escaped = line.replace('\\', "\\\\").replace('(', "\\(").replace(')', "\\)");
                content.push_str(&format!("({escaped}) Tj "));
            }
            content.push_str("ET");

            let content_id = doc.add_object(Stream::new(dictionary! {}, content.into_bytes()));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
                "Contents" => content_id,
                "Resources" => dictionary! {
                    "Font" => dictionary! { "F1" => font_id },
                },
            });
            page_ids.push(page_id);
        }

        let pages_id = doc.add_object(dictionary! {
            "Type" => "Pages",
            "Kids" => page_ids.iter().map(|id| Object::from(*id)).collect::<Vec<_>>(),
            "Count" => page_ids.len() as i64,
        });
        for id in &page_ids {
            if let Ok(Object::Dictionary(dict)) = doc.get_object_mut(*id) {
                dict.set("Parent", pages_id);
            }
        }

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut out = Vec::new();
        doc.save_to(&mut out).expect("save pdf fixture");
        out
    }

    /// A DOCX package from `(part name, xml)` pairs. `[Content_Types].xml` is added.
    pub fn docx_with_parts(parts: &[(&str, &str)]) -> Vec<u8> {
        let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
        let options = zip::write::SimpleFileOptions::default();

        zip.start_file("[Content_Types].xml", options).expect("start content types");
        zip.write_all(br#"<?xml version="1.0" encoding="UTF-8"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"/>"#)
            .expect("write content types");
        for (name, xml) in parts {
            zip.start_file(*name, options).expect("start part");
            zip.write_all(xml.as_bytes()).expect("write part");
        }
        zip.finish().expect("finish zip").into_inner()
    }

    /// Wraps body XML in a `w:document` with the usual namespace declarations.
    pub fn document_xml(body: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main" xmlns:mc="http://schemas.openxmlformats.org/markup-compatibility/2006" xmlns:wps="http://schemas.microsoft.com/office/word/2010/wordprocessingShape" xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:v="urn:schemas-microsoft-com:vml" xmlns:wp="http://schemas.openxmlformats.org/drawingml/2006/wordprocessingDrawing"><w:body>{body}</w:body></w:document>"#
        )
    }

    pub fn paragraph(text: &str) -> String {
        format!(r#"<w:p><w:r><w:t xml:space="preserve">{text}</w:t></w:r></w:p>"#)
    }

    pub fn simple_docx(lines: &[&str]) -> Vec<u8> {
        let body: String = lines.iter().map(|l| paragraph(l)).collect();
        docx_with_parts(&[("word/document.xml", &document_xml(&body))])
    }
}
