//! DOCX reader.
//!
//! A DOCX file is a zip package of WordprocessingML parts. Text is taken from the
//! header parts, `word/document.xml` and the footer parts, in that order. Text
//! boxes (`w:txbxContent`) and DrawingML shapes (`a:p`/`a:r`/`a:t`) are walked like
//! ordinary paragraphs; résumé templates often keep contact details there.
//! `mc:Fallback` holds a VML copy of the same text box and is skipped.

use std::io::{Cursor, Read, Seek};

use async_trait::async_trait;
use quick_xml::events::Event;
use quick_xml::Reader;
use tracing::debug;
use zip::ZipArchive;

use super::{require_text, ExtractError, RawText, TextAdapter};
use crate::models::UploadedDocument;

pub const ADAPTER_ID: &str = "docx";

const DOCUMENT_PART: &str = "word/document.xml";
const HEADER_PREFIX: &str = "word/header";
const FOOTER_PREFIX: &str = "word/footer";
/// Cap on one decompressed part; the upload limit only bounds the compressed size.
const MAX_PART_BYTES: u64 = 32 * 1024 * 1024;

pub struct DocxAdapter;

#[async_trait]
impl TextAdapter for DocxAdapter {
    async fn extract(&self, doc: &UploadedDocument) -> Result<RawText, ExtractError> {
        if doc.is_empty() {
            return Err(ExtractError::EmptyPayload);
        }

        let bytes = doc.content.clone();
        let text = tokio::task::spawn_blocking(move || extract_docx(&bytes))
            .await
            .map_err(|e| ExtractError::from_join(ADAPTER_ID, e))??;

        require_text(text, ADAPTER_ID)
    }
}

fn extract_docx(bytes: &[u8]) -> Result<String, ExtractError> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| ExtractError::MalformedContainer(format!("not a zip package: {e}")))?;

    let names: Vec<String> = archive.file_names().map(str::to_string).collect();
    if !names.iter().any(|n| n == DOCUMENT_PART) {
        return Err(ExtractError::MalformedContainer(format!(
            "missing {DOCUMENT_PART}"
        )));
    }

    let mut parts = xml_parts_with_prefix(&names, HEADER_PREFIX);
    parts.push(DOCUMENT_PART.to_string());
    parts.extend(xml_parts_with_prefix(&names, FOOTER_PREFIX));

    let mut lines = Vec::new();
    for part in &parts {
        let xml = read_part(&mut archive, part, MAX_PART_BYTES)?;
        let part_lines = paragraph_lines(&xml)
            .map_err(|e| ExtractError::MalformedContainer(format!("{part}: {e}")))?;
        debug!(adapter = ADAPTER_ID, part = %part, lines = part_lines.len(), "docx part read");
        lines.extend(part_lines);
    }
    Ok(lines.join("\n"))
}

fn xml_parts_with_prefix(names: &[String], prefix: &str) -> Vec<String> {
    let mut parts: Vec<String> = names
        .iter()
        .filter(|n| n.starts_with(prefix) && n.ends_with(".xml"))
        .cloned()
        .collect();
    parts.sort_by_key(|n| (part_number(n, prefix), n.clone()));
    parts
}

/// `word/header10.xml` -> 10, so `header2` sorts before `header10`.
fn part_number(name: &str, prefix: &str) -> Option<u32> {
    name.strip_prefix(prefix)?.strip_suffix(".xml")?.parse().ok()
}

fn read_part<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    name: &str,
    limit: u64,
) -> Result<String, ExtractError> {
    let file = archive
        .by_name(name)
        .map_err(|e| ExtractError::MalformedContainer(format!("{name}: {e}")))?;
    let mut raw = Vec::new();
    file.take(limit + 1)
        .read_to_end(&mut raw)
        .map_err(|e| ExtractError::MalformedContainer(format!("{name}: {e}")))?;
    if raw.len() as u64 > limit {
        return Err(ExtractError::MalformedContainer(format!(
            "{name} expands past {limit} bytes"
        )));
    }
    String::from_utf8(raw).map_err(|e| ExtractError::UnsupportedEncoding(format!("{name}: {e}")))
}

/// A paragraph being assembled. `run` holds the text of the open run, if any.
#[derive(Default)]
struct Paragraph {
    text: String,
    run: Option<String>,
}

impl Paragraph {
    fn sink(&mut self) -> &mut String {
        self.run.as_mut().unwrap_or(&mut self.text)
    }

    /// Runs are joined with one space unless either side already has whitespace
    /// at the boundary.
    fn close_run(&mut self) {
        let Some(run) = self.run.take() else {
            return;
        };
        if run.is_empty() {
            return;
        }
        let needs_space = !self.text.is_empty()
            && !self.text.ends_with(char::is_whitespace)
            && !run.starts_with(char::is_whitespace);
        if needs_space {
            self.text.push(' ');
        }
        self.text.push_str(&run);
    }
}

/// One line per non-empty paragraph, in document order. Paragraphs nested inside
/// another (text boxes anchored in a body paragraph) become their own lines.
fn paragraph_lines(xml: &str) -> Result<Vec<String>, quick_xml::Error> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(false);

    let mut buf = Vec::new();
    let mut stack: Vec<Paragraph> = Vec::new();
    let mut lines = Vec::new();
    let mut in_text = false;
    // Depth inside an `mc:Fallback` subtree; 0 when not skipping.
    let mut skip_depth = 0usize;

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => {
                if skip_depth > 0 {
                    skip_depth += 1;
                } else {
                    match e.local_name().as_ref() {
                        b"Fallback" => skip_depth = 1,
                        b"p" => stack.push(Paragraph::default()),
                        b"r" => {
                            if let Some(p) = stack.last_mut() {
                                p.close_run();
                                p.run = Some(String::new());
                            }
                        }
                        b"t" => in_text = true,
                        _ => {}
                    }
                }
            }
            Event::Empty(e) => {
                // `w:tab` also appears in paragraph tab-stop definitions; only
                // count it inside a run.
                if skip_depth == 0 {
                    if let Some(p) = stack.last_mut().filter(|p| p.run.is_some()) {
                        match e.local_name().as_ref() {
                            b"tab" => p.sink().push(' '),
                            b"br" | b"cr" => p.sink().push('\n'),
                            _ => {}
                        }
                    }
                }
            }
            Event::Text(e) => {
                if skip_depth == 0 && in_text {
                    if let Some(p) = stack.last_mut() {
                        p.sink().push_str(&e.unescape()?);
                    }
                }
            }
            Event::End(e) => {
                if skip_depth > 0 {
                    skip_depth -= 1;
                } else {
                    match e.local_name().as_ref() {
                        b"t" => in_text = false,
                        b"r" => {
                            if let Some(p) = stack.last_mut() {
                                p.close_run();
                            }
                        }
                        b"p" => {
                            if let Some(mut p) = stack.pop() {
                                p.close_run();
                                let line = p.text.trim();
                                if !line.is_empty() {
                                    lines.push(line.to_string());
                                }
                            }
                        }
                        _ => {}
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(lines)
}
