//! Secondary PDF reader: walks page content streams with `lopdf`.
//!
//! Less font-aware than `pdf-extract` but tolerant of files it refuses, and a
//! second technology for the chain to fall back on or benchmark against.

use async_trait::async_trait;
use lopdf::content::{Content, Operation};
use lopdf::{Document, Object};
use tracing::debug;

use super::pdf::PAGE_BREAK;
use super::{require_text, ExtractError, RawText, TextAdapter};
use crate::models::UploadedDocument;

pub const ADAPTER_ID: &str = "lopdf_text";

/// `TJ` adjustments are in thousandths of an em; anything wider than this is a
/// word gap rather than kerning.
const TJ_SPACE_THRESHOLD: f32 = 200.0;

pub struct LopdfTextAdapter;

#[async_trait]
impl TextAdapter for LopdfTextAdapter {
    async fn extract(&self, doc: &UploadedDocument) -> Result<RawText, ExtractError> {
        if doc.is_empty() {
            return Err(ExtractError::EmptyPayload);
        }

        let bytes = doc.content.clone();
        let text = tokio::task::spawn_blocking(move || extract_pages(&bytes))
            .await
            .map_err(|e| ExtractError::from_join(ADAPTER_ID, e))??;

        require_text(text, ADAPTER_ID)
    }
}

fn extract_pages(bytes: &[u8]) -> Result<String, ExtractError> {
    let document =
        Document::load_mem(bytes).map_err(|e| ExtractError::MalformedContainer(e.to_string()))?;

    let mut pages = Vec::new();
    for (page_no, page_id) in document.get_pages() {
        // One unreadable page should not cost the rest of the document.
        let data = match document.get_page_content(page_id) {
            Ok(data) => data,
            Err(e) => {
                debug!(adapter = ADAPTER_ID, page = page_no, error = %e, "page content unreadable");
                continue;
            }
        };
        match Content::decode(&data) {
            Ok(content) => pages.push(text_from_operations(&content.operations)),
            Err(e) => {
                debug!(adapter = ADAPTER_ID, page = page_no, error = %e, "content stream undecodable");
            }
        }
    }

    if pages.is_empty() {
        return Err(ExtractError::NoText);
    }
    Ok(pages.join(PAGE_BREAK))
}

/// Replays text-showing operators in drawing order.
fn text_from_operations(operations: &[Operation]) -> String {
    let mut out = String::new();
    let mut last_tm_y: Option<f32> = None;

    for op in operations {
        let operands = &op.operands;
        match op.operator.as_str() {
            "Tj" => {
                if let Some(s) = operands.first().and_then(pdf_string) {
                    out.push_str(&s);
                }
            }
            "TJ" => {
                if let Some(Object::Array(items)) = operands.first() {
                    for item in items {
                        match number(item) {
                            Some(adjust) if -adjust > TJ_SPACE_THRESHOLD => push_space(&mut out),
                            Some(_) => {}
                            None => {
                                if let Some(s) = pdf_string(item) {
                                    out.push_str(&s);
                                }
                            }
                        }
                    }
                }
            }
            "'" => {
                push_newline(&mut out);
                if let Some(s) = operands.first().and_then(pdf_string) {
                    out.push_str(&s);
                }
            }
            "\"" => {
                push_newline(&mut out);
                if let Some(s) = operands.get(2).and_then(pdf_string) {
                    out.push_str(&s);
                }
            }
            "Td" | "TD" => {
                let tx = operands.first().and_then(number).unwrap_or(0.0);
                let ty = operands.get(1).and_then(number).unwrap_or(0.0);
                if ty.abs() > f32::EPSILON {
                    push_newline(&mut out);
                } else if tx > 0.0 {
                    push_space(&mut out);
                }
            }
            "T*" => push_newline(&mut out),
            "Tm" => {
                let y = operands.get(5).and_then(number);
                if let (Some(prev), Some(y)) = (last_tm_y, y) {
                    if (prev - y).abs() > f32::EPSILON {
                        push_newline(&mut out);
                    } else {
                        push_space(&mut out);
                    }
                }
                last_tm_y = y.or(last_tm_y);
            }
            "ET" => push_space(&mut out),
            _ => {}
        }
    }
    out
}

fn push_newline(out: &mut String) {
    if !out.is_empty() {
        out.push('\n');
    }
}

fn push_space(out: &mut String) {
    if !out.is_empty() && !out.ends_with(char::is_whitespace) {
        out.push(' ');
    }
}

fn number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(f) => Some(*f),
        _ => None,
    }
}

fn pdf_string(obj: &Object) -> Option<String> {
    match obj {
        Object::String(bytes, _) => Some(decode_pdf_bytes(bytes)),
        _ => None,
    }
}

/// UTF-16BE when BOM-prefixed, otherwise WinAnsi (Latin-1 plus the 0x80..0x9F
/// punctuation block).
fn decode_pdf_bytes(bytes: &[u8]) -> String {
    if let Some(rest) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        let units = rest
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]));
        return char::decode_utf16(units)
            .map(|r| r.unwrap_or(char::REPLACEMENT_CHARACTER))
            .collect();
    }
    bytes.iter().map(|&b| win_ansi_char(b)).collect()
}

fn win_ansi_char(b: u8) -> char {
    match b {
        0x80 => '€',
        0x85 => '…',
        0x91 => '‘',
        0x92 => '’',
        0x93 => '“',
        0x94 => '”',
        0x95 => '•',
        0x96 => '–',
        0x97 => '—',
        _ => b as char,
    }
}
