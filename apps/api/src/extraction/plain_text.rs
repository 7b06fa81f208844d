//! Plain-text uploads (`.txt`, `.md`, `.csv`).

use async_trait::async_trait;

use super::{ExtractError, RawText, TextAdapter};
use crate::models::UploadedDocument;

pub const ADAPTER_ID: &str = "plain_text";

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";
const UTF16_LE_BOM: &[u8] = b"\xFF\xFE";
const UTF16_BE_BOM: &[u8] = b"\xFE\xFF";

/// Decodes the upload as text. Never rejects odd bytes; only an empty buffer fails.
pub struct PlainTextAdapter;

#[async_trait]
impl TextAdapter for PlainTextAdapter {
    async fn extract(&self, doc: &UploadedDocument) -> Result<RawText, ExtractError> {
        if doc.is_empty() {
            return Err(ExtractError::EmptyPayload);
        }
        Ok(RawText::new(decode_text(&doc.content), ADAPTER_ID))
    }
}

fn decode_text(bytes: &[u8]) -> String {
    if let Some(rest) = bytes.strip_prefix(UTF8_BOM) {
        return String::from_utf8_lossy(rest).into_owned();
    }
    if let Some(rest) = bytes.strip_prefix(UTF16_LE_BOM) {
        return decode_utf16(rest, u16::from_le_bytes);
    }
    if let Some(rest) = bytes.strip_prefix(UTF16_BE_BOM) {
        return decode_utf16(rest, u16::from_be_bytes);
    }
    String::from_utf8_lossy(bytes).into_owned()
}

fn decode_utf16(bytes: &[u8], unit: fn([u8; 2]) -> u16) -> String {
    let units = bytes.chunks_exact(2).map(|pair| unit([pair[0], pair[1]]));
    char::decode_utf16(units)
        .map(|r| r.unwrap_or(char::REPLACEMENT_CHARACTER))
        .collect()
}
