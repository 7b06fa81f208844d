//! Short free-text summary of the candidate.

use super::normalize::content_lines;
use super::vocab::section_header;

pub const NOTES_MAX_CHARS: usize = 280;
const NOTES_MAX_LINES: usize = 3;
const MIN_SUBSTANTIVE_CHARS: usize = 40;

const SUMMARY_HEADERS: &[&str] = &[
    "summary",
    "profile",
    "about me",
    "personal statement",
    "objective",
];

/// Lines under a summary/profile header, else the first substantive lines of
/// the document. `None` when nothing qualifies.
pub fn extract_notes(text: &str) -> Option<String> {
    let lines = summary_block(text).unwrap_or_else(|| substantive_lines(text));
    if lines.is_empty() {
        return None;
    }
    Some(truncate(&lines.join(" "), NOTES_MAX_CHARS))
}

fn summary_block(text: &str) -> Option<Vec<&str>> {
    let mut lines = content_lines(text);
    lines.find(|line| {
        section_header(line)
            .map(|h| SUMMARY_HEADERS.iter().any(|s| h.contains(s)))
            .unwrap_or(false)
    })?;

    let block: Vec<&str> = lines
        .take_while(|line| section_header(line).is_none())
        .take(NOTES_MAX_LINES)
        .collect();
    (!block.is_empty()).then_some(block)
}

fn substantive_lines(text: &str) -> Vec<&str> {
    content_lines(text)
        .filter(|line| is_substantive(line))
        .take(NOTES_MAX_LINES)
        .collect()
}

fn is_substantive(line: &str) -> bool {
    if line.chars().count() < MIN_SUBSTANTIVE_CHARS || line.contains('@') {
        return false;
    }
    let visible = line.chars().filter(|c| !c.is_whitespace()).count();
    let digits = line.chars().filter(|c| c.is_ascii_digit()).count();
    digits * 2 < visible
}

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max_chars - 1).collect();
    out.truncate(out.trim_end().len());
    out.push('…');
    out
}
