//! Text normalization, the first step of field extraction.
//!
//! Downstream patterns are line- and spacing-sensitive, so every adapter's output
//! is reduced to the same shape: `\n` line endings, single spaces, at most one
//! blank line in a row, no leading/trailing whitespace.

/// Normalizes raw adapter text. Odd control characters are tolerated (turned into
/// spaces), never rejected.
pub fn normalize_text(raw: &str) -> String {
    let unified = raw.replace("\r\n", "\n").replace('\r', "\n");

    let mut out = String::with_capacity(unified.len());
    let mut pending_blank = false;

    for line in unified.split('\n') {
        let collapsed = collapse_whitespace(line);
        if collapsed.is_empty() {
            pending_blank = !out.is_empty();
            continue;
        }
        if !out.is_empty() {
            out.push('\n');
            if pending_blank {
                out.push('\n');
            }
        }
        out.push_str(&collapsed);
        pending_blank = false;
    }

    out
}

/// Non-empty lines of already-normalized text.
pub fn content_lines(text: &str) -> impl Iterator<Item = &str> {
    text.lines().map(str::trim).filter(|l| !l.is_empty())
}

fn collapse_whitespace(line: &str) -> String {
    line.split(|c: char| c.is_whitespace() || c.is_control())
        .filter(|token| !token.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
