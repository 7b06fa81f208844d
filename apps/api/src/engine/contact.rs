//! Email and phone extraction.

use once_cell::sync::Lazy;
use regex::Regex;

/// Résumé headers are the highest-precision place for a phone number.
const HEADER_WINDOW_CHARS: usize = 500;
const MIN_PHONE_DIGITS: usize = 7;
const MAX_PHONE_DIGITS: usize = 15;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)[a-z0-9._%+\-]+@[a-z0-9.\-]+\.[a-z]{2,}").expect("email pattern")
});

/// Ordered locale-shaped patterns. Separators are restricted to ` `, `.` and `-`
/// so a match never runs across a line break into a following date.
static PHONE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        // +44 20 7946 0958, +1-202-555-0143, +44 (0)20 7946 0958
        r"\+\d{1,3}[ .\-]?(?:\(0\)[ .\-]?)?\(?\d{1,5}\)?(?:[ .\-]?\d{2,5}){1,4}",
        // (020) 7946 0958
        r"\(0\d{1,4}\)[ .\-]?\d{3,4}[ .\-]?\d{3,4}",
        // (202) 555-0143, 202-555-0143
        r"\(\d{3}\)[ .\-]?\d{3}[ .\-]\d{4}",
        r"\b\d{3}[.\-]\d{3}[.\-]\d{4}\b",
        // 07700 900123, 020 7946 0958
        r"\b0\d{2,4}[ .\-]?\d{3,4}[ .\-]?\d{3,4}\b",
        // bare digit runs
        r"\b\d{10,15}\b",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("phone pattern"))
    .collect()
});

/// First `local@domain.tld` shaped token anywhere in the text.
pub fn extract_email(text: &str) -> Option<String> {
    EMAIL_RE
        .find(text)
        .map(|m| m.as_str().trim_end_matches('.').to_string())
}

/// Stricter check used by the scorer: a token can match the loose pattern and
/// still be junk (`a..b@x.com`, `.x@y.org`).
pub fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || local.starts_with('.') || local.ends_with('.') || local.contains("..")
    {
        return false;
    }
    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 2 {
        return false;
    }
    let tld_ok = labels
        .last()
        .map(|tld| tld.len() >= 2 && tld.chars().all(|c| c.is_ascii_alphabetic()))
        .unwrap_or(false);
    tld_ok
        && labels
            .iter()
            .all(|l| !l.is_empty() && !l.starts_with('-') && !l.ends_with('-'))
}

/// Header window first, then the whole document. Among the matches of a pass the
/// one with the most digits wins; earlier patterns and positions win ties.
pub fn extract_phone(text: &str) -> Option<String> {
    let header = header_window(text);
    best_phone(header).or_else(|| {
        if header.len() < text.len() {
            best_phone(text)
        } else {
            None
        }
    })
}

/// First `HEADER_WINDOW_CHARS` characters, extended to the end of that line so a
/// number straddling the cut is never truncated.
fn header_window(text: &str) -> &str {
    let Some((idx, _)) = text.char_indices().nth(HEADER_WINDOW_CHARS) else {
        return text;
    };
    match text[idx..].find('\n') {
        Some(offset) => &text[..idx + offset],
        None => text,
    }
}

fn best_phone(haystack: &str) -> Option<String> {
    let mut best: Option<(usize, &str)> = None;
    for pattern in PHONE_PATTERNS.iter() {
        for m in pattern.find_iter(haystack) {
            let candidate = m.as_str().trim();
            let digits = digit_count(candidate);
            if !(MIN_PHONE_DIGITS..=MAX_PHONE_DIGITS).contains(&digits) {
                continue;
            }
            if best.map(|(d, _)| digits > d).unwrap_or(true) {
                best = Some((digits, candidate));
            }
        }
    }
    best.map(|(_, phone)| phone.to_string())
}

fn digit_count(s: &str) -> usize {
    s.chars().filter(|c| c.is_ascii_digit()).count()
}
