//! Experience rows in the two fixed shapes:
//!
//! - `Title — Company (YYYY–YYYY|Present)`
//! - `Title at Company, YYYY–YYYY|Present`

use once_cell::sync::Lazy;
use regex::Regex;

use super::normalize::content_lines;
use super::vocab::section_header;
use crate::models::ExperienceEntry;

static DASH_ROW: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^(?P<title>.+?)\s+[\-–—]\s+(?P<company>.+?)\s*\(\s*(?P<start>\d{4})\s*[\-–—]\s*(?P<end>\d{4}|present|current|now)\s*\)$",
    )
    .expect("dash row pattern")
});

static AT_ROW: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^(?P<title>.+?)\s+at\s+(?P<company>.+?),\s*(?P<start>\d{4})\s*[\-–—]\s*(?P<end>\d{4}|present|current|now)$",
    )
    .expect("at row pattern")
});

/// Headers whose following rows are never experience, even when shaped like one.
const NON_EXPERIENCE_HEADERS: &[&str] = &["summary", "education", "skills"];

pub fn extract_experience(text: &str) -> Vec<ExperienceEntry> {
    content_lines(text)
        .filter(|line| !is_skippable(line))
        .filter_map(parse_row)
        .collect()
}

fn is_skippable(line: &str) -> bool {
    if line.contains('@') {
        return true;
    }
    section_header(line)
        .map(|h| NON_EXPERIENCE_HEADERS.iter().any(|n| h.contains(n)))
        .unwrap_or(false)
}

fn parse_row(line: &str) -> Option<ExperienceEntry> {
    let caps = DASH_ROW.captures(line).or_else(|| AT_ROW.captures(line))?;
    let end = &caps["end"];
    let end = if end.chars().all(|c| c.is_ascii_digit()) {
        end.to_string()
    } else {
        "Present".to_string()
    };
    Some(ExperienceEntry {
        title: caps["title"].trim().to_string(),
        employer: caps["company"].trim().to_string(),
        start: caps["start"].to_string(),
        end,
    })
}
