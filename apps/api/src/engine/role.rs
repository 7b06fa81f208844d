//! Current title / employer detection.
//!
//! Order of preference:
//! 1. An experience section header ("Work Experience" exact match first, then a
//!    short heading mentioning experience/employment/career) followed within a few
//!    lines by a title-shaped line.
//! 2. Without a header, `Title at Company` style lines in the first 15 lines,
//!    validated against the role and company vocabularies.
//! 3. The first experience row still marked "Present".

use once_cell::sync::Lazy;
use regex::Regex;

use super::normalize::content_lines;
use super::vocab::{contains_role_word, has_company_suffix, is_false_positive, section_header};
use crate::models::ExperienceEntry;

const SECTION_SCAN_LINES: usize = 6;
const FALLBACK_SCAN_LINES: usize = 15;
const MAX_PHRASE_WORDS: usize = 8;

const EXACT_EXPERIENCE_HEADERS: &[&str] = &["work experience", "professional experience"];
const LOOSE_HEADER_TERMS: &[&str] = &["experience", "employment", "career"];
const NOT_EXPERIENCE_TERMS: &[&str] = &["summary", "objective", "profile", "statement"];

/// Lower-case words allowed inside a capitalized title phrase.
const CONNECTORS: &[&str] = &["of", "and", "for", "the", "to", "in", "on", "&", "/", "-"];

static TRAILING_DATES: Lazy<Regex> = Lazy::new(|| {
    let month = r"(?:jan|feb|mar|apr|may|jun|jul|aug|sep|sept|oct|nov|dec)[a-z]*\.?\s+";
    Regex::new(&format!(
        r"(?i)[\s,|(\-–—]*(?:{month})?\d{{4}}\s*(?:[\-–—]|to)\s*(?:{month})?(?:\d{{4}}|present|current|now)\s*\)?\s*$"
    ))
    .expect("date range pattern")
});

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CurrentRole {
    pub title: Option<String>,
    pub employer: Option<String>,
}

impl CurrentRole {
    fn pair(title: &str, employer: Option<&str>) -> Self {
        Self {
            title: Some(title.to_string()),
            employer: employer.map(str::to_string),
        }
    }
}

pub fn extract_current_role(text: &str, experience: &[ExperienceEntry]) -> CurrentRole {
    let lines: Vec<&str> = content_lines(text).collect();

    if let Some(header) = find_experience_header(&lines) {
        if let Some(role) = scan_experience_section(&lines, header) {
            return role;
        }
    } else if let Some(role) = scan_header_lines(&lines) {
        return role;
    }

    experience
        .iter()
        .find(|e| e.is_current())
        .map(|e| CurrentRole::pair(&e.title, Some(&e.employer)))
        .unwrap_or_default()
}

fn find_experience_header(lines: &[&str]) -> Option<usize> {
    let key = |line: &str| line.trim().trim_end_matches(':').trim().to_lowercase();

    lines
        .iter()
        .position(|l| EXACT_EXPERIENCE_HEADERS.contains(&key(l).as_str()))
        .or_else(|| lines.iter().position(|l| is_loose_experience_header(&key(l))))
}

/// A short heading, not a sentence: few words, no sentence punctuation.
fn is_loose_experience_header(key: &str) -> bool {
    let words = key.split_whitespace().count();
    (1..=4).contains(&words)
        && key.len() <= 40
        && !key.contains(['.', ',', ';', '!', '?', '@'])
        && !key.chars().any(|c| c.is_ascii_digit())
        && LOOSE_HEADER_TERMS.iter().any(|t| key.contains(t))
        && !NOT_EXPERIENCE_TERMS.iter().any(|t| key.contains(t))
}

fn scan_experience_section(lines: &[&str], header: usize) -> Option<CurrentRole> {
    let window: Vec<String> = lines
        .iter()
        .skip(header + 1)
        .take(SECTION_SCAN_LINES)
        .take_while(|l| section_header(l).is_none())
        .map(|l| strip_dates(l))
        .collect();

    for line in &window {
        if let Some((title, employer)) = split_title_employer(line, false) {
            return Some(CurrentRole::pair(&title, Some(&employer)));
        }
    }

    // Role-noun titles beat bare capitalized phrases ("Acme Group" above
    // "Policy Advisor" must not become the title).
    for require_role_noun in [true, false] {
        for (i, line) in window.iter().enumerate() {
            if !looks_like_title(line, require_role_noun) {
                continue;
            }
            let employer = neighbour_employer(&window, i);
            return Some(CurrentRole::pair(line, employer));
        }
    }
    None
}

fn scan_header_lines(lines: &[&str]) -> Option<CurrentRole> {
    lines
        .iter()
        .take(FALLBACK_SCAN_LINES)
        .map(|l| strip_dates(l))
        .find_map(|l| split_title_employer(&l, true))
        .map(|(title, employer)| CurrentRole::pair(&title, Some(&employer)))
}

/// Employer for a title found on its own line: the next line, else the previous.
fn neighbour_employer(window: &[String], title_idx: usize) -> Option<&str> {
    let next = window.get(title_idx + 1);
    let prev = title_idx.checked_sub(1).and_then(|i| window.get(i));
    [next, prev]
        .into_iter()
        .flatten()
        .map(String::as_str)
        .find(|l| looks_like_employer(l, false))
}

/// Splits `Title at Company`, `Title @ Company`, `Title — Company`,
/// `Company — Title`, `Title | Company` and `Title, Company`.
///
/// `strict` applies the header-scan validation: a role noun on the title side and a
/// company suffix or at least two words on the employer side.
fn split_title_employer(line: &str, strict: bool) -> Option<(String, String)> {
    if line.is_empty() || has_email(line) {
        return None;
    }

    let mut candidates: Vec<(&str, &str)> = Vec::new();
    for sep in [" at ", " @ "] {
        if let Some((t, c)) = line.split_once(sep) {
            candidates.push((t, c));
        }
    }
    for sep in [" — ", " – ", " - ", " | "] {
        if let Some((a, b)) = line.split_once(sep) {
            // Either order is legal; the side with the role noun is the title.
            if contains_role_word(a) {
                candidates.push((a, b));
            } else if contains_role_word(b) {
                candidates.push((b, a));
            }
        }
    }
    if let Some((t, c)) = line.split_once(", ") {
        candidates.push((t, c));
    }

    candidates.into_iter().find_map(|(title, employer)| {
        let title = title.trim();
        let employer = employer.trim().trim_end_matches(['.', ',']);
        let title_ok = if strict {
            contains_role_word(title) && word_count(title) <= MAX_PHRASE_WORDS
        } else {
            looks_like_title(title, true)
        };
        (title_ok && looks_like_employer(employer, strict) && !is_false_positive(title))
            .then(|| (title.to_string(), employer.to_string()))
    })
}

/// Capitalized phrase of a few words, optionally requiring a role noun.
fn looks_like_title(line: &str, require_role_noun: bool) -> bool {
    if line.is_empty()
        || has_email(line)
        || line.ends_with('.')
        || section_header(line).is_some()
        || is_false_positive(line)
    {
        return false;
    }
    let words: Vec<&str> = line.split_whitespace().collect();
    if words.is_empty() || words.len() > MAX_PHRASE_WORDS {
        return false;
    }
    let capitalized = words.iter().all(|w| {
        w.chars().next().map(char::is_uppercase).unwrap_or(false)
            || CONNECTORS.contains(&w.to_lowercase().as_str())
    });
    capitalized && (!require_role_noun || contains_role_word(line))
}

fn looks_like_employer(phrase: &str, strict: bool) -> bool {
    let words = word_count(phrase);
    if words == 0
        || words > MAX_PHRASE_WORDS
        || has_email(phrase)
        || section_header(phrase).is_some()
        || is_false_positive(phrase)
        || !phrase.chars().next().map(char::is_uppercase).unwrap_or(false)
        || phrase.chars().all(|c| c.is_ascii_digit() || c.is_whitespace())
    {
        return false;
    }
    !strict || has_company_suffix(phrase) || words >= 2
}

fn strip_dates(line: &str) -> String {
    TRAILING_DATES.replace(line, "").trim().to_string()
}

fn has_email(line: &str) -> bool {
    line.split_whitespace().any(|w| w.contains('@') && w.len() > 1)
}

fn word_count(s: &str) -> usize {
    s.split_whitespace().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn role(text: &str) -> CurrentRole {
        extract_current_role(text, &[])
    }

    #[test]
    fn test_title_at_company_in_header() {
        let r = role("Jane Doe\njane@example.com\nSenior Policy Advisor at Acme Group");
        assert_eq!(r.title.as_deref(), Some("Senior Policy Advisor"));
        assert_eq!(r.employer.as_deref(), Some("Acme Group"));
    }

    #[test]
    fn test_company_dash_title_in_header() {
        let r = role("Jane Doe\nNorthwind Ltd — Head of Communications");
        assert_eq!(r.title.as_deref(), Some("Head of Communications"));
        assert_eq!(r.employer.as_deref(), Some("Northwind Ltd"));
    }

    #[test]
    fn test_title_at_sign_company() {
        let r = role("Jane Doe\nCampaigns Manager @ Green Futures");
        assert_eq!(r.title.as_deref(), Some("Campaigns Manager"));
        assert_eq!(r.employer.as_deref(), Some("Green Futures"));
    }

    #[test]
    fn test_header_scan_requires_role_noun() {
        let r = role("Jane Doe\nLondon, United Kingdom");
        assert_eq!(r, CurrentRole::default());
    }

    #[test]
    fn test_header_scan_rejects_single_word_company_without_suffix() {
        let r = role("Jane Doe\nPolicy Advisor, Acme");
        assert!(r.title.is_none());
        let r = role("Jane Doe\nPolicy Advisor, Acme Ltd");
        assert_eq!(r.employer.as_deref(), Some("Acme Ltd"));
    }

    #[test]
    fn test_header_scan_limited_to_first_lines() {
        let filler = "Lorem ipsum dolor sit amet\n".repeat(20);
        let text = format!("Jane Doe\n{filler}Policy Advisor at Acme Group");
        assert_eq!(role(&text), CurrentRole::default());
    }

    #[test]
    fn test_experience_section_title_then_employer() {
        let text = "Jane Doe\n\nWork Experience\nSenior Press Officer\nNorthwind Trust\n2019 - Present";
        let r = role(text);
        assert_eq!(r.title.as_deref(), Some("Senior Press Officer"));
        assert_eq!(r.employer.as_deref(), Some("Northwind Trust"));
    }

    #[test]
    fn test_experience_section_employer_then_title() {
        let text = "Experience\nAcme Group\nCommunications Manager\nJan 2020 - Present";
        let r = role(text);
        assert_eq!(r.title.as_deref(), Some("Communications Manager"));
        assert_eq!(r.employer.as_deref(), Some("Acme Group"));
    }

    #[test]
    fn test_experience_section_pair_with_dates() {
        let text = "Professional Experience:\nPolicy Analyst — Acme Ltd (2018 – 2021)";
        let r = role(text);
        assert_eq!(r.title.as_deref(), Some("Policy Analyst"));
        assert_eq!(r.employer.as_deref(), Some("Acme Ltd"));
    }

    #[test]
    fn test_blacklisted_institutions_rejected() {
        let text = "Career History\nParliament\nWestminster\nParliamentary Researcher\nOffice of J Smith MP";
        let r = role(text);
        assert_eq!(r.title.as_deref(), Some("Parliamentary Researcher"));
        assert_eq!(r.employer.as_deref(), Some("Office of J Smith MP"));
    }

    #[test]
    fn test_sentence_mentioning_experience_is_not_a_header() {
        let lines = vec!["I have ten years of experience in policy."];
        assert!(find_experience_header(&lines).is_none());
    }

    #[test]
    fn test_career_summary_is_not_experience_header() {
        let lines = vec!["Career Summary", "Employment"];
        assert_eq!(find_experience_header(&lines), Some(1));
    }

    #[test]
    fn test_exact_header_preferred_over_loose() {
        let lines = vec!["Career Highlights", "Work Experience"];
        assert_eq!(find_experience_header(&lines), Some(1));
    }

    #[test]
    fn test_falls_back_to_current_experience_row() {
        let entries = vec![
            ExperienceEntry {
                title: "Researcher".to_string(),
                employer: "Think Tank".to_string(),
                start: "2015".to_string(),
                end: "2018".to_string(),
            },
            ExperienceEntry {
                title: "Policy Lead".to_string(),
                employer: "Acme Ltd".to_string(),
                start: "2018".to_string(),
                end: "Present".to_string(),
            },
        ];
        let r = extract_current_role("nothing useful here", &entries);
        assert_eq!(r.title.as_deref(), Some("Policy Lead"));
        assert_eq!(r.employer.as_deref(), Some("Acme Ltd"));
    }

    #[test]
    fn test_strip_dates_variants() {
        assert_eq!(strip_dates("Policy Officer, 2019–Present"), "Policy Officer");
        assert_eq!(strip_dates("Analyst (Mar 2017 - Dec 2019)"), "Analyst");
        assert_eq!(strip_dates("2019 to 2021"), "");
    }
}
