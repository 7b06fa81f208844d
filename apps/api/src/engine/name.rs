use super::normalize::content_lines;
use super::vocab::is_role_word;

/// Only the first few lines are trusted to hold the candidate's name.
const NAME_LOOKAHEAD_LINES: usize = 3;

/// Title-page words that look like a `Word Word` name but never are.
const HEADING_WORDS: &[&str] = &[
    "curriculum",
    "vitae",
    "resume",
    "résumé",
    "cv",
    "profile",
    "summary",
    "contact",
    "personal",
    "details",
    "experience",
    "education",
];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersonName {
    pub first: String,
    pub last: String,
}

/// Finds the candidate's name in the first `NAME_LOOKAHEAD_LINES` non-empty lines.
///
/// Returns `None` rather than guessing (e.g. from the email local part); the
/// scorer reflects the missing name instead.
pub fn extract_name(text: &str) -> Option<PersonName> {
    content_lines(text)
        .take(NAME_LOOKAHEAD_LINES)
        .find_map(parse_name_line)
}

fn parse_name_line(line: &str) -> Option<PersonName> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if !(2..=4).contains(&tokens.len()) {
        return None;
    }
    if !tokens.iter().all(|t| is_name_token(t)) {
        return None;
    }
    if tokens
        .iter()
        .any(|t| HEADING_WORDS.contains(&t.to_lowercase().as_str()))
    {
        return None;
    }
    // "Senior Policy Advisor" has the same shape as a name.
    if tokens.iter().any(|t| is_role_word(t)) {
        return None;
    }

    Some(PersonName {
        first: tokens[0].to_string(),
        last: tokens[1..].join(" "),
    })
}

/// Alphabetic, longer than one character, capitalized; inner `-` and `'` allowed
/// for names like "Smith-Jones" or "O'Neil".
fn is_name_token(token: &str) -> bool {
    let chars: Vec<char> = token.chars().collect();
    if chars.len() < 2 || !chars[0].is_uppercase() {
        return false;
    }
    let last = chars.len() - 1;
    chars.iter().enumerate().all(|(i, &c)| {
        c.is_alphabetic() || (matches!(c, '-' | '\'' | '\u{2019}') && i != 0 && i != last)
    })
}
