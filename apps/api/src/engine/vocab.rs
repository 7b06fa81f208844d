//! Shared word lists for the field heuristics. All entries are lowercase.

/// Role nouns that make a phrase look like a job title.
pub const ROLE_KEYWORDS: &[&str] = &[
    "manager",
    "director",
    "analyst",
    "advisor",
    "adviser",
    "officer",
    "consultant",
    "engineer",
    "developer",
    "executive",
    "head",
    "lead",
    "specialist",
    "coordinator",
    "co-ordinator",
    "assistant",
    "associate",
    "strategist",
    "researcher",
    "writer",
    "editor",
    "designer",
    "administrator",
    "partner",
    "president",
    "founder",
    "chief",
    "secretary",
    "counsel",
    "lawyer",
    "solicitor",
    "accountant",
    "architect",
    "scientist",
    "intern",
    "producer",
    "planner",
    "organiser",
    "organizer",
    "campaigner",
    "spokesperson",
    "journalist",
    "caseworker",
    "representative",
    "supervisor",
    "fellow",
    "vp",
];

/// Legal-form suffixes that confirm the employer side of a `Title at Company` line.
pub const COMPANY_SUFFIXES: &[&str] = &[
    "ltd",
    "limited",
    "plc",
    "inc",
    "llc",
    "llp",
    "lp",
    "gmbh",
    "ag",
    "sa",
    "bv",
    "nv",
    "pty",
    "corp",
    "corporation",
    "co",
    "company",
    "group",
    "holdings",
    "partners",
    "associates",
    "agency",
    "consulting",
    "foundation",
    "trust",
    "charity",
];

/// Institutional nouns that appear in political CVs as boilerplate, never as a
/// title or employer on their own.
pub const FALSE_POSITIVE_ROLES: &[&str] = &[
    "government",
    "parliament",
    "westminster",
    "whitehall",
    "civil service",
    "house of commons",
    "house of lords",
    "the government",
    "uk parliament",
];

/// Section headers that end an experience/summary block.
pub const SECTION_HEADERS: &[&str] = &[
    "summary",
    "profile",
    "professional summary",
    "personal profile",
    "personal statement",
    "executive summary",
    "career summary",
    "about me",
    "objective",
    "career objective",
    "education",
    "education and training",
    "qualifications",
    "skills",
    "key skills",
    "core skills",
    "skills and expertise",
    "interests",
    "hobbies",
    "references",
    "languages",
    "certifications",
    "achievements",
    "work experience",
    "professional experience",
    "experience",
    "employment",
    "employment history",
    "career history",
    "volunteering",
    "publications",
    "contact",
];

pub fn is_role_word(word: &str) -> bool {
    let w = word
        .trim_matches(|c: char| !c.is_alphanumeric() && c != '-')
        .to_lowercase();
    ROLE_KEYWORDS.contains(&w.as_str())
}

pub fn contains_role_word(phrase: &str) -> bool {
    phrase.split_whitespace().any(is_role_word)
}

pub fn is_false_positive(phrase: &str) -> bool {
    let p = phrase.trim().trim_end_matches('.').to_lowercase();
    FALSE_POSITIVE_ROLES.contains(&p.as_str())
}

pub fn has_company_suffix(phrase: &str) -> bool {
    phrase
        .split_whitespace()
        .last()
        .map(|w| {
            let w = w.trim_matches(|c: char| !c.is_alphanumeric()).to_lowercase();
            COMPANY_SUFFIXES.contains(&w.as_str())
        })
        .unwrap_or(false)
}

/// Lowercased header text with a trailing colon removed, if the line is one of
/// the known section headers.
pub fn section_header(line: &str) -> Option<String> {
    let key = line.trim().trim_end_matches(':').trim().to_lowercase();
    SECTION_HEADERS.contains(&key.as_str()).then_some(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_word_ignores_punctuation_and_case() {
        assert!(is_role_word("Manager,"));
        assert!(is_role_word("ADVISOR"));
        assert!(!is_role_word("Acme"));
    }

    #[test]
    fn test_company_suffix_on_last_word() {
        assert!(has_company_suffix("Acme Widgets Ltd."));
        assert!(has_company_suffix("Northwind PLC"));
        assert!(!has_company_suffix("Acme Widgets"));
    }

    #[test]
    fn test_false_positive_exact_phrase_only() {
        assert!(is_false_positive("Parliament"));
        assert!(is_false_positive("House of Commons"));
        assert!(!is_false_positive("Parliamentary Researcher"));
    }

    #[test]
    fn test_section_header_strips_colon() {
        assert_eq!(section_header("Education:").as_deref(), Some("education"));
        assert!(section_header("Education at Oxford").is_none());
    }
}
