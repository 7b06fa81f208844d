//! Keyword classification into the fixed `Skill` vocabulary.
//!
//! This is classification, not extraction: each flag is tested independently
//! against the whole text.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::{Skill, SkillFlags};

fn keyword_pattern(skill: Skill) -> &'static str {
    match skill {
        Skill::Communications => {
            r"(?i)\b(?:communications?|comms|media|press|pr|public relations|marketing)\b"
        }
        Skill::Campaigns => {
            r"(?i)\b(?:campaigns?|campaigning|advocacy|grassroots|mobili[sz](?:ation|ing)|fundraising)\b"
        }
        Skill::Policy => {
            r"(?i)\b(?:policy|policies|legislation|legislative|regulatory|white papers?)\b"
        }
        Skill::PublicAffairs => {
            r"(?i)\b(?:public affairs|government relations|lobbying|stakeholder engagement|parliamentary|political engagement)\b"
        }
    }
}

static SKILL_PATTERNS: Lazy<Vec<(Skill, Regex)>> = Lazy::new(|| {
    Skill::ALL
        .into_iter()
        .map(|skill| {
            let re = Regex::new(keyword_pattern(skill)).expect("skill pattern");
            (skill, re)
        })
        .collect()
});

pub fn classify_skills(text: &str) -> SkillFlags {
    let mut flags = SkillFlags::default();
    for (skill, re) in SKILL_PATTERNS.iter() {
        if re.is_match(text) {
            flags.set(*skill);
        }
    }
    flags
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_communications_fires_on_any_keyword() {
        for text in ["Led comms", "press office", "Head of PR", "Public Relations lead"] {
            assert!(
                classify_skills(text).contains(Skill::Communications),
                "expected communications for {text:?}"
            );
        }
    }

    #[test]
    fn test_word_boundaries_respected() {
        // "pr" inside "project" and "approach" must not fire.
        let flags = classify_skills("project approach");
        assert!(!flags.contains(Skill::Communications));
    }

    #[test]
    fn test_flags_are_independent() {
        let flags = classify_skills("Ran the campaign and drafted legislation");
        assert!(flags.contains(Skill::Campaigns));
        assert!(flags.contains(Skill::Policy));
        assert!(!flags.contains(Skill::PublicAffairs));
        assert!(!flags.contains(Skill::Communications));
    }

    #[test]
    fn test_public_affairs_phrases() {
        assert!(classify_skills("stakeholder engagement across Whitehall")
            .contains(Skill::PublicAffairs));
        assert!(classify_skills("Parliamentary researcher").contains(Skill::PublicAffairs));
    }

    #[test]
    fn test_every_skill_has_a_compiling_pattern() {
        assert_eq!(SKILL_PATTERNS.len(), Skill::ALL.len());
    }

    #[test]
    fn test_empty_text_sets_nothing() {
        assert_eq!(classify_skills(""), SkillFlags::default());
    }
}
