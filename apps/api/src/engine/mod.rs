//! Field extraction engine: raw adapter text in, `CandidateProfile` out.
//!
//! Pure and infallible. Missing fields stay `None` and pull the confidence down
//! instead of failing the parse.

pub mod confidence;
pub mod contact;
pub mod experience;
pub mod name;
pub mod normalize;
pub mod notes;
pub mod role;
pub mod skills;
pub mod vocab;

use crate::models::CandidateProfile;

pub use confidence::ConfidenceWeights;

/// Runs every field extractor over the normalized text and scores the result.
pub fn extract_profile(raw_text: &str, weights: &ConfidenceWeights) -> CandidateProfile {
    let text = normalize::normalize_text(raw_text);

    let name = name::extract_name(&text);
    let experience = experience::extract_experience(&text);
    let current = role::extract_current_role(&text, &experience);

    let mut profile = CandidateProfile {
        first_name: name.as_ref().map(|n| n.first.clone()),
        last_name: name.map(|n| n.last).filter(|l| !l.is_empty()),
        email: contact::extract_email(&text),
        phone: contact::extract_phone(&text),
        current_title: current.title,
        current_employer: current.employer,
        skills: skills::classify_skills(&text),
        experience,
        notes: notes::extract_notes(&text),
        confidence: 0.0,
    };
    profile.confidence = confidence::score_profile(&profile, text.chars().count(), weights);
    profile
}
