//! Confidence scoring for an extracted profile.
//!
//! The score measures how trustworthy a single adapter's output looks, so the
//! orchestrator can compare adapters against each other and against the accept
//! threshold. It only looks at the profile and the normalized text length.

use super::contact::is_valid_email;
use crate::models::CandidateProfile;

/// Normalized texts shorter than this are treated as near-empty extractions.
pub const MIN_TEXT_CHARS: usize = 300;
/// Ceiling applied to the score of a near-empty extraction.
pub const SHORT_TEXT_CEILING: f64 = 0.30;

/// Weights for each recovered field.
#[derive(Debug, Clone)]
pub struct ConfidenceWeights {
    /// First and last name both present.
    pub name: f64,
    pub email: f64,
    pub phone: f64,
    pub title: f64,
    pub employer: f64,
    /// Used instead of `name` when only a first name was found.
    pub first_name_only: f64,
}

impl Default for ConfidenceWeights {
    fn default() -> Self {
        Self {
            name: 0.30,
            email: 0.25,
            phone: 0.20,
            title: 0.15,
            employer: 0.10,
            first_name_only: 0.20,
        }
    }
}

/// Scores a profile in [0, 1]. Deterministic.
pub fn score_profile(
    profile: &CandidateProfile,
    normalized_len: usize,
    weights: &ConfidenceWeights,
) -> f64 {
    let present = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.trim().is_empty());

    let name_term = match (present(&profile.first_name), present(&profile.last_name)) {
        (true, true) => weights.name,
        (true, false) => weights.first_name_only,
        _ => 0.0,
    };
    let email_term = match profile.email.as_deref() {
        Some(email) if is_valid_email(email) => weights.email,
        _ => 0.0,
    };
    let phone_term = if present(&profile.phone) { weights.phone } else { 0.0 };
    let title_term = if present(&profile.current_title) { weights.title } else { 0.0 };
    let employer_term = if present(&profile.current_employer) {
        weights.employer
    } else {
        0.0
    };

    let score = (name_term + email_term + phone_term + title_term + employer_term).clamp(0.0, 1.0);
    if normalized_len < MIN_TEXT_CHARS {
        score.min(SHORT_TEXT_CEILING)
    } else {
        score
    }
}
