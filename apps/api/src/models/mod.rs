pub mod document;
pub mod profile;

pub use document::{DocumentKind, UploadedDocument};
pub use profile::{CandidateProfile, ExperienceEntry, Skill, SkillFlags};
