use serde::{Deserialize, Serialize};

/// Fixed skill vocabulary. Adding a category is a compile-time change: the
/// keyword pattern in `engine::skills` must be extended alongside.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Skill {
    Communications,
    Campaigns,
    Policy,
    PublicAffairs,
}

impl Skill {
    pub const ALL: [Skill; 4] = [
        Skill::Communications,
        Skill::Campaigns,
        Skill::Policy,
        Skill::PublicAffairs,
    ];
}

/// One independent boolean per `Skill` variant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillFlags {
    pub communications: bool,
    pub campaigns: bool,
    pub policy: bool,
    pub public_affairs: bool,
}

impl SkillFlags {
    pub fn set(&mut self, skill: Skill) {
        *self.slot(skill) = true;
    }

    pub fn contains(&self, skill: Skill) -> bool {
        match skill {
            Skill::Communications => self.communications,
            Skill::Campaigns => self.campaigns,
            Skill::Policy => self.policy,
            Skill::PublicAffairs => self.public_affairs,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = Skill> + '_ {
        Skill::ALL.into_iter().filter(|s| self.contains(*s))
    }

    fn slot(&mut self, skill: Skill) -> &mut bool {
        match skill {
            Skill::Communications => &mut self.communications,
            Skill::Campaigns => &mut self.campaigns,
            Skill::Policy => &mut self.policy,
            Skill::PublicAffairs => &mut self.public_affairs,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperienceEntry {
    pub title: String,
    pub employer: String,
    pub start: String,
    /// A four-digit year, or "Present" for an ongoing role.
    pub end: String,
}

impl ExperienceEntry {
    pub fn is_current(&self) -> bool {
        self.end == "Present"
    }
}

/// Structured result of one adapter's text. Never edited after construction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateProfile {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub current_title: Option<String>,
    pub current_employer: Option<String>,
    pub skills: SkillFlags,
    pub experience: Vec<ExperienceEntry>,
    pub notes: Option<String>,
    /// 0.0 – 1.0
    pub confidence: f64,
}
