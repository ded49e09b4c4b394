use serde::{Deserialize, Serialize};

/// The structured tailoring result. This is the fixed schema the backend is
/// instructed to emit and the only shape the exporter accepts.
///
/// Every field (and every subfield) has a defined empty default, so a
/// partially populated response still deserializes into an unambiguous
/// value — the renderer never has to guess.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TailoredResume {
    /// Not a profile summary: a list of the concrete changes the model made
    /// to tailor the resume ("Added keywords X and Y to Skills", ...).
    #[serde(default)]
    pub executive_summary: Vec<String>,
    #[serde(default)]
    pub personal_info: PersonalInfo,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub experience: Vec<ExperienceEntry>,
    #[serde(default)]
    pub projects: Vec<ProjectEntry>,
    #[serde(default)]
    pub education: Vec<EducationEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersonalInfo {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub linkedin: String,
    #[serde(default)]
    pub github: String,
    #[serde(default)]
    pub location: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExperienceEntry {
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub points: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectEntry {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub points: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EducationEntry {
    #[serde(default)]
    pub school: String,
    #[serde(default)]
    pub degree: String,
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub location: String,
}
