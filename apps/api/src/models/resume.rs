//! Canonical structured resume record.
//!
//! This is the shape the LLM is instructed to return and the only input the
//! PDF pipeline accepts. Every leaf string is untrusted (user- or
//! LLM-supplied) and may contain characters special to LaTeX or HTML; the
//! pipeline escapes at the edge, never here. All collections default to empty
//! so a partially-formed LLM response degrades instead of failing deep inside
//! rendering. Serde aliases accept the camelCase keys the model emits.
//!
//! A record lives for one generation request: built from LLM output, consumed
//! by the PDF generator, discarded. Only the resulting PDF and a generation
//! log row are persisted.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResumeRecord {
    #[serde(default, alias = "personalInfo")]
    pub personal_info: PersonalInfo,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub experience: Vec<ExperienceEntry>,
    #[serde(default)]
    pub education: Vec<EducationEntry>,
    #[serde(default)]
    pub projects: Vec<ProjectEntry>,
    #[serde(default)]
    pub certifications: Vec<CertificationEntry>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PersonalInfo {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub linkedin: Option<String>,
    #[serde(default)]
    pub github: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExperienceEntry {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub location: String,
    #[serde(default, alias = "startDate")]
    pub start_date: String,
    #[serde(default, alias = "endDate")]
    pub end_date: String,
    /// Achievement bullets. The LLM emits these under "description".
    #[serde(default, alias = "description", alias = "bulletPoints")]
    pub bullet_points: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EducationEntry {
    #[serde(default)]
    pub degree: String,
    #[serde(default)]
    pub institution: String,
    #[serde(default)]
    pub location: String,
    #[serde(default, alias = "startDate")]
    pub start_date: String,
    #[serde(default, alias = "endDate")]
    pub end_date: String,
    #[serde(default)]
    pub gpa: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectEntry {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub technologies: Vec<String>,
    #[serde(default)]
    pub link: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CertificationEntry {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub issuer: String,
    #[serde(default)]
    pub date: String,
}

impl ResumeRecord {
    /// Repair path for unparseable LLM output: a record carrying only a
    /// summary, so the pipeline still produces a (sparse) document.
    pub fn minimal(summary: impl Into<String>) -> Self {
        ResumeRecord {
            summary: summary.into(),
            ..Default::default()
        }
    }
}
