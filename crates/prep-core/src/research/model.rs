//! Research artifact domain model.

use serde::{Deserialize, Serialize};

/// Input to a research collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResearchRequest {
    pub company_name: String,
    pub role_name: String,
}

impl ResearchRequest {
    pub fn new(company_name: impl Into<String>, role_name: impl Into<String>) -> Self {
        Self {
            company_name: company_name.into(),
            role_name: role_name.into(),
        }
    }
}

/// Structured company/role research consumed by question planning.
///
/// The session state machine only checks for its presence; the content is
/// interpreted by planners and scorers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResearchArtifact {
    /// Company name as resolved by the collaborator
    pub company_name: String,
    /// Role the research was done for
    #[serde(default)]
    pub role_name: String,
    /// One-paragraph overview of the company and role
    pub summary: String,
    /// Culture notes (e.g. "Customer obsession, ownership")
    pub culture: String,
    #[serde(default)]
    pub values: String,
    /// How the company is known to interview
    #[serde(default)]
    pub interview_style: String,
    /// What the role is expected to bring
    #[serde(default)]
    pub role_requirements: String,
    /// Recent news items, most relevant first
    #[serde(default)]
    pub recent_news: Vec<String>,
    /// Timestamp when the research was produced (ISO 8601 format)
    pub researched_at: String,
}
