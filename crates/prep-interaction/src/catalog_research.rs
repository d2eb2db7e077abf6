//! Catalog-backed research collaborator.

use async_trait::async_trait;
use prep_core::research::{ResearchArtifact, ResearchCollector, ResearchRequest};
use prep_core::session::now_timestamp;
use prep_core::{PrepError, Result};
use serde::{Deserialize, Serialize};

/// What the catalog knows about one company.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyProfile {
    /// Lowercase lookup key (e.g. `"amazon"`)
    pub key: String,
    /// Display name
    pub name: String,
    pub culture: String,
    pub values: String,
    pub interview_style: String,
    pub role_requirements: String,
    #[serde(default)]
    pub recent_news: Vec<String>,
}

impl CompanyProfile {
    fn builtin(
        key: &str,
        name: &str,
        culture: &str,
        values: &str,
        interview_style: &str,
        role_requirements: &str,
        recent_news: &[&str],
    ) -> Self {
        Self {
            key: key.to_string(),
            name: name.to_string(),
            culture: culture.to_string(),
            values: values.to_string(),
            interview_style: interview_style.to_string(),
            role_requirements: role_requirements.to_string(),
            recent_news: recent_news.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Case-insensitive substring match in either direction.
    fn matches(&self, normalized_company: &str) -> bool {
        let key = self.key.to_lowercase();
        key.contains(normalized_company) || normalized_company.contains(&key)
    }
}

/// Researches companies from an in-memory catalog.
///
/// Unknown companies get a generic profile carrying the requested name.
pub struct CatalogResearchCollector {
    entries: Vec<CompanyProfile>,
    fallback: CompanyProfile,
}

impl Default for CatalogResearchCollector {
    fn default() -> Self {
        Self::new()
    }
}

impl CatalogResearchCollector {
    /// Catalog with the built-in company profiles.
    pub fn new() -> Self {
        let entries = vec![
            CompanyProfile::builtin(
                "google",
                "Google",
                "Innovation-focused, data-driven, collaborative",
                "Focus on user, think big, strive for excellence",
                "Technical coding rounds, system design, behavioral",
                "Strong coding skills, system design knowledge, problem-solving",
                &["Focus on AI and machine learning initiatives"],
            ),
            CompanyProfile::builtin(
                "netflix",
                "Netflix",
                "High performance, freedom and responsibility",
                "People over process, innovation, impact",
                "Behavioral questions, technical skills, culture fit",
                "Scalability mindset, high-performance culture fit",
                &["Expanding globally", "Investing in original content"],
            ),
            CompanyProfile::builtin(
                "amazon",
                "Amazon",
                "Customer obsession, ownership, invent and simplify",
                "Leadership principles, customer first, long-term thinking",
                "Behavioral questions based on leadership principles, technical rounds",
                "Leadership principles alignment, scalability focus",
                &["AWS growth", "Sustainability initiatives"],
            ),
        ];

        let fallback = CompanyProfile::builtin(
            "",
            "Tech Company",
            "Innovation and collaboration focused",
            "Quality, teamwork, continuous learning",
            "Mix of technical and behavioral questions",
            "Strong technical skills, team collaboration",
            &["Growing and hiring"],
        );

        Self { entries, fallback }
    }

    /// Adds a profile. Later registrations take precedence over earlier ones
    /// and over the built-in entries.
    pub fn register(&mut self, profile: CompanyProfile) {
        self.entries.insert(0, profile);
    }

    pub fn with_profile(mut self, profile: CompanyProfile) -> Self {
        self.register(profile);
        self
    }

    fn lookup(&self, normalized_company: &str) -> Option<&CompanyProfile> {
        self.entries
            .iter()
            .filter(|p| !p.key.is_empty())
            .find(|p| p.matches(normalized_company))
    }
}

#[async_trait]
impl ResearchCollector for CatalogResearchCollector {
    async fn research(&self, request: &ResearchRequest) -> Result<ResearchArtifact> {
        let requested = request.company_name.trim();
        if requested.is_empty() {
            return Err(PrepError::research("company name is empty"));
        }
        let normalized = requested.to_lowercase();

        let (profile, company_name) = match self.lookup(&normalized) {
            Some(profile) => {
                tracing::debug!("Catalog entry '{}' matches '{}'", profile.key, requested);
                (profile, profile.name.clone())
            }
            None => {
                tracing::debug!("No catalog entry for '{}', using generic profile", requested);
                (&self.fallback, requested.to_string())
            }
        };

        let role_name = request.role_name.trim().to_string();
        let summary = format!(
            "{} ({}): {}. Interview style: {}.",
            company_name, role_name, profile.culture, profile.interview_style
        );

        Ok(ResearchArtifact {
            company_name,
            role_name,
            summary,
            culture: profile.culture.clone(),
            values: profile.values.clone(),
            interview_style: profile.interview_style.clone(),
            role_requirements: profile.role_requirements.clone(),
            recent_news: profile.recent_news.clone(),
            researched_at: now_timestamp(),
        })
    }
}
