//! Template-based question planner.
//!
//! Question text comes from per-category template banks rendered with
//! minijinja. Templates may use `{{ company }}`, `{{ role }}`, `{{ culture }}`
//! and `{{ interview_style }}`.

use async_trait::async_trait;
use minijinja::{Environment, context};
use prep_core::question::{
    Difficulty, MAX_QUESTION_COUNT, PlanRequest, Question, QuestionCategory, QuestionPlanner,
};
use prep_core::research::ResearchArtifact;
use prep_core::{PrepError, Result};
use serde::{Deserialize, Serialize};

/// Template banks, one per question category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionTemplates {
    pub technical: Vec<String>,
    pub behavioral: Vec<String>,
    pub company_specific: Vec<String>,
}

impl Default for QuestionTemplates {
    fn default() -> Self {
        fn owned(items: &[&str]) -> Vec<String> {
            items.iter().map(|s| s.to_string()).collect()
        }

        Self {
            technical: owned(&[
                "Explain how you would architect a {{ role }} solution for {{ company }}.",
                "Walk me through your debugging process for a complex issue.",
                "Describe a challenging technical problem you solved recently.",
                "How do you stay updated with new technologies relevant to a {{ role }}?",
                "What's your approach to code reviews and quality assurance?",
                "How would you handle race conditions in a concurrent system?",
            ]),
            behavioral: owned(&[
                "Why do you want to work at {{ company }} specifically?",
                "Tell me about a time you had to work with a difficult team member.",
                "Describe a situation where you had to learn something new quickly.",
                "How do you handle competing priorities and tight deadlines?",
                "Give an example of when you had to convince others of your idea.",
                "Tell me about a time you failed and what you learned from it.",
            ]),
            company_specific: owned(&[
                "How would you contribute to {{ company }}'s mission?",
                "What do you know about {{ company }}'s recent developments?",
                "{{ company }} describes its culture as \"{{ culture }}\". How do you see yourself fitting in?",
                "{{ company }} interviews with {{ interview_style | lower }}. How have you prepared for that?",
            ]),
        }
    }
}

impl QuestionTemplates {
    pub fn bank(&self, category: QuestionCategory) -> &[String] {
        match category {
            QuestionCategory::Technical => &self.technical,
            QuestionCategory::Behavioral => &self.behavioral,
            QuestionCategory::CompanySpecific => &self.company_specific,
        }
    }
}

/// Plans questions by allocating the requested count across categories and
/// rendering templates from each category's bank.
///
/// - Questions are grouped by category in the order Technical, Behavioral,
///   CompanySpecific.
/// - Within a category, difficulty rotates Easy, Medium, Hard.
/// - Ids are `q1..qN` in presentation order.
/// - A category asked for more questions than its bank holds reuses templates
///   from the start of the bank.
#[derive(Debug, Clone, Default)]
pub struct TemplateQuestionPlanner {
    templates: QuestionTemplates,
}

impl TemplateQuestionPlanner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_templates(templates: QuestionTemplates) -> Self {
        Self { templates }
    }

    fn render(&self, env: &Environment<'_>, template: &str, artifact: &ResearchArtifact) -> Result<String> {
        let role = if artifact.role_name.trim().is_empty() {
            "this role"
        } else {
            artifact.role_name.as_str()
        };

        env.render_str(
            template,
            context! {
                company => artifact.company_name.as_str(),
                role => role,
                culture => artifact.culture.as_str(),
                interview_style => artifact.interview_style.as_str(),
            },
        )
        .map_err(|e| PrepError::planning(format!("failed to render question template: {}", e)))
    }
}

#[async_trait]
impl QuestionPlanner for TemplateQuestionPlanner {
    async fn plan(&self, artifact: &ResearchArtifact, request: &PlanRequest) -> Result<Vec<Question>> {
        if artifact.company_name.trim().is_empty() {
            return Err(PrepError::planning("research artifact has no company name"));
        }
        if request.desired_count == 0 {
            return Err(PrepError::planning("desired question count is zero"));
        }
        if request.desired_count > MAX_QUESTION_COUNT {
            return Err(PrepError::planning(format!(
                "desired question count {} exceeds the maximum of {}",
                request.desired_count, MAX_QUESTION_COUNT
            )));
        }
        if request.category_mix.is_empty() {
            return Err(PrepError::planning("category mix has no non-zero weight"));
        }

        let env = Environment::new();
        let mut questions = Vec::with_capacity(request.desired_count.min(MAX_QUESTION_COUNT) as usize);

        for (category, count) in request.category_mix.allocate(request.desired_count) {
            let bank = self.templates.bank(category);
            if bank.is_empty() {
                return Err(PrepError::planning(format!("no {} question templates", category)));
            }

            for index in 0..count as usize {
                let text = self.render(&env, &bank[index % bank.len()], artifact)?;
                let order = questions.len() as u32 + 1;
                questions.push(Question::new(
                    format!("q{}", order),
                    text,
                    category,
                    Difficulty::rotating(index),
                    order,
                ));
            }
        }

        tracing::debug!(
            "Planned {} questions for {} ({})",
            questions.len(),
            artifact.company_name,
            artifact.role_name
        );
        Ok(questions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prep_core::question::CategoryMix;

    fn artifact() -> ResearchArtifact {
        ResearchArtifact {
            company_name: "Acme".to_string(),
            role_name: "Backend Engineer".to_string(),
            summary: "Acme builds rockets".to_string(),
            culture: "Ship fast".to_string(),
            values: "Ownership".to_string(),
            interview_style: "Pairing sessions".to_string(),
            role_requirements: "Rust".to_string(),
            recent_news: vec![],
            researched_at: "2025-01-01T00:00:00.000000Z".to_string(),
        }
    }

    #[tokio::test]
    async fn test_default_plan_follows_mix() {
        let planner = TemplateQuestionPlanner::new();
        let questions = planner.plan(&artifact(), &PlanRequest::default()).await.unwrap();

        let categories: Vec<_> = questions.iter().map(|q| q.category).collect();
        assert_eq!(
            categories,
            vec![
                QuestionCategory::Technical,
                QuestionCategory::Technical,
                QuestionCategory::Behavioral,
                QuestionCategory::Behavioral,
                QuestionCategory::CompanySpecific,
            ]
        );

        let ids: Vec<_> = questions.iter().map(|q| q.id.as_str()).collect();
        assert_eq!(ids, vec!["q1", "q2", "q3", "q4", "q5"]);
        assert!(questions.iter().enumerate().all(|(i, q)| q.order == i as u32 + 1));
    }

    #[tokio::test]
    async fn test_templates_are_rendered() {
        let planner = TemplateQuestionPlanner::new();
        let request = PlanRequest::new(4, CategoryMix::new(0, 0, 1));
        let questions = planner.plan(&artifact(), &request).await.unwrap();

        assert_eq!(questions[0].text, "How would you contribute to Acme's mission?");
        assert!(questions[2].text.contains("\"Ship fast\""));
        assert!(questions[3].text.contains("pairing sessions"));
        assert!(questions.iter().all(|q| !q.text.contains("{{")));
    }

    #[tokio::test]
    async fn test_difficulty_rotates_within_category() {
        let planner = TemplateQuestionPlanner::new();
        let request = PlanRequest::new(4, CategoryMix::new(1, 0, 0));
        let questions = planner.plan(&artifact(), &request).await.unwrap();

        let difficulties: Vec<_> = questions.iter().map(|q| q.difficulty).collect();
        assert_eq!(
            difficulties,
            vec![Difficulty::Easy, Difficulty::Medium, Difficulty::Hard, Difficulty::Easy]
        );
    }

    #[tokio::test]
    async fn test_small_bank_is_reused() {
        let templates = QuestionTemplates {
            technical: vec!["Only question for {{ role }}".to_string()],
            behavioral: vec![],
            company_specific: vec![],
        };
        let planner = TemplateQuestionPlanner::with_templates(templates);
        let request = PlanRequest::new(2, CategoryMix::new(1, 0, 0));

        let questions = planner.plan(&artifact(), &request).await.unwrap();
        assert_eq!(questions.len(), 2);
        assert_eq!(questions[1].text, "Only question for Backend Engineer");
        assert_ne!(questions[0].id, questions[1].id);
    }

    #[tokio::test]
    async fn test_unusable_requests_are_planning_failures() {
        let planner = TemplateQuestionPlanner::new();

        let zero_mix = PlanRequest::new(3, CategoryMix::new(0, 0, 0));
        let err = planner.plan(&artifact(), &zero_mix).await.unwrap_err();
        assert!(matches!(err, PrepError::PlanningFailure(_)));

        let huge = PlanRequest::new(u32::MAX, CategoryMix::default());
        let err = planner.plan(&artifact(), &huge).await.unwrap_err();
        assert!(matches!(err, PrepError::PlanningFailure(_)));

        let largest = PlanRequest::new(MAX_QUESTION_COUNT, CategoryMix::default());
        let questions = planner.plan(&artifact(), &largest).await.unwrap();
        assert_eq!(questions.len(), MAX_QUESTION_COUNT as usize);

        let empty_bank = TemplateQuestionPlanner::with_templates(QuestionTemplates {
            technical: vec![],
            behavioral: vec![],
            company_specific: vec![],
        });
        let err = empty_bank
            .plan(&artifact(), &PlanRequest::default())
            .await
            .unwrap_err();
        assert!(matches!(err, PrepError::PlanningFailure(_)));
    }
}
