//! Deterministic rubric scorer.
//!
//! Each answer is scored on clarity, relevance, depth and confidence (0-100)
//! from surface features of the text. Behavioral answers are additionally
//! checked for the Situation-Task-Action-Result structure.

use async_trait::async_trait;
use prep_core::feedback::{
    DimensionScores, FeedbackReport, FeedbackScorer, MAX_SCORE, PerformanceLevel,
    QuestionFeedback,
};
use prep_core::question::{Question, QuestionCategory};
use prep_core::session::{Session, now_timestamp};
use prep_core::{PrepError, Result};
use std::collections::BTreeMap;

const STRONG: u8 = 75;
const WEAK: u8 = 60;

const HEDGES: &[&str] = &[
    "i think",
    "i guess",
    "maybe",
    "probably",
    "not sure",
    "kind of",
    "sort of",
    "i don't know",
];

const STOPWORDS: &[&str] = &[
    "about", "after", "again", "describe", "does", "explain", "from", "give", "have", "into",
    "recently", "tell", "that", "their", "there", "this", "through", "time", "walk", "were",
    "what", "when", "where", "which", "while", "with", "would", "your", "you're",
];

/// The four STAR components.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StarPart {
    Situation,
    Task,
    Action,
    Result,
}

impl StarPart {
    const ALL: [StarPart; 4] = [
        StarPart::Situation,
        StarPart::Task,
        StarPart::Action,
        StarPart::Result,
    ];

    fn markers(&self) -> &'static [&'static str] {
        match self {
            StarPart::Situation => &["situation", "when i", "at my", "once", "while working", "context"],
            StarPart::Task => &["task", "goal", "responsible", "needed to", "had to", "challenge"],
            StarPart::Action => &["i decided", "i built", "i led", "i wrote", "i designed", "i proposed", "action", "implemented"],
            StarPart::Result => &["result", "outcome", "reduced", "increased", "improved", "saved", "%"],
        }
    }

    fn label(&self) -> &'static str {
        match self {
            StarPart::Situation => "situation",
            StarPart::Task => "task",
            StarPart::Action => "action",
            StarPart::Result => "result",
        }
    }
}

/// Score of one answer before it is folded into the report.
#[derive(Debug, Clone)]
struct AnswerAssessment {
    dimensions: DimensionScores,
    /// STAR parts found; `None` for non-behavioral questions
    star: Option<Vec<StarPart>>,
    quantified: bool,
    feedback: QuestionFeedback,
}

/// Scores sessions with a fixed rubric. The same answers always produce the
/// same report (apart from `generated_at`).
#[derive(Debug, Clone, Default)]
pub struct RubricFeedbackScorer;

impl RubricFeedbackScorer {
    pub fn new() -> Self {
        Self
    }

    fn assess(question: &Question, answer: &str) -> AnswerAssessment {
        let lower = answer.to_lowercase();
        let words: Vec<&str> = answer.split_whitespace().collect();

        let dimensions = if words.is_empty() {
            DimensionScores::default()
        } else {
            DimensionScores {
                clarity: clarity(answer, words.len()),
                relevance: relevance(&question.text, &lower),
                depth: depth(words.len(), has_digit(answer)),
                confidence: confidence(&lower),
            }
        };

        let star = (question.category == QuestionCategory::Behavioral).then(|| {
            StarPart::ALL
                .into_iter()
                .filter(|part| part.markers().iter().any(|m| lower.contains(m)))
                .collect::<Vec<_>>()
        });

        let base = average(&[
            dimensions.clarity,
            dimensions.relevance,
            dimensions.depth,
            dimensions.confidence,
        ]);
        let score = match &star {
            // 80% rubric, 20% STAR coverage
            Some(parts) => ((base as u32 * 4 + parts.len() as u32 * 25) / 5) as u8,
            None => base,
        };

        let mut strengths = Vec::new();
        let mut weaknesses = Vec::new();
        for (label, value) in dimension_entries(&dimensions) {
            if value >= STRONG {
                strengths.push(format!("Good {}", label));
            } else if value < WEAK {
                weaknesses.push(format!("Low {}", label));
            }
        }
        if let Some(parts) = &star {
            if parts.len() == StarPart::ALL.len() {
                strengths.push("Complete STAR structure".to_string());
            } else {
                let missing: Vec<_> = StarPart::ALL
                    .iter()
                    .filter(|p| !parts.contains(p))
                    .map(|p| p.label())
                    .collect();
                weaknesses.push(format!("STAR structure missing: {}", missing.join(", ")));
            }
        }

        AnswerAssessment {
            dimensions,
            star,
            quantified: has_digit(answer),
            feedback: QuestionFeedback {
                score: score.min(MAX_SCORE),
                strengths,
                weaknesses,
            },
        }
    }
}

#[async_trait]
impl FeedbackScorer for RubricFeedbackScorer {
    async fn score(&self, session: &Session) -> Result<FeedbackReport> {
        if session.questions.is_empty() {
            return Err(PrepError::scoring("session has no questions to score"));
        }

        let mut assessments = Vec::with_capacity(session.questions.len());
        for question in &session.questions {
            let answer = session.answers.get(&question.id).ok_or_else(|| {
                PrepError::scoring(format!("question '{}' has no answer", question.id))
            })?;
            assessments.push((question.id.clone(), Self::assess(question, &answer.text)));
        }

        let dimensions = DimensionScores {
            clarity: average_by(&assessments, |a| a.dimensions.clarity),
            relevance: average_by(&assessments, |a| a.dimensions.relevance),
            depth: average_by(&assessments, |a| a.dimensions.depth),
            confidence: average_by(&assessments, |a| a.dimensions.confidence),
        };
        let overall_score = average_by(&assessments, |a| a.feedback.score);
        let performance_level = PerformanceLevel::from_score(overall_score);

        let key_strengths = key_strengths(&dimensions, &assessments);
        let priority_improvements = priority_improvements(&dimensions, &assessments);
        let next_steps = next_steps(&priority_improvements, &session.company_name);

        tracing::debug!(
            "Scored session {}: {} ({:?})",
            session.id,
            overall_score,
            performance_level
        );

        Ok(FeedbackReport {
            per_question: assessments
                .into_iter()
                .map(|(id, a)| (id, a.feedback))
                .collect::<BTreeMap<_, _>>(),
            overall_score,
            performance_level,
            dimensions,
            key_strengths,
            priority_improvements,
            next_steps,
            generated_at: now_timestamp(),
        })
    }
}

fn clarity(answer: &str, word_count: usize) -> u8 {
    let sentences = answer
        .split(['.', '!', '?'])
        .filter(|s| !s.trim().is_empty())
        .count()
        .max(1);
    match word_count / sentences {
        8..=25 => 90,
        5..=35 => 70,
        _ => 45,
    }
}

fn relevance(question: &str, answer_lower: &str) -> u8 {
    let keywords: Vec<String> = question
        .split(|c: char| !c.is_alphanumeric() && c != '\'')
        .map(|w| w.to_lowercase())
        .filter(|w| w.len() >= 4 && !STOPWORDS.contains(&w.as_str()))
        .collect();
    if keywords.is_empty() {
        return 70;
    }

    let matched = keywords.iter().filter(|k| answer_lower.contains(k.as_str())).count();
    (40 + matched * 60 / keywords.len()) as u8
}

fn depth(word_count: usize, quantified: bool) -> u8 {
    let base: u8 = match word_count {
        0..=14 => 25,
        15..=39 => 50,
        40..=79 => 75,
        _ => 90,
    };
    if quantified { (base + 10).min(MAX_SCORE) } else { base }
}

fn confidence(answer_lower: &str) -> u8 {
    let hedges = HEDGES
        .iter()
        .map(|h| answer_lower.matches(h).count())
        .sum::<usize>();
    85usize.saturating_sub(hedges * 15).max(20) as u8
}

fn has_digit(text: &str) -> bool {
    text.chars().any(|c| c.is_ascii_digit())
}

fn average(values: &[u8]) -> u8 {
    if values.is_empty() {
        return 0;
    }
    let sum: u32 = values.iter().map(|v| *v as u32).sum();
    ((sum + values.len() as u32 / 2) / values.len() as u32) as u8
}

fn average_by(assessments: &[(String, AnswerAssessment)], f: impl Fn(&AnswerAssessment) -> u8) -> u8 {
    let values: Vec<u8> = assessments.iter().map(|(_, a)| f(a)).collect();
    average(&values)
}

fn dimension_entries(d: &DimensionScores) -> [(&'static str, u8); 4] {
    [
        ("clarity", d.clarity),
        ("relevance", d.relevance),
        ("depth", d.depth),
        ("confidence", d.confidence),
    ]
}

fn key_strengths(d: &DimensionScores, assessments: &[(String, AnswerAssessment)]) -> Vec<String> {
    let mut strengths: Vec<String> = dimension_entries(d)
        .into_iter()
        .filter(|(_, v)| *v >= STRONG)
        .map(|(label, _)| match label {
            "clarity" => "Clear, well-structured answers".to_string(),
            "relevance" => "Answers stay on the question asked".to_string(),
            "depth" => "Detailed answers with concrete examples".to_string(),
            _ => "Confident delivery".to_string(),
        })
        .collect();

    let star_answers: Vec<_> = assessments.iter().filter_map(|(_, a)| a.star.as_ref()).collect();
    if !star_answers.is_empty() && star_answers.iter().all(|p| p.len() == StarPart::ALL.len()) {
        strengths.push("Consistent use of the STAR method".to_string());
    }
    if strengths.is_empty() {
        strengths.push("Answered every question".to_string());
    }
    strengths
}

fn priority_improvements(d: &DimensionScores, assessments: &[(String, AnswerAssessment)]) -> Vec<String> {
    let mut weak: Vec<_> = dimension_entries(d)
        .into_iter()
        .filter(|(_, v)| *v < WEAK)
        .collect();
    weak.sort_by_key(|(_, v)| *v);

    let mut improvements: Vec<String> = weak
        .into_iter()
        .map(|(label, _)| match label {
            "clarity" => "Structure answers into short, complete sentences".to_string(),
            "relevance" => "Address the question directly before adding context".to_string(),
            "depth" => "Add detail and concrete examples".to_string(),
            _ => "Drop hedging phrases and state conclusions plainly".to_string(),
        })
        .collect();

    if assessments
        .iter()
        .filter_map(|(_, a)| a.star.as_ref())
        .any(|parts| parts.len() < StarPart::ALL.len())
    {
        improvements.push("Improve STAR method application".to_string());
    }
    if !assessments.iter().any(|(_, a)| a.quantified) {
        improvements.push("Quantify achievements more (use numbers)".to_string());
    }
    improvements
}

fn next_steps(improvements: &[String], company_name: &str) -> Vec<String> {
    let mut steps: Vec<String> = improvements
        .iter()
        .map(|i| match i.as_str() {
            "Improve STAR method application" => {
                "Practice 3 more behavioral questions using STAR".to_string()
            }
            "Quantify achievements more (use numbers)" => {
                "Prepare two metrics for each project you plan to mention".to_string()
            }
            other => format!("Rehearse answers focusing on: {}", other.to_lowercase()),
        })
        .collect();
    steps.push(format!("Review {}'s values and recent news", company_name));
    steps.push("Record and self-review your next mock interview".to_string());
    steps
}

#[cfg(test)]
mod tests {
    use super::*;
    use prep_core::question::{Difficulty, PlanRequest};
    use prep_core::research::ResearchArtifact;

    const STRONG_BEHAVIORAL: &str = "In my last role the situation was a failing release pipeline. \
        My task was to get deployments green again within two weeks. \
        I decided to split the pipeline into stages and I wrote caching for the build step. \
        As a result we reduced build time by 40% and shipped 12 releases that month.";

    fn session_with(questions: Vec<Question>, answers: &[&str]) -> Session {
        let mut session = Session::new(
            "Acme",
            "Backend Engineer",
            PlanRequest::new(questions.len() as u32, Default::default()),
        )
        .unwrap();
        session.begin_research().unwrap();
        session
            .record_research(ResearchArtifact {
                company_name: "Acme".to_string(),
                role_name: "Backend Engineer".to_string(),
                summary: String::new(),
                culture: "Ship fast".to_string(),
                values: String::new(),
                interview_style: String::new(),
                role_requirements: String::new(),
                recent_news: vec![],
                researched_at: now_timestamp(),
            })
            .unwrap();
        let ids: Vec<String> = questions.iter().map(|q| q.id.clone()).collect();
        session.record_questions(questions).unwrap();
        for (id, text) in ids.iter().zip(answers) {
            session.record_answer(id, *text).unwrap();
        }
        session
    }

    fn behavioral(id: &str, order: u32) -> Question {
        Question::new(
            id,
            "Tell me about a time you fixed a broken release pipeline.",
            QuestionCategory::Behavioral,
            Difficulty::Medium,
            order,
        )
    }

    #[tokio::test]
    async fn test_report_covers_every_question() {
        let session = session_with(
            vec![
                Question::new("q1", "How would you design a cache?", QuestionCategory::Technical, Difficulty::Easy, 1),
                behavioral("q2", 2),
            ],
            &["I would use an LRU cache with a TTL of 60 seconds in front of the database.", STRONG_BEHAVIORAL],
        );

        let report = RubricFeedbackScorer::new().score(&session).await.unwrap();
        assert_eq!(report.per_question.len(), 2);
        assert!(report.range_violation().is_none());
        assert_eq!(report.performance_level, PerformanceLevel::from_score(report.overall_score));
        assert!(!report.key_strengths.is_empty());
        assert!(report.next_steps.iter().any(|s| s.contains("Acme")));
    }

    #[tokio::test]
    async fn test_complete_star_answer_beats_vague_answer() {
        let strong = session_with(vec![behavioral("q1", 1)], &[STRONG_BEHAVIORAL]);
        let vague = session_with(vec![behavioral("q1", 1)], &["I think maybe it went ok, not sure."]);

        let scorer = RubricFeedbackScorer::new();
        let strong_report = scorer.score(&strong).await.unwrap();
        let vague_report = scorer.score(&vague).await.unwrap();

        assert!(strong_report.overall_score > vague_report.overall_score);
        assert!(strong_report.per_question["q1"]
            .strengths
            .contains(&"Complete STAR structure".to_string()));
        assert!(vague_report.dimensions.confidence < strong_report.dimensions.confidence);
        assert!(vague_report
            .priority_improvements
            .contains(&"Improve STAR method application".to_string()));
        assert!(vague_report
            .priority_improvements
            .contains(&"Quantify achievements more (use numbers)".to_string()));
    }

    #[tokio::test]
    async fn test_scoring_is_deterministic() {
        let session = session_with(vec![behavioral("q1", 1)], &[STRONG_BEHAVIORAL]);
        let scorer = RubricFeedbackScorer::new();

        let first = scorer.score(&session).await.unwrap();
        let second = scorer.score(&session).await.unwrap();
        assert_eq!(first.per_question, second.per_question);
        assert_eq!(first.overall_score, second.overall_score);
        assert_eq!(first.dimensions, second.dimensions);
    }

    #[tokio::test]
    async fn test_missing_answer_is_a_scoring_failure() {
        let session = session_with(
            vec![behavioral("q1", 1), behavioral("q2", 2)],
            &[STRONG_BEHAVIORAL],
        );

        let err = RubricFeedbackScorer::new().score(&session).await.unwrap_err();
        assert!(matches!(err, PrepError::ScoringFailure(_)));
    }

    #[test]
    fn test_blank_answer_scores_zero_dimensions() {
        let question = Question::new("q1", "Explain REST", QuestionCategory::Technical, Difficulty::Easy, 1);
        let assessment = RubricFeedbackScorer::assess(&question, "   ");
        assert_eq!(assessment.dimensions, DimensionScores::default());
        assert_eq!(assessment.feedback.score, 0);
    }
}
