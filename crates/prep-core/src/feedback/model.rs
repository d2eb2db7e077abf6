//! Feedback report domain model.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Highest score on every feedback scale.
pub const MAX_SCORE: u8 = 100;

/// Feedback on a single answered question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionFeedback {
    /// Score in `0..=100`
    pub score: u8,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub weaknesses: Vec<String>,
}

/// Average scores along the evaluation dimensions, each in `0..=100`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DimensionScores {
    /// How easy the answers were to follow
    pub clarity: u8,
    /// Whether the answers addressed the question asked
    pub relevance: u8,
    /// Detail, examples and technical substance
    pub depth: u8,
    /// How assured and prepared the answers sounded
    pub confidence: u8,
}

/// Coarse performance band derived from the overall score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PerformanceLevel {
    NeedsImprovement,
    Fair,
    Good,
    Excellent,
}

impl PerformanceLevel {
    pub fn from_score(score: u8) -> Self {
        match score {
            85.. => PerformanceLevel::Excellent,
            70..=84 => PerformanceLevel::Good,
            50..=69 => PerformanceLevel::Fair,
            _ => PerformanceLevel::NeedsImprovement,
        }
    }

    /// One-line verdict shown alongside the score.
    pub fn description(&self) -> &'static str {
        match self {
            PerformanceLevel::Excellent => "Excellent - ready for interviews",
            PerformanceLevel::Good => "Good - ready for interviews with minor improvements",
            PerformanceLevel::Fair => "Fair - more practice recommended",
            PerformanceLevel::NeedsImprovement => "Needs improvement - focus on fundamentals",
        }
    }
}

impl fmt::Display for PerformanceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// Structured feedback for a completed interview session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackReport {
    /// Per-question feedback keyed by question id
    pub per_question: BTreeMap<String, QuestionFeedback>,
    /// Overall score in `0..=100`
    pub overall_score: u8,
    pub performance_level: PerformanceLevel,
    #[serde(default)]
    pub dimensions: DimensionScores,
    #[serde(default)]
    pub key_strengths: Vec<String>,
    #[serde(default)]
    pub priority_improvements: Vec<String>,
    #[serde(default)]
    pub next_steps: Vec<String>,
    /// Timestamp when the report was generated (ISO 8601 format)
    pub generated_at: String,
}

impl FeedbackReport {
    /// Checks the score ranges of the report.
    ///
    /// Returns a description of the first out-of-range score, if any.
    pub fn range_violation(&self) -> Option<String> {
        if self.overall_score > MAX_SCORE {
            return Some(format!("overall score {} exceeds {}", self.overall_score, MAX_SCORE));
        }
        self.per_question
            .iter()
            .find(|(_, fb)| fb.score > MAX_SCORE)
            .map(|(id, fb)| format!("score {} for question '{}' exceeds {}", fb.score, id, MAX_SCORE))
    }
}
