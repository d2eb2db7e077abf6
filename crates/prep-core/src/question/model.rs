//! Interview question domain model.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The kind of interview question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionCategory {
    /// Skills, system design and problem-solving questions.
    Technical,
    /// Past-experience questions, usually answered with the STAR structure.
    Behavioral,
    /// Questions about the company's mission, culture and recent developments.
    CompanySpecific,
}

impl QuestionCategory {
    /// All categories in their canonical order.
    pub const ALL: [QuestionCategory; 3] = [
        QuestionCategory::Technical,
        QuestionCategory::Behavioral,
        QuestionCategory::CompanySpecific,
    ];
}

impl fmt::Display for QuestionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            QuestionCategory::Technical => "technical",
            QuestionCategory::Behavioral => "behavioral",
            QuestionCategory::CompanySpecific => "company-specific",
        };
        f.write_str(label)
    }
}

/// Relative difficulty of a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// Difficulty for the `index`-th question of a category: Easy, Medium, Hard, Easy, ...
    pub fn rotating(index: usize) -> Self {
        match index % 3 {
            0 => Difficulty::Easy,
            1 => Difficulty::Medium,
            _ => Difficulty::Hard,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        };
        f.write_str(label)
    }
}

/// A single interview question within a session.
///
/// `order` defines the presentation sequence. Once a session has accepted its
/// questions, neither the set nor the order changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// Identifier, unique within the session (e.g. `q1`)
    pub id: String,
    /// The question text presented to the candidate
    pub text: String,
    pub category: QuestionCategory,
    pub difficulty: Difficulty,
    /// Presentation order (lower first)
    pub order: u32,
}

impl Question {
    pub fn new(
        id: impl Into<String>,
        text: impl Into<String>,
        category: QuestionCategory,
        difficulty: Difficulty,
        order: u32,
    ) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            category,
            difficulty,
            order,
        }
    }
}
