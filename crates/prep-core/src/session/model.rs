//! Session domain model.
//!
//! This module contains the core Session entity: one end-to-end interview
//! preparation run for a specific company/role pair.

use crate::feedback::FeedbackReport;
use crate::question::{PlanRequest, Question};
use crate::research::ResearchArtifact;
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Returns the current time as a fixed-width RFC 3339 UTC timestamp.
///
/// Fixed width keeps lexicographic order equal to chronological order, which
/// the session store relies on when listing sessions by creation time.
pub fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Lifecycle status of a session.
///
/// ```text
/// Created -> Researching -> QuestionsReady -> InProgress -> Completed
///                 |               |              |  ^          ^
///                 +---------------+--> Failed <--+  |          |
///                                                   v          |
///                                              ScoringFailed --+
/// ```
///
/// `Completed` and `Failed` are terminal. `ScoringFailed` keeps every answer
/// and only allows a scoring retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionStatus {
    /// Created, research not yet started
    Created,
    /// Research (and then planning) in progress
    Researching,
    /// Questions planned, no answer yet
    QuestionsReady,
    /// At least one answer recorded
    InProgress,
    /// All answers recorded but the scorer failed; scoring may be retried
    ScoringFailed,
    /// Feedback report generated
    Completed,
    /// Unrecoverable collaborator failure
    Failed,
}

impl SessionStatus {
    /// Whether no further transition is possible.
    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionStatus::Completed | SessionStatus::Failed)
    }

    /// Whether `submit_answer` is accepted in this status.
    pub fn accepts_answers(&self) -> bool {
        matches!(self, SessionStatus::QuestionsReady | SessionStatus::InProgress)
    }

    /// Whether the lifecycle allows moving from `self` to `next`.
    pub fn can_transition_to(&self, next: SessionStatus) -> bool {
        use SessionStatus::*;
        matches!(
            (self, next),
            (Created, Researching)
                | (Researching, QuestionsReady)
                | (Researching, Failed)
                | (QuestionsReady, InProgress)
                | (QuestionsReady, Failed)
                | (InProgress, Completed)
                | (InProgress, ScoringFailed)
                | (InProgress, Failed)
                | (ScoringFailed, Completed)
        )
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SessionStatus::Created => "Created",
            SessionStatus::Researching => "Researching",
            SessionStatus::QuestionsReady => "QuestionsReady",
            SessionStatus::InProgress => "InProgress",
            SessionStatus::ScoringFailed => "ScoringFailed",
            SessionStatus::Completed => "Completed",
            SessionStatus::Failed => "Failed",
        };
        f.write_str(label)
    }
}

/// The collaborator stage at which a session failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureStage {
    Research,
    Planning,
    Scoring,
}

impl fmt::Display for FailureStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            FailureStage::Research => "research",
            FailureStage::Planning => "planning",
            FailureStage::Scoring => "scoring",
        };
        f.write_str(label)
    }
}

/// Why and when a session failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureRecord {
    pub stage: FailureStage,
    /// Human-readable, never empty
    pub reason: String,
    /// Timestamp of the failure (ISO 8601 format)
    pub failed_at: String,
}

/// A candidate's answer to one question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    /// References `Question::id` within the same session
    pub question_id: String,
    pub text: String,
    /// Timestamp of the (latest) submission (ISO 8601 format)
    pub submitted_at: String,
}

/// Represents an interview preparation session in the application's domain layer.
///
/// A session contains:
/// - The company/role pair it prepares for
/// - The planning parameters captured at creation
/// - The research artifact, once collected
/// - The ordered interview questions and the answers given so far
/// - The feedback report, once the interview is scored
/// - A failure record when a collaborator failed
///
/// Invariants maintained by the lifecycle methods:
/// - every key of `answers` is the id of a question in `questions`
/// - `feedback` is present only when `status` is `Completed`
/// - `failure` is present only when `status` is `Failed` or `ScoringFailed`
///
/// This is the "pure" domain model that business logic operates on,
/// independent of any specific storage format or version.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Unique session identifier (UUID format)
    pub id: String,
    pub company_name: String,
    pub role_name: String,
    pub status: SessionStatus,
    /// Timestamp when the session was created (ISO 8601 format)
    pub created_at: String,
    /// Timestamp when the session was last updated (ISO 8601 format)
    pub updated_at: String,
    /// Planning parameters fixed at creation
    pub plan_request: PlanRequest,
    pub research: Option<ResearchArtifact>,
    /// Questions in presentation order
    #[serde(default)]
    pub questions: Vec<Question>,
    /// Answers keyed by question id
    #[serde(default)]
    pub answers: BTreeMap<String, Answer>,
    pub feedback: Option<FeedbackReport>,
    pub failure: Option<FailureRecord>,
}
