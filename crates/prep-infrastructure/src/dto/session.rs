//! Session DTOs and migrations

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use version_migrate::{IntoDomain, Versioned};

use prep_core::feedback::FeedbackReport;
use prep_core::question::{PlanRequest, Question};
use prep_core::research::ResearchArtifact;
use prep_core::session::{Answer, FailureRecord, Session, SessionStatus};

/// Session status as written to disk.
///
/// Kept separate from the domain enum so that renaming a domain variant does
/// not silently change the file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatusDTO {
    Created,
    Researching,
    QuestionsReady,
    InProgress,
    ScoringFailed,
    Completed,
    Failed,
}

impl From<SessionStatusDTO> for SessionStatus {
    fn from(dto: SessionStatusDTO) -> Self {
        match dto {
            SessionStatusDTO::Created => SessionStatus::Created,
            SessionStatusDTO::Researching => SessionStatus::Researching,
            SessionStatusDTO::QuestionsReady => SessionStatus::QuestionsReady,
            SessionStatusDTO::InProgress => SessionStatus::InProgress,
            SessionStatusDTO::ScoringFailed => SessionStatus::ScoringFailed,
            SessionStatusDTO::Completed => SessionStatus::Completed,
            SessionStatusDTO::Failed => SessionStatus::Failed,
        }
    }
}

impl From<SessionStatus> for SessionStatusDTO {
    fn from(status: SessionStatus) -> Self {
        match status {
            SessionStatus::Created => SessionStatusDTO::Created,
            SessionStatus::Researching => SessionStatusDTO::Researching,
            SessionStatus::QuestionsReady => SessionStatusDTO::QuestionsReady,
            SessionStatus::InProgress => SessionStatusDTO::InProgress,
            SessionStatus::ScoringFailed => SessionStatusDTO::ScoringFailed,
            SessionStatus::Completed => SessionStatusDTO::Completed,
            SessionStatus::Failed => SessionStatusDTO::Failed,
        }
    }
}

/// V1.0.0: Initial session schema.
#[derive(Debug, Clone, Serialize, Deserialize, Versioned)]
#[versioned(version = "1.0.0")]
pub struct SessionV1_0_0 {
    /// Unique session identifier (UUID format).
    pub id: String,
    pub company_name: String,
    pub role_name: String,
    pub status: SessionStatusDTO,
    /// Timestamp when the session was created (ISO 8601 format).
    pub created_at: String,
    /// Timestamp when the session was last updated (ISO 8601 format).
    pub updated_at: String,
    #[serde(default)]
    pub plan_request: PlanRequest,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub research: Option<ResearchArtifact>,
    /// Questions in presentation order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub questions: Vec<Question>,
    /// Answers keyed by question id.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub answers: BTreeMap<String, Answer>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feedback: Option<FeedbackReport>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure: Option<FailureRecord>,
}

// ============================================================================
// Domain model conversions
// ============================================================================

/// Convert SessionV1_0_0 DTO to domain model.
impl IntoDomain<Session> for SessionV1_0_0 {
    fn into_domain(self) -> Session {
        // Answers keyed by an unknown question id cannot be shown or scored.
        let mut answers = self.answers;
        answers.retain(|question_id, _| {
            let known = self.questions.iter().any(|q| &q.id == question_id);
            if !known {
                tracing::warn!(
                    "Dropping answer for unknown question '{}' in session {}",
                    question_id,
                    self.id
                );
            }
            known
        });

        Session {
            id: self.id,
            company_name: self.company_name,
            role_name: self.role_name,
            status: self.status.into(),
            created_at: self.created_at,
            updated_at: self.updated_at,
            plan_request: self.plan_request,
            research: self.research,
            questions: self.questions,
            answers,
            feedback: self.feedback,
            failure: self.failure,
        }
    }
}

/// Convert domain model to SessionV1_0_0 DTO for persistence.
impl version_migrate::FromDomain<Session> for SessionV1_0_0 {
    fn from_domain(session: Session) -> Self {
        let Session {
            id,
            company_name,
            role_name,
            status,
            created_at,
            updated_at,
            plan_request,
            research,
            questions,
            answers,
            feedback,
            failure,
        } = session;

        SessionV1_0_0 {
            id,
            company_name,
            role_name,
            status: status.into(),
            created_at,
            updated_at,
            plan_request,
            research,
            questions,
            answers,
            feedback,
            failure,
        }
    }
}

// ============================================================================
// Migrator factory
// ============================================================================

/// Creates and configures a Migrator instance for Session entities.
///
/// # Migration Path
///
/// - V1.0.0 → Session: Converts DTO to domain model
///
/// # Example
///
/// ```ignore
/// let migrator = create_session_migrator();
/// let session: Session = migrator.load_flat_from("session", toml_value)?;
/// ```
pub fn create_session_migrator() -> version_migrate::Migrator {
    let mut migrator = version_migrate::Migrator::builder().build();

    // Register migration path: V1.0.0 -> Session
    let session_path = version_migrate::Migrator::define("session")
        .from::<SessionV1_0_0>()
        .into_with_save::<Session>();

    migrator
        .register(session_path)
        .expect("Failed to register session migration path");

    migrator
}
