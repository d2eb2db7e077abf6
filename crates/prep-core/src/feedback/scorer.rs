//! Feedback scorer collaborator interface.

use super::model::FeedbackReport;
use crate::error::Result;
use crate::session::Session;
use async_trait::async_trait;

/// Scores a fully answered session.
///
/// Called once per interview, after every question has an answer. Failures
/// are reported as [`PrepError::ScoringFailure`](crate::error::PrepError::ScoringFailure);
/// the session keeps its answers so scoring can be retried.
#[async_trait]
pub trait FeedbackScorer: Send + Sync {
    async fn score(&self, session: &Session) -> Result<FeedbackReport>;
}
