//! Question planner collaborator interface.

use super::model::Question;
use super::plan::PlanRequest;
use crate::error::Result;
use crate::research::ResearchArtifact;
use async_trait::async_trait;

/// Turns a research artifact into an ordered list of interview questions.
///
/// # Contract
///
/// - Returns between 1 and `request.desired_count` questions.
/// - Question ids are unique; `order` is the presentation order.
/// - Fails with [`PrepError::PlanningFailure`](crate::error::PrepError::PlanningFailure)
///   when the artifact is insufficient to plan from.
///
/// The session re-validates the returned plan and treats a contract violation
/// as a planning failure.
#[async_trait]
pub trait QuestionPlanner: Send + Sync {
    async fn plan(&self, artifact: &ResearchArtifact, request: &PlanRequest)
    -> Result<Vec<Question>>;
}
