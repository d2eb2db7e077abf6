//! Research collaborator interface.

use super::model::{ResearchArtifact, ResearchRequest};
use crate::error::Result;
use async_trait::async_trait;

/// Produces a research artifact for a company/role pair.
///
/// Implementations may take arbitrarily long (network or model latency); the
/// caller bounds the call with a timeout. Failures are reported as
/// [`PrepError::ResearchFailure`](crate::error::PrepError::ResearchFailure).
#[async_trait]
pub trait ResearchCollector: Send + Sync {
    async fn research(&self, request: &ResearchRequest) -> Result<ResearchArtifact>;
}
