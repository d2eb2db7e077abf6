use super::cache::{SessionCache, SessionHandle};
use super::interview::{Collaborators, InterviewSession, StageTimeouts};
use prep_core::config::PrepConfig;
use prep_core::question::{PlanRequest, Question};
use prep_core::session::{AnswerOutcome, Session, SessionRepository, SessionStatus};
use prep_core::Result;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Session-id scoped entry point for interview sessions.
///
/// Every call names the session it acts on; there is no "current session".
/// Calls for the same id are serialized by that session's mutex, calls for
/// different ids run concurrently. Sessions not yet in memory are resumed
/// from the repository on first access. Completed and failed sessions are
/// not kept in memory.
pub struct InterviewService {
    repository: Arc<dyn SessionRepository>,
    collaborators: Collaborators,
    timeouts: StageTimeouts,
    default_plan: PlanRequest,
    cache: SessionCache,
}

impl InterviewService {
    pub fn new(repository: Arc<dyn SessionRepository>, collaborators: Collaborators) -> Self {
        Self {
            repository,
            collaborators,
            timeouts: StageTimeouts::default(),
            default_plan: PlanRequest::default(),
            cache: SessionCache::new(),
        }
    }

    /// Takes timeouts and the default plan from `config`.
    pub fn from_config(
        repository: Arc<dyn SessionRepository>,
        collaborators: Collaborators,
        config: &PrepConfig,
    ) -> Self {
        Self::new(repository, collaborators)
            .with_timeouts(StageTimeouts::from(&config.timeouts))
            .with_default_plan(config.planning.plan_request())
    }

    pub fn with_timeouts(mut self, timeouts: StageTimeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    pub fn with_default_plan(mut self, plan_request: PlanRequest) -> Self {
        self.default_plan = plan_request;
        self
    }

    /// Returns the cached handle for `session_id`, loading it if needed.
    async fn handle(&self, session_id: &str) -> Result<SessionHandle> {
        if let Some(handle) = self.cache.get(session_id).await {
            return Ok(handle);
        }

        let interview = InterviewSession::load(
            session_id,
            self.repository.clone(),
            self.collaborators.clone(),
            self.timeouts,
        )
        .await?;
        if interview.status().is_terminal() {
            return Ok(Arc::new(Mutex::new(interview)));
        }
        Ok(self.cache.insert_if_absent(interview).await)
    }

    /// Removes a session from the cache once it can no longer change.
    async fn release_if_terminal(&self, session_id: &str, status: SessionStatus) {
        if status.is_terminal() {
            self.cache.remove(session_id).await;
            tracing::debug!("Released session {} ({})", session_id, status);
        }
    }

    /// Creates and persists a new session. `plan_request` falls back to the
    /// configured default.
    pub async fn create_session(
        &self,
        company_name: &str,
        role_name: &str,
        plan_request: Option<PlanRequest>,
    ) -> Result<Session> {
        let interview = InterviewSession::create(
            company_name,
            role_name,
            plan_request.unwrap_or(self.default_plan),
            self.repository.clone(),
            self.collaborators.clone(),
            self.timeouts,
        )
        .await?;
        let snapshot = interview.session().clone();
        self.cache.insert_if_absent(interview).await;
        Ok(snapshot)
    }

    /// Runs research and planning; returns the session afterwards.
    pub async fn start(&self, session_id: &str) -> Result<Session> {
        let handle = self.handle(session_id).await?;
        let mut interview = handle.lock().await;
        let outcome = interview.start().await;
        let status = interview.status();
        let snapshot = interview.session().clone();
        drop(interview);

        self.release_if_terminal(session_id, status).await;
        outcome.map(|()| snapshot)
    }

    pub async fn submit_answer(
        &self,
        session_id: &str,
        question_id: &str,
        text: &str,
    ) -> Result<AnswerOutcome> {
        let handle = self.handle(session_id).await?;
        let mut interview = handle.lock().await;
        let outcome = interview.submit_answer(question_id, text).await;
        let status = interview.status();
        drop(interview);

        self.release_if_terminal(session_id, status).await;
        outcome
    }

    pub async fn current_question(&self, session_id: &str) -> Result<Option<Question>> {
        let handle = self.handle(session_id).await?;
        let interview = handle.lock().await;
        Ok(interview.current_question().cloned())
    }

    pub async fn status(&self, session_id: &str) -> Result<SessionStatus> {
        let handle = self.handle(session_id).await?;
        let interview = handle.lock().await;
        Ok(interview.status())
    }

    /// Snapshot of the full session record.
    pub async fn session(&self, session_id: &str) -> Result<Session> {
        let handle = self.handle(session_id).await?;
        let interview = handle.lock().await;
        Ok(interview.session().clone())
    }

    pub async fn retry_scoring(&self, session_id: &str) -> Result<Session> {
        let handle = self.handle(session_id).await?;
        let mut interview = handle.lock().await;
        let outcome = interview.retry_scoring().await;
        let status = interview.status();
        let snapshot = interview.session().clone();
        drop(interview);

        self.release_if_terminal(session_id, status).await;
        outcome.map(|()| snapshot)
    }

    /// Ids of all stored sessions, oldest first.
    pub async fn list_ids(&self) -> Result<Vec<String>> {
        self.repository.list_ids().await
    }
}
