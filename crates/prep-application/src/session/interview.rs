//! Interview session orchestration.
//!
//! [`InterviewSession`] owns one [`Session`] and drives it through the
//! collaborators. Every transition is persisted before the call returns: the
//! change is applied to a copy, the copy is saved, and only then does it
//! replace the in-memory session. A failed save therefore leaves the session
//! as it was and surfaces as `Storage`.

use prep_core::config::TimeoutConfig;
use prep_core::feedback::FeedbackScorer;
use prep_core::question::{PlanRequest, Question, QuestionPlanner};
use prep_core::research::ResearchCollector;
use prep_core::session::{AnswerOutcome, FailureStage, Session, SessionRepository, SessionStatus};
use prep_core::{PrepError, Result};
use prep_interaction::{CatalogResearchCollector, RubricFeedbackScorer, TemplateQuestionPlanner};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

/// The external collaborators a session calls out to.
#[derive(Clone)]
pub struct Collaborators {
    pub research: Arc<dyn ResearchCollector>,
    pub planner: Arc<dyn QuestionPlanner>,
    pub scorer: Arc<dyn FeedbackScorer>,
}

impl Collaborators {
    pub fn new(
        research: Arc<dyn ResearchCollector>,
        planner: Arc<dyn QuestionPlanner>,
        scorer: Arc<dyn FeedbackScorer>,
    ) -> Self {
        Self {
            research,
            planner,
            scorer,
        }
    }

    /// The offline catalog, template and rubric implementations.
    pub fn built_in() -> Self {
        Self::new(
            Arc::new(CatalogResearchCollector::new()),
            Arc::new(TemplateQuestionPlanner::new()),
            Arc::new(RubricFeedbackScorer::new()),
        )
    }
}

/// Upper bounds for collaborator calls.
///
/// Planning runs under the research bound; the two together make up `start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageTimeouts {
    pub research: Duration,
    pub scoring: Duration,
}

impl Default for StageTimeouts {
    fn default() -> Self {
        Self::from(&TimeoutConfig::default())
    }
}

impl From<&TimeoutConfig> for StageTimeouts {
    fn from(config: &TimeoutConfig) -> Self {
        Self {
            research: config.research(),
            scoring: config.scoring(),
        }
    }
}

/// Outcome of a bounded collaborator call.
enum Bounded<T> {
    Done(T),
    Failed(String),
}

/// Runs `call` under `limit`, folding timeouts and errors into a reason string.
async fn bounded<T>(
    stage: FailureStage,
    limit: Duration,
    call: impl Future<Output = Result<T>>,
) -> Bounded<T> {
    match tokio::time::timeout(limit, call).await {
        Ok(Ok(value)) => Bounded::Done(value),
        Ok(Err(e)) => Bounded::Failed(
            e.reason()
                .map(str::to_string)
                .unwrap_or_else(|| e.to_string()),
        ),
        Err(_) => Bounded::Failed(format!("{} timed out after {:?}", stage, limit)),
    }
}

fn stage_error(stage: FailureStage, reason: impl Into<String>) -> PrepError {
    match stage {
        FailureStage::Research => PrepError::research(reason),
        FailureStage::Planning => PrepError::planning(reason),
        FailureStage::Scoring => PrepError::scoring(reason),
    }
}

/// One interview session bound to its store and collaborators.
pub struct InterviewSession {
    session: Session,
    repository: Arc<dyn SessionRepository>,
    collaborators: Collaborators,
    timeouts: StageTimeouts,
}

impl InterviewSession {
    /// Creates a session in `Created` status and persists it.
    ///
    /// # Errors
    ///
    /// - `InvalidInput` for a blank company or role, or an unusable plan request
    /// - `Storage` if the initial record cannot be written
    pub async fn create(
        company_name: &str,
        role_name: &str,
        plan_request: PlanRequest,
        repository: Arc<dyn SessionRepository>,
        collaborators: Collaborators,
        timeouts: StageTimeouts,
    ) -> Result<Self> {
        let session = Session::new(company_name, role_name, plan_request)?;
        repository.save(&session).await?;
        tracing::info!(
            "Created session {} for {} / {}",
            session.id,
            session.company_name,
            session.role_name
        );
        Ok(Self::resume(session, repository, collaborators, timeouts))
    }

    /// Wraps a previously persisted session. Nothing is written.
    pub fn resume(
        session: Session,
        repository: Arc<dyn SessionRepository>,
        collaborators: Collaborators,
        timeouts: StageTimeouts,
    ) -> Self {
        Self {
            session,
            repository,
            collaborators,
            timeouts,
        }
    }

    /// Loads a session from the store.
    ///
    /// # Errors
    ///
    /// `NotFound` if no session with this id exists.
    pub async fn load(
        session_id: &str,
        repository: Arc<dyn SessionRepository>,
        collaborators: Collaborators,
        timeouts: StageTimeouts,
    ) -> Result<Self> {
        let session = repository.load(session_id).await?;
        tracing::debug!("Resumed session {} in status {}", session.id, session.status);
        Ok(Self::resume(session, repository, collaborators, timeouts))
    }

    pub fn id(&self) -> &str {
        &self.session.id
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn status(&self) -> SessionStatus {
        self.session.status
    }

    /// The lowest-order unanswered question.
    pub fn current_question(&self) -> Option<&Question> {
        self.session.current_question()
    }

    /// Applies `mutate` to a copy, saves the copy, then commits it.
    async fn commit<R>(&mut self, mutate: impl FnOnce(&mut Session) -> Result<R>) -> Result<R> {
        let mut draft = self.session.clone();
        let outcome = mutate(&mut draft)?;
        self.repository.save(&draft).await?;
        self.session = draft;
        Ok(outcome)
    }

    /// Moves the session to `Failed` and returns the error to propagate.
    async fn fail(&mut self, stage: FailureStage, reason: String) -> PrepError {
        tracing::warn!("Session {} failed at {}: {}", self.session.id, stage, reason);
        let recorded = reason.clone();
        if let Err(e) = self.commit(|s| s.fail(stage, recorded)).await {
            return e;
        }
        stage_error(stage, reason)
    }

    /// Runs research and question planning.
    ///
    /// `Created -> Researching -> QuestionsReady`. A session left in
    /// `Researching` by an interrupted start can be started again; research
    /// that was already recorded is reused.
    ///
    /// # Errors
    ///
    /// - `InvalidState` from any other status
    /// - `ResearchFailure` / `PlanningFailure` after the session was moved to
    ///   `Failed` with the reason recorded
    /// - `Storage` if a transition could not be persisted
    pub async fn start(&mut self) -> Result<()> {
        match self.session.status {
            SessionStatus::Created => {
                self.commit(|s| s.begin_research()).await?;
                tracing::info!("Session {} researching", self.session.id);
            }
            SessionStatus::Researching => {
                tracing::info!("Session {} resuming interrupted start", self.session.id);
            }
            status => return Err(PrepError::invalid_state("start", status)),
        }

        if self.session.research.is_none() {
            let request = self.session.research_request();
            let research = self.collaborators.research.clone();
            match bounded(
                FailureStage::Research,
                self.timeouts.research,
                research.research(&request),
            )
            .await
            {
                Bounded::Done(artifact) => {
                    self.commit(|s| s.record_research(artifact)).await?;
                }
                Bounded::Failed(reason) => {
                    return Err(self.fail(FailureStage::Research, reason).await);
                }
            }
        }

        let Some(artifact) = self.session.research.clone() else {
            return Err(PrepError::internal("research missing after it was recorded"));
        };
        let plan_request = self.session.plan_request;
        let planner = self.collaborators.planner.clone();
        let questions = match bounded(
            FailureStage::Planning,
            self.timeouts.research,
            planner.plan(&artifact, &plan_request),
        )
        .await
        {
            Bounded::Done(questions) => questions,
            Bounded::Failed(reason) => {
                return Err(self.fail(FailureStage::Planning, reason).await);
            }
        };

        match self.commit(|s| s.record_questions(questions)).await {
            Ok(()) => {
                tracing::info!(
                    "Session {} ready with {} questions",
                    self.session.id,
                    self.session.questions.len()
                );
                Ok(())
            }
            Err(PrepError::PlanningFailure(reason)) => {
                Err(self.fail(FailureStage::Planning, reason).await)
            }
            Err(e) => Err(e),
        }
    }

    /// Records an answer; the last missing answer triggers scoring.
    ///
    /// # Errors
    ///
    /// - `InvalidState` / `UnknownQuestion` without any mutation
    /// - `Storage` if the answer could not be persisted
    /// - `ScoringFailure` if scoring the completed interview failed; the
    ///   answer stays recorded and the session is `ScoringFailed`
    pub async fn submit_answer(&mut self, question_id: &str, text: &str) -> Result<AnswerOutcome> {
        self.session.validate_answer(question_id)?;

        let outcome = self
            .commit(|s| s.record_answer(question_id, text))
            .await?;

        let (answered, total) = self.session.progress();
        tracing::info!(
            "Session {}: answer to {} recorded ({}/{}){}",
            self.session.id,
            question_id,
            answered,
            total,
            if outcome.overwritten { ", replacing earlier answer" } else { "" }
        );

        if outcome.all_answered && self.session.awaits_scoring() {
            self.score().await?;
        }
        Ok(outcome)
    }

    /// Scores the interview again without replaying it.
    ///
    /// Allowed from `ScoringFailed`, and from `InProgress` once every question
    /// is answered (a crash between the last answer and scoring).
    pub async fn retry_scoring(&mut self) -> Result<()> {
        if !self.session.awaits_scoring() {
            return Err(PrepError::invalid_state("retry scoring", self.session.status));
        }
        tracing::info!("Session {} retrying scoring", self.session.id);
        self.score().await
    }

    async fn score(&mut self) -> Result<()> {
        let snapshot = self.session.clone();
        let scorer = self.collaborators.scorer.clone();

        let reason = match bounded(
            FailureStage::Scoring,
            self.timeouts.scoring,
            scorer.score(&snapshot),
        )
        .await
        {
            Bounded::Done(report) => {
                let overall = report.overall_score;
                match self.commit(|s| s.record_feedback(report)).await {
                    Ok(()) => {
                        tracing::info!(
                            "Session {} completed with score {}",
                            self.session.id,
                            overall
                        );
                        return Ok(());
                    }
                    Err(PrepError::ScoringFailure(reason)) => reason,
                    Err(e) => return Err(e),
                }
            }
            Bounded::Failed(reason) => reason,
        };

        tracing::warn!("Session {} scoring failed: {}", self.session.id, reason);
        let recorded = reason.clone();
        self.commit(|s| s.record_scoring_failure(recorded)).await?;
        Err(PrepError::scoring(reason))
    }
}
