//! Mock repository and collaborators shared by the session tests.

use super::interview::{Collaborators, StageTimeouts};
use async_trait::async_trait;
use prep_core::feedback::{
    DimensionScores, FeedbackReport, FeedbackScorer, PerformanceLevel, QuestionFeedback,
};
use prep_core::question::{Difficulty, PlanRequest, Question, QuestionCategory, QuestionPlanner};
use prep_core::research::{ResearchArtifact, ResearchCollector, ResearchRequest};
use prep_core::session::{Session, SessionRepository, SessionStatus, now_timestamp};
use prep_core::{PrepError, Result};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// In-memory repository that records every save.
#[derive(Default)]
pub struct MockSessionRepository {
    sessions: Mutex<HashMap<String, Session>>,
    saves: Mutex<Vec<(String, SessionStatus)>>,
    fail_saves: AtomicBool,
}

impl MockSessionRepository {
    pub fn fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    pub fn stored(&self, id: &str) -> Option<Session> {
        self.sessions.lock().unwrap().get(id).cloned()
    }

    /// Overwrites a record without counting it as a save.
    pub fn put(&self, session: Session) {
        self.sessions
            .lock()
            .unwrap()
            .insert(session.id.clone(), session);
    }

    pub fn save_count(&self) -> usize {
        self.saves.lock().unwrap().len()
    }

    pub fn saved_statuses(&self, id: &str) -> Vec<SessionStatus> {
        self.saves
            .lock()
            .unwrap()
            .iter()
            .filter(|(saved_id, _)| saved_id == id)
            .map(|(_, status)| *status)
            .collect()
    }
}

#[async_trait]
impl SessionRepository for MockSessionRepository {
    async fn find_by_id(&self, session_id: &str) -> Result<Option<Session>> {
        Ok(self.stored(session_id))
    }

    async fn save(&self, session: &Session) -> Result<()> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(PrepError::storage("disk full"));
        }
        self.saves
            .lock()
            .unwrap()
            .push((session.id.clone(), session.status));
        self.put(session.clone());
        Ok(())
    }

    async fn delete(&self, session_id: &str) -> Result<()> {
        self.sessions.lock().unwrap().remove(session_id);
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<Session>> {
        Ok(self.sessions.lock().unwrap().values().cloned().collect())
    }
}

#[derive(Default)]
pub struct MockResearch {
    calls: AtomicUsize,
    delay: Mutex<Option<Duration>>,
    error: Mutex<Option<String>>,
}

impl MockResearch {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock().unwrap() = Some(delay);
    }

    pub fn fail_with(&self, reason: &str) {
        *self.error.lock().unwrap() = Some(reason.to_string());
    }
}

#[async_trait]
impl ResearchCollector for MockResearch {
    async fn research(&self, request: &ResearchRequest) -> Result<ResearchArtifact> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let delay = *self.delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(reason) = self.error.lock().unwrap().clone() {
            return Err(PrepError::research(reason));
        }
        Ok(ResearchArtifact {
            company_name: request.company_name.clone(),
            role_name: request.role_name.clone(),
            summary: format!("{} summary", request.company_name),
            culture: "Ship fast".to_string(),
            values: String::new(),
            interview_style: String::new(),
            role_requirements: String::new(),
            recent_news: vec![],
            researched_at: now_timestamp(),
        })
    }
}

/// Plans `count` questions (default: the requested count), ids `q1..qN`.
#[derive(Default)]
pub struct MockPlanner {
    calls: AtomicUsize,
    count: Mutex<Option<u32>>,
}

impl MockPlanner {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn set_count(&self, count: u32) {
        *self.count.lock().unwrap() = Some(count);
    }
}

#[async_trait]
impl QuestionPlanner for MockPlanner {
    async fn plan(&self, artifact: &ResearchArtifact, request: &PlanRequest) -> Result<Vec<Question>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let count = self.count.lock().unwrap().unwrap_or(request.desired_count);
        // Returned in reverse to check that the session sorts by order
        Ok((1..=count)
            .rev()
            .map(|i| {
                Question::new(
                    format!("q{}", i),
                    format!("Question {} about {}", i, artifact.company_name),
                    QuestionCategory::Technical,
                    Difficulty::Easy,
                    i,
                )
            })
            .collect())
    }
}

pub struct MockScorer {
    calls: AtomicUsize,
    error: Mutex<Option<String>>,
    overall: Mutex<u8>,
    delay: Mutex<Option<Duration>>,
    omitted: Mutex<Option<String>>,
}

impl Default for MockScorer {
    fn default() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            error: Mutex::new(None),
            overall: Mutex::new(80),
            delay: Mutex::new(None),
            omitted: Mutex::new(None),
        }
    }
}

impl MockScorer {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn fail_with(&self, reason: &str) {
        *self.error.lock().unwrap() = Some(reason.to_string());
    }

    pub fn succeed(&self) {
        *self.error.lock().unwrap() = None;
    }

    pub fn set_overall(&self, overall: u8) {
        *self.overall.lock().unwrap() = overall;
    }

    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock().unwrap() = Some(delay);
    }

    /// Leaves `question_id` out of the per-question feedback.
    pub fn omit(&self, question_id: &str) {
        *self.omitted.lock().unwrap() = Some(question_id.to_string());
    }
}

#[async_trait]
impl FeedbackScorer for MockScorer {
    async fn score(&self, session: &Session) -> Result<FeedbackReport> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let delay = *self.delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(reason) = self.error.lock().unwrap().clone() {
            return Err(PrepError::scoring(reason));
        }
        let overall = *self.overall.lock().unwrap();
        let omitted = self.omitted.lock().unwrap().clone();
        Ok(FeedbackReport {
            per_question: session
                .answers
                .keys()
                .filter(|id| omitted.as_deref() != Some(id.as_str()))
                .map(|id| {
                    (
                        id.clone(),
                        QuestionFeedback {
                            score: 80,
                            strengths: vec![],
                            weaknesses: vec![],
                        },
                    )
                })
                .collect(),
            overall_score: overall,
            performance_level: PerformanceLevel::from_score(overall),
            dimensions: DimensionScores::default(),
            key_strengths: vec![],
            priority_improvements: vec![],
            next_steps: vec![],
            generated_at: now_timestamp(),
        })
    }
}

pub struct TestEnv {
    pub repository: Arc<MockSessionRepository>,
    pub research: Arc<MockResearch>,
    pub planner: Arc<MockPlanner>,
    pub scorer: Arc<MockScorer>,
    pub timeouts: StageTimeouts,
}

impl TestEnv {
    pub fn new() -> Self {
        Self {
            repository: Arc::new(MockSessionRepository::default()),
            research: Arc::new(MockResearch::default()),
            planner: Arc::new(MockPlanner::default()),
            scorer: Arc::new(MockScorer::default()),
            timeouts: StageTimeouts::default(),
        }
    }

    pub fn collaborators(&self) -> Collaborators {
        Collaborators::new(
            self.research.clone(),
            self.planner.clone(),
            self.scorer.clone(),
        )
    }
}
