//! Lifecycle rules of a session.
//!
//! Every mutation of a [`Session`] goes through these methods. Each one checks
//! its preconditions before touching any field, so a rejected call leaves the
//! session exactly as it was.

use super::model::{
    Answer, FailureRecord, FailureStage, Session, SessionStatus, now_timestamp,
};
use crate::error::{PrepError, Result};
use crate::feedback::FeedbackReport;
use crate::question::{PlanRequest, Question};
use crate::research::{ResearchArtifact, ResearchRequest};
use std::collections::{BTreeMap, HashSet};

/// Result of a successful answer submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnswerOutcome {
    /// An earlier answer to the same question was replaced
    pub overwritten: bool,
    /// Every question now has an answer
    pub all_answered: bool,
}

impl Session {
    /// Creates a new session in `Created` status.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` when the company or role name is blank or the
    /// plan request can never be satisfied.
    pub fn new(
        company_name: impl Into<String>,
        role_name: impl Into<String>,
        plan_request: PlanRequest,
    ) -> Result<Self> {
        let company_name = company_name.into().trim().to_string();
        let role_name = role_name.into().trim().to_string();
        if company_name.is_empty() {
            return Err(PrepError::invalid_input("company name must not be empty"));
        }
        if role_name.is_empty() {
            return Err(PrepError::invalid_input("role name must not be empty"));
        }
        plan_request.validate()?;

        let now = now_timestamp();
        Ok(Self {
            id: uuid::Uuid::new_v4().to_string(),
            company_name,
            role_name,
            status: SessionStatus::Created,
            created_at: now.clone(),
            updated_at: now,
            plan_request,
            research: None,
            questions: Vec::new(),
            answers: BTreeMap::new(),
            feedback: None,
            failure: None,
        })
    }

    /// The request handed to the research collaborator.
    pub fn research_request(&self) -> ResearchRequest {
        ResearchRequest::new(&self.company_name, &self.role_name)
    }

    fn transition_to(&mut self, next: SessionStatus) -> Result<()> {
        if !self.status.can_transition_to(next) {
            return Err(PrepError::invalid_state(
                format!("move to {}", next),
                self.status,
            ));
        }
        self.status = next;
        self.updated_at = now_timestamp();
        Ok(())
    }

    fn require(&self, operation: &str, allowed: &[SessionStatus]) -> Result<()> {
        if allowed.contains(&self.status) {
            Ok(())
        } else {
            Err(PrepError::invalid_state(operation, self.status))
        }
    }

    /// `Created -> Researching`.
    pub fn begin_research(&mut self) -> Result<()> {
        self.transition_to(SessionStatus::Researching)
    }

    /// Stores the research artifact. Allowed only while `Researching`.
    pub fn record_research(&mut self, artifact: ResearchArtifact) -> Result<()> {
        self.require("record research", &[SessionStatus::Researching])?;
        self.research = Some(artifact);
        self.updated_at = now_timestamp();
        Ok(())
    }

    /// Accepts the planned questions: `Researching -> QuestionsReady`.
    ///
    /// Questions are stored sorted by `order` (stable for equal orders) and
    /// never change afterwards.
    ///
    /// # Errors
    ///
    /// - `InvalidState` if not `Researching` or no research is recorded yet
    /// - `PlanningFailure` if the plan is empty, larger than the requested
    ///   count, or has blank or duplicate question ids
    pub fn record_questions(&mut self, mut questions: Vec<Question>) -> Result<()> {
        self.require("record questions", &[SessionStatus::Researching])?;
        if self.research.is_none() {
            return Err(PrepError::invalid_state(
                "record questions before research",
                self.status,
            ));
        }
        validate_plan(&questions, &self.plan_request)?;

        questions.sort_by_key(|q| q.order);
        self.questions = questions;
        self.transition_to(SessionStatus::QuestionsReady)
    }

    /// Checks whether an answer for `question_id` would be accepted.
    pub fn validate_answer(&self, question_id: &str) -> Result<()> {
        if !self.status.accepts_answers() {
            return Err(PrepError::invalid_state("submit an answer", self.status));
        }
        if !self.questions.iter().any(|q| q.id == question_id) {
            return Err(PrepError::UnknownQuestion(question_id.to_string()));
        }
        Ok(())
    }

    /// Records (or overwrites) the answer to `question_id`.
    ///
    /// The first answer moves `QuestionsReady -> InProgress`. Overwriting an
    /// answer never changes the status.
    ///
    /// # Errors
    ///
    /// - `InvalidState` unless status is `QuestionsReady` or `InProgress`
    /// - `UnknownQuestion` if the session has no such question
    pub fn record_answer(
        &mut self,
        question_id: &str,
        text: impl Into<String>,
    ) -> Result<AnswerOutcome> {
        self.validate_answer(question_id)?;

        if self.status == SessionStatus::QuestionsReady {
            self.transition_to(SessionStatus::InProgress)?;
        }

        let now = now_timestamp();
        let previous = self.answers.insert(
            question_id.to_string(),
            Answer {
                question_id: question_id.to_string(),
                text: text.into(),
                submitted_at: now.clone(),
            },
        );
        self.updated_at = now;

        Ok(AnswerOutcome {
            overwritten: previous.is_some(),
            all_answered: self.is_fully_answered(),
        })
    }

    /// The lowest-order question without an answer, or `None` when every
    /// question is answered (or none are planned yet).
    pub fn current_question(&self) -> Option<&Question> {
        self.questions
            .iter()
            .filter(|q| !self.answers.contains_key(&q.id))
            .min_by_key(|q| q.order)
    }

    /// Whether every planned question has an answer.
    pub fn is_fully_answered(&self) -> bool {
        !self.questions.is_empty() && self.questions.iter().all(|q| self.answers.contains_key(&q.id))
    }

    /// `(answered, total)` question counts.
    pub fn progress(&self) -> (usize, usize) {
        let answered = self
            .questions
            .iter()
            .filter(|q| self.answers.contains_key(&q.id))
            .count();
        (answered, self.questions.len())
    }

    /// Whether the session is waiting for (or retrying) feedback scoring.
    pub fn awaits_scoring(&self) -> bool {
        match self.status {
            SessionStatus::InProgress => self.is_fully_answered(),
            SessionStatus::ScoringFailed => true,
            _ => false,
        }
    }

    /// Stores the feedback report: `InProgress | ScoringFailed -> Completed`.
    pub fn record_feedback(&mut self, report: FeedbackReport) -> Result<()> {
        if !self.awaits_scoring() {
            return Err(PrepError::invalid_state("record feedback", self.status));
        }
        if let Some(violation) = report.range_violation() {
            return Err(PrepError::scoring(violation));
        }
        if let Some(violation) = self.coverage_violation(&report) {
            return Err(PrepError::scoring(violation));
        }
        self.transition_to(SessionStatus::Completed)?;
        self.feedback = Some(report);
        self.failure = None;
        Ok(())
    }

    /// A report must carry feedback for exactly the planned questions.
    fn coverage_violation(&self, report: &FeedbackReport) -> Option<String> {
        if let Some(id) = report
            .per_question
            .keys()
            .find(|id| !self.questions.iter().any(|q| &q.id == *id))
        {
            return Some(format!("report scores unknown question '{}'", id));
        }
        self.questions
            .iter()
            .find(|q| !report.per_question.contains_key(&q.id))
            .map(|q| format!("report has no feedback for question '{}'", q.id))
    }

    /// Records a scoring failure: `InProgress -> ScoringFailed`.
    ///
    /// Answers are kept. A session already in `ScoringFailed` keeps its status
    /// and only has its failure record replaced.
    pub fn record_scoring_failure(&mut self, reason: impl Into<String>) -> Result<()> {
        if !self.awaits_scoring() {
            return Err(PrepError::invalid_state(
                "record a scoring failure",
                self.status,
            ));
        }
        if self.status != SessionStatus::ScoringFailed {
            self.transition_to(SessionStatus::ScoringFailed)?;
        }
        self.failure = Some(failure_record(FailureStage::Scoring, reason.into()));
        self.updated_at = now_timestamp();
        Ok(())
    }

    /// Moves an active session to the terminal `Failed` status.
    pub fn fail(&mut self, stage: FailureStage, reason: impl Into<String>) -> Result<()> {
        self.transition_to(SessionStatus::Failed)?;
        self.failure = Some(failure_record(stage, reason.into()));
        Ok(())
    }

    /// The failure reason, if the session failed.
    pub fn failure_reason(&self) -> Option<&str> {
        self.failure.as_ref().map(|f| f.reason.as_str())
    }
}

fn failure_record(stage: FailureStage, reason: String) -> FailureRecord {
    let reason = if reason.trim().is_empty() {
        format!("{} failed without a reason", stage)
    } else {
        reason
    };
    FailureRecord {
        stage,
        reason,
        failed_at: now_timestamp(),
    }
}

fn validate_plan(questions: &[Question], request: &PlanRequest) -> Result<()> {
    if questions.is_empty() {
        return Err(PrepError::planning("planner returned no questions"));
    }
    if questions.len() > request.desired_count as usize {
        return Err(PrepError::planning(format!(
            "planner returned {} questions, at most {} requested",
            questions.len(),
            request.desired_count
        )));
    }
    let mut seen = HashSet::new();
    for q in questions {
        if q.id.trim().is_empty() {
            return Err(PrepError::planning("planner returned a question without an id"));
        }
        if !seen.insert(q.id.as_str()) {
            return Err(PrepError::planning(format!(
                "planner returned duplicate question id '{}'",
                q.id
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feedback::{DimensionScores, PerformanceLevel, QuestionFeedback};
    use crate::question::{CategoryMix, Difficulty, QuestionCategory};

    fn artifact() -> ResearchArtifact {
        ResearchArtifact {
            company_name: "Acme".to_string(),
            role_name: "Backend Engineer".to_string(),
            summary: "Acme builds rockets".to_string(),
            culture: "Ship fast".to_string(),
            values: String::new(),
            interview_style: String::new(),
            role_requirements: String::new(),
            recent_news: vec![],
            researched_at: now_timestamp(),
        }
    }

    fn questions(n: u32) -> Vec<Question> {
        (1..=n)
            .map(|i| {
                Question::new(
                    format!("q{}", i),
                    format!("Question {}", i),
                    QuestionCategory::Technical,
                    Difficulty::Easy,
                    i,
                )
            })
            .collect()
    }

    fn report(ids: &[&str]) -> FeedbackReport {
        FeedbackReport {
            per_question: ids
                .iter()
                .map(|id| {
                    (
                        id.to_string(),
                        QuestionFeedback {
                            score: 80,
                            strengths: vec![],
                            weaknesses: vec![],
                        },
                    )
                })
                .collect(),
            overall_score: 80,
            performance_level: PerformanceLevel::Good,
            dimensions: DimensionScores::default(),
            key_strengths: vec![],
            priority_improvements: vec![],
            next_steps: vec![],
            generated_at: now_timestamp(),
        }
    }

    fn ready_session(n: u32) -> Session {
        let mut session =
            Session::new("Acme", "Backend Engineer", PlanRequest::new(n, CategoryMix::default()))
                .unwrap();
        session.begin_research().unwrap();
        session.record_research(artifact()).unwrap();
        session.record_questions(questions(n)).unwrap();
        session
    }

    fn assert_answers_subset_of_questions(session: &Session) {
        for key in session.answers.keys() {
            assert!(session.questions.iter().any(|q| &q.id == key));
        }
    }

    #[test]
    fn test_new_session_validates_input() {
        assert!(Session::new("  ", "Engineer", PlanRequest::default()).is_err());
        assert!(Session::new("Acme", "", PlanRequest::default()).is_err());

        let session = Session::new(" Acme ", "Engineer", PlanRequest::default()).unwrap();
        assert_eq!(session.company_name, "Acme");
        assert_eq!(session.status, SessionStatus::Created);
        assert!(uuid::Uuid::parse_str(&session.id).is_ok());
    }

    #[test]
    fn test_happy_path_reaches_completed() {
        let mut session = ready_session(3);
        assert_eq!(session.status, SessionStatus::QuestionsReady);

        let first = session.record_answer("q1", "a1").unwrap();
        assert!(!first.all_answered);
        assert_eq!(session.status, SessionStatus::InProgress);

        session.record_answer("q2", "a2").unwrap();
        let last = session.record_answer("q3", "a3").unwrap();
        assert!(last.all_answered);
        assert!(session.awaits_scoring());
        assert_eq!(session.status, SessionStatus::InProgress);

        session.record_feedback(report(&["q1", "q2", "q3"])).unwrap();
        assert_eq!(session.status, SessionStatus::Completed);
        assert!(session.feedback.is_some());
        assert_answers_subset_of_questions(&session);
    }

    #[test]
    fn test_questions_sorted_by_order() {
        let mut session = Session::new("Acme", "Engineer", PlanRequest::default()).unwrap();
        session.begin_research().unwrap();
        session.record_research(artifact()).unwrap();
        let mut qs = questions(3);
        qs.reverse();
        session.record_questions(qs).unwrap();

        let ids: Vec<&str> = session.questions.iter().map(|q| q.id.as_str()).collect();
        assert_eq!(ids, vec!["q1", "q2", "q3"]);
    }

    #[test]
    fn test_invalid_plans_are_rejected_without_mutation() {
        let mut session = Session::new("Acme", "Engineer", PlanRequest::new(2, CategoryMix::default()))
            .unwrap();
        session.begin_research().unwrap();
        session.record_research(artifact()).unwrap();
        let before = session.clone();

        let err = session.record_questions(vec![]).unwrap_err();
        assert!(matches!(err, PrepError::PlanningFailure(_)));

        let err = session.record_questions(questions(3)).unwrap_err();
        assert!(matches!(err, PrepError::PlanningFailure(_)));

        let mut dup = questions(2);
        dup[1].id = "q1".to_string();
        let err = session.record_questions(dup).unwrap_err();
        assert!(matches!(err, PrepError::PlanningFailure(_)));

        assert_eq!(session, before);
    }

    #[test]
    fn test_questions_require_research() {
        let mut session = Session::new("Acme", "Engineer", PlanRequest::default()).unwrap();
        session.begin_research().unwrap();
        assert!(session.record_questions(questions(1)).unwrap_err().is_invalid_state());
    }

    #[test]
    fn test_answer_rejected_in_wrong_state_leaves_session_unchanged() {
        let mut session = Session::new("Acme", "Engineer", PlanRequest::default()).unwrap();
        let before = session.clone();
        for _ in 0..2 {
            let err = session.record_answer("q1", "early").unwrap_err();
            assert!(err.is_invalid_state());
            assert_eq!(session, before);
        }
    }

    #[test]
    fn test_unknown_question_leaves_session_unchanged() {
        let mut session = ready_session(2);
        let before = session.clone();

        let err = session.record_answer("q9", "nope").unwrap_err();
        assert_eq!(err, PrepError::UnknownQuestion("q9".to_string()));
        assert_eq!(session, before);
        assert_eq!(session.status, SessionStatus::QuestionsReady);
    }

    #[test]
    fn test_resubmission_overwrites_without_status_change() {
        let mut session = ready_session(3);
        session.record_answer("q1", "first").unwrap();
        let status = session.status;

        let outcome = session.record_answer("q1", "second").unwrap();
        assert!(outcome.overwritten);
        assert_eq!(session.answers.len(), 1);
        assert_eq!(session.answers["q1"].text, "second");
        assert_eq!(session.status, status);
    }

    #[test]
    fn test_current_question_follows_order() {
        let mut session = ready_session(3);
        assert_eq!(session.current_question().unwrap().id, "q1");

        session.record_answer("q2", "out of order").unwrap();
        assert_eq!(session.current_question().unwrap().id, "q1");

        session.record_answer("q1", "a1").unwrap();
        assert_eq!(session.current_question().unwrap().id, "q3");

        session.record_answer("q3", "a3").unwrap();
        assert!(session.current_question().is_none());
        assert_eq!(session.progress(), (3, 3));
    }

    #[test]
    fn test_scoring_failure_keeps_answers_and_allows_retry() {
        let mut session = ready_session(2);
        session.record_answer("q1", "a1").unwrap();
        session.record_answer("q2", "a2").unwrap();

        session.record_scoring_failure("scorer offline").unwrap();
        assert_eq!(session.status, SessionStatus::ScoringFailed);
        assert_eq!(session.answers.len(), 2);
        assert_eq!(session.failure_reason(), Some("scorer offline"));
        assert!(session.record_answer("q1", "late").unwrap_err().is_invalid_state());

        session.record_scoring_failure("still offline").unwrap();
        assert_eq!(session.status, SessionStatus::ScoringFailed);
        assert_eq!(session.failure_reason(), Some("still offline"));

        session.record_feedback(report(&["q1", "q2"])).unwrap();
        assert_eq!(session.status, SessionStatus::Completed);
        assert!(session.failure.is_none());
    }

    #[test]
    fn test_report_must_cover_exactly_the_questions() {
        let mut session = ready_session(2);
        session.record_answer("q1", "a1").unwrap();
        session.record_answer("q2", "a2").unwrap();

        let err = session.record_feedback(report(&["q1"])).unwrap_err();
        assert!(matches!(err, PrepError::ScoringFailure(ref r) if r.contains("'q2'")));

        let err = session.record_feedback(report(&["q1", "q2", "q9"])).unwrap_err();
        assert!(matches!(err, PrepError::ScoringFailure(ref r) if r.contains("'q9'")));

        assert_eq!(session.status, SessionStatus::InProgress);
        assert!(session.feedback.is_none());

        session.record_feedback(report(&["q2", "q1"])).unwrap();
        assert_eq!(session.status, SessionStatus::Completed);
    }

    #[test]
    fn test_feedback_requires_all_answers() {
        let mut session = ready_session(2);
        session.record_answer("q1", "a1").unwrap();
        assert!(session.record_feedback(report(&["q1"])).unwrap_err().is_invalid_state());
        assert!(session.feedback.is_none());
    }

    #[test]
    fn test_fail_is_terminal() {
        let mut session = Session::new("Acme", "Engineer", PlanRequest::default()).unwrap();
        // Created is not an active state
        assert!(session.fail(FailureStage::Research, "x").is_err());

        session.begin_research().unwrap();
        session.fail(FailureStage::Research, "").unwrap();
        assert_eq!(session.status, SessionStatus::Failed);
        assert!(!session.failure_reason().unwrap().is_empty());

        assert!(session.begin_research().is_err());
        assert!(session.fail(FailureStage::Research, "again").is_err());
        assert!(session.record_answer("q1", "a").unwrap_err().is_invalid_state());
    }

    #[test]
    fn test_transition_table() {
        use SessionStatus::*;
        assert!(Created.can_transition_to(Researching));
        assert!(!Created.can_transition_to(Failed));
        assert!(!QuestionsReady.can_transition_to(Completed));
        assert!(!ScoringFailed.can_transition_to(Failed));
        assert!(!Completed.can_transition_to(Failed));
        assert!(!Failed.can_transition_to(Researching));
        assert!(Completed.is_terminal() && Failed.is_terminal());
        assert!(!ScoringFailed.is_terminal());
    }
}
