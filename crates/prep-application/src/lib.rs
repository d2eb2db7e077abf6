//! Application layer for PREP.
//!
//! Drives interview sessions through research, question planning, answer
//! capture and feedback scoring, persisting every transition through a
//! [`SessionRepository`](prep_core::session::SessionRepository).

pub mod session;

pub use session::{Collaborators, InterviewService, InterviewSession, StageTimeouts};
